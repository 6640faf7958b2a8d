//! OKR Coach configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main OKR Coach configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Per-stage model settings
    pub stages: StagesConfig,

    /// Calendar service configuration
    pub calendar: CalendarConfig,

    /// Feedback storage configuration
    pub feedback: FeedbackConfig,

    /// HTTP surface configuration
    pub server: ServerConfig,

    /// Wizard timing and persistence
    pub wizard: WizardConfig,

    /// Identity used by the terminal wizard
    pub identity: IdentityConfig,

    /// Directory containing `.pmt` prompt overrides
    #[serde(rename = "prompts-dir")]
    pub prompts_dir: Option<PathBuf>,
}

impl Config {
    /// Validate configuration before use
    ///
    /// Checks that the LLM API key environment variable is set.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .okrcoach.yml
        let local_config = PathBuf::from(".okrcoach.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/okrcoach/okrcoach.yml
        if let Some(user_config) = Self::user_config_path()
            && user_config.exists()
        {
            match Self::load_from_file(&user_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialized
    ///
    /// Errors are swallowed; the full load reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => {
                let mut paths = vec![PathBuf::from(".okrcoach.yml")];
                paths.extend(Self::user_config_path());
                paths
            }
        };

        candidates
            .into_iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(&p).ok())
            .and_then(|c| c.log_level)
    }

    fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("okrcoach").join("okrcoach.yml"))
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("gemini" or "anthropic")
    pub provider: String,

    /// Default model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds; no timeout when unset
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 8192,
            timeout_ms: None,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .map_err(|_| eyre::eyre!("API key not found in environment variable {}", self.api_key_env))
    }
}

/// Model settings for one pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageSettings {
    /// Model override; the provider default is used when unset
    pub model: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens for this stage's response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.7,
            max_tokens: 2048,
        }
    }
}

impl StageSettings {
    fn with(temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: None,
            temperature,
            max_tokens,
        }
    }
}

/// Per-stage settings, one entry per model call site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StagesConfig {
    pub coach: StageSettings,

    #[serde(rename = "extract-okr")]
    pub extract_okr: StageSettings,

    #[serde(rename = "classify-persona")]
    pub classify_persona: StageSettings,

    #[serde(rename = "generate-vision")]
    pub generate_vision: StageSettings,

    #[serde(rename = "vision-tasks")]
    pub vision_tasks: StageSettings,

    #[serde(rename = "weekly-plan")]
    pub weekly_plan: StageSettings,
}

impl Default for StagesConfig {
    fn default() -> Self {
        Self {
            coach: StageSettings::with(0.7, 1024),
            extract_okr: StageSettings::with(0.2, 1024),
            classify_persona: StageSettings::with(0.2, 1024),
            generate_vision: StageSettings::with(0.8, 4096),
            vision_tasks: StageSettings::with(0.5, 1024),
            weekly_plan: StageSettings::with(0.6, 4096),
        }
    }
}

/// Calendar service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Calendar API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Calendar to read
    #[serde(rename = "calendar-id")]
    pub calendar_id: String,

    /// How far back to look for events
    #[serde(rename = "lookback-days")]
    pub lookback_days: i64,

    /// Maximum events per fetch
    #[serde(rename = "max-results")]
    pub max_results: u32,

    /// Environment variable holding an OAuth access token for the terminal wizard
    #[serde(rename = "access-token-env")]
    pub access_token_env: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/calendar/v3".to_string(),
            calendar_id: "primary".to_string(),
            lookback_days: 14,
            max_results: 100,
            access_token_env: "GOOGLE_ACCESS_TOKEN".to_string(),
        }
    }
}

/// Feedback storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    /// Directory for the feedback document store
    #[serde(rename = "store-dir")]
    pub store_dir: PathBuf,

    /// Collection feedback records are written to
    pub collection: String,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            store_dir: feedbackstore::config::default_store_path(),
            collection: feedbackstore::DEFAULT_COLLECTION.to_string(),
        }
    }
}

/// HTTP surface configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Wizard timing and persistence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WizardConfig {
    /// How long the Analyzing stage is shown after both calls resolve
    #[serde(rename = "analyzing-delay-ms")]
    pub analyzing_delay_ms: u64,

    /// How long an error toast stays visible
    #[serde(rename = "toast-ttl-ms")]
    pub toast_ttl_ms: u64,

    /// Where the terminal wizard saves its state between commands
    #[serde(rename = "state-file")]
    pub state_file: Option<PathBuf>,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            analyzing_delay_ms: 2000,
            toast_ttl_ms: 5000,
            state_file: None,
        }
    }
}

/// Identity used to stamp feedback from the terminal wizard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}
