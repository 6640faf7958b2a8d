//! Caller identity and access token

use serde::{Deserialize, Serialize};

use crate::config::{Config, IdentityConfig};

/// Written in place of any identity field that is absent
pub const ANONYMOUS: &str = "anonymous";

/// Who is calling, as far as the identity provider told us
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl Identity {
    fn field(value: &Option<String>) -> String {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string()
    }

    pub fn id_or_anonymous(&self) -> String {
        Self::field(&self.id)
    }

    pub fn name_or_anonymous(&self) -> String {
        Self::field(&self.name)
    }

    pub fn email_or_anonymous(&self) -> String {
        Self::field(&self.email)
    }
}

impl From<&IdentityConfig> for Identity {
    fn from(config: &IdentityConfig) -> Self {
        Self {
            id: config.id.clone(),
            name: config.name.clone(),
            email: config.email.clone(),
        }
    }
}

/// Access token plus identity; no token means anonymous
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub access_token: Option<String>,
    pub identity: Identity,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session for the terminal driver: identity from config, token from the configured env var
    pub fn from_config(config: &Config) -> Self {
        Self {
            access_token: std::env::var(&config.calendar.access_token_env)
                .ok()
                .filter(|t| !t.trim().is_empty()),
            identity: Identity::from(&config.identity),
        }
    }
}
