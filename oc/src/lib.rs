//! OKR Coach - LLM-guided OKR, life vision and weekly planning
//!
//! A coaching conversation is distilled into an Objective with three Key
//! Results. Fifteen life-vision answers plus the OKR are classified into one
//! of six personas, which seeds a multi-horizon future vision, three action
//! tasks and a calendar-aware weekly plan. Feedback lands in a local
//! document store.
//!
//! Every model reply is parsed leniently: JSON is found inside prose or code
//! fences when possible, and a documented default is substituted when not.
//! Only transport failures (network, auth, rate limiting) surface as errors.
//!
//! # Modules
//!
//! - [`llm`] - LLM client trait with Gemini and Anthropic implementations
//! - [`extract`] - Lenient JSON recovery from model replies
//! - [`domain`] - OKR, vision, persona and plan types
//! - [`pipeline`] - The six model-backed stages
//! - [`api`] - Request/response operations shared by HTTP and CLI
//! - [`wizard`] - Six-step stage machine for interactive use
//! - [`server`] - axum HTTP surface
//! - [`config`] - Configuration types and loading

pub mod api;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod console;
pub mod domain;
pub mod error;
pub mod extract;
pub mod feedback;
pub mod llm;
pub mod pipeline;
pub mod prompts;
pub mod server;
pub mod session;
pub mod wizard;

// Re-export commonly used types
pub use api::Api;
pub use config::Config;
pub use error::PipelineError;
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use pipeline::Pipeline;
pub use prompts::PromptLoader;
pub use session::{Identity, Session};
pub use wizard::{Stage, WizardController, WizardError, WizardState};
