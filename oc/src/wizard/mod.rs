//! Wizard controller
//!
//! Sequences the pipeline stages over six screens and holds everything the
//! user has produced so far. Presentation layers (the terminal driver) read
//! the state and call the controller's operations.

mod controller;
mod state;

pub use controller::{WizardController, WizardError};
pub use state::{CalendarStatus, Stage, Toast, WizardState};
