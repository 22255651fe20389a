//! QuickCrate merchant onboarding: the registration wizard, its canonical
//! payload, and the backend gateway that submits it.
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod registration;
pub mod ui_state;
pub mod util;
pub mod wizard;

pub use error::{SubmissionError, UploadError, ValidationError};
pub use wizard::{ActiveStep, Notice, RegistrationWizard, WizardState};
