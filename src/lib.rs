#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use
)]

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod connect;
pub mod error;
pub mod wizard;

pub use config::Config;
pub use error::{Result, SyncError};
pub use wizard::{WizardController, WizardState, WizardStep};
