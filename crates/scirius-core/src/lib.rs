//! # scirius-core
//!
//! Core types shared by every scirius-rs crate. This crate has no
//! dependency on the data layer or the forms framework.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Console settings
//! - [`settings_loader`] - Loading settings from TOML/JSON and the environment
//! - [`logging`] - Tracing-based logging setup
//! - [`utils`] - Utility types (`MultiValueDict`)

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;

pub use error::{SciriusError, SciriusResult, ValidationError};
pub use settings::{DatabaseSettings, Settings, StoreEngine};
