//! # scirius
//!
//! Rule management console forms for Suricata IDS rulesets.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient
//! access. Depend on `scirius` to get everything, or on individual crates
//! for finer-grained control.

/// Errors, settings, logging setup, and `MultiValueDict`.
pub use scirius_core as core;

/// Records, field metadata, and the in-memory and SQLite record stores.
pub use scirius_db as db;

/// Forms, model-derived forms, submitted data, and widget tags.
pub use scirius_forms as forms;

/// The console forms for settings, sources and rulesets.
pub use scirius_rules as rules;

/// Management commands (`scirius-admin`).
#[cfg(feature = "cli")]
pub use scirius_cli as cli;

// Third-party crates the public API exposes.
pub use async_trait;
pub use chrono;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
pub use tracing_subscriber;
