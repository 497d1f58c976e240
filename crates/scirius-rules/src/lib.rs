//! # scirius-rules
//!
//! The console forms for managing IDS rulesets, rule sources and the
//! system settings, built on [`scirius_forms`] and persisted through a
//! [`RuleStore`](scirius_db::RuleStore).
//!
//! ## Modules
//!
//! - [`forms`] - the six console forms and their persistence operations

pub mod forms;

pub use forms::{
    AddSourceForm, AddedSource, RulesetCopyForm, RulesetEditForm, RulesetForm,
    RulesetSuppressForm, SourceForm, SystemSettingsForm,
};
