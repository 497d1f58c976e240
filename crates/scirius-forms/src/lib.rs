//! # scirius-forms
//!
//! Forms framework for scirius-rs. Provides the [`Form`] trait and
//! [`BaseForm`], field types with validation, model-derived forms, submitted
//! data with uploads, and widget tags.
//!
//! ## Modules
//!
//! - [`fields`] - [`FormFieldDef`], [`FormFieldType`] and value cleaning
//! - [`form`] - the [`Form`] trait and [`BaseForm`]
//! - [`validation`] - the field-then-form validation pipeline
//! - [`model_form`] - generating fields from record metadata
//! - [`data`] - [`FormData`], the submitted fields and files
//! - [`upload`] - [`UploadedFile`]
//! - [`widgets`] - [`WidgetType`] presentation tags

pub mod data;
pub mod fields;
pub mod form;
pub mod model_form;
pub mod upload;
pub mod validation;
pub mod widgets;

pub use data::FormData;
pub use fields::{FormFieldDef, FormFieldType};
pub use form::{BaseForm, Form, NON_FIELD_ERRORS};
pub use model_form::{generate_form_fields, ModelFormConfig, ModelFormFields};
pub use upload::UploadedFile;
pub use widgets::WidgetType;
