//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait is the core abstraction for all forms. Validation is
//! async so that the form-level [`clean`](Form::clean) hook can consult the
//! record store.
//!
//! [`BaseForm`] is a concrete form built from a list of field definitions.
//! Console forms wrap a `BaseForm`, delegate the trait methods to it, and
//! override `clean` when they need cross-field rules.

use std::collections::HashMap;

use async_trait::async_trait;

use scirius_core::{SciriusResult, ValidationError};
use scirius_db::Value;

use crate::data::FormData;
use crate::fields::FormFieldDef;
use crate::upload::UploadedFile;
use crate::validation;

/// Key under which form-level (non-field) errors are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// The core form trait.
#[async_trait]
pub trait Form: Send + Sync {
    /// Returns the form's field definitions.
    fn fields(&self) -> &[FormFieldDef];

    /// Returns the initial values shown on an unbound form.
    fn initial(&self) -> &HashMap<String, Value>;

    /// Returns the form prefix, if any.
    fn prefix(&self) -> Option<&str>;

    /// Binds submitted data to this form, discarding earlier results.
    fn bind(&mut self, data: &FormData);

    /// Returns `true` if this form has been bound to data.
    fn is_bound(&self) -> bool;

    /// Validates the form. Returns `true` if valid.
    ///
    /// Populates `errors()` and `cleaned_data()`.
    async fn is_valid(&mut self) -> bool;

    /// Returns per-field validation errors.
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the cleaned (validated and coerced) data.
    fn cleaned_data(&self) -> &HashMap<String, Value>;

    /// Cross-field validation hook. The default accepts everything.
    async fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        Ok(())
    }
}

/// A general-purpose form built from field definitions.
#[derive(Debug, Clone, Default)]
pub struct BaseForm {
    field_defs: Vec<FormFieldDef>,
    initial_data: HashMap<String, Value>,
    prefix: Option<String>,
    data: Option<FormData>,
    validated: bool,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: HashMap<String, Value>,
    cleaned_files: HashMap<String, UploadedFile>,
}

impl BaseForm {
    /// Creates a new `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            field_defs: fields,
            ..Self::default()
        }
    }

    /// Sets initial values for fields.
    #[must_use]
    pub fn with_initial(mut self, initial: HashMap<String, Value>) -> Self {
        self.initial_data = initial;
        self
    }

    /// Sets the form prefix; submitted keys are then `<prefix>-<field>`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Adds a field, replacing an existing field of the same name in place.
    pub fn add_field(&mut self, field: FormFieldDef) {
        if let Some(existing) = self.field_defs.iter_mut().find(|f| f.name == field.name) {
            *existing = field;
        } else {
            self.field_defs.push(field);
        }
    }

    /// Returns the field with the given name.
    pub fn field(&self, name: &str) -> Option<&FormFieldDef> {
        self.field_defs.iter().find(|f| f.name == name)
    }

    /// Returns the initial value for a field: the form-level initial first,
    /// then the field's own.
    pub fn initial_for(&self, name: &str) -> Option<&Value> {
        self.initial_data
            .get(name)
            .or_else(|| self.field(name).and_then(|f| f.initial.as_ref()))
    }

    /// Returns the bound data, if any.
    pub const fn data(&self) -> Option<&FormData> {
        self.data.as_ref()
    }

    /// Runs field-level validation, replacing earlier errors and cleaned data.
    ///
    /// Wrapping forms call this, then merge their own `clean` results with
    /// [`add_errors`](Self::add_errors).
    pub fn clean_fields(&mut self) {
        self.errors.clear();
        self.cleaned_data.clear();
        self.cleaned_files.clear();
        let Some(data) = &self.data else {
            self.validated = false;
            return;
        };
        validation::clean_fields(
            &self.field_defs,
            data,
            self.prefix.as_deref(),
            &mut self.cleaned_data,
            &mut self.cleaned_files,
            &mut self.errors,
        );
        self.validated = true;
    }

    /// Merges form-level errors into the error map.
    pub fn add_errors(&mut self, errors: HashMap<String, Vec<String>>) {
        for (key, msgs) in errors {
            self.errors.entry(key).or_default().extend(msgs);
        }
    }

    /// Records one error against `field` (or [`NON_FIELD_ERRORS`]).
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns the non-field (form-level) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors
            .get(NON_FIELD_ERRORS)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the cleaned upload for a `File` field, if one was submitted.
    pub fn cleaned_file(&self, name: &str) -> Option<&UploadedFile> {
        self.cleaned_files.get(name)
    }

    /// Returns the cleaned data of a bound, validated, error-free form.
    ///
    /// Persistence operations go through this so they never act on
    /// unvalidated input.
    pub fn valid_data(&self) -> SciriusResult<&HashMap<String, Value>> {
        if self.data.is_none() {
            return Err(ValidationError::new("The form is not bound to any data.", "unbound").into());
        }
        if !self.validated {
            return Err(ValidationError::new("The form has not been validated.", "unvalidated").into());
        }
        if !self.errors.is_empty() {
            return Err(ValidationError::from_form_errors(&self.errors).into());
        }
        Ok(&self.cleaned_data)
    }
}

#[async_trait]
impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.field_defs
    }

    fn initial(&self) -> &HashMap<String, Value> {
        &self.initial_data
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn bind(&mut self, data: &FormData) {
        self.data = Some(data.clone());
        self.validated = false;
        self.errors.clear();
        self.cleaned_data.clear();
        self.cleaned_files.clear();
    }

    fn is_bound(&self) -> bool {
        self.data.is_some()
    }

    async fn is_valid(&mut self) -> bool {
        if self.data.is_none() {
            return false;
        }
        self.clean_fields();
        if let Err(form_errors) = self.clean().await {
            self.add_errors(form_errors);
        }
        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        &self.cleaned_data
    }
}
