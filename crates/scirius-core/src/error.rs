//! Core error types for scirius-rs.
//!
//! [`SciriusError`] covers data layer failures, validation failures,
//! configuration problems, and I/O. [`ValidationError`] carries either a
//! single message or a set of per-field messages, which is how rejected form
//! submissions travel out of the persistence operations.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

/// A validation error with optional field-level errors.
///
/// # Examples
///
/// ```
/// use scirius_core::error::ValidationError;
///
/// let err = ValidationError::new("This field is required.", "required");
/// assert_eq!(err.to_string(), "This field is required.");
///
/// let mut field_errors = std::collections::HashMap::new();
/// field_errors.insert(
///     "name".to_string(),
///     vec![ValidationError::new("This field is required.", "required")],
/// );
/// let err = ValidationError::with_field_errors(field_errors);
/// assert!(err.to_string().contains("name: This field is required."));
/// ```
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the failure (e.g. "required", "max_length").
    pub code: String,
    /// Per-field validation errors, keyed by field name.
    pub field_errors: HashMap<String, Vec<Self>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            field_errors: HashMap::new(),
        }
    }

    /// Creates a `ValidationError` containing per-field errors.
    pub fn with_field_errors(field_errors: HashMap<String, Vec<Self>>) -> Self {
        Self {
            message: String::new(),
            code: String::new(),
            field_errors,
        }
    }

    /// Builds a `ValidationError` from the plain message map a form collects.
    pub fn from_form_errors(errors: &HashMap<String, Vec<String>>) -> Self {
        let field_errors = errors
            .iter()
            .map(|(field, messages)| {
                let errs = messages
                    .iter()
                    .map(|m| Self::new(m.clone(), "invalid"))
                    .collect();
                (field.clone(), errs)
            })
            .collect();
        Self::with_field_errors(field_errors)
    }

    /// Returns the messages recorded for `field`, if any.
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.field_errors
            .get(field)
            .map(|errs| errs.iter().map(|e| e.message.as_str()).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            return write!(f, "{}", self.message);
        }
        let mut fields: Vec<&String> = self.field_errors.keys().collect();
        fields.sort();
        let mut first = true;
        for field in fields {
            for error in &self.field_errors[field] {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {error}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for scirius-rs.
#[derive(Error, Debug)]
pub enum SciriusError {
    // ── Data layer ───────────────────────────────────────────────────

    /// A lookup expected exactly one record but found none.
    #[error("Object does not exist: {0}")]
    DoesNotExist(String),

    /// A lookup expected exactly one record but found several.
    #[error("Multiple objects returned when one expected: {0}")]
    MultipleObjectsReturned(String),

    /// A generic database error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A database integrity constraint was violated (e.g. duplicate name).
    #[error("Integrity error: {0}")]
    IntegrityError(String),

    /// An operational database error (cannot open, pragma failure, ...).
    #[error("Operational error: {0}")]
    OperationalError(String),

    // ── Validation ───────────────────────────────────────────────────

    /// One or more fields failed validation.
    #[error("Validation error: {0}")]
    ValidationError(ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<ValidationError> for SciriusError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

/// A convenience type alias for `Result<T, SciriusError>`.
pub type SciriusResult<T> = Result<T, SciriusError>;
