//! Form field definitions and type-level validation.
//!
//! Each [`FormFieldDef`] describes a single form field: its type, label,
//! widget tag and error-message overrides. [`clean_field_value`] turns the
//! raw submitted strings of a field into a typed [`Value`], and
//! [`clean_file`] does the same for uploaded files.

use std::collections::HashMap;

use scirius_db::Value;

use crate::upload::UploadedFile;
use crate::widgets::WidgetType;

/// The type of a form field, with its type-specific parameters.
#[derive(Debug, Clone)]
pub enum FormFieldType {
    /// A character (string) field.
    Char {
        /// Minimum length in characters.
        min_length: Option<usize>,
        /// Maximum length in characters.
        max_length: Option<usize>,
        /// Whether to strip leading/trailing whitespace.
        strip: bool,
    },
    /// An integer field.
    Integer {
        /// Minimum allowed value.
        min_value: Option<i64>,
        /// Maximum allowed value.
        max_value: Option<i64>,
    },
    /// A checkbox. An absent value means unchecked.
    Boolean,
    /// A single choice among fixed string values.
    Choice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
    /// Any number of choices among fixed string values.
    MultipleChoice {
        /// Available choices as `(value, display_label)` pairs.
        choices: Vec<(String, String)>,
    },
    /// A single record, submitted by primary key.
    ModelChoice {
        /// Available records as `(pk, display_label)` pairs.
        choices: Vec<(i64, String)>,
        /// Label of the "nothing selected" entry; `None` offers no such entry.
        empty_label: Option<String>,
    },
    /// Any number of records, submitted by primary key.
    ModelMultipleChoice {
        /// Available records as `(pk, display_label)` pairs.
        choices: Vec<(i64, String)>,
    },
    /// An uploaded file.
    File {
        /// Maximum file size in bytes.
        max_size: Option<usize>,
        /// Allowed file extensions (e.g. `["rules", "tar.gz"]`); empty allows any.
        allowed_extensions: Vec<String>,
    },
}

impl FormFieldType {
    /// A stripped character field limited to `max_length` characters.
    pub const fn char(max_length: usize) -> Self {
        Self::Char {
            min_length: None,
            max_length: Some(max_length),
            strip: true,
        }
    }

    /// Returns `true` for types whose cleaned value is a list.
    pub const fn is_multiple(&self) -> bool {
        matches!(
            self,
            Self::MultipleChoice { .. } | Self::ModelMultipleChoice { .. }
        )
    }
}

/// Complete definition of a form field.
#[derive(Debug, Clone)]
pub struct FormFieldDef {
    /// The field name (submitted key).
    pub name: String,
    /// The field type, controlling parsing and coercion.
    pub field_type: FormFieldType,
    /// Whether this field is required.
    pub required: bool,
    /// Initial value shown on an unbound form.
    pub initial: Option<Value>,
    /// Help text displayed alongside the field.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// Presentation hint.
    pub widget: WidgetType,
    /// Custom error messages keyed by error code.
    pub error_messages: HashMap<String, String>,
    /// Whether the field is disabled (shown but not editable).
    pub disabled: bool,
}

impl FormFieldDef {
    /// Creates a required field with the default widget for its type.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let widget = default_widget_for_field_type(&field_type);
        let label = name.replace('_', " ");
        Self {
            name,
            field_type,
            required: true,
            initial: None,
            help_text: String::new(),
            label,
            widget,
            error_messages: HashMap::new(),
            disabled: false,
        }
    }

    /// Sets whether this field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn initial(mut self, value: impl Into<Value>) -> Self {
        self.initial = Some(value.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the widget tag.
    #[must_use]
    pub fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Sets a custom error message for a given code (e.g. `"required"`).
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    /// Sets whether this field is disabled.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    fn message(&self, code: &str, default: impl FnOnce() -> String) -> String {
        self.error_messages
            .get(code)
            .cloned()
            .unwrap_or_else(default)
    }

    fn required_error(&self) -> Vec<String> {
        vec![self.message("required", || "This field is required.".to_string())]
    }
}

/// Returns the default widget tag for a given form field type.
pub const fn default_widget_for_field_type(field_type: &FormFieldType) -> WidgetType {
    match field_type {
        FormFieldType::Char { .. } => WidgetType::TextInput,
        FormFieldType::Integer { .. } => WidgetType::NumberInput,
        FormFieldType::Boolean => WidgetType::CheckboxInput,
        FormFieldType::Choice { .. } | FormFieldType::ModelChoice { .. } => WidgetType::Select,
        FormFieldType::MultipleChoice { .. } | FormFieldType::ModelMultipleChoice { .. } => {
            WidgetType::SelectMultiple
        }
        FormFieldType::File { .. } => WidgetType::FileInput,
    }
}

/// Cleans the raw submitted values of one field into a typed `Value`.
///
/// Single-valued types look at the last submitted value. Multi-valued
/// types look at every non-empty value and return a `Value::List` without
/// duplicates. An empty optional field cleans to `Value::Null`, except
/// `Boolean` (unchecked, `false`) and the multi-valued types (empty list).
pub fn clean_field_value(field: &FormFieldDef, raw: &[String]) -> Result<Value, Vec<String>> {
    match &field.field_type {
        FormFieldType::MultipleChoice { choices } => clean_multiple_choice(field, raw, choices),
        FormFieldType::ModelMultipleChoice { choices } => {
            clean_model_multiple_choice(field, raw, choices)
        }
        FormFieldType::Boolean => clean_boolean(field, raw.last().map(String::as_str)),
        FormFieldType::File { .. } => clean_file(field, &[]).map(|_| Value::Null),
        _ => clean_single(field, raw.last().map_or("", String::as_str)),
    }
}

fn clean_single(field: &FormFieldDef, raw: &str) -> Result<Value, Vec<String>> {
    let raw = match &field.field_type {
        FormFieldType::Char { strip: false, .. } => raw,
        _ => raw.trim(),
    };

    if raw.is_empty() {
        return if field.required {
            Err(field.required_error())
        } else {
            Ok(Value::Null)
        };
    }

    let mut errors = Vec::new();

    let value = match &field.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            ..
        } => {
            let count = raw.chars().count();
            if let Some(min) = min_length {
                if count < *min {
                    errors.push(format!(
                        "Ensure this value has at least {min} characters (it has {count})."
                    ));
                }
            }
            check_max_length(*max_length, count, &mut errors);
            Value::String(raw.to_string())
        }

        FormFieldType::Integer {
            min_value,
            max_value,
        } => match raw.parse::<i64>() {
            Ok(n) => {
                if let Some(min) = min_value {
                    if n < *min {
                        errors.push(format!(
                            "Ensure this value is greater than or equal to {min}."
                        ));
                    }
                }
                if let Some(max) = max_value {
                    if n > *max {
                        errors.push(format!("Ensure this value is less than or equal to {max}."));
                    }
                }
                Value::Int(n)
            }
            Err(_) => {
                errors.push(field.message("invalid", || "Enter a whole number.".to_string()));
                Value::Null
            }
        },

        FormFieldType::Choice { choices } => {
            if !choices.iter().any(|(v, _)| v == raw) {
                errors.push(field.message("invalid_choice", || {
                    format!("Select a valid choice. {raw} is not one of the available choices.")
                }));
            }
            Value::String(raw.to_string())
        }

        FormFieldType::ModelChoice { choices, .. } => {
            match raw.parse::<i64>() {
                Ok(pk) if choices.iter().any(|(id, _)| *id == pk) => Value::Int(pk),
                _ => {
                    errors.push(field.message("invalid_choice", || {
                        "Select a valid choice. That choice is not one of the available choices."
                            .to_string()
                    }));
                    Value::Null
                }
            }
        }

        FormFieldType::Boolean
        | FormFieldType::MultipleChoice { .. }
        | FormFieldType::ModelMultipleChoice { .. }
        | FormFieldType::File { .. } => Value::Null,
    };

    if errors.is_empty() {
        Ok(value)
    } else {
        Err(errors)
    }
}

fn check_max_length(max_length: Option<usize>, count: usize, errors: &mut Vec<String>) {
    if let Some(max) = max_length {
        if count > max {
            errors.push(format!(
                "Ensure this value has at most {max} characters (it has {count})."
            ));
        }
    }
}

fn clean_boolean(field: &FormFieldDef, raw: Option<&str>) -> Result<Value, Vec<String>> {
    let checked = raw.is_some_and(|s| {
        !matches!(
            s.trim().to_lowercase().as_str(),
            "" | "false" | "0" | "off" | "no"
        )
    });
    if field.required && !checked {
        return Err(field.required_error());
    }
    Ok(Value::Bool(checked))
}

fn submitted(raw: &[String]) -> impl Iterator<Item = &str> {
    raw.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn clean_multiple_choice(
    field: &FormFieldDef,
    raw: &[String],
    choices: &[(String, String)],
) -> Result<Value, Vec<String>> {
    let mut selected: Vec<&str> = Vec::new();
    let mut errors = Vec::new();
    for value in submitted(raw) {
        if !choices.iter().any(|(v, _)| v == value) {
            errors.push(field.message("invalid_choice", || {
                format!("Select a valid choice. {value} is not one of the available choices.")
            }));
        } else if !selected.contains(&value) {
            selected.push(value);
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    if selected.is_empty() && field.required {
        return Err(field.required_error());
    }
    Ok(Value::List(
        selected.into_iter().map(Value::from).collect(),
    ))
}

fn clean_model_multiple_choice(
    field: &FormFieldDef,
    raw: &[String],
    choices: &[(i64, String)],
) -> Result<Value, Vec<String>> {
    let mut selected: Vec<i64> = Vec::new();
    let mut errors = Vec::new();
    for value in submitted(raw) {
        match value.parse::<i64>() {
            Ok(pk) if choices.iter().any(|(id, _)| *id == pk) => {
                if !selected.contains(&pk) {
                    selected.push(pk);
                }
            }
            Ok(pk) => errors.push(field.message("invalid_choice", || {
                format!("Select a valid choice. {pk} is not one of the available choices.")
            })),
            Err(_) => errors.push(field.message("invalid_pk_value", || {
                format!("\"{value}\" is not a valid value.")
            })),
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    if selected.is_empty() && field.required {
        return Err(field.required_error());
    }
    Ok(Value::List(selected.into_iter().map(Value::Int).collect()))
}

/// Cleans the files submitted for a `File` field.
///
/// Returns the last submitted file, or `None` for an optional field left
/// empty. Fields of any other type are treated as having no file.
pub fn clean_file(
    field: &FormFieldDef,
    files: &[UploadedFile],
) -> Result<Option<UploadedFile>, Vec<String>> {
    let Some(file) = files.last() else {
        return if field.required {
            Err(field.required_error())
        } else {
            Ok(None)
        };
    };

    let FormFieldType::File {
        max_size,
        allowed_extensions,
    } = &field.field_type
    else {
        return Ok(None);
    };

    let mut errors = Vec::new();
    if file.name.is_empty() {
        errors.push("No file was submitted. Check the encoding type on the form.".to_string());
    }
    if file.size == 0 {
        errors.push(field.message("empty", || "The submitted file is empty.".to_string()));
    }
    if let Some(max) = max_size {
        if file.size > *max {
            errors.push(format!("File size exceeds maximum of {max} bytes."));
        }
    }
    if !allowed_extensions.is_empty() {
        let ext = file.extension().unwrap_or_default();
        if !allowed_extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            errors.push(format!(
                "File extension \"{ext}\" is not allowed. Allowed extensions are: {}.",
                allowed_extensions.join(", ")
            ));
        }
    }

    if errors.is_empty() {
        Ok(Some(file.clone()))
    } else {
        Err(errors)
    }
}
