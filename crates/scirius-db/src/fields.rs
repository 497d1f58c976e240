//! Field metadata for record types.
//!
//! A [`FieldDef`] describes one column of a record: its type, length limit,
//! nullability, default, choices, and whether users may edit it. Model
//! forms are generated from these definitions.

use crate::value::Value;

/// The storage type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Auto-incrementing integer primary key.
    AutoField,
    /// Bounded string.
    CharField,
    /// Unbounded string.
    TextField,
    /// Boolean.
    BooleanField,
    /// Integer.
    IntegerField,
    /// UTC timestamp.
    DateTimeField,
    /// Many-to-one reference to another record type.
    ForeignKey {
        /// The referenced model name (e.g. "source").
        to: &'static str,
    },
    /// Many-to-many association with another record type.
    ManyToManyField {
        /// The referenced model name (e.g. "category").
        to: &'static str,
    },
}

/// Complete definition of a record field.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// The attribute name of this field.
    pub name: &'static str,
    /// The type of this field.
    pub field_type: FieldType,
    /// Whether this field is the primary key.
    pub primary_key: bool,
    /// Whether NULL is allowed.
    pub null: bool,
    /// Whether the field may be left blank in forms.
    pub blank: bool,
    /// Default value for new records.
    pub default: Option<Value>,
    /// Maximum character length.
    pub max_length: Option<usize>,
    /// Human-readable name.
    pub verbose_name: String,
    /// Human-readable help text.
    pub help_text: String,
    /// Allowed values as `(value, display_label)` pairs; empty when unrestricted.
    pub choices: Vec<(String, String)>,
    /// Whether the field is editable in forms.
    pub editable: bool,
}

impl FieldDef {
    /// Creates a new `FieldDef`. The field is non-null, non-blank and editable.
    pub fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            primary_key: false,
            null: false,
            blank: false,
            default: None,
            max_length: None,
            verbose_name: name.replace('_', " "),
            help_text: String::new(),
            choices: Vec::new(),
            editable: true,
        }
    }

    /// Marks this field as the primary key (implies non-editable).
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.editable = false;
        self
    }

    /// Allows NULL and blank values.
    #[must_use]
    pub fn nullable(mut self) -> Self {
        self.null = true;
        self.blank = true;
        self
    }

    /// Allows blank values in forms.
    #[must_use]
    pub fn blank(mut self) -> Self {
        self.blank = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub const fn max_length(mut self, len: usize) -> Self {
        self.max_length = Some(len);
        self
    }

    /// Sets the verbose name.
    #[must_use]
    pub fn verbose_name(mut self, name: impl Into<String>) -> Self {
        self.verbose_name = name.into();
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Restricts the field to the given `(value, label)` choices.
    #[must_use]
    pub fn choices(mut self, choices: &[(&str, &str)]) -> Self {
        self.choices = choices
            .iter()
            .map(|(v, l)| ((*v).to_string(), (*l).to_string()))
            .collect();
        self
    }

    /// Sets whether the field is editable.
    #[must_use]
    pub const fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Returns `true` for foreign keys and many-to-many associations.
    pub const fn is_relation(&self) -> bool {
        matches!(
            self.field_type,
            FieldType::ForeignKey { .. } | FieldType::ManyToManyField { .. }
        )
    }
}
