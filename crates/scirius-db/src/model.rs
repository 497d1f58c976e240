//! Model trait and metadata.
//!
//! Every record type implements [`Model`], which exposes its static
//! [`ModelMeta`] and its current field values. Model forms use the metadata
//! to generate fields and the values to pre-fill an edit form.

use crate::fields::FieldDef;
use crate::value::Value;

/// Metadata about a record type.
#[derive(Debug)]
pub struct ModelMeta {
    /// The application label (always "rules" here).
    pub app_label: &'static str,
    /// The model name in lowercase (e.g. "source").
    pub model_name: &'static str,
    /// The database table name.
    pub db_table: &'static str,
    /// Human-readable singular name.
    pub verbose_name: &'static str,
    /// Human-readable plural name.
    pub verbose_name_plural: &'static str,
    /// Field definitions, in declaration order.
    pub fields: Vec<FieldDef>,
}

impl ModelMeta {
    /// Returns the field with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The core trait for all record types.
pub trait Model: Send + Sync + 'static {
    /// Returns the static metadata for this record type.
    fn meta() -> &'static ModelMeta;

    /// Returns the primary key, or `None` for a record that was never stored.
    fn pk(&self) -> Option<i64>;

    /// Returns all field name-value pairs for this instance.
    fn field_values(&self) -> Vec<(&'static str, Value)>;

    /// Returns the value of a single field.
    fn field_value(&self, name: &str) -> Option<Value> {
        self.field_values()
            .into_iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }
}
