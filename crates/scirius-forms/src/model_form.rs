//! Model-backed forms that generate their fields from record metadata.
//!
//! [`ModelFormConfig`] says which fields of a record's
//! [`ModelMeta`](scirius_db::ModelMeta) become form fields and how they are
//! labelled. [`generate_form_fields`] turns each selected
//! [`FieldDef`](scirius_db::FieldDef) into a [`FormFieldDef`], then applies
//! the declared fields: a declared field replaces the generated field of the
//! same name in place, other declared fields are appended.

use std::collections::HashMap;

use scirius_db::{FieldDef, FieldType, Model, ModelMeta, Value};

use crate::fields::{FormFieldDef, FormFieldType};
use crate::form::BaseForm;
use crate::widgets::WidgetType;

/// Configuration for generating a model-backed form.
pub struct ModelFormConfig {
    /// The record metadata to generate fields from.
    pub model_meta: &'static ModelMeta,
    /// Which record fields to include in the form.
    pub fields: ModelFormFields,
    /// Widget overrides keyed by field name.
    pub widgets: HashMap<String, WidgetType>,
    /// Label overrides keyed by field name.
    pub labels: HashMap<String, String>,
    /// Help text overrides keyed by field name.
    pub help_texts: HashMap<String, String>,
    /// Explicitly declared fields, applied after generation.
    pub declared: Vec<FormFieldDef>,
}

/// Which record fields a model form includes.
#[derive(Debug, Clone)]
pub enum ModelFormFields {
    /// Include all editable fields.
    All,
    /// Include only the specified fields.
    Include(Vec<String>),
    /// Include all fields except the specified ones.
    Exclude(Vec<String>),
}

impl ModelFormFields {
    fn selects(&self, name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Include(include) => include.iter().any(|f| f == name),
            Self::Exclude(exclude) => !exclude.iter().any(|f| f == name),
        }
    }
}

impl ModelFormConfig {
    /// Creates a config including every editable field.
    pub fn new(model_meta: &'static ModelMeta) -> Self {
        Self {
            model_meta,
            fields: ModelFormFields::All,
            widgets: HashMap::new(),
            labels: HashMap::new(),
            help_texts: HashMap::new(),
            declared: Vec::new(),
        }
    }

    /// Sets which fields to include.
    #[must_use]
    pub fn with_fields(mut self, fields: ModelFormFields) -> Self {
        self.fields = fields;
        self
    }

    /// Excludes the named fields.
    #[must_use]
    pub fn exclude(self, names: &[&str]) -> Self {
        self.with_fields(ModelFormFields::Exclude(
            names.iter().map(ToString::to_string).collect(),
        ))
    }

    /// Adds a widget override for a specific field.
    #[must_use]
    pub fn with_widget(mut self, field_name: impl Into<String>, widget: WidgetType) -> Self {
        self.widgets.insert(field_name.into(), widget);
        self
    }

    /// Adds a label override for a specific field.
    #[must_use]
    pub fn with_label(mut self, field_name: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(field_name.into(), label.into());
        self
    }

    /// Adds a help text override for a specific field.
    #[must_use]
    pub fn with_help_text(
        mut self,
        field_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.help_texts.insert(field_name.into(), text.into());
        self
    }

    /// Declares an explicit field.
    #[must_use]
    pub fn declare(mut self, field: FormFieldDef) -> Self {
        self.declared.push(field);
        self
    }

    /// Builds an unbound form for a new record.
    pub fn build(&self) -> BaseForm {
        BaseForm::new(generate_form_fields(self))
    }

    /// Builds an unbound form pre-filled from an existing record.
    pub fn build_for<M: Model>(&self, instance: &M) -> BaseForm {
        let fields = generate_form_fields(self);
        let initial = instance_initial(instance, &fields);
        BaseForm::new(fields).with_initial(initial)
    }
}

/// Generates form field definitions from a model form configuration.
///
/// Primary keys, non-editable fields, relations and timestamps are never
/// generated; relation fields can still be declared. Timestamps are set by
/// whoever saves the form.
pub fn generate_form_fields(config: &ModelFormConfig) -> Vec<FormFieldDef> {
    let mut form_fields = Vec::new();

    for model_field in &config.model_meta.fields {
        if !model_field.editable || model_field.primary_key || model_field.is_relation() {
            continue;
        }
        if !config.fields.selects(model_field.name) {
            continue;
        }

        let Some(field_type) = model_field_to_form_field_type(model_field) else {
            continue;
        };
        let mut form_field = FormFieldDef::new(model_field.name, field_type);

        form_field.required =
            !model_field.null && !model_field.blank && model_field.default.is_none();

        if matches!(model_field.field_type, FieldType::TextField) {
            form_field.widget = WidgetType::Textarea;
        }
        if let Some(widget) = config.widgets.get(model_field.name) {
            form_field.widget = *widget;
        }
        form_field.label = config
            .labels
            .get(model_field.name)
            .cloned()
            .unwrap_or_else(|| model_field.verbose_name.clone());
        form_field.help_text = config
            .help_texts
            .get(model_field.name)
            .cloned()
            .unwrap_or_else(|| model_field.help_text.clone());

        if let Some(default) = &model_field.default {
            form_field.initial = Some(default.clone());
        }

        form_fields.push(form_field);
    }

    for declared in &config.declared {
        if let Some(existing) = form_fields.iter_mut().find(|f| f.name == declared.name) {
            *existing = declared.clone();
        } else {
            form_fields.push(declared.clone());
        }
    }

    form_fields
}

/// Collects the current values of `instance` for the given form fields.
///
/// Null values are left out so the field's own initial applies.
pub fn instance_initial<M: Model>(instance: &M, fields: &[FormFieldDef]) -> HashMap<String, Value> {
    instance
        .field_values()
        .into_iter()
        .filter(|(name, value)| !value.is_null() && fields.iter().any(|f| f.name == *name))
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn model_field_to_form_field_type(field_def: &FieldDef) -> Option<FormFieldType> {
    if !field_def.choices.is_empty() {
        return Some(FormFieldType::Choice {
            choices: field_def.choices.clone(),
        });
    }
    let field_type = match &field_def.field_type {
        FieldType::CharField | FieldType::TextField => FormFieldType::Char {
            min_length: None,
            max_length: field_def.max_length,
            strip: true,
        },
        FieldType::AutoField
        | FieldType::IntegerField
        | FieldType::ForeignKey { .. }
        | FieldType::ManyToManyField { .. } => FormFieldType::Integer {
            min_value: None,
            max_value: None,
        },
        FieldType::BooleanField => FormFieldType::Boolean,
        FieldType::DateTimeField => return None,
    };
    Some(field_type)
}
