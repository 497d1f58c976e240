use std::collections::HashMap;

use chrono::Utc;

use scirius_core::{SciriusError, SciriusResult, ValidationError};
use scirius_db::{NewRuleset, RuleStore, Ruleset, Value};
use scirius_forms::{BaseForm, FormFieldDef, FormFieldType, WidgetType};

use super::{delegate_form, flag, ids, string, value};

/// Label of the `activate_categories` flag on [`RulesetForm`].
pub const ACTIVATE_CATEGORIES_LABEL: &str = "Activate all categories in sources";

fn name_field() -> FormFieldDef {
    FormFieldDef::new("name", FormFieldType::char(100))
}

/// `(id, "source@version")` for every source snapshot.
async fn source_version_choices(store: &dyn RuleStore) -> SciriusResult<Vec<(i64, String)>> {
    let sources: HashMap<i64, String> = store
        .sources()
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();
    Ok(store
        .source_versions()
        .await?
        .into_iter()
        .map(|v| {
            let label = match sources.get(&v.source) {
                Some(name) => format!("{name}@{}", v.version),
                None => format!("{}@{}", v.source, v.version),
            };
            (v.id, label)
        })
        .collect())
}

// ── RulesetForm ────────────────────────────────────────────────────────

/// Creates a ruleset from a selection of source snapshots.
pub struct RulesetForm {
    base: BaseForm,
}

delegate_form!(RulesetForm);

impl RulesetForm {
    /// Builds the form, offering every source snapshot currently stored.
    pub async fn new(store: &dyn RuleStore) -> SciriusResult<Self> {
        let base = BaseForm::new(vec![
            name_field(),
            FormFieldDef::new("activate_categories", FormFieldType::Boolean)
                .required(false)
                .initial(true)
                .label(ACTIVATE_CATEGORIES_LABEL),
            FormFieldDef::new(
                "sources",
                FormFieldType::ModelMultipleChoice {
                    choices: source_version_choices(store).await?,
                },
            )
            .widget(WidgetType::CheckboxSelectMultiple),
        ]);
        Ok(Self { base })
    }

    /// Creates the ruleset and attaches the selected snapshots.
    ///
    /// With `activate_categories` set, every category of each snapshot's
    /// source is attached too. Writes happen in order; a failure part way
    /// leaves the earlier writes in place.
    pub async fn create_ruleset(&self, store: &dyn RuleStore) -> SciriusResult<Ruleset> {
        let data = self.base.valid_data()?;
        let activate = flag(data, "activate_categories");
        let ruleset = store
            .create_ruleset(NewRuleset::named(string(data, "name"), Utc::now()))
            .await?;

        let mut categories = 0;
        for version_id in ids(data, "sources") {
            store.add_ruleset_source(ruleset.id, version_id).await?;
            if activate {
                let version = store.source_version(version_id).await?;
                for category in store.categories_for_source(version.source).await? {
                    store.add_ruleset_category(ruleset.id, category.id).await?;
                    categories += 1;
                }
            }
        }

        tracing::info!(
            ruleset_id = ruleset.id,
            name = %ruleset.name,
            activate_categories = activate,
            categories,
            "Ruleset created"
        );
        Ok(ruleset)
    }
}

// ── RulesetEditForm ────────────────────────────────────────────────────

/// Renames a ruleset and chooses its categories.
pub struct RulesetEditForm {
    base: BaseForm,
}

delegate_form!(RulesetEditForm);

impl RulesetEditForm {
    fn field_defs(choices: Vec<(String, String)>) -> Vec<FormFieldDef> {
        vec![
            name_field(),
            FormFieldDef::new("categories", FormFieldType::MultipleChoice { choices }),
        ]
    }

    async fn category_choices(store: &dyn RuleStore) -> SciriusResult<Vec<(String, String)>> {
        Ok(store
            .categories()
            .await?
            .into_iter()
            .map(|c| (c.id.to_string(), c.name))
            .collect())
    }

    /// Builds the form, offering every category currently stored.
    pub async fn new(store: &dyn RuleStore) -> SciriusResult<Self> {
        let base = BaseForm::new(Self::field_defs(Self::category_choices(store).await?));
        Ok(Self { base })
    }

    /// Builds the form pre-filled with the name and categories of `ruleset`.
    pub async fn for_ruleset(store: &dyn RuleStore, ruleset: &Ruleset) -> SciriusResult<Self> {
        let selected = store
            .ruleset_categories(ruleset.id)
            .await?
            .into_iter()
            .map(|id| Value::String(id.to_string()))
            .collect();
        let initial = HashMap::from([
            ("name".to_string(), Value::from(ruleset.name.as_str())),
            ("categories".to_string(), Value::List(selected)),
        ]);
        let base = BaseForm::new(Self::field_defs(Self::category_choices(store).await?))
            .with_initial(initial);
        Ok(Self { base })
    }

    /// Renames ruleset `ruleset_id` and replaces its categories with the
    /// selection.
    pub async fn apply(&self, store: &dyn RuleStore, ruleset_id: i64) -> SciriusResult<Ruleset> {
        let data = self.base.valid_data()?;
        let categories = selected_ids(value(data, "categories"))?;

        let mut ruleset = store.ruleset(ruleset_id).await?;
        ruleset.name = string(data, "name");
        ruleset.updated_date = Utc::now();
        store.update_ruleset(&ruleset).await?;
        store.set_ruleset_categories(ruleset.id, &categories).await?;

        tracing::info!(
            ruleset_id = ruleset.id,
            name = %ruleset.name,
            categories = categories.len(),
            "Ruleset edited"
        );
        Ok(ruleset)
    }
}

/// Parses a cleaned multiple-choice selection of id strings.
fn selected_ids(selection: &Value) -> SciriusResult<Vec<i64>> {
    selection
        .as_list()
        .unwrap_or_default()
        .iter()
        .map(|item| {
            item.as_str()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| {
                    SciriusError::from(ValidationError::new(
                        format!("'{}' is not a category id.", item.to_form_string()),
                        "invalid_choice",
                    ))
                })
        })
        .collect()
}

// ── RulesetCopyForm ────────────────────────────────────────────────────

/// Copies a ruleset under a new name.
pub struct RulesetCopyForm {
    base: BaseForm,
}

delegate_form!(RulesetCopyForm);

impl RulesetCopyForm {
    pub fn new() -> Self {
        Self {
            base: BaseForm::new(vec![name_field()]),
        }
    }

    /// Creates a ruleset with the submitted name carrying the description,
    /// source snapshots and categories of ruleset `ruleset_id`.
    pub async fn copy(&self, store: &dyn RuleStore, ruleset_id: i64) -> SciriusResult<Ruleset> {
        let data = self.base.valid_data()?;
        let original = store.ruleset(ruleset_id).await?;
        let copy = store
            .create_ruleset(NewRuleset {
                descr: original.descr.clone(),
                ..NewRuleset::named(string(data, "name"), Utc::now())
            })
            .await?;

        for version_id in store.ruleset_sources(original.id).await? {
            store.add_ruleset_source(copy.id, version_id).await?;
        }
        let categories = store.ruleset_categories(original.id).await?;
        store.set_ruleset_categories(copy.id, &categories).await?;

        tracing::info!(
            from = original.id,
            ruleset_id = copy.id,
            name = %copy.name,
            "Ruleset copied"
        );
        Ok(copy)
    }
}

impl Default for RulesetCopyForm {
    fn default() -> Self {
        Self::new()
    }
}

// ── RulesetSuppressForm ────────────────────────────────────────────────

/// Picks a ruleset to delete.
pub struct RulesetSuppressForm {
    base: BaseForm,
}

delegate_form!(RulesetSuppressForm);

impl RulesetSuppressForm {
    /// Builds the form, offering every ruleset currently stored with no
    /// empty choice.
    pub async fn new(store: &dyn RuleStore) -> SciriusResult<Self> {
        let choices = store
            .rulesets()
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();
        let base = BaseForm::new(vec![FormFieldDef::new(
            "ruleset",
            FormFieldType::ModelChoice {
                choices,
                empty_label: None,
            },
        )]);
        Ok(Self { base })
    }

    /// Deletes the selected ruleset and returns it.
    pub async fn suppress(&self, store: &dyn RuleStore) -> SciriusResult<Ruleset> {
        let data = self.base.valid_data()?;
        let id = value(data, "ruleset")
            .as_int()
            .ok_or_else(|| ValidationError::new("No ruleset selected.", "required"))?;
        let ruleset = store.ruleset(id).await?;
        store.delete_ruleset(id).await?;
        tracing::info!(ruleset_id = id, name = %ruleset.name, "Ruleset suppressed");
        Ok(ruleset)
    }
}
