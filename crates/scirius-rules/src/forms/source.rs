use std::collections::HashMap;

use chrono::{DateTime, Utc};

use scirius_core::SciriusResult;
use scirius_db::{
    ContentType, FetchMethod, Model, NewSource, NewSourceAtVersion, RuleStore, Source,
    SourceAtVersion, Value,
};
use scirius_forms::upload::DEFAULT_MAX_UPLOAD_SIZE;
use scirius_forms::{
    BaseForm, FormFieldDef, FormFieldType, ModelFormConfig, UploadedFile, WidgetType,
};

use super::{choice, delegate_form, flag, ids, opt_string, string};

/// Label of the optional `authkey` field.
pub const AUTHKEY_LABEL: &str = "Optional authorization key";

/// Label of the `rulesets` field on [`AddSourceForm`].
pub const RULESETS_LABEL: &str = "Add source to the following ruleset(s)";

fn source_config() -> ModelFormConfig {
    ModelFormConfig::new(Source::meta())
        .exclude(&["created_date", "updated_date"])
        .declare(
            FormFieldDef::new(
                "file",
                FormFieldType::File {
                    max_size: Some(DEFAULT_MAX_UPLOAD_SIZE),
                    allowed_extensions: Vec::new(),
                },
            )
            .required(false),
        )
        .declare(
            FormFieldDef::new("authkey", FormFieldType::char(100))
                .required(false)
                .label(AUTHKEY_LABEL),
        )
}

fn new_source_from(data: &HashMap<String, Value>, now: DateTime<Utc>) -> SciriusResult<NewSource> {
    Ok(NewSource {
        name: string(data, "name"),
        created_date: now,
        updated_date: now,
        method: choice::<FetchMethod>(data, "method")?,
        datatype: choice::<ContentType>(data, "datatype")?,
        uri: opt_string(data, "uri"),
        cert_verif: flag(data, "cert_verif"),
        authkey: opt_string(data, "authkey"),
    })
}

// ── SourceForm ─────────────────────────────────────────────────────────

/// Creates a [`Source`] or edits an existing one.
pub struct SourceForm {
    base: BaseForm,
    instance: Option<Source>,
}

delegate_form!(SourceForm);

impl SourceForm {
    /// An unbound form for a new source.
    pub fn new() -> Self {
        Self {
            base: source_config().build(),
            instance: None,
        }
    }

    /// An unbound form editing `source`.
    pub fn for_instance(source: Source) -> Self {
        Self {
            base: source_config().build_for(&source),
            instance: Some(source),
        }
    }

    /// The source being edited, if any.
    pub const fn instance(&self) -> Option<&Source> {
        self.instance.as_ref()
    }

    /// The rules file submitted with the form, if any.
    pub fn uploaded_file(&self) -> Option<&UploadedFile> {
        self.base.cleaned_file("file")
    }

    /// Stores the submitted source.
    ///
    /// A new source gets both timestamps set to now. An edited source keeps
    /// its id and `created_date` and has `updated_date` refreshed.
    pub async fn save(&self, store: &dyn RuleStore) -> SciriusResult<Source> {
        let data = self.base.valid_data()?;
        let fields = new_source_from(data, Utc::now())?;
        match &self.instance {
            Some(existing) => {
                let source = Source {
                    id: existing.id,
                    created_date: existing.created_date,
                    ..fields.with_id(existing.id)
                };
                store.update_source(&source).await?;
                tracing::info!(source_id = source.id, name = %source.name, "Source updated");
                Ok(source)
            }
            None => {
                let source = store.create_source(fields).await?;
                tracing::info!(source_id = source.id, name = %source.name, "Source created");
                Ok(source)
            }
        }
    }
}

impl Default for SourceForm {
    fn default() -> Self {
        Self::new()
    }
}

// ── AddSourceForm ──────────────────────────────────────────────────────

/// What [`AddSourceForm::save`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedSource {
    /// The new source.
    pub source: Source,
    /// Its initial `HEAD` snapshot.
    pub version: SourceAtVersion,
    /// Rulesets the snapshot was attached to.
    pub rulesets: Vec<i64>,
}

/// Adds a source and optionally attaches it to existing rulesets.
pub struct AddSourceForm {
    base: BaseForm,
}

delegate_form!(AddSourceForm);

impl AddSourceForm {
    /// Builds the form. The `rulesets` field is only offered when at least
    /// one ruleset exists.
    pub async fn new(store: &dyn RuleStore) -> SciriusResult<Self> {
        let mut base = source_config().build();
        let rulesets = store.rulesets().await?;
        if !rulesets.is_empty() {
            base.add_field(
                FormFieldDef::new(
                    "rulesets",
                    FormFieldType::ModelMultipleChoice {
                        choices: rulesets.into_iter().map(|r| (r.id, r.name)).collect(),
                    },
                )
                .required(false)
                .label(RULESETS_LABEL)
                .widget(WidgetType::CheckboxSelectMultiple),
            );
        }
        Ok(Self { base })
    }

    /// Whether the `rulesets` field was offered.
    pub fn has_rulesets_field(&self) -> bool {
        self.base.field("rulesets").is_some()
    }

    /// The rules file submitted with the form, if any.
    pub fn uploaded_file(&self) -> Option<&UploadedFile> {
        self.base.cleaned_file("file")
    }

    /// Creates the source, its `HEAD` snapshot, and attaches the snapshot
    /// to every selected ruleset.
    pub async fn save(&self, store: &dyn RuleStore) -> SciriusResult<AddedSource> {
        let data = self.base.valid_data()?;
        let now = Utc::now();
        let source = store.create_source(new_source_from(data, now)?).await?;
        let version = store
            .create_source_version(NewSourceAtVersion::head(source.id, now))
            .await?;

        let rulesets = ids(data, "rulesets");
        for ruleset_id in &rulesets {
            store.add_ruleset_source(*ruleset_id, version.id).await?;
        }

        tracing::info!(
            source_id = source.id,
            name = %source.name,
            rulesets = rulesets.len(),
            "Source added"
        );
        Ok(AddedSource {
            source,
            version,
            rulesets,
        })
    }
}
