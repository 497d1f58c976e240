//! Rule management records.
//!
//! These are the records the console forms read and write:
//!
//! - [`SystemSettings`] - the global configuration singleton
//! - [`Source`] - a configured origin of IDS rules
//! - [`Category`] - a group of rules belonging to a source
//! - [`SourceAtVersion`] - a versioned snapshot of a source
//! - [`Ruleset`] - a named collection of source snapshots and categories
//!
//! The `New*` structs describe records that have not been stored yet; the
//! store assigns the primary key.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::{FieldDef, FieldType};
use crate::model::{Model, ModelMeta};
use crate::value::Value;

// ── Choice enums ───────────────────────────────────────────────────────

/// How a source's rules are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FetchMethod {
    /// Downloaded from `uri`.
    #[default]
    Http,
    /// Uploaded through the console.
    Local,
}

impl FetchMethod {
    /// `(value, label)` pairs used for form choices.
    pub const CHOICES: &'static [(&'static str, &'static str)] =
        &[("http", "HTTP URL"), ("local", "Upload")];

    /// Returns the stored value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Local => "local",
        }
    }
}

impl FromStr for FetchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http" => Ok(Self::Http),
            "local" => Ok(Self::Local),
            other => Err(format!("unknown fetch method '{other}'")),
        }
    }
}

/// What a source delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// A tar archive of signature files.
    #[default]
    Sigs,
    /// A single signatures file.
    Sig,
    /// Anything else.
    Other,
}

impl ContentType {
    /// `(value, label)` pairs used for form choices.
    pub const CHOICES: &'static [(&'static str, &'static str)] = &[
        ("sigs", "Signatures files in tar archive"),
        ("sig", "Individual Signatures file"),
        ("other", "Other content"),
    ];

    /// Returns the stored value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sigs => "sigs",
            Self::Sig => "sig",
            Self::Other => "other",
        }
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sigs" => Ok(Self::Sigs),
            "sig" => Ok(Self::Sig),
            "other" => Ok(Self::Other),
            other => Err(format!("unknown content type '{other}'")),
        }
    }
}

// ── SystemSettings ─────────────────────────────────────────────────────

/// The global configuration singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSettings {
    /// Whether outgoing source downloads go through a proxy.
    pub use_http_proxy: bool,
    /// Proxy for HTTP downloads.
    pub http_proxy: String,
    /// Proxy for HTTPS downloads.
    pub https_proxy: String,
    /// Whether the console queries Elasticsearch for rule hits.
    pub use_elasticsearch: bool,
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            use_http_proxy: false,
            http_proxy: String::new(),
            https_proxy: String::new(),
            use_elasticsearch: true,
        }
    }
}

static SYSTEM_SETTINGS_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    app_label: "rules",
    model_name: "systemsettings",
    db_table: "rules_systemsettings",
    verbose_name: "system settings",
    verbose_name_plural: "system settings",
    fields: vec![
        FieldDef::new("id", FieldType::AutoField).primary_key(),
        FieldDef::new("use_http_proxy", FieldType::BooleanField)
            .default(false)
            .verbose_name("Use a proxy"),
        FieldDef::new("http_proxy", FieldType::CharField)
            .max_length(200)
            .blank()
            .default("")
            .verbose_name("HTTP proxy")
            .help_text("Set proxy address as http://host:port"),
        FieldDef::new("https_proxy", FieldType::CharField)
            .max_length(200)
            .blank()
            .default("")
            .verbose_name("HTTPS proxy")
            .help_text("Set proxy address as http://host:port"),
        FieldDef::new("use_elasticsearch", FieldType::BooleanField)
            .default(true)
            .verbose_name("Use Elasticsearch"),
    ],
});

impl Model for SystemSettings {
    fn meta() -> &'static ModelMeta {
        &SYSTEM_SETTINGS_META
    }

    fn pk(&self) -> Option<i64> {
        Some(1)
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Int(1)),
            ("use_http_proxy", Value::Bool(self.use_http_proxy)),
            ("http_proxy", Value::from(self.http_proxy.as_str())),
            ("https_proxy", Value::from(self.https_proxy.as_str())),
            ("use_elasticsearch", Value::Bool(self.use_elasticsearch)),
        ]
    }
}

// ── Source ─────────────────────────────────────────────────────────────

/// A configured origin of IDS rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Primary key.
    pub id: i64,
    /// Unique display name.
    pub name: String,
    /// When the source was created.
    pub created_date: DateTime<Utc>,
    /// When the source was last changed.
    pub updated_date: DateTime<Utc>,
    /// How rules are obtained.
    pub method: FetchMethod,
    /// What the source delivers.
    pub datatype: ContentType,
    /// Download location for HTTP sources.
    pub uri: Option<String>,
    /// Whether TLS certificates are verified on download.
    pub cert_verif: bool,
    /// Authorization key sent with downloads.
    pub authkey: Option<String>,
}

/// A source that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSource {
    /// Unique display name.
    pub name: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Last-change timestamp.
    pub updated_date: DateTime<Utc>,
    /// How rules are obtained.
    pub method: FetchMethod,
    /// What the source delivers.
    pub datatype: ContentType,
    /// Download location for HTTP sources.
    pub uri: Option<String>,
    /// Whether TLS certificates are verified on download.
    pub cert_verif: bool,
    /// Authorization key sent with downloads.
    pub authkey: Option<String>,
}

impl NewSource {
    /// Builds the stored record once the store has assigned `id`.
    pub fn with_id(self, id: i64) -> Source {
        Source {
            id,
            name: self.name,
            created_date: self.created_date,
            updated_date: self.updated_date,
            method: self.method,
            datatype: self.datatype,
            uri: self.uri,
            cert_verif: self.cert_verif,
            authkey: self.authkey,
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

static SOURCE_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    app_label: "rules",
    model_name: "source",
    db_table: "rules_source",
    verbose_name: "source",
    verbose_name_plural: "sources",
    fields: vec![
        FieldDef::new("id", FieldType::AutoField).primary_key(),
        FieldDef::new("name", FieldType::CharField).max_length(100),
        FieldDef::new("created_date", FieldType::DateTimeField).verbose_name("date created"),
        FieldDef::new("updated_date", FieldType::DateTimeField)
            .blank()
            .verbose_name("date updated"),
        FieldDef::new("method", FieldType::CharField)
            .max_length(10)
            .choices(FetchMethod::CHOICES),
        FieldDef::new("datatype", FieldType::CharField)
            .max_length(10)
            .choices(ContentType::CHOICES),
        FieldDef::new("uri", FieldType::CharField)
            .max_length(400)
            .nullable(),
        FieldDef::new("cert_verif", FieldType::BooleanField)
            .default(true)
            .verbose_name("Check certificates"),
        FieldDef::new("authkey", FieldType::CharField)
            .max_length(100)
            .nullable(),
    ],
});

impl Model for Source {
    fn meta() -> &'static ModelMeta {
        &SOURCE_META
    }

    fn pk(&self) -> Option<i64> {
        Some(self.id)
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Int(self.id)),
            ("name", Value::from(self.name.as_str())),
            ("created_date", Value::DateTime(self.created_date)),
            ("updated_date", Value::DateTime(self.updated_date)),
            ("method", Value::from(self.method.as_str())),
            ("datatype", Value::from(self.datatype.as_str())),
            ("uri", Value::from(self.uri.clone())),
            ("cert_verif", Value::Bool(self.cert_verif)),
            ("authkey", Value::from(self.authkey.clone())),
        ]
    }
}

// ── Category ───────────────────────────────────────────────────────────

/// A group of rules belonging to a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Primary key.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Rules file the category was read from.
    pub filename: String,
    /// Free-form description.
    pub descr: String,
    /// When the category was first seen.
    pub created_date: DateTime<Utc>,
    /// The owning source.
    pub source: i64,
}

/// A category that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Rules file the category was read from.
    pub filename: String,
    /// Free-form description.
    pub descr: String,
    /// When the category was first seen.
    pub created_date: DateTime<Utc>,
    /// The owning source.
    pub source: i64,
}

impl NewCategory {
    /// Builds the stored record once the store has assigned `id`.
    pub fn with_id(self, id: i64) -> Category {
        Category {
            id,
            name: self.name,
            filename: self.filename,
            descr: self.descr,
            created_date: self.created_date,
            source: self.source,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

static CATEGORY_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    app_label: "rules",
    model_name: "category",
    db_table: "rules_category",
    verbose_name: "category",
    verbose_name_plural: "categories",
    fields: vec![
        FieldDef::new("id", FieldType::AutoField).primary_key(),
        FieldDef::new("name", FieldType::CharField).max_length(100),
        FieldDef::new("filename", FieldType::CharField).max_length(200),
        FieldDef::new("descr", FieldType::CharField)
            .max_length(400)
            .blank(),
        FieldDef::new("created_date", FieldType::DateTimeField).verbose_name("date created"),
        FieldDef::new("source", FieldType::ForeignKey { to: "source" }),
    ],
});

impl Model for Category {
    fn meta() -> &'static ModelMeta {
        &CATEGORY_META
    }

    fn pk(&self) -> Option<i64> {
        Some(self.id)
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Int(self.id)),
            ("name", Value::from(self.name.as_str())),
            ("filename", Value::from(self.filename.as_str())),
            ("descr", Value::from(self.descr.as_str())),
            ("created_date", Value::DateTime(self.created_date)),
            ("source", Value::Int(self.source)),
        ]
    }
}

// ── SourceAtVersion ────────────────────────────────────────────────────

/// A versioned snapshot of a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceAtVersion {
    /// Primary key.
    pub id: i64,
    /// The source this is a snapshot of.
    pub source: i64,
    /// Version label.
    pub version: String,
    /// Git revision of the snapshot in the rules repository.
    pub git_version: String,
    /// When the snapshot was last refreshed.
    pub updated_date: DateTime<Utc>,
}

/// A source snapshot that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSourceAtVersion {
    /// The source this is a snapshot of.
    pub source: i64,
    /// Version label.
    pub version: String,
    /// Git revision of the snapshot in the rules repository.
    pub git_version: String,
    /// When the snapshot was last refreshed.
    pub updated_date: DateTime<Utc>,
}

impl NewSourceAtVersion {
    /// A `HEAD` snapshot of `source`, as created when a source is added.
    pub fn head(source: i64, updated_date: DateTime<Utc>) -> Self {
        Self {
            source,
            version: "HEAD".to_string(),
            git_version: "HEAD".to_string(),
            updated_date,
        }
    }

    /// Builds the stored record once the store has assigned `id`.
    pub fn with_id(self, id: i64) -> SourceAtVersion {
        SourceAtVersion {
            id,
            source: self.source,
            version: self.version,
            git_version: self.git_version,
            updated_date: self.updated_date,
        }
    }
}

static SOURCE_AT_VERSION_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    app_label: "rules",
    model_name: "sourceatversion",
    db_table: "rules_sourceatversion",
    verbose_name: "source at version",
    verbose_name_plural: "sources at version",
    fields: vec![
        FieldDef::new("id", FieldType::AutoField).primary_key(),
        FieldDef::new("source", FieldType::ForeignKey { to: "source" }),
        FieldDef::new("version", FieldType::CharField).max_length(42),
        FieldDef::new("git_version", FieldType::CharField)
            .max_length(42)
            .default("HEAD"),
        FieldDef::new("updated_date", FieldType::DateTimeField)
            .blank()
            .verbose_name("date updated"),
    ],
});

impl Model for SourceAtVersion {
    fn meta() -> &'static ModelMeta {
        &SOURCE_AT_VERSION_META
    }

    fn pk(&self) -> Option<i64> {
        Some(self.id)
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Int(self.id)),
            ("source", Value::Int(self.source)),
            ("version", Value::from(self.version.as_str())),
            ("git_version", Value::from(self.git_version.as_str())),
            ("updated_date", Value::DateTime(self.updated_date)),
        ]
    }
}

// ── Ruleset ────────────────────────────────────────────────────────────

/// A named collection of source snapshots and categories.
///
/// The associations live in the store; see
/// [`RuleStore::ruleset_sources`](crate::store::RuleStore::ruleset_sources)
/// and [`RuleStore::ruleset_categories`](crate::store::RuleStore::ruleset_categories).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    /// Primary key.
    pub id: i64,
    /// Unique display name.
    pub name: String,
    /// Free-form description.
    pub descr: String,
    /// When the ruleset was created.
    pub created_date: DateTime<Utc>,
    /// When the ruleset was last changed.
    pub updated_date: DateTime<Utc>,
}

/// A ruleset that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRuleset {
    /// Unique display name.
    pub name: String,
    /// Free-form description.
    pub descr: String,
    /// Creation timestamp.
    pub created_date: DateTime<Utc>,
    /// Last-change timestamp.
    pub updated_date: DateTime<Utc>,
}

impl NewRuleset {
    /// A ruleset named `name` with both timestamps set to `now`.
    pub fn named(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            descr: String::new(),
            created_date: now,
            updated_date: now,
        }
    }

    /// Builds the stored record once the store has assigned `id`.
    pub fn with_id(self, id: i64) -> Ruleset {
        Ruleset {
            id,
            name: self.name,
            descr: self.descr,
            created_date: self.created_date,
            updated_date: self.updated_date,
        }
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

static RULESET_META: LazyLock<ModelMeta> = LazyLock::new(|| ModelMeta {
    app_label: "rules",
    model_name: "ruleset",
    db_table: "rules_ruleset",
    verbose_name: "ruleset",
    verbose_name_plural: "rulesets",
    fields: vec![
        FieldDef::new("id", FieldType::AutoField).primary_key(),
        FieldDef::new("name", FieldType::CharField).max_length(100),
        FieldDef::new("descr", FieldType::TextField).blank(),
        FieldDef::new("created_date", FieldType::DateTimeField).verbose_name("date created"),
        FieldDef::new("updated_date", FieldType::DateTimeField)
            .blank()
            .verbose_name("date updated"),
        FieldDef::new("sources", FieldType::ManyToManyField { to: "sourceatversion" }),
        FieldDef::new("categories", FieldType::ManyToManyField { to: "category" }).blank(),
    ],
});

impl Model for Ruleset {
    fn meta() -> &'static ModelMeta {
        &RULESET_META
    }

    fn pk(&self) -> Option<i64> {
        Some(self.id)
    }

    fn field_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Int(self.id)),
            ("name", Value::from(self.name.as_str())),
            ("descr", Value::from(self.descr.as_str())),
            ("created_date", Value::DateTime(self.created_date)),
            ("updated_date", Value::DateTime(self.updated_date)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_method_round_trip_through_str() {
        for (value, _) in FetchMethod::CHOICES {
            let m: FetchMethod = value.parse().unwrap();
            assert_eq!(m.as_str(), *value);
        }
        assert!("ftp".parse::<FetchMethod>().is_err());
    }

    #[test]
    fn test_content_type_parse() {
        assert_eq!("sig".parse::<ContentType>(), Ok(ContentType::Sig));
        assert!("zip".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_system_settings_defaults() {
        let s = SystemSettings::default();
        assert!(!s.use_http_proxy);
        assert!(s.use_elasticsearch);
        assert_eq!(s.field_value("http_proxy"), Some(Value::from("")));
    }

    #[test]
    fn test_source_meta_fields() {
        let meta = Source::meta();
        assert_eq!(meta.db_table, "rules_source");
        assert_eq!(meta.field("name").unwrap().max_length, Some(100));
        assert_eq!(meta.field("method").unwrap().choices.len(), 2);
        assert!(meta.field("uri").unwrap().null);
        assert!(meta.field("nonexistent").is_none());
    }

    #[test]
    fn test_source_field_values_match_meta() {
        let now = Utc::now();
        let source = NewSource {
            name: "ET open".into(),
            created_date: now,
            updated_date: now,
            method: FetchMethod::Http,
            datatype: ContentType::Sigs,
            uri: None,
            cert_verif: true,
            authkey: None,
        }
        .with_id(3);
        let names: Vec<&str> = source.field_values().iter().map(|(n, _)| *n).collect();
        let meta_names: Vec<&str> = Source::meta().fields.iter().map(|f| f.name).collect();
        assert_eq!(names, meta_names);
        assert_eq!(source.field_value("uri"), Some(Value::Null));
        assert_eq!(source.to_string(), "ET open");
    }

    #[test]
    fn test_head_snapshot() {
        let sav = NewSourceAtVersion::head(4, Utc::now()).with_id(9);
        assert_eq!(sav.version, "HEAD");
        assert_eq!(sav.git_version, "HEAD");
        assert_eq!(sav.source, 4);
        assert_eq!(sav.pk(), Some(9));
    }

    #[test]
    fn test_ruleset_meta_relations() {
        let meta = Ruleset::meta();
        assert!(meta.field("sources").unwrap().is_relation());
        assert!(meta.field("categories").unwrap().is_relation());
    }
}
