//! Integration tests for binding, validating and cleaning forms.
//!
//! Covers:
//! 1. Plain forms built from field definitions
//! 2. A wrapping form with a cross-field `clean` hook
//! 3. Model-derived forms against the real record metadata

use std::collections::HashMap;

use async_trait::async_trait;

use scirius_db::{Model, Source, SystemSettings, Value};
use scirius_forms::validation::full_clean;
use scirius_forms::{
    BaseForm, Form, FormData, FormFieldDef, FormFieldType, ModelFormConfig, UploadedFile,
    NON_FIELD_ERRORS,
};

// ============================================================================
// Shared helpers
// ============================================================================

fn make_proxy_form() -> BaseForm {
    BaseForm::new(vec![
        FormFieldDef::new("use_http_proxy", FormFieldType::Boolean).required(false),
        FormFieldDef::new("http_proxy", FormFieldType::char(200)).required(false),
    ])
}

/// Requires a proxy address once the proxy checkbox is ticked.
struct ProxyForm {
    base: BaseForm,
}

#[async_trait]
impl Form for ProxyForm {
    fn fields(&self) -> &[FormFieldDef] {
        self.base.fields()
    }

    fn initial(&self) -> &HashMap<String, Value> {
        self.base.initial()
    }

    fn prefix(&self) -> Option<&str> {
        self.base.prefix()
    }

    fn bind(&mut self, data: &FormData) {
        self.base.bind(data);
    }

    fn is_bound(&self) -> bool {
        self.base.is_bound()
    }

    async fn is_valid(&mut self) -> bool {
        if !self.base.is_bound() {
            return false;
        }
        self.base.clean_fields();
        if let Err(errors) = self.clean().await {
            self.base.add_errors(errors);
        }
        self.base.errors().is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        self.base.errors()
    }

    fn cleaned_data(&self) -> &HashMap<String, Value> {
        self.base.cleaned_data()
    }

    async fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        let data = self.base.cleaned_data();
        let enabled = data
            .get("use_http_proxy")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let proxy = data.get("http_proxy").and_then(Value::as_non_empty_str);
        if enabled && proxy.is_none() {
            let mut errors = HashMap::new();
            errors.insert(
                NON_FIELD_ERRORS.to_string(),
                vec!["A proxy address is needed when the proxy is enabled.".to_string()],
            );
            return Err(errors);
        }
        Ok(())
    }
}

// ============================================================================
// 1. Plain forms
// ============================================================================

#[tokio::test]
async fn test_optional_fields_accept_empty_input() {
    let mut form = make_proxy_form();
    form.bind(&FormData::parse("http_proxy="));
    assert!(form.is_valid().await);
    assert_eq!(form.cleaned_data()["use_http_proxy"], Value::Bool(false));
    assert_eq!(form.cleaned_data()["http_proxy"], Value::Null);
}

#[tokio::test]
async fn test_max_length_is_enforced() {
    let mut form = make_proxy_form();
    let long = "p".repeat(201);
    form.bind(&FormData::new().with("http_proxy", long));
    assert!(!form.is_valid().await);
    assert!(form.errors()["http_proxy"][0].contains("at most 200 characters (it has 201)"));
}

#[tokio::test]
async fn test_full_clean_reports_field_errors() {
    let mut form = BaseForm::new(vec![FormFieldDef::new("name", FormFieldType::char(100))]);
    form.bind(&FormData::new());
    let err = full_clean(&mut form).await.unwrap_err();
    assert_eq!(err.messages_for("name"), vec!["This field is required."]);
}

#[tokio::test]
async fn test_upload_is_cleaned_alongside_fields() {
    let mut form = BaseForm::new(vec![
        FormFieldDef::new("name", FormFieldType::char(100)),
        FormFieldDef::new(
            "file",
            FormFieldType::File {
                max_size: Some(1024),
                allowed_extensions: vec!["rules".into()],
            },
        )
        .required(false),
    ]);
    let mut data = FormData::parse("name=local");
    data.add_file("file", UploadedFile::new("custom.rules", b"alert tcp any any".to_vec()));
    form.bind(&data);
    assert!(form.is_valid().await);
    assert_eq!(form.cleaned_data()["file"], Value::from("custom.rules"));
    assert_eq!(form.cleaned_file("file").unwrap().size, 17);
}

// ============================================================================
// 2. Cross-field clean hook
// ============================================================================

#[tokio::test]
async fn test_clean_hook_adds_non_field_error() {
    let mut form = ProxyForm {
        base: make_proxy_form(),
    };
    form.bind(&FormData::parse("use_http_proxy=on"));
    assert!(!form.is_valid().await);
    assert_eq!(form.base.non_field_errors().len(), 1);

    form.bind(&FormData::parse("use_http_proxy=on&http_proxy=http%3A%2F%2Fproxy%3A3128"));
    assert!(form.is_valid().await);
    assert_eq!(
        form.cleaned_data()["http_proxy"],
        Value::from("http://proxy:3128")
    );
}

#[tokio::test]
async fn test_clean_hook_runs_after_field_errors() {
    let mut form = ProxyForm {
        base: make_proxy_form(),
    };
    form.bind(&FormData::new().with("use_http_proxy", "on").with("http_proxy", "x".repeat(300)));
    assert!(!form.is_valid().await);
    assert!(form.errors().contains_key("http_proxy"));
    assert!(form.errors().contains_key(NON_FIELD_ERRORS));
}

// ============================================================================
// 3. Model-derived forms
// ============================================================================

#[tokio::test]
async fn test_settings_model_form_accepts_empty_submission() {
    let mut form = ModelFormConfig::new(SystemSettings::meta()).build();
    form.bind(&FormData::new());
    assert!(form.is_valid().await);
    assert_eq!(form.cleaned_data()["use_elasticsearch"], Value::Bool(false));
}

#[tokio::test]
async fn test_settings_model_form_initial_from_instance() {
    let settings = SystemSettings::default();
    let form = ModelFormConfig::new(SystemSettings::meta()).build_for(&settings);
    assert_eq!(form.initial_for("use_elasticsearch"), Some(&Value::Bool(true)));
    assert_eq!(form.initial_for("http_proxy"), Some(&Value::from("")));
}

#[tokio::test]
async fn test_source_model_form_rejects_unknown_method() {
    let mut form = ModelFormConfig::new(Source::meta())
        .exclude(&["created_date", "updated_date"])
        .build();
    form.bind(&FormData::parse("name=et&method=ftp&datatype=sigs"));
    assert!(!form.is_valid().await);
    assert!(form.errors()["method"][0].contains("ftp is not one of the available choices"));
    assert!(!form.errors().contains_key("created_date"));
}
