//! Validation pipeline for form processing.
//!
//! 1. Field-level validation (type coercion + per-field checks)
//! 2. Form-level cross-field validation (async, can consult the store)
//!
//! Errors accumulate rather than short-circuiting, so all validation
//! issues are reported at once.

use std::collections::HashMap;

use scirius_core::ValidationError;
use scirius_db::Value;

use crate::data::FormData;
use crate::fields::{clean_field_value, clean_file, FormFieldDef, FormFieldType};
use crate::form::Form;
use crate::upload::UploadedFile;

/// Performs field-level validation for all fields.
///
/// Disabled fields take their initial value and skip validation. `File`
/// fields are cleaned from the uploaded files; the cleaned data then holds
/// the file name and `cleaned_files` holds the file itself.
pub fn clean_fields(
    field_defs: &[FormFieldDef],
    data: &FormData,
    prefix: Option<&str>,
    cleaned_data: &mut HashMap<String, Value>,
    cleaned_files: &mut HashMap<String, UploadedFile>,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for field in field_defs {
        if field.disabled {
            if let Some(initial) = &field.initial {
                cleaned_data.insert(field.name.clone(), initial.clone());
            }
            continue;
        }

        let key = prefix.map_or_else(|| field.name.clone(), |p| format!("{p}-{}", field.name));

        let result = if matches!(field.field_type, FormFieldType::File { .. }) {
            clean_file(field, data.files(&key)).map(|file| match file {
                Some(file) => {
                    let name = Value::from(file.name.as_str());
                    cleaned_files.insert(field.name.clone(), file);
                    name
                }
                None => Value::Null,
            })
        } else {
            clean_field_value(field, data.get_list(&key))
        };

        match result {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                errors.insert(field.name.clone(), field_errors);
            }
        }
    }
}

/// Validates a form and returns its errors as a [`ValidationError`].
pub async fn full_clean(form: &mut dyn Form) -> Result<(), ValidationError> {
    if !form.is_bound() {
        return Err(ValidationError::new(
            "The form is not bound to any data.",
            "unbound",
        ));
    }
    if form.is_valid().await {
        Ok(())
    } else {
        Err(ValidationError::from_form_errors(form.errors()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::BaseForm;

    fn run(fields: &[FormFieldDef], data: &FormData) -> (HashMap<String, Value>, HashMap<String, Vec<String>>, HashMap<String, UploadedFile>) {
        let mut cleaned = HashMap::new();
        let mut files = HashMap::new();
        let mut errors = HashMap::new();
        clean_fields(fields, data, None, &mut cleaned, &mut files, &mut errors);
        (cleaned, errors, files)
    }

    #[test]
    fn test_clean_fields_valid() {
        let fields = vec![
            FormFieldDef::new("name", FormFieldType::char(100)),
            FormFieldDef::new("cert_verif", FormFieldType::Boolean).required(false),
        ];
        let (cleaned, errors, _) = run(&fields, &FormData::parse("name=ET&cert_verif=on"));
        assert!(errors.is_empty());
        assert_eq!(cleaned["name"], Value::from("ET"));
        assert_eq!(cleaned["cert_verif"], Value::Bool(true));
    }

    #[test]
    fn test_clean_fields_errors_accumulate() {
        let fields = vec![
            FormFieldDef::new("name", FormFieldType::char(100)),
            FormFieldDef::new(
                "method",
                FormFieldType::Choice {
                    choices: vec![("http".into(), "HTTP URL".into())],
                },
            ),
        ];
        let (cleaned, errors, _) = run(&fields, &FormData::new());
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("method"));
        assert!(cleaned.is_empty());
    }

    #[test]
    fn test_clean_fields_disabled_uses_initial() {
        let fields = vec![FormFieldDef::new("version", FormFieldType::char(42))
            .disabled(true)
            .initial("HEAD")];
        let (cleaned, errors, _) = run(&fields, &FormData::parse("version=other"));
        assert!(errors.is_empty());
        assert_eq!(cleaned["version"], Value::from("HEAD"));
    }

    #[test]
    fn test_clean_fields_file() {
        let fields = vec![FormFieldDef::new(
            "file",
            FormFieldType::File {
                max_size: None,
                allowed_extensions: vec![],
            },
        )
        .required(false)];
        let mut data = FormData::new();
        data.add_file("file", UploadedFile::new("local.rules", b"alert".to_vec()));
        let (cleaned, errors, files) = run(&fields, &data);
        assert!(errors.is_empty());
        assert_eq!(cleaned["file"], Value::from("local.rules"));
        assert_eq!(files["file"].size, 5);

        let (cleaned, _, files) = run(&fields, &FormData::new());
        assert_eq!(cleaned["file"], Value::Null);
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_full_clean() {
        let mut form = BaseForm::new(vec![FormFieldDef::new("name", FormFieldType::char(3))]);
        assert_eq!(full_clean(&mut form).await.unwrap_err().code, "unbound");

        form.bind(&FormData::parse("name=toolong"));
        let err = full_clean(&mut form).await.unwrap_err();
        assert_eq!(
            err.messages_for("name"),
            vec!["Ensure this value has at most 3 characters (it has 7)."]
        );

        form.bind(&FormData::parse("name=ok"));
        assert!(full_clean(&mut form).await.is_ok());
    }
}
