//! Submitted form data.
//!
//! [`FormData`] holds what a client submitted: every field may repeat (one
//! entry per checked box of a multi-select), and files travel separately
//! from the text fields.

use scirius_core::utils::MultiValueDict;

use crate::upload::UploadedFile;

/// Text fields and uploaded files of one form submission.
///
/// # Examples
///
/// ```
/// use scirius_forms::FormData;
///
/// let data = FormData::parse("name=prod&sources=1&sources=3&activate_categories=on");
/// assert_eq!(data.get("name"), Some("prod"));
/// assert_eq!(data.get_list("sources"), &["1".to_string(), "3".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormData {
    fields: MultiValueDict<String, String>,
    files: MultiValueDict<String, UploadedFile>,
}

impl FormData {
    /// Creates empty form data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an `application/x-www-form-urlencoded` body.
    ///
    /// `+` decodes to a space and percent escapes are decoded; repeated keys
    /// keep every value in submission order.
    pub fn parse(body: &str) -> Self {
        let mut data = Self::new();
        for pair in body.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair
                .split_once('=')
                .unwrap_or((pair, ""));
            data.append(percent_decode(key), percent_decode(value));
        }
        data
    }

    /// Returns the last submitted value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(&key.to_string()).map(String::as_str)
    }

    /// Returns every submitted value for `key`; empty if absent.
    pub fn get_list(&self, key: &str) -> &[String] {
        self.fields.get_list(&key.to_string())
    }

    /// Replaces the values of `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.set(key.into(), value.into());
    }

    /// Adds one more value for `key`.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.append(key.into(), value.into());
    }

    /// Drops every value of `key`, as an unchecked checkbox would.
    pub fn remove(&mut self, key: &str) {
        self.fields.remove(&key.to_string());
    }

    /// Builder form of [`append`](Self::append).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// Attaches an uploaded file under `key`.
    pub fn add_file(&mut self, key: impl Into<String>, file: UploadedFile) {
        self.files.append(key.into(), file);
    }

    /// Returns the files submitted under `key`.
    pub fn files(&self, key: &str) -> &[UploadedFile] {
        self.files.get_list(&key.to_string())
    }

    /// Returns `true` if a text field named `key` was submitted.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(&key.to_string())
    }

    /// Returns `true` if neither fields nor files were submitted.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.files.is_empty()
    }

    /// Encodes the text fields back into a urlencoded body, keys sorted.
    pub fn urlencode(&self) -> String {
        let mut keys: Vec<&String> = self.fields.keys().collect();
        keys.sort();
        let mut parts = Vec::new();
        for key in keys {
            for value in self.fields.get_list(key) {
                parts.push(format!("{}={}", percent_encode(key), percent_encode(value)));
            }
        }
        parts.join("&")
    }
}

fn percent_decode(input: &str) -> String {
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
