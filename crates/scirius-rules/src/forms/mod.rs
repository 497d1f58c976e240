//! The console forms.
//!
//! Each form wraps a [`BaseForm`](scirius_forms::BaseForm) built at
//! construction time (choice lists are read from the store then) and adds
//! the persistence operation the console runs once the form is valid:
//!
//! | Form | Operation |
//! |---|---|
//! | [`SystemSettingsForm`] | [`save`](SystemSettingsForm::save) |
//! | [`SourceForm`] | [`save`](SourceForm::save) |
//! | [`AddSourceForm`] | [`save`](AddSourceForm::save) |
//! | [`RulesetForm`] | [`create_ruleset`](RulesetForm::create_ruleset) |
//! | [`RulesetEditForm`] | [`apply`](RulesetEditForm::apply) |
//! | [`RulesetCopyForm`] | [`copy`](RulesetCopyForm::copy) |
//! | [`RulesetSuppressForm`] | [`suppress`](RulesetSuppressForm::suppress) |
//!
//! Operations refuse to run on a form that is unbound, not yet validated,
//! or invalid, returning `SciriusError::ValidationError`. They perform
//! their writes in order and do not roll back earlier writes when a later
//! one fails.

mod ruleset;
mod settings;
mod source;

use std::collections::HashMap;

use scirius_core::{SciriusResult, ValidationError};
use scirius_db::Value;

pub use ruleset::{RulesetCopyForm, RulesetEditForm, RulesetForm, RulesetSuppressForm};
pub use settings::SystemSettingsForm;
pub use source::{AddSourceForm, AddedSource, SourceForm};

/// Field errors produced by a form-level `clean` hook.
pub type FieldErrors = HashMap<String, Vec<String>>;

/// Implements [`Form`](scirius_forms::Form) for a struct with a `base: BaseForm`
/// field by delegating to it. The optional second argument is a
/// cross-field check run after field cleaning.
macro_rules! delegate_form {
    ($ty:ty) => {
        delegate_form!($ty, |_| Ok(()));
    };
    ($ty:ty, $clean:expr) => {
        #[async_trait::async_trait]
        impl scirius_forms::Form for $ty {
            fn fields(&self) -> &[scirius_forms::FormFieldDef] {
                scirius_forms::Form::fields(&self.base)
            }

            fn initial(&self) -> &std::collections::HashMap<String, scirius_db::Value> {
                scirius_forms::Form::initial(&self.base)
            }

            fn prefix(&self) -> Option<&str> {
                scirius_forms::Form::prefix(&self.base)
            }

            fn bind(&mut self, data: &scirius_forms::FormData) {
                scirius_forms::Form::bind(&mut self.base, data);
            }

            fn is_bound(&self) -> bool {
                scirius_forms::Form::is_bound(&self.base)
            }

            async fn is_valid(&mut self) -> bool {
                if !scirius_forms::Form::is_bound(&self.base) {
                    return false;
                }
                self.base.clean_fields();
                if let Err(errors) = scirius_forms::Form::clean(self).await {
                    self.base.add_errors(errors);
                }
                scirius_forms::Form::errors(&self.base).is_empty()
            }

            fn errors(&self) -> &std::collections::HashMap<String, Vec<String>> {
                scirius_forms::Form::errors(&self.base)
            }

            fn cleaned_data(&self) -> &std::collections::HashMap<String, scirius_db::Value> {
                scirius_forms::Form::cleaned_data(&self.base)
            }

            async fn clean(&self) -> Result<(), $crate::forms::FieldErrors> {
                let check: fn(&scirius_forms::BaseForm) -> Result<(), $crate::forms::FieldErrors> =
                    $clean;
                check(&self.base)
            }
        }

        impl $ty {
            /// Returns the wrapped form.
            pub const fn base(&self) -> &scirius_forms::BaseForm {
                &self.base
            }
        }
    };
}

pub(crate) use delegate_form;

// ── Reading cleaned data ───────────────────────────────────────────────

static NULL: Value = Value::Null;

fn value<'a>(data: &'a HashMap<String, Value>, key: &str) -> &'a Value {
    data.get(key).unwrap_or(&NULL)
}

/// A cleaned string; an empty optional field reads as `""`.
fn string(data: &HashMap<String, Value>, key: &str) -> String {
    value(data, key).as_str().unwrap_or_default().to_string()
}

/// A cleaned optional string; empty reads as `None`.
fn opt_string(data: &HashMap<String, Value>, key: &str) -> Option<String> {
    value(data, key).as_non_empty_str().map(str::to_string)
}

fn flag(data: &HashMap<String, Value>, key: &str) -> bool {
    value(data, key).as_bool().unwrap_or(false)
}

fn ids(data: &HashMap<String, Value>, key: &str) -> Vec<i64> {
    value(data, key).int_list()
}

/// Parses a cleaned choice value into its typed form.
fn choice<T>(data: &HashMap<String, Value>, key: &str) -> SciriusResult<T>
where
    T: std::str::FromStr<Err = String>,
{
    string(data, key)
        .parse()
        .map_err(|e: String| ValidationError::new(e, "invalid_choice").into())
}
