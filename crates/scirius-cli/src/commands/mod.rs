//! Built-in management commands.
//!
//! Each command turns its arguments into [`FormData`], binds the matching
//! console form, and runs the form's persistence operation. Invalid input
//! is reported as a `ValidationError` carrying the field errors.

pub mod addsource;
pub mod copyruleset;
pub mod createruleset;
pub mod editruleset;
pub mod listrulesets;
pub mod settings;
pub mod suppressruleset;

pub use addsource::AddsourceCommand;
pub use copyruleset::CopyrulesetCommand;
pub use createruleset::CreaterulesetCommand;
pub use editruleset::EditrulesetCommand;
pub use listrulesets::ListrulesetsCommand;
pub use settings::SettingsCommand;
pub use suppressruleset::SuppressrulesetCommand;

use scirius_core::SciriusResult;
use scirius_db::Value;
use scirius_forms::validation::full_clean;
use scirius_forms::{Form, FormData};

use crate::command::CommandRegistry;

/// Registers all built-in management commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(SettingsCommand));
    registry.register(Box::new(AddsourceCommand));
    registry.register(Box::new(CreaterulesetCommand));
    registry.register(Box::new(EditrulesetCommand));
    registry.register(Box::new(CopyrulesetCommand));
    registry.register(Box::new(SuppressrulesetCommand));
    registry.register(Box::new(ListrulesetsCommand));
}

/// Renders the initial values of `form` as a submission, so that a command
/// only has to override the fields it was given.
pub fn initial_data(form: &dyn Form) -> FormData {
    let mut data = FormData::new();
    for field in form.fields() {
        let value = form
            .initial()
            .get(&field.name)
            .or(field.initial.as_ref());
        match value {
            None | Some(Value::Null | Value::Bool(false)) => {}
            Some(Value::Bool(true)) => data.set(field.name.as_str(), "on"),
            Some(Value::List(items)) => {
                for item in items {
                    data.append(field.name.as_str(), item.to_form_string());
                }
            }
            Some(other) => data.set(field.name.as_str(), other.to_form_string()),
        }
    }
    data
}

/// Replaces every value of `key` with `values`; an empty `values` leaves
/// the submission untouched.
pub fn replace_list<I, S>(data: &mut FormData, key: &str, values: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut values = values.into_iter();
    if let Some(first) = values.next() {
        data.set(key, first);
        for value in values {
            data.append(key, value);
        }
    }
}

/// Sets a checkbox field: checked submits `on`, unchecked omits the key.
pub fn set_checkbox(data: &mut FormData, key: &str, checked: bool) {
    if checked {
        data.set(key, "on");
    } else {
        data.remove(key);
    }
}

/// Binds `data` and validates, returning the field errors on failure.
pub async fn submit(form: &mut dyn Form, data: &FormData) -> SciriusResult<()> {
    form.bind(data);
    full_clean(form).await?;
    Ok(())
}
