use scirius_core::SciriusResult;
use scirius_db::{Model, RuleStore, SystemSettings};
use scirius_forms::{BaseForm, ModelFormConfig};

use super::{delegate_form, flag, string};

/// Edits every field of the [`SystemSettings`] singleton.
pub struct SystemSettingsForm {
    base: BaseForm,
}

delegate_form!(SystemSettingsForm);

impl SystemSettingsForm {
    fn config() -> ModelFormConfig {
        ModelFormConfig::new(SystemSettings::meta())
    }

    /// An unbound form showing the field defaults.
    pub fn new() -> Self {
        Self {
            base: Self::config().build(),
        }
    }

    /// An unbound form pre-filled with `settings`.
    pub fn for_instance(settings: &SystemSettings) -> Self {
        Self {
            base: Self::config().build_for(settings),
        }
    }

    /// An unbound form pre-filled with the stored settings.
    pub async fn load(store: &dyn RuleStore) -> SciriusResult<Self> {
        Ok(Self::for_instance(&store.system_settings().await?))
    }

    /// Stores the submitted settings and returns them.
    pub async fn save(&self, store: &dyn RuleStore) -> SciriusResult<SystemSettings> {
        let data = self.base.valid_data()?;
        let settings = SystemSettings {
            use_http_proxy: flag(data, "use_http_proxy"),
            http_proxy: string(data, "http_proxy"),
            https_proxy: string(data, "https_proxy"),
            use_elasticsearch: flag(data, "use_elasticsearch"),
        };
        store.save_system_settings(&settings).await?;
        tracing::info!(
            use_http_proxy = settings.use_http_proxy,
            use_elasticsearch = settings.use_elasticsearch,
            "System settings saved"
        );
        Ok(settings)
    }
}

impl Default for SystemSettingsForm {
    fn default() -> Self {
        Self::new()
    }
}
