//! Startup wiring: config → provider clients → routable model registry.

use std::sync::Arc;

use crate::core::config::{Config, ConfigError};
use crate::core::llm::{ChatError, ChatRouter, ProviderError};
use crate::core::models::{Model, ModelRegistry};
use crate::core::persistence;

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

/// Everything a chat front-end needs.
pub struct ChatSetup {
    pub router: Arc<ChatRouter>,
    /// Only models whose provider has credentials.
    pub models: ModelRegistry,
    pub initial_model: Model,
}

/// Where the initial model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelSource {
    /// `-m/--model`.
    Override,
    /// The `last_model` file.
    LastUsed,
    /// `INTELLISERVE_MODEL`.
    Configured,
    /// Registry default for the configured providers.
    Default,
}

impl ModelSource {
    pub fn describe(self) -> &'static str {
        match self {
            ModelSource::Override => "from --model",
            ModelSource::LastUsed => "last used",
            ModelSource::Configured => "from INTELLISERVE_MODEL",
            ModelSource::Default => "default",
        }
    }
}

/// Models usable with `config`: the builtin catalog minus providers without a key.
pub fn available_models(config: &Config) -> Result<ModelRegistry, ConfigError> {
    ModelRegistry::builtin()
        .restricted_to(&config.configured_providers())
        .ok_or(ConfigError::MissingApiKey)
}

/// Pick the initial model from `models`.
///
/// Order: `model_override`, the last selected model (if still available),
/// `config.model_id`, the registry default. An explicit override or configured id
/// that is not available is an error; a stale `last_model` is ignored.
pub fn resolve_initial_model<'a>(
    models: &'a ModelRegistry,
    config: &Config,
    model_override: Option<&str>,
    last_model: Option<&str>,
) -> Result<(&'a Model, ModelSource), ConfigError> {
    if let Some(id) = model_override {
        let model = models
            .find(id)
            .ok_or_else(|| ConfigError::UnknownModel(id.to_string()))?;
        return Ok((model, ModelSource::Override));
    }
    if let Some(model) = last_model.and_then(|id| models.find(id)) {
        return Ok((model, ModelSource::LastUsed));
    }
    match config.model_id.as_deref() {
        Some(id) => models
            .find(id)
            .map(|m| (m, ModelSource::Configured))
            .ok_or_else(|| ConfigError::UnknownModel(id.to_string())),
        None => Ok((models.default_model(), ModelSource::Default)),
    }
}

/// Build the router and registry from `config`. See [`resolve_initial_model`].
pub fn prepare(config: &Config, model_override: Option<&str>) -> Result<ChatSetup, SetupError> {
    let router = ChatRouter::from_config(config)?;
    prepare_with(router, config, model_override, persistence::load_last_model())
}

fn prepare_with(
    router: ChatRouter,
    config: &Config,
    model_override: Option<&str>,
    last_model: Option<String>,
) -> Result<ChatSetup, SetupError> {
    let models = available_models(config)?;
    router.validate(&models)?;

    let (initial_model, source) =
        resolve_initial_model(&models, config, model_override, last_model.as_deref())?;
    log::info!("initial model {} ({})", initial_model.id, source.describe());
    let initial_model = initial_model.clone();

    Ok(ChatSetup {
        router: Arc::new(router),
        models,
        initial_model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::load_from;
    use crate::core::llm::FakeProvider;
    use crate::core::models::ProviderKey;

    fn groq_only_config(model: Option<&str>) -> Config {
        let model = model.map(str::to_string);
        load_from(move |name| match name {
            "GROQ_API_KEY" => Some("gsk".to_string()),
            "INTELLISERVE_MODEL" => model.clone(),
            _ => None,
        })
        .unwrap()
    }

    fn xai_only_config() -> Config {
        load_from(|name| match name {
            "XAI_API_KEY" => Some("xai".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn groq_router() -> ChatRouter {
        let mut router = ChatRouter::new();
        router.register(ProviderKey::Groq, Arc::new(FakeProvider::default()));
        router
    }

    #[test]
    fn hides_models_without_credentials() {
        let setup = prepare_with(groq_router(), &groq_only_config(None), None, None).unwrap();
        assert!(setup.models.find("grok-beta").is_none());
        assert_eq!(setup.initial_model.id, "llama3-70b-8192");
    }

    #[test]
    fn xai_only_starts_on_grok() {
        let mut router = ChatRouter::new();
        router.register(ProviderKey::XAi, Arc::new(FakeProvider::default()));
        let setup = prepare_with(router, &xai_only_config(), None, None).unwrap();
        assert_eq!(setup.models.list().len(), 1);
        assert_eq!(setup.initial_model.id, "grok-beta");
    }

    #[test]
    fn unknown_configured_model_is_an_error() {
        let err = prepare_with(
            groq_router(),
            &groq_only_config(Some("grok-beta")),
            None,
            None,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            SetupError::Config(ConfigError::UnknownModel(ref id)) if id == "grok-beta"
        ));
    }

    #[test]
    fn resolve_reports_source() {
        let config = groq_only_config(None);
        let models = available_models(&config).unwrap();
        let (model, source) = resolve_initial_model(&models, &config, None, None).unwrap();
        assert_eq!((model.id.as_str(), source), ("llama3-70b-8192", ModelSource::Default));

        let (model, source) =
            resolve_initial_model(&models, &config, None, Some("gemma-7b-it")).unwrap();
        assert_eq!((model.id.as_str(), source), ("gemma-7b-it", ModelSource::LastUsed));

        let (_, source) =
            resolve_initial_model(&models, &config, Some("llama3-8b-8192"), Some("gemma-7b-it"))
                .unwrap();
        assert_eq!(source, ModelSource::Override);
    }

    #[test]
    fn last_model_wins_over_configured_model() {
        let setup = prepare_with(
            groq_router(),
            &groq_only_config(Some("llama3-8b-8192")),
            None,
            Some("gemma-7b-it".to_string()),
        )
        .unwrap();
        assert_eq!(setup.initial_model.id, "gemma-7b-it");
    }

    #[test]
    fn stale_last_model_is_ignored() {
        let setup = prepare_with(
            groq_router(),
            &groq_only_config(None),
            None,
            Some("grok-beta".to_string()),
        )
        .unwrap();
        assert_eq!(setup.initial_model.id, "llama3-70b-8192");
    }

    #[test]
    fn unknown_override_is_an_error() {
        let err = prepare_with(
            groq_router(),
            &groq_only_config(None),
            Some("grok-beta"),
            None,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            SetupError::Config(ConfigError::UnknownModel(ref id)) if id == "grok-beta"
        ));
    }

    #[test]
    fn router_missing_a_configured_provider_fails_validation() {
        let err = prepare_with(ChatRouter::new(), &groq_only_config(None), None, None)
            .err()
            .unwrap();
        assert!(matches!(err, SetupError::Chat(ChatError::UnsupportedModel { .. })));
    }
}
