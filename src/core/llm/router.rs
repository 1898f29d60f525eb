//! Routes a chat turn to the provider client that owns the model.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::config::Config;
use crate::core::models::{Model, ModelRegistry, ProviderKey};

use super::error::{ChatError, ProviderError};
use super::provider::{ChatProvider, OpenAiCompatibleClient};

/// Lookup table from provider key to client.
#[derive(Clone, Default)]
pub struct ChatRouter {
    clients: HashMap<ProviderKey, Arc<dyn ChatProvider>>,
}

impl ChatRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one HTTP client per configured provider.
    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        let mut router = Self::new();
        for (key, settings) in &config.providers {
            let client = OpenAiCompatibleClient::new(settings, config.temperature, config.timeout)?;
            log::info!("Registered {} provider at {}", key, client.endpoint());
            router.register(*key, Arc::new(client));
        }
        Ok(router)
    }

    pub fn register(&mut self, key: ProviderKey, client: Arc<dyn ChatProvider>) {
        self.clients.insert(key, client);
    }

    pub fn supports(&self, key: ProviderKey) -> bool {
        self.clients.contains_key(&key)
    }

    /// Check that every model in `registry` resolves to a registered client.
    pub fn validate(&self, registry: &ModelRegistry) -> Result<(), ChatError> {
        match registry.list().iter().find(|m| !self.supports(m.provider)) {
            Some(model) => Err(unsupported(model)),
            None => Ok(()),
        }
    }

    /// Send `user_text` to the client owning `model`. No retry, no fallback.
    pub async fn route(&self, model: &Model, user_text: &str) -> Result<String, ChatError> {
        let client = self
            .clients
            .get(&model.provider)
            .ok_or_else(|| unsupported(model))?;
        client
            .complete(model, user_text)
            .await
            .map_err(|source| ChatError::Provider {
                model: model.display_name.clone(),
                source,
            })
    }
}

fn unsupported(model: &Model) -> ChatError {
    ChatError::UnsupportedModel {
        model_id: model.id.clone(),
        provider: model.provider.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider returning canned replies and recording each call.
    #[derive(Default)]
    pub(crate) struct FakeProvider {
        pub calls: AtomicUsize,
        pub seen: Mutex<Vec<(String, String)>>,
        pub fail_with_status: Option<u16>,
    }

    #[async_trait::async_trait]
    impl ChatProvider for FakeProvider {
        async fn complete(&self, model: &Model, user_text: &str) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push((model.id.clone(), user_text.to_string()));
            match self.fail_with_status {
                Some(status) => Err(ProviderError::Status {
                    status,
                    message: "Internal Server Error".to_string(),
                }),
                None => Ok(format!("echo: {}", user_text)),
            }
        }
    }

    fn model(id: &str) -> Model {
        ModelRegistry::builtin().find(id).cloned().unwrap()
    }

    #[tokio::test]
    async fn routes_to_owning_provider() {
        let groq = Arc::new(FakeProvider::default());
        let xai = Arc::new(FakeProvider::default());
        let mut router = ChatRouter::new();
        router.register(ProviderKey::Groq, groq.clone());
        router.register(ProviderKey::XAi, xai.clone());

        let reply = router.route(&model("gemma-7b-it"), "hi").await.unwrap();
        assert_eq!(reply, "echo: hi");
        assert_eq!(groq.calls.load(Ordering::SeqCst), 1);
        assert_eq!(xai.calls.load(Ordering::SeqCst), 0);

        router.route(&model("grok-beta"), "yo").await.unwrap();
        assert_eq!(xai.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            xai.seen.lock().unwrap()[0],
            ("grok-beta".to_string(), "yo".to_string())
        );
    }

    #[tokio::test]
    async fn unregistered_provider_is_unsupported_without_network_call() {
        let groq = Arc::new(FakeProvider::default());
        let mut router = ChatRouter::new();
        router.register(ProviderKey::Groq, groq.clone());

        let err = router.route(&model("grok-beta"), "hi").await.unwrap_err();
        assert!(
            matches!(err, ChatError::UnsupportedModel { ref model_id, .. } if model_id == "grok-beta"),
            "got {:?}",
            err
        );
        assert_eq!(groq.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_wrapped_with_model_name() {
        let mut router = ChatRouter::new();
        router.register(
            ProviderKey::Groq,
            Arc::new(FakeProvider {
                fail_with_status: Some(500),
                ..Default::default()
            }),
        );
        let err = router
            .route(&model("llama3-70b-8192"), "hi")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Llama 3 70B (Groq)"));
        assert!(err.to_string().contains("HTTP 500"));
        assert!(err.is_retryable());
    }

    #[test]
    fn validate_reports_unresolvable_models() {
        let registry = ModelRegistry::builtin();
        let mut router = ChatRouter::new();
        router.register(ProviderKey::Groq, Arc::new(FakeProvider::default()));
        assert!(matches!(
            router.validate(&registry),
            Err(ChatError::UnsupportedModel { .. })
        ));

        let groq_only = registry.restricted_to(&[ProviderKey::Groq]).unwrap();
        assert!(router.validate(&groq_only).is_ok());
    }

    #[test]
    fn from_config_registers_configured_providers() {
        let config = crate::core::config::load_from(|name| {
            (name == "XAI_API_KEY").then(|| "xai-key".to_string())
        })
        .unwrap();
        let router = ChatRouter::from_config(&config).unwrap();
        assert!(router.supports(ProviderKey::XAi));
        assert!(!router.supports(ProviderKey::Groq));
    }
}
