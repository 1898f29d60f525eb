//! Built-in model catalog and the provider each model is served by.

use std::fmt;
use std::str::FromStr;

/// Backend that serves a model. Each key maps to exactly one provider client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKey {
    /// x.ai (Grok models).
    XAi,
    /// Groq Cloud (Llama, Mixtral, Gemma).
    Groq,
}

impl ProviderKey {
    pub const ALL: [ProviderKey; 2] = [ProviderKey::XAi, ProviderKey::Groq];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKey::XAi => "xai",
            ProviderKey::Groq => "groq",
        }
    }
}

impl fmt::Display for ProviderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProviderKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xai" | "x.ai" => Ok(ProviderKey::XAi),
            "groq" => Ok(ProviderKey::Groq),
            other => Err(format!("unknown provider: {}", other)),
        }
    }
}

/// A selectable model. Immutable once the registry is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Model {
    pub id: String,
    pub display_name: String,
    pub description: String,
    /// Sent as `max_tokens` on every request.
    pub max_output_tokens: u32,
    pub provider: ProviderKey,
}

impl Model {
    fn builtin(
        id: &str,
        display_name: &str,
        description: &str,
        max_output_tokens: u32,
        provider: ProviderKey,
    ) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: description.to_string(),
            max_output_tokens,
            provider,
        }
    }
}

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL_ID: &str = "llama3-70b-8192";

/// Ordered, non-empty list of models plus the designated default.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: Vec<Model>,
    default_index: usize,
}

impl ModelRegistry {
    /// The models shipped with the app, in display order.
    pub fn builtin() -> Self {
        let models = vec![
            Model::builtin(
                "grok-beta",
                "Grok Beta",
                "x.ai's powerful conversational AI model",
                8192,
                ProviderKey::XAi,
            ),
            Model::builtin(
                "llama3-70b-8192",
                "Llama 3 70B (Groq)",
                "Meta's Llama 3 70B on Groq's ultra-fast inference",
                8192,
                ProviderKey::Groq,
            ),
            Model::builtin(
                "llama3-8b-8192",
                "Llama 3 8B (Groq)",
                "Faster Llama 3 8B model on Groq infrastructure",
                8192,
                ProviderKey::Groq,
            ),
            Model::builtin(
                "mixtral-8x7b-32768",
                "Mixtral 8x7B (Groq)",
                "Mistral's mixture-of-experts model on Groq",
                32768,
                ProviderKey::Groq,
            ),
            Model::builtin(
                "gemma-7b-it",
                "Gemma 7B (Groq)",
                "Google's Gemma 7B instruction-tuned on Groq",
                8192,
                ProviderKey::Groq,
            ),
        ];
        let default_index = models
            .iter()
            .position(|m| m.id == DEFAULT_MODEL_ID)
            .unwrap_or(0);
        Self {
            models,
            default_index,
        }
    }

    /// Build a registry from an arbitrary list. Returns None when `models` is empty.
    /// The default is `default_id` when present, else the first entry.
    pub fn from_models(models: Vec<Model>, default_id: &str) -> Option<Self> {
        if models.is_empty() {
            return None;
        }
        let default_index = models.iter().position(|m| m.id == default_id).unwrap_or(0);
        Some(Self {
            models,
            default_index,
        })
    }

    pub fn list(&self) -> &[Model] {
        &self.models
    }

    pub fn default_model(&self) -> &Model {
        &self.models[self.default_index]
    }

    pub fn find(&self, id: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Models whose id or display name contains `query` (case-insensitive).
    /// Returns all models when the query is empty.
    pub fn filter(&self, query: &str) -> Vec<&Model> {
        filter_models(&self.models, query)
    }

    /// Keep only models served by one of `providers`. Returns None if nothing is left.
    pub fn restricted_to(&self, providers: &[ProviderKey]) -> Option<Self> {
        let default_id = self.default_model().id.clone();
        let models = self
            .models
            .iter()
            .filter(|m| providers.contains(&m.provider))
            .cloned()
            .collect();
        Self::from_models(models, &default_id)
    }
}

/// Filter models by query (case-insensitive match on id or display name).
pub fn filter_models<'a>(models: &'a [Model], query: &str) -> Vec<&'a Model> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return models.iter().collect();
    }
    models
        .iter()
        .filter(|m| m.id.to_lowercase().contains(&q) || m.display_name.to_lowercase().contains(&q))
        .collect()
}
