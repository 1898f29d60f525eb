//! Configuration loaded from the environment (and `.env` via dotenv in main).

use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::core::models::ProviderKey;

pub const DEFAULT_XAI_BASE_URL: &str = "https://api.x.ai";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one provider.
#[derive(Clone)]
pub struct ProviderSettings {
    /// Base URL without the `/v1/chat/completions` suffix.
    pub base_url: String,
    pub api_key: String,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Providers with credentials. Providers without a key are absent.
    pub providers: BTreeMap<ProviderKey, ProviderSettings>,
    /// Model requested via `INTELLISERVE_MODEL` (validated against the registry later).
    /// None means the registry default for the configured providers.
    pub model_id: Option<String>,
    pub temperature: f32,
    /// Applied to both connect and whole-request timeouts.
    pub timeout: Duration,
}

impl Config {
    pub fn configured_providers(&self) -> Vec<ProviderKey> {
        self.providers.keys().copied().collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API key set: provide XAI_API_KEY and/or GROQ_API_KEY")]
    MissingApiKey,
    #[error("Invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
    #[error("Unknown model: {0} (run `intelliserve models` to list available models)")]
    UnknownModel(String),
}

fn api_key_var(key: ProviderKey) -> &'static str {
    match key {
        ProviderKey::XAi => "XAI_API_KEY",
        ProviderKey::Groq => "GROQ_API_KEY",
    }
}

fn base_url_var(key: ProviderKey) -> (&'static str, &'static str) {
    match key {
        ProviderKey::XAi => ("XAI_BASE_URL", DEFAULT_XAI_BASE_URL),
        ProviderKey::Groq => ("GROQ_BASE_URL", DEFAULT_GROQ_BASE_URL),
    }
}

/// True if the environment has a non-empty API key for `key`.
pub fn has_api_key(key: ProviderKey) -> bool {
    env::var(api_key_var(key))
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

/// Load configuration from environment. Returns an error if no API key is set.
pub fn load() -> Result<Config, ConfigError> {
    load_from(|name| env::var(name).ok())
}

/// Load configuration from an arbitrary variable lookup.
pub fn load_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let mut providers = BTreeMap::new();
    for key in ProviderKey::ALL {
        let Some(api_key) = get(api_key_var(key)) else {
            continue;
        };
        let (url_var, default_url) = base_url_var(key);
        let base_url = get(url_var)
            .unwrap_or_else(|| default_url.to_string())
            .trim_end_matches('/')
            .to_string();
        providers.insert(key, ProviderSettings { base_url, api_key });
    }
    if providers.is_empty() {
        return Err(ConfigError::MissingApiKey);
    }

    let model_id = get("INTELLISERVE_MODEL");

    let temperature = match get("INTELLISERVE_TEMPERATURE") {
        Some(raw) => match raw.parse::<f32>() {
            Ok(t) if (0.0..=2.0).contains(&t) => t,
            _ => {
                return Err(ConfigError::Invalid {
                    var: "INTELLISERVE_TEMPERATURE",
                    value: raw,
                });
            }
        },
        None => DEFAULT_TEMPERATURE,
    };

    let timeout = match get("INTELLISERVE_TIMEOUT_SECS") {
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(ConfigError::Invalid {
                    var: "INTELLISERVE_TIMEOUT_SECS",
                    value: raw,
                });
            }
        },
        None => DEFAULT_TIMEOUT,
    };

    Ok(Config {
        providers,
        model_id,
        temperature,
        timeout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn no_keys_is_an_error() {
        let err = load_from(lookup(&[("XAI_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
        assert!(err.to_string().contains("GROQ_API_KEY"));
    }

    #[test]
    fn defaults_with_single_provider() {
        let config = load_from(lookup(&[("GROQ_API_KEY", "gsk-test")])).unwrap();
        assert_eq!(config.configured_providers(), vec![ProviderKey::Groq]);
        let groq = &config.providers[&ProviderKey::Groq];
        assert_eq!(groq.base_url, DEFAULT_GROQ_BASE_URL);
        assert_eq!(groq.api_key, "gsk-test");
        assert_eq!(config.model_id, None);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn overrides_are_applied() {
        let config = load_from(lookup(&[
            ("XAI_API_KEY", "xai-test"),
            ("GROQ_API_KEY", "gsk-test"),
            ("XAI_BASE_URL", "http://localhost:9000/"),
            ("INTELLISERVE_MODEL", "grok-beta"),
            ("INTELLISERVE_TEMPERATURE", "0.2"),
            ("INTELLISERVE_TIMEOUT_SECS", "5"),
        ]))
        .unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(
            config.providers[&ProviderKey::XAi].base_url,
            "http://localhost:9000"
        );
        assert_eq!(config.model_id.as_deref(), Some("grok-beta"));
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = load_from(lookup(&[
            ("GROQ_API_KEY", "gsk-test"),
            ("INTELLISERVE_TIMEOUT_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "INTELLISERVE_TIMEOUT_SECS",
                ..
            }
        ));

        let err = load_from(lookup(&[
            ("GROQ_API_KEY", "gsk-test"),
            ("INTELLISERVE_TEMPERATURE", "hot"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("INTELLISERVE_TEMPERATURE"));
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = load_from(lookup(&[("GROQ_API_KEY", "gsk-secret")])).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("gsk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
