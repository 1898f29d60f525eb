//! Chat and provider error types.

/// Failure of a single provider round trip.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Connection refused, DNS failure, timeout.
    #[error("network error: {0}")]
    Transport(String),
    /// Non-2xx response.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// Response body was not a valid chat completion.
    #[error("invalid response: {0}")]
    Decode(String),
    /// The HTTP client could not be constructed.
    #[error("client setup failed: {0}")]
    Client(String),
}

impl ProviderError {
    /// True for failures a later attempt might not hit (timeouts, 429, 5xx).
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderError::Transport(_) => true,
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Decode(_) | ProviderError::Client(_) => false,
        }
    }

    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else if e.is_builder() {
            ProviderError::Client(e.to_string())
        } else {
            ProviderError::Transport(e.to_string())
        }
    }
}

/// Errors surfaced by the chat router.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// No provider client is registered for the model's provider.
    #[error("Unsupported model: {model_id} (no {provider} provider configured)")]
    UnsupportedModel { model_id: String, provider: String },
    #[error("Failed to get response from {model}: {source}")]
    Provider {
        model: String,
        #[source]
        source: ProviderError,
    },
    /// The request was cancelled by the user.
    #[error("Request cancelled")]
    Cancelled,
    /// The task running the request panicked or was aborted.
    #[error("Request failed: {0}")]
    Aborted(String),
}

impl ChatError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChatError::Provider { source, .. } if source.is_retryable())
    }
}

/// Extract the human-readable part of an OpenAI-style error body
/// (`{"error":{"message":"..."}}`). Falls back to the raw body, truncated.
pub(crate) fn extract_api_message(body: &str) -> String {
    const MAX_LEN: usize = 300;
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(msg) = value
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(|m| m.as_str())
    {
        return msg.to_string();
    }
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX_LEN {
        let truncated: String = trimmed.chars().take(MAX_LEN).collect();
        format!("{}…", truncated)
    } else if trimmed.is_empty() {
        "empty response body".to_string()
    } else {
        trimmed.to_string()
    }
}
