//! Chat messages shown in a conversation.

use chrono::{DateTime, Utc};

use crate::core::models::Model;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Assistant,
}

/// One entry in the conversation log. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub text: String,
    pub author: Author,
    /// Model that produced the reply; empty for user messages.
    pub model_id: String,
    /// Display name of that model; empty for user messages.
    pub model_name: String,
    pub created_at: DateTime<Utc>,
    /// Set on failed assistant turns; `text` then holds the user-visible description.
    pub error: Option<String>,
}

impl Message {
    fn new(text: String, author: Author, model: Option<&Model>, error: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            author,
            model_id: model.map(|m| m.id.clone()).unwrap_or_default(),
            model_name: model.map(|m| m.display_name.clone()).unwrap_or_default(),
            created_at: Utc::now(),
            error,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(text.into(), Author::User, None, None)
    }

    pub fn assistant(text: impl Into<String>, model: &Model) -> Self {
        Self::new(text.into(), Author::Assistant, Some(model), None)
    }

    /// Assistant-authored message describing a failed turn.
    pub fn assistant_error(error: impl std::fmt::Display, model: &Model) -> Self {
        let description = error.to_string();
        Self::new(
            format!("Error: {}", description),
            Author::Assistant,
            Some(model),
            Some(description),
        )
    }

    pub fn is_user(&self) -> bool {
        self.author == Author::User
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
