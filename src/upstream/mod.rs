//! Transport seams for the generative text and image APIs.
//!
//! The pipeline only talks to these traits; [`OpenAiClient`] is the
//! reqwest-backed implementation, and tests substitute scripted fakes.

pub mod http;

use std::borrow::Cow;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::app::Result;

pub use http::OpenAiClient;

/// Chat-style message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A text-generation request: model plus system and user instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRequest {
    pub model: String,
    pub system: String,
    pub user: String,
}

impl TextRequest {
    pub fn messages(&self) -> Vec<Message> {
        vec![Message::system(&self.system), Message::user(&self.user)]
    }

    /// Same request with extra text appended to the user instruction.
    pub fn with_user_suffix(&self, suffix: &str) -> Self {
        Self {
            user: format!("{}{}", self.user, suffix),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
}

impl ImageRequest {
    /// DALL·E models only return inline data when asked for `b64_json`.
    pub fn wants_inline_data(&self) -> bool {
        self.model.to_ascii_lowercase().starts_with("dall-e")
    }
}

/// Raw HTTP reply, left uninterpreted so callers can apply their own status policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[async_trait]
pub trait TextApi {
    /// Structured-output call. Returns the decoded response body, whatever its shape.
    async fn respond(&self, request: &TextRequest) -> Result<Value>;

    /// Plain chat completion. Returns the single text payload of the first choice.
    async fn chat(&self, request: &TextRequest) -> Result<String>;
}

#[async_trait]
pub trait ImageApi {
    async fn generate(&self, request: &ImageRequest) -> Result<Reply>;

    /// Fetches a hosted image returned by [`ImageApi::generate`].
    async fn download(&self, url: &str) -> Result<Reply>;
}
