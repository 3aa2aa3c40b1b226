use std::path::PathBuf;

use thiserror::Error;

/// Upper bound on how much of an upstream payload is echoed into errors and logs.
pub const SNIPPET_LIMIT: usize = 800;

#[derive(Error, Debug)]
pub enum StoryFeedError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unrecognized upstream response: {message} (payload: {snippet})")]
    UpstreamFormat { message: String, snippet: String },

    #[error("Upstream transport error: {0}")]
    UpstreamTransport(String),

    #[error("Upstream returned HTTP {status}: {snippet}")]
    UpstreamStatus { status: u16, snippet: String },

    #[error("Permission denied by upstream (HTTP {status}): {snippet}")]
    Permission { status: u16, snippet: String },

    #[error("Feed document at {path} is corrupt: {reason}")]
    FeedCorruption { path: PathBuf, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feed error: {0}")]
    Feed(String),
}

impl StoryFeedError {
    pub fn upstream_format(message: impl Into<String>, payload: &str) -> Self {
        Self::UpstreamFormat {
            message: message.into(),
            snippet: snippet(payload),
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::UpstreamTransport(_) => true,
            Self::UpstreamStatus { status, .. } => *status >= 500,
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            _ => false,
        }
    }
}

/// Truncates `text` to at most [`SNIPPET_LIMIT`] characters.
pub fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_LIMIT).collect()
}

pub type Result<T> = std::result::Result<T, StoryFeedError>;
