use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Generative API access.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// Bearer token. Usually supplied through `OPENAI_API_KEY`.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub api_base: String,

    /// Model for the story text (default: "gpt-5")
    pub text_model: String,

    /// Model for the illustration (default: "dall-e-2")
    pub image_model: String,

    pub text_timeout_secs: u64,

    pub image_timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: "https://api.openai.com/v1".to_string(),
            text_model: "gpt-5".to_string(),
            image_model: "dall-e-2".to_string(),
            text_timeout_secs: 120,
            image_timeout_secs: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryConfig {
    pub topic: String,
    pub min_words: u32,
    pub max_words: u32,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            topic: "a horror story in three sentences".to_string(),
            min_words: 10,
            max_words: 55,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Requested dimensions, e.g. "1024x1024"
    pub size: String,

    /// Attempts made for transient failures before falling back to a placeholder
    pub max_attempts: u32,

    /// Linear backoff unit: the wait after attempt `n` is `n * backoff_base_ms`
    pub backoff_base_ms: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            size: "1024x1024".to_string(),
            max_attempts: 3,
            backoff_base_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub title: String,
    pub description: String,

    /// Maximum number of items retained in the feed document
    pub capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Your Automated Stories".to_string(),
            description: "Auto-generated stories".to_string(),
            capacity: 99,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root of the published site; holds `posts/`, `images/` and `feed.xml`
    pub docs_dir: PathBuf,

    /// Absolute URL the docs directory is served from
    pub public_base_url: String,

    /// Optional markdown file a run summary is appended to
    pub summary_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs"),
            public_base_url: "https://example.com/story-feed".to_string(),
            summary_path: None,
        }
    }
}
