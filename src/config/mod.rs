//! Configuration management for storyfeed.
//!
//! Configuration is read once, at startup, from a TOML file (`storyfeed.toml`
//! unless `--config` says otherwise). A missing file means all defaults.
//! Environment variables are applied on top of the file, then the result is
//! validated and handed to the components that need it.

pub mod env;
pub mod sections;

pub use sections::{FeedConfig, ImageConfig, OpenAiConfig, OutputConfig, StoryConfig};

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::app::{Result, StoryFeedError};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub story: StoryConfig,
    pub image: ImageConfig,
    pub feed: FeedConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from `path`, apply environment overrides and validate.
    ///
    /// A missing file is not an error; an unreadable or invalid one is.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.story.min_words > self.story.max_words {
            return Err(ConfigError::Invalid(format!(
                "story.min_words ({}) exceeds story.max_words ({})",
                self.story.min_words, self.story.max_words
            )));
        }
        if self.feed.capacity == 0 {
            return Err(ConfigError::Invalid("feed.capacity must be at least 1".into()));
        }
        if self.image.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "image.max_attempts must be at least 1".into(),
            ));
        }

        let base = Url::parse(&self.output.public_base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "output.public_base_url {:?} is not a URL: {}",
                self.output.public_base_url, e
            ))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "output.public_base_url must be http(s), got {}",
                base.scheme()
            )));
        }

        Ok(())
    }

    /// The bearer token for the generative APIs.
    pub fn api_key(&self) -> Result<&str> {
        self.openai
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| StoryFeedError::Config("OPENAI_API_KEY is not set".into()))
    }

    /// Public base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.output.public_base_url.trim_end_matches('/')
    }

    pub fn feed_path(&self) -> PathBuf {
        self.output.docs_dir.join("feed.xml")
    }

    /// Generate the default config file content with comments.
    pub fn default_config_content() -> String {
        r##"# storyfeed configuration
#
# Every value below is optional; omitted keys use the defaults shown.
# Environment variables override the file:
#   OPENAI_API_KEY, MODEL, IMG_MODEL, POST_TOPIC, POST_MIN_WORDS,
#   POST_MAX_WORDS, IMG_SIZE, PUBLIC_BASE_URL, MAX_FEED_POSTS,
#   GITHUB_STEP_SUMMARY

[openai]
# Prefer the OPENAI_API_KEY environment variable over storing the key here.
# api_key = "sk-..."
api_base = "https://api.openai.com/v1"
text_model = "gpt-5"
image_model = "dall-e-2"
text_timeout_secs = 120
image_timeout_secs = 90

[story]
topic = "a horror story in three sentences"
min_words = 10
max_words = 55

[image]
size = "1024x1024"
# Attempts for transient (5xx / timeout) failures, with linear backoff
max_attempts = 3
backoff_base_ms = 2000

[feed]
title = "Your Automated Stories"
description = "Auto-generated stories"
# Number of most recent items kept in feed.xml
capacity = 99

[output]
docs_dir = "docs"
public_base_url = "https://example.com/story-feed"
# Markdown run summary is appended here when set
# summary_path = "summary.md"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value {value:?} for {key}")]
    InvalidOverride { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for StoryFeedError {
    fn from(err: ConfigError) -> Self {
        StoryFeedError::Config(err.to_string())
    }
}
