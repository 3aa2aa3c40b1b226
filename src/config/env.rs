//! Environment variable overrides.

use std::path::PathBuf;
use std::str::FromStr;

use super::{Config, ConfigError};

impl Config {
    /// Apply overrides from `lookup` (normally the process environment).
    ///
    /// Empty values are ignored; unparsable numbers are an error.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("OPENAI_API_KEY") {
            self.openai.api_key = Some(key);
        }
        if let Some(model) = get("MODEL") {
            self.openai.text_model = model;
        }
        if let Some(model) = get("IMG_MODEL") {
            self.openai.image_model = model;
        }
        if let Some(topic) = get("POST_TOPIC") {
            self.story.topic = topic;
        }
        if let Some(value) = get("POST_MIN_WORDS") {
            self.story.min_words = parse("POST_MIN_WORDS", &value)?;
        }
        if let Some(value) = get("POST_MAX_WORDS") {
            self.story.max_words = parse("POST_MAX_WORDS", &value)?;
        }
        if let Some(size) = get("IMG_SIZE") {
            self.image.size = size;
        }
        if let Some(url) = get("PUBLIC_BASE_URL") {
            self.output.public_base_url = url;
        }
        if let Some(value) = get("MAX_FEED_POSTS") {
            self.feed.capacity = parse("MAX_FEED_POSTS", &value)?;
        }
        if let Some(path) = get("GITHUB_STEP_SUMMARY") {
            self.output.summary_path = Some(PathBuf::from(path));
        }

        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride {
            key: key.to_string(),
            value: value.to_string(),
        })
}
