//! Story generation: a structured-output call first, a chat completion second.

use std::sync::Arc;

use tracing::{info, warn};

use crate::app::{Result, StoryFeedError};
use crate::config::Config;
use crate::domain::StoryRecord;
use crate::normalizer::Normalizer;
use crate::upstream::{TextApi, TextRequest};

const SYSTEM_INSTRUCTION: &str =
    "You are a concise literary editor and illustration prompt-writer. Return strictly valid JSON.";

const FALLBACK_SUFFIX: &str = " Return only JSON.";

/// What to write about and how long it should be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryBrief {
    pub model: String,
    pub topic: String,
    pub min_words: u32,
    pub max_words: u32,
}

impl StoryBrief {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.openai.text_model.clone(),
            topic: config.story.topic.clone(),
            min_words: config.story.min_words,
            max_words: config.story.max_words,
        }
    }

    pub fn request(&self) -> TextRequest {
        let user = format!(
            "Write a {}-{} word story in clean HTML using only <h2>, <p>, <em>. \
             Topic: {}. Tone: vivid, eerie, cinematic. \
             Also produce a one-sentence illustration prompt (no camera brands; include subject, mood, composition, light) \
             and a short natural-language title. \
             Return only a JSON object with keys: title, story_html, image_prompt.",
            self.min_words, self.max_words, self.topic
        );

        TextRequest {
            model: self.model.clone(),
            system: SYSTEM_INSTRUCTION.to_string(),
            user,
        }
    }
}

pub struct StoryGenerator {
    api: Arc<dyn TextApi + Send + Sync>,
    normalizer: Normalizer,
    brief: StoryBrief,
}

impl StoryGenerator {
    pub fn new(api: Arc<dyn TextApi + Send + Sync>, brief: StoryBrief) -> Self {
        Self {
            api,
            normalizer: Normalizer::new(),
            brief,
        }
    }

    pub fn brief(&self) -> &StoryBrief {
        &self.brief
    }

    /// Produce a story record, falling back to the chat endpoint when the
    /// structured call fails or returns an unrecognized shape.
    pub async fn generate(&self) -> Result<StoryRecord> {
        let request = self.brief.request();
        info!(model = %request.model, topic = %self.brief.topic, "Requesting story");

        match self.primary(&request).await {
            Ok(record) => return Ok(record),
            Err(e @ StoryFeedError::Config(_)) => return Err(e),
            Err(e) => warn!(error = %e, "Structured response unusable, falling back to chat completion"),
        }

        let fallback = request.with_user_suffix(FALLBACK_SUFFIX);
        let text = match self.api.chat(&fallback).await {
            Ok(text) => text,
            Err(e @ StoryFeedError::Config(_)) => return Err(e),
            Err(e @ StoryFeedError::UpstreamFormat { .. }) => return Err(e),
            Err(e) => {
                return Err(StoryFeedError::UpstreamFormat {
                    message: "story JSON unavailable after chat fallback".into(),
                    snippet: crate::app::snippet(&e.to_string()),
                })
            }
        };

        self.normalizer.normalize_text(&text)
    }

    async fn primary(&self, request: &TextRequest) -> Result<StoryRecord> {
        let payload = self.api.respond(request).await?;
        self.normalizer.normalize(&payload)
    }
}
