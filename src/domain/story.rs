use serde::{Deserialize, Serialize};

/// Title used when the upstream response omits one or leaves it blank.
pub const DEFAULT_TITLE: &str = "Automated Story";

/// The canonical `{title, story_html, image_prompt}` triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub title: String,
    pub story_html: String,
    pub image_prompt: String,
}

impl StoryRecord {
    /// Builds a record, or `None` when the story or the image prompt is empty.
    pub fn new(title: Option<&str>, story_html: &str, image_prompt: &str) -> Option<Self> {
        if story_html.trim().is_empty() || image_prompt.trim().is_empty() {
            return None;
        }

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);

        Some(Self {
            title: title.to_string(),
            story_html: story_html.to_string(),
            image_prompt: image_prompt.to_string(),
        })
    }
}
