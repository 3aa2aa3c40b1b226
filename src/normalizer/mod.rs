//! Extraction of the canonical story triple from loosely shaped API payloads.
//!
//! Providers wrap the `{title, story_html, image_prompt}` object in several
//! different layouts. Each layout is handled by one shape matcher; matchers
//! are tried in order and the first one that yields a complete record wins.
//! Supporting a new layout means appending to [`SHAPE_MATCHERS`].

use serde_json::Value;
use tracing::debug;

use crate::app::{snippet, Result, StoryFeedError};
use crate::domain::StoryRecord;

pub const REQUIRED_KEYS: [&str; 3] = ["title", "story_html", "image_prompt"];

/// Key under which some providers nest the story object.
pub const WRAPPER_KEY: &str = "output";

/// A strategy for locating the story triple within one response layout.
pub type ShapeMatcher = fn(&Value) -> Option<StoryRecord>;

pub const SHAPE_MATCHERS: &[(&str, ShapeMatcher)] = &[
    ("top-level object", match_top_level),
    ("wrapped object", match_wrapped),
    ("output items", match_output_items),
    ("content segments", match_content_segments),
    ("output text", match_output_text),
];

#[derive(Clone, Debug, Default)]
pub struct Normalizer;

impl Normalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a decoded API response body.
    pub fn normalize(&self, payload: &Value) -> Result<StoryRecord> {
        for (shape, matcher) in SHAPE_MATCHERS {
            if let Some(record) = matcher(payload) {
                debug!(shape, "Matched response shape");
                return Ok(record);
            }
        }

        Err(StoryFeedError::UpstreamFormat {
            message: "no known response shape carried title, story_html and image_prompt"
                .into(),
            snippet: snippet(&payload.to_string()),
        })
    }

    /// Normalize a single text payload that should contain the story object as JSON.
    pub fn normalize_text(&self, text: &str) -> Result<StoryRecord> {
        record_from_text(text).ok_or_else(|| {
            StoryFeedError::upstream_format(
                "text payload is not a JSON object with title, story_html and image_prompt",
                text,
            )
        })
    }
}

/// A complete record from an object holding all required keys, if any.
fn record_from_object(value: &Value) -> Option<StoryRecord> {
    let object = value.as_object()?;
    if !REQUIRED_KEYS.iter().all(|key| object.contains_key(*key)) {
        return None;
    }

    let title = object.get("title").and_then(Value::as_str);
    let story_html = object.get("story_html")?.as_str()?;
    let image_prompt = object.get("image_prompt")?.as_str()?;

    StoryRecord::new(title, story_html, image_prompt)
}

fn record_from_text(text: &str) -> Option<StoryRecord> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    let parsed: Value = serde_json::from_str(text).ok()?;
    record_from_object(&parsed)
}

/// A segment's `text` may be the object itself or a JSON string encoding it.
fn record_from_segment(segment: &Value) -> Option<StoryRecord> {
    match segment.get("text")? {
        Value::String(text) => record_from_text(text),
        object @ Value::Object(_) => record_from_object(object),
        _ => None,
    }
}

fn record_from_segments(segments: &Value) -> Option<StoryRecord> {
    segments.as_array()?.iter().find_map(record_from_segment)
}

fn match_top_level(payload: &Value) -> Option<StoryRecord> {
    record_from_object(payload)
}

fn match_wrapped(payload: &Value) -> Option<StoryRecord> {
    let wrapped = payload.get(WRAPPER_KEY).filter(|v| v.is_object())?;
    record_from_object(wrapped).or_else(|| record_from_segments(wrapped.get("content")?))
}

fn match_output_items(payload: &Value) -> Option<StoryRecord> {
    payload
        .get(WRAPPER_KEY)?
        .as_array()?
        .iter()
        .find_map(|item| record_from_segments(item.get("content")?))
}

fn match_content_segments(payload: &Value) -> Option<StoryRecord> {
    match payload {
        Value::Array(_) => record_from_segments(payload),
        _ => record_from_segments(payload.get("content")?),
    }
}

fn match_output_text(payload: &Value) -> Option<StoryRecord> {
    record_from_text(payload.get("output_text")?.as_str()?)
}
