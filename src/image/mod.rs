//! Illustration acquisition with retry and graceful degradation.
//!
//! ```text
//! generate ─┬─ data[0].b64_json → png
//!           ├─ data[0].url      → download → format from Content-Type
//!           └─ anything else    → placeholder svg
//! ```
//!
//! Transient failures (5xx, timeouts, network errors) are retried with linear
//! backoff. Authorization failures, rejected requests and exhausted retries all
//! degrade to a placeholder. Only configuration errors are returned.

mod placeholder;
mod retry;

pub use placeholder::{placeholder, EXCERPT_LIMIT};
pub use retry::RetryPolicy;

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tracing::{info, warn};

use crate::app::{snippet, Result, StoryFeedError};
use crate::config::Config;
use crate::domain::{ImageAsset, ImageFormat};
use crate::upstream::{ImageApi, ImageRequest, Reply};

pub struct ImageAcquirer {
    api: Arc<dyn ImageApi + Send + Sync>,
    model: String,
    size: String,
    retry: RetryPolicy,
}

impl ImageAcquirer {
    pub fn new(
        api: Arc<dyn ImageApi + Send + Sync>,
        model: impl Into<String>,
        size: impl Into<String>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            api,
            model: model.into(),
            size: size.into(),
            retry,
        }
    }

    pub fn from_config(api: Arc<dyn ImageApi + Send + Sync>, config: &Config) -> Self {
        Self::new(
            api,
            &config.openai.image_model,
            &config.image.size,
            RetryPolicy::from_config(config),
        )
    }

    /// Obtain an illustration for `prompt`. Never fails for upstream trouble.
    pub async fn acquire(&self, prompt: &str) -> Result<ImageAsset> {
        let request = ImageRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            size: self.size.clone(),
        };
        let max_attempts = self.retry.max_attempts;

        for attempt in 1..=max_attempts {
            info!(attempt, max_attempts, model = %self.model, "Requesting illustration");

            match self.attempt(&request).await {
                Ok(asset) => return Ok(asset),
                Err(e @ StoryFeedError::Config(_)) => return Err(e),
                Err(StoryFeedError::Permission { status, snippet }) => {
                    warn!(status, body = %snippet, "Image API denied access, using placeholder");
                    return Ok(placeholder(prompt));
                }
                Err(e) if e.is_transient() => {
                    warn!(attempt, error = %e, "Transient image API failure");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.retry.delay_for(attempt)).await;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Image API failed, using placeholder");
                    return Ok(placeholder(prompt));
                }
            }
        }

        warn!(max_attempts, "Image API failed after retries, using placeholder");
        Ok(placeholder(prompt))
    }

    async fn attempt(&self, request: &ImageRequest) -> Result<ImageAsset> {
        let reply = check_status(self.api.generate(request).await?)?;
        let payload = reply.json()?;
        let data = payload.pointer("/data/0");

        let inline = data
            .and_then(|d| d.get("b64_json"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        if let Some(encoded) = inline {
            let bytes = STANDARD.decode(encoded.trim()).map_err(|e| {
                StoryFeedError::upstream_format(format!("invalid base64 image data: {}", e), "")
            })?;
            return Ok(ImageAsset::new(bytes, ImageFormat::Png));
        }

        let hosted = data
            .and_then(|d| d.get("url"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        if let Some(url) = hosted {
            let image = check_status(self.api.download(url).await?)?;
            let format = ImageFormat::from_content_type(image.content_type.as_deref());
            return Ok(ImageAsset::new(image.body, format));
        }

        Err(StoryFeedError::upstream_format(
            "image response carried neither b64_json nor url",
            &payload.to_string(),
        ))
    }
}

fn check_status(reply: Reply) -> Result<Reply> {
    match reply.status {
        200..=299 => Ok(reply),
        401 | 403 => Err(StoryFeedError::Permission {
            status: reply.status,
            snippet: snippet(&reply.text()),
        }),
        status => Err(StoryFeedError::UpstreamStatus {
            status,
            snippet: snippet(&reply.text()),
        }),
    }
}
