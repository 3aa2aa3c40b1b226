use serde::{Deserialize, Serialize};

/// Where a freshly published post and its illustration can be found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishResult {
    pub slug: String,
    pub post_url: String,
    pub image_url: String,
}
