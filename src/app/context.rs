use std::sync::Arc;

use crate::app::Result;
use crate::config::Config;
use crate::image::ImageAcquirer;
use crate::publisher::{OutputLayout, PostPublisher};
use crate::store::RssFileStore;
use crate::story::{StoryBrief, StoryGenerator};
use crate::upstream::{ImageApi, OpenAiClient, TextApi};

/// Everything a publish run needs, built once from the configuration.
pub struct AppContext {
    pub config: Config,
    pub publisher: PostPublisher<RssFileStore>,
}

impl AppContext {
    /// Wire the pipeline against the real API. Fails if no API key is configured.
    pub fn new(config: Config) -> Result<Self> {
        let client = Arc::new(OpenAiClient::from_config(&config)?);
        Ok(Self::with_apis(config, client.clone(), client))
    }

    /// Wire the pipeline against arbitrary transports.
    pub fn with_apis(
        config: Config,
        text: Arc<dyn TextApi + Send + Sync>,
        images: Arc<dyn ImageApi + Send + Sync>,
    ) -> Self {
        let stories = StoryGenerator::new(text, StoryBrief::from_config(&config));
        let images = ImageAcquirer::from_config(images, &config);
        let store = RssFileStore::from_config(&config);

        let publisher = PostPublisher::new(
            stories,
            images,
            store,
            OutputLayout::from_config(&config),
            config.feed.capacity,
        )
        .with_summary_path(config.output.summary_path.clone());

        Self { config, publisher }
    }
}
