//! Post publishing pipeline.
//!
//! ```text
//! ensure feed → load feed → story → illustration → post page → feed item → trim → persist
//! ```
//!
//! Any failure before `persist` leaves the stored feed untouched. Two runs in
//! the same second whose titles sanitize to the same slug base produce the
//! same slug; the second overwrites the first post page.

mod render;
mod slug;
mod summary;

pub use render::{feed_description, render_post};
pub use slug::{slugify, FALLBACK_SLUG, SLUG_MAX_LEN};

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::app::Result;
use crate::config::Config;
use crate::domain::{Enclosure, FeedItem, PublishResult};
use crate::image::ImageAcquirer;
use crate::store::FeedStore;
use crate::story::StoryGenerator;

/// Where files are written and the URLs they are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub docs_dir: PathBuf,
    pub base_url: String,
}

impl OutputLayout {
    pub fn new(docs_dir: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            docs_dir: docs_dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.output.docs_dir, config.base_url())
    }

    pub fn posts_dir(&self) -> PathBuf {
        self.docs_dir.join("posts")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.docs_dir.join("images")
    }

    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/posts/{}.html", self.base_url, slug)
    }

    pub fn image_url(&self, file_name: &str) -> String {
        format!("{}/images/{}", self.base_url, file_name)
    }

    /// Image reference as seen from a page in `posts/`.
    pub fn relative_image_src(file_name: &str) -> String {
        format!("../images/{}", file_name)
    }
}

pub struct PostPublisher<S: FeedStore> {
    stories: StoryGenerator,
    images: ImageAcquirer,
    store: S,
    layout: OutputLayout,
    capacity: usize,
    summary_path: Option<PathBuf>,
}

impl<S: FeedStore> PostPublisher<S> {
    pub fn new(
        stories: StoryGenerator,
        images: ImageAcquirer,
        store: S,
        layout: OutputLayout,
        capacity: usize,
    ) -> Self {
        Self {
            stories,
            images,
            store,
            layout,
            capacity,
            summary_path: None,
        }
    }

    pub fn with_summary_path(mut self, path: Option<PathBuf>) -> Self {
        self.summary_path = path;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub async fn publish(&self) -> Result<PublishResult> {
        self.publish_at(Utc::now()).await
    }

    /// Run the whole pipeline as of `now`.
    pub async fn publish_at(&self, now: DateTime<Utc>) -> Result<PublishResult> {
        if self.store.ensure_initialized()? {
            info!("Initialized empty feed");
        }
        // Loaded up front so a corrupt feed aborts before any upstream call.
        let mut document = self.store.load()?;

        let story = self.stories.generate().await?;
        info!(title = %story.title, "Story ready");

        let image = self.images.acquire(&story.image_prompt).await?;
        if image.is_placeholder() {
            warn!("Publishing with placeholder illustration");
        }

        let timestamp = now.format("%Y%m%d-%H%M%S").to_string();
        let slug = format!("{}-{}", slugify(&story.title), timestamp);
        let image_file = format!("{}.{}", timestamp, image.format.extension());

        let image_url = self.layout.image_url(&image_file);
        let post_url = self.layout.post_url(&slug);

        write_file(&self.layout.images_dir(), &image_file, &image.bytes)?;
        let page = render_post(
            &story,
            &OutputLayout::relative_image_src(&image_file),
            &self.layout.base_url,
        );
        write_file(
            &self.layout.posts_dir(),
            &format!("{}.html", slug),
            page.as_bytes(),
        )?;

        let item = FeedItem::new(
            &story.title,
            &post_url,
            feed_description(&story.story_html, &image_url),
            Enclosure {
                url: image_url.clone(),
                mime_type: image.format.mime_type().to_string(),
                length: image.bytes.len() as u64,
            },
            now,
        );
        document.append_item(&item, now);
        let evicted = document.trim(self.capacity);
        if evicted > 0 {
            info!(evicted, capacity = self.capacity, "Trimmed oldest feed items");
        }
        self.store.persist(&document)?;

        let result = PublishResult {
            slug,
            post_url,
            image_url,
        };
        info!(post_url = %result.post_url, "New post published");

        if let Some(path) = &self.summary_path {
            if let Err(e) = summary::append(path, &story.title, &result) {
                warn!(error = %e, path = %path.display(), "Could not write run summary");
            }
        }

        Ok(result)
    }
}

fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(name), bytes)?;
    Ok(())
}
