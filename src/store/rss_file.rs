use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use crate::app::{Result, StoryFeedError};
use crate::config::Config;
use crate::domain::ChannelMeta;
use crate::store::{FeedDocument, FeedStore};

/// Feed document stored as an XML file.
///
/// Writes go to a sibling staging file that is then renamed over the target,
/// so readers see either the previous document or the new one in full.
pub struct RssFileStore {
    path: PathBuf,
    channel: ChannelMeta,
}

impl RssFileStore {
    pub fn new(path: impl Into<PathBuf>, channel: ChannelMeta) -> Self {
        Self {
            path: path.into(),
            channel,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let channel = ChannelMeta {
            title: config.feed.title.clone(),
            link: format!("{}/", config.base_url()),
            description: config.feed.description.clone(),
        };
        Self::new(config.feed_path(), channel)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_else(|| OsString::from("feed.xml"));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl FeedStore for RssFileStore {
    fn ensure_initialized(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }

        info!(path = %self.path.display(), "Creating feed document");
        self.persist(&FeedDocument::new(&self.channel, Utc::now()))?;
        Ok(true)
    }

    fn load(&self) -> Result<FeedDocument> {
        let file = File::open(&self.path)?;
        let document = FeedDocument::read_from(BufReader::new(file)).map_err(|e| {
            StoryFeedError::FeedCorruption {
                path: self.path.clone(),
                reason: e.to_string(),
            }
        })?;

        debug!(path = %self.path.display(), items = document.len(), "Loaded feed");
        Ok(document)
    }

    fn persist(&self, document: &FeedDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let xml = document.to_xml()?;
        let staging = self.staging_path();
        {
            let mut file = File::create(&staging)?;
            file.write_all(&xml)?;
            file.sync_all()?;
        }
        fs::rename(&staging, &self.path)?;

        debug!(path = %self.path.display(), items = document.len(), "Persisted feed");
        Ok(())
    }
}
