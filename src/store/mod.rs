pub mod document;
pub mod rss_file;

use crate::app::Result;

pub use document::FeedDocument;
pub use rss_file::RssFileStore;

/// Durable home of a single feed document.
///
/// A publish run is one read-modify-write cycle: `ensure_initialized`,
/// `load`, mutate the [`FeedDocument`], `persist`. Only one writer is
/// expected at a time.
pub trait FeedStore {
    /// Create an empty document if none exists. Returns whether one was created.
    fn ensure_initialized(&self) -> Result<bool>;

    fn load(&self) -> Result<FeedDocument>;

    /// Replace the stored document with `document`.
    fn persist(&self, document: &FeedDocument) -> Result<()>;
}
