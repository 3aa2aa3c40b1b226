pub mod feed;
pub mod image;
pub mod post;
pub mod story;

pub use feed::{format_feed_date, parse_feed_date, ChannelMeta, Enclosure, FeedItem};
pub use image::{ImageAsset, ImageFormat};
pub use post::PublishResult;
pub use story::{StoryRecord, DEFAULT_TITLE};
