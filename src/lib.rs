//! # storyfeed
//!
//! Turns a topic into an illustrated short-story post and records it in an
//! RSS 2.0 feed.
//!
//! ## Architecture
//!
//! storyfeed is a single sequential pipeline:
//!
//! ```text
//! Story (text API) → Normalizer → Image (image API) → Post page → Feed store
//! ```
//!
//! - [`normalizer`]: Extracts `{title, story_html, image_prompt}` from whatever shape the text API returns
//! - [`image`]: Fetches the illustration, retrying transient failures and degrading to an SVG placeholder
//! - [`store`]: Loads, appends to, trims and atomically rewrites the bounded feed document
//! - [`publisher`]: Sequences the stages and writes the post page
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a commented config file
//! storyfeed config > storyfeed.toml
//!
//! # Publish one post
//! OPENAI_API_KEY=sk-... storyfeed publish --topic "a lighthouse keeper's last night"
//!
//! # Show what is in the feed
//! storyfeed list
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires the publisher from a
/// [`Config`](config::Config).
pub mod app;

/// Command-line interface using clap.
///
/// - `publish` - Generate a post and append it to the feed
/// - `init` - Create the feed document if missing
/// - `list` - List feed items
/// - `config` - Print the default configuration
pub mod cli;

/// Configuration loaded from `storyfeed.toml` plus environment overrides.
pub mod config;

/// Core domain models.
///
/// - [`StoryRecord`](domain::StoryRecord): The canonical story triple
/// - [`ImageAsset`](domain::ImageAsset): Illustration bytes and format
/// - [`FeedItem`](domain::FeedItem): One entry of the feed
pub mod domain;

/// Illustration acquisition with retry and placeholder fallback.
pub mod image;

/// Response normalization.
pub mod normalizer;

/// Orchestration of a publish run.
pub mod publisher;

/// Feed persistence.
///
/// - [`FeedStore`](store::FeedStore): Trait defining storage operations
/// - [`RssFileStore`](store::RssFileStore): File-backed implementation
pub mod store;

/// Story generation with a chat-completion fallback.
pub mod story;

/// HTTP transport to the generative APIs.
///
/// - [`TextApi`](upstream::TextApi) and [`ImageApi`](upstream::ImageApi): Async transport traits
/// - [`OpenAiClient`](upstream::OpenAiClient): reqwest-based implementation
pub mod upstream;
