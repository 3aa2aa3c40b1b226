use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use storyfeed::app::{AppContext, Result, StoryFeedError};
use storyfeed::config::Config;
use storyfeed::store::FeedStore;
use storyfeed::upstream::{ImageApi, ImageRequest, Reply, TextApi, TextRequest};

struct FakeText {
    payload: Option<Value>,
    calls: AtomicUsize,
}

#[async_trait]
impl TextApi for FakeText {
    async fn respond(&self, _request: &TextRequest) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.payload
            .clone()
            .ok_or_else(|| StoryFeedError::UpstreamStatus {
                status: 500,
                snippet: "server error".into(),
            })
    }

    async fn chat(&self, _request: &TextRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StoryFeedError::UpstreamTransport("connection reset".into()))
    }
}

struct FakeImages {
    status: u16,
}

#[async_trait]
impl ImageApi for FakeImages {
    async fn generate(&self, _request: &ImageRequest) -> Result<Reply> {
        let body = if self.status == 200 {
            json!({ "data": [{ "b64_json": STANDARD.encode(b"\x89PNG fake") }] })
        } else {
            json!({ "error": { "message": "not allowed" } })
        };
        Ok(Reply {
            status: self.status,
            content_type: Some("application/json".into()),
            body: body.to_string().into_bytes(),
        })
    }

    async fn download(&self, url: &str) -> Result<Reply> {
        panic!("unexpected download of {}", url)
    }
}

fn responses_payload(title: &str) -> Value {
    let story = json!({
        "title": title,
        "story_html": "<h2>Night</h2><p>The lamp went <em>out</em> &amp; stayed dark.</p>",
        "image_prompt": "A lighthouse in fog, cold blue light"
    });
    json!({
        "id": "resp_123",
        "output": [
            { "type": "reasoning", "summary": [] },
            { "type": "message", "content": [{ "type": "output_text", "text": story.to_string() }] }
        ]
    })
}

fn config(docs: &Path, capacity: usize) -> Config {
    let mut config = Config::default();
    config.output.docs_dir = docs.to_path_buf();
    config.output.public_base_url = "https://stories.example.com/feed/".into();
    config.feed.capacity = capacity;
    config.image.backoff_base_ms = 0;
    config
}

fn context(config: Config, text: Option<Value>, image_status: u16) -> (AppContext, Arc<FakeText>) {
    let text = Arc::new(FakeText {
        payload: text,
        calls: AtomicUsize::new(0),
    });
    let images = Arc::new(FakeImages {
        status: image_status,
    });
    (AppContext::with_apis(config, text.clone(), images), text)
}

fn at(second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, second).unwrap()
}

#[tokio::test]
async fn test_topic_to_feed_item() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    let (ctx, _) = context(
        config(&docs, 10),
        Some(responses_payload("The Last Lighthouse!")),
        200,
    );

    let result = ctx.publisher.publish_at(at(0)).await.unwrap();

    assert_eq!(result.slug, "the-last-lighthouse-20240301-120000");
    assert_eq!(
        result.post_url,
        "https://stories.example.com/feed/posts/the-last-lighthouse-20240301-120000.html"
    );
    assert_eq!(
        result.image_url,
        "https://stories.example.com/feed/images/20240301-120000.png"
    );

    let image = fs::read(docs.join("images").join("20240301-120000.png")).unwrap();
    assert_eq!(image, b"\x89PNG fake");

    let page =
        fs::read_to_string(docs.join("posts").join(format!("{}.html", result.slug))).unwrap();
    assert!(page.contains("src=\"../images/20240301-120000.png\""));
    assert!(page.contains("<em>out</em>"));

    let items = ctx.publisher.store().load().unwrap().items();
    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.title, "The Last Lighthouse!");
    assert_eq!(item.link, result.post_url);
    assert_eq!(item.guid, result.post_url);
    let enclosure = item.enclosure.as_ref().unwrap();
    assert_eq!(enclosure.url, result.image_url);
    assert_eq!(enclosure.mime_type, "image/png");
    assert_eq!(enclosure.length, image.len() as u64);
    assert!(item
        .description
        .ends_with("<p><img src='https://stories.example.com/feed/images/20240301-120000.png' alt='illustration'/></p>"));
}

#[tokio::test]
async fn test_feed_is_readable_by_feed_parser() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    let (ctx, _) = context(config(&docs, 10), Some(responses_payload("Fog")), 200);

    let result = ctx.publisher.publish_at(at(0)).await.unwrap();

    let xml = fs::read(docs.join("feed.xml")).unwrap();
    let feed = feed_rs::parser::parse(&xml[..]).unwrap();
    assert_eq!(feed.entries.len(), 1);
    assert_eq!(feed.entries[0].links[0].href, result.post_url);
    assert_eq!(feed.title.unwrap().content, "Your Automated Stories");
}

#[tokio::test]
async fn test_forbidden_image_still_publishes() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    let (ctx, _) = context(config(&docs, 10), Some(responses_payload("Fog")), 403);

    let result = ctx.publisher.publish_at(at(5)).await.unwrap();

    assert!(result.image_url.ends_with("/images/20240301-120005.svg"));
    let svg = fs::read_to_string(docs.join("images").join("20240301-120005.svg")).unwrap();
    assert!(svg.contains("A lighthouse in fog, cold blue light"));

    let items = ctx.publisher.store().load().unwrap().items();
    assert_eq!(items.len(), 1);
    assert_eq!(
        items[0].enclosure.as_ref().unwrap().mime_type,
        "image/svg+xml"
    );
}

#[tokio::test]
async fn test_feed_stays_bounded_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    let capacity = 2;

    let mut slugs = Vec::new();
    for run in 0..(capacity as u32 + 3) {
        let (ctx, _) = context(
            config(&docs, capacity),
            Some(responses_payload(&format!("Run {}", run))),
            200,
        );
        slugs.push(ctx.publisher.publish_at(at(run)).await.unwrap().slug);
    }

    let (ctx, _) = context(config(&docs, capacity), None, 200);
    let items = ctx.publisher.store().load().unwrap().items();
    assert_eq!(items.len(), capacity);
    assert_eq!(items[0].title, "Run 3");
    assert_eq!(items[1].title, "Run 4");
    assert!(items[1].link.ends_with(&format!("{}.html", slugs[4])));
}

#[tokio::test]
async fn test_story_failure_leaves_feed_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    let (ctx, text) = context(config(&docs, 10), None, 200);

    ctx.publisher.store().ensure_initialized().unwrap();
    let before = fs::read(docs.join("feed.xml")).unwrap();

    let err = ctx.publisher.publish_at(at(0)).await.unwrap_err();

    assert!(matches!(err, StoryFeedError::UpstreamFormat { .. }));
    assert_eq!(text.calls.load(Ordering::SeqCst), 2);
    assert_eq!(fs::read(docs.join("feed.xml")).unwrap(), before);
    assert!(!docs.join("posts").exists());
}

#[tokio::test]
async fn test_corrupt_feed_aborts_before_upstream_calls() {
    let dir = tempfile::tempdir().unwrap();
    let docs = dir.path().join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::write(docs.join("feed.xml"), "<rss version=\"2.0\"></rss>").unwrap();

    let (ctx, text) = context(config(&docs, 10), Some(responses_payload("Fog")), 200);
    let err = ctx.publisher.publish_at(at(0)).await.unwrap_err();

    assert!(matches!(err, StoryFeedError::FeedCorruption { .. }));
    assert_eq!(text.calls.load(Ordering::SeqCst), 0);
}
