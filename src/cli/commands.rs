use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::store::{FeedStore, RssFileStore};

/// Apply command-line overrides on top of the loaded configuration.
pub fn apply_publish_overrides(
    config: &mut Config,
    topic: Option<String>,
    capacity: Option<usize>,
) -> Result<()> {
    if let Some(topic) = topic.filter(|t| !t.trim().is_empty()) {
        config.story.topic = topic;
    }
    if let Some(capacity) = capacity {
        config.feed.capacity = capacity;
    }
    config.validate()?;
    Ok(())
}

pub async fn publish(config: Config) -> Result<()> {
    let ctx = AppContext::new(config)?;
    let result = ctx.publisher.publish().await?;

    println!("Published: {}", result.post_url);
    println!("Image: {}", result.image_url);
    Ok(())
}

pub fn init(config: &Config) -> Result<()> {
    let store = RssFileStore::from_config(config);

    if store.ensure_initialized()? {
        println!("Created feed: {}", store.path().display());
    } else {
        // Surface corruption now rather than on the next publish.
        let document = store.load()?;
        println!(
            "Feed already exists: {} ({} items)",
            store.path().display(),
            document.len()
        );
    }
    Ok(())
}

pub fn list(config: &Config) -> Result<()> {
    let store = RssFileStore::from_config(config);

    if !store.path().exists() {
        println!("No feed at {}", store.path().display());
        return Ok(());
    }

    let items = store.load()?.items();
    if items.is_empty() {
        println!("No items");
        return Ok(());
    }

    for item in items {
        println!("{}\n  {}\n  {}", item.display_title(), item.pub_date, item.link);
    }
    Ok(())
}

pub fn print_default_config() {
    print!("{}", Config::default_config_content());
}
