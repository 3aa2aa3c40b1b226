use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// RSS dates are always written in UTC with a literal `+0000` offset.
pub const FEED_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

pub fn format_feed_date(at: DateTime<Utc>) -> String {
    at.format(FEED_DATE_FORMAT).to_string()
}

pub fn parse_feed_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Channel-level metadata used when a feed document is first created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMeta {
    pub title: String,
    pub link: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    pub url: String,
    pub mime_type: String,
    pub length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub pub_date: String,
    /// HTML payload, stored as a CDATA block.
    pub description: String,
    pub enclosure: Option<Enclosure>,
}

impl FeedItem {
    /// Builds a new item whose link and guid are both the post URL.
    pub fn new(
        title: &str,
        post_url: &str,
        description: String,
        enclosure: Enclosure,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.to_string(),
            link: post_url.to_string(),
            guid: post_url.to_string(),
            pub_date: format_feed_date(published_at),
            description,
            enclosure: Some(enclosure),
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }
}

impl From<&FeedItem> for rss::Item {
    fn from(item: &FeedItem) -> Self {
        let mut guid = rss::Guid::default();
        guid.set_value(item.guid.clone());
        guid.set_permalink(true);

        let mut out = rss::Item::default();
        out.set_title(item.title.clone());
        out.set_link(item.link.clone());
        out.set_guid(guid);
        out.set_pub_date(item.pub_date.clone());
        out.set_description(item.description.clone());

        if let Some(enclosure) = &item.enclosure {
            let mut rss_enclosure = rss::Enclosure::default();
            rss_enclosure.set_url(enclosure.url.clone());
            rss_enclosure.set_mime_type(enclosure.mime_type.clone());
            rss_enclosure.set_length(enclosure.length.to_string());
            out.set_enclosure(rss_enclosure);
        }

        out
    }
}

impl From<&rss::Item> for FeedItem {
    fn from(item: &rss::Item) -> Self {
        Self {
            title: item.title().unwrap_or_default().to_string(),
            link: item.link().unwrap_or_default().to_string(),
            guid: item.guid().map(|g| g.value().to_string()).unwrap_or_default(),
            pub_date: item.pub_date().unwrap_or_default().to_string(),
            description: item.description().unwrap_or_default().to_string(),
            enclosure: item.enclosure().map(|e| Enclosure {
                url: e.url().to_string(),
                mime_type: e.mime_type().to_string(),
                length: e.length().parse().unwrap_or(0),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_item() -> FeedItem {
        FeedItem::new(
            "Fog",
            "https://example.com/posts/fog-20240101-000000.html",
            "<p>Hi</p>".into(),
            Enclosure {
                url: "https://example.com/images/20240101-000000.png".into(),
                mime_type: "image/png".into(),
                length: 42,
            },
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_link_and_guid_match() {
        let item = sample_item();
        assert_eq!(item.link, item.guid);
        assert_eq!(item.pub_date, "Mon, 01 Jan 2024 00:00:00 +0000");
    }

    #[test]
    fn test_rss_conversion_keeps_fields() {
        let item = sample_item();
        let rss_item = rss::Item::from(&item);
        assert_eq!(FeedItem::from(&rss_item), item);
    }

    #[test]
    fn test_parse_feed_date() {
        let parsed = parse_feed_date("Mon, 01 Jan 2024 00:00:00 +0000").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert!(parse_feed_date("yesterday").is_none());
    }
}
