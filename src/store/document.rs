use std::io::BufRead;

use chrono::{DateTime, Utc};
use rss::Channel;

use crate::app::{Result, StoryFeedError};
use crate::domain::{format_feed_date, parse_feed_date, ChannelMeta, FeedItem};

/// An RSS 2.0 feed held in memory.
///
/// Items are kept in document order, which is also chronological order:
/// the oldest item comes first and new items are appended at the end.
/// Elements this crate does not model are carried through untouched.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    channel: Channel,
}

impl FeedDocument {
    /// An empty feed with the given channel metadata.
    pub fn new(meta: &ChannelMeta, built_at: DateTime<Utc>) -> Self {
        let mut channel = Channel::default();
        channel.set_title(meta.title.clone());
        channel.set_link(meta.link.clone());
        channel.set_description(meta.description.clone());
        channel.set_last_build_date(format_feed_date(built_at));
        Self { channel }
    }

    pub fn read_from<R: BufRead>(reader: R) -> std::result::Result<Self, rss::Error> {
        Ok(Self {
            channel: Channel::read_from(reader)?,
        })
    }

    pub fn to_xml(&self) -> Result<Vec<u8>> {
        self.channel
            .write_to(Vec::new())
            .map_err(|e| StoryFeedError::Feed(format!("failed to serialize feed: {}", e)))
    }

    pub fn meta(&self) -> ChannelMeta {
        ChannelMeta {
            title: self.channel.title().to_string(),
            link: self.channel.link().to_string(),
            description: self.channel.description().to_string(),
        }
    }

    pub fn last_build_date(&self) -> Option<&str> {
        self.channel.last_build_date()
    }

    pub fn len(&self) -> usize {
        self.channel.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.items().is_empty()
    }

    /// Items, oldest first.
    pub fn items(&self) -> Vec<FeedItem> {
        self.channel.items().iter().map(FeedItem::from).collect()
    }

    /// Append `item` as the newest entry and bump `lastBuildDate`.
    ///
    /// `lastBuildDate` never moves backwards: a stored date later than `now`
    /// is kept.
    pub fn append_item(&mut self, item: &FeedItem, now: DateTime<Utc>) {
        let mut items = self.channel.items().to_vec();
        items.push(rss::Item::from(item));
        self.channel.set_items(items);

        let built_at = match self.last_build_date().and_then(parse_feed_date) {
            Some(previous) if previous > now => previous,
            _ => now,
        };
        self.channel.set_last_build_date(format_feed_date(built_at));
    }

    /// Evict the oldest items until at most `capacity` remain.
    ///
    /// Returns the number of evicted items.
    pub fn trim(&mut self, capacity: usize) -> usize {
        let count = self.len();
        if count <= capacity {
            return 0;
        }

        let excess = count - capacity;
        let kept = self.channel.items()[excess..].to_vec();
        self.channel.set_items(kept);
        excess
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::Enclosure;

    fn meta() -> ChannelMeta {
        ChannelMeta {
            title: "Your Automated Stories".into(),
            link: "https://example.com/story-feed/".into(),
            description: "Auto-generated stories".into(),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn item(n: usize) -> FeedItem {
        let url = format!("https://example.com/story-feed/posts/story-{}.html", n);
        FeedItem::new(
            &format!("Story {}", n),
            &url,
            format!("<p>Story number {}</p>", n),
            Enclosure {
                url: format!("https://example.com/story-feed/images/{}.png", n),
                mime_type: "image/png".into(),
                length: 10,
            },
            t0() + Duration::minutes(n as i64),
        )
    }

    #[test]
    fn test_new_document_is_empty() {
        let doc = FeedDocument::new(&meta(), t0());
        assert!(doc.is_empty());
        assert_eq!(doc.meta(), meta());
        assert_eq!(doc.last_build_date(), Some("Fri, 01 Mar 2024 12:00:00 +0000"));
    }

    #[test]
    fn test_append_keeps_order() {
        let mut doc = FeedDocument::new(&meta(), t0());
        for n in 0..3 {
            doc.append_item(&item(n), t0());
        }

        let titles: Vec<String> = doc.items().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["Story 0", "Story 1", "Story 2"]);
    }

    #[test]
    fn test_trim_evicts_oldest() {
        let capacity = 4;
        let mut doc = FeedDocument::new(&meta(), t0());
        for n in 0..capacity + 3 {
            doc.append_item(&item(n), t0());
        }

        assert_eq!(doc.trim(capacity), 3);
        assert_eq!(doc.len(), capacity);

        let items = doc.items();
        let expected: Vec<FeedItem> = (3..capacity + 3).map(item).collect();
        assert_eq!(items, expected);
    }

    #[test]
    fn test_trim_within_capacity_is_noop() {
        let mut doc = FeedDocument::new(&meta(), t0());
        doc.append_item(&item(0), t0());
        assert_eq!(doc.trim(5), 0);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_last_build_date_advances() {
        let mut doc = FeedDocument::new(&meta(), t0());
        doc.append_item(&item(0), t0() + Duration::hours(1));
        assert_eq!(doc.last_build_date(), Some("Fri, 01 Mar 2024 13:00:00 +0000"));
    }

    #[test]
    fn test_last_build_date_never_regresses() {
        let mut doc = FeedDocument::new(&meta(), t0());
        doc.append_item(&item(0), t0() - Duration::days(1));
        assert_eq!(doc.last_build_date(), Some("Fri, 01 Mar 2024 12:00:00 +0000"));
    }

    #[test]
    fn test_round_trip_preserves_items() {
        let mut doc = FeedDocument::new(&meta(), t0());
        let mut tricky = item(0);
        tricky.description =
            "<h2>Night &amp; fog</h2><p>She said \"<em>run</em>\".</p><p><img src='https://example.com/a.png' alt='illustration'/></p>".into();
        doc.append_item(&tricky, t0());
        doc.append_item(&item(1), t0());

        let xml = doc.to_xml().unwrap();
        let reparsed = FeedDocument::read_from(&xml[..]).unwrap();

        assert_eq!(reparsed.items(), doc.items());
        assert_eq!(reparsed.items()[0].description, tricky.description);
        assert_eq!(reparsed.meta(), meta());
    }

    #[test]
    fn test_description_written_as_cdata() {
        let mut doc = FeedDocument::new(&meta(), t0());
        doc.append_item(&item(0), t0());

        let xml = String::from_utf8(doc.to_xml().unwrap()).unwrap();
        assert!(xml.contains("<![CDATA[<p>Story number 0</p>]]>"));
        assert_eq!(xml.matches("<channel>").count(), 1);
    }

    #[test]
    fn test_missing_channel_is_rejected() {
        assert!(FeedDocument::read_from(&b"<rss version=\"2.0\"></rss>"[..]).is_err());
        assert!(FeedDocument::read_from(&b"definitely not xml"[..]).is_err());
    }
}
