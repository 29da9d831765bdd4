// src/podcast.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// === PODCAST ID ===
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PodcastId(i64);

impl PodcastId {
    pub fn new(id: i64) -> Self {
        PodcastId(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PodcastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PodcastId {
    type Err = std::num::ParseIntError;

    // Strict base-10: trailing garbage such as "7abc" is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(PodcastId)
    }
}

// === PODCAST RECORD ===
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Podcast {
    #[serde(rename = "id")]
    id: PodcastId,
    #[serde(rename = "title")]
    title: String,
    #[serde(rename = "description", default)]
    description: Option<String>,
    #[serde(rename = "image_url", default)]
    image_url: Option<String>,
    #[serde(rename = "feed_url", default)]
    feed_url: Option<String>,
    #[serde(rename = "last_updated", default)]
    last_updated: Option<DateTime<Utc>>,
}

impl Podcast {
    pub fn new(
        id: PodcastId,
        title: String,
        description: Option<String>,
        image_url: Option<String>,
        feed_url: Option<String>,
    ) -> Self {
        Self { id, title, description, image_url, feed_url, last_updated: None }
    }

    pub fn with_last_updated(mut self, last_updated: DateTime<Utc>) -> Self {
        self.last_updated = Some(last_updated);
        self
    }

    // Accessor methods

    pub fn id(&self) -> PodcastId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn feed_url(&self) -> Option<&str> {
        self.feed_url.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }
}

impl fmt::Display for Podcast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Title       : {}", self.title)?;
        writeln!(f, "ID          : {}", self.id)?;
        if let Some(feed) = &self.feed_url {
            writeln!(f, "Feed URL    : {}", feed)?;
        }
        if let Some(img) = &self.image_url {
            writeln!(f, "Image URL   : {}", img)?;
        }
        if let Some(updated) = &self.last_updated {
            writeln!(f, "Last updated: {}", updated)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn podcast_id_parses_base_ten_only() {
        assert_eq!("7".parse::<PodcastId>().unwrap(), PodcastId::new(7));
        assert_eq!("-3".parse::<PodcastId>().unwrap(), PodcastId::new(-3));
        assert!("abc".parse::<PodcastId>().is_err());
        assert!("0x10".parse::<PodcastId>().is_err());
        assert!("7abc".parse::<PodcastId>().is_err());
        assert!("".parse::<PodcastId>().is_err());
    }

    #[test]
    fn podcast_deserializes_with_missing_optional_fields() {
        let json = r#"{ "id": 42, "title": "Developer Voices" }"#;
        let podcast: Podcast = serde_json::from_str(json).unwrap();

        assert_eq!(podcast.id(), PodcastId::new(42));
        assert_eq!(podcast.title(), "Developer Voices");
        assert_eq!(podcast.description(), None);
        assert_eq!(podcast.feed_url(), None);
        assert_eq!(podcast.last_updated(), None);
        assert!(!podcast.to_string().contains("Last updated"));
    }

    #[test]
    fn decoding_the_same_json_twice_gives_equal_records() {
        let json = r#"{ "id": 7, "title": "Seven", "last_updated": "2024-05-01T10:00:00Z" }"#;
        let first: Podcast = serde_json::from_str(json).unwrap();
        let second: Podcast = serde_json::from_str(json).unwrap();

        assert_eq!(first, second);
        assert!(first.to_string().contains("Last updated: 2024-05-01 10:00:00 UTC"));
    }
}
