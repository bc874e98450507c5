use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A headline as delivered by the news feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    /// Publication time, when the feed provides a parseable one
    pub published: Option<DateTime<FixedOffset>>,
    /// The raw publication string, kept for display when it could not be parsed
    #[serde(default)]
    pub published_raw: String,
}

impl NewsItem {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            published: None,
            published_raw: String::new(),
        }
    }

    /// "dd/mm/YYYY HH:MM hs", or the raw string if the date did not parse.
    #[must_use]
    pub fn display_date(&self) -> String {
        match self.published {
            Some(ts) => ts.format("%d/%m/%Y %H:%M hs").to_string(),
            None => self.published_raw.clone(),
        }
    }
}

/// A headline with its assigned topics. `topics` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedNewsItem {
    pub item: NewsItem,
    pub topics: Vec<String>,
}

impl TaggedNewsItem {
    #[must_use]
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }
}

/// One classification rule: a topic and its trigger keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRule {
    pub topic: String,
    pub keywords: Vec<String>,
}

impl TopicRule {
    pub fn new(topic: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            topic: topic.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered topic → keywords mapping. Rule order is the tag order.
///
/// Serialized as a JSON object:
/// `{"default_topic": "General", "rules": [{"topic": "...", "keywords": [...]}]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicMap {
    /// Catch-all tag for headlines that match no rule
    pub default_topic: String,
    pub rules: Vec<TopicRule>,
}

impl Default for TopicMap {
    fn default() -> Self {
        Self {
            default_topic: "General".to_string(),
            rules: vec![
                TopicRule::new("Inflación", &["inflación", "ipc", "precios"]),
                TopicRule::new("Tipo de cambio", &["dólar", "blue", "cambiario"]),
                TopicRule::new("Commodities", &["soja", "petróleo", "commodities"]),
                TopicRule::new("Política monetaria", &["bcra", "tasa", "interviene", "liquidez"]),
                TopicRule::new("Alerta", &["crisis", "default", "caída", "récord"]),
            ],
        }
    }
}

impl TopicMap {
    /// Topic names in rule order (default topic excluded).
    #[must_use]
    pub fn topics(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.topic.as_str()).collect()
    }
}

/// Number of headlines tagged with a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub topic: String,
    pub count: usize,
}
