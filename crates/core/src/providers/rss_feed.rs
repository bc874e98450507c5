use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::DashboardError;
use crate::models::news::NewsItem;
use super::traits::NewsFeed;

/// RSS 2.0 headline feed fetched over HTTP.
///
/// Only `title`, `link` and `pubDate` of each `<item>` are read.
pub struct RssNewsFeed {
    client: Client,
    url: String,
    source_name: String,
}

impl RssNewsFeed {
    pub fn new(url: impl Into<String>, source_name: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            url: url.into(),
            source_name: source_name.into(),
        }
    }
}

// ── RSS document types ──────────────────────────────────────────────

#[derive(Deserialize)]
struct RssDocument {
    channel: RssChannel,
}

#[derive(Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

#[derive(Deserialize)]
struct RssItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
}

/// Parse an RSS 2.0 document into headlines, in document order.
///
/// Items without a title are dropped. An unparseable `pubDate` leaves
/// `published` empty and keeps the raw text.
pub fn parse_rss(xml: &str) -> Result<Vec<NewsItem>, DashboardError> {
    let doc: RssDocument = quick_xml::de::from_str(xml)?;
    Ok(doc
        .channel
        .items
        .into_iter()
        .filter(|item| !item.title.trim().is_empty())
        .map(|item| {
            let raw = item.pub_date.unwrap_or_default();
            NewsItem {
                title: item.title.trim().to_string(),
                link: item.link.trim().to_string(),
                published: DateTime::parse_from_rfc2822(raw.trim()).ok(),
                published_raw: raw.trim().to_string(),
            }
        })
        .collect())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl NewsFeed for RssNewsFeed {
    fn name(&self) -> &str {
        &self.source_name
    }

    async fn fetch(&self) -> Result<Vec<NewsItem>, DashboardError> {
        log::debug!("Fetching headlines from {}", self.source_name);
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_rss(&body)
    }
}
