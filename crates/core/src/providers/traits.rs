use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::DashboardError;
use crate::models::news::NewsItem;
use crate::models::price::{Period, PriceSeries, QuoteSnapshot};

/// Source of market prices (equities, crypto, commodities).
///
/// Implementations may return empty or partial data; callers treat an
/// error or an empty series as "price unavailable" for that ticker.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Latest quote: price, previous close and volume.
    async fn get_latest_quote(&self, ticker: &str) -> Result<QuoteSnapshot, DashboardError>;

    /// Daily closes between `from` and `to` (inclusive), sorted by date.
    async fn get_price_range(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceSeries, DashboardError>;

    /// Daily closes over a look-back period ending today.
    async fn get_price_period(
        &self,
        ticker: &str,
        period: Period,
    ) -> Result<PriceSeries, DashboardError>;
}

/// Source of economic headlines.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait NewsFeed: Send + Sync {
    /// Human-readable source name (shown next to each headline).
    fn name(&self) -> &str;

    /// Current feed items, newest first as published by the source.
    async fn fetch(&self) -> Result<Vec<NewsItem>, DashboardError>;
}
