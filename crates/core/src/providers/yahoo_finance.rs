use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use time::OffsetDateTime;

use crate::errors::DashboardError;
use crate::models::price::{Period, PricePoint, PriceSeries, QuoteSnapshot};
use super::traits::MarketDataProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Yahoo Finance market data for equities, indices, crypto pairs and futures.
///
/// - **Free**: No API key required.
/// - **Coverage**: `AAPL`, `^GSPC`, `BTC-USD`, `GC=F`, ...
/// - **Data**: daily closes and the latest sessions.
///
/// **Note**: Not WASM-compatible (uses native reqwest/tokio).
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, DashboardError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| api_error(format!(
            "Failed to create connector: {e}"
        )))?;
        Ok(Self { connector })
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC).
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, DashboardError> {
        let month = u8::try_from(date.month())
            .ok()
            .and_then(|m| time::Month::try_from(m).ok())
            .ok_or_else(|| api_error(format!("Invalid month in {date}")))?;
        let day = u8::try_from(date.day()).map_err(|e| api_error(format!("Invalid day in {date}: {e}")))?;

        let odt = time::Date::from_calendar_date(date.year(), month, day)
            .map_err(|e| api_error(format!("Invalid date {date}: {e}")))?
            .with_hms(0, 0, 0)
            .map_err(|e| api_error(format!("Invalid time for {date}: {e}")))?
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }

    fn quotes_to_series(
        ticker: &str,
        quotes: &[yahoo_finance_api::Quote],
        window: Option<(NaiveDate, NaiveDate)>,
    ) -> PriceSeries {
        let points = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                if let Some((from, to)) = window {
                    if date < from || date > to {
                        return None;
                    }
                }
                q.close.is_finite().then(|| PricePoint::new(date, q.close))
            })
            .collect();
        PriceSeries::new(ticker, points)
    }
}

#[async_trait]
impl MarketDataProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_latest_quote(&self, ticker: &str) -> Result<QuoteSnapshot, DashboardError> {
        log::debug!("{PROVIDER}: latest quote for {ticker}");
        // A few daily sessions: the last one is "now", the one before is the previous close.
        let resp = self
            .connector
            .get_quote_range(ticker, "1d", "5d")
            .await
            .map_err(|e| api_error(format!("Failed to fetch latest quote for {ticker}: {e}")))?;

        let quotes = resp
            .quotes()
            .map_err(|e| api_error(format!("No quote data for {ticker}: {e}")))?;

        let last = quotes.last().ok_or_else(|| DashboardError::PriceNotAvailable {
            ticker: ticker.to_string(),
            date: "latest".to_string(),
        })?;
        let previous_close = quotes
            .len()
            .checked_sub(2)
            .and_then(|idx| quotes.get(idx))
            .map(|q| q.close);

        Ok(QuoteSnapshot {
            ticker: ticker.to_uppercase(),
            price: last.close,
            previous_close,
            volume: Some(last.volume),
        })
    }

    async fn get_price_range(
        &self,
        ticker: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<PriceSeries, DashboardError> {
        log::debug!("{PROVIDER}: history for {ticker} {from}..={to}");
        let start = Self::to_offset_datetime(from)?;
        let end = to
            .succ_opt() // inclusive end
            .ok_or_else(|| api_error(format!("History range for {ticker} ends past {to}")))?;
        let end = Self::to_offset_datetime(end)?;

        let resp = self
            .connector
            .get_quote_history(ticker, start, end)
            .await
            .map_err(|e| api_error(format!("Failed to fetch history range for {ticker}: {e}")))?;

        let quotes = resp
            .quotes()
            .map_err(|e| api_error(format!("Failed to parse quotes for {ticker}: {e}")))?;

        Ok(Self::quotes_to_series(&ticker.to_uppercase(), &quotes, Some((from, to))))
    }

    async fn get_price_period(
        &self,
        ticker: &str,
        period: Period,
    ) -> Result<PriceSeries, DashboardError> {
        let today = chrono::Utc::now().date_naive();
        match period.start_from(today) {
            Some(from) => self.get_price_range(ticker, from, today).await,
            None => {
                log::debug!("{PROVIDER}: full history for {ticker}");
                let resp = self
                    .connector
                    .get_quote_range(ticker, "1d", "max")
                    .await
                    .map_err(|e| api_error(format!("Failed to fetch full history for {ticker}: {e}")))?;
                let quotes = resp
                    .quotes()
                    .map_err(|e| api_error(format!("Failed to parse quotes for {ticker}: {e}")))?;
                Ok(Self::quotes_to_series(&ticker.to_uppercase(), &quotes, None))
            }
        }
    }
}

fn api_error(message: String) -> DashboardError {
    DashboardError::Api {
        provider: PROVIDER.into(),
        message,
    }
}
