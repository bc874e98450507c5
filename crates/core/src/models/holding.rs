use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single lot in the portfolio: some quantity of a ticker acquired on a date.
///
/// Holdings do NOT store prices. The purchase price is looked up from
/// market data at the acquisition date, the current price at valuation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    /// Unique identifier, used to remove a specific lot
    pub id: Uuid,

    /// Ticker symbol, uppercased (e.g., "AAPL", "BTC-USD", "GC=F")
    pub ticker: String,

    /// Acquisition date (daily granularity)
    pub date: NaiveDate,

    /// Quantity held (always positive)
    pub quantity: f64,
}

impl Holding {
    pub fn new(ticker: impl Into<String>, date: NaiveDate, quantity: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticker: ticker.into().trim().to_uppercase(),
            date,
            quantity,
        }
    }

    /// Two holdings describe the same lot when ticker, date and quantity
    /// agree. The `id` is session-local and is not part of the comparison.
    #[must_use]
    pub fn same_lot(&self, other: &Holding) -> bool {
        self.ticker == other.ticker && self.date == other.date && self.quantity == other.quantity
    }
}

/// The user's portfolio: an ordered list of holdings.
///
/// Order is insertion order and carries no meaning beyond display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_holdings(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    /// Distinct tickers in first-seen order.
    #[must_use]
    pub fn tickers(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.holdings
            .iter()
            .filter(|h| seen.insert(h.ticker.as_str()))
            .map(|h| h.ticker.as_str())
            .collect()
    }
}
