use serde::{Deserialize, Serialize};

/// A selectable asset from the local catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Ticker symbol as understood by the market data source
    pub ticker: String,
    /// Human-readable name (e.g., "Apple Inc.")
    pub name: String,
}

impl CatalogEntry {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into().trim().to_uppercase(),
            name: name.into().trim().to_string(),
        }
    }

    /// Selection-list label, e.g. "AAPL - Apple Inc."
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.ticker, self.name)
    }
}

/// Asset catalog, sorted by display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCatalog {
    pub entries: Vec<CatalogEntry>,
}

impl AssetCatalog {
    pub fn new(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.ticker.cmp(&b.ticker)));
        Self { entries }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Display name for a ticker (case-insensitive).
    #[must_use]
    pub fn name_of(&self, ticker: &str) -> Option<&str> {
        let upper = ticker.trim().to_uppercase();
        self.entries
            .iter()
            .find(|e| e.ticker == upper)
            .map(|e| e.name.as_str())
    }

    #[must_use]
    pub fn contains(&self, ticker: &str) -> bool {
        self.name_of(ticker).is_some()
    }

    /// "TICKER - Name" labels in catalog (name) order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(CatalogEntry::label).collect()
    }

    /// All tickers, sorted alphabetically.
    #[must_use]
    pub fn tickers_sorted(&self) -> Vec<&str> {
        let mut tickers: Vec<&str> = self.entries.iter().map(|e| e.ticker.as_str()).collect();
        tickers.sort_unstable();
        tickers.dedup();
        tickers
    }

    /// Extract the ticker from a "TICKER - Name" selection label.
    #[must_use]
    pub fn ticker_from_label(label: &str) -> &str {
        label.split(" - ").next().unwrap_or(label).trim()
    }
}
