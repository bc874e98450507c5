use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Valuation of one holding at current market prices.
///
/// Derived on every refresh, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRecord {
    pub ticker: String,

    /// Acquisition date of the lot
    pub date: NaiveDate,

    pub quantity: f64,

    /// Close on (or the first session after) the acquisition date
    pub purchase_price: f64,

    /// Latest market price
    pub current_price: f64,

    /// current_price × quantity
    pub valuation: f64,

    /// purchase_price × quantity
    pub invested: f64,

    /// (current_price / purchase_price − 1) × 100
    pub return_pct: f64,
}

impl ValuationRecord {
    /// Absolute gain/loss of this lot.
    #[must_use]
    pub fn gain_loss(&self) -> f64 {
        self.valuation - self.invested
    }
}

/// Why a holding was left out of the aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No close price around the acquisition date
    PurchasePriceUnavailable,
    /// No latest quote
    CurrentPriceUnavailable,
    /// A price was reported but is zero, negative or not finite
    InvalidPrice,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::PurchasePriceUnavailable => write!(f, "purchase price unavailable"),
            SkipReason::CurrentPriceUnavailable => write!(f, "current price unavailable"),
            SkipReason::InvalidPrice => write!(f, "invalid price"),
        }
    }
}

/// Result of valuing a single holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FetchOutcome {
    Valued(ValuationRecord),
    Skipped { ticker: String, reason: SkipReason },
}

impl FetchOutcome {
    #[must_use]
    pub fn record(&self) -> Option<&ValuationRecord> {
        match self {
            FetchOutcome::Valued(record) => Some(record),
            FetchOutcome::Skipped { .. } => None,
        }
    }
}

/// Output of one valuation pass over the whole portfolio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValuationRun {
    /// Holdings with both prices available, in portfolio order
    pub records: Vec<ValuationRecord>,

    /// Holdings that were excluded, with the reason
    pub skipped: Vec<(String, SkipReason)>,
}

impl ValuationRun {
    /// Split outcomes into included records and skipped tickers.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = FetchOutcome>) -> Self {
        let mut run = Self::default();
        for outcome in outcomes {
            match outcome {
                FetchOutcome::Valued(record) => run.records.push(record),
                FetchOutcome::Skipped { ticker, reason } => run.skipped.push((ticker, reason)),
            }
        }
        run
    }

    /// True when not a single holding could be valued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A holding's slice of the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingShare {
    pub ticker: String,
    pub valuation: f64,
    pub return_pct: f64,
    /// valuation / total_current × 100 (0 when the portfolio is worth nothing)
    pub concentration_pct: f64,
}

/// Aggregated view over the included valuation records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Σ valuation
    pub total_current: f64,

    /// Σ purchase_price × quantity
    pub total_invested: f64,

    /// (total_current / total_invested − 1) × 100, 0 when nothing invested
    pub total_return_pct: f64,

    /// Per-holding shares, in record order
    pub shares: Vec<HoldingShare>,
}

impl PortfolioSummary {
    /// Net gain/loss in price currency.
    #[must_use]
    pub fn net_gain(&self) -> f64 {
        self.total_current - self.total_invested
    }
}

/// A threshold breach detected on the aggregated portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Alert {
    /// A single holding exceeds the concentration threshold
    OverConcentration { ticker: String, concentration_pct: f64 },
    /// A single holding lost more than the severe-loss threshold
    SevereLoss { ticker: String, return_pct: f64 },
    /// The whole portfolio returned less than the underperformance threshold
    Underperformance { total_return_pct: f64 },
}

/// Return over a look-back window of a single price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPerformance {
    pub label: String,
    /// Last observed close
    pub latest_price: f64,
    /// (last / first − 1) × 100
    pub change_pct: f64,
}
