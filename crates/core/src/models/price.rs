use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single price data point (date → close price).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }
}

/// A date-ordered close-price series for one ticker (or one rate column).
///
/// Produced by a market data provider or extracted from the exchange-rate
/// table. Immutable once built: `new` sorts by date and keeps the last
/// observation for duplicated dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Column label: ticker symbol or rate name
    pub label: String,

    /// Points sorted ascending by date, unique dates
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(label: impl Into<String>, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        // Stable sort keeps input order within a date; keep the last one.
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        Self {
            label: label.into(),
            points: deduped,
        }
    }

    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            points: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    /// Close on the exact date, if observed. Binary search (O(log n)).
    #[must_use]
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].price)
    }

    /// First observation on or after `date` (the acquisition-day close,
    /// or the next trading day's close on weekends/holidays).
    #[must_use]
    pub fn first_on_or_after(&self, date: NaiveDate) -> Option<&PricePoint> {
        let idx = self
            .points
            .binary_search_by_key(&date, |p| p.date)
            .unwrap_or_else(|pos| pos);
        self.points.get(idx)
    }

    /// Multiply every price by `factor` (e.g., quantity held) under a new label.
    #[must_use]
    pub fn scaled(&self, label: impl Into<String>, factor: f64) -> PriceSeries {
        PriceSeries {
            label: label.into(),
            points: self
                .points
                .iter()
                .map(|p| PricePoint::new(p.date, p.price * factor))
                .collect(),
        }
    }
}

/// Latest-quote snapshot for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub ticker: String,

    /// Latest traded / regular-market price
    pub price: f64,

    /// Previous session close, when the source reports one
    pub previous_close: Option<f64>,

    /// Latest session volume, when the source reports one
    pub volume: Option<u64>,
}

/// Look-back period for price history requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Days7,
    Days30,
    Days90,
    Days180,
    Days365,
    /// The full history available from the source
    Max,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::Days7,
        Period::Days30,
        Period::Days90,
        Period::Days180,
        Period::Days365,
        Period::Max,
    ];

    /// Number of calendar days covered, or `None` for the full history.
    #[must_use]
    pub fn days(&self) -> Option<i64> {
        match self {
            Period::Days7 => Some(7),
            Period::Days30 => Some(30),
            Period::Days90 => Some(90),
            Period::Days180 => Some(180),
            Period::Days365 => Some(365),
            Period::Max => None,
        }
    }

    /// Start of the window ending at `end` (inclusive), or `None` for `Max`.
    /// Clamped to the earliest representable date.
    #[must_use]
    pub fn start_from(&self, end: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|d| {
            end.checked_sub_signed(chrono::Duration::days(d))
                .unwrap_or(NaiveDate::MIN)
        })
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Days7 => write!(f, "7d"),
            Period::Days30 => write!(f, "30d"),
            Period::Days90 => write!(f, "90d"),
            Period::Days180 => write!(f, "180d"),
            Period::Days365 => write!(f, "365d"),
            Period::Max => write!(f, "max"),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = crate::errors::DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "7d" => Ok(Period::Days7),
            "30d" => Ok(Period::Days30),
            "90d" => Ok(Period::Days90),
            "180d" => Ok(Period::Days180),
            "365d" => Ok(Period::Days365),
            "max" => Ok(Period::Max),
            other => Err(crate::errors::DashboardError::ValidationError(format!(
                "Unknown period '{other}' (expected 7d, 30d, 90d, 180d, 365d or max)"
            ))),
        }
    }
}
