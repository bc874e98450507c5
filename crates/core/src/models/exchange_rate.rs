use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The quoted columns of the local exchange-rate file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateColumn {
    /// USD "contado con liquidación"
    UsdCcl,
    /// USD "mercado electrónico de pagos"
    UsdMep,
    /// Official USD rate
    Official,
    Eur,
    Uyu,
}

impl RateColumn {
    pub const ALL: [RateColumn; 5] = [
        RateColumn::UsdCcl,
        RateColumn::UsdMep,
        RateColumn::Official,
        RateColumn::Eur,
        RateColumn::Uyu,
    ];
}

impl std::fmt::Display for RateColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateColumn::UsdCcl => write!(f, "USD CCL"),
            RateColumn::UsdMep => write!(f, "USD MEP"),
            RateColumn::Official => write!(f, "OFICIAL"),
            RateColumn::Eur => write!(f, "EUR"),
            RateColumn::Uyu => write!(f, "UYU"),
        }
    }
}

/// One dated row of the exchange-rate table, after forward-fill.
///
/// A value is `None` only if no earlier row ever reported that column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateRow {
    pub date: NaiveDate,
    pub usd_ccl: Option<f64>,
    pub usd_mep: Option<f64>,
    pub official: Option<f64>,
    pub eur: Option<f64>,
    pub uyu: Option<f64>,
    /// (usd_ccl / official − 1) × 100, `None` when either side is missing or official is 0
    pub gap_pct: Option<f64>,
}

impl ExchangeRateRow {
    #[must_use]
    pub fn get(&self, column: RateColumn) -> Option<f64> {
        match column {
            RateColumn::UsdCcl => self.usd_ccl,
            RateColumn::UsdMep => self.usd_mep,
            RateColumn::Official => self.official,
            RateColumn::Eur => self.eur,
            RateColumn::Uyu => self.uyu,
        }
    }
}

/// The full exchange-rate history. Rows are sorted by date (non-decreasing).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    pub rows: Vec<ExchangeRateRow>,
}

impl ExchangeRateTable {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.rows.first().map(|r| r.date)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.last().map(|r| r.date)
    }
}
