use chrono::NaiveDate;

use crate::models::exchange_rate::{ExchangeRateRow, ExchangeRateTable, RateColumn};
use crate::models::price::{PricePoint, PriceSeries};

/// Label of the CCL-vs-official gap series.
pub const GAP_LABEL: &str = "Brecha";

/// Normalizes and queries the local exchange-rate history.
pub struct ExchangeRateService;

impl ExchangeRateService {
    pub fn new() -> Self {
        Self
    }

    /// Sort rows by date, forward-fill missing quotes and compute the gap.
    ///
    /// The sort is stable, so rows sharing a date keep file order. Any
    /// `gap_pct` already present on input rows is recomputed.
    pub fn normalize(&self, mut rows: Vec<ExchangeRateRow>) -> ExchangeRateTable {
        rows.sort_by_key(|r| r.date);

        let mut last: [Option<f64>; 5] = [None; 5];
        for row in &mut rows {
            let slots = [
                &mut row.usd_ccl,
                &mut row.usd_mep,
                &mut row.official,
                &mut row.eur,
                &mut row.uyu,
            ];
            for (slot, carried) in slots.into_iter().zip(last.iter_mut()) {
                if (*slot).is_some_and(f64::is_finite) {
                    *carried = *slot;
                } else {
                    *slot = *carried;
                }
            }
            row.gap_pct = gap_pct(row.usd_ccl, row.official);
        }

        ExchangeRateTable { rows }
    }

    /// The latest row dated on or before `date`.
    pub fn on_or_before<'a>(
        &self,
        table: &'a ExchangeRateTable,
        date: NaiveDate,
    ) -> Option<&'a ExchangeRateRow> {
        let end = table.rows.partition_point(|r| r.date <= date);
        end.checked_sub(1).map(|idx| &table.rows[idx])
    }

    /// The last `n` rows (the whole table when `n` is `None` or larger).
    pub fn tail<'a>(&self, table: &'a ExchangeRateTable, n: Option<usize>) -> &'a [ExchangeRateRow] {
        let len = table.rows.len();
        let n = n.unwrap_or(len).min(len);
        &table.rows[len - n..]
    }

    /// One column as a series, skipping rows where it is still unknown.
    pub fn column_series(&self, rows: &[ExchangeRateRow], column: RateColumn) -> PriceSeries {
        let points = rows
            .iter()
            .filter_map(|r| r.get(column).map(|v| PricePoint::new(r.date, v)))
            .collect();
        PriceSeries::new(column.to_string(), points)
    }

    /// The CCL-vs-official gap as a series.
    pub fn gap_series(&self, rows: &[ExchangeRateRow]) -> PriceSeries {
        let points = rows
            .iter()
            .filter_map(|r| r.gap_pct.map(|g| PricePoint::new(r.date, g)))
            .collect();
        PriceSeries::new(GAP_LABEL, points)
    }
}

impl Default for ExchangeRateService {
    fn default() -> Self {
        Self::new()
    }
}

/// (ccl / official − 1) × 100, undefined without both quotes or with a zero official rate.
fn gap_pct(ccl: Option<f64>, official: Option<f64>) -> Option<f64> {
    match (ccl, official) {
        (Some(ccl), Some(official)) if official != 0.0 => Some((ccl / official - 1.0) * 100.0),
        _ => None,
    }
}
