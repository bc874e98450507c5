use crate::models::holding::Holding;
use crate::models::price::PriceSeries;
use crate::models::valuation::{FetchOutcome, SeriesPerformance, SkipReason, ValuationRecord};

/// Values single holdings from already-fetched prices.
///
/// Pure business logic: no I/O, no API calls. Missing prices are not
/// errors: the holding comes back as `FetchOutcome::Skipped` and is left
/// out of every aggregate.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Value one lot.
    ///
    /// valuation = current × quantity, return% = (current / purchase − 1) × 100.
    /// No rounding; formatting is a presentation concern.
    pub fn value_holding(
        &self,
        holding: &Holding,
        purchase_price: Option<f64>,
        current_price: Option<f64>,
    ) -> FetchOutcome {
        let skip = |reason| FetchOutcome::Skipped {
            ticker: holding.ticker.clone(),
            reason,
        };

        let Some(purchase) = purchase_price else {
            return skip(SkipReason::PurchasePriceUnavailable);
        };
        let Some(current) = current_price else {
            return skip(SkipReason::CurrentPriceUnavailable);
        };
        if !is_valid_price(purchase) || !is_valid_price(current) {
            return skip(SkipReason::InvalidPrice);
        }

        FetchOutcome::Valued(ValuationRecord {
            ticker: holding.ticker.clone(),
            date: holding.date,
            quantity: holding.quantity,
            purchase_price: purchase,
            current_price: current,
            valuation: current * holding.quantity,
            invested: purchase * holding.quantity,
            return_pct: Self::return_pct(purchase, current),
        })
    }

    /// Percent change from `from` to `to`: (to / from − 1) × 100.
    /// Callers guarantee `from > 0`.
    #[must_use]
    pub fn return_pct(from: f64, to: f64) -> f64 {
        (to / from - 1.0) * 100.0
    }

    /// Latest close and change over the whole series.
    ///
    /// Returns `None` for an empty series or one that starts at a
    /// non-positive price.
    pub fn series_performance(&self, series: &PriceSeries) -> Option<SeriesPerformance> {
        let first = series.first()?;
        let last = series.last()?;
        if !is_valid_price(first.price) || !last.price.is_finite() {
            return None;
        }
        Some(SeriesPerformance {
            label: series.label.clone(),
            latest_price: last.price,
            change_pct: Self::return_pct(first.price, last.price),
        })
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

