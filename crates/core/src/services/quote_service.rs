use std::cmp::Ordering;

use crate::models::catalog::AssetCatalog;
use crate::models::price::QuoteSnapshot;
use crate::models::report::{Movers, QuoteVariation, RankedEntry};

/// Daily variation of quoted tickers and gainers/losers rankings.
pub struct QuoteService;

impl QuoteService {
    pub fn new() -> Self {
        Self
    }

    /// Daily variation: (price − previous_close) / previous_close × 100.
    ///
    /// `None` when the snapshot has no usable previous close: the ticker is
    /// still shown with its price, but cannot be ranked.
    pub fn variation(&self, snapshot: &QuoteSnapshot, name: &str) -> Option<QuoteVariation> {
        let previous = snapshot.previous_close?;
        if !previous.is_finite() || previous <= 0.0 || !snapshot.price.is_finite() {
            return None;
        }
        Some(QuoteVariation {
            ticker: snapshot.ticker.clone(),
            name: name.to_string(),
            price: snapshot.price,
            previous_close: previous,
            variation_pct: (snapshot.price - previous) / previous * 100.0,
        })
    }

    /// Variations for every snapshot that has a previous close, named from
    /// the catalog (ticker used as the name when it is not listed).
    pub fn variations(&self, snapshots: &[QuoteSnapshot], catalog: &AssetCatalog) -> Vec<QuoteVariation> {
        snapshots
            .iter()
            .filter_map(|s| {
                let name = catalog.name_of(&s.ticker).unwrap_or(&s.ticker);
                self.variation(s, name)
            })
            .collect()
    }

    /// Top `n` gainers (descending) and losers (ascending) of the day.
    pub fn movers(&self, variations: &[QuoteVariation], n: usize) -> Movers {
        let entries: Vec<RankedEntry> = variations
            .iter()
            .map(|v| RankedEntry {
                ticker: v.ticker.clone(),
                name: v.name.clone(),
                change_pct: v.variation_pct,
            })
            .collect();
        rank(&entries, n)
    }
}

impl Default for QuoteService {
    fn default() -> Self {
        Self::new()
    }
}

/// Top `n` entries by `change_pct`, descending for gainers and ascending for
/// losers. Sorting is stable: equal changes keep input order. With fewer
/// than 2n entries the same ticker can appear in both lists.
pub fn rank(entries: &[RankedEntry], n: usize) -> Movers {
    let mut gainers = entries.to_vec();
    gainers.sort_by(|a, b| b.change_pct.partial_cmp(&a.change_pct).unwrap_or(Ordering::Equal));
    gainers.truncate(n);

    let mut losers = entries.to_vec();
    losers.sort_by(|a, b| a.change_pct.partial_cmp(&b.change_pct).unwrap_or(Ordering::Equal));
    losers.truncate(n);

    Movers { gainers, losers }
}
