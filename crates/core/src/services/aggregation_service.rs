use crate::models::settings::AlertThresholds;
use crate::models::valuation::{Alert, HoldingShare, PortfolioSummary, ValuationRecord};

/// Aggregates valuation records into portfolio totals and derives alerts.
///
/// Works only on records that were actually valued; skipped holdings never
/// reach this service.
pub struct AggregationService;

impl AggregationService {
    pub fn new() -> Self {
        Self
    }

    /// Compute totals, overall return and per-holding concentration.
    ///
    /// - total_current = Σ valuation, total_invested = Σ invested
    /// - total return% = (total_current / total_invested − 1) × 100, or 0 when
    ///   nothing was invested
    /// - concentration% = valuation / total_current × 100, or 0 when the
    ///   portfolio is worth nothing
    pub fn aggregate(&self, records: &[ValuationRecord]) -> PortfolioSummary {
        let total_current: f64 = records.iter().map(|r| r.valuation).sum();
        let total_invested: f64 = records.iter().map(|r| r.invested).sum();

        let total_return_pct = if total_invested > 0.0 {
            (total_current / total_invested - 1.0) * 100.0
        } else {
            0.0
        };

        let shares = records
            .iter()
            .map(|r| HoldingShare {
                ticker: r.ticker.clone(),
                valuation: r.valuation,
                return_pct: r.return_pct,
                concentration_pct: if total_current > 0.0 {
                    (r.valuation / total_current) * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        PortfolioSummary {
            total_current,
            total_invested,
            total_return_pct,
            shares,
        }
    }

    /// Apply the alert thresholds to an aggregated portfolio.
    ///
    /// Order: concentration alerts, then severe-loss alerts (both by return,
    /// best first; ties keep share order), then the portfolio-level
    /// underperformance alert.
    pub fn evaluate_alerts(
        &self,
        summary: &PortfolioSummary,
        thresholds: &AlertThresholds,
    ) -> Vec<Alert> {
        let mut ranked: Vec<&HoldingShare> = summary.shares.iter().collect();
        ranked.sort_by(|a, b| {
            b.return_pct
                .partial_cmp(&a.return_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut alerts: Vec<Alert> = ranked
            .iter()
            .filter(|share| share.concentration_pct > thresholds.concentration_pct)
            .map(|share| Alert::OverConcentration {
                ticker: share.ticker.clone(),
                concentration_pct: share.concentration_pct,
            })
            .collect();

        alerts.extend(
            ranked
                .iter()
                .filter(|share| share.return_pct < thresholds.severe_loss_pct)
                .map(|share| Alert::SevereLoss {
                    ticker: share.ticker.clone(),
                    return_pct: share.return_pct,
                }),
        );

        if summary.total_return_pct < thresholds.underperformance_pct {
            alerts.push(Alert::Underperformance {
                total_return_pct: summary.total_return_pct,
            });
        }

        alerts
    }

    /// Pie-chart slices: shares sorted by valuation, largest first.
    pub fn allocation(&self, summary: &PortfolioSummary) -> Vec<HoldingShare> {
        let mut shares = summary.shares.clone();
        shares.sort_by(|a, b| {
            b.valuation
                .partial_cmp(&a.valuation)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        shares
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
