use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::catalog::AssetCatalog;
use crate::models::holding::Holding;
use crate::models::settings::SimulationSettings;

/// Builds a random demo portfolio from the asset catalog.
///
/// Split in two steps so the price lookup in between stays outside:
/// `sample_tickers` picks candidates, the caller fetches their latest
/// prices, `build_holdings` turns priced candidates into lots.
pub struct SimulationService;

impl SimulationService {
    pub fn new() -> Self {
        Self
    }

    /// Up to `sample_size` distinct catalog tickers, in random order.
    pub fn sample_tickers<R: Rng + ?Sized>(
        &self,
        catalog: &AssetCatalog,
        settings: &SimulationSettings,
        rng: &mut R,
    ) -> Vec<String> {
        let tickers = catalog.tickers_sorted();
        tickers
            .choose_multiple(rng, settings.sample_size)
            .map(|t| t.to_string())
            .collect()
    }

    /// Turn priced candidates into lots dated `settings.acquisition_date`.
    ///
    /// Candidates without a positive price are skipped. Each lot gets a
    /// random quantity in `1..=max_quantity`; generation stops at the first
    /// lot that would push the total past the budget.
    pub fn build_holdings<R: Rng + ?Sized>(
        &self,
        priced: &[(String, Option<f64>)],
        settings: &SimulationSettings,
        rng: &mut R,
    ) -> Vec<Holding> {
        let mut holdings = Vec::new();
        let mut spent = 0.0;

        for (ticker, price) in priced {
            let Some(price) = price.filter(|p| p.is_finite() && *p > 0.0) else {
                log::debug!("Simulation: no price for {ticker}, skipping");
                continue;
            };
            let quantity = rng.gen_range(1..=settings.max_quantity.max(1));
            let investment = price * f64::from(quantity);
            if spent + investment > settings.budget {
                break;
            }
            holdings.push(Holding::new(
                ticker.clone(),
                settings.acquisition_date,
                f64::from(quantity),
            ));
            spent += investment;
        }

        holdings
    }
}

impl Default for SimulationService {
    fn default() -> Self {
        Self::new()
    }
}
