pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{Duration, NaiveDate};
use rand::Rng;
use uuid::Uuid;

use errors::DashboardError;
use models::{
    catalog::AssetCatalog,
    exchange_rate::ExchangeRateTable,
    holding::{Holding, Portfolio},
    news::TaggedNewsItem,
    price::{Period, PriceSeries},
    report::{AnalysisReport, Movers, QuoteVariation},
    series::AlignedSeries,
    settings::Settings,
    valuation::{Alert, HoldingShare, PortfolioSummary, SeriesPerformance, ValuationRun},
};
use providers::traits::{MarketDataProvider, NewsFeed};
use services::{
    aggregation_service::AggregationService,
    alignment_service::AlignmentService,
    exchange_rate_service::ExchangeRateService,
    news_service::NewsService,
    quote_service::QuoteService,
    report_service::{ReportInput, ReportService},
    simulation_service::SimulationService,
    valuation_service::ValuationService,
};
use storage::{csv_format, store::PortfolioStore};

/// Main entry point for the dashboard kernel.
/// Holds the session portfolio, the settings and the data sources, and
/// wires fetched data through the calculation services.
#[must_use]
pub struct Dashboard {
    portfolio: Portfolio,
    settings: Settings,
    market: Box<dyn MarketDataProvider>,
    news: Box<dyn NewsFeed>,
    valuation_service: ValuationService,
    aggregation_service: AggregationService,
    alignment_service: AlignmentService,
    news_service: NewsService,
    quote_service: QuoteService,
    report_service: ReportService,
    simulation_service: SimulationService,
    exchange_rate_service: ExchangeRateService,
    /// Tracks whether the portfolio changed since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("holdings", &self.portfolio.len())
            .field("market", &self.market.name())
            .field("news", &self.news.name())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Dashboard {
    /// Create a dashboard backed by Yahoo Finance and the configured RSS feed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(settings: Settings) -> Result<Self, DashboardError> {
        let market = providers::yahoo_finance::YahooFinanceProvider::new()?;
        let news = providers::rss_feed::RssNewsFeed::new(
            settings.news.feed_url.clone(),
            settings.news.source_name.clone(),
        );
        Self::with_providers(settings, Box::new(market), Box::new(news))
    }

    /// Create a dashboard with explicit data sources (WASM hosts, tests).
    pub fn with_providers(
        settings: Settings,
        market: Box<dyn MarketDataProvider>,
        news: Box<dyn NewsFeed>,
    ) -> Result<Self, DashboardError> {
        settings.validate()?;
        let news_service = NewsService::new(settings.news.topics.clone());
        Ok(Self {
            portfolio: Portfolio::new(),
            settings,
            market,
            news,
            valuation_service: ValuationService::new(),
            aggregation_service: AggregationService::new(),
            alignment_service: AlignmentService::new(),
            news_service,
            quote_service: QuoteService::new(),
            report_service: ReportService::new(),
            simulation_service: SimulationService::new(),
            exchange_rate_service: ExchangeRateService::new(),
            dirty: false,
        })
    }

    // ── Holdings ────────────────────────────────────────────────────

    /// Add a lot to the portfolio. Returns the new holding's id.
    pub fn add_holding(
        &mut self,
        ticker: &str,
        date: NaiveDate,
        quantity: f64,
    ) -> Result<Uuid, DashboardError> {
        if ticker.trim().is_empty() {
            return Err(DashboardError::ValidationError("Ticker must not be empty".into()));
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(DashboardError::ValidationError(format!(
                "Quantity must be positive, got {quantity}"
            )));
        }
        let holding = Holding::new(ticker, date, quantity);
        let id = holding.id;
        self.portfolio.holdings.push(holding);
        self.dirty = true;
        Ok(id)
    }

    /// Remove a lot by its id.
    pub fn remove_holding(&mut self, id: Uuid) -> Result<Holding, DashboardError> {
        let idx = self
            .portfolio
            .holdings
            .iter()
            .position(|h| h.id == id)
            .ok_or_else(|| DashboardError::HoldingNotFound(id.to_string()))?;
        self.dirty = true;
        Ok(self.portfolio.holdings.remove(idx))
    }

    /// Remove the lot at a display position.
    pub fn remove_holding_at(&mut self, index: usize) -> Result<Holding, DashboardError> {
        if index >= self.portfolio.len() {
            return Err(DashboardError::HoldingNotFound(format!(
                "index {index} (portfolio has {} holdings)",
                self.portfolio.len()
            )));
        }
        self.dirty = true;
        Ok(self.portfolio.holdings.remove(index))
    }

    /// Drop every holding.
    pub fn clear_portfolio(&mut self) {
        if !self.portfolio.is_empty() {
            self.portfolio.holdings.clear();
            self.dirty = true;
        }
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.portfolio.holdings
    }

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Returns `true` if the portfolio has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Import / Export & Persistence ───────────────────────────────

    /// The portfolio as `ticker,date,quantity` CSV.
    pub fn export_portfolio_csv(&self) -> Result<String, DashboardError> {
        csv_format::write_portfolio(&self.portfolio.holdings)
    }

    /// Replace the portfolio with the holdings of a CSV export.
    /// The current portfolio is untouched if any row is invalid.
    pub fn import_portfolio_csv(&mut self, csv: &str) -> Result<usize, DashboardError> {
        let holdings = csv_format::read_portfolio(csv.as_bytes())?;
        let count = holdings.len();
        self.portfolio = Portfolio::from_holdings(holdings);
        self.dirty = true;
        Ok(count)
    }

    /// Persist the portfolio. Clears the unsaved-changes flag on success.
    pub fn save_to(&mut self, store: &mut dyn PortfolioStore) -> Result<(), DashboardError> {
        store.save(&self.portfolio)?;
        self.dirty = false;
        Ok(())
    }

    /// Replace the portfolio with the stored one. Returns the number of holdings.
    pub fn load_from(&mut self, store: &dyn PortfolioStore) -> Result<usize, DashboardError> {
        self.portfolio = store.load()?;
        self.dirty = false;
        Ok(self.portfolio.len())
    }

    // ── Simulation ──────────────────────────────────────────────────

    /// Fill an empty portfolio with random catalog lots priced at today's
    /// quotes, within the simulation budget. Returns the number of lots added.
    pub async fn simulate_portfolio<R: Rng + ?Sized>(
        &mut self,
        catalog: &AssetCatalog,
        rng: &mut R,
    ) -> Result<usize, DashboardError> {
        if !self.portfolio.is_empty() {
            return Err(DashboardError::ValidationError(
                "The portfolio already has holdings; clear it before simulating".into(),
            ));
        }
        let sim = &self.settings.simulation;
        let tickers = self.simulation_service.sample_tickers(catalog, sim, rng);

        let mut priced = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            let price = self.current_price(&ticker).await;
            priced.push((ticker, price));
        }

        let holdings = self.simulation_service.build_holdings(&priced, sim, rng);
        let count = holdings.len();
        if count > 0 {
            self.portfolio.holdings.extend(holdings);
            self.dirty = true;
        }
        log::info!("Simulated portfolio with {count} holdings");
        Ok(count)
    }

    // ── Valuation & Analysis ────────────────────────────────────────

    /// Value every holding against market data, one fetch at a time.
    ///
    /// Holdings without a purchase or current price are skipped and listed
    /// in `ValuationRun::skipped`.
    pub async fn valuate(&self) -> ValuationRun {
        let mut outcomes = Vec::with_capacity(self.portfolio.len());
        for holding in &self.portfolio.holdings {
            let purchase = self.purchase_price(holding).await;
            let current = self.current_price(&holding.ticker).await;
            outcomes.push(self.valuation_service.value_holding(holding, purchase, current));
        }

        let run = ValuationRun::from_outcomes(outcomes);
        for (ticker, reason) in &run.skipped {
            log::warn!("Skipping {ticker}: {reason}");
        }
        if run.is_empty() && !self.portfolio.is_empty() {
            log::warn!("No holding could be valued");
        }
        run
    }

    #[must_use]
    pub fn portfolio_summary(&self, run: &ValuationRun) -> PortfolioSummary {
        self.aggregation_service.aggregate(&run.records)
    }

    #[must_use]
    pub fn alerts(&self, summary: &PortfolioSummary) -> Vec<Alert> {
        self.aggregation_service
            .evaluate_alerts(summary, &self.settings.thresholds)
    }

    /// Pie-chart slices, largest first.
    #[must_use]
    pub fn allocation(&self, summary: &PortfolioSummary) -> Vec<HoldingShare> {
        self.aggregation_service.allocation(summary)
    }

    /// Full analysis: valuation, aggregates, alerts and this week's
    /// highlighted headlines rendered as report statements.
    pub async fn analyze(&self, generated_on: NaiveDate) -> AnalysisReport {
        let run = self.valuate().await;
        let summary = self.portfolio_summary(&run);
        let alerts = self.alerts(&summary);

        let tagged = self.fetch_headlines().await;
        let headlines = self
            .news_service
            .highlighted(&tagged, self.settings.ranking_size);

        let input = ReportInput {
            records: &run.records,
            summary: &summary,
            alerts: &alerts,
            headlines: &headlines,
            generated_on,
        };
        self.report_service.generate(&input, &self.settings)
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Close series of `tickers` over `period`, aligned on one date axis,
    /// with the latest price and period change of each.
    pub async fn asset_evolution(
        &self,
        tickers: &[&str],
        period: Period,
    ) -> (AlignedSeries, Vec<SeriesPerformance>) {
        let mut fetched = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            match self.market.get_price_period(ticker, period).await {
                Ok(series) if !series.is_empty() => fetched.push(series),
                Ok(_) => log::warn!("No {period} history for {ticker}"),
                Err(e) => log::warn!("Failed to fetch {period} history for {ticker}: {e}"),
            }
        }

        let performance = fetched
            .iter()
            .filter_map(|s| self.valuation_service.series_performance(s))
            .collect();
        (self.alignment_service.align(&fetched), performance)
    }

    /// Value of the portfolio over time: each valued lot's closes since its
    /// acquisition date scaled by quantity, plus their "Total".
    ///
    /// Only lots present in `run.records` are charted; skipped holdings are
    /// left out.
    pub async fn portfolio_history(
        &self,
        run: &ValuationRun,
        until: NaiveDate,
    ) -> (AlignedSeries, PriceSeries) {
        let mut lots = Vec::with_capacity(run.records.len());
        for record in &run.records {
            match self
                .market
                .get_price_range(&record.ticker, record.date, until)
                .await
            {
                Ok(series) if !series.is_empty() => lots.push((series, record.quantity)),
                Ok(_) => log::warn!("No history for {} since {}", record.ticker, record.date),
                Err(e) => log::warn!("Failed to fetch history for {}: {e}", record.ticker),
            }
        }
        self.alignment_service.portfolio_history(&lots)
    }

    // ── News ────────────────────────────────────────────────────────

    /// The latest feed items, classified. An unavailable feed yields an
    /// empty list.
    pub async fn fetch_headlines(&self) -> Vec<TaggedNewsItem> {
        match self.news.fetch().await {
            Ok(items) => self
                .news_service
                .tag_items(items, self.settings.news.max_items),
            Err(e) => {
                log::warn!("News feed {} unavailable: {e}", self.news.name());
                Vec::new()
            }
        }
    }

    /// Headline table export, tagged with the feed's source name.
    pub fn export_headlines_csv(&self, tagged: &[TaggedNewsItem]) -> Result<String, DashboardError> {
        csv_format::write_headlines(tagged, self.news.name())
    }

    #[must_use]
    pub fn news_service(&self) -> &NewsService {
        &self.news_service
    }

    // ── Quotes ──────────────────────────────────────────────────────

    /// Daily variation of each ticker and the top movers.
    /// Tickers whose quote cannot be fetched are left out.
    pub async fn market_snapshot(
        &self,
        tickers: &[&str],
        catalog: &AssetCatalog,
    ) -> (Vec<QuoteVariation>, Movers) {
        let mut snapshots = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            match self.market.get_latest_quote(ticker).await {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(e) => log::warn!("Failed to fetch quote for {ticker}: {e}"),
            }
        }
        let variations = self.quote_service.variations(&snapshots, catalog);
        let movers = self
            .quote_service
            .movers(&variations, self.settings.ranking_size);
        (variations, movers)
    }

    // ── Exchange Rates ──────────────────────────────────────────────

    /// Load, sort and forward-fill the exchange-rate file (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_exchange_rates(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<ExchangeRateTable, DashboardError> {
        let rows = csv_format::load_exchange_rates(path)?;
        Ok(self.exchange_rate_service.normalize(rows))
    }

    /// Sort and forward-fill exchange-rate CSV text.
    pub fn parse_exchange_rates(&self, csv: &str) -> Result<ExchangeRateTable, DashboardError> {
        let rows = csv_format::read_exchange_rates(csv.as_bytes())?;
        Ok(self.exchange_rate_service.normalize(rows))
    }

    #[must_use]
    pub fn exchange_rate_service(&self) -> &ExchangeRateService {
        &self.exchange_rate_service
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings. The topic map takes effect immediately; the
    /// feed URL only applies to dashboards created afterwards.
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), DashboardError> {
        settings.validate()?;
        self.news_service = NewsService::new(settings.news.topics.clone());
        self.settings = settings;
        Ok(())
    }

    // ── Price lookups ───────────────────────────────────────────────

    /// First close on or after the acquisition date, within the lookup window
    /// of `purchase_lookup_days` calendar days starting at that date.
    async fn purchase_price(&self, holding: &Holding) -> Option<f64> {
        let Some(until) = Duration::try_days(self.settings.purchase_lookup_days.saturating_sub(1))
            .and_then(|window| holding.date.checked_add_signed(window))
        else {
            log::warn!(
                "Purchase lookup window for {} overflows the calendar from {}",
                holding.ticker,
                holding.date
            );
            return None;
        };
        match self
            .market
            .get_price_range(&holding.ticker, holding.date, until)
            .await
        {
            Ok(series) => series.first_on_or_after(holding.date).map(|p| p.price),
            Err(e) => {
                log::warn!(
                    "Failed to fetch purchase price for {} on {}: {e}",
                    holding.ticker,
                    holding.date
                );
                None
            }
        }
    }

    async fn current_price(&self, ticker: &str) -> Option<f64> {
        match self.market.get_latest_quote(ticker).await {
            Ok(quote) => Some(quote.price),
            Err(e) => {
                log::warn!("Failed to fetch current price for {ticker}: {e}");
                None
            }
        }
    }
}
