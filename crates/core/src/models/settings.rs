use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;
use super::news::TopicMap;

/// Upper bound for `Settings::purchase_lookup_days`.
pub const MAX_LOOKUP_DAYS: i64 = 366;

/// Alert thresholds, all in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// A holding above this share of the portfolio is flagged
    pub concentration_pct: f64,
    /// A holding returning less than this is flagged (negative number)
    pub severe_loss_pct: f64,
    /// A portfolio returning less than this overall is flagged
    pub underperformance_pct: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            concentration_pct: 30.0,
            severe_loss_pct: -20.0,
            underperformance_pct: 5.0,
        }
    }
}

/// News feed configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSettings {
    /// RSS endpoint
    pub feed_url: String,
    /// Source name shown next to each headline
    pub source_name: String,
    /// Only the first N feed items are classified
    pub max_items: usize,
    pub topics: TopicMap,
}

impl Default for NewsSettings {
    fn default() -> Self {
        Self {
            feed_url: "https://www.cronista.com/files/rss/finanzas.xml".to_string(),
            source_name: "El Cronista".to_string(),
            max_items: 20,
            topics: TopicMap::default(),
        }
    }
}

/// Parameters of the randomly generated demo portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Stop adding lots once the next one would exceed this amount
    pub budget: f64,
    /// Number of catalog tickers sampled
    pub sample_size: usize,
    /// Quantity is drawn uniformly from 1..=max_quantity
    pub max_quantity: u32,
    /// Acquisition date assigned to every simulated lot
    pub acquisition_date: NaiveDate,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            budget: 150_000.0,
            sample_size: 5,
            max_quantity: 10,
            acquisition_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
        }
    }
}

/// User-configurable settings. Every field falls back to its default
/// when absent from the JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub thresholds: AlertThresholds,

    /// Hypothetical annual benchmark the portfolio return is compared against
    pub benchmark_return_pct: f64,

    /// Length of the gainers/losers/performers lists
    pub ranking_size: usize,

    /// Calendar days searched for a purchase close, the acquisition date included
    pub purchase_lookup_days: i64,

    pub news: NewsSettings,

    pub simulation: SimulationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thresholds: AlertThresholds::default(),
            benchmark_return_pct: 15.0,
            ranking_size: 3,
            purchase_lookup_days: 5,
            news: NewsSettings::default(),
            simulation: SimulationSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, DashboardError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| DashboardError::data_file(path, e))?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, DashboardError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DashboardError::Serialization(format!("Failed to serialize settings: {e}")))
    }

    /// Reject settings the calculations cannot work with.
    pub fn validate(&self) -> Result<(), DashboardError> {
        let t = &self.thresholds;
        for (name, value) in [
            ("concentration_pct", t.concentration_pct),
            ("severe_loss_pct", t.severe_loss_pct),
            ("underperformance_pct", t.underperformance_pct),
            ("benchmark_return_pct", self.benchmark_return_pct),
        ] {
            if !value.is_finite() {
                return Err(DashboardError::Config(format!("{name} must be a finite number")));
            }
        }
        if self.news.topics.default_topic.trim().is_empty() {
            return Err(DashboardError::Config("default topic must not be empty".into()));
        }
        if let Some(rule) = self.news.topics.rules.iter().find(|r| r.topic.trim().is_empty()) {
            return Err(DashboardError::Config(format!(
                "topic rule with keywords {:?} has an empty name",
                rule.keywords
            )));
        }
        if !(1..=MAX_LOOKUP_DAYS).contains(&self.purchase_lookup_days) {
            return Err(DashboardError::Config(format!(
                "purchase_lookup_days must be between 1 and {MAX_LOOKUP_DAYS}"
            )));
        }
        if !self.simulation.budget.is_finite() || self.simulation.budget <= 0.0 {
            return Err(DashboardError::Config("simulation budget must be positive".into()));
        }
        if self.simulation.max_quantity == 0 {
            return Err(DashboardError::Config("simulation max_quantity must be at least 1".into()));
        }
        Ok(())
    }
}
