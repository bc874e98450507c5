use crate::errors::DashboardError;
use crate::models::holding::Portfolio;

use super::csv_format;

/// Where the portfolio lives between sessions.
///
/// Stores hold the CSV export format, so a saved portfolio can also be
/// opened by hand or re-imported elsewhere.
pub trait PortfolioStore {
    /// Read the saved portfolio. A store that was never written yields an
    /// empty portfolio.
    fn load(&self) -> Result<Portfolio, DashboardError>;

    /// Replace the saved portfolio.
    fn save(&mut self, portfolio: &Portfolio) -> Result<(), DashboardError>;
}

/// Portfolio kept as a CSV file on disk (native only).
#[cfg(not(target_arch = "wasm32"))]
pub struct CsvFileStore {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl CsvFileStore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PortfolioStore for CsvFileStore {
    fn load(&self) -> Result<Portfolio, DashboardError> {
        if !self.path.exists() {
            log::debug!("No saved portfolio at {}", self.path.display());
            return Ok(Portfolio::new());
        }
        let file = std::fs::File::open(&self.path)
            .map_err(|e| DashboardError::data_file(&self.path, e))?;
        let holdings = csv_format::read_portfolio(file)
            .map_err(|e| DashboardError::data_file(&self.path, e))?;
        Ok(Portfolio::from_holdings(holdings))
    }

    fn save(&mut self, portfolio: &Portfolio) -> Result<(), DashboardError> {
        let csv = csv_format::write_portfolio(&portfolio.holdings)?;
        std::fs::write(&self.path, csv)?;
        log::info!(
            "Saved {} holdings to {}",
            portfolio.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// In-memory store, for WASM hosts that persist the CSV text themselves.
#[derive(Debug, Default)]
pub struct MemoryPortfolioStore {
    contents: Option<String>,
}

impl MemoryPortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously exported CSV text.
    pub fn from_csv(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
        }
    }

    /// The last saved CSV text, if any.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl PortfolioStore for MemoryPortfolioStore {
    fn load(&self) -> Result<Portfolio, DashboardError> {
        match &self.contents {
            Some(text) => Ok(Portfolio::from_holdings(csv_format::read_portfolio(
                text.as_bytes(),
            )?)),
            None => Ok(Portfolio::new()),
        }
    }

    fn save(&mut self, portfolio: &Portfolio) -> Result<(), DashboardError> {
        self.contents = Some(csv_format::write_portfolio(&portfolio.holdings)?);
        Ok(())
    }
}
