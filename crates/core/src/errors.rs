use thiserror::Error;

/// Unified error type for the entire econ-dashboard-core library.
/// Every fallible public function returns `Result<T, DashboardError>`.
///
/// Missing market data is NOT an error at the portfolio level: holdings
/// without a quote are reported as skipped (see `FetchOutcome`). Only
/// missing/malformed local files and invalid input abort an operation.
#[derive(Debug, Error)]
pub enum DashboardError {
    // ── Local data files ────────────────────────────────────────────
    #[error("Data file unavailable ({path}): {message}")]
    DataFile { path: String, message: String },

    #[error("Malformed CSV data: {0}")]
    Csv(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api { provider: String, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("News feed error: {0}")]
    Feed(String),

    #[error("Price not available for {ticker} on {date}")]
    PriceNotAvailable { ticker: String, date: String },

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DashboardError {
    /// Build a `DataFile` error for a path that could not be read or parsed.
    pub fn data_file(path: impl AsRef<std::path::Path>, message: impl std::fmt::Display) -> Self {
        DashboardError::DataFile {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for DashboardError {
    fn from(e: std::io::Error) -> Self {
        DashboardError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for DashboardError {
    fn from(e: csv::Error) -> Self {
        DashboardError::Csv(e.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Deserialization(e.to_string())
    }
}

impl From<quick_xml::DeError> for DashboardError {
    fn from(e: quick_xml::DeError) -> Self {
        DashboardError::Feed(format!("Invalid RSS document: {e}"))
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; never echo query strings back.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        DashboardError::Network(sanitized)
    }
}
