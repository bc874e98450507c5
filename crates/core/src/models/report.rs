use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How a statement should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Success => write!(f, "success"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Which part of the report a statement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Overview,
    Rankings,
    Alerts,
    News,
}

/// One human-readable line of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    pub section: Section,
    pub severity: Severity,
    pub text: String,
}

impl Statement {
    pub fn new(section: Section, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            section,
            severity,
            text: text.into(),
        }
    }
}

/// The templated portfolio analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub generated_on: NaiveDate,
    pub statements: Vec<Statement>,
}

impl AnalysisReport {
    /// Statements of one section, in report order.
    #[must_use]
    pub fn section(&self, section: Section) -> Vec<&Statement> {
        self.statements.iter().filter(|s| s.section == section).collect()
    }

    #[must_use]
    pub fn has_severity(&self, severity: Severity) -> bool {
        self.statements.iter().any(|s| s.severity == severity)
    }

    /// Plain-text rendering, one statement per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for statement in &self.statements {
            out.push_str("- ");
            out.push_str(&statement.text);
            out.push('\n');
        }
        out
    }
}

/// A ranked entry in a gainers/losers list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub ticker: String,
    /// Display name when known (catalog), otherwise the ticker
    pub name: String,
    pub change_pct: f64,
}

/// Daily variation of one quoted ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteVariation {
    pub ticker: String,
    pub name: String,
    pub price: f64,
    pub previous_close: f64,
    /// (price − previous_close) / previous_close × 100
    pub variation_pct: f64,
}

/// Top gainers and losers of a ranking pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Movers {
    pub gainers: Vec<RankedEntry>,
    pub losers: Vec<RankedEntry>,
}
