use chrono::NaiveDate;

use crate::models::report::{AnalysisReport, RankedEntry, Section, Severity, Statement};
use crate::models::settings::Settings;
use crate::models::valuation::{Alert, PortfolioSummary, ValuationRecord};
use crate::services::quote_service::rank;

/// Everything the report is rendered from. All values are already computed.
pub struct ReportInput<'a> {
    pub records: &'a [ValuationRecord],
    pub summary: &'a PortfolioSummary,
    pub alerts: &'a [Alert],
    /// Headlines worth mentioning, already filtered and limited
    pub headlines: &'a [String],
    pub generated_on: NaiveDate,
}

/// Turns aggregates, alerts and headlines into templated statements.
///
/// Pure formatting: no new numbers are derived here beyond ordering.
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, input: &ReportInput<'_>, settings: &Settings) -> AnalysisReport {
        let mut statements = Vec::new();

        if input.records.is_empty() {
            statements.push(Statement::new(
                Section::Overview,
                Severity::Warning,
                "No valuation data could be obtained for the portfolio holdings.",
            ));
            return AnalysisReport {
                generated_on: input.generated_on,
                statements,
            };
        }

        let summary = input.summary;
        let n = settings.ranking_size;

        // ── Overview ────────────────────────────────────────────────
        statements.push(Statement::new(
            Section::Overview,
            Severity::Info,
            format!(
                "Based on the current portfolio, the total return since acquisition is {:.2}%, \
                 a net {} of {}.",
                summary.total_return_pct,
                if summary.net_gain() >= 0.0 { "gain" } else { "loss" },
                format_money(summary.net_gain().abs()),
            ),
        ));

        let entries: Vec<RankedEntry> = input
            .records
            .iter()
            .map(|r| RankedEntry {
                ticker: r.ticker.clone(),
                name: r.ticker.clone(),
                change_pct: r.return_pct,
            })
            .collect();
        let movers = rank(&entries, n);

        let best: Vec<&str> = movers.gainers.iter().map(|e| e.ticker.as_str()).collect();
        statements.push(Statement::new(
            Section::Overview,
            Severity::Success,
            format!("The best performing assets were: {}.", best.join(", ")),
        ));

        let benchmark = settings.benchmark_return_pct;
        statements.push(Statement::new(
            Section::Overview,
            Severity::Info,
            format!(
                "Compared with a hypothetical {benchmark}% annual benchmark, the portfolio {} that reference.",
                if summary.total_return_pct > benchmark { "beat" } else { "fell below" },
            ),
        ));

        // ── Rankings ────────────────────────────────────────────────
        statements.push(Statement::new(
            Section::Rankings,
            Severity::Info,
            format!("Top gainers: {}.", format_ranked(&movers.gainers)),
        ));
        statements.push(Statement::new(
            Section::Rankings,
            Severity::Info,
            format!("Top losers: {}.", format_ranked(&movers.losers)),
        ));

        // ── Alerts ──────────────────────────────────────────────────
        statements.extend(self.alert_statements(input.alerts, settings));

        // ── News ────────────────────────────────────────────────────
        if input.headlines.is_empty() {
            statements.push(Statement::new(
                Section::News,
                Severity::Info,
                "No highlighted economic events were detected this week.",
            ));
        } else {
            for headline in input.headlines.iter().take(n) {
                statements.push(Statement::new(
                    Section::News,
                    Severity::Info,
                    format!("Event that may have influenced the portfolio: {headline}"),
                ));
            }
        }

        AnalysisReport {
            generated_on: input.generated_on,
            statements,
        }
    }

    /// One statement per alert group: a single concentration warning listing
    /// every ticker, one error line per severe loss, one underperformance note.
    pub fn alert_statements(&self, alerts: &[Alert], settings: &Settings) -> Vec<Statement> {
        let t = &settings.thresholds;
        let mut statements = Vec::new();

        let concentrated: Vec<&str> = alerts
            .iter()
            .filter_map(|a| match a {
                Alert::OverConcentration { ticker, .. } => Some(ticker.as_str()),
                _ => None,
            })
            .collect();
        if !concentrated.is_empty() {
            statements.push(Statement::new(
                Section::Alerts,
                Severity::Warning,
                format!(
                    "The assets {} represent more than {}% of the total portfolio. \
                     This may be excessive exposure.",
                    concentrated.join(", "),
                    t.concentration_pct,
                ),
            ));
        }

        for alert in alerts {
            if let Alert::SevereLoss { ticker, return_pct } = alert {
                statements.push(Statement::new(
                    Section::Alerts,
                    Severity::Error,
                    format!(
                        "{ticker} fell {return_pct:.2}%, a loss larger than {}%.",
                        t.severe_loss_pct.abs()
                    ),
                ));
            }
        }

        if alerts.iter().any(|a| matches!(a, Alert::Underperformance { .. })) {
            statements.push(Statement::new(
                Section::Alerts,
                Severity::Info,
                format!(
                    "The total portfolio return is below {}%. It may be time to review the strategy.",
                    t.underperformance_pct
                ),
            ));
        }

        statements
    }
}

impl Default for ReportService {
    fn default() -> Self {
        Self::new()
    }
}

fn format_ranked(entries: &[RankedEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} ({:+.2}%)", e.ticker, e.change_pct))
        .collect::<Vec<_>>()
        .join(", ")
}

/// "$1,234,567.89": two decimals, comma thousands separator. Non-finite
/// amounts render as "$N/A".
pub fn format_money(amount: f64) -> String {
    if !amount.is_finite() {
        return "$N/A".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}.{frac_part}")
}
