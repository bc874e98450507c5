//! Tabular file formats: portfolio export/import, exchange rates, asset
//! catalog, and the headline / quote exports.

use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;
use crate::models::catalog::{AssetCatalog, CatalogEntry};
use crate::models::exchange_rate::ExchangeRateRow;
use crate::models::holding::Holding;
use crate::models::news::TaggedNewsItem;
use crate::models::report::QuoteVariation;

/// Header of the portfolio export.
pub const PORTFOLIO_HEADER: [&str; 3] = ["ticker", "date", "quantity"];

// ── Portfolio ───────────────────────────────────────────────────────

/// One exported lot. The Spanish headers of older exports are accepted.
#[derive(Debug, Serialize, Deserialize)]
struct HoldingRecord {
    #[serde(alias = "Ticker")]
    ticker: String,
    #[serde(alias = "Fecha")]
    date: String,
    #[serde(alias = "Cantidad")]
    quantity: f64,
}

/// Serialize holdings as `ticker,date,quantity` CSV (dates as YYYY-MM-DD).
pub fn write_portfolio(holdings: &[Holding]) -> Result<String, DashboardError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if holdings.is_empty() {
        writer.write_record(PORTFOLIO_HEADER)?;
    }
    for holding in holdings {
        writer.serialize(HoldingRecord {
            ticker: holding.ticker.clone(),
            date: holding.date.format("%Y-%m-%d").to_string(),
            quantity: holding.quantity,
        })?;
    }
    into_string(writer)
}

/// Parse a portfolio export. Any invalid row rejects the whole file.
pub fn read_portfolio<R: Read>(reader: R) -> Result<Vec<Holding>, DashboardError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut holdings = Vec::new();

    for (idx, result) in reader.deserialize::<HoldingRecord>().enumerate() {
        let line = idx + 2; // header is line 1
        let record = result?;
        if record.ticker.trim().is_empty() {
            return Err(DashboardError::ValidationError(format!("Line {line}: empty ticker")));
        }
        if !record.quantity.is_finite() || record.quantity <= 0.0 {
            return Err(DashboardError::ValidationError(format!(
                "Line {line}: quantity must be positive, got {}",
                record.quantity
            )));
        }
        let date = parse_date(&record.date).ok_or_else(|| {
            DashboardError::ValidationError(format!("Line {line}: invalid date '{}'", record.date))
        })?;
        holdings.push(Holding::new(record.ticker, date, record.quantity));
    }

    Ok(holdings)
}

// ── Exchange rates ──────────────────────────────────────────────────

/// Required columns of the rates file: field name, label, accepted spellings.
/// Spellings are compared lowercased with spaces and dashes as underscores.
const RATE_COLUMNS: [(&str, &str, &[&str]); 6] = [
    ("date", "fecha", &["date", "fecha"]),
    ("usd_ccl", "USD CCL", &["usd_ccl"]),
    ("usd_mep", "USD MEP", &["usd_mep"]),
    ("official", "OFICIAL", &["official", "oficial"]),
    ("eur", "EUR", &["eur"]),
    ("uyu", "UYU", &["uyu"]),
];

#[derive(Debug, Deserialize)]
struct RateRecord {
    date: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    usd_ccl: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    usd_mep: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    official: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    eur: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    uyu: Option<f64>,
}

/// Rename known header spellings to their field names, failing on the first
/// required column that is absent.
fn canonical_rate_headers(headers: &csv::StringRecord) -> Result<csv::StringRecord, DashboardError> {
    let names: Vec<String> = headers
        .iter()
        .map(|header| {
            let key = header.trim().to_lowercase().replace([' ', '-'], "_");
            RATE_COLUMNS
                .iter()
                .find(|&&(_, _, spellings)| spellings.contains(&key.as_str()))
                .map_or_else(|| header.to_string(), |&(field, _, _)| field.to_string())
        })
        .collect();

    if let Some((_, label, _)) = RATE_COLUMNS
        .iter()
        .find(|&&(field, _, _)| !names.iter().any(|n| n.as_str() == field))
    {
        return Err(DashboardError::Csv(format!("Missing column '{label}'")));
    }
    Ok(csv::StringRecord::from(names))
}

/// Parse the exchange-rate file into raw (unsorted, unfilled) rows.
///
/// Every rate column must be present. Empty or non-numeric quotes become
/// `None`; an unparseable date rejects the file.
pub fn read_exchange_rates<R: Read>(reader: R) -> Result<Vec<ExchangeRateRow>, DashboardError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = canonical_rate_headers(reader.headers()?)?;
    reader.set_headers(headers);
    let mut rows = Vec::new();

    for (idx, result) in reader.deserialize::<RateRecord>().enumerate() {
        let record = result?;
        let date = parse_date(&record.date).ok_or_else(|| {
            DashboardError::Csv(format!("Line {}: invalid date '{}'", idx + 2, record.date))
        })?;
        rows.push(ExchangeRateRow {
            date,
            usd_ccl: record.usd_ccl,
            usd_mep: record.usd_mep,
            official: record.official,
            eur: record.eur,
            uyu: record.uyu,
            gap_pct: None,
        });
    }

    Ok(rows)
}

// ── Asset catalog ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(alias = "Ticker")]
    ticker: String,
    #[serde(alias = "Nombre")]
    name: String,
}

/// Parse the asset catalog (`ticker,name`). Rows with an empty ticker are ignored.
pub fn read_catalog<R: Read>(reader: R) -> Result<AssetCatalog, DashboardError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut entries = Vec::new();
    for result in reader.deserialize::<CatalogRecord>() {
        let record = result?;
        if record.ticker.is_empty() {
            continue;
        }
        entries.push(CatalogEntry::new(record.ticker, record.name));
    }
    Ok(AssetCatalog::new(entries))
}

// ── Exports ─────────────────────────────────────────────────────────

/// Headline table: title, date, source, link, comma-joined topics.
pub fn write_headlines(tagged: &[TaggedNewsItem], source: &str) -> Result<String, DashboardError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["title", "date", "source", "link", "topics"])?;
    for t in tagged {
        writer.write_record([
            t.item.title.as_str(),
            t.item.display_date().as_str(),
            source,
            t.item.link.as_str(),
            t.topics.join(", ").as_str(),
        ])?;
    }
    into_string(writer)
}

/// Quote table: ticker, name, price, previous close, variation %.
pub fn write_quote_variations(variations: &[QuoteVariation]) -> Result<String, DashboardError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["ticker", "name", "price", "previous_close", "variation_pct"])?;
    for v in variations {
        writer.write_record([
            v.ticker.clone(),
            v.name.clone(),
            v.price.to_string(),
            v.previous_close.to_string(),
            v.variation_pct.to_string(),
        ])?;
    }
    into_string(writer)
}

// ── Files on disk (native only) ─────────────────────────────────────

/// Load the asset catalog from disk. A missing or unreadable file is fatal.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_catalog(path: impl AsRef<std::path::Path>) -> Result<AssetCatalog, DashboardError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| DashboardError::data_file(path, e))?;
    read_catalog(file).map_err(|e| DashboardError::data_file(path, e))
}

/// Load the raw exchange-rate rows from disk. A missing or unreadable file is fatal.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_exchange_rates(
    path: impl AsRef<std::path::Path>,
) -> Result<Vec<ExchangeRateRow>, DashboardError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|e| DashboardError::data_file(path, e))?;
    read_exchange_rates(file).map_err(|e| DashboardError::data_file(path, e))
}

// ── Helpers ─────────────────────────────────────────────────────────

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String, DashboardError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| DashboardError::Serialization(format!("Failed to flush CSV: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| DashboardError::Serialization(format!("CSV output is not UTF-8: {e}")))
}
