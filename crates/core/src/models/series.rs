use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One column of an aligned table. `values[i]` belongs to `AlignedSeries::dates[i]`.
///
/// `None` marks dates before the column's first observation (no back-fill).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedColumn {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Several price series merged on the union of their dates.
///
/// The core generates these; the frontend just renders them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    /// Union of all input dates, ascending
    pub dates: Vec<NaiveDate>,

    /// Columns ordered by label
    pub columns: Vec<AlignedColumn>,
}

impl AlignedSeries {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn column(&self, label: &str) -> Option<&AlignedColumn> {
        self.columns.iter().find(|c| c.label == label)
    }

    /// Row `idx` across all columns, in column order.
    #[must_use]
    pub fn row(&self, idx: usize) -> Vec<Option<f64>> {
        self.columns
            .iter()
            .map(|c| c.values.get(idx).copied().flatten())
            .collect()
    }

    /// Long ("melted") format: one `(date, label, value)` triple per filled cell.
    /// Handy for line-chart libraries that expect a color column.
    #[must_use]
    pub fn to_long(&self) -> Vec<(NaiveDate, &str, f64)> {
        let mut out = Vec::new();
        for (idx, date) in self.dates.iter().enumerate() {
            for column in &self.columns {
                if let Some(Some(value)) = column.values.get(idx) {
                    out.push((*date, column.label.as_str(), *value));
                }
            }
        }
        out
    }
}
