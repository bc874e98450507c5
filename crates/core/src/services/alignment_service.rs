use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::price::{PricePoint, PriceSeries};
use crate::models::series::{AlignedColumn, AlignedSeries};

/// Merges independently-dated series onto one date axis.
///
/// Outer join on date + forward-fill per column. Dates before a column's
/// first observation stay `None`: values are never back-filled.
pub struct AlignmentService;

impl AlignmentService {
    pub fn new() -> Self {
        Self
    }

    /// Align `series` on the union of their dates, ascending.
    ///
    /// Columns are ordered by label (ties broken by content), so the result
    /// does not depend on the order of the input slice.
    pub fn align(&self, series: &[PriceSeries]) -> AlignedSeries {
        // Fields are public, so re-establish the sorted/unique-date invariant.
        let series: Vec<PriceSeries> = series
            .iter()
            .map(|s| PriceSeries::new(s.label.clone(), s.points.clone()))
            .collect();

        let dates: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.date))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut ordered: Vec<&PriceSeries> = series.iter().collect();
        ordered.sort_by(|a, b| a.label.cmp(&b.label).then_with(|| cmp_points(&a.points, &b.points)));

        let columns = ordered
            .into_iter()
            .map(|s| AlignedColumn {
                label: s.label.clone(),
                values: forward_fill(&dates, &s.points),
            })
            .collect();

        AlignedSeries { dates, columns }
    }

    /// Sum the columns of an aligned table row by row.
    ///
    /// Rows where any column is still empty (before that holding's first
    /// observation) are dropped, so the total only covers dates where every
    /// holding has a value.
    pub fn total(&self, aligned: &AlignedSeries, label: &str) -> PriceSeries {
        if aligned.columns.is_empty() {
            return PriceSeries::empty(label);
        }
        let points = aligned
            .dates
            .iter()
            .enumerate()
            .filter_map(|(idx, date)| {
                let row = aligned.row(idx);
                let values: Option<Vec<f64>> = row.into_iter().collect();
                values.map(|v| PricePoint::new(*date, v.iter().sum()))
            })
            .collect();
        PriceSeries {
            label: label.to_string(),
            points,
        }
    }

    /// Value history of a set of lots: each close series scaled by its
    /// quantity, aligned, then summed into a single "Total" series.
    pub fn portfolio_history(&self, lots: &[(PriceSeries, f64)]) -> (AlignedSeries, PriceSeries) {
        let scaled: Vec<PriceSeries> = lots
            .iter()
            .map(|(series, quantity)| series.scaled(series.label.clone(), *quantity))
            .collect();
        let aligned = self.align(&scaled);
        let total = self.total(&aligned, "Total");
        (aligned, total)
    }
}

impl Default for AlignmentService {
    fn default() -> Self {
        Self::new()
    }
}

/// Carry the last known value forward across `dates`.
/// `points` must be sorted by date with unique dates (as `PriceSeries` guarantees).
fn forward_fill(dates: &[NaiveDate], points: &[PricePoint]) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(dates.len());
    let mut next = points.iter().peekable();
    let mut last = None;
    for date in dates {
        while let Some(point) = next.peek() {
            if point.date > *date {
                break;
            }
            last = Some(point.price);
            next.next();
        }
        values.push(last);
    }
    values
}

fn cmp_points(a: &[PricePoint], b: &[PricePoint]) -> Ordering {
    for (pa, pb) in a.iter().zip(b) {
        let ord = pa.date.cmp(&pb.date).then_with(|| pa.price.total_cmp(&pb.price));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}
