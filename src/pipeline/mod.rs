//! Numeric processing of tick records: parsing, full-sample statistics and
//! the joint 99th-percentile outlier cut.
//!
//! Everything here is pure and synchronous. Malformed decimal strings become
//! `NaN` instead of failing the batch, and that `NaN` is allowed to flow into
//! the statistics and thresholds. Callers that care can check
//! [`Analysis::invalid_rows`].

mod filter;
mod stats;

use serde::Serialize;

use crate::model::{NumericRow, SummaryStats, TickRecord};

pub use filter::{OUTLIER_QUANTILE, filter_outliers};
pub use stats::{HistogramBin, compute_stats, histogram, quantile};

/// Output of one parse → stats → filter pass.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Every parsed row, in input order.
    pub rows: Vec<NumericRow>,
    /// Stats over `rows` (pre-filter).
    pub stats: SummaryStats,
    /// Rows surviving the outlier cut, in input order.
    pub filtered: Vec<NumericRow>,
    /// Rows with at least one field that did not parse as a number.
    pub invalid_rows: usize,
}

/// Convert wire records into numeric rows, 1:1 and in order.
pub fn parse_rows(records: &[TickRecord]) -> Vec<NumericRow> {
    records
        .iter()
        .map(|r| {
            NumericRow::new(
                parse_decimal(&r.lower_tick),
                parse_decimal(&r.upper_tick),
                parse_decimal(&r.liquidity_amount),
            )
        })
        .collect()
}

/// Decimal string → f64, `NaN` when the text is not a finite number.
///
/// `str::parse` also accepts `inf`, `infinity` and signed `nan`; all of those
/// collapse to the canonical positive `NaN` so it sorts after every number.
pub fn parse_decimal(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => f64::NAN,
    }
}

pub fn analyze(records: &[TickRecord]) -> Analysis {
    let rows = parse_rows(records);
    let invalid_rows = rows.iter().filter(|r| r.has_nan()).count();
    if invalid_rows > 0 {
        tracing::warn!(
            invalid_rows,
            total = rows.len(),
            "some tick records did not parse as numbers; NaN will propagate into stats"
        );
    }
    let stats = compute_stats(&rows);
    let filtered = filter_outliers(&rows);
    tracing::debug!(
        total = rows.len(),
        kept = filtered.len(),
        "outlier filter applied"
    );

    Analysis {
        rows,
        stats,
        filtered,
        invalid_rows,
    }
}
