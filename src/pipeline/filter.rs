use crate::model::NumericRow;

use super::stats::quantile;

pub const OUTLIER_QUANTILE: f64 = 0.99;

/// Keep rows whose liquidity AND tick range are both strictly below their
/// own 99th-percentile thresholds. Input order is preserved.
///
/// Values equal to a threshold are dropped too, so a column with a single
/// repeated value filters out every row.
pub fn filter_outliers(rows: &[NumericRow]) -> Vec<NumericRow> {
    if rows.is_empty() {
        return Vec::new();
    }

    let liquidity_cut = threshold(rows.iter().map(|r| r.liquidity_amount));
    let range_cut = threshold(rows.iter().map(|r| r.tick_range));

    rows.iter()
        .filter(|r| r.liquidity_amount < liquidity_cut && r.tick_range < range_cut)
        .copied()
        .collect()
}

fn threshold(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    sorted.sort_by(f64::total_cmp);
    quantile(&sorted, OUTLIER_QUANTILE)
}
