use serde::{Deserialize, Serialize};

/// A tick record converted to numbers.
///
/// `tick_range` is always `upper_tick - lower_tick`; build rows through
/// [`NumericRow::new`] so it can never drift from the ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericRow {
    pub lower_tick: f64,
    pub upper_tick: f64,
    pub liquidity_amount: f64,
    pub tick_range: f64,
}

impl NumericRow {
    pub fn new(lower_tick: f64, upper_tick: f64, liquidity_amount: f64) -> Self {
        Self {
            lower_tick,
            upper_tick,
            liquidity_amount,
            tick_range: upper_tick - lower_tick,
        }
    }

    /// True when any field failed to parse.
    pub fn has_nan(&self) -> bool {
        self.lower_tick.is_nan() || self.upper_tick.is_nan() || self.liquidity_amount.is_nan()
    }
}

/// Summary of `liquidity_amount` over the full, unfiltered row set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub count: usize,
}
