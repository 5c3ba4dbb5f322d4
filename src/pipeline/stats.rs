use serde::Serialize;

use crate::model::{NumericRow, SummaryStats};

/// Mean, median and sample standard deviation of `liquidity_amount`.
///
/// An empty slice yields all zeros. With a single row the Bessel divisor is
/// zero and `std_dev` comes out `NaN`; that is left visible to the caller.
pub fn compute_stats(rows: &[NumericRow]) -> SummaryStats {
    let n = rows.len();
    if n == 0 {
        return SummaryStats::default();
    }

    let values: Vec<f64> = rows.iter().map(|r| r.liquidity_amount).collect();
    let mean = values.iter().sum::<f64>() / n as f64;

    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);
    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;

    SummaryStats {
        mean,
        median,
        std_dev: variance.sqrt(),
        count: n,
    }
}

/// Linear-interpolation quantile of an ascending slice.
///
/// `q` is clamped to `[0, 1]`. Returns `NaN` for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over the finite values in `values`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: finite.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins {
                max
            } else {
                min + width * (i + 1) as f64
            },
            count: 0,
        })
        .collect();

    for v in finite {
        // max lands in the last bin
        let idx = (((v - min) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}
