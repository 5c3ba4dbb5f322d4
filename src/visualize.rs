//! Chart and terminal rendering of processed tick rows.
//!
//! [`build_trace`] and [`build_layout`] emit a Plotly-compatible `scatter3d`
//! description (lower tick × upper tick × liquidity) for whatever front-end
//! draws the chart. The ASCII helpers back the CLI summary.

use std::fmt::Write as _;

use serde::Serialize;

use crate::model::{NumericRow, SummaryStats};
use crate::pipeline::HistogramBin;

const HOVER_TEMPLATE: &str =
    "Lower Tick: %{x}<br>Upper Tick: %{y}<br>Liquidity: %{z:,.0f}<extra></extra>";

// ── Chart description ────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    pub marker: Marker,
    pub hovertemplate: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub size: f64,
    pub color: Vec<f64>,
    pub colorscale: &'static str,
    pub colorbar: ColorBar,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartLayout {
    pub title: Title,
    pub scene: Scene,
}

#[derive(Debug, Clone, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub aspectmode: &'static str,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
}

#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub title: Title,
}

impl Axis {
    fn titled(text: &str) -> Self {
        Self {
            title: Title {
                text: text.to_string(),
            },
        }
    }
}

/// Trace plus layout, the shape a Plotly `newPlot` call takes.
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub data: Vec<ScatterTrace>,
    pub layout: ChartLayout,
}

/// Marker size for a 1-100 slider value.
pub fn marker_size(dot_size: f64) -> f64 {
    (dot_size / 10.0).clamp(1.0, 10.0)
}

pub fn build_trace(rows: &[NumericRow], dot_size: f64) -> ScatterTrace {
    ScatterTrace {
        kind: "scatter3d",
        mode: "markers",
        x: rows.iter().map(|r| r.lower_tick).collect(),
        y: rows.iter().map(|r| r.upper_tick).collect(),
        z: rows.iter().map(|r| r.liquidity_amount).collect(),
        marker: Marker {
            size: marker_size(dot_size),
            color: rows.iter().map(|r| r.liquidity_amount).collect(),
            colorscale: "Viridis",
            colorbar: ColorBar {
                title: "Liquidity".to_string(),
            },
            opacity: 0.8,
        },
        hovertemplate: HOVER_TEMPLATE,
    }
}

pub fn build_layout(block_height: Option<&str>) -> ChartLayout {
    let text = match block_height {
        Some(h) if !h.is_empty() => format!("Liquidity Per Tick Range - Height {h}"),
        _ => "Liquidity Per Tick Range".to_string(),
    };
    ChartLayout {
        title: Title { text },
        scene: Scene {
            aspectmode: "cube",
            xaxis: Axis::titled("Lower Tick"),
            yaxis: Axis::titled("Upper Tick"),
            zaxis: Axis::titled("Liquidity Amount"),
        },
    }
}

pub fn build_chart(rows: &[NumericRow], dot_size: f64, block_height: Option<&str>) -> Chart {
    Chart {
        data: vec![build_trace(rows, dot_size)],
        layout: build_layout(block_height),
    }
}

// ── ASCII ────────────────────────────────────────────────────────────

pub fn render_stats(stats: &SummaryStats, filtered: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Liquidity (all {} rows)", stats.count);
    let _ = writeln!(out, "    mean    {:>24.4}", stats.mean);
    let _ = writeln!(out, "    median  {:>24.4}", stats.median);
    let _ = writeln!(out, "    stddev  {:>24.4}", stats.std_dev);
    let _ = writeln!(
        out,
        "  After 99th-percentile cut: {} rows ({} removed)",
        filtered,
        stats.count.saturating_sub(filtered)
    );
    out
}

/// Horizontal bar chart of a histogram, bars scaled to `width` columns.
pub fn render_histogram(bins: &[HistogramBin], width: usize) -> String {
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0);
    let mut out = String::new();
    for bin in bins {
        let len = if peak == 0 {
            0
        } else {
            (bin.count * width).div_ceil(peak)
        };
        let _ = writeln!(
            out,
            "  {:>14.4e} │{:<width$}│ {}",
            bin.lower,
            "█".repeat(len),
            bin.count,
            width = width
        );
    }
    out
}
