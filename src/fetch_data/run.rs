use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::export;
use crate::model::SummaryStats;
use crate::pipeline::{self, Analysis};
use crate::visualize;

use super::config::FetchConfig;
use super::error::AttemptFailure;
use super::source::{EndpointFetcher, FetchSuccess, LiquiditySource, SnapshotFile};

/// What to do with the rows once they are fetched.
pub struct RunOptions {
    pub pool_id: String,
    pub block_height: Option<String>,
    pub out_dir: PathBuf,
    /// Write a CSV export.
    pub csv: bool,
    /// Export every parsed row instead of the filtered subset.
    pub export_all: bool,
    /// Write the Plotly chart description as JSON.
    pub chart: bool,
    pub dot_size: f64,
    /// Write the response body as received.
    pub save_raw: bool,
    /// Print a JSON report on stdout instead of the text summary.
    pub json: bool,
    pub bins: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    pool_id: &'a str,
    block_height: Option<&'a str>,
    source: &'a str,
    failed_attempts: &'a [AttemptFailure],
    stats: SummaryStats,
    total_rows: usize,
    filtered_rows: usize,
    invalid_rows: usize,
    files: Vec<String>,
}

/// Entry point for the `fetch` command.
pub fn run_fetch(config: FetchConfig, opts: &RunOptions) -> Result<()> {
    let progress = spinner(opts.json)?;
    let fetcher = EndpointFetcher::new(config)
        .context("building endpoint fetcher")?
        .with_progress(progress.clone());
    let outcome = execute(&fetcher, opts);
    progress.finish_and_clear();
    outcome
}

/// Entry point for the `analyze` command: same pipeline over a saved body.
pub fn run_analyze(file: &Path, opts: &RunOptions) -> Result<()> {
    execute(&SnapshotFile::new(file), opts)
}

/// Entry point for the `endpoints` command.
pub fn list_endpoints(config: &FetchConfig) -> Result<()> {
    println!(
        "{} endpoint(s), {} ms per attempt, tried in order:",
        config.endpoints.len(),
        config.timeout.as_millis()
    );
    for (i, e) in config.endpoints.iter().enumerate() {
        println!("  {}. {}", i + 1, e);
    }
    Ok(())
}

fn execute(source: &dyn LiquiditySource, opts: &RunOptions) -> Result<()> {
    let rt = tokio::runtime::Runtime::new().context("creating async runtime")?;
    let block_height = opts.block_height.as_deref();

    tracing::debug!(source = %source.describe(), pool_id = %opts.pool_id, "starting fetch");
    let fetched = rt.block_on(source.fetch(&opts.pool_id, block_height))?;

    let analysis = pipeline::analyze(&fetched.records);
    let files = write_outputs(&fetched, &analysis, opts)?;

    if opts.json {
        let report = Report {
            pool_id: &opts.pool_id,
            block_height,
            source: &fetched.endpoint,
            failed_attempts: &fetched.failures,
            stats: analysis.stats,
            total_rows: analysis.rows.len(),
            filtered_rows: analysis.filtered.len(),
            invalid_rows: analysis.invalid_rows,
            files: files.iter().map(|p| p.display().to_string()).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&fetched, &analysis, opts, &files);
    }
    Ok(())
}

fn write_outputs(
    fetched: &FetchSuccess,
    analysis: &Analysis,
    opts: &RunOptions,
) -> Result<Vec<PathBuf>> {
    let block_height = opts.block_height.as_deref();
    let stem = export::output_stem(&opts.pool_id, block_height);
    let mut files = Vec::new();

    if opts.save_raw || opts.chart {
        std::fs::create_dir_all(&opts.out_dir)
            .with_context(|| format!("creating output directory {}", opts.out_dir.display()))?;
    }

    if opts.save_raw {
        let path = opts.out_dir.join(format!("{stem}_raw.json"));
        let json = serde_json::to_string_pretty(&fetched.raw)?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        files.push(path);
    }

    if opts.csv {
        let rows = if opts.export_all {
            &analysis.rows
        } else {
            &analysis.filtered
        };
        let path = export::write_csv(&opts.out_dir, &opts.pool_id, block_height, rows)?;
        files.push(path);
    }

    if opts.chart {
        let chart = visualize::build_chart(&analysis.filtered, opts.dot_size, block_height);
        let path = opts.out_dir.join(format!("{stem}_chart.json"));
        let json = serde_json::to_string_pretty(&chart)?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        files.push(path);
    }

    Ok(files)
}

fn print_summary(
    fetched: &FetchSuccess,
    analysis: &Analysis,
    opts: &RunOptions,
    files: &[PathBuf],
) {
    match opts.block_height.as_deref() {
        Some(h) if !h.is_empty() => println!("Pool {} at height {}", opts.pool_id, h),
        _ => println!("Pool {} at latest height", opts.pool_id),
    }
    println!("  Source: {}", fetched.endpoint);
    if !fetched.failures.is_empty() {
        println!("  {} endpoint(s) failed first:", fetched.failures.len());
        for f in &fetched.failures {
            println!("    {f}");
        }
    }
    if analysis.invalid_rows > 0 {
        println!(
            "  WARN  {} row(s) had non-numeric fields",
            analysis.invalid_rows
        );
    }
    println!();
    print!(
        "{}",
        visualize::render_stats(&analysis.stats, analysis.filtered.len())
    );

    let values: Vec<f64> = analysis
        .filtered
        .iter()
        .map(|r| r.liquidity_amount)
        .collect();
    let bins = pipeline::histogram(&values, opts.bins);
    if !bins.is_empty() {
        println!("\n  Liquidity distribution (filtered):");
        print!("{}", visualize::render_histogram(&bins, 40));
    }

    if !files.is_empty() {
        println!();
        for path in files {
            println!("  Wrote {}", path.display());
        }
    }
}

fn spinner(hidden: bool) -> Result<indicatif::ProgressBar> {
    if hidden {
        return Ok(indicatif::ProgressBar::hidden());
    }
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("  {spinner} {msg}")
            .context("building spinner style")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::TickRecord;

    fn fetched() -> FetchSuccess {
        let raw = json!({
            "liquidity": (1..=100)
                .map(|i| json!({
                    "liquidity_amount": i.to_string(),
                    "lower_tick": "0",
                    "upper_tick": i.to_string(),
                }))
                .collect::<Vec<_>>(),
            "height": "17000000",
        });
        let records = (1..=100)
            .map(|i| TickRecord::new(i.to_string(), "0", i.to_string()))
            .collect();
        FetchSuccess {
            records,
            endpoint: "http://node.example".to_string(),
            raw,
            failures: Vec::new(),
        }
    }

    fn options(out_dir: &Path) -> RunOptions {
        RunOptions {
            pool_id: "1066".to_string(),
            block_height: Some("17000000".to_string()),
            out_dir: out_dir.to_path_buf(),
            csv: false,
            export_all: false,
            chart: false,
            dot_size: 50.0,
            save_raw: false,
            json: true,
            bins: 10,
        }
    }

    fn csv_lines(path: &Path) -> usize {
        std::fs::read_to_string(path).unwrap().lines().count()
    }

    #[test]
    fn test_nothing_requested_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = fetched();
        let analysis = pipeline::analyze(&fetched.records);
        let files = write_outputs(&fetched, &analysis, &options(dir.path())).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_csv_exports_filtered_rows_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = fetched();
        let analysis = pipeline::analyze(&fetched.records);
        let opts = RunOptions {
            csv: true,
            ..options(dir.path())
        };
        let files = write_outputs(&fetched, &analysis, &opts).unwrap();
        assert_eq!(files.len(), 1);
        // header + 99 rows: the top row is cut
        assert_eq!(csv_lines(&files[0]), 100);
    }

    #[test]
    fn test_csv_export_all_writes_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = fetched();
        let analysis = pipeline::analyze(&fetched.records);
        let opts = RunOptions {
            csv: true,
            export_all: true,
            ..options(dir.path())
        };
        let files = write_outputs(&fetched, &analysis, &opts).unwrap();
        assert_eq!(csv_lines(&files[0]), 101);
    }

    #[test]
    fn test_save_raw_round_trips_body() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = fetched();
        let analysis = pipeline::analyze(&fetched.records);
        let opts = RunOptions {
            save_raw: true,
            ..options(&dir.path().join("out"))
        };
        let files = write_outputs(&fetched, &analysis, &opts).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("pool_1066_height_17000000_raw.json"));
        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
        assert_eq!(saved, fetched.raw);
    }

    #[test]
    fn test_chart_uses_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let fetched = fetched();
        let analysis = pipeline::analyze(&fetched.records);
        let opts = RunOptions {
            chart: true,
            ..options(dir.path())
        };
        let files = write_outputs(&fetched, &analysis, &opts).unwrap();
        assert!(files[0].ends_with("pool_1066_height_17000000_chart.json"));
        let chart: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
        assert_eq!(chart["data"][0]["z"].as_array().unwrap().len(), 99);
    }
}
