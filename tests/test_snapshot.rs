use tick_liquidity::export;
use tick_liquidity::fetch_data::source::{LiquiditySource, SnapshotFile};
use tick_liquidity::pipeline;
use tick_liquidity::visualize;

fn write_snapshot(dir: &std::path::Path) -> std::path::PathBuf {
    let liquidity: Vec<serde_json::Value> = (1..=100)
        .map(|i| {
            serde_json::json!({
                "liquidity_amount": format!("{i}000"),
                "lower_tick": format!("{}", -i),
                "upper_tick": format!("{i}"),
            })
        })
        .collect();
    let path = dir.join("pool_1066.json");
    std::fs::write(&path, serde_json::json!({ "liquidity": liquidity }).to_string()).unwrap();
    path
}

#[tokio::test]
async fn test_snapshot_to_csv_and_chart() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_snapshot(dir.path());

    let fetched = SnapshotFile::new(&path).fetch("1066", None).await.unwrap();
    let analysis = pipeline::analyze(&fetched.records);

    assert_eq!(analysis.rows.len(), 100);
    assert_eq!(analysis.stats.count, 100);
    assert_eq!(analysis.stats.mean, 50_500.0);
    assert_eq!(analysis.stats.median, 50_500.0);
    // row 100 has both the top liquidity and the widest range
    assert_eq!(analysis.filtered.len(), 99);
    assert!(analysis.filtered.iter().all(|r| r.liquidity_amount < 100_000.0));

    let out = dir.path().join("out");
    let csv_path = export::write_csv(&out, "1066", Some("42"), &analysis.filtered).unwrap();
    let text = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = text.lines();
    assert_eq!(
        lines.next(),
        Some("lower_tick,upper_tick,liquidity_amount,tick_range")
    );
    assert_eq!(lines.next(), Some("-1,1,1000,2"));
    assert_eq!(text.lines().count(), 100);

    let chart = visualize::build_chart(&analysis.filtered, 50.0, Some("42"));
    let json = serde_json::to_value(&chart).unwrap();
    assert_eq!(json["data"][0]["x"].as_array().unwrap().len(), 99);
    assert_eq!(
        json["layout"]["title"]["text"],
        "Liquidity Per Tick Range - Height 42"
    );
}
