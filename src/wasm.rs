use serde_json::json;
use wasm_bindgen::prelude::*;

use crate::fetch_data::decode::decode_liquidity;
use crate::model::NumericRow;
use crate::pipeline;
use crate::visualize;

/// Parse a raw `liquidity_per_tick_range` body and return rows, pre-filter
/// stats and the filtered subset as JSON.
#[wasm_bindgen]
pub fn analyze_liquidity_json(body: &str) -> String {
    match decode_liquidity(body.as_bytes()) {
        Ok(decoded) => {
            let analysis = pipeline::analyze(&decoded.records);
            json!({ "valid": true, "analysis": analysis }).to_string()
        }
        Err((kind, detail)) => json!({
            "valid": false,
            "kind": kind,
            "errors": [detail]
        })
        .to_string(),
    }
}

/// Build the Plotly chart description for a JSON array of rows.
#[wasm_bindgen]
pub fn build_chart_json(rows: &str, dot_size: f64, block_height: Option<String>) -> String {
    let rows: Vec<NumericRow> = match serde_json::from_str(rows) {
        Ok(r) => r,
        Err(e) => return json!({ "error": format!("JSON parse error: {}", e) }).to_string(),
    };
    let chart = visualize::build_chart(&rows, dot_size, block_height.as_deref());
    serde_json::to_string(&chart).unwrap_or_else(|e| json!({ "error": e.to_string() }).to_string())
}
