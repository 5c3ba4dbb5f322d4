use serde_json::Value;

use crate::model::TickRecord;

use super::error::FailureKind;

/// A `liquidity` array pulled out of a response body, plus the body itself.
#[derive(Debug, Clone)]
pub struct DecodedBody {
    pub records: Vec<TickRecord>,
    pub raw: Value,
}

/// Validate a response body: it must be JSON and carry an array-typed
/// `liquidity` field whose entries are tick records.
pub fn decode_liquidity(body: &[u8]) -> Result<DecodedBody, (FailureKind, String)> {
    let raw: Value = serde_json::from_slice(body)
        .map_err(|e| (FailureKind::Decode, format!("invalid JSON body: {e}")))?;

    let items = match raw.get("liquidity") {
        Some(Value::Array(items)) => items,
        _ => {
            return Err((
                FailureKind::Validation,
                "missing liquidity array in response".to_string(),
            ));
        }
    };

    let records = items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<TickRecord>(item.clone()).map_err(|e| {
                (
                    FailureKind::Validation,
                    format!("malformed liquidity record #{i}: {e}"),
                )
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DecodedBody { records, raw })
}
