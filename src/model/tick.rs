use serde::{Deserialize, Deserializer, Serialize};

/// One liquidity position bucket as returned by the
/// `liquidity_per_tick_range` query.
///
/// All three values travel as decimal strings; liquidity amounts routinely
/// exceed what a double can hold exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRecord {
    #[serde(deserialize_with = "decimal_text")]
    pub liquidity_amount: String,
    #[serde(deserialize_with = "decimal_text")]
    pub lower_tick: String,
    #[serde(deserialize_with = "decimal_text")]
    pub upper_tick: String,
}

impl TickRecord {
    pub fn new(
        liquidity_amount: impl Into<String>,
        lower_tick: impl Into<String>,
        upper_tick: impl Into<String>,
    ) -> Self {
        Self {
            liquidity_amount: liquidity_amount.into(),
            lower_tick: lower_tick.into(),
            upper_tick: upper_tick.into(),
        }
    }
}

/// Accept either a JSON string or a bare JSON number and keep its text.
fn decimal_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::Str(s) => s,
        Text::Num(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_string_fields() {
        let json = r#"{"liquidity_amount":"1000.5","lower_tick":"-100","upper_tick":"200"}"#;
        let rec: TickRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec, TickRecord::new("1000.5", "-100", "200"));
    }

    #[test]
    fn test_deserialize_numeric_fields() {
        let json = r#"{"liquidity_amount":42,"lower_tick":-5,"upper_tick":5}"#;
        let rec: TickRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.liquidity_amount, "42");
        assert_eq!(rec.lower_tick, "-5");
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"{"liquidity_amount":"1","lower_tick":"0"}"#;
        assert!(serde_json::from_str::<TickRecord>(json).is_err());
    }
}
