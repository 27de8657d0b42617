//! Zakat metrics domain model.
//!
//! The record has a closed schema: after extraction every field is always
//! present, with the `"NaN"` sentinel standing in for anything the document
//! did not state. The sentinel is distinguishable from zero.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A single numeric metric: either a value or the "not stated" sentinel.
///
/// Serialized as a JSON number, or the string `"NaN"` when missing (the
/// wire format the frontend expects). Deserialization accepts a number,
/// `"NaN"` or `null`; anything else is a parse error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MetricValue {
    Number(f64),
    #[default]
    Missing,
}

impl MetricValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, MetricValue::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(n) => Some(*n),
            MetricValue::Missing => None,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Number(n) => serializer.serialize_f64(*n),
            MetricValue::Missing => serializer.serialize_str("NaN"),
        }
    }
}

impl<'de> Deserialize<'de> for MetricValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(MetricValue::Number)
                .ok_or_else(|| de::Error::custom(format!("metric out of f64 range: {n}"))),
            serde_json::Value::String(s) if s.eq_ignore_ascii_case("nan") => {
                Ok(MetricValue::Missing)
            }
            serde_json::Value::Null => Ok(MetricValue::Missing),
            other => Err(de::Error::custom(format!(
                "expected a number or \"NaN\", got {other}"
            ))),
        }
    }
}

/// Lenient boolean for model output: accepts a JSON bool, the strings
/// "true"/"false", or `null`/`"NaN"` (treated as the conservative false).
fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Null => Ok(false),
        serde_json::Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" | "nan" => Ok(false),
            other => Err(de::Error::custom(format!(
                "expected a boolean, got \"{other}\""
            ))),
        },
        other => Err(de::Error::custom(format!(
            "expected a boolean, got {other}"
        ))),
    }
}

/// Zakat-relevant financial metrics extracted from one proposal document.
///
/// Monetary values are in MYR (converted if the document used another
/// currency), weights in grams. Boolean qualifiers default to false unless
/// the document explicitly affirms them. Every field is always present:
/// `#[serde(default)]` fills anything the model omitted with the sentinel,
/// and unknown keys in model output are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZakatMetrics {
    /// Total cash in hand and bank accounts (MYR)
    pub cash: MetricValue,

    /// Total gold weight in grams
    pub gold_weight: MetricValue,
    /// Total gold value in MYR
    pub gold_value: MetricValue,
    /// Total silver weight in grams
    pub silver_weight: MetricValue,
    /// Total silver value in MYR
    pub silver_value: MetricValue,

    /// Current market value of goods for sale (MYR)
    pub business_inventory: MetricValue,
    /// Business cash and bank balances (MYR)
    pub business_cash: MetricValue,
    /// Business accounts receivable (MYR)
    pub business_receivables: MetricValue,

    /// Total stocks/investments value (MYR)
    pub stocks_value: MetricValue,
    /// Ratio of the company's liquid assets (0-1)
    pub stocks_liquid_ratio: MetricValue,

    /// Value of produce after harvest (MYR)
    pub agricultural_produce: MetricValue,

    /// Debts due within one year (MYR)
    pub short_term_liabilities: MetricValue,
    /// Total business liabilities (MYR)
    pub business_liabilities: MetricValue,
    /// Personal debts and obligations (MYR)
    pub personal_liabilities: MetricValue,

    /// Whether assets have been held for one lunar year (hawl)
    #[serde(deserialize_with = "lenient_bool")]
    pub hawl_completed: bool,
    /// Whether gold is held for investment
    #[serde(deserialize_with = "lenient_bool")]
    pub gold_for_investment: bool,

    /// Current market price of gold per gram (MYR)
    pub current_gold_price: MetricValue,
    /// Current market price of silver per gram (MYR)
    pub current_silver_price: MetricValue,
}

impl ZakatMetrics {
    /// The fallback record: every metric set to the sentinel, every
    /// qualifier false. Returned whenever extraction fails.
    pub fn unavailable() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_is_not_zero() {
        assert!(MetricValue::Missing.is_missing());
        assert!(!MetricValue::Number(0.0).is_missing());
        assert_ne!(MetricValue::Missing, MetricValue::Number(0.0));
    }

    #[test]
    fn test_metric_value_deserializes_number_nan_and_null() {
        let v: MetricValue = serde_json::from_str("10000").unwrap();
        assert_eq!(v, MetricValue::Number(10000.0));

        let v: MetricValue = serde_json::from_str("\"NaN\"").unwrap();
        assert!(v.is_missing());

        let v: MetricValue = serde_json::from_str("null").unwrap();
        assert!(v.is_missing());

        assert!(serde_json::from_str::<MetricValue>("\"lots\"").is_err());
        assert!(serde_json::from_str::<MetricValue>("[1]").is_err());
    }

    #[test]
    fn test_metric_value_serializes_missing_as_nan_string() {
        assert_eq!(
            serde_json::to_string(&MetricValue::Missing).unwrap(),
            "\"NaN\""
        );
        assert_eq!(
            serde_json::to_string(&MetricValue::Number(42.5)).unwrap(),
            "42.5"
        );
    }

    #[test]
    fn test_partial_object_fills_missing_fields_with_sentinel() {
        let metrics: ZakatMetrics =
            serde_json::from_str(r#"{"cash": 10000, "hawl_completed": true}"#).unwrap();

        assert_eq!(metrics.cash, MetricValue::Number(10000.0));
        assert!(metrics.hawl_completed);
        assert!(metrics.gold_weight.is_missing());
        assert!(metrics.personal_liabilities.is_missing());
        assert!(!metrics.gold_for_investment);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let metrics: ZakatMetrics =
            serde_json::from_str(r#"{"cash": 500, "surprise_field": "hello"}"#).unwrap();
        assert_eq!(metrics.cash, MetricValue::Number(500.0));
    }

    #[test]
    fn test_lenient_bool_accepts_strings_and_nan() {
        let metrics: ZakatMetrics =
            serde_json::from_str(r#"{"hawl_completed": "true", "gold_for_investment": "NaN"}"#)
                .unwrap();
        assert!(metrics.hawl_completed);
        assert!(!metrics.gold_for_investment);
    }

    #[test]
    fn test_serialized_record_has_full_schema() {
        let value = serde_json::to_value(ZakatMetrics::unavailable()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 18);
        assert_eq!(object["cash"], serde_json::json!("NaN"));
        assert_eq!(object["hawl_completed"], serde_json::json!(false));
    }
}
