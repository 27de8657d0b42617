//! Prompt-driven extraction of zakat metrics from document text.

use super::model::ZakatMetrics;
use crate::error::{AmanahError, Result};
use crate::generator::{GenerateRequest, TextGenerator};
use std::sync::Arc;
use tracing::{debug, warn};

const EXTRACTION_PROMPT: &str = "\
Extract Zakat-relevant financial metrics from the following text, considering the specific conditions for Zakat calculation.
Return ONLY a JSON object with exactly these fields:

Cash and bank balances (must be held for one lunar year):
- \"cash\": float or \"NaN\" - total cash in hand and bank accounts, in MYR

Gold and silver (must be held for one lunar year and intended for investment):
- \"gold_weight\": float or \"NaN\" - total gold weight in grams
- \"gold_value\": float or \"NaN\" - total gold value in MYR
- \"silver_weight\": float or \"NaN\" - total silver weight in grams
- \"silver_value\": float or \"NaN\" - total silver value in MYR

Business assets (must be held for one lunar year):
- \"business_inventory\": float or \"NaN\" - current market value of goods for sale, in MYR
- \"business_cash\": float or \"NaN\" - business cash and bank balances, in MYR
- \"business_receivables\": float or \"NaN\" - business accounts receivable, in MYR

Stocks and shares (based on the company's liquid assets, held for one lunar year):
- \"stocks_value\": float or \"NaN\" - total stocks/investments value, in MYR
- \"stocks_liquid_ratio\": float or \"NaN\" - ratio of the company's liquid assets (0-1)

Agricultural assets (if applicable):
- \"agricultural_produce\": float or \"NaN\" - value of produce after harvest, in MYR

Liabilities (to be deducted):
- \"short_term_liabilities\": float or \"NaN\" - debts due within one year, in MYR
- \"business_liabilities\": float or \"NaN\" - total business liabilities, in MYR
- \"personal_liabilities\": float or \"NaN\" - personal debts and obligations, in MYR

Additional information:
- \"hawl_completed\": boolean - whether assets have been held for one lunar year
- \"gold_for_investment\": boolean - whether gold is held for investment
- \"current_gold_price\": float or \"NaN\" - current market price of gold per gram, in MYR
- \"current_silver_price\": float or \"NaN\" - current market price of silver per gram, in MYR

Rules for extraction:
1. Only include values that are explicitly mentioned or can be reliably inferred
2. Use \"NaN\" for values not found in the text
3. Convert all monetary values to MYR using appropriate exchange rates
4. For gold and silver, extract both weight and current market value
5. For stocks, try to determine the liquid asset ratio if mentioned
6. Set hawl_completed to false unless explicitly stated that assets were held for one year
7. Set gold_for_investment to false unless explicitly stated as investment
8. Include current market prices for gold and silver if mentioned

Text to analyze:
";

/// Turns unstructured proposal text into a schema-complete
/// [`ZakatMetrics`] record.
///
/// Never fails outward: any model or parse failure is logged and collapses
/// into [`ZakatMetrics::unavailable`]. Callers always get every schema key.
pub struct MetricsExtractor {
    generator: Arc<dyn TextGenerator>,
}

impl MetricsExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Extracts metrics from `document_text`.
    ///
    /// On failure the all-sentinel fallback record is returned and the
    /// cause is logged; a partially-keyed record is never produced.
    pub async fn extract(&self, document_text: &str) -> ZakatMetrics {
        match self.try_extract(document_text).await {
            Ok(metrics) => metrics,
            Err(err) => {
                warn!(error = %err, "metrics extraction failed, returning sentinel record");
                ZakatMetrics::unavailable()
            }
        }
    }

    async fn try_extract(&self, document_text: &str) -> Result<ZakatMetrics> {
        let prompt = format!("{EXTRACTION_PROMPT}{document_text}");
        let request = GenerateRequest::new(prompt).with_temperature(0.0);

        let response = self.generator.generate(request).await?;
        let cleaned = strip_code_fences(&response);
        debug!(bytes = cleaned.len(), "parsing extraction response");

        // Strict structured parse only. Malformed output is a parse error,
        // never something to evaluate. The top level must be an object:
        // serde would otherwise accept a JSON array as the positional
        // encoding of the struct and fabricate metrics from garbage.
        let value: serde_json::Value = serde_json::from_str(cleaned)?;
        if !value.is_object() {
            return Err(AmanahError::parse(
                "JSON",
                format!("expected a JSON object, got {}", json_type_name(&value)),
            ));
        }

        let metrics = serde_json::from_value(value)?;
        Ok(metrics)
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Strips model-added markdown decoration: surrounding backtick fences and
/// an optional leading `json` language tag.
fn strip_code_fences(text: &str) -> &str {
    let cleaned = text.trim().trim_matches('`').trim();
    match cleaned.strip_prefix("json") {
        Some(rest) => rest.trim_start(),
        None => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AmanahError, Result};
    use crate::metrics::MetricValue;
    use async_trait::async_trait;

    struct CannedGenerator {
        response: Result<&'static str>,
    }

    impl CannedGenerator {
        fn ok(response: &'static str) -> Arc<Self> {
            Arc::new(Self {
                response: Ok(response),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                response: Err(AmanahError::generation("quota exceeded")),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _request: GenerateRequest) -> Result<String> {
            self.response.clone().map(str::to_string)
        }
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("{\"cash\": 1}"), "{\"cash\": 1}");
        assert_eq!(strip_code_fences("```json\n{\"cash\": 1}\n```"), "{\"cash\": 1}");
        assert_eq!(strip_code_fences("```\n{\"cash\": 1}\n```"), "{\"cash\": 1}");
        assert_eq!(strip_code_fences("`{\"cash\": 1}`"), "{\"cash\": 1}");
    }

    #[tokio::test]
    async fn test_subset_output_yields_full_schema() {
        let extractor = MetricsExtractor::new(CannedGenerator::ok(
            r#"{"cash": 10000, "gold_weight": 50.0, "hawl_completed": true}"#,
        ));

        let metrics = extractor.extract("some proposal text").await;

        assert_eq!(metrics.cash, MetricValue::Number(10000.0));
        assert_eq!(metrics.gold_weight, MetricValue::Number(50.0));
        assert!(metrics.hawl_completed);
        // Unspecified keys come back as the sentinel, never omitted.
        assert!(metrics.silver_value.is_missing());
        assert!(metrics.stocks_value.is_missing());
        assert!(!metrics.gold_for_investment);
    }

    #[tokio::test]
    async fn test_cooperating_generator_example() {
        // "Cash balance: RM 10,000, gold not mentioned"
        let extractor = MetricsExtractor::new(CannedGenerator::ok(
            r#"```json
{"cash": 10000, "gold_weight": "NaN"}
```"#,
        ));

        let metrics = extractor.extract("Cash balance: RM 10,000").await;

        assert_eq!(metrics.cash, MetricValue::Number(10000.0));
        assert!(metrics.gold_weight.is_missing());
        assert!(metrics.business_cash.is_missing());
        assert!(!metrics.hawl_completed);
    }

    #[tokio::test]
    async fn test_generator_failure_returns_fallback() {
        let extractor = MetricsExtractor::new(CannedGenerator::failing());
        let metrics = extractor.extract("text").await;
        assert_eq!(metrics, ZakatMetrics::unavailable());
    }

    #[tokio::test]
    async fn test_unparsable_output_returns_fallback() {
        let extractor =
            MetricsExtractor::new(CannedGenerator::ok("I am sorry, I cannot do that."));
        let metrics = extractor.extract("text").await;
        assert_eq!(metrics, ZakatMetrics::unavailable());
    }

    #[tokio::test]
    async fn test_wrong_shape_returns_fallback() {
        // A JSON array must not parse positionally into the struct fields.
        let extractor = MetricsExtractor::new(CannedGenerator::ok(r#"[1, 2, 3]"#));
        let metrics = extractor.extract("text").await;
        assert!(metrics.cash.is_missing());
        assert!(metrics.gold_weight.is_missing());
        assert_eq!(metrics, ZakatMetrics::unavailable());
    }

    #[tokio::test]
    async fn test_non_object_scalars_return_fallback() {
        for response in ["42", "\"cash\"", "true", "null"] {
            let extractor = MetricsExtractor::new(CannedGenerator::ok(response));
            let metrics = extractor.extract("text").await;
            assert_eq!(metrics, ZakatMetrics::unavailable(), "response: {response}");
        }
    }
}
