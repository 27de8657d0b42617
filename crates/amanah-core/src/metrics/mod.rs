//! Zakat financial-metrics extraction.

pub mod extractor;
pub mod model;

pub use extractor::MetricsExtractor;
pub use model::{MetricValue, ZakatMetrics};
