use serde::{Deserialize, Serialize};

/// One model's third-party benchmark scores.
///
/// `model_name` and `creator` are always non-empty; records lacking either
/// are dropped during parsing.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkRecord {
    pub model_name: String,
    pub creator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intelligence_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coding_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub math_index: Option<f64>,
    /// Median output tokens per second.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speed: Option<f64>,
    /// Median time to first token, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_input: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_output: Option<f64>,
}

impl BenchmarkRecord {
    pub fn new(model_name: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            creator: creator.into(),
            ..Default::default()
        }
    }
}
