use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// A catalog model record as published by the routing provider.
///
/// Only `id` and `name` are trusted. Every optional field is decoded
/// leniently: a value of the wrong JSON type is treated as absent rather
/// than failing the whole record.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RawModel {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub context_length: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub pricing: Option<RawPricing>,
    #[serde(default, deserialize_with = "lenient")]
    pub architecture: Option<RawArchitecture>,
    #[serde(default, deserialize_with = "lenient")]
    pub supported_parameters: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub capabilities: Option<Vec<String>>,
}

/// Per-token prices. Usually decimal strings, occasionally bare numbers.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RawPricing {
    #[serde(default, deserialize_with = "lenient")]
    pub prompt: Option<PriceValue>,
    #[serde(default, deserialize_with = "lenient")]
    pub completion: Option<PriceValue>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RawArchitecture {
    #[serde(default, deserialize_with = "lenient")]
    pub modality: Option<String>,
}

/// A price as it appears on the wire.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum PriceValue {
    Number(f64),
    Text(String),
}

impl PriceValue {
    /// Interpret the value as a per-token price. Text uses its longest
    /// leading decimal literal, so `"0.000001 USD"` reads as `0.000001`.
    /// Unparseable or non-finite values yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => *n,
            Self::Text(s) => leading_decimal(s)?,
        };
        value.is_finite().then_some(value)
    }
}

fn leading_decimal(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let end = s
        .find(|c: char| !matches!(c, '0'..='9' | '.' | '+' | '-' | 'e' | 'E'))
        .unwrap_or(s.len());
    (1..=end).rev().find_map(|len| s[..len].parse::<f64>().ok())
}

impl From<&str> for PriceValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// The stable internal model contract handed to API consumers.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedModel {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub context_window: u64,
    /// USD per million prompt tokens.
    pub input_price: f64,
    /// USD per million completion tokens.
    pub output_price: f64,
    pub modality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supported_params: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<Vec<String>>,
}

/// Decode an optional field, mapping type mismatches to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}
