//! Decoding of third-party benchmark payloads.
//!
//! Payloads arrive in several envelope shapes and with several naming
//! conventions per field. Each shape is tried as a distinct case in
//! priority order; anything unrecognized resolves to "absent".

use intel_core::BenchmarkRecord;
use serde_json::{Map, Value};

/// Object keys that may hold the model list, in priority order.
const ENVELOPE_KEYS: &[&str] = &["data", "models", "results"];

/// Where the model list was found.
#[derive(Debug, PartialEq)]
enum Envelope<'a> {
    Bare(&'a [Value]),
    Wrapped { key: &'static str, items: &'a [Value] },
    Unrecognized,
}

impl<'a> Envelope<'a> {
    fn detect(raw: &'a Value) -> Self {
        match raw {
            Value::Array(items) => Self::Bare(items),
            Value::Object(obj) => ENVELOPE_KEYS
                .iter()
                .find_map(|&key| match obj.get(key) {
                    Some(Value::Array(items)) => Some(Self::Wrapped { key, items }),
                    _ => None,
                })
                .unwrap_or(Self::Unrecognized),
            _ => Self::Unrecognized,
        }
    }

    fn items(&self) -> &'a [Value] {
        match *self {
            Self::Bare(items) | Self::Wrapped { items, .. } => items,
            Self::Unrecognized => &[],
        }
    }
}

/// A location a field value may be read from.
#[derive(Clone, Copy, Debug)]
enum FieldPath {
    Key(&'static str),
    Nested(&'static str, &'static str),
}

use FieldPath::{Key, Nested};

impl FieldPath {
    fn lookup<'a>(&self, item: &'a Map<String, Value>) -> Option<&'a Value> {
        match *self {
            Key(key) => item.get(key),
            Nested(outer, inner) => item.get(outer)?.as_object()?.get(inner),
        }
    }
}

const MODEL_NAME: &[FieldPath] = &[
    Key("model_name"),
    Key("name"),
    Key("model"),
    Key("modelName"),
    Key("display_name"),
];
const CREATOR: &[FieldPath] = &[
    Nested("model_creator", "name"),
    Key("creator"),
    Key("provider"),
    Key("organization"),
];
const INTELLIGENCE_INDEX: &[FieldPath] = &[
    Nested("evaluations", "artificial_analysis_intelligence_index"),
    Key("intelligence_index"),
    Key("intelligenceIndex"),
];
const CODING_INDEX: &[FieldPath] = &[
    Nested("evaluations", "artificial_analysis_coding_index"),
    Key("coding_index"),
    Key("codingIndex"),
];
const MATH_INDEX: &[FieldPath] = &[
    Nested("evaluations", "artificial_analysis_math_index"),
    Key("math_index"),
    Key("mathIndex"),
];
const OUTPUT_SPEED: &[FieldPath] = &[
    Key("median_output_tokens_per_second"),
    Key("output_speed"),
    Key("outputSpeed"),
];
const LATENCY: &[FieldPath] = &[
    Key("median_time_to_first_token_seconds"),
    Key("latency"),
    Key("ttft"),
];
const PRICE_INPUT: &[FieldPath] = &[Key("price_input"), Key("priceInput"), Key("input_price")];
const PRICE_OUTPUT: &[FieldPath] = &[Key("price_output"), Key("priceOutput"), Key("output_price")];

/// First non-empty string found along `paths`.
fn resolve_text(item: &Map<String, Value>, paths: &[FieldPath]) -> Option<String> {
    paths.iter().find_map(|path| match path.lookup(item)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    })
}

/// First value along `paths` that is a number or a numeric string.
fn resolve_number(item: &Map<String, Value>, paths: &[FieldPath]) -> Option<f64> {
    paths.iter().find_map(|path| {
        let n = match path.lookup(item)? {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    })
}

fn parse_record(item: &Value) -> Option<BenchmarkRecord> {
    let item = item.as_object()?;
    let model_name = resolve_text(item, MODEL_NAME)?;
    let creator = resolve_text(item, CREATOR)?;

    Some(BenchmarkRecord {
        model_name,
        creator,
        intelligence_index: resolve_number(item, INTELLIGENCE_INDEX),
        coding_index: resolve_number(item, CODING_INDEX),
        math_index: resolve_number(item, MATH_INDEX),
        output_speed: resolve_number(item, OUTPUT_SPEED),
        latency: resolve_number(item, LATENCY),
        price_input: resolve_number(item, PRICE_INPUT),
        price_output: resolve_number(item, PRICE_OUTPUT),
    })
}

/// Flatten an arbitrarily shaped benchmark payload into records.
///
/// Items without a model name or creator are dropped. An unrecognized
/// envelope yields an empty list.
pub fn parse_benchmarks(raw: &Value) -> Vec<BenchmarkRecord> {
    let envelope = Envelope::detect(raw);
    let items = envelope.items();
    let records: Vec<BenchmarkRecord> = items.iter().filter_map(parse_record).collect();

    match envelope {
        Envelope::Unrecognized => tracing::debug!("benchmark payload has no recognizable model list"),
        Envelope::Wrapped { key, .. } => tracing::debug!(
            key,
            items = items.len(),
            parsed = records.len(),
            "parsed wrapped benchmark payload"
        ),
        Envelope::Bare(_) => tracing::debug!(
            items = items.len(),
            parsed = records.len(),
            "parsed bare benchmark payload"
        ),
    }

    records
}
