//! Benchmark payload parsing and model matching.

pub mod matcher;
pub mod parse;

pub use matcher::{normalize_name, provider_slug, BenchmarkMatcher, ScoredMatch};
pub use parse::parse_benchmarks;

use intel_core::{BenchmarkRecord, MatcherConfig};
use serde_json::Value;

/// Result of parsing a payload and matching one model against it.
#[derive(Clone, Debug, PartialEq)]
pub struct ParseMatchOutcome {
    pub parsed_count: usize,
    pub record: Option<BenchmarkRecord>,
    pub score: Option<f64>,
}

impl ParseMatchOutcome {
    pub fn is_match(&self) -> bool {
        self.record.is_some()
    }
}

/// Parse `raw` and pick the best record for the given catalog model.
pub fn parse_and_match(
    raw: &Value,
    model_id: &str,
    model_name: &str,
    config: &MatcherConfig,
    threshold: Option<f64>,
) -> ParseMatchOutcome {
    let records = parse_benchmarks(raw);
    let best = BenchmarkMatcher::new(config).best_match(model_id, model_name, &records, threshold);

    ParseMatchOutcome {
        parsed_count: records.len(),
        score: best.map(|m| m.score),
        record: best.map(|m| m.record.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_and_match_reports_count_and_record() {
        let raw = json!({"data": [
            {"model_name": "GPT-4o", "model_creator": {"name": "OpenAI"}},
            {"model_name": "Claude Haiku 4.5", "model_creator": {"name": "Anthropic"}},
            {"model_name": "orphan"}
        ]});
        let outcome = parse_and_match(
            &raw,
            "anthropic/claude-haiku-4.5",
            "Claude Haiku 4.5",
            &MatcherConfig::default(),
            None,
        );
        assert_eq!(outcome.parsed_count, 2);
        assert!(outcome.is_match());
        assert_eq!(outcome.record.unwrap().creator, "Anthropic");
        assert!(outcome.score.unwrap() > 1.0);
    }

    #[test]
    fn unmatched_outcome_keeps_count() {
        let raw = json!([{"name": "Mistral Large", "creator": "Mistral"}]);
        let outcome = parse_and_match(&raw, "openai/gpt-4o", "GPT-4o", &MatcherConfig::default(), None);
        assert_eq!(outcome.parsed_count, 1);
        assert!(!outcome.is_match());
        assert_eq!(outcome.score, None);
    }
}
