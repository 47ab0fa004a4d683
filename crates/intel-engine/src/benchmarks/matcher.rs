//! Fuzzy association of benchmark records with a catalog model.
//!
//! There is no shared identifier between the two sources, so records are
//! scored by token overlap of their names, boosted when the benchmark
//! creator lines up with the catalog provider slug.

use std::sync::LazyLock;

use intel_core::{BenchmarkRecord, MatcherConfig};
use regex::Regex;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Lower-case, replace punctuation with spaces, collapse whitespace.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let spaced = NON_ALPHANUMERIC.replace_all(&lowered, " ");
    WHITESPACE.replace_all(&spaced, " ").trim().to_string()
}

/// Lower-cased text before the first `/` of a catalog id.
pub fn provider_slug(model_id: &str) -> String {
    model_id
        .split_once('/')
        .map(|(slug, _)| slug.to_lowercase())
        .unwrap_or_default()
}

/// The winning record and the score it won with.
///
/// Scores include the creator boost and may exceed 1.0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredMatch<'a> {
    pub record: &'a BenchmarkRecord,
    pub score: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct BenchmarkMatcher<'r> {
    config: &'r MatcherConfig,
}

impl<'r> BenchmarkMatcher<'r> {
    pub fn new(config: &'r MatcherConfig) -> Self {
        Self { config }
    }

    /// Distinct significant tokens of a name, in first-seen order.
    pub fn tokenize(&self, name: &str) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        for token in normalize_name(name).split(' ') {
            if token.chars().count() < self.config.min_token_len
                || self.config.is_stop_word(token)
                || tokens.iter().any(|t| t == token)
            {
                continue;
            }
            tokens.push(token.to_string());
        }
        tokens
    }

    /// Fraction of tokens shared between two names, in `[0, 1]`.
    ///
    /// A token counts as shared when the other name has an equal token or
    /// one containing it (or contained by it). Each token of `a` counts at
    /// most once.
    pub fn name_similarity(&self, a: &str, b: &str) -> f64 {
        let left = self.tokenize(a);
        let right = self.tokenize(b);
        if left.is_empty() || right.is_empty() {
            return 0.0;
        }

        let matched = left
            .iter()
            .filter(|l| {
                right
                    .iter()
                    .any(|r| l == &r || l.contains(r.as_str()) || r.contains(l.as_str()))
            })
            .count();

        matched as f64 / left.len().max(right.len()) as f64
    }

    /// Similarity of `model_name` to the record, boosted when the record's
    /// creator and `provider` contain one another.
    pub fn score(&self, provider: &str, model_name: &str, record: &BenchmarkRecord) -> f64 {
        let similarity = self.name_similarity(model_name, &record.model_name);
        let creator = record.creator.to_lowercase();
        if creator.contains(provider) || provider.contains(creator.as_str()) {
            similarity * self.config.creator_boost
        } else {
            similarity
        }
    }

    /// Highest-scoring record at or above `threshold` (or the configured
    /// default). On equal scores the earlier record is kept.
    pub fn best_match<'a>(
        &self,
        model_id: &str,
        model_name: &str,
        records: &'a [BenchmarkRecord],
        threshold: Option<f64>,
    ) -> Option<ScoredMatch<'a>> {
        if records.is_empty() {
            return None;
        }
        let threshold = threshold.unwrap_or(self.config.default_threshold);
        let provider = provider_slug(model_id);

        let mut best: Option<ScoredMatch<'a>> = None;
        let mut best_score = 0.0;
        for record in records {
            let score = self.score(&provider, model_name, record);
            tracing::trace!(candidate = %record.model_name, score, "scored benchmark record");
            // TODO: ties keep the first record seen; decide whether an exact
            // creator match should break them instead.
            if score > best_score && score >= threshold {
                best_score = score;
                best = Some(ScoredMatch { record, score });
            }
        }

        match &best {
            Some(m) => tracing::debug!(
                model = model_name,
                matched = %m.record.model_name,
                score = m.score,
                "benchmark match found"
            ),
            None => tracing::debug!(model = model_name, threshold, "no benchmark match"),
        }
        best
    }
}
