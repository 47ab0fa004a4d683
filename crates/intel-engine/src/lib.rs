//! Stateless transforms over catalog and benchmark data.
//!
//! Two independent pipelines live here: catalog normalization plus
//! capability classification, and benchmark parsing plus name matching.
//! Nothing in this crate performs I/O or keeps state between calls.

pub mod benchmarks;
pub mod capabilities;
pub mod normalize;

pub use benchmarks::{parse_and_match, parse_benchmarks, BenchmarkMatcher, ParseMatchOutcome, ScoredMatch};
pub use capabilities::{CapabilityClassifier, CapabilityInput};
pub use normalize::{extract_provider, normalize_modality, normalize_model, token_price_to_million_price};
