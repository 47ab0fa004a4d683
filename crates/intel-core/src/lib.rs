pub mod benchmark;
pub mod capability;
pub mod errors;
pub mod model;
pub mod rules;

pub use benchmark::BenchmarkRecord;
pub use capability::CapabilityFlags;
pub use errors::RulesError;
pub use model::{NormalizedModel, PriceValue, RawArchitecture, RawModel, RawPricing};
pub use rules::{CapabilityRuleset, MatcherConfig, ProviderDirectory, Ruleset};
