//! Lookup tables that drive normalization, classification and matching.
//!
//! The built-in tables are the defaults. Any subset can be replaced from a
//! JSON file; omitted sections keep their built-in values.

use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::errors::RulesError;

static BUILTIN: LazyLock<Ruleset> = LazyLock::new(Ruleset::default);

/// All injectable tables, grouped by the component that reads them.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Ruleset {
    pub providers: ProviderDirectory,
    pub capabilities: CapabilityRuleset,
    pub matcher: MatcherConfig,
}

impl Ruleset {
    /// Shared instance of the built-in tables.
    pub fn builtin() -> &'static Ruleset {
        &BUILTIN
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn from_path(path: &Path) -> Result<Self, RulesError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| RulesError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One known provider slug and the display name reported for it.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProviderAlias {
    pub slug: String,
    pub display_name: String,
}

/// Ordered provider slug table. The first entry whose slug matches wins.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ProviderDirectory {
    entries: Vec<ProviderAlias>,
}

const BUILTIN_PROVIDERS: &[(&str, &str)] = &[
    ("openai", "OpenAI"),
    ("anthropic", "Anthropic"),
    ("google", "Google"),
    ("meta-llama", "Meta"),
    ("mistralai", "Mistral AI"),
    ("x-ai", "xAI"),
    ("deepseek", "DeepSeek"),
    ("cohere", "Cohere"),
    ("perplexity", "Perplexity"),
    ("qwen", "Qwen"),
    ("microsoft", "Microsoft"),
    ("amazon", "Amazon"),
    ("nvidia", "NVIDIA"),
    ("01-ai", "01.AI"),
    ("ai21", "AI21 Labs"),
];

impl Default for ProviderDirectory {
    fn default() -> Self {
        Self::from_pairs(BUILTIN_PROVIDERS)
    }
}

impl ProviderDirectory {
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|(slug, display_name)| ProviderAlias {
                    slug: slug.to_string(),
                    display_name: display_name.to_string(),
                })
                .collect(),
        }
    }

    /// Display name for an already lower-cased slug.
    pub fn lookup(&self, slug: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.slug == slug)
            .map(|e| e.display_name.as_str())
    }

    pub fn entries(&self) -> &[ProviderAlias] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Keywords and literals used by the capability classifier.
///
/// Order inside each list is preserved; the classifier checks entries in
/// sequence and stops at the first hit.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CapabilityRuleset {
    /// Input-side modality keyword for vision.
    pub vision_input: String,
    /// Input-side modality keyword for audio.
    pub audio_input: String,
    /// Exact supported-parameter entry that signals tool use.
    pub tools_param: String,
    /// Exact supported-parameter entry that signals file input.
    pub file_param: String,
    /// Substrings of a capability tag that signal image generation.
    pub image_capability_contains: Vec<String>,
    /// Whole capability tags that signal image generation.
    pub image_capability_exact: Vec<String>,
    /// Output-side modality keyword for image generation.
    pub image_output: String,
    /// Substrings of `name + id` that suggest an image model.
    pub image_name_keywords: Vec<String>,
    /// Substrings of capability or parameter entries that signal search.
    pub search_signal_keywords: Vec<String>,
    /// Substrings of `id + name` that suggest a search model.
    pub search_name_keywords: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for CapabilityRuleset {
    fn default() -> Self {
        Self {
            vision_input: "image".into(),
            audio_input: "audio".into(),
            tools_param: "tools".into(),
            file_param: "file".into(),
            image_capability_contains: strings(&["image-generation", "image"]),
            image_capability_exact: strings(&["images"]),
            image_output: "image".into(),
            image_name_keywords: strings(&[
                "image",
                "flux",
                "dall-e",
                "dalle",
                "stable-diffusion",
                "sd-",
                "sdxl",
                "midjourney",
                "imagen",
                "ideogram",
                "playground",
                "kandinsky",
                "dreamshaper",
                "deliberate",
                "proteus",
                "juggernaut",
            ]),
            search_signal_keywords: strings(&["search", "web", "retrieval", "browse"]),
            search_name_keywords: strings(&[
                "sonar",
                "perplexity",
                "search",
                "web-search",
                "web search",
                "retrieval",
                "browse",
            ]),
        }
    }
}

/// Tuning for benchmark-to-model name matching.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MatcherConfig {
    /// Tokens ignored when comparing names.
    pub stop_words: Vec<String>,
    /// Tokens shorter than this many characters are ignored.
    pub min_token_len: usize,
    /// Multiplier applied when the benchmark creator matches the provider.
    pub creator_boost: f64,
    /// Minimum score accepted when the caller does not supply one.
    pub default_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            stop_words: strings(&[
                "ai", "model", "v1", "free", "pro", "plus", "chat", "instruct", "preview",
            ]),
            min_token_len: 2,
            creator_boost: 1.2,
            default_threshold: 0.5,
        }
    }
}

impl MatcherConfig {
    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.iter().any(|w| w == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_provider_table_has_fifteen_entries() {
        let dir = ProviderDirectory::default();
        assert_eq!(dir.len(), 15);
        assert_eq!(dir.lookup("meta-llama"), Some("Meta"));
        assert_eq!(dir.lookup("x-ai"), Some("xAI"));
        assert_eq!(dir.lookup("OpenAI"), None);
    }

    #[test]
    fn first_matching_slug_wins() {
        let dir = ProviderDirectory::from_pairs(&[("acme", "Acme"), ("acme", "Acme Two")]);
        assert_eq!(dir.lookup("acme"), Some("Acme"));
    }

    #[test]
    fn partial_override_keeps_other_sections() {
        let rules = Ruleset::from_json(
            r#"{"providers": [{"slug": "acme", "display_name": "ACME Corp"}],
                "matcher": {"creator_boost": 1.5}}"#,
        )
        .unwrap();
        assert_eq!(rules.providers.len(), 1);
        assert_eq!(rules.providers.lookup("acme"), Some("ACME Corp"));
        assert_eq!(rules.matcher.creator_boost, 1.5);
        assert_eq!(rules.matcher.default_threshold, 0.5);
        assert!(rules.matcher.is_stop_word("instruct"));
        assert_eq!(rules.capabilities, CapabilityRuleset::default());
    }

    #[test]
    fn empty_object_is_builtin() {
        let rules = Ruleset::from_json("{}").unwrap();
        assert_eq!(&rules, Ruleset::builtin());
    }

    #[test]
    fn from_path_reports_missing_file() {
        let err = Ruleset::from_path(Path::new("/nonexistent/rules.json")).unwrap_err();
        assert!(matches!(err, RulesError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/rules.json"));
    }

    #[test]
    fn ruleset_round_trips_through_json() {
        let json = serde_json::to_string(Ruleset::builtin()).unwrap();
        let back = Ruleset::from_json(&json).unwrap();
        assert_eq!(&back, Ruleset::builtin());
    }
}
