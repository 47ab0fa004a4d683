//! Capability classification from heterogeneous catalog signals.
//!
//! Each flag is computed independently. Missing inputs never error; they
//! simply fail to produce a positive signal.

use intel_core::{CapabilityFlags, CapabilityRuleset, NormalizedModel};

const MODALITY_SEPARATOR: &str = "->";

/// Signals available for one model. Absent lists are empty slices.
#[derive(Clone, Copy, Debug, Default)]
pub struct CapabilityInput<'a> {
    pub model_id: &'a str,
    pub model_name: &'a str,
    pub modality: Option<&'a str>,
    pub supported_params: &'a [String],
    pub capabilities: &'a [String],
}

impl<'a> CapabilityInput<'a> {
    pub fn new(model_id: &'a str, model_name: &'a str) -> Self {
        Self {
            model_id,
            model_name,
            ..Default::default()
        }
    }

    pub fn with_modality(mut self, modality: Option<&'a str>) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_supported_params(mut self, params: Option<&'a [String]>) -> Self {
        self.supported_params = params.unwrap_or_default();
        self
    }

    pub fn with_capabilities(mut self, capabilities: Option<&'a [String]>) -> Self {
        self.capabilities = capabilities.unwrap_or_default();
        self
    }

    /// Borrow the classifier inputs from an already normalized model.
    pub fn from_normalized(model: &'a NormalizedModel) -> Self {
        Self::new(&model.id, &model.name)
            .with_modality(Some(model.modality.as_str()))
            .with_supported_params(model.supported_params.as_deref())
            .with_capabilities(model.capabilities.as_deref())
    }

    fn input_side(&self) -> Option<&'a str> {
        self.modality.and_then(|m| m.split(MODALITY_SEPARATOR).next())
    }

    fn output_side(&self) -> Option<&'a str> {
        self.modality.and_then(|m| m.split(MODALITY_SEPARATOR).nth(1))
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

/// Applies a [`CapabilityRuleset`] to [`CapabilityInput`]s.
#[derive(Clone, Copy, Debug)]
pub struct CapabilityClassifier<'r> {
    rules: &'r CapabilityRuleset,
}

impl<'r> CapabilityClassifier<'r> {
    pub fn new(rules: &'r CapabilityRuleset) -> Self {
        Self { rules }
    }

    pub fn classify(&self, input: &CapabilityInput<'_>) -> CapabilityFlags {
        CapabilityFlags {
            supports_vision: self.supports_vision(input),
            supports_audio: self.supports_audio(input),
            supports_tools: self.supports_tools(input),
            supports_image_generation: self.supports_image_generation(input),
            supports_file_input: self.supports_file_input(input),
            supports_search_capability: self.supports_search_capability(input),
        }
    }

    pub fn supports_vision(&self, input: &CapabilityInput<'_>) -> bool {
        input
            .input_side()
            .is_some_and(|side| side.contains(self.rules.vision_input.as_str()))
    }

    pub fn supports_audio(&self, input: &CapabilityInput<'_>) -> bool {
        input
            .input_side()
            .is_some_and(|side| side.contains(self.rules.audio_input.as_str()))
    }

    pub fn supports_tools(&self, input: &CapabilityInput<'_>) -> bool {
        input
            .supported_params
            .iter()
            .any(|p| *p == self.rules.tools_param)
    }

    /// Capability tags take priority, then the modality output side, then
    /// well-known image model names.
    pub fn supports_image_generation(&self, input: &CapabilityInput<'_>) -> bool {
        let tagged = input.capabilities.iter().any(|cap| {
            let cap = cap.to_lowercase();
            contains_any(&cap, &self.rules.image_capability_contains)
                || self.rules.image_capability_exact.iter().any(|e| *e == cap)
        });
        if tagged {
            return true;
        }

        if input
            .output_side()
            .is_some_and(|side| side.contains(self.rules.image_output.as_str()))
        {
            return true;
        }

        let haystack = format!("{} {}", input.model_name, input.model_id).to_lowercase();
        contains_any(&haystack, &self.rules.image_name_keywords)
    }

    pub fn supports_file_input(&self, input: &CapabilityInput<'_>) -> bool {
        self.supports_vision(input)
            || input
                .supported_params
                .iter()
                .any(|p| *p == self.rules.file_param)
    }

    pub fn supports_search_capability(&self, input: &CapabilityInput<'_>) -> bool {
        let signalled = input
            .capabilities
            .iter()
            .chain(input.supported_params)
            .any(|entry| contains_any(&entry.to_lowercase(), &self.rules.search_signal_keywords));
        if signalled {
            return true;
        }

        let haystack = format!("{} {}", input.model_id, input.model_name).to_lowercase();
        contains_any(&haystack, &self.rules.search_name_keywords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(input: CapabilityInput<'_>) -> CapabilityFlags {
        let rules = CapabilityRuleset::default();
        CapabilityClassifier::new(&rules).classify(&input)
    }

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_identity_yields_no_flags() {
        let flags = classify(CapabilityInput::new("openai/gpt-4o", "GPT-4o"));
        assert_eq!(flags, CapabilityFlags::default());
    }

    #[test]
    fn vision_and_audio_read_input_side_only() {
        let flags = classify(
            CapabilityInput::new("google/gemini", "Gemini").with_modality(Some("text+image+audio->text")),
        );
        assert!(flags.supports_vision);
        assert!(flags.supports_audio);
        assert!(flags.supports_file_input);
        assert!(!flags.supports_image_generation);

        let out_only = classify(CapabilityInput::new("x/y", "Y").with_modality(Some("text->image")));
        assert!(!out_only.supports_vision);
        assert!(out_only.supports_image_generation);
    }

    #[test]
    fn vision_match_is_case_sensitive() {
        let flags = classify(CapabilityInput::new("x/y", "Y").with_modality(Some("Text+Image->Text")));
        assert!(!flags.supports_vision);
    }

    #[test]
    fn tools_requires_exact_param() {
        let params = owned(&["tool_choice", "Tools"]);
        let flags = classify(CapabilityInput::new("x/y", "Y").with_supported_params(Some(&params[..])));
        assert!(!flags.supports_tools);

        let params = owned(&["temperature", "tools"]);
        let flags = classify(CapabilityInput::new("x/y", "Y").with_supported_params(Some(&params[..])));
        assert!(flags.supports_tools);
    }

    #[test]
    fn file_param_enables_file_input() {
        let params = owned(&["file"]);
        let flags = classify(CapabilityInput::new("x/y", "Y").with_supported_params(Some(&params[..])));
        assert!(flags.supports_file_input);
        assert!(!flags.supports_vision);
    }

    #[test]
    fn image_generation_from_capability_tags() {
        for tag in ["Image-Generation", "images", "IMAGE_EDIT"] {
            let caps = owned(&[tag]);
            let flags = classify(CapabilityInput::new("x/y", "Y").with_capabilities(Some(&caps[..])));
            assert!(flags.supports_image_generation, "tag {tag}");
        }
    }

    #[test]
    fn image_generation_from_name_keywords() {
        for (id, name) in [
            ("black-forest-labs/flux-1.1-pro", "FLUX 1.1 Pro"),
            ("openai/dall-e-3", "DALL·E 3"),
            ("stability/sdxl-turbo", "Turbo"),
            ("google/imagen-4", "Imagen 4"),
        ] {
            let flags = classify(CapabilityInput::new(id, name));
            assert!(flags.supports_image_generation, "{id}");
        }
        let flags = classify(CapabilityInput::new("anthropic/claude-haiku-4.5", "Claude Haiku 4.5"));
        assert!(!flags.supports_image_generation);
    }

    #[test]
    fn modality_without_arrow_has_no_output_side() {
        let flags = classify(CapabilityInput::new("x/y", "Y").with_modality(Some("image")));
        assert!(flags.supports_vision);
        assert!(!flags.supports_image_generation);
    }

    #[test]
    fn search_from_capabilities_params_or_name() {
        let caps = owned(&["Web_Browsing"]);
        let flags = classify(CapabilityInput::new("x/y", "Y").with_capabilities(Some(&caps[..])));
        assert!(flags.supports_search_capability);

        let params = owned(&["web_search_options"]);
        let flags = classify(CapabilityInput::new("x/y", "Y").with_supported_params(Some(&params[..])));
        assert!(flags.supports_search_capability);

        let flags = classify(CapabilityInput::new("perplexity/sonar", "Sonar"));
        assert!(flags.supports_search_capability);

        let flags = classify(CapabilityInput::new("openai/gpt-4o", "GPT-4o"));
        assert!(!flags.supports_search_capability);
    }

    #[test]
    fn sonar_pro_scenario() {
        let params = owned(&["tools"]);
        let caps = owned(&["search"]);
        let flags = classify(
            CapabilityInput::new("perplexity/sonar-pro", "Sonar Pro")
                .with_modality(Some("text->text"))
                .with_supported_params(Some(&params[..]))
                .with_capabilities(Some(&caps[..])),
        );
        assert!(flags.supports_tools);
        assert!(flags.supports_search_capability);
        assert!(!flags.supports_vision);
    }

    #[test]
    fn from_normalized_uses_model_fields() {
        let model = NormalizedModel {
            id: "openai/gpt-4o".into(),
            name: "GPT-4o".into(),
            provider: "OpenAI".into(),
            context_window: 128_000,
            input_price: 2.5,
            output_price: 10.0,
            modality: "text+image->text".into(),
            description: None,
            supported_params: Some(owned(&["tools"])),
            capabilities: None,
        };
        let flags = classify(CapabilityInput::from_normalized(&model));
        assert!(flags.supports_vision);
        assert!(flags.supports_tools);
        assert!(flags.supports_file_input);
        assert!(!flags.supports_audio);
    }

    #[test]
    fn custom_ruleset_replaces_keywords() {
        let rules = CapabilityRuleset {
            search_name_keywords: vec!["grounded".into()],
            ..Default::default()
        };
        let classifier = CapabilityClassifier::new(&rules);
        assert!(!classifier.supports_search_capability(&CapabilityInput::new("perplexity/sonar", "Sonar")));
        assert!(classifier.supports_search_capability(&CapabilityInput::new("acme/grounded-1", "G1")));
    }
}
