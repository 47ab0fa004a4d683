//! Catalog model normalization.

use intel_core::{NormalizedModel, PriceValue, ProviderDirectory, RawModel};

pub const UNKNOWN_PROVIDER: &str = "Unknown";
pub const DEFAULT_MODALITY: &str = "text->text";

const TOKENS_PER_MILLION: f64 = 1_000_000.0;

/// Derive a provider display name from a `<provider>/<model>` id.
///
/// Ids without a `/` (or with an empty prefix) map to `"Unknown"`. Slugs
/// missing from the directory get their first character upper-cased.
pub fn extract_provider(id: &str, providers: &ProviderDirectory) -> String {
    let Some((prefix, _)) = id.split_once('/') else {
        return UNKNOWN_PROVIDER.to_string();
    };
    let slug = prefix.to_lowercase();
    if let Some(name) = providers.lookup(&slug) {
        return name.to_string();
    }

    let mut chars = slug.chars();
    match chars.next() {
        Some(first) => {
            tracing::debug!(slug = %slug, "provider not in directory, capitalizing slug");
            first.to_uppercase().chain(chars).collect()
        }
        None => UNKNOWN_PROVIDER.to_string(),
    }
}

/// Lower-case a modality string, defaulting to `text->text`.
pub fn normalize_modality(modality: Option<&str>) -> String {
    modality
        .map(str::to_lowercase)
        .unwrap_or_else(|| DEFAULT_MODALITY.to_string())
}

/// Convert a per-token price into a per-million-token price.
/// Missing or unparseable prices are zero.
pub fn token_price_to_million_price(price: Option<&PriceValue>) -> f64 {
    price
        .and_then(PriceValue::as_f64)
        .map_or(0.0, |p| p * TOKENS_PER_MILLION)
}

/// Build the internal contract from a raw catalog record.
pub fn normalize_model(raw: RawModel, providers: &ProviderDirectory) -> NormalizedModel {
    let provider = extract_provider(&raw.id, providers);
    let modality = normalize_modality(
        raw.architecture
            .as_ref()
            .and_then(|a| a.modality.as_deref()),
    );
    let (input_price, output_price) = match &raw.pricing {
        Some(p) => (
            token_price_to_million_price(p.prompt.as_ref()),
            token_price_to_million_price(p.completion.as_ref()),
        ),
        None => (0.0, 0.0),
    };

    NormalizedModel {
        id: raw.id,
        name: raw.name,
        provider,
        context_window: raw.context_length.unwrap_or(0),
        input_price,
        output_price,
        modality,
        description: raw.description,
        supported_params: raw.supported_parameters,
        capabilities: raw.capabilities,
    }
}
