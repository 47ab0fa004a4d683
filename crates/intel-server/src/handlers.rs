//! Model-intel HTTP handlers.
//!
//! Each handler validates the untyped body, hands plain data to the
//! engine and wraps the result. No state survives a request.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use intel_core::{CapabilityFlags, RawModel};
use intel_engine::{normalize_model, parse_and_match, CapabilityClassifier, CapabilityInput};
use serde_json::Value;

use crate::error::ApiError;
use crate::server::AppState;
use crate::validation::RequestValidator;

const NORMALIZE: &str = "normalize_openrouter";
const CAPABILITIES: &str = "capabilities";
const PARSE_MATCH: &str = "benchmarks_parse_match";

type ApiResult = Result<Json<Value>, ApiError>;

/// `POST /api/model-intel/normalize-openrouter`
pub async fn normalize_openrouter(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let result = normalize_inner(&state, body);
    state.record(NORMALIZE, &result);
    result
}

fn normalize_inner(state: &AppState, body: Result<Json<Value>, JsonRejection>) -> ApiResult {
    let Json(body) = body?;
    let mut v = RequestValidator::new(&body)?;
    let model = v.require_object("model");
    if let Some(model) = model {
        v.require_nested_str("model", model, "id");
        v.require_nested_str("model", model, "name");
    }
    let model = v.finish(model)?;

    let raw: RawModel = serde_json::from_value(Value::Object(model.clone()))
        .map_err(|e| ApiError::Validation(vec![format!("model is malformed: {e}")]))?;
    let normalized = normalize_model(raw, &state.rules.providers);
    tracing::info!(id = %normalized.id, provider = %normalized.provider, "normalized catalog model");

    Ok(Json(serde_json::json!({ "normalized": normalized })))
}

/// `POST /api/model-intel/capabilities`
pub async fn capabilities(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let result = capabilities_inner(&state, body);
    state.record(CAPABILITIES, &result);
    result
}

fn capabilities_inner(state: &AppState, body: Result<Json<Value>, JsonRejection>) -> ApiResult {
    let Json(body) = body?;
    let mut v = RequestValidator::new(&body)?;
    let model_id = v.require_str("modelId");
    let model_name = v.require_str("modelName");
    let modality = v.optional_str("modality");
    let supported_params = v.optional_str_list("supportedParams");
    let capability_tags = v.optional_str_list("capabilities");
    let (model_id, model_name) = v.finish(model_id.zip(model_name))?;

    let input = CapabilityInput::new(model_id, model_name)
        .with_modality(modality)
        .with_supported_params(supported_params.as_deref())
        .with_capabilities(capability_tags.as_deref());
    let flags: CapabilityFlags = CapabilityClassifier::new(&state.rules.capabilities).classify(&input);
    tracing::info!(model_id, ?flags, "classified model capabilities");

    let body = serde_json::to_value(flags).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(body))
}

/// `POST /api/model-intel/benchmarks/parse-match`
pub async fn benchmarks_parse_match(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult {
    let result = parse_match_inner(&state, body);
    state.record(PARSE_MATCH, &result);
    result
}

fn parse_match_inner(state: &AppState, body: Result<Json<Value>, JsonRejection>) -> ApiResult {
    let Json(body) = body?;
    let mut v = RequestValidator::new(&body)?;
    let model_id = v.require_str("modelId");
    let model_name = v.require_str("modelName");
    let raw = v.require_present("rawBenchmarks");
    let ((model_id, model_name), raw) = v.finish(model_id.zip(model_name).zip(raw))?;

    let outcome = parse_and_match(raw, model_id, model_name, &state.rules.matcher, None);
    if let Some(metrics) = &state.metrics {
        metrics.histogram_observe("model_intel_benchmarks_parsed", &[], outcome.parsed_count as f64);
        let matched = if outcome.is_match() { "true" } else { "false" };
        metrics.counter_inc("model_intel_benchmark_matches_total", &[("matched", matched)], 1);
    }
    tracing::info!(
        model_id,
        parsed = outcome.parsed_count,
        score = ?outcome.score,
        "benchmark parse-match complete"
    );

    Ok(Json(serde_json::json!({
        "parsedCount": outcome.parsed_count,
        "match": outcome.record,
    })))
}
