use axum::{
    extract::{Path, State},
    response::Json,
};
use recolor_core::{quantize_image, substitute, QuantizationRequest};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::extract::{ApiJson, OptionalJson};
use super::{load_session, run_blocking};
use crate::error::ApiError;
use crate::models::{ColorInput, SessionInfo};
use crate::server::AppState;

/// Quantization parameters; omitted fields use the configured defaults
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct QuantizeBody {
    /// Target number of colors (2..=256)
    #[serde(default)]
    pub color_count: Option<i64>,
    /// One of "kmeans", "quantize" or "threshold"
    #[serde(default)]
    pub method: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuantizeResponse {
    pub session: SessionInfo,
    pub method: String,
    pub color_count: u32,
    /// Distinct RGBA values in the result
    pub distinct_colors: usize,
}

/// Exact color substitution. Colors are `{r, g, b, a?}` objects or hex strings.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubstituteBody {
    pub target: ColorInput,
    pub replacement: ColorInput,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubstituteResponse {
    pub session: SessionInfo,
    /// Target as `#RRGGBBAA`
    pub target: String,
    /// Replacement as `#RRGGBBAA`
    pub replacement: String,
    /// Number of pixels that matched the target
    pub replaced: usize,
}

/// Reduce the colors of the original image
///
/// Always starts from the original upload, so re-running with new
/// parameters discards earlier edits. Alpha is carried over unchanged.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/quantize",
    request_body = QuantizeBody,
    responses(
        (status = 200, description = "Image quantized", body = QuantizeResponse),
        (status = 400, description = "Malformed request body"),
        (status = 404, description = "Session not found"),
        (status = 422, description = "Color count out of range or unknown method"),
    ),
    params(("id" = String, Path, description = "Session identifier")),
    tag = "Editing"
)]
pub async fn handle_quantize(
    State(state): State<AppState>,
    Path(id): Path<String>,
    OptionalJson(body): OptionalJson<QuantizeBody>,
) -> Result<Json<QuantizeResponse>, ApiError> {
    let color_count = body
        .color_count
        .unwrap_or(state.config.default_color_count as i64);
    let method = body
        .method
        .unwrap_or_else(|| state.config.default_method.clone());

    // Validate before touching the session or any pixels
    let request = QuantizationRequest::parse(color_count, &method)?;
    let session = load_session(&state, &id).await?;

    let original = session.original().clone();
    let start = std::time::Instant::now();
    let (processed, distinct_colors) = run_blocking(move || {
        let processed = quantize_image(&original, &request)?;
        let distinct = processed.distinct_colors();
        Ok((processed, distinct))
    })
    .await?;

    tracing::info!(
        session_id = %id,
        method = %request.method(),
        color_count = request.color_count(),
        distinct_colors,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Quantized"
    );

    // Re-read so a concurrent edit to other fields is not clobbered
    let mut session = load_session(&state, &id).await?;
    session.set_processed(
        processed,
        format!("quantize:{}:{}", request.method(), request.color_count()),
    );
    let info = session.info();
    state.sessions.upsert(session).await?;

    Ok(Json(QuantizeResponse {
        session: info,
        method: request.method().to_string(),
        color_count: request.color_count(),
        distinct_colors,
    }))
}

/// Replace every pixel exactly equal to a target color
///
/// Operates on the working image (processed if present, else original),
/// so substitutions chain.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/substitute",
    request_body = SubstituteBody,
    responses(
        (status = 200, description = "Substitution applied", body = SubstituteResponse),
        (status = 400, description = "Malformed body or color"),
        (status = 404, description = "Session not found"),
        (status = 422, description = "Channel out of range"),
    ),
    params(("id" = String, Path, description = "Session identifier")),
    tag = "Editing"
)]
pub async fn handle_substitute(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<SubstituteBody>,
) -> Result<Json<SubstituteResponse>, ApiError> {
    let target = body.target.to_color()?;
    let replacement = body.replacement.to_color()?;
    let session = load_session(&state, &id).await?;

    let working = session.working().clone();
    let result = run_blocking(move || Ok(substitute(&working, target, replacement)?)).await?;

    tracing::info!(
        session_id = %id,
        target = %target,
        replacement = %replacement,
        replaced = result.replaced,
        "Substituted"
    );

    let mut session = load_session(&state, &id).await?;
    session.set_processed(result.buffer, format!("substitute:{target}:{replacement}"));
    let info = session.info();
    state.sessions.upsert(session).await?;

    Ok(Json(SubstituteResponse {
        session: info,
        target: target.to_string(),
        replacement: replacement.to_string(),
        replaced: result.replaced,
    }))
}
