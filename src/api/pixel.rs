use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::extract::ApiQuery;
use super::load_session;
use crate::error::ApiError;
use crate::models::{ColorForm, EditSession, ImageSource};
use crate::server::AppState;
use crate::services::Viewport;

/// Query parameters for pixel reads
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PixelQuery {
    pub x: u32,
    pub y: u32,
    /// Buffer to sample (default: working)
    #[serde(default)]
    pub source: ImageSource,
}

/// A sampled pixel in image coordinates
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PixelResponse {
    pub x: u32,
    pub y: u32,
    pub color: ColorForm,
    /// `#RRGGBBAA`
    pub hex: String,
}

/// An eyedropper click and the pixel under it
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EyedropperResponse {
    pub canvas_x: u32,
    pub canvas_y: u32,
    pub display_ratio: f64,
    pub pixel: PixelResponse,
}

fn sample(session: &EditSession, source: ImageSource, x: u32, y: u32) -> Result<PixelResponse, ApiError> {
    let buffer = session.source(source);
    let color = buffer.pixel(x, y).ok_or(ApiError::OutOfBounds {
        x,
        y,
        width: buffer.width(),
        height: buffer.height(),
    })?;
    Ok(PixelResponse {
        x,
        y,
        color: color.into(),
        hex: color.to_string(),
    })
}

/// Read one pixel in image coordinates
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/pixel",
    responses(
        (status = 200, description = "Pixel value", body = PixelResponse),
        (status = 400, description = "Missing or malformed coordinates, or outside the image"),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session identifier"), PixelQuery),
    tag = "Sampling"
)]
pub async fn handle_pixel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<PixelQuery>,
) -> Result<Json<PixelResponse>, ApiError> {
    let session = load_session(&state, &id).await?;
    Ok(Json(sample(&session, query.source, query.x, query.y)?))
}

/// Pick a color from a click on the fit-to-canvas view
///
/// `x` and `y` are canvas coordinates. They are mapped back to image
/// coordinates through the display ratio (truncating), then sampled.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/eyedropper",
    responses(
        (status = 200, description = "Color under the click", body = EyedropperResponse),
        (status = 400, description = "Click outside the image"),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session identifier"), PixelQuery),
    tag = "Sampling"
)]
pub async fn handle_eyedropper(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<PixelQuery>,
) -> Result<Json<EyedropperResponse>, ApiError> {
    let session = load_session(&state, &id).await?;
    let buffer = session.source(query.source);
    let viewport = Viewport::fit(state.config.canvas, buffer.width(), buffer.height());
    let (x, y) = viewport.to_image(query.x, query.y);

    tracing::debug!(
        session_id = %id,
        canvas_x = query.x,
        canvas_y = query.y,
        x,
        y,
        ratio = viewport.display_ratio,
        "Eyedropper"
    );

    Ok(Json(EyedropperResponse {
        canvas_x: query.x,
        canvas_y: query.y,
        display_ratio: viewport.display_ratio,
        pixel: sample(&session, query.source, x, y)?,
    }))
}

/// How the image is laid out on the configured canvas
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/viewport",
    responses(
        (status = 200, description = "Canvas fit", body = Viewport),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session identifier")),
    tag = "Sampling"
)]
pub async fn handle_viewport(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Viewport>, ApiError> {
    let session = load_session(&state, &id).await?;
    let image = session.original();
    Ok(Json(Viewport::fit(
        state.config.canvas,
        image.width(),
        image.height(),
    )))
}
