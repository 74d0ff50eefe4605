use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::extract::ApiQuery;
use super::{load_session, run_blocking};
use crate::error::ApiError;
use crate::models::{EditSession, SessionId, SessionInfo};
use crate::server::AppState;
use crate::services::image_codec;

/// Query parameters for session creation
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CreateSessionQuery {
    /// Original file name, echoed back and used for downloads
    #[serde(default)]
    pub name: Option<String>,
}

/// Upload an image and open an edit session
///
/// The request body is the raw image file. The format is detected from
/// its contents; the image is converted to RGBA on load.
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body(content = Vec<u8>, description = "Raw image file", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Session created", body = SessionInfo),
        (status = 400, description = "Empty, corrupt or unsupported image"),
        (status = 413, description = "Upload too large"),
    ),
    params(CreateSessionQuery),
    tag = "Sessions"
)]
pub async fn handle_create_session(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CreateSessionQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let upload_size = body.len();
    let decoded = run_blocking(move || Ok(image_codec::decode(&body)?)).await?;

    let session = EditSession::new(
        SessionId::generate(),
        decoded.buffer,
        query.name.filter(|n| !n.trim().is_empty()),
        Some(decoded.format),
    );
    let info = session.info();

    tracing::info!(
        session_id = %session.id,
        format = info.format.as_deref().unwrap_or("unknown"),
        width = info.width,
        height = info.height,
        upload_size,
        "Session created"
    );

    state.sessions.upsert(session).await?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// Get session metadata
#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    responses(
        (status = 200, description = "Session found", body = SessionInfo),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session identifier")),
    tag = "Sessions"
)]
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionInfo>, ApiError> {
    let session = load_session(&state, &id).await?;
    Ok(Json(session.info()))
}

/// Close a session and free its buffers
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    responses(
        (status = 204, description = "Session deleted"),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session identifier")),
    tag = "Sessions"
)]
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if !state.sessions.remove(&SessionId::new(&id)).await? {
        return Err(ApiError::SessionNotFound(id));
    }
    tracing::info!(session_id = %id, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Discard the processed image
///
/// The original becomes the working image again.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/reset",
    responses(
        (status = 200, description = "Session reset", body = SessionInfo),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session identifier")),
    tag = "Sessions"
)]
pub async fn handle_reset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionInfo>, ApiError> {
    let mut session = load_session(&state, &id).await?;
    session.reset();
    let info = session.info();
    state.sessions.upsert(session).await?;

    tracing::debug!(session_id = %id, "Session reset to original");
    Ok(Json(info))
}
