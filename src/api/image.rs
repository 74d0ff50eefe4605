use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use utoipa::IntoParams;

use super::extract::ApiQuery;
use super::{load_session, run_blocking};
use crate::error::ApiError;
use crate::models::ImageSource;
use crate::server::AppState;
use crate::services::{image_codec, OutputFormat};

/// Query parameters for image download
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageQuery {
    /// png (default), jpeg, gif, bmp or tiff
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub source: ImageSource,
}

/// Query parameters for previews
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewQuery {
    #[serde(default)]
    pub source: ImageSource,
    /// Longest edge in pixels (default from config)
    #[serde(default)]
    pub max_size: Option<u32>,
}

/// Download name: the upload's stem with the new extension, restricted to
/// characters that are safe inside a quoted header value.
fn download_name(file_name: Option<&str>, format: OutputFormat) -> String {
    let stem = file_name
        .map(|n| n.rsplit_once('.').map_or(n, |(stem, _)| stem))
        .unwrap_or("image");
    let safe: String = stem
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
        .collect();
    let safe = safe.trim();
    let safe = if safe.is_empty() { "image" } else { safe };
    format!("{safe}-recolored.{}", format.extension())
}

fn image_response(bytes: Vec<u8>, content_type: &str, etag: String, disposition: Option<String>) -> Response {
    let len = bytes.len();
    let mut response = (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, len.to_string()),
            (header::ETAG, etag),
        ],
        Bytes::from(bytes),
    )
        .into_response();

    if let Some(value) = disposition.and_then(|d| d.parse().ok()) {
        response.headers_mut().insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

fn not_modified(headers: &HeaderMap, etag: &str) -> Option<Response> {
    let matches = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|tag| tag.trim() == etag || tag.trim() == "*"));
    matches.then(|| (StatusCode::NOT_MODIFIED, [(header::ETAG, etag.to_string())]).into_response())
}

/// Encode the working (or original) image
///
/// JPEG drops the alpha channel. Supports `If-None-Match` revalidation.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/image",
    responses(
        (status = 200, description = "Encoded image", content_type = "application/octet-stream"),
        (status = 304, description = "Unchanged since the given ETag"),
        (status = 400, description = "Unsupported format"),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Encoding failed"),
    ),
    params(("id" = String, Path, description = "Session identifier"), ImageQuery),
    tag = "Output"
)]
pub async fn handle_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<ImageQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let format: OutputFormat = match query.format.as_deref() {
        Some(f) => f.parse()?,
        None => OutputFormat::default(),
    };
    let session = load_session(&state, &id).await?;
    let buffer = session.source(query.source).clone();
    let buffer_has_alpha = buffer.has_alpha();
    let options = state.encode_options();

    let start = std::time::Instant::now();
    let bytes = run_blocking(move || Ok(image_codec::encode(&buffer, format, &options)?)).await?;
    let etag = image_codec::etag(&bytes);

    tracing::debug!(
        session_id = %id,
        format = %format,
        alpha_dropped = buffer_has_alpha && !format.supports_alpha(),
        size = bytes.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Image encoded"
    );

    if let Some(response) = not_modified(&headers, &etag) {
        return Ok(response);
    }

    let disposition = format!(
        "inline; filename=\"{}\"",
        download_name(session.file_name.as_deref(), format)
    );
    Ok(image_response(bytes, format.content_type(), etag, Some(disposition)))
}

/// PNG thumbnail for display
///
/// Downscaled with Lanczos3 so the longest edge is at most `max_size`;
/// smaller images are returned at their own size.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/preview",
    responses(
        (status = 200, description = "PNG preview", content_type = "image/png"),
        (status = 304, description = "Unchanged since the given ETag"),
        (status = 404, description = "Session not found"),
    ),
    params(("id" = String, Path, description = "Session identifier"), PreviewQuery),
    tag = "Output"
)]
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<PreviewQuery>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let max_size = query
        .max_size
        .filter(|&s| s > 0)
        .unwrap_or(state.config.preview_max_size);
    let session = load_session(&state, &id).await?;
    let buffer = session.source(query.source).clone();
    let options = state.encode_options();

    let bytes = run_blocking(move || {
        let scaled = image_codec::preview(&buffer, max_size)?;
        Ok(image_codec::encode(&scaled, OutputFormat::Png, &options)?)
    })
    .await?;
    let etag = image_codec::etag(&bytes);

    if let Some(response) = not_modified(&headers, &etag) {
        return Ok(response);
    }
    Ok(image_response(bytes, OutputFormat::Png.content_type(), etag, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_download_name_replaces_extension() {
        assert_eq!(
            download_name(Some("photo.final.jpg"), OutputFormat::Png),
            "photo.final-recolored.png"
        );
        assert_eq!(download_name(None, OutputFormat::Jpeg), "image-recolored.jpg");
    }

    #[test]
    fn test_download_name_strips_header_breaking_chars() {
        assert_eq!(
            download_name(Some("a\"b\r\n;c.png"), OutputFormat::Gif),
            "abc-recolored.gif"
        );
        assert_eq!(download_name(Some("\"\".png"), OutputFormat::Bmp), "image-recolored.bmp");
    }

    #[test]
    fn test_not_modified_matches_list_and_wildcard() {
        let mut headers = HeaderMap::new();
        assert!(not_modified(&headers, "\"abc\"").is_none());

        headers.insert(header::IF_NONE_MATCH, "\"x\", \"abc\"".parse().unwrap());
        let response = not_modified(&headers, "\"abc\"").unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

        headers.insert(header::IF_NONE_MATCH, "*".parse().unwrap());
        assert!(not_modified(&headers, "\"other\"").is_some());

        headers.insert(header::IF_NONE_MATCH, "\"x\"".parse().unwrap());
        assert!(not_modified(&headers, "\"abc\"").is_none());
    }
}
