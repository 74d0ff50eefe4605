use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use recolor_core::RecolorError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Pixel ({x}, {y}) is outside the {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Image decode error: {0}")]
    Decode(String),

    #[error("Image encode error: {0}")]
    Encode(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Pipeline(#[from] RecolorError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable identifier a client can switch on without parsing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::SessionNotFound(_) => "session_not_found",
            ApiError::OutOfBounds { .. } => "out_of_bounds",
            ApiError::Decode(_) => "decode",
            ApiError::Encode(_) => "encode",
            ApiError::UnsupportedFormat(_) => "unsupported_format",
            ApiError::InvalidColor(_) => "invalid_color",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Pipeline(e) => e.kind(),
            ApiError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::OutOfBounds { .. }
            | ApiError::Decode(_)
            | ApiError::UnsupportedFormat(_)
            | ApiError::InvalidColor(_)
            | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(RecolorError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Pipeline(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Encode(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CodecError> for ApiError {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Decode(_) | CodecError::EmptyInput | CodecError::Pipeline(_) => {
                ApiError::Decode(e.to_string())
            }
            CodecError::UnsupportedFormat(format) => ApiError::UnsupportedFormat(format),
            CodecError::PngEncode(_) | CodecError::Encode(_) => ApiError::Encode(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Errors from decoding uploads and encoding downloads.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("empty image data")]
    EmptyInput,

    #[error("{0}")]
    Decode(image::ImageError),

    #[error("decoded image rejected: {0}")]
    Pipeline(#[from] RecolorError),

    #[error("{0}")]
    UnsupportedFormat(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("{0}")]
    Encode(image::ImageError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, kind = self.kind(), "Request failed");
        } else {
            tracing::debug!(error = %self, kind = self.kind(), "Request rejected");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "kind": self.kind(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
