pub mod extract;
pub mod image;
pub mod pixel;
pub mod process;
pub mod session;

pub use image::{__path_handle_image, __path_handle_preview};
pub use image::{handle_image, handle_preview};
pub use pixel::{__path_handle_eyedropper, __path_handle_pixel, __path_handle_viewport};
pub use pixel::{handle_eyedropper, handle_pixel, handle_viewport, EyedropperResponse, PixelResponse};
pub use process::{__path_handle_quantize, __path_handle_substitute};
pub use process::{
    handle_quantize, handle_substitute, QuantizeBody, QuantizeResponse, SubstituteBody,
    SubstituteResponse,
};
pub use session::{
    __path_handle_create_session, __path_handle_delete_session, __path_handle_get_session,
    __path_handle_reset,
};
pub use session::{handle_create_session, handle_delete_session, handle_get_session, handle_reset};

use crate::error::ApiError;
use crate::models::{EditSession, SessionId};
use crate::server::AppState;

/// Look up a session or fail with 404
pub(crate) async fn load_session(state: &AppState, id: &str) -> Result<EditSession, ApiError> {
    state
        .sessions
        .find_by_id(&SessionId::new(id))
        .await?
        .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))
}

/// Run CPU-heavy pixel work off the async executor
pub(crate) async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("Task error: {e}")))?
}
