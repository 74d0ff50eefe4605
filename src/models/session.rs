use chrono::{DateTime, Utc};
use recolor_core::PixelBuffer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use utoipa::ToSchema;

/// Edit session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        use rand::Rng;
        let id: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(24)
            .map(char::from)
            .collect();
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which buffer of a session an endpoint reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Processed if present, else original
    #[default]
    Working,
    /// The image as uploaded
    Original,
}

/// One loaded image and the result of editing it.
///
/// The original buffer is fixed for the life of the session. Every edit
/// replaces the processed slot with a new buffer; buffers are shared
/// behind `Arc` so a snapshot can be handed to a blocking task without
/// copying pixels.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub id: SessionId,
    pub file_name: Option<String>,
    /// Format the upload was decoded from (e.g. "png")
    pub source_format: Option<String>,
    original: Arc<PixelBuffer>,
    processed: Option<Arc<PixelBuffer>>,
    pub last_operation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EditSession {
    pub fn new(
        id: SessionId,
        original: PixelBuffer,
        file_name: Option<String>,
        source_format: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            file_name,
            source_format,
            original: Arc::new(original),
            processed: None,
            last_operation: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn original(&self) -> &Arc<PixelBuffer> {
        &self.original
    }

    pub fn processed(&self) -> Option<&Arc<PixelBuffer>> {
        self.processed.as_ref()
    }

    /// Processed if present, else original
    pub fn working(&self) -> &Arc<PixelBuffer> {
        self.processed.as_ref().unwrap_or(&self.original)
    }

    pub fn source(&self, source: ImageSource) -> &Arc<PixelBuffer> {
        match source {
            ImageSource::Working => self.working(),
            ImageSource::Original => &self.original,
        }
    }

    pub fn has_processed(&self) -> bool {
        self.processed.is_some()
    }

    /// Store a new processed buffer
    pub fn set_processed(&mut self, buffer: PixelBuffer, operation: impl Into<String>) {
        self.processed = Some(Arc::new(buffer));
        self.last_operation = Some(operation.into());
        self.updated_at = Utc::now();
    }

    /// Drop the processed buffer so the original is the working image again
    pub fn reset(&mut self) {
        self.processed = None;
        self.last_operation = None;
        self.updated_at = Utc::now();
    }

    pub fn info(&self) -> SessionInfo {
        SessionInfo {
            id: self.id.to_string(),
            file_name: self.file_name.clone(),
            format: self.source_format.clone(),
            width: self.original.width(),
            height: self.original.height(),
            has_processed: self.has_processed(),
            last_operation: self.last_operation.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Session summary returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    /// Session identifier
    pub id: String,
    /// File name given at upload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Detected upload format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Whether an edit result exists
    pub has_processed: bool,
    /// Description of the most recent edit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_operation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
