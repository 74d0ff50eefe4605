use recolor_core::{QuantizationRequest, MAX_COLORS, MIN_COLORS};
use serde::Deserialize;
use std::path::Path;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Color count used when a quantize request omits it
    #[serde(default = "default_color_count")]
    pub default_color_count: u32,

    /// Method used when a quantize request omits it
    #[serde(default = "default_method")]
    pub default_method: String,

    /// Longest edge of preview thumbnails
    #[serde(default = "default_preview_size")]
    pub preview_max_size: u32,

    /// Fit-to-canvas view used to map eyedropper clicks
    #[serde(default)]
    pub canvas: CanvasConfig,

    /// Maximum accepted upload body in bytes
    #[serde(default = "default_upload_limit")]
    pub max_upload_bytes: usize,

    /// Recompress PNG downloads with oxipng
    #[serde(default = "default_optimize_png")]
    pub optimize_png: bool,

    /// JPEG quality (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,

    /// Live sessions kept before the least recently edited is evicted
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Seconds without an edit after which a session expires
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

/// Size of the view an eyedropper click is made on
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct CanvasConfig {
    #[serde(default = "default_canvas_width")]
    pub width: u32,
    #[serde(default = "default_canvas_height")]
    pub height: u32,
}

fn default_color_count() -> u32 {
    8
}

fn default_method() -> String {
    "kmeans".to_string()
}

fn default_preview_size() -> u32 {
    350
}

fn default_canvas_width() -> u32 {
    650
}

fn default_canvas_height() -> u32 {
    400
}

fn default_upload_limit() -> usize {
    32 * 1024 * 1024
}

fn default_optimize_png() -> bool {
    true
}

fn default_jpeg_quality() -> u8 {
    90
}

fn default_max_sessions() -> usize {
    64
}

fn default_session_ttl() -> u64 {
    60 * 60
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_canvas_width(),
            height: default_canvas_height(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_color_count: default_color_count(),
            default_method: default_method(),
            preview_max_size: default_preview_size(),
            canvas: CanvasConfig::default(),
            max_upload_bytes: default_upload_limit(),
            optimize_png: default_optimize_png(),
            jpeg_quality: default_jpeg_quality(),
            max_sessions: default_max_sessions(),
            session_ttl_secs: default_session_ttl(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::info!("No config file set, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml(&content) {
                Ok(config) => {
                    tracing::info!(
                        path = %path.display(),
                        default_color_count = config.default_color_count,
                        default_method = %config.default_method,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Parse and sanitize a YAML document
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config.sanitized())
    }

    /// Replace out-of-domain values with their defaults
    fn sanitized(mut self) -> Self {
        if QuantizationRequest::parse(self.default_color_count as i64, &self.default_method).is_err()
        {
            tracing::warn!(
                color_count = self.default_color_count,
                method = %self.default_method,
                "Invalid quantize defaults, expected {}..={} and a known method",
                MIN_COLORS,
                MAX_COLORS
            );
            self.default_color_count = default_color_count();
            self.default_method = default_method();
        }
        if self.preview_max_size == 0 {
            self.preview_max_size = default_preview_size();
        }
        if self.max_upload_bytes == 0 {
            self.max_upload_bytes = default_upload_limit();
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            self.canvas = CanvasConfig::default();
        }
        if self.max_sessions == 0 {
            self.max_sessions = default_max_sessions();
        }
        if self.session_ttl_secs == 0 {
            self.session_ttl_secs = default_session_ttl();
        }
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        self
    }
}
