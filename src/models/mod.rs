pub mod color_form;
pub mod config;
pub mod session;

pub use color_form::{ColorForm, ColorInput};
pub use config::{AppConfig, CanvasConfig};
pub use session::{EditSession, ImageSource, SessionId, SessionInfo};
