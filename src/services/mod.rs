pub mod image_codec;
pub mod session_store;
pub mod viewport;

pub use image_codec::{DecodedImage, EncodeOptions, OutputFormat};
pub use session_store::{InMemorySessionStore, SessionStore};
pub use viewport::Viewport;
