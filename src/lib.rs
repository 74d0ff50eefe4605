//! Recolor - color quantization and exact color substitution
//!
//! Session-based HTTP service around [`recolor_core`]: upload an image,
//! reduce its palette, swap colors, sample pixels and download the result.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
