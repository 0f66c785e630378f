//! Core rendering engine.

pub mod render;

pub use crate::render::Renderer;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
