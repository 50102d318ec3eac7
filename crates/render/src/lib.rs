//! Rendering Adapter: camera projection and renderer-agnostic output.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Screen coordinates are pixels with the origin at the bottom-left.

mod camera;
mod renderer;

pub use camera::ArCamera;
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "markerspace-render v0.1.0"
}
