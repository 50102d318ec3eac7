//! Prefab carousel anchored to one tracked marker image.
//!
//! The host delivers tracked-image batches, UI actions and one `step` per
//! frame; the controller mutates the scene through [`SceneGraph`].
//!
//! # Invariants
//! - Variants are spawned once, on first detection, and never destroyed.
//! - The current index is always in range; exactly one variant is active
//!   after every advance.
//! - Manual rotation deltas right-multiply the accumulated offset.
//! - At most one highlighted part and one visible label at any time.
//!
//! [`SceneGraph`]: markerspace_scene::SceneGraph

pub mod config;
pub mod controller;
pub mod floating;
pub mod gesture;
pub mod selection;

pub use config::{CarouselConfig, ConfigError, FloatingConfig};
pub use controller::{CarouselController, FrameInput, IndexListener, Variant};
pub use floating::FloatingMotion;
pub use gesture::{PinchTracker, drag_rotation, smoothing_factor};
pub use selection::SelectionManager;

pub fn crate_info() -> &'static str {
    "markerspace-carousel v0.1.0"
}
