//! Input contracts: touch frames, mouse emulation, tracked-image events and
//! UI actions.
//!
//! # Invariants
//! - Inputs are plain data delivered once per frame; nothing here reads
//!   hardware or keeps time.
//! - Mouse input reaches the carousel only as an emulated single touch.

pub mod action;
pub mod mouse;
pub mod touch;
pub mod tracking;

pub use action::Action;
pub use mouse::MouseTouchEmulator;
pub use touch::{Touch, TouchFrame, TouchPhase};
pub use tracking::{AnchorId, TrackedImage, TrackedImagesChanged, TrackingState};

pub fn crate_info() -> &'static str {
    "markerspace-input v0.1.0"
}
