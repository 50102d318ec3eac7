//! Shared value types for the markerspace crates.
//!
//! # Invariants
//! - Every type here is plain data: `Copy` where possible, no scene access.

mod geometry;
mod types;

pub use geometry::{Ray, RaycastHit};
pub use types::{EntityId, Pose, Transform};
