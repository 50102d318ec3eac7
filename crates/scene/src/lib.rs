//! Scene graph: the host-side collaborator the carousel mutates.
//!
//! # Invariants
//! - All state mutations flow through explicit operations.
//! - Node iteration order is deterministic (BTreeMap).
//! - Variants are root nodes; parts are their children.

mod graph;
mod prefab;
mod scene;

pub use graph::{AudioStatus, Capability, SceneGraph};
pub use prefab::{AnimatorDef, AudioDef, PartDef, Prefab};
pub use scene::{Node, Scene, SceneEvent};

pub fn crate_info() -> &'static str {
    "markerspace-scene v0.1.0"
}
