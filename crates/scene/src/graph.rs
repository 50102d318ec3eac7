use glam::{Quat, Vec3};
use markerspace_common::{EntityId, Pose, Ray, RaycastHit};

use crate::Prefab;

/// Binary per-part states the selection layer can toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Highlight material swapped in.
    Highlight,
    /// Label shown.
    Label,
}

/// Snapshot of a node's audio source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioStatus {
    pub has_clip: bool,
    pub playing: bool,
}

/// Everything the carousel needs from the host scene graph.
///
/// Positions and rotations are world space; scale is local. Mutators return
/// `false` when the node (or the capability) does not exist.
pub trait SceneGraph {
    /// Instantiate a prefab as a new active root node at `pose`.
    fn instantiate(&mut self, prefab: &Prefab, pose: Pose) -> EntityId;

    fn set_active(&mut self, id: EntityId, active: bool) -> bool;
    /// The node's own active flag, ignoring ancestors.
    fn is_active(&self, id: EntityId) -> bool;

    fn position(&self, id: EntityId) -> Option<Vec3>;
    fn set_position(&mut self, id: EntityId, position: Vec3) -> bool;
    fn rotation(&self, id: EntityId) -> Option<Quat>;
    fn set_rotation(&mut self, id: EntityId, rotation: Quat) -> bool;
    fn local_scale(&self, id: EntityId) -> Option<Vec3>;
    fn set_local_scale(&mut self, id: EntityId, scale: Vec3) -> bool;

    fn has_animator(&self, id: EntityId) -> bool;
    fn set_animator_trigger(&mut self, id: EntityId, trigger: &str) -> bool;

    fn audio_status(&self, id: EntityId) -> Option<AudioStatus>;
    fn play_audio(&mut self, id: EntityId) -> bool;
    fn stop_audio(&mut self, id: EntityId) -> bool;

    fn has_capability(&self, id: EntityId, capability: Capability) -> bool;
    fn set_capability(&mut self, id: EntityId, capability: Capability, active: bool) -> bool;

    /// Nearest collider hit among nodes active in hierarchy.
    fn raycast(&self, ray: &Ray) -> Option<RaycastHit>;

    /// Name for log lines.
    fn display_name(&self, id: EntityId) -> String;
}
