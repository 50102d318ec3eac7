use markerspace_common::EntityId;
use markerspace_scene::{Capability, SceneGraph};

/// Tracks the single current holder of each capability and keeps the
/// holders mutually exclusive across the whole scene.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    highlighted: Option<EntityId>,
    labelled: Option<EntityId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self, capability: Capability) -> Option<EntityId> {
        match capability {
            Capability::Highlight => self.highlighted,
            Capability::Label => self.labelled,
        }
    }

    fn slot(&mut self, capability: Capability) -> &mut Option<EntityId> {
        match capability {
            Capability::Highlight => &mut self.highlighted,
            Capability::Label => &mut self.labelled,
        }
    }

    /// Make `target` the holder of `capability`, deactivating the previous
    /// holder first.
    pub fn select<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        capability: Capability,
        target: EntityId,
    ) {
        let slot = self.slot(capability);
        if let Some(previous) = slot.filter(|p| *p != target) {
            scene.set_capability(previous, capability, false);
        }
        *slot = Some(target);
        if !scene.set_capability(target, capability, true) {
            tracing::warn!(?capability, target = %scene.display_name(target), "target lacks capability");
        }
        tracing::debug!(?capability, target = %scene.display_name(target), "selected");
    }
}
