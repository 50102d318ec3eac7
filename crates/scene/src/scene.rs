use glam::{Quat, Vec3};
use markerspace_common::{EntityId, Pose, Ray, RaycastHit, Transform};
use markerspace_ecs::{Animator, AudioSource, Collider, ComponentStore, MeshRenderer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{AudioStatus, Capability, Prefab, SceneGraph};

/// An event record produced by every structural or transform mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// A prefab was instantiated as a new root.
    Instantiated {
        id: EntityId,
        prefab: String,
        transform: Transform,
    },
    /// A node's own active flag changed.
    ActiveChanged { id: EntityId, active: bool },
    /// A node's local transform changed.
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
}

/// Per-node data stored in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
    /// Transform relative to the parent (world transform for roots).
    pub local: Transform,
    pub active: bool,
}

/// In-memory scene graph.
///
/// Owns the node hierarchy and every node's capabilities. Uses BTreeMap so
/// ray casts and debug dumps iterate in the same order on every platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: BTreeMap<EntityId, Node>,
    components: ComponentStore,
    #[serde(skip)]
    event_log: Vec<SceneEvent>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Root nodes in deterministic order.
    pub fn roots(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, n)| n.parent.is_none())
            .map(|(id, _)| *id)
    }

    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// First child of `id` carrying the given name.
    pub fn find_child(&self, id: EntityId, name: &str) -> Option<EntityId> {
        self.children(id).iter().copied().find(|child| {
            self.components
                .get_name(*child)
                .is_some_and(|n| n.0 == name)
        })
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// Add a node under `parent` (or as a root). Unknown parents yield a root.
    pub fn spawn_node(&mut self, parent: Option<EntityId>, local: Transform) -> EntityId {
        let id = EntityId::new();
        let parent = parent.filter(|p| self.nodes.contains_key(p));
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.children.push(id);
        }
        self.nodes.insert(
            id,
            Node {
                parent,
                children: Vec::new(),
                local,
                active: true,
            },
        );
        id
    }

    /// Compose local transforms from the root down.
    pub fn world_transform(&self, id: EntityId) -> Option<Transform> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(parent) => Some(self.world_transform(parent)?.mul_transform(&node.local)),
            None => Some(node.local),
        }
    }

    /// True when the node and all of its ancestors are active.
    pub fn is_active_in_hierarchy(&self, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(cur) = current {
            match self.nodes.get(&cur) {
                Some(node) if node.active => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    fn update_local(&mut self, id: EntityId, f: impl FnOnce(&mut Transform)) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let old = node.local;
        f(&mut node.local);
        let new = node.local;
        if old != new {
            self.event_log
                .push(SceneEvent::TransformUpdated { id, old, new });
        }
        true
    }

    fn parent_world(&self, id: EntityId) -> Option<Transform> {
        let parent = self.nodes.get(&id)?.parent?;
        self.world_transform(parent)
    }

    fn hit_collider(&self, id: EntityId, collider: &Collider, ray: &Ray) -> Option<RaycastHit> {
        let world = self.world_transform(id)?;
        let point = match *collider {
            Collider::Sphere { radius } => {
                let radius = radius * world.scale.abs().max_element();
                ray.at(ray.intersect_sphere(world.position, radius)?)
            }
            Collider::Box { half_extents } => {
                // Test in the node's local space so rotation and scale apply.
                let origin = world.inverse_transform_point(ray.origin);
                let direction =
                    world.inverse_transform_point(ray.origin + ray.direction) - origin;
                let local_ray = Ray::new(origin, direction)?;
                let half = Vec3::from_array(half_extents);
                let t = local_ray.intersect_aabb(-half, half)?;
                world.transform_point(local_ray.at(t))
            }
        };
        Some(RaycastHit {
            entity: id,
            distance: (point - ray.origin).length(),
            point,
        })
    }
}

impl SceneGraph for Scene {
    fn instantiate(&mut self, prefab: &Prefab, pose: Pose) -> EntityId {
        let transform = Transform {
            scale: prefab.scale,
            ..Transform::from_pose(pose)
        };
        let root = self.spawn_node(None, transform);
        self.components.set_name(root, prefab.name.clone());
        if let Some(animator) = &prefab.animator {
            self.components.set_animator(
                root,
                Animator {
                    triggers: animator.triggers.clone(),
                    fired: Vec::new(),
                },
            );
        }
        if let Some(audio) = &prefab.audio {
            self.components.set_audio_source(
                root,
                AudioSource {
                    clip: audio.clip.clone(),
                    playing: false,
                },
            );
        }

        for part in &prefab.parts {
            let local = Transform {
                position: part.position,
                rotation: Quat::IDENTITY,
                scale: part.scale,
            };
            let child = self.spawn_node(Some(root), local);
            self.components.set_name(child, part.name.clone());
            if let Some(material) = part.material {
                self.components
                    .set_renderer(child, MeshRenderer { material });
            }
            if let Some(collider) = part.collider {
                self.components.set_collider(child, collider);
            }
            // After the renderer, so the original material is captured.
            if let Some(highlight) = part.highlight_material {
                self.components.attach_highlighter(child, highlight);
            }
            if let Some(text) = &part.label {
                self.components.set_label(child, text.clone());
            }
        }

        tracing::debug!(id = %root.short(), prefab = %prefab.name, parts = prefab.parts.len(), "instantiated prefab");
        self.event_log.push(SceneEvent::Instantiated {
            id: root,
            prefab: prefab.name.clone(),
            transform,
        });
        root
    }

    fn set_active(&mut self, id: EntityId, active: bool) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if node.active != active {
            node.active = active;
            self.event_log
                .push(SceneEvent::ActiveChanged { id, active });
        }
        true
    }

    fn is_active(&self, id: EntityId) -> bool {
        self.nodes.get(&id).is_some_and(|n| n.active)
    }

    fn position(&self, id: EntityId) -> Option<Vec3> {
        self.world_transform(id).map(|t| t.position)
    }

    fn set_position(&mut self, id: EntityId, position: Vec3) -> bool {
        let local = match self.parent_world(id) {
            Some(parent) => parent.inverse_transform_point(position),
            None => position,
        };
        self.update_local(id, |t| t.position = local)
    }

    fn rotation(&self, id: EntityId) -> Option<Quat> {
        self.world_transform(id).map(|t| t.rotation)
    }

    fn set_rotation(&mut self, id: EntityId, rotation: Quat) -> bool {
        let local = match self.parent_world(id) {
            Some(parent) => parent.rotation.inverse() * rotation,
            None => rotation,
        };
        self.update_local(id, |t| t.rotation = local)
    }

    fn local_scale(&self, id: EntityId) -> Option<Vec3> {
        self.nodes.get(&id).map(|n| n.local.scale)
    }

    fn set_local_scale(&mut self, id: EntityId, scale: Vec3) -> bool {
        self.update_local(id, |t| t.scale = scale)
    }

    fn has_animator(&self, id: EntityId) -> bool {
        self.components.get_animator(id).is_some()
    }

    fn set_animator_trigger(&mut self, id: EntityId, trigger: &str) -> bool {
        self.components.set_trigger(id, trigger)
    }

    fn audio_status(&self, id: EntityId) -> Option<AudioStatus> {
        self.components.get_audio_source(id).map(|s| AudioStatus {
            has_clip: s.clip.is_some(),
            playing: s.playing,
        })
    }

    fn play_audio(&mut self, id: EntityId) -> bool {
        self.components.play_audio(id)
    }

    fn stop_audio(&mut self, id: EntityId) -> bool {
        self.components.stop_audio(id)
    }

    fn has_capability(&self, id: EntityId, capability: Capability) -> bool {
        match capability {
            Capability::Highlight => self.components.get_highlighter(id).is_some(),
            Capability::Label => self.components.get_label(id).is_some(),
        }
    }

    fn set_capability(&mut self, id: EntityId, capability: Capability, active: bool) -> bool {
        match (capability, active) {
            (Capability::Highlight, true) => self.components.highlight(id),
            (Capability::Highlight, false) => self.components.remove_highlight(id),
            (Capability::Label, true) => self.components.show_label(id),
            (Capability::Label, false) => self.components.hide_label(id),
        }
    }

    fn raycast(&self, ray: &Ray) -> Option<RaycastHit> {
        self.components
            .colliders()
            .iter()
            .filter(|(id, _)| self.is_active_in_hierarchy(**id))
            .filter_map(|(id, collider)| self.hit_collider(*id, collider, ray))
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn display_name(&self, id: EntityId) -> String {
        self.components.display_name(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnimatorDef, AudioDef, PartDef};
    use markerspace_ecs::MaterialHandle;

    fn part(name: &str, x: f32, radius: f32) -> PartDef {
        PartDef {
            name: name.into(),
            position: Vec3::new(x, 0.0, 0.0),
            scale: Vec3::ONE,
            collider: Some(Collider::Sphere { radius }),
            material: Some(MaterialHandle(1)),
            highlight_material: Some(MaterialHandle(2)),
            label: Some(name.to_uppercase()),
        }
    }

    fn sample_prefab() -> Prefab {
        Prefab {
            name: "engine".into(),
            scale: Vec3::ONE,
            animator: Some(AnimatorDef {
                triggers: vec!["PlayAnimation".into()],
            }),
            audio: Some(AudioDef {
                clip: Some("hum.ogg".into()),
            }),
            parts: vec![part("left", -1.0, 0.25), part("right", 1.0, 0.25)],
        }
    }

    #[test]
    fn scene_starts_empty() {
        let scene = Scene::new();
        assert_eq!(scene.node_count(), 0);
        assert!(scene.events().is_empty());
    }

    #[test]
    fn instantiate_builds_hierarchy_and_capabilities() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&sample_prefab(), Pose::from_position(Vec3::Y));
        assert_eq!(scene.node_count(), 3);
        assert_eq!(scene.children(root).len(), 2);
        assert_eq!(scene.roots().collect::<Vec<_>>(), vec![root]);
        assert!(scene.has_animator(root));
        assert_eq!(
            scene.audio_status(root),
            Some(AudioStatus {
                has_clip: true,
                playing: false
            })
        );

        let left = scene.find_child(root, "left").unwrap();
        assert!(scene.has_capability(left, Capability::Highlight));
        assert!(scene.has_capability(left, Capability::Label));
        assert_eq!(scene.position(left), Some(Vec3::new(-1.0, 1.0, 0.0)));
        assert!(matches!(
            scene.events(),
            [SceneEvent::Instantiated { .. }]
        ));
    }

    #[test]
    fn children_follow_parent_rotation() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&sample_prefab(), Pose::default());
        let right = scene.find_child(root, "right").unwrap();
        scene.set_rotation(root, Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let p = scene.position(right).unwrap();
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn set_world_position_on_child_converts_to_local() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&sample_prefab(), Pose::from_position(Vec3::X));
        let left = scene.find_child(root, "left").unwrap();
        assert!(scene.set_position(left, Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(scene.get(left).unwrap().local.position, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(scene.position(left), Some(Vec3::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn set_active_logs_only_changes() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&Prefab::named("bare"), Pose::default());
        scene.drain_events();
        assert!(scene.set_active(root, true));
        assert!(scene.events().is_empty());
        assert!(scene.set_active(root, false));
        assert!(!scene.is_active(root));
        assert_eq!(scene.events().len(), 1);
        assert!(!scene.set_active(EntityId::new(), true));
    }

    #[test]
    fn inactive_parent_hides_children() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&sample_prefab(), Pose::default());
        let left = scene.find_child(root, "left").unwrap();
        assert!(scene.is_active_in_hierarchy(left));
        scene.set_active(root, false);
        assert!(scene.is_active(left));
        assert!(!scene.is_active_in_hierarchy(left));
    }

    #[test]
    fn raycast_returns_nearest_active_collider() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&sample_prefab(), Pose::default());
        let right = scene.find_child(root, "right").unwrap();
        let left = scene.find_child(root, "left").unwrap();

        // Along +X from far left: left part is nearer.
        let ray = Ray::new(Vec3::new(-10.0, 0.0, 0.0), Vec3::X).unwrap();
        let hit = scene.raycast(&ray).unwrap();
        assert_eq!(hit.entity, left);
        assert!((hit.distance - 8.75).abs() < 1e-4);

        scene.set_active(left, false);
        assert_eq!(scene.raycast(&ray).unwrap().entity, right);

        scene.set_active(root, false);
        assert!(scene.raycast(&ray).is_none());
    }

    #[test]
    fn raycast_box_respects_rotation() {
        let mut scene = Scene::new();
        let node = scene.spawn_node(
            None,
            Transform {
                rotation: Quat::from_rotation_z(std::f32::consts::FRAC_PI_4),
                ..Transform::default()
            },
        );
        scene.components_mut().set_collider(
            node,
            Collider::Box {
                half_extents: [1.0, 0.1, 1.0],
            },
        );
        // A flat slab tilted 45 degrees is hit well above y = 0.1, where an
        // axis-aligned test would report the hit.
        let ray = Ray::new(Vec3::new(0.6, 5.0, 0.0), Vec3::NEG_Y).unwrap();
        let hit = scene.raycast(&ray).unwrap();
        assert_eq!(hit.entity, node);
        assert!(hit.point.y > 0.1);
    }

    #[test]
    fn capability_toggle_through_trait() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&sample_prefab(), Pose::default());
        let left = scene.find_child(root, "left").unwrap();

        assert!(scene.set_capability(left, Capability::Highlight, true));
        assert_eq!(
            scene.components().get_renderer(left).unwrap().material,
            MaterialHandle(2)
        );
        assert!(scene.set_capability(left, Capability::Label, true));
        assert!(scene.components().is_label_visible(left));
        assert!(!scene.set_capability(root, Capability::Label, true));
    }

    #[test]
    fn local_scale_round_trip() {
        let mut scene = Scene::new();
        let root = scene.instantiate(&Prefab::named("bare"), Pose::default());
        assert!(scene.set_local_scale(root, Vec3::splat(2.0)));
        assert_eq!(scene.local_scale(root), Some(Vec3::splat(2.0)));
        assert!(scene.local_scale(EntityId::new()).is_none());
    }
}
