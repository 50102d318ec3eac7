use std::collections::BTreeMap;

use glam::{Vec2, Vec3};
use markerspace_common::{EntityId, Pose};
use markerspace_input::{
    Action, AnchorId, TouchFrame, TouchPhase, TrackedImage, TrackedImagesChanged, TrackingState,
};
use markerspace_render::ArCamera;
use markerspace_scene::{Capability, SceneGraph};

use crate::{
    CarouselConfig, FloatingMotion, PinchTracker, SelectionManager, drag_rotation,
    smoothing_factor,
};

/// Receives the new active index after every advance.
pub trait IndexListener {
    fn on_index_changed(&mut self, index: usize);
}

impl<F: FnMut(usize)> IndexListener for F {
    fn on_index_changed(&mut self, index: usize) {
        self(index)
    }
}

/// Everything the controller reads from the host for one frame.
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Absolute clock in seconds; drives the floating motion.
    pub time: f64,
    /// Seconds since the previous frame; drives rotation smoothing.
    pub delta_time: f32,
    pub touches: TouchFrame,
    pub camera: ArCamera,
}

impl FrameInput {
    /// A frame with no touches.
    pub fn idle(time: f64, delta_time: f32) -> Self {
        Self {
            time,
            delta_time,
            ..Self::default()
        }
    }

    pub fn with_touches(mut self, touches: TouchFrame) -> Self {
        self.touches = touches;
        self
    }

    pub fn with_camera(mut self, camera: ArCamera) -> Self {
        self.camera = camera;
        self
    }
}

/// One spawned carousel entry.
#[derive(Debug, Clone)]
pub struct Variant {
    entity: EntityId,
    initial_position: Vec3,
    rotation_offset: glam::Quat,
    anchor: Option<AnchorId>,
    floating: Option<FloatingMotion>,
}

impl Variant {
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// World position captured at spawn; restored whenever the carousel
    /// moves away from this variant.
    pub fn initial_position(&self) -> Vec3 {
        self.initial_position
    }

    /// Accumulated manual rotation on top of the anchor rotation.
    pub fn rotation_offset(&self) -> glam::Quat {
        self.rotation_offset
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        self.anchor
    }

    pub fn is_floating(&self) -> bool {
        self.floating.is_some()
    }
}

/// Cycles a fixed list of prefab variants anchored to one tracked image.
///
/// Variant 0 is the primary variant: it is driven by an animator trigger and
/// only yaws under drag, while every other variant floats and can also roll.
///
/// Variants are spawned on the first detection only. A later detection of
/// the same image (after the marker was lost) does not respawn anything; it
/// moves the variants onto the new anchor and shows the current variant
/// again. This goes beyond plain first-detection handling, which would leave
/// everything hidden until the next advance.
pub struct CarouselController {
    config: CarouselConfig,
    variants: Vec<Variant>,
    current_index: usize,
    /// Latest pose of each live anchor of the configured image; dropped when
    /// the tracker removes the anchor.
    anchors: BTreeMap<AnchorId, Pose>,
    pinch: PinchTracker,
    selection: SelectionManager,
    listener: Option<Box<dyn IndexListener>>,
    primary_has_animator: bool,
    time: f64,
}

impl CarouselController {
    pub fn new(config: CarouselConfig) -> Self {
        Self {
            config,
            variants: Vec::new(),
            current_index: 0,
            anchors: BTreeMap::new(),
            pinch: PinchTracker::new(),
            selection: SelectionManager::new(),
            listener: None,
            primary_has_animator: false,
            time: 0.0,
        }
    }

    pub fn set_listener(&mut self, listener: impl IndexListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_spawned(&self) -> bool {
        !self.variants.is_empty()
    }

    pub fn active_entity(&self) -> Option<EntityId> {
        self.variants.get(self.current_index).map(|v| v.entity)
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn anchor_pose(&self, id: AnchorId) -> Option<Pose> {
        self.anchors.get(&id).copied()
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_pinching()
    }

    // --- Tracking lifecycle ---

    /// Apply one tracker batch: added, then updated, then removed.
    pub fn on_tracked_images_changed<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        changes: &TrackedImagesChanged,
    ) {
        for image in &changes.added {
            self.on_image_added(scene, image);
        }
        for image in &changes.updated {
            if !self.matches(image) {
                continue;
            }
            self.anchors.insert(image.id, image.pose);
            if image.tracking_state == TrackingState::Tracking {
                self.on_image_tracked(scene, image);
            }
        }
        for image in &changes.removed {
            self.on_image_removed(scene, image);
        }
    }

    fn matches(&self, image: &TrackedImage) -> bool {
        image.reference_image == self.config.reference_image
    }

    fn on_image_added<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, image: &TrackedImage) {
        if !self.matches(image) {
            tracing::debug!(reference_image = %image.reference_image, "ignoring unrelated image");
            return;
        }
        self.anchors.insert(image.id, image.pose);

        if self.is_spawned() {
            self.reacquire(scene, image.id);
            return;
        }
        if self.config.prefabs.is_empty() {
            tracing::warn!("marker detected but no prefabs are configured");
            return;
        }

        for prefab in &self.config.prefabs {
            let entity = scene.instantiate(prefab, image.pose);
            scene.set_active(entity, false);
            let initial_position = scene.position(entity).unwrap_or(image.pose.position);
            self.variants.push(Variant {
                entity,
                initial_position,
                rotation_offset: glam::Quat::IDENTITY,
                anchor: Some(image.id),
                floating: None,
            });
        }

        let primary = self.variants[0].entity;
        scene.set_active(primary, true);
        self.primary_has_animator = scene.has_animator(primary);
        tracing::info!(
            count = self.variants.len(),
            reference_image = %image.reference_image,
            primary_animator = self.primary_has_animator,
            "spawned carousel variants"
        );
    }

    /// The marker came back after being lost: follow the new anchor and show
    /// the current variant again.
    fn reacquire<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, anchor: AnchorId) {
        for variant in &mut self.variants {
            variant.anchor = Some(anchor);
        }
        let index = self.current_index;
        let entity = self.variants[index].entity;
        scene.set_active(entity, true);
        if index != 0 {
            self.start_floating(scene, index);
        }
        tracing::info!(index, anchor = anchor.0, "marker reacquired");
    }

    fn on_image_tracked<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, image: &TrackedImage) {
        let Some(variant) = self.variants.get(self.current_index) else {
            return;
        };
        let position = image.pose.position + Vec3::Y * self.config.tracking_offset;
        let rotation = image.pose.rotation * variant.rotation_offset;
        scene.set_position(variant.entity, position);
        scene.set_rotation(variant.entity, rotation);
        tracing::trace!(index = self.current_index, ?position, "variant follows marker");
    }

    fn on_image_removed<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, image: &TrackedImage) {
        if !self.matches(image) {
            return;
        }
        self.anchors.remove(&image.id);
        for index in 0..self.variants.len() {
            scene.set_active(self.variants[index].entity, false);
            self.stop_floating(index);
        }
        tracing::info!(reference_image = %image.reference_image, "marker lost, variants hidden");
    }

    // --- Carousel ---

    pub fn apply_action<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, action: Action) {
        if let Some(forward) = action.direction() {
            self.advance(scene, forward);
        }
    }

    /// Switch to the next (`forward`) or previous variant.
    pub fn advance<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, forward: bool) {
        let count = self.variants.len();
        if count == 0 {
            tracing::debug!("advance ignored, nothing spawned");
            return;
        }

        let previous = self.variants[self.current_index].clone();
        scene.set_active(previous.entity, false);
        self.stop_floating(self.current_index);
        if scene.audio_status(previous.entity).is_some_and(|a| a.playing) {
            scene.stop_audio(previous.entity);
            tracing::info!(variant = %scene.display_name(previous.entity), "stopped audio");
        }
        scene.set_position(previous.entity, previous.initial_position);

        self.current_index = if forward {
            (self.current_index + 1) % count
        } else {
            (self.current_index + count - 1) % count
        };
        let index = self.current_index;
        let next = self.variants[index].entity;

        if index == 0 {
            self.show_primary(scene);
        } else {
            scene.set_active(next, true);
            scene.set_position(next, self.variants[index].initial_position);
            self.start_floating(scene, index);
        }

        match self.listener.as_mut() {
            Some(listener) => {
                tracing::debug!(index, "notifying index listener");
                listener.on_index_changed(index);
            }
            None => tracing::warn!(index, "no index listener registered"),
        }

        if scene.audio_status(next).is_some_and(|a| a.has_clip) {
            scene.play_audio(next);
            tracing::info!(variant = %scene.display_name(next), "playing audio");
        } else {
            tracing::warn!(variant = %scene.display_name(next), "no audio source or clip");
        }

        tracing::info!(index, forward, variant = %scene.display_name(next), "advanced carousel");
    }

    fn show_primary<S: SceneGraph + ?Sized>(&self, scene: &mut S) {
        let primary = &self.variants[0];
        scene.set_active(primary.entity, true);
        scene.set_position(primary.entity, primary.initial_position);
        if self.primary_has_animator {
            scene.set_animator_trigger(primary.entity, &self.config.primary_trigger);
        } else {
            tracing::warn!(
                variant = %scene.display_name(primary.entity),
                "primary variant has no animator"
            );
        }
    }

    // --- Floating ---

    /// No-op when the variant is already floating. Applies the first sample
    /// immediately.
    fn start_floating<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, index: usize) {
        let time = self.time;
        let config = self.config.floating;
        let Some(variant) = self.variants.get_mut(index) else {
            return;
        };
        if variant.floating.is_some() {
            return;
        }
        let motion = FloatingMotion::new(variant.initial_position);
        scene.set_position(variant.entity, motion.sample(time, &config));
        variant.floating = Some(motion);
        tracing::trace!(index, "floating started");
    }

    fn stop_floating(&mut self, index: usize) {
        if let Some(variant) = self.variants.get_mut(index) {
            if variant.floating.take().is_some() {
                tracing::trace!(index, "floating stopped");
            }
        }
    }

    fn tick_floating<S: SceneGraph + ?Sized>(&self, scene: &mut S) {
        for variant in &self.variants {
            if let Some(motion) = variant.floating {
                scene.set_position(variant.entity, motion.sample(self.time, &self.config.floating));
            }
        }
    }

    // --- Frame ---

    /// Run one frame: interpret touches, then advance floating motion.
    pub fn step<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, frame: &FrameInput) {
        let _span = tracing::info_span!("carousel_step", time = frame.time).entered();
        self.time = frame.time;
        self.handle_touches(scene, frame);
        self.tick_floating(scene);
    }

    fn handle_touches<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, frame: &FrameInput) {
        let Some(active) = self.active_entity() else {
            return;
        };
        let touches = frame.touches.touches();
        match touches {
            [touch] => {
                self.pinch.reset();
                match touch.phase {
                    TouchPhase::Began => self.select_at(scene, &frame.camera, touch.position),
                    TouchPhase::Moved => {
                        self.rotate_active(scene, active, touch.delta, frame.delta_time)
                    }
                    _ => {}
                }
            }
            [first, second] => {
                if first.phase == TouchPhase::Moved || second.phase == TouchPhase::Moved {
                    let distance = first.position.distance(second.position);
                    let Some(current) = scene.local_scale(active) else {
                        return;
                    };
                    if let Some(scale) = self.pinch.scale_for(distance, current) {
                        scene.set_local_scale(active, scale);
                    }
                }
            }
            _ => self.pinch.reset(),
        }
    }

    fn select_at<S: SceneGraph + ?Sized>(&mut self, scene: &mut S, camera: &ArCamera, point: Vec2) {
        let Some(ray) = camera.screen_point_to_ray(point) else {
            return;
        };
        let Some(hit) = scene.raycast(&ray) else {
            tracing::trace!(?point, "tap hit nothing");
            return;
        };
        for capability in [Capability::Highlight, Capability::Label] {
            if scene.has_capability(hit.entity, capability) {
                self.selection.select(scene, capability, hit.entity);
            }
        }
    }

    fn rotate_active<S: SceneGraph + ?Sized>(
        &mut self,
        scene: &mut S,
        active: EntityId,
        delta: Vec2,
        delta_time: f32,
    ) {
        let index = self.current_index;
        let Some(current) = scene.rotation(active) else {
            return;
        };
        let anchor_rotation = self.variants[index]
            .anchor
            .and_then(|id| self.anchors.get(&id))
            .map(|pose| pose.rotation);

        let delta_rotation = drag_rotation(delta, index == 0, self.config.rotation_sensitivity);
        let variant = &mut self.variants[index];
        variant.rotation_offset = (variant.rotation_offset * delta_rotation).normalize();

        let target = anchor_rotation.map_or(current, |r| r * variant.rotation_offset);
        let t = smoothing_factor(delta_time, self.config.rotation_smoothing);
        scene.set_rotation(active, current.slerp(target, t));
    }
}
