//! Per-node capability storage.
//!
//! Components are stored in BTreeMap for deterministic iteration order.
//! Each component type has its own storage keyed by EntityId.
//!
//! # Invariants
//! - Every observable state change (material swap, label toggle, trigger,
//!   audio start/stop) produces an event.
//! - A capability never looks at other entities; exclusivity across entities
//!   is the caller's concern.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use markerspace_common::EntityId;

/// A handle referencing a material asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialHandle(pub u64);

/// Human-readable name component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// Mesh renderer: the material currently used to draw the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshRenderer {
    pub material: MaterialHandle,
}

/// Hit-test volume, expressed in the node's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Collider {
    Box { half_extents: [f32; 3] },
    Sphere { radius: f32 },
}

impl Default for Collider {
    fn default() -> Self {
        Self::Box {
            half_extents: [0.5, 0.5, 0.5],
        }
    }
}

/// Swaps the renderer's material while highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlighter {
    pub highlight_material: MaterialHandle,
    /// Renderer material captured when the highlighter was attached.
    pub original_material: Option<MaterialHandle>,
    pub active: bool,
}

/// A floating text label attached to a part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub visible: bool,
}

/// Animation state machine stand-in: records fired triggers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animator {
    /// Trigger parameters the controller declares.
    pub triggers: Vec<String>,
    /// Every trigger fired so far, in order.
    pub fired: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioSource {
    pub clip: Option<String>,
    pub playing: bool,
}

/// Events produced by capability changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentEvent {
    MaterialChanged {
        entity: EntityId,
        old: MaterialHandle,
        new: MaterialHandle,
    },
    LabelShown { entity: EntityId },
    LabelHidden { entity: EntityId },
    TriggerFired { entity: EntityId, trigger: String },
    AudioStarted { entity: EntityId, clip: String },
    AudioStopped { entity: EntityId },
}

/// Deterministic component storage for all capability types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentStore {
    names: BTreeMap<EntityId, Name>,
    renderers: BTreeMap<EntityId, MeshRenderer>,
    colliders: BTreeMap<EntityId, Collider>,
    highlighters: BTreeMap<EntityId, Highlighter>,
    labels: BTreeMap<EntityId, Label>,
    animators: BTreeMap<EntityId, Animator>,
    audio_sources: BTreeMap<EntityId, AudioSource>,
    #[serde(skip)]
    events: Vec<ComponentEvent>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return all pending component events.
    pub fn drain_events(&mut self) -> Vec<ComponentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[ComponentEvent] {
        &self.events
    }

    // --- Name ---
    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        self.names.insert(entity, Name(name.into()));
    }

    pub fn get_name(&self, entity: EntityId) -> Option<&Name> {
        self.names.get(&entity)
    }

    /// Name for log lines, falling back to the short id.
    pub fn display_name(&self, entity: EntityId) -> String {
        self.names
            .get(&entity)
            .map(|n| n.0.clone())
            .unwrap_or_else(|| entity.short())
    }

    // --- MeshRenderer ---
    pub fn set_renderer(&mut self, entity: EntityId, renderer: MeshRenderer) {
        self.renderers.insert(entity, renderer);
    }

    pub fn get_renderer(&self, entity: EntityId) -> Option<&MeshRenderer> {
        self.renderers.get(&entity)
    }

    fn swap_material(&mut self, entity: EntityId, new: MaterialHandle) -> bool {
        let Some(renderer) = self.renderers.get_mut(&entity) else {
            return false;
        };
        let old = renderer.material;
        if old != new {
            renderer.material = new;
            self.events
                .push(ComponentEvent::MaterialChanged { entity, old, new });
        }
        true
    }

    // --- Collider ---
    pub fn set_collider(&mut self, entity: EntityId, collider: Collider) {
        self.colliders.insert(entity, collider);
    }

    pub fn colliders(&self) -> &BTreeMap<EntityId, Collider> {
        &self.colliders
    }

    // --- Highlighter ---

    /// Attach a highlighter, caching the renderer's current material as the
    /// one to restore.
    pub fn attach_highlighter(&mut self, entity: EntityId, highlight_material: MaterialHandle) {
        let original_material = self.renderers.get(&entity).map(|r| r.material);
        self.highlighters.insert(
            entity,
            Highlighter {
                highlight_material,
                original_material,
                active: false,
            },
        );
    }

    pub fn get_highlighter(&self, entity: EntityId) -> Option<&Highlighter> {
        self.highlighters.get(&entity)
    }

    pub fn is_highlighted(&self, entity: EntityId) -> bool {
        self.highlighters.get(&entity).is_some_and(|h| h.active)
    }

    /// Swap in the highlight material. Returns false if the entity has no
    /// highlighter.
    pub fn highlight(&mut self, entity: EntityId) -> bool {
        let Some(h) = self.highlighters.get_mut(&entity) else {
            return false;
        };
        h.active = true;
        let material = h.highlight_material;
        if !self.swap_material(entity, material) {
            tracing::warn!(entity = %entity.short(), "highlight without a renderer, material unchanged");
        }
        true
    }

    /// Restore the cached original material. Returns false if the entity has
    /// no highlighter.
    pub fn remove_highlight(&mut self, entity: EntityId) -> bool {
        let Some(h) = self.highlighters.get_mut(&entity) else {
            return false;
        };
        h.active = false;
        match h.original_material {
            Some(original) => {
                if !self.swap_material(entity, original) {
                    tracing::warn!(entity = %entity.short(), "highlight removal without a renderer");
                }
            }
            None => {
                tracing::warn!(entity = %entity.short(), "no original material cached, nothing to restore");
            }
        }
        true
    }

    // --- Label ---
    pub fn set_label(&mut self, entity: EntityId, text: impl Into<String>) {
        self.labels.insert(
            entity,
            Label {
                text: text.into(),
                visible: false,
            },
        );
    }

    pub fn get_label(&self, entity: EntityId) -> Option<&Label> {
        self.labels.get(&entity)
    }

    pub fn is_label_visible(&self, entity: EntityId) -> bool {
        self.labels.get(&entity).is_some_and(|l| l.visible)
    }

    pub fn show_label(&mut self, entity: EntityId) -> bool {
        self.set_label_visible(entity, true)
    }

    pub fn hide_label(&mut self, entity: EntityId) -> bool {
        self.set_label_visible(entity, false)
    }

    fn set_label_visible(&mut self, entity: EntityId, visible: bool) -> bool {
        let Some(label) = self.labels.get_mut(&entity) else {
            return false;
        };
        if label.visible != visible {
            label.visible = visible;
            self.events.push(if visible {
                ComponentEvent::LabelShown { entity }
            } else {
                ComponentEvent::LabelHidden { entity }
            });
        }
        true
    }

    // --- Animator ---
    pub fn set_animator(&mut self, entity: EntityId, animator: Animator) {
        self.animators.insert(entity, animator);
    }

    pub fn get_animator(&self, entity: EntityId) -> Option<&Animator> {
        self.animators.get(&entity)
    }

    /// Fire a named trigger. Returns false if the entity has no animator.
    pub fn set_trigger(&mut self, entity: EntityId, trigger: &str) -> bool {
        let Some(animator) = self.animators.get_mut(&entity) else {
            return false;
        };
        if !animator.triggers.iter().any(|t| t == trigger) {
            tracing::warn!(entity = %entity.short(), trigger, "animator has no such trigger parameter");
        }
        animator.fired.push(trigger.to_string());
        self.events.push(ComponentEvent::TriggerFired {
            entity,
            trigger: trigger.to_string(),
        });
        true
    }

    // --- AudioSource ---
    pub fn set_audio_source(&mut self, entity: EntityId, source: AudioSource) {
        self.audio_sources.insert(entity, source);
    }

    pub fn get_audio_source(&self, entity: EntityId) -> Option<&AudioSource> {
        self.audio_sources.get(&entity)
    }

    /// Start playback. Returns false when there is no source or no clip.
    pub fn play_audio(&mut self, entity: EntityId) -> bool {
        let Some(source) = self.audio_sources.get_mut(&entity) else {
            return false;
        };
        let Some(clip) = source.clip.clone() else {
            return false;
        };
        source.playing = true;
        self.events.push(ComponentEvent::AudioStarted { entity, clip });
        true
    }

    /// Stop playback. Returns false when nothing was playing.
    pub fn stop_audio(&mut self, entity: EntityId) -> bool {
        match self.audio_sources.get_mut(&entity) {
            Some(source) if source.playing => {
                source.playing = false;
                self.events.push(ComponentEvent::AudioStopped { entity });
                true
            }
            _ => false,
        }
    }
}

pub fn crate_info() -> &'static str {
    "markerspace-ecs v0.1.0"
}
