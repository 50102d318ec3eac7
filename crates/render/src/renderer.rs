use std::fmt::Write;

use markerspace_common::EntityId;
use markerspace_scene::{Scene, SceneGraph};

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads scene state and produces output. It never mutates the
/// scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Produces a human-readable dump of the scene: one line per root, one
/// indented line per part.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Include inactive roots (marked with `-`).
    pub show_inactive: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self {
            show_inactive: true,
        }
    }

    fn render_root(&self, scene: &Scene, id: EntityId, out: &mut String) {
        let Some(node) = scene.get(id) else {
            return;
        };
        let marker = if node.active { '+' } else { '-' };
        let p = node.local.position;
        let s = node.local.scale;
        let (yaw, pitch, roll) = node.local.rotation.to_euler(glam::EulerRot::YXZ);
        let _ = writeln!(
            out,
            "{marker} {} pos=({:.3}, {:.3}, {:.3}) ypr=({:.1}, {:.1}, {:.1}) scale=({:.2}, {:.2}, {:.2})",
            scene.display_name(id),
            p.x,
            p.y,
            p.z,
            yaw.to_degrees(),
            pitch.to_degrees(),
            roll.to_degrees(),
            s.x,
            s.y,
            s.z,
        );
        let components = scene.components();
        for child in scene.children(id) {
            let mut line = format!("    {}", scene.display_name(*child));
            if let Some(renderer) = components.get_renderer(*child) {
                let _ = write!(line, " material={}", renderer.material.0);
            }
            if components.is_highlighted(*child) {
                line.push_str(" [highlighted]");
            }
            if let Some(label) = components.get_label(*child) {
                if label.visible {
                    let _ = write!(line, " label=\"{}\"", label.text);
                }
            }
            let _ = writeln!(out, "{line}");
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let roots: Vec<EntityId> = scene.roots().collect();
        let active = roots.iter().filter(|id| scene.is_active(**id)).count();
        let _ = writeln!(
            out,
            "=== Scene (roots={}, active={}) ===",
            roots.len(),
            active
        );
        for id in roots {
            if self.show_inactive || scene.is_active(id) {
                self.render_root(scene, id, &mut out);
            }
        }
        out
    }
}
