use glam::Vec3;
use markerspace_ecs::{Collider, MaterialHandle};
use serde::{Deserialize, Serialize};

/// Template for one carousel variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    pub name: String,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub animator: Option<AnimatorDef>,
    #[serde(default)]
    pub audio: Option<AudioDef>,
    #[serde(default)]
    pub parts: Vec<PartDef>,
}

impl Prefab {
    /// Bare prefab with no parts or attached capabilities.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: Vec3::ONE,
            animator: None,
            audio: None,
            parts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimatorDef {
    #[serde(default)]
    pub triggers: Vec<String>,
}

/// Audio source; a source may exist without a clip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioDef {
    #[serde(default)]
    pub clip: Option<String>,
}

/// A child part of a variant, positioned in the variant's local space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDef {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub collider: Option<Collider>,
    #[serde(default)]
    pub material: Option<MaterialHandle>,
    #[serde(default)]
    pub highlight_material: Option<MaterialHandle>,
    #[serde(default)]
    pub label: Option<String>,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefab_from_yaml_uses_defaults() {
        let yaml = r#"
name: engine
animator:
  triggers: [PlayAnimation]
parts:
  - name: piston
    position: [0.0, 0.1, 0.0]
    collider: { shape: sphere, radius: 0.05 }
    material: 1
    highlight_material: 2
    label: Piston
"#;
        let prefab: Prefab = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(prefab.scale, Vec3::ONE);
        assert!(prefab.audio.is_none());
        assert_eq!(prefab.parts.len(), 1);
        let part = &prefab.parts[0];
        assert_eq!(part.collider, Some(Collider::Sphere { radius: 0.05 }));
        assert_eq!(part.highlight_material, Some(MaterialHandle(2)));
        assert_eq!(part.scale, Vec3::ONE);
    }
}
