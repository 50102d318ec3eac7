use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug dumps.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Position and orientation without scale, as reported by a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Quat::IDENTITY)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Transform placed at a pose with unit scale.
    pub fn from_pose(pose: Pose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.rotation,
            scale: Vec3::ONE,
        }
    }

    /// Compose a child transform expressed in this transform's space.
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            rotation: self.rotation * child.rotation,
            scale: self.scale * child.scale,
        }
    }

    /// Map a point from local space into the space this transform lives in.
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (self.scale * point)
    }

    /// Map a point into local space. Zero scale components collapse to zero.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        let local = self.rotation.inverse() * (point - self.position);
        Vec3::new(
            safe_div(local.x, self.scale.x),
            safe_div(local.y, self.scale.y),
            safe_div(local.z, self.scale.z),
        )
    }
}

fn safe_div(value: f32, by: f32) -> f32 {
    if by == 0.0 { 0.0 } else { value / by }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn entity_id_short_is_eight_chars() {
        assert_eq!(EntityId::new().short().len(), 8);
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn mul_transform_applies_parent_rotation_and_scale() {
        let parent = Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            scale: Vec3::splat(2.0),
        };
        let child = Transform {
            position: Vec3::new(1.0, 0.0, 0.0),
            ..Transform::default()
        };
        let world = parent.mul_transform(&child);
        // +X rotated a quarter turn about Y lands on -Z.
        assert!((world.position - Vec3::new(1.0, 0.0, -2.0)).length() < 1e-5);
        assert_eq!(world.scale, Vec3::splat(2.0));
    }

    #[test]
    fn inverse_transform_point_round_trips() {
        let t = Transform {
            position: Vec3::new(0.5, -1.0, 3.0),
            rotation: Quat::from_rotation_x(0.7),
            scale: Vec3::new(1.0, 2.0, 4.0),
        };
        let p = Vec3::new(0.25, 0.5, -0.75);
        let back = t.inverse_transform_point(t.transform_point(p));
        assert!((back - p).length() < 1e-5);
    }
}
