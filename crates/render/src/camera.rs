use glam::{Mat4, Quat, Vec2, Vec3};
use markerspace_common::Ray;
use serde::{Deserialize, Serialize};

/// The device camera the AR session renders through.
///
/// Camera motion comes from the tracker; this type only projects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArCamera {
    pub position: Vec3,
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov: f32,
    /// Viewport size in pixels.
    pub viewport: Vec2,
    pub near: f32,
    pub far: f32,
}

impl Default for ArCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov: 60.0_f32.to_radians(),
            viewport: Vec2::new(1080.0, 1920.0),
            near: 0.01,
            far: 100.0,
        }
    }
}

impl ArCamera {
    /// Place the camera at `eye` looking toward `target` with +Y up.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        Self {
            position: eye,
            rotation,
            ..Self::default()
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    /// Looks down -Z in camera space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the near plane through a screen point.
    pub fn screen_point_to_ray(&self, point: Vec2) -> Option<Ray> {
        if self.viewport.x <= 0.0 || self.viewport.y <= 0.0 {
            return None;
        }
        let ndc = point / self.viewport * 2.0 - Vec2::ONE;
        let inverse = self.view_projection().inverse();
        // perspective_rh maps depth to [0, 1].
        let near = inverse.project_point3(ndc.extend(0.0));
        let far = inverse.project_point3(ndc.extend(1.0));
        Ray::new(near, far - near)
    }

    /// Pixel position of a world point, `None` when behind the camera.
    pub fn world_to_screen(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some((ndc.truncate() + Vec2::ONE) * 0.5 * self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_matrices_are_finite() {
        let cam = ArCamera::default();
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }

    #[test]
    fn center_ray_points_forward() {
        let cam = ArCamera::default();
        let ray = cam.screen_point_to_ray(cam.viewport * 0.5).unwrap();
        assert!((ray.direction - Vec3::NEG_Z).length() < 1e-4);
        assert!((ray.origin.z + cam.near).abs() < 1e-4);
    }

    #[test]
    fn right_edge_ray_leans_right() {
        let cam = ArCamera::default();
        let ray = cam
            .screen_point_to_ray(Vec2::new(cam.viewport.x, cam.viewport.y * 0.5))
            .unwrap();
        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.y.abs() < 1e-4);
    }

    #[test]
    fn looking_at_faces_target() {
        let cam = ArCamera::looking_at(Vec3::new(0.0, 1.0, 1.0), Vec3::ZERO);
        let expected = Vec3::new(0.0, -1.0, -1.0).normalize();
        assert!((cam.forward() - expected).length() < 1e-4);
    }

    #[test]
    fn world_to_screen_inverts_ray() {
        let cam = ArCamera::looking_at(Vec3::new(0.0, 0.3, 0.5), Vec3::ZERO);
        let screen = cam.world_to_screen(Vec3::new(0.05, 0.0, 0.0)).unwrap();
        let ray = cam.screen_point_to_ray(screen).unwrap();
        // The ray passes through the projected point.
        let to_point = Vec3::new(0.05, 0.0, 0.0) - ray.origin;
        let off_axis = to_point - ray.direction * to_point.dot(ray.direction);
        assert!(off_axis.length() < 1e-3);
    }

    #[test]
    fn empty_viewport_has_no_ray() {
        let cam = ArCamera {
            viewport: Vec2::ZERO,
            ..ArCamera::default()
        };
        assert!(cam.screen_point_to_ray(Vec2::ZERO).is_none());
    }
}
