//! Touch gesture math: drag-to-rotate and pinch-to-scale.

use glam::{Quat, Vec2, Vec3};

/// Pinch distances shorter than this never become a baseline.
const MIN_PINCH_DISTANCE: f32 = 1e-3;

/// Rotation delta for one frame of single-finger drag.
///
/// `yaw_only` restricts the gesture to turning about Y; otherwise the
/// dominant axis wins: horizontal drags yaw, vertical (or equal) drags roll.
/// `sensitivity` is degrees per pixel.
pub fn drag_rotation(delta: Vec2, yaw_only: bool, sensitivity: f32) -> Quat {
    if yaw_only || delta.x.abs() > delta.y.abs() {
        Quat::from_rotation_y((-delta.x * sensitivity).to_radians())
    } else {
        Quat::from_rotation_z((-delta.y * sensitivity).to_radians())
    }
}

/// Interpolation factor toward the drag target for a frame of `delta_time`.
pub fn smoothing_factor(delta_time: f32, rate: f32) -> f32 {
    (delta_time * rate).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PinchBaseline {
    distance: f32,
    scale: Vec3,
}

/// Two-finger pinch state: the distance and scale captured on the first
/// pinch frame.
#[derive(Debug, Clone, Default)]
pub struct PinchTracker {
    baseline: Option<PinchBaseline>,
}

impl PinchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pinching(&self) -> bool {
        self.baseline.is_some()
    }

    /// Forget the baseline; the next pinch frame re-captures it.
    pub fn reset(&mut self) {
        self.baseline = None;
    }

    /// Ratio of `distance` to the baseline distance, capturing the baseline
    /// (and returning 1.0) when none is recorded.
    pub fn factor(&mut self, distance: f32, current_scale: Vec3) -> Option<f32> {
        let baseline = match self.baseline {
            Some(b) => b,
            None => {
                if distance < MIN_PINCH_DISTANCE {
                    return None;
                }
                let b = PinchBaseline {
                    distance,
                    scale: current_scale,
                };
                self.baseline = Some(b);
                b
            }
        };
        Some(distance / baseline.distance)
    }

    /// Scale to apply for the current pinch distance.
    pub fn scale_for(&mut self, distance: f32, current_scale: Vec3) -> Option<Vec3> {
        let factor = self.factor(distance, current_scale)?;
        self.baseline.map(|b| b.scale * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Same rotation up to sign, within f32 noise.
    fn quat_close(a: Quat, b: Quat) -> bool {
        a.dot(b).abs() > 1.0 - 1e-6
    }

    fn yaw_of(q: Quat) -> f32 {
        q.to_euler(glam::EulerRot::YXZ).0.to_degrees()
    }

    #[test]
    fn horizontal_drag_yaws_negatively() {
        let q = drag_rotation(Vec2::new(10.0, 2.0), false, 0.1);
        assert!((yaw_of(q) + 1.0).abs() < 1e-4);
    }

    #[test]
    fn vertical_drag_rolls() {
        let q = drag_rotation(Vec2::new(1.0, 20.0), false, 0.1);
        let expected = Quat::from_rotation_z((-2.0_f32).to_radians());
        assert!(quat_close(q, expected));
    }

    #[test]
    fn equal_components_roll() {
        let q = drag_rotation(Vec2::new(5.0, 5.0), false, 0.1);
        let expected = Quat::from_rotation_z((-0.5_f32).to_radians());
        assert!(quat_close(q, expected));
    }

    #[test]
    fn yaw_only_ignores_vertical() {
        let q = drag_rotation(Vec2::new(3.0, 50.0), true, 0.1);
        let expected = Quat::from_rotation_y((-0.3_f32).to_radians());
        assert!(quat_close(q, expected));
    }

    #[test]
    fn yaw_deltas_compose_to_combined_yaw() {
        let a = drag_rotation(Vec2::new(12.0, 0.0), true, 0.1);
        let b = drag_rotation(Vec2::new(30.0, 0.0), true, 0.1);
        let combined = drag_rotation(Vec2::new(42.0, 0.0), true, 0.1);
        let offset = Quat::IDENTITY * a * b;
        assert!(quat_close(offset, combined));
    }

    #[test]
    fn smoothing_factor_is_clamped() {
        assert!((smoothing_factor(0.016, 10.0) - 0.16).abs() < 1e-6);
        assert_eq!(smoothing_factor(0.5, 10.0), 1.0);
        assert_eq!(smoothing_factor(-1.0, 10.0), 0.0);
    }

    #[test]
    fn pinch_factor_is_one_on_first_frame() {
        let mut pinch = PinchTracker::new();
        assert_eq!(pinch.factor(240.0, Vec3::ONE), Some(1.0));
        assert!(pinch.is_pinching());
    }

    #[test]
    fn pinch_scales_from_baseline() {
        let mut pinch = PinchTracker::new();
        let start = Vec3::splat(0.5);
        assert_eq!(pinch.scale_for(100.0, start), Some(start));
        // Current scale is ignored once the baseline exists.
        assert_eq!(pinch.scale_for(200.0, Vec3::splat(9.0)), Some(Vec3::ONE));
        assert_eq!(pinch.scale_for(50.0, Vec3::ONE), Some(Vec3::splat(0.25)));
    }

    #[test]
    fn pinch_factor_is_monotonic_in_distance() {
        let mut pinch = PinchTracker::new();
        pinch.factor(100.0, Vec3::ONE);
        let mut last = 0.0;
        for d in [20.0, 60.0, 100.0, 150.0, 400.0] {
            let f = pinch.factor(d, Vec3::ONE).unwrap();
            assert!(f > last);
            last = f;
        }
    }

    #[test]
    fn reset_recaptures_baseline() {
        let mut pinch = PinchTracker::new();
        pinch.factor(100.0, Vec3::ONE);
        pinch.reset();
        assert!(!pinch.is_pinching());
        assert_eq!(pinch.factor(300.0, Vec3::ONE), Some(1.0));
    }

    #[test]
    fn degenerate_baseline_is_not_recorded() {
        let mut pinch = PinchTracker::new();
        assert_eq!(pinch.factor(0.0, Vec3::ONE), None);
        assert!(!pinch.is_pinching());
    }
}
