use glam::Vec3;

use crate::FloatingConfig;

/// Per-variant floating state. The position is a pure function of the frame
/// clock, so nothing has to be suspended between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingMotion {
    origin: Vec3,
}

impl FloatingMotion {
    pub fn new(origin: Vec3) -> Self {
        Self { origin }
    }

    /// Position at absolute clock time `time` (seconds). X and Z stay at the
    /// origin.
    pub fn sample(&self, time: f64, config: &FloatingConfig) -> Vec3 {
        let wave = (time * f64::from(config.speed)).sin() as f32;
        Vec3::new(
            self.origin.x,
            self.origin.y + config.base_offset + wave * config.amplitude,
            self.origin.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_at_zero_sits_on_base_offset() {
        let motion = FloatingMotion::new(Vec3::new(1.0, 2.0, 3.0));
        let p = motion.sample(0.0, &FloatingConfig::default());
        assert_eq!(p.x, 1.0);
        assert_eq!(p.z, 3.0);
        assert!((p.y - 2.1).abs() < 1e-6);
    }

    #[test]
    fn sample_peaks_at_quarter_period() {
        let motion = FloatingMotion::new(Vec3::ZERO);
        let config = FloatingConfig::default();
        let p = motion.sample(std::f64::consts::FRAC_PI_2, &config);
        assert!((p.y - 0.13).abs() < 1e-6);
    }

    #[test]
    fn sample_stays_within_amplitude() {
        let motion = FloatingMotion::new(Vec3::ZERO);
        let config = FloatingConfig::default();
        for i in 0..200 {
            let y = motion.sample(i as f64 * 0.05, &config).y;
            assert!(y >= 0.07 - 1e-6 && y <= 0.13 + 1e-6);
        }
    }
}
