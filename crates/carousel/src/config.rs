use markerspace_scene::Prefab;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a carousel configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Vertical bobbing applied to non-primary variants while shown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingConfig {
    /// Angular speed of the sine, in radians per second.
    pub speed: f32,
    pub amplitude: f32,
    /// Height above the initial position the motion is centered on.
    pub base_offset: f32,
}

impl Default for FloatingConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            amplitude: 0.03,
            base_offset: 0.1,
        }
    }
}

/// Everything tunable about the carousel. Every field has a default, so a
/// config file only needs the prefab list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    /// Reference image name the carousel reacts to.
    pub reference_image: String,
    /// Variants in carousel order. Index 0 is the primary variant.
    pub prefabs: Vec<Prefab>,
    /// Height added to the anchor position while tracking.
    pub tracking_offset: f32,
    /// Degrees of rotation per pixel of drag.
    pub rotation_sensitivity: f32,
    /// Slerp rate toward the drag target, per second.
    pub rotation_smoothing: f32,
    pub floating: FloatingConfig,
    /// Animator trigger fired when returning to the primary variant.
    pub primary_trigger: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            reference_image: "MyImage".into(),
            prefabs: Vec::new(),
            tracking_offset: 0.05,
            rotation_sensitivity: 0.1,
            rotation_smoothing: 10.0,
            floating: FloatingConfig::default(),
            primary_trigger: "PlayAnimation".into(),
        }
    }
}

impl CarouselConfig {
    pub fn with_prefabs(prefabs: Vec<Prefab>) -> Self {
        Self {
            prefabs,
            ..Self::default()
        }
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&data)?;
        tracing::info!(
            path = %path.as_ref().display(),
            prefabs = config.prefabs.len(),
            reference_image = %config.reference_image,
            "loaded carousel config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reference_image.trim().is_empty() {
            return Err(ConfigError::Invalid("reference_image is empty".into()));
        }
        let tunables = [
            ("tracking_offset", self.tracking_offset, false),
            ("rotation_sensitivity", self.rotation_sensitivity, false),
            ("rotation_smoothing", self.rotation_smoothing, true),
            ("floating.speed", self.floating.speed, false),
            ("floating.amplitude", self.floating.amplitude, true),
            ("floating.base_offset", self.floating.base_offset, false),
        ];
        for (name, value, non_negative) in tunables {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} is not finite")));
            }
            if non_negative && value < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} is negative")));
            }
        }
        if self.prefabs.is_empty() {
            tracing::warn!("config has no prefabs; detection will spawn nothing");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = CarouselConfig::default();
        assert_eq!(config.reference_image, "MyImage");
        assert_eq!(config.tracking_offset, 0.05);
        assert_eq!(config.rotation_sensitivity, 0.1);
        assert_eq!(config.rotation_smoothing, 10.0);
        assert_eq!(config.floating.speed, 1.0);
        assert_eq!(config.floating.amplitude, 0.03);
        assert_eq!(config.floating.base_offset, 0.1);
        assert_eq!(config.primary_trigger, "PlayAnimation");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = r#"
reference_image: Poster
floating:
  amplitude: 0.05
prefabs:
  - name: first
  - name: second
"#;
        let config = CarouselConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.reference_image, "Poster");
        assert_eq!(config.prefabs.len(), 2);
        assert_eq!(config.floating.amplitude, 0.05);
        assert_eq!(config.floating.speed, 1.0);
        assert_eq!(config.tracking_offset, 0.05);
    }

    #[test]
    fn empty_reference_image_is_invalid() {
        let err = CarouselConfig::from_yaml_str("reference_image: '  '").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn negative_smoothing_is_invalid() {
        let config = CarouselConfig {
            rotation_smoothing: -1.0,
            ..CarouselConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_finite_sensitivity_is_invalid() {
        let config = CarouselConfig {
            rotation_sensitivity: f32::NAN,
            ..CarouselConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_yaml_is_reported() {
        let err = CarouselConfig::from_yaml_str("prefabs: 12").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prefabs:\n  - name: only").unwrap();
        let config = CarouselConfig::load(file.path()).unwrap();
        assert_eq!(config.prefabs[0].name, "only");
    }

    #[test]
    fn bundled_config_parses() {
        let config =
            CarouselConfig::from_yaml_str(include_str!("../../../config/carousel.yaml")).unwrap();
        assert_eq!(config.prefabs.len(), 3);
        assert!(config.prefabs[0].animator.is_some());
        assert_eq!(config.prefabs[0].parts.len(), 2);
        assert_eq!(config.prefabs[1].scale, glam::Vec3::splat(1.2));
        assert!(config.prefabs[1].audio.as_ref().is_some_and(|a| a.clip.is_none()));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = CarouselConfig::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
