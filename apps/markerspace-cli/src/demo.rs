//! Built-in demo content used when no config or script is given.

use glam::{Vec2, Vec3};
use markerspace_carousel::CarouselConfig;
use markerspace_ecs::{Collider, MaterialHandle};
use markerspace_scene::{AnimatorDef, AudioDef, PartDef, Prefab};

use crate::scenario::Step;

fn part(name: &str, position: Vec3, collider: Collider, material: u64) -> PartDef {
    PartDef {
        name: name.into(),
        position,
        scale: Vec3::ONE,
        collider: Some(collider),
        material: Some(MaterialHandle(material)),
        highlight_material: Some(MaterialHandle(100 + material)),
        label: Some(format!("{name} label")),
    }
}

/// A carousel of `variants` prefabs: an animated primary with two parts,
/// then single-part variants. Odd variants carry audio without a clip.
pub fn demo_config(variants: usize) -> CarouselConfig {
    let prefabs = (0..variants)
        .map(|i| {
            if i == 0 {
                Prefab {
                    animator: Some(AnimatorDef {
                        triggers: vec!["PlayAnimation".into()],
                    }),
                    audio: Some(AudioDef {
                        clip: Some("primary.ogg".into()),
                    }),
                    parts: vec![
                        part("left", Vec3::new(-0.05, 0.0, 0.0), Collider::Sphere { radius: 0.02 }, 1),
                        part("right", Vec3::new(0.05, 0.0, 0.0), Collider::Sphere { radius: 0.02 }, 2),
                    ],
                    ..Prefab::named("primary")
                }
            } else {
                let clip = (i % 2 == 0).then(|| format!("variant-{i}.ogg"));
                Prefab {
                    audio: Some(AudioDef { clip }),
                    parts: vec![part(
                        "body",
                        Vec3::ZERO,
                        Collider::Box {
                            half_extents: [0.04, 0.04, 0.04],
                        },
                        10 + i as u64,
                    )],
                    ..Prefab::named(format!("variant-{i}"))
                }
            }
        })
        .collect();
    CarouselConfig::with_prefabs(prefabs)
}

/// Detect the marker, poke at the primary, then cycle once around.
pub fn demo_steps() -> Vec<Step> {
    vec![
        Step::Detect {
            image: None,
            position: Vec3::new(0.0, 0.0, -0.5),
            yaw: 0.0,
        },
        Step::Track {
            position: Vec3::new(0.0, -0.02, -0.45),
            yaw: 15.0,
            state: markerspace_input::TrackingState::Tracking,
        },
        Step::Tap {
            part: "left".into(),
        },
        Step::Tap {
            part: "right".into(),
        },
        Step::Drag {
            delta: Vec2::new(40.0, 0.0),
            frames: 5,
            start: None,
        },
        Step::Pinch {
            from: 100.0,
            to: 150.0,
            frames: 5,
        },
        Step::Advance,
        Step::Wait { seconds: 1.0 },
        Step::Drag {
            delta: Vec2::new(0.0, 30.0),
            frames: 3,
            start: None,
        },
        Step::Advance,
        Step::Advance,
        Step::Retreat,
        Step::Advance,
        Step::Lose,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_config_is_valid() {
        for n in [1, 3, 5] {
            let config = demo_config(n);
            assert_eq!(config.prefabs.len(), n);
            assert!(config.validate().is_ok());
            assert!(config.prefabs[0].animator.is_some());
        }
    }
}
