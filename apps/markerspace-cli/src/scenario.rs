//! YAML-scripted carousel scenarios.
//!
//! A script is a list of steps replayed against an in-memory scene with a
//! fixed frame rate. Taps and drags go through the mouse emulator, so they
//! exercise the same touch path a phone would.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use glam::{Quat, Vec2, Vec3};
use markerspace_carousel::{CarouselConfig, CarouselController, FrameInput};
use markerspace_common::{EntityId, Pose};
use markerspace_ecs::ComponentEvent;
use markerspace_input::{
    Action, AnchorId, MouseTouchEmulator, Touch, TouchFrame, TrackedImage, TrackedImagesChanged,
    TrackingState,
};
use markerspace_render::ArCamera;
use markerspace_scene::{Capability, Scene, SceneGraph};
use serde::{Deserialize, Serialize};

pub const DEFAULT_FRAME_RATE: f32 = 60.0;

/// Where drags start unless the step says otherwise; far from the default
/// anchor so the press does not select anything.
const DEFAULT_DRAG_START: Vec2 = Vec2::new(100.0, 100.0);
const PINCH_ORIGIN: Vec2 = Vec2::new(300.0, 900.0);

fn default_frame_rate() -> f32 {
    DEFAULT_FRAME_RATE
}

fn default_anchor_position() -> Vec3 {
    Vec3::new(0.0, 0.0, -0.5)
}

fn default_tracking() -> TrackingState {
    TrackingState::Tracking
}

fn one() -> u32 {
    1
}

fn five() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    /// Carousel config, relative to the script file.
    #[serde(default)]
    pub config: Option<PathBuf>,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let script: Script = serde_yaml::from_str(yaml).context("parsing scenario script")?;
        if !(script.frame_rate.is_finite() && script.frame_rate > 0.0) {
            bail!("frame_rate must be positive, got {}", script.frame_rate);
        }
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        let mut script = Self::from_yaml_str(&yaml)?;
        if let (Some(config), Some(dir)) = (script.config.as_mut(), path.parent()) {
            if config.is_relative() {
                *config = dir.join(&*config);
            }
        }
        Ok(script)
    }
}

/// One scripted event. Angles are in degrees, screen values in pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    /// The tracker reports the marker for the first time (or again).
    Detect {
        /// Reference image name; defaults to the configured one.
        #[serde(default)]
        image: Option<String>,
        #[serde(default = "default_anchor_position")]
        position: Vec3,
        #[serde(default)]
        yaw: f32,
    },
    Track {
        position: Vec3,
        #[serde(default)]
        yaw: f32,
        #[serde(default = "default_tracking")]
        state: TrackingState,
    },
    Lose,
    Advance,
    Retreat,
    /// Press and release on a named part of the active variant.
    Tap { part: String },
    /// Press, move by `delta` on each of `frames` frames, release.
    Drag {
        delta: Vec2,
        #[serde(default = "one")]
        frames: u32,
        #[serde(default)]
        start: Option<Vec2>,
    },
    /// Two-finger pinch from one distance to another, then release.
    Pinch {
        from: f32,
        to: f32,
        #[serde(default = "five")]
        frames: u32,
    },
    /// Idle frames.
    Wait { seconds: f32 },
}

/// Final state reported after a run.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub time: f64,
    pub frames: u64,
    pub variant_count: usize,
    pub current_index: usize,
    pub active: Option<String>,
    pub highlighted: Option<String>,
    pub label: Option<String>,
    pub index_history: Vec<usize>,
    pub scene_events: usize,
    pub component_events: Vec<ComponentEvent>,
}

pub struct Scenario {
    scene: Scene,
    carousel: CarouselController,
    camera: ArCamera,
    mouse: MouseTouchEmulator,
    image: Option<TrackedImage>,
    next_anchor: u64,
    time: f64,
    frame_dt: f32,
    frames: u64,
    index_history: Rc<RefCell<Vec<usize>>>,
}

impl Scenario {
    pub fn new(config: CarouselConfig, frame_rate: f32) -> Self {
        let index_history = Rc::new(RefCell::new(Vec::new()));
        let mut carousel = CarouselController::new(config);
        let sink = Rc::clone(&index_history);
        carousel.set_listener(move |index: usize| sink.borrow_mut().push(index));
        Self {
            scene: Scene::new(),
            carousel,
            camera: ArCamera::looking_at(Vec3::ZERO, default_anchor_position()),
            mouse: MouseTouchEmulator::new(),
            image: None,
            next_anchor: 1,
            time: 0.0,
            frame_dt: 1.0 / frame_rate,
            frames: 0,
            index_history,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn carousel(&self) -> &CarouselController {
        &self.carousel
    }

    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.apply(step)
                .with_context(|| format!("step {} ({step:?})", i + 1))?;
        }
        tracing::info!(steps = steps.len(), frames = self.frames, "scenario finished");
        Ok(())
    }

    pub fn apply(&mut self, step: &Step) -> Result<()> {
        tracing::debug!(?step, "applying step");
        match step {
            Step::Detect {
                image,
                position,
                yaw,
            } => {
                let name = image
                    .clone()
                    .unwrap_or_else(|| self.carousel.config().reference_image.clone());
                let detected =
                    TrackedImage::new(AnchorId(self.next_anchor), name, pose(*position, *yaw));
                self.next_anchor += 1;
                self.carousel.on_tracked_images_changed(
                    &mut self.scene,
                    &TrackedImagesChanged::added(detected.clone()),
                );
                self.image = Some(detected);
            }
            Step::Track {
                position,
                yaw,
                state,
            } => {
                let Some(image) = &self.image else {
                    bail!("track before detect");
                };
                let tracked = TrackedImage {
                    pose: pose(*position, *yaw),
                    tracking_state: *state,
                    ..image.clone()
                };
                self.carousel.on_tracked_images_changed(
                    &mut self.scene,
                    &TrackedImagesChanged::updated(tracked.clone()),
                );
                self.image = Some(tracked);
            }
            Step::Lose => {
                let Some(image) = self.image.take() else {
                    bail!("lose before detect");
                };
                self.carousel
                    .on_tracked_images_changed(&mut self.scene, &TrackedImagesChanged::removed(image));
            }
            Step::Advance => self.carousel.apply_action(&mut self.scene, Action::Advance),
            Step::Retreat => self.carousel.apply_action(&mut self.scene, Action::Retreat),
            Step::Tap { part } => {
                let screen = self.part_on_screen(part)?;
                self.mouse_frame(true, screen);
                self.mouse_frame(false, screen);
            }
            Step::Drag {
                delta,
                frames,
                start,
            } => {
                let mut cursor = start.unwrap_or(DEFAULT_DRAG_START);
                self.mouse_frame(true, cursor);
                for _ in 0..*frames {
                    cursor += *delta;
                    self.mouse_frame(true, cursor);
                }
                self.mouse_frame(false, cursor);
            }
            Step::Pinch { from, to, frames } => {
                let frames = (*frames).max(1);
                for i in 0..=frames {
                    let distance = from + (to - from) * i as f32 / frames as f32;
                    let touches = TouchFrame::pair(
                        Touch::stationary(1, PINCH_ORIGIN),
                        Touch::moved(2, PINCH_ORIGIN + Vec2::X * distance, Vec2::X),
                    );
                    self.frame(touches);
                }
                self.frame(TouchFrame::none());
            }
            Step::Wait { seconds } => {
                if !(seconds.is_finite() && *seconds >= 0.0) {
                    bail!("wait needs a non-negative duration, got {seconds}");
                }
                let frames = (seconds / self.frame_dt).ceil() as u64;
                for _ in 0..frames {
                    self.frame(TouchFrame::none());
                }
            }
        }
        Ok(())
    }

    fn part_on_screen(&self, part: &str) -> Result<Vec2> {
        let Some(root) = self.carousel.active_entity() else {
            bail!("tap before anything was spawned");
        };
        let target = self
            .scene
            .find_child(root, part)
            .with_context(|| format!("active variant has no part named {part:?}"))?;
        let position = self
            .scene
            .position(target)
            .with_context(|| format!("part {part:?} has no transform"))?;
        self.camera
            .world_to_screen(position)
            .with_context(|| format!("part {part:?} is behind the camera"))
    }

    fn mouse_frame(&mut self, button_down: bool, cursor: Vec2) {
        let touches = self.mouse.update(button_down, cursor);
        self.frame(touches);
    }

    fn frame(&mut self, touches: TouchFrame) {
        self.time += f64::from(self.frame_dt);
        self.frames += 1;
        let frame = FrameInput {
            time: self.time,
            delta_time: self.frame_dt,
            touches,
            camera: self.camera,
        };
        self.carousel.step(&mut self.scene, &frame);
    }

    pub fn summary(&self) -> Summary {
        let selection = self.carousel.selection();
        let name = |id: EntityId| self.scene.display_name(id);
        Summary {
            time: self.time,
            frames: self.frames,
            variant_count: self.carousel.variants().len(),
            current_index: self.carousel.current_index(),
            active: self
                .carousel
                .active_entity()
                .filter(|id| self.scene.is_active(*id))
                .map(name),
            highlighted: selection.current(Capability::Highlight).map(name),
            label: selection.current(Capability::Label).map(name),
            index_history: self.index_history.borrow().clone(),
            scene_events: self.scene.events().len(),
            component_events: self.scene.components().events().to_vec(),
        }
    }
}

fn pose(position: Vec3, yaw_degrees: f32) -> Pose {
    Pose::new(position, Quat::from_rotation_y(yaw_degrees.to_radians()))
}
