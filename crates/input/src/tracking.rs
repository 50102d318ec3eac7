use markerspace_common::Pose;
use serde::{Deserialize, Serialize};

/// Identity of a trackable reported by the image tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u64);

/// How well the tracker currently sees the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TrackingState {
    #[default]
    None,
    /// Pose is stale or approximate.
    Limited,
    /// Pose is live.
    Tracking,
}

/// A tracked reference image and its live pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedImage {
    pub id: AnchorId,
    pub reference_image: String,
    pub pose: Pose,
    pub tracking_state: TrackingState,
}

impl TrackedImage {
    pub fn new(id: AnchorId, reference_image: impl Into<String>, pose: Pose) -> Self {
        Self {
            id,
            reference_image: reference_image.into(),
            pose,
            tracking_state: TrackingState::Tracking,
        }
    }

    pub fn with_state(mut self, tracking_state: TrackingState) -> Self {
        self.tracking_state = tracking_state;
        self
    }
}

/// One batch of tracker changes, delivered between frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackedImagesChanged {
    pub added: Vec<TrackedImage>,
    pub updated: Vec<TrackedImage>,
    pub removed: Vec<TrackedImage>,
}

impl TrackedImagesChanged {
    pub fn added(image: TrackedImage) -> Self {
        Self {
            added: vec![image],
            ..Self::default()
        }
    }

    pub fn updated(image: TrackedImage) -> Self {
        Self {
            updated: vec![image],
            ..Self::default()
        }
    }

    pub fn removed(image: TrackedImage) -> Self {
        Self {
            removed: vec![image],
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}
