use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a single touch within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchPhase {
    Began,
    Moved,
    Stationary,
    Ended,
    Canceled,
}

/// One touch point. Positions are screen pixels with the origin at the
/// bottom-left corner; `delta` is the movement since the previous frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Touch {
    pub id: u64,
    pub phase: TouchPhase,
    pub position: Vec2,
    pub delta: Vec2,
}

impl Touch {
    pub fn began(id: u64, position: Vec2) -> Self {
        Self {
            id,
            phase: TouchPhase::Began,
            position,
            delta: Vec2::ZERO,
        }
    }

    pub fn moved(id: u64, position: Vec2, delta: Vec2) -> Self {
        Self {
            id,
            phase: TouchPhase::Moved,
            position,
            delta,
        }
    }

    pub fn stationary(id: u64, position: Vec2) -> Self {
        Self {
            id,
            phase: TouchPhase::Stationary,
            position,
            delta: Vec2::ZERO,
        }
    }

    pub fn ended(id: u64, position: Vec2) -> Self {
        Self {
            id,
            phase: TouchPhase::Ended,
            position,
            delta: Vec2::ZERO,
        }
    }
}

/// All touches reported for one frame, in the order the device lists them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchFrame {
    touches: Vec<Touch>,
}

impl TouchFrame {
    /// A frame with no touches (also what hosts without touch hardware send).
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(touch: Touch) -> Self {
        Self {
            touches: vec![touch],
        }
    }

    pub fn pair(first: Touch, second: Touch) -> Self {
        Self {
            touches: vec![first, second],
        }
    }

    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Touch> {
        self.touches.get(index)
    }

    pub fn touches(&self) -> &[Touch] {
        &self.touches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame() {
        let frame = TouchFrame::none();
        assert!(frame.is_empty());
        assert!(frame.get(0).is_none());
    }

    #[test]
    fn pair_keeps_order() {
        let frame = TouchFrame::pair(
            Touch::began(1, Vec2::new(10.0, 10.0)),
            Touch::moved(2, Vec2::new(20.0, 20.0), Vec2::ONE),
        );
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.get(0).unwrap().id, 1);
        assert_eq!(frame.get(1).unwrap().phase, TouchPhase::Moved);
    }
}
