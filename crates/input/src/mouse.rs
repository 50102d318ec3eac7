use glam::Vec2;

use crate::{Touch, TouchFrame, TouchPhase};

/// Touch id used for the emulated pointer.
pub const MOUSE_TOUCH_ID: u64 = 0;

/// Turns primary-button state and cursor position into a single emulated
/// touch so desktop hosts drive the same gesture code as phones.
///
/// Frame lifecycle: call `update` once per frame with the current button
/// state and cursor position.
#[derive(Debug, Clone, Default)]
pub struct MouseTouchEmulator {
    pressed: bool,
    last_position: Vec2,
}

impl MouseTouchEmulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, button_down: bool, cursor: Vec2) -> TouchFrame {
        let frame = match (self.pressed, button_down) {
            (false, true) => TouchFrame::single(Touch::began(MOUSE_TOUCH_ID, cursor)),
            (true, true) => {
                let delta = cursor - self.last_position;
                let phase = if delta == Vec2::ZERO {
                    TouchPhase::Stationary
                } else {
                    TouchPhase::Moved
                };
                TouchFrame::single(Touch {
                    id: MOUSE_TOUCH_ID,
                    phase,
                    position: cursor,
                    delta,
                })
            }
            (true, false) => TouchFrame::single(Touch::ended(MOUSE_TOUCH_ID, cursor)),
            (false, false) => TouchFrame::none(),
        };
        self.pressed = button_down;
        self.last_position = cursor;
        frame
    }
}
