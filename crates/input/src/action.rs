use serde::{Deserialize, Serialize};

/// A UI command bound to an on-screen button.
///
/// The carousel consumes actions, never widget events, so any front end
/// (buttons, keys, scripts) drives it the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Show the next variant.
    Advance,
    /// Show the previous variant.
    Retreat,
    /// No-op (used for buttons that haven't been bound yet).
    Noop,
}

impl Action {
    /// Direction of travel, `None` for actions that don't move the carousel.
    pub fn direction(self) -> Option<bool> {
        match self {
            Self::Advance => Some(true),
            Self::Retreat => Some(false),
            Self::Noop => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_retreat_direction() {
        assert_eq!(Action::Advance.direction(), Some(true));
        assert_eq!(Action::Retreat.direction(), Some(false));
        assert_eq!(Action::Noop.direction(), None);
    }
}
