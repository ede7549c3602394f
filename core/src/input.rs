//! Input abstraction.
//!
//! The engine never sees physical devices. Each tick it is handed an
//! `InputSource` that answers "is this key held right now?", and each
//! player's bindings translate logical controls into key codes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The six logical controls every player has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Shoot,
    Tackle,
}

/// Key code bound to each logical control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBindings {
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
    pub shoot: String,
    pub tackle: String,
}

impl ControlBindings {
    /// W/A/S/D to move, F to shoot, G to tackle.
    pub fn wasd() -> Self {
        Self {
            up: "KeyW".into(),
            down: "KeyS".into(),
            left: "KeyA".into(),
            right: "KeyD".into(),
            shoot: "KeyF".into(),
            tackle: "KeyG".into(),
        }
    }

    /// Arrow keys to move, K to shoot, L to tackle.
    pub fn arrows() -> Self {
        Self {
            up: "ArrowUp".into(),
            down: "ArrowDown".into(),
            left: "ArrowLeft".into(),
            right: "ArrowRight".into(),
            shoot: "KeyK".into(),
            tackle: "KeyL".into(),
        }
    }

    pub fn key(&self, control: Control) -> &str {
        match control {
            Control::Up => &self.up,
            Control::Down => &self.down,
            Control::Left => &self.left,
            Control::Right => &self.right,
            Control::Shoot => &self.shoot,
            Control::Tackle => &self.tackle,
        }
    }
}

/// Per-tick view of which keys are held.
///
/// Implementations must answer consistently for the whole tick.
pub trait InputSource {
    fn is_key_held(&self, key: &str) -> bool;

    fn is_held(&self, bindings: &ControlBindings, control: Control) -> bool {
        self.is_key_held(bindings.key(control))
    }

    /// Signed axis pair (right − left, down − up), each in {-1, 0, 1}.
    fn axes(&self, bindings: &ControlBindings) -> (f64, f64) {
        let axis = |pos: Control, neg: Control| {
            f64::from(u8::from(self.is_held(bindings, pos)))
                - f64::from(u8::from(self.is_held(bindings, neg)))
        };
        (axis(Control::Right, Control::Left), axis(Control::Down, Control::Up))
    }
}

/// Set of currently held key codes, fed by whatever captures raw events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldKeys {
    keys: HashSet<String>,
}

impl HeldKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: impl Into<String>) {
        self.keys.insert(key.into());
    }

    pub fn release(&mut self, key: &str) {
        self.keys.remove(key);
    }

    /// Drop everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for HeldKeys {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl InputSource for HeldKeys {
    fn is_key_held(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_cancel_when_opposites_are_held() {
        let bindings = ControlBindings::wasd();
        let keys: HeldKeys = ["KeyA", "KeyD", "KeyS"].into_iter().collect();
        assert_eq!(keys.axes(&bindings), (0.0, 1.0));
    }

    #[test]
    fn bindings_are_per_player() {
        let keys: HeldKeys = ["ArrowLeft", "KeyK"].into_iter().collect();
        assert_eq!(keys.axes(&ControlBindings::wasd()), (0.0, 0.0));
        assert_eq!(keys.axes(&ControlBindings::arrows()), (-1.0, 0.0));
        assert!(keys.is_held(&ControlBindings::arrows(), Control::Shoot));
        assert!(!keys.is_held(&ControlBindings::wasd(), Control::Shoot));
    }

    #[test]
    fn release_and_clear() {
        let mut keys = HeldKeys::new();
        keys.press("KeyW");
        keys.press("KeyF");
        keys.release("KeyW");
        assert!(!keys.is_key_held("KeyW"));
        assert!(keys.is_key_held("KeyF"));
        keys.clear();
        assert!(keys.is_empty());
    }
}
