//! Key bindings and the per-frame input snapshot.

use std::collections::HashSet;

use winit::keyboard::KeyCode;

/// Logical inputs the viewer reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    Left,
    Right,
    Up,
    Down,
    RollLeft,
    RollRight,
    ToggleCursor,
    NewGame,
}

#[derive(Clone, Debug)]
pub struct KeyBindings {
    pub forward: KeyCode,
    pub back: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
    pub roll_left: KeyCode,
    pub roll_right: KeyCode,
    pub toggle_cursor: KeyCode,
    pub new_game: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            forward: KeyCode::KeyW,
            back: KeyCode::KeyS,
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::Space,
            down: KeyCode::KeyC,
            roll_left: KeyCode::KeyQ,
            roll_right: KeyCode::KeyE,
            toggle_cursor: KeyCode::F1,
            new_game: KeyCode::KeyN,
        }
    }
}

impl KeyBindings {
    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        let table = [
            (self.forward, Action::Forward),
            (self.back, Action::Back),
            (self.left, Action::Left),
            (self.right, Action::Right),
            (self.up, Action::Up),
            (self.down, Action::Down),
            (self.roll_left, Action::RollLeft),
            (self.roll_right, Action::RollRight),
            (self.toggle_cursor, Action::ToggleCursor),
            (self.new_game, Action::NewGame),
        ];
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|&(_, action)| action)
    }
}

/// Held actions plus mouse motion since the previous poll (pixels).
#[derive(Clone, Debug, Default)]
pub struct InputSnapshot {
    held: HashSet<Action>,
    pub mouse_delta: (f32, f32),
}

impl InputSnapshot {
    pub fn from_keys<I>(keys: I, bindings: &KeyBindings) -> Self
    where
        I: IntoIterator<Item = KeyCode>,
    {
        let held = keys
            .into_iter()
            .filter_map(|k| bindings.action_for(k))
            .collect();
        Self {
            held,
            mouse_delta: (0.0, 0.0),
        }
    }

    #[inline]
    pub fn with_mouse_delta(mut self, dx: f32, dy: f32) -> Self {
        self.mouse_delta = (dx, dy);
        self
    }

    #[inline]
    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// +1 for `positive`, -1 for `negative`, 0 otherwise. `positive` wins a tie.
    #[inline]
    pub fn axis(&self, positive: Action, negative: Action) -> f32 {
        if self.is_held(positive) {
            1.0
        } else if self.is_held(negative) {
            -1.0
        } else {
            0.0
        }
    }
}

/// Key names accepted on the command line.
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let key = match name.to_ascii_uppercase().as_str() {
        "W" => KeyCode::KeyW,
        "A" => KeyCode::KeyA,
        "S" => KeyCode::KeyS,
        "D" => KeyCode::KeyD,
        "C" => KeyCode::KeyC,
        "Q" => KeyCode::KeyQ,
        "E" => KeyCode::KeyE,
        "N" => KeyCode::KeyN,
        "SPACE" => KeyCode::Space,
        "F1" => KeyCode::F1,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_map_wasd() {
        let b = KeyBindings::default();
        assert_eq!(b.action_for(KeyCode::KeyW), Some(Action::Forward));
        assert_eq!(b.action_for(KeyCode::Space), Some(Action::Up));
        assert_eq!(b.action_for(KeyCode::F1), Some(Action::ToggleCursor));
        assert_eq!(b.action_for(KeyCode::KeyN), Some(Action::NewGame));
        assert_eq!(b.action_for(KeyCode::KeyZ), None);
    }

    #[test]
    fn snapshot_axis_prefers_positive() {
        let b = KeyBindings::default();
        let s = InputSnapshot::from_keys([KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyD], &b);
        assert_eq!(s.axis(Action::Forward, Action::Back), 1.0);
        assert_eq!(s.axis(Action::Left, Action::Right), -1.0);
        assert_eq!(s.axis(Action::Up, Action::Down), 0.0);
    }

    #[test]
    fn parses_cli_key_names() {
        assert_eq!(parse_key("w"), Some(KeyCode::KeyW));
        assert_eq!(parse_key("space"), Some(KeyCode::Space));
        assert_eq!(parse_key("x"), None);
    }
}
