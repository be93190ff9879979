//! Platform layer: key/mouse state -> camera navigation and board actions.
//!
//! The window/event loop lives outside this crate; it feeds held keys,
//! cursor deltas and button presses in, once per frame.

use std::time::Instant;

use corelib::pick::PickAction;
use winit::event::MouseButton;

pub mod bindings;
pub mod flight;

pub use bindings::{Action, InputSnapshot, KeyBindings, parse_key};
pub use flight::{CursorMode, FlightController, FlightSettings};

/// Left reveals, right flags; other buttons do nothing.
pub fn pick_action(button: MouseButton) -> Option<PickAction> {
    match button {
        MouseButton::Left => Some(PickAction::Reveal),
        MouseButton::Right => Some(PickAction::ToggleFlag),
        _ => None,
    }
}

/// Frame delta time in seconds.
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
