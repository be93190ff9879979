//! Input-to-camera adapter.

use std::f32::consts::FRAC_PI_2;

use corelib::camera::Camera;

use crate::bindings::{Action, InputSnapshot};

#[derive(Clone, Copy, Debug)]
pub struct FlightSettings {
    /// Translation speed, world units per second.
    pub speed: f32,
    /// Roll speed, radians per second.
    pub roll_speed: f32,
    /// Mouse-look sensitivity in degrees per pixel.
    pub mouse_sensitivity_deg: f32,
}

impl Default for FlightSettings {
    fn default() -> Self {
        Self {
            speed: 2.0,
            roll_speed: FRAC_PI_2,
            mouse_sensitivity_deg: 0.1,
        }
    }
}

impl FlightSettings {
    /// The only degree -> radian conversion on the way to the camera.
    #[inline]
    pub fn mouse_sensitivity_rad(&self) -> f32 {
        self.mouse_sensitivity_deg.to_radians()
    }
}

/// Whether the cursor is free for aiming or locked for mouse look.
/// Owned by the window layer; the controller only reads it.
#[derive(Clone, Copy, Debug)]
pub struct CursorMode {
    aiming: bool,
    toggle_was_held: bool,
}

impl Default for CursorMode {
    fn default() -> Self {
        Self {
            aiming: true,
            toggle_was_held: false,
        }
    }
}

impl CursorMode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start free for aiming (`true`) or locked for mouse look (`false`).
    pub fn with_aiming(aiming: bool) -> Self {
        Self {
            aiming,
            toggle_was_held: false,
        }
    }

    /// Visible cursor; clicks cast through the cursor position.
    #[inline]
    pub fn cursor_aiming(&self) -> bool {
        self.aiming
    }

    /// Locked cursor; mouse motion turns the camera, clicks use the boresight.
    #[inline]
    pub fn mouse_look(&self) -> bool {
        !self.aiming
    }

    /// Edge triggered: flips once per press. Returns true when it flipped.
    pub fn update(&mut self, toggle_held: bool) -> bool {
        let flipped = toggle_held && !self.toggle_was_held;
        self.toggle_was_held = toggle_held;
        if flipped {
            self.aiming = !self.aiming;
            log::info!(
                "Cursor {}",
                if self.aiming { "released for aiming" } else { "locked for mouse look" }
            );
        }
        flipped
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct FlightController {
    settings: FlightSettings,
}

impl FlightController {
    pub fn new(settings: FlightSettings) -> Self {
        Self { settings }
    }

    #[inline]
    pub fn settings(&self) -> &FlightSettings {
        &self.settings
    }

    /// Apply one frame of input. Order: forward, left, up translation, then
    /// roll, then mouse-look yaw and pitch.
    pub fn apply(&self, camera: &mut Camera, input: &InputSnapshot, dt: f32, cursor: &CursorMode) {
        if !(dt > 0.0 && dt.is_finite()) {
            log::trace!("Skipping input for dt={dt}");
            return;
        }

        let distance = self.settings.speed * dt;
        let forward = input.axis(Action::Forward, Action::Back);
        let left = input.axis(Action::Left, Action::Right);
        let up = input.axis(Action::Up, Action::Down);
        if forward != 0.0 {
            camera.translate_forward(forward * distance);
        }
        if left != 0.0 {
            camera.translate_left(left * distance);
        }
        if up != 0.0 {
            camera.translate_up(up * distance);
        }

        let roll = input.axis(Action::RollLeft, Action::RollRight);
        if roll != 0.0 {
            camera.rotate_roll(roll * self.settings.roll_speed * dt);
        }

        if cursor.mouse_look() {
            let (dx, dy) = input.mouse_delta;
            let sens = self.settings.mouse_sensitivity_rad();
            // Mouse right turns right (negative yaw), mouse down tips the view down.
            if dx != 0.0 {
                camera.rotate_yaw(-dx * sens);
            }
            if dy != 0.0 {
                camera.rotate_pitch(dy * sens);
            }
        }
    }
}
