//! Device-agnostic input snapshot sampled once per frame.

use std::collections::HashSet;

use crate::Vec2;

/// Logical keys the camera controls understand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputKey {
    W,
    A,
    S,
    D,
    Q,
    E,
    Mouse0,
    Mouse1,
    WheelUp,
    WheelDown,
}

/// Read side of the per-frame input state.
pub trait InputSource {
    fn is_down(&self, key: InputKey) -> bool;

    /// Pointer movement accumulated since the last [`InputSource::consume`].
    fn mouse_delta(&self) -> Vec2;

    /// Called once the frame's input has been applied: clears the mouse delta
    /// and releases one-shot keys (wheel notches). Held keys stay down.
    fn consume(&mut self);
}

/// Plain input state fed by the platform layer or by tests.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    pressed: HashSet<InputKey>,
    mouse_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: InputKey) {
        self.pressed.insert(key);
    }

    pub fn release(&mut self, key: InputKey) {
        self.pressed.remove(&key);
    }

    pub fn add_mouse_motion(&mut self, dx: f32, dy: f32) {
        self.mouse_delta += Vec2::new(dx, dy);
    }

    /// Record a wheel notch; positive `delta_y` scrolls up.
    pub fn scroll(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.press(InputKey::WheelUp);
        } else if delta_y < 0.0 {
            self.press(InputKey::WheelDown);
        }
    }

    /// Drop everything, e.g. when the window loses focus.
    pub fn clear(&mut self) {
        self.pressed.clear();
        self.mouse_delta = Vec2::ZERO;
    }
}

impl InputSource for InputState {
    #[inline]
    fn is_down(&self, key: InputKey) -> bool {
        self.pressed.contains(&key)
    }

    #[inline]
    fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    fn consume(&mut self) {
        self.mouse_delta = Vec2::ZERO;
        self.pressed.remove(&InputKey::WheelUp);
        self.pressed.remove(&InputKey::WheelDown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release() {
        let mut input = InputState::new();
        input.press(InputKey::W);
        input.press(InputKey::W);
        assert!(input.is_down(InputKey::W));
        input.release(InputKey::W);
        assert!(!input.is_down(InputKey::W));
    }

    #[test]
    fn mouse_motion_accumulates_until_consumed() {
        let mut input = InputState::new();
        input.add_mouse_motion(2.0, -1.0);
        input.add_mouse_motion(1.0, 4.0);
        assert_eq!(input.mouse_delta(), Vec2::new(3.0, 3.0));
        input.consume();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn consume_releases_wheel_but_keeps_held_keys() {
        let mut input = InputState::new();
        input.press(InputKey::Mouse0);
        input.scroll(1.0);
        input.scroll(-2.0);
        assert!(input.is_down(InputKey::WheelUp));
        assert!(input.is_down(InputKey::WheelDown));
        input.consume();
        assert!(!input.is_down(InputKey::WheelUp));
        assert!(!input.is_down(InputKey::WheelDown));
        assert!(input.is_down(InputKey::Mouse0));
    }

    #[test]
    fn clear_drops_everything() {
        let mut input = InputState::new();
        input.press(InputKey::D);
        input.add_mouse_motion(1.0, 1.0);
        input.clear();
        assert!(!input.is_down(InputKey::D));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }
}
