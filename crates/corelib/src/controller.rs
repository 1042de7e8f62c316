//! Maps sampled input to camera commands, one step per frame.

use crate::camera::{Camera, CameraCommand};
use crate::input::{InputKey, InputSource};

/// Tunables for how input drives the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlSettings {
    /// Units moved per frame while a movement key is held.
    pub move_speed: f32,
    /// Radians of rotation per pixel of mouse drag.
    pub rotate_sensitivity: f32,
    /// Zoom factor per wheel notch; zooming in uses the reciprocal.
    pub zoom_step: f32,
    /// Maximum absolute pitch in radians.
    pub pitch_limit: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            move_speed: 0.1,
            rotate_sensitivity: 0.005,
            zoom_step: 1.1,
            pitch_limit: 89f32.to_radians(),
        }
    }
}

/// Per-frame bridge between an [`InputSource`] and a [`Camera`].
#[derive(Clone, Copy, Debug, Default)]
pub struct CameraController {
    pub settings: ControlSettings,
}

impl CameraController {
    pub fn new(settings: ControlSettings) -> Self {
        Self { settings }
    }

    /// Translate the current input snapshot into commands for `camera`.
    pub fn commands(&self, camera: &Camera, input: &impl InputSource) -> Vec<CameraCommand> {
        let s = &self.settings;
        let mut out = Vec::new();

        if input.is_down(InputKey::W) {
            out.push(CameraCommand::Forward(s.move_speed));
        }
        if input.is_down(InputKey::S) {
            out.push(CameraCommand::Backward(s.move_speed));
        }
        if input.is_down(InputKey::A) {
            out.push(CameraCommand::StrafeLeft(s.move_speed));
        }
        if input.is_down(InputKey::D) {
            out.push(CameraCommand::StrafeRight(s.move_speed));
        }
        if input.is_down(InputKey::E) {
            out.push(CameraCommand::Ascend(s.move_speed));
        }
        if input.is_down(InputKey::Q) {
            out.push(CameraCommand::Descend(s.move_speed));
        }

        if input.is_down(InputKey::Mouse0) {
            let delta = input.mouse_delta() * s.rotate_sensitivity;
            if delta.x != 0.0 || delta.y != 0.0 {
                // Keep accumulated pitch away from the poles where look-at degenerates.
                let target = (camera.pitch() + delta.y).clamp(-s.pitch_limit, s.pitch_limit);
                out.push(CameraCommand::Rotate {
                    yaw: delta.x,
                    pitch: target - camera.pitch(),
                });
            }
        }

        if input.is_down(InputKey::WheelUp) {
            out.push(CameraCommand::Zoom(1.0 / s.zoom_step));
        }
        if input.is_down(InputKey::WheelDown) {
            out.push(CameraCommand::Zoom(s.zoom_step));
        }

        out
    }

    /// Sample `input` once, apply the resulting commands and consume it.
    pub fn step(&self, camera: &mut Camera, input: &mut impl InputSource) -> usize {
        let commands = self.commands(camera, input);
        for command in &commands {
            camera.apply(command);
        }
        input.consume();
        if !commands.is_empty() {
            log::trace!("Applied camera commands: {:?}", commands);
        }
        commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputState;
    use crate::{Vec2, Vec3};

    #[test]
    fn idle_input_issues_nothing() {
        let controller = CameraController::default();
        let mut cam = Camera::new();
        let mut input = InputState::new();
        assert_eq!(controller.step(&mut cam, &mut input), 0);
        assert_eq!(cam.eye(), Camera::new().eye());
    }

    #[test]
    fn held_keys_map_to_movement() {
        let controller = CameraController::default();
        let cam = Camera::new();
        let mut input = InputState::new();
        input.press(InputKey::W);
        input.press(InputKey::A);
        input.press(InputKey::E);
        let commands = controller.commands(&cam, &input);
        assert_eq!(
            commands,
            vec![
                CameraCommand::Forward(0.1),
                CameraCommand::StrafeLeft(0.1),
                CameraCommand::Ascend(0.1),
            ]
        );
    }

    #[test]
    fn mouse_motion_rotates_only_while_dragging() {
        let controller = CameraController::default();
        let cam = Camera::new();
        let mut input = InputState::new();
        input.add_mouse_motion(10.0, 0.0);
        assert!(controller.commands(&cam, &input).is_empty());

        input.press(InputKey::Mouse0);
        let commands = controller.commands(&cam, &input);
        assert_eq!(commands.len(), 1);
        match commands[0] {
            CameraCommand::Rotate { yaw, pitch } => {
                assert!((yaw - 0.05).abs() < 1e-6);
                assert_eq!(pitch, 0.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn pitch_is_clamped_at_limit() {
        let controller = CameraController::default();
        let mut cam = Camera::new();
        let mut input = InputState::new();
        input.press(InputKey::Mouse0);
        for _ in 0..10 {
            input.add_mouse_motion(0.0, 1000.0);
            controller.step(&mut cam, &mut input);
        }
        assert!((cam.pitch() - controller.settings.pitch_limit).abs() < 1e-5);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn wheel_zooms_once_per_notch() {
        let controller = CameraController::default();
        let mut cam = Camera::with_distance(2.0);
        let mut input = InputState::new();
        input.scroll(-1.0);
        controller.step(&mut cam, &mut input);
        assert!((cam.distance() - 2.2).abs() < 1e-5);

        // The notch was consumed; a second frame must not zoom again.
        controller.step(&mut cam, &mut input);
        assert!((cam.distance() - 2.2).abs() < 1e-5);

        input.scroll(1.0);
        controller.step(&mut cam, &mut input);
        assert!((cam.distance() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn mouse_delta_is_not_applied_twice() {
        let controller = CameraController::default();
        let mut cam = Camera::new();
        let mut input = InputState::new();
        input.press(InputKey::Mouse0);
        input.add_mouse_motion(20.0, 0.0);
        controller.step(&mut cam, &mut input);
        let yaw = cam.yaw();
        controller.step(&mut cam, &mut input);
        assert_eq!(cam.yaw(), yaw);
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn replayed_input_is_deterministic() {
        let controller = CameraController::default();
        let script = |cam: &mut Camera| {
            let mut input = InputState::new();
            input.press(InputKey::D);
            input.press(InputKey::Mouse0);
            input.add_mouse_motion(3.0, -2.0);
            controller.step(cam, &mut input);
            input.release(InputKey::D);
            input.press(InputKey::S);
            input.scroll(1.0);
            controller.step(cam, &mut input);
        };
        let mut a = Camera::with_distance(5.0);
        let mut b = Camera::with_distance(5.0);
        script(&mut a);
        script(&mut b);
        assert_eq!(a.view_matrix(), b.view_matrix());
        assert_ne!(a.position(), Vec3::ZERO);
    }
}
