//! Core types: math re-exports, free-flight camera, input state and the
//! per-frame controller that ties them together.

pub use glam::{Mat4, Vec2, Vec3, vec3};

pub mod camera;
pub mod controller;
pub mod input;

pub use camera::{Camera, CameraCommand, Projection};
pub use controller::{CameraController, ControlSettings};
pub use input::{InputKey, InputSource, InputState};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_pv_is_finite() {
        let mut cam = Camera::with_distance(4.0);
        cam.rotate(0.5, 0.25);
        let pv = Projection::default().view_proj(&cam);
        let a = pv.to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn anchor_projects_to_screen_center() {
        let cam = Camera::with_distance(3.0);
        let pv = Projection::default().view_proj(&cam);
        let clip = pv.project_point3(cam.position());
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        assert!(clip.z > 0.0 && clip.z <= 1.0);
    }

    #[test]
    fn eye_is_anchor_plus_front() {
        let mut cam = Camera::new();
        cam.apply(&CameraCommand::Rotate { yaw: 1.0, pitch: 0.3 });
        cam.apply(&CameraCommand::Forward(0.5));
        assert!(cam.eye().abs_diff_eq(cam.position() + cam.front(), 1e-6));
        assert_eq!(cam.up(), vec3(0.0, 1.0, 0.0));
    }
}
