use crate::{Mat4, Vec3};

/// Closest the eye may get to the anchor before zooming in is refused.
pub const MIN_ZOOM_DISTANCE: f32 = 0.2;

/// Damping applied to vertical movement.
pub const VERTICAL_DAMPING: f32 = 0.1;

/// World axis used for strafing and for deriving the vertical direction.
pub const WORLD_RIGHT: Vec3 = Vec3::X;

/// Discrete per-frame camera intents, independent of any input device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraCommand {
    Forward(f32),
    Backward(f32),
    StrafeLeft(f32),
    StrafeRight(f32),
    Ascend(f32),
    Descend(f32),
    Rotate { yaw: f32, pitch: f32 },
    /// Multiplies the eye distance; `< 1` zooms in.
    Zoom(f32),
}

/// Free-flight camera orbiting an anchor point.
///
/// `front` points from the anchor (`position`) to the eye and its length is
/// the zoom distance. The view looks from `eye = position + front` back at
/// `position`. Every mutator recomputes `eye` and the view matrix.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    eye: Vec3,
    view: Mat4,
}

impl Camera {
    pub fn new() -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            front: Vec3::X,
            up: Vec3::Y,
            yaw: 0.0,
            pitch: 0.0,
            eye: Vec3::ZERO,
            view: Mat4::IDENTITY,
        };
        camera.calculate();
        camera
    }

    /// Default camera with the eye `distance` units from the anchor.
    pub fn with_distance(distance: f32) -> Self {
        let mut camera = Self::new();
        camera.front = camera.front.normalize_or_zero() * distance;
        camera.calculate();
        camera
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.up
    }

    #[inline]
    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Current zoom distance between eye and anchor.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.front.length()
    }

    /// Unit direction the view is looking along.
    #[inline]
    pub fn facing(&self) -> Vec3 {
        -self.front.normalize_or_zero()
    }

    pub fn apply(&mut self, command: &CameraCommand) {
        match *command {
            CameraCommand::Forward(d) => self.move_forward(d),
            CameraCommand::Backward(d) => self.move_backward(d),
            CameraCommand::StrafeLeft(d) => self.move_left(d),
            CameraCommand::StrafeRight(d) => self.move_right(d),
            CameraCommand::Ascend(d) => self.move_up(d),
            CameraCommand::Descend(d) => self.move_down(d),
            CameraCommand::Rotate { yaw, pitch } => self.rotate(yaw, pitch),
            CameraCommand::Zoom(factor) => self.zoom(factor),
        }
    }

    /// Translate the anchor and the eye together along the viewing direction.
    ///
    /// The view looks along `-front`, so a positive `distance` moves the anchor
    /// by `-normalize(front) * distance`: from the default state the anchor
    /// ends up at `(-distance, 0, 0)`. `front` itself is left unchanged.
    pub fn move_forward(&mut self, distance: f32) {
        self.translate(self.facing() * distance);
    }

    pub fn move_backward(&mut self, distance: f32) {
        self.move_forward(-distance);
    }

    /// Strafe along the fixed world X axis; left is `+X`.
    pub fn move_left(&mut self, distance: f32) {
        self.translate(WORLD_RIGHT * distance);
    }

    pub fn move_right(&mut self, distance: f32) {
        self.translate(WORLD_RIGHT * -distance);
    }

    /// Move the anchor along `front x WORLD_RIGHT`, damped. No-op while
    /// `front` is parallel to the world X axis.
    pub fn move_up(&mut self, distance: f32) {
        let up = self.front.cross(WORLD_RIGHT).normalize_or_zero();
        self.position += up * (distance * VERTICAL_DAMPING);
        self.calculate();
    }

    pub fn move_down(&mut self, distance: f32) {
        self.move_up(-distance);
    }

    /// Accumulate yaw/pitch (radians) and re-aim `front`, keeping its length.
    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;
        let direction = Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize_or_zero();
        self.front = direction * self.front.length();
        self.calculate();
    }

    /// Scale the eye distance. Zooming in is ignored once the distance is
    /// already below [`MIN_ZOOM_DISTANCE`].
    pub fn zoom(&mut self, factor: f32) {
        if factor < 1.0 && self.front.length() < MIN_ZOOM_DISTANCE {
            return;
        }
        self.front *= factor;
        self.calculate();
    }

    fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.calculate();
    }

    fn calculate(&mut self) {
        self.eye = self.position + self.front;
        self.view = Mat4::look_at_rh(self.eye, self.position, self.up);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Perspective projection parameters (right-handed, depth in `[0, 1]`).
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub fov_y_rad: f32,
    pub z_near: f32,
    /// `None` selects an infinite far plane.
    pub z_far: Option<f32>,
    pub aspect: f32,
}

impl Projection {
    pub fn new(fov_y_rad: f32, z_near: f32, z_far: Option<f32>, aspect: f32) -> Self {
        Self {
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        let aspect = self.aspect.max(1e-6);
        match self.z_far {
            Some(far) => Mat4::perspective_rh(self.fov_y_rad, aspect, self.z_near, far),
            None => Mat4::perspective_infinite_rh(self.fov_y_rad, aspect, self.z_near),
        }
    }

    #[inline]
    pub fn view_proj(&self, camera: &Camera) -> Mat4 {
        self.matrix() * camera.view_matrix()
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }
}

impl Default for Projection {
    /// 45° vertical field of view, near plane at 0.1, no far plane.
    fn default() -> Self {
        Self::new(45f32.to_radians(), 0.1, None, 16.0 / 9.0)
    }
}
