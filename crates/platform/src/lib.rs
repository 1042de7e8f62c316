//! Platform layer: windowing, event loop and per-frame input sampling.
//!
//! Frame order on every redraw:
//! - sample the input snapshot and step the camera controller,
//! - upload camera uniforms and draw,
//! - request the next redraw from `about_to_wait`.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use asset::Mesh;
use corelib::{Camera, CameraController, ControlSettings, InputKey, InputState, Projection};
use renderer::{GpuState, SceneSettings};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

/// Everything the platform needs to open a window and drive the frame loop.
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    pub show_fps: bool,
    pub controls: ControlSettings,
    pub scene: SceneSettings,
    /// Initial distance between eye and anchor.
    pub camera_distance: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            width: 1280,
            height: 720,
            show_fps: false,
            controls: ControlSettings::default(),
            scene: SceneSettings::default(),
            camera_distance: 5.0,
        }
    }
}

/// Open a window and render `mesh` until the window is closed.
///
/// The mesh must already be loaded; no frame is drawn without one.
pub fn run(config: RunConfig, mesh: Mesh) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config, mesh);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: RunConfig,
    mesh: Mesh,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    camera: Camera,
    projection: Projection,
    controller: CameraController,
    input: InputState,
    fps: FpsCounter,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: RunConfig, mesh: Mesh) -> Self {
        let aspect = config.width as f32 / config.height.max(1) as f32;
        Self {
            camera: Camera::with_distance(config.camera_distance),
            projection: Projection::default().with_aspect(aspect),
            controller: CameraController::new(config.controls),
            input: InputState::new(),
            fps: FpsCounter::new(config.show_fps),
            window: None,
            gpu: None,
            error: None,
            mesh,
            config,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Meshview")
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attrs)?);
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let gpu = pollster::block_on(GpuState::new(
            window.clone(),
            &self.mesh,
            self.config.backends,
            self.config.scene,
        ))?;

        window.request_redraw();
        self.window = Some(window);
        self.gpu = Some(gpu);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.controller.step(&mut self.camera, &mut self.input);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        match gpu.render(&self.camera, &self.projection) {
            Ok(()) => self.fps.frame(),
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("Surface lost/outdated, recreating");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::Timeout) => log::warn!("Surface timeout, skipping frame"),
            Err(err) => {
                self.fail(event_loop, anyhow::anyhow!("Render failed: {err}"));
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err.context("Failed to initialise window/GPU"));
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Resized: {}x{}", new_size.width, new_size.height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                    self.projection = self.projection.with_aspect(gpu.aspect());
                }
            }
            WindowEvent::Focused(false) => self.input.clear(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape && event.state == ElementState::Pressed {
                        event_loop.exit();
                        return;
                    }
                    if let Some(key) = map_key(code) {
                        apply_state(&mut self.input, key, event.state);
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(key) = map_mouse_button(button) {
                    apply_state(&mut self.input, key, state);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                };
                self.input.scroll(dy);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.input.add_mouse_motion(dx as f32, dy as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

fn apply_state(input: &mut InputState, key: InputKey, state: ElementState) {
    match state {
        ElementState::Pressed => input.press(key),
        ElementState::Released => input.release(key),
    }
}

fn map_key(code: KeyCode) -> Option<InputKey> {
    match code {
        KeyCode::KeyW => Some(InputKey::W),
        KeyCode::KeyA => Some(InputKey::A),
        KeyCode::KeyS => Some(InputKey::S),
        KeyCode::KeyD => Some(InputKey::D),
        KeyCode::KeyQ => Some(InputKey::Q),
        KeyCode::KeyE => Some(InputKey::E),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<InputKey> {
    match button {
        MouseButton::Left => Some(InputKey::Mouse0),
        MouseButton::Right => Some(InputKey::Mouse1),
        _ => None,
    }
}

/// Logs frames-per-second once a second when enabled.
struct FpsCounter {
    enabled: bool,
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            frames: 0,
            since: Instant::now(),
        }
    }

    fn frame(&mut self) {
        if !self.enabled {
            return;
        }
        self.frames += 1;
        let elapsed = self.since.elapsed();
        if elapsed >= Duration::from_secs(1) {
            log::info!("FPS: {:.1}", self.frames as f64 / elapsed.as_secs_f64());
            self.frames = 0;
            self.since = Instant::now();
        }
    }
}
