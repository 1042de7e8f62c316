//! Entry point for Meshview.
//! Loads an OBJ model, then flies a camera around it.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use corelib::ControlSettings;
use corelib::camera::MIN_ZOOM_DISTANCE;
use platform::RunConfig;
use renderer::SceneSettings;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum GpuBackend {
    #[default]
    Auto,
    #[value(alias = "vk")]
    Vulkan,
    #[value(alias = "d3d12")]
    Dx12,
    #[value(alias = "mtl")]
    Metal,
    #[value(aliases = ["opengl", "gles"])]
    Gl,
}

impl GpuBackend {
    fn backends(self) -> wgpu::Backends {
        match self {
            Self::Auto => wgpu::Backends::all(),
            Self::Vulkan => wgpu::Backends::VULKAN,
            Self::Dx12 => wgpu::Backends::DX12,
            Self::Metal => wgpu::Backends::METAL,
            Self::Gl => wgpu::Backends::GL,
        }
    }
}

/// Render an OBJ mesh under a free-flying camera.
///
/// Controls: W/S forward/back, A/D strafe, E/Q up/down, drag with the left
/// mouse button to rotate, wheel to zoom, Esc to quit.
#[derive(Debug, Parser)]
#[command(name = "meshview", version, about)]
struct Cli {
    /// OBJ file to load (`v`, `vn` and triangular `f` records).
    #[arg(long, default_value = "assets/models/cube.obj")]
    model: PathBuf,

    #[arg(long, value_enum, default_value_t = GpuBackend::Auto)]
    gpu_backend: GpuBackend,

    /// Window size as WIDTHxHEIGHT; overrides --width/--height.
    #[arg(long, value_parser = parse_size)]
    size: Option<(u32, u32)>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Log frames per second once a second.
    #[arg(long)]
    show_fps: bool,

    /// Units moved per frame while a movement key is held.
    #[arg(long, default_value_t = 0.1)]
    move_speed: f32,

    /// Radians of rotation per pixel of mouse drag.
    #[arg(long, default_value_t = 0.005)]
    sensitivity: f32,

    /// Point light position as x,y,z.
    #[arg(long, value_parser = parse_vec3, default_value = "5,5,5")]
    light: [f32; 3],

    /// Initial eye distance; derived from the model bounds when omitted.
    #[arg(long)]
    distance: Option<f32>,
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let w = w.parse::<u32>().map_err(|e| format!("width: {e}"))?;
    let h = h.parse::<u32>().map_err(|e| format!("height: {e}"))?;
    Ok((w, h))
}

fn parse_vec3(value: &str) -> Result<[f32; 3], String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [x, y, z] = parts.as_slice() else {
        return Err(format!("expected x,y,z, got '{value}'"));
    };
    let parse = |s: &str| s.parse::<f32>().map_err(|e| format!("'{s}': {e}"));
    Ok([parse(*x)?, parse(*y)?, parse(*z)?])
}

/// Eye distance that keeps the whole mesh in view from the origin.
///
/// `None` when the mesh has no positions or its extent is not finite. Tiny
/// meshes are framed just outside the zoom floor.
fn framing_distance(mesh: &asset::Mesh) -> Option<f32> {
    let (min, max) = mesh.bounds()?;
    let reach = min
        .iter()
        .chain(max.iter())
        .fold(0.0f32, |acc, c| acc.max(c.abs()));
    let distance = reach * 3.0;
    (distance.is_finite() && distance > 0.0).then(|| distance.max(MIN_ZOOM_DISTANCE * 2.0))
}

/// A zero or non-finite eye distance collapses the view matrix to NaN.
fn check_distance(distance: f32) -> Result<f32> {
    if !distance.is_finite() || distance <= MIN_ZOOM_DISTANCE {
        bail!("--distance must be a finite value greater than {MIN_ZOOM_DISTANCE}, got {distance}");
    }
    Ok(distance)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let (width, height) = cli.size.unwrap_or((cli.width, cli.height));
    if cli.move_speed <= 0.0 || cli.sensitivity <= 0.0 {
        bail!("--move-speed and --sensitivity must be positive");
    }

    // Loading is fatal on failure: nothing is drawn without a mesh.
    let mesh = asset::load_mesh_from_path(&cli.model)
        .with_context(|| format!("Failed to load model {}", cli.model.display()))?;
    if mesh.is_empty() {
        log::warn!("Model {} contains no triangles", cli.model.display());
    }

    let distance = cli.distance.map(check_distance).transpose()?;

    let defaults = RunConfig::default();
    let config = RunConfig {
        backends: cli.gpu_backend.backends(),
        width: width.max(1),
        height: height.max(1),
        show_fps: cli.show_fps,
        controls: ControlSettings {
            move_speed: cli.move_speed,
            rotate_sensitivity: cli.sensitivity,
            ..ControlSettings::default()
        },
        scene: SceneSettings {
            light_position: cli.light,
            ..SceneSettings::default()
        },
        camera_distance: distance
            .or_else(|| framing_distance(&mesh))
            .unwrap_or(defaults.camera_distance),
    };
    log::info!(
        "Starting Meshview. Backend: {:?}, show_fps={}, window_size={}x{}",
        cli.gpu_backend,
        config.show_fps,
        config.width,
        config.height
    );

    platform::run(config, mesh)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_size() {
        assert_eq!(parse_size("800x600"), Ok((800, 600)));
        assert_eq!(parse_size("1024X768"), Ok((1024, 768)));
        assert!(parse_size("800").is_err());
    }

    #[test]
    fn parses_light_position() {
        assert_eq!(parse_vec3("1, -2,3.5"), Ok([1.0, -2.0, 3.5]));
        assert!(parse_vec3("1,2").is_err());
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["meshview"]).unwrap();
        assert_eq!(cli.model, PathBuf::from("assets/models/cube.obj"));
        assert_eq!(cli.light, [5.0, 5.0, 5.0]);
        assert!(matches!(cli.gpu_backend, GpuBackend::Auto));
    }

    #[test]
    fn backend_aliases() {
        let cli = Cli::try_parse_from(["meshview", "--gpu-backend", "vk"]).unwrap();
        assert_eq!(cli.gpu_backend.backends(), wgpu::Backends::VULKAN);
    }

    #[test]
    fn framing_uses_largest_extent() {
        let mesh = asset::parse_mesh("v -2 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(framing_distance(&mesh), Some(6.0));
        assert_eq!(framing_distance(&asset::Mesh::default()), None);
    }

    #[test]
    fn framing_ignores_non_finite_extent() {
        let mesh = asset::parse_mesh("v 1e39 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(framing_distance(&mesh), None);
    }

    #[test]
    fn framing_stays_outside_zoom_floor() {
        let mesh = asset::parse_mesh("v 0.01 0 0\nv 0 0.01 0\nv 0 0 0\nf 1 2 3\n").unwrap();
        let distance = framing_distance(&mesh).unwrap();
        assert!(distance > MIN_ZOOM_DISTANCE);
    }

    #[test]
    fn degenerate_distances_are_rejected() {
        assert!(check_distance(0.0).is_err());
        assert!(check_distance(-3.0).is_err());
        assert!(check_distance(MIN_ZOOM_DISTANCE).is_err());
        assert!(check_distance(f32::NAN).is_err());
        assert!(check_distance(f32::INFINITY).is_err());
        assert_eq!(check_distance(4.0).unwrap(), 4.0);
    }

    #[test]
    fn accepted_distance_yields_finite_view() {
        let cli = Cli::try_parse_from(["meshview", "--distance", "2.5"]).unwrap();
        let distance = check_distance(cli.distance.unwrap()).unwrap();
        let mut cam = corelib::Camera::with_distance(distance);
        cam.zoom(2.0);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
