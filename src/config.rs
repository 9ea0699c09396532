use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::solver::forcing::Emitter;
use crate::solver::{PolarGeometry, SolverParams};

pub const CONFIG_FILE: &str = "annularium.yaml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub physics: PhysicsConfig,
    pub forcing: ForcingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub nr: usize,
    pub ntheta: usize,
    pub r_min: f32,
    pub r_max: f32,
}

/// Solver coefficients. `diffuse_iter` and `project_iter` are fixed sweep
/// counts, not tolerances: raising them buys accuracy at linear cost.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub dt: f32,
    pub diff: f32,
    pub visc: f32,
    pub diffuse_iter: usize,
    pub project_iter: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ForcingConfig {
    pub enabled: bool,
    /// Orbit radius as a fraction of the way from r_min to r_max.
    pub radius_frac: f32,
    pub spin: f32,
    pub density: f32,
    pub radial_push: f32,
    pub swirl: f32,
    pub spread: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
    pub steps_per_frame: usize,
    /// Frames to run with `--headless`.
    pub frames: usize,
    /// Headless diagnostics interval in frames.
    pub report_every: usize,
    /// Density drawn at full palette brightness.
    pub density_scale: f64,
    /// Speed drawn at full palette brightness.
    pub speed_scale: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            physics: PhysicsConfig::default(),
            forcing: ForcingConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { nr: 64, ntheta: 128, r_min: 0.2, r_max: 1.0 }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let p = SolverParams::default();
        Self {
            dt: p.dt,
            diff: p.diff,
            visc: p.visc,
            diffuse_iter: p.diffuse_iter,
            project_iter: p.project_iter,
        }
    }
}

impl Default for ForcingConfig {
    fn default() -> Self {
        let e = Emitter::default();
        Self {
            enabled: true,
            radius_frac: 0.5,
            spin: e.spin,
            density: e.density,
            radial_push: e.radial_push,
            swirl: e.swirl,
            spread: e.spread,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
            target_fps: 60,
            steps_per_frame: 1,
            frames: 600,
            report_every: 60,
            density_scale: 5.0,
            speed_scale: 2.0,
        }
    }
}

impl Config {
    pub fn geometry(&self) -> Result<PolarGeometry, ConfigError> {
        let g = &self.grid;
        PolarGeometry::new(g.nr, g.ntheta, g.r_min, g.r_max)
    }

    pub fn solver_params(&self) -> Result<SolverParams, ConfigError> {
        let p = &self.physics;
        let params = SolverParams {
            dt: p.dt,
            diff: p.diff,
            visc: p.visc,
            diffuse_iter: p.diffuse_iter,
            project_iter: p.project_iter,
        };
        params.validate()?;
        Ok(params)
    }

    /// The configured emitter placed on `geometry`, or `None` when disabled.
    pub fn emitter(&self, geometry: &PolarGeometry) -> Option<Emitter> {
        let f = &self.forcing;
        f.enabled.then(|| Emitter {
            radius: geometry.r_min + f.radius_frac.clamp(0.0, 1.0) * (geometry.r_max - geometry.r_min),
            spin: f.spin,
            phase: 0.0,
            density: f.density,
            radial_push: f.radial_push,
            swirl: f.swirl,
            spread: f.spread,
        })
    }
}

/// Load a config file, reporting read and parse failures.
pub fn load_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Load `annularium.yaml` from the working directory, falling back to defaults.
pub fn load() -> Config {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        return Config::default();
    }
    match load_from(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("{CONFIG_FILE}: {e}; using defaults");
            Config::default()
        }
    }
}
