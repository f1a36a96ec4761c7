use std::path::Path;

use log::warn;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::input::{PointerTracker, Remap};
use crate::solver::SolverParams;

pub const CONFIG_FILE: &str = "teacup.yaml";

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub sim: SimConfig,
    pub display: DisplayConfig,
    pub pointer: PointerConfig,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    /// Interior cells per side.
    pub n: usize,
    pub diff: f64,
    pub visc: f64,
    pub iterations: usize,
    pub dt: f64,
    /// Step with `dt` every frame instead of wall-clock time.
    pub fixed_dt: bool,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: usize,
    pub height: usize,
    pub target_fps: usize,
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PointerConfig {
    pub force: f64,
    pub density: f64,
    /// Squeeze pointer x into the cup opening.
    pub remap: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        let p = SolverParams::default();
        Self {
            n: 128,
            diff: p.diff,
            visc: p.visc,
            iterations: p.iterations,
            dt: p.dt,
            fixed_dt: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            target_fps: 60,
        }
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            force: 50.0,
            density: 0.0,
            remap: true,
        }
    }
}

impl SimConfig {
    pub fn solver_params(&self) -> SolverParams {
        SolverParams {
            diff: self.diff,
            visc: self.visc,
            iterations: self.iterations,
            dt: self.dt,
        }
    }
}

impl PointerConfig {
    pub fn tracker(&self) -> PointerTracker {
        let remap = self.remap.then_some(Remap::CUP);
        PointerTracker::new(self.force, self.density, remap)
    }
}

impl Config {
    /// Strict parse: malformed YAML or unusable values are errors.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let cfg: Config = serde_yaml::from_str(yaml)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sim.n == 0 {
            return Err(invalid("sim.n", "grid needs at least one interior cell"));
        }
        if self.sim.iterations == 0 {
            return Err(invalid("sim.iterations", "need at least one relaxation sweep"));
        }
        if self.sim.diff < 0.0 || self.sim.visc < 0.0 {
            return Err(invalid("sim.diff/sim.visc", "rates must be non-negative"));
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(invalid("display", "window size must be non-zero"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.to_string() }
}

/// Load `teacup.yaml` from the working directory; defaults when missing,
/// a warning and defaults when unreadable or invalid.
pub fn load() -> Config {
    load_from(Path::new(CONFIG_FILE))
}

pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match Config::from_path(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("{}: {e}; using defaults", path.display());
            Config::default()
        }
    }
}
