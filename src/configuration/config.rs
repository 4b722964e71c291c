//! Configuration types for loading orbit scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scene. A scenario consists of:
//!
//! - [`ParametersConfig`] – step size, world gravity, headless frame budget
//! - [`AttractorConfig`]  – the single massive body at the origin
//! - [`OrbiterConfig`]    – initial state and color for each orbiting body
//! - [`ViewConfig`]       – camera, background and helper geometry
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every field is optional; a missing field takes the default of the demo
//! scene.
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   dt: 0.0166667           # seconds advanced per rendered frame
//!   gravity: [0.0, 0.0, 0.0]
//!   frames: 600             # only used by --headless
//!
//! attractor:
//!   mass: 1000000.0
//!   radius: 1.0
//!   color: "orange"
//!
//! orbiters:
//!   - position: [5.0, 0.0, 0.0]
//!     velocity: [0.0, 2.0, 0.0]
//!     color: "blue"
//!
//! view:
//!   camera: [0.0, 0.0, 10.0]
//!   fov: 75.0
//!   background: "#EBECF2"
//! ```

use serde::Deserialize;

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub dt: f64,           // time step per frame
    pub gravity: [f64; 3], // uniform world gravity, zero for the orbit demo
    pub frames: u64,       // frames to run when headless
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            gravity: [0.0, 0.0, 0.0],
            frames: 600,
        }
    }
}

/// The stationary anchor body
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AttractorConfig {
    pub mass: f64,
    pub radius: f64,
    pub color: String,
}

impl Default for AttractorConfig {
    fn default() -> Self {
        Self {
            mass: 1_000_000.0,
            radius: 1.0,
            color: "orange".to_string(),
        }
    }
}

/// Initial state of one orbiting body
/// Mass and damping are fixed by the body type and not configurable
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct OrbiterConfig {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub color: String, // cosmetic only
}

impl Default for OrbiterConfig {
    fn default() -> Self {
        Self {
            position: [6.0, 0.0, 0.0],
            velocity: [0.0, 8.0, 0.0],
            color: "red".to_string(),
        }
    }
}

/// Camera and helper geometry for the viewer
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ViewConfig {
    pub camera: [f32; 3],
    pub fov: f32, // vertical, degrees
    pub near: f32,
    pub far: f32,
    pub background: String,
    pub axes_length: f32,
    pub grid_size: f32,
    pub grid_divisions: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            camera: [0.0, 0.0, 10.0],
            fov: 75.0,
            near: 0.01,
            far: 100.0,
            background: "#EBECF2".to_string(),
            axes_length: 10.0,
            grid_size: 40.0,
            grid_divisions: 100,
        }
    }
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig,
    pub attractor: AttractorConfig, // exactly one per scene
    pub orbiters: Vec<OrbiterConfig>,
    pub view: ViewConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            parameters: ParametersConfig::default(),
            attractor: AttractorConfig::default(),
            orbiters: vec![OrbiterConfig {
                position: [5.0, 0.0, 0.0],
                velocity: [0.0, 2.0, 0.0],
                color: "blue".to_string(),
            }],
            view: ViewConfig::default(),
        }
    }
}

impl ScenarioConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }
}
