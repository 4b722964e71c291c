//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - fixed step size used once per rendered frame,
//! - uniform world gravity (zero for the orbit demo),
//! - frame count for headless runs

use crate::simulation::states::NVec3;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub dt: f64,         // step size per frame
    pub gravity: NVec3,  // uniform acceleration applied to every body
    pub frames: u64,     // headless frame budget
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            gravity: NVec3::zeros(),
            frames: 600,
        }
    }
}
