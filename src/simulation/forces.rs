//! Force contributors for orbiting bodies
//!
//! The pull toward the origin is a constant-magnitude force: it does not
//! fall off with distance, so it is a scripted centripetal pull rather
//! than Newtonian gravity.

use crate::simulation::states::{ForceCommand, NMat4, NVec3};

/// Scale applied to `normalize(p)`; negative so the force points back at the origin
pub const PULL_GAIN: f64 = -2.0;

/// Vectors shorter than this are treated as zero and have no direction
pub const MIN_NORM: f64 = 1e-12;

/// Translation part of a homogeneous world transform
pub fn translation(transform: &NMat4) -> NVec3 {
    transform.fixed_view::<3, 1>(0, 3).into_owned()
}

/// Unit vector along `v`, or `None` when `v` is shorter than `MIN_NORM`
/// or not finite
/// Components are rescaled by the largest one first so `|v|^2` cannot
/// overflow for large but finite vectors
pub fn direction(v: &NVec3) -> Option<NVec3> {
    if !v.iter().all(|c| c.is_finite()) {
        return None;
    }
    let scale = v.amax();
    if scale <= MIN_NORM {
        return None;
    }
    (v / scale).try_normalize(0.0)
}

/// Overflow-safe `|v|`; infinite or NaN components give a non-finite result
pub fn magnitude(v: &NVec3) -> f64 {
    let scale = v.amax();
    if scale == 0.0 || !scale.is_finite() {
        return v.norm();
    }
    scale * (v / scale).norm()
}

/// Force pulling a body at `p` toward the origin with magnitude `|PULL_GAIN|`
/// Returns `None` at the origin, where the direction is undefined
pub fn pull_toward_origin(p: &NVec3) -> Option<NVec3> {
    direction(p).map(|d| d * PULL_GAIN)
}

/// Per-frame command for a body with world transform `transform`
/// Applied at the body's local origin, so it never produces torque
pub fn centripetal_command(transform: &NMat4) -> Option<ForceCommand> {
    pull_toward_origin(&translation(transform)).map(ForceCommand::at_origin)
}
