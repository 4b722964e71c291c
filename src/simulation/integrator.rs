//! Fixed-step time integrator for registered rigid bodies
//!
//! Semi-implicit Euler: velocities are kicked by the accumulated force and
//! world gravity, decayed by damping, and only then used to drift the pose.

use nalgebra::UnitQuaternion;

use super::states::{NVec3, RigidBody};

/// Advance one body by `dt`
/// Does not clear the force/torque accumulators; the world does that once
/// every body has been stepped
pub fn semi_implicit_euler(b: &mut RigidBody, gravity: &NVec3, dt: f64) {
    // Kick: v_n+1 = v_n + dt * (F / m + g)
    let a = b.force / b.m + gravity;
    b.v += dt * a;

    // Damping as a per-second fraction lost: v *= (1 - d)^dt
    b.v *= (1.0 - b.linear_damping).powf(dt);

    // Drift: x_n+1 = x_n + dt * v_n+1
    b.pose.translation.vector += dt * b.v;

    // Same kick/drift for the rotational part, isotropic inertia
    let inertia = b.shape.inertia(b.m);
    if inertia > 0.0 {
        b.w += dt * b.torque / inertia;
    }
    b.w *= (1.0 - b.angular_damping).powf(dt);

    let dq = UnitQuaternion::from_scaled_axis(dt * b.w);
    b.pose.rotation = dq * b.pose.rotation;
}
