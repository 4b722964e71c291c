//! Core state types for the rigid-body world.
//!
//! Defines the vector aliases and the body records owned by the world:
//! - `RigidBodyDesc` is what a component hands to registration
//! - `RigidBody` is the live state the world integrates each step
//! - `ForceCommand` is the per-frame write intent a component submits

use nalgebra::{Isometry3, Matrix4, UnitQuaternion, Vector3};
pub type NVec3 = Vector3<f64>;
pub type NMat4 = Matrix4<f64>;

/// Collision/inertia shape of a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Sphere { radius: f64 },
}

impl Shape {
    /// Principal moment of inertia for a solid body of mass `m`
    pub fn inertia(&self, m: f64) -> f64 {
        match *self {
            Shape::Sphere { radius } => 0.4 * m * radius * radius,
        }
    }
}

/// Everything the world needs to register a body
#[derive(Debug, Clone)]
pub struct RigidBodyDesc {
    pub mass: f64,            // mass (> 0)
    pub position: NVec3,      // initial world-space position
    pub velocity: NVec3,      // initial world-space velocity
    pub linear_damping: f64,  // in [0, 1]
    pub angular_damping: f64, // in [0, 1]
    pub shape: Shape,
}

/// Live state of a registered body
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub m: f64,                          // mass
    pub pose: Isometry3<f64>,            // world transform (translation + orientation)
    pub v: NVec3,                        // linear velocity, world frame
    pub w: NVec3,                        // angular velocity, world frame
    pub linear_damping: f64,
    pub angular_damping: f64,
    pub shape: Shape,
    pub force: NVec3,                    // accumulated for the next step only
    pub torque: NVec3,                   // accumulated for the next step only
}

impl RigidBody {
    pub fn from_desc(desc: &RigidBodyDesc) -> Self {
        Self {
            m: desc.mass,
            pose: Isometry3::from_parts(desc.position.into(), UnitQuaternion::identity()),
            v: desc.velocity,
            w: NVec3::zeros(),
            linear_damping: desc.linear_damping,
            angular_damping: desc.angular_damping,
            shape: desc.shape,
            force: NVec3::zeros(),
            torque: NVec3::zeros(),
        }
    }

    /// World-space position
    pub fn position(&self) -> NVec3 {
        self.pose.translation.vector
    }

    /// Homogeneous world transform
    pub fn transform(&self) -> NMat4 {
        self.pose.to_homogeneous()
    }
}

/// A force to apply during the next integration step
/// Both vectors are expressed in the body's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceCommand {
    pub force: NVec3,
    pub local_point: NVec3,
}

impl ForceCommand {
    /// Force applied at the body's own local origin (no torque)
    pub fn at_origin(force: NVec3) -> Self {
        Self {
            force,
            local_point: NVec3::zeros(),
        }
    }
}
