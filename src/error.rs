//! Error types for the rigid-body world.
//!
//! Registration is the only engine operation that can fail. Degenerate
//! vectors during force or arrow computation are not errors; those paths
//! return `None` instead.

use std::fmt;

/// Errors that can occur when registering a body or subscribing to it.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationError {
    /// Mass must be finite and strictly positive.
    InvalidMass(f64),
    /// Sphere radius must be finite and strictly positive.
    InvalidRadius(f64),
    /// Damping coefficients must lie in [0, 1].
    InvalidDamping { linear: f64, angular: f64 },
    /// Initial position or velocity contains NaN or infinity.
    NonFiniteState,
    /// The handle does not refer to a live body.
    UnknownBody(u64),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::InvalidMass(m) => write!(f, "Invalid body mass {}: must be finite and > 0", m),
            RegistrationError::InvalidRadius(r) => write!(f, "Invalid sphere radius {}: must be finite and > 0", r),
            RegistrationError::InvalidDamping { linear, angular } => write!(
                f,
                "Invalid damping (linear {}, angular {}): both must be within [0, 1]",
                linear, angular
            ),
            RegistrationError::NonFiniteState => write!(f, "Initial position or velocity is not finite"),
            RegistrationError::UnknownBody(id) => write!(f, "No body registered with id {}", id),
        }
    }
}

impl std::error::Error for RegistrationError {}
