//! Scene components that own a body in the world
//!
//! - [`AttractorBody`] anchors the origin and never applies forces
//! - [`OrbitingBody`] pulls itself toward the origin every frame and
//!   mirrors its published state for the overlays
//!
//! Both are mounted against an explicitly passed [`PhysicsWorld`] and must
//! be unmounted against the same world; `unmount` consumes the component so
//! nothing can observe it afterwards.

use std::sync::mpsc;

use bevy::log::{debug, info};

use crate::configuration::config::{AttractorConfig, OrbiterConfig};
use crate::error::RegistrationError;
use crate::simulation::display::ObservableVectorState;
use crate::simulation::engine::{BodyHandle, PhysicsWorld, SubscriptionHandle};
use crate::simulation::forces::centripetal_command;
use crate::simulation::states::{ForceCommand, NVec3, RigidBodyDesc, Shape};

/// Mass of every orbiting body
pub const ORBITER_MASS: f64 = 5.0;
/// Sphere radius of every orbiting body
pub const ORBITER_RADIUS: f64 = 0.5;

/// Result of one frame hook
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// A force was submitted for the next step
    Applied(ForceCommand),
    /// The body sits on the origin; the pull has no direction
    AtOrigin,
    /// The handle no longer refers to a body in the world
    Detached,
}

impl FrameOutcome {
    pub fn command(&self) -> Option<ForceCommand> {
        match *self {
            FrameOutcome::Applied(cmd) => Some(cmd),
            _ => None,
        }
    }
}

/// Work done once per rendered frame, before the world steps
pub trait FrameHook {
    fn on_frame(&mut self, world: &mut PhysicsWorld) -> FrameOutcome;
}

pub struct AttractorBody {
    pub handle: BodyHandle,
    pub mass: f64,
    pub radius: f64,
    pub color: String,
}

impl AttractorBody {
    /// Register the anchor at the origin, at rest
    pub fn mount(world: &mut PhysicsWorld, cfg: &AttractorConfig) -> Result<Self, RegistrationError> {
        let handle = world.register_body(RigidBodyDesc {
            mass: cfg.mass,
            position: NVec3::zeros(),
            velocity: NVec3::zeros(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            shape: Shape::Sphere { radius: cfg.radius },
        })?;
        info!("attractor mounted (mass {}, radius {})", cfg.mass, cfg.radius);

        Ok(Self {
            handle,
            mass: cfg.mass,
            radius: cfg.radius,
            color: cfg.color.clone(),
        })
    }

    pub fn unmount(self, world: &mut PhysicsWorld) {
        world.remove_body(self.handle);
        debug!("attractor {} unmounted", self.handle.id());
    }
}

pub struct OrbitingBody {
    pub handle: BodyHandle,
    pub color: String,
    pub state: ObservableVectorState,
    subscriptions: [SubscriptionHandle; 2],
}

impl OrbitingBody {
    /// Register the body and subscribe to its position and velocity
    /// The subscriptions exist before this returns, so the first frame
    /// already has a live mailbox
    pub fn mount(world: &mut PhysicsWorld, cfg: &OrbiterConfig) -> Result<Self, RegistrationError> {
        let position = NVec3::from(cfg.position);
        let velocity = NVec3::from(cfg.velocity);

        let handle = world.register_body(RigidBodyDesc {
            mass: ORBITER_MASS,
            position,
            velocity,
            linear_damping: 0.0,
            angular_damping: 0.0,
            shape: Shape::Sphere { radius: ORBITER_RADIUS },
        })?;

        let (tx_p, rx_p) = mpsc::channel();
        let (tx_v, rx_v) = mpsc::channel();
        let subscriptions = match (world.subscribe_position(handle, tx_p), world.subscribe_velocity(handle, tx_v)) {
            (Ok(p), Ok(v)) => [p, v],
            (Err(e), _) | (_, Err(e)) => {
                world.remove_body(handle);
                return Err(e);
            }
        };
        info!(
            "orbiter {} mounted at [{:.3}, {:.3}, {:.3}]",
            handle.id(),
            position.x,
            position.y,
            position.z
        );

        Ok(Self {
            handle,
            color: cfg.color.clone(),
            state: ObservableVectorState::new(position, velocity, rx_p, rx_v),
            subscriptions,
        })
    }

    /// Pull the latest published state into `self.state`
    pub fn sync(&mut self) -> usize {
        self.state.sync()
    }

    /// Unsubscribe, then deregister
    pub fn unmount(self, world: &mut PhysicsWorld) {
        for s in self.subscriptions {
            world.unsubscribe(s);
        }
        world.remove_body(self.handle);
        debug!("orbiter {} unmounted", self.handle.id());
    }
}

impl FrameHook for OrbitingBody {
    /// Read the transform, pull toward the origin, submit for the next step
    /// Nothing is submitted while the body sits on the origin
    fn on_frame(&mut self, world: &mut PhysicsWorld) -> FrameOutcome {
        let Some(transform) = world.read_transform(self.handle) else {
            return FrameOutcome::Detached;
        };
        let Some(cmd) = centripetal_command(&transform) else {
            debug!("orbiter {} at origin, skipping pull this frame", self.handle.id());
            return FrameOutcome::AtOrigin;
        };
        world.apply_local_force(self.handle, cmd);
        FrameOutcome::Applied(cmd)
    }
}
