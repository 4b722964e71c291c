//! Rigid-body world owned by the scene
//!
//! The world is the only writer of body state. Components hold a
//! [`BodyHandle`], read transforms, submit [`ForceCommand`]s and receive
//! position/velocity publications over channels they subscribed with.
//! Forces are accumulated until the next [`PhysicsWorld::step`] and then
//! cleared, so every frame must resubmit them.

use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

use bevy::log::{debug, info};

use crate::error::RegistrationError;
use crate::simulation::integrator::semi_implicit_euler;
use crate::simulation::states::{ForceCommand, NMat4, NVec3, RigidBody, RigidBodyDesc, Shape};

/// Opaque reference to a registered body
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle(u64);

impl BodyHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Opaque reference to a live subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionHandle(u64);

/// Which quantity a subscription receives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Position,
    Velocity,
}

struct Subscription {
    body: BodyHandle,
    channel: Channel,
    tx: Sender<NVec3>,
}

#[derive(Default)]
pub struct PhysicsWorld {
    pub gravity: NVec3,
    pub t: f64, // simulated time
    bodies: BTreeMap<BodyHandle, RigidBody>,
    subscriptions: BTreeMap<SubscriptionHandle, Subscription>,
    next_body: u64,
    next_subscription: u64,
}

impl PhysicsWorld {
    pub fn new(gravity: NVec3) -> Self {
        Self {
            gravity,
            ..Default::default()
        }
    }

    /// Validate `desc` and add the body to the simulation
    pub fn register_body(&mut self, desc: RigidBodyDesc) -> Result<BodyHandle, RegistrationError> {
        if !desc.mass.is_finite() || desc.mass <= 0.0 {
            return Err(RegistrationError::InvalidMass(desc.mass));
        }
        let Shape::Sphere { radius } = desc.shape;
        if !radius.is_finite() || radius <= 0.0 {
            return Err(RegistrationError::InvalidRadius(radius));
        }
        let in_unit = |d: f64| (0.0..=1.0).contains(&d);
        if !in_unit(desc.linear_damping) || !in_unit(desc.angular_damping) {
            return Err(RegistrationError::InvalidDamping {
                linear: desc.linear_damping,
                angular: desc.angular_damping,
            });
        }
        if !desc.position.iter().chain(desc.velocity.iter()).all(|c| c.is_finite()) {
            return Err(RegistrationError::NonFiniteState);
        }

        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        self.bodies.insert(handle, RigidBody::from_desc(&desc));

        debug!("registered body {} (mass {}, radius {})", handle.0, desc.mass, radius);
        Ok(handle)
    }

    /// Remove a body and every subscription still attached to it
    pub fn remove_body(&mut self, body: BodyHandle) -> Option<RigidBody> {
        let removed = self.bodies.remove(&body)?;
        let before = self.subscriptions.len();
        self.subscriptions.retain(|_, s| s.body != body);
        let dropped = before - self.subscriptions.len();
        if dropped > 0 {
            info!("body {} removed with {} live subscription(s)", body.0, dropped);
        }
        Some(removed)
    }

    pub fn body(&self, body: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(&body)
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Current world transform of `body`
    pub fn read_transform(&self, body: BodyHandle) -> Option<NMat4> {
        self.bodies.get(&body).map(RigidBody::transform)
    }

    pub fn subscribe_position(
        &mut self,
        body: BodyHandle,
        tx: Sender<NVec3>,
    ) -> Result<SubscriptionHandle, RegistrationError> {
        self.subscribe(body, Channel::Position, tx)
    }

    pub fn subscribe_velocity(
        &mut self,
        body: BodyHandle,
        tx: Sender<NVec3>,
    ) -> Result<SubscriptionHandle, RegistrationError> {
        self.subscribe(body, Channel::Velocity, tx)
    }

    fn subscribe(
        &mut self,
        body: BodyHandle,
        channel: Channel,
        tx: Sender<NVec3>,
    ) -> Result<SubscriptionHandle, RegistrationError> {
        if !self.bodies.contains_key(&body) {
            return Err(RegistrationError::UnknownBody(body.0));
        }
        let handle = SubscriptionHandle(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.insert(handle, Subscription { body, channel, tx });
        Ok(handle)
    }

    /// Returns whether the subscription was still live
    pub fn unsubscribe(&mut self, subscription: SubscriptionHandle) -> bool {
        self.subscriptions.remove(&subscription).is_some()
    }

    /// Accumulate a local-frame force for the next step
    /// Unknown handles are ignored
    pub fn apply_local_force(&mut self, body: BodyHandle, cmd: ForceCommand) {
        let Some(b) = self.bodies.get_mut(&body) else {
            return;
        };
        let f_world = b.pose.rotation * cmd.force;
        let r_world = b.pose.rotation * cmd.local_point;
        b.force += f_world;
        b.torque += r_world.cross(&f_world);
    }

    /// Advance every body by `dt`, clear the force accumulators and
    /// publish the new state to subscribers
    pub fn step(&mut self, dt: f64) {
        for b in self.bodies.values_mut() {
            semi_implicit_euler(b, &self.gravity, dt);
            b.force = NVec3::zeros();
            b.torque = NVec3::zeros();
        }
        self.t += dt;
        self.publish();
    }

    fn publish(&mut self) {
        let bodies = &self.bodies;
        self.subscriptions.retain(|handle, s| {
            let Some(b) = bodies.get(&s.body) else {
                return false;
            };
            let value = match s.channel {
                Channel::Position => b.position(),
                Channel::Velocity => b.v,
            };
            // A dropped receiver means the subscriber is gone
            let alive = s.tx.send(value).is_ok();
            if !alive {
                debug!("pruning subscription {} with closed receiver", handle.0);
            }
            alive
        });
    }
}
