//! Mirrored body state and the overlay arrows derived from it
//!
//! The world pushes position and velocity over two channels after every
//! step. [`ObservableVectorState`] keeps the latest value of each; nothing
//! here feeds back into the simulation.

use std::sync::mpsc::Receiver;

use crate::simulation::forces::{direction, magnitude};
use crate::simulation::states::NVec3;

/// Velocity arrow length per unit speed
pub const VELOCITY_ARROW_SCALE: f64 = 2.0;

/// Fixed length of the arrow pointing back at the origin
pub const PULL_ARROW_LENGTH: f64 = 2.0;

/// Last-value cache for one body's published state
pub struct ObservableVectorState {
    pub position: NVec3,
    pub velocity: NVec3,
    position_rx: Receiver<NVec3>,
    velocity_rx: Receiver<NVec3>,
}

impl ObservableVectorState {
    pub fn new(position: NVec3, velocity: NVec3, position_rx: Receiver<NVec3>, velocity_rx: Receiver<NVec3>) -> Self {
        Self {
            position,
            velocity,
            position_rx,
            velocity_rx,
        }
    }

    /// Drain both mailboxes, keeping the newest value of each
    /// Returns the number of messages consumed
    pub fn sync(&mut self) -> usize {
        let mut n = 0;
        for p in self.position_rx.try_iter() {
            self.position = p;
            n += 1;
        }
        for v in self.velocity_rx.try_iter() {
            self.velocity = v;
            n += 1;
        }
        n
    }

    pub fn velocity_arrow(&self) -> Option<Arrow> {
        velocity_arrow(&self.position, &self.velocity)
    }

    pub fn pull_arrow(&self) -> Option<Arrow> {
        pull_arrow(&self.position)
    }
}

/// A display arrow: unit `direction` drawn from `origin` for `length`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub origin: NVec3,
    pub direction: NVec3,
    pub length: f64,
}

impl Arrow {
    pub fn tip(&self) -> NVec3 {
        self.origin + self.direction * self.length
    }
}

/// Arrow along the velocity, `VELOCITY_ARROW_SCALE * |v|` long
/// `None` when the body is at rest
pub fn velocity_arrow(position: &NVec3, velocity: &NVec3) -> Option<Arrow> {
    let direction = direction(velocity)?;
    Some(Arrow {
        origin: *position,
        direction,
        length: magnitude(velocity) * VELOCITY_ARROW_SCALE,
    })
}

/// Arrow from the body toward the origin, fixed length
/// `None` when the body sits on the origin
pub fn pull_arrow(position: &NVec3) -> Option<Arrow> {
    let direction = direction(&-position)?;
    Some(Arrow {
        origin: *position,
        direction,
        length: PULL_ARROW_LENGTH,
    })
}
