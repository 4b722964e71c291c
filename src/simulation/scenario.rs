//! Build a fully-mounted scene from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle:
//! - numerical parameters (`Parameters`)
//! - the rigid-body world (`PhysicsWorld`)
//! - the single attractor and every orbiting body, already registered
//!
//! The viewer and the headless runner insert the scene as a non-send
//! resource; the channel receivers inside each orbiter pin it to the
//! thread that drives the frame loop.

use bevy::log::{info, warn};

use crate::configuration::config::ScenarioConfig;
use crate::error::RegistrationError;
use crate::simulation::bodies::{AttractorBody, FrameHook, FrameOutcome, OrbitingBody, ORBITER_MASS};
use crate::simulation::engine::PhysicsWorld;
use crate::simulation::params::Parameters;
use crate::simulation::states::NVec3;

/// Below this attractor/orbiter mass ratio the anchor visibly drifts
pub const MIN_MASS_RATIO: f64 = 1000.0;

pub struct Scene {
    pub parameters: Parameters,
    pub world: PhysicsWorld,
    pub attractor: AttractorBody,
    pub orbiters: Vec<OrbitingBody>,
    pub frame: u64,
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameReport {
    pub forces_applied: usize,
    pub forces_skipped: usize,  // body at the origin, no direction to pull along
    pub bodies_missing: usize,  // handle no longer in the world
    pub updates_received: usize,
}

impl Scene {
    /// Mount the attractor first, then each orbiter
    /// Any registration failure aborts construction
    pub fn build_scene(cfg: &ScenarioConfig) -> Result<Self, RegistrationError> {
        let p_cfg = &cfg.parameters;
        let parameters = Parameters {
            dt: p_cfg.dt,
            gravity: NVec3::from(p_cfg.gravity),
            frames: p_cfg.frames,
        };

        let mut world = PhysicsWorld::new(parameters.gravity);
        let attractor = AttractorBody::mount(&mut world, &cfg.attractor)?;

        if attractor.mass / ORBITER_MASS < MIN_MASS_RATIO {
            warn!(
                "attractor mass {} is not much larger than orbiter mass {}; the anchor will move",
                attractor.mass, ORBITER_MASS
            );
        }

        let orbiters = cfg
            .orbiters
            .iter()
            .map(|o| OrbitingBody::mount(&mut world, o))
            .collect::<Result<Vec<_>, _>>()?;

        info!("scene built with {} orbiting bodies", orbiters.len());

        Ok(Self {
            parameters,
            world,
            attractor,
            orbiters,
            frame: 0,
        })
    }

    /// One frame: every frame hook submits its force, the world steps once,
    /// then every orbiter drains its mailbox
    pub fn advance_frame(&mut self) -> FrameReport {
        let mut report = FrameReport::default();

        for o in self.orbiters.iter_mut() {
            match o.on_frame(&mut self.world) {
                FrameOutcome::Applied(_) => report.forces_applied += 1,
                FrameOutcome::AtOrigin => report.forces_skipped += 1,
                FrameOutcome::Detached => report.bodies_missing += 1,
            }
        }

        self.world.step(self.parameters.dt);

        for o in self.orbiters.iter_mut() {
            report.updates_received += o.sync();
        }

        self.frame += 1;
        report
    }

    /// Unmount orbiters (subscriptions first), then the attractor
    pub fn teardown(self) -> PhysicsWorld {
        let Scene {
            mut world,
            attractor,
            orbiters,
            ..
        } = self;

        for o in orbiters {
            o.unmount(&mut world);
        }
        attractor.unmount(&mut world);
        world
    }
}
