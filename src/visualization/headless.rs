//! Windowless runner
//!
//! Drives the same per-frame system as the viewer under `MinimalPlugins`
//! for a fixed number of frames, then tears the scene down.

use bevy::log::LogPlugin;
use bevy::prelude::*;

use crate::configuration::config::ScenarioConfig;
use crate::error::RegistrationError;
use crate::simulation::scenario::Scene;
use crate::simulation::states::NVec3;

/// Final mirrored state of one orbiter
#[derive(Debug, Clone)]
pub struct OrbiterSummary {
    pub position: NVec3,
    pub velocity: NVec3,
}

#[derive(Debug, Clone)]
pub struct HeadlessSummary {
    pub frames: u64,
    pub simulated_time: f64,
    pub orbiters: Vec<OrbiterSummary>,
}

/// Log every this many frames
const PROGRESS_EVERY: u64 = 60;

pub fn run_headless(cfg: &ScenarioConfig, frames: u64) -> Result<HeadlessSummary, RegistrationError> {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));

    let scene = Scene::build_scene(cfg)?;
    info!("run_headless: {} frames at dt = {}", frames, scene.parameters.dt);

    app.insert_non_send_resource(scene)
        .add_systems(Update, (advance_scene, log_progress).chain());
    app.finish();
    app.cleanup();

    for _ in 0..frames {
        app.update();
    }

    let scene = app
        .world_mut()
        .remove_non_send_resource::<Scene>()
        .expect("scene resource inserted before the frame loop");

    let summary = HeadlessSummary {
        frames: scene.frame,
        simulated_time: scene.world.t,
        orbiters: scene
            .orbiters
            .iter()
            .map(|o| OrbiterSummary {
                position: o.state.position,
                velocity: o.state.velocity,
            })
            .collect(),
    };

    let world = scene.teardown();
    info!(
        "scene torn down: {} bodies, {} subscriptions left",
        world.body_count(),
        world.subscription_count()
    );

    Ok(summary)
}

fn advance_scene(mut scene: NonSendMut<Scene>) {
    scene.advance_frame();
}

fn log_progress(scene: NonSend<Scene>) {
    if scene.frame % PROGRESS_EVERY != 0 {
        return;
    }
    for (i, o) in scene.orbiters.iter().enumerate() {
        let p = o.state.position;
        let v = o.state.velocity;
        info!(
            "frame {:5} orbiter {}: |p| = {:.4}, |v| = {:.4}, p = [{:.3}, {:.3}, {:.3}]",
            scene.frame,
            i,
            p.norm(),
            v.norm(),
            p.x,
            p.y,
            p.z
        );
    }
}
