use orbitsim::configuration::config::{AttractorConfig, OrbiterConfig, ScenarioConfig};
use orbitsim::simulation::bodies::{AttractorBody, FrameHook, FrameOutcome, OrbitingBody};
use orbitsim::simulation::display::{pull_arrow, velocity_arrow};
use orbitsim::simulation::engine::PhysicsWorld;
use orbitsim::simulation::forces::pull_toward_origin;
use orbitsim::simulation::scenario::Scene;
use orbitsim::simulation::states::NVec3;
use orbitsim::RegistrationError;

use std::sync::mpsc;

/// Scene with one orbiter at `x` moving with `v`
pub fn single_orbiter(x: [f64; 3], v: [f64; 3]) -> ScenarioConfig {
    ScenarioConfig {
        orbiters: vec![OrbiterConfig {
            position: x,
            velocity: v,
            color: "blue".to_string(),
        }],
        ..Default::default()
    }
}

/// Sample positions spanning several orders of magnitude
pub fn sample_positions() -> Vec<NVec3> {
    vec![
        NVec3::new(5.0, 0.0, 0.0),
        NVec3::new(0.0, -0.01, 0.0),
        NVec3::new(3.0, 4.0, 12.0),
        NVec3::new(-1e4, 2e3, 7.0),
        NVec3::new(1e-6, 1e-6, -1e-6),
    ]
}

// ==================================================================================
// Force tests
// ==================================================================================

#[test]
fn pull_points_at_origin() {
    for p in sample_positions() {
        let f = pull_toward_origin(&p).unwrap();
        let expected = -p.normalize();
        assert!(
            (f.normalize() - expected).norm() < 1e-12,
            "Pull at {:?} is not toward the origin: {:?}",
            p,
            f
        );
    }
}

#[test]
fn pull_magnitude_is_independent_of_distance() {
    for p in sample_positions() {
        let f = pull_toward_origin(&p).unwrap();
        assert!((f.norm() - 2.0).abs() < 1e-12, "Expected |F| = 2 at {:?}, got {}", p, f.norm());
    }

    // Doubling the distance leaves the force unchanged (not inverse-square)
    let near = pull_toward_origin(&NVec3::new(1.0, 0.0, 0.0)).unwrap();
    let far = pull_toward_origin(&NVec3::new(2.0, 0.0, 0.0)).unwrap();
    assert!((near - far).norm() < 1e-12);
}

#[test]
fn pull_at_origin_is_skipped() {
    assert!(pull_toward_origin(&NVec3::zeros()).is_none());
}

// ==================================================================================
// Display vector tests
// ==================================================================================

#[test]
fn velocity_arrow_scales_with_speed() {
    let p = NVec3::new(5.0, 0.0, 0.0);
    let v = NVec3::new(0.0, 3.0, 4.0);
    let arrow = velocity_arrow(&p, &v).unwrap();

    assert_eq!(arrow.origin, p);
    assert!((arrow.length - 10.0).abs() < 1e-12);
    assert!((arrow.direction - v.normalize()).norm() < 1e-12);
}

#[test]
fn pull_arrow_has_fixed_length() {
    for p in sample_positions() {
        let arrow = pull_arrow(&p).unwrap();
        assert_eq!(arrow.origin, p);
        assert!((arrow.length - 2.0).abs() < 1e-12);
        assert!((arrow.direction - (-p).normalize()).norm() < 1e-12);
    }
}

#[test]
fn zero_vectors_have_no_arrow() {
    let p = NVec3::new(5.0, 0.0, 0.0);
    assert!(velocity_arrow(&p, &NVec3::zeros()).is_none());
    assert!(pull_arrow(&NVec3::zeros()).is_none());
}

// ==================================================================================
// Scene tests
// ==================================================================================

#[test]
fn one_tick_pulls_toward_attractor() {
    let cfg = single_orbiter([5.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
    let mut scene = Scene::build_scene(&cfg).unwrap();
    let dt = scene.parameters.dt;

    let orbiter = &mut scene.orbiters[0];
    let cmd = orbiter.on_frame(&mut scene.world).command().unwrap();
    assert!((cmd.force - NVec3::new(-2.0, 0.0, 0.0)).norm() < 1e-12);
    assert_eq!(cmd.local_point, NVec3::zeros());

    scene.world.step(dt);
    scene.orbiters[0].sync();

    let v = scene.orbiters[0].state.velocity;
    assert!(v.x < 0.0, "Velocity x did not move toward the origin: {:?}", v);
    assert!((v.x - (-2.0 / 5.0) * dt).abs() < 1e-12);
    assert!((v.y - 2.0).abs() < 1e-12);

    // The attractor does not move
    let anchor = scene.world.body(scene.attractor.handle).unwrap();
    assert_eq!(anchor.position(), NVec3::zeros());
}

#[test]
fn orbiter_at_origin_receives_no_force() {
    let cfg = single_orbiter([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
    let mut scene = Scene::build_scene(&cfg).unwrap();

    let report = scene.advance_frame();
    assert_eq!(report.forces_applied, 0);
    assert_eq!(report.forces_skipped, 1);
    assert_eq!(report.bodies_missing, 0);

    let state = &scene.orbiters[0].state;
    assert!(state.position.iter().chain(state.velocity.iter()).all(|c| c.is_finite()));
    assert_eq!(state.velocity, NVec3::zeros());
    assert!(state.velocity_arrow().is_none());
    assert!(state.pull_arrow().is_none());
}

#[test]
fn observable_state_tracks_engine_within_one_frame() {
    let cfg = single_orbiter([5.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
    let mut scene = Scene::build_scene(&cfg).unwrap();

    for _ in 0..120 {
        let report = scene.advance_frame();
        assert_eq!(report.updates_received, 2);

        let o = &scene.orbiters[0];
        let body = scene.world.body(o.handle).unwrap();
        assert_eq!(o.state.position, body.position());
        assert_eq!(o.state.velocity, body.v);
    }
}

#[test]
fn forces_are_not_cached_across_frames() {
    let cfg = single_orbiter([5.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
    let mut scene = Scene::build_scene(&cfg).unwrap();
    let dt = scene.parameters.dt;

    scene.advance_frame();
    let v1 = scene.orbiters[0].state.velocity;

    // Step without running the frame hook: no force should remain
    scene.world.step(dt);
    scene.orbiters[0].sync();
    let v2 = scene.orbiters[0].state.velocity;

    assert!((v1 - v2).norm() < 1e-12, "Stale force persisted: {:?} -> {:?}", v1, v2);
}

#[test]
fn pull_bends_trajectory_and_keeps_body_bound() {
    let cfg = single_orbiter([5.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
    let mut scene = Scene::build_scene(&cfg).unwrap();

    let mut max_r: f64 = 0.0;
    for _ in 0..1200 {
        scene.advance_frame();
        max_r = max_r.max(scene.orbiters[0].state.position.norm());
    }

    // Speed 2 at r = 5 is below the escape speed of a constant pull of 2/5
    assert!(max_r < 10.0, "Body escaped: max r = {}", max_r);
}

#[test]
fn removed_body_is_reported_missing_not_at_origin() {
    let cfg = single_orbiter([5.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
    let mut scene = Scene::build_scene(&cfg).unwrap();

    let handle = scene.orbiters[0].handle;
    scene.world.remove_body(handle);
    assert_eq!(scene.orbiters[0].on_frame(&mut scene.world), FrameOutcome::Detached);

    let report = scene.advance_frame();
    assert_eq!(report.forces_applied, 0);
    assert_eq!(report.forces_skipped, 0);
    assert_eq!(report.bodies_missing, 1);
    assert_eq!(report.updates_received, 0);
}

#[test]
fn scene_rejects_invalid_attractor() {
    let mut cfg = single_orbiter([5.0, 0.0, 0.0], [0.0, 2.0, 0.0]);
    cfg.attractor.radius = 0.0;
    assert!(matches!(Scene::build_scene(&cfg), Err(RegistrationError::InvalidRadius(_))));
}

#[test]
fn scene_rejects_non_finite_orbiter() {
    let cfg = single_orbiter([f64::INFINITY, 0.0, 0.0], [0.0, 2.0, 0.0]);
    assert!(matches!(Scene::build_scene(&cfg), Err(RegistrationError::NonFiniteState)));
}

// ==================================================================================
// Lifecycle tests
// ==================================================================================

#[test]
fn unmount_releases_body_and_subscriptions() {
    let mut world = PhysicsWorld::default();
    let attractor = AttractorBody::mount(&mut world, &AttractorConfig::default()).unwrap();
    let orbiter = OrbitingBody::mount(&mut world, &OrbiterConfig::default()).unwrap();
    let handle = orbiter.handle;

    assert_eq!(world.body_count(), 2);
    assert_eq!(world.subscription_count(), 2);

    orbiter.unmount(&mut world);
    assert_eq!(world.subscription_count(), 0);
    assert!(world.body(handle).is_none());

    attractor.unmount(&mut world);
    assert_eq!(world.body_count(), 0);
}

#[test]
fn unsubscribed_channel_receives_nothing_more() {
    let mut world = PhysicsWorld::default();
    let orbiter = OrbitingBody::mount(&mut world, &OrbiterConfig::default()).unwrap();

    let (tx, rx) = mpsc::channel();
    let sub = world.subscribe_position(orbiter.handle, tx).unwrap();
    world.step(0.1);
    assert!(rx.try_recv().is_ok());

    assert!(world.unsubscribe(sub));
    world.step(0.1);
    assert!(rx.try_recv().is_err());

    orbiter.unmount(&mut world);
}

#[test]
fn teardown_empties_world() {
    let cfg = ScenarioConfig::default();
    let mut scene = Scene::build_scene(&cfg).unwrap();
    scene.advance_frame();

    let mut world = scene.teardown();
    assert_eq!(world.body_count(), 0);
    assert_eq!(world.subscription_count(), 0);

    // Stepping an empty world is a no-op apart from time
    world.step(0.1);
    assert!((world.t - (0.1 + cfg.parameters.dt)).abs() < 1e-12);
}

#[test]
fn default_orbiter_config() {
    let o = OrbiterConfig::default();
    assert_eq!(o.position, [6.0, 0.0, 0.0]);
    assert_eq!(o.velocity, [0.0, 8.0, 0.0]);
    assert_eq!(o.color, "red");
}
