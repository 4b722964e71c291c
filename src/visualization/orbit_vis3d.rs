use bevy::prelude::*;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::math::primitives::{Cuboid, Sphere};

use crate::configuration::config::{ScenarioConfig, ViewConfig};
use crate::error::RegistrationError;
use crate::simulation::bodies::ORBITER_RADIUS;
use crate::simulation::display::Arrow;
use crate::simulation::engine::BodyHandle;
use crate::simulation::scenario::Scene;
use crate::simulation::states::NVec3;

/// Component tagging each sphere with the world body it mirrors
#[derive(Component)]
struct BodyMesh(BodyHandle);

#[derive(Resource)]
struct ViewSettings(ViewConfig);

/// Mouse-driven orbit around the origin
#[derive(Component)]
struct OrbitCamera {
    radius: f32,
    yaw: f32,
    pitch: f32,
}

const ARROW_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);
const GRID_COLOR: Color = Color::srgb(0.55, 0.55, 0.6);
const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_STEP: f32 = 0.9;

/// What was left in the world after the scene was torn down on exit
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneReleased {
    pub bodies: usize,
    pub subscriptions: usize,
}

/// Build the scene and open the 3D viewer
/// Registration failure aborts before a window is created; otherwise the
/// app's exit status is returned once the window closes
pub fn run_3d(cfg: &ScenarioConfig) -> Result<AppExit, RegistrationError> {
    let mut app = App::new();
    app.add_plugins(DefaultPlugins);

    // Built after the plugins so scene logging goes through LogPlugin
    let scene = Scene::build_scene(cfg)?;
    info!("run_3d: starting Bevy 3D viewer with {} orbiting bodies", scene.orbiters.len());

    app.insert_non_send_resource(scene)
        .insert_resource(ViewSettings(cfg.view.clone()))
        .insert_resource(ClearColor(parse_color(&cfg.view.background)))
        .insert_resource(AmbientLight {
            color: Color::WHITE,
            brightness: 250.0,
        })
        .add_systems(Startup, setup_3d)
        .add_systems(
            Update,
            (advance_scene, sync_transforms_3d, draw_vectors, draw_grid, orbit_camera)
                .chain()
                .run_if(scene_mounted),
        )
        .add_systems(Last, teardown_on_exit);

    // `run` moves the app into the runner, so teardown happens in `Last`
    Ok(app.run())
}

fn scene_mounted(scene: Option<NonSend<Scene>>) -> bool {
    scene.is_some()
}

/// Unmount every body once an `AppExit` has been sent this frame
fn teardown_on_exit(world: &mut World) {
    let exiting = world
        .get_resource::<Events<AppExit>>()
        .is_some_and(|events| !events.is_empty());
    if !exiting {
        return;
    }
    let Some(scene) = world.remove_non_send_resource::<Scene>() else {
        return;
    };

    let frames = scene.frame;
    let released = scene.teardown();
    info!(
        "viewer closed after {} frames: {} bodies, {} subscriptions left",
        frames,
        released.body_count(),
        released.subscription_count()
    );
    world.insert_resource(SceneReleased {
        bodies: released.body_count(),
        subscriptions: released.subscription_count(),
    });
}

/// Startup system: camera, light, axes and one sphere per body
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scene: NonSend<Scene>,
    view: Res<ViewSettings>,
) {
    let view = &view.0;
    let camera_pos = Vec3::from_array(view.camera);

    commands.spawn((
        Camera3dBundle {
            projection: Projection::Perspective(PerspectiveProjection {
                fov: view.fov.to_radians(),
                near: view.near,
                far: view.far,
                ..Default::default()
            }),
            transform: Transform::from_translation(camera_pos).looking_at(Vec3::ZERO, Vec3::Y),
            ..Default::default()
        },
        OrbitCamera::from_position(camera_pos),
    ));

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            illuminance: 5000.0,
            shadows_enabled: true,
            ..Default::default()
        },
        transform: Transform::from_xyz(-10.0, -10.0, 0.0).looking_at(Vec3::ZERO, Vec3::Z),
        ..Default::default()
    });

    spawn_axes(&mut commands, &mut meshes, &mut materials, view.axes_length);

    // Attractor
    let attractor = &scene.attractor;
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Sphere::new(attractor.radius as f32).mesh()),
            material: materials.add(StandardMaterial {
                base_color: parse_color(&attractor.color),
                ..Default::default()
            }),
            transform: Transform::from_translation(Vec3::ZERO),
            ..Default::default()
        },
        BodyMesh(attractor.handle),
    ));

    // Orbiting bodies
    for o in &scene.orbiters {
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(ORBITER_RADIUS as f32).mesh()),
                material: materials.add(StandardMaterial {
                    base_color: parse_color(&o.color),
                    perceptual_roughness: 0.0,
                    emissive: Color::srgb_u8(0x37, 0x00, 0x37).into(),
                    ..Default::default()
                }),
                transform: Transform::from_translation(to_vec3(&o.state.position)),
                ..Default::default()
            },
            BodyMesh(o.handle),
        ));
    }
}

/// Per-frame hooks, one world step, mailbox drain
fn advance_scene(mut scene: NonSendMut<Scene>) {
    let report = scene.advance_frame();
    if report.forces_skipped > 0 {
        debug!("frame {}: {} orbiter(s) at the origin received no pull", scene.frame, report.forces_skipped);
    }
    if report.bodies_missing > 0 {
        warn!("frame {}: {} orbiter(s) no longer in the world", scene.frame, report.bodies_missing);
    }
}

fn sync_transforms_3d(scene: NonSend<Scene>, mut query: Query<(&BodyMesh, &mut Transform)>) {
    for (BodyMesh(handle), mut transform) in &mut query {
        if let Some(b) = scene.world.body(*handle) {
            let q = b.pose.rotation;
            transform.translation = to_vec3(&b.position());
            transform.rotation = Quat::from_xyzw(q.i as f32, q.j as f32, q.k as f32, q.w as f32);
        }
    }
}

/// Velocity and pull arrows from each orbiter's mirrored state
fn draw_vectors(scene: NonSend<Scene>, mut gizmos: Gizmos) {
    for o in &scene.orbiters {
        for arrow in [o.state.velocity_arrow(), o.state.pull_arrow()].into_iter().flatten() {
            draw_arrow(&mut gizmos, &arrow);
        }
    }
}

fn draw_arrow(gizmos: &mut Gizmos, arrow: &Arrow) {
    gizmos.arrow(to_vec3(&arrow.origin), to_vec3(&arrow.tip()), ARROW_COLOR);
}

/// Square grid in the XY plane, centered on the origin
fn draw_grid(view: Res<ViewSettings>, mut gizmos: Gizmos) {
    let half = view.0.grid_size * 0.5;
    let n = view.0.grid_divisions.max(1);
    let step = view.0.grid_size / n as f32;

    for i in 0..=n {
        let c = -half + i as f32 * step;
        gizmos.line(Vec3::new(c, -half, 0.0), Vec3::new(c, half, 0.0), GRID_COLOR);
        gizmos.line(Vec3::new(-half, c, 0.0), Vec3::new(half, c, 0.0), GRID_COLOR);
    }
}

impl OrbitCamera {
    fn from_position(p: Vec3) -> Self {
        let radius = p.length().max(0.1);
        Self {
            radius,
            yaw: p.x.atan2(p.z),
            pitch: (p.y / radius).clamp(-1.0, 1.0).asin(),
        }
    }

    fn position(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy) * self.radius
    }
}

/// Left-drag rotates, wheel zooms
fn orbit_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    mut query: Query<(&mut OrbitCamera, &mut Transform)>,
) {
    let mut delta = Vec2::ZERO;
    for ev in motion.read() {
        delta += ev.delta;
    }
    if !buttons.pressed(MouseButton::Left) {
        delta = Vec2::ZERO;
    }
    let scroll: f32 = wheel.read().map(|ev| ev.y).sum();

    if delta == Vec2::ZERO && scroll == 0.0 {
        return;
    }

    for (mut cam, mut transform) in &mut query {
        cam.yaw -= delta.x * ORBIT_SENSITIVITY;
        cam.pitch = (cam.pitch + delta.y * ORBIT_SENSITIVITY).clamp(-1.5, 1.5);
        if scroll != 0.0 {
            cam.radius = (cam.radius * ZOOM_STEP.powf(scroll)).clamp(1.0, 90.0);
        }
        *transform = Transform::from_translation(cam.position()).looking_at(Vec3::ZERO, Vec3::Y);
    }
}

fn to_vec3(v: &NVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

/// CSS-style names used by the demo scenes, or a hex string
fn parse_color(s: &str) -> Color {
    match s.to_ascii_lowercase().as_str() {
        "red" => Color::srgb(1.0, 0.0, 0.0),
        "green" => Color::srgb(0.0, 0.5, 0.0),
        "blue" => Color::srgb(0.0, 0.0, 1.0),
        "orange" => Color::srgb(1.0, 0.647, 0.0),
        "yellow" => Color::srgb(1.0, 1.0, 0.0),
        "purple" => Color::srgb(0.5, 0.0, 0.5),
        "white" => Color::WHITE,
        "black" => Color::BLACK,
        other => match Srgba::hex(other) {
            Ok(c) => c.into(),
            Err(_) => {
                warn!("unknown color {:?}, using white", s);
                Color::WHITE
            }
        },
    }
}

// =========================================================================================
// Draw 3D axes for visual reference
// =========================================================================================

/// Thin boxes along +X, +Y, +Z starting at the origin
fn spawn_axes(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    axis_len: f32,
) {
    let t = 0.02;
    let half = axis_len * 0.5;

    let axes = [
        (Cuboid::new(axis_len, t, t), Vec3::new(half, 0.0, 0.0), Color::srgb(1.0, 0.0, 0.0)),
        (Cuboid::new(t, axis_len, t), Vec3::new(0.0, half, 0.0), Color::srgb(0.0, 1.0, 0.0)),
        (Cuboid::new(t, t, axis_len), Vec3::new(0.0, 0.0, half), Color::srgb(0.0, 0.0, 1.0)),
    ];

    for (shape, center, color) in axes {
        commands.spawn(PbrBundle {
            mesh: meshes.add(shape.mesh()),
            material: materials.add(StandardMaterial {
                base_color: color,
                unlit: true,
                ..Default::default()
            }),
            transform: Transform::from_translation(center),
            ..Default::default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_camera_round_trips_start_position() {
        let cam = OrbitCamera::from_position(Vec3::new(0.0, 0.0, 10.0));
        assert!((cam.position() - Vec3::new(0.0, 0.0, 10.0)).length() < 1e-4);
    }

    fn app_with_scene() -> App {
        let mut app = App::new();
        app.insert_non_send_resource(Scene::build_scene(&ScenarioConfig::default()).unwrap())
            .add_systems(Update, advance_scene.run_if(scene_mounted))
            .add_systems(Last, teardown_on_exit);
        app
    }

    #[test]
    fn exit_tears_scene_down() {
        let mut app = app_with_scene();
        app.update();
        assert!(app.world().get_non_send_resource::<Scene>().is_some());
        assert!(app.world().get_resource::<SceneReleased>().is_none());

        app.world_mut().send_event(AppExit::Success);
        app.update();

        assert!(app.world().get_non_send_resource::<Scene>().is_none());
        assert_eq!(
            app.world().get_resource::<SceneReleased>(),
            Some(&SceneReleased { bodies: 0, subscriptions: 0 })
        );

        // Frames after teardown skip the scene systems instead of panicking
        app.update();
    }

    #[test]
    fn hex_and_named_colors() {
        assert_eq!(parse_color("#EBECF2"), Color::srgb_u8(0xEB, 0xEC, 0xF2));
        assert_eq!(parse_color("Blue"), Color::srgb(0.0, 0.0, 1.0));
    }
}
