pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod error;

pub use simulation::states::{NVec3, NMat4, Shape, RigidBody, RigidBodyDesc, ForceCommand};
pub use simulation::engine::{PhysicsWorld, BodyHandle, SubscriptionHandle};
pub use simulation::forces::{pull_toward_origin, centripetal_command, PULL_GAIN};
pub use simulation::display::{Arrow, ObservableVectorState, velocity_arrow, pull_arrow};
pub use simulation::bodies::{AttractorBody, OrbitingBody, FrameHook, FrameOutcome};
pub use simulation::scenario::{Scene, FrameReport};
pub use error::RegistrationError;

pub use configuration::config::{ScenarioConfig, ParametersConfig, AttractorConfig, OrbiterConfig, ViewConfig};

pub use visualization::{orbit_vis3d::{run_3d, SceneReleased}, headless::run_headless};
