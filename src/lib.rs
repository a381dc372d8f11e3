//! Sander end effector module.
//!
//! This crate describes the collision geometry of a passive sanding tool mounted on a robot
//! arm, and exposes it through the host's gripper capability contract:
//! - [`SanderEe`]: builds the tool's boxes, capsules and spheres once and hands them out unchanged.
//! - [`Gripper`]: the async contract every gripper-like tool implements.
//! - [`Registry`] and [`register_models`]: explicit model registration done at startup.
//! - [`Module`]: the local-socket loop the host talks to.
//!
//! Nothing on the tool moves, so open/grab/stop are deliberate no-ops.

pub mod config;
pub mod error;
pub mod frame;
pub mod gripper;
pub mod module;
pub mod registry;
pub mod sander;
pub mod spatial;

pub use config::{Layout, ResourceConfig, SanderConfig};
pub use error::{GeometryError, Result, ToolError};
pub use frame::KinematicModel;
pub use gripper::{Extra, Gripper};
pub use module::Module;
pub use registry::{Api, Model, Registry};
pub use sander::SanderEe;
pub use spatial::{Geometry, OrientationVector, Pose, Shape, ShapeKind};

/// Model identifier the sander registers under: `rand:sander-ee:sander-ee`.
pub fn sander_model() -> Model {
    Model::new("rand", "sander-ee", "sander-ee")
}

/// Installs the stderr log subscriber used by the binaries.
///
/// Honors `RUST_LOG`, defaulting to `info`. A second call leaves the first subscriber in place.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Registers every model this crate provides.
pub fn register_models(registry: &mut Registry) {
    registry.register(Api::gripper(), sander_model(), SanderEe::constructor);
}
