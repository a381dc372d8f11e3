//! The host's gripper capability contract.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, ToolError};
use crate::frame::KinematicModel;
use crate::spatial::Geometry;

/// Extra, model-specific arguments passed along with a request.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Operations every gripper-like tool must answer.
///
/// Tools without actuation implement the motion calls as no-ops; that is the expected
/// behavior, not a gap.
#[async_trait]
pub trait Gripper: Send + Sync {
    /// Resource name from the configuration.
    fn name(&self) -> &str;

    /// Opens the gripper.
    async fn open(&self, extra: &Extra) -> Result<()>;

    /// Closes on an object. `true` if something was grabbed.
    async fn grab(&self, extra: &Extra) -> Result<bool>;

    async fn stop(&self, extra: &Extra) -> Result<()>;

    async fn is_moving(&self) -> Result<bool>;

    /// Collision geometry, relative to the mounting face.
    ///
    /// The returned slice is shared; repeated calls on one instance hand back the same one.
    async fn geometries(&self, extra: &Extra) -> Result<Arc<[Geometry]>>;

    fn model_frame(&self) -> KinematicModel;

    async fn do_command(&self, _cmd: &Extra) -> Result<Extra> {
        Err(ToolError::Unimplemented)
    }

    /// Releases whatever the resource holds.
    async fn close(&self) -> Result<()> {
        debug!(name = self.name(), "closing");
        Ok(())
    }
}
