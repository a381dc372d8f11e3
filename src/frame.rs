//! Kinematic description of the tool for the motion planner.

use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};

/// A single rigid link with no joints.
///
/// The planner attaches the tool's geometry to the arm's end frame through this model; since
/// nothing on the sander moves, its transform is always the identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KinematicModel {
    name: String,
}

impl KinematicModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Degrees of freedom.
    pub fn dof(&self) -> usize {
        0
    }

    /// Transform from the mounting face to the link frame.
    pub fn transform(&self) -> Isometry3<f64> {
        Isometry3::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_link_has_no_joints() {
        let model = KinematicModel::new("sander");
        assert_eq!(model.name(), "sander");
        assert_eq!(model.dof(), 0);
        assert_eq!(model.transform(), Isometry3::identity());
    }
}
