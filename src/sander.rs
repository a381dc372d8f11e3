//! The sanding end effector.
//!
//! The tool has no actuation. What it contributes is its collision geometry: a handful of
//! boxes, capsules and spheres measured off the CAD model, every offset taken from the face
//! that bolts onto the arm flange. The layout flags in [`SanderConfig`] only pick which table
//! of parts gets built.

use std::sync::Arc;

use async_trait::async_trait;
use nalgebra::{vector, Vector3};
use tracing::{debug, info, instrument};

use crate::config::{Layout, ResourceConfig, SanderConfig};
use crate::error::{Result, ToolError};
use crate::frame::KinematicModel;
use crate::gripper::{Extra, Gripper};
use crate::spatial::{Geometry, OrientationVector, Pose};

/// Sanding block thickness (local X).
pub const BLOCK_THICKNESS: f64 = 38.0;
/// Sanding block width (local Y).
pub const BLOCK_WIDTH: f64 = 70.0;
/// Sanding block length (local Z, laid along the mounting face Y axis).
pub const BLOCK_LENGTH: f64 = 270.0;
pub const BLOCK_DIMS: Vector3<f64> = vector![BLOCK_THICKNESS, BLOCK_WIDTH, BLOCK_LENGTH];

/// Mounting face to the sanding block.
pub const TOTAL_LENGTH: f64 = 105.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum PartShape {
    Box { dims: Vector3<f64> },
    Sphere { radius: f64 },
    Capsule { radius: f64, length: f64 },
}

/// One row of a layout table.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Part {
    label: &'static str,
    point: Vector3<f64>,
    shape: PartShape,
}

// Clamp and pivot are 300 x 110 x 50 bodies; the capsule radii are best fits.
const INTERNAL_CLAMP: Part = Part {
    label: "internal-clamp",
    // middle of the clamp height
    point: vector![0.0, 0.0, -11.0],
    shape: PartShape::Capsule {
        radius: 27.5,
        length: 245.0,
    },
};

const PIVOT: Part = Part {
    label: "pivot",
    // far face of the pivot
    point: vector![0.0, 0.0, 51.475],
    shape: PartShape::Capsule {
        radius: 40.0,
        length: 220.0,
    },
};

const BLOCK: Part = Part {
    label: "block",
    point: vector![0.0, 0.0, TOTAL_LENGTH],
    shape: PartShape::Box { dims: BLOCK_DIMS },
};

const BLOCK_CAPSULE: Part = Part {
    label: "block",
    point: vector![0.0, 0.0, TOTAL_LENGTH],
    shape: PartShape::Capsule {
        radius: BLOCK_WIDTH / 2.0,
        length: BLOCK_LENGTH,
    },
};

// Ballpark: half way up the block, at one end.
const HOSE: Part = Part {
    label: "hose",
    point: vector![0.0, BLOCK_LENGTH / 2.0, TOTAL_LENGTH - BLOCK_THICKNESS / 2.0],
    shape: PartShape::Sphere { radius: 25.0 },
};

const STANDARD_PARTS: &[Part] = &[PIVOT, BLOCK, HOSE];
const CAPSULE_PARTS: &[Part] = &[PIVOT, BLOCK_CAPSULE, HOSE];
const EXPANDED_PARTS: &[Part] = &[INTERNAL_CLAMP, PIVOT, BLOCK, HOSE];

fn parts(layout: Layout) -> &'static [Part] {
    match layout {
        Layout::Standard => STANDARD_PARTS,
        Layout::Capsules => CAPSULE_PARTS,
        Layout::Expanded => EXPANDED_PARTS,
    }
}

impl Part {
    fn build(&self) -> Result<Geometry> {
        let at = |e| ToolError::geometry(self.label, e);
        // every part lies along the mounting face Y axis
        let orientation = OrientationVector::new(0.0, 1.0, 0.0, 0.0).map_err(at)?;
        let pose = Pose::new(self.point, orientation);

        match self.shape {
            PartShape::Box { dims } => Geometry::new_box(pose, dims, self.label),
            PartShape::Sphere { radius } => Geometry::new_sphere(pose, radius, self.label),
            PartShape::Capsule { radius, length } => {
                Geometry::new_capsule(pose, radius, length, self.label)
            }
        }
        .map_err(at)
    }
}

/// Builds every part in order, stopping at the first failure.
fn build_parts(parts: &[Part]) -> Result<Vec<Geometry>> {
    parts.iter().map(Part::build).collect()
}

/// Geometry provider for the sander.
///
/// Built once from its configuration; the geometry never changes afterwards.
#[derive(Debug)]
pub struct SanderEe {
    name: String,
    layout: Layout,
    geometries: Arc<[Geometry]>,
}

impl SanderEe {
    /// Builds the sander described by `conf`.
    ///
    /// Either every primitive is built or the whole construction fails with the label of the
    /// primitive that could not be made.
    #[instrument(skip_all, fields(name = %conf.name))]
    pub fn new(conf: &ResourceConfig) -> Result<Self> {
        let layout = SanderConfig::from_resource(conf).layout();
        let geometries = build_parts(parts(layout))?;

        info!(
            ?layout,
            primitives = geometries.len(),
            "sander end effector built"
        );

        Ok(Self {
            name: conf.name.clone(),
            layout,
            geometries: geometries.into(),
        })
    }

    /// [`crate::registry::Constructor`] for this model.
    pub fn constructor(conf: &ResourceConfig) -> Result<Arc<dyn Gripper>> {
        Ok(Arc::new(Self::new(conf)?))
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }
}

#[async_trait]
impl Gripper for SanderEe {
    fn name(&self) -> &str {
        &self.name
    }

    async fn open(&self, _extra: &Extra) -> Result<()> {
        debug!(name = %self.name, "open: nothing to actuate");
        Ok(())
    }

    async fn grab(&self, _extra: &Extra) -> Result<bool> {
        debug!(name = %self.name, "grab: nothing to actuate");
        Ok(false)
    }

    async fn stop(&self, _extra: &Extra) -> Result<()> {
        Ok(())
    }

    async fn is_moving(&self) -> Result<bool> {
        Ok(false)
    }

    async fn geometries(&self, _extra: &Extra) -> Result<Arc<[Geometry]>> {
        Ok(Arc::clone(&self.geometries))
    }

    fn model_frame(&self) -> KinematicModel {
        KinematicModel::new(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryError;
    use crate::spatial::{Shape, ShapeKind};

    fn kinds(geoms: &[Geometry]) -> Vec<ShapeKind> {
        geoms.iter().map(Geometry::kind).collect()
    }

    fn labels(geoms: &[Geometry]) -> Vec<&str> {
        geoms.iter().map(Geometry::label).collect()
    }

    fn sander(conf: ResourceConfig) -> SanderEe {
        SanderEe::new(&conf).expect("built-in layouts are valid")
    }

    #[tokio::test]
    async fn standard_layout_has_one_of_each_shape() {
        let s = sander(ResourceConfig::named("sander"));
        let geoms = s.geometries(&Extra::new()).await.expect("geometries");

        assert_eq!(s.layout(), Layout::Standard);
        assert_eq!(
            kinds(&geoms),
            vec![ShapeKind::Capsule, ShapeKind::Box, ShapeKind::Sphere]
        );
        assert_eq!(labels(&geoms), vec!["pivot", "block", "hose"]);
    }

    #[tokio::test]
    async fn standard_block_matches_measured_dimensions() {
        let s = sander(ResourceConfig::named("sander"));
        let geoms = s.geometries(&Extra::new()).await.expect("geometries");
        let block = geoms
            .iter()
            .find(|g| g.label() == "block")
            .expect("block present");

        assert_eq!(block.box_dims(), Some(vector![38.0, 70.0, 270.0]));
        assert_eq!(block.pose().point, vector![0.0, 0.0, 105.0]);
        assert_eq!(block.pose().orientation.o_y, 1.0);
    }

    #[tokio::test]
    async fn hose_sits_at_the_block_end() {
        let s = sander(ResourceConfig::named("sander"));
        let geoms = s.geometries(&Extra::new()).await.expect("geometries");
        let hose = geoms.iter().find(|g| g.label() == "hose").expect("hose");

        assert_eq!(hose.pose().point, vector![0.0, 135.0, 86.0]);
        assert_eq!(*hose.shape(), Shape::Sphere { radius: 25.0 });
    }

    #[tokio::test]
    async fn capsule_layout_has_no_box() {
        let s = sander(ResourceConfig::named("sander").with_attribute("capsules", true));
        let geoms = s.geometries(&Extra::new()).await.expect("geometries");

        assert_eq!(s.layout(), Layout::Capsules);
        assert!(!kinds(&geoms).contains(&ShapeKind::Box));
        assert_eq!(
            kinds(&geoms),
            vec![ShapeKind::Capsule, ShapeKind::Capsule, ShapeKind::Sphere]
        );
        assert_eq!(
            *geoms[1].shape(),
            Shape::Capsule {
                radius: 35.0,
                length: 270.0
            }
        );
    }

    #[tokio::test]
    async fn standard_layout_has_a_single_capsule() {
        let s = sander(ResourceConfig::named("sander"));
        let geoms = s.geometries(&Extra::new()).await.expect("geometries");
        let capsules = kinds(&geoms)
            .into_iter()
            .filter(|k| *k == ShapeKind::Capsule)
            .count();
        assert_eq!(capsules, 1);
    }

    #[tokio::test]
    async fn expanded_layout_adds_the_internal_clamp() {
        let s = sander(ResourceConfig::named("sander").with_attribute("fancy", true));
        let geoms = s.geometries(&Extra::new()).await.expect("geometries");

        assert_eq!(s.layout(), Layout::Expanded);
        assert_eq!(labels(&geoms), vec!["internal-clamp", "pivot", "block", "hose"]);
        assert_eq!(
            *geoms[0].shape(),
            Shape::Capsule {
                radius: 27.5,
                length: 245.0
            }
        );
        assert_eq!(geoms[0].pose().point, vector![0.0, 0.0, -11.0]);
        assert_eq!(geoms[1].pose().point, vector![0.0, 0.0, 51.475]);
    }

    #[tokio::test]
    async fn repeated_queries_return_the_same_geometry() {
        let s = sander(ResourceConfig::named("sander").with_attribute("fancy", true));
        let first = s.geometries(&Extra::new()).await.expect("geometries");
        let second = s.geometries(&Extra::new()).await.expect("geometries");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first, second);
    }

    #[test]
    fn degenerate_part_fails_the_whole_build() {
        let bad = Part {
            label: "worn-pad",
            point: Vector3::zeros(),
            shape: PartShape::Sphere { radius: 0.0 },
        };
        let err = build_parts(&[PIVOT, bad, HOSE]).expect_err("zero radius");

        match err {
            ToolError::Geometry { label, source } => {
                assert_eq!(label, "worn-pad");
                assert_eq!(source, GeometryError::InvalidRadius(0.0));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn negative_capsule_length_names_the_part() {
        let bad = Part {
            label: "arm",
            point: Vector3::zeros(),
            shape: PartShape::Capsule {
                radius: 5.0,
                length: -1.0,
            },
        };
        let err = build_parts(&[bad]).expect_err("negative length");
        assert!(err.to_string().contains("`arm`"), "{err}");
    }

    #[test]
    fn mistyped_attributes_fall_back_to_standard_layout() {
        let conf = ResourceConfig::named("sander")
            .with_attribute("capsules", "true")
            .with_attribute("fancy", 3);
        let s = SanderEe::new(&conf).expect("attributes never fail construction");
        assert_eq!(s.layout(), Layout::Standard);
        assert_eq!(s.geometries.len(), 3);
    }

    #[tokio::test]
    async fn actuation_is_inert() {
        let s = sander(ResourceConfig::named("sander"));
        let extra = Extra::new();

        s.open(&extra).await.expect("open succeeds");
        assert!(!s.grab(&extra).await.expect("grab succeeds"));
        s.stop(&extra).await.expect("stop succeeds");
        assert!(!s.is_moving().await.expect("is_moving succeeds"));
        s.close().await.expect("close succeeds");
    }

    #[tokio::test]
    async fn do_command_is_unimplemented() {
        let s = sander(ResourceConfig::named("sander"));
        let err = s.do_command(&Extra::new()).await.expect_err("no commands");
        assert!(matches!(err, ToolError::Unimplemented));
    }

    #[test]
    fn identity_and_frame_follow_the_resource_name() {
        let s = sander(ResourceConfig::named("foo"));
        assert_eq!(s.name(), "foo");

        let frame = s.model_frame();
        assert_eq!(frame.name(), "foo");
        assert_eq!(frame.dof(), 0);
    }
}
