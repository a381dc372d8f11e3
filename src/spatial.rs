//! Spatial primitives used to describe the tool's occupied volume.
//!
//! Lengths are millimeters. Every pose is relative to the face that mates with the arm
//! flange, so there is exactly one reference frame for the whole tool.
//!
//! - [`OrientationVector`]: a pointing direction plus a spin about it, in degrees.
//! - [`Pose`]: translation + orientation.
//! - [`Geometry`]: a labelled box, sphere or capsule placed at a [`Pose`].

use nalgebra::{Isometry3, Translation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

/// Below this distance from a pole the longitude is undefined and forced to zero.
const POLE_EPSILON: f64 = 1e-4;

/// Orientation as a unit direction (`o_x`, `o_y`, `o_z`) and a rotation `theta` (degrees)
/// about that direction.
///
/// The direction is where the local Z axis of the primitive ends up. Build it with
/// [`OrientationVector::new`] so the direction is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OrientationVector {
    pub o_x: f64,
    pub o_y: f64,
    pub o_z: f64,
    pub theta: f64,
}

impl OrientationVector {
    /// Builds a normalized orientation vector. Fails on a zero direction.
    pub fn new(o_x: f64, o_y: f64, o_z: f64, theta: f64) -> Result<Self, GeometryError> {
        let norm = Vector3::new(o_x, o_y, o_z).norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(GeometryError::ZeroOrientation);
        }
        Ok(Self {
            o_x: o_x / norm,
            o_y: o_y / norm,
            o_z: o_z / norm,
            theta,
        })
    }

    /// No rotation: local Z stays on Z.
    pub fn identity() -> Self {
        Self {
            o_x: 0.0,
            o_y: 0.0,
            o_z: 1.0,
            theta: 0.0,
        }
    }

    /// Converts to a quaternion via ZYZ Euler angles (longitude, latitude, theta).
    pub fn to_quaternion(&self) -> UnitQuaternion<f64> {
        let lat = self.o_z.clamp(-1.0, 1.0).acos();
        let lon = if 1.0 - self.o_z.abs() > POLE_EPSILON {
            self.o_y.atan2(self.o_x)
        } else {
            0.0
        };
        let theta = self.theta.to_radians();

        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), lon)
            * UnitQuaternion::from_axis_angle(&Vector3::y_axis(), lat)
            * UnitQuaternion::from_axis_angle(&Vector3::z_axis(), theta)
    }

    /// The direction the local Z axis is rotated onto.
    pub fn axis(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(Vector3::new(self.o_x, self.o_y, self.o_z))
    }
}

impl Default for OrientationVector {
    fn default() -> Self {
        Self::identity()
    }
}

/// A rigid transform relative to the mounting face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pose {
    pub point: Vector3<f64>,
    pub orientation: OrientationVector,
}

impl Pose {
    pub fn new(point: Vector3<f64>, orientation: OrientationVector) -> Self {
        Self { point, orientation }
    }

    /// The mounting face itself.
    pub fn identity() -> Self {
        Self::new(Vector3::zeros(), OrientationVector::identity())
    }

    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.point),
            self.orientation.to_quaternion(),
        )
    }
}

/// Finite and strictly positive. Rejects NaN and infinity.
fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Which solid a [`Geometry`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Box,
    Sphere,
    Capsule,
}

/// Shape-specific dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Stored as half-extents; constructed from full extents.
    Box { half_extents: Vector3<f64> },
    Sphere { radius: f64 },
    /// Capsule along its local Z axis. `length` is end to end, caps included.
    Capsule { radius: f64, length: f64 },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Box { .. } => ShapeKind::Box,
            Shape::Sphere { .. } => ShapeKind::Sphere,
            Shape::Capsule { .. } => ShapeKind::Capsule,
        }
    }
}

/// One collision primitive of the tool.
///
/// Immutable once built; the only way to get one is through the validating constructors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    label: String,
    pose: Pose,
    shape: Shape,
}

impl Geometry {
    /// A box with full extents `dims`.
    pub fn new_box(
        pose: Pose,
        dims: Vector3<f64>,
        label: impl Into<String>,
    ) -> Result<Self, GeometryError> {
        if !dims.iter().all(|d| is_positive(*d)) {
            return Err(GeometryError::InvalidDimensions {
                x: dims.x,
                y: dims.y,
                z: dims.z,
            });
        }
        Ok(Self {
            label: label.into(),
            pose,
            shape: Shape::Box {
                half_extents: dims / 2.0,
            },
        })
    }

    pub fn new_sphere(
        pose: Pose,
        radius: f64,
        label: impl Into<String>,
    ) -> Result<Self, GeometryError> {
        if !is_positive(radius) {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(Self {
            label: label.into(),
            pose,
            shape: Shape::Sphere { radius },
        })
    }

    pub fn new_capsule(
        pose: Pose,
        radius: f64,
        length: f64,
        label: impl Into<String>,
    ) -> Result<Self, GeometryError> {
        if !is_positive(radius) {
            return Err(GeometryError::InvalidRadius(radius));
        }
        if !is_positive(length) {
            return Err(GeometryError::InvalidLength(length));
        }
        if length < 2.0 * radius {
            return Err(GeometryError::CapsuleTooShort { length, radius });
        }
        Ok(Self {
            label: label.into(),
            pose,
            shape: Shape::Capsule { radius, length },
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Full extents of a box, `None` for other shapes.
    pub fn box_dims(&self) -> Option<Vector3<f64>> {
        match self.shape {
            Shape::Box { half_extents } => Some(half_extents * 2.0),
            _ => None,
        }
    }
}
