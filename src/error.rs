//! Error types for the sander end effector.

/// Errors raised by the geometry primitive constructors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum GeometryError {
    /// Sphere and capsule radii must be positive.
    #[error("radius must be positive, got {0}")]
    InvalidRadius(f64),

    /// Capsule length must be positive.
    #[error("length must be positive, got {0}")]
    InvalidLength(f64),

    /// Every box extent must be positive.
    #[error("box dimensions must be positive, got {x}x{y}x{z}")]
    InvalidDimensions {
        /// Extent along X.
        x: f64,
        /// Extent along Y.
        y: f64,
        /// Extent along Z.
        z: f64,
    },

    /// A capsule cannot be shorter than its two end caps.
    #[error("capsule length {length} is shorter than twice its radius {radius}")]
    CapsuleTooShort {
        /// End-to-end length.
        length: f64,
        /// Cap radius.
        radius: f64,
    },

    /// An orientation vector needs a direction.
    #[error("orientation vector has zero length")]
    ZeroOrientation,
}

/// Errors surfaced to the host.
///
/// Only [`ToolError::Geometry`] can come out of construction. [`ToolError::InvalidConfig`]
/// is kept for models with real attribute validation; the sander accepts any attributes.
/// Everything else belongs to the registry and the serving loop.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("failed to build geometry `{label}`: {source}")]
    Geometry {
        label: String,
        #[source]
        source: GeometryError,
    },

    #[error("invalid configuration for `{name}`: {reason}")]
    InvalidConfig { name: String, reason: String },

    #[error("no constructor registered for {api} {model}")]
    UnknownModel { api: String, model: String },

    #[error("malformed model identifier `{0}`, expected namespace:family:name")]
    MalformedModel(String),

    #[error("no resource named `{0}`")]
    UnknownResource(String),

    #[error("resource `{0}` already exists")]
    DuplicateResource(String),

    #[error("unimplemented")]
    Unimplemented,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ToolError {
    /// Attaches the label of the primitive whose constructor failed.
    pub fn geometry(label: impl Into<String>, source: GeometryError) -> Self {
        Self::Geometry {
            label: label.into(),
            source,
        }
    }
}

pub type Result<T, E = ToolError> = std::result::Result<T, E>;
