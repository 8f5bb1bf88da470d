use flowfield_geometry::{ErrorKind, GeometryError};

/// An error type for the flow field module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FlowError {
    /// An element cannot be coerced to the required type.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// The flow vectors are not 3-dimensional.
    #[error("Flow vectors must be 3-dimensional, got {0} dimensions")]
    InvalidRank(usize),

    /// The flow vectors do not have two channels.
    #[error("Flow vectors must have 2 channels, got {0}")]
    InvalidChannels(usize),

    /// The mask is not a 2-dimensional grid matching the flow vectors.
    #[error("Flow mask must have shape {expected:?}, got {actual:?}")]
    MaskShapeMismatch {
        /// Grid shape of the flow vectors.
        expected: [usize; 2],
        /// Shape of the rejected mask.
        actual: Vec<usize>,
    },

    /// The mask contains a value other than 0 or 1.
    #[error("Flow mask values must be 0 or 1, got {0}")]
    InvalidMaskValue(String),

    /// A selected index lies outside the grid.
    #[error("Index {index} out of bounds for axis {axis} of size {size}")]
    IndexOutOfBounds {
        /// Axis of the grid, 0 for rows and 1 for columns.
        axis: usize,
        /// The offending index.
        index: usize,
        /// Length of the axis.
        size: usize,
    },

    /// Error raised by the geometry module.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl FlowError {
    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TypeMismatch(_) => ErrorKind::TypeMismatch,
            Self::InvalidRank(_) | Self::InvalidChannels(_) | Self::MaskShapeMismatch { .. } => {
                ErrorKind::ShapeMismatch
            }
            Self::InvalidMaskValue(_) => ErrorKind::DomainViolation,
            Self::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
            Self::Geometry(e) => e.kind(),
        }
    }
}
