/// Broad category of a validation failure.
///
/// Every error raised by this workspace maps onto exactly one kind, so callers can react to
/// the category without matching on individual variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The argument is not of the expected element or value type.
    TypeMismatch,
    /// Wrong rank, wrong channel count or mismatching grid shapes.
    ShapeMismatch,
    /// A value lies outside its recognized domain.
    DomainViolation,
    /// An explicit index lies outside the indexed axis.
    IndexOutOfBounds,
}

/// An error type for the geometry module.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GeometryError {
    /// The flow reference token is not recognized.
    #[error("Flow reference must be 's', 'source', 't' or 'target', got '{0}'")]
    InvalidReference(String),

    /// The transform kind is not recognized.
    #[error("Unknown transform '{0}', expected 'translation', 'rotation' or 'scaling'")]
    UnknownTransform(String),

    /// The number of transform parameters does not match the transform kind.
    #[error("Transform '{kind}' expects {expected} parameters, got {actual}")]
    InvalidParameterCount {
        /// Transform kind as given by the caller.
        kind: String,
        /// Number of parameters the kind requires.
        expected: usize,
        /// Number of parameters supplied.
        actual: usize,
    },

    /// The matrix does not have shape 3x3.
    #[error("Transformation matrix must have shape [3, 3], got {0:?}")]
    InvalidMatrixShape(Vec<usize>),

    /// A matrix element cannot be represented as a 64-bit float.
    #[error("Matrix element at [{0}, {1}] cannot be converted to f64")]
    InvalidMatrixElement(usize, usize),
}

impl GeometryError {
    /// Returns the category of the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidReference(_) | Self::UnknownTransform(_) => ErrorKind::DomainViolation,
            Self::InvalidParameterCount { .. } | Self::InvalidMatrixShape(_) => {
                ErrorKind::ShapeMismatch
            }
            Self::InvalidMatrixElement(..) => ErrorKind::TypeMismatch,
        }
    }
}
