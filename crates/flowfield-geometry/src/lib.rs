#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! This crate turns elementary 2D transforms (translation, rotation, scaling) into 3x3
//! homogeneous matrices, composes them, and synthesizes the dense displacement field a matrix
//! induces on a pixel grid.
//!
//! The field can be referenced either to the source grid or to the target (warped) grid. The
//! two frames are related by matrix inversion, not by negating the vectors, see
//! [`synthesize_with`].
//!
//! # Example
//!
//! ```rust
//! use flowfield_geometry::{compose, synthesize, FlowSize, Reference, TransformSpec};
//!
//! let m = compose(&[
//!     TransformSpec::Rotation { cx: 50.0, cy: 50.0, angle: 30.0 },
//!     TransformSpec::Translation { dx: 5.0, dy: 0.0 },
//! ]);
//! let flow = synthesize(&m, FlowSize::new(100, 100), Reference::Source);
//!
//! assert_eq!(flow.shape(), &[100, 100, 2]);
//! ```

/// Error types for the geometry module.
pub mod error;

/// Fixed-size 3x3 matrix helpers.
pub mod linalg;

/// Flow reference frames.
pub mod reference;

/// Dense flow synthesis from transformation matrices.
pub mod synthesis;

/// Elementary transforms and their composition.
pub mod transform;

pub use crate::error::{ErrorKind, GeometryError};
pub use crate::linalg::{Matrix3, IDENTITY};
pub use crate::reference::Reference;
pub use crate::synthesis::{
    flow_from_matrix, synthesize, synthesize_with, FlowSize, SynthesisParams,
};
pub use crate::transform::{compose, compose_inverse, matrix_for, TransformSpec};
