#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! [`FlowField`] is a dense optical flow field: one 2D displacement vector per pixel, a
//! validity mask and the reference frame ([`Reference::Source`] or [`Reference::Target`]) the
//! grid is indexed by. Fields are created from caller supplied vectors or synthesized from
//! geometric transforms, e.g. to produce ground truth for motion estimation.
//!
//! # Example
//!
//! ```rust
//! use flowfield::{FlowField, Reference, Region, TransformSpec};
//!
//! let flow = FlowField::from_transforms(
//!     &[
//!         TransformSpec::Rotation { cx: 50.0, cy: 40.0, angle: 10.0 },
//!         TransformSpec::Scaling { cx: 50.0, cy: 40.0, factor: 1.2 },
//!     ],
//!     (80, 100),
//!     Reference::Target,
//! );
//!
//! let top_left = flow.slice(&Region::new(0..40, 0..50)).unwrap();
//! assert_eq!(top_left.shape(), (40, 50));
//! ```

/// Error types for the flow field module.
pub mod error;

/// The flow field container.
pub mod field;

/// Mask element conversion.
pub mod mask;

/// Sub-region selection.
pub mod region;

#[doc(inline)]
pub use flowfield_geometry as geometry;

pub use crate::error::FlowError;
pub use crate::field::FlowField;
pub use crate::mask::MaskElement;
pub use crate::region::{AxisSelection, Region};

pub use flowfield_geometry::{
    ErrorKind, FlowSize, GeometryError, Matrix3, Reference, SynthesisParams, TransformSpec,
};
