use ndarray::{Array3, Axis, Zip};

use crate::linalg::{det33, pinv33, transform_point, Matrix3};
use crate::reference::Reference;

/// Flow field size in pixels.
///
/// # Examples
///
/// ```
/// use flowfield_geometry::FlowSize;
///
/// let size: FlowSize = (20, 10).into();
///
/// assert_eq!(size.height, 20);
/// assert_eq!(size.width, 10);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlowSize {
    /// Height of the field in pixels (number of rows).
    pub height: usize,
    /// Width of the field in pixels (number of columns).
    pub width: usize,
}

impl FlowSize {
    /// Creates a new size from its height and width.
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }
}

impl std::fmt::Display for FlowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "FlowSize {{ height: {}, width: {} }}",
            self.height, self.width
        )
    }
}

/// Converts a `(height, width)` pair, the order of the grid shape.
impl From<(usize, usize)> for FlowSize {
    fn from((height, width): (usize, usize)) -> Self {
        Self { height, width }
    }
}

impl From<FlowSize> for (usize, usize) {
    fn from(size: FlowSize) -> Self {
        (size.height, size.width)
    }
}

/// Parameters of flow synthesis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SynthesisParams {
    /// Singular values below `rcond` times the largest one are treated as zero when the
    /// matrix is pseudo-inverted for target referenced flow.
    pub rcond: f64,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self { rcond: 1e-15 }
    }
}

/// Computes the displacement of every grid point under a homogeneous transform.
///
/// Each grid position `(row, col)` is taken as the homogeneous point `(col, row, 1)`,
/// transformed, normalized by its third component and reduced by the original position.
///
/// # Arguments
///
/// * `matrix` - The 3x3 transformation matrix.
/// * `size` - The size of the grid.
///
/// # Returns
///
/// Array of shape `(height, width, 2)` with horizontal displacements in channel 0 and vertical
/// displacements in channel 1.
pub fn flow_from_matrix(matrix: &Matrix3, size: FlowSize) -> Array3<f32> {
    let mut flow = Array3::<f32>::zeros((size.height, size.width, 2));

    Zip::indexed(flow.lanes_mut(Axis(2))).for_each(|(row, col), mut vec| {
        let (x, y) = (col as f64, row as f64);
        let (u, v) = transform_point(matrix, x, y);
        vec[0] = (u - x) as f32;
        vec[1] = (v - y) as f32;
    });

    flow
}

/// Synthesizes the flow field of a transform in the requested reference frame.
///
/// Uses the default [`SynthesisParams`].
///
/// # Examples
///
/// ```
/// use flowfield_geometry::{synthesize, FlowSize, Reference};
///
/// let m = [[1.0, 0.0, 5.0], [0.0, 1.0, 3.0], [0.0, 0.0, 1.0]];
/// let flow = synthesize(&m, FlowSize::new(4, 6), Reference::Target);
///
/// assert_eq!(flow.shape(), &[4, 6, 2]);
/// assert_eq!(flow[[2, 3, 0]], 5.0);
/// assert_eq!(flow[[2, 3, 1]], 3.0);
/// ```
pub fn synthesize(matrix: &Matrix3, size: FlowSize, reference: Reference) -> Array3<f32> {
    synthesize_with(matrix, size, reference, &SynthesisParams::default())
}

/// Synthesizes the flow field of a transform in the requested reference frame.
///
/// For [`Reference::Source`] the transform is applied to the source grid directly:
/// `flow = M(p) - p`.
///
/// For [`Reference::Target`] the grid is the warped image. Each target pixel is mapped back
/// through the pseudo-inverse to find its origin, and the result is negated so the vector
/// still points from the origin to the pixel: `flow = -(M⁺(p) - p)`.
///
/// A singular matrix has no well defined target referenced flow; the least-squares answer of
/// the pseudo-inverse is returned and a warning is logged.
pub fn synthesize_with(
    matrix: &Matrix3,
    size: FlowSize,
    reference: Reference,
    params: &SynthesisParams,
) -> Array3<f32> {
    log::debug!("synthesizing {} flow of {}", reference, size);

    match reference {
        Reference::Source => flow_from_matrix(matrix, size),
        Reference::Target => {
            if det33(matrix).abs() <= f64::EPSILON {
                log::warn!(
                    "transformation matrix is singular, target flow uses its pseudo-inverse"
                );
            }
            let inverse = pinv33(matrix, params.rcond);
            let mut flow = flow_from_matrix(&inverse, size);
            flow.mapv_inplace(|v| -v);
            flow
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::linalg::IDENTITY;
    use crate::transform::TransformSpec;

    #[test]
    fn test_flow_from_identity() {
        let flow = flow_from_matrix(&IDENTITY, FlowSize::new(3, 4));
        assert_eq!(flow.shape(), &[3, 4, 2]);
        assert!(flow.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_flow_channel_order() {
        let m = TransformSpec::Translation { dx: 2.0, dy: -1.0 }.matrix();
        let flow = flow_from_matrix(&m, FlowSize::new(2, 3));
        for row in 0..2 {
            for col in 0..3 {
                assert_eq!(flow[[row, col, 0]], 2.0);
                assert_eq!(flow[[row, col, 1]], -1.0);
            }
        }
    }

    #[test]
    fn test_flow_uses_column_as_x() {
        // scaling about the origin makes the displacement equal to the position
        let m = TransformSpec::Scaling {
            cx: 0.0,
            cy: 0.0,
            factor: 2.0,
        }
        .matrix();
        let flow = flow_from_matrix(&m, FlowSize::new(3, 5));
        assert_eq!(flow[[1, 4, 0]], 4.0);
        assert_eq!(flow[[1, 4, 1]], 1.0);
    }

    #[test]
    fn test_flow_projective_normalization() {
        let m = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]];
        let flow = flow_from_matrix(&m, FlowSize::new(3, 3));
        assert_eq!(flow[[2, 2, 0]], -1.0);
        assert_eq!(flow[[2, 2, 1]], -1.0);
    }

    #[test]
    fn test_synthesize_scaling_reference_asymmetry() {
        let m = TransformSpec::Scaling {
            cx: 0.0,
            cy: 0.0,
            factor: 2.0,
        }
        .matrix();
        let size = FlowSize::new(4, 4);

        let flow_s = synthesize(&m, size, Reference::Source);
        let flow_t = synthesize(&m, size, Reference::Target);

        // source pixel (3, 2) lands on (6, 4); target pixel (3, 2) came from (1.5, 1)
        assert_abs_diff_eq!(flow_s[[2, 3, 0]], 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(flow_s[[2, 3, 1]], 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(flow_t[[2, 3, 0]], 1.5, epsilon = 1e-5);
        assert_abs_diff_eq!(flow_t[[2, 3, 1]], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_synthesize_singular_target() {
        let m = TransformSpec::Scaling {
            cx: 0.0,
            cy: 0.0,
            factor: 0.0,
        }
        .matrix();
        let flow = synthesize(&m, FlowSize::new(3, 3), Reference::Target);
        assert!(flow.iter().all(|v| v.is_finite()));
        assert_abs_diff_eq!(flow[[1, 2, 0]], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(flow[[1, 2, 1]], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_synthesize_empty_size() {
        let flow = synthesize(&IDENTITY, FlowSize::new(0, 5), Reference::Target);
        assert_eq!(flow.shape(), &[0, 5, 2]);
    }

    #[test]
    fn test_synthesis_params_default() {
        assert_eq!(SynthesisParams::default().rcond, 1e-15);
    }
}
