//! Small fixed-size helpers for 3x3 homogeneous transformation matrices.

use ndarray::{ArrayBase, Data, Dimension, Ix2};
use num_traits::ToPrimitive;

use crate::error::GeometryError;

/// A row-major 3x3 homogeneous transformation matrix.
pub type Matrix3 = [[f64; 3]; 3];

/// The 3x3 identity matrix.
pub const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Multiplies two 3x3 matrices, `a * b`.
pub fn matmul33(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
        }
    }
    out
}

/// Computes the determinant of a 3x3 matrix.
pub fn det33(m: &Matrix3) -> f64 {
    m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
        - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
        + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
}

/// Computes the Moore-Penrose pseudo-inverse of a 3x3 matrix.
///
/// The pseudo-inverse is built from the singular value decomposition as `V Σ⁺ Uᵀ`, where
/// singular values not larger than `rcond` times the largest singular value are treated as
/// zero. For an invertible, well conditioned matrix the result equals the exact inverse.
///
/// # Arguments
///
/// * `m` - The matrix to invert.
/// * `rcond` - Relative cut-off for small singular values.
pub fn pinv33(m: &Matrix3, rcond: f64) -> Matrix3 {
    let mat = faer::Mat::<f64>::from_fn(3, 3, |i, j| m[i][j]);
    let svd = mat.svd();

    let (u, s, v) = (svd.u(), svd.s_diagonal(), svd.v());

    let s_max = (0..3).map(|k| s.read(k)).fold(0.0f64, f64::max);
    let cutoff = rcond * s_max;

    let mut s_inv = [0.0; 3];
    for (k, val) in s_inv.iter_mut().enumerate() {
        let sk = s.read(k);
        if sk > cutoff {
            *val = 1.0 / sk;
        }
    }

    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = (0..3).map(|k| v.read(i, k) * s_inv[k] * u.read(j, k)).sum();
        }
    }
    out
}

/// Applies a homogeneous transformation to a 2D point, with projective normalization.
///
/// A zero third homogeneous component produces non-finite coordinates.
pub fn transform_point(m: &Matrix3, x: f64, y: f64) -> (f64, f64) {
    let u = m[0][0] * x + m[0][1] * y + m[0][2];
    let v = m[1][0] * x + m[1][1] * y + m[1][2];
    let w = m[2][0] * x + m[2][1] * y + m[2][2];
    (u / w, v / w)
}

/// Converts a dynamically shaped array into a [`Matrix3`].
///
/// # Errors
///
/// Fails if the array is not 3x3, or if one of its elements is not representable as `f64`.
///
/// # Examples
///
/// ```
/// use flowfield_geometry::linalg::matrix_from_array;
/// use ndarray::array;
///
/// let m = matrix_from_array(&array![[1, 0, 5], [0, 1, 3], [0, 0, 1]]).unwrap();
/// assert_eq!(m[0][2], 5.0);
/// ```
pub fn matrix_from_array<S, D>(array: &ArrayBase<S, D>) -> Result<Matrix3, GeometryError>
where
    S: Data,
    S::Elem: ToPrimitive,
    D: Dimension,
{
    if array.shape() != [3, 3] {
        return Err(GeometryError::InvalidMatrixShape(array.shape().to_vec()));
    }

    let view = array
        .view()
        .into_dimensionality::<Ix2>()
        .map_err(|_| GeometryError::InvalidMatrixShape(array.shape().to_vec()))?;

    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, val) in row.iter_mut().enumerate() {
            *val = view[[i, j]]
                .to_f64()
                .ok_or(GeometryError::InvalidMatrixElement(i, j))?;
        }
    }

    Ok(out)
}
