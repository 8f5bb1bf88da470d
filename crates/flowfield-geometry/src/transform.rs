use crate::error::GeometryError;
use crate::linalg::{matmul33, Matrix3, IDENTITY};

/// An elementary 2D transform.
///
/// Coordinates follow the image convention: `x` is horizontal and grows to the right, `y` is
/// vertical and grows downwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformSpec {
    /// Shift by `dx` pixels horizontally and `dy` pixels vertically.
    Translation {
        /// Horizontal shift in pixels.
        dx: f64,
        /// Vertical shift in pixels.
        dy: f64,
    },
    /// Counter-clockwise rotation by `angle` degrees about the point `(cx, cy)`.
    Rotation {
        /// Horizontal centre in pixels.
        cx: f64,
        /// Vertical centre in pixels.
        cy: f64,
        /// Angle in degrees, counter-clockwise as seen on screen.
        angle: f64,
    },
    /// Isotropic scaling by `factor` about the point `(cx, cy)`.
    Scaling {
        /// Horizontal centre in pixels.
        cx: f64,
        /// Vertical centre in pixels.
        cy: f64,
        /// Scaling factor.
        factor: f64,
    },
}

impl TransformSpec {
    /// Parses a transform from its name and parameter list.
    ///
    /// # Arguments
    ///
    /// * `kind` - One of `translation`, `rotation` or `scaling`.
    /// * `values` - `[dx, dy]` for translation, `[cx, cy, angle]` for rotation and
    ///   `[cx, cy, factor]` for scaling.
    ///
    /// # Errors
    ///
    /// An unknown kind or a wrong number of parameters is rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowfield_geometry::TransformSpec;
    ///
    /// let t = TransformSpec::from_kind("rotation", &[10.0, 20.0, 30.0]).unwrap();
    /// assert_eq!(t, TransformSpec::Rotation { cx: 10.0, cy: 20.0, angle: 30.0 });
    /// ```
    pub fn from_kind(kind: &str, values: &[f64]) -> Result<Self, GeometryError> {
        let expected = match kind {
            "translation" => 2,
            "rotation" | "scaling" => 3,
            other => return Err(GeometryError::UnknownTransform(other.to_string())),
        };

        if values.len() != expected {
            return Err(GeometryError::InvalidParameterCount {
                kind: kind.to_string(),
                expected,
                actual: values.len(),
            });
        }

        Ok(match kind {
            "translation" => Self::Translation {
                dx: values[0],
                dy: values[1],
            },
            "rotation" => Self::Rotation {
                cx: values[0],
                cy: values[1],
                angle: values[2],
            },
            _ => Self::Scaling {
                cx: values[0],
                cy: values[1],
                factor: values[2],
            },
        })
    }

    /// Returns the 3x3 homogeneous matrix of the transform.
    ///
    /// Rotation and scaling pivot about their centre: `T(c) * A * T(-c)`.
    pub fn matrix(&self) -> Matrix3 {
        match *self {
            Self::Translation { dx, dy } => translation_matrix(dx, dy),
            Self::Scaling { cx, cy, factor } => {
                let scale = [[factor, 0.0, 0.0], [0.0, factor, 0.0], [0.0, 0.0, 1.0]];
                about_center(cx, cy, &scale)
            }
            Self::Rotation { cx, cy, angle } => {
                let (sin, cos) = angle.to_radians().sin_cos();
                // y axis points down, hence the transposed signs of the usual rotation matrix
                let rot = [[cos, sin, 0.0], [-sin, cos, 0.0], [0.0, 0.0, 1.0]];
                about_center(cx, cy, &rot)
            }
        }
    }

    /// Returns the transform undoing this one.
    ///
    /// A scaling with a zero factor has no inverse; its inverse factor is infinite.
    pub fn inverse(&self) -> Self {
        match *self {
            Self::Translation { dx, dy } => Self::Translation { dx: -dx, dy: -dy },
            Self::Rotation { cx, cy, angle } => Self::Rotation {
                cx,
                cy,
                angle: -angle,
            },
            Self::Scaling { cx, cy, factor } => Self::Scaling {
                cx,
                cy,
                factor: 1.0 / factor,
            },
        }
    }
}

fn translation_matrix(dx: f64, dy: f64) -> Matrix3 {
    [[1.0, 0.0, dx], [0.0, 1.0, dy], [0.0, 0.0, 1.0]]
}

fn about_center(cx: f64, cy: f64, m: &Matrix3) -> Matrix3 {
    matmul33(
        &translation_matrix(cx, cy),
        &matmul33(m, &translation_matrix(-cx, -cy)),
    )
}

/// Returns the homogeneous matrix of a single transform.
pub fn matrix_for(transform: &TransformSpec) -> Matrix3 {
    transform.matrix()
}

/// Composes a sequence of transforms into a single matrix.
///
/// The first transform of the list is applied first, so the matrices are multiplied in
/// reverse order: `M = M(list[n - 1]) * ... * M(list[0])`. An empty list gives the identity.
///
/// # Examples
///
/// ```
/// use flowfield_geometry::{compose, TransformSpec};
///
/// let m = compose(&[
///     TransformSpec::Translation { dx: 1.0, dy: 0.0 },
///     TransformSpec::Translation { dx: 0.0, dy: 2.0 },
/// ]);
/// assert_eq!(m[0][2], 1.0);
/// assert_eq!(m[1][2], 2.0);
/// ```
pub fn compose(transforms: &[TransformSpec]) -> Matrix3 {
    log::debug!("composing {} transforms", transforms.len());
    transforms
        .iter()
        .rev()
        .fold(IDENTITY, |acc, t| matmul33(&acc, &t.matrix()))
}

/// Composes the analytic inverses of a sequence of transforms.
///
/// The result equals the inverse of [`compose`] for the same list,
/// `inv(M(list[0])) * ... * inv(M(list[n - 1]))`, without a numerical matrix inversion.
pub fn compose_inverse(transforms: &[TransformSpec]) -> Matrix3 {
    transforms
        .iter()
        .fold(IDENTITY, |acc, t| matmul33(&acc, &t.inverse().matrix()))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::ErrorKind;
    use crate::linalg::{pinv33, transform_point};

    fn assert_mat_eq(a: &Matrix3, b: &Matrix3) {
        for i in 0..3 {
            for j in 0..3 {
                assert_abs_diff_eq!(a[i][j], b[i][j], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_translation_matrix() {
        let m = TransformSpec::Translation { dx: 5.0, dy: 3.0 }.matrix();
        assert_eq!(m, [[1.0, 0.0, 5.0], [0.0, 1.0, 3.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_scaling_pivots_about_center() {
        let m = TransformSpec::Scaling {
            cx: 10.0,
            cy: 20.0,
            factor: 2.0,
        }
        .matrix();
        assert_eq!(transform_point(&m, 10.0, 20.0), (10.0, 20.0));
        assert_eq!(transform_point(&m, 11.0, 19.0), (12.0, 18.0));
        assert_eq!(m, [[2.0, 0.0, -10.0], [0.0, 2.0, -20.0], [0.0, 0.0, 1.0]]);
    }

    #[test]
    fn test_rotation_counter_clockwise() {
        // a point to the right of the centre moves up on screen, i.e. to smaller y
        let m = TransformSpec::Rotation {
            cx: 5.0,
            cy: 5.0,
            angle: 90.0,
        }
        .matrix();
        let (x, y) = transform_point(&m, 6.0, 5.0);
        assert_abs_diff_eq!(x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 4.0, epsilon = 1e-12);

        let (x, y) = transform_point(&m, 5.0, 5.0);
        assert_abs_diff_eq!(x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_kind() -> Result<(), GeometryError> {
        assert_eq!(
            TransformSpec::from_kind("translation", &[1.0, 2.0])?,
            TransformSpec::Translation { dx: 1.0, dy: 2.0 }
        );
        assert_eq!(
            TransformSpec::from_kind("scaling", &[1.0, 2.0, 0.5])?,
            TransformSpec::Scaling {
                cx: 1.0,
                cy: 2.0,
                factor: 0.5
            }
        );
        Ok(())
    }

    #[test]
    fn test_from_kind_errors() {
        let err = TransformSpec::from_kind("shear", &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DomainViolation);

        let err = TransformSpec::from_kind("Translation", &[1.0, 2.0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DomainViolation);

        let err = TransformSpec::from_kind("rotation", &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::InvalidParameterCount {
                kind: "rotation".to_string(),
                expected: 3,
                actual: 2,
            }
        );
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn test_compose_empty_is_identity() {
        assert_eq!(compose(&[]), IDENTITY);
        assert_eq!(compose_inverse(&[]), IDENTITY);
    }

    #[test]
    fn test_compose_applies_first_transform_first() {
        let transforms = [
            TransformSpec::Translation { dx: 10.0, dy: 0.0 },
            TransformSpec::Rotation {
                cx: 0.0,
                cy: 0.0,
                angle: 90.0,
            },
        ];

        // translate to (10, 0), then rotate about the origin to (0, -10)
        let (x, y) = transform_point(&compose(&transforms), 0.0, 0.0);
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, -10.0, epsilon = 1e-9);

        // the reversed order rotates first, leaving the origin in place
        let reversed = [transforms[1], transforms[0]];
        let (x, y) = transform_point(&compose(&reversed), 0.0, 0.0);
        assert_abs_diff_eq!(x, 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_compose_inverse_matches_pinv() {
        let transforms = [
            TransformSpec::Translation { dx: 3.0, dy: -2.0 },
            TransformSpec::Rotation {
                cx: 20.0,
                cy: 10.0,
                angle: 37.0,
            },
            TransformSpec::Scaling {
                cx: 5.0,
                cy: 5.0,
                factor: 1.5,
            },
        ];
        let m = compose(&transforms);
        assert_mat_eq(&compose_inverse(&transforms), &pinv33(&m, 1e-15));
        assert_mat_eq(&matmul33(&m, &compose_inverse(&transforms)), &IDENTITY);
    }

    #[test]
    fn test_matrix_for() {
        let t = TransformSpec::Rotation {
            cx: 1.0,
            cy: 2.0,
            angle: 45.0,
        };
        assert_eq!(matrix_for(&t), t.matrix());
        assert_mat_eq(&matmul33(&t.matrix(), &t.inverse().matrix()), &IDENTITY);
    }
}
