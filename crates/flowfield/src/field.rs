use ndarray::{
    Array, Array2, Array3, ArrayBase, ArrayView, Axis, Data, Dimension, Ix2, Ix3, RemoveAxis,
    Slice,
};
use num_traits::ToPrimitive;

use flowfield_geometry::{
    compose, synthesize_with, FlowSize, Matrix3, Reference, SynthesisParams, TransformSpec,
};

use crate::error::FlowError;
use crate::mask::MaskElement;
use crate::region::{Region, ResolvedAxis};

/// A dense optical flow field.
///
/// The field holds one displacement vector per pixel of a `height x width` grid, a validity
/// mask of the same grid, and the [`Reference`] frame the grid belongs to.
///
/// Vectors follow the image convention: channel 0 is the horizontal displacement and channel 1
/// the vertical one. They are always stored as `f32`.
///
/// The following invariants hold for every value of this type:
///
/// * the vectors have shape `(height, width, 2)`;
/// * the mask has shape `(height, width)`.
///
/// Every mutator validates the replacement before committing it, so a failed call leaves the
/// field untouched.
///
/// # Examples
///
/// ```
/// use flowfield::{FlowField, Reference, TransformSpec};
///
/// let flow = FlowField::from_transforms(
///     &[TransformSpec::Translation { dx: 5.0, dy: 3.0 }],
///     (10, 20),
///     Reference::Source,
/// );
///
/// assert_eq!(flow.shape(), (10, 20));
/// assert_eq!(flow.vectors()[[4, 7, 0]], 5.0);
/// assert_eq!(flow.vectors()[[4, 7, 1]], 3.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FlowField {
    vectors: Array3<f32>,
    mask: Array2<bool>,
    reference: Reference,
}

impl FlowField {
    /// Create a new flow field from flow vectors, with every vector marked as valid.
    ///
    /// # Arguments
    ///
    /// * `vectors` - Array of shape `(height, width, 2)` of any numeric element type. The
    ///   values are copied and converted to `f32`.
    /// * `reference` - The reference frame of the vectors.
    ///
    /// # Errors
    ///
    /// If the array is not 3-dimensional, does not have 2 channels, or holds a value that
    /// cannot be converted to `f32`, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowfield::{FlowField, Reference};
    /// use ndarray::Array3;
    ///
    /// let flow = FlowField::new(&Array3::<f64>::ones((4, 5, 2)), Reference::Target).unwrap();
    ///
    /// assert_eq!(flow.shape(), (4, 5));
    /// assert!(flow.mask().iter().all(|&valid| valid));
    /// ```
    pub fn new<S, D>(vectors: &ArrayBase<S, D>, reference: Reference) -> Result<Self, FlowError>
    where
        S: Data,
        S::Elem: ToPrimitive,
        D: Dimension,
    {
        Ok(Self::from_valid_vectors(coerce_vectors(vectors)?, reference))
    }

    /// Create a new flow field from flow vectors and a validity mask.
    ///
    /// # Arguments
    ///
    /// * `vectors` - Array of shape `(height, width, 2)`.
    /// * `reference` - The reference frame of the vectors.
    /// * `mask` - Array of shape `(height, width)` holding booleans or the numbers 0 and 1.
    ///
    /// # Errors
    ///
    /// Fails on invalid vectors as [`FlowField::new`] does, if the mask shape differs from the
    /// vector grid, or if the mask holds a value other than 0 or 1.
    pub fn with_mask<S, D, SM, DM>(
        vectors: &ArrayBase<S, D>,
        reference: Reference,
        mask: &ArrayBase<SM, DM>,
    ) -> Result<Self, FlowError>
    where
        S: Data,
        S::Elem: ToPrimitive,
        D: Dimension,
        SM: Data,
        SM::Elem: MaskElement,
        DM: Dimension,
    {
        Self::new(vectors, reference)?.masked(mask)
    }

    /// Create a flow field with zero displacement everywhere.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowfield::{FlowField, Reference};
    ///
    /// let flow = FlowField::zero((3, 4), Reference::default());
    ///
    /// assert_eq!(flow.vectors().shape(), &[3, 4, 2]);
    /// assert_eq!(flow.reference(), Reference::Target);
    /// ```
    pub fn zero(size: impl Into<FlowSize>, reference: Reference) -> Self {
        let size = size.into();
        Self::from_valid_vectors(Array3::zeros((size.height, size.width, 2)), reference)
    }

    /// Create the flow field induced by a 3x3 homogeneous transformation matrix.
    ///
    /// See [`flowfield_geometry::synthesize_with`] for how the reference frame is resolved.
    pub fn from_matrix(matrix: &Matrix3, size: impl Into<FlowSize>, reference: Reference) -> Self {
        Self::from_matrix_with(matrix, size, reference, &SynthesisParams::default())
    }

    /// Create the flow field induced by a transformation matrix, with explicit synthesis
    /// parameters.
    pub fn from_matrix_with(
        matrix: &Matrix3,
        size: impl Into<FlowSize>,
        reference: Reference,
        params: &SynthesisParams,
    ) -> Self {
        let vectors = synthesize_with(matrix, size.into(), reference, params);
        Self::from_valid_vectors(vectors, reference)
    }

    /// Create the flow field of a sequence of transforms.
    ///
    /// The first transform of the list is applied first. An empty list gives a zero field.
    pub fn from_transforms(
        transforms: &[TransformSpec],
        size: impl Into<FlowSize>,
        reference: Reference,
    ) -> Self {
        let size = size.into();
        log::debug!(
            "flow field of {} from {} transforms, reference {}",
            size,
            transforms.len(),
            reference
        );
        Self::from_matrix(&compose(transforms), size, reference)
    }

    fn from_valid_vectors(vectors: Array3<f32>, reference: Reference) -> Self {
        let (height, width, _) = vectors.dim();
        Self {
            vectors,
            mask: Array2::from_elem((height, width), true),
            reference,
        }
    }

    /// Replace the mask, consuming and returning the field.
    ///
    /// Meant for chaining after one of the constructors:
    ///
    /// ```
    /// use flowfield::{FlowField, Reference};
    /// use ndarray::array;
    ///
    /// let flow = FlowField::zero((2, 2), Reference::Source)
    ///     .masked(&array![[1, 0], [0, 1]])
    ///     .unwrap();
    ///
    /// assert!(!flow.mask()[[0, 1]]);
    /// ```
    ///
    /// # Errors
    ///
    /// See [`FlowField::set_mask`].
    pub fn masked<S, D>(mut self, mask: &ArrayBase<S, D>) -> Result<Self, FlowError>
    where
        S: Data,
        S::Elem: MaskElement,
        D: Dimension,
    {
        self.set_mask(mask)?;
        Ok(self)
    }

    /// Replace the flow vectors.
    ///
    /// # Errors
    ///
    /// Fails on invalid vectors as [`FlowField::new`] does, or if the new grid shape differs
    /// from the current mask. A field of a different size has to be constructed anew.
    pub fn set_vectors<S, D>(&mut self, vectors: &ArrayBase<S, D>) -> Result<(), FlowError>
    where
        S: Data,
        S::Elem: ToPrimitive,
        D: Dimension,
    {
        let vectors = coerce_vectors(vectors)?;
        let (height, width, _) = vectors.dim();
        if self.mask.dim() != (height, width) {
            return Err(FlowError::MaskShapeMismatch {
                expected: [height, width],
                actual: self.mask.shape().to_vec(),
            });
        }
        self.vectors = vectors;
        Ok(())
    }

    /// Replace the mask.
    ///
    /// # Errors
    ///
    /// If the mask shape differs from the vector grid, or a value is neither 0 nor 1, an error
    /// is returned.
    pub fn set_mask<S, D>(&mut self, mask: &ArrayBase<S, D>) -> Result<(), FlowError>
    where
        S: Data,
        S::Elem: MaskElement,
        D: Dimension,
    {
        let (height, width) = self.shape();
        self.mask = coerce_mask(mask, [height, width])?;
        Ok(())
    }

    /// Mark every vector as valid.
    pub fn reset_mask(&mut self) {
        self.mask.fill(true);
    }

    /// Replace the reference frame.
    ///
    /// The vectors are not converted; they are reinterpreted in the new frame.
    pub fn set_reference(&mut self, reference: Reference) {
        self.reference = reference;
    }

    /// The flow vectors, shape `(height, width, 2)`.
    pub fn vectors(&self) -> &Array3<f32> {
        &self.vectors
    }

    /// The validity mask, shape `(height, width)`.
    pub fn mask(&self) -> &Array2<bool> {
        &self.mask
    }

    /// The reference frame.
    pub fn reference(&self) -> Reference {
        self.reference
    }

    /// The grid shape as `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        let (height, width, _) = self.vectors.dim();
        (height, width)
    }

    /// The grid size.
    pub fn size(&self) -> FlowSize {
        self.shape().into()
    }

    /// Decompose the field into its vectors, mask and reference.
    pub fn into_parts(self) -> (Array3<f32>, Array2<bool>, Reference) {
        (self.vectors, self.mask, self.reference)
    }

    /// Cut out a sub-region of the field.
    ///
    /// Vectors and mask are copied from the selected rows and columns; the reference is kept.
    ///
    /// # Errors
    ///
    /// If an explicit index lies outside the grid, an error is returned. Ranges are clipped
    /// and never fail.
    ///
    /// # Examples
    ///
    /// ```
    /// use flowfield::{FlowField, Reference, Region};
    ///
    /// let flow = FlowField::zero((10, 10), Reference::Target);
    /// let cut = flow.slice(&Region::new(0..5, 0..5)).unwrap();
    ///
    /// assert_eq!(cut.shape(), (5, 5));
    /// ```
    pub fn slice(&self, region: &Region) -> Result<Self, FlowError> {
        let (height, width) = self.shape();
        let rows = region.rows.resolve(0, height)?;
        let cols = region.cols.resolve(1, width)?;

        let vectors = select(select(self.vectors.view(), Axis(0), &rows).view(), Axis(1), &cols);
        let mask = select(select(self.mask.view(), Axis(0), &rows).view(), Axis(1), &cols);

        Ok(Self {
            vectors,
            mask,
            reference: self.reference,
        })
    }
}

/// Checks rank and channel count of the vectors and converts them to `f32`.
fn coerce_vectors<S, D>(vectors: &ArrayBase<S, D>) -> Result<Array3<f32>, FlowError>
where
    S: Data,
    S::Elem: ToPrimitive,
    D: Dimension,
{
    if vectors.ndim() != 3 {
        return Err(FlowError::InvalidRank(vectors.ndim()));
    }
    if vectors.shape()[2] != 2 {
        return Err(FlowError::InvalidChannels(vectors.shape()[2]));
    }

    let view = vectors
        .view()
        .into_dimensionality::<Ix3>()
        .map_err(|_| FlowError::InvalidRank(vectors.ndim()))?;

    let mut out = Array3::<f32>::zeros(view.raw_dim());
    for (dst, src) in out.iter_mut().zip(view.iter()) {
        *dst = src.to_f32().ok_or_else(|| {
            FlowError::TypeMismatch("flow vector element cannot be converted to f32".to_string())
        })?;
    }

    Ok(out)
}

/// Checks the mask against the vector grid and converts it to booleans.
fn coerce_mask<S, D>(mask: &ArrayBase<S, D>, grid: [usize; 2]) -> Result<Array2<bool>, FlowError>
where
    S: Data,
    S::Elem: MaskElement,
    D: Dimension,
{
    let shape_mismatch = || FlowError::MaskShapeMismatch {
        expected: grid,
        actual: mask.shape().to_vec(),
    };

    if mask.shape() != grid {
        return Err(shape_mismatch());
    }

    let view = mask
        .view()
        .into_dimensionality::<Ix2>()
        .map_err(|_| shape_mismatch())?;

    let mut out = Array2::from_elem(view.raw_dim(), false);
    for (dst, &src) in out.iter_mut().zip(view.iter()) {
        *dst = src
            .to_mask()
            .ok_or_else(|| FlowError::InvalidMaskValue(format!("{:?}", src)))?;
    }

    Ok(out)
}

fn select<A, D>(array: ArrayView<'_, A, D>, axis: Axis, selection: &ResolvedAxis) -> Array<A, D>
where
    A: Clone,
    D: RemoveAxis,
{
    match selection {
        ResolvedAxis::Contiguous(start, end) => {
            array.slice_axis(axis, Slice::from(*start..*end)).to_owned()
        }
        ResolvedAxis::Indices(indices) if indices.is_empty() => {
            array.slice_axis(axis, Slice::from(0..0)).to_owned()
        }
        ResolvedAxis::Indices(indices) => array.select(axis, indices),
    }
}
