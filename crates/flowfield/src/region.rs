use std::ops::Range;

use crate::error::FlowError;

/// Selection along one axis of the flow grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AxisSelection {
    /// The whole axis, like `:`.
    #[default]
    Full,
    /// A contiguous range, like `start:end`.
    ///
    /// Bounds past the end of the axis are clipped and a range with `start > end` is empty,
    /// so a range never fails.
    Range(Range<usize>),
    /// An explicit list of indices, in the given order and possibly repeated.
    ///
    /// Every index must lie inside the axis. A single index keeps the axis with length 1.
    Indices(Vec<usize>),
}

impl From<Range<usize>> for AxisSelection {
    fn from(range: Range<usize>) -> Self {
        Self::Range(range)
    }
}

impl From<Vec<usize>> for AxisSelection {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

/// Resolved form of an [`AxisSelection`] against a concrete axis length.
pub(crate) enum ResolvedAxis {
    /// Contiguous `start..end`, already clipped to the axis.
    Contiguous(usize, usize),
    /// Checked list of indices.
    Indices(Vec<usize>),
}

impl AxisSelection {
    pub(crate) fn resolve(&self, axis: usize, size: usize) -> Result<ResolvedAxis, FlowError> {
        match self {
            Self::Full => Ok(ResolvedAxis::Contiguous(0, size)),
            Self::Range(range) => {
                let start = range.start.min(size);
                let end = range.end.clamp(start, size);
                Ok(ResolvedAxis::Contiguous(start, end))
            }
            Self::Indices(indices) => {
                if let Some(&index) = indices.iter().find(|&&i| i >= size) {
                    return Err(FlowError::IndexOutOfBounds { axis, index, size });
                }
                Ok(ResolvedAxis::Indices(indices.clone()))
            }
        }
    }
}

/// A rectangular sub-region of a flow grid.
///
/// Replaces array bracket indexing of the form `flow[rows, cols]` with an explicit row and
/// column selection. Negative indices and strided slices are not supported.
///
/// # Examples
///
/// ```
/// use flowfield::Region;
///
/// // rows 0 to 4 and columns 2, 3 and 7
/// let region = Region::new(0..5, vec![2, 3, 7]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Region {
    /// Selection along the rows (vertical axis).
    pub rows: AxisSelection,
    /// Selection along the columns (horizontal axis).
    pub cols: AxisSelection,
}

impl Region {
    /// Creates a region from a row and a column selection.
    pub fn new(rows: impl Into<AxisSelection>, cols: impl Into<AxisSelection>) -> Self {
        Self {
            rows: rows.into(),
            cols: cols.into(),
        }
    }

    /// Selects a set of rows, keeping every column.
    pub fn rows(rows: impl Into<AxisSelection>) -> Self {
        Self {
            rows: rows.into(),
            cols: AxisSelection::Full,
        }
    }

    /// Selects a set of columns, keeping every row.
    pub fn cols(cols: impl Into<AxisSelection>) -> Self {
        Self {
            rows: AxisSelection::Full,
            cols: cols.into(),
        }
    }
}
