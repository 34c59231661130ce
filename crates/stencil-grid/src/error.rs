use thiserror::Error;

/// An error type for grid operations.
#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    /// The grid shape does not match the provided data.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Index exceeds grid bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },

    /// The requested hyperplane range does not fit the grid or slab.
    #[error("Slab range {start}..{end} out of bounds for leading dimension of size {size}")]
    SlabOutOfBounds {
        /// First hyperplane of the requested range
        start: usize,
        /// One past the last hyperplane of the requested range
        end: usize,
        /// Number of hyperplanes available
        size: usize,
    },
}

impl GridError {
    /// Creates an InvalidShape error.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }
}
