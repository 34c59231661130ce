use stencil_grid::GridError;
use thiserror::Error;

use crate::parallel::ParallelError;

/// An error type for the filter module.
#[derive(Error, Debug, PartialEq)]
pub enum FilterError {
    /// The number of kernel weights does not match the footprint implied by its radius.
    #[error("Kernel has {actual} weights but radius {radius:?} implies {expected}")]
    KernelSizeMismatch {
        /// Number of weights implied by the radius
        expected: usize,
        /// Number of weights supplied
        actual: usize,
        /// The declared per-axis radius
        radius: Vec<usize>,
    },

    /// A kernel builder received a parameter it cannot honor.
    #[error("Invalid kernel parameter: {0}")]
    InvalidKernelParameter(String),

    /// The padded output region does not overlap the available input.
    #[error("Required input region is empty: {output} padded by {radius:?} does not intersect {extent}")]
    EmptyInputRegion {
        /// The requested output region
        output: String,
        /// The kernel radius used for padding
        radius: Vec<usize>,
        /// The full extent of the input
        extent: String,
    },

    /// A region is not contained in the grid it addresses.
    #[error("{region} is not contained in the grid extent {extent}")]
    RegionOutOfBounds {
        /// The offending region
        region: String,
        /// The extent it must lie in
        extent: String,
    },

    /// Source and destination grids have different shapes.
    #[error("Shape mismatch: source {src:?}, destination {dst:?}")]
    ShapeMismatch {
        /// Shape of the source grid
        src: Vec<usize>,
        /// Shape of the destination grid
        dst: Vec<usize>,
    },

    /// Error from the grid module.
    #[error(transparent)]
    GridError(#[from] GridError),

    /// Error while dispatching work to the thread pool.
    #[error(transparent)]
    ParallelError(#[from] ParallelError),
}

impl FilterError {
    /// Creates a RegionOutOfBounds error from the two regions.
    pub fn region_out_of_bounds<const N: usize>(
        region: &stencil_grid::Region<N>,
        extent: &stencil_grid::Region<N>,
    ) -> Self {
        Self::RegionOutOfBounds {
            region: region.to_string(),
            extent: extent.to_string(),
        }
    }

    /// Returns true if the error is a programming-contract violation rather than a
    /// configuration problem.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::RegionOutOfBounds { .. } | Self::ShapeMismatch { .. } | Self::GridError(_)
        )
    }
}
