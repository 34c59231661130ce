#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! A [`NeighborhoodOperatorFilter`] slides a [`Kernel`] over every element of an
//! N-dimensional [`stencil_grid::Grid`] and writes the weighted sum of the neighborhood to
//! the output grid. Neighbors that fall outside the input are resolved by a
//! [`BoundaryCondition`]; sums are reduced in a wider [`Accumulator`] type before being
//! narrowed to the output storage type.
//!
//! Output regions can be split into disjoint pieces and processed in parallel, see
//! [`ExecutionStrategy`].
//!
//! # Examples
//!
//! ```
//! use stencil_filter::{kernels, Boundary, NeighborhoodOperatorFilter};
//! use stencil_grid::Grid;
//!
//! let src = Grid::<f32, 3>::from_shape_fn([4, 4, 4], |[z, y, x]| (z + y + x) as f32);
//! let mut dst = Grid::<f32, 3>::zeros([4, 4, 4]);
//!
//! let kernel = kernels::sobel_kernel::<f64, 3>(2).unwrap();
//! let filter = NeighborhoodOperatorFilter::<f32, f32, 3>::new(&kernel)
//!     .with_boundary_condition(Boundary::Reflect);
//! filter.apply(&src, &mut dst).unwrap();
//! ```

mod accumulate;
pub use accumulate::{Accumulate, Accumulator};

mod boundary;
pub use boundary::{BorderMode, Boundary, BoundaryCondition};

mod error;
pub use error::FilterError;

mod kernel;
pub use kernel::Kernel;

/// Builders for common kernels.
pub mod kernels;

mod neighborhood;
pub use neighborhood::NeighborhoodCursor;

mod neighborhood_filter;
pub use neighborhood_filter::NeighborhoodOperatorFilter;

/// Convenience filters over whole grids.
pub mod ops;

/// Splitting of output regions across worker threads.
pub mod parallel;
pub use parallel::{ExecutionStrategy, ParallelError};

mod region;
pub use region::required_input_region;
