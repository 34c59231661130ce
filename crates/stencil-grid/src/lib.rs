#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! The crate provides the data model shared by the filtering crates:
//!
//! - [`Grid`]: an N-dimensional, row-major array of elements with owned storage.
//! - [`Region`]: an axis-aligned box of signed grid indices.
//! - [`GridSlabMut`]: an exclusive, non-aliasing borrow of a range of leading-axis
//!   hyperplanes, used to hand disjoint output pieces to parallel workers.

/// Error types for the grid module.
pub mod error;

/// N-dimensional grid with owned storage.
pub mod grid;

/// Axis-aligned index regions.
pub mod region;

/// Serialization of grids and regions (feature-gated).
#[cfg(feature = "serde")]
pub mod serde;

/// Disjoint mutable views over grid hyperplanes.
pub mod slab;

pub use crate::error::GridError;
pub use crate::grid::{get_strides_from_shape, Grid};
pub use crate::region::{Region, RegionIndices};
pub use crate::slab::GridSlabMut;

/// Type alias for a 1-dimensional grid.
pub type Grid1<T> = Grid<T, 1>;

/// Type alias for a 2-dimensional grid.
pub type Grid2<T> = Grid<T, 2>;

/// Type alias for a 3-dimensional grid.
pub type Grid3<T> = Grid<T, 3>;
