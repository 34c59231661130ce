use rayon::prelude::*;
use thiserror::Error;

use stencil_grid::{Grid, GridSlabMut, Region};

use crate::error::FilterError;

/// Regions with at least this many elements run in parallel under [`ExecutionStrategy::Auto`].
pub const AUTO_PARALLEL_THRESHOLD: usize = 100_000;

/// Errors that can occur during parallel execution.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// The thread pool failed to build.
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// The requested thread count is invalid.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),
}

/// Controls how the output region of a filter is split and dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// Run in parallel for regions of at least [`AUTO_PARALLEL_THRESHOLD`] elements,
    /// sequentially otherwise.
    #[default]
    Auto,

    /// Run sequentially on the current thread.
    ///
    /// Useful for small grids, debugging, or when the overhead of parallelization
    /// outweighs the benefits.
    Serial,

    /// Split the region into one piece per thread of the global Rayon thread pool.
    Parallel,

    /// Run on a local thread pool with `n` threads, one piece per thread.
    ///
    /// # Warning
    /// Creates a new thread pool on every call, which has significant overhead.
    /// Use this primarily for benchmarking or specific isolation needs.
    Fixed(usize),
}

impl ExecutionStrategy {
    /// Returns true if a region of `numel` elements is processed by several workers.
    pub fn is_parallel(&self, numel: usize) -> bool {
        match self {
            ExecutionStrategy::Auto => numel >= AUTO_PARALLEL_THRESHOLD,
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Fixed(n) => *n > 1,
        }
    }
}

/// Split `region` into at most `pieces` disjoint regions along the leading axis.
///
/// The pieces cover the region and are ordered by increasing leading index, so each piece
/// maps onto a contiguous range of hyperplanes of the output grid.
pub fn split_region<const N: usize>(region: &Region<N>, pieces: usize) -> Vec<Region<N>> {
    region.split_along_axis(0, pieces)
}

/// Run `op` once per piece of `region`, handing each call the exclusive slab of `dst` that
/// contains its piece.
///
/// Pieces are disjoint and their slabs never alias, so workers write without locking. The
/// call returns once every piece has been processed; the first error is returned.
///
/// # Errors
///
/// Returns [`FilterError::RegionOutOfBounds`] before any work starts if `region` is not
/// inside `dst`, and [`ParallelError`] if the thread pool cannot be set up.
pub fn for_each_piece<T, const N: usize, F>(
    dst: &mut Grid<T, N>,
    region: &Region<N>,
    strategy: ExecutionStrategy,
    op: F,
) -> Result<(), FilterError>
where
    T: Send,
    F: Fn(&mut GridSlabMut<'_, T, N>, &Region<N>) -> Result<(), FilterError> + Send + Sync,
{
    if let ExecutionStrategy::Fixed(0) = strategy {
        return Err(ParallelError::InvalidThreadCount(0).into());
    }

    if region.is_empty() {
        return Ok(());
    }

    let extent = dst.largest_region();
    if !region.is_inside(&extent) {
        return Err(FilterError::region_out_of_bounds(region, &extent));
    }

    if !strategy.is_parallel(region.numel()) {
        let mut slab = dst.as_slab_mut()?;
        return op(&mut slab, region);
    }

    match strategy {
        ExecutionStrategy::Fixed(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;
            pool.install(|| run_pieces(dst, region, n, &op))
        }
        _ => run_pieces(dst, region, rayon::current_num_threads(), &op),
    }
}

fn run_pieces<T, const N: usize, F>(
    dst: &mut Grid<T, N>,
    region: &Region<N>,
    pieces: usize,
    op: &F,
) -> Result<(), FilterError>
where
    T: Send,
    F: Fn(&mut GridSlabMut<'_, T, N>, &Region<N>) -> Result<(), FilterError> + Send + Sync,
{
    let pieces = split_region(region, pieces);
    log::debug!("splitting {} into {} pieces", region, pieces.len());

    // carve one slab per piece, front to back
    let mut slabs = Vec::with_capacity(pieces.len());
    let mut rest = dst.as_slab_mut()?;
    for piece in &pieces {
        let first = piece.index[0] as usize;
        let (_, tail) = rest.split_at(first)?;
        let (slab, tail) = tail.split_at(first + piece.size[0])?;
        slabs.push(slab);
        rest = tail;
    }

    pieces
        .par_iter()
        .zip(slabs.into_par_iter())
        .try_for_each(|(piece, mut slab)| op(&mut slab, piece))
}
