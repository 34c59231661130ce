use std::marker::PhantomData;

use stencil_grid::{Grid, GridSlabMut, Region};

use crate::{
    accumulate::{Accumulate, Accumulator},
    boundary::{Boundary, BoundaryCondition},
    error::FilterError,
    kernel::Kernel,
    neighborhood::NeighborhoodCursor,
    parallel::{self, ExecutionStrategy},
    region::required_input_region,
};

/// Applies a neighborhood operator to every element of a grid.
///
/// For every output index `c` the filter computes `sum_o weight(o) * input(c + o)` over the
/// footprint offsets `o` of its kernel, reducing in the accumulator type `A` and narrowing the
/// result to the output type `O`. Neighbors outside the input grid are resolved by the
/// boundary condition, zero-flux Neumann unless overridden.
///
/// The kernel is applied as given: the filter computes a correlation. Pass
/// [`Kernel::mirrored`] to obtain a convolution.
///
/// # Type Parameters
///
/// * `I` - The element type of the input grid.
/// * `O` - The element type of the output grid.
/// * `N` - The number of dimensions.
/// * `A` - The accumulation type, `f64` by default. The kernel weights have type `A::Weight`.
///
/// # Examples
///
/// ```
/// use stencil_filter::{Kernel, NeighborhoodOperatorFilter};
/// use stencil_grid::Grid;
///
/// let src = Grid::<u8, 1>::from_shape_vec([5], vec![1, 2, 3, 4, 5]).unwrap();
/// let mut dst = Grid::<u8, 1>::zeros([5]);
///
/// let kernel = Kernel::<f64, 1>::new([1], vec![1.0, 1.0, 1.0]).unwrap();
/// let filter = NeighborhoodOperatorFilter::<u8, u8, 1>::new(&kernel);
/// filter.apply(&src, &mut dst).unwrap();
///
/// assert_eq!(dst.as_slice(), &[4, 6, 9, 12, 14]);
/// ```
pub struct NeighborhoodOperatorFilter<I, O, const N: usize, A: Accumulator = f64> {
    operator: Kernel<A::Weight, N>,
    boundary_override: Option<Boundary<I, N>>,
    default_boundary: Boundary<I, N>,
    strategy: ExecutionStrategy,
    modified: u64,
    _output: PhantomData<fn() -> O>,
}

impl<I, O, const N: usize, A> NeighborhoodOperatorFilter<I, O, N, A>
where
    I: Accumulate<A>,
    O: Accumulate<A>,
    A: Accumulator,
{
    /// Create a filter with a private copy of `operator`.
    pub fn new(operator: &Kernel<A::Weight, N>) -> Self {
        Self {
            operator: operator.clone(),
            boundary_override: None,
            default_boundary: Boundary::ZeroFluxNeumann,
            strategy: ExecutionStrategy::default(),
            modified: 0,
            _output: PhantomData,
        }
    }

    /// Replace the operator with a private copy of `operator`.
    ///
    /// Later changes to the caller's kernel have no effect on the filter.
    pub fn set_operator(&mut self, operator: &Kernel<A::Weight, N>) {
        self.operator = operator.clone();
        self.modified += 1;
        log::debug!(
            "operator set: radius {:?}, {} weights",
            self.operator.radius(),
            self.operator.numel()
        );
    }

    /// The operator applied by the filter.
    #[inline]
    pub fn operator(&self) -> &Kernel<A::Weight, N> {
        &self.operator
    }

    /// Use `boundary` instead of the default zero-flux Neumann condition.
    ///
    /// A [`Boundary::Custom`] policy is shared, not copied: it stays alive for as long as the
    /// filter holds it.
    pub fn override_boundary_condition(&mut self, boundary: Boundary<I, N>) {
        log::debug!("boundary condition overridden: {}", boundary.name());
        self.boundary_override = Some(boundary);
        self.modified += 1;
    }

    /// Builder form of [`NeighborhoodOperatorFilter::override_boundary_condition`].
    pub fn with_boundary_condition(mut self, boundary: Boundary<I, N>) -> Self {
        self.override_boundary_condition(boundary);
        self
    }

    /// Drop any override and return to the default boundary condition.
    pub fn reset_boundary_condition(&mut self) {
        if self.boundary_override.take().is_some() {
            self.modified += 1;
        }
    }

    /// The boundary condition in effect: the override if one is set, the default otherwise.
    #[inline]
    pub fn boundary_condition(&self) -> &Boundary<I, N> {
        self.boundary_override
            .as_ref()
            .unwrap_or(&self.default_boundary)
    }

    /// Set how [`NeighborhoodOperatorFilter::apply`] partitions and dispatches work.
    pub fn set_strategy(&mut self, strategy: ExecutionStrategy) {
        self.strategy = strategy;
    }

    /// Builder form of [`NeighborhoodOperatorFilter::set_strategy`].
    pub fn with_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The execution strategy of the filter.
    #[inline]
    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    /// Number of configuration changes since construction.
    ///
    /// A pipeline compares this against the value it saw at its last run to decide whether
    /// the output must be recomputed.
    #[inline]
    pub fn modified_count(&self) -> u64 {
        self.modified
    }

    /// The input region this filter needs to produce `output_requested`.
    ///
    /// The output request is padded by the operator radius and cropped to `input_extent`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::EmptyInputRegion`] if the padded request misses the input.
    pub fn generate_input_requested_region(
        &self,
        output_requested: &Region<N>,
        input_extent: &Region<N>,
    ) -> Result<Region<N>, FilterError> {
        let requested =
            required_input_region(output_requested, self.operator.radius(), input_extent)?;
        log::debug!("input requested region for {output_requested}: {requested}");
        Ok(requested)
    }

    /// Filter the whole grid.
    ///
    /// # Errors
    ///
    /// Returns an error if `src` and `dst` have different shapes or the execution strategy
    /// cannot be honored.
    pub fn apply(&self, src: &Grid<I, N>, dst: &mut Grid<O, N>) -> Result<(), FilterError> {
        let region = dst.largest_region();
        self.apply_to_region(src, dst, &region)
    }

    /// Filter `region` of the output, splitting it across workers per the execution strategy.
    ///
    /// Elements of `dst` outside `region` are left untouched. All checks run before any
    /// element is written.
    ///
    /// # Errors
    ///
    /// Returns an error if `src` and `dst` have different shapes, if `region` is not inside
    /// `dst`, or if the execution strategy cannot be honored.
    pub fn apply_to_region(
        &self,
        src: &Grid<I, N>,
        dst: &mut Grid<O, N>,
        region: &Region<N>,
    ) -> Result<(), FilterError> {
        if region.is_empty() {
            return Ok(());
        }
        check_shapes(&src.shape(), &dst.shape())?;

        parallel::for_each_piece(dst, region, self.strategy, |slab, piece| {
            self.apply_region(src, slab, piece)
        })
    }

    /// Filter `region` of the output into `dst`, sequentially.
    ///
    /// This is the unit of work of a parallel run: callers may invoke it concurrently on
    /// disjoint slabs of the same output. Every element of `region` is written exactly once
    /// and nothing outside it is touched. An empty region is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::ShapeMismatch`] if `src` differs in shape from the grid of
    /// `dst`, and [`FilterError::RegionOutOfBounds`] if `region` is not inside the slab.
    pub fn apply_region(
        &self,
        src: &Grid<I, N>,
        dst: &mut GridSlabMut<'_, O, N>,
        region: &Region<N>,
    ) -> Result<(), FilterError> {
        if region.is_empty() {
            return Ok(());
        }
        check_shapes(&src.shape(), &dst.grid_shape())?;

        let extent = dst.region();
        if !region.is_inside(&extent) {
            return Err(FilterError::region_out_of_bounds(region, &extent));
        }

        let weights = self.operator.weights();
        let cursor = NeighborhoodCursor::new(src, self.operator.radius(), self.boundary_condition());
        let data = dst.as_slice_mut();
        let strides = src.strides();
        let base = extent.index[0] as usize * strides[0];

        for center in region.indices() {
            let mut acc = A::zero();
            cursor.for_each(center, |k, value| {
                acc.add_weighted(weights[k], value.to_accumulator());
            });

            let offset = center
                .iter()
                .zip(strides.iter())
                .map(|(&c, &s)| c as usize * s)
                .sum::<usize>();
            data[offset - base] = O::from_accumulator(acc);
        }

        Ok(())
    }
}

impl<I, O, const N: usize, A> Clone for NeighborhoodOperatorFilter<I, O, N, A>
where
    I: Clone,
    A: Accumulator,
{
    fn clone(&self) -> Self {
        Self {
            operator: self.operator.clone(),
            boundary_override: self.boundary_override.clone(),
            default_boundary: self.default_boundary.clone(),
            strategy: self.strategy,
            modified: self.modified,
            _output: PhantomData,
        }
    }
}

fn check_shapes<const N: usize>(src: &[usize; N], dst: &[usize; N]) -> Result<(), FilterError> {
    if src != dst {
        return Err(FilterError::ShapeMismatch {
            src: src.to_vec(),
            dst: dst.to_vec(),
        });
    }
    Ok(())
}
