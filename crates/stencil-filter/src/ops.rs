use stencil_grid::Grid;

use crate::{
    accumulate::Accumulate, error::FilterError, kernel::Kernel, kernels,
    neighborhood_filter::NeighborhoodOperatorFilter,
};

/// Correlate a grid with a kernel.
///
/// Out-of-range neighbors follow the zero-flux Neumann condition. Use
/// [`NeighborhoodOperatorFilter`] directly to pick another boundary condition.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `dst` - The destination grid.
/// * `kernel` - The weights, applied as given.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn correlate<I, O, const N: usize>(
    src: &Grid<I, N>,
    dst: &mut Grid<O, N>,
    kernel: &Kernel<f64, N>,
) -> Result<(), FilterError>
where
    I: Accumulate<f64>,
    O: Accumulate<f64>,
{
    NeighborhoodOperatorFilter::<I, O, N>::new(kernel).apply(src, dst)
}

/// Convolve a grid with a kernel.
///
/// Same as [`correlate`] with the mirrored kernel.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn convolve<I, O, const N: usize>(
    src: &Grid<I, N>,
    dst: &mut Grid<O, N>,
    kernel: &Kernel<f64, N>,
) -> Result<(), FilterError>
where
    I: Accumulate<f64>,
    O: Accumulate<f64>,
{
    correlate(src, dst, &kernel.mirrored())
}

/// Blur a grid with a normalized box kernel.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `dst` - The destination grid.
/// * `radius` - The half-size of the kernel along every axis.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn box_filter<I, O, const N: usize>(
    src: &Grid<I, N>,
    dst: &mut Grid<O, N>,
    radius: [usize; N],
) -> Result<(), FilterError>
where
    I: Accumulate<f64>,
    O: Accumulate<f64>,
{
    let kernel = kernels::box_kernel(radius)?;
    correlate(src, dst, &kernel)
}

/// Blur a grid with a normalized gaussian kernel.
///
/// # Arguments
///
/// * `src` - The source grid.
/// * `dst` - The destination grid.
/// * `radius` - The half-size of the kernel along every axis.
/// * `sigma` - The standard deviation along every axis.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn gaussian_filter<I, O, const N: usize>(
    src: &Grid<I, N>,
    dst: &mut Grid<O, N>,
    radius: [usize; N],
    sigma: [f64; N],
) -> Result<(), FilterError>
where
    I: Accumulate<f64>,
    O: Accumulate<f64>,
{
    let kernel = kernels::gaussian_kernel(radius, sigma)?;
    correlate(src, dst, &kernel)
}

/// Compute the sobel derivative of a grid along `axis`.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn sobel<I, O, const N: usize>(
    src: &Grid<I, N>,
    dst: &mut Grid<O, N>,
    axis: usize,
) -> Result<(), FilterError>
where
    I: Accumulate<f64>,
    O: Accumulate<f64>,
{
    let kernel = kernels::sobel_kernel(axis)?;
    correlate(src, dst, &kernel)
}

/// Compute the euclidean norm of the sobel derivatives along every axis.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn sobel_magnitude<I, O, const N: usize>(
    src: &Grid<I, N>,
    dst: &mut Grid<O, N>,
) -> Result<(), FilterError>
where
    I: Accumulate<f64>,
    O: Accumulate<f64>,
{
    if src.shape() != dst.shape() {
        return Err(FilterError::ShapeMismatch {
            src: src.shape().to_vec(),
            dst: dst.shape().to_vec(),
        });
    }

    let mut sum_sq = Grid::<f64, N>::zeros(src.shape());
    let mut derivative = Grid::<f64, N>::zeros(src.shape());
    for axis in 0..N {
        sobel(src, &mut derivative, axis)?;
        sum_sq
            .as_slice_mut()
            .iter_mut()
            .zip(derivative.as_slice())
            .for_each(|(acc, &d)| *acc += d * d);
    }

    // compute the magnitude
    dst.as_slice_mut()
        .iter_mut()
        .zip(sum_sq.as_slice())
        .for_each(|(dst, &s)| *dst = O::from_accumulator(s.sqrt()));

    Ok(())
}

/// Apply the `2N + 1` point discrete laplacian.
///
/// PRECONDITION: `src` and `dst` must have the same shape.
pub fn laplacian<I, O, const N: usize>(
    src: &Grid<I, N>,
    dst: &mut Grid<O, N>,
) -> Result<(), FilterError>
where
    I: Accumulate<f64>,
    O: Accumulate<f64>,
{
    let kernel = kernels::laplacian_kernel()?;
    correlate(src, dst, &kernel)
}
