use num_traits::{Float, NumCast};

use crate::{error::FilterError, kernel::Kernel};

fn cast<W: Float>(value: f64) -> Result<W, FilterError> {
    <W as NumCast>::from(value).ok_or_else(|| {
        FilterError::InvalidKernelParameter(format!("{value} is not representable"))
    })
}

/// Create a normalized 1-D box kernel with `2 * radius + 1` taps.
///
/// # Arguments
///
/// * `radius` - The half-size of the kernel.
///
/// # Returns
///
/// A vector of the kernel.
pub fn box_kernel_1d<W: Float>(radius: usize) -> Result<Vec<W>, FilterError> {
    let size = 2 * radius + 1;
    Ok(vec![cast::<W>(1.0 / size as f64)?; size])
}

/// Create a normalized 1-D gaussian kernel.
///
/// # Arguments
///
/// * `radius` - The half-size of the kernel.
/// * `sigma` - The standard deviation of the gaussian, strictly positive.
///
/// # Returns
///
/// A vector of the kernel.
pub fn gaussian_kernel_1d<W: Float>(radius: usize, sigma: W) -> Result<Vec<W>, FilterError> {
    if !(sigma.is_finite() && sigma > W::zero()) {
        return Err(FilterError::InvalidKernelParameter(format!(
            "sigma must be finite and positive, got {:?}",
            sigma.to_f64()
        )));
    }

    let two_sigma_sq = cast::<W>(2.0)? * sigma * sigma;
    let mut kernel = Vec::with_capacity(2 * radius + 1);

    // compute the kernel
    for i in 0..2 * radius + 1 {
        let x = cast::<W>(i as f64 - radius as f64)?;
        kernel.push((-(x * x) / two_sigma_sq).exp());
    }

    // normalize the kernel
    let norm = kernel.iter().fold(W::zero(), |acc, &k| acc + k);
    kernel.iter_mut().for_each(|k| *k = *k / norm);
    Ok(kernel)
}

/// Build an N-D kernel as the outer product of one odd-sized 1-D kernel per axis.
///
/// # Errors
///
/// Returns [`FilterError::InvalidKernelParameter`] if a factor has an even number of taps.
///
/// # Examples
///
/// ```
/// use stencil_filter::kernels::separable_kernel;
///
/// let kernel = separable_kernel([&[1.0, 2.0, 1.0][..], &[-1.0, 0.0, 1.0][..]]).unwrap();
/// assert_eq!(kernel.radius(), [1, 1]);
/// assert_eq!(kernel.weights()[..3], [-1.0, 0.0, 1.0]);
/// ```
pub fn separable_kernel<W: Float, const N: usize>(
    factors: [&[W]; N],
) -> Result<Kernel<W, N>, FilterError> {
    let mut radius = [0; N];
    for (r, factor) in radius.iter_mut().zip(factors.iter()) {
        if factor.len() % 2 == 0 {
            return Err(FilterError::InvalidKernelParameter(format!(
                "separable factors need an odd number of taps, got {}",
                factor.len()
            )));
        }
        *r = factor.len() / 2;
    }

    Ok(Kernel::from_fn(radius, |offset| {
        offset
            .iter()
            .zip(factors.iter().zip(radius.iter()))
            .fold(W::one(), |acc, (&o, (factor, &r))| {
                acc * factor[(o + r as isize) as usize]
            })
    }))
}

/// Create a normalized N-D box kernel: every weight is the reciprocal of the footprint size.
pub fn box_kernel<W: Float, const N: usize>(
    radius: [usize; N],
) -> Result<Kernel<W, N>, FilterError> {
    let numel = radius.iter().map(|r| 2 * r + 1).product::<usize>();
    let weight = cast::<W>(1.0 / numel as f64)?;
    Ok(Kernel::from_fn(radius, |_| weight))
}

/// Create a normalized N-D gaussian kernel with a per-axis standard deviation.
///
/// The kernel is the outer product of normalized 1-D gaussians, so it sums to one.
pub fn gaussian_kernel<W: Float, const N: usize>(
    radius: [usize; N],
    sigma: [W; N],
) -> Result<Kernel<W, N>, FilterError> {
    let mut factors = Vec::with_capacity(N);
    for (&r, &s) in radius.iter().zip(sigma.iter()) {
        factors.push(gaussian_kernel_1d(r, s)?);
    }

    let empty: &[W] = &[];
    let mut views = [empty; N];
    for (view, factor) in views.iter_mut().zip(factors.iter()) {
        *view = factor.as_slice();
    }
    separable_kernel(views)
}

/// Create the 3-tap sobel derivative kernel along `axis`.
///
/// The derivative `[-1, 0, 1]` runs along `axis` and the smoothing `[1, 2, 1]` along every
/// other axis. Applied as a correlation, it responds positively to values increasing with
/// the index.
///
/// # Errors
///
/// Returns [`FilterError::InvalidKernelParameter`] if `axis >= N`.
pub fn sobel_kernel<W: Float, const N: usize>(axis: usize) -> Result<Kernel<W, N>, FilterError> {
    if axis >= N {
        return Err(FilterError::InvalidKernelParameter(format!(
            "sobel axis {axis} out of range for {N} dimensions"
        )));
    }

    let derivative = [-W::one(), W::zero(), W::one()];
    let smoothing = [W::one(), cast::<W>(2.0)?, W::one()];

    let mut factors = [&smoothing[..]; N];
    factors[axis] = &derivative[..];
    separable_kernel(factors)
}

/// Create the `2N + 1` point discrete laplacian.
///
/// The center weight is `-2N` and each of the `2N` axis neighbors weighs one.
pub fn laplacian_kernel<W: Float, const N: usize>() -> Result<Kernel<W, N>, FilterError> {
    let center = cast::<W>(-2.0 * N as f64)?;
    Ok(Kernel::from_fn([1; N], |offset| {
        let distance = offset.iter().map(|o| o.unsigned_abs()).sum::<usize>();
        match distance {
            0 => center,
            1 => W::one(),
            _ => W::zero(),
        }
    }))
}
