use num_traits::{One, Zero};
use stencil_grid::Region;

use crate::error::FilterError;

/// A neighborhood operator: a box of weights centered on the origin.
///
/// The kernel spans `2 * radius[i] + 1` elements along every axis `i`. Weights are stored in
/// row-major order over the offsets `-radius..=radius`, the last axis varying fastest; this is
/// the order returned by [`Kernel::offsets`] and the order in which filters reduce the
/// neighborhood.
///
/// Filters apply the weights as given, i.e. they compute a correlation. Use
/// [`Kernel::mirrored`] to obtain the kernel of the corresponding convolution.
///
/// # Examples
///
/// ```
/// use stencil_filter::Kernel;
///
/// let kernel = Kernel::<f64, 1>::new([1], vec![1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(kernel.size(), [3]);
/// assert_eq!(kernel.offsets().collect::<Vec<_>>(), vec![[-1], [0], [1]]);
/// assert_eq!(kernel.mirrored().weights(), &[3.0, 2.0, 1.0]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel<W, const N: usize> {
    weights: Vec<W>,
    radius: [usize; N],
}

impl<W, const N: usize> Kernel<W, N> {
    /// Create a kernel from its per-axis radius and its weights.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::KernelSizeMismatch`] if the number of weights differs from the
    /// product of `2 * radius[i] + 1`.
    pub fn new(radius: [usize; N], weights: Vec<W>) -> Result<Self, FilterError> {
        let expected = footprint(radius);
        if weights.len() != expected {
            return Err(FilterError::KernelSizeMismatch {
                expected,
                actual: weights.len(),
                radius: radius.to_vec(),
            });
        }
        Ok(Self { weights, radius })
    }

    /// Create a kernel by evaluating `f` at every offset of the footprint.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_filter::Kernel;
    ///
    /// let kernel = Kernel::<f64, 2>::from_fn([1, 0], |[dy, _]| dy as f64);
    /// assert_eq!(kernel.weights(), &[-1.0, 0.0, 1.0]);
    /// ```
    pub fn from_fn<F>(radius: [usize; N], f: F) -> Self
    where
        F: Fn([isize; N]) -> W,
    {
        let weights = footprint_region(radius).indices().map(f).collect();
        Self { weights, radius }
    }

    /// The kernel with a single unit weight, reproducing its input.
    pub fn identity() -> Self
    where
        W: Zero + One,
    {
        Self {
            weights: vec![W::one()],
            radius: [0; N],
        }
    }

    /// The half-extent of the kernel along every axis.
    #[inline]
    pub fn radius(&self) -> [usize; N] {
        self.radius
    }

    /// The full extent of the kernel along every axis.
    #[inline]
    pub fn size(&self) -> [usize; N] {
        self.radius.map(|r| 2 * r + 1)
    }

    /// The number of weights.
    #[inline]
    pub fn numel(&self) -> usize {
        self.weights.len()
    }

    /// The weights in offset order.
    #[inline]
    pub fn weights(&self) -> &[W] {
        &self.weights
    }

    /// Iterate over the offsets of the footprint, in the order of [`Kernel::weights`].
    pub fn offsets(&self) -> impl ExactSizeIterator<Item = [isize; N]> {
        footprint_region(self.radius).indices()
    }

    /// The weight at offset zero.
    #[inline]
    pub fn center_weight(&self) -> &W {
        &self.weights[self.weights.len() / 2]
    }

    /// The weight at the given offset, or `None` if the offset is outside the footprint.
    pub fn weight_at(&self, offset: [isize; N]) -> Option<&W> {
        let mut linear = 0;
        for ((&o, &r), s) in offset.iter().zip(self.radius.iter()).zip(self.size()) {
            if o.unsigned_abs() > r {
                return None;
            }
            linear = linear * s + (o + r as isize) as usize;
        }
        self.weights.get(linear)
    }

    /// The offset-reversed kernel: the weight at offset `o` moves to offset `-o`.
    ///
    /// Correlating with the mirrored kernel is a convolution with the original one.
    pub fn mirrored(&self) -> Self
    where
        W: Clone,
    {
        Self {
            weights: self.weights.iter().rev().cloned().collect(),
            radius: self.radius,
        }
    }

    /// Returns true if the kernel is unchanged by [`Kernel::mirrored`].
    pub fn is_symmetric(&self) -> bool
    where
        W: PartialEq,
    {
        self.weights.iter().eq(self.weights.iter().rev())
    }
}

fn footprint<const N: usize>(radius: [usize; N]) -> usize {
    radius.iter().map(|r| 2 * r + 1).product()
}

fn footprint_region<const N: usize>(radius: [usize; N]) -> Region<N> {
    Region::new(radius.map(|r| -(r as isize)), radius.map(|r| 2 * r + 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_size_mismatch() {
        let res = Kernel::<f64, 2>::new([1, 1], vec![1.0; 8]);
        assert_eq!(
            res,
            Err(FilterError::KernelSizeMismatch {
                expected: 9,
                actual: 8,
                radius: vec![1, 1],
            })
        );
    }

    #[test]
    fn offsets_follow_weight_order() -> Result<(), FilterError> {
        let kernel = Kernel::<f64, 2>::new([1, 2], (0..15).map(|i| i as f64).collect())?;
        let offsets = kernel.offsets().collect::<Vec<_>>();
        assert_eq!(offsets.len(), 15);
        assert_eq!(offsets[0], [-1, -2]);
        assert_eq!(offsets[7], [0, 0]);
        assert_eq!(offsets[14], [1, 2]);
        for (offset, weight) in offsets.iter().zip(kernel.weights()) {
            assert_eq!(kernel.weight_at(*offset), Some(weight));
        }
        assert!(kernel.weight_at([2, 0]).is_none());
        assert_eq!(kernel.center_weight(), &7.0);
        Ok(())
    }

    #[test]
    fn mirrored_negates_offsets() -> Result<(), FilterError> {
        let kernel = Kernel::<f64, 2>::from_fn([1, 1], |[y, x]| (3 * y + x) as f64);
        let mirrored = kernel.mirrored();
        for offset in kernel.offsets() {
            assert_eq!(
                kernel.weight_at(offset),
                mirrored.weight_at(offset.map(|o| -o))
            );
        }
        assert!(!kernel.is_symmetric());
        assert_eq!(mirrored.mirrored(), kernel);
        Ok(())
    }

    #[test]
    fn identity_kernel() {
        let kernel = Kernel::<f32, 3>::identity();
        assert_eq!(kernel.size(), [1, 1, 1]);
        assert_eq!(kernel.weights(), &[1.0]);
        assert!(kernel.is_symmetric());
    }
}
