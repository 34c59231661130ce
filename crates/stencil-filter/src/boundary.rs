use std::{fmt, sync::Arc};

use stencil_grid::Grid;

/// Resolves grid lookups at indices that may lie outside the grid.
///
/// Implementations must return a value for every index, in bounds or not, and must not
/// mutate any state: filters call them concurrently from several workers on the same grid.
///
/// # Examples
///
/// ```
/// use stencil_filter::BoundaryCondition;
/// use stencil_grid::Grid;
///
/// /// Treat everything outside the grid as the value at the origin.
/// struct OriginFill;
///
/// impl BoundaryCondition<f32, 2> for OriginFill {
///     fn value_at(&self, grid: &Grid<f32, 2>, index: [isize; 2]) -> f32 {
///         match grid.get_signed(index) {
///             Some(v) => *v,
///             None => *grid.get_unchecked([0, 0]),
///         }
///     }
/// }
///
/// let grid = Grid::<f32, 2>::from_shape_vec([1, 2], vec![5.0, 6.0]).unwrap();
/// assert_eq!(OriginFill.value_at(&grid, [0, 7]), 5.0);
/// ```
pub trait BoundaryCondition<T, const N: usize>: Send + Sync {
    /// The value of `grid` at `index`.
    fn value_at(&self, grid: &Grid<T, N>, index: [isize; N]) -> T;

    /// A short name used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

/// How an out-of-range index along one axis maps back into `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// Clamp to the nearest edge element.
    ///
    /// Example: ...d c b a | a a a a...
    #[default]
    Replicate,

    /// Mirror the elements, repeating the edge element.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// Mirror the elements without repeating the edge element.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,

    /// Wrap around to the opposite side.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl BorderMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let period = 2 * len as isize;
        let i = i.rem_euclid(period);
        if i < len as isize {
            i as usize
        } else {
            (period - i - 1) as usize
        }
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let period = 2 * (len as isize - 1);
        let i = i.rem_euclid(period);
        if i < len as isize {
            i as usize
        } else {
            (period - i) as usize
        }
    }

    /// Maps index `i` to a valid index within `[0, len)`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero: an empty axis has no element to fall back on.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_filter::BorderMode;
    ///
    /// assert_eq!(BorderMode::Replicate.map_index(-2, 5), 0);
    /// assert_eq!(BorderMode::Reflect.map_index(-2, 5), 1);
    /// assert_eq!(BorderMode::Reflect101.map_index(-2, 5), 2);
    /// assert_eq!(BorderMode::Wrap.map_index(-2, 5), 3);
    /// ```
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> usize {
        assert!(len > 0, "cannot map an index into an empty axis");
        if i >= 0 && (i as usize) < len {
            return i as usize;
        }
        match self {
            BorderMode::Replicate => i.clamp(0, len as isize - 1) as usize,
            BorderMode::Reflect => Self::reflect(i, len),
            BorderMode::Reflect101 => Self::reflect101(i, len),
            BorderMode::Wrap => i.rem_euclid(len as isize) as usize,
        }
    }

    /// Look up `grid` at `index` after mapping every axis independently.
    #[inline]
    pub fn value_at<T: Copy, const N: usize>(&self, grid: &Grid<T, N>, index: [isize; N]) -> T {
        let shape = grid.shape();
        let mut mapped = [0usize; N];
        for i in 0..N {
            mapped[i] = self.map_index(index[i], shape[i]);
        }
        *grid.get_unchecked(mapped)
    }
}

/// The boundary policy of a filter.
///
/// Every variant except [`Boundary::Custom`] is a stateless built-in policy; `Custom` shares
/// ownership of a user policy, so the policy lives as long as any filter using it.
///
/// The remapping variants panic on grids with an empty axis, which hold no value to return.
pub enum Boundary<T, const N: usize> {
    /// Zero-flux Neumann condition: clamp every axis to the nearest valid index.
    ZeroFluxNeumann,
    /// Periodic condition: wrap every axis around.
    Periodic,
    /// Mirror at the edge, repeating the edge element.
    Reflect,
    /// Mirror at the edge without repeating the edge element.
    Reflect101,
    /// Every index outside the grid reads the given value.
    Constant(T),
    /// A user supplied policy.
    Custom(Arc<dyn BoundaryCondition<T, N>>),
}

impl<T, const N: usize> Boundary<T, N> {
    /// Wrap a user policy.
    pub fn custom(policy: impl BoundaryCondition<T, N> + 'static) -> Self {
        Self::Custom(Arc::new(policy))
    }

    /// The per-axis index mapping of the variant, if it remaps indices.
    pub fn border_mode(&self) -> Option<BorderMode> {
        match self {
            Self::ZeroFluxNeumann => Some(BorderMode::Replicate),
            Self::Periodic => Some(BorderMode::Wrap),
            Self::Reflect => Some(BorderMode::Reflect),
            Self::Reflect101 => Some(BorderMode::Reflect101),
            Self::Constant(_) | Self::Custom(_) => None,
        }
    }
}

impl<T, const N: usize> Default for Boundary<T, N> {
    fn default() -> Self {
        Self::ZeroFluxNeumann
    }
}

impl<T: Clone, const N: usize> Clone for Boundary<T, N> {
    fn clone(&self) -> Self {
        match self {
            Self::ZeroFluxNeumann => Self::ZeroFluxNeumann,
            Self::Periodic => Self::Periodic,
            Self::Reflect => Self::Reflect,
            Self::Reflect101 => Self::Reflect101,
            Self::Constant(v) => Self::Constant(v.clone()),
            Self::Custom(policy) => Self::Custom(Arc::clone(policy)),
        }
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for Boundary<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroFluxNeumann => write!(f, "ZeroFluxNeumann"),
            Self::Periodic => write!(f, "Periodic"),
            Self::Reflect => write!(f, "Reflect"),
            Self::Reflect101 => write!(f, "Reflect101"),
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Custom(policy) => write!(f, "Custom({})", policy.name()),
        }
    }
}

impl<T, const N: usize> BoundaryCondition<T, N> for Boundary<T, N>
where
    T: Copy + Send + Sync,
{
    #[inline]
    fn value_at(&self, grid: &Grid<T, N>, index: [isize; N]) -> T {
        match self {
            Self::Constant(value) => grid.get_signed(index).copied().unwrap_or(*value),
            Self::Custom(policy) => policy.value_at(grid, index),
            Self::ZeroFluxNeumann => BorderMode::Replicate.value_at(grid, index),
            Self::Periodic => BorderMode::Wrap.value_at(grid, index),
            Self::Reflect => BorderMode::Reflect.value_at(grid, index),
            Self::Reflect101 => BorderMode::Reflect101.value_at(grid, index),
        }
    }

    fn name(&self) -> &str {
        match self {
            Self::ZeroFluxNeumann => "zero-flux-neumann",
            Self::Periodic => "periodic",
            Self::Reflect => "reflect",
            Self::Reflect101 => "reflect101",
            Self::Constant(_) => "constant",
            Self::Custom(policy) => policy.name(),
        }
    }
}
