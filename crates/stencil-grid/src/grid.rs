use num_traits::Zero;

use crate::{error::GridError, region::Region, slab::GridSlabMut};

/// Computes the strides for a row-major (C-contiguous) layout.
///
/// The rightmost axis has stride 1, and each axis' stride is the product of all
/// axis sizes to its right.
///
/// # Examples
///
/// ```
/// use stencil_grid::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape([2, 3]), [3, 1]);
/// assert_eq!(get_strides_from_shape([2, 3, 4]), [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// An N-dimensional grid of elements with owned, contiguous storage.
///
/// Elements are laid out in row-major order: the last axis varies fastest in memory.
/// Each element is addressed by an index `[usize; N]`; the valid extent of the grid is
/// the region starting at the origin with the grid's shape (see [`Grid::largest_region`]).
///
/// The element type is free: scalar grids use primitive numbers, vector-valued grids use
/// fixed-size arrays such as `[u8; 3]`.
///
/// # Examples
///
/// ```
/// use stencil_grid::Grid;
///
/// let grid = Grid::<u8, 2>::from_shape_vec([2, 3], vec![1, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(grid.get([1, 0]), Some(&4));
/// assert_eq!(grid.strides(), [3, 1]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T, const N: usize> {
    data: Vec<T>,
    shape: [usize; N],
    strides: [usize; N],
}

impl<T, const N: usize> Grid<T, N> {
    /// Creates a new grid with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape, an error is returned.
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, GridError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(GridError::invalid_shape(numel, data.len()));
        }
        Ok(Self {
            data,
            shape,
            strides: get_strides_from_shape(shape),
        })
    }

    /// Creates a new grid with the given shape, filled with `value`.
    pub fn from_shape_val(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        Self {
            data: vec![value; numel],
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Creates a new grid with the given shape, generating every element from its index.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_grid::Grid;
    ///
    /// let grid = Grid::<usize, 2>::from_shape_fn([2, 2], |[i, j]| i * 2 + j);
    /// assert_eq!(grid.as_slice(), &[0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Self
    where
        F: Fn([usize; N]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let data = (0..numel)
            .map(|i| {
                let mut index = [0; N];
                let mut j = i;
                for k in (0..N).rev() {
                    index[k] = j % shape[k];
                    j /= shape[k];
                }
                f(index)
            })
            .collect();
        Self {
            data,
            shape,
            strides: get_strides_from_shape(shape),
        }
    }

    /// Creates a new grid with the given shape, filled with zeros.
    pub fn zeros(shape: [usize; N]) -> Self
    where
        T: Zero + Clone,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// The size of the grid along every axis.
    #[inline]
    pub fn shape(&self) -> [usize; N] {
        self.shape
    }

    /// The number of elements to skip in memory to move one step along every axis.
    #[inline]
    pub fn strides(&self) -> [usize; N] {
        self.strides
    }

    /// Returns the number of elements in the grid.
    #[inline]
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// The valid extent of the grid: the region at the origin with the grid's shape.
    #[inline]
    pub fn largest_region(&self) -> Region<N> {
        Region::from_size(self.shape)
    }

    /// Returns true if the signed `index` addresses an element of the grid.
    #[inline]
    pub fn contains_index(&self, index: [isize; N]) -> bool {
        index
            .iter()
            .zip(self.shape.iter())
            .all(|(&i, &s)| i >= 0 && (i as usize) < s)
    }

    /// Get the data of the grid as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Get the data of the grid as a mutable slice.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the grid and returns the underlying vector.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns an iterator over the elements in memory order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    /// Get the memory offset of the element at the given index.
    ///
    /// Returns `None` if the index is outside the grid.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.shape).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the memory offset of the element at the given index without checking axis sizes.
    #[inline]
    pub fn get_iter_offset_unchecked(&self, index: [usize; N]) -> usize {
        index
            .iter()
            .zip(self.strides)
            .map(|(&idx, stride)| idx * stride)
            .sum()
    }

    /// Get the index of the element at the given memory offset.
    ///
    /// # Errors
    ///
    /// If the offset is out of bounds (>= numel), an error is returned.
    pub fn get_index(&self, offset: usize) -> Result<[usize; N], GridError> {
        let numel = self.numel();
        if offset >= numel {
            return Err(GridError::index_out_of_bounds(offset, numel));
        }
        let mut index = [0; N];
        let mut rem = offset;
        for (i, &stride) in self.strides.iter().enumerate() {
            index[i] = rem / stride;
            rem %= stride;
        }
        Ok(index)
    }

    /// Get the element at the given index, or `None` if the index is out of bounds.
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index).map(|offset| &self.data[offset])
    }

    /// Get a mutable reference to the element at the given index.
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        self.get_iter_offset(index)
            .map(move |offset| &mut self.data[offset])
    }

    /// Get the element at a signed index, or `None` if the index is outside the grid.
    pub fn get_signed(&self, index: [isize; N]) -> Option<&T> {
        if !self.contains_index(index) {
            return None;
        }
        Some(&self.data[self.get_iter_offset_unchecked(index.map(|i| i as usize))])
    }

    /// Get the element at the given index without checking the axis sizes.
    ///
    /// # Panics
    ///
    /// Panics if the resulting offset falls outside the storage.
    #[inline]
    pub fn get_unchecked(&self, index: [usize; N]) -> &T {
        &self.data[self.get_iter_offset_unchecked(index)]
    }

    /// Apply `f` to every element, producing a new grid with the same shape.
    pub fn map<U, F>(&self, f: F) -> Grid<U, N>
    where
        F: Fn(&T) -> U,
    {
        Grid {
            data: self.data.iter().map(f).collect(),
            shape: self.shape,
            strides: self.strides,
        }
    }

    /// Borrow the hyperplanes `range` of the leading axis as a mutable slab.
    ///
    /// # Errors
    ///
    /// Returns an error if the range does not fit the leading axis or the grid is 0-dimensional.
    pub fn slab_mut(
        &mut self,
        range: std::ops::Range<usize>,
    ) -> Result<GridSlabMut<'_, T, N>, GridError> {
        let planes = self.shape.first().copied().unwrap_or(0);
        if N == 0 || range.start > range.end || range.end > planes {
            return Err(GridError::SlabOutOfBounds {
                start: range.start,
                end: range.end,
                size: planes,
            });
        }
        let plane_len = self.strides[0];
        let data = &mut self.data[range.start * plane_len..range.end * plane_len];
        Ok(GridSlabMut::new(data, self.shape, self.strides, range.start))
    }

    /// Borrow the whole grid as a mutable slab.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid is 0-dimensional.
    pub fn as_slab_mut(&mut self) -> Result<GridSlabMut<'_, T, N>, GridError> {
        let planes = self.shape.first().copied().unwrap_or(0);
        self.slab_mut(0..planes)
    }
}
