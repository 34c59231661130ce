use crate::{error::GridError, region::Region};

/// A mutable borrow of a contiguous range of hyperplanes along the leading axis of a grid.
///
/// A slab is the unit of exclusive write access handed to a worker: two slabs obtained by
/// [`GridSlabMut::split_at`] never alias, so they can be written from different threads
/// without synchronization. Indices passed to a slab are indices of the full grid.
#[derive(Debug)]
pub struct GridSlabMut<'a, T, const N: usize> {
    data: &'a mut [T],
    shape: [usize; N],
    strides: [usize; N],
    start: usize,
}

impl<'a, T, const N: usize> GridSlabMut<'a, T, N> {
    pub(crate) fn new(
        data: &'a mut [T],
        shape: [usize; N],
        strides: [usize; N],
        start: usize,
    ) -> Self {
        Self {
            data,
            shape,
            strides,
            start,
        }
    }

    /// The shape of the full grid the slab belongs to.
    #[inline]
    pub fn grid_shape(&self) -> [usize; N] {
        self.shape
    }

    /// The first hyperplane of the slab along the leading axis.
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// The number of hyperplanes in the slab.
    #[inline]
    pub fn planes(&self) -> usize {
        match self.strides[0] {
            0 => 0,
            plane_len => self.data.len() / plane_len,
        }
    }

    /// The region of grid indices owned by the slab.
    pub fn region(&self) -> Region<N> {
        let mut region = Region::from_size(self.shape);
        region.index[0] = self.start as isize;
        region.size[0] = self.planes();
        region
    }

    /// The elements owned by the slab, in memory order.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Returns the offset inside the slab of the grid index, or `None` if the slab does not own it.
    pub fn offset_of(&self, index: [usize; N]) -> Option<usize> {
        if index[0] < self.start || index[0] >= self.start + self.planes() {
            return None;
        }
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.shape).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset - self.start * self.strides[0])
    }

    /// Get a mutable reference to the element at the given grid index.
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        self.offset_of(index).map(move |offset| &mut self.data[offset])
    }

    /// Split the slab into `[start, at)` and `[at, end)` along the leading axis.
    ///
    /// # Errors
    ///
    /// Returns an error if `at` lies outside the slab.
    pub fn split_at(self, at: usize) -> Result<(Self, Self), GridError> {
        let end = self.start + self.planes();
        if at < self.start || at > end {
            return Err(GridError::SlabOutOfBounds {
                start: at,
                end,
                size: self.shape[0],
            });
        }
        let Self {
            data,
            shape,
            strides,
            start,
        } = self;
        let (lo, hi) = data.split_at_mut((at - start) * strides[0]);
        Ok((
            Self::new(lo, shape, strides, start),
            Self::new(hi, shape, strides, at),
        ))
    }
}
