use std::fmt;

/// An axis-aligned box of grid indices.
///
/// A region is described by the index of its first element and its size along every axis.
/// Indices are signed so that regions may extend past the valid extent of a grid, which is
/// what happens when an output region is padded by a kernel radius.
///
/// A region with a zero size along any axis is empty and contains no indices.
///
/// # Examples
///
/// ```
/// use stencil_grid::Region;
///
/// let region = Region::new([1, 2], [3, 4]);
/// assert_eq!(region.numel(), 12);
/// assert!(region.contains_index([3, 5]));
/// assert!(!region.contains_index([4, 5]));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Region<const N: usize> {
    /// The index of the first element of the region.
    pub index: [isize; N],
    /// The number of elements along each axis.
    pub size: [usize; N],
}

impl<const N: usize> Region<N> {
    /// Create a new region from its starting index and size.
    pub fn new(index: [isize; N], size: [usize; N]) -> Self {
        Self { index, size }
    }

    /// Create a region starting at the origin with the given size.
    pub fn from_size(size: [usize; N]) -> Self {
        Self {
            index: [0; N],
            size,
        }
    }

    /// Returns true if the region has a zero size along any axis.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.iter().any(|&s| s == 0)
    }

    /// Returns the number of indices contained in the region.
    #[inline]
    pub fn numel(&self) -> usize {
        self.size.iter().product()
    }

    /// Returns the last index of the region (inclusive), or `None` if the region is empty.
    pub fn upper_index(&self) -> Option<[isize; N]> {
        if self.is_empty() {
            return None;
        }
        let mut upper = self.index;
        for (u, &s) in upper.iter_mut().zip(self.size.iter()) {
            *u += s as isize - 1;
        }
        Some(upper)
    }

    /// Grow the region by `radius[i]` elements on both sides of every axis `i`.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_grid::Region;
    ///
    /// let padded = Region::new([2, 3], [4, 5]).pad_by_radius([1, 2]);
    /// assert_eq!(padded, Region::new([1, 1], [6, 9]));
    /// ```
    pub fn pad_by_radius(&self, radius: [usize; N]) -> Self {
        let mut padded = *self;
        for i in 0..N {
            padded.index[i] -= radius[i] as isize;
            padded.size[i] += 2 * radius[i];
        }
        padded
    }

    /// Intersect the region with `other`.
    ///
    /// Returns `None` when the intersection is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_grid::Region;
    ///
    /// let a = Region::new([-1, -1], [4, 4]);
    /// let b = Region::from_size([10, 10]);
    /// assert_eq!(a.crop(&b), Some(Region::new([0, 0], [3, 3])));
    ///
    /// let far = Region::new([20, 20], [2, 2]);
    /// assert!(far.crop(&b).is_none());
    /// ```
    pub fn crop(&self, other: &Region<N>) -> Option<Region<N>> {
        if self.is_empty() || other.is_empty() {
            return None;
        }
        let mut cropped = Region::from_size([0; N]);
        for i in 0..N {
            let lo = self.index[i].max(other.index[i]);
            let hi = (self.index[i] + self.size[i] as isize)
                .min(other.index[i] + other.size[i] as isize);
            if hi <= lo {
                return None;
            }
            cropped.index[i] = lo;
            cropped.size[i] = (hi - lo) as usize;
        }
        Some(cropped)
    }

    /// Returns true if `index` lies inside the region.
    #[inline]
    pub fn contains_index(&self, index: [isize; N]) -> bool {
        index
            .iter()
            .zip(self.index.iter().zip(self.size.iter()))
            .all(|(&i, (&start, &size))| i >= start && i < start + size as isize)
    }

    /// Returns true if every index of the region lies inside `other`.
    ///
    /// An empty region contains no indices and is therefore inside any region.
    pub fn is_inside(&self, other: &Region<N>) -> bool {
        if self.is_empty() {
            return true;
        }
        (0..N).all(|i| {
            self.index[i] >= other.index[i]
                && self.index[i] + self.size[i] as isize
                    <= other.index[i] + other.size[i] as isize
        })
    }

    /// Returns an iterator over the indices of the region in row-major order.
    ///
    /// The last axis varies fastest.
    pub fn indices(&self) -> RegionIndices<N> {
        let remaining = if self.is_empty() { 0 } else { self.numel() };
        RegionIndices {
            region: *self,
            next: (remaining > 0).then_some(self.index),
            remaining,
        }
    }

    /// Split the region into at most `pieces` contiguous regions along `axis`.
    ///
    /// The pieces are disjoint, ordered by increasing index and together cover the region.
    /// Fewer pieces are returned when the axis is shorter than `pieces`. An empty region
    /// produces no pieces.
    ///
    /// # Examples
    ///
    /// ```
    /// use stencil_grid::Region;
    ///
    /// let pieces = Region::from_size([10, 4]).split_along_axis(0, 3);
    /// assert_eq!(pieces.len(), 3);
    /// assert_eq!(pieces[0], Region::new([0, 0], [4, 4]));
    /// assert_eq!(pieces[1], Region::new([4, 0], [4, 4]));
    /// assert_eq!(pieces[2], Region::new([8, 0], [2, 4]));
    /// ```
    pub fn split_along_axis(&self, axis: usize, pieces: usize) -> Vec<Region<N>> {
        if self.is_empty() {
            return Vec::new();
        }
        if axis >= N || pieces <= 1 {
            return vec![*self];
        }

        let len = self.size[axis];
        let chunk = len.div_ceil(pieces.min(len));

        let mut out = Vec::with_capacity(len.div_ceil(chunk));
        let mut offset = 0;
        while offset < len {
            let mut piece = *self;
            piece.index[axis] += offset as isize;
            piece.size[axis] = chunk.min(len - offset);
            out.push(piece);
            offset += chunk;
        }
        out
    }
}

impl<const N: usize> fmt::Display for Region<N> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Region {{ index: {:?}, size: {:?} }}", self.index, self.size)
    }
}

/// Row-major iterator over the indices of a [`Region`].
#[derive(Clone, Debug)]
pub struct RegionIndices<const N: usize> {
    region: Region<N>,
    next: Option<[isize; N]>,
    remaining: usize,
}

impl<const N: usize> Iterator for RegionIndices<N> {
    type Item = [isize; N];

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.remaining -= 1;

        let mut next = current;
        let mut axis = N;
        self.next = loop {
            if axis == 0 {
                break None;
            }
            axis -= 1;
            next[axis] += 1;
            if next[axis] < self.region.index[axis] + self.region.size[axis] as isize {
                break Some(next);
            }
            next[axis] = self.region.index[axis];
        };

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<const N: usize> ExactSizeIterator for RegionIndices<N> {}
