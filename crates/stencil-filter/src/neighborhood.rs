use stencil_grid::{Grid, Region};

use crate::boundary::BoundaryCondition;

/// A window over the neighborhood of a grid element.
///
/// The cursor precomputes the footprint offsets of a kernel radius, both as index offsets and
/// as memory offsets. Centers whose whole window lies inside the grid read memory directly;
/// other centers resolve out-of-range neighbors through the boundary condition.
///
/// Visiting order is the row-major order of the footprint, i.e. the weight order of a
/// [`crate::Kernel`] with the same radius.
pub struct NeighborhoodCursor<'a, T, B: ?Sized, const N: usize> {
    grid: &'a Grid<T, N>,
    boundary: &'a B,
    offsets: Vec<[isize; N]>,
    linear_offsets: Vec<isize>,
    interior: Region<N>,
}

impl<'a, T, B, const N: usize> NeighborhoodCursor<'a, T, B, N>
where
    T: Copy,
    B: BoundaryCondition<T, N> + ?Sized,
{
    /// Create a cursor over `grid` for a window of the given radius.
    pub fn new(grid: &'a Grid<T, N>, radius: [usize; N], boundary: &'a B) -> Self {
        let footprint = Region::new(radius.map(|r| -(r as isize)), radius.map(|r| 2 * r + 1));
        let strides = grid.strides();

        let offsets = footprint.indices().collect::<Vec<_>>();
        let linear_offsets = offsets
            .iter()
            .map(|offset| {
                offset
                    .iter()
                    .zip(strides.iter())
                    .map(|(&o, &s)| o * s as isize)
                    .sum::<isize>()
            })
            .collect();

        // centers whose full window stays inside the grid
        let shape = grid.shape();
        let mut interior = Region::from_size([0; N]);
        for i in 0..N {
            interior.index[i] = radius[i] as isize;
            interior.size[i] = shape[i].saturating_sub(2 * radius[i]);
        }

        Self {
            grid,
            boundary,
            offsets,
            linear_offsets,
            interior,
        }
    }

    /// The number of elements in the window.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns true if the window has no elements, which never happens for a valid radius.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// The centers whose window needs no boundary condition.
    #[inline]
    pub fn interior(&self) -> &Region<N> {
        &self.interior
    }

    /// Visit every neighbor of `center` with its position in the footprint.
    ///
    /// `center` must lie inside the grid.
    #[inline]
    pub fn for_each<F>(&self, center: [isize; N], mut f: F)
    where
        F: FnMut(usize, T),
    {
        let data = self.grid.as_slice();
        if self.interior.contains_index(center) {
            let base = self
                .grid
                .get_iter_offset_unchecked(center.map(|c| c as usize)) as isize;
            for (k, &lo) in self.linear_offsets.iter().enumerate() {
                f(k, data[(base + lo) as usize]);
            }
            return;
        }

        for (k, offset) in self.offsets.iter().enumerate() {
            let mut index = center;
            for (i, o) in index.iter_mut().zip(offset) {
                *i += o;
            }
            let value = match self.grid.get_signed(index) {
                Some(v) => *v,
                None => self.boundary.value_at(self.grid, index),
            };
            f(k, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boundary::Boundary;

    #[test]
    fn interior_window_reads_memory() {
        let grid = Grid::<i32, 2>::from_shape_fn([4, 5], |[r, c]| (10 * r + c) as i32);
        let boundary = Boundary::<i32, 2>::ZeroFluxNeumann;
        let cursor = NeighborhoodCursor::new(&grid, [1, 1], &boundary);
        assert_eq!(cursor.interior(), &Region::new([1, 1], [2, 3]));

        let mut values = Vec::new();
        cursor.for_each([1, 2], |_, v| values.push(v));
        assert_eq!(values, vec![1, 2, 3, 11, 12, 13, 21, 22, 23]);
    }

    #[test]
    fn edge_window_uses_boundary() {
        let grid = Grid::<i32, 2>::from_shape_fn([4, 5], |[r, c]| (10 * r + c) as i32);
        let boundary = Boundary::<i32, 2>::Constant(-1);
        let cursor = NeighborhoodCursor::new(&grid, [1, 1], &boundary);

        let mut values = vec![0; cursor.len()];
        cursor.for_each([0, 0], |k, v| values[k] = v);
        assert_eq!(values, vec![-1, -1, -1, -1, 0, 1, -1, 10, 11]);
    }

    #[test]
    fn small_grid_has_no_interior() {
        let grid = Grid::<i32, 1>::from_shape_val([2], 1);
        let boundary = Boundary::<i32, 1>::ZeroFluxNeumann;
        let cursor = NeighborhoodCursor::new(&grid, [1], &boundary);
        assert!(cursor.interior().is_empty());

        let mut sum = 0;
        cursor.for_each([0], |_, v| sum += v);
        assert_eq!(sum, 3);
    }
}
