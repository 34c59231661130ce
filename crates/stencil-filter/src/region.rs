use stencil_grid::Region;

use crate::error::FilterError;

/// Compute the input region a neighborhood filter needs to produce `output`.
///
/// The output region is padded by `radius` on both sides of every axis and cropped to the
/// valid extent of the input. Reads outside the cropped region are served by the boundary
/// condition, so the cropped region is sufficient.
///
/// An empty output region needs no input and yields an empty region at the output's index.
///
/// # Errors
///
/// Returns [`FilterError::EmptyInputRegion`] if the padded region does not overlap the input
/// extent at all: the requested output lies entirely outside any valid input.
///
/// # Examples
///
/// ```
/// use stencil_filter::required_input_region;
/// use stencil_grid::Region;
///
/// let extent = Region::from_size([10, 10]);
/// let output = Region::new([0, 4], [3, 6]);
/// let input = required_input_region(&output, [1, 2], &extent).unwrap();
/// assert_eq!(input, Region::new([0, 2], [4, 8]));
/// ```
pub fn required_input_region<const N: usize>(
    output: &Region<N>,
    radius: [usize; N],
    extent: &Region<N>,
) -> Result<Region<N>, FilterError> {
    if output.is_empty() {
        return Ok(Region::new(output.index, [0; N]));
    }

    output
        .pad_by_radius(radius)
        .crop(extent)
        .ok_or_else(|| FilterError::EmptyInputRegion {
            output: output.to_string(),
            radius: radius.to_vec(),
            extent: extent.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_inside_extent() -> Result<(), FilterError> {
        let extent = Region::from_size([20, 20, 20]);
        let output = Region::new([5, 5, 5], [2, 3, 4]);
        let input = required_input_region(&output, [1, 2, 3], &extent)?;
        assert_eq!(input, Region::new([4, 3, 2], [4, 7, 10]));
        Ok(())
    }

    #[test]
    fn clipped_at_both_ends() -> Result<(), FilterError> {
        let extent = Region::from_size([5]);
        let input = required_input_region(&Region::from_size([5]), [3], &extent)?;
        assert_eq!(input, extent);
        Ok(())
    }

    #[test]
    fn disjoint_output_is_an_error() {
        let extent = Region::from_size([8, 8]);
        let output = Region::new([20, 0], [2, 2]);
        let res = required_input_region(&output, [1, 1], &extent);
        assert!(matches!(res, Err(FilterError::EmptyInputRegion { .. })));
    }

    #[test]
    fn padding_reaches_extent() -> Result<(), FilterError> {
        // output starts just past the extent, the radius pulls it back in
        let extent = Region::from_size([8]);
        let input = required_input_region(&Region::new([9], [2]), [2], &extent)?;
        assert_eq!(input, Region::new([7], [1]));
        Ok(())
    }

    #[test]
    fn empty_output_needs_nothing() -> Result<(), FilterError> {
        let extent = Region::from_size([8, 8]);
        let input = required_input_region(&Region::new([3, 3], [0, 4]), [2, 2], &extent)?;
        assert!(input.is_empty());
        Ok(())
    }
}
