use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

use stencil_filter::{
    kernels, parallel::split_region, Boundary, ExecutionStrategy, FilterError, Kernel,
    NeighborhoodOperatorFilter,
};
use stencil_grid::{Grid, Region};

fn init_logger() {
    // Attempt to initialize env_logger. If it fails, logging is already initialized.
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_grid<const N: usize>(rng: &mut StdRng, shape: [usize; N]) -> Grid<f64, N> {
    let numel = shape.iter().product::<usize>();
    let data = (0..numel).map(|_| rng.random_range(-10.0..10.0)).collect();
    Grid::from_shape_vec(shape, data).expect("shape matches data")
}

fn random_kernel<const N: usize>(rng: &mut StdRng, radius: [usize; N]) -> Kernel<f64, N> {
    let numel = radius.iter().map(|r| 2 * r + 1).product::<usize>();
    let weights = (0..numel).map(|_| rng.random_range(-1.0..1.0)).collect();
    Kernel::new(radius, weights).expect("weights match radius")
}

fn flip<T: Copy, const N: usize>(grid: &Grid<T, N>) -> Grid<T, N> {
    let shape = grid.shape();
    Grid::from_shape_fn(shape, |index| {
        let mut flipped = index;
        for (i, s) in flipped.iter_mut().zip(shape) {
            *i = s - 1 - *i;
        }
        *grid.get_unchecked(flipped)
    })
}

fn boundaries() -> Vec<Boundary<f64, 3>> {
    vec![
        Boundary::ZeroFluxNeumann,
        Boundary::Periodic,
        Boundary::Reflect,
        Boundary::Reflect101,
        Boundary::Constant(0.5),
    ]
}

#[test]
fn padding_with_zero_flux() -> Result<(), FilterError> {
    init_logger();
    let src = Grid::<i32, 1>::from_shape_vec([5], vec![1, 2, 3, 4, 5])?;
    let mut dst = Grid::<i32, 1>::zeros([5]);
    let kernel = Kernel::new([1], vec![1.0, 1.0, 1.0])?;
    NeighborhoodOperatorFilter::<i32, i32, 1>::new(&kernel).apply(&src, &mut dst)?;

    assert_eq!(dst.get([0]), Some(&4));
    assert_eq!(dst.get([2]), Some(&9));
    assert_eq!(dst.get([4]), Some(&14));
    Ok(())
}

#[test]
fn writes_exactly_the_requested_region() -> Result<(), FilterError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(7);
    let src = random_grid(&mut rng, [6, 7, 5]);
    let kernel = random_kernel(&mut rng, [1, 2, 1]);
    let filter = NeighborhoodOperatorFilter::<f64, f64, 3>::new(&kernel);

    let region = Region::new([1, 0, 2], [3, 7, 2]);
    let mut dst = Grid::<f64, 3>::from_shape_val(src.shape(), f64::NAN);
    filter.apply_to_region(&src, &mut dst, &region)?;

    for index in dst.largest_region().indices() {
        let value = *dst.get_unchecked(index.map(|i| i as usize));
        assert_eq!(region.contains_index(index), !value.is_nan(), "at {index:?}");
    }
    Ok(())
}

#[test]
fn identity_reproduces_input() -> Result<(), FilterError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(11);
    let data = (0..8 * 9).map(|_| rng.random::<u8>()).collect();
    let src = Grid::<u8, 2>::from_shape_vec([8, 9], data)?;

    let kernel = Kernel::<f64, 2>::identity();
    let mut filter = NeighborhoodOperatorFilter::<u8, u8, 2>::new(&kernel);
    for boundary in [Boundary::ZeroFluxNeumann, Boundary::Periodic, Boundary::Constant(0)] {
        filter.override_boundary_condition(boundary);
        let mut dst = Grid::<u8, 2>::zeros([8, 9]);
        filter.apply(&src, &mut dst)?;
        assert_eq!(dst, src);
    }
    Ok(())
}

#[test]
fn symmetric_kernel_correlation_equals_convolution() -> Result<(), FilterError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(13);
    let src = random_grid(&mut rng, [5, 6, 7]);
    let kernel = kernels::gaussian_kernel::<f64, 3>([1, 2, 1], [1.0, 1.5, 0.7])?;
    assert!(kernel.is_symmetric());

    let mut correlated = Grid::<f64, 3>::zeros(src.shape());
    let mut convolved = Grid::<f64, 3>::zeros(src.shape());
    for boundary in boundaries() {
        NeighborhoodOperatorFilter::<f64, f64, 3>::new(&kernel)
            .with_boundary_condition(boundary.clone())
            .apply(&src, &mut correlated)?;
        NeighborhoodOperatorFilter::<f64, f64, 3>::new(&kernel.mirrored())
            .with_boundary_condition(boundary)
            .apply(&src, &mut convolved)?;
        assert_eq!(correlated, convolved);
    }
    Ok(())
}

#[test]
fn mirrored_kernel_reflects_output() -> Result<(), FilterError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(17);
    let src = random_grid(&mut rng, [6, 5, 4]);
    let kernel = random_kernel(&mut rng, [1, 1, 2]);
    assert!(!kernel.is_symmetric());

    // flipping the input flips the output when the boundary is itself symmetric
    for boundary in boundaries() {
        let mut direct = Grid::<f64, 3>::zeros(src.shape());
        NeighborhoodOperatorFilter::<f64, f64, 3>::new(&kernel)
            .with_boundary_condition(boundary.clone())
            .apply(&src, &mut direct)?;

        let mut reflected = Grid::<f64, 3>::zeros(src.shape());
        NeighborhoodOperatorFilter::<f64, f64, 3>::new(&kernel.mirrored())
            .with_boundary_condition(boundary)
            .apply(&flip(&src), &mut reflected)?;

        for (a, b) in direct.iter().zip(flip(&reflected).iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }
    Ok(())
}

#[test]
fn repeated_runs_are_bit_identical() -> Result<(), FilterError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(19);
    let src = random_grid(&mut rng, [16, 12, 10]);
    let kernel = random_kernel(&mut rng, [2, 1, 1]);

    let mut outputs = Vec::new();
    for strategy in [
        ExecutionStrategy::Serial,
        ExecutionStrategy::Serial,
        ExecutionStrategy::Parallel,
        ExecutionStrategy::Fixed(3),
        ExecutionStrategy::Fixed(16),
        ExecutionStrategy::Auto,
    ] {
        let mut dst = Grid::<f64, 3>::zeros(src.shape());
        NeighborhoodOperatorFilter::<f64, f64, 3>::new(&kernel)
            .with_boundary_condition(Boundary::Reflect101)
            .with_strategy(strategy)
            .apply(&src, &mut dst)?;
        outputs.push(dst);
    }

    for output in &outputs[1..] {
        assert_eq!(output.as_slice(), outputs[0].as_slice());
    }
    Ok(())
}

#[test]
fn split_regions_match_full_region() -> Result<(), FilterError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(23);
    let src = random_grid(&mut rng, [9, 8, 7]);
    let kernel = random_kernel(&mut rng, [1, 1, 1]);
    let filter = NeighborhoodOperatorFilter::<f64, f64, 3>::new(&kernel)
        .with_boundary_condition(Boundary::Periodic)
        .with_strategy(ExecutionStrategy::Serial);

    let mut full = Grid::<f64, 3>::zeros(src.shape());
    filter.apply(&src, &mut full)?;

    // leading-axis slabs
    let mut pieces = Grid::<f64, 3>::zeros(src.shape());
    for piece in split_region(&full.largest_region(), 4) {
        filter.apply_to_region(&src, &mut pieces, &piece)?;
    }
    assert_eq!(pieces, full);

    // an irregular tiling along the other axes
    let mut tiles = Grid::<f64, 3>::zeros(src.shape());
    for (y, h) in [(0, 3), (3, 5)] {
        for (x, w) in [(0, 1), (1, 4), (5, 2)] {
            filter.apply_to_region(&src, &mut tiles, &Region::new([0, y, x], [9, h, w]))?;
        }
    }
    assert_eq!(tiles, full);
    Ok(())
}

#[test]
fn empty_region_leaves_output_untouched() -> Result<(), FilterError> {
    init_logger();
    let src = Grid::<f32, 3>::from_shape_val([3, 3, 3], 1.0);
    let mut dst = Grid::<f32, 3>::from_shape_val([3, 3, 3], 7.0);
    let kernel = kernels::box_kernel::<f64, 3>([1, 1, 1])?;
    let filter = NeighborhoodOperatorFilter::<f32, f32, 3>::new(&kernel)
        .with_strategy(ExecutionStrategy::Parallel);

    filter.apply_to_region(&src, &mut dst, &Region::new([1, 1, 1], [2, 0, 2]))?;
    assert!(dst.iter().all(|&v| v == 7.0));
    Ok(())
}

#[test]
fn input_region_covers_every_read() -> Result<(), FilterError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(29);
    let src = random_grid(&mut rng, [10, 10, 10]);
    let kernel = random_kernel(&mut rng, [2, 1, 0]);
    let filter = NeighborhoodOperatorFilter::<f64, f64, 3>::new(&kernel);

    let output = Region::new([4, 0, 3], [3, 4, 5]);
    let input = filter.generate_input_requested_region(&output, &src.largest_region())?;
    assert_eq!(input, Region::new([2, 0, 3], [7, 5, 5]));

    // poison everything outside the requested input and check the output is unaffected
    let masked = Grid::from_shape_fn(src.shape(), |index| {
        if input.contains_index(index.map(|i| i as isize)) {
            *src.get_unchecked(index)
        } else {
            f64::NAN
        }
    });

    let mut expected = Grid::<f64, 3>::zeros(src.shape());
    let mut actual = Grid::<f64, 3>::zeros(src.shape());
    filter.apply_to_region(&src, &mut expected, &output)?;
    filter.apply_to_region(&masked, &mut actual, &output)?;
    assert_eq!(actual, expected);
    Ok(())
}
