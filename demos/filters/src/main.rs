use argh::FromArgs;
use std::{path::PathBuf, str::FromStr};

use stencil::filter::{kernels, Boundary, ExecutionStrategy, Kernel, NeighborhoodOperatorFilter};
use stencil::grid::Grid;

#[derive(Debug, Clone, Copy)]
enum FilterKind {
    Box,
    Gaussian,
    Sobel,
    Laplacian,
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(Self::Box),
            "gaussian" => Ok(Self::Gaussian),
            "sobel" => Ok(Self::Sobel),
            "laplacian" => Ok(Self::Laplacian),
            _ => Err(format!(
                "unknown filter {s:?}, expected box, gaussian, sobel or laplacian"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum BoundaryKind {
    ZeroFlux,
    Periodic,
    Reflect,
    Reflect101,
    Constant,
}

impl FromStr for BoundaryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zero-flux" => Ok(Self::ZeroFlux),
            "periodic" => Ok(Self::Periodic),
            "reflect" => Ok(Self::Reflect),
            "reflect101" => Ok(Self::Reflect101),
            "constant" => Ok(Self::Constant),
            _ => Err(format!("unknown boundary {s:?}")),
        }
    }
}

#[derive(FromArgs)]
/// Filter a synthetic 2-D grid and report statistics of the result
struct Args {
    /// filter to apply: box, gaussian, sobel or laplacian
    #[argh(option, short = 'f', default = "FilterKind::Gaussian")]
    filter: FilterKind,

    /// boundary condition: zero-flux, periodic, reflect, reflect101 or constant
    #[argh(option, short = 'b', default = "BoundaryKind::ZeroFlux")]
    boundary: BoundaryKind,

    /// value read outside the grid with the constant boundary condition
    #[argh(option, default = "0.0")]
    fill: f32,

    /// side length of the grid
    #[argh(option, short = 's', default = "256")]
    size: usize,

    /// kernel radius of the box and gaussian filters
    #[argh(option, short = 'r', default = "2")]
    radius: usize,

    /// standard deviation of the gaussian filter
    #[argh(option, default = "1.0")]
    sigma: f64,

    /// number of worker threads, automatic if not set
    #[argh(option, short = 't')]
    threads: Option<usize>,

    /// write the filtered grid as json to this path
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,
}

fn make_kernel(args: &Args) -> Result<Kernel<f64, 2>, Box<dyn std::error::Error>> {
    let kernel = match args.filter {
        FilterKind::Box => kernels::box_kernel([args.radius; 2])?,
        FilterKind::Gaussian => kernels::gaussian_kernel([args.radius; 2], [args.sigma; 2])?,
        FilterKind::Sobel => kernels::sobel_kernel(1)?,
        FilterKind::Laplacian => kernels::laplacian_kernel()?,
    };
    Ok(kernel)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    // a checkerboard of 16 pixel tiles over a horizontal ramp
    let size = args.size;
    let src = Grid::<f32, 2>::from_shape_fn([size, size], |[y, x]| {
        let tile = if (y / 16 + x / 16) % 2 == 0 { 0.0 } else { 100.0 };
        tile + x as f32 / size as f32 * 50.0
    });

    let boundary = match args.boundary {
        BoundaryKind::ZeroFlux => Boundary::ZeroFluxNeumann,
        BoundaryKind::Periodic => Boundary::Periodic,
        BoundaryKind::Reflect => Boundary::Reflect,
        BoundaryKind::Reflect101 => Boundary::Reflect101,
        BoundaryKind::Constant => Boundary::Constant(args.fill),
    };

    let strategy = match args.threads {
        Some(n) => ExecutionStrategy::Fixed(n),
        None => ExecutionStrategy::Auto,
    };

    let kernel = make_kernel(&args)?;
    log::info!(
        "{:?} filter with radius {:?} and {:?} boundary",
        args.filter,
        kernel.radius(),
        boundary
    );

    let filter = NeighborhoodOperatorFilter::<f32, f32, 2>::new(&kernel)
        .with_boundary_condition(boundary)
        .with_strategy(strategy);

    let mut dst = Grid::<f32, 2>::zeros([size, size]);
    let start = std::time::Instant::now();
    filter.apply(&src, &mut dst)?;
    let elapsed = start.elapsed();

    let (min, max, sum) = dst.iter().fold(
        (f32::INFINITY, f32::NEG_INFINITY, 0.0f64),
        |(min, max, sum), &v| (min.min(v), max.max(v), sum + v as f64),
    );
    println!(
        "filtered {size}x{size} grid in {elapsed:?}: min {min:.3}, max {max:.3}, mean {:.3}",
        sum / dst.numel().max(1) as f64
    );

    if let Some(path) = args.output {
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer(std::io::BufWriter::new(file), &dst)?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}
