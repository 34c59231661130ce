use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use stencil_filter::{kernels, Boundary, ExecutionStrategy, NeighborhoodOperatorFilter};
use stencil_grid::Grid;

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Neighborhood Filter");

    for (height, width) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for radius in [1, 2, 4].iter() {
            let kernel_size = 2 * radius + 1;
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * kernel_size * kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);

            // input grid
            let src = Grid::<u8, 2>::from_shape_fn([*height, *width], |[r, c]| (r ^ c) as u8);
            let src_f32 = src.map(|&v| v as f32);

            // output grid
            let dst = Grid::<u8, 2>::zeros([*height, *width]);
            let dst_f32 = Grid::<f32, 2>::zeros([*height, *width]);

            let kernel =
                kernels::gaussian_kernel::<f64, 2>([*radius, *radius], [1.5, 1.5]).unwrap();
            let kernel_f32 =
                kernels::gaussian_kernel::<f32, 2>([*radius, *radius], [1.5, 1.5]).unwrap();

            for (name, strategy) in [
                ("serial", ExecutionStrategy::Serial),
                ("parallel", ExecutionStrategy::Parallel),
            ] {
                let filter =
                    NeighborhoodOperatorFilter::<u8, u8, 2>::new(&kernel).with_strategy(strategy);
                group.bench_with_input(
                    BenchmarkId::new(format!("gaussian_u8_{name}"), &parameter_string),
                    &(&src, &dst),
                    |b, i| {
                        let (src, mut dst) = (i.0, i.1.clone());
                        b.iter(|| black_box(filter.apply(src, &mut dst)))
                    },
                );
            }

            let filter = NeighborhoodOperatorFilter::<f32, f32, 2, f32>::new(&kernel_f32)
                .with_boundary_condition(Boundary::Reflect101);
            group.bench_with_input(
                BenchmarkId::new("gaussian_f32_reflect101", &parameter_string),
                &(&src_f32, &dst_f32),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(filter.apply(src, &mut dst)))
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_filters);
criterion_main!(benches);
