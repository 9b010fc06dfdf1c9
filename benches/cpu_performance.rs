use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use dyeflow::advection::{self, AdvectionParams};
use dyeflow::divergence::compute_divergence;
use dyeflow::gradient::subtract_gradient;
use dyeflow::{ForceSite, Grid, MultiBuffer, Simulation, SolverConfig, pressure};
use glam::Vec2;

fn stirring_site() -> ForceSite {
    ForceSite::new(1, Vec2::new(0.5, 0.5), 0.25, [1.0, 0.3, 0.1])
        .with_impulse(Vec2::new(0.01, 0.005))
}

fn benchmark_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");
    let config = SolverConfig::default();

    for size in [64, 128, 256].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let mut sim = Simulation::new(size, size);
            let site = stirring_site();

            b.iter(|| {
                sim.step(&config, black_box(&[site]));
            });
        });
    }
    group.finish();
}

fn benchmark_iterations(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobi_iterations");
    let mut sim = Simulation::new(128, 128);
    sim.step(&SolverConfig::default(), &[stirring_site()]);
    let divergence = sim.current_divergence().clone();

    for iterations in [16, 32, 64, 128].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(iterations),
            iterations,
            |b, &iterations| {
                let mut buffers: MultiBuffer<1> = MultiBuffer::new("pressure", 128, 128, 2);
                b.iter(|| pressure::solve(&mut buffers, &divergence, iterations));
            },
        );
    }
    group.finish();
}

fn benchmark_passes(c: &mut Criterion) {
    let mut group = c.benchmark_group("passes");
    let size = 128;

    let mut sim = Simulation::new(size, size);
    let config = SolverConfig::default();
    for _ in 0..5 {
        sim.step(&config, &[stirring_site()]);
    }
    let velocity = sim.current_velocity().clone();
    let dye = sim.current_dye().clone();
    let pressure_field = sim.current_pressure().clone();
    let dt = config.timestep.seconds();
    let velocity_params = AdvectionParams::new(dt);
    let dye_params = AdvectionParams::new(dt).with_decay(config.color_decay);

    group.bench_function("advect_velocity", |b| {
        let mut out = Grid::new(size, size);
        b.iter(|| advection::advect(&velocity, &velocity, velocity_params, black_box(&mut out)));
    });

    group.bench_function("advect_dye", |b| {
        let mut out = Grid::new(size, size);
        b.iter(|| advection::advect(&dye, &velocity, dye_params, black_box(&mut out)));
    });

    group.bench_function("divergence", |b| {
        let mut out = Grid::new(size, size);
        b.iter(|| compute_divergence(&velocity, black_box(&mut out)));
    });

    group.bench_function("subtract_gradient", |b| {
        let mut out = Grid::new(size, size);
        b.iter(|| subtract_gradient(&velocity, &pressure_field, black_box(&mut out)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_frame, benchmark_iterations, benchmark_passes);
criterion_main!(benches);
