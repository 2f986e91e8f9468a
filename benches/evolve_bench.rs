//! Criterion benchmarks for u-evolve.
//!
//! Full runs on the sphere and Rastrigin functions measure loop overhead
//! plus evaluation; the selection benchmarks isolate operator cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_evolve::benchmarks::{rastrigin, sphere};
use u_evolve::ga::multi_objective::rank_population;
use u_evolve::ga::{
    GenomeGenerator, Individual, LinearCrossover, ObjectiveFn, RankedSelection,
    ReproductionSelection, Runner, SelectBy, Setup, SetupBuilder, TournamentSelection,
    TruncationSelection, UniformChromosome, UniformMutation, VoluminalCrossover,
};
use u_evolve::random::create_rng;

fn base_setup(dim: usize, pop: usize, gen: usize, bound: f64) -> SetupBuilder {
    Setup::builder()
        .with_population_size(pop)
        .with_generations(gen)
        .with_seed(42)
        .with_genome_generator(
            GenomeGenerator::new(vec![bound; dim])
                .with_chromosome(UniformChromosome::new(-bound, bound)),
        )
        .with_mutation(UniformMutation::new(0.2, 0.1))
        .with_reproduction(TournamentSelection::new(3, pop / 2))
        .with_replacement(TruncationSelection::new(pop / 2))
}

fn random_population(n: usize, objectives: usize) -> Vec<Individual> {
    let mut rng = create_rng(7);
    (0..n)
        .map(|_| {
            let mut ind = Individual::new(vec![0.0], objectives);
            for i in 0..objectives {
                ind.set_objective_fitness(i, rng.random_range(0.0..10.0));
            }
            ind
        })
        .collect()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_sphere_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_sphere");
    group.sample_size(10);

    for (dim, pop, gen) in [(10usize, 50usize, 50usize), (50, 100, 30), (100, 100, 20)] {
        group.bench_function(BenchmarkId::new(format!("d{dim}_p{pop}_g{gen}"), dim), |b| {
            b.iter(|| {
                let setup = base_setup(dim, pop, gen, 5.0)
                    .with_crossover(LinearCrossover::new(0.5))
                    .with_evaluator(ObjectiveFn::new(sphere))
                    .build()
                    .unwrap();
                let mut runner = Runner::new(setup);
                black_box(runner.run())
            })
        });
    }
    group.finish();
}

fn bench_rastrigin_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_rastrigin");
    group.sample_size(10);

    for &dim in &[2usize, 10, 30] {
        group.bench_function(BenchmarkId::from_parameter(dim), |b| {
            b.iter(|| {
                let setup = base_setup(dim, 100, 30, 5.12)
                    .with_crossover(VoluminalCrossover::new(0.25))
                    .with_evaluator(ObjectiveFn::new(rastrigin))
                    .build()
                    .unwrap();
                let mut runner = Runner::new(setup);
                black_box(runner.run())
            })
        });
    }
    group.finish();
}

fn bench_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection");

    for &n in &[100usize, 1000] {
        let population = random_population(n, 1);
        group.bench_with_input(BenchmarkId::new("truncation", n), &population, |b, p| {
            let selection = TruncationSelection::new(n / 2);
            let mut rng = create_rng(1);
            b.iter(|| black_box(selection.select(black_box(p), &mut rng)))
        });
        group.bench_with_input(BenchmarkId::new("tournament", n), &population, |b, p| {
            let selection = TournamentSelection::new(4, n / 2);
            let mut rng = create_rng(1);
            b.iter(|| black_box(selection.select(black_box(p), &mut rng)))
        });

        let population = random_population(n, 2);
        group.bench_with_input(BenchmarkId::new("ranked", n), &population, |b, p| {
            let selection = RankedSelection::new(n / 2, SelectBy::Individuals);
            let mut rng = create_rng(1);
            b.iter(|| black_box(selection.select(black_box(p), &mut rng)))
        });
        group.bench_with_input(BenchmarkId::new("rank_population", n), &population, |b, p| {
            b.iter(|| black_box(rank_population(black_box(p))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sphere_run, bench_rastrigin_run, bench_selection);
criterion_main!(benches);
