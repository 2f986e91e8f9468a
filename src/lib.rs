//! Multi-threaded, real-valued genetic algorithm engine.
//!
//! - **GA** ([`ga`]): configurable evolution loop over `f64` genomes with
//!   pluggable generators, crossover, mutation, selection, evaluation, and
//!   termination. Supports multi-objective (Pareto-ranked) selection.
//! - **Worker pool** ([`pool`]): fixed-size thread pool used for
//!   population evaluation.
//! - **Logging** ([`logger`]): timestamped lines fanned out to any number
//!   of sinks and forwarded to the [`log`] facade.
//! - **Benchmarks** ([`benchmarks`]): sphere, Rastrigin, Ackley, Rosenbrock.
//!
//! # Quick start
//!
//! ```
//! use u_evolve::benchmarks::rastrigin;
//! use u_evolve::ga::*;
//!
//! let setup = Setup::builder()
//!     .with_population_size(40)
//!     .with_generations(30)
//!     .with_seed(1)
//!     .with_genome_generator(
//!         GenomeGenerator::new(vec![5.12; 2]).with_chromosome(UniformChromosome::new(-5.12, 5.12)),
//!     )
//!     .with_crossover(VoluminalCrossover::new(0.25))
//!     .with_mutation(GaussianMutation::new(0.2, 0.1))
//!     .with_reproduction(TournamentSelection::new(3, 20))
//!     .with_replacement(TruncationSelection::new(20))
//!     .with_evaluator(ObjectiveFn::new(rastrigin))
//!     .with_termination(BestFitnessTermination::new(1e-3))
//!     .build()
//!     .unwrap();
//!
//! let mut runner = Runner::new(setup);
//! assert_eq!(runner.run(), ExitCode::Success);
//! ```

pub mod benchmarks;
pub mod ga;
pub mod logger;
pub mod pool;
pub mod random;
