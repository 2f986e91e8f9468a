//! Real-valued genetic algorithm.
//!
//! A trait-based, thread-pooled GA over `f64` genomes with any number of
//! minimised objectives. Operators are trait objects injected into a
//! [`Setup`]; the [`Runner`] owns the population and executes the loop.
//!
//! # Core Traits
//!
//! - [`ChromosomeGenerator`]: randomizes (part of) a genome
//! - [`Crossover`] / [`Mutation`]: produce a child genome from parents
//! - [`ReproductionSelection`] / [`ReplacementSelection`]: pick breeding stock and survivors
//! - [`Evaluator`]: writes objective values into an individual
//! - [`TerminationCondition`]: predicate over [`EvolutionStatistics`]
//!
//! # Key Types
//!
//! - [`Individual`]: genome plus fitness vector
//! - [`Setup`] / [`SetupBuilder`]: validated run configuration
//! - [`Runner`] / [`RunnerHandle`]: loop execution and cross-thread control
//!
//! # Submodules
//!
//! - [`operators`]: blend crossovers and additive-noise mutations
//! - [`multi_objective`]: Pareto dominance, non-dominated sorting, crowding distance
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Eshelman & Schaffer (1993), "Real-Coded Genetic Algorithms and Interval-Schemata"
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*

mod config;
mod error;
mod evaluation;
mod generator;
pub mod multi_objective;
pub mod operators;
mod runner;
mod selection;
mod statistics;
mod termination;
mod types;

pub use config::{IterationCallback, Observer, Setup, SetupBuilder, DEFAULT_MAX_FAILURES};
pub use error::{EvolutionError, SetupError};
pub use evaluation::{Evaluation, Evaluator, ObjectiveFn};
pub use generator::{ChromosomeGenerator, GenomeGenerator, UniformChromosome};
pub use operators::{
    Crossover, GaussianMutation, LinearCrossover, Mutation, UniformMutation, VoluminalCrossover,
};
pub use runner::{ExitCode, Runner, RunnerHandle, RunnerState};
pub use selection::{
    GenerationalReplacement, RankedSelection, ReplacementSelection, ReproductionSelection,
    SelectBy, TournamentSelection, TruncationSelection,
};
pub use statistics::{EvolutionStatistics, Statistic, StatisticRequest};
pub use termination::{
    AverageFitnessTermination, BestFitnessTermination, GenerationTermination,
    SelectionPressureTermination, TerminationCondition,
};
pub use types::{fittest_index, Genome, Individual};
