//! Evolution setup.
//!
//! [`Setup`] bundles every operator and parameter a run needs. It is built
//! once through [`SetupBuilder`], validated, and then moved into a
//! [`Runner`](super::Runner), which owns it for the rest of the run.

use super::error::SetupError;
use super::evaluation::{Evaluation, Evaluator};
use super::generator::GenomeGenerator;
use super::operators::{Crossover, Mutation};
use super::selection::{ReplacementSelection, ReproductionSelection};
use super::statistics::EvolutionStatistics;
use super::termination::TerminationCondition;
use super::types::Individual;
use crate::pool::default_threads;
use std::sync::Arc;

/// Zero-argument hook invoked after every registered generation.
pub type IterationCallback = Box<dyn FnMut() + Send>;

/// Hook receiving the population and statistics after every registered generation.
pub type Observer = Box<dyn FnMut(&[Individual], &EvolutionStatistics) + Send>;

/// Default number of consecutive invalid evaluations tolerated per
/// individual during population initialization.
pub const DEFAULT_MAX_FAILURES: usize = 300;

/// Validated, move-only run configuration.
///
/// # Builder Pattern
///
/// ```
/// use u_evolve::ga::{
///     GenomeGenerator, LinearCrossover, ObjectiveFn, Setup, TruncationSelection,
///     UniformChromosome, UniformMutation,
/// };
///
/// let setup = Setup::builder()
///     .with_population_size(20)
///     .with_generations(50)
///     .with_seed(7)
///     .with_genome_generator(
///         GenomeGenerator::new(vec![0.0; 3]).with_chromosome(UniformChromosome::new(-5.0, 5.0)),
///     )
///     .with_crossover(LinearCrossover::new(0.5))
///     .with_mutation(UniformMutation::new(0.2, 0.1))
///     .with_reproduction(TruncationSelection::new(10))
///     .with_replacement(TruncationSelection::new(10))
///     .with_evaluator(ObjectiveFn::new(|g: &[f64]| g.iter().map(|x| x * x).sum()))
///     .build()
///     .unwrap();
///
/// assert_eq!(setup.population_size(), 20);
/// assert_eq!(setup.objective_count(), 1);
/// ```
pub struct Setup {
    pub(crate) population_size: usize,
    pub(crate) generations: usize,
    pub(crate) threads: usize,
    pub(crate) max_failures: usize,
    pub(crate) seed: Option<u64>,
    pub(crate) genome_generator: Arc<GenomeGenerator>,
    pub(crate) evaluation: Arc<Evaluation>,
    pub(crate) crossover: Box<dyn Crossover>,
    pub(crate) mutation: Box<dyn Mutation>,
    pub(crate) reproduction: Box<dyn ReproductionSelection>,
    pub(crate) replacement: Box<dyn ReplacementSelection>,
    pub(crate) terminations: Vec<Box<dyn TerminationCondition>>,
    pub(crate) callbacks: Vec<IterationCallback>,
    pub(crate) observers: Vec<Observer>,
}

impl Setup {
    /// Starts a new builder with default parameters.
    pub fn builder() -> SetupBuilder {
        SetupBuilder::default()
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Maximum number of evolution steps.
    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn max_failures(&self) -> usize {
        self.max_failures
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Total objectives across all evaluators.
    pub fn objective_count(&self) -> usize {
        self.evaluation.objective_count()
    }

    /// Genome length.
    pub fn dimension(&self) -> usize {
        self.genome_generator.dimension()
    }

    pub fn genome_generator(&self) -> &GenomeGenerator {
        &self.genome_generator
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    /// Number of registered termination conditions.
    pub fn termination_count(&self) -> usize {
        self.terminations.len()
    }

    /// Appends a termination condition.
    pub fn add_termination(&mut self, condition: Box<dyn TerminationCondition>) {
        self.terminations.push(condition);
    }

    /// Appends an iteration callback.
    pub fn add_callback(&mut self, callback: IterationCallback) {
        self.callbacks.push(callback);
    }
}

impl std::fmt::Debug for Setup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Setup")
            .field("population_size", &self.population_size)
            .field("generations", &self.generations)
            .field("threads", &self.threads)
            .field("max_failures", &self.max_failures)
            .field("seed", &self.seed)
            .field("genome_generator", &self.genome_generator)
            .field("evaluation", &self.evaluation)
            .field("terminations", &self.terminations.len())
            .field("callbacks", &self.callbacks.len())
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

/// Fluent builder for [`Setup`].
///
/// # Defaults
///
/// ```
/// use u_evolve::ga::SetupBuilder;
///
/// let builder = SetupBuilder::default();
/// assert_eq!(builder.population_size, 100);
/// assert_eq!(builder.generations, 500);
/// assert_eq!(builder.max_failures, 300);
/// assert!(builder.threads >= 1);
/// ```
pub struct SetupBuilder {
    /// Individuals per generation. Must be at least 2.
    pub population_size: usize,

    /// Evolution steps before the built-in generation limit stops the run.
    pub generations: usize,

    /// Worker threads for evaluation. Defaults to the available parallelism.
    pub threads: usize,

    /// Consecutive invalid evaluations tolerated per individual during
    /// initialization before the run fails.
    pub max_failures: usize,

    /// Master seed. `None` draws one from the OS.
    pub seed: Option<u64>,

    genome_generator: Option<GenomeGenerator>,
    evaluation: Evaluation,
    crossover: Option<Box<dyn Crossover>>,
    mutation: Option<Box<dyn Mutation>>,
    reproduction: Option<Box<dyn ReproductionSelection>>,
    replacement: Option<Box<dyn ReplacementSelection>>,
    terminations: Vec<Box<dyn TerminationCondition>>,
    callbacks: Vec<IterationCallback>,
    observers: Vec<Observer>,
}

impl Default for SetupBuilder {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 500,
            threads: default_threads(),
            max_failures: DEFAULT_MAX_FAILURES,
            seed: None,
            genome_generator: None,
            evaluation: Evaluation::new(),
            crossover: None,
            mutation: None,
            reproduction: None,
            replacement: None,
            terminations: Vec::new(),
            callbacks: Vec::new(),
            observers: Vec::new(),
        }
    }
}

impl SetupBuilder {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    pub fn with_threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    pub fn with_max_failures(mut self, n: usize) -> Self {
        self.max_failures = n;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_genome_generator(mut self, generator: GenomeGenerator) -> Self {
        self.genome_generator = Some(generator);
        self
    }

    pub fn with_crossover<C: Crossover + 'static>(mut self, crossover: C) -> Self {
        self.crossover = Some(Box::new(crossover));
        self
    }

    pub fn with_mutation<M: Mutation + 'static>(mut self, mutation: M) -> Self {
        self.mutation = Some(Box::new(mutation));
        self
    }

    pub fn with_reproduction<S: ReproductionSelection + 'static>(mut self, selection: S) -> Self {
        self.reproduction = Some(Box::new(selection));
        self
    }

    pub fn with_replacement<S: ReplacementSelection + 'static>(mut self, selection: S) -> Self {
        self.replacement = Some(Box::new(selection));
        self
    }

    /// Appends an evaluator; objectives are numbered in registration order.
    pub fn with_evaluator<E: Evaluator + 'static>(mut self, evaluator: E) -> Self {
        self.evaluation.push(Box::new(evaluator));
        self
    }

    /// Appends a termination condition. Conditions are OR-ed together.
    pub fn with_termination<T: TerminationCondition + 'static>(mut self, condition: T) -> Self {
        self.terminations.push(Box::new(condition));
        self
    }

    /// Appends a zero-argument callback run after every registered generation,
    /// including the initial population.
    pub fn with_callback<F: FnMut() + Send + 'static>(mut self, callback: F) -> Self {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Appends a callback that sees the population and statistics after
    /// every registered generation.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&[Individual], &EvolutionStatistics) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
        self
    }

    /// Validates the parameters and produces the [`Setup`].
    ///
    /// # Errors
    /// Returns the first [`SetupError`] found, operators checked last.
    pub fn build(self) -> Result<Setup, SetupError> {
        if self.population_size < 2 {
            return Err(SetupError::PopulationTooSmall(self.population_size));
        }
        if self.generations == 0 {
            return Err(SetupError::ZeroGenerations);
        }
        if self.threads == 0 {
            return Err(SetupError::ZeroThreads);
        }
        if self.evaluation.is_empty() {
            return Err(SetupError::NoEvaluators);
        }

        let genome_generator = self
            .genome_generator
            .ok_or(SetupError::MissingOperator("genome generator"))?;
        if genome_generator.dimension() == 0 {
            return Err(SetupError::EmptyGenome);
        }

        Ok(Setup {
            population_size: self.population_size,
            generations: self.generations,
            threads: self.threads,
            max_failures: self.max_failures,
            seed: self.seed,
            genome_generator: Arc::new(genome_generator),
            evaluation: Arc::new(self.evaluation),
            crossover: self.crossover.ok_or(SetupError::MissingOperator("crossover"))?,
            mutation: self.mutation.ok_or(SetupError::MissingOperator("mutation"))?,
            reproduction: self
                .reproduction
                .ok_or(SetupError::MissingOperator("reproduction selection"))?,
            replacement: self
                .replacement
                .ok_or(SetupError::MissingOperator("replacement selection"))?,
            terminations: self.terminations,
            callbacks: self.callbacks,
            observers: self.observers,
        })
    }
}

impl std::fmt::Debug for SetupBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupBuilder")
            .field("population_size", &self.population_size)
            .field("generations", &self.generations)
            .field("threads", &self.threads)
            .field("max_failures", &self.max_failures)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::evaluation::ObjectiveFn;
    use crate::ga::generator::UniformChromosome;
    use crate::ga::operators::{LinearCrossover, UniformMutation};
    use crate::ga::selection::{GenerationalReplacement, TournamentSelection, TruncationSelection};
    use crate::ga::termination::BestFitnessTermination;

    fn complete() -> SetupBuilder {
        Setup::builder()
            .with_genome_generator(
                GenomeGenerator::new(vec![1.0, 1.0]).with_chromosome(UniformChromosome::new(-1.0, 1.0)),
            )
            .with_crossover(LinearCrossover::new(0.5))
            .with_mutation(UniformMutation::new(0.1, 0.5))
            .with_reproduction(TournamentSelection::new(3, 5))
            .with_replacement(GenerationalReplacement)
            .with_evaluator(ObjectiveFn::new(|g: &[f64]| g[0]))
    }

    #[test]
    fn test_default_builder() {
        let builder = SetupBuilder::default();
        assert_eq!(builder.population_size, 100);
        assert_eq!(builder.generations, 500);
        assert_eq!(builder.max_failures, DEFAULT_MAX_FAILURES);
        assert_eq!(builder.threads, default_threads());
        assert!(builder.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let setup = complete()
            .with_population_size(40)
            .with_generations(12)
            .with_threads(2)
            .with_max_failures(5)
            .with_seed(42)
            .with_evaluator(ObjectiveFn::new(|g: &[f64]| g[1]))
            .with_termination(BestFitnessTermination::new(1e-6))
            .with_callback(|| {})
            .with_observer(|_: &[Individual], _: &EvolutionStatistics| {})
            .build()
            .unwrap();

        assert_eq!(setup.population_size(), 40);
        assert_eq!(setup.generations(), 12);
        assert_eq!(setup.threads(), 2);
        assert_eq!(setup.max_failures(), 5);
        assert_eq!(setup.seed(), Some(42));
        assert_eq!(setup.objective_count(), 2);
        assert_eq!(setup.dimension(), 2);
        assert_eq!(setup.termination_count(), 1);
        assert_eq!(setup.callbacks.len(), 1);
        assert_eq!(setup.observers.len(), 1);
    }

    #[test]
    fn test_validate_ok() {
        assert!(complete().build().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let err = complete().with_population_size(1).build().unwrap_err();
        assert_eq!(err, SetupError::PopulationTooSmall(1));
    }

    #[test]
    fn test_validate_zero_generations() {
        let err = complete().with_generations(0).build().unwrap_err();
        assert_eq!(err, SetupError::ZeroGenerations);
    }

    #[test]
    fn test_validate_zero_threads() {
        let err = complete().with_threads(0).build().unwrap_err();
        assert_eq!(err, SetupError::ZeroThreads);
    }

    #[test]
    fn test_validate_no_evaluators() {
        let err = Setup::builder()
            .with_genome_generator(GenomeGenerator::new(vec![0.0]))
            .with_crossover(LinearCrossover::new(0.5))
            .with_mutation(UniformMutation::new(0.1, 0.5))
            .with_reproduction(TruncationSelection::new(2))
            .with_replacement(TruncationSelection::new(2))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::NoEvaluators);
    }

    #[test]
    fn test_validate_empty_genome() {
        let err = complete()
            .with_genome_generator(GenomeGenerator::new(Vec::new()))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::EmptyGenome);
    }

    #[test]
    fn test_missing_operators_are_named() {
        let err = Setup::builder()
            .with_genome_generator(GenomeGenerator::new(vec![0.0]))
            .with_evaluator(ObjectiveFn::new(|g: &[f64]| g[0]))
            .with_mutation(UniformMutation::new(0.1, 0.5))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::MissingOperator("crossover"));

        let err = Setup::builder()
            .with_evaluator(ObjectiveFn::new(|g: &[f64]| g[0]))
            .build()
            .unwrap_err();
        assert_eq!(err, SetupError::MissingOperator("genome generator"));
    }

    #[test]
    fn test_runtime_additions() {
        let mut setup = complete().build().unwrap();
        setup.add_termination(Box::new(BestFitnessTermination::new(0.0)));
        setup.add_callback(Box::new(|| {}));
        assert_eq!(setup.termination_count(), 1);
        assert_eq!(setup.callbacks.len(), 1);
    }
}
