//! Evolution loop execution.
//!
//! [`Runner`] owns a [`Setup`] and drives the run:
//! individual zero → population initialization → generation loop.
//!
//! # Generation step
//!
//! 1. Select the reproduction set (indices into the current population).
//! 2. Select the survivors of replacement.
//! 3. Breed offspring from the reproduction set until survivors plus
//!    offspring fill the population; offspring are evaluated on the worker
//!    pool and invalid ones are regenerated.
//! 4. Register a statistics row, update the best individual, run callbacks.
//!
//! # Control
//!
//! A [`RunnerHandle`] can pause, resume, or stop the run from any thread.
//! Requests take effect at the next generation boundary; an evaluation in
//! flight is never interrupted. A stop also interrupts population
//! initialization between retries.

use super::config::Setup;
use super::error::EvolutionError;
use super::evaluation::Evaluation;
use super::generator::GenomeGenerator;
use super::selection::take_indices;
use super::statistics::EvolutionStatistics;
use super::termination::{any_met, GenerationTermination};
use super::types::{fittest_index, Genome, Individual};
use crate::logger::Logger;
use crate::pool::WorkerPool;
use crate::random::{create_rng, rng_from_seed, GaRng};
use parking_lot::{Condvar, Mutex};
use rand::Rng;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Lifecycle state of a [`Runner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunnerState {
    /// Created, `run()` not yet called.
    Waiting,
    Running,
    /// Pause requested; takes effect at the next generation boundary.
    Pausing,
    Paused,
    /// Stop requested; takes effect at the next generation boundary.
    Stopping,
    /// Stopped on request.
    Stopped,
    /// Finished on its own, successfully or not.
    Done,
}

impl RunnerState {
    /// `true` for [`Stopped`](Self::Stopped) and [`Done`](Self::Done).
    pub fn is_terminal(self) -> bool {
        matches!(self, RunnerState::Stopped | RunnerState::Done)
    }
}

/// Outcome of [`Runner::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    /// A termination condition was met, or the run was stopped on request.
    Success,
    /// Initialization failed, the run was already started, or an internal
    /// error occurred. Details are in the log.
    Failure,
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => f.write_str("success"),
            ExitCode::Failure => f.write_str("failure"),
        }
    }
}

#[derive(Debug)]
struct Control {
    state: Mutex<RunnerState>,
    changed: Condvar,
}

impl Control {
    fn new() -> Self {
        Self {
            state: Mutex::new(RunnerState::Waiting),
            changed: Condvar::new(),
        }
    }

    fn state(&self) -> RunnerState {
        *self.state.lock()
    }

    fn set(&self, next: RunnerState) {
        *self.state.lock() = next;
        self.changed.notify_all();
    }

    /// Applies `f` to the current state; `None` rejects the transition.
    fn transition(&self, f: impl FnOnce(RunnerState) -> Option<RunnerState>) -> bool {
        let mut state = self.state.lock();
        match f(*state) {
            Some(next) => {
                *state = next;
                self.changed.notify_all();
                true
            }
            None => false,
        }
    }

    fn stop_requested(&self) -> bool {
        self.state() == RunnerState::Stopping
    }
}

/// Thread-safe remote control for a [`Runner`].
///
/// Obtained from [`Runner::handle`] before the runner is moved to the thread
/// that calls [`run`](Runner::run).
#[derive(Debug, Clone)]
pub struct RunnerHandle {
    control: Arc<Control>,
    logger: Logger,
}

impl RunnerHandle {
    pub fn state(&self) -> RunnerState {
        self.control.state()
    }

    /// Requests a pause. Accepted only while running.
    pub fn pause(&self) -> bool {
        let accepted = self
            .control
            .transition(|s| (s == RunnerState::Running).then_some(RunnerState::Pausing));
        if accepted {
            self.logger.info("Pause requested");
        }
        accepted
    }

    /// Resumes a pausing or paused run.
    pub fn resume(&self) -> bool {
        let accepted = self.control.transition(|s| {
            matches!(s, RunnerState::Pausing | RunnerState::Paused).then_some(RunnerState::Running)
        });
        if accepted {
            self.logger.info("Resume requested");
        }
        accepted
    }

    /// Requests a stop. Accepted while running, pausing, or paused.
    pub fn stop(&self) -> bool {
        let accepted = self.control.transition(|s| {
            matches!(
                s,
                RunnerState::Running | RunnerState::Pausing | RunnerState::Paused
            )
            .then_some(RunnerState::Stopping)
        });
        if accepted {
            self.logger.info("Stop requested");
        }
        accepted
    }

    /// Blocks until the runner reaches `target` or `timeout` elapses.
    ///
    /// Returns `true` if `target` was reached.
    pub fn wait_for_state(&self, target: RunnerState, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.control.state.lock();
        while *state != target {
            if self.control.changed.wait_until(&mut state, deadline).timed_out() {
                return *state == target;
            }
        }
        true
    }
}

/// Result of randomizing and evaluating one initial individual.
struct Spawned {
    individual: Result<Individual, EvolutionError>,
    evaluations: usize,
}

/// Executes the evolution loop.
///
/// # Usage
///
/// ```
/// use u_evolve::benchmarks::sphere;
/// use u_evolve::ga::{
///     ExitCode, GenomeGenerator, LinearCrossover, ObjectiveFn, Runner, Setup,
///     TruncationSelection, UniformChromosome, UniformMutation,
/// };
///
/// let setup = Setup::builder()
///     .with_population_size(10)
///     .with_generations(20)
///     .with_threads(2)
///     .with_seed(42)
///     .with_genome_generator(
///         GenomeGenerator::new(vec![5.0; 3]).with_chromosome(UniformChromosome::new(-5.0, 5.0)),
///     )
///     .with_crossover(LinearCrossover::new(0.5))
///     .with_mutation(UniformMutation::new(0.3, 0.5))
///     .with_reproduction(TruncationSelection::new(5))
///     .with_replacement(TruncationSelection::new(5))
///     .with_evaluator(ObjectiveFn::new(sphere))
///     .build()
///     .unwrap();
///
/// let mut runner = Runner::new(setup);
/// assert_eq!(runner.run(), ExitCode::Success);
///
/// let best = runner.best_individual().unwrap();
/// let zero = runner.individual_zero().unwrap();
/// assert!(best.overall_fitness() < zero.overall_fitness());
/// ```
pub struct Runner {
    setup: Setup,
    control: Arc<Control>,
    logger: Logger,
    statistics: EvolutionStatistics,
    population: Vec<Individual>,
    best: Option<Individual>,
    individual_zero: Option<Individual>,
    rng: GaRng,
}

impl Runner {
    /// Creates a runner in the [`Waiting`](RunnerState::Waiting) state.
    pub fn new(setup: Setup) -> Self {
        let statistics = EvolutionStatistics::new(setup.generations() + 1);
        let rng = rng_from_seed(setup.seed());
        Self {
            setup,
            control: Arc::new(Control::new()),
            logger: Logger::new(),
            statistics,
            population: Vec::new(),
            best: None,
            individual_zero: None,
            rng,
        }
    }

    /// Runs to completion. Valid only once, from the `Waiting` state.
    pub fn run(&mut self) -> ExitCode {
        if !self
            .control
            .transition(|s| (s == RunnerState::Waiting).then_some(RunnerState::Running))
        {
            return ExitCode::Failure;
        }

        let started = Instant::now();
        self.logger.info("Starting genetic algorithm...");

        let code = match self.execute() {
            Ok(()) => {
                self.control.set(RunnerState::Done);
                ExitCode::Success
            }
            Err(EvolutionError::Stopped) => {
                self.logger.info(format_args!(
                    "Stopped after generation {}",
                    self.completed_generations()
                ));
                self.control.set(RunnerState::Stopped);
                ExitCode::Success
            }
            Err(err) => {
                self.logger.warn(format_args!("Genetic algorithm failed: {err}"));
                self.control.set(RunnerState::Done);
                ExitCode::Failure
            }
        };

        self.logger.info(format_args!(
            "Genetic algorithm complete, exit code: {code}, evaluations: {}, elapsed: {:.3}s",
            self.statistics.evaluations(),
            started.elapsed().as_secs_f64()
        ));
        code
    }

    /// Remote control usable from other threads.
    pub fn handle(&self) -> RunnerHandle {
        RunnerHandle {
            control: Arc::clone(&self.control),
            logger: self.logger.clone(),
        }
    }

    pub fn state(&self) -> RunnerState {
        self.control.state()
    }

    /// Best individual seen so far across all generations.
    pub fn best_individual(&self) -> Option<&Individual> {
        self.best.as_ref()
    }

    /// The unrandomized reference genome, evaluated once.
    pub fn individual_zero(&self) -> Option<&Individual> {
        self.individual_zero.as_ref()
    }

    /// The current population.
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    pub fn statistics(&self) -> &EvolutionStatistics {
        &self.statistics
    }

    pub fn setup(&self) -> &Setup {
        &self.setup
    }

    /// The run's logger; clones share its sinks.
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Registers an additional log output.
    pub fn add_log_sink<W: Write + Send + 'static>(&self, sink: W) {
        self.logger.add_sink(sink);
    }

    /// Writes the statistics table to `path`, fields separated by `separator`.
    pub fn export_statistics(&self, path: impl AsRef<Path>, separator: char) -> Result<(), EvolutionError> {
        let file = File::create(path)?;
        self.statistics.write(BufWriter::new(file), separator)
    }

    /// Completed evolution steps; row 0 is the initial population.
    fn completed_generations(&self) -> usize {
        self.statistics.current_generation().saturating_sub(1)
    }

    fn execute(&mut self) -> Result<(), EvolutionError> {
        self.setup
            .add_termination(Box::new(GenerationTermination::new(self.setup.generations())));
        let pool = WorkerPool::new(self.setup.threads())?;

        self.initialize_individual_zero();
        self.initialize_population(&pool)?;
        self.finish_generation()?;

        loop {
            self.await_generation_boundary()?;
            if any_met(&self.setup.terminations, &self.statistics) {
                return Ok(());
            }
            self.step(&pool)?;
            self.logger.info(format_args!(
                "Generation {} complete",
                self.completed_generations()
            ));
        }
    }

    fn initialize_individual_zero(&mut self) {
        self.logger.info("Initializing individual zero");
        let mut zero = Individual::new(
            self.setup.genome_generator.initial_genome().to_vec(),
            self.setup.objective_count(),
        );
        if !self.setup.evaluation.evaluate(&mut zero) {
            self.logger.warn("Individual zero has an invalid fitness");
        }
        self.statistics.add_evaluations(1);
        self.logger.info(format_args!(
            "Individual zero fitness: {}",
            zero.overall_fitness()
        ));
        self.individual_zero = Some(zero);
    }

    fn initialize_population(&mut self, pool: &WorkerPool) -> Result<(), EvolutionError> {
        let size = self.setup.population_size();
        self.logger.info(format_args!("Initializing population, size = {size}"));

        let handles: Vec<_> = (0..size)
            .map(|_| {
                let generator = Arc::clone(&self.setup.genome_generator);
                let evaluation = Arc::clone(&self.setup.evaluation);
                let control = Arc::clone(&self.control);
                let max_failures = self.setup.max_failures();
                let seed: u64 = self.rng.random();
                pool.submit(move || {
                    spawn_individual(&generator, &evaluation, &control, max_failures, seed)
                })
            })
            .collect();

        let mut population = Vec::with_capacity(size);
        let mut failure = None;
        for result in WorkerPool::join_all(handles) {
            let spawned = result?;
            self.statistics.add_evaluations(spawned.evaluations as u64);
            match spawned.individual {
                Ok(individual) => population.push(individual),
                Err(EvolutionError::Stopped) => failure = Some(EvolutionError::Stopped),
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }
        if let Some(err) = failure {
            return Err(err);
        }

        self.population = population;
        Ok(())
    }

    /// Blocks while paused; fails with [`EvolutionError::Stopped`] on a stop request.
    fn await_generation_boundary(&self) -> Result<(), EvolutionError> {
        let mut state = self.control.state.lock();
        loop {
            match *state {
                RunnerState::Pausing => {
                    *state = RunnerState::Paused;
                    self.control.changed.notify_all();
                    self.logger.info(format_args!(
                        "Paused after generation {}",
                        self.completed_generations()
                    ));
                }
                RunnerState::Paused => self.control.changed.wait(&mut state),
                RunnerState::Stopping => return Err(EvolutionError::Stopped),
                _ => return Ok(()),
            }
        }
    }

    fn step(&mut self, pool: &WorkerPool) -> Result<(), EvolutionError> {
        let parents = self.setup.reproduction.select(&self.population, &mut self.rng);
        let survivors = self.setup.replacement.survivors(&self.population);

        let wanted = self.setup.population_size().saturating_sub(survivors.len());
        let offspring = self.breed(pool, &parents, wanted)?;

        let mut next = take_indices(std::mem::take(&mut self.population), &survivors);
        next.extend(offspring);
        self.population = next;

        self.finish_generation()
    }

    /// Produces `wanted` valid, evaluated offspring from the parent indices.
    fn breed(
        &mut self,
        pool: &WorkerPool,
        parents: &[usize],
        wanted: usize,
    ) -> Result<Vec<Individual>, EvolutionError> {
        let parents: Vec<usize> = if parents.is_empty() {
            (0..self.population.len()).collect()
        } else {
            parents.to_vec()
        };

        let mut offspring = Vec::with_capacity(wanted);
        let mut fruitless = 0;
        while offspring.len() < wanted {
            let objectives = self.setup.objective_count();
            let handles: Vec<_> = (offspring.len()..wanted)
                .map(|_| {
                    let genome = self.make_offspring(&parents);
                    let evaluation = Arc::clone(&self.setup.evaluation);
                    pool.submit(move || {
                        let mut child = Individual::new(genome, objectives);
                        evaluation.evaluate(&mut child).then_some(child)
                    })
                })
                .collect();
            self.statistics.add_evaluations(handles.len() as u64);

            let before = offspring.len();
            for result in WorkerPool::join_all(handles) {
                offspring.extend(result?);
            }

            if offspring.len() == before {
                fruitless += 1;
                if fruitless >= self.setup.max_failures().max(1) {
                    return Err(EvolutionError::RefillExhausted { attempts: fruitless });
                }
            } else {
                fruitless = 0;
            }
        }
        Ok(offspring)
    }

    /// One child genome: mutation if the gate fires, else crossover of two random parents.
    fn make_offspring(&mut self, parents: &[usize]) -> Genome {
        let rng = &mut self.rng;
        let first = &self.population[parents[rng.random_range(0..parents.len())]];
        if self.setup.mutation.should_mutate(rng) {
            self.setup.mutation.mutate(first, rng)
        } else {
            let second = &self.population[parents[rng.random_range(0..parents.len())]];
            self.setup.crossover.cross(first, second, rng)
        }
    }

    /// Registers statistics, tracks the best individual, and runs the callbacks.
    fn finish_generation(&mut self) -> Result<(), EvolutionError> {
        self.statistics.register_statistic(&self.population)?;

        if let Some(i) = fittest_index(&self.population) {
            let candidate = &self.population[i];
            if self.best.as_ref().map_or(true, |best| candidate.is_fitter_than(best)) {
                self.best = Some(candidate.clone());
            }
        }

        for callback in &mut self.setup.callbacks {
            callback();
        }
        for observer in &mut self.setup.observers {
            observer(&self.population, &self.statistics);
        }
        Ok(())
    }
}

impl fmt::Debug for Runner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("state", &self.state())
            .field("setup", &self.setup)
            .field("statistics", &self.statistics)
            .field("population", &self.population.len())
            .finish_non_exhaustive()
    }
}

/// Randomizes an individual from the reference genome until it evaluates to
/// a valid fitness, giving up after `max_failures` consecutive attempts.
fn spawn_individual(
    generator: &GenomeGenerator,
    evaluation: &Evaluation,
    control: &Control,
    max_failures: usize,
    seed: u64,
) -> Spawned {
    let mut rng = create_rng(seed);
    let mut evaluations = 0;
    loop {
        if control.stop_requested() {
            return Spawned {
                individual: Err(EvolutionError::Stopped),
                evaluations,
            };
        }

        let mut individual =
            Individual::new(generator.initial_genome().to_vec(), evaluation.objective_count());
        generator.generate(&mut individual, &mut rng);
        evaluations += 1;
        if evaluation.evaluate(&mut individual) {
            return Spawned {
                individual: Ok(individual),
                evaluations,
            };
        }
        if evaluations >= max_failures.max(1) {
            return Spawned {
                individual: Err(EvolutionError::InitializationExhausted {
                    attempts: evaluations,
                }),
                evaluations,
            };
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
