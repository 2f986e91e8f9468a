//! Objective evaluation pipeline.
//!
//! An [`Evaluation`] is an ordered list of [`Evaluator`]s. Each evaluator
//! writes its objectives starting at the slot index it is given and returns
//! the next free index, so evaluators compose without index collisions.
//! The total objective count is fixed when the pipeline is assembled.

use super::types::Individual;

/// A user-supplied objective function.
pub trait Evaluator: Send + Sync {
    /// Number of fitness slots this evaluator fills.
    fn objective_count(&self) -> usize;

    /// Writes `objective_count()` fitness values starting at
    /// `objective_index` and returns the next free slot index.
    fn evaluate(&self, individual: &mut Individual, objective_index: usize) -> usize;
}

/// Single-objective evaluator backed by a closure over the genome.
///
/// # Examples
///
/// ```
/// use u_evolve::ga::{Evaluation, Individual, ObjectiveFn};
///
/// let evaluation = Evaluation::new()
///     .with_evaluator(ObjectiveFn::new(|g: &[f64]| g.iter().map(|x| x * x).sum()))
///     .with_evaluator(ObjectiveFn::new(|g: &[f64]| g.iter().map(|x| x.abs()).sum()));
///
/// let mut ind = Individual::new(vec![1.0, -2.0], evaluation.objective_count());
/// evaluation.evaluate(&mut ind);
/// assert_eq!(ind.fitness_values(), &[5.0, 3.0]);
/// ```
pub struct ObjectiveFn<F> {
    objective: F,
}

impl<F> ObjectiveFn<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    /// Wraps `objective`.
    pub fn new(objective: F) -> Self {
        Self { objective }
    }
}

impl<F> Evaluator for ObjectiveFn<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn objective_count(&self) -> usize {
        1
    }

    fn evaluate(&self, individual: &mut Individual, objective_index: usize) -> usize {
        let value = (self.objective)(individual.genome());
        individual.set_objective_fitness(objective_index, value);
        objective_index + 1
    }
}

/// Ordered pipeline of evaluators.
#[derive(Default)]
pub struct Evaluation {
    evaluators: Vec<Box<dyn Evaluator>>,
}

impl Evaluation {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an evaluator (builder form).
    pub fn with_evaluator<E: Evaluator + 'static>(mut self, evaluator: E) -> Self {
        self.push(Box::new(evaluator));
        self
    }

    /// Appends an evaluator.
    pub fn push(&mut self, evaluator: Box<dyn Evaluator>) {
        self.evaluators.push(evaluator);
    }

    /// Number of evaluators.
    pub fn len(&self) -> usize {
        self.evaluators.len()
    }

    /// `true` if no evaluator is registered.
    pub fn is_empty(&self) -> bool {
        self.evaluators.is_empty()
    }

    /// Sum of every evaluator's objective count.
    pub fn objective_count(&self) -> usize {
        self.evaluators.iter().map(|e| e.objective_count()).sum()
    }

    /// Runs every evaluator in order on `individual`.
    ///
    /// Returns `individual.is_valid()` afterwards.
    pub fn evaluate(&self, individual: &mut Individual) -> bool {
        let mut next = 0;
        for evaluator in &self.evaluators {
            next = evaluator.evaluate(individual, next);
        }
        debug_assert_eq!(next, self.objective_count(), "evaluator returned a wrong slot index");
        individual.is_valid()
    }
}

impl std::fmt::Debug for Evaluation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluation")
            .field("evaluators", &self.evaluators.len())
            .field("objectives", &self.objective_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Writes the genome's min and max as two objectives.
    struct Extremes;

    impl Evaluator for Extremes {
        fn objective_count(&self) -> usize {
            2
        }

        fn evaluate(&self, individual: &mut Individual, objective_index: usize) -> usize {
            let g = individual.genome();
            let min = g.iter().copied().fold(f64::INFINITY, f64::min);
            let max = g.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            individual.set_objective_fitness(objective_index, min);
            individual.set_objective_fitness(objective_index + 1, max);
            objective_index + 2
        }
    }

    #[test]
    fn test_objective_count_sums() {
        let evaluation = Evaluation::new()
            .with_evaluator(ObjectiveFn::new(|g: &[f64]| g[0]))
            .with_evaluator(Extremes);
        assert_eq!(evaluation.objective_count(), 3);
        assert_eq!(evaluation.len(), 2);
    }

    #[test]
    fn test_evaluators_compose_without_collisions() {
        let evaluation = Evaluation::new()
            .with_evaluator(Extremes)
            .with_evaluator(ObjectiveFn::new(|g: &[f64]| g.len() as f64));

        let mut ind = Individual::new(vec![3.0, -1.0, 2.0], evaluation.objective_count());
        assert!(evaluation.evaluate(&mut ind));
        assert_eq!(ind.fitness_values(), &[-1.0, 3.0, 3.0]);
    }

    #[test]
    fn test_nan_objective_is_invalid() {
        let evaluation = Evaluation::new().with_evaluator(ObjectiveFn::new(|_: &[f64]| f64::NAN));
        let mut ind = Individual::new(vec![0.0], 1);
        assert!(!evaluation.evaluate(&mut ind));
    }

    #[test]
    fn test_empty_pipeline() {
        let evaluation = Evaluation::new();
        assert!(evaluation.is_empty());
        assert_eq!(evaluation.objective_count(), 0);
        let mut ind = Individual::new(vec![1.0], 0);
        // No objectives: vacuously valid.
        assert!(evaluation.evaluate(&mut ind));
    }
}
