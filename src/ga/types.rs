//! Genome and individual model.
//!
//! An [`Individual`] owns a real-valued [`Genome`] and one fitness slot per
//! objective. Lower fitness is better throughout (minimization).

use std::cmp::Ordering;

/// A candidate solution vector. Its length is fixed for a run.
pub type Genome = Vec<f64>;

/// A genome plus its per-objective fitness scores.
///
/// A freshly constructed individual has every fitness slot set to `NaN`
/// ("not evaluated"). It becomes [valid](Individual::is_valid) once every
/// slot holds a finite value.
///
/// # Examples
///
/// ```
/// use u_evolve::ga::Individual;
///
/// let mut ind = Individual::new(vec![1.0, 2.0], 2);
/// assert!(!ind.is_valid());
///
/// ind.set_objective_fitness(0, 0.5);
/// ind.set_objective_fitness(1, 1.5);
/// assert!(ind.is_valid());
/// assert_eq!(ind.overall_fitness(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    genome: Genome,
    fitness: Vec<f64>,
}

impl Individual {
    /// Creates an unevaluated individual with `objective_count` fitness slots.
    pub fn new(genome: Genome, objective_count: usize) -> Self {
        Self {
            genome,
            fitness: vec![f64::NAN; objective_count],
        }
    }

    /// The genome.
    pub fn genome(&self) -> &[f64] {
        &self.genome
    }

    /// Mutable access to the genome.
    pub fn genome_mut(&mut self) -> &mut Genome {
        &mut self.genome
    }

    /// Consumes the individual and returns its genome.
    pub fn into_genome(self) -> Genome {
        self.genome
    }

    /// Number of fitness slots.
    pub fn objective_count(&self) -> usize {
        self.fitness.len()
    }

    /// Fitness of objective `index`.
    ///
    /// # Panics
    /// Panics if `index >= objective_count()`.
    pub fn objective_fitness(&self, index: usize) -> f64 {
        self.fitness[index]
    }

    /// Sets the fitness of objective `index`.
    ///
    /// # Panics
    /// Panics if `index >= objective_count()`.
    pub fn set_objective_fitness(&mut self, index: usize, value: f64) {
        self.fitness[index] = value;
    }

    /// All fitness slots, in objective order.
    pub fn fitness_values(&self) -> &[f64] {
        &self.fitness
    }

    /// Resets every fitness slot to `NaN`.
    pub fn clear_fitness(&mut self) {
        self.fitness.fill(f64::NAN);
    }

    /// Sum of all objective scores.
    pub fn overall_fitness(&self) -> f64 {
        self.fitness.iter().sum()
    }

    /// `true` iff every fitness slot is finite.
    pub fn is_valid(&self) -> bool {
        self.fitness.iter().all(|f| f.is_finite())
    }

    /// Orders two individuals by overall fitness, best (lowest) first.
    ///
    /// Total order: unevaluated (`NaN`) fitness sorts after every number.
    pub fn cmp_fitness(&self, other: &Self) -> Ordering {
        let (a, b) = (self.overall_fitness(), other.overall_fitness());
        match (a.is_nan(), b.is_nan()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.total_cmp(&b),
        }
    }

    /// `true` if `self` is strictly fitter than `other`.
    pub fn is_fitter_than(&self, other: &Self) -> bool {
        self.cmp_fitness(other) == Ordering::Less
    }
}

/// Index of the fittest individual, or `None` for an empty slice.
pub fn fittest_index(population: &[Individual]) -> Option<usize> {
    population
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.cmp_fitness(b))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluated(fitness: &[f64]) -> Individual {
        let mut ind = Individual::new(vec![0.0; 3], fitness.len());
        for (i, &f) in fitness.iter().enumerate() {
            ind.set_objective_fitness(i, f);
        }
        ind
    }

    #[test]
    fn test_new_is_unevaluated() {
        let ind = Individual::new(vec![1.0, 2.0, 3.0], 2);
        assert_eq!(ind.objective_count(), 2);
        assert!(ind.fitness_values().iter().all(|f| f.is_nan()));
        assert!(!ind.is_valid());
        assert_eq!(ind.genome(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_overall_fitness_is_sum() {
        let ind = evaluated(&[1.0, 2.5, -0.5]);
        assert!((ind.overall_fitness() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_evaluation_invalid() {
        let mut ind = Individual::new(vec![0.0], 2);
        ind.set_objective_fitness(0, 1.0);
        assert!(!ind.is_valid());
    }

    #[test]
    fn test_infinite_is_invalid() {
        assert!(!evaluated(&[f64::INFINITY]).is_valid());
        assert!(!evaluated(&[1.0, f64::NEG_INFINITY]).is_valid());
    }

    #[test]
    fn test_ordering_by_overall_fitness() {
        let a = evaluated(&[0.2, 0.1]);
        let b = evaluated(&[0.5]);
        assert_eq!(a.cmp_fitness(&b), Ordering::Less);
        assert!(a.is_fitter_than(&b));
        assert!(!b.is_fitter_than(&a));
    }

    #[test]
    fn test_nan_sorts_last() {
        let mut pop = vec![
            Individual::new(vec![0.0], 1),
            evaluated(&[3.0]),
            evaluated(&[1.0]),
        ];
        pop.sort_by(Individual::cmp_fitness);
        assert_eq!(pop[0].overall_fitness(), 1.0);
        assert!(pop[2].overall_fitness().is_nan());
    }

    #[test]
    fn test_negative_nan_sorts_last() {
        let a = evaluated(&[-f64::NAN]);
        let b = evaluated(&[100.0]);
        assert_eq!(a.cmp_fitness(&b), Ordering::Greater);
    }

    #[test]
    fn test_clear_fitness() {
        let mut ind = evaluated(&[1.0, 2.0]);
        ind.clear_fitness();
        assert!(!ind.is_valid());
        assert_eq!(ind.objective_count(), 2);
    }

    #[test]
    fn test_genome_mut() {
        let mut ind = Individual::new(vec![0.0, 0.0], 1);
        ind.genome_mut()[1] = 4.0;
        assert_eq!(ind.into_genome(), vec![0.0, 4.0]);
    }

    #[test]
    fn test_fittest_index() {
        let pop = vec![evaluated(&[2.0]), evaluated(&[0.5]), evaluated(&[1.0])];
        assert_eq!(fittest_index(&pop), Some(1));
        assert_eq!(fittest_index(&[]), None);
    }
}
