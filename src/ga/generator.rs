//! Genome generation.
//!
//! A [`GenomeGenerator`] holds the reference genome every new individual
//! starts from, plus an ordered chain of [`ChromosomeGenerator`] strategies
//! that overwrite all or part of that genome.

use super::types::{Genome, Individual};
use rand::{Rng, RngCore};
use std::ops::Range;

/// A strategy that rewrites some or all genome components of an individual.
pub trait ChromosomeGenerator: Send + Sync {
    /// Overwrites (part of) `individual`'s genome in place.
    fn generate(&self, individual: &mut Individual, rng: &mut dyn RngCore);
}

impl<F> ChromosomeGenerator for F
where
    F: Fn(&mut Individual, &mut dyn RngCore) + Send + Sync,
{
    fn generate(&self, individual: &mut Individual, rng: &mut dyn RngCore) {
        self(individual, rng)
    }
}

/// Fills genome components uniformly in `[lower, upper)`.
///
/// By default every component is filled; [`with_components`] restricts the
/// strategy to a sub-range so several strategies can share one genome.
///
/// [`with_components`]: UniformChromosome::with_components
#[derive(Debug, Clone, PartialEq)]
pub struct UniformChromosome {
    lower: f64,
    upper: f64,
    components: Option<Range<usize>>,
}

impl UniformChromosome {
    /// Creates a strategy sampling from `[lower, upper)`.
    ///
    /// Bounds given in the wrong order are swapped.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower: lower.min(upper),
            upper: lower.max(upper),
            components: None,
        }
    }

    /// Restricts the strategy to the components in `range`.
    pub fn with_components(mut self, range: Range<usize>) -> Self {
        self.components = Some(range);
        self
    }

    /// The sampling bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }
}

impl ChromosomeGenerator for UniformChromosome {
    fn generate(&self, individual: &mut Individual, rng: &mut dyn RngCore) {
        let genome = individual.genome_mut();
        let range = match &self.components {
            Some(r) => r.start.min(genome.len())..r.end.min(genome.len()),
            None => 0..genome.len(),
        };
        for gene in &mut genome[range] {
            *gene = if self.upper > self.lower {
                rng.random_range(self.lower..self.upper)
            } else {
                self.lower
            };
        }
    }
}

/// Reference genome plus an ordered chain of chromosome generators.
///
/// # Examples
///
/// ```
/// use u_evolve::ga::{GenomeGenerator, Individual, UniformChromosome};
/// use u_evolve::random::create_rng;
///
/// let generator = GenomeGenerator::new(vec![-5.12, -5.12])
///     .with_chromosome(UniformChromosome::new(-5.12, 5.12));
///
/// let mut ind = Individual::new(generator.initial_genome().to_vec(), 1);
/// generator.generate(&mut ind, &mut create_rng(1));
/// assert!(ind.genome().iter().all(|g| (-5.12..5.12).contains(g)));
/// ```
pub struct GenomeGenerator {
    initial: Genome,
    chromosomes: Vec<Box<dyn ChromosomeGenerator>>,
}

impl GenomeGenerator {
    /// Creates a generator with the given reference genome and no strategies.
    pub fn new(initial: Genome) -> Self {
        Self {
            initial,
            chromosomes: Vec::new(),
        }
    }

    /// Appends a chromosome strategy (builder form).
    pub fn with_chromosome<C: ChromosomeGenerator + 'static>(mut self, chromosome: C) -> Self {
        self.append_chromosome_generator(Box::new(chromosome));
        self
    }

    /// Appends a chromosome strategy.
    pub fn append_chromosome_generator(&mut self, chromosome: Box<dyn ChromosomeGenerator>) {
        self.chromosomes.push(chromosome);
    }

    /// The reference genome new individuals start from.
    pub fn initial_genome(&self) -> &[f64] {
        &self.initial
    }

    /// Genome length.
    pub fn dimension(&self) -> usize {
        self.initial.len()
    }

    /// Number of chained strategies.
    pub fn chromosome_count(&self) -> usize {
        self.chromosomes.len()
    }

    /// Applies every strategy, in order, to `individual`'s genome.
    pub fn generate(&self, individual: &mut Individual, rng: &mut dyn RngCore) {
        for chromosome in &self.chromosomes {
            chromosome.generate(individual, rng);
        }
    }
}

impl std::fmt::Debug for GenomeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenomeGenerator")
            .field("initial", &self.initial)
            .field("chromosomes", &self.chromosomes.len())
            .finish()
    }
}
