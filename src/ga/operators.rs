//! Real-valued genetic operators.
//!
//! Crossover and mutation strategies for real-vector genomes. Every
//! operator reads its parents immutably and returns a freshly allocated
//! genome; individuals held by the population are never modified.
//!
//! # Crossover Operators
//!
//! - [`LinearCrossover`]: one random blend factor for the whole vector
//! - [`VoluminalCrossover`]: an independent blend factor per component
//!
//! # Mutation Operators
//!
//! - [`GaussianMutation`]: additive `N(0, σ²)` noise on every component
//! - [`UniformMutation`]: additive `U(-f, f)` noise on every component
//!
//! # References
//!
//! - Eshelman & Schaffer (1993), "Real-Coded Genetic Algorithms and
//!   Interval-Schemata" (BLX-α)
//! - Mühlenbein & Schlierkamp-Voosen (1993), "Predictive Models for the
//!   Breeder Genetic Algorithm" (line/intermediate recombination)

use super::types::{Genome, Individual};
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;

// ============================================================================
// Crossover operators
// ============================================================================

/// Combines two parents into one offspring genome.
pub trait Crossover: Send + Sync {
    /// Produces a new genome from parents `a` and `b`.
    ///
    /// Parents must have equal genome lengths.
    fn cross(&self, a: &Individual, b: &Individual, rng: &mut dyn RngCore) -> Genome;
}

/// Line recombination around the parents' midpoint.
///
/// # Algorithm
///
/// With `m = (a + b) / 2` and `d = b - m`, draws one `t ~ U(-1, 1)` and
/// returns `m + α·t·d`. The offspring lies on the line through both
/// parents; `α = 1` spans exactly the parent segment, `α > 1`
/// extrapolates beyond it.
///
/// # Complexity
/// O(n)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearCrossover {
    alpha: f64,
}

impl LinearCrossover {
    /// Creates the operator with blend extent `alpha` (absolute value used).
    pub fn new(alpha: f64) -> Self {
        Self { alpha: alpha.abs() }
    }

    /// Blend extent.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Crossover for LinearCrossover {
    fn cross(&self, a: &Individual, b: &Individual, rng: &mut dyn RngCore) -> Genome {
        debug_assert_eq!(a.genome().len(), b.genome().len(), "parents must have equal length");
        let factor = self.alpha * rng.random_range(-1.0..=1.0);
        blend(a.genome(), b.genome(), |_| factor)
    }
}

/// Box ("voluminal") recombination around the parents' midpoint.
///
/// Like [`LinearCrossover`] but draws an independent factor per component,
/// so offspring fill the hyper-box spanned by the parents rather than the
/// line between them.
///
/// # Complexity
/// O(n)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoluminalCrossover {
    alpha: f64,
}

impl VoluminalCrossover {
    /// Creates the operator with blend extent `alpha` (absolute value used).
    pub fn new(alpha: f64) -> Self {
        Self { alpha: alpha.abs() }
    }

    /// Blend extent.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl Crossover for VoluminalCrossover {
    fn cross(&self, a: &Individual, b: &Individual, rng: &mut dyn RngCore) -> Genome {
        debug_assert_eq!(a.genome().len(), b.genome().len(), "parents must have equal length");
        blend(a.genome(), b.genome(), |_| self.alpha * rng.random_range(-1.0..=1.0))
    }
}

/// `m_i + factor(i) * (b_i - m_i)` with `m = (a + b) / 2`.
fn blend(a: &[f64], b: &[f64], mut factor: impl FnMut(usize) -> f64) -> Genome {
    a.iter()
        .zip(b)
        .enumerate()
        .map(|(i, (&x, &y))| {
            let mid = (x + y) / 2.0;
            mid + factor(i) * (y - mid)
        })
        .collect()
}

// ============================================================================
// Mutation operators
// ============================================================================

/// Perturbs one individual into a new genome.
///
/// The [`should_mutate`](Mutation::should_mutate) gate decides, per
/// offspring, whether mutation is used instead of crossover.
pub trait Mutation: Send + Sync {
    /// Probability in `[0, 1]` that an offspring is produced by mutation.
    fn rate(&self) -> f64;

    /// Returns a perturbed copy of `individual`'s genome.
    fn mutate(&self, individual: &Individual, rng: &mut dyn RngCore) -> Genome;

    /// Draws once from `U(0, 1)` and compares against [`rate`](Mutation::rate).
    fn should_mutate(&self, rng: &mut dyn RngCore) -> bool {
        rng.random_range(0.0..1.0) < self.rate()
    }
}

/// Gaussian additive mutation: `x_i + N(0, σ²)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianMutation {
    rate: f64,
    std_dev: f64,
}

impl GaussianMutation {
    /// Creates the operator. `rate` is clamped to `[0, 1]`.
    pub fn new(rate: f64, std_dev: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            std_dev: std_dev.abs(),
        }
    }

    /// Standard deviation of the noise.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

impl Mutation for GaussianMutation {
    fn rate(&self) -> f64 {
        self.rate
    }

    fn mutate(&self, individual: &Individual, rng: &mut dyn RngCore) -> Genome {
        individual
            .genome()
            .iter()
            .map(|&x| {
                let noise: f64 = rng.sample(StandardNormal);
                x + self.std_dev * noise
            })
            .collect()
    }
}

/// Uniform additive mutation: `x_i + f·U(-1, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformMutation {
    rate: f64,
    factor: f64,
}

impl UniformMutation {
    /// Creates the operator. `rate` is clamped to `[0, 1]`.
    pub fn new(rate: f64, factor: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            factor: factor.abs(),
        }
    }

    /// Noise magnitude.
    pub fn factor(&self) -> f64 {
        self.factor
    }
}

impl Mutation for UniformMutation {
    fn rate(&self) -> f64 {
        self.rate
    }

    fn mutate(&self, individual: &Individual, rng: &mut dyn RngCore) -> Genome {
        individual
            .genome()
            .iter()
            .map(|&x| x + self.factor * rng.random_range(-1.0..=1.0))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
