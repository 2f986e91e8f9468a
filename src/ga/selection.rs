//! Selection strategies for reproduction and replacement.
//!
//! Selections work on population *indices*: a selection result borrows
//! nothing and owns nothing, it only names members of the population it
//! was computed from. The runner resolves those indices within the same
//! generation.
//!
//! - [`ReproductionSelection`] chooses the breeding stock for offspring.
//! - [`ReplacementSelection`] chooses which members survive into the next
//!   generation; the remaining slots are refilled with offspring.
//!
//! All strategies assume **minimization** (lower fitness = better).
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use super::multi_objective::{order_front, rank_population};
use super::types::Individual;
use rand::seq::index::sample;
use rand::RngCore;
#[cfg(feature = "parallel")]
use rayon::slice::ParallelSliceMut;

/// Chooses breeding stock from a population.
pub trait ReproductionSelection: Send + Sync {
    /// Returns indices into `population`, without duplicates.
    fn select(&self, population: &[Individual], rng: &mut dyn RngCore) -> Vec<usize>;
}

/// Chooses which members of a population survive replacement.
pub trait ReplacementSelection: Send + Sync {
    /// Returns the indices of the surviving members.
    fn survivors(&self, population: &[Individual]) -> Vec<usize>;

    /// Shrinks `population` in place to its survivors.
    fn replace(&self, population: &mut Vec<Individual>) {
        let keep = self.survivors(population);
        let members = std::mem::take(population);
        *population = take_indices(members, &keep);
    }
}

/// Ranked-selection counting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectBy {
    /// `selection_size` counts whole Pareto fronts.
    #[default]
    Ranks,
    /// `selection_size` counts individuals; the boundary front is split.
    Individuals,
}

// ============================================================================
// Truncation
// ============================================================================

/// Keeps the `selection_size` fittest members.
///
/// Usable for both reproduction and replacement.
///
/// # Complexity
/// O(n log n) (parallel sort with the `parallel` feature)
///
/// # Examples
///
/// ```
/// use u_evolve::ga::{Individual, ReproductionSelection, TruncationSelection};
/// use u_evolve::random::create_rng;
///
/// let population: Vec<Individual> = [3.0, 1.0, 2.0]
///     .iter()
///     .map(|&f| {
///         let mut ind = Individual::new(vec![0.0], 1);
///         ind.set_objective_fitness(0, f);
///         ind
///     })
///     .collect();
///
/// let picked = TruncationSelection::new(2).select(&population, &mut create_rng(0));
/// assert_eq!(picked, vec![1, 2]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TruncationSelection {
    selection_size: usize,
}

impl TruncationSelection {
    /// Creates a truncation selection of `selection_size` members.
    pub fn new(selection_size: usize) -> Self {
        Self { selection_size }
    }

    /// Configured selection size.
    pub fn selection_size(&self) -> usize {
        self.selection_size
    }

    fn fittest(&self, population: &[Individual]) -> Vec<usize> {
        let mut order = sorted_by_fitness(population);
        order.truncate(self.selection_size);
        order
    }
}

impl ReproductionSelection for TruncationSelection {
    fn select(&self, population: &[Individual], _rng: &mut dyn RngCore) -> Vec<usize> {
        self.fittest(population)
    }
}

impl ReplacementSelection for TruncationSelection {
    fn survivors(&self, population: &[Individual]) -> Vec<usize> {
        self.fittest(population)
    }
}

// ============================================================================
// Tournament
// ============================================================================

/// Tournament selection without duplicates.
///
/// Repeatedly samples `tournament_size` distinct members, and adds the
/// fittest of them to the result unless it was already selected.
///
/// Higher `tournament_size` = stronger selection pressure. Only the
/// `n - k + 1` fittest members can ever win a size-`k` tournament, so the
/// result holds at most `min(selection_size, n - k + 1)` members.
/// Selection also ends after a long run of tournaments that produce no
/// new winner.
///
/// # Complexity
/// O(k) per tournament
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelection {
    tournament_size: usize,
    selection_size: usize,
}

impl TournamentSelection {
    /// Creates a tournament selection.
    pub fn new(tournament_size: usize, selection_size: usize) -> Self {
        Self {
            tournament_size,
            selection_size,
        }
    }

    /// Configured tournament size.
    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    /// Configured selection size.
    pub fn selection_size(&self) -> usize {
        self.selection_size
    }
}

impl ReproductionSelection for TournamentSelection {
    fn select(&self, population: &[Individual], rng: &mut dyn RngCore) -> Vec<usize> {
        let n = population.len();
        if n == 0 {
            return Vec::new();
        }

        let k = self.tournament_size.clamp(1, n);
        let target = self.selection_size.min(n - k + 1);
        let stall_limit = 64 * n + 64;

        let mut selected = vec![false; n];
        let mut result = Vec::with_capacity(target);
        let mut stalled = 0usize;

        while result.len() < target && stalled < stall_limit {
            let winner = sample(&mut *rng, n, k)
                .iter()
                .min_by(|&a, &b| population[a].cmp_fitness(&population[b]));

            match winner {
                Some(w) if !selected[w] => {
                    selected[w] = true;
                    result.push(w);
                    stalled = 0;
                }
                _ => stalled += 1,
            }
        }
        result
    }
}

// ============================================================================
// Ranked (Pareto)
// ============================================================================

/// Pareto-rank selection for multi-objective populations.
///
/// Takes whole fronts, best first, until `selection_size` fronts
/// ([`SelectBy::Ranks`]) or individuals ([`SelectBy::Individuals`]) are
/// collected. When counting individuals, the front that does not fit is
/// split by crowding distance (most isolated first).
///
/// Usable for both reproduction and replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedSelection {
    selection_size: usize,
    select_by: SelectBy,
}

impl RankedSelection {
    /// Creates a ranked selection.
    pub fn new(selection_size: usize, select_by: SelectBy) -> Self {
        Self {
            selection_size,
            select_by,
        }
    }

    /// Configured counting mode.
    pub fn select_by(&self) -> SelectBy {
        self.select_by
    }

    fn take_fronts(&self, population: &[Individual]) -> Vec<usize> {
        let fronts = rank_population(population);
        match self.select_by {
            SelectBy::Ranks => fronts
                .into_iter()
                .take(self.selection_size)
                .flatten()
                .collect(),
            SelectBy::Individuals => {
                let mut result = Vec::with_capacity(self.selection_size.min(population.len()));
                for front in fronts {
                    let remaining = self.selection_size - result.len();
                    if remaining == 0 {
                        break;
                    }
                    if front.len() <= remaining {
                        result.extend(front);
                    } else {
                        result.extend(order_front(&front, population).into_iter().take(remaining));
                        break;
                    }
                }
                result
            }
        }
    }
}

impl ReproductionSelection for RankedSelection {
    fn select(&self, population: &[Individual], _rng: &mut dyn RngCore) -> Vec<usize> {
        self.take_fronts(population)
    }
}

impl ReplacementSelection for RankedSelection {
    fn survivors(&self, population: &[Individual]) -> Vec<usize> {
        self.take_fronts(population)
    }
}

// ============================================================================
// Generational
// ============================================================================

/// Full replacement: no member survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationalReplacement;

impl ReplacementSelection for GenerationalReplacement {
    fn survivors(&self, _population: &[Individual]) -> Vec<usize> {
        Vec::new()
    }

    fn replace(&self, population: &mut Vec<Individual>) {
        population.clear();
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Population indices ordered by overall fitness, best first.
pub(crate) fn sorted_by_fitness(population: &[Individual]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..population.len()).collect();
    let by_fitness = |a: &usize, b: &usize| population[*a].cmp_fitness(&population[*b]);

    #[cfg(feature = "parallel")]
    order.par_sort_by(by_fitness);
    #[cfg(not(feature = "parallel"))]
    order.sort_by(by_fitness);

    order
}

/// Moves the members at `indices` out of `population`, in `indices` order.
///
/// Repeated indices are taken once.
pub(crate) fn take_indices(population: Vec<Individual>, indices: &[usize]) -> Vec<Individual> {
    let mut slots: Vec<Option<Individual>> = population.into_iter().map(Some).collect();
    indices
        .iter()
        .filter_map(|&i| slots.get_mut(i).and_then(Option::take))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
