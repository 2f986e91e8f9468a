//! Pareto ranking for multi-objective populations.
//!
//! All objectives are **minimized**. Dominance here is strict on every
//! objective: `a` dominates `b` iff `a` is lower than `b` on *all*
//! objectives. Rank 0 (the first front) is therefore the fittest group.
//!
//! # Algorithms
//!
//! - [`rank_population`] / [`non_dominated_sort`]: fast non-dominated
//!   sorting (Deb et al., 2002)
//! - [`crowding_distance`]: spread of solutions within a front, used to
//!   split a front that does not fit entirely into a selection
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use super::types::Individual;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Dominance comparison result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two objective vectors under strict all-objective dominance.
///
/// Empty vectors and vectors containing `NaN` never dominate.
pub fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    if a.is_empty() || a.len() != b.len() {
        return Dominance::Neither;
    }
    if a.iter().zip(b).all(|(x, y)| x < y) {
        Dominance::Left
    } else if a.iter().zip(b).all(|(x, y)| y < x) {
        Dominance::Right
    } else {
        Dominance::Neither
    }
}

/// `true` iff `a` is strictly lower than `b` on every objective.
///
/// ```
/// use u_evolve::ga::multi_objective::dominates;
///
/// assert!(dominates(&[0.2, 0.5], &[1.0, 0.6]));
/// assert!(!dominates(&[1.0, 0.6], &[0.2, 0.5]));
/// // Tied on one objective: no dominance either way.
/// assert!(!dominates(&[0.2, 0.5], &[0.2, 0.9]));
/// ```
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// `true` iff no other member of `population` dominates `population[index]`.
///
/// Identity is by index, so a duplicate genome elsewhere in the slice is
/// compared like any other member.
///
/// # Panics
/// Panics if `index` is out of bounds.
pub fn is_non_dominated(index: usize, population: &[Individual]) -> bool {
    let candidate = population[index].fitness_values();
    population
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .all(|(_, other)| !dominates(other.fitness_values(), candidate))
}

/// Fast non-dominated sorting over raw objective vectors.
///
/// Assigns a Pareto rank to each solution based on dominance relationships.
///
/// # Algorithm (Deb et al., 2002)
///
/// 1. For each pair of solutions, determine dominance
/// 2. Solutions dominated by no other belong to front 0 (rank 0)
/// 3. Remove front 0, repeat to find subsequent fronts
///
/// # Complexity
///
/// O(m * n²) where m = number of objectives, n = number of solutions
///
/// Returns empty `ranks` and `fronts` for empty input.
///
/// # Example
///
/// ```
/// use u_evolve::ga::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // A
///     vec![3.0, 3.0],  // B
///     vec![5.0, 1.0],  // C
///     vec![4.0, 4.0],  // D: dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// ```
pub fn non_dominated_sort<O: AsRef<[f64]>>(objectives: &[O]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(objectives[i].as_ref(), objectives[j].as_ref()) {
                Dominance::Left => {
                    dominated_by[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominated_by[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let front_0: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();

    let mut fronts = Vec::new();
    let mut current = front_0;
    while !current.is_empty() {
        let mut next_front = Vec::new();

        for &i in &current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len() + 1;
                    next_front.push(j);
                }
            }
        }

        next_front.sort_unstable();
        fronts.push(std::mem::replace(&mut current, next_front));
    }

    NondominatedSortResult { ranks, fronts }
}

/// Partitions a population into Pareto fronts (indices), best first.
///
/// The fronts are disjoint and their union is every index of `population`.
pub fn rank_population(population: &[Individual]) -> Vec<Vec<usize>> {
    let objectives: Vec<&[f64]> = population.iter().map(Individual::fitness_values).collect();
    non_dominated_sort(&objectives).fronts
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance for each solution, measuring how
/// spread out the solutions are in objective space. Higher distance
/// means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`.
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
pub fn crowding_distance<O: AsRef<[f64]>>(objectives: &[O]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].as_ref().len();
    let mut distances = vec![0.0f64; n];

    for obj_idx in 0..m {
        let value = |i: usize| objectives[i].as_ref()[obj_idx];
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| value(a).total_cmp(&value(b)));

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let range = value(indices[n - 1]) - value(indices[0]);
        if range > 0.0 {
            for i in 1..(n - 1) {
                distances[indices[i]] += (value(indices[i + 1]) - value(indices[i - 1])) / range;
            }
        }
    }

    distances
}

/// Orders the members of one front for truncation: most isolated first,
/// ties broken by overall fitness.
pub(crate) fn order_front(front: &[usize], population: &[Individual]) -> Vec<usize> {
    let objectives: Vec<&[f64]> = front.iter().map(|&i| population[i].fitness_values()).collect();
    let distances = crowding_distance(&objectives);

    let mut order: Vec<usize> = (0..front.len()).collect();
    order.sort_by(|&a, &b| {
        distances[b]
            .total_cmp(&distances[a])
            .then_with(|| population[front[a]].cmp_fitness(&population[front[b]]))
    });
    order.into_iter().map(|k| front[k]).collect()
}

// ============================================================================
// Tests
// ============================================================================
