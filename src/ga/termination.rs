//! Termination conditions.
//!
//! A run stops as soon as any registered condition reports `true`; the
//! conditions are checked once per generation against the statistics
//! table, after the generation's row has been registered.

use super::statistics::{EvolutionStatistics, Statistic};

/// Predicate over the statistics collected so far.
pub trait TerminationCondition: Send + Sync {
    fn is_met(&self, statistics: &EvolutionStatistics) -> bool;
}

impl<F> TerminationCondition for F
where
    F: Fn(&EvolutionStatistics) -> bool + Send + Sync,
{
    fn is_met(&self, statistics: &EvolutionStatistics) -> bool {
        self(statistics)
    }
}

/// Met once more than `max_generations` rows are registered.
///
/// Row 0 holds the initial population, so the run performs exactly
/// `max_generations` evolution steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTermination {
    pub max_generations: usize,
}

impl GenerationTermination {
    pub fn new(max_generations: usize) -> Self {
        Self { max_generations }
    }
}

impl TerminationCondition for GenerationTermination {
    fn is_met(&self, statistics: &EvolutionStatistics) -> bool {
        statistics.current_generation() > self.max_generations
    }
}

/// Met when the latest best fitness is strictly below `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BestFitnessTermination {
    pub threshold: f64,
}

impl BestFitnessTermination {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl TerminationCondition for BestFitnessTermination {
    fn is_met(&self, statistics: &EvolutionStatistics) -> bool {
        statistics
            .current_value(&Statistic::BestFitness)
            .is_some_and(|v| v < self.threshold)
    }
}

/// Met when the latest average fitness is strictly below `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageFitnessTermination {
    pub threshold: f64,
}

impl AverageFitnessTermination {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl TerminationCondition for AverageFitnessTermination {
    fn is_met(&self, statistics: &EvolutionStatistics) -> bool {
        statistics
            .current_value(&Statistic::AverageFitness)
            .is_some_and(|v| v < self.threshold)
    }
}

/// Met when the latest selection pressure (`best / average`) exceeds
/// `threshold`, i.e. the population has converged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionPressureTermination {
    pub threshold: f64,
}

impl SelectionPressureTermination {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl TerminationCondition for SelectionPressureTermination {
    fn is_met(&self, statistics: &EvolutionStatistics) -> bool {
        statistics
            .current_value(&Statistic::SelectionPressure)
            .is_some_and(|v| v > self.threshold)
    }
}

/// `true` if any condition is met.
pub(crate) fn any_met(conditions: &[Box<dyn TerminationCondition>], statistics: &EvolutionStatistics) -> bool {
    conditions.iter().any(|c| c.is_met(statistics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::types::Individual;

    fn stats_with(rows: &[&[f64]]) -> EvolutionStatistics {
        let mut stats = EvolutionStatistics::new(rows.len());
        for fitnesses in rows {
            let pop: Vec<Individual> = fitnesses
                .iter()
                .map(|&f| {
                    let mut ind = Individual::new(vec![0.0], 1);
                    ind.set_objective_fitness(0, f);
                    ind
                })
                .collect();
            stats.register_statistic(&pop).unwrap();
        }
        stats
    }

    #[test]
    fn test_generation_termination() {
        let cond = GenerationTermination::new(2);
        assert!(!cond.is_met(&stats_with(&[&[1.0], &[1.0]])));
        assert!(cond.is_met(&stats_with(&[&[1.0], &[1.0], &[1.0]])));
    }

    #[test]
    fn test_fitness_thresholds_are_strict() {
        let stats = stats_with(&[&[1.0, 3.0]]);
        assert!(!BestFitnessTermination::new(1.0).is_met(&stats));
        assert!(BestFitnessTermination::new(1.5).is_met(&stats));
        assert!(!AverageFitnessTermination::new(2.0).is_met(&stats));
        assert!(AverageFitnessTermination::new(2.5).is_met(&stats));
    }

    #[test]
    fn test_selection_pressure() {
        // best 1, average 2 -> 0.5
        let stats = stats_with(&[&[1.0, 3.0]]);
        assert!(SelectionPressureTermination::new(0.4).is_met(&stats));
        assert!(!SelectionPressureTermination::new(0.5).is_met(&stats));
    }

    #[test]
    fn test_empty_statistics_never_meet_thresholds() {
        let stats = EvolutionStatistics::new(1);
        assert!(!BestFitnessTermination::new(f64::INFINITY).is_met(&stats));
        assert!(!SelectionPressureTermination::new(f64::NEG_INFINITY).is_met(&stats));
    }

    #[test]
    fn test_any_met_is_disjunction() {
        let stats = stats_with(&[&[5.0]]);
        let conditions: Vec<Box<dyn TerminationCondition>> = vec![
            Box::new(BestFitnessTermination::new(0.0)),
            Box::new(|s: &EvolutionStatistics| s.current_generation() == 1),
        ];
        assert!(any_met(&conditions, &stats));
        assert!(!any_met(&conditions[..1], &stats));
        assert!(!any_met(&[], &stats));
    }
}
