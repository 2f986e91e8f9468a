//! Error types for setup validation and evolution runs.

use crate::pool::PoolError;

/// Invalid [`Setup`](super::Setup) configuration, reported by
/// [`SetupBuilder::build`](super::SetupBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    /// A required operator was never provided.
    #[error("missing required operator: {0}")]
    MissingOperator(&'static str),

    #[error("population size must be at least 2, got {0}")]
    PopulationTooSmall(usize),

    #[error("generation count must be positive")]
    ZeroGenerations,

    #[error("at least one evaluator is required")]
    NoEvaluators,

    #[error("initial genome must not be empty")]
    EmptyGenome,

    #[error("thread count must be positive")]
    ZeroThreads,
}

/// Failures raised while an evolution run is in progress.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    /// Every randomization attempt for some individual produced an invalid fitness.
    #[error("no valid individual after {attempts} attempts")]
    InitializationExhausted { attempts: usize },

    /// Offspring batches kept evaluating to invalid fitness during a refill.
    #[error("no valid offspring after {attempts} consecutive batches")]
    RefillExhausted { attempts: usize },

    /// The statistics table has no room for another generation.
    #[error("statistics table is full ({capacity} rows)")]
    StatisticsFull { capacity: usize },

    #[error("worker task failed: {0}")]
    Worker(#[from] PoolError),

    /// A stop request interrupted the current phase.
    #[error("run stopped")]
    Stopped,

    #[error("separator {0:?} is not a single-byte ASCII character")]
    InvalidSeparator(char),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            SetupError::MissingOperator("crossover").to_string(),
            "missing required operator: crossover"
        );
        assert_eq!(
            EvolutionError::InitializationExhausted { attempts: 300 }.to_string(),
            "no valid individual after 300 attempts"
        );
    }

    #[test]
    fn test_from_pool_error() {
        let err: EvolutionError = PoolError::TaskPanicked.into();
        assert!(matches!(err, EvolutionError::Worker(PoolError::TaskPanicked)));
    }
}
