//! Per-generation evolution statistics.
//!
//! [`EvolutionStatistics`] is a fixed-capacity table: one column per
//! requested statistic, one row per registered generation. Rows are only
//! ever appended, in generation order.

use super::error::EvolutionError;
use super::types::Individual;
use std::io::Write;

/// A scalar metric computed over a population.
pub trait StatisticRequest: Send + Sync {
    /// Column name used in exports and lookups.
    fn name(&self) -> &str;

    /// Computes the metric. `population` is never empty.
    fn compute(&self, population: &[Individual]) -> f64;
}

/// Built-in statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statistic {
    /// Minimum overall fitness.
    BestFitness,
    /// Mean overall fitness.
    AverageFitness,
    /// `best / average`. Approaches 1 as the population converges.
    SelectionPressure,
}

impl Statistic {
    /// The built-in statistics, in default column order.
    pub const ALL: [Statistic; 3] = [
        Statistic::BestFitness,
        Statistic::AverageFitness,
        Statistic::SelectionPressure,
    ];
}

impl StatisticRequest for Statistic {
    fn name(&self) -> &str {
        match self {
            Statistic::BestFitness => "best_fitness",
            Statistic::AverageFitness => "average_fitness",
            Statistic::SelectionPressure => "selection_pressure",
        }
    }

    fn compute(&self, population: &[Individual]) -> f64 {
        match self {
            Statistic::BestFitness => best_fitness(population),
            Statistic::AverageFitness => average_fitness(population),
            Statistic::SelectionPressure => best_fitness(population) / average_fitness(population),
        }
    }
}

fn best_fitness(population: &[Individual]) -> f64 {
    population
        .iter()
        .map(Individual::overall_fitness)
        .fold(f64::INFINITY, f64::min)
}

fn average_fitness(population: &[Individual]) -> f64 {
    population.iter().map(Individual::overall_fitness).sum::<f64>() / population.len() as f64
}

/// Append-only table of per-generation statistics.
///
/// # Examples
///
/// ```
/// use u_evolve::ga::{EvolutionStatistics, Individual, Statistic};
///
/// let mut stats = EvolutionStatistics::new(10);
/// let mut ind = Individual::new(vec![0.0], 1);
/// ind.set_objective_fitness(0, 2.0);
///
/// stats.register_statistic(&[ind]).unwrap();
/// assert_eq!(stats.current_generation(), 1);
/// assert_eq!(stats.current_value(&Statistic::BestFitness), Some(2.0));
/// ```
pub struct EvolutionStatistics {
    requests: Vec<Box<dyn StatisticRequest>>,
    rows: Vec<Vec<f64>>,
    capacity: usize,
    evaluations: u64,
}

impl EvolutionStatistics {
    /// Table of the built-in statistics with room for `capacity` rows.
    pub fn new(capacity: usize) -> Self {
        let requests = Statistic::ALL
            .into_iter()
            .map(|s| Box::new(s) as Box<dyn StatisticRequest>)
            .collect();
        Self::with_requests(capacity, requests)
    }

    /// Table with custom columns.
    pub fn with_requests(capacity: usize, requests: Vec<Box<dyn StatisticRequest>>) -> Self {
        Self {
            requests,
            rows: Vec::with_capacity(capacity),
            capacity,
            evaluations: 0,
        }
    }

    /// Computes every requested statistic for `population` and appends a row.
    ///
    /// An empty population appends a row of `NaN`.
    ///
    /// # Errors
    /// [`EvolutionError::StatisticsFull`] once `capacity` rows exist.
    pub fn register_statistic(&mut self, population: &[Individual]) -> Result<(), EvolutionError> {
        if self.rows.len() >= self.capacity {
            return Err(EvolutionError::StatisticsFull {
                capacity: self.capacity,
            });
        }
        let row = self
            .requests
            .iter()
            .map(|r| {
                if population.is_empty() {
                    f64::NAN
                } else {
                    r.compute(population)
                }
            })
            .collect();
        self.rows.push(row);
        Ok(())
    }

    /// Number of registered rows; also the index of the next row.
    pub fn current_generation(&self) -> usize {
        self.rows.len()
    }

    /// Maximum number of rows.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Column names, in column order.
    pub fn names(&self) -> Vec<&str> {
        self.requests.iter().map(|r| r.name()).collect()
    }

    /// Column index of the statistic called `name`.
    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.requests.iter().position(|r| r.name() == name)
    }

    /// Latest value of `statistic`, if the column exists and a row is registered.
    pub fn current_value<S: StatisticRequest + ?Sized>(&self, statistic: &S) -> Option<f64> {
        self.current_value_by_name(statistic.name())
    }

    /// Latest value of the column called `name`.
    pub fn current_value_by_name(&self, name: &str) -> Option<f64> {
        let col = self.column_of(name)?;
        self.rows.last().map(|row| row[col])
    }

    /// Every registered value of the column called `name`, oldest first.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let col = self.column_of(name)?;
        Some(self.rows.iter().map(|row| row[col]).collect())
    }

    /// The registered rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Total individual evaluations recorded so far.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Adds `count` to the evaluation counter.
    pub fn add_evaluations(&mut self, count: u64) {
        self.evaluations += count;
    }

    /// Writes a header row of column names, then one row per generation,
    /// fields separated by `separator`.
    ///
    /// # Errors
    /// [`EvolutionError::InvalidSeparator`] if `separator` is not ASCII;
    /// I/O errors from `writer`.
    pub fn write<W: Write>(&self, writer: W, separator: char) -> Result<(), EvolutionError> {
        if !separator.is_ascii() {
            return Err(EvolutionError::InvalidSeparator(separator));
        }
        let mut csv = csv::WriterBuilder::new()
            .delimiter(separator as u8)
            .from_writer(writer);

        csv.write_record(self.names())?;
        for row in &self.rows {
            csv.write_record(row.iter().map(|v| v.to_string()))?;
        }
        csv.flush()?;
        Ok(())
    }
}

impl std::fmt::Debug for EvolutionStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvolutionStatistics")
            .field("columns", &self.names())
            .field("rows", &self.rows.len())
            .field("capacity", &self.capacity)
            .field("evaluations", &self.evaluations)
            .finish()
    }
}
