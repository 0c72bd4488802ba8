//! Per-generation statistics.
//!
//! The runner hands a [`GenerationSnapshot`] to a [`StatisticsCollector`]
//! after every generation (including the initial population as generation
//! 0). [`Logbook`] is the default collector: mean, standard deviation,
//! minimum and maximum of each objective over the population.

use super::archive::ParetoArchive;
use super::types::Individual;

/// State of the run at the end of a generation.
#[derive(Debug, Clone, Copy)]
pub struct GenerationSnapshot<'a> {
    /// Generation index (0 = initial population).
    pub generation: usize,

    /// Surviving population, ranked.
    pub population: &'a [Individual],

    /// Evaluations performed during this generation, failed ones included.
    pub evaluations: usize,

    /// Evaluations that failed and were discarded during this generation.
    pub failures: usize,

    /// Archive after this generation's update.
    pub archive: &'a ParetoArchive,
}

/// Consumer of per-generation snapshots.
///
/// Closures taking a snapshot implement this trait, so ad-hoc logging is a
/// one-liner:
///
/// ```
/// use u_nsga::nsga::{GenerationSnapshot, StatisticsCollector};
///
/// fn assert_collector<C: StatisticsCollector>(_: &C) {}
///
/// let mut sizes = Vec::new();
/// let collector = |s: &GenerationSnapshot<'_>| sizes.push(s.archive.len());
/// assert_collector(&collector);
/// ```
pub trait StatisticsCollector {
    /// Called once per generation, in order.
    fn record(&mut self, snapshot: &GenerationSnapshot<'_>);
}

impl<F> StatisticsCollector for F
where
    F: FnMut(&GenerationSnapshot<'_>),
{
    fn record(&mut self, snapshot: &GenerationSnapshot<'_>) {
        self(snapshot)
    }
}

/// Collector that discards every snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStatistics;

impl StatisticsCollector for NoStatistics {
    fn record(&mut self, _snapshot: &GenerationSnapshot<'_>) {}
}

/// Summary of one generation, one entry per objective in each vector.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation index.
    pub generation: usize,

    /// Evaluations performed.
    pub evaluations: usize,

    /// Failed evaluations.
    pub failures: usize,

    /// Archive size after the generation.
    pub archive_size: usize,

    /// Mean of each objective.
    pub mean: Vec<f64>,

    /// Population standard deviation of each objective.
    pub std: Vec<f64>,

    /// Minimum of each objective.
    pub min: Vec<f64>,

    /// Maximum of each objective.
    pub max: Vec<f64>,
}

impl GenerationStats {
    /// Summarizes the evaluated members of a snapshot's population.
    pub fn from_snapshot(snapshot: &GenerationSnapshot<'_>) -> Self {
        let values: Vec<&[f64]> = snapshot
            .population
            .iter()
            .filter_map(Individual::objectives)
            .collect();
        let m = values.first().map_or(0, |v| v.len());
        let n = values.len() as f64;

        let mut mean = vec![0.0; m];
        let mut std = vec![0.0; m];
        let mut min = vec![f64::INFINITY; m];
        let mut max = vec![f64::NEG_INFINITY; m];

        for j in 0..m {
            let column = values.iter().map(|v| v[j]);
            mean[j] = column.clone().sum::<f64>() / n;
            std[j] = (column.clone().map(|x| (x - mean[j]).powi(2)).sum::<f64>() / n).sqrt();
            min[j] = column.clone().fold(f64::INFINITY, f64::min);
            max[j] = column.fold(f64::NEG_INFINITY, f64::max);
        }

        Self {
            generation: snapshot.generation,
            evaluations: snapshot.evaluations,
            failures: snapshot.failures,
            archive_size: snapshot.archive.len(),
            mean,
            std,
            min,
            max,
        }
    }
}

/// Default collector: one [`GenerationStats`] per generation.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Logbook {
    /// Recorded generations in order.
    pub records: Vec<GenerationStats>,
}

impl Logbook {
    /// Creates an empty logbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded generations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&GenerationStats> {
        self.records.last()
    }

    /// Total failed evaluations across all recorded generations.
    pub fn total_failures(&self) -> usize {
        self.records.iter().map(|r| r.failures).sum()
    }
}

impl StatisticsCollector for Logbook {
    fn record(&mut self, snapshot: &GenerationSnapshot<'_>) {
        let stats = GenerationStats::from_snapshot(snapshot);
        tracing::debug!(
            generation = stats.generation,
            evaluations = stats.evaluations,
            failures = stats.failures,
            archive = stats.archive_size,
            mean = ?stats.mean,
            min = ?stats.min,
            max = ?stats.max,
            "generation recorded"
        );
        self.records.push(stats);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nsga::Direction;

    fn population() -> Vec<Individual> {
        vec![
            Individual::with_objectives(vec![1, 1], vec![1.0, 10.0]),
            Individual::with_objectives(vec![2, 2], vec![2.0, 20.0]),
            Individual::with_objectives(vec![3, 3], vec![3.0, 30.0]),
            Individual::with_objectives(vec![4, 4], vec![4.0, 40.0]),
        ]
    }

    fn snapshot<'a>(pop: &'a [Individual], archive: &'a ParetoArchive) -> GenerationSnapshot<'a> {
        GenerationSnapshot {
            generation: 3,
            population: pop,
            evaluations: 10,
            failures: 1,
            archive,
        }
    }

    fn archive() -> ParetoArchive {
        ParetoArchive::new(vec![Direction::Minimize, Direction::Minimize])
    }

    #[test]
    fn test_stats_values() {
        let pop = population();
        let mut archive = archive();
        archive.update(&pop);
        let stats = GenerationStats::from_snapshot(&snapshot(&pop, &archive));

        assert_eq!(stats.generation, 3);
        assert_eq!(stats.evaluations, 10);
        assert_eq!(stats.failures, 1);
        // (1, 10) dominates the rest when both objectives are minimized.
        assert_eq!(stats.archive_size, 1);
        assert_eq!(stats.mean, vec![2.5, 25.0]);
        assert_eq!(stats.min, vec![1.0, 10.0]);
        assert_eq!(stats.max, vec![4.0, 40.0]);
        // Population std of 1..=4 is sqrt(1.25).
        assert!((stats.std[0] - 1.25f64.sqrt()).abs() < 1e-12);
        assert!((stats.std[1] - 125f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_stats_empty_population() {
        let archive = archive();
        let stats = GenerationStats::from_snapshot(&snapshot(&[], &archive));
        assert!(stats.mean.is_empty());
        assert!(stats.std.is_empty());
    }

    #[test]
    fn test_logbook_records_in_order() {
        let pop = population();
        let archive = archive();
        let mut book = Logbook::new();
        for g in 0..3 {
            book.record(&GenerationSnapshot {
                generation: g,
                ..snapshot(&pop, &archive)
            });
        }
        assert_eq!(book.len(), 3);
        assert_eq!(
            book.records.iter().map(|r| r.generation).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(book.total_failures(), 3);
        assert_eq!(book.last().map(|r| r.generation), Some(2));
    }

    #[test]
    fn test_closure_collector() {
        let pop = population();
        let archive = archive();
        let mut seen = Vec::new();
        {
            let mut collector = |s: &GenerationSnapshot<'_>| seen.push(s.generation);
            collector.record(&snapshot(&pop, &archive));
        }
        assert_eq!(seen, vec![3]);
    }
}
