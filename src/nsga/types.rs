//! Core type definitions for the NSGA-II engine.
//!
//! [`Individual`] is the typed record the engine evolves. [`Evaluator`] is
//! the contract between the generic engine and a domain-specific fitness
//! function.

use crate::error::{EvaluationError, NsgaError};
use rand::Rng;
use std::cmp::Ordering;

/// Optimization direction of one objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    /// Larger values are better.
    Maximize,
    /// Smaller values are better.
    Minimize,
}

impl Direction {
    /// Maps a raw objective value into minimization space.
    #[inline]
    pub fn to_minimization(self, value: f64) -> f64 {
        match self {
            Direction::Maximize => -value,
            Direction::Minimize => value,
        }
    }
}

/// Inclusive integer range `[low, high]` for one decision component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneBounds {
    /// Smallest allowed value.
    pub low: i64,
    /// Largest allowed value.
    pub high: i64,
}

impl GeneBounds {
    /// Creates a bound pair. Consistency (`low <= high`) is checked by
    /// [`NsgaConfig::validate`](super::NsgaConfig::validate).
    pub const fn new(low: i64, high: i64) -> Self {
        Self { low, high }
    }

    /// Returns `true` if `value` lies within the range.
    #[inline]
    pub fn contains(&self, value: i64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Draws a value uniformly from the range.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> i64 {
        rng.random_range(self.low..=self.high)
    }
}

/// Fitness function contract.
///
/// Maps a decision vector to one value per objective. Implementations must
/// be deterministic for a given input; the engine may call them from
/// several threads at once when parallel evaluation is enabled.
///
/// Closures with the right signature implement this trait:
///
/// ```
/// use u_nsga::nsga::Evaluator;
/// use u_nsga::EvaluationError;
///
/// let sum_and_spread = |genes: &[i64]| -> Result<Vec<f64>, EvaluationError> {
///     let sum: i64 = genes.iter().sum();
///     let spread = genes.iter().max().unwrap_or(&0) - genes.iter().min().unwrap_or(&0);
///     Ok(vec![sum as f64, spread as f64])
/// };
/// assert_eq!(sum_and_spread.evaluate(&[1, 4]).unwrap(), vec![5.0, 3.0]);
/// ```
pub trait Evaluator: Send + Sync {
    /// Computes the objective vector for `genes`.
    fn evaluate(&self, genes: &[i64]) -> Result<Vec<f64>, EvaluationError>;
}

impl<F> Evaluator for F
where
    F: Fn(&[i64]) -> Result<Vec<f64>, EvaluationError> + Send + Sync,
{
    fn evaluate(&self, genes: &[i64]) -> Result<Vec<f64>, EvaluationError> {
        self(genes)
    }
}

/// A candidate solution.
///
/// Holds the decision vector, the cached objective vector, and the
/// transient rank and crowding distance assigned by the last ranking pass.
///
/// The genes are only reachable mutably through
/// [`modify_genes`](Individual::modify_genes), which drops the cached
/// objectives, so the cache can never go stale.
///
/// Cloning yields a deep copy whose rank and crowding distance are unset.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    genes: Vec<i64>,
    objectives: Option<Vec<f64>>,
    rank: Option<usize>,
    crowding: Option<f64>,
}

impl Clone for Individual {
    fn clone(&self) -> Self {
        Self {
            genes: self.genes.clone(),
            objectives: self.objectives.clone(),
            rank: None,
            crowding: None,
        }
    }
}

impl Individual {
    /// Creates an unevaluated individual after checking `genes` against
    /// `bounds`.
    ///
    /// # Errors
    ///
    /// [`NsgaError::InvalidGenome`] if the lengths differ or a component
    /// lies outside its range.
    pub fn new(genes: Vec<i64>, bounds: &[GeneBounds]) -> Result<Self, NsgaError> {
        if genes.len() != bounds.len() {
            return Err(NsgaError::InvalidGenome {
                reason: format!(
                    "expected {} components, got {}",
                    bounds.len(),
                    genes.len()
                ),
            });
        }
        if let Some((i, (g, b))) = genes
            .iter()
            .zip(bounds)
            .enumerate()
            .find(|(_, (g, b))| !b.contains(**g))
        {
            return Err(NsgaError::InvalidGenome {
                reason: format!(
                    "component {i} = {g} outside [{}, {}]",
                    b.low, b.high
                ),
            });
        }
        Ok(Self::from_genes(genes))
    }

    /// Samples every component uniformly from its range.
    pub fn random<R: Rng>(bounds: &[GeneBounds], rng: &mut R) -> Self {
        Self::from_genes(bounds.iter().map(|b| b.sample(rng)).collect())
    }

    fn from_genes(genes: Vec<i64>) -> Self {
        Self {
            genes,
            objectives: None,
            rank: None,
            crowding: None,
        }
    }

    /// The decision vector.
    pub fn genes(&self) -> &[i64] {
        &self.genes
    }

    /// The cached objective vector, if evaluated.
    pub fn objectives(&self) -> Option<&[f64]> {
        self.objectives.as_deref()
    }

    /// Whether a valid objective vector is cached.
    pub fn is_evaluated(&self) -> bool {
        self.objectives.is_some()
    }

    /// Front index from the last ranking (0 = non-dominated).
    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    /// Crowding distance from the last ranking.
    pub fn crowding(&self) -> Option<f64> {
        self.crowding
    }

    /// Evaluates the individual unless a valid result is already cached.
    ///
    /// On failure the cache stays empty.
    pub fn evaluate<E: Evaluator + ?Sized>(
        &mut self,
        evaluator: &E,
    ) -> Result<(), EvaluationError> {
        if self.objectives.is_none() {
            self.objectives = Some(evaluator.evaluate(&self.genes)?);
        }
        Ok(())
    }

    /// Gives mutable access to the genes.
    ///
    /// Drops the cached objectives, rank and crowding distance.
    pub fn modify_genes<T>(&mut self, f: impl FnOnce(&mut [i64]) -> T) -> T {
        self.invalidate();
        f(&mut self.genes)
    }

    /// Drops the cached objectives, rank and crowding distance.
    pub fn invalidate(&mut self) {
        self.objectives = None;
        self.rank = None;
        self.crowding = None;
    }

    /// Returns `true` if every component lies within `bounds`.
    pub fn within(&self, bounds: &[GeneBounds]) -> bool {
        self.genes.len() == bounds.len()
            && self.genes.iter().zip(bounds).all(|(g, b)| b.contains(*g))
    }

    /// Objective vector mapped into minimization space.
    ///
    /// Returns `None` if the individual is not evaluated.
    pub fn minimization_objectives(&self, directions: &[Direction]) -> Option<Vec<f64>> {
        self.objectives.as_ref().map(|objs| {
            objs.iter()
                .zip(directions)
                .map(|(&v, d)| d.to_minimization(v))
                .collect()
        })
    }

    /// Pareto dominance under `directions`.
    ///
    /// Unevaluated individuals never dominate and are never dominated.
    pub fn dominates(&self, other: &Individual, directions: &[Direction]) -> bool {
        match (
            self.minimization_objectives(directions),
            other.minimization_objectives(directions),
        ) {
            (Some(a), Some(b)) => super::multi_objective::dominates(&a, &b),
            _ => false,
        }
    }

    /// Crowded comparison: lower rank first, then larger crowding distance.
    ///
    /// Unranked individuals sort after ranked ones.
    pub fn crowded_cmp(&self, other: &Individual) -> Ordering {
        let rank_a = self.rank.unwrap_or(usize::MAX);
        let rank_b = other.rank.unwrap_or(usize::MAX);
        rank_a.cmp(&rank_b).then_with(|| {
            let ca = self.crowding.unwrap_or(0.0);
            let cb = other.crowding.unwrap_or(0.0);
            cb.partial_cmp(&ca).unwrap_or(Ordering::Equal)
        })
    }

    pub(crate) fn set_ranking(&mut self, rank: usize, crowding: f64) {
        self.rank = Some(rank);
        self.crowding = Some(crowding);
    }

    #[cfg(test)]
    pub(crate) fn with_objectives(genes: Vec<i64>, objectives: Vec<f64>) -> Self {
        Self {
            genes,
            objectives: Some(objectives),
            rank: None,
            crowding: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
