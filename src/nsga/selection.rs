//! Parent selection strategies.
//!
//! Parents are drawn **with replacement** from the current μ individuals.
//! Selection only decides which parents produce offspring; survival is
//! decided afterwards by NSGA-II ranking of the merged pool.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective GA: NSGA-II"
//!   (crowded-comparison tournament)

use super::types::Individual;
use rand::Rng;
use std::cmp::Ordering;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_nsga::nsga::Selection;
///
/// // Uniform draw with replacement (the classic μ+λ reproduction step)
/// let sel = Selection::Random;
///
/// // Binary crowded tournament
/// let sel = Selection::Tournament(2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Every individual is equally likely to be picked.
    #[default]
    Random,

    /// Crowded tournament: pick `k` individuals at random, keep the one
    /// with the lowest rank, breaking ties by larger crowding distance.
    ///
    /// [`NsgaConfig::validate`](super::NsgaConfig::validate) rejects `k = 0`.
    ///
    /// # Complexity
    /// O(k) per selection
    Tournament(usize),
}

impl Selection {
    /// Select a parent index from the population.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    pub fn select<R: Rng>(&self, population: &[Individual], rng: &mut R) -> usize {
        assert!(
            !population.is_empty(),
            "cannot select from empty population"
        );

        match self {
            Selection::Random => rng.random_range(0..population.len()),
            Selection::Tournament(k) => tournament(population, *k, rng),
        }
    }
}

fn tournament<R: Rng>(population: &[Individual], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = population.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if population[idx].crowded_cmp(&population[best_idx]) == Ordering::Less {
            best_idx = idx;
        }
    }
    best_idx
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn ranked(rank: usize, crowding: f64) -> Individual {
        let mut ind = Individual::with_objectives(vec![rank as i64], vec![rank as f64]);
        ind.set_ranking(rank, crowding);
        ind
    }

    #[test]
    fn test_random_covers_population() {
        let pop: Vec<Individual> = (0..5).map(|r| ranked(r, 1.0)).collect();
        let mut rng = create_rng(42);
        let mut counts = [0usize; 5];
        for _ in 0..1000 {
            counts[Selection::Random.select(&pop, &mut rng)] += 1;
        }
        assert!(counts.iter().all(|&c| c > 100), "uneven draws: {counts:?}");
    }

    #[test]
    fn test_tournament_prefers_lower_rank() {
        let pop: Vec<Individual> = (0..10).map(|r| ranked(r, 1.0)).collect();
        let mut rng = create_rng(42);
        let mut rank_sum = 0usize;
        for _ in 0..1000 {
            rank_sum += Selection::Tournament(4).select(&pop, &mut rng);
        }
        // Uniform draws average 4.5; a 4-way tournament sits well below.
        assert!(rank_sum < 3000, "tournament too weak: mean rank {}", rank_sum as f64 / 1000.0);
    }

    #[test]
    fn test_tournament_breaks_ties_by_crowding() {
        let pop = vec![ranked(0, 0.1), ranked(0, f64::INFINITY)];
        let mut rng = create_rng(7);
        let mut isolated = 0;
        for _ in 0..500 {
            if Selection::Tournament(2).select(&pop, &mut rng) == 1 {
                isolated += 1;
            }
        }
        // Index 0 only wins when drawn twice: P = 1/4.
        assert!(isolated > 300, "expected crowding preference, got {isolated}/500");
    }

    #[test]
    fn test_tournament_size_zero_acts_as_one() {
        let pop = vec![ranked(0, 1.0)];
        let mut rng = create_rng(1);
        assert_eq!(Selection::Tournament(0).select(&pop, &mut rng), 0);
    }

    #[test]
    #[should_panic(expected = "cannot select from empty population")]
    fn test_empty_population_panics() {
        let mut rng = create_rng(1);
        Selection::Random.select(&[], &mut rng);
    }
}
