//! Non-dominated sorting and crowding distance.
//!
//! Domain-agnostic NSGA-II ranking on plain objective vectors. Every
//! function here works in **minimization** space; callers map maximized
//! objectives with [`Direction::to_minimization`](super::Direction::to_minimization)
//! first.
//!
//! # Algorithms
//!
//! - [`non_dominated_sort`]: Fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: Crowding distance assignment for diversity preservation
//! - [`select_survivors`]: Front-then-crowding truncation to μ survivors
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II"
//! - IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use std::cmp::Ordering;

/// Result of non-dominated sorting.
///
/// Each element of `ranks` corresponds to the Pareto rank of the solution
/// at the same index. Rank 0 is the Pareto front (non-dominated solutions).
#[derive(Debug, Clone, Default)]
pub struct NondominatedSortResult {
    /// Pareto rank for each solution (0 = front).
    pub ranks: Vec<usize>,

    /// Indices grouped by front: `fronts[0]` contains rank-0 indices, etc.
    pub fronts: Vec<Vec<usize>>,
}

/// Returns `true` if `a` Pareto-dominates `b` (minimization).
///
/// `a` dominates `b` when it is no worse on every objective and strictly
/// better on at least one. Equal vectors do not dominate each other.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    dominance_cmp(a, b) == Dominance::Left
}

/// Fast non-dominated sorting.
///
/// Assigns a Pareto rank to each solution based on dominance relationships.
/// All objectives are **minimized**: lower values are better.
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
/// An empty input yields an empty result.
///
/// # Example
///
/// ```
/// use u_nsga::nsga::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],  // Solution A
///     vec![3.0, 3.0],  // Solution B
///     vec![5.0, 1.0],  // Solution C
///     vec![4.0, 4.0],  // Solution D, dominated by B
/// ];
///
/// let result = non_dominated_sort(&objectives);
///
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// assert_eq!(result.fronts, vec![vec![0, 1, 2], vec![3]]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult::default();
    }

    debug_assert!(
        objectives.iter().all(|o| o.len() == objectives[0].len()),
        "all objective vectors must have the same length"
    );

    let mut domination_count = vec![0usize; n];
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut ranks = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match dominance_cmp(&objectives[i], &objectives[j]) {
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

    let mut fronts = vec![front_0];
    loop {
        let current = &fronts[fronts.len() - 1];
        let mut next_front = Vec::new();

        for &i in current {
            for &j in &dominated_by[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len();
                    next_front.push(j);
                }
            }
        }

        if next_front.is_empty() {
            break;
        }
        next_front.sort_unstable();
        fronts.push(next_front);
    }

    NondominatedSortResult { ranks, fronts }
}

#[derive(Debug, PartialEq)]
enum Dominance {
    Left,
    Right,
    Neither,
}

fn dominance_cmp(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better_in_some = false;
    let mut b_better_in_some = false;

    for (&va, &vb) in a.iter().zip(b.iter()) {
        if va < vb {
            a_better_in_some = true;
        } else if vb < va {
            b_better_in_some = true;
        }
    }

    match (a_better_in_some, b_better_in_some) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Crowding distance assignment for diversity preservation.
///
/// Computes the crowding distance for each solution, measuring how
/// spread out the solutions are in objective space. Higher distance
/// means the solution is more isolated (more diverse).
///
/// Boundary solutions (min/max for any objective) receive `f64::INFINITY`.
/// An objective whose range across the set is zero contributes nothing to
/// interior solutions.
///
/// # Complexity
///
/// O(m * n * log n) where m = number of objectives, n = number of solutions
///
/// # Example
///
/// ```
/// use u_nsga::nsga::multi_objective::crowding_distance;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
/// ];
///
/// let distances = crowding_distance(&objectives);
///
/// assert!(distances[0].is_infinite());
/// assert!(distances[2].is_infinite());
/// assert!((distances[1] - 2.0).abs() < 1e-12);
/// ```
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];

    #[allow(clippy::needless_range_loop)] // obj_idx is a column index into 2D data
    for obj_idx in 0..m {
        // Stable sort keeps index order among equal values.
        let mut indices: Vec<usize> = (0..n).collect();
        indices.sort_by(|&a, &b| {
            objectives[a][obj_idx]
                .partial_cmp(&objectives[b][obj_idx])
                .unwrap_or(Ordering::Equal)
        });

        distances[indices[0]] = f64::INFINITY;
        distances[indices[n - 1]] = f64::INFINITY;

        let min_val = objectives[indices[0]][obj_idx];
        let max_val = objectives[indices[n - 1]][obj_idx];
        let range = max_val - min_val;

        if range > 0.0 {
            for i in 1..(n - 1) {
                let prev = objectives[indices[i - 1]][obj_idx];
                let next = objectives[indices[i + 1]][obj_idx];
                distances[indices[i]] += (next - prev) / range;
            }
        }
    }

    distances
}

/// Ranking of a pool: fronts plus per-solution rank and crowding distance.
#[derive(Debug, Clone, Default)]
pub struct Ranking {
    /// Pareto rank for each solution.
    pub ranks: Vec<usize>,

    /// Crowding distance for each solution, computed within its own front.
    pub crowding: Vec<f64>,

    /// Indices grouped by front.
    pub fronts: Vec<Vec<usize>>,
}

/// Sorts `objectives` into fronts and computes crowding distance per front.
pub fn rank(objectives: &[Vec<f64>]) -> Ranking {
    let sorted = non_dominated_sort(objectives);
    let mut crowding = vec![0.0; objectives.len()];

    for front in &sorted.fronts {
        let front_objs: Vec<Vec<f64>> = front.iter().map(|&i| objectives[i].clone()).collect();
        for (&i, d) in front.iter().zip(crowding_distance(&front_objs)) {
            crowding[i] = d;
        }
    }

    Ranking {
        ranks: sorted.ranks,
        crowding,
        fronts: sorted.fronts,
    }
}

/// NSGA-II environmental selection.
///
/// Returns the indices of the `mu` preferred solutions: whole fronts in rank
/// order, then the front that crosses the `mu` boundary ordered by
/// descending crowding distance. Ties in crowding distance keep pool order,
/// which makes the selection deterministic.
///
/// If `mu` is at least the pool size, every index is returned.
///
/// # Example
///
/// ```
/// use u_nsga::nsga::multi_objective::{rank, select_survivors};
///
/// let objectives = vec![
///     vec![0.0, 4.0],
///     vec![1.0, 3.0],
///     vec![1.5, 2.9],
///     vec![4.0, 0.0],
///     vec![5.0, 5.0], // dominated
/// ];
///
/// let ranking = rank(&objectives);
/// let survivors = select_survivors(&ranking, 3);
///
/// assert_eq!(survivors.len(), 3);
/// assert!(survivors.contains(&0)); // boundary
/// assert!(survivors.contains(&3)); // boundary
/// assert!(!survivors.contains(&4));
/// ```
pub fn select_survivors(ranking: &Ranking, mu: usize) -> Vec<usize> {
    let mut survivors = Vec::with_capacity(mu);

    for front in &ranking.fronts {
        let remaining = mu - survivors.len();
        if remaining == 0 {
            break;
        }
        if front.len() <= remaining {
            survivors.extend_from_slice(front);
        } else {
            let mut partial = front.clone();
            partial.sort_by(|&a, &b| {
                ranking.crowding[b]
                    .partial_cmp(&ranking.crowding[a])
                    .unwrap_or(Ordering::Equal)
            });
            survivors.extend_from_slice(&partial[..remaining]);
            break;
        }
    }

    survivors
}

// ============================================================================
// Tests
// ============================================================================
