//! Pareto archive.
//!
//! [`ParetoArchive`] keeps every non-dominated individual seen across a
//! run. It only ever drops a member when a later arrival dominates it.

use super::multi_objective::dominates;
use super::types::{Direction, Individual};
use std::cmp::Ordering;

/// Set of mutually non-dominated, evaluated individuals, unique by
/// decision vector.
///
/// # Example
///
/// ```
/// use u_nsga::nsga::{Direction, ParetoArchive};
///
/// let archive = ParetoArchive::new(vec![Direction::Maximize, Direction::Minimize]);
/// assert!(archive.is_empty());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParetoArchive {
    directions: Vec<Direction>,
    members: Vec<Individual>,
    // Minimization-space objectives, parallel to `members`.
    keys: Vec<Vec<f64>>,
}

impl ParetoArchive {
    /// Creates an empty archive for objectives with the given directions.
    pub fn new(directions: Vec<Direction>) -> Self {
        Self {
            directions,
            members: Vec::new(),
            keys: Vec::new(),
        }
    }

    /// Offers candidates to the archive.
    ///
    /// A candidate is admitted unless an existing member dominates it or
    /// already has the same decision vector. Members dominated by an
    /// admitted candidate are removed. Unevaluated candidates are ignored.
    ///
    /// Returns the number of admitted candidates.
    pub fn update<'a, I>(&mut self, candidates: I) -> usize
    where
        I: IntoIterator<Item = &'a Individual>,
    {
        let mut admitted = 0;
        for candidate in candidates {
            if self.insert(candidate) {
                admitted += 1;
            }
        }
        admitted
    }

    fn insert(&mut self, candidate: &Individual) -> bool {
        let Some(key) = candidate.minimization_objectives(&self.directions) else {
            return false;
        };

        let rejected = self
            .members
            .iter()
            .zip(&self.keys)
            .any(|(m, k)| m.genes() == candidate.genes() || dominates(k, &key));
        if rejected {
            return false;
        }

        let mut i = 0;
        while i < self.members.len() {
            if dominates(&key, &self.keys[i]) {
                self.members.remove(i);
                self.keys.remove(i);
            } else {
                i += 1;
            }
        }

        self.members.push(candidate.clone());
        self.keys.push(key);
        true
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the archive has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in admission order.
    pub fn members(&self) -> &[Individual] {
        &self.members
    }

    /// Iterates over the members.
    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.members.iter()
    }

    /// Objective directions the archive ranks by.
    pub fn directions(&self) -> &[Direction] {
        &self.directions
    }

    /// Whether a member with exactly these genes exists.
    pub fn contains_genes(&self, genes: &[i64]) -> bool {
        self.members.iter().any(|m| m.genes() == genes)
    }

    /// Consumes the archive, returning its members.
    pub fn into_members(self) -> Vec<Individual> {
        self.members
    }

    /// Hypervolume of the archive for two objectives.
    ///
    /// `reference` is a point in raw objective space that every member
    /// should be better than (below it for minimized objectives, above it
    /// for maximized ones). Members not strictly better than the reference
    /// on both objectives contribute nothing.
    ///
    /// Returns `None` unless the archive has exactly two objectives.
    ///
    /// # Example
    ///
    /// ```
    /// use u_nsga::nsga::{Direction, ParetoArchive};
    ///
    /// let archive = ParetoArchive::new(vec![Direction::Minimize, Direction::Minimize]);
    /// assert_eq!(archive.hypervolume_2d([10.0, 10.0]), Some(0.0));
    /// ```
    pub fn hypervolume_2d(&self, reference: [f64; 2]) -> Option<f64> {
        if self.directions.len() != 2 {
            return None;
        }
        let r = [
            self.directions[0].to_minimization(reference[0]),
            self.directions[1].to_minimization(reference[1]),
        ];

        let mut points: Vec<&Vec<f64>> = self
            .keys
            .iter()
            .filter(|k| k[0] < r[0] && k[1] < r[1])
            .collect();
        points.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(Ordering::Equal));

        let mut volume = 0.0;
        let mut ceiling = r[1];
        for p in points {
            if p[1] < ceiling {
                volume += (r[0] - p[0]) * (ceiling - p[1]);
                ceiling = p[1];
            }
        }
        Some(volume)
    }
}

impl<'a> IntoIterator for &'a ParetoArchive {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MIN2: [Direction; 2] = [Direction::Minimize, Direction::Minimize];

    fn ind(genes: [i64; 2], objs: [f64; 2]) -> Individual {
        Individual::with_objectives(genes.to_vec(), objs.to_vec())
    }

    fn assert_non_dominated(archive: &ParetoArchive) {
        for a in archive.iter() {
            for b in archive.iter() {
                assert!(
                    !a.dominates(b, archive.directions()),
                    "{:?} dominates {:?}",
                    a.genes(),
                    b.genes()
                );
            }
        }
    }

    #[test]
    fn test_admits_non_dominated() {
        let mut archive = ParetoArchive::new(MIN2.to_vec());
        let admitted = archive.update(&[ind([1, 1], [1.0, 5.0]), ind([2, 2], [5.0, 1.0])]);
        assert_eq!(admitted, 2);
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_rejects_dominated_candidate() {
        let mut archive = ParetoArchive::new(MIN2.to_vec());
        archive.update(&[ind([1, 1], [1.0, 1.0])]);
        let admitted = archive.update(&[ind([2, 2], [2.0, 2.0])]);
        assert_eq!(admitted, 0);
        assert!(archive.contains_genes(&[1, 1]));
        assert!(!archive.contains_genes(&[2, 2]));
    }

    #[test]
    fn test_removes_dominated_members() {
        let mut archive = ParetoArchive::new(MIN2.to_vec());
        archive.update(&[ind([1, 1], [3.0, 4.0]), ind([2, 2], [4.0, 3.0])]);
        archive.update(&[ind([3, 3], [1.0, 1.0])]);
        assert_eq!(archive.len(), 1);
        assert!(archive.contains_genes(&[3, 3]));
    }

    #[test]
    fn test_collapses_duplicate_genes() {
        let mut archive = ParetoArchive::new(MIN2.to_vec());
        archive.update(&[ind([1, 1], [1.0, 5.0])]);
        archive.update(&[ind([1, 1], [1.0, 5.0]), ind([1, 1], [1.0, 5.0])]);
        assert_eq!(archive.len(), 1);
    }

    #[test]
    fn test_keeps_equal_objectives_with_distinct_genes() {
        let mut archive = ParetoArchive::new(MIN2.to_vec());
        archive.update(&[ind([1, 1], [2.0, 2.0]), ind([2, 2], [2.0, 2.0])]);
        assert_eq!(archive.len(), 2);
    }

    #[test]
    fn test_ignores_unevaluated() {
        let mut archive = ParetoArchive::new(MIN2.to_vec());
        let bounds = vec![crate::nsga::GeneBounds::new(1, 5); 2];
        let raw = Individual::new(vec![1, 1], &bounds).unwrap();
        assert_eq!(archive.update(&[raw]), 0);
        assert!(archive.is_empty());
    }

    #[test]
    fn test_respects_maximize_direction() {
        let mut archive = ParetoArchive::new(vec![Direction::Maximize, Direction::Minimize]);
        archive.update(&[ind([1, 1], [10.0, 5.0])]);
        // Larger first objective with the same second objective dominates.
        archive.update(&[ind([2, 2], [20.0, 5.0])]);
        assert_eq!(archive.len(), 1);
        assert!(archive.contains_genes(&[2, 2]));
    }

    #[test]
    fn test_order_independent_content() {
        let pool = vec![
            ind([1, 1], [1.0, 9.0]),
            ind([2, 2], [2.0, 8.0]),
            ind([3, 3], [3.0, 9.0]),
            ind([4, 4], [5.0, 2.0]),
            ind([5, 5], [6.0, 6.0]),
            ind([6, 6], [9.0, 1.0]),
        ];
        let mut forward = ParetoArchive::new(MIN2.to_vec());
        forward.update(&pool);
        let mut backward = ParetoArchive::new(MIN2.to_vec());
        backward.update(pool.iter().rev());

        let mut a: Vec<_> = forward.iter().map(|m| m.genes().to_vec()).collect();
        let mut b: Vec<_> = backward.iter().map(|m| m.genes().to_vec()).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
        assert_eq!(a, vec![vec![1, 1], vec![2, 2], vec![4, 4], vec![6, 6]]);
        assert_non_dominated(&forward);
    }

    // ---- Hypervolume ----

    #[test]
    fn test_hypervolume_two_points() {
        let mut archive = ParetoArchive::new(MIN2.to_vec());
        archive.update(&[ind([1, 1], [1.0, 3.0]), ind([2, 2], [3.0, 1.0])]);
        // Union of [1,4]x[3,4] and [3,4]x[1,4]: 3 + 3 - 1 = 5.
        let hv = archive.hypervolume_2d([4.0, 4.0]).unwrap();
        assert!((hv - 5.0).abs() < 1e-12, "got {hv}");
    }

    #[test]
    fn test_hypervolume_maximized_objective() {
        let mut archive = ParetoArchive::new(vec![Direction::Maximize, Direction::Minimize]);
        archive.update(&[ind([1, 1], [10.0, 2.0])]);
        let hv = archive.hypervolume_2d([0.0, 5.0]).unwrap();
        assert!((hv - 30.0).abs() < 1e-12, "got {hv}");
    }

    #[test]
    fn test_hypervolume_needs_two_objectives() {
        let archive = ParetoArchive::new(vec![Direction::Minimize; 3]);
        assert!(archive.hypervolume_2d([1.0, 1.0]).is_none());
    }
}
