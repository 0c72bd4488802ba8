//! Variation operators for bounded integer genomes.
//!
//! Crossover recombines two parents' decision vectors in place; mutation
//! redraws individual components from their ranges. Operators work on raw
//! `&mut [i64]` slices. The runner applies them through
//! [`Individual::modify_genes`](super::Individual::modify_genes), which
//! drops any cached objectives.
//!
//! # Crossover Operators
//!
//! - [`SwapCrossover`]: exchanges corresponding components without introducing values
//! - [`OnePointCrossover`]: exchanges the tails after a random cut point
//!
//! # Mutation Operators
//!
//! - [`UniformIntMutation`]: per-component uniform redraw within bounds

use super::types::GeneBounds;
use crate::error::NsgaError;
use rand::Rng;

/// Two-parent, two-child recombination.
///
/// Implementations modify both slices in place so that they become the
/// children. Components must only move between positions with the same
/// index, so bounds are preserved whenever both parents are within bounds.
pub trait Crossover: Send + Sync {
    /// Recombines `a` and `b` in place. Both slices have the same length.
    fn crossover<R: Rng>(&self, a: &mut [i64], b: &mut [i64], rng: &mut R);

    /// Checks the operator's parameters before a run starts.
    ///
    /// # Errors
    ///
    /// [`NsgaError::Configuration`] if a parameter is out of range.
    fn validate(&self) -> Result<(), NsgaError> {
        Ok(())
    }
}

/// Component-wise mutation.
pub trait Mutation: Send + Sync {
    /// Mutates `genes` in place; each component independently with
    /// probability `gene_prob`. Results must stay within `bounds`.
    fn mutate<R: Rng>(
        &self,
        genes: &mut [i64],
        bounds: &[GeneBounds],
        gene_prob: f64,
        rng: &mut R,
    );

    /// Checks the operator's parameters before a run starts.
    ///
    /// # Errors
    ///
    /// [`NsgaError::Configuration`] if a parameter is out of range.
    fn validate(&self) -> Result<(), NsgaError> {
        Ok(())
    }
}

/// Swaps corresponding components between two parents.
///
/// Each position is exchanged independently with probability `swap_prob`.
/// With `swap_prob = 1.0` the children are the parents with every component
/// exchanged; with the default 0.5 this is uniform crossover. No values are
/// introduced: the multiset of values at each position is unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwapCrossover {
    /// Per-component swap probability.
    pub swap_prob: f64,
}

impl Default for SwapCrossover {
    fn default() -> Self {
        Self { swap_prob: 0.5 }
    }
}

impl SwapCrossover {
    /// Creates a swap crossover with the given per-component probability,
    /// clamped to `[0, 1]`.
    pub fn new(swap_prob: f64) -> Self {
        Self {
            swap_prob: swap_prob.clamp(0.0, 1.0),
        }
    }
}

impl Crossover for SwapCrossover {
    fn crossover<R: Rng>(&self, a: &mut [i64], b: &mut [i64], rng: &mut R) {
        debug_assert_eq!(a.len(), b.len(), "parents must have equal length");
        for (x, y) in a.iter_mut().zip(b.iter_mut()) {
            if rng.random_bool(self.swap_prob) {
                std::mem::swap(x, y);
            }
        }
    }

    fn validate(&self) -> Result<(), NsgaError> {
        if !(0.0..=1.0).contains(&self.swap_prob) {
            return Err(NsgaError::Configuration(format!(
                "swap_prob must be within [0, 1], got {}",
                self.swap_prob
            )));
        }
        Ok(())
    }
}

/// One-point crossover.
///
/// Picks a cut point in `1..len` and exchanges every component from the
/// cut onwards. Genomes of length 1 are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OnePointCrossover;

impl Crossover for OnePointCrossover {
    fn crossover<R: Rng>(&self, a: &mut [i64], b: &mut [i64], rng: &mut R) {
        debug_assert_eq!(a.len(), b.len(), "parents must have equal length");
        let n = a.len().min(b.len());
        if n < 2 {
            return;
        }
        let cut = rng.random_range(1..n);
        a[cut..n].swap_with_slice(&mut b[cut..n]);
    }
}

/// Uniform integer mutation.
///
/// Replaces each component, with probability `gene_prob`, by a value drawn
/// uniformly from its `[low, high]` range. The draw may return the current
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformIntMutation;

impl Mutation for UniformIntMutation {
    fn mutate<R: Rng>(
        &self,
        genes: &mut [i64],
        bounds: &[GeneBounds],
        gene_prob: f64,
        rng: &mut R,
    ) {
        debug_assert_eq!(genes.len(), bounds.len(), "genome and bounds differ in length");
        for (g, b) in genes.iter_mut().zip(bounds) {
            if rng.random_bool(gene_prob) {
                *g = b.sample(rng);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
