//! NSGA-II multi-objective evolutionary engine.
//!
//! Evolves fixed-length integer decision vectors against a user-supplied
//! multi-objective [`Evaluator`], keeping the best μ of parents and λ
//! offspring each generation by non-dominated rank and crowding distance,
//! and collecting every non-dominated individual seen in a
//! [`ParetoArchive`].
//!
//! # Core Traits
//!
//! - [`Evaluator`]: Maps a decision vector to its objective values
//! - [`Crossover`], [`Mutation`]: Variation operators on integer genomes
//! - [`StatisticsCollector`]: Receives a snapshot after every generation
//!
//! # Key Types
//!
//! - [`Individual`]: Decision vector with cached objectives, rank and crowding
//! - [`NsgaConfig`]: Algorithm parameters (μ, λ, probabilities, bounds, directions)
//! - [`Toolbox`]: Evaluator and operators used by a run
//! - [`NsgaRunner`]: Executes the μ+λ loop
//! - [`NsgaResult`]: Final population, archive and statistics
//!
//! # Submodules
//!
//! - [`operators`]: Swap, one-point crossover and uniform integer mutation
//! - [`multi_objective`]: Non-dominated sorting, crowding distance, survivor selection
//!
//! # References
//!
//! - Deb et al. (2002), *A Fast and Elitist Multiobjective GA: NSGA-II*
//! - Zitzler & Thiele (1998), *Multiobjective Optimization Using Evolutionary
//!   Algorithms: A Comparative Case Study* (hypervolume)

mod archive;
mod config;
pub mod multi_objective;
pub mod operators;
mod runner;
mod selection;
mod stats;
mod types;

pub use archive::ParetoArchive;
pub use config::{EvaluationPolicy, NsgaConfig};
pub use operators::{Crossover, Mutation, OnePointCrossover, SwapCrossover, UniformIntMutation};
pub use runner::{NsgaResult, NsgaRunner, Toolbox};
pub use selection::Selection;
pub use stats::{GenerationSnapshot, GenerationStats, Logbook, NoStatistics, StatisticsCollector};
pub use types::{Direction, Evaluator, GeneBounds, Individual};
