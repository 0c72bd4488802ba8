//! NSGA-II multi-objective genetic algorithm engine.
//!
//! Searches a bounded integer decision space for the Pareto-optimal
//! trade-off between several objectives:
//!
//! - **Individuals**: Fixed-length integer genomes with cached objective
//!   vectors that are invalidated whenever the genes change.
//! - **Evaluation**: A user-supplied [`nsga::Evaluator`], run in parallel
//!   with rayon when the `parallel` feature is enabled. Failures are either
//!   discarded or abort the run.
//! - **Variation**: Pluggable crossover and mutation operators that keep
//!   every component within its bounds.
//! - **Survival**: Fast non-dominated sorting with crowding-distance
//!   truncation over the merged parent and offspring pool (μ+λ).
//! - **Archive**: A monotone Pareto archive of every non-dominated
//!   individual found during the run.
//!
//! Runs are reproducible: every random decision draws from a single
//! generator seeded from [`nsga::NsgaConfig::seed`].
//!
//! # Example
//!
//! ```
//! use u_nsga::nsga::{NsgaConfig, NsgaRunner, Toolbox};
//! use u_nsga::EvaluationError;
//!
//! // Cones with radius r and height h in [1, 25]: maximize volume,
//! // minimize lateral plus base surface.
//! let toolbox = Toolbox::new(|g: &[i64]| -> Result<Vec<f64>, EvaluationError> {
//!     let (r, h) = (g[0] as f64, g[1] as f64);
//!     let volume = std::f64::consts::PI * r * r * h / 3.0;
//!     let surface = std::f64::consts::PI * r * (r + (r * r + h * h).sqrt());
//!     Ok(vec![volume, surface])
//! });
//! let config = NsgaConfig::default().with_generations(10).with_seed(7);
//!
//! let result = NsgaRunner::run(&toolbox, &config).unwrap();
//! assert_eq!(result.population.len(), config.population_size);
//! ```

pub mod error;
pub mod nsga;
pub mod random;

pub use error::{EvaluationError, NsgaError, Result};
