//! NSGA-II configuration.
//!
//! [`NsgaConfig`] holds all parameters that control the μ+λ loop.

use super::selection::Selection;
use super::types::{Direction, GeneBounds};
use crate::error::NsgaError;
use std::time::Duration;

/// What the runner does when an evaluation fails or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvaluationPolicy {
    /// Stop the run and return [`NsgaError::Evaluation`].
    Abort,

    /// Drop the failed individual and keep going.
    ///
    /// Failed offspring never enter the ranking pool. Failed initial
    /// individuals are replaced by fresh random samples. Every discard is
    /// counted in the generation statistics.
    #[default]
    Discard,
}

/// Configuration for the NSGA-II engine.
///
/// # Defaults
///
/// Two integer genes in `[1, 25]`, one maximized and one minimized
/// objective, λ = 100, crossover 0.7, mutation 0.2, per-gene 0.05.
///
/// ```
/// use u_nsga::nsga::NsgaConfig;
///
/// let config = NsgaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.offspring_size, 100);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_nsga::nsga::{Direction, GeneBounds, NsgaConfig, Selection};
///
/// let config = NsgaConfig::default()
///     .with_population_size(50)
///     .with_generations(20)
///     .with_bounds(vec![GeneBounds::new(0, 9); 3])
///     .with_directions(vec![Direction::Minimize, Direction::Minimize])
///     .with_selection(Selection::Tournament(2))
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NsgaConfig {
    /// Number of individuals kept each generation (μ).
    pub population_size: usize,

    /// Number of offspring produced each generation (λ).
    pub offspring_size: usize,

    /// Number of generations to run. Zero returns the ranked initial
    /// population.
    pub generations: usize,

    /// Probability of applying crossover to a pair of parents (0.0–1.0).
    ///
    /// When crossover is not applied, copies of both parents are used.
    pub crossover_prob: f64,

    /// Probability of running the mutation pass on an offspring (0.0–1.0).
    pub mutation_prob: f64,

    /// Per-component mutation probability within a mutation pass (0.0–1.0).
    pub gene_mutation_prob: f64,

    /// Inclusive range for each decision component. Its length is the
    /// genome dimension.
    pub bounds: Vec<GeneBounds>,

    /// Direction of each objective. Its length is the objective count.
    pub directions: Vec<Direction>,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Handling of failed evaluations.
    pub evaluation_policy: EvaluationPolicy,

    /// Optional limit per evaluation. An evaluation that takes longer is
    /// treated as failed.
    ///
    /// The limit is checked when the evaluator returns; a slow evaluator is
    /// not interrupted. An evaluator that never returns therefore stalls the
    /// run regardless of this setting, so evaluators that can hang must
    /// enforce their own deadline and return [`EvaluationError::Timeout`]
    /// or [`EvaluationError::Failed`].
    ///
    /// [`EvaluationError::Timeout`]: crate::EvaluationError::Timeout
    /// [`EvaluationError::Failed`]: crate::EvaluationError::Failed
    pub evaluation_timeout: Option<Duration>,

    /// Whether to evaluate individuals in parallel using rayon.
    ///
    /// Has no effect unless the `parallel` feature is enabled. Results do
    /// not depend on this flag.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for NsgaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            offspring_size: 100,
            generations: 100,
            crossover_prob: 0.7,
            mutation_prob: 0.2,
            gene_mutation_prob: 0.05,
            bounds: vec![GeneBounds::new(1, 25); 2],
            directions: vec![Direction::Maximize, Direction::Minimize],
            selection: Selection::default(),
            evaluation_policy: EvaluationPolicy::default(),
            evaluation_timeout: None,
            parallel: true,
            seed: None,
        }
    }
}

impl NsgaConfig {
    /// Sets the population size (μ).
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of offspring per generation (λ).
    pub fn with_offspring_size(mut self, n: usize) -> Self {
        self.offspring_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_prob(mut self, prob: f64) -> Self {
        self.crossover_prob = prob;
        self
    }

    /// Sets the mutation probability.
    pub fn with_mutation_prob(mut self, prob: f64) -> Self {
        self.mutation_prob = prob;
        self
    }

    /// Sets the per-component mutation probability.
    pub fn with_gene_mutation_prob(mut self, prob: f64) -> Self {
        self.gene_mutation_prob = prob;
        self
    }

    /// Sets the per-component bounds.
    pub fn with_bounds(mut self, bounds: Vec<GeneBounds>) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the objective directions.
    pub fn with_directions(mut self, directions: Vec<Direction>) -> Self {
        self.directions = directions;
        self
    }

    /// Sets the parent selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Sets the evaluation failure policy.
    pub fn with_evaluation_policy(mut self, policy: EvaluationPolicy) -> Self {
        self.evaluation_policy = policy;
        self
    }

    /// Sets the per-evaluation time limit.
    pub fn with_evaluation_timeout(mut self, timeout: Duration) -> Self {
        self.evaluation_timeout = Some(timeout);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// [`NsgaError::Configuration`] describing the first invalid parameter.
    pub fn validate(&self) -> Result<(), NsgaError> {
        if self.population_size == 0 {
            return Err(invalid("population_size must be at least 1"));
        }
        if self.offspring_size == 0 {
            return Err(invalid("offspring_size must be at least 1"));
        }
        for (name, p) in [
            ("crossover_prob", self.crossover_prob),
            ("mutation_prob", self.mutation_prob),
            ("gene_mutation_prob", self.gene_mutation_prob),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(NsgaError::Configuration(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if self.bounds.is_empty() {
            return Err(invalid("bounds must describe at least one component"));
        }
        if let Some((i, b)) = self.bounds.iter().enumerate().find(|(_, b)| b.low > b.high) {
            return Err(NsgaError::Configuration(format!(
                "bounds[{i}]: low ({}) must not exceed high ({})",
                b.low, b.high
            )));
        }
        if self.selection == Selection::Tournament(0) {
            return Err(invalid("tournament size must be at least 1"));
        }
        if self.directions.is_empty() {
            return Err(invalid("directions must name at least one objective"));
        }
        if self.evaluation_timeout == Some(Duration::ZERO) {
            return Err(invalid("evaluation_timeout must be positive or None"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> NsgaError {
    NsgaError::Configuration(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NsgaConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.offspring_size, 100);
        assert_eq!(config.generations, 100);
        assert!((config.crossover_prob - 0.7).abs() < 1e-10);
        assert!((config.mutation_prob - 0.2).abs() < 1e-10);
        assert!((config.gene_mutation_prob - 0.05).abs() < 1e-10);
        assert_eq!(config.bounds, vec![GeneBounds::new(1, 25); 2]);
        assert_eq!(
            config.directions,
            vec![Direction::Maximize, Direction::Minimize]
        );
        assert_eq!(config.selection, Selection::Random);
        assert_eq!(config.evaluation_policy, EvaluationPolicy::Discard);
        assert!(config.evaluation_timeout.is_none());
        assert!(config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = NsgaConfig::default()
            .with_population_size(50)
            .with_offspring_size(80)
            .with_generations(20)
            .with_crossover_prob(0.9)
            .with_mutation_prob(0.1)
            .with_gene_mutation_prob(0.5)
            .with_selection(Selection::Tournament(2))
            .with_evaluation_policy(EvaluationPolicy::Abort)
            .with_evaluation_timeout(Duration::from_millis(250))
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 50);
        assert_eq!(config.offspring_size, 80);
        assert_eq!(config.generations, 20);
        assert!((config.crossover_prob - 0.9).abs() < 1e-10);
        assert!((config.mutation_prob - 0.1).abs() < 1e-10);
        assert!((config.gene_mutation_prob - 0.5).abs() < 1e-10);
        assert_eq!(config.selection, Selection::Tournament(2));
        assert_eq!(config.evaluation_policy, EvaluationPolicy::Abort);
        assert_eq!(config.evaluation_timeout, Some(Duration::from_millis(250)));
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(NsgaConfig::default().validate().is_ok());
        assert!(NsgaConfig::default().with_generations(0).validate().is_ok());
    }

    #[test]
    fn test_validate_zero_sizes() {
        let config = NsgaConfig::default().with_population_size(0);
        assert!(matches!(config.validate(), Err(NsgaError::Configuration(_))));

        let config = NsgaConfig::default().with_offspring_size(0);
        assert!(matches!(config.validate(), Err(NsgaError::Configuration(_))));
    }

    #[test]
    fn test_validate_probabilities() {
        assert!(NsgaConfig::default().with_crossover_prob(1.5).validate().is_err());
        assert!(NsgaConfig::default().with_mutation_prob(-0.1).validate().is_err());
        assert!(NsgaConfig::default()
            .with_gene_mutation_prob(f64::NAN)
            .validate()
            .is_err());
        assert!(NsgaConfig::default()
            .with_crossover_prob(0.0)
            .with_mutation_prob(1.0)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_probability_message_names_field() {
        let err = NsgaConfig::default()
            .with_mutation_prob(2.0)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("mutation_prob"));
    }

    #[test]
    fn test_validate_bounds() {
        let config = NsgaConfig::default().with_bounds(vec![]);
        assert!(config.validate().is_err());

        let config =
            NsgaConfig::default().with_bounds(vec![GeneBounds::new(1, 25), GeneBounds::new(5, 4)]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("bounds[1]"));

        let config = NsgaConfig::default().with_bounds(vec![GeneBounds::new(3, 3)]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_directions() {
        let config = NsgaConfig::default().with_directions(vec![]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_tournament_size() {
        let err = NsgaConfig::default()
            .with_selection(Selection::Tournament(0))
            .validate()
            .unwrap_err();
        assert!(matches!(err, NsgaError::Configuration(_)));
        assert!(err.to_string().contains("tournament"));

        assert!(NsgaConfig::default()
            .with_selection(Selection::Tournament(1))
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = NsgaConfig::default().with_evaluation_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }
}
