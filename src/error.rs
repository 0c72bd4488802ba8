//! Error types.
//!
//! [`NsgaError`] covers construction, configuration and run-level failures.
//! [`EvaluationError`] is what an [`Evaluator`](crate::nsga::Evaluator)
//! reports for a single decision vector.

use std::time::Duration;

/// Failure of a single fitness evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EvaluationError {
    /// The evaluator could not produce a result for this input.
    #[error("evaluation failed: {0}")]
    Failed(String),

    /// The evaluation took longer than the configured limit.
    #[error("evaluation timed out after {elapsed:?} (limit {limit:?})")]
    Timeout {
        /// Wall-clock time the evaluation took.
        elapsed: Duration,
        /// Configured limit.
        limit: Duration,
    },

    /// The evaluator returned the wrong number of objectives.
    #[error("objective count mismatch: expected {expected}, got {got}")]
    ObjectiveCount {
        /// Number of configured objective directions.
        expected: usize,
        /// Number of values returned.
        got: usize,
    },

    /// The evaluator returned NaN or an infinite value.
    #[error("objective {index} is not finite")]
    NonFinite {
        /// Index of the offending objective.
        index: usize,
    },
}

/// Errors returned by the NSGA-II engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NsgaError {
    /// A decision vector has the wrong length or a component out of bounds.
    #[error("invalid genome: {reason}")]
    InvalidGenome {
        /// What is wrong with the genome.
        reason: String,
    },

    /// The configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// An evaluation failed and the run could not continue.
    #[error("evaluation error in generation {generation}: {source}")]
    Evaluation {
        /// Generation in which the failure occurred (0 = initial population).
        generation: usize,
        /// The underlying evaluator failure.
        #[source]
        source: EvaluationError,
    },
}

/// Convenience alias for results in this crate.
pub type Result<T> = std::result::Result<T, NsgaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = NsgaError::Configuration("population_size must be at least 1".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: population_size must be at least 1"
        );

        let err = EvaluationError::ObjectiveCount { expected: 2, got: 3 };
        assert_eq!(err.to_string(), "objective count mismatch: expected 2, got 3");
    }

    #[test]
    fn test_evaluation_source_chain() {
        use std::error::Error as _;

        let err = NsgaError::Evaluation {
            generation: 4,
            source: EvaluationError::Failed("division by zero".into()),
        };
        assert!(err.to_string().contains("generation 4"));
        let source = err.source().expect("evaluation error carries a source");
        assert_eq!(source.to_string(), "evaluation failed: division by zero");
    }
}
