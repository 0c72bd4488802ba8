//! NSGA-II μ+λ loop execution.
//!
//! [`NsgaRunner`] orchestrates the complete evolutionary process:
//! initialization → evaluation → variation → merge → ranking → truncation
//! → archive update → repeat.

use super::archive::ParetoArchive;
use super::config::{EvaluationPolicy, NsgaConfig};
use super::multi_objective::{rank, select_survivors, Ranking};
use super::operators::{Crossover, Mutation, SwapCrossover, UniformIntMutation};
use super::stats::{GenerationSnapshot, Logbook, StatisticsCollector};
use super::types::{Direction, Evaluator, Individual};
use crate::error::{EvaluationError, NsgaError};
use crate::random::rng_from_option;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Initial individuals sampled per population slot before giving up on
/// an evaluator that keeps failing.
const INIT_ATTEMPTS_PER_SLOT: usize = 10;

/// The strategies a run is built from: fitness evaluator, crossover and
/// mutation operators.
///
/// Parent selection lives in [`NsgaConfig::selection`].
///
/// ```
/// use u_nsga::nsga::{OnePointCrossover, Toolbox};
/// use u_nsga::EvaluationError;
///
/// let toolbox = Toolbox::new(|g: &[i64]| -> Result<Vec<f64>, EvaluationError> {
///     Ok(vec![g[0] as f64, -(g[1] as f64)])
/// })
/// .with_crossover(OnePointCrossover);
/// ```
#[derive(Debug, Clone)]
pub struct Toolbox<E, C = SwapCrossover, M = UniformIntMutation> {
    /// Fitness function.
    pub evaluator: E,
    /// Recombination operator.
    pub crossover: C,
    /// Mutation operator.
    pub mutation: M,
}

impl<E: Evaluator> Toolbox<E> {
    /// Bundles `evaluator` with [`SwapCrossover`] and [`UniformIntMutation`].
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            crossover: SwapCrossover::default(),
            mutation: UniformIntMutation,
        }
    }
}

impl<E, C, M> Toolbox<E, C, M> {
    /// Replaces the crossover operator.
    pub fn with_crossover<C2: Crossover>(self, crossover: C2) -> Toolbox<E, C2, M> {
        Toolbox {
            evaluator: self.evaluator,
            crossover,
            mutation: self.mutation,
        }
    }

    /// Replaces the mutation operator.
    pub fn with_mutation<M2: Mutation>(self, mutation: M2) -> Toolbox<E, C, M2> {
        Toolbox {
            evaluator: self.evaluator,
            crossover: self.crossover,
            mutation,
        }
    }
}

/// Result of an NSGA-II run.
#[derive(Debug, Clone)]
pub struct NsgaResult<S = Logbook> {
    /// Final population: μ evaluated, ranked individuals in survival order.
    pub population: Vec<Individual>,

    /// Every non-dominated individual found during the run.
    pub archive: ParetoArchive,

    /// The statistics collector after the last generation.
    pub statistics: S,

    /// Number of generations completed after initialization.
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Total evaluator calls, failed ones included.
    pub evaluations: usize,

    /// Total evaluations discarded under [`EvaluationPolicy::Discard`].
    pub failures: usize,

    /// The seed the run used.
    pub seed: u64,
}

/// Executes the NSGA-II μ+λ loop.
///
/// # Usage
///
/// ```
/// use u_nsga::nsga::{Direction, GeneBounds, NsgaConfig, NsgaRunner, Toolbox};
/// use u_nsga::EvaluationError;
///
/// // Minimize both x and (10 - x): every x is Pareto-optimal.
/// let toolbox = Toolbox::new(|g: &[i64]| -> Result<Vec<f64>, EvaluationError> {
///     Ok(vec![g[0] as f64, (10 - g[0]) as f64])
/// });
/// let config = NsgaConfig::default()
///     .with_bounds(vec![GeneBounds::new(0, 10)])
///     .with_directions(vec![Direction::Minimize, Direction::Minimize])
///     .with_population_size(20)
///     .with_offspring_size(20)
///     .with_generations(10)
///     .with_seed(42);
///
/// let result = NsgaRunner::run(&toolbox, &config).unwrap();
/// assert_eq!(result.population.len(), 20);
/// assert!(!result.archive.is_empty());
/// ```
pub struct NsgaRunner;

impl NsgaRunner {
    /// Runs NSGA-II, recording statistics in a [`Logbook`].
    ///
    /// # Errors
    ///
    /// - [`NsgaError::Configuration`] if `config` or an operator's
    ///   parameters are invalid.
    /// - [`NsgaError::Evaluation`] if an evaluation fails under
    ///   [`EvaluationPolicy::Abort`], or the initial population cannot be
    ///   filled under [`EvaluationPolicy::Discard`].
    pub fn run<E, C, M>(
        toolbox: &Toolbox<E, C, M>,
        config: &NsgaConfig,
    ) -> Result<NsgaResult<Logbook>, NsgaError>
    where
        E: Evaluator,
        C: Crossover,
        M: Mutation,
    {
        Self::run_with_collector(toolbox, config, Logbook::new(), None)
    }

    /// Runs NSGA-II with a custom statistics collector and an optional
    /// cancellation token.
    ///
    /// If `cancel` is set to `true`, the run stops at the next generation
    /// boundary and returns the current population and archive.
    pub fn run_with_collector<E, C, M, S>(
        toolbox: &Toolbox<E, C, M>,
        config: &NsgaConfig,
        mut collector: S,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<NsgaResult<S>, NsgaError>
    where
        E: Evaluator,
        C: Crossover,
        M: Mutation,
        S: StatisticsCollector,
    {
        config.validate()?;
        toolbox.crossover.validate()?;
        toolbox.mutation.validate()?;

        let (mut rng, seed) = rng_from_option(config.seed);
        let _span = tracing::info_span!(
            "nsga2",
            seed,
            mu = config.population_size,
            lambda = config.offspring_size,
            generations = config.generations
        )
        .entered();
        tracing::info!("starting run");

        let guard = GuardedEvaluator {
            inner: &toolbox.evaluator,
            objectives: config.directions.len(),
            timeout: config.evaluation_timeout,
        };
        let mut archive = ParetoArchive::new(config.directions.clone());

        // 1. Initialize and evaluate
        let init = initial_population(&guard, config, &mut rng)?;
        let mut evaluations = init.evaluations;
        let mut failures = init.failures;
        let mut population = init.population;

        // 2. Rank, archive, record generation 0
        let ranking = rank_pool(&mut population, &config.directions);
        population = truncate(population, &ranking, config.population_size);
        archive.update(population.iter().filter(|ind| ind.rank() == Some(0)));
        collector.record(&GenerationSnapshot {
            generation: 0,
            population: &population,
            evaluations: init.evaluations,
            failures: init.failures,
            archive: &archive,
        });

        let mut completed = 0;
        let mut cancelled = false;

        // 3. Generational loop
        for generation in 1..=config.generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    tracing::info!(generation, "run cancelled");
                    break;
                }
            }

            let mut offspring = vary(&population, toolbox, config, &mut rng);

            let pending = offspring.iter().filter(|ind| !ind.is_evaluated()).count();
            let outcomes = evaluate_all(&guard, &mut offspring, config.parallel);
            let gen_failures =
                apply_policy(&mut offspring, outcomes, config.evaluation_policy, generation)?;
            evaluations += pending;
            failures += gen_failures;

            // Merge parents and offspring, keep the best μ
            let mut pool = population;
            pool.append(&mut offspring);
            let ranking = rank_pool(&mut pool, &config.directions);
            population = truncate(pool, &ranking, config.population_size);

            archive.update(population.iter().filter(|ind| ind.rank() == Some(0)));
            collector.record(&GenerationSnapshot {
                generation,
                population: &population,
                evaluations: pending,
                failures: gen_failures,
                archive: &archive,
            });
            completed = generation;
        }

        tracing::info!(
            generations = completed,
            evaluations,
            failures,
            archive = archive.len(),
            "run finished"
        );

        Ok(NsgaResult {
            population,
            archive,
            statistics: collector,
            generations: completed,
            cancelled,
            evaluations,
            failures,
            seed,
        })
    }
}

/// Wraps the user evaluator with the checks every result must pass.
struct GuardedEvaluator<'a, E> {
    inner: &'a E,
    objectives: usize,
    timeout: Option<Duration>,
}

impl<E: Evaluator> Evaluator for GuardedEvaluator<'_, E> {
    fn evaluate(&self, genes: &[i64]) -> Result<Vec<f64>, EvaluationError> {
        let start = Instant::now();
        let values = self.inner.evaluate(genes)?;

        if let Some(limit) = self.timeout {
            let elapsed = start.elapsed();
            if elapsed > limit {
                return Err(EvaluationError::Timeout { elapsed, limit });
            }
        }
        if values.len() != self.objectives {
            return Err(EvaluationError::ObjectiveCount {
                expected: self.objectives,
                got: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(EvaluationError::NonFinite { index });
        }
        Ok(values)
    }
}

struct InitialPopulation {
    population: Vec<Individual>,
    evaluations: usize,
    failures: usize,
}

/// Sample and evaluate μ individuals, resampling failed ones under
/// [`EvaluationPolicy::Discard`].
fn initial_population<E: Evaluator, R: Rng>(
    guard: &GuardedEvaluator<'_, E>,
    config: &NsgaConfig,
    rng: &mut R,
) -> Result<InitialPopulation, NsgaError> {
    let mu = config.population_size;
    let max_attempts = mu.saturating_mul(INIT_ATTEMPTS_PER_SLOT);
    let mut population = Vec::with_capacity(mu);
    let mut evaluations = 0;
    let mut failures = 0;

    while population.len() < mu {
        let needed = mu - population.len();
        let mut batch: Vec<Individual> = (0..needed)
            .map(|_| Individual::random(&config.bounds, rng))
            .collect();
        evaluations += needed;

        let outcomes = evaluate_all(guard, &mut batch, config.parallel);
        let mut last_error = None;
        for (ind, outcome) in batch.into_iter().zip(outcomes) {
            match outcome {
                Ok(()) => population.push(ind),
                Err(e) => {
                    if config.evaluation_policy == EvaluationPolicy::Abort {
                        return Err(NsgaError::Evaluation {
                            generation: 0,
                            source: e,
                        });
                    }
                    tracing::warn!(
                        genes = ?ind.genes(),
                        error = %e,
                        "discarding initial individual"
                    );
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        if let Some(source) = last_error {
            if population.len() < mu && evaluations >= max_attempts {
                return Err(NsgaError::Evaluation {
                    generation: 0,
                    source,
                });
            }
        }
    }

    Ok(InitialPopulation {
        population,
        evaluations,
        failures,
    })
}

/// Evaluate every individual lacking a cached result. Outcomes are
/// returned in input order regardless of parallelism.
fn evaluate_all<E: Evaluator>(
    guard: &GuardedEvaluator<'_, E>,
    individuals: &mut [Individual],
    parallel: bool,
) -> Vec<Result<(), EvaluationError>> {
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        return individuals
            .par_iter_mut()
            .map(|ind| ind.evaluate(guard))
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    individuals.iter_mut().map(|ind| ind.evaluate(guard)).collect()
}

/// Drop failed offspring, or fail the run, according to `policy`.
///
/// Returns the number of discarded individuals.
fn apply_policy(
    offspring: &mut Vec<Individual>,
    outcomes: Vec<Result<(), EvaluationError>>,
    policy: EvaluationPolicy,
    generation: usize,
) -> Result<usize, NsgaError> {
    let mut discarded = 0;
    let mut kept = Vec::with_capacity(offspring.len());

    for (ind, outcome) in offspring.drain(..).zip(outcomes) {
        match outcome {
            Ok(()) => kept.push(ind),
            Err(source) => match policy {
                EvaluationPolicy::Abort => {
                    return Err(NsgaError::Evaluation { generation, source });
                }
                EvaluationPolicy::Discard => {
                    tracing::warn!(
                        generation,
                        genes = ?ind.genes(),
                        error = %source,
                        "discarding offspring"
                    );
                    discarded += 1;
                }
            },
        }
    }

    *offspring = kept;
    Ok(discarded)
}

/// Produce λ offspring from the current population.
///
/// Parents are drawn in pairs with replacement. A pair is recombined with
/// probability `crossover_prob`; each resulting child then goes through
/// the mutation pass with probability `mutation_prob`. Children that were
/// neither recombined nor mutated keep their parent's cached objectives.
fn vary<E, C, M, R>(
    population: &[Individual],
    toolbox: &Toolbox<E, C, M>,
    config: &NsgaConfig,
    rng: &mut R,
) -> Vec<Individual>
where
    C: Crossover,
    M: Mutation,
    R: Rng,
{
    let lambda = config.offspring_size;
    let mut offspring = Vec::with_capacity(lambda);

    while offspring.len() < lambda {
        let p1 = config.selection.select(population, rng);
        let p2 = config.selection.select(population, rng);
        let mut a = population[p1].clone();
        let mut b = population[p2].clone();

        if rng.random_bool(config.crossover_prob) {
            a.modify_genes(|ga| {
                b.modify_genes(|gb| toolbox.crossover.crossover(ga, gb, rng));
            });
        }

        for mut child in [a, b] {
            if offspring.len() >= lambda {
                break;
            }
            if rng.random_bool(config.mutation_prob) {
                child.modify_genes(|genes| {
                    toolbox
                        .mutation
                        .mutate(genes, &config.bounds, config.gene_mutation_prob, rng);
                });
            }
            debug_assert!(child.within(&config.bounds), "operator left bounds");
            offspring.push(child);
        }
    }

    offspring
}

/// Rank an evaluated pool and store rank and crowding on each member.
fn rank_pool(pool: &mut [Individual], directions: &[Direction]) -> Ranking {
    let objectives: Vec<Vec<f64>> = pool
        .iter()
        .map(|ind| {
            ind.minimization_objectives(directions)
                .expect("only evaluated individuals enter the ranking pool")
        })
        .collect();

    let ranking = rank(&objectives);
    for (i, ind) in pool.iter_mut().enumerate() {
        ind.set_ranking(ranking.ranks[i], ranking.crowding[i]);
    }
    ranking
}

/// Keep the `mu` survivors chosen by front and crowding distance.
fn truncate(pool: Vec<Individual>, ranking: &Ranking, mu: usize) -> Vec<Individual> {
    let mut slots: Vec<Option<Individual>> = pool.into_iter().map(Some).collect();
    select_survivors(ranking, mu)
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
