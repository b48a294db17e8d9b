//! Island runtime and archipelago execution.
//!
//! [`IslandRunner`] drives one island through its generations:
//! select → breed → truncate → migrate, repeated. [`Archipelago`] sets up a
//! run (population, partition, ring, transports), runs every island on its
//! own scoped thread, and repeats for the configured number of runs.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use rand::Rng;

use super::config::IslandConfig;
use super::migration::{exchange, ChannelTransport, MigrationOutcome, Transport};
use super::operators::{breed, evaluate_all};
use super::population::{partition, random_genes, Population};
use super::report::{GenerationReport, Reporter, TracingReporter};
use super::selection::CumulativeDistribution;
use super::survivors::select_survivors;
use super::topology::{Neighbors, RingTopology};
use super::types::{descending_fitness, Individual};
use crate::error::{IslandError, IslandId, Result};
use crate::objective::Objective;
use crate::random::{create_rng, derive_seed, fresh_seed};

/// One island: an identifier, its ring neighbors, and the population it owns.
///
/// Neighbors are held by id only; their state is reached through a
/// [`Transport`] at migration time.
#[derive(Debug, Clone)]
pub struct Island {
    id: IslandId,
    neighbors: Neighbors,
    population: Population,
    generation: usize,
}

/// Statistics of one completed generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationStats {
    /// Generations completed so far, 1-based.
    pub generation: usize,
    /// Best fitness after survivor selection.
    pub best_fitness: f64,
    /// Mean fitness after survivor selection.
    pub mean_fitness: f64,
    /// Whether parents were drawn uniformly because the fitness-proportional
    /// distribution was degenerate.
    pub uniform_fallback: bool,
}

impl Island {
    /// Creates an island at generation 0.
    pub fn new(id: IslandId, neighbors: Neighbors, population: Population) -> Self {
        Self {
            id,
            neighbors,
            population,
            generation: 0,
        }
    }

    /// Island identifier.
    pub fn id(&self) -> IslandId {
        self.id
    }

    /// Ring neighbors.
    pub fn neighbors(&self) -> Neighbors {
        self.neighbors
    }

    /// Owned population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Generations completed.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Current best individual.
    pub fn best(&self) -> Option<&Individual> {
        self.population.best()
    }

    pub(crate) fn sort(&mut self) {
        self.population.sort_descending();
    }

    /// Overwrites `slot` and restores best-first order.
    pub(crate) fn install(&mut self, slot: usize, individual: Individual) {
        self.population.replace(slot, individual);
        self.population.sort_descending();
    }

    /// Runs one generation: build the selection distribution, breed
    /// `config.offspring` children, truncate back to capacity.
    pub fn step<O, R>(
        &mut self,
        config: &IslandConfig,
        objective: &O,
        rng: &mut R,
    ) -> GenerationStats
    where
        O: Objective + ?Sized,
        R: Rng,
    {
        let (cdf, uniform_fallback) = CumulativeDistribution::build_or_uniform(&self.population);
        let children = breed(&self.population, &cdf, config, objective, rng);
        select_survivors(&mut self.population, children);
        self.generation += 1;

        GenerationStats {
            generation: self.generation,
            best_fitness: self.population.best().map_or(f64::NEG_INFINITY, Individual::fitness),
            mean_fitness: self.population.mean_fitness().unwrap_or(f64::NEG_INFINITY),
            uniform_fallback,
        }
    }

    /// Consumes the island, returning its population.
    pub fn into_population(self) -> Population {
        self.population
    }
}

/// Shared, read-only inputs of every island in a run.
#[derive(Clone, Copy)]
pub struct RunContext<'a, O: ?Sized> {
    /// Run index.
    pub run: usize,
    /// Run configuration.
    pub config: &'a IslandConfig,
    /// Objective shared by all islands.
    pub objective: &'a O,
    /// Report sink.
    pub reporter: &'a dyn Reporter,
    /// Cooperative stop flag, checked at the start of each generation.
    pub cancel: Option<&'a AtomicBool>,
}

impl<O: ?Sized> RunContext<'_, O> {
    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Final state of one island.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IslandResult {
    /// Island identifier.
    pub island: IslandId,
    /// Best individual at the end of the run.
    pub best: Individual,
    /// Final population, best first.
    pub population: Population,
    /// Generations completed.
    pub generations: usize,
    /// Best fitness before the first generation, then after each one.
    pub fitness_history: Vec<f64>,
    /// Migrants installed.
    pub migrations: usize,
    /// Migration rounds skipped because the migrant was unusable.
    pub skipped_migrations: usize,
    /// Generations that fell back to uniform parent selection.
    pub uniform_generations: usize,
    /// Whether the island stopped early on cancellation.
    pub cancelled: bool,
}

/// Executes the per-island generation loop.
pub struct IslandRunner;

impl IslandRunner {
    /// Runs `island` for `config.generations` generations.
    ///
    /// Migrates after every `config.migration_interval`-th generation and
    /// reports the island's best after every generation. When the context's
    /// cancel flag is set the loop stops at the next generation boundary; a
    /// transport failure observed after cancellation is treated as the
    /// neighbor having stopped, not as an error.
    ///
    /// # Errors
    /// Fatal transport failures end the run and are returned. Recoverable
    /// ones (see [`IslandError::is_fatal`]) count as skipped migrations.
    pub fn run<T, O, R>(
        mut island: Island,
        transport: &mut T,
        ctx: &RunContext<'_, O>,
        rng: &mut R,
    ) -> Result<IslandResult>
    where
        T: Transport + ?Sized,
        O: Objective + ?Sized,
        R: Rng,
    {
        let config = ctx.config;
        island.sort();

        let mut fitness_history = Vec::with_capacity(config.generations + 1);
        fitness_history.push(island.best().map_or(f64::NEG_INFINITY, Individual::fitness));

        let mut migrations = 0usize;
        let mut skipped_migrations = 0usize;
        let mut uniform_generations = 0usize;
        let mut cancelled = false;

        for gen in 0..config.generations {
            if ctx.is_cancelled() {
                cancelled = true;
                break;
            }

            let stats = island.step(config, ctx.objective, rng);
            if stats.uniform_fallback {
                uniform_generations += 1;
            }

            if config.migrates_after(gen) {
                match exchange(&mut island, transport, gen, config, ctx.objective, rng) {
                    Ok(MigrationOutcome::Installed { .. }) => migrations += 1,
                    Ok(MigrationOutcome::Skipped { .. }) => skipped_migrations += 1,
                    // A transport may reject a payload without breaking the ring.
                    Err(err) if !err.is_fatal() => {
                        tracing::warn!(
                            island = island.id(),
                            generation = gen,
                            error = %err,
                            "migration round dropped"
                        );
                        skipped_migrations += 1;
                    }
                    // The generation itself completed; it is still recorded below.
                    Err(err) if ctx.is_cancelled() => {
                        tracing::debug!(
                            island = island.id(),
                            error = %err,
                            "neighbor stopped after cancellation"
                        );
                        cancelled = true;
                    }
                    Err(err) => {
                        tracing::error!(
                            island = island.id(),
                            generation = gen,
                            error = %err,
                            "migration failed"
                        );
                        return Err(err);
                    }
                }
            }

            if let Some(best) = island.best() {
                fitness_history.push(best.fitness());
                ctx.reporter.on_generation(&GenerationReport {
                    run: ctx.run,
                    island: island.id(),
                    generation: island.generation(),
                    genes: best.genes().to_vec(),
                    result: best.result(),
                    fitness: best.fitness(),
                });
            }

            if cancelled {
                break;
            }
        }

        let id = island.id();
        let generations = island.generation();
        let population = island.into_population();
        let best = population
            .best()
            .cloned()
            .ok_or_else(|| IslandError::InvalidConfig(format!("island {id} ended empty")))?;

        Ok(IslandResult {
            island: id,
            best,
            population,
            generations,
            fitness_history,
            migrations,
            skipped_migrations,
            uniform_generations,
            cancelled,
        })
    }
}

/// Outcome of one independent run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunResult {
    /// Run index.
    pub run: usize,
    /// Seed the run was started from.
    pub seed: u64,
    /// Per-island results, indexed by island id.
    pub islands: Vec<IslandResult>,
    /// Best individual over all islands.
    pub best: Individual,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

/// Statistics of the per-run best objective values.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Lowest best result over runs.
    pub best: f64,
    /// Highest best result over runs.
    pub worst: f64,
    /// Mean best result.
    pub mean: f64,
    /// Sample standard deviation of best results (0 for a single run).
    pub std_dev: f64,
}

impl RunSummary {
    /// Summarizes objective values; `None` when empty.
    pub fn from_results(results: &[f64]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }
        let n = results.len() as f64;
        let mean = results.iter().sum::<f64>() / n;
        let std_dev = if results.len() > 1 {
            (results.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        Some(Self {
            best: results.iter().copied().fold(f64::INFINITY, f64::min),
            worst: results.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean,
            std_dev,
        })
    }
}

/// Result of all runs.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchipelagoResult {
    /// Master seed every run seed was derived from.
    pub seed: u64,
    /// Completed runs in order.
    pub runs: Vec<RunResult>,
    /// Best individual over all runs.
    pub best: Individual,
    /// Statistics of the per-run best results.
    pub summary: RunSummary,
    /// Whether execution stopped early on cancellation.
    pub cancelled: bool,
}

/// Runs the island model.
///
/// # Usage
///
/// ```
/// use u_archipelago::island::{Archipelago, IslandConfig, NullReporter};
/// use u_archipelago::objective::Rastrigin;
///
/// let config = IslandConfig::smoke().with_seed(42);
/// let result = Archipelago::run_with_reporter(&Rastrigin, &config, &NullReporter).unwrap();
/// assert_eq!(result.runs.len(), 1);
/// assert_eq!(result.runs[0].islands.len(), 4);
/// ```
pub struct Archipelago;

impl Archipelago {
    /// Runs every configured run, reporting through `tracing`.
    ///
    /// # Errors
    /// Invalid configuration, transport failures, and worker panics.
    pub fn run<O: Objective + ?Sized>(
        objective: &O,
        config: &IslandConfig,
    ) -> Result<ArchipelagoResult> {
        Self::run_with_cancel(objective, config, &TracingReporter, None)
    }

    /// Runs every configured run, reporting to `reporter`.
    pub fn run_with_reporter<O: Objective + ?Sized>(
        objective: &O,
        config: &IslandConfig,
        reporter: &dyn Reporter,
    ) -> Result<ArchipelagoResult> {
        Self::run_with_cancel(objective, config, reporter, None)
    }

    /// Runs with an optional cancellation flag.
    ///
    /// Once the flag is set, islands stop at their next generation boundary,
    /// the current run is returned as cancelled, and no further runs start.
    pub fn run_with_cancel<O: Objective + ?Sized>(
        objective: &O,
        config: &IslandConfig,
        reporter: &dyn Reporter,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<ArchipelagoResult> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(fresh_seed);
        tracing::info!(
            seed,
            islands = config.islands,
            island_capacity = config.island_capacity(),
            runs = config.runs,
            generations = config.generations,
            "starting archipelago"
        );

        let mut runs = Vec::with_capacity(config.runs);
        let mut cancelled = false;
        for run in 0..config.runs {
            let result = Self::run_once(
                objective,
                config,
                run,
                derive_seed(seed, run as u64),
                reporter,
                cancel.as_deref(),
            )?;
            tracing::info!(
                run,
                best_result = result.best.result(),
                best_genes = ?result.best.genes(),
                "run finished"
            );
            cancelled = result.cancelled;
            runs.push(result);
            if cancelled {
                break;
            }
        }

        let best_results: Vec<f64> = runs.iter().map(|r| r.best.result()).collect();
        let summary = RunSummary::from_results(&best_results)
            .ok_or_else(|| IslandError::InvalidConfig("no run completed".into()))?;
        let best = best_of(runs.iter().map(|r| &r.best))
            .cloned()
            .ok_or_else(|| IslandError::InvalidConfig("no run completed".into()))?;

        Ok(ArchipelagoResult {
            seed,
            runs,
            best,
            summary,
            cancelled,
        })
    }

    /// Executes a single run from `seed`.
    ///
    /// Builds the ring, generates and partitions the global population, then
    /// runs one scoped thread per island, each with its own RNG stream.
    ///
    /// # Errors
    /// The first failure raised by any island. A panicked island is reported
    /// as [`IslandError::WorkerPanicked`] ahead of the transport failures its
    /// neighbors observe as a consequence.
    pub fn run_once<O: Objective + ?Sized>(
        objective: &O,
        config: &IslandConfig,
        run: usize,
        seed: u64,
        reporter: &dyn Reporter,
        cancel: Option<&AtomicBool>,
    ) -> Result<RunResult> {
        config.validate()?;

        let topology = RingTopology::new(config.islands)?;
        let mut rng = create_rng(seed);
        // Genes are drawn in order from the run RNG; only evaluation may fan out.
        let genomes: Vec<Vec<f64>> = (0..config.total_population)
            .map(|_| random_genes(config.dimensions, config.bounds, &mut rng))
            .collect();
        let global = evaluate_all(genomes, objective, config.parallel);
        let populations = partition(global, config.islands)?;
        let endpoints = ChannelTransport::ring(&topology, config.migration_timeout);

        let ctx = RunContext {
            run,
            config,
            objective,
            reporter,
            cancel,
        };
        let first_failure: Mutex<Option<IslandError>> = Mutex::new(None);

        let outcomes: Vec<std::thread::Result<Result<IslandResult>>> = std::thread::scope(|s| {
            let handles: Vec<_> = populations
                .into_iter()
                .zip(endpoints)
                .enumerate()
                .map(|(id, (population, mut endpoint))| {
                    let ctx = &ctx;
                    let first_failure = &first_failure;
                    let neighbors = topology.neighbors(id);
                    s.spawn(move || {
                        let _span = tracing::info_span!("island", run, island = id).entered();
                        let mut rng = create_rng(derive_seed(seed, id as u64 + 1));
                        let island = Island::new(id, neighbors, population);
                        let result = IslandRunner::run(island, &mut endpoint, ctx, &mut rng);
                        if let Err(err) = &result {
                            first_failure
                                .lock()
                                .unwrap_or_else(|e| e.into_inner())
                                .get_or_insert_with(|| err.clone());
                        }
                        // The endpoint drops here, after the failure is recorded,
                        // so neighbors can only fail after the root cause.
                        result
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join()).collect()
        });

        let mut islands = Vec::with_capacity(config.islands);
        let mut panicked = None;
        for (id, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(Ok(result)) => islands.push(result),
                Ok(Err(_)) => {}
                Err(_) => {
                    panicked.get_or_insert(id);
                }
            }
        }
        if let Some(island) = panicked {
            tracing::error!(run, island, "island worker panicked");
            return Err(IslandError::WorkerPanicked { island });
        }
        if let Some(err) = first_failure.into_inner().unwrap_or_else(|e| e.into_inner()) {
            tracing::error!(run, error = %err, "run aborted");
            return Err(err);
        }

        let best = best_of(islands.iter().map(|r| &r.best))
            .cloned()
            .ok_or_else(|| IslandError::InvalidConfig("run produced no islands".into()))?;
        let cancelled = islands.iter().any(|r| r.cancelled);

        Ok(RunResult {
            run,
            seed,
            islands,
            best,
            cancelled,
        })
    }
}

/// Highest-fitness individual, first one on ties.
fn best_of<'a, I>(individuals: I) -> Option<&'a Individual>
where
    I: IntoIterator<Item = &'a Individual>,
{
    individuals.into_iter().reduce(|best, ind| {
        if descending_fitness(ind, best).is_lt() {
            ind
        } else {
            best
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
