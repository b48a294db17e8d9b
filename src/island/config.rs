//! Island model configuration.
//!
//! [`IslandConfig`] is the single immutable parameter set threaded through
//! every island of a run.

use std::time::Duration;

use super::migration::Replacement;
use super::operators::Crossover;
use crate::error::{IslandError, Result};

/// Per-gene search domain `[lower, upper]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Bounds {
    /// Creates bounds `[lower, upper]`.
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Symmetric bounds `[-limit, limit]`.
    pub fn symmetric(limit: f64) -> Self {
        Self::new(-limit, limit)
    }

    /// Width of the domain.
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Whether `x` lies inside the domain.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.lower && x <= self.upper
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::symmetric(5.12)
    }
}

/// Configuration for an island-model run.
///
/// # Defaults
///
/// The defaults are the reference setup: 3 islands of 20 individuals,
/// 10 children per generation, 100 generations, 10 independent runs.
///
/// ```
/// use u_archipelago::island::IslandConfig;
///
/// let config = IslandConfig::default();
/// assert_eq!(config.island_capacity(), 20);
/// assert!(config.validate().is_ok());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_archipelago::island::{IslandConfig, Replacement};
///
/// let config = IslandConfig::default()
///     .with_islands(4)
///     .with_total_population(40)
///     .with_offspring(8)
///     .with_replacement(Replacement::Random)
///     .with_seed(7);
/// assert_eq!(config.island_capacity(), 10);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IslandConfig {
    /// Generations per run (`EVALS`).
    pub generations: usize,

    /// Independent repetitions (`RUNS`).
    ///
    /// Runs share no state: each gets a fresh population and topology.
    pub runs: usize,

    /// Children bred per island per generation (`LAMBDA`).
    pub offspring: usize,

    /// Individuals across all islands (`MU`).
    ///
    /// Must be divisible by [`islands`](Self::islands).
    pub total_population: usize,

    /// Number of islands (`ISLANDS`).
    pub islands: usize,

    /// Probability of mutating a child (`MUTATION_RATE`).
    pub mutation_rate: f64,

    /// Gene vector length.
    pub dimensions: usize,

    /// Per-gene domain used for initialization and mutation.
    pub bounds: Bounds,

    /// Recombination policy.
    pub crossover: Crossover,

    /// Which slot an arriving migrant overwrites.
    pub replacement: Replacement,

    /// Generations between migration rounds.
    ///
    /// 1 migrates every generation; `generations` migrates once per run.
    pub migration_interval: usize,

    /// Upper bound on how long an island waits for its predecessor's migrant.
    ///
    /// `None` blocks indefinitely.
    pub migration_timeout: Option<Duration>,

    /// Evaluate children with rayon (requires the `parallel` feature).
    pub parallel: bool,

    /// Master seed. `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            generations: 100,
            runs: 10,
            offspring: 10,
            total_population: 60,
            islands: 3,
            mutation_rate: 0.03,
            dimensions: 2,
            bounds: Bounds::default(),
            crossover: Crossover::default(),
            replacement: Replacement::default(),
            migration_interval: 1,
            migration_timeout: None,
            parallel: false,
            seed: None,
        }
    }
}

impl IslandConfig {
    /// Reference setup (same as [`Default`]).
    pub fn reference() -> Self {
        Self::default()
    }

    /// Small setup for quick checks: 4 islands of 5, 5 children, 10 generations, 1 run.
    pub fn smoke() -> Self {
        Self {
            generations: 10,
            runs: 1,
            offspring: 5,
            total_population: 20,
            islands: 4,
            ..Self::default()
        }
    }

    /// Per-island capacity (`IMU = MU / ISLANDS`).
    ///
    /// Returns 0 when `islands` is 0; [`validate`](Self::validate) rejects that.
    pub fn island_capacity(&self) -> usize {
        self.total_population.checked_div(self.islands).unwrap_or(0)
    }

    /// Whether generation `generation` (0-based) ends with a migration round.
    pub fn migrates_after(&self, generation: usize) -> bool {
        self.migration_interval > 0 && (generation + 1) % self.migration_interval == 0
    }

    /// Sets the generations per run.
    pub fn with_generations(mut self, n: usize) -> Self {
        self.generations = n;
        self
    }

    /// Sets the number of independent runs.
    pub fn with_runs(mut self, n: usize) -> Self {
        self.runs = n;
        self
    }

    /// Sets the children per generation.
    pub fn with_offspring(mut self, n: usize) -> Self {
        self.offspring = n;
        self
    }

    /// Sets the total population across islands.
    pub fn with_total_population(mut self, n: usize) -> Self {
        self.total_population = n;
        self
    }

    /// Sets the island count.
    pub fn with_islands(mut self, n: usize) -> Self {
        self.islands = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the gene vector length.
    pub fn with_dimensions(mut self, n: usize) -> Self {
        self.dimensions = n;
        self
    }

    /// Sets the per-gene domain.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Sets the crossover policy.
    pub fn with_crossover(mut self, crossover: Crossover) -> Self {
        self.crossover = crossover;
        self
    }

    /// Sets the migrant replacement policy.
    pub fn with_replacement(mut self, replacement: Replacement) -> Self {
        self.replacement = replacement;
        self
    }

    /// Sets the migration interval.
    pub fn with_migration_interval(mut self, n: usize) -> Self {
        self.migration_interval = n;
        self
    }

    /// Sets the migration receive timeout.
    pub fn with_migration_timeout(mut self, timeout: Duration) -> Self {
        self.migration_timeout = Some(timeout);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Island count and divisibility problems are reported as
    /// [`IslandError::TopologyMisconfiguration`]; everything else as
    /// [`IslandError::InvalidConfig`].
    pub fn validate(&self) -> Result<()> {
        if self.islands == 0 {
            return Err(IslandError::TopologyMisconfiguration(
                "islands must be at least 1".into(),
            ));
        }
        if self.total_population % self.islands != 0 {
            return Err(IslandError::TopologyMisconfiguration(format!(
                "total_population {} is not divisible by {} islands",
                self.total_population, self.islands
            )));
        }
        if self.island_capacity() < 2 {
            return Err(IslandError::InvalidConfig(
                "each island must hold at least 2 individuals".into(),
            ));
        }
        if self.generations == 0 {
            return Err(IslandError::InvalidConfig(
                "generations must be at least 1".into(),
            ));
        }
        if self.runs == 0 {
            return Err(IslandError::InvalidConfig("runs must be at least 1".into()));
        }
        if self.offspring == 0 {
            return Err(IslandError::InvalidConfig(
                "offspring must be at least 1".into(),
            ));
        }
        if self.dimensions == 0 {
            return Err(IslandError::InvalidConfig(
                "dimensions must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(IslandError::InvalidConfig(
                "mutation_rate must be within [0, 1]".into(),
            ));
        }
        if !self.bounds.lower.is_finite()
            || !self.bounds.upper.is_finite()
            || self.bounds.lower >= self.bounds.upper
        {
            return Err(IslandError::InvalidConfig(format!(
                "bounds [{}, {}] must be finite with lower < upper",
                self.bounds.lower, self.bounds.upper
            )));
        }
        if self.migration_interval == 0 {
            return Err(IslandError::InvalidConfig(
                "migration_interval must be at least 1".into(),
            ));
        }
        if self.migration_timeout == Some(Duration::ZERO) {
            return Err(IslandError::InvalidConfig(
                "migration_timeout must be positive or None".into(),
            ));
        }
        Ok(())
    }
}
