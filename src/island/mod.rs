//! Island-model genetic algorithm.
//!
//! Independent subpopulations ("islands") evolve in parallel, one thread
//! each, and periodically pass their best individual to the next island on
//! a ring. Each island runs a fitness-proportional GA with elitist
//! truncation; migration is the only point where islands interact.
//!
//! # Generation
//!
//! 1. [`CumulativeDistribution`]: roulette-wheel weights over the population
//! 2. [`breed`]: `offspring` children by crossover and mutation
//! 3. [`select_survivors`]: merge children, keep the best `capacity`
//! 4. [`exchange`]: send best to successor, install migrant from predecessor
//!
//! # Key Types
//!
//! - [`IslandConfig`]: run parameters (islands, population, rates, policies)
//! - [`Archipelago`]: runs all islands for all runs
//! - [`IslandRunner`]: the per-island generation loop
//! - [`RingTopology`], [`Transport`]: who exchanges with whom, and how
//!
//! # References
//!
//! - Whitley, Rana & Heckendorn (1999), "The Island Model Genetic Algorithm:
//!   On Separability, Population Size and Convergence"
//! - Cantú-Paz (2000), *Efficient and Accurate Parallel Genetic Algorithms*

mod config;
mod migration;
mod operators;
mod population;
mod report;
mod runner;
mod selection;
mod survivors;
mod topology;
mod types;

pub use config::{Bounds, IslandConfig};
pub use migration::{
    exchange, ChannelTransport, Migrant, MigrationOutcome, Replacement, RingEndpoint, Transport,
};
pub use operators::{breed, mutate, Crossover};
pub use population::{initial_population, partition, random_genes, Population};
pub use report::{GenerationReport, MemoryReporter, NullReporter, Reporter, TracingReporter};
pub use runner::{
    Archipelago, ArchipelagoResult, GenerationStats, Island, IslandResult, IslandRunner,
    RunContext, RunResult, RunSummary,
};
pub use selection::CumulativeDistribution;
pub use survivors::select_survivors;
pub use topology::{Neighbors, RingTopology};
pub use types::{descending_fitness, Individual};
