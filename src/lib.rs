//! Island-model evolutionary optimization.
//!
//! Provides a distributed genetic algorithm in which independent
//! subpopulations evolve in parallel and exchange migrants over a ring:
//!
//! - **Island model**: per-island roulette-wheel selection, crossover,
//!   mutation, and elitist truncation, one thread per island.
//! - **Ring migration**: blocking point-to-point exchange of each island's
//!   best individual with its ring neighbors over bounded channels.
//! - **Objectives**: any function over fixed-length real vectors, plus the
//!   Rastrigin and Sphere benchmarks.
//!
//! # Architecture
//!
//! Islands own their populations exclusively and reference neighbors only by
//! id; the single gene vector sent during migration is the only data that
//! crosses threads. The crate installs no `tracing` subscriber: progress
//! events are emitted and left to the application to collect.
//!
//! # Example
//!
//! ```
//! use u_archipelago::island::{Archipelago, IslandConfig, NullReporter};
//! use u_archipelago::objective::Rastrigin;
//!
//! let config = IslandConfig::smoke().with_seed(1);
//! let result = Archipelago::run_with_reporter(&Rastrigin, &config, &NullReporter)?;
//! assert_eq!(result.runs[0].islands.len(), 4);
//! # Ok::<(), u_archipelago::IslandError>(())
//! ```

pub mod error;
pub mod island;
pub mod objective;
pub mod random;

pub use error::{IslandError, IslandId, Result};
