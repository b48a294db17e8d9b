//! Error types for the island model.
//!
//! Configuration and transport failures are fatal to a run. Algorithmic
//! edge cases (degenerate selection distributions, roulette boundary draws)
//! are recovered locally by the runtime, so [`IslandError::DegenerateDistribution`]
//! only escapes from the low-level [`CumulativeDistribution::build`] call.
//!
//! [`CumulativeDistribution::build`]: crate::island::CumulativeDistribution::build

use thiserror::Error;

/// Identifier of an island within a run, in `0..islands`.
pub type IslandId = usize;

/// Errors produced by the island model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IslandError {
    /// Total fitness is zero, negative, or non-finite, so fitness-proportional
    /// weights are undefined.
    #[error("degenerate selection distribution: total fitness {total_fitness}")]
    DegenerateDistribution { total_fitness: f64 },

    /// The island count or ring wiring is unusable.
    #[error("topology misconfiguration: {0}")]
    TopologyMisconfiguration(String),

    /// A configuration parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A migration send or receive failed.
    #[error("transport failure on island {island} with peer {peer}: {reason}")]
    Transport {
        island: IslandId,
        peer: IslandId,
        reason: String,
    },

    /// A gene vector has the wrong length.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A gene is NaN or infinite.
    #[error("non-finite gene {value} at position {index}")]
    NonFiniteGene { index: usize, value: f64 },

    /// A stored individual's fitness is not the negated result.
    #[error("stale individual: fitness {fitness} does not match result {result}")]
    StaleFitness { result: f64, fitness: f64 },

    /// An island worker thread panicked.
    #[error("island {island} worker panicked")]
    WorkerPanicked { island: IslandId },
}

/// Result alias for island model operations.
pub type Result<T> = std::result::Result<T, IslandError>;

impl IslandError {
    /// Whether this error ends the current run.
    ///
    /// A degenerate distribution falls back to uniform selection, and an
    /// unusable migrant only costs one migration round. Everything else is
    /// fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            IslandError::DegenerateDistribution { .. }
                | IslandError::DimensionMismatch { .. }
                | IslandError::NonFiniteGene { .. }
        )
    }
}
