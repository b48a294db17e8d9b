//! Migration between ring-adjacent islands.
//!
//! Each migration round, every island sends a copy of its best gene vector
//! to its successor and installs the vector received from its predecessor.
//! Islands address each other only by [`IslandId`]; a [`Transport`] resolves
//! those ids to concrete endpoints.
//!
//! # Blocking exchange
//!
//! [`ChannelTransport::ring`] wires one bounded channel of capacity 1 per
//! ring edge. `send` blocks until the successor has drained the previous
//! round's migrant and `receive` blocks until the predecessor's migrant
//! arrives, so neighbors drift at most one round apart. Because an island
//! only sends round `g` after receiving round `g - 1`, the send-then-receive
//! order cannot deadlock on any ring size, the one-island self-loop included.
//!
//! # Replacement
//!
//! The received vector is re-evaluated on arrival, then overwrites a slot
//! chosen by [`Replacement`]. Population size never changes.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use rand::Rng;

use super::config::IslandConfig;
use super::runner::Island;
use super::topology::{Neighbors, RingTopology};
use super::types::Individual;
use crate::error::{IslandError, IslandId, Result};
use crate::objective::Objective;

/// Payload crossing from one island to its successor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Migrant {
    /// Sending island.
    pub source: IslandId,
    /// Sender's generation (0-based) at the time of sending.
    pub generation: usize,
    /// Raw genes. Not an [`Individual`] until re-evaluated.
    pub genes: Vec<f64>,
}

/// Point-to-point migrant exchange.
///
/// Both operations block until complete. Implementations must deliver
/// exactly once and in order between any two endpoints.
pub trait Transport: Send {
    /// Sends `migrant` to island `destination`.
    fn send(&mut self, destination: IslandId, migrant: Migrant) -> Result<()>;

    /// Receives the next migrant from island `source`.
    fn receive(&mut self, source: IslandId) -> Result<Migrant>;
}

/// Which slot an arriving migrant overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Replacement {
    /// The lowest-fitness individual (the last one on ties).
    #[default]
    Worst,
    /// A uniformly random individual other than the current best.
    Random,
}

impl Replacement {
    /// Picks the slot to overwrite.
    ///
    /// Neither policy touches the best individual when the population has
    /// more than one member, so the island's best survives every migration.
    pub fn slot<R: Rng>(&self, island: &Island, rng: &mut R) -> usize {
        let population = island.population();
        match self {
            Replacement::Worst => population.worst_index().unwrap_or(0),
            Replacement::Random => {
                let best = population.best_index().unwrap_or(0);
                if population.len() > 1 {
                    let pick = rng.random_range(0..population.len() - 1);
                    if pick >= best {
                        pick + 1
                    } else {
                        pick
                    }
                } else {
                    0
                }
            }
        }
    }
}

/// Outcome of one migration round on one island.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// The migrant was evaluated and installed.
    Installed {
        /// Island the migrant came from.
        source: IslandId,
        /// Slot it overwrote (before re-sorting).
        slot: usize,
        /// Its fitness after evaluation.
        fitness: f64,
    },
    /// The migrant was unusable and the round was skipped.
    Skipped {
        /// Island the migrant came from.
        source: IslandId,
        /// Why it was rejected. Always a recoverable error.
        reason: IslandError,
    },
}

/// Factory for in-process ring transports.
pub struct ChannelTransport;

impl ChannelTransport {
    /// Builds one endpoint per island, indexed by island id.
    ///
    /// Endpoint `i` owns the sender towards `successor_of(i)` and the receiver
    /// from `predecessor_of(i)`. `timeout` bounds how long either operation
    /// may block.
    pub fn ring(topology: &RingTopology, timeout: Option<Duration>) -> Vec<RingEndpoint> {
        let n = topology.len();
        // Edge i carries migrants from island i to its successor.
        let (senders, receivers): (Vec<Sender<Migrant>>, Vec<Receiver<Migrant>>) =
            (0..n).map(|_| bounded(1)).unzip();
        let mut inboxes: Vec<Option<Receiver<Migrant>>> = receivers.into_iter().map(Some).collect();

        senders
            .into_iter()
            .enumerate()
            .map(|(id, outbox)| {
                let neighbors = topology.neighbors(id);
                let inbox = inboxes[neighbors.predecessor]
                    .take()
                    .expect("every ring edge has exactly one receiving island");
                RingEndpoint {
                    island: id,
                    neighbors,
                    outbox,
                    inbox,
                    timeout,
                }
            })
            .collect()
    }
}

/// One island's view of the ring: an outbox to its successor and an inbox
/// from its predecessor.
#[derive(Debug)]
pub struct RingEndpoint {
    island: IslandId,
    neighbors: Neighbors,
    outbox: Sender<Migrant>,
    inbox: Receiver<Migrant>,
    timeout: Option<Duration>,
}

impl RingEndpoint {
    /// Owning island.
    pub fn island(&self) -> IslandId {
        self.island
    }

    /// Ring neighbors this endpoint is wired to.
    pub fn neighbors(&self) -> Neighbors {
        self.neighbors
    }

    fn failure(&self, peer: IslandId, reason: impl Into<String>) -> IslandError {
        IslandError::Transport {
            island: self.island,
            peer,
            reason: reason.into(),
        }
    }
}

impl Transport for RingEndpoint {
    fn send(&mut self, destination: IslandId, migrant: Migrant) -> Result<()> {
        if destination != self.neighbors.successor {
            return Err(IslandError::TopologyMisconfiguration(format!(
                "island {} cannot send to {destination}: successor is {}",
                self.island, self.neighbors.successor
            )));
        }
        match self.timeout {
            None => self
                .outbox
                .send(migrant)
                .map_err(|_| self.failure(destination, "successor disconnected")),
            Some(timeout) => self.outbox.send_timeout(migrant, timeout).map_err(|e| match e {
                SendTimeoutError::Timeout(_) => {
                    self.failure(destination, format!("send timed out after {timeout:?}"))
                }
                SendTimeoutError::Disconnected(_) => {
                    self.failure(destination, "successor disconnected")
                }
            }),
        }
    }

    fn receive(&mut self, source: IslandId) -> Result<Migrant> {
        if source != self.neighbors.predecessor {
            return Err(IslandError::TopologyMisconfiguration(format!(
                "island {} cannot receive from {source}: predecessor is {}",
                self.island, self.neighbors.predecessor
            )));
        }
        let migrant = match self.timeout {
            None => self
                .inbox
                .recv()
                .map_err(|_| self.failure(source, "predecessor disconnected"))?,
            Some(timeout) => self.inbox.recv_timeout(timeout).map_err(|e| match e {
                RecvTimeoutError::Timeout => {
                    self.failure(source, format!("receive timed out after {timeout:?}"))
                }
                RecvTimeoutError::Disconnected => self.failure(source, "predecessor disconnected"),
            })?,
        };
        if migrant.source != source {
            return Err(self.failure(
                source,
                format!("migrant claims to come from island {}", migrant.source),
            ));
        }
        Ok(migrant)
    }
}

/// Checks that a received vector can become an individual.
fn validate(genes: &[f64], dimensions: usize) -> Result<()> {
    if genes.len() != dimensions {
        return Err(IslandError::DimensionMismatch {
            expected: dimensions,
            actual: genes.len(),
        });
    }
    match genes.iter().position(|g| !g.is_finite()) {
        Some(index) => Err(IslandError::NonFiniteGene {
            index,
            value: genes[index],
        }),
        None => Ok(()),
    }
}

/// Runs one migration round for `island`.
///
/// Sends the island's best genes to its successor, receives from its
/// predecessor, evaluates the arrival and installs it per
/// `config.replacement`, then re-sorts the population best first.
///
/// # Errors
/// Transport failures are returned unchanged and end the run. An unusable
/// migrant (wrong length, non-finite genes) is not an error: the round is
/// skipped and logged.
pub fn exchange<T, O, R>(
    island: &mut Island,
    transport: &mut T,
    generation: usize,
    config: &IslandConfig,
    objective: &O,
    rng: &mut R,
) -> Result<MigrationOutcome>
where
    T: Transport + ?Sized,
    O: Objective + ?Sized,
    R: Rng,
{
    let neighbors = island.neighbors();
    let emigrant = island
        .population()
        .best()
        .map(|best| best.genes().to_vec())
        .ok_or_else(|| IslandError::InvalidConfig(format!("island {} is empty", island.id())))?;

    transport.send(
        neighbors.successor,
        Migrant {
            source: island.id(),
            generation,
            genes: emigrant,
        },
    )?;
    let migrant = transport.receive(neighbors.predecessor)?;

    if let Err(reason) = validate(&migrant.genes, config.dimensions) {
        tracing::warn!(
            island = island.id(),
            source = migrant.source,
            generation,
            %reason,
            "skipping migration round"
        );
        return Ok(MigrationOutcome::Skipped {
            source: migrant.source,
            reason,
        });
    }

    let arrival = Individual::evaluate(migrant.genes, objective);
    let fitness = arrival.fitness();
    let slot = config.replacement.slot(island, rng);
    island.install(slot, arrival);

    tracing::debug!(
        island = island.id(),
        source = migrant.source,
        generation,
        slot,
        fitness,
        "installed migrant"
    );

    Ok(MigrationOutcome::Installed {
        source: migrant.source,
        slot,
        fitness,
    })
}
