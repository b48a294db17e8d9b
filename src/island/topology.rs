//! Ring migration topology.
//!
//! Island `i` of `n` sends to `(i + 1) mod n` and receives from
//! `(i + n - 1) mod n`. A single island forms a self-loop. The ring is a pure
//! function of `n`, built once per run and never modified.

use crate::error::{IslandError, IslandId, Result};

/// The two ring neighbors of one island.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Neighbors {
    /// Island that sends migrants here.
    pub predecessor: IslandId,
    /// Island that receives migrants from here.
    pub successor: IslandId,
}

/// A directed ring over islands `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RingTopology {
    islands: usize,
}

impl RingTopology {
    /// Builds the ring for `islands` islands.
    ///
    /// # Errors
    /// [`IslandError::TopologyMisconfiguration`] when `islands` is zero.
    pub fn new(islands: usize) -> Result<Self> {
        if islands == 0 {
            return Err(IslandError::TopologyMisconfiguration(
                "a ring needs at least one island".into(),
            ));
        }
        Ok(Self { islands })
    }

    /// Number of islands on the ring.
    pub fn len(&self) -> usize {
        self.islands
    }

    /// Always false: a ring holds at least one island.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `id` names an island on this ring.
    pub fn contains(&self, id: IslandId) -> bool {
        id < self.islands
    }

    /// Island that `id` sends migrants to.
    ///
    /// # Panics
    /// Panics if `id` is not on the ring.
    pub fn successor_of(&self, id: IslandId) -> IslandId {
        assert!(self.contains(id), "island {id} is not on a ring of {}", self.islands);
        (id + 1) % self.islands
    }

    /// Island that `id` receives migrants from.
    ///
    /// # Panics
    /// Panics if `id` is not on the ring.
    pub fn predecessor_of(&self, id: IslandId) -> IslandId {
        assert!(self.contains(id), "island {id} is not on a ring of {}", self.islands);
        (id + self.islands - 1) % self.islands
    }

    /// Both neighbors of `id`.
    pub fn neighbors(&self, id: IslandId) -> Neighbors {
        Neighbors {
            predecessor: self.predecessor_of(id),
            successor: self.successor_of(id),
        }
    }

    /// Neighbors of every island, indexed by island id.
    pub fn iter(&self) -> impl Iterator<Item = (IslandId, Neighbors)> + '_ {
        (0..self.islands).map(move |id| (id, self.neighbors(id)))
    }
}
