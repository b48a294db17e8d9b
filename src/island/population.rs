//! Island populations and their initialization.
//!
//! A [`Population`] is the ordered set of individuals owned by one island.
//! Its capacity (`IMU`) is fixed for the whole run: it may be exceeded
//! transiently while children are merged, never after a generation ends.

use rand::Rng;

use super::config::{Bounds, IslandConfig};
use super::types::{descending_fitness, Individual};
use crate::error::{IslandError, Result};
use crate::objective::Objective;

/// Ordered individuals of one island with a fixed capacity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    members: Vec<Individual>,
    capacity: usize,
}

impl Population {
    /// Generates `capacity` evaluated individuals with uniform genes.
    pub fn random<O, R>(capacity: usize, config: &IslandConfig, objective: &O, rng: &mut R) -> Self
    where
        O: Objective + ?Sized,
        R: Rng,
    {
        Self {
            members: initial_population(capacity, config.dimensions, config.bounds, objective, rng),
            capacity,
        }
    }

    /// Wraps existing members. Capacity is the member count.
    pub fn from_members(members: Vec<Individual>) -> Self {
        let capacity = members.len();
        Self { members, capacity }
    }

    /// Number of individuals currently held.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the population holds no individuals.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Fixed island capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Individual at `index`.
    pub fn get(&self, index: usize) -> Option<&Individual> {
        self.members.get(index)
    }

    /// Individuals in population order.
    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.members.iter()
    }

    /// Members as a slice.
    pub fn as_slice(&self) -> &[Individual] {
        &self.members
    }

    /// The highest-fitness individual, first one on ties.
    pub fn best(&self) -> Option<&Individual> {
        self.members.iter().reduce(|best, ind| {
            if descending_fitness(ind, best).is_lt() {
                ind
            } else {
                best
            }
        })
    }

    /// Index of the highest-fitness individual, first one on ties.
    pub fn best_index(&self) -> Option<usize> {
        (0..self.members.len()).reduce(|best, i| {
            if descending_fitness(&self.members[i], &self.members[best]).is_lt() {
                i
            } else {
                best
            }
        })
    }

    /// Index of the lowest-fitness individual, last one on ties.
    pub fn worst_index(&self) -> Option<usize> {
        (0..self.members.len()).reduce(|worst, i| {
            if descending_fitness(&self.members[i], &self.members[worst]).is_lt() {
                worst
            } else {
                i
            }
        })
    }

    /// Sum of member fitness.
    pub fn total_fitness(&self) -> f64 {
        self.members.iter().map(Individual::fitness).sum()
    }

    /// Mean member fitness, `None` when empty.
    pub fn mean_fitness(&self) -> Option<f64> {
        if self.members.is_empty() {
            None
        } else {
            Some(self.total_fitness() / self.members.len() as f64)
        }
    }

    /// Stable sort, best first.
    pub fn sort_descending(&mut self) {
        self.members.sort_by(descending_fitness);
    }

    /// Whether members are ordered best first.
    pub fn is_sorted_descending(&self) -> bool {
        self.members
            .windows(2)
            .all(|w| descending_fitness(&w[0], &w[1]).is_le())
    }

    /// Overwrites the individual at `index`, returning the one removed.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn replace(&mut self, index: usize, individual: Individual) -> Individual {
        std::mem::replace(&mut self.members[index], individual)
    }

    pub(crate) fn extend(&mut self, children: Vec<Individual>) {
        self.members.extend(children);
    }

    pub(crate) fn truncate_to_capacity(&mut self) {
        self.members.truncate(self.capacity);
    }

    /// Consumes the population, returning its members.
    pub fn into_members(self) -> Vec<Individual> {
        self.members
    }
}

impl std::ops::Index<usize> for Population {
    type Output = Individual;

    fn index(&self, index: usize) -> &Individual {
        &self.members[index]
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Draws `dimensions` genes uniformly from `bounds`.
pub fn random_genes<R: Rng>(dimensions: usize, bounds: Bounds, rng: &mut R) -> Vec<f64> {
    (0..dimensions)
        .map(|_| rng.random_range(bounds.lower..=bounds.upper))
        .collect()
}

/// Generates `size` individuals with uniform genes, each evaluated immediately.
pub fn initial_population<O, R>(
    size: usize,
    dimensions: usize,
    bounds: Bounds,
    objective: &O,
    rng: &mut R,
) -> Vec<Individual>
where
    O: Objective + ?Sized,
    R: Rng,
{
    (0..size)
        .map(|_| Individual::evaluate(random_genes(dimensions, bounds, rng), objective))
        .collect()
}

/// Splits a global population into `islands` contiguous, equally sized chunks.
///
/// # Errors
/// [`IslandError::TopologyMisconfiguration`] when `islands` is zero or does
/// not divide the population size.
pub fn partition(global: Vec<Individual>, islands: usize) -> Result<Vec<Population>> {
    if islands == 0 {
        return Err(IslandError::TopologyMisconfiguration(
            "cannot partition into zero islands".into(),
        ));
    }
    if global.len() % islands != 0 {
        return Err(IslandError::TopologyMisconfiguration(format!(
            "population of {} does not split evenly into {} islands",
            global.len(),
            islands
        )));
    }

    let capacity = global.len() / islands;
    let mut chunks = Vec::with_capacity(islands);
    let mut rest = global.into_iter();
    for _ in 0..islands {
        let members: Vec<Individual> = rest.by_ref().take(capacity).collect();
        chunks.push(Population { members, capacity });
    }
    Ok(chunks)
}
