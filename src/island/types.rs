//! Candidate solutions.
//!
//! An [`Individual`] is a gene vector together with its objective `result`
//! and `fitness = -result`. The only way to build one is through
//! [`Individual::evaluate`], so the cached values always match the genes.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use crate::error::{IslandError, Result};
use crate::objective::Objective;

/// A real-valued candidate solution.
///
/// With the `serde` feature, deserialization rejects records whose fitness
/// is not the negated result.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "StoredIndividual"))]
pub struct Individual {
    genes: Vec<f64>,
    result: f64,
    fitness: f64,
}

/// Serialized form of an [`Individual`], checked before it is accepted.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct StoredIndividual {
    genes: Vec<f64>,
    result: f64,
    fitness: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<StoredIndividual> for Individual {
    type Error = IslandError;

    fn try_from(stored: StoredIndividual) -> Result<Self> {
        let consistent = stored.fitness == -stored.result
            || (stored.fitness.is_nan() && stored.result.is_nan());
        if !consistent {
            return Err(IslandError::StaleFitness {
                result: stored.result,
                fitness: stored.fitness,
            });
        }
        Ok(Self {
            genes: stored.genes,
            result: stored.result,
            fitness: stored.fitness,
        })
    }
}

impl Individual {
    /// Evaluates `genes` and wraps them with their result and fitness.
    pub fn evaluate<O: Objective + ?Sized>(genes: Vec<f64>, objective: &O) -> Self {
        let result = objective.evaluate(&genes);
        Self {
            genes,
            result,
            fitness: -result,
        }
    }

    /// The gene vector.
    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    /// Objective value (lower is better).
    pub fn result(&self) -> f64 {
        self.result
    }

    /// Fitness (higher is better), always `-result`.
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Number of genes.
    pub fn dimensions(&self) -> usize {
        self.genes.len()
    }

    /// Releases the gene vector, dropping the cached evaluation.
    pub fn into_genes(self) -> Vec<f64> {
        self.genes
    }
}

/// Orders two individuals best-first.
///
/// NaN fitness ranks after every number so a broken evaluation can never
/// displace a valid individual.
pub fn descending_fitness(a: &Individual, b: &Individual) -> Ordering {
    match (a.fitness.is_nan(), b.fitness.is_nan()) {
        (false, false) => b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::Sphere;

    #[test]
    fn test_fitness_is_negated_result() {
        let ind = Individual::evaluate(vec![1.0, 2.0], &Sphere);
        assert_eq!(ind.result(), 5.0);
        assert_eq!(ind.fitness(), -5.0);
        assert_eq!(ind.dimensions(), 2);
    }

    #[test]
    fn test_descending_order() {
        let good = Individual::evaluate(vec![0.1], &Sphere);
        let bad = Individual::evaluate(vec![3.0], &Sphere);
        assert_eq!(descending_fitness(&good, &bad), Ordering::Less);
        assert_eq!(descending_fitness(&bad, &good), Ordering::Greater);
        assert_eq!(descending_fitness(&good, &good), Ordering::Equal);
    }

    #[test]
    fn test_nan_ranks_last() {
        let nan = Individual::evaluate(vec![0.0], &|_: &[f64]| f64::NAN);
        let bad = Individual::evaluate(vec![1e6], &Sphere);
        assert_eq!(descending_fitness(&bad, &nan), Ordering::Less);
        assert_eq!(descending_fitness(&nan, &bad), Ordering::Greater);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_keeps_evaluation() {
        let ind = Individual::evaluate(vec![3.0, 4.0], &Sphere);
        let json = serde_json::to_string(&ind).unwrap();
        let back: Individual = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ind);
        assert_eq!(back.fitness(), -back.result());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_rejects_stale_fitness() {
        let json = r#"{"genes":[3.0,4.0],"result":0.0,"fitness":99.0}"#;
        let err = serde_json::from_str::<Individual>(json).unwrap_err();
        assert!(err.to_string().contains("stale individual"), "{err}");
    }
}
