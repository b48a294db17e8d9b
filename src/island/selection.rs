//! Fitness-proportional (roulette wheel) parent selection.
//!
//! [`CumulativeDistribution`] holds the normalized selection weight of every
//! member and their running sums. Weights are only valid for the population
//! state they were built from; the runtime rebuilds the distribution at the
//! start of every generation.
//!
//! # Boundary handling
//!
//! A draw `r ∈ [0, 1)` maps to the first index `i` with `cdf[i] >= r`, so
//! index 0 owns `[0, cdf[0]]` and can be selected like any other member.
//! When rounding leaves the last partial sum below `r`, the draw clamps to
//! the last index instead of running off the end.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and
//!   Machine Learning*, ch. 1
//! - Baker (1987), "Reducing Bias and Inefficiency in the Selection Algorithm"

use rand::Rng;

use super::population::Population;
use super::types::Individual;
use crate::error::{IslandError, Result};

/// Normalized selection weights and their cumulative sums.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeDistribution {
    weights: Vec<f64>,
    cumulative: Vec<f64>,
}

impl CumulativeDistribution {
    /// Builds the distribution `weight_i = fitness_i / Σ fitness`.
    ///
    /// # Errors
    /// [`IslandError::DegenerateDistribution`] when the population is empty,
    /// its total fitness is zero, negative, or non-finite, or any single
    /// member has negative fitness (its weight would be negative).
    pub fn build(population: &Population) -> Result<Self> {
        Self::from_fitness(population.iter().map(Individual::fitness))
    }

    /// Builds the distribution from raw fitness values in population order.
    pub fn from_fitness<I>(fitness: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let fitness: Vec<f64> = fitness.into_iter().collect();
        let total: f64 = fitness.iter().sum();

        if fitness.is_empty()
            || !total.is_finite()
            || total <= 0.0
            || fitness.iter().any(|&f| f < 0.0)
        {
            return Err(IslandError::DegenerateDistribution {
                total_fitness: total,
            });
        }

        let weights: Vec<f64> = fitness.iter().map(|f| f / total).collect();
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut sum = 0.0;
        for &w in &weights {
            sum += w;
            cumulative.push(sum);
        }

        Ok(Self {
            weights,
            cumulative,
        })
    }

    /// Equal weight `1/n` for every member.
    ///
    /// Fallback when [`build`](Self::build) reports a degenerate population.
    ///
    /// # Panics
    /// Panics if `n` is zero.
    pub fn uniform(n: usize) -> Self {
        assert!(n > 0, "cannot build a distribution over zero members");
        let w = 1.0 / n as f64;
        Self {
            weights: vec![w; n],
            cumulative: (1..=n).map(|i| i as f64 / n as f64).collect(),
        }
    }

    /// Builds the fitness-proportional distribution, falling back to uniform.
    ///
    /// Returns whether the fallback was taken.
    pub fn build_or_uniform(population: &Population) -> (Self, bool) {
        match Self::build(population) {
            Ok(cdf) => (cdf, false),
            Err(err) => {
                tracing::debug!(
                    members = population.len(),
                    error = %err,
                    "falling back to uniform parent selection"
                );
                (Self::uniform(population.len()), true)
            }
        }
    }

    /// Number of members covered.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Whether the distribution covers no members.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    /// Per-member selection weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Running sums of the weights.
    pub fn cumulative(&self) -> &[f64] {
        &self.cumulative
    }

    /// Maps a draw `r` to a member index.
    ///
    /// Returns the first `i` with `cdf[i] >= r`, clamped to the last index.
    pub fn index_for(&self, r: f64) -> usize {
        let i = self.cumulative.partition_point(|&c| c < r);
        i.min(self.cumulative.len().saturating_sub(1))
    }

    /// Draws one member index.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        self.index_for(rng.random::<f64>())
    }

    /// Draws `n` member indices independently.
    pub fn select_parents<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<usize> {
        (0..n).map(|_| self.sample(rng)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    fn cdf(fitness: &[f64]) -> CumulativeDistribution {
        CumulativeDistribution::from_fitness(fitness.iter().copied()).unwrap()
    }

    #[test]
    fn test_normalized_and_monotone() {
        let d = cdf(&[1.0, 3.0, 4.0, 2.0]);
        assert_eq!(d.weights(), &[0.1, 0.3, 0.4, 0.2]);
        assert!(d.cumulative().windows(2).all(|w| w[0] <= w[1]));
        assert!((d.cumulative()[3] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_totals() {
        for fitness in [
            vec![0.0, 0.0],
            vec![-1.0, -2.0],
            vec![1.0, f64::INFINITY],
            vec![1.0, f64::NAN],
            vec![],
        ] {
            assert!(
                matches!(
                    CumulativeDistribution::from_fitness(fitness.clone()),
                    Err(IslandError::DegenerateDistribution { .. })
                ),
                "accepted {fitness:?}"
            );
        }
    }

    #[test]
    fn test_equal_positive_fitness_is_uniform() {
        let d = cdf(&[2.5; 4]);
        assert_eq!(d.weights(), &[0.25; 4]);
        assert_eq!(d.cumulative(), &[0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn test_index_for_boundaries() {
        let d = cdf(&[1.0, 1.0, 2.0]);
        // cdf = [0.25, 0.5, 1.0]
        assert_eq!(d.index_for(0.0), 0);
        assert_eq!(d.index_for(0.25), 0);
        assert_eq!(d.index_for(0.2500001), 1);
        assert_eq!(d.index_for(0.5), 1);
        assert_eq!(d.index_for(0.75), 2);
        assert_eq!(d.index_for(1.0 - f64::EPSILON), 2);
    }

    #[test]
    fn test_index_for_clamps_past_end() {
        // Rounding can leave the last partial sum short of 1.
        let d = CumulativeDistribution {
            weights: vec![0.5, 0.4999],
            cumulative: vec![0.5, 0.9999],
        };
        assert_eq!(d.index_for(0.99995), 1);
        assert_eq!(d.index_for(2.0), 1);
    }

    #[test]
    fn test_negative_member_is_degenerate() {
        let err = CumulativeDistribution::from_fitness([3.0, -1.0, 2.0]).unwrap_err();
        assert_eq!(err, IslandError::DegenerateDistribution { total_fitness: 4.0 });
    }

    #[test]
    fn test_first_member_is_selectable() {
        let d = cdf(&[8.0, 1.0, 1.0]);
        let mut rng = create_rng(42);
        let picks = d.select_parents(10_000, &mut rng);
        let zero = picks.iter().filter(|&&i| i == 0).count();
        assert!(zero > 7_000, "index 0 picked {zero}/10000");
    }

    #[test]
    fn test_sampling_tracks_weights() {
        let d = cdf(&[1.0, 2.0, 7.0]);
        let mut rng = create_rng(7);
        let mut counts = [0u32; 3];
        let n = 20_000;
        for _ in 0..n {
            counts[d.sample(&mut rng)] += 1;
        }
        for (i, &w) in d.weights().iter().enumerate() {
            let observed = counts[i] as f64 / n as f64;
            assert!(
                (observed - w).abs() < 0.02,
                "index {i}: observed {observed}, expected {w}"
            );
        }
    }

    #[test]
    fn test_uniform_fallback() {
        let d = CumulativeDistribution::uniform(4);
        assert_eq!(d.len(), 4);
        assert_eq!(d.cumulative(), &[0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    #[should_panic(expected = "cannot build a distribution over zero members")]
    fn test_uniform_empty_panics() {
        CumulativeDistribution::uniform(0);
    }
}
