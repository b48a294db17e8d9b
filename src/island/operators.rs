//! Real-vector crossover and mutation.
//!
//! Children are assembled as raw gene vectors, optionally mutated, and only
//! then evaluated into [`Individual`]s. A mutated vector is therefore never
//! paired with the result of its pre-mutation genes.
//!
//! # Crossover Operators
//!
//! - [`Crossover::PositionalDraw`]: even genes from parent 1, odd genes from
//!   parent 2, each read from a uniformly chosen position of that parent
//! - [`Crossover::Uniform`]: each gene copied from either parent by a fair coin
//!
//! # Mutation Operators
//!
//! - [`mutate`]: random resetting of one gene within the bounds

use rand::Rng;

use super::config::{Bounds, IslandConfig};
use super::population::Population;
use super::selection::CumulativeDistribution;
use super::types::Individual;
use crate::objective::Objective;

/// Recombination policy for building one child from two parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Crossover {
    /// Gene `j` comes from parent 1 when `j` is even and parent 2 when odd,
    /// read at a uniformly random position of that parent.
    ///
    /// With two genes this is a fair coin per gene over the donor's genes,
    /// and can swap gene positions as well as mix parents.
    #[default]
    PositionalDraw,

    /// Gene `j` is copied from the same position of parent 1 or parent 2
    /// by a fair coin.
    ///
    /// Reference: Syswerda (1989), "Uniform Crossover in Genetic Algorithms"
    Uniform,
}

impl Crossover {
    /// Builds one child gene vector.
    ///
    /// # Panics
    /// Panics if the parents have different lengths or are empty.
    pub fn recombine<R: Rng>(&self, parent1: &[f64], parent2: &[f64], rng: &mut R) -> Vec<f64> {
        let n = parent1.len();
        assert_eq!(n, parent2.len(), "parents must have equal length");
        assert!(n > 0, "parents must not be empty");

        match self {
            Crossover::PositionalDraw => (0..n)
                .map(|j| {
                    let donor = if j % 2 == 0 { parent1 } else { parent2 };
                    donor[rng.random_range(0..n)]
                })
                .collect(),
            Crossover::Uniform => parent1
                .iter()
                .zip(parent2)
                .map(|(&a, &b)| if rng.random_bool(0.5) { a } else { b })
                .collect(),
        }
    }
}

/// Replaces one uniformly chosen gene with a uniform draw from `bounds`.
///
/// Does not evaluate: the caller must rebuild the [`Individual`].
/// Returns the mutated position, or `None` for an empty vector.
pub fn mutate<R: Rng>(genes: &mut [f64], bounds: Bounds, rng: &mut R) -> Option<usize> {
    if genes.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..genes.len());
    genes[idx] = rng.random_range(bounds.lower..=bounds.upper);
    Some(idx)
}

/// Breeds `config.offspring` children from `population`.
///
/// For each child: two parents drawn from `cdf`, recombined by
/// `config.crossover`, mutated with probability `config.mutation_rate`, then
/// evaluated. Evaluation runs on rayon when `config.parallel` is set and the
/// `parallel` feature is enabled.
pub fn breed<O, R>(
    population: &Population,
    cdf: &CumulativeDistribution,
    config: &IslandConfig,
    objective: &O,
    rng: &mut R,
) -> Vec<Individual>
where
    O: Objective + ?Sized,
    R: Rng,
{
    let genomes: Vec<Vec<f64>> = (0..config.offspring)
        .map(|_| {
            let p1 = &population[cdf.sample(rng)];
            let p2 = &population[cdf.sample(rng)];
            let mut genes = config.crossover.recombine(p1.genes(), p2.genes(), rng);
            if rng.random_range(0.0..1.0) < config.mutation_rate {
                mutate(&mut genes, config.bounds, rng);
            }
            genes
        })
        .collect();

    evaluate_all(genomes, objective, config.parallel)
}

/// Evaluates gene vectors into individuals, preserving order.
#[cfg(feature = "parallel")]
pub(crate) fn evaluate_all<O: Objective + ?Sized>(
    genomes: Vec<Vec<f64>>,
    objective: &O,
    parallel: bool,
) -> Vec<Individual> {
    use rayon::prelude::*;

    if parallel {
        genomes
            .into_par_iter()
            .map(|genes| Individual::evaluate(genes, objective))
            .collect()
    } else {
        genomes
            .into_iter()
            .map(|genes| Individual::evaluate(genes, objective))
            .collect()
    }
}

/// Evaluates gene vectors into individuals, preserving order.
#[cfg(not(feature = "parallel"))]
pub(crate) fn evaluate_all<O: Objective + ?Sized>(
    genomes: Vec<Vec<f64>>,
    objective: &O,
    _parallel: bool,
) -> Vec<Individual> {
    genomes
        .into_iter()
        .map(|genes| Individual::evaluate(genes, objective))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{Rastrigin, Sphere};
    use crate::random::create_rng;

    #[test]
    fn test_positional_draw_takes_genes_from_assigned_parent() {
        let p1 = [1.0, 2.0, 3.0, 4.0];
        let p2 = [-1.0, -2.0, -3.0, -4.0];
        let mut rng = create_rng(42);

        for _ in 0..200 {
            let child = Crossover::PositionalDraw.recombine(&p1, &p2, &mut rng);
            assert_eq!(child.len(), 4);
            for (j, g) in child.iter().enumerate() {
                if j % 2 == 0 {
                    assert!(p1.contains(g), "gene {j} = {g} not from parent 1");
                } else {
                    assert!(p2.contains(g), "gene {j} = {g} not from parent 2");
                }
            }
        }
    }

    #[test]
    fn test_positional_draw_uses_both_positions() {
        let p1 = [1.0, 2.0];
        let p2 = [3.0, 4.0];
        let mut rng = create_rng(3);
        let mut seen = [0u32; 2];
        for _ in 0..1000 {
            let child = Crossover::PositionalDraw.recombine(&p1, &p2, &mut rng);
            seen[if child[0] == 1.0 { 0 } else { 1 }] += 1;
        }
        assert!(seen[0] > 400 && seen[1] > 400, "coin looks biased: {seen:?}");
    }

    #[test]
    fn test_uniform_keeps_positions() {
        let p1 = [1.0, 2.0, 3.0];
        let p2 = [10.0, 20.0, 30.0];
        let mut rng = create_rng(11);
        for _ in 0..100 {
            let child = Crossover::Uniform.recombine(&p1, &p2, &mut rng);
            for j in 0..3 {
                assert!(child[j] == p1[j] || child[j] == p2[j]);
            }
        }
    }

    #[test]
    fn test_identical_parents_give_identical_child() {
        let p = [0.5, -0.5];
        let mut rng = create_rng(5);
        for op in [Crossover::PositionalDraw, Crossover::Uniform] {
            let child = op.recombine(&p, &p, &mut rng);
            assert!(child.iter().all(|g| p.contains(g)));
        }
    }

    #[test]
    #[should_panic(expected = "parents must have equal length")]
    fn test_mismatched_parents_panic() {
        let mut rng = create_rng(1);
        Crossover::Uniform.recombine(&[1.0], &[1.0, 2.0], &mut rng);
    }

    #[test]
    fn test_mutate_changes_exactly_one_gene() {
        let bounds = Bounds::new(100.0, 200.0);
        let mut rng = create_rng(9);
        for _ in 0..100 {
            let mut genes = vec![0.0; 5];
            let idx = mutate(&mut genes, bounds, &mut rng).unwrap();
            for (j, &g) in genes.iter().enumerate() {
                if j == idx {
                    assert!(bounds.contains(g));
                } else {
                    assert_eq!(g, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_mutate_empty() {
        let mut rng = create_rng(9);
        assert_eq!(mutate(&mut [], Bounds::default(), &mut rng), None);
    }

    #[test]
    fn test_breed_produces_evaluated_children() {
        let config = IslandConfig::smoke().with_mutation_rate(1.0);
        let mut rng = create_rng(42);
        let pop = Population::random(5, &config, &Rastrigin, &mut rng);
        let cdf = CumulativeDistribution::uniform(pop.len());

        let children = breed(&pop, &cdf, &config, &Rastrigin, &mut rng);
        assert_eq!(children.len(), config.offspring);
        for child in &children {
            assert_eq!(child.dimensions(), 2);
            assert!((child.result() - Rastrigin.evaluate(child.genes())).abs() < 1e-12);
            assert_eq!(child.fitness(), -child.result());
        }
    }

    #[test]
    fn test_breed_without_mutation_recombines_parent_genes() {
        let config = IslandConfig::smoke().with_mutation_rate(0.0);
        let mut rng = create_rng(8);
        let pop = Population::random(5, &config, &Sphere, &mut rng);
        let cdf = CumulativeDistribution::uniform(pop.len());
        let pool: Vec<f64> = pop.iter().flat_map(|i| i.genes().to_vec()).collect();

        for child in breed(&pop, &cdf, &config, &Sphere, &mut rng) {
            assert!(child.genes().iter().all(|g| pool.contains(g)));
        }
    }
}
