//! Objective functions evaluated by the island model.
//!
//! An [`Objective`] maps a gene vector to a scalar `result`; lower is better.
//! The island model derives `fitness = -result` itself, so objectives stay
//! plain minimization functions.
//!
//! # Benchmarks
//!
//! - [`Rastrigin`]: highly multimodal, global minimum 0 at the origin
//! - [`Sphere`]: unimodal, global minimum 0 at the origin
//!
//! # References
//!
//! - Rastrigin (1974), *Systems of Extremal Control*
//! - Mühlenbein, Schomisch & Born (1991), "The Parallel Genetic Algorithm
//!   as Function Optimizer"

use std::f64::consts::PI;

/// A minimization objective over fixed-length real vectors.
///
/// Implementations must be pure: the same genes always give the same result.
/// `Send + Sync` is required because every island thread shares one objective.
///
/// Closures implement this trait directly:
///
/// ```
/// use u_archipelago::objective::Objective;
///
/// let abs_sum = |genes: &[f64]| genes.iter().map(|x| x.abs()).sum::<f64>();
/// assert_eq!(abs_sum.evaluate(&[1.0, -2.0]), 3.0);
/// ```
pub trait Objective: Send + Sync {
    /// Returns the objective value for `genes`.
    fn evaluate(&self, genes: &[f64]) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, genes: &[f64]) -> f64 {
        self(genes)
    }
}

/// Rastrigin function: `10·n + Σ (x_i² − 10·cos(2π·x_i))`.
///
/// Conventional domain is `[-5.12, 5.12]` per gene.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rastrigin;

impl Objective for Rastrigin {
    fn evaluate(&self, genes: &[f64]) -> f64 {
        let n = genes.len() as f64;
        10.0 * n
            + genes
                .iter()
                .map(|&x| x * x - 10.0 * (2.0 * PI * x).cos())
                .sum::<f64>()
    }
}

/// Sphere function: `Σ x_i²`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sphere;

impl Objective for Sphere {
    fn evaluate(&self, genes: &[f64]) -> f64 {
        genes.iter().map(|x| x * x).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rastrigin_global_minimum() {
        assert!(Rastrigin.evaluate(&[0.0, 0.0]).abs() < 1e-12);
    }

    #[test]
    fn test_rastrigin_integer_lattice() {
        // cos(2πk) = 1, so each integer coordinate contributes k².
        let r = Rastrigin.evaluate(&[1.0, -2.0]);
        assert!((r - 5.0).abs() < 1e-9, "got {r}");
    }

    #[test]
    fn test_rastrigin_non_negative_on_domain() {
        for i in -10..=10 {
            let x = i as f64 * 0.512;
            assert!(Rastrigin.evaluate(&[x, -x]) >= -1e-12);
        }
    }

    #[test]
    fn test_sphere() {
        assert_eq!(Sphere.evaluate(&[3.0, 4.0]), 25.0);
    }

    #[test]
    fn test_closure_objective() {
        let shifted = |g: &[f64]| g[0] - 1.0;
        assert_eq!(shifted.evaluate(&[4.0]), 3.0);
    }
}
