//! Truncation survivor selection.
//!
//! Children are merged into the island population and only the best
//! `capacity` individuals survive. The incumbent best is never displaced by a
//! weaker child, so an island's best fitness is monotonically non-decreasing.

use super::population::Population;
use super::types::Individual;

/// Merges `children` into `population`, sorts best first, truncates to capacity.
///
/// The sort is stable: among equal fitness, incumbents stay ahead of children
/// and keep their relative order.
pub fn select_survivors(population: &mut Population, children: Vec<Individual>) {
    population.extend(children);
    population.sort_descending();
    population.truncate_to_capacity();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::Sphere;

    fn ind(x: f64) -> Individual {
        Individual::evaluate(vec![x], &Sphere)
    }

    fn genes(pop: &Population) -> Vec<f64> {
        pop.iter().map(|i| i.genes()[0]).collect()
    }

    #[test]
    fn test_keeps_best_at_capacity() {
        let mut pop = Population::from_members(vec![ind(3.0), ind(1.0), ind(2.0)]);
        select_survivors(&mut pop, vec![ind(0.5), ind(4.0)]);

        assert_eq!(pop.len(), 3);
        assert_eq!(genes(&pop), vec![0.5, 1.0, 2.0]);
        assert!(pop.is_sorted_descending());
    }

    #[test]
    fn test_weak_children_are_discarded() {
        let mut pop = Population::from_members(vec![ind(0.1), ind(0.2)]);
        select_survivors(&mut pop, vec![ind(5.0), ind(6.0), ind(7.0)]);
        assert_eq!(genes(&pop), vec![0.1, 0.2]);
    }

    #[test]
    fn test_ties_keep_incumbents_first() {
        let mut pop = Population::from_members(vec![ind(1.0), ind(2.0)]);
        // -1.0 ties with the incumbent 1.0 and must not displace it.
        select_survivors(&mut pop, vec![ind(-1.0)]);
        assert_eq!(genes(&pop), vec![1.0, -1.0]);
    }

    #[test]
    fn test_best_never_decreases() {
        let mut pop = Population::from_members(vec![ind(0.3), ind(2.0), ind(1.5)]);
        let before = pop.best().unwrap().fitness();
        select_survivors(&mut pop, vec![ind(3.0), ind(4.0), ind(0.4)]);
        assert!(pop[0].fitness() >= before);
    }

    #[test]
    fn test_no_children() {
        let mut pop = Population::from_members(vec![ind(2.0), ind(1.0)]);
        select_survivors(&mut pop, vec![]);
        assert_eq!(genes(&pop), vec![1.0, 2.0]);
    }
}
