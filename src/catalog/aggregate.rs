// src/catalog/aggregate.rs
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{Catalog, Entity};

/// Total projected score: plain sum over the event points, in code order.
pub fn total(scores: &BTreeMap<String, f64>) -> f64 {
    scores.values().sum()
}

/// An entity next to its freshly computed total. Borrows the catalog, so the
/// catalog cannot change while a ranking is alive.
#[derive(Clone, Copy, Debug)]
pub struct Ranked<'a> {
    pub entity: &'a Entity,
    pub total: f64,
}

/// All entities, best total first; ties by name.
pub fn rank(catalog: &Catalog) -> Vec<Ranked<'_>> {
    let mut out: Vec<Ranked<'_>> = catalog
        .iter()
        .map(|entity| Ranked { entity, total: entity.total_score() })
        .collect();
    out.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.entity.name.cmp(&b.entity.name))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::MergeDefaults;

    fn rider(name: &str, pts: &[(&str, f64)]) -> Entity {
        let mut e = Entity::new(name, &MergeDefaults::default());
        e.scores = pts.iter().map(|(c, p)| (s!(*c), *p)).collect();
        e
    }

    #[test]
    fn total_is_sum_and_idempotent() {
        let e = rider("X", &[("A", 60.0), ("B", 0.0), ("C", 40.0)]);
        assert_eq!(total(&e.scores), 100.0);
        assert_eq!(e.total_score(), 100.0);
        assert_eq!(e.total_score(), 100.0);
    }

    #[test]
    fn empty_mapping_totals_zero() {
        assert_eq!(total(&BTreeMap::new()), 0.0);
    }

    #[test]
    fn rank_orders_by_total_then_name() {
        let cat = Catalog::from_entities(vec![
            rider("B", &[("A", 10.0)]),
            rider("A", &[("A", 10.0)]),
            rider("C", &[("A", 50.0)]),
        ]);
        let names: Vec<&str> = rank(&cat).iter().map(|r| r.entity.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }
}
