// src/catalog/mod.rs
//! Canonical rider catalog.
//!
//! One `Entity` per canonical name (see `normalize`). Per-event points live in
//! a sparse map; after every merge step the catalog is *rectangular*: every
//! entity carries every event code seen anywhere, unseen pairs holding 0.

pub mod normalize;
pub mod merge;
pub mod aggregate;

use std::collections::{BTreeMap, BTreeSet};

use crate::config::options::MergeDefaults;

pub use merge::{Merger, Observation};
pub use normalize::normalize_name;

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Canonical name; also the catalog key.
    pub name: String,
    /// Team / affiliation.
    pub group: String,
    pub cost: f64,
    /// Rider type ("Kassei", "Sprinter", …).
    pub category: String,
    /// Event code → points. Absent means 0.
    pub scores: BTreeMap<String, f64>,
}

impl Entity {
    /// A first-seen rider carrying the merge defaults and no points yet.
    pub fn new(name: impl Into<String>, defaults: &MergeDefaults) -> Self {
        Self {
            name: name.into(),
            group: defaults.default_group.clone(),
            cost: defaults.default_cost,
            category: defaults.default_category.clone(),
            scores: BTreeMap::new(),
        }
    }

    pub fn score(&self, code: &str) -> f64 {
        self.scores.get(code).copied().unwrap_or(0.0)
    }

    /// Always recomputed from `scores`; never cached.
    pub fn total_score(&self) -> f64 {
        aggregate::total(&self.scores)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    entities: BTreeMap<String, Entity>,
}

impl Catalog {
    pub fn new() -> Self { Self::default() }

    /// Build from finished entities. A later entity with the same name
    /// replaces an earlier one. The result is rectangular.
    pub fn from_entities<I: IntoIterator<Item = Entity>>(entities: I) -> Self {
        let entities = entities.into_iter().map(|e| (e.name.clone(), e)).collect();
        Self { entities }.rectangularize()
    }

    pub fn len(&self) -> usize { self.entities.len() }
    pub fn is_empty(&self) -> bool { self.entities.is_empty() }

    pub fn get(&self, name: &str) -> Option<&Entity> { self.entities.get(name) }
    pub fn contains(&self, name: &str) -> bool { self.entities.contains_key(name) }

    /// Entities in canonical-name order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> { self.entities.values() }

    /// Union of all event codes present in any entity.
    pub fn event_codes(&self) -> BTreeSet<&str> {
        self.iter()
            .flat_map(|e| e.scores.keys().map(String::as_str))
            .collect()
    }

    /// True when every entity has exactly the union of event codes.
    pub fn is_rectangular(&self) -> bool {
        let codes = self.event_codes();
        self.iter().all(|e| e.scores.len() == codes.len())
    }

    pub(crate) fn entry_or_insert(&mut self, name: &str, defaults: &MergeDefaults) -> &mut Entity {
        self.entities
            .entry(s!(name))
            .or_insert_with(|| Entity::new(name, defaults))
    }

    /// Zero-fill every (entity, code) pair that is missing.
    pub(crate) fn rectangularize(mut self) -> Self {
        let codes: Vec<String> = self.event_codes().into_iter().map(String::from).collect();
        for e in self.entities.values_mut() {
            for code in &codes {
                e.scores.entry(code.clone()).or_insert(0.0);
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rider(name: &str, scores: &[(&str, f64)]) -> Entity {
        let mut e = Entity::new(name, &MergeDefaults::default());
        e.scores = scores.iter().map(|(c, p)| (s!(*c), *p)).collect();
        e
    }

    #[test]
    fn from_entities_backfills_missing_codes() {
        let cat = Catalog::from_entities(vec![
            rider("A", &[("OHN", 60.0)]),
            rider("B", &[("RVV", 40.0)]),
        ]);
        assert!(cat.is_rectangular());
        assert_eq!(cat.get("A").unwrap().score("RVV"), 0.0);
        assert!(cat.get("A").unwrap().scores.contains_key("RVV"));
        assert_eq!(cat.event_codes().into_iter().collect::<Vec<_>>(), vec!["OHN", "RVV"]);
    }

    #[test]
    fn from_entities_keeps_one_per_name() {
        let cat = Catalog::from_entities(vec![rider("A", &[("SB", 1.0)]), rider("A", &[("SB", 2.0)])]);
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.get("A").unwrap().score("SB"), 2.0);
    }

    #[test]
    fn absent_score_reads_as_zero() {
        assert_eq!(rider("A", &[]).score("PR"), 0.0);
    }
}
