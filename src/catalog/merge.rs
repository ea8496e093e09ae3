// src/catalog/merge.rs
//
// Folds per-event startlists into the catalog.
//
// Each step consumes a catalog and returns the next one, so feeding events
// one call at a time ends in the same catalog as one bulk call.

use std::collections::BTreeSet;

use tracing::debug;

use super::{Catalog, normalize_name};
use crate::config::options::MergeDefaults;

/// Raw names seen for one event. Set semantics: presence is binary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Observation {
    pub code: String,
    pub names: BTreeSet<String>,
}

impl Observation {
    pub fn new<I, S>(code: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { code: code.into(), names: names.into_iter().map(Into::into).collect() }
    }
}

pub struct Merger {
    defaults: MergeDefaults,
}

impl Merger {
    pub fn new(defaults: MergeDefaults) -> Self { Self { defaults } }

    pub fn defaults(&self) -> &MergeDefaults { &self.defaults }

    /// Merge one event. New names become entities carrying the defaults;
    /// every named entity gets the presence points for `obs.code`.
    /// An empty observation leaves the catalog as it was.
    pub fn merge(&self, mut catalog: Catalog, obs: &Observation) -> Catalog {
        let before = catalog.len();
        let mut marked = 0usize;

        for raw in &obs.names {
            let key = normalize_name(raw.trim());
            if key.trim().is_empty() { continue; }
            let entity = catalog.entry_or_insert(&key, &self.defaults);
            entity.scores.insert(obs.code.clone(), self.defaults.presence_points);
            marked += 1;
        }

        debug!(
            "Merge: event={} names={} marked={} new={}",
            obs.code,
            obs.names.len(),
            marked,
            catalog.len() - before
        );
        catalog.rectangularize()
    }

    /// Merge events in order; same result as merging them one by one.
    pub fn merge_all<'a, I>(&self, catalog: Catalog, events: I) -> Catalog
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        events.into_iter().fold(catalog, |cat, obs| self.merge(cat, obs))
    }

    /// Fresh catalog for one ingestion cycle.
    pub fn build<'a, I>(&self, events: I) -> Catalog
    where
        I: IntoIterator<Item = &'a Observation>,
    {
        self.merge_all(Catalog::new(), events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merger() -> Merger { Merger::new(MergeDefaults::default()) }

    #[test]
    fn streaming_equals_bulk() {
        let a = Observation::new("A", ["X"]);
        let b = Observation::new("B", ["X"]);
        let m = merger();

        let step1 = m.merge(Catalog::new(), &a);
        let streamed = m.merge(step1, &b);
        let bulk = m.build([&a, &b]);

        assert_eq!(streamed, bulk);
        let x = bulk.get("X").unwrap();
        assert_eq!(x.score("A"), 100.0);
        assert_eq!(x.score("B"), 100.0);
    }

    #[test]
    fn first_sight_uses_defaults_and_names_are_normalized() {
        let defaults = MergeDefaults {
            presence_points: 7.0,
            default_cost: 1.5,
            default_group: s!("TBD"),
            default_category: s!("?"),
        };
        let cat = Merger::new(defaults).build([&Observation::new("RVV", ["VAN DER POEL Mathieu"])]);
        let e = cat.get("Mathieu van der Poel").unwrap();
        assert_eq!((e.cost, e.group.as_str(), e.category.as_str()), (1.5, "TBD", "?"));
        assert_eq!(e.score("RVV"), 7.0);
    }

    #[test]
    fn raw_variants_of_one_rider_collapse() {
        let obs = Observation::new("PR", ["POGACAR Tadej", " POGACAR Tadej", "Tadej Pogacar"]);
        let cat = merger().build([&obs]);
        assert_eq!(cat.len(), 1);
        assert_eq!(cat.get("Tadej Pogacar").unwrap().score("PR"), 100.0);
    }

    #[test]
    fn matrix_is_rectangular_after_each_step() {
        let events = [
            Observation::new("OHN", ["A", "B"]),
            Observation::new("KBK", ["B", "C"]),
            Observation::new("SB", ["D"]),
        ];
        let m = merger();
        let mut cat = Catalog::new();
        for obs in &events {
            cat = m.merge(cat, obs);
            assert!(cat.is_rectangular());
        }
        let c = cat.get("C").unwrap();
        assert_eq!(c.scores.keys().collect::<Vec<_>>(), vec!["KBK", "OHN", "SB"]);
        assert_eq!((c.score("OHN"), c.score("KBK"), c.score("SB")), (0.0, 100.0, 0.0));
    }

    #[test]
    fn empty_event_adds_no_column() {
        let m = merger();
        let cat = m.build([&Observation::new("OHN", ["A"]), &Observation::new("MSR", Vec::<String>::new())]);
        assert_eq!(cat.event_codes().into_iter().collect::<Vec<_>>(), vec!["OHN"]);
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn blank_names_are_skipped() {
        let cat = merger().build([&Observation::new("E3", ["", "   "])]);
        assert!(cat.is_empty());
    }

    #[test]
    fn existing_entities_keep_cost_and_lose_nothing() {
        let m = merger();
        let mut seeded = Catalog::new();
        seeded.entry_or_insert("A", m.defaults()).cost = 9.0;
        let cat = m.merge(seeded, &Observation::new("GW", ["B"]));
        assert_eq!(cat.get("A").unwrap().cost, 9.0);
        assert_eq!(cat.get("A").unwrap().score("GW"), 0.0);
        assert!(cat.contains("B"));
    }
}
