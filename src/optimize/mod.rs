// src/optimize/mod.rs
//! Roster optimizer.
//!
//! Turns a catalog + constraints into a `Problem`, hands it to a `Solver`,
//! and decodes the answer back into entities. Stateless: every call is an
//! independent instance.

pub mod problem;
pub mod bnb;
pub mod exhaustive;

use std::collections::HashSet;
use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::{Catalog, Entity};
use crate::config::options::{MandatoryPolicy, SelectionOptions, SolverKind};
use crate::{Error, Result};

pub use bnb::BranchAndBound;
pub use exhaustive::Exhaustive;
pub use problem::{Problem, Solution, Solver};

#[derive(Clone, Debug, PartialEq)]
pub struct Constraints {
    /// Total cost ceiling (inclusive).
    pub budget: f64,
    /// Exact number of riders to pick.
    pub roster_size: usize,
    /// Canonical names that must be in the roster.
    pub mandatory: Vec<String>,
}

impl Constraints {
    pub fn new(budget: f64, roster_size: usize) -> Self {
        Self { budget, roster_size, mandatory: Vec::new() }
    }

    pub fn with_mandatory<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mandatory.extend(names.into_iter().map(Into::into));
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(Error::InvalidConstraints(format!("budget must be a finite number >= 0, got {}", self.budget)));
        }
        if self.roster_size == 0 {
            return Err(Error::InvalidConstraints(s!("roster size must be at least 1")));
        }
        Ok(())
    }
}

/// Selected riders, in the order their costs were accumulated.
#[derive(Clone, Debug, PartialEq)]
pub struct Roster {
    pub members: Vec<Entity>,
}

impl Roster {
    pub fn len(&self) -> usize { self.members.len() }
    pub fn is_empty(&self) -> bool { self.members.is_empty() }

    pub fn total_cost(&self) -> f64 {
        self.members.iter().map(|e| e.cost).sum()
    }

    pub fn total_score(&self) -> f64 {
        self.members.iter().map(Entity::total_score).sum()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.iter().any(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|e| e.name.as_str()).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Selected(Roster),
    /// Proven: no roster meets every constraint.
    Infeasible,
    /// Solver hit its time limit before a proof either way.
    TimedOut,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Optimization {
    pub outcome: Outcome,
    /// Mandatory names not found in the catalog and therefore not enforced.
    pub dropped_mandatory: Vec<String>,
}

impl Optimization {
    pub fn roster(&self) -> Option<&Roster> {
        match &self.outcome {
            Outcome::Selected(r) => Some(r),
            _ => None,
        }
    }
}

pub fn solver_for(opts: &SelectionOptions) -> Box<dyn Solver> {
    match opts.solver {
        SolverKind::Bnb => Box::new(BranchAndBound {
            time_limit: opts.time_limit_ms.map(Duration::from_millis),
        }),
        SolverKind::Exhaustive => Box::new(Exhaustive),
    }
}

/// Best-scoring roster of exactly `roster_size` riders within `budget`
/// that contains every mandatory rider present in the catalog.
///
/// Unknown mandatory names are dropped and listed in
/// `Optimization::dropped_mandatory` under `MandatoryPolicy::Ignore`, or make
/// the call fail with `Error::UnknownMandatoryKey` under `Reject`.
pub fn optimize(
    catalog: &Catalog,
    constraints: &Constraints,
    policy: MandatoryPolicy,
    solver: &dyn Solver,
) -> Result<Optimization> {
    constraints.validate()?;

    let entities: Vec<&Entity> = catalog.iter().collect();
    let (fixed, dropped) = resolve_mandatory(&entities, &constraints.mandatory);

    if !dropped.is_empty() {
        match policy {
            MandatoryPolicy::Reject => return Err(Error::UnknownMandatoryKey(dropped)),
            MandatoryPolicy::Ignore => warn!("Optimize: ignoring unknown mandatory rider(s): {}", dropped.join(", ")),
        }
    }

    let problem = build_problem(&entities, constraints, fixed)?;
    info!(
        "Optimize: solver={} riders={} size={} budget={} mandatory={}",
        solver.name(),
        problem.len(),
        problem.size,
        problem.budget,
        problem.fixed.len()
    );

    let outcome = match solver.solve(&problem) {
        Solution::Optimal(picks) => {
            debug_assert!(problem.is_feasible(&picks), "solver returned an infeasible answer");
            let roster = Roster { members: picks.iter().map(|&i| entities[i].clone()).collect() };
            info!(
                "Optimize: selected {} riders, cost={} score={}",
                roster.len(),
                roster.total_cost(),
                roster.total_score()
            );
            Outcome::Selected(roster)
        }
        Solution::Infeasible => {
            info!("Optimize: infeasible");
            Outcome::Infeasible
        }
        Solution::TimedOut => {
            warn!("Optimize: solver timed out");
            Outcome::TimedOut
        }
    };

    Ok(Optimization { outcome, dropped_mandatory: dropped })
}

/// Catalog indices for the mandatory names (deduplicated, input order) and
/// the names that matched nothing.
fn resolve_mandatory(entities: &[&Entity], mandatory: &[String]) -> (Vec<usize>, Vec<String>) {
    let mut fixed = Vec::new();
    let mut dropped = Vec::new();
    let mut seen = HashSet::new();

    for name in mandatory {
        if !seen.insert(name.as_str()) { continue; }
        match entities.iter().position(|e| e.name == *name) {
            Some(i) => fixed.push(i),
            None => dropped.push(name.clone()),
        }
    }
    (fixed, dropped)
}

fn build_problem(entities: &[&Entity], constraints: &Constraints, fixed: Vec<usize>) -> Result<Problem> {
    let mut costs = Vec::with_capacity(entities.len());
    let mut scores = Vec::with_capacity(entities.len());
    for e in entities {
        let score = e.total_score();
        if !e.cost.is_finite() || e.cost < 0.0 || !score.is_finite() {
            return Err(Error::InvalidConstraints(format!(
                "rider '{}' has unusable cost {} / score {}",
                e.name, e.cost, score
            )));
        }
        costs.push(e.cost);
        scores.push(score);
    }
    Ok(Problem {
        costs,
        scores,
        budget: constraints.budget,
        size: constraints.roster_size,
        fixed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::MergeDefaults;

    fn rider(name: &str, cost: f64, pts: f64) -> Entity {
        let mut e = Entity::new(name, &MergeDefaults::default());
        e.cost = cost;
        e.scores.insert(s!("RVV"), pts);
        e
    }

    fn abc() -> Catalog {
        Catalog::from_entities(vec![rider("A", 5.0, 100.0), rider("B", 5.0, 90.0), rider("C", 3.0, 40.0)])
    }

    fn run(cat: &Catalog, c: &Constraints, policy: MandatoryPolicy) -> Result<Optimization> {
        optimize(cat, c, policy, &BranchAndBound::new())
    }

    #[test]
    fn picks_best_pair() {
        let out = run(&abc(), &Constraints::new(10.0, 2), MandatoryPolicy::Ignore).unwrap();
        let roster = out.roster().unwrap();
        let mut names = roster.names();
        names.sort();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(roster.total_score(), 190.0);
        assert_eq!(roster.total_cost(), 10.0);
    }

    #[test]
    fn mandatory_rider_is_forced_in() {
        let c = Constraints::new(10.0, 2).with_mandatory(["C"]);
        let out = run(&abc(), &c, MandatoryPolicy::Ignore).unwrap();
        let roster = out.roster().unwrap();
        assert!(roster.contains("C"));
        assert!(roster.contains("A"));
        assert_eq!(roster.total_score(), 140.0);
    }

    #[test]
    fn unknown_mandatory_is_reported_when_ignored() {
        let c = Constraints::new(10.0, 2).with_mandatory(["Nobody", "Nobody"]);
        let out = run(&abc(), &c, MandatoryPolicy::Ignore).unwrap();
        assert_eq!(out.dropped_mandatory, vec!["Nobody"]);
        assert_eq!(out.roster().unwrap().total_score(), 190.0);
    }

    #[test]
    fn unknown_mandatory_fails_when_rejected() {
        let c = Constraints::new(10.0, 2).with_mandatory(["Nobody"]);
        let err = run(&abc(), &c, MandatoryPolicy::Reject).unwrap_err();
        assert!(matches!(err, Error::UnknownMandatoryKey(ref v) if v == &vec![s!("Nobody")]));
    }

    #[test]
    fn too_many_mandatory_is_infeasible() {
        let c = Constraints::new(100.0, 1).with_mandatory(["A", "B"]);
        assert_eq!(run(&abc(), &c, MandatoryPolicy::Ignore).unwrap().outcome, Outcome::Infeasible);
    }

    #[test]
    fn bad_constraints_are_errors() {
        for c in [Constraints::new(-1.0, 2), Constraints::new(f64::NAN, 2), Constraints::new(10.0, 0)] {
            assert!(matches!(run(&abc(), &c, MandatoryPolicy::Ignore), Err(Error::InvalidConstraints(_))));
        }
    }

    #[test]
    fn empty_catalog_is_infeasible() {
        let out = run(&Catalog::new(), &Constraints::new(10.0, 1), MandatoryPolicy::Ignore).unwrap();
        assert_eq!(out.outcome, Outcome::Infeasible);
    }

    #[test]
    fn solver_kind_selects_implementation() {
        let mut opts = SelectionOptions::default();
        assert_eq!(solver_for(&opts).name(), "branch-and-bound");
        opts.solver = SolverKind::Exhaustive;
        assert_eq!(solver_for(&opts).name(), "exhaustive");
    }
}
