// src/optimize/problem.rs
//! 0/1 selection problem handed to a `Solver`.
//!
//! maximize   Σ scores[i]·x[i]
//! subject to Σ costs[i]·x[i] ≤ budget
//!            Σ x[i] = size
//!            x[k] = 1 for k in fixed
//!
//! Solvers return picks in *accumulation order*: fixed indices first (as
//! given), then the rest in the order they were added. The budget test was
//! done on exactly that running sum, so re-summing the picks in the returned
//! order reproduces the checked value bit for bit.

#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
    pub costs: Vec<f64>,
    pub scores: Vec<f64>,
    pub budget: f64,
    pub size: usize,
    /// Distinct indices that must be selected.
    pub fixed: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Solution {
    Optimal(Vec<usize>),
    /// Proven: no subset satisfies all constraints.
    Infeasible,
    /// Gave up before proving anything. Never carries a partial answer.
    TimedOut,
}

/// Exact 0/1 solver. Implementations must be stateless between calls.
pub trait Solver {
    fn name(&self) -> &'static str;
    fn solve(&self, problem: &Problem) -> Solution;
}

impl Problem {
    pub fn len(&self) -> usize { self.costs.len() }
    pub fn is_empty(&self) -> bool { self.costs.is_empty() }

    /// Slots left after the fixed picks (None if fixed alone overflow).
    pub fn open_slots(&self) -> Option<usize> {
        self.size.checked_sub(self.fixed.len())
    }

    /// Running cost of the fixed picks, in order.
    pub fn fixed_cost(&self) -> f64 {
        self.fixed.iter().map(|&i| self.costs[i]).sum()
    }

    pub fn fixed_score(&self) -> f64 {
        self.fixed.iter().map(|&i| self.scores[i]).sum()
    }

    /// Candidates that are not fixed, in index order.
    pub fn free(&self) -> Vec<usize> {
        let mut is_fixed = vec![false; self.len()];
        for &i in &self.fixed { is_fixed[i] = true; }
        (0..self.len()).filter(|&i| !is_fixed[i]).collect()
    }

    /// Cheap checks every solver shares: too many fixed picks, too few
    /// candidates, or fixed picks alone over budget.
    pub fn obviously_infeasible(&self) -> bool {
        self.size > self.len()
            || self.fixed.len() > self.size
            || self.fixed_cost() > self.budget
    }

    /// Sum of scores over `picks`.
    pub fn value(&self, picks: &[usize]) -> f64 {
        picks.iter().map(|&i| self.scores[i]).sum()
    }

    /// Full constraint check on a candidate answer.
    pub fn is_feasible(&self, picks: &[usize]) -> bool {
        let mut seen = vec![false; self.len()];
        for &i in picks {
            if i >= self.len() || seen[i] { return false; }
            seen[i] = true;
        }
        let cost: f64 = picks.iter().map(|&i| self.costs[i]).sum();
        picks.len() == self.size
            && self.fixed.iter().all(|&k| seen[k])
            && cost <= self.budget
    }
}
