// src/optimize/bnb.rs
//! Depth-first branch-and-bound for the fixed-size, budget-capped selection.
//!
//! Candidates are visited best score first, "take" before "skip". A node is
//! cut when
//! - fewer candidates remain than open slots,
//! - even the cheapest way to fill the open slots breaks the budget, or
//! - its upper bound cannot beat the incumbent.
//!
//! Upper bound: for any λ ≥ 0 and any feasible completion x,
//!
//! ```text
//! Σ s·x = Σ (s − λc)·x + λ Σ c·x ≤ top_r(s − λc) + λ·(budget − used)
//! ```
//!
//! λ = 0 is the plain "best r scores left" bound. One λ > 0 is picked at the
//! root (the breakpoint s/c that gives the tightest root bound) and both are
//! evaluated at every node.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use super::problem::{Problem, Solution, Solver};

/// How often (in nodes) the deadline is looked at, besides the root.
const CLOCK_EVERY: u64 = 1024;

#[derive(Clone, Copy, Debug, Default)]
pub struct BranchAndBound {
    pub time_limit: Option<Duration>,
}

impl BranchAndBound {
    pub fn new() -> Self { Self::default() }

    pub fn with_time_limit(limit: Duration) -> Self {
        Self { time_limit: Some(limit) }
    }
}

impl Solver for BranchAndBound {
    fn name(&self) -> &'static str { "branch-and-bound" }

    fn solve(&self, p: &Problem) -> Solution {
        if p.obviously_infeasible() { return Solution::Infeasible; }
        let Some(open) = p.open_slots() else { return Solution::Infeasible };

        let mut order = p.free();
        if open > order.len() { return Solution::Infeasible; }
        order.sort_by(|&a, &b| {
            desc(p.scores[a], p.scores[b]).then_with(|| asc(p.costs[a], p.costs[b]))
        });

        let used = p.fixed_cost();
        let lambda = root_multiplier(p, &order, open, used);

        let mut search = Search {
            p,
            order: &order,
            lambda,
            best_score: f64::NEG_INFINITY,
            best: None,
            picked: Vec::with_capacity(open),
            scratch: Vec::with_capacity(order.len()),
            nodes: 0,
            deadline: self.time_limit.map(|d| Instant::now() + d),
            timed_out: false,
        };
        search.dfs(0, open, used, p.fixed_score());

        tracing::debug!(
            "B&B: candidates={} open={} lambda={:.6e} nodes={} timed_out={}",
            order.len(), open, lambda, search.nodes, search.timed_out
        );

        if search.timed_out {
            return Solution::TimedOut;
        }
        match search.best {
            Some(picks) => {
                let mut all = p.fixed.clone();
                all.extend(picks);
                Solution::Optimal(all)
            }
            None => Solution::Infeasible,
        }
    }
}

struct Search<'a> {
    p: &'a Problem,
    /// Free candidates, best score first.
    order: &'a [usize],
    lambda: f64,
    best_score: f64,
    best: Option<Vec<usize>>,
    picked: Vec<usize>,
    scratch: Vec<f64>,
    nodes: u64,
    deadline: Option<Instant>,
    timed_out: bool,
}

impl Search<'_> {
    fn dfs(&mut self, at: usize, open: usize, used: f64, score: f64) {
        if self.timed_out { return; }
        self.nodes += 1;
        if self.nodes == 1 || self.nodes % CLOCK_EVERY == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    self.timed_out = true;
                    return;
                }
            }
        }

        if open == 0 {
            if score > self.best_score {
                self.best_score = score;
                self.best = Some(self.picked.clone());
            }
            return;
        }
        if self.order.len() - at < open { return; }
        if !self.can_fill(at, open, used) { return; }
        if self.best.is_some() {
            let ub = self.upper_bound(at, open, used, score);
            if ub + slack(ub) <= self.best_score { return; }
        }

        let i = self.order[at];
        let cost = self.p.costs[i];
        if used + cost <= self.p.budget {
            self.picked.push(i);
            self.dfs(at + 1, open - 1, used + cost, score + self.p.scores[i]);
            self.picked.pop();
        }
        self.dfs(at + 1, open, used, score);
    }

    /// Cheapest `open` costs among `order[at..]` still fit.
    fn can_fill(&mut self, at: usize, open: usize, used: f64) -> bool {
        self.scratch.clear();
        self.scratch.extend(self.order[at..].iter().map(|&i| self.p.costs[i]));
        let cheapest = smallest_sum(&mut self.scratch, open);
        used + cheapest <= self.p.budget + slack(self.p.budget)
    }

    fn upper_bound(&mut self, at: usize, open: usize, used: f64, score: f64) -> f64 {
        // λ = 0: order is by score, so the next `open` entries are the best
        let plain: f64 = self.order[at..at + open].iter().map(|&i| self.p.scores[i]).sum();
        let mut bound = score + plain;

        if self.lambda > 0.0 {
            let l = self.lambda;
            self.scratch.clear();
            self.scratch.extend(self.order[at..].iter().map(|&i| self.p.scores[i] - l * self.p.costs[i]));
            let lagr = score + l * (self.p.budget - used) + largest_sum(&mut self.scratch, open);
            bound = bound.min(lagr);
        }
        bound
    }
}

/// Root λ: the ratio breakpoint with the tightest bound at the root node.
fn root_multiplier(p: &Problem, order: &[usize], open: usize, used: f64) -> f64 {
    if open == 0 { return 0.0; }
    let root_bound = |l: f64, buf: &mut Vec<f64>| {
        buf.clear();
        buf.extend(order.iter().map(|&i| p.scores[i] - l * p.costs[i]));
        l * (p.budget - used) + largest_sum(buf, open)
    };

    let mut buf = Vec::with_capacity(order.len());
    let mut best_l = 0.0;
    let mut best_b = root_bound(0.0, &mut buf);
    for &i in order {
        let c = p.costs[i];
        if c <= 0.0 { continue; }
        let l = p.scores[i] / c;
        if !(l.is_finite() && l > 0.0) { continue; }
        let b = root_bound(l, &mut buf);
        if b < best_b {
            best_b = b;
            best_l = l;
        }
    }
    best_l
}

/// Sum of the `k` largest values (reorders `v`).
fn largest_sum(v: &mut [f64], k: usize) -> f64 {
    if k == 0 { return 0.0; }
    if k < v.len() {
        v.select_nth_unstable_by(k - 1, |a, b| desc(*a, *b));
    }
    v[..k.min(v.len())].iter().sum()
}

/// Sum of the `k` smallest values (reorders `v`).
fn smallest_sum(v: &mut [f64], k: usize) -> f64 {
    if k == 0 { return 0.0; }
    if k < v.len() {
        v.select_nth_unstable_by(k - 1, |a, b| asc(*a, *b));
    }
    v[..k.min(v.len())].iter().sum()
}

/// Rounding allowance for the pruning tests. It only ever keeps a node
/// alive: the score bound and the budget are both raised by it, so any
/// strict improvement is still searched. The budget test on an actual pick
/// is exact.
fn slack(x: f64) -> f64 {
    1e-9 * x.abs().max(1.0)
}

fn asc(a: f64, b: f64) -> Ordering { a.partial_cmp(&b).unwrap_or(Ordering::Equal) }
fn desc(a: f64, b: f64) -> Ordering { asc(b, a) }
