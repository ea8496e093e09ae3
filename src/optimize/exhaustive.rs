// src/optimize/exhaustive.rs
//
// Direct enumeration of every size-`r` subset of the free candidates.
// C(n, r) grows fast: meant for small catalogs and as the reference the
// branch-and-bound search is checked against.

use super::problem::{Problem, Solution, Solver};

#[derive(Clone, Copy, Debug, Default)]
pub struct Exhaustive;

impl Solver for Exhaustive {
    fn name(&self) -> &'static str { "exhaustive" }

    fn solve(&self, p: &Problem) -> Solution {
        if p.obviously_infeasible() { return Solution::Infeasible; }
        let Some(r) = p.open_slots() else { return Solution::Infeasible };

        let free = p.free();
        if r > free.len() { return Solution::Infeasible; }

        let base_cost = p.fixed_cost();
        let base_score = p.fixed_score();
        let mut best: Option<(f64, Vec<usize>)> = None;

        // Lexicographic walk over index combinations into `free`
        let mut comb: Vec<usize> = (0..r).collect();
        loop {
            let mut cost = base_cost;
            let mut fits = true;
            for &c in &comb {
                cost += p.costs[free[c]];
                if cost > p.budget { fits = false; break; }
            }
            if fits {
                let score = base_score + comb.iter().map(|&c| p.scores[free[c]]).sum::<f64>();
                if best.as_ref().is_none_or(|(b, _)| score > *b) {
                    best = Some((score, comb.iter().map(|&c| free[c]).collect()));
                }
            }
            if !advance(&mut comb, free.len()) { break; }
        }

        match best {
            Some((_, picks)) => {
                let mut all = p.fixed.clone();
                all.extend(picks);
                Solution::Optimal(all)
            }
            None => Solution::Infeasible,
        }
    }
}

/// Next r-combination of 0..n in lexicographic order; false when done.
fn advance(comb: &mut [usize], n: usize) -> bool {
    let r = comb.len();
    for i in (0..r).rev() {
        if comb[i] < n - r + i {
            comb[i] += 1;
            for j in i + 1..r {
                comb[j] = comb[j - 1] + 1;
            }
            return true;
        }
    }
    false
}
