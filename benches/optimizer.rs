// benches/optimizer.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use wm_roster::config::options::MandatoryPolicy;
use wm_roster::optimize::{self, BranchAndBound, Constraints, Exhaustive};
use wm_roster::{Catalog, Entity, seed};

/// Deterministic catalog: `n` riders, price loosely tracking points.
fn synthetic(n: usize) -> Catalog {
    let mut rng = StdRng::seed_from_u64(0x2545_f491_4f6c_dd1d);
    Catalog::from_entities((0..n).map(|i| {
        let pts = rng.gen_range(0..500u32) as f64;
        let price = 3_000_000.0 + pts * 15_000.0 + rng.gen_range(0..2_000_000u32) as f64;
        Entity {
            name: format!("Rider {i:03}"),
            group: format!("Team {}", i % 18),
            cost: price,
            category: String::from("General"),
            scores: [(String::from("RVV"), pts)].into_iter().collect(),
        }
    }))
}

fn bench_optimizer(c: &mut Criterion) {
    let backup = seed::backup_catalog();
    let small = Constraints::new(45_000_000.0, 5);

    c.bench_function("bnb_backup_5", |b| {
        b.iter(|| optimize::optimize(black_box(&backup), &small, MandatoryPolicy::Ignore, &BranchAndBound::new()))
    });

    c.bench_function("exhaustive_backup_5", |b| {
        b.iter(|| optimize::optimize(black_box(&backup), &small, MandatoryPolicy::Ignore, &Exhaustive))
    });

    let field = synthetic(150);
    let team = Constraints::new(120_000_000.0, 20);
    c.bench_function("bnb_150_pick_20", |b| {
        b.iter(|| optimize::optimize(black_box(&field), &team, MandatoryPolicy::Ignore, &BranchAndBound::new()))
    });
}

criterion_group!(benches, bench_optimizer);
criterion_main!(benches);
