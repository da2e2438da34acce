//! Benchmarks for scoring and planning over the built-in catalog.
//!
//! Planning is pure computation and should stay well under a millisecond
//! even for the longest trips.

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use navigator::catalog::Catalog;
use navigator::config::PlannerConfig;
use navigator::planner::sequencer::{sequence, SequenceCandidate};
use navigator::planner::{Planner, PlanningRequest, Ratings, TripWindow};
use navigator::routing::RouteTable;
use navigator::scoring::Scorer;
use navigator::telemetry::{ConditionSnapshot, Reading};

fn create_ratings(catalog: &Catalog) -> Ratings {
    catalog
        .sites()
        .iter()
        .enumerate()
        .fold(Ratings::new().with("pyramid", 4.0), |r, (i, site)| {
            r.with(site.id.clone(), 1.0 + (i % 5) as f64 * 0.75)
        })
}

fn create_snapshot(catalog: &Catalog) -> ConditionSnapshot {
    let start = chrono::Utc::now() - chrono::Duration::hours(48);
    let mut snapshot = ConditionSnapshot::empty();
    for (i, site) in catalog.sites().iter().enumerate() {
        let readings = (0..192)
            .map(|step| Reading {
                timestamp: start + chrono::Duration::minutes(15 * step),
                value: site.target.low + (i as f64 * 37.0 + step as f64 * 3.0),
            })
            .collect();
        snapshot.insert_readings(site.id.clone(), readings);
    }
    snapshot
}

/// Benchmark a full plan for increasing trip lengths.
fn bench_plan_by_trip_length(c: &mut Criterion) {
    let catalog = Catalog::builtin().unwrap();
    let routes = RouteTable::builtin().unwrap();
    let planner = Planner::new(&catalog, &routes, PlannerConfig::default());
    let ratings = create_ratings(&catalog);
    let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();

    let mut group = c.benchmark_group("plan");
    for days in [5, 10, 21, 45] {
        let request = PlanningRequest::new(TripWindow::from_length(start, days).unwrap())
            .with_ratings(ratings.clone());

        group.bench_with_input(BenchmarkId::new("days", days), &days, |b, _| {
            b.iter(|| {
                black_box(planner.plan(&request).unwrap());
            });
        });
    }
    group.finish();
}

/// Benchmark scoring every site against two days of 15-minute readings.
fn bench_score_catalog(c: &mut Criterion) {
    let catalog = Catalog::builtin().unwrap();
    let snapshot = create_snapshot(&catalog);
    let scorer = Scorer::default();

    c.bench_function("score_catalog", |b| {
        b.iter(|| {
            black_box(scorer.score_catalog(&catalog, &snapshot));
        });
    });
}

/// Benchmark the directional sequencer on long lines of sites.
fn bench_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence");
    for count in [4, 16, 64] {
        let line: Vec<SequenceCandidate> = (0..count)
            .map(|position| SequenceCandidate {
                id: format!("site-{}", position),
                position,
                rating: 1.0 + ((position * 7) % 17) as f64 / 4.0,
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("sites", count), &count, |b, _| {
            b.iter(|| {
                black_box(sequence(&line, count, 0.5));
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_plan_by_trip_length,
    bench_score_catalog,
    bench_sequence,
);
criterion_main!(benches);
