use criterion::{criterion_group, criterion_main, Criterion};

use scorecast::scoregrid::Scoregrid;

fn criterion_benchmark(c: &mut Criterion) {
    // sanity check
    let scoregrid = Scoregrid::from_univariate_poisson(1.5, 1.0, 10).unwrap();
    assert!(scoregrid.truncation_mass() < 1e-6);

    fn bench_build(c: &mut Criterion, max_count: u8) {
        c.bench_function(&format!("cri_scoregrid_build_{max_count}"), |b| {
            b.iter(|| Scoregrid::from_univariate_poisson(1.5, 1.0, max_count).unwrap());
        });
    }
    bench_build(c, 5);
    bench_build(c, 10);
    bench_build(c, 30);

    c.bench_function("cri_scoregrid_aggregate_10", |b| {
        b.iter(|| {
            let top = scoregrid.top_outcomes(3).unwrap();
            let over_under = scoregrid.over_under(2.5).unwrap();
            let handicap = scoregrid.handicap_cover(-0.5).unwrap();
            (top, over_under, scoregrid.match_outcome(), handicap)
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
