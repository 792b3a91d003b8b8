//! Benchmarks for transmission-line stamp evaluation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quadline_core::{Component, ElementStamps, LineParams};
use quadline_devices::TransmissionLine4;

fn lossy_line() -> TransmissionLine4 {
    let params = LineParams::new(0.25, 75.0, 2.0, 26.85).unwrap();
    TransmissionLine4::new("T1", params)
}

fn bench_calc_sp(c: &mut Criterion) {
    let mut group = c.benchmark_group("calc_sp");
    let line = lossy_line();

    for frequency in [1e6, 1e9, 1e11] {
        group.bench_with_input(
            BenchmarkId::from_parameter(frequency),
            &frequency,
            |bencher, &f| {
                let mut stamps = ElementStamps::new(4);
                bencher.iter(|| {
                    line.calc_sp(black_box(f), &mut stamps);
                    line.calc_noise_sp(black_box(f), &mut stamps);
                });
            },
        );
    }

    group.finish();
}

fn bench_calc_ac(c: &mut Criterion) {
    let mut line = lossy_line();
    let mut stamps = ElementStamps::new(4);
    line.init_ac(&mut stamps);

    c.bench_function("calc_ac", |bencher| {
        bencher.iter(|| line.calc_ac(black_box(1e9), &mut stamps));
    });
}

fn bench_calc_tr(c: &mut Criterion) {
    let mut line = lossy_line();
    let mut stamps = ElementStamps::new(4);
    line.init_tr(&mut stamps);

    let h = line.delay() / 20.0;
    for k in 0..=40 {
        let t = k as f64 * h;
        let v = (t / line.delay()).sin();
        line.accept_step(t, &[v, 0.0, 0.0, 0.0], &[v / 75.0, 0.0])
            .unwrap();
    }
    let t = 40.0 * h;

    c.bench_function("calc_tr", |bencher| {
        bencher.iter(|| line.calc_tr(black_box(t), &mut stamps));
    });
}

criterion_group!(benches, bench_calc_sp, bench_calc_ac, bench_calc_tr);
criterion_main!(benches);
