//! Benchmarks for S-parameter sweeps and transient stepping.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use quadline_core::{C0, LineParams};
use quadline_devices::TransmissionLine4;
use quadline_solver::{
    Circuit, FrequencySweep, TransientParams, Waveform, solve_transient, sweep_sparameters,
};

fn bench_sweep_sparameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_sparameters");
    let line = TransmissionLine4::new("T1", LineParams::new(0.3, 75.0, 2.0, 26.85).unwrap());

    for points in [101, 1001, 10001] {
        let freqs = FrequencySweep::logarithmic(1e6, 1e10, points)
            .unwrap()
            .frequencies();
        group.bench_with_input(BenchmarkId::from_parameter(points), &freqs, |bencher, freqs| {
            bencher.iter(|| sweep_sparameters(&line, black_box(freqs), true).unwrap());
        });
    }

    group.finish();
}

fn bench_transient(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_transient");

    for steps in [100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |bencher, &steps| {
            let line = TransmissionLine4::new(
                "T1",
                LineParams::new(C0 * 1e-9, 50.0, 1.2, 26.85).unwrap(),
            );
            let mut ckt = Circuit::new();
            let step = Waveform::Step {
                initial: 0.0,
                final_value: 1.0,
                delay: 0.0,
            };
            ckt.add_voltage_source("V1", "src", "0", 0.0, 0.0, step);
            ckt.add_resistor("RS", "src", "near", 50.0).unwrap();
            ckt.add_component(line, &["near", "far", "0", "0"]).unwrap();
            ckt.add_resistor("RL", "far", "0", 50.0).unwrap();

            let params = TransientParams::new(steps as f64 * 1e-11, 1e-11);
            bencher.iter(|| solve_transient(&mut ckt, black_box(&params)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sweep_sparameters, bench_transient);
criterion_main!(benches);
