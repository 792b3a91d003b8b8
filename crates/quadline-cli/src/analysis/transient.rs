//! Step response of a driven, terminated line.

use anyhow::{Context, Result};
use quadline_core::LineParams;
use quadline_devices::TransmissionLine4;
use quadline_solver::{Circuit, TransientParams, Waveform, solve_transient};

use crate::output::{TransientRow, print_transient_json, print_transient_table};

/// Source, load and timing of the step-response circuit.
#[derive(Debug, Clone)]
pub struct TransientSetup {
    pub params: TransientParams,
    pub rs: f64,
    pub rl: f64,
    pub amplitude: f64,
}

impl TransientSetup {
    /// Fill unset values from the line: resistors matched to `Z`, four
    /// delays of simulated time, twenty steps per delay.
    pub fn new(
        line: LineParams,
        tstop: Option<f64>,
        tstep: Option<f64>,
        rs: Option<f64>,
        rl: Option<f64>,
        amplitude: f64,
    ) -> Self {
        let delay = TransmissionLine4::new("T1", line).delay();
        let tstop = tstop.unwrap_or(if delay > 0.0 { 4.0 * delay } else { 1e-9 });
        let tstep = tstep.unwrap_or(if delay > 0.0 { delay / 20.0 } else { tstop / 100.0 });
        Self {
            params: TransientParams::new(tstop, tstep),
            rs: rs.unwrap_or(line.z),
            rl: rl.unwrap_or(line.z),
            amplitude,
        }
    }
}

/// Build the circuit: step source, series `rs`, the line, `rl` at the far
/// end.
fn build_circuit(line: LineParams, setup: &TransientSetup) -> Result<Circuit> {
    let step = Waveform::Step {
        initial: 0.0,
        final_value: setup.amplitude,
        delay: 0.0,
    };
    // A zero-length line shorts N3 to N4, so they cannot both sit on ground
    let far_return = if line.length > 0.0 { "0" } else { "ret" };

    let mut ckt = Circuit::new();
    ckt.add_voltage_source("V1", "src", "0", 0.0, 0.0, step);
    ckt.add_resistor("RS", "src", "near", setup.rs)?;
    ckt.add_component(
        TransmissionLine4::new("T1", line),
        &["near", "far", far_return, "0"],
    )?;
    ckt.add_resistor("RL", "far", far_return, setup.rl)?;
    Ok(ckt)
}

/// Run the step response and print near- and far-end voltages.
pub fn run_transient(line: LineParams, setup: &TransientSetup, json: bool) -> Result<()> {
    let mut ckt = build_circuit(line, setup).context("building circuit")?;
    let result = solve_transient(&mut ckt, &setup.params).context("transient analysis")?;

    let near = ckt.node("near")?;
    let far = ckt.node("far")?;
    let far_return = if line.length > 0.0 { None } else { ckt.node("ret")? };
    let rows: Vec<TransientRow> = result
        .points
        .iter()
        .map(|tp| {
            let v = |node: Option<usize>| node.map(|i| tp.solution[i]).unwrap_or(0.0);
            TransientRow {
                time: tp.time,
                near: v(near),
                far: v(far) - v(far_return),
            }
        })
        .collect();

    if json {
        return print_transient_json(&rows);
    }

    println!(
        "Transient Step Response (L = {} m, Z = {} Ω, Rs = {} Ω, Rl = {} Ω)",
        line.length, line.z, setup.rs, setup.rl
    );
    println!("==========================================");
    println!();
    if result.tstep < setup.params.tstep {
        println!("Timestep reduced to {:.4e} s (propagation delay)", result.tstep);
        println!();
    }
    print_transient_table(&rows);
    Ok(())
}
