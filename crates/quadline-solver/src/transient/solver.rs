//! Fixed-step transient driver.

use quadline_core::StampSink;

use crate::assembly::{Layout, assemble_real, branch_currents, terminal_voltages};
use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::linear::solve_dense;

use super::result::{TimePoint, TransientResult};
use super::types::TransientParams;

/// Largest number of time points a single run may produce.
pub const MAX_TIME_POINTS: usize = 10_000_000;

/// Run a transient simulation.
///
/// Components are initialized for transient analysis, which resets any
/// delay-line history. The timestep is reduced to the smallest
/// [`max_time_step`](quadline_core::Component::max_time_step) reported by a
/// component. Each solved point, starting at t = 0, is handed back to every
/// component through `accept_step`.
///
/// Fails with [`Error::InvalidAnalysis`] when the (possibly reduced) step
/// would need more than [`MAX_TIME_POINTS`] points to reach `tstop`.
pub fn solve_transient(circuit: &mut Circuit, params: &TransientParams) -> Result<TransientResult> {
    params.validate()?;

    for inst in circuit.instances.iter_mut() {
        inst.stamps.clear();
        inst.component.init_tr(&mut inst.stamps);
    }
    let layout = Layout::new(circuit);

    let mut h = params.tstep;
    let mut limited_by = None;
    for inst in &circuit.instances {
        if let Some(limit) = inst.component.max_time_step() {
            if limit > 0.0 && limit < h {
                log::warn!(
                    "{}: timestep {:e} s exceeds propagation delay, using {:e} s",
                    inst.component.name(),
                    h,
                    limit
                );
                h = limit;
                limited_by = Some(inst.component.name());
            }
        }
    }

    let steps = (params.tstop / h).ceil();
    if steps >= MAX_TIME_POINTS as f64 {
        let reason = match limited_by {
            Some(name) => format!("{}: propagation delay {:e} s", name, h),
            None => format!("timestep {:e} s", h),
        };
        return Err(Error::InvalidAnalysis(format!(
            "{} needs {:.3e} steps to reach {:e} s (limit {})",
            reason, steps, params.tstop, MAX_TIME_POINTS
        )));
    }
    let num_steps = steps as usize;
    log::debug!(
        "Transient: {} nodes, {} branches, {} steps of {:e} s",
        layout.num_nodes,
        layout.num_branches,
        num_steps,
        h
    );

    let mut result = TransientResult {
        points: Vec::new(),
        num_nodes: layout.num_nodes,
        tstep: h,
    };

    for step in 0..=num_steps {
        let t = step as f64 * h;

        for inst in circuit.instances.iter_mut() {
            inst.component.calc_tr(t, &mut inst.stamps);
        }
        let mna = assemble_real(circuit, &layout, "transient", |src| src.value_at(t))?;
        let solution = solve_dense(&mna.matrix, &mna.rhs)?;

        for (inst, &offset) in circuit.instances.iter_mut().zip(&layout.offsets) {
            let voltages = terminal_voltages(&solution, &inst.terminals);
            let count = inst.stamps.voltage_sources();
            let currents = branch_currents(&solution, &layout, offset, count);
            inst.component.accept_step(t, &voltages, &currents)?;
        }

        result.points.push(TimePoint { time: t, solution });
    }

    Ok(result)
}
