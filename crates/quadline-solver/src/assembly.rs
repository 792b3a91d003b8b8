//! Global MNA assembly from element stamps.
//!
//! Unknowns are ordered as node voltages, voltage-source branch currents,
//! then each component's auxiliary branches in instance order. Component
//! branch counts are only known after the analysis `init_*` call, so the
//! [`Layout`] is built from the initialized stamps.

use nalgebra::{ComplexField, DVector};
use num_complex::Complex64;
use quadline_core::StampSink;

use crate::circuit::{Circuit, Instance, VoltageSource};
use crate::error::{Error, Result};
use crate::mna::MnaSystem;

/// Position of every branch-current group in the unknown vector.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub(crate) num_nodes: usize,
    /// First branch index of each component.
    pub(crate) offsets: Vec<usize>,
    pub(crate) num_branches: usize,
}

impl Layout {
    pub(crate) fn new(circuit: &Circuit) -> Self {
        let mut next = circuit.num_sources();
        let offsets = circuit
            .instances
            .iter()
            .map(|inst| {
                let offset = next;
                next += inst.stamps.voltage_sources();
                offset
            })
            .collect();
        Self {
            num_nodes: circuit.num_nodes(),
            offsets,
            num_branches: next,
        }
    }

    pub(crate) fn system<T: ComplexField<RealField = f64>>(&self) -> MnaSystem<T> {
        MnaSystem::new(self.num_nodes, self.num_branches)
    }
}

/// Fail if an element wrote NaN or infinity into its stamps.
pub(crate) fn check_finite(inst: &Instance, analysis: &'static str) -> Result<()> {
    if inst.stamps.has_non_finite() {
        return Err(Error::NonFiniteStamp {
            element: inst.component.name().to_string(),
            analysis,
        });
    }
    Ok(())
}

fn stamp_passives<T: ComplexField<RealField = f64>>(
    mna: &mut MnaSystem<T>,
    circuit: &Circuit,
    source_value: impl Fn(&VoltageSource) -> T,
) {
    for r in &circuit.resistors {
        mna.stamp_admittance(r.node_pos, r.node_neg, T::from_real(1.0 / r.resistance));
    }
    for (branch, src) in circuit.sources.iter().enumerate() {
        mna.stamp_voltage_source(src.node_pos, src.node_neg, branch, source_value(src));
    }
}

/// Add an element's B, C, D and E blocks at its branch offset.
fn stamp_branches<T: ComplexField<RealField = f64>>(
    mna: &mut MnaSystem<T>,
    inst: &Instance,
    offset: usize,
) {
    let stamps = &inst.stamps;
    for k in 0..stamps.voltage_sources() {
        let row = mna.branch_row(offset + k);
        for (local, terminal) in inst.terminals.iter().enumerate() {
            let Some(node) = *terminal else { continue };
            mna.add(node, row, T::from_real(stamps.b()[(local, k)]));
            mna.add(row, node, T::from_real(stamps.c()[(k, local)]));
        }
        for l in 0..stamps.voltage_sources() {
            let col = mna.branch_row(offset + l);
            mna.add(row, col, T::from_real(stamps.d()[(k, l)]));
        }
        mna.add_rhs(row, T::from_real(stamps.e()[k]));
    }
}

/// Assemble the real system for DC or one transient point.
///
/// Element stamps must already hold the values for this point.
pub(crate) fn assemble_real(
    circuit: &Circuit,
    layout: &Layout,
    analysis: &'static str,
    source_value: impl Fn(&VoltageSource) -> f64,
) -> Result<MnaSystem<f64>> {
    let mut mna = layout.system::<f64>();
    stamp_passives(&mut mna, circuit, source_value);
    for (inst, &offset) in circuit.instances.iter().zip(&layout.offsets) {
        check_finite(inst, analysis)?;
        stamp_branches(&mut mna, inst, offset);
    }
    Ok(mna)
}

/// Assemble the complex AC system: element admittances plus branches.
pub(crate) fn assemble_complex(circuit: &Circuit, layout: &Layout) -> Result<MnaSystem<Complex64>> {
    let mut mna = layout.system::<Complex64>();
    stamp_passives(&mut mna, circuit, |src| Complex64::new(src.ac, 0.0));
    for (inst, &offset) in circuit.instances.iter().zip(&layout.offsets) {
        check_finite(inst, "ac")?;

        let y = inst.stamps.y_matrix();
        for (i, ti) in inst.terminals.iter().enumerate() {
            let Some(row) = *ti else { continue };
            for (j, tj) in inst.terminals.iter().enumerate() {
                let Some(col) = *tj else { continue };
                mna.add(row, col, y[(i, j)]);
            }
        }
        stamp_branches(&mut mna, inst, offset);
    }
    Ok(mna)
}

/// Voltage at each terminal of an element (ground reads 0).
pub(crate) fn terminal_voltages<T: ComplexField<RealField = f64>>(
    solution: &DVector<T>,
    terminals: &[Option<usize>],
) -> Vec<T> {
    terminals
        .iter()
        .map(|t| t.map(|i| solution[i].clone()).unwrap_or_else(T::zero))
        .collect()
}

/// Currents of an element's auxiliary branches.
pub(crate) fn branch_currents<T: ComplexField<RealField = f64>>(
    solution: &DVector<T>,
    layout: &Layout,
    offset: usize,
    count: usize,
) -> Vec<T> {
    let start = layout.num_nodes + offset;
    solution.rows(start, count).iter().cloned().collect()
}
