//! DC operating-point analysis.

use nalgebra::DVector;

use crate::assembly::{Layout, assemble_real};
use crate::circuit::Circuit;
use crate::error::Result;
use crate::linear::solve_dense;

/// DC operating point.
#[derive(Debug, Clone)]
pub struct DcSolution {
    /// Node voltages followed by branch currents.
    pub solution: DVector<f64>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
}

impl DcSolution {
    /// Voltage at a node index; ground (`None`) is 0 V.
    pub fn voltage(&self, node: Option<usize>) -> f64 {
        node.map(|i| self.solution[i]).unwrap_or(0.0)
    }

    /// Current through a voltage source, by source index.
    pub fn source_current(&self, source: usize) -> f64 {
        self.solution[self.num_nodes + source]
    }
}

/// Solve the DC operating point.
///
/// Every component is initialized for DC before assembly.
pub fn solve_dc(circuit: &mut Circuit) -> Result<DcSolution> {
    for inst in circuit.instances.iter_mut() {
        inst.stamps.clear();
        inst.component.init_dc(&mut inst.stamps);
    }

    let layout = Layout::new(circuit);
    let mna = assemble_real(circuit, &layout, "dc", |src| src.dc)?;
    log::debug!(
        "DC: {} nodes, {} branches",
        layout.num_nodes,
        layout.num_branches
    );

    let solution = solve_dense(&mna.matrix, &mna.rhs)?;
    Ok(DcSolution {
        solution,
        num_nodes: layout.num_nodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Waveform;

    #[test]
    fn test_voltage_divider() {
        let mut ckt = Circuit::new();
        ckt.add_voltage_source("V1", "in", "0", 10.0, 0.0, Waveform::Dc);
        ckt.add_resistor("R1", "in", "mid", 1000.0).unwrap();
        ckt.add_resistor("R2", "mid", "0", 1000.0).unwrap();

        let dc = solve_dc(&mut ckt).unwrap();
        let mid = ckt.node("mid").unwrap();
        assert!((dc.voltage(mid) - 5.0).abs() < 1e-10, "V(mid) = {}", dc.voltage(mid));
        // Source current flows out of the positive terminal
        assert!((dc.source_current(0) + 5e-3).abs() < 1e-12);
    }
}
