//! Small-signal AC analysis.

use nalgebra::DVector;
use num_complex::Complex64;

use crate::assembly::{Layout, assemble_complex};
use crate::circuit::Circuit;
use crate::error::{Error, Result};
use crate::linear::solve_complex;

/// AC solution at one frequency.
#[derive(Debug, Clone)]
pub struct AcSolution {
    /// Frequency (Hz).
    pub frequency: f64,
    /// Node voltage phasors followed by branch-current phasors.
    pub solution: DVector<Complex64>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
}

impl AcSolution {
    /// Voltage phasor at a node index; ground (`None`) is 0.
    pub fn voltage(&self, node: Option<usize>) -> Complex64 {
        node.map(|i| self.solution[i]).unwrap_or_default()
    }
}

/// Solve the circuit at each of `frequencies`.
///
/// Components are initialized for AC once; `calc_ac` runs per frequency.
pub fn solve_ac(circuit: &mut Circuit, frequencies: &[f64]) -> Result<Vec<AcSolution>> {
    if let Some(f) = frequencies.iter().find(|f| !(f.is_finite() && **f >= 0.0)) {
        return Err(Error::InvalidAnalysis(format!("invalid AC frequency {}", f)));
    }

    for inst in circuit.instances.iter_mut() {
        inst.stamps.clear();
        inst.component.init_ac(&mut inst.stamps);
    }
    let layout = Layout::new(circuit);
    log::debug!(
        "AC: {} nodes, {} branches, {} frequencies",
        layout.num_nodes,
        layout.num_branches,
        frequencies.len()
    );

    let mut results = Vec::with_capacity(frequencies.len());
    for &frequency in frequencies {
        for inst in circuit.instances.iter_mut() {
            inst.component.calc_ac(frequency, &mut inst.stamps);
        }
        let mna = assemble_complex(circuit, &layout)?;
        let solution = solve_complex(&mna.matrix, &mna.rhs)?;
        log::trace!("AC: solved {} Hz", frequency);
        results.push(AcSolution {
            frequency,
            solution,
            num_nodes: layout.num_nodes,
        });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::Waveform;

    #[test]
    fn test_resistive_divider_ac() {
        let mut ckt = Circuit::new();
        ckt.add_voltage_source("V1", "in", "0", 0.0, 2.0, Waveform::Dc);
        ckt.add_resistor("R1", "in", "out", 100.0).unwrap();
        ckt.add_resistor("R2", "out", "0", 300.0).unwrap();

        let results = solve_ac(&mut ckt, &[1e3, 1e6]).unwrap();
        let out = ckt.node("out").unwrap();
        for r in &results {
            let v = r.voltage(out);
            assert!((v.re - 1.5).abs() < 1e-10, "V(out) = {} at {} Hz", v, r.frequency);
            assert!(v.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_negative_frequency() {
        let mut ckt = Circuit::new();
        ckt.add_resistor("R1", "a", "0", 1.0).unwrap();
        assert!(matches!(
            solve_ac(&mut ckt, &[-1.0]),
            Err(Error::InvalidAnalysis(_))
        ));
    }
}
