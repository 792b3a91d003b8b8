//! Modified Nodal Analysis (MNA) system.
//!
//! The unknown vector holds the non-ground node voltages followed by every
//! auxiliary branch current. The same layout serves real (DC, transient) and
//! complex (AC) analysis.

use nalgebra::{ComplexField, DMatrix, DVector};

/// MNA system: Ax = b.
#[derive(Debug, Clone)]
pub struct MnaSystem<T: ComplexField<RealField = f64>> {
    /// The coefficient matrix (G extended with B, C and D blocks).
    pub matrix: DMatrix<T>,
    /// The right-hand side vector.
    pub rhs: DVector<T>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
    /// Number of branch-current variables.
    pub num_branches: usize,
}

impl<T: ComplexField<RealField = f64>> MnaSystem<T> {
    /// Create an empty system with the given dimensions.
    pub fn new(num_nodes: usize, num_branches: usize) -> Self {
        let size = num_nodes + num_branches;
        Self {
            matrix: DMatrix::zeros(size, size),
            rhs: DVector::zeros(size),
            num_nodes,
            num_branches,
        }
    }

    /// Total number of unknowns.
    pub fn size(&self) -> usize {
        self.num_nodes + self.num_branches
    }

    /// Row/column of branch `branch`.
    pub fn branch_row(&self, branch: usize) -> usize {
        self.num_nodes + branch
    }

    /// Stamp an admittance between two nodes (None is ground).
    pub fn stamp_admittance(&mut self, node_i: Option<usize>, node_j: Option<usize>, y: T) {
        if let Some(i) = node_i {
            self.matrix[(i, i)] += y.clone();
        }
        if let Some(j) = node_j {
            self.matrix[(j, j)] += y.clone();
        }
        if let (Some(i), Some(j)) = (node_i, node_j) {
            self.matrix[(i, j)] -= y.clone();
            self.matrix[(j, i)] -= y;
        }
    }

    /// Stamp a voltage source of value `voltage` on `branch` from `node_pos`
    /// to `node_neg`.
    pub fn stamp_voltage_source(
        &mut self,
        node_pos: Option<usize>,
        node_neg: Option<usize>,
        branch: usize,
        voltage: T,
    ) {
        let row = self.branch_row(branch);

        if let Some(i) = node_pos {
            self.matrix[(i, row)] += T::one();
            self.matrix[(row, i)] += T::one();
        }
        if let Some(j) = node_neg {
            self.matrix[(j, row)] -= T::one();
            self.matrix[(row, j)] -= T::one();
        }

        self.rhs[row] = voltage;
    }

    /// Add `value` at (`row`, `col`).
    pub fn add(&mut self, row: usize, col: usize, value: T) {
        self.matrix[(row, col)] += value;
    }

    /// Add `value` to the right-hand side at `row`.
    pub fn add_rhs(&mut self, row: usize, value: T) {
        self.rhs[row] += value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn test_stamp_resistor_to_ground() {
        let mut mna = MnaSystem::<f64>::new(2, 0);
        mna.stamp_admittance(Some(0), None, 1e-3);

        assert_eq!(mna.matrix[(0, 0)], 1e-3);
        assert_eq!(mna.matrix[(1, 1)], 0.0);
    }

    #[test]
    fn test_stamp_admittance_between_nodes() {
        let mut mna = MnaSystem::<Complex64>::new(2, 0);
        let y = Complex64::new(0.0, 2.0);
        mna.stamp_admittance(Some(0), Some(1), y);

        assert_eq!(mna.matrix[(0, 0)], y);
        assert_eq!(mna.matrix[(1, 1)], y);
        assert_eq!(mna.matrix[(0, 1)], -y);
        assert_eq!(mna.matrix[(1, 0)], -y);
    }

    #[test]
    fn test_stamp_voltage_source() {
        let mut mna = MnaSystem::<f64>::new(2, 1);
        mna.stamp_voltage_source(Some(0), Some(1), 0, 5.0);

        assert_eq!(mna.matrix[(0, 2)], 1.0);
        assert_eq!(mna.matrix[(2, 0)], 1.0);
        assert_eq!(mna.matrix[(1, 2)], -1.0);
        assert_eq!(mna.matrix[(2, 1)], -1.0);
        assert_eq!(mna.rhs[2], 5.0);
    }
}
