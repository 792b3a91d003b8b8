//! Per-element stamp storage.
//!
//! An element writes its contributions for the current analysis into a
//! [`StampSink`], addressed by local terminal and auxiliary-branch indices.
//! The surrounding solver maps those local indices onto its global system.
//!
//! The MNA blocks follow the usual augmented layout:
//!
//! ```text
//! [ G  B ] [ v ]   [ i ]
//! [ C  D ] [ j ] = [ e ]
//! ```
//!
//! where `j` are the auxiliary branch currents an element allocates with
//! [`StampSink::set_voltage_sources`]. Every setter is an assignment; a sink
//! never accumulates.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use num_traits::Zero;

/// Write target for element contributions.
pub trait StampSink {
    /// Set one S-parameter entry.
    fn set_s(&mut self, row: usize, col: usize, value: Complex64);

    /// Set one admittance entry.
    fn set_y(&mut self, row: usize, col: usize, value: Complex64);

    /// Replace the noise-correlation matrix.
    fn set_matrix_n(&mut self, n: DMatrix<Complex64>);

    /// The most recently stamped scattering matrix.
    fn s_matrix(&self) -> &DMatrix<Complex64>;

    /// The most recently stamped admittance matrix.
    fn y_matrix(&self) -> &DMatrix<Complex64>;

    /// Declare how many auxiliary branch currents the element needs.
    fn set_voltage_sources(&mut self, count: usize);

    /// Number of auxiliary branch currents currently declared.
    fn voltage_sources(&self) -> usize;

    /// (Re)allocate the B, C, D and E blocks for the declared branch count.
    fn alloc_matrix_mna(&mut self);

    /// Set a B entry: coupling of `branch` current into KCL at `node`.
    fn set_b(&mut self, node: usize, branch: usize, value: f64);

    /// Set a C entry: coefficient of `node` voltage in `branch` equation.
    fn set_c(&mut self, branch: usize, node: usize, value: f64);

    /// Set a D entry: coefficient of `col` current in `row` branch equation.
    fn set_d(&mut self, row: usize, col: usize, value: f64);

    /// Set the excitation (right-hand side) of a branch equation.
    fn set_e(&mut self, branch: usize, value: f64);

    /// Stamp an ideal 0 V source on `branch` between `pos` and `neg`.
    fn voltage_source(&mut self, branch: usize, pos: usize, neg: usize) {
        self.set_b(pos, branch, 1.0);
        self.set_b(neg, branch, -1.0);
        self.set_c(branch, pos, 1.0);
        self.set_c(branch, neg, -1.0);
        self.set_e(branch, 0.0);
    }
}

/// Dense stamp storage for a single element.
#[derive(Debug, Clone)]
pub struct ElementStamps {
    size: usize,
    s: DMatrix<Complex64>,
    y: DMatrix<Complex64>,
    n: DMatrix<Complex64>,
    vsources: usize,
    b: DMatrix<f64>,
    c: DMatrix<f64>,
    d: DMatrix<f64>,
    e: DVector<f64>,
}

impl ElementStamps {
    /// Create empty storage for an element with `size` terminals.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            s: DMatrix::zeros(size, size),
            y: DMatrix::zeros(size, size),
            n: DMatrix::zeros(size, size),
            vsources: 0,
            b: DMatrix::zeros(size, 0),
            c: DMatrix::zeros(0, size),
            d: DMatrix::zeros(0, 0),
            e: DVector::zeros(0),
        }
    }

    /// Number of terminals.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reset every block to zero and drop the auxiliary branches.
    pub fn clear(&mut self) {
        self.s.fill(Complex64::zero());
        self.y.fill(Complex64::zero());
        self.n.fill(Complex64::zero());
        self.vsources = 0;
        self.alloc_matrix_mna();
    }

    /// Noise-correlation matrix.
    pub fn noise(&self) -> &DMatrix<Complex64> {
        &self.n
    }

    /// Node-to-branch coupling block (size × branches).
    pub fn b(&self) -> &DMatrix<f64> {
        &self.b
    }

    /// Branch-to-node coupling block (branches × size).
    pub fn c(&self) -> &DMatrix<f64> {
        &self.c
    }

    /// Branch-to-branch block (branches × branches).
    pub fn d(&self) -> &DMatrix<f64> {
        &self.d
    }

    /// Branch excitations.
    pub fn e(&self) -> &DVector<f64> {
        &self.e
    }

    /// Whether any stamped entry is NaN or infinite.
    pub fn has_non_finite(&self) -> bool {
        let complex_bad = |m: &DMatrix<Complex64>| m.iter().any(|v| !v.is_finite());
        let real_bad = |m: &[f64]| m.iter().any(|v| !v.is_finite());
        complex_bad(&self.s)
            || complex_bad(&self.y)
            || complex_bad(&self.n)
            || real_bad(self.b.as_slice())
            || real_bad(self.c.as_slice())
            || real_bad(self.d.as_slice())
            || real_bad(self.e.as_slice())
    }
}

impl StampSink for ElementStamps {
    fn set_s(&mut self, row: usize, col: usize, value: Complex64) {
        self.s[(row, col)] = value;
    }

    fn set_y(&mut self, row: usize, col: usize, value: Complex64) {
        self.y[(row, col)] = value;
    }

    fn set_matrix_n(&mut self, n: DMatrix<Complex64>) {
        debug_assert_eq!(n.shape(), (self.size, self.size));
        self.n = n;
    }

    fn s_matrix(&self) -> &DMatrix<Complex64> {
        &self.s
    }

    fn y_matrix(&self) -> &DMatrix<Complex64> {
        &self.y
    }

    fn set_voltage_sources(&mut self, count: usize) {
        self.vsources = count;
    }

    fn voltage_sources(&self) -> usize {
        self.vsources
    }

    fn alloc_matrix_mna(&mut self) {
        let m = self.vsources;
        self.b = DMatrix::zeros(self.size, m);
        self.c = DMatrix::zeros(m, self.size);
        self.d = DMatrix::zeros(m, m);
        self.e = DVector::zeros(m);
    }

    fn set_b(&mut self, node: usize, branch: usize, value: f64) {
        self.b[(node, branch)] = value;
    }

    fn set_c(&mut self, branch: usize, node: usize, value: f64) {
        self.c[(branch, node)] = value;
    }

    fn set_d(&mut self, row: usize, col: usize, value: f64) {
        self.d[(row, col)] = value;
    }

    fn set_e(&mut self, branch: usize, value: f64) {
        self.e[branch] = value;
    }
}
