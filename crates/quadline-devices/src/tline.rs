//! Lossy four-terminal transmission line.
//!
//! A two-conductor line with physical length `L`, characteristic impedance
//! `Z` and attenuation factor `Alpha`, seen by the circuit as four terminals:
//!
//! ```text
//!   N1 o------------------------------o N2
//!         ==========  Z, L  ==========
//!   N4 o------------------------------o N3
//! ```
//!
//! Port 1 is (N1, N4), port 2 is (N2, N3). N1–N2 and N3–N4 are the two
//! conductors.
//!
//! The propagation constant is `γ = α + jβ` with `α = ln(Alpha)/2` and
//! `β = 2πf/C0`. From it the model produces:
//!
//! - **S-parameters**: closed-form 4×4 scattering matrix referenced to `z0`
//!   at every terminal.
//! - **AC**: 4×4 admittance stamp built from `coth(γL)/Z` and `csch(γL)/Z`.
//! - **DC**: two ideal shorts, N1–N2 and N3–N4.
//! - **Transient**: a Bergeron traveling-wave companion. Each port is a
//!   resistor `Z` in series with a source driven by the state seen at the
//!   other port one delay `T = L/C0` earlier:
//!
//!   ```text
//!   u1(t) - Z·i1(t) = k·[u2(t-T) + Z·i2(t-T)]
//!   u2(t) - Z·i2(t) = k·[u1(t-T) + Z·i1(t-T)]
//!   ```
//!
//!   with `k = exp(-α·L)` the one-way amplitude loss.
//! - **Noise**: Bosma's theorem applied to S or to Y.
//!
//! Zero-length lines degenerate to the ideal-short model in AC and transient
//! analysis.

use nalgebra::DMatrix;
use num_complex::Complex64;
use quadline_core::{
    C0, Component, Error, LineParams, PropertySource, Result, StampSink, T0, Z0, kelvin,
};

use crate::history::History;

/// Terminals of the four-terminal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    /// Port 1, first conductor.
    N1,
    /// Port 2, first conductor.
    N2,
    /// Port 2, second conductor.
    N3,
    /// Port 1, second conductor.
    N4,
}

impl Terminal {
    /// All terminals in stamp order.
    pub const ALL: [Terminal; 4] = [Terminal::N1, Terminal::N2, Terminal::N3, Terminal::N4];

    /// Local stamp index.
    pub const fn index(self) -> usize {
        match self {
            Terminal::N1 => 0,
            Terminal::N2 => 1,
            Terminal::N3 => 2,
            Terminal::N4 => 3,
        }
    }
}

/// Auxiliary branch currents allocated by the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Port 1 companion source (delay line) or N1–N2 short.
    B1,
    /// Port 2 companion source (delay line) or N3–N4 short.
    B2,
}

impl Branch {
    /// All branches in stamp order.
    pub const ALL: [Branch; 2] = [Branch::B1, Branch::B2];

    /// Local branch index.
    pub const fn index(self) -> usize {
        match self {
            Branch::B1 => 0,
            Branch::B2 => 1,
        }
    }
}

/// Signals tracked by the delay-line history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    /// Terminal voltage.
    Voltage(Terminal),
    /// Auxiliary branch current.
    Current(Branch),
}

/// Equivalent circuit chosen when an analysis is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// Distributed line: admittance stamp (AC) or traveling-wave companion
    /// (transient).
    DelayLine,
    /// Two ideal 0 V sources, N1–N2 and N3–N4.
    IdealShort,
}

/// The three distinct values of the scattering matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatteringTerms {
    /// Reflection at every terminal (diagonal).
    pub reflection: Complex64,
    /// Coupling between the terminals of one port (N1–N4, N2–N3).
    pub opposite: Complex64,
    /// Coupling along a conductor (N1–N2, N3–N4); N1–N3 and N2–N4 carry the
    /// negated value.
    pub transmission: Complex64,
}

/// The two distinct values of the admittance matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmittanceTerms {
    /// `coth(γL)/Z`: diagonal, negated on N1–N4 and N2–N3.
    pub self_term: Complex64,
    /// `-csch(γL)/Z`: N1–N2 and N3–N4, negated on N1–N3 and N2–N4.
    pub cross: Complex64,
}

/// A lossy four-terminal transmission line.
#[derive(Debug, Clone)]
pub struct TransmissionLine4 {
    /// Device name (e.g., "T1").
    pub name: String,
    /// Physical parameters.
    pub params: LineParams,
    /// Reference impedance of every terminal for S-parameters (Ω).
    pub z0: f64,
    representation: Option<Representation>,
    history: Option<History<Signal>>,
}

impl TransmissionLine4 {
    /// Terminal pairs `(positive, negative)` forming port 1 and port 2.
    pub const PORTS: [(usize, usize); 2] = [
        (Terminal::N1.index(), Terminal::N4.index()),
        (Terminal::N2.index(), Terminal::N3.index()),
    ];

    /// Create a line referenced to the default 50 Ω.
    pub fn new(name: impl Into<String>, params: LineParams) -> Self {
        Self {
            name: name.into(),
            params,
            z0: Z0,
            representation: None,
            history: None,
        }
    }

    /// Create a line from named properties (`L`, `Z`, `Alpha`, `Temp`).
    pub fn from_properties(name: impl Into<String>, props: &dyn PropertySource) -> Result<Self> {
        Ok(Self::new(name, LineParams::from_properties(props)?))
    }

    /// Use a different S-parameter reference impedance.
    pub fn with_reference_impedance(mut self, z0: f64) -> Self {
        self.z0 = z0;
        self
    }

    /// Attenuation constant `α = ln(Alpha)/2`.
    pub fn attenuation_constant(&self) -> f64 {
        self.params.alpha.ln() / 2.0
    }

    /// Phase constant `β = 2πf/C0`.
    pub fn phase_constant(&self, frequency: f64) -> f64 {
        2.0 * std::f64::consts::PI * frequency / C0
    }

    /// Propagation constant `γ = α + jβ`.
    pub fn propagation_constant(&self, frequency: f64) -> Complex64 {
        Complex64::new(self.attenuation_constant(), self.phase_constant(frequency))
    }

    /// One-way propagation delay `L/C0` (s).
    pub fn delay(&self) -> f64 {
        self.params.length / C0
    }

    /// One-way amplitude factor `exp(-α·L)` applied to the traveling wave.
    ///
    /// Not `exp(-α/2·L)`: only the full `α·L` reproduces the `e^{-γL}`
    /// transmission of the S and Y stamps.
    pub fn attenuation_factor(&self) -> f64 {
        (-self.attenuation_constant() * self.params.length).exp()
    }

    /// Representation chosen by the last `init_*` call.
    pub fn representation(&self) -> Option<Representation> {
        self.representation
    }

    /// Delay-line history, present only during a transient run with `L > 0`.
    pub fn history(&self) -> Option<&History<Signal>> {
        self.history.as_ref()
    }

    /// Scattering-matrix values at `frequency`.
    ///
    /// With `p = 2z0 + Z`, `n = 2z0 - Z`, `e = exp(2γL)` and
    /// `d = p²e - n²`:
    /// `reflection = Z(pe + n)/d`, `opposite = 1 - reflection`,
    /// `transmission = 4·Z·z0·exp(γL)/d`.
    ///
    /// A vanishing `d` yields non-finite values; they are not clamped.
    pub fn scattering_terms(&self, frequency: f64) -> ScatteringTerms {
        let z = self.params.z;
        let gl = self.propagation_constant(frequency) * self.params.length;
        let p = 2.0 * self.z0 + z;
        let n = 2.0 * self.z0 - z;
        let e = (2.0 * gl).exp();
        let d = p * p * e - n * n;

        let reflection = z * (p * e + n) / d;
        ScatteringTerms {
            reflection,
            opposite: 1.0 - reflection,
            transmission: 4.0 * z * self.z0 * gl.exp() / d,
        }
    }

    /// Admittance-matrix values at `frequency`. Infinite at `L = 0`.
    pub fn admittance_terms(&self, frequency: f64) -> AdmittanceTerms {
        let z = self.params.z;
        let gl = self.propagation_constant(frequency) * self.params.length;
        AdmittanceTerms {
            self_term: gl.cosh() / gl.sinh() / z,
            cross: -gl.sinh().inv() / z,
        }
    }

    /// Terminal voltage at `time` from the delay-line history (0.0 without
    /// history or before the first sample).
    pub fn retarded_voltage(&self, terminal: Terminal, time: f64) -> f64 {
        self.history
            .as_ref()
            .map(|h| h.value_at(Signal::Voltage(terminal), time))
            .unwrap_or(0.0)
    }

    /// Branch current at `time` from the delay-line history.
    pub fn retarded_current(&self, branch: Branch, time: f64) -> f64 {
        self.history
            .as_ref()
            .map(|h| h.value_at(Signal::Current(branch), time))
            .unwrap_or(0.0)
    }

    /// Companion source values `[E1, E2]` at `time`, or `None` when the line
    /// is not in delay-line transient mode.
    pub fn excitations(&self, time: f64) -> Option<[f64; 2]> {
        let delay = self.delay();
        if self.history.is_none() || delay <= 0.0 {
            return None;
        }

        let z = self.params.z;
        let k = self.attenuation_factor();
        let tr = time - delay;
        let v = |t| self.retarded_voltage(t, tr);
        let j = |b| self.retarded_current(b, tr);

        Some([
            k * (v(Terminal::N2) - v(Terminal::N3) + z * j(Branch::B2)),
            k * (v(Terminal::N1) - v(Terminal::N4) + z * j(Branch::B1)),
        ])
    }

    fn set_representation(&mut self, representation: Representation) {
        log::debug!("{}: using {:?} representation", self.name, representation);
        self.representation = Some(representation);
    }

    fn stamp_ideal_shorts(&mut self, sink: &mut dyn StampSink) {
        self.set_representation(Representation::IdealShort);
        sink.set_voltage_sources(2);
        sink.alloc_matrix_mna();
        sink.voltage_source(Branch::B1.index(), Terminal::N1.index(), Terminal::N2.index());
        sink.voltage_source(Branch::B2.index(), Terminal::N3.index(), Terminal::N4.index());
    }

    fn noise_temperature_ratio(&self) -> f64 {
        kelvin(self.params.temp) / T0
    }
}

/// Lay out a symmetric four-terminal matrix from its three distinct values.
///
/// `across` sits on N1–N4 and N2–N3, `along` on N1–N2 and N3–N4, and
/// `-along` on N1–N3 and N2–N4.
fn four_terminal_pattern(
    diag: Complex64,
    across: Complex64,
    along: Complex64,
) -> [[Complex64; 4]; 4] {
    let cross = -along;
    [
        [diag, along, cross, across],
        [along, diag, across, cross],
        [cross, across, diag, along],
        [across, cross, along, diag],
    ]
}

impl Component for TransmissionLine4 {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_terminals(&self) -> usize {
        4
    }

    fn calc_sp(&self, frequency: f64, sink: &mut dyn StampSink) {
        let s = self.scattering_terms(frequency);
        log::trace!("{}: S at {} Hz: {:?}", self.name, frequency, s);

        let m = four_terminal_pattern(s.reflection, s.opposite, s.transmission);
        for (row, values) in m.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                sink.set_s(row, col, value);
            }
        }
    }

    fn calc_noise_sp(&self, _frequency: f64, sink: &mut dyn StampSink) {
        if self.params.length < 0.0 {
            return;
        }
        // Bosma: N = T/T0 · (I - S·S^H)
        let s = sink.s_matrix();
        let identity = DMatrix::<Complex64>::identity(s.nrows(), s.ncols());
        let n = (identity - s * s.adjoint()).scale(self.noise_temperature_ratio());
        sink.set_matrix_n(n);
    }

    fn calc_noise_ac(&self, _frequency: f64, sink: &mut dyn StampSink) {
        if self.params.length < 0.0 {
            return;
        }
        // Bosma: N = 4·T/T0 · Re(Y)
        let scale = 4.0 * self.noise_temperature_ratio();
        let n = sink.y_matrix().map(|y| Complex64::new(scale * y.re, 0.0));
        sink.set_matrix_n(n);
    }

    fn init_dc(&mut self, sink: &mut dyn StampSink) {
        self.history = None;
        self.stamp_ideal_shorts(sink);
    }

    fn init_ac(&mut self, sink: &mut dyn StampSink) {
        self.history = None;
        if self.params.length != 0.0 {
            self.set_representation(Representation::DelayLine);
            sink.set_voltage_sources(0);
            sink.alloc_matrix_mna();
        } else {
            self.stamp_ideal_shorts(sink);
        }
    }

    fn calc_ac(&self, frequency: f64, sink: &mut dyn StampSink) {
        if self.representation != Some(Representation::DelayLine) {
            return;
        }
        let y = self.admittance_terms(frequency);
        let m = four_terminal_pattern(y.self_term, -y.self_term, y.cross);
        for (row, values) in m.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                sink.set_y(row, col, value);
            }
        }
    }

    fn init_tr(&mut self, sink: &mut dyn StampSink) {
        self.history = None;

        if self.params.length <= 0.0 {
            self.stamp_ideal_shorts(sink);
            return;
        }

        self.set_representation(Representation::DelayLine);
        sink.set_voltage_sources(2);
        sink.alloc_matrix_mna();
        self.history = Some(History::new(self.delay()));
        log::debug!("{}: delay line with T = {:e} s", self.name, self.delay());

        let (b1, b2) = (Branch::B1.index(), Branch::B2.index());
        let (n1, n2, n3, n4) = (
            Terminal::N1.index(),
            Terminal::N2.index(),
            Terminal::N3.index(),
            Terminal::N4.index(),
        );
        let z = self.params.z;

        // Branch 1 drives port 1 (N1, N4), branch 2 drives port 2 (N2, N3)
        sink.set_b(n1, b1, 1.0);
        sink.set_b(n4, b1, -1.0);
        sink.set_b(n2, b2, 1.0);
        sink.set_b(n3, b2, -1.0);
        sink.set_c(b1, n1, 1.0);
        sink.set_c(b1, n4, -1.0);
        sink.set_c(b2, n2, 1.0);
        sink.set_c(b2, n3, -1.0);
        // Characteristic impedance as the companion resistor
        sink.set_d(b1, b1, -z);
        sink.set_d(b2, b2, -z);
    }

    fn calc_tr(&self, time: f64, sink: &mut dyn StampSink) {
        if self.representation != Some(Representation::DelayLine) {
            return;
        }
        if let Some([e1, e2]) = self.excitations(time) {
            sink.set_e(Branch::B1.index(), e1);
            sink.set_e(Branch::B2.index(), e2);
        }
    }

    fn accept_step(&mut self, time: f64, voltages: &[f64], currents: &[f64]) -> Result<()> {
        let Some(history) = self.history.as_mut() else {
            return Ok(());
        };
        if voltages.len() != Terminal::ALL.len() {
            return Err(Error::DimensionMismatch {
                expected: Terminal::ALL.len(),
                actual: voltages.len(),
            });
        }
        if currents.len() != Branch::ALL.len() {
            return Err(Error::DimensionMismatch {
                expected: Branch::ALL.len(),
                actual: currents.len(),
            });
        }

        for terminal in Terminal::ALL {
            history.record(Signal::Voltage(terminal), time, voltages[terminal.index()])?;
        }
        for branch in Branch::ALL {
            history.record(Signal::Current(branch), time, currents[branch.index()])?;
        }
        Ok(())
    }

    fn max_time_step(&self) -> Option<f64> {
        self.history.as_ref().map(|_| self.delay())
    }
}
