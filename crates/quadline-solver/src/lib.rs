//! Reference MNA driver for quadline components.
//!
//! This crate assembles element stamps into a dense global system and
//! provides:
//! - DC operating point ([`solve_dc`])
//! - AC small-signal analysis ([`solve_ac`])
//! - Fixed-step transient analysis with delay-line history ([`solve_transient`])
//! - S-parameter and noise sweeps of a single component ([`sweep_sparameters`])
//! - Y→S and mixed-mode conversions for cross-checking
//!
//! # Features
//!
//! - `parallel`: evaluate S-parameter sweep points with rayon

mod assembly;
pub mod ac;
pub mod circuit;
pub mod dc;
pub mod error;
pub mod linear;
pub mod mna;
pub mod sparams;
pub mod transient;

pub use ac::{AcSolution, solve_ac};
pub use circuit::{Circuit, Resistor, VoltageSource, Waveform};
pub use dc::{DcSolution, solve_dc};
pub use error::{Error, Result};
pub use linear::{solve_complex, solve_dense};
pub use mna::MnaSystem;
pub use sparams::{
    FrequencySweep, SParameterPoint, SweepScale, differential_sparameters, sweep_sparameters,
    y_to_s,
};
pub use transient::{
    MAX_TIME_POINTS, TimePoint, TransientParams, TransientResult, solve_transient,
};
