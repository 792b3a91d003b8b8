//! Device models for quadline.
//!
//! This crate provides:
//! - [`TransmissionLine4`]: lossy four-terminal transmission line with
//!   S-parameter, AC, DC, transient and noise stamps
//! - [`History`]: time-ordered sample store backing the delay-line
//!   transient model

pub mod history;
pub mod tline;

pub use history::{History, Series};
pub use tline::{
    AdmittanceTerms, Branch, Representation, ScatteringTerms, Signal, Terminal,
    TransmissionLine4,
};
