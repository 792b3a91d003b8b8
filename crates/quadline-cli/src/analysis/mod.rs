//! Analysis runners for S-parameter sweeps and transient simulation.

pub mod sparams;
pub mod transient;

pub use sparams::run_sparams;
pub use transient::run_transient;
