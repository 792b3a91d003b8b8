//! Transient analysis.
//!
//! Fixed-step time-domain simulation of resistive circuits containing
//! delay-line components.
//!
//! - [`types`] - Analysis parameters
//! - [`result`] - Result types with interpolation support
//! - [`solver`] - The stepping driver

pub mod result;
pub mod solver;
pub mod types;

pub use result::{TimePoint, TransientResult};
pub use solver::{MAX_TIME_POINTS, solve_transient};
pub use types::TransientParams;
