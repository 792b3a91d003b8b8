//! Type definitions for transient analysis.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Transient analysis parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransientParams {
    /// Stop time (s).
    pub tstop: f64,
    /// Requested timestep (s). Reduced to the smallest element delay when
    /// that is shorter.
    pub tstep: f64,
}

impl TransientParams {
    /// Create transient parameters.
    pub fn new(tstop: f64, tstep: f64) -> Self {
        Self { tstop, tstep }
    }

    /// Check that both times are finite and positive.
    pub fn validate(&self) -> Result<()> {
        if !(self.tstep.is_finite() && self.tstep > 0.0) {
            return Err(Error::InvalidAnalysis(format!(
                "timestep must be positive, got {}",
                self.tstep
            )));
        }
        if !(self.tstop.is_finite() && self.tstop > 0.0) {
            return Err(Error::InvalidAnalysis(format!(
                "stop time must be positive, got {}",
                self.tstop
            )));
        }
        Ok(())
    }
}
