//! Analysis entry points exposed to a solver.

use crate::error::Result;
use crate::stamps::StampSink;

/// A circuit element driven once per solved point by an analysis driver.
///
/// The driver selects the entry points for its current analysis: `init_*`
/// once per run, `calc_*` once per frequency, time step or DC point. Each
/// call writes the element's contributions into the given sink; the element
/// never drives the solver.
pub trait Component {
    /// Instance name (e.g. "T1").
    fn name(&self) -> &str;

    /// Number of terminals.
    fn num_terminals(&self) -> usize;

    /// Stamp the scattering matrix at `frequency` (Hz).
    fn calc_sp(&self, frequency: f64, sink: &mut dyn StampSink);

    /// Stamp the noise-correlation matrix from the scattering matrix
    /// previously written into `sink`.
    fn calc_noise_sp(&self, frequency: f64, sink: &mut dyn StampSink);

    /// Stamp the noise-correlation matrix from the admittance matrix
    /// previously written into `sink`.
    fn calc_noise_ac(&self, frequency: f64, sink: &mut dyn StampSink);

    /// Prepare for DC operating-point analysis.
    fn init_dc(&mut self, sink: &mut dyn StampSink);

    /// Prepare for AC analysis.
    fn init_ac(&mut self, sink: &mut dyn StampSink);

    /// Stamp AC contributions at `frequency` (Hz).
    fn calc_ac(&self, frequency: f64, sink: &mut dyn StampSink);

    /// Prepare for transient analysis. Discards any stored history.
    fn init_tr(&mut self, sink: &mut dyn StampSink);

    /// Stamp transient contributions at `time` (s).
    fn calc_tr(&self, time: f64, sink: &mut dyn StampSink);

    /// Record the solution of an accepted transient point.
    ///
    /// `voltages` holds one entry per terminal, `currents` one per auxiliary
    /// branch declared during `init_tr`.
    fn accept_step(&mut self, _time: f64, _voltages: &[f64], _currents: &[f64]) -> Result<()> {
        Ok(())
    }

    /// Largest time step the element tolerates, if it constrains one.
    fn max_time_step(&self) -> Option<f64> {
        None
    }
}
