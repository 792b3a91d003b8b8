//! S-parameter sweep of the line.

use anyhow::{Context, Result};
use quadline_devices::TransmissionLine4;
use quadline_solver::{FrequencySweep, differential_sparameters, sweep_sparameters};

use crate::output::{SParamRow, print_sparams_json, print_sparams_table};

/// Sweep the line and print single-ended and differential results.
pub fn run_sparams(
    line: &TransmissionLine4,
    sweep: &FrequencySweep,
    noise: bool,
    json: bool,
) -> Result<()> {
    let frequencies = sweep.frequencies();
    let points = sweep_sparameters(line, &frequencies, noise).context("S-parameter sweep")?;

    let rows = points
        .iter()
        .map(|p| {
            let sdd = differential_sparameters(&p.s, &TransmissionLine4::PORTS)?;
            Ok(SParamRow::new(p, &sdd))
        })
        .collect::<quadline_solver::Result<Vec<_>>>()
        .context("differential conversion")?;

    if json {
        print_sparams_json(&rows)
    } else {
        let p = &line.params;
        println!(
            "S-Parameter Sweep (L = {} m, Z = {} Ω, Alpha = {}, z0 = {} Ω)",
            p.length, p.z, p.alpha, line.z0
        );
        println!("==========================================");
        println!();
        print_sparams_table(&rows, noise);
        Ok(())
    }
}
