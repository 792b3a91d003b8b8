//! Table and JSON output.

use anyhow::Result;
use nalgebra::DMatrix;
use num_complex::Complex64;
use quadline_solver::SParameterPoint;
use serde::Serialize;

/// Magnitude in dB.
pub fn db(value: Complex64) -> f64 {
    20.0 * value.norm().log10()
}

/// Phase in degrees.
pub fn phase_deg(value: Complex64) -> f64 {
    value.arg().to_degrees()
}

/// A complex value as `[re, im]` for JSON.
fn pair(value: Complex64) -> [f64; 2] {
    [value.re, value.im]
}

/// One S-parameter sweep point.
#[derive(Debug, Clone, Serialize)]
pub struct SParamRow {
    pub frequency: f64,
    pub s11: [f64; 2],
    pub s12: [f64; 2],
    pub s13: [f64; 2],
    pub s14: [f64; 2],
    pub sdd11: [f64; 2],
    pub sdd21: [f64; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub noise11: Option<f64>,
}

impl SParamRow {
    pub fn new(point: &SParameterPoint, sdd: &DMatrix<Complex64>) -> Self {
        let s = &point.s;
        Self {
            frequency: point.frequency,
            s11: pair(s[(0, 0)]),
            s12: pair(s[(0, 1)]),
            s13: pair(s[(0, 2)]),
            s14: pair(s[(0, 3)]),
            sdd11: pair(sdd[(0, 0)]),
            sdd21: pair(sdd[(1, 0)]),
            noise11: point.noise.as_ref().map(|n| n[(0, 0)].re),
        }
    }
}

fn complex(value: [f64; 2]) -> Complex64 {
    Complex64::new(value[0], value[1])
}

pub fn print_sparams_table(rows: &[SParamRow], noise: bool) {
    print!(
        "{:>14} {:>10} {:>10} {:>10} {:>10} {:>11} {:>11} {:>10}",
        "Freq (Hz)", "S11 (dB)", "S12 (dB)", "S13 (dB)", "S14 (dB)", "Sdd11 (dB)", "Sdd21 (dB)",
        "Sdd21 (°)"
    );
    if noise {
        print!(" {:>10}", "N11");
    }
    println!();

    for row in rows {
        print!(
            "{:>14.6e} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>11.3} {:>11.3} {:>10.2}",
            row.frequency,
            db(complex(row.s11)),
            db(complex(row.s12)),
            db(complex(row.s13)),
            db(complex(row.s14)),
            db(complex(row.sdd11)),
            db(complex(row.sdd21)),
            phase_deg(complex(row.sdd21)),
        );
        if let Some(n) = row.noise11 {
            print!(" {:>10.4e}", n);
        }
        println!();
    }
}

pub fn print_sparams_json(rows: &[SParamRow]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

/// Near- and far-end port voltages at one timepoint.
#[derive(Debug, Clone, Serialize)]
pub struct TransientRow {
    pub time: f64,
    pub near: f64,
    pub far: f64,
}

pub fn print_transient_table(rows: &[TransientRow]) {
    println!("{:>14} {:>12} {:>12}", "Time (s)", "V(near)", "V(far)");
    for row in rows {
        println!("{:>14.6e} {:>12.6} {:>12.6}", row.time, row.near, row.far);
    }
}

pub fn print_transient_json(rows: &[TransientRow]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(rows)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db() {
        assert!((db(Complex64::new(0.1, 0.0)) + 20.0).abs() < 1e-12);
        assert!((db(Complex64::new(0.0, 1.0))).abs() < 1e-12);
    }

    #[test]
    fn test_phase() {
        assert!((phase_deg(Complex64::new(0.0, 1.0)) - 90.0).abs() < 1e-12);
    }

    #[test]
    fn test_row_json_omits_missing_noise() {
        let point = SParameterPoint {
            frequency: 1e9,
            s: DMatrix::from_element(4, 4, Complex64::new(0.5, 0.0)),
            noise: None,
        };
        let sdd = DMatrix::zeros(2, 2);
        let json = serde_json::to_string(&SParamRow::new(&point, &sdd)).unwrap();
        assert!(json.contains("\"s11\":[0.5,0.0]"), "{}", json);
        assert!(!json.contains("noise11"));
    }
}
