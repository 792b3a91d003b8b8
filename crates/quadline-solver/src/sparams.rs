//! S-parameter sweeps and network-parameter conversions.
//!
//! `calc_sp` and `calc_noise_sp` are pure functions of frequency, so sweep
//! points are independent. With the `parallel` feature they are evaluated
//! with rayon.

use nalgebra::DMatrix;
use num_complex::Complex64;
use quadline_core::{Component, ElementStamps, StampSink};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Spacing of sweep points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepScale {
    Linear,
    Logarithmic,
}

/// A frequency range sampled at `points` frequencies, endpoints included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencySweep {
    pub start: f64,
    pub stop: f64,
    pub points: usize,
    pub scale: SweepScale,
}

impl FrequencySweep {
    /// Evenly spaced frequencies.
    pub fn linear(start: f64, stop: f64, points: usize) -> Result<Self> {
        let sweep = Self {
            start,
            stop,
            points,
            scale: SweepScale::Linear,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    /// Frequencies evenly spaced in log scale. `start` must be positive.
    pub fn logarithmic(start: f64, stop: f64, points: usize) -> Result<Self> {
        let sweep = Self {
            start,
            stop,
            points,
            scale: SweepScale::Logarithmic,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    fn validate(&self) -> Result<()> {
        if self.points == 0 {
            return Err(Error::InvalidAnalysis("sweep needs at least one point".into()));
        }
        if !(self.start.is_finite() && self.stop.is_finite()) {
            return Err(Error::InvalidAnalysis("sweep bounds must be finite".into()));
        }
        if self.start < 0.0 || self.stop < self.start {
            return Err(Error::InvalidAnalysis(format!(
                "invalid sweep range {} .. {} Hz",
                self.start, self.stop
            )));
        }
        if self.scale == SweepScale::Logarithmic && self.start <= 0.0 {
            return Err(Error::InvalidAnalysis(
                "logarithmic sweep must start above 0 Hz".into(),
            ));
        }
        Ok(())
    }

    /// The sampled frequencies (Hz).
    pub fn frequencies(&self) -> Vec<f64> {
        if self.points == 1 {
            return vec![self.start];
        }
        let last = (self.points - 1) as f64;
        (0..self.points)
            .map(|k| {
                if k == self.points - 1 {
                    return self.stop;
                }
                let x = k as f64 / last;
                match self.scale {
                    SweepScale::Linear => self.start + (self.stop - self.start) * x,
                    SweepScale::Logarithmic => self.start * (self.stop / self.start).powf(x),
                }
            })
            .collect()
    }
}

/// Scattering (and optionally noise-correlation) matrix at one frequency.
#[derive(Debug, Clone)]
pub struct SParameterPoint {
    pub frequency: f64,
    pub s: DMatrix<Complex64>,
    pub noise: Option<DMatrix<Complex64>>,
}

fn evaluate_point<C: Component + ?Sized>(
    component: &C,
    frequency: f64,
    with_noise: bool,
) -> SParameterPoint {
    let mut stamps = ElementStamps::new(component.num_terminals());
    component.calc_sp(frequency, &mut stamps);
    let noise = with_noise.then(|| {
        component.calc_noise_sp(frequency, &mut stamps);
        stamps.noise().clone()
    });

    if stamps.has_non_finite() {
        log::warn!(
            "{}: non-finite S-parameters at {} Hz",
            component.name(),
            frequency
        );
    } else {
        log::trace!("{}: S-parameters at {} Hz", component.name(), frequency);
    }

    SParameterPoint {
        frequency,
        s: stamps.s_matrix().clone(),
        noise,
    }
}

/// Evaluate the S-parameters of `component` at each frequency.
///
/// Non-finite results (e.g. a vanishing denominator) are returned as-is
/// and logged.
pub fn sweep_sparameters<C: Component + Sync + ?Sized>(
    component: &C,
    frequencies: &[f64],
    with_noise: bool,
) -> Result<Vec<SParameterPoint>> {
    if let Some(f) = frequencies.iter().find(|f| !(f.is_finite() && **f >= 0.0)) {
        return Err(Error::InvalidAnalysis(format!("invalid frequency {}", f)));
    }
    log::debug!(
        "{}: S-parameter sweep over {} points{}",
        component.name(),
        frequencies.len(),
        if with_noise { " with noise" } else { "" }
    );

    #[cfg(feature = "parallel")]
    let points = {
        use rayon::prelude::*;
        frequencies
            .par_iter()
            .map(|&f| evaluate_point(component, f, with_noise))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let points = frequencies
        .iter()
        .map(|&f| evaluate_point(component, f, with_noise))
        .collect();

    Ok(points)
}

/// Convert an admittance matrix to S-parameters with reference `z0` at
/// every port: `S = (I - z0·Y)(I + z0·Y)⁻¹`.
pub fn y_to_s(y: &DMatrix<Complex64>, z0: f64) -> Result<DMatrix<Complex64>> {
    if !y.is_square() {
        return Err(Error::DimensionMismatch {
            expected: y.nrows(),
            actual: y.ncols(),
        });
    }
    let n = y.nrows();
    let identity = DMatrix::<Complex64>::identity(n, n);
    let zy = y.map(|v| v * z0);
    let inverse = (&identity + &zy)
        .try_inverse()
        .ok_or(Error::SingularMatrix)?;
    Ok((identity - zy) * inverse)
}

/// Differential-mode S-parameters for terminal pairs `(positive, negative)`.
///
/// `Sdd[i][j] = ½ (S[pi,pj] - S[pi,nj] - S[ni,pj] + S[ni,nj])`.
pub fn differential_sparameters(
    s: &DMatrix<Complex64>,
    ports: &[(usize, usize)],
) -> Result<DMatrix<Complex64>> {
    let n = s.nrows();
    if !s.is_square() {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: s.ncols(),
        });
    }
    if let Some(&(p, m)) = ports.iter().find(|&&(p, m)| p >= n || m >= n) {
        return Err(Error::DimensionMismatch {
            expected: n,
            actual: p.max(m) + 1,
        });
    }

    Ok(DMatrix::from_fn(ports.len(), ports.len(), |i, j| {
        let (pi, ni) = ports[i];
        let (pj, nj) = ports[j];
        (s[(pi, pj)] - s[(pi, nj)] - s[(ni, pj)] + s[(ni, nj)]) * 0.5
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_sweep() {
        let sweep = FrequencySweep::linear(1e6, 5e6, 5).unwrap();
        let f = sweep.frequencies();
        assert_eq!(f.len(), 5);
        assert_eq!(f[0], 1e6);
        assert!((f[2] - 3e6).abs() < 1e-6);
        assert_eq!(f[4], 5e6);
    }

    #[test]
    fn test_log_sweep() {
        let sweep = FrequencySweep::logarithmic(1e3, 1e6, 4).unwrap();
        let f = sweep.frequencies();
        assert!((f[1] - 1e4).abs() < 1e-6, "f[1] = {}", f[1]);
        assert!((f[2] - 1e5).abs() < 1e-5, "f[2] = {}", f[2]);
        assert_eq!(f[3], 1e6);
    }

    #[test]
    fn test_single_point_sweep() {
        let sweep = FrequencySweep::linear(2e9, 2e9, 1).unwrap();
        assert_eq!(sweep.frequencies(), vec![2e9]);
    }

    #[test]
    fn test_invalid_sweeps() {
        assert!(FrequencySweep::linear(1e6, 1e3, 10).is_err());
        assert!(FrequencySweep::linear(0.0, 1e3, 0).is_err());
        assert!(FrequencySweep::logarithmic(0.0, 1e9, 10).is_err());
        assert!(FrequencySweep::linear(0.0, f64::INFINITY, 10).is_err());
    }

    #[test]
    fn test_y_to_s_matched_load() {
        // A 50 Ω shunt at a 50 Ω port reflects nothing
        let y = DMatrix::from_element(1, 1, Complex64::new(1.0 / 50.0, 0.0));
        let s = y_to_s(&y, 50.0).unwrap();
        assert!(s[(0, 0)].norm() < 1e-15);
    }

    #[test]
    fn test_y_to_s_open() {
        let y = DMatrix::<Complex64>::zeros(2, 2);
        let s = y_to_s(&y, 50.0).unwrap();
        assert_eq!(s, DMatrix::identity(2, 2));
    }

    #[test]
    fn test_differential_of_antisymmetric_pair() {
        // Two-terminal S where the pair behaves as a single matched port
        let half = Complex64::new(0.5, 0.0);
        let s = DMatrix::from_row_slice(2, 2, &[half, half, half, half]);
        let sdd = differential_sparameters(&s, &[(0, 1)]).unwrap();
        assert_eq!(sdd[(0, 0)], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_differential_rejects_bad_port() {
        let s = DMatrix::<Complex64>::zeros(4, 4);
        assert!(matches!(
            differential_sparameters(&s, &[(0, 4)]),
            Err(Error::DimensionMismatch {
                expected: 4,
                actual: 5
            })
        ));
    }
}
