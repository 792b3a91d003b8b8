//! Result types for transient analysis.

use nalgebra::DVector;

/// A single timepoint in a transient simulation result.
#[derive(Debug, Clone)]
pub struct TimePoint {
    /// Time value (s).
    pub time: f64,
    /// Solution vector at this time.
    pub solution: DVector<f64>,
}

/// Result of a transient simulation.
#[derive(Debug, Clone)]
pub struct TransientResult {
    /// All computed timepoints.
    pub points: Vec<TimePoint>,
    /// Number of nodes (excluding ground).
    pub num_nodes: usize,
    /// Timestep actually used (s).
    pub tstep: f64,
}

impl TransientResult {
    /// Get the voltage at a node across all timepoints. Ground reads 0 V.
    pub fn voltage_waveform(&self, node: Option<usize>) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|tp| (tp.time, node.map(|i| tp.solution[i]).unwrap_or(0.0)))
            .collect()
    }

    /// Get all time values.
    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|tp| tp.time).collect()
    }

    /// Interpolate the solution at a specific time.
    ///
    /// Uses linear interpolation between the two nearest timepoints and
    /// clamps to the first/last point outside the simulated range. Returns
    /// None for an empty result.
    pub fn interpolate_at(&self, time: f64) -> Option<DVector<f64>> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        if time <= first.time {
            return Some(first.solution.clone());
        }
        if time >= last.time {
            return Some(last.solution.clone());
        }

        // first.time < time < last.time, so 1 <= i < len
        let i = self.points.partition_point(|tp| tp.time <= time);
        let (p0, p1) = (&self.points[i - 1], &self.points[i]);
        let alpha = (time - p0.time) / (p1.time - p0.time);
        Some(&p0.solution * (1.0 - alpha) + &p1.solution * alpha)
    }

    /// Get the voltage at a node at a specific time (interpolated).
    pub fn voltage_at(&self, node: Option<usize>, time: f64) -> Option<f64> {
        match node {
            Some(i) => self.interpolate_at(time).map(|sol| sol[i]),
            None => Some(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn ramp() -> TransientResult {
        TransientResult {
            points: (0..=4)
                .map(|k| TimePoint {
                    time: k as f64,
                    solution: dvector![2.0 * k as f64],
                })
                .collect(),
            num_nodes: 1,
            tstep: 1.0,
        }
    }

    #[test]
    fn test_interpolate_between_points() {
        let result = ramp();
        let v = result.voltage_at(Some(0), 2.5).unwrap();
        assert!((v - 5.0).abs() < 1e-12, "v = {}", v);
    }

    #[test]
    fn test_interpolate_clamps_to_range() {
        let result = ramp();
        assert_eq!(result.voltage_at(Some(0), -1.0), Some(0.0));
        assert_eq!(result.voltage_at(Some(0), 10.0), Some(8.0));
        assert_eq!(result.voltage_at(None, 2.0), Some(0.0));
    }

    #[test]
    fn test_empty_result() {
        let result = TransientResult {
            points: Vec::new(),
            num_nodes: 0,
            tstep: 1.0,
        };
        assert!(result.interpolate_at(0.0).is_none());
    }

    #[test]
    fn test_waveform() {
        let result = ramp();
        let wave = result.voltage_waveform(Some(0));
        assert_eq!(wave.len(), 5);
        assert_eq!(wave[3], (3.0, 6.0));
        assert_eq!(result.times(), vec![0.0, 1.0, 2.0, 3.0, 4.0]);
    }
}
