//! Physical constants used by the line model.

/// Propagation reference speed: speed of light in vacuum (m/s).
pub const C0: f64 = 299_792_458.0;

/// Reference noise temperature (K).
pub const T0: f64 = 290.0;

/// Default port reference impedance (Ω).
pub const Z0: f64 = 50.0;

/// Offset between the Celsius and Kelvin scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Convert a temperature in degrees Celsius to Kelvin.
#[inline]
pub fn kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kelvin() {
        assert_eq!(kelvin(0.0), 273.15);
        // 16.85 °C is the reference noise temperature
        assert!((kelvin(16.85) - T0).abs() < 1e-12);
    }
}
