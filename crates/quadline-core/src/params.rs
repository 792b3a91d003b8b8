//! Line parameters and the property provider they are read from.
//!
//! The surrounding framework stores element properties by name. A
//! transmission line reads four of them:
//!
//! | Property | Field    | Unit | Default |
//! |----------|----------|------|---------|
//! | `L`      | `length` | m    | 1e-3    |
//! | `Z`      | `z`      | Ω    | 50      |
//! | `Alpha`  | `alpha`  | -    | 1       |
//! | `Temp`   | `temp`   | °C   | 26.85   |
//!
//! Validation happens here, once, when the parameters are read. The model's
//! stamp paths trust what they are given.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Property name for the physical length.
pub const PROP_LENGTH: &str = "L";
/// Property name for the characteristic impedance.
pub const PROP_IMPEDANCE: &str = "Z";
/// Property name for the attenuation factor.
pub const PROP_ALPHA: &str = "Alpha";
/// Property name for the device temperature.
pub const PROP_TEMP: &str = "Temp";

/// Source of named scalar properties.
pub trait PropertySource {
    /// Look up a real-valued property by name.
    fn property(&self, name: &str) -> Option<f64>;
}

/// Ordered name → value property storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyMap {
    values: IndexMap<String, f64>,
}

impl PropertyMap {
    /// Create an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Iterate over properties in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl PropertySource for PropertyMap {
    fn property(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }
}

/// Physical parameters of a two-conductor transmission line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineParams {
    /// Physical length (m).
    pub length: f64,
    /// Characteristic impedance (Ω).
    pub z: f64,
    /// Linear attenuation factor; 1.0 is lossless.
    pub alpha: f64,
    /// Device temperature (°C).
    pub temp: f64,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            length: 1e-3,
            z: 50.0,
            alpha: 1.0,
            temp: 26.85,
        }
    }
}

impl LineParams {
    /// Create validated parameters.
    pub fn new(length: f64, z: f64, alpha: f64, temp: f64) -> Result<Self> {
        let params = Self {
            length,
            z,
            alpha,
            temp,
        };
        params.validate()?;
        Ok(params)
    }

    /// A lossless line with the default temperature.
    pub fn lossless(length: f64, z: f64) -> Result<Self> {
        Self::new(length, z, 1.0, Self::default().temp)
    }

    /// Read parameters from a property provider, applying defaults for
    /// anything the provider does not define.
    pub fn from_properties(props: &dyn PropertySource) -> Result<Self> {
        let defaults = Self::default();
        Self::new(
            props.property(PROP_LENGTH).unwrap_or(defaults.length),
            props.property(PROP_IMPEDANCE).unwrap_or(defaults.z),
            props.property(PROP_ALPHA).unwrap_or(defaults.alpha),
            props.property(PROP_TEMP).unwrap_or(defaults.temp),
        )
    }

    /// Check the provider contract: finite values, `L >= 0`, `Z > 0`,
    /// `Alpha > 0` (it is log-transformed).
    pub fn validate(&self) -> Result<()> {
        check_finite(PROP_LENGTH, self.length)?;
        check_finite(PROP_IMPEDANCE, self.z)?;
        check_finite(PROP_ALPHA, self.alpha)?;
        check_finite(PROP_TEMP, self.temp)?;

        if self.length < 0.0 {
            return Err(invalid(PROP_LENGTH, self.length, "length must be non-negative"));
        }
        if self.z <= 0.0 {
            return Err(invalid(PROP_IMPEDANCE, self.z, "impedance must be positive"));
        }
        if self.alpha <= 0.0 {
            return Err(invalid(PROP_ALPHA, self.alpha, "attenuation must be positive"));
        }
        if crate::constants::kelvin(self.temp) < 0.0 {
            return Err(invalid(PROP_TEMP, self.temp, "temperature below absolute zero"));
        }
        Ok(())
    }

    /// Write these parameters back as named properties.
    pub fn to_properties(&self) -> PropertyMap {
        let mut props = PropertyMap::new();
        props
            .set(PROP_LENGTH, self.length)
            .set(PROP_IMPEDANCE, self.z)
            .set(PROP_ALPHA, self.alpha)
            .set(PROP_TEMP, self.temp);
        props
    }
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, value, "value must be finite"))
    }
}

fn invalid(name: &str, value: f64, reason: &'static str) -> Error {
    Error::InvalidParameter {
        name: name.to_string(),
        value,
        reason,
    }
}
