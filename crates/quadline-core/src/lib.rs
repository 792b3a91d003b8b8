//! Core types for the quadline transmission-line model.
//!
//! This crate provides the pieces shared between the device model and any
//! surrounding solver:
//! - Physical constants and temperature conversion
//! - Line parameters and the property provider they are read from
//! - The stamp sink that receives S, Y, noise and MNA contributions
//! - The [`Component`] trait exposing the per-analysis entry points

pub mod component;
pub mod constants;
pub mod error;
pub mod params;
pub mod stamps;

pub use component::Component;
pub use constants::{C0, T0, Z0, kelvin};
pub use error::{Error, Result};
pub use params::{LineParams, PropertyMap, PropertySource};
pub use stamps::{ElementStamps, StampSink};
