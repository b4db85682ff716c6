//! Core types, traits and numerics for secondary-eclipse emission spectra.
//!
//! The radiative-transfer components live in `rsed-components`; this crate
//! holds what they share: the wavelength grid and binning types, atmospheric
//! profiles, caller parameters, the atmosphere-solver interface and the
//! special functions the transfer relies on.

pub mod constants;
pub mod errors;
pub mod grid;
pub mod parameters;
pub mod profile;
pub mod solver;
pub mod spectrum;
pub mod utils;

/// Floating point type used for every physical quantity
pub type FloatValue = f64;
