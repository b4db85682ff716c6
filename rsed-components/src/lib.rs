//! Radiative-transfer components for secondary-eclipse spectra
//!
//! # Module Organisation
//!
//! - `components`: the emission pipeline, from the cached $E_3$ kernel through
//!   optical depth, emergent flux and photosphere radius to spectral binning,
//!   and the [`EclipseDepthCalculator`](components::EclipseDepthCalculator)
//!   that wires them together.
//! - `solvers`: self-contained atmosphere and stellar collaborators (a gray
//!   atmosphere and a blackbody star) for use where the full opacity and
//!   chemistry stack is not needed.

pub mod components;
pub mod solvers;
