//! Numeric utilities shared by the radiative-transfer components.

pub mod interpolate;
pub mod quadrature;
pub mod special_functions;
pub mod stats;
