//! Caller-supplied parameters for an eclipse-depth computation
//!
//! All physical quantities are in SI units. Parameters can be loaded from and
//! written to TOML; every field has a default so configuration files only need
//! to name what they change.

use crate::errors::{RSEDError, RSEDResult};
use crate::FloatValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameters for the Mie-scattering cloud layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudParameters {
    /// Complex refractive index of the particles as `[real, imaginary]`.
    /// `None` disables Mie scattering.
    pub ri: Option<[FloatValue; 2]>,
    /// Particle scale height as a fraction of the gas scale height.
    /// Default: 1.0
    pub frac_scale_height: FloatValue,
    /// Particle number density at the base of the cloud (1 / m^3).
    /// Default: 0.0
    pub number_density: FloatValue,
    /// Geometric mean particle radius (m).
    /// Default: 1e-6
    pub part_size: FloatValue,
    /// Geometric standard deviation of the lognormal size distribution.
    /// Default: 0.5
    pub part_size_std: FloatValue,
}

impl Default for CloudParameters {
    fn default() -> Self {
        Self {
            ri: None,
            frac_scale_height: 1.0,
            number_density: 0.0,
            part_size: 1e-6,
            part_size_std: 0.5,
        }
    }
}

/// Inputs to an eclipse-depth computation
///
/// Composition, opacity toggles and cloud settings are passed through to the
/// atmosphere solver untouched. Only `cloudtop_pressure`, the radii, the
/// stellar parameters and the two output flags are read by the radiative
/// transfer itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EclipseParameters {
    /// Stellar radius (m).
    /// Default: 1 solar radius
    pub star_radius: FloatValue,
    /// Planet mass (kg).
    /// Default: 1 Jupiter mass
    pub planet_mass: FloatValue,
    /// Planet radius at the deepest profile pressure (m).
    /// Default: 1 Jupiter radius
    pub planet_radius: FloatValue,
    /// Stellar effective temperature (K).
    /// Default: 5778.0
    pub t_star: FloatValue,

    /// Log10 of the metallicity relative to solar.
    /// Default: 0.0
    pub log_z: FloatValue,
    /// Carbon-to-oxygen ratio.
    /// Default: 0.53
    pub co_ratio: FloatValue,
    /// Per-species abundance profiles that replace the equilibrium chemistry.
    pub custom_abundances: Option<HashMap<String, Vec<FloatValue>>>,
    /// Chemistry is frozen above this pressure (Pa).
    /// Default: 1e-99 (no quenching)
    pub p_quench: FloatValue,

    /// Default: true
    pub add_gas_absorption: bool,
    /// Default: false
    pub add_h_minus_absorption: bool,
    /// Default: true
    pub add_collisional_absorption: bool,
    /// Default: true
    pub add_scattering: bool,
    /// Multiplier applied to the parametric scattering cross-section.
    /// Default: 1.0
    pub scattering_factor: FloatValue,
    /// Power-law slope of the scattering cross-section in wavelength.
    /// Default: 4.0 (Rayleigh)
    pub scattering_slope: FloatValue,
    /// Wavelength at which `scattering_factor` applies (m).
    /// Default: 1e-6
    pub scattering_ref_wavelength: FloatValue,

    /// Pressure of the top of an opaque cloud deck (Pa).
    /// Default: infinity (no cloud deck)
    pub cloudtop_pressure: FloatValue,

    /// Starspot temperature (K).
    pub t_spot: Option<FloatValue>,
    /// Fraction of the stellar disk covered by spots.
    pub spot_cov_frac: Option<FloatValue>,
    /// Use a blackbody instead of a stellar model atmosphere.
    /// Default: false
    pub stellar_blackbody: bool,

    /// Return binned planetary fluxes instead of eclipse depths.
    /// Default: false
    pub is_brown_dwarf: bool,
    /// Populate the diagnostics bundle.
    /// Default: false
    pub full_output: bool,

    pub cloud: CloudParameters,
}

impl Default for EclipseParameters {
    fn default() -> Self {
        Self {
            star_radius: crate::constants::R_SUN,
            planet_mass: crate::constants::M_JUP,
            planet_radius: crate::constants::R_JUP,
            t_star: 5778.0,

            log_z: 0.0,
            co_ratio: 0.53,
            custom_abundances: None,
            p_quench: 1e-99,

            add_gas_absorption: true,
            add_h_minus_absorption: false,
            add_collisional_absorption: true,
            add_scattering: true,
            scattering_factor: 1.0,
            scattering_slope: 4.0,
            scattering_ref_wavelength: 1e-6,

            cloudtop_pressure: FloatValue::INFINITY,

            t_spot: None,
            spot_cov_frac: None,
            stellar_blackbody: false,

            is_brown_dwarf: false,
            full_output: false,

            cloud: CloudParameters::default(),
        }
    }
}

impl EclipseParameters {
    /// Whether an opaque cloud deck bounds the atmosphere
    pub fn has_cloud_deck(&self) -> bool {
        self.cloudtop_pressure.is_finite()
    }

    /// Parse parameters from a TOML document
    pub fn from_toml_str(document: &str) -> RSEDResult<Self> {
        toml::from_str(document).map_err(|e| RSEDError::InvalidParameters(e.to_string()))
    }

    /// Serialise parameters to a TOML document
    pub fn to_toml_string(&self) -> RSEDResult<String> {
        toml::to_string(self).map_err(|e| RSEDError::InvalidParameters(e.to_string()))
    }
}
