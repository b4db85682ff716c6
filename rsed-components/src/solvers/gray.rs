//! Gray atmosphere solver
//!
//! A wavelength-independent absorber in hydrostatic equilibrium, optionally
//! with a power-law scattering term. Useful as a reference atmosphere and for
//! exercising the emission pipeline without opacity tables.

use crate::solvers::blackbody::spotted_photon_flux;
use log::debug;
use ndarray::{Array1, Array2};
use rsed_core::constants::{AMU, G, K_B};
use rsed_core::errors::{RSEDError, RSEDResult};
use rsed_core::grid::{BinningScheme, OpacityMethod, WavelengthBin, WavelengthGrid};
use rsed_core::parameters::EclipseParameters;
use rsed_core::profile::{AtmosphereState, TemperaturePressureProfile};
use rsed_core::solver::AtmosphereSolver;
use rsed_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Source of the gray absorption
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrayOpacity {
    /// Same absorption coefficient (1/m) everywhere
    Constant { coeff: FloatValue },
    /// Cross-section per molecule (m^2), scaled by the local number density
    CrossSection { sigma: FloatValue },
}

impl GrayOpacity {
    /// Absorption coefficient (1/m) at the given pressure and temperature
    pub fn coefficient(&self, pressure: FloatValue, temperature: FloatValue) -> FloatValue {
        match *self {
            GrayOpacity::Constant { coeff } => coeff,
            GrayOpacity::CrossSection { sigma } => sigma * pressure / (K_B * temperature),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrayAtmosphereParameters {
    pub opacity: GrayOpacity,
    /// Scattering coefficient (1/m) at `EclipseParameters::scattering_ref_wavelength`
    /// before `scattering_factor` is applied.
    /// Default: 0.0
    pub scattering_coeff: FloatValue,
    /// Mean molecular weight (amu).
    /// Default: 2.3
    pub mean_molecular_weight: FloatValue,
    /// Default: xsec
    pub method: OpacityMethod,
}

impl Default for GrayAtmosphereParameters {
    fn default() -> Self {
        Self {
            opacity: GrayOpacity::Constant { coeff: 0.0 },
            scattering_coeff: 0.0,
            mean_molecular_weight: 2.3,
            method: OpacityMethod::DirectSampling,
        }
    }
}

/// Hydrostatic gray atmosphere
///
/// The deepest retained boundary sits at the planet radius and the column is
/// integrated upwards with constant surface gravity:
///
/// $$ \Delta r = \ln\left(\frac{P_{i+1}}{P_i}\right) \frac{k_B \bar{T}}{\mu \, m_u \, g}, \qquad g = \frac{G M_p}{R_p^2} $$
///
/// Boundaries deeper than the cloud-top pressure are dropped.
#[derive(Debug, Clone)]
pub struct GrayAtmosphereSolver {
    parameters: GrayAtmosphereParameters,
    lambda_grid: WavelengthGrid,
    bins: BinningScheme,
}

impl GrayAtmosphereSolver {
    pub fn new(lambda_grid: WavelengthGrid, parameters: GrayAtmosphereParameters) -> Self {
        Self {
            parameters,
            lambda_grid,
            bins: None,
        }
    }

    pub fn with_bins(mut self, bins: Vec<WavelengthBin>) -> Self {
        self.bins = Some(bins);
        self
    }

    pub fn parameters(&self) -> &GrayAtmosphereParameters {
        &self.parameters
    }

    fn scattering(&self, wavelength: FloatValue, parameters: &EclipseParameters) -> FloatValue {
        if !parameters.add_scattering || self.parameters.scattering_coeff == 0.0 {
            return 0.0;
        }
        self.parameters.scattering_coeff
            * parameters.scattering_factor
            * (wavelength / parameters.scattering_ref_wavelength).powf(-parameters.scattering_slope)
    }
}

impl AtmosphereSolver for GrayAtmosphereSolver {
    fn compute_params(
        &self,
        profile: &TemperaturePressureProfile,
        parameters: &EclipseParameters,
    ) -> RSEDResult<AtmosphereState> {
        let (pressures, temperatures): (Vec<FloatValue>, Vec<FloatValue>) = profile
            .pressures()
            .iter()
            .zip(profile.temperatures().iter())
            .filter(|&(&p, _)| p <= parameters.cloudtop_pressure)
            .map(|(&p, &t)| (p, t))
            .unzip();
        let n = pressures.len();
        if n < 2 {
            return Err(RSEDError::InvalidParameters(format!(
                "only {} profile boundaries lie above the cloud top at {} Pa",
                n, parameters.cloudtop_pressure
            )));
        }
        if n < profile.len() {
            debug!(
                "Dropped {} profile boundaries below the cloud top",
                profile.len() - n
            );
        }

        let gravity = G * parameters.planet_mass / parameters.planet_radius.powi(2);
        let scale = K_B / (self.parameters.mean_molecular_weight * AMU * gravity);
        let mut radii = vec![0.0; n];
        let mut path_lengths = vec![0.0; n - 1];
        radii[n - 1] = parameters.planet_radius;
        for i in (0..n - 1).rev() {
            let mean_temperature = 0.5 * (temperatures[i] + temperatures[i + 1]);
            let dr = (pressures[i + 1] / pressures[i]).ln() * scale * mean_temperature;
            path_lengths[i] = dr;
            radii[i] = radii[i + 1] + dr;
        }

        let wavelengths = self.lambda_grid.wavelengths();
        let absorption_coeff = Array2::from_shape_fn((wavelengths.len(), n), |(w, b)| {
            let gas = if parameters.add_gas_absorption {
                self.parameters
                    .opacity
                    .coefficient(pressures[b], temperatures[b])
            } else {
                0.0
            };
            gas + self.scattering(wavelengths[w], parameters)
        });

        AtmosphereState::new(
            Array1::from(pressures),
            Array1::from(temperatures),
            Array1::from(radii),
            Array1::from(path_lengths),
            absorption_coeff,
        )
    }

    fn stellar_spectrum(
        &self,
        grid: &WavelengthGrid,
        t_star: FloatValue,
        t_spot: Option<FloatValue>,
        spot_cov_frac: Option<FloatValue>,
        blackbody: bool,
    ) -> RSEDResult<Array1<FloatValue>> {
        if !blackbody {
            debug!("No stellar model atmospheres available; using a blackbody star");
        }
        Ok(spotted_photon_flux(grid, t_star, t_spot, spot_cov_frac))
    }

    fn method(&self) -> OpacityMethod {
        self.parameters.method
    }

    fn lambda_grid(&self) -> &WavelengthGrid {
        &self.lambda_grid
    }

    fn wavelength_bins(&self) -> Option<&[WavelengthBin]> {
        self.bins.as_deref()
    }

    fn change_wavelength_bins(&mut self, bins: BinningScheme) {
        self.bins = bins;
    }
}
