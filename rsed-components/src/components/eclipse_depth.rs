//! Secondary-eclipse depth calculator
//!
//! Wires optical depth, emergent flux, photosphere radius and binning around an
//! [`AtmosphereSolver`]. The eclipse depth at each model wavelength is
//!
//! $$ D(\lambda) = \frac{F_p(\lambda) \, \Delta\lambda / (h c / \lambda)}{N_\star(\lambda)}
//!    \left(\frac{R_\mathrm{phot}(\lambda)}{R_\star}\right)^2 $$
//!
//! where $N_\star$ is the stellar photon flux supplied by the solver.

use crate::components::binning::{BinReduction, SpectralBinner, SpectralBinnerParameters};
use crate::components::exp_integral::{
    ExponentialIntegralCache, ExponentialIntegralCacheParameters,
};
use crate::components::optical_depth::OpticalDepthIntegrator;
use crate::components::photosphere::PhotosphereRadiusResolver;
use crate::components::thermal_flux::{check_cloud_deck, ThermalFluxIntegrator};
use log::debug;
use ndarray::Array1;
use rsed_core::constants::photon_energy;
use rsed_core::errors::{RSEDError, RSEDResult};
use rsed_core::grid::{BinningScheme, OpacityMethod};
use rsed_core::parameters::EclipseParameters;
use rsed_core::profile::TemperaturePressureProfile;
use rsed_core::solver::AtmosphereSolver;
use rsed_core::spectrum::{EclipseDepthResult, EclipseDiagnostics};
use rsed_core::FloatValue;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Numerical settings of the calculator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EclipseDepthCalculatorParameters {
    pub exp_integral: ExponentialIntegralCacheParameters,
    pub binning: SpectralBinnerParameters,
}

/// Computes secondary-eclipse spectra for an atmosphere solver
///
/// Construction tabulates the $E_3$ cache; every call to
/// [`compute_depths`](Self::compute_depths) is otherwise independent and only
/// reads shared state, so one calculator can serve concurrent computations.
#[derive(Debug)]
pub struct EclipseDepthCalculator<S: AtmosphereSolver> {
    atm: S,
    e3: Arc<ExponentialIntegralCache>,
    optical_depth: OpticalDepthIntegrator,
    thermal_flux: ThermalFluxIntegrator,
    photosphere: PhotosphereRadiusResolver,
    binner: SpectralBinner,
}

impl<S: AtmosphereSolver> EclipseDepthCalculator<S> {
    pub fn new(atm: S) -> RSEDResult<Self> {
        Self::from_parameters(atm, EclipseDepthCalculatorParameters::default())
    }

    /// # Errors
    /// [`RSEDError::InvalidParameters`] if the $E_3$ sampling or the
    /// quadrature order cannot be built.
    pub fn from_parameters(
        atm: S,
        parameters: EclipseDepthCalculatorParameters,
    ) -> RSEDResult<Self> {
        let e3 = Arc::new(ExponentialIntegralCache::from_parameters(
            parameters.exp_integral,
        )?);
        let binner = SpectralBinner::from_parameters(atm.method(), parameters.binning)?;
        Ok(Self {
            thermal_flux: ThermalFluxIntegrator::new(Arc::clone(&e3)),
            e3,
            optical_depth: OpticalDepthIntegrator::new(),
            photosphere: PhotosphereRadiusResolver::new(),
            binner,
            atm,
        })
    }

    pub fn solver(&self) -> &S {
        &self.atm
    }

    pub fn method(&self) -> OpacityMethod {
        self.atm.method()
    }

    /// Shared $E_3$ cache
    pub fn exp_integral(&self) -> &ExponentialIntegralCache {
        &self.e3
    }

    /// Replace the instrument bins; `None` returns model resolution
    pub fn change_wavelength_bins(&mut self, bins: BinningScheme) {
        self.atm.change_wavelength_bins(bins);
    }

    /// Compute the binned eclipse spectrum
    ///
    /// Returns eclipse depths, or planetary fluxes when
    /// `parameters.is_brown_dwarf` is set. Diagnostics are attached only when
    /// `parameters.full_output` is set.
    ///
    /// # Errors
    /// * [`RSEDError::PhysicalConsistencyViolation`] if the solved profile
    ///   extends below `parameters.cloudtop_pressure`
    /// * [`RSEDError::ShapeMismatch`] if a correlated-k grid does not divide
    ///   into quadrature groups
    /// * any error raised by the atmosphere solver
    pub fn compute_depths(
        &self,
        profile: &TemperaturePressureProfile,
        parameters: &EclipseParameters,
    ) -> RSEDResult<EclipseDepthResult> {
        let start = Instant::now();
        if !parameters.has_cloud_deck() {
            debug!("No cloud deck, integrating to the bottom of the profile");
        }
        let atm = self.atm.compute_params(profile, parameters)?;
        check_cloud_deck(atm.max_pressure(), parameters.cloudtop_pressure)?;

        let grid = self.atm.lambda_grid();
        let wavelengths = grid.wavelengths();
        if atm.n_wavelengths() != grid.len() {
            return Err(RSEDError::DimensionMismatch {
                what: "absorption coefficient wavelengths".to_string(),
                expected: grid.len(),
                got: atm.n_wavelengths(),
            });
        }
        debug!(
            "Solving emission for {} wavelengths x {} layers ({})",
            grid.len(),
            atm.n_layers(),
            self.method()
        );

        let taus = self
            .optical_depth
            .integrate(atm.absorption_coeff.view(), atm.path_lengths.view())?;
        let emission = self.thermal_flux.integrate(
            wavelengths.view(),
            taus.view(),
            atm.temperatures.view(),
            atm.pressures.view(),
            parameters.cloudtop_pressure,
        )?;
        let fluxes = &emission.fluxes;

        let stellar_photon_fluxes = self.atm.stellar_spectrum(
            grid,
            parameters.t_star,
            parameters.t_spot,
            parameters.spot_cov_frac,
            parameters.stellar_blackbody,
        )?;
        if stellar_photon_fluxes.len() != grid.len() {
            return Err(RSEDError::DimensionMismatch {
                what: "stellar spectrum".to_string(),
                expected: grid.len(),
                got: stellar_photon_fluxes.len(),
            });
        }

        let widths = grid.widths();
        let photon_fluxes: Array1<FloatValue> = fluxes
            .iter()
            .zip(wavelengths.iter())
            .zip(widths.iter())
            .map(|((&flux, &lambda), &width)| flux * width / photon_energy(lambda))
            .collect();

        let photosphere_radii = self.photosphere.resolve(taus.view(), atm.radii.view())?;
        let eclipse_depths: Array1<FloatValue> = photon_fluxes
            .iter()
            .zip(stellar_photon_fluxes.iter())
            .zip(photosphere_radii.iter())
            .map(|((&planet, &star), &radius)| {
                planet / star * (radius / parameters.star_radius).powi(2)
            })
            .collect();

        let bins = self.atm.wavelength_bins();
        let depth_reduction = if parameters.is_brown_dwarf {
            BinReduction::Sum
        } else {
            BinReduction::StellarWeightedMean
        };
        let depth_spectrum = self.binner.bin(
            wavelengths.view(),
            eclipse_depths.view(),
            stellar_photon_fluxes.view(),
            bins,
            depth_reduction,
        )?;
        let flux_spectrum = self.binner.bin(
            wavelengths.view(),
            fluxes.view(),
            stellar_photon_fluxes.view(),
            bins,
            BinReduction::StellarWeightedMean,
        )?;

        let depths = if parameters.is_brown_dwarf {
            flux_spectrum.binned_values.clone()
        } else {
            depth_spectrum.binned_values.clone()
        };

        let diagnostics = parameters.full_output.then(|| EclipseDiagnostics {
            contrib: emission.contribution(),
            stellar_spectrum: stellar_photon_fluxes,
            planet_spectrum: emission.fluxes.clone(),
            unbinned_wavelengths: depth_spectrum.unbinned_wavelengths,
            unbinned_eclipse_depths: depth_spectrum.unbinned_values,
            unbinned_fluxes: flux_spectrum.unbinned_values,
            binned_fluxes: flux_spectrum.binned_values,
            taus,
            atmosphere: atm,
        });

        debug!("Eclipse spectrum computed in {:?}", start.elapsed());
        Ok(EclipseDepthResult {
            wavelengths: depth_spectrum.binned_wavelengths,
            depths,
            diagnostics,
        })
    }
}
