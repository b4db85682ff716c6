//! Spectra produced by an eclipse-depth computation

use crate::profile::AtmosphereState;
use crate::FloatValue;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// A spectrum at both intermediate (model) and instrument resolution
///
/// For correlated-k grids the unbinned arrays hold one point per quadrature
/// group rather than one per model point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedSpectrum {
    pub unbinned_wavelengths: Array1<FloatValue>,
    pub unbinned_values: Array1<FloatValue>,
    pub binned_wavelengths: Array1<FloatValue>,
    pub binned_values: Array1<FloatValue>,
}

/// Intermediate fields of a computation
///
/// Only ever built complete; there is no partially-populated form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseDiagnostics {
    /// Atmosphere returned by the solver
    pub atmosphere: AtmosphereState,
    /// Stellar photon flux at model resolution
    pub stellar_spectrum: Array1<FloatValue>,
    /// Planetary emergent flux at model resolution (W / m^2 / m)
    pub planet_spectrum: Array1<FloatValue>,
    pub unbinned_wavelengths: Array1<FloatValue>,
    pub unbinned_eclipse_depths: Array1<FloatValue>,
    pub unbinned_fluxes: Array1<FloatValue>,
    pub binned_fluxes: Array1<FloatValue>,
    /// Cumulative optical depth, (wavelength, layer)
    pub taus: Array2<FloatValue>,
    /// Fraction of each wavelength's flux emitted by each layer, (wavelength, layer)
    pub contrib: Array2<FloatValue>,
}

/// Final output of an eclipse-depth computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EclipseDepthResult {
    pub wavelengths: Array1<FloatValue>,
    /// Eclipse depths, or planetary fluxes in brown-dwarf mode
    pub depths: Array1<FloatValue>,
    pub diagnostics: Option<EclipseDiagnostics>,
}

impl EclipseDepthResult {
    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }
}
