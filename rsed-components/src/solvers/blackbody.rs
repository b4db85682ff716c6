//! Blackbody stellar photon spectra

use ndarray::Array1;
use rsed_core::constants::{photon_energy, planck};
use rsed_core::grid::WavelengthGrid;
use rsed_core::FloatValue;
use std::f64::consts::PI;

/// Photons per unit time and area emitted into each grid point by a blackbody
///
/// $$ N(\lambda) = \pi B_\lambda(T) \, \frac{\lambda \, d\ln\lambda}{h c / \lambda} $$
pub fn photon_flux(grid: &WavelengthGrid, temperature: FloatValue) -> Array1<FloatValue> {
    grid.wavelengths()
        .iter()
        .zip(grid.widths().iter())
        .map(|(&lambda, &width)| PI * planck(lambda, temperature) * width / photon_energy(lambda))
        .collect()
}

/// Photon flux of a spotted star
///
/// Spots cover `spot_cov_frac` of the disk at `t_spot`; the rest of the
/// photosphere is at `t_star`. Without both spot parameters the star is
/// unspotted.
pub fn spotted_photon_flux(
    grid: &WavelengthGrid,
    t_star: FloatValue,
    t_spot: Option<FloatValue>,
    spot_cov_frac: Option<FloatValue>,
) -> Array1<FloatValue> {
    let photosphere = photon_flux(grid, t_star);
    match (t_spot, spot_cov_frac) {
        (Some(t_spot), Some(fraction)) => {
            photosphere * (1.0 - fraction) + photon_flux(grid, t_spot) * fraction
        }
        _ => photosphere,
    }
}
