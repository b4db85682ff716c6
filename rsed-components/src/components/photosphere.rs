//! Effective emitting radius per wavelength

use log::warn;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rsed_core::errors::{RSEDError, RSEDResult};
use rsed_core::profile::midpoints;
use rsed_core::utils::interpolate::interp;
use rsed_core::FloatValue;

/// Optical depth that defines the photosphere
pub const PHOTOSPHERE_TAU: FloatValue = 1.0;

/// Finds the radius at which the column reaches unit optical depth
///
/// Layer-midpoint radii are interpolated linearly against each wavelength's
/// cumulative optical depth. A column that never reaches $\tau = 1$ is
/// assigned the deepest midpoint radius; one already thick in its top layer
/// gets the highest.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotosphereRadiusResolver;

impl PhotosphereRadiusResolver {
    pub fn new() -> Self {
        Self
    }

    /// Photosphere radius (m) per wavelength
    ///
    /// # Arguments
    /// * `taus` - Cumulative optical depth, (wavelength, layer)
    /// * `radii` - Radius of each layer boundary (m)
    pub fn resolve(
        &self,
        taus: ArrayView2<FloatValue>,
        radii: ArrayView1<FloatValue>,
    ) -> RSEDResult<Array1<FloatValue>> {
        let n_layers = taus.ncols();
        if radii.len() != n_layers + 1 {
            return Err(RSEDError::DimensionMismatch {
                what: "radius boundaries".to_string(),
                expected: n_layers + 1,
                got: radii.len(),
            });
        }

        let layer_radii = midpoints(radii).to_vec();
        let mut n_thin = 0usize;
        let photosphere_radii = taus
            .axis_iter(Axis(0))
            .map(|tau| {
                let tau = tau.to_vec();
                if tau.last().is_some_and(|&deepest| deepest < PHOTOSPHERE_TAU) {
                    n_thin += 1;
                }
                interp(PHOTOSPHERE_TAU, &tau, &layer_radii)
            })
            .collect::<Array1<FloatValue>>();

        if n_thin > 0 {
            warn!(
                "Optical depth never reaches {} at {} of {} wavelengths; using the deepest layer",
                PHOTOSPHERE_TAU,
                n_thin,
                taus.nrows()
            );
        }
        Ok(photosphere_radii)
    }
}
