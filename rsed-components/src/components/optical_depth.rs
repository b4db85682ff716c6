//! Vertical optical depth from absorption coefficients

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};
use rsed_core::errors::{RSEDError, RSEDResult};
use rsed_core::FloatValue;

/// Accumulates optical depth from the top of the atmosphere downwards
///
/// For layer $j$ between boundaries $j$ and $j+1$:
///
/// $$ \Delta\tau_j = \frac{\alpha_j + \alpha_{j+1}}{2} \, \Delta r_j, \qquad \tau_j = \sum_{i \le j} \Delta\tau_i $$
///
/// so $\tau_j$ is the optical depth at the bottom of layer $j$. The sum runs
/// strictly top to bottom. Non-finite inputs propagate into the output.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpticalDepthIntegrator;

impl OpticalDepthIntegrator {
    pub fn new() -> Self {
        Self
    }

    /// Cumulative optical depth, indexed by (wavelength, layer)
    ///
    /// # Arguments
    /// * `absorption_coeff` - Absorption coefficient (1/m), indexed by (wavelength, boundary)
    /// * `path_lengths` - Geometric thickness of each layer (m)
    pub fn integrate(
        &self,
        absorption_coeff: ArrayView2<FloatValue>,
        path_lengths: ArrayView1<FloatValue>,
    ) -> RSEDResult<Array2<FloatValue>> {
        let (n_wavelengths, n_boundaries) = absorption_coeff.dim();
        let n_layers = path_lengths.len();
        if n_boundaries != n_layers + 1 {
            return Err(RSEDError::DimensionMismatch {
                what: "absorption coefficient boundaries".to_string(),
                expected: n_layers + 1,
                got: n_boundaries,
            });
        }

        let mut taus = Array2::zeros((n_wavelengths, n_layers));
        for (coeff, mut tau) in absorption_coeff
            .axis_iter(Axis(0))
            .zip(taus.axis_iter_mut(Axis(0)))
        {
            let mut running = 0.0;
            for layer in 0..n_layers {
                let mean_coeff = 0.5 * (coeff[layer] + coeff[layer + 1]);
                running += mean_coeff * path_lengths[layer];
                tau[layer] = running;
            }
        }
        Ok(taus)
    }
}
