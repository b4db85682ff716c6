//! Emergent thermal flux of a plane-parallel atmosphere
//!
//! Uses the formal solution of the radiative transfer equation integrated over
//! angle:
//!
//! $$ F(\lambda) = -2\pi \int B(\lambda, T(\tau)) \, dE_3(\tau) $$
//!
//! discretised with the Planck function constant within each layer, so layer
//! $j$ contributes $B_j \, [E_3(\tau_{j-1}) - E_3(\tau_j)]$ with $\tau_{-1} = 0$.

use crate::components::exp_integral::ExponentialIntegralCache;
use log::trace;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, Zip};
use rsed_core::constants::planck;
use rsed_core::errors::{RSEDError, RSEDResult};
use rsed_core::profile::midpoints;
use rsed_core::utils::special_functions::expi;
use rsed_core::FloatValue;
use std::f64::consts::PI;
use std::sync::Arc;

/// Flux from an opaque cloud deck sitting below optical depth `tau_max`
///
/// $$ F_\mathrm{cloud} = -\pi B \left[\tau^2 \mathrm{Ei}(-\tau) + \tau e^{-\tau} - e^{-\tau}\right] $$
///
/// which equals $2\pi B E_3(\tau_\mathrm{max})$: the full blackbody flux $\pi B$
/// for a transparent column, attenuated as the column thickens.
pub fn cloud_deck_flux(planck_deepest: FloatValue, tau_max: FloatValue) -> FloatValue {
    let attenuation = (-tau_max).exp();
    let ei_term = if tau_max == 0.0 {
        0.0
    } else {
        tau_max * tau_max * expi(-tau_max)
    };
    -PI * planck_deepest * (ei_term + tau_max * attenuation - attenuation)
}

/// Fail unless every profile pressure lies at or above the cloud top
pub fn check_cloud_deck(
    max_pressure: FloatValue,
    cloudtop_pressure: FloatValue,
) -> RSEDResult<()> {
    if max_pressure <= cloudtop_pressure {
        Ok(())
    } else {
        Err(RSEDError::PhysicalConsistencyViolation {
            cloudtop_pressure,
            max_pressure,
        })
    }
}

/// Planck radiance indexed by (wavelength, layer)
pub fn planck_field(
    wavelengths: ArrayView1<FloatValue>,
    layer_temperatures: ArrayView1<FloatValue>,
) -> Array2<FloatValue> {
    Array2::from_shape_fn(
        (wavelengths.len(), layer_temperatures.len()),
        |(w, l)| planck(wavelengths[w], layer_temperatures[l]),
    )
}

/// Emergent flux and the per-layer terms it was summed from
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionSpectrum {
    /// Outgoing flux per wavelength (W / m^2 / m), cloud deck included
    pub fluxes: Array1<FloatValue>,
    /// $B_j \, \Delta E_3$ per (wavelength, layer); the layer sum times $-2\pi$
    /// gives the clear-sky flux
    pub integrand: Array2<FloatValue>,
}

impl EmissionSpectrum {
    /// Fraction of each wavelength's flux emitted by each layer
    ///
    /// Rows sum to one for a cloud-free atmosphere; with a cloud deck the
    /// remainder is the deck's share.
    ///
    /// This is $-2\pi$ times `integrand / flux`, not the raw ratio: the flux
    /// carries the $2\pi$ of the angular integral while the integrand does not.
    pub fn contribution(&self) -> Array2<FloatValue> {
        let mut contrib = self.integrand.mapv(|v| -2.0 * PI * v);
        Zip::from(contrib.rows_mut())
            .and(&self.fluxes)
            .for_each(|mut row, &flux| row.mapv_inplace(|v| v / flux));
        contrib
    }
}

/// Reduces optical depth and temperature to emergent flux
#[derive(Debug, Clone)]
pub struct ThermalFluxIntegrator {
    e3: Arc<ExponentialIntegralCache>,
}

impl ThermalFluxIntegrator {
    pub fn new(e3: Arc<ExponentialIntegralCache>) -> Self {
        Self { e3 }
    }

    /// Emergent flux per wavelength
    ///
    /// # Arguments
    /// * `wavelengths` - Model wavelengths (m)
    /// * `taus` - Cumulative optical depth at the bottom of each layer, (wavelength, layer)
    /// * `temperatures` - Temperature at each layer boundary (K)
    /// * `pressures` - Pressure at each layer boundary (Pa)
    /// * `cloudtop_pressure` - Top of the opaque cloud deck (Pa), infinite for none
    ///
    /// # Errors
    /// [`RSEDError::PhysicalConsistencyViolation`] if the profile extends below
    /// the cloud top.
    pub fn integrate(
        &self,
        wavelengths: ArrayView1<FloatValue>,
        taus: ArrayView2<FloatValue>,
        temperatures: ArrayView1<FloatValue>,
        pressures: ArrayView1<FloatValue>,
        cloudtop_pressure: FloatValue,
    ) -> RSEDResult<EmissionSpectrum> {
        let max_pressure = pressures
            .iter()
            .copied()
            .fold(FloatValue::NEG_INFINITY, FloatValue::max);
        check_cloud_deck(max_pressure, cloudtop_pressure)?;

        let (n_wavelengths, n_layers) = taus.dim();
        if wavelengths.len() != n_wavelengths {
            return Err(RSEDError::DimensionMismatch {
                what: "wavelengths".to_string(),
                expected: n_wavelengths,
                got: wavelengths.len(),
            });
        }
        if temperatures.len() != n_layers + 1 {
            return Err(RSEDError::DimensionMismatch {
                what: "temperature boundaries".to_string(),
                expected: n_layers + 1,
                got: temperatures.len(),
            });
        }

        let layer_temperatures = midpoints(temperatures);
        let planck_function = planck_field(wavelengths, layer_temperatures.view());

        let mut integrand = Array2::zeros((n_wavelengths, n_layers));
        let mut fluxes = Array1::zeros(n_wavelengths);
        for (w, (tau, mut row)) in taus
            .axis_iter(Axis(0))
            .zip(integrand.axis_iter_mut(Axis(0)))
            .enumerate()
        {
            // Leading zero: the top layer's emission escapes unattenuated
            let mut e3_above = self.e3.eval(0.0);
            let mut total = 0.0;
            for layer in 0..n_layers {
                let e3_below = self.e3.eval(tau[layer]);
                let term = planck_function[[w, layer]] * (e3_below - e3_above);
                row[layer] = term;
                total += term;
                e3_above = e3_below;
            }
            fluxes[w] = -2.0 * PI * total;
        }

        if cloudtop_pressure.is_finite() && n_layers > 0 {
            trace!("Adding cloud deck emission at {} Pa", cloudtop_pressure);
            for (w, tau) in taus.axis_iter(Axis(0)).enumerate() {
                let tau_max = tau.iter().copied().fold(FloatValue::NEG_INFINITY, nan_max);
                fluxes[w] += cloud_deck_flux(planck_function[[w, n_layers - 1]], tau_max);
            }
        }

        Ok(EmissionSpectrum { fluxes, integrand })
    }
}

/// Maximum that propagates NaN
fn nan_max(a: FloatValue, b: FloatValue) -> FloatValue {
    if a.is_nan() || b.is_nan() {
        FloatValue::NAN
    } else {
        a.max(b)
    }
}
