//! Cached third-order exponential integral
//!
//! $E_3(\tau)$ is the transmission kernel of the plane-parallel radiative
//! transfer solution and is evaluated once per (wavelength, layer). Evaluating
//! it exactly over millions of points is slow, so it is tabulated once and
//! interpolated afterwards.

use ndarray::{Array, Dimension};
use rsed_core::errors::RSEDResult;
use rsed_core::utils::interpolate::LogSpacedTable;
use rsed_core::utils::special_functions::ln_expn;
use rsed_core::FloatValue;
use serde::{Deserialize, Serialize};

/// Limit of $E_3(\tau)$ as $\tau \to 0$
pub const E3_AT_ZERO: FloatValue = 0.5;

/// Sampling of the cached table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExponentialIntegralCacheParameters {
    /// Smallest tabulated optical depth.
    /// Default: 1e-6
    pub tau_min: FloatValue,
    /// Largest tabulated optical depth.
    /// Default: 1e3
    pub tau_max: FloatValue,
    /// Number of log-uniform samples.
    /// Default: 1000
    pub n_points: usize,
}

impl Default for ExponentialIntegralCacheParameters {
    fn default() -> Self {
        Self {
            tau_min: 1e-6,
            tau_max: 1e3,
            n_points: 1000,
        }
    }
}

/// Precomputed interpolant for $E_3(\tau)$
///
/// Built once and read-only afterwards, so a single cache can be shared
/// between concurrent computations.
///
/// The table stores $\ln E_3$ and interpolates it linearly in $\tau$. In that
/// form $E_3$ is close to linear across the whole range ($\ln E_3 \approx
/// -\tau - \ln\tau$ at depth), keeping the relative error below $10^{-4}$ even
/// where the samples are far apart.
///
/// Outside the tabulated range the cache returns the analytic limits rather
/// than extrapolating: $1/2$ below `tau_min` and $0$ above `tau_max`.

#[derive(Debug, Clone, PartialEq)]
pub struct ExponentialIntegralCache {
    table: LogSpacedTable,
}

impl ExponentialIntegralCache {
    /// Tabulate the exact function
    ///
    /// # Errors
    /// `RSEDError::InvalidParameters` if fewer than two points are requested
    /// or the bounds are not finite, positive and increasing.
    pub fn from_parameters(parameters: ExponentialIntegralCacheParameters) -> RSEDResult<Self> {
        let table = LogSpacedTable::from_fn(
            parameters.tau_min,
            parameters.tau_max,
            parameters.n_points,
            E3_AT_ZERO.ln(),
            FloatValue::NEG_INFINITY,
            |tau| ln_expn(3, tau),
        )?;
        Ok(Self { table })
    }

    /// $E_3(\tau)$
    ///
    /// NaN propagates.
    pub fn eval(&self, tau: FloatValue) -> FloatValue {
        if tau < self.table.x_min() {
            return E3_AT_ZERO;
        }
        if tau > self.table.x_max() {
            return 0.0;
        }
        self.table.eval(tau).exp()
    }

    /// Elementwise $E_3$ over an array of any dimension
    pub fn eval_array<D: Dimension>(&self, taus: &Array<FloatValue, D>) -> Array<FloatValue, D> {
        taus.mapv(|tau| self.eval(tau))
    }

    pub fn tau_min(&self) -> FloatValue {
        self.table.x_min()
    }

    pub fn tau_max(&self) -> FloatValue {
        self.table.x_max()
    }
}
