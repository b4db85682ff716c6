//! Wavelength grids, instrument bins and the opacity sampling method
//!
//! All wavelengths are in metres.

use crate::errors::{RSEDError, RSEDResult};
use crate::FloatValue;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the opacity collaborator samples absorption within the wavelength grid
///
/// Fixed when the atmosphere solver is built. Correlated-k grids carry
/// `n_gauss` consecutive points per spectral bin, one per quadrature node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpacityMethod {
    /// Direct per-wavelength cross-section sampling
    #[serde(rename = "xsec")]
    DirectSampling,
    /// Correlated-k tables with Gauss-Legendre quadrature groups
    #[serde(rename = "ktables")]
    CorrelatedK,
}

impl OpacityMethod {
    /// Name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            OpacityMethod::DirectSampling => "xsec",
            OpacityMethod::CorrelatedK => "ktables",
        }
    }
}

impl fmt::Display for OpacityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpacityMethod {
    type Err = RSEDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "xsec" => Ok(OpacityMethod::DirectSampling),
            "ktables" => Ok(OpacityMethod::CorrelatedK),
            other => Err(RSEDError::UnreachableConfiguration(other.to_string())),
        }
    }
}

/// Strictly increasing wavelength centres shared by every atmospheric layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WavelengthGrid {
    wavelengths: Array1<FloatValue>,
    d_ln_lambda: FloatValue,
}

impl WavelengthGrid {
    /// Wrap an existing grid
    ///
    /// `d_ln_lambda` is the logarithmic spacing used to turn spectral densities
    /// into per-point quantities ($\Delta\lambda = \lambda \, d\ln\lambda$).
    pub fn new(wavelengths: Array1<FloatValue>, d_ln_lambda: FloatValue) -> RSEDResult<Self> {
        if wavelengths.is_empty() {
            return Err(RSEDError::InvalidParameters(
                "wavelength grid must not be empty".to_string(),
            ));
        }
        if wavelengths
            .iter()
            .zip(wavelengths.iter().skip(1))
            .any(|(lo, hi)| hi <= lo)
        {
            return Err(RSEDError::InvalidParameters(
                "wavelength grid must be strictly increasing".to_string(),
            ));
        }
        if d_ln_lambda.is_nan() || d_ln_lambda <= 0.0 {
            return Err(RSEDError::InvalidParameters(format!(
                "logarithmic spacing must be positive, got {}",
                d_ln_lambda
            )));
        }
        Ok(Self {
            wavelengths,
            d_ln_lambda,
        })
    }

    /// `n` points uniformly spaced in $\ln\lambda$ over `[min, max]`
    pub fn log_uniform(min: FloatValue, max: FloatValue, n: usize) -> RSEDResult<Self> {
        if n < 2 || min.is_nan() || max.is_nan() || min <= 0.0 || max <= min {
            return Err(RSEDError::InvalidParameters(format!(
                "cannot build a log-uniform grid of {} points over [{}, {}]",
                n, min, max
            )));
        }
        let d_ln_lambda = (max / min).ln() / (n - 1) as FloatValue;
        let wavelengths = Array1::from_shape_fn(n, |i| min * (i as FloatValue * d_ln_lambda).exp());
        Self::new(wavelengths, d_ln_lambda)
    }

    pub fn wavelengths(&self) -> &Array1<FloatValue> {
        &self.wavelengths
    }

    pub fn d_ln_lambda(&self) -> FloatValue {
        self.d_ln_lambda
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    /// Width of each grid point, $\lambda \, d\ln\lambda$
    pub fn widths(&self) -> Array1<FloatValue> {
        self.wavelengths.mapv(|l| l * self.d_ln_lambda)
    }
}

/// Half-open instrument bandpass `[start, end)`
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WavelengthBin {
    pub start: FloatValue,
    pub end: FloatValue,
}

impl WavelengthBin {
    pub fn new(start: FloatValue, end: FloatValue) -> Self {
        Self { start, end }
    }

    /// Whether `wavelength` falls inside the bin
    pub fn contains(&self, wavelength: FloatValue) -> bool {
        wavelength >= self.start && wavelength < self.end
    }
}

impl From<(FloatValue, FloatValue)> for WavelengthBin {
    fn from((start, end): (FloatValue, FloatValue)) -> Self {
        Self::new(start, end)
    }
}

/// Ordered instrument bins, or `None` to return the model resolution unchanged
pub type BinningScheme = Option<Vec<WavelengthBin>>;
