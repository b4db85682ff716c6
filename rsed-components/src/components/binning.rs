//! Reduction of model-resolution spectra to instrument bins
//!
//! Binning happens in two stages:
//!
//! 1. Correlated-k grids carry `n_gauss` consecutive points per spectral bin,
//!    one per Gauss-Legendre node of the cumulative opacity distribution. Each
//!    group collapses to a single point. Direct-sampling grids pass through.
//! 2. The stage-1 spectrum is reduced over each half-open instrument bin, or
//!    returned unchanged when no bins are configured.

use is_close::is_close;
use log::warn;
use ndarray::{Array1, ArrayView1};
use rsed_core::errors::{RSEDError, RSEDResult};
use rsed_core::grid::{OpacityMethod, WavelengthBin};
use rsed_core::spectrum::BinnedSpectrum;
use rsed_core::utils::quadrature::gauss_legendre;
use rsed_core::utils::stats::{mean, median, weighted_average};
use rsed_core::FloatValue;
use serde::{Deserialize, Serialize};

/// How values inside an instrument bin are combined
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinReduction {
    /// Sum of the selected values (integrated flux)
    Sum,
    /// Average weighted by the stellar photon flux (eclipse depth)
    StellarWeightedMean,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralBinnerParameters {
    /// Quadrature points per correlated-k group.
    /// Default: 10
    pub n_gauss: usize,
}

impl Default for SpectralBinnerParameters {
    fn default() -> Self {
        Self { n_gauss: 10 }
    }
}

/// Spectrum after the quadrature stage
#[derive(Debug, Clone, PartialEq)]
pub struct IntermediateSpectrum {
    pub wavelengths: Array1<FloatValue>,
    pub values: Array1<FloatValue>,
    pub stellar_spectrum: Array1<FloatValue>,
}

/// Two-stage spectral binner for one opacity sampling method
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralBinner {
    method: OpacityMethod,
    n_gauss: usize,
    quadrature_weights: Vec<FloatValue>,
}

impl SpectralBinner {
    /// # Errors
    /// [`RSEDError::InvalidParameters`] if `n_gauss` is zero.
    pub fn from_parameters(
        method: OpacityMethod,
        parameters: SpectralBinnerParameters,
    ) -> RSEDResult<Self> {
        if parameters.n_gauss == 0 {
            return Err(RSEDError::InvalidParameters(
                "n_gauss must be at least one".to_string(),
            ));
        }
        let (_, weights) = gauss_legendre(parameters.n_gauss);
        // Legendre weights span [-1, 1]; the group covers the unit interval
        let quadrature_weights: Vec<FloatValue> = weights.iter().map(|w| w / 2.0).collect();
        debug_assert!(is_close!(quadrature_weights.iter().sum::<FloatValue>(), 1.0));
        Ok(Self {
            method,
            n_gauss: parameters.n_gauss,
            quadrature_weights,
        })
    }

    pub fn method(&self) -> OpacityMethod {
        self.method
    }

    pub fn n_gauss(&self) -> usize {
        self.n_gauss
    }

    /// Weights applied within each correlated-k group, summing to one
    pub fn quadrature_weights(&self) -> &[FloatValue] {
        &self.quadrature_weights
    }

    /// Stage 1: collapse quadrature groups
    ///
    /// # Errors
    /// [`RSEDError::ShapeMismatch`] if a correlated-k spectrum does not divide
    /// into whole groups.
    pub fn collapse(
        &self,
        wavelengths: ArrayView1<FloatValue>,
        values: ArrayView1<FloatValue>,
        stellar_spectrum: ArrayView1<FloatValue>,
    ) -> RSEDResult<IntermediateSpectrum> {
        check_same_length(wavelengths.len(), values.len(), stellar_spectrum.len())?;
        match self.method {
            OpacityMethod::DirectSampling => Ok(IntermediateSpectrum {
                wavelengths: wavelengths.to_owned(),
                values: values.to_owned(),
                stellar_spectrum: stellar_spectrum.to_owned(),
            }),
            OpacityMethod::CorrelatedK => {
                self.collapse_quadrature_groups(wavelengths, values, stellar_spectrum)
            }
        }
    }

    fn collapse_quadrature_groups(
        &self,
        wavelengths: ArrayView1<FloatValue>,
        values: ArrayView1<FloatValue>,
        stellar_spectrum: ArrayView1<FloatValue>,
    ) -> RSEDResult<IntermediateSpectrum> {
        let len = values.len();
        if len % self.n_gauss != 0 {
            return Err(RSEDError::ShapeMismatch {
                len,
                group_size: self.n_gauss,
            });
        }
        let n_groups = len / self.n_gauss;
        let mut out = IntermediateSpectrum {
            wavelengths: Array1::zeros(n_groups),
            values: Array1::zeros(n_groups),
            stellar_spectrum: Array1::zeros(n_groups),
        };
        let wavelengths = wavelengths.to_vec();
        let values = values.to_vec();
        let stellar_spectrum = stellar_spectrum.to_vec();

        for (group, ((lambdas, vals), stellar)) in wavelengths
            .chunks_exact(self.n_gauss)
            .zip(values.chunks_exact(self.n_gauss))
            .zip(stellar_spectrum.chunks_exact(self.n_gauss))
            .enumerate()
        {
            out.wavelengths[group] = median(lambdas);
            out.values[group] = vals
                .iter()
                .zip(self.quadrature_weights.iter())
                .fold(0.0, |acc, (v, w)| acc + v * w);
            out.stellar_spectrum[group] = median(stellar);
        }
        Ok(out)
    }

    /// Stage 2: reduce the stage-1 spectrum over instrument bins
    ///
    /// With `bins` of `None` the stage-1 spectrum is returned at both
    /// granularities. A bin that selects no points yields a non-finite
    /// wavelength (and value, for the weighted mean); bins must be placed
    /// over the model grid.
    pub fn bin(
        &self,
        wavelengths: ArrayView1<FloatValue>,
        values: ArrayView1<FloatValue>,
        stellar_spectrum: ArrayView1<FloatValue>,
        bins: Option<&[WavelengthBin]>,
        reduction: BinReduction,
    ) -> RSEDResult<BinnedSpectrum> {
        let intermediate = self.collapse(wavelengths, values, stellar_spectrum)?;

        let Some(bins) = bins else {
            return Ok(BinnedSpectrum {
                binned_wavelengths: intermediate.wavelengths.clone(),
                binned_values: intermediate.values.clone(),
                unbinned_wavelengths: intermediate.wavelengths,
                unbinned_values: intermediate.values,
            });
        };

        let (binned_wavelengths, binned_values) = bin_to_instrument(&intermediate, bins, reduction);
        Ok(BinnedSpectrum {
            unbinned_wavelengths: intermediate.wavelengths,
            unbinned_values: intermediate.values,
            binned_wavelengths,
            binned_values,
        })
    }
}

fn check_same_length(wavelengths: usize, values: usize, stellar: usize) -> RSEDResult<()> {
    if values != wavelengths {
        return Err(RSEDError::DimensionMismatch {
            what: "binned values".to_string(),
            expected: wavelengths,
            got: values,
        });
    }
    if stellar != wavelengths {
        return Err(RSEDError::DimensionMismatch {
            what: "stellar spectrum".to_string(),
            expected: wavelengths,
            got: stellar,
        });
    }
    Ok(())
}

fn bin_to_instrument(
    spectrum: &IntermediateSpectrum,
    bins: &[WavelengthBin],
    reduction: BinReduction,
) -> (Array1<FloatValue>, Array1<FloatValue>) {
    let mut binned_wavelengths = Array1::zeros(bins.len());
    let mut binned_values = Array1::zeros(bins.len());
    let mut n_empty = 0usize;

    for (i, bin) in bins.iter().enumerate() {
        let mut lambdas = Vec::new();
        let mut vals = Vec::new();
        let mut weights = Vec::new();
        for ((&lambda, &value), &stellar) in spectrum
            .wavelengths
            .iter()
            .zip(spectrum.values.iter())
            .zip(spectrum.stellar_spectrum.iter())
        {
            if bin.contains(lambda) {
                lambdas.push(lambda);
                vals.push(value);
                weights.push(stellar);
            }
        }
        if lambdas.is_empty() {
            n_empty += 1;
        }

        binned_wavelengths[i] = mean(&lambdas);
        binned_values[i] = match reduction {
            BinReduction::Sum => vals.iter().fold(0.0, |acc, v| acc + v),
            BinReduction::StellarWeightedMean => weighted_average(&vals, &weights),
        };
    }

    if n_empty > 0 {
        warn!(
            "{} of {} wavelength bins contain no model points",
            n_empty,
            bins.len()
        );
    }
    (binned_wavelengths, binned_values)
}
