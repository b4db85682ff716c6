//! Atmospheric profiles
//!
//! A profile is sampled at layer boundaries, ordered from the top of the
//! atmosphere (lowest pressure) downwards. `n` boundaries delimit `n - 1`
//! layers. Pressures are in Pa, temperatures in K, lengths in m.

use crate::errors::{ensure_len, RSEDError, RSEDResult};
use crate::FloatValue;
use ndarray::{s, Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Average of adjacent entries, giving one value per layer
pub fn midpoints(boundaries: ArrayView1<FloatValue>) -> Array1<FloatValue> {
    let n = boundaries.len();
    if n < 2 {
        return Array1::zeros(0);
    }
    (&boundaries.slice(s![..n - 1]) + &boundaries.slice(s![1..])) * 0.5
}

/// Caller-supplied temperature-pressure profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePressureProfile {
    pressures: Array1<FloatValue>,
    temperatures: Array1<FloatValue>,
}

impl TemperaturePressureProfile {
    pub fn new(pressures: Array1<FloatValue>, temperatures: Array1<FloatValue>) -> RSEDResult<Self> {
        ensure_len("profile temperatures", pressures.len(), temperatures.len())?;
        if pressures.len() < 2 {
            return Err(RSEDError::InvalidParameters(
                "a profile needs at least two layer boundaries".to_string(),
            ));
        }
        Ok(Self {
            pressures,
            temperatures,
        })
    }

    /// Isothermal profile with `n_boundaries` pressures log-spaced over `[p_min, p_max]`
    pub fn isothermal(
        temperature: FloatValue,
        p_min: FloatValue,
        p_max: FloatValue,
        n_boundaries: usize,
    ) -> RSEDResult<Self> {
        if n_boundaries < 2 || p_min <= 0.0 || p_max <= p_min {
            return Err(RSEDError::InvalidParameters(format!(
                "cannot build a profile of {} boundaries over [{}, {}] Pa",
                n_boundaries, p_min, p_max
            )));
        }
        let pressures = Array1::logspace(10.0, p_min.log10(), p_max.log10(), n_boundaries);
        let temperatures = Array1::from_elem(n_boundaries, temperature);
        Self::new(pressures, temperatures)
    }

    pub fn pressures(&self) -> &Array1<FloatValue> {
        &self.pressures
    }

    pub fn temperatures(&self) -> &Array1<FloatValue> {
        &self.temperatures
    }

    pub fn len(&self) -> usize {
        self.pressures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pressures.is_empty()
    }
}

/// Atmosphere as resolved by the atmosphere solver
///
/// Monotonicity of pressures and radii and the unit conventions are
/// guaranteed by the solver; only the array shapes are checked here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereState {
    /// Pressure at each layer boundary (Pa)
    pub pressures: Array1<FloatValue>,
    /// Temperature at each layer boundary (K)
    pub temperatures: Array1<FloatValue>,
    /// Radius of each layer boundary from the planet centre (m)
    pub radii: Array1<FloatValue>,
    /// Geometric thickness of each layer (m)
    pub path_lengths: Array1<FloatValue>,
    /// Absorption coefficient (1/m) indexed by (wavelength, layer boundary)
    pub absorption_coeff: Array2<FloatValue>,
}

impl AtmosphereState {
    pub fn new(
        pressures: Array1<FloatValue>,
        temperatures: Array1<FloatValue>,
        radii: Array1<FloatValue>,
        path_lengths: Array1<FloatValue>,
        absorption_coeff: Array2<FloatValue>,
    ) -> RSEDResult<Self> {
        let n_boundaries = pressures.len();
        if n_boundaries < 2 {
            return Err(RSEDError::InvalidParameters(
                "an atmosphere needs at least two layer boundaries".to_string(),
            ));
        }
        ensure_len("temperatures", n_boundaries, temperatures.len())?;
        ensure_len("radii", n_boundaries, radii.len())?;
        ensure_len("path lengths", n_boundaries - 1, path_lengths.len())?;
        ensure_len(
            "absorption coefficient boundaries",
            n_boundaries,
            absorption_coeff.ncols(),
        )?;
        Ok(Self {
            pressures,
            temperatures,
            radii,
            path_lengths,
            absorption_coeff,
        })
    }

    pub fn n_boundaries(&self) -> usize {
        self.pressures.len()
    }

    pub fn n_layers(&self) -> usize {
        self.pressures.len() - 1
    }

    pub fn n_wavelengths(&self) -> usize {
        self.absorption_coeff.nrows()
    }

    /// Deepest pressure in the profile, NaN-ignoring
    pub fn max_pressure(&self) -> FloatValue {
        self.pressures
            .iter()
            .copied()
            .fold(FloatValue::NEG_INFINITY, FloatValue::max)
    }
}
