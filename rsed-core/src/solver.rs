//! Interface to the atmosphere-solving collaborator
//!
//! Chemistry, opacity lookup and stellar-model evaluation live behind this
//! trait. The radiative transfer only consumes what it returns.

use crate::errors::RSEDResult;
use crate::grid::{BinningScheme, OpacityMethod, WavelengthBin, WavelengthGrid};
use crate::parameters::EclipseParameters;
use crate::profile::{AtmosphereState, TemperaturePressureProfile};
use crate::FloatValue;
use ndarray::Array1;

/// Resolves an atmosphere into absorption coefficients and geometry
///
/// Implementations must return an [`AtmosphereState`] whose absorption
/// coefficients have one row per point of [`lambda_grid`](Self::lambda_grid).
/// The profile they return may be truncated (for example at a cloud deck),
/// so callers must use the returned pressures and temperatures rather than
/// the ones they supplied.
pub trait AtmosphereSolver: std::fmt::Debug + Send + Sync {
    /// Resolve the atmosphere for a profile and parameter set
    fn compute_params(
        &self,
        profile: &TemperaturePressureProfile,
        parameters: &EclipseParameters,
    ) -> RSEDResult<AtmosphereState>;

    /// Stellar photon flux at each grid wavelength
    ///
    /// Starspots, when both `t_spot` and `spot_cov_frac` are given, are mixed in
    /// by area fraction. `blackbody` requests a Planck spectrum rather than a
    /// model atmosphere.
    fn stellar_spectrum(
        &self,
        grid: &WavelengthGrid,
        t_star: FloatValue,
        t_spot: Option<FloatValue>,
        spot_cov_frac: Option<FloatValue>,
        blackbody: bool,
    ) -> RSEDResult<Array1<FloatValue>>;

    /// Opacity sampling method fixed when the solver was built
    fn method(&self) -> OpacityMethod;

    /// Model wavelength grid
    fn lambda_grid(&self) -> &WavelengthGrid;

    /// Currently configured instrument bins, `None` for model resolution
    fn wavelength_bins(&self) -> Option<&[WavelengthBin]>;

    /// Replace the instrument bins without rebuilding any other state
    fn change_wavelength_bins(&mut self, bins: BinningScheme);
}
