pub mod binning;
pub mod eclipse_depth;
pub mod exp_integral;
pub mod optical_depth;
pub mod photosphere;
pub mod thermal_flux;

pub use binning::{BinReduction, SpectralBinner, SpectralBinnerParameters};
pub use eclipse_depth::{EclipseDepthCalculator, EclipseDepthCalculatorParameters};
pub use exp_integral::{ExponentialIntegralCache, ExponentialIntegralCacheParameters};
pub use optical_depth::OpticalDepthIntegrator;
pub use photosphere::PhotosphereRadiusResolver;
pub use thermal_flux::{EmissionSpectrum, ThermalFluxIntegrator};
