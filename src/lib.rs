//! Secondary-eclipse thermal emission spectra
//!
//! Re-exports the core types from `rsed-core` and the emission components from
//! `rsed-components` under a single crate.

pub use rsed_components;
pub use rsed_core;

pub mod prelude {
    pub use ndarray::{Array1, Array2};
    pub use rsed_components::components::{
        EclipseDepthCalculator, EclipseDepthCalculatorParameters,
    };
    pub use rsed_components::solvers::{
        GrayAtmosphereParameters, GrayAtmosphereSolver, GrayOpacity,
    };
    pub use rsed_core::errors::{RSEDError, RSEDResult};
    pub use rsed_core::grid::{OpacityMethod, WavelengthBin, WavelengthGrid};
    pub use rsed_core::parameters::{CloudParameters, EclipseParameters};
    pub use rsed_core::profile::{AtmosphereState, TemperaturePressureProfile};
    pub use rsed_core::solver::AtmosphereSolver;
    pub use rsed_core::spectrum::{EclipseDepthResult, EclipseDiagnostics};
}
