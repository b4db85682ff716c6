//! End-to-end tests of the eclipse-depth pipeline on a gray atmosphere.
//!
//! An isothermal, optically thick gray atmosphere must radiate as a blackbody
//! at its own temperature, which pins the whole chain from optical depth
//! through to eclipse depth against closed-form values.

use approx::assert_relative_eq;
use ndarray::Array1;
use rsed_components::components::{EclipseDepthCalculator, PhotosphereRadiusResolver};
use rsed_components::solvers::{GrayAtmosphereParameters, GrayAtmosphereSolver, GrayOpacity};
use rsed_core::constants::{planck, R_SUN};
use rsed_core::errors::{RSEDError, RSEDResult};
use rsed_core::grid::{BinningScheme, OpacityMethod, WavelengthBin, WavelengthGrid};
use rsed_core::parameters::EclipseParameters;
use rsed_core::profile::{AtmosphereState, TemperaturePressureProfile};
use rsed_core::solver::AtmosphereSolver;
use std::f64::consts::PI;

const T_PLANET: f64 = 1500.0;
const TAU_MAX: f64 = 50.0;

fn profile() -> TemperaturePressureProfile {
    TemperaturePressureProfile::isothermal(T_PLANET, 10.0, 1e7, 51).unwrap()
}

/// Gray solver whose constant opacity gives the column a vertical optical depth of `tau_max`
fn gray_solver(grid: WavelengthGrid, tau_max: f64, method: OpacityMethod) -> GrayAtmosphereSolver {
    let unit = GrayAtmosphereSolver::new(
        grid.clone(),
        GrayAtmosphereParameters {
            opacity: GrayOpacity::Constant { coeff: 1.0 },
            ..Default::default()
        },
    );
    let column = unit
        .compute_params(&profile(), &EclipseParameters::default())
        .unwrap()
        .path_lengths
        .sum();
    GrayAtmosphereSolver::new(
        grid,
        GrayAtmosphereParameters {
            opacity: GrayOpacity::Constant {
                coeff: tau_max / column,
            },
            method,
            ..Default::default()
        },
    )
}

fn build_calculator<S: AtmosphereSolver>(atm: S) -> EclipseDepthCalculator<S> {
    EclipseDepthCalculator::new(atm).unwrap()
}

fn infrared_grid() -> WavelengthGrid {
    WavelengthGrid::log_uniform(1e-6, 3e-5, 40).unwrap()
}

fn full_output() -> EclipseParameters {
    EclipseParameters {
        full_output: true,
        ..Default::default()
    }
}

/// Ignores the cloud top so the returned profile can extend below it
#[derive(Debug)]
struct UntruncatedSolver(GrayAtmosphereSolver);

impl AtmosphereSolver for UntruncatedSolver {
    fn compute_params(
        &self,
        profile: &TemperaturePressureProfile,
        parameters: &EclipseParameters,
    ) -> RSEDResult<AtmosphereState> {
        let clear = EclipseParameters {
            cloudtop_pressure: f64::INFINITY,
            ..parameters.clone()
        };
        self.0.compute_params(profile, &clear)
    }

    fn stellar_spectrum(
        &self,
        grid: &WavelengthGrid,
        t_star: f64,
        t_spot: Option<f64>,
        spot_cov_frac: Option<f64>,
        blackbody: bool,
    ) -> RSEDResult<Array1<f64>> {
        self.0
            .stellar_spectrum(grid, t_star, t_spot, spot_cov_frac, blackbody)
    }

    fn method(&self) -> OpacityMethod {
        self.0.method()
    }

    fn lambda_grid(&self) -> &WavelengthGrid {
        self.0.lambda_grid()
    }

    fn wavelength_bins(&self) -> Option<&[WavelengthBin]> {
        self.0.wavelength_bins()
    }

    fn change_wavelength_bins(&mut self, bins: BinningScheme) {
        self.0.change_wavelength_bins(bins)
    }
}

/// Poisons the top-of-atmosphere absorption at the first wavelength
#[derive(Debug)]
struct NanTopSolver(GrayAtmosphereSolver);

impl AtmosphereSolver for NanTopSolver {
    fn compute_params(
        &self,
        profile: &TemperaturePressureProfile,
        parameters: &EclipseParameters,
    ) -> RSEDResult<AtmosphereState> {
        let mut atm = self.0.compute_params(profile, parameters)?;
        atm.absorption_coeff[[0, 0]] = f64::NAN;
        Ok(atm)
    }

    fn stellar_spectrum(
        &self,
        grid: &WavelengthGrid,
        t_star: f64,
        t_spot: Option<f64>,
        spot_cov_frac: Option<f64>,
        blackbody: bool,
    ) -> RSEDResult<Array1<f64>> {
        self.0
            .stellar_spectrum(grid, t_star, t_spot, spot_cov_frac, blackbody)
    }

    fn method(&self) -> OpacityMethod {
        self.0.method()
    }

    fn lambda_grid(&self) -> &WavelengthGrid {
        self.0.lambda_grid()
    }

    fn wavelength_bins(&self) -> Option<&[WavelengthBin]> {
        self.0.wavelength_bins()
    }

    fn change_wavelength_bins(&mut self, bins: BinningScheme) {
        self.0.change_wavelength_bins(bins)
    }
}

mod blackbody_limit {
    use super::*;

    /// A thick isothermal column emits $\pi B(T)$.
    #[test]
    fn test_isothermal_thick_atmosphere_emits_planck() {
        let grid = infrared_grid();
        let calculator =
            build_calculator(gray_solver(grid.clone(), TAU_MAX, OpacityMethod::DirectSampling));
        let result = calculator.compute_depths(&profile(), &full_output()).unwrap();
        let diagnostics = result.diagnostics.unwrap();

        for (&lambda, &flux) in grid
            .wavelengths()
            .iter()
            .zip(diagnostics.planet_spectrum.iter())
        {
            let expected = PI * planck(lambda, T_PLANET);
            assert!((flux / expected - 1.0).abs() < 0.05);
            assert_relative_eq!(flux, expected, max_relative = 1e-3);
        }
    }

    /// With the star at the planet's temperature the depth reduces to the area ratio.
    #[test]
    fn test_equal_temperatures_give_area_ratio() {
        let grid = infrared_grid();
        let calculator =
            build_calculator(gray_solver(grid, TAU_MAX, OpacityMethod::DirectSampling));
        let parameters = EclipseParameters {
            t_star: T_PLANET,
            full_output: true,
            ..Default::default()
        };
        let result = calculator.compute_depths(&profile(), &parameters).unwrap();
        let diagnostics = result.diagnostics.as_ref().unwrap();

        let radii = PhotosphereRadiusResolver::new()
            .resolve(diagnostics.taus.view(), diagnostics.atmosphere.radii.view())
            .unwrap();
        for (&depth, &radius) in result.depths.iter().zip(radii.iter()) {
            assert_relative_eq!(depth, (radius / R_SUN).powi(2), max_relative = 1e-3);
        }
    }

    /// An opaque deck under a transparent column radiates as a blackbody at the deck.
    #[test]
    fn test_cloud_deck_under_transparent_column() {
        let grid = infrared_grid();
        let calculator = build_calculator(GrayAtmosphereSolver::new(
            grid.clone(),
            GrayAtmosphereParameters::default(),
        ));
        let parameters = EclipseParameters {
            cloudtop_pressure: 1e4,
            full_output: true,
            ..Default::default()
        };
        let result = calculator.compute_depths(&profile(), &parameters).unwrap();
        let diagnostics = result.diagnostics.unwrap();

        assert!(diagnostics.atmosphere.max_pressure() <= 1e4);
        for (&lambda, &flux) in grid
            .wavelengths()
            .iter()
            .zip(diagnostics.planet_spectrum.iter())
        {
            assert_relative_eq!(flux, PI * planck(lambda, T_PLANET), max_relative = 1e-9);
        }
    }
}

mod pipeline {
    use super::*;

    #[test]
    fn test_depths_are_non_negative_and_finite() {
        let calculator = build_calculator(gray_solver(
            infrared_grid(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        ));
        let result = calculator
            .compute_depths(&profile(), &EclipseParameters::default())
            .unwrap();
        assert_eq!(result.len(), 40);
        assert!(result.diagnostics.is_none());
        assert!(result.depths.iter().all(|d| d.is_finite() && *d >= 0.0));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let calculator = build_calculator(gray_solver(
            infrared_grid(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        ));
        let first = calculator.compute_depths(&profile(), &full_output()).unwrap();
        let second = calculator.compute_depths(&profile(), &full_output()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_output_diagnostics() {
        let calculator = build_calculator(gray_solver(
            infrared_grid(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        ));
        let result = calculator.compute_depths(&profile(), &full_output()).unwrap();
        let diagnostics = result.diagnostics.as_ref().unwrap();

        assert_eq!(diagnostics.taus.dim(), (40, 50));
        assert_eq!(diagnostics.contrib.dim(), (40, 50));
        assert_eq!(diagnostics.stellar_spectrum.len(), 40);
        assert_eq!(diagnostics.unbinned_eclipse_depths, result.depths);
        assert_eq!(diagnostics.binned_fluxes, diagnostics.planet_spectrum);
        assert_eq!(diagnostics.unbinned_wavelengths, result.wavelengths);
        for row in diagnostics.contrib.rows() {
            assert_relative_eq!(row.sum(), 1.0, max_relative = 1e-9);
        }
        // Optical depth of the full column
        for row in diagnostics.taus.rows() {
            assert_relative_eq!(row[49], TAU_MAX, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_diagnostics_serialise() {
        let calculator = build_calculator(gray_solver(
            infrared_grid(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        ));
        let result = calculator.compute_depths(&profile(), &full_output()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["diagnostics"]["contrib"].is_object());
        assert!(json["diagnostics"]["atmosphere"]["radii"].is_object());
        assert!(json["depths"].is_object());
    }

    #[test]
    fn test_brown_dwarf_returns_fluxes() {
        let calculator = build_calculator(gray_solver(
            infrared_grid(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        ));
        let parameters = EclipseParameters {
            is_brown_dwarf: true,
            full_output: true,
            ..Default::default()
        };
        let result = calculator.compute_depths(&profile(), &parameters).unwrap();
        let diagnostics = result.diagnostics.unwrap();
        assert_eq!(result.depths, diagnostics.binned_fluxes);
        assert_eq!(result.depths, diagnostics.planet_spectrum);
    }

    #[test]
    fn test_instrument_bins() {
        let grid = infrared_grid();
        let mut calculator = build_calculator(gray_solver(
            grid.clone(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        ));
        let unbinned = calculator
            .compute_depths(&profile(), &EclipseParameters::default())
            .unwrap();

        let bins = vec![WavelengthBin::new(1e-6, 5e-6), WavelengthBin::new(5e-6, 2e-5)];
        calculator.change_wavelength_bins(Some(bins.clone()));
        let binned = calculator
            .compute_depths(&profile(), &EclipseParameters::default())
            .unwrap();
        assert_eq!(binned.len(), 2);

        for (i, bin) in bins.iter().enumerate() {
            let inside: Vec<f64> = grid
                .wavelengths()
                .iter()
                .copied()
                .filter(|&lambda| bin.contains(lambda))
                .collect();
            let mean = inside.iter().sum::<f64>() / inside.len() as f64;
            assert_relative_eq!(binned.wavelengths[i], mean, max_relative = 1e-12);

            let (lo, hi) = unbinned
                .wavelengths
                .iter()
                .zip(unbinned.depths.iter())
                .filter(|(&lambda, _)| bin.contains(lambda))
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, &d)| {
                    (lo.min(d), hi.max(d))
                });
            assert!(binned.depths[i] >= lo * (1.0 - 1e-12));
            assert!(binned.depths[i] <= hi * (1.0 + 1e-12));
        }

        calculator.change_wavelength_bins(None);
        let restored = calculator
            .compute_depths(&profile(), &EclipseParameters::default())
            .unwrap();
        assert_eq!(restored, unbinned);
    }

    #[test]
    fn test_spots_raise_depth() {
        let calculator = build_calculator(gray_solver(
            infrared_grid(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        ));
        let clean = calculator
            .compute_depths(&profile(), &EclipseParameters::default())
            .unwrap();
        let spotted = calculator
            .compute_depths(
                &profile(),
                &EclipseParameters {
                    t_spot: Some(4000.0),
                    spot_cov_frac: Some(0.2),
                    ..Default::default()
                },
            )
            .unwrap();
        for (&s, &c) in spotted.depths.iter().zip(clean.depths.iter()) {
            assert!(s > c);
        }
    }
}

mod non_finite_inputs {
    use super::*;

    #[test]
    fn test_nan_absorption_propagates_to_depth() {
        let calculator = build_calculator(NanTopSolver(gray_solver(
            infrared_grid(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        )));
        let result = calculator.compute_depths(&profile(), &full_output()).unwrap();
        assert!(result.depths[0].is_nan());
        assert!(result.depths.iter().skip(1).all(|d| d.is_finite()));

        let diagnostics = result.diagnostics.unwrap();
        assert!(diagnostics.taus.row(0).iter().all(|t| t.is_nan()));
        assert!(diagnostics.planet_spectrum[0].is_nan());
    }
}

mod correlated_k {
    use super::*;

    #[test]
    fn test_groups_collapse_to_one_point() {
        let grid = WavelengthGrid::log_uniform(1e-6, 3e-5, 30).unwrap();
        let calculator =
            build_calculator(gray_solver(grid, TAU_MAX, OpacityMethod::CorrelatedK));
        let result = calculator.compute_depths(&profile(), &full_output()).unwrap();
        assert_eq!(result.len(), 3);
        let diagnostics = result.diagnostics.unwrap();
        assert_eq!(diagnostics.unbinned_eclipse_depths.len(), 3);
        assert_eq!(diagnostics.planet_spectrum.len(), 30);
    }

    #[test]
    fn test_incomplete_group_is_shape_mismatch() {
        let grid = WavelengthGrid::log_uniform(1e-6, 3e-5, 25).unwrap();
        let calculator =
            build_calculator(gray_solver(grid, TAU_MAX, OpacityMethod::CorrelatedK));
        let err = calculator
            .compute_depths(&profile(), &EclipseParameters::default())
            .unwrap_err();
        assert_eq!(
            err,
            RSEDError::ShapeMismatch {
                len: 25,
                group_size: 10
            }
        );
    }
}

mod cloud_consistency {
    use super::*;

    #[test]
    fn test_profile_below_cloud_top_is_rejected() {
        let calculator = build_calculator(UntruncatedSolver(gray_solver(
            infrared_grid(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        )));
        let parameters = EclipseParameters {
            cloudtop_pressure: 1e5,
            ..Default::default()
        };
        let err = calculator
            .compute_depths(&profile(), &parameters)
            .unwrap_err();
        assert!(matches!(
            err,
            RSEDError::PhysicalConsistencyViolation {
                cloudtop_pressure,
                ..
            } if cloudtop_pressure == 1e5
        ));
    }

    #[test]
    fn test_cloud_top_at_deepest_boundary_is_allowed() {
        let calculator = build_calculator(UntruncatedSolver(gray_solver(
            infrared_grid(),
            TAU_MAX,
            OpacityMethod::DirectSampling,
        )));
        let deepest = profile().pressures()[50];
        let parameters = EclipseParameters {
            cloudtop_pressure: deepest,
            ..Default::default()
        };
        assert!(calculator.compute_depths(&profile(), &parameters).is_ok());
    }
}
