//! Physical constants in SI units

use crate::FloatValue;

/// Planck constant (J s)
pub const H: FloatValue = 6.62607015e-34;
/// Speed of light in vacuum (m / s)
pub const C: FloatValue = 2.99792458e8;
/// Boltzmann constant (J / K)
pub const K_B: FloatValue = 1.380649e-23;
/// Atomic mass unit (kg)
pub const AMU: FloatValue = 1.66053906660e-27;
/// Newtonian gravitational constant (m^3 / kg / s^2)
pub const G: FloatValue = 6.67430e-11;
/// Equatorial radius of Jupiter (m)
pub const R_JUP: FloatValue = 7.1492e7;
/// Mass of Jupiter (kg)
pub const M_JUP: FloatValue = 1.898e27;
/// Nominal solar radius (m)
pub const R_SUN: FloatValue = 6.957e8;
/// Euler-Mascheroni constant
pub const EULER_GAMMA: FloatValue = 0.577_215_664_901_532_9;

/// Blackbody spectral radiance $B_\lambda(T)$ (W / m^2 / sr / m)
///
/// $$ B_\lambda(T) = \frac{2 h c^2}{\lambda^5} \frac{1}{e^{h c / \lambda k_B T} - 1} $$
///
/// Uses `exp_m1` so long wavelengths and high temperatures keep full precision.
pub fn planck(wavelength: FloatValue, temperature: FloatValue) -> FloatValue {
    let numerator = 2.0 * H * C * C / wavelength.powi(5);
    let exponent = H * C / (wavelength * K_B * temperature);
    numerator / exponent.exp_m1()
}

/// Energy of a single photon of the given wavelength (J)
pub fn photon_energy(wavelength: FloatValue) -> FloatValue {
    H * C / wavelength
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_planck_rayleigh_jeans_limit() {
        // At long wavelengths B -> 2 c k_B T / lambda^4
        let wavelength: FloatValue = 1.0;
        let temperature = 1000.0;
        let rj = 2.0 * C * K_B * temperature / wavelength.powi(4);
        assert_relative_eq!(planck(wavelength, temperature), rj, max_relative = 1e-4);
    }

    #[test]
    fn test_planck_increases_with_temperature() {
        let wavelength = 2e-6;
        assert!(planck(wavelength, 1500.0) > planck(wavelength, 1000.0));
    }

    #[test]
    fn test_stefan_boltzmann() {
        // pi * integral of B over wavelength should equal sigma T^4
        let temperature = 1500.0;
        let sigma = 5.670374419e-8;
        let n = 200_000;
        let (lo, hi): (f64, f64) = (1e-7, 1e-3);
        let dln = (hi / lo).ln() / n as f64;
        let total: f64 = (0..n)
            .map(|i| {
                let wavelength = lo * ((i as f64 + 0.5) * dln).exp();
                planck(wavelength, temperature) * wavelength * dln
            })
            .sum();
        assert_relative_eq!(
            std::f64::consts::PI * total,
            sigma * temperature.powi(4),
            max_relative = 1e-3
        );
    }
}
