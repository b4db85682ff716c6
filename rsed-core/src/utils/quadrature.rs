//! Gauss-Legendre quadrature.

use crate::FloatValue;
use std::f64::consts::PI;

const NEWTON_TOLERANCE: FloatValue = 1e-15;
const MAX_NEWTON_STEPS: usize = 100;

/// Nodes and weights of the `n`-point Gauss-Legendre rule on $[-1, 1]$
///
/// Nodes are returned in ascending order. The weights sum to 2, the length of
/// the interval. Roots are found by Newton iteration on $P_n$ starting from the
/// Chebyshev-like initial guess $\cos(\pi (i + 3/4) / (n + 1/2))$.
///
/// # Panics
/// Panics if `n == 0`.
///
/// # Example
/// ```
/// use rsed_core::utils::quadrature::gauss_legendre;
///
/// let (nodes, weights) = gauss_legendre(2);
/// assert!((nodes[1] - 1.0 / 3.0_f64.sqrt()).abs() < 1e-14);
/// assert!((weights[0] - 1.0).abs() < 1e-14);
/// ```
pub fn gauss_legendre(n: usize) -> (Vec<FloatValue>, Vec<FloatValue>) {
    assert!(n > 0, "Quadrature order must be positive");
    let mut nodes = vec![0.0; n];
    let mut weights = vec![0.0; n];
    let nf = n as FloatValue;

    // Roots are symmetric about zero, so only half need to be found
    for i in 0..n.div_ceil(2) {
        let mut z = (PI * (i as FloatValue + 0.75) / (nf + 0.5)).cos();
        let mut derivative = 0.0;
        for _ in 0..MAX_NEWTON_STEPS {
            let (p, dp) = legendre_with_derivative(n, z);
            derivative = dp;
            let z_prev = z;
            z = z_prev - p / dp;
            if (z - z_prev).abs() <= NEWTON_TOLERANCE {
                derivative = legendre_with_derivative(n, z).1;
                break;
            }
        }
        let weight = 2.0 / ((1.0 - z * z) * derivative * derivative);
        nodes[i] = -z;
        nodes[n - 1 - i] = z;
        weights[i] = weight;
        weights[n - 1 - i] = weight;
    }
    if n % 2 == 1 {
        nodes[n / 2] = 0.0;
    }
    (nodes, weights)
}

/// Evaluate $P_n(z)$ and $P_n'(z)$ by the three-term recurrence
fn legendre_with_derivative(n: usize, z: FloatValue) -> (FloatValue, FloatValue) {
    let mut p_current = 1.0;
    let mut p_previous = 0.0;
    for j in 1..=n {
        let jf = j as FloatValue;
        let p_older = p_previous;
        p_previous = p_current;
        p_current = ((2.0 * jf - 1.0) * z * p_previous - (jf - 1.0) * p_older) / jf;
    }
    let derivative = n as FloatValue * (z * p_current - p_previous) / (z * z - 1.0);
    (p_current, derivative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_weights_sum_to_interval_length() {
        for n in 1..=20 {
            let (_, weights) = gauss_legendre(n);
            let total: FloatValue = weights.iter().sum();
            assert_relative_eq!(total, 2.0, max_relative = 1e-13);
        }
    }

    #[test]
    fn test_nodes_ascending_and_symmetric() {
        let (nodes, weights) = gauss_legendre(10);
        for pair in nodes.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for i in 0..10 {
            assert_relative_eq!(nodes[i], -nodes[9 - i], epsilon = 1e-15);
            assert_relative_eq!(weights[i], weights[9 - i], epsilon = 1e-15);
        }
    }

    #[test]
    fn test_ten_point_rule_reference() {
        let (nodes, weights) = gauss_legendre(10);
        assert_relative_eq!(nodes[9], 0.973_906_528_517_171_7, max_relative = 1e-13);
        assert_relative_eq!(weights[9], 0.066_671_344_308_688_14, max_relative = 1e-12);
        assert_relative_eq!(nodes[5], 0.148_874_338_981_631_2, max_relative = 1e-13);
        assert_relative_eq!(weights[5], 0.295_524_224_714_752_9, max_relative = 1e-12);
    }

    #[test]
    fn test_integrates_polynomials_exactly() {
        // An n-point rule is exact for polynomials up to degree 2n - 1
        let (nodes, weights) = gauss_legendre(5);
        let integral: FloatValue = nodes
            .iter()
            .zip(weights.iter())
            .map(|(x, w)| w * x.powi(8))
            .sum();
        assert_relative_eq!(integral, 2.0 / 9.0, max_relative = 1e-13);
    }

    #[test]
    fn test_odd_order_has_central_node() {
        let (nodes, weights) = gauss_legendre(3);
        assert_eq!(nodes[1], 0.0);
        assert_relative_eq!(weights[1], 8.0 / 9.0, max_relative = 1e-14);
    }
}
