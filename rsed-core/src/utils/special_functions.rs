//! Exponential integrals.
//!
//! Series expansions for small arguments and a modified Lentz continued fraction
//! for large arguments, accurate to close to machine precision.

use crate::constants::EULER_GAMMA;
use crate::FloatValue;

const MAX_ITERATIONS: usize = 1000;
const EPS: FloatValue = 1e-16;
const FPMIN: FloatValue = 1e-300;

/// Continued fraction for $e^x E_n(x)$, valid for $x > 1$
fn scaled_expn_continued_fraction(n: u32, x: FloatValue) -> FloatValue {
    let nm1 = (n - 1) as FloatValue;
    let mut b = x + n as FloatValue;
    let mut c = 1.0 / FPMIN;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..=MAX_ITERATIONS {
        let i = i as FloatValue;
        let a = -i * (nm1 + i);
        b += 2.0;
        d = 1.0 / (a * d + b);
        c = b + a / c;
        let del = c * d;
        h *= del;
        if (del - 1.0).abs() < EPS {
            break;
        }
    }
    h
}

/// Power series for $E_n(x)$, valid for $0 < x \le 1$
fn expn_series(n: u32, x: FloatValue) -> FloatValue {
    let nm1 = n as i64 - 1;
    let mut ans = if nm1 != 0 {
        1.0 / nm1 as FloatValue
    } else {
        -x.ln() - EULER_GAMMA
    };
    let mut fact = 1.0;
    for i in 1..=MAX_ITERATIONS as i64 {
        fact *= -x / i as FloatValue;
        let del = if i != nm1 {
            -fact / (i - nm1) as FloatValue
        } else {
            let psi = -EULER_GAMMA + (1..=nm1).map(|k| 1.0 / k as FloatValue).sum::<FloatValue>();
            fact * (-x.ln() + psi)
        };
        ans += del;
        if del.abs() < ans.abs() * EPS {
            break;
        }
    }
    ans
}

/// Generalised exponential integral $E_n(x) = \int_1^\infty e^{-xt} t^{-n} dt$
///
/// Defined for $x \ge 0$ (and $x > 0$ when $n \le 1$). Negative or NaN
/// arguments return NaN.
///
/// # Example
/// ```
/// use rsed_core::utils::special_functions::expn;
///
/// assert!((expn(3, 0.0) - 0.5).abs() < 1e-15);
/// assert!((expn(1, 1.0) - 0.219_383_934_395_520_3).abs() < 1e-14);
/// ```
pub fn expn(n: u32, x: FloatValue) -> FloatValue {
    if x.is_nan() || x < 0.0 {
        return FloatValue::NAN;
    }
    if x.is_infinite() {
        return 0.0;
    }
    if n == 0 {
        return (-x).exp() / x;
    }
    if x == 0.0 {
        return if n == 1 {
            FloatValue::INFINITY
        } else {
            1.0 / (n - 1) as FloatValue
        };
    }
    if x > 1.0 {
        scaled_expn_continued_fraction(n, x) * (-x).exp()
    } else {
        expn_series(n, x)
    }
}

/// Natural logarithm of $E_n(x)$
///
/// Stays finite for large `x`, where $E_n(x)$ itself underflows.
pub fn ln_expn(n: u32, x: FloatValue) -> FloatValue {
    if n > 0 && x > 1.0 && x.is_finite() {
        scaled_expn_continued_fraction(n, x).ln() - x
    } else {
        expn(n, x).ln()
    }
}

/// Exponential integral $\mathrm{Ei}(x) = -\mathrm{PV}\int_{-x}^\infty e^{-t}/t \, dt$
///
/// For negative arguments this is $-E_1(-x)$.
pub fn expi(x: FloatValue) -> FloatValue {
    if x.is_nan() {
        return FloatValue::NAN;
    }
    if x < 0.0 {
        return -expn(1, -x);
    }
    if x == 0.0 {
        return FloatValue::NEG_INFINITY;
    }
    if x.is_infinite() {
        return FloatValue::INFINITY;
    }

    if x < -EPS.ln() {
        // Power series
        let mut sum = 0.0;
        let mut fact = 1.0;
        for k in 1..=MAX_ITERATIONS {
            let k = k as FloatValue;
            fact *= x / k;
            let term = fact / k;
            sum += term;
            if term < EPS * sum {
                break;
            }
        }
        sum + x.ln() + EULER_GAMMA
    } else {
        // Asymptotic series, truncated at the smallest term
        let mut sum = 0.0;
        let mut term = 1.0;
        for k in 1..=MAX_ITERATIONS {
            let prev = term;
            term *= k as FloatValue / x;
            if term < EPS {
                break;
            }
            if term < prev {
                sum += term;
            } else {
                sum -= prev;
                break;
            }
        }
        x.exp() * (1.0 + sum) / x
    }
}
