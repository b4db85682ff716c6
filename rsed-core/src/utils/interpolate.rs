//! Piecewise-linear interpolation.

use crate::errors::{RSEDError, RSEDResult};
use crate::FloatValue;

/// Linearly interpolate `x` against the nondecreasing abscissae `xp`
///
/// Values outside the domain clamp to the nearest endpoint, matching the
/// convention used throughout the radiative-transfer code (NumPy's `interp`).
/// Repeated abscissae are allowed; the last of a run of equal `xp` wins for
/// `x` equal to that value.
///
/// Returns NaN when `xp` is empty, or when `x` or either end of `xp` is NaN.
///
/// # Panics
/// Panics if `xp` and `fp` have different lengths.
///
/// # Example
/// ```
/// use rsed_core::utils::interpolate::interp;
///
/// let xp = [0.0, 1.0, 3.0];
/// let fp = [10.0, 20.0, 40.0];
/// assert_eq!(interp(2.0, &xp, &fp), 30.0);
/// assert_eq!(interp(-5.0, &xp, &fp), 10.0);
/// assert_eq!(interp(5.0, &xp, &fp), 40.0);
/// ```
pub fn interp(x: FloatValue, xp: &[FloatValue], fp: &[FloatValue]) -> FloatValue {
    assert_eq!(xp.len(), fp.len(), "xp and fp must have the same length");
    let n = xp.len();
    if n == 0 || x.is_nan() || xp[0].is_nan() || xp[n - 1].is_nan() {
        return FloatValue::NAN;
    }
    if x <= xp[0] {
        return fp[0];
    }
    if x >= xp[n - 1] {
        return fp[n - 1];
    }

    // First index with xp[i] > x. NaN inside xp breaks the ordering, so the
    // search can still land on either end.
    let upper = xp.partition_point(|&v| v <= x);
    if upper == 0 || upper == n {
        return FloatValue::NAN;
    }
    let lower = upper - 1;
    let (x0, x1) = (xp[lower], xp[upper]);
    let (f0, f1) = (fp[lower], fp[upper]);
    f0 + (x - x0) * (f1 - f0) / (x1 - x0)
}

/// Piecewise-linear table over logarithmically spaced abscissae
///
/// Nodes sit at `x_min * 10^(i * log_step)`. The bracketing interval is found
/// in O(1) from `log10(x)`, and the value is then interpolated linearly in `x`
/// itself. Outside `[x_min, x_max]` the table returns the configured fill
/// values instead of extrapolating.
#[derive(Debug, Clone, PartialEq)]
pub struct LogSpacedTable {
    log_x_min: FloatValue,
    log_step: FloatValue,
    x: Vec<FloatValue>,
    y: Vec<FloatValue>,
    below: FloatValue,
    above: FloatValue,
}

impl LogSpacedTable {
    /// Sample `f` at `n` logarithmically spaced points spanning `[x_min, x_max]`
    ///
    /// # Errors
    /// [`RSEDError::InvalidParameters`] if `n < 2` or the bounds are not finite,
    /// positive and increasing.
    pub fn from_fn<F>(
        x_min: FloatValue,
        x_max: FloatValue,
        n: usize,
        below: FloatValue,
        above: FloatValue,
        f: F,
    ) -> RSEDResult<Self>
    where
        F: Fn(FloatValue) -> FloatValue,
    {
        if n < 2 {
            return Err(RSEDError::InvalidParameters(format!(
                "a table needs at least two samples, got {}",
                n
            )));
        }
        if !(x_min > 0.0 && x_max > x_min && x_max.is_finite()) {
            return Err(RSEDError::InvalidParameters(format!(
                "table bounds must be finite, positive and increasing, got [{}, {}]",
                x_min, x_max
            )));
        }
        let log_x_min = x_min.log10();
        let log_step = (x_max.log10() - log_x_min) / (n - 1) as FloatValue;
        let x: Vec<FloatValue> = (0..n)
            .map(|i| match i {
                0 => x_min,
                i if i == n - 1 => x_max,
                i => 10.0_f64.powf(log_x_min + i as FloatValue * log_step),
            })
            .collect();
        let y = x.iter().map(|&xi| f(xi)).collect();
        Ok(Self {
            log_x_min,
            log_step,
            x,
            y,
            below,
            above,
        })
    }

    /// Lower edge of the sampled domain
    pub fn x_min(&self) -> FloatValue {
        self.x[0]
    }

    /// Upper edge of the sampled domain
    pub fn x_max(&self) -> FloatValue {
        self.x[self.x.len() - 1]
    }

    /// Number of tabulated nodes
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Whether the table is empty (never true for a constructed table)
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Evaluate the table
    ///
    /// NaN propagates.
    pub fn eval(&self, x: FloatValue) -> FloatValue {
        if x.is_nan() {
            return FloatValue::NAN;
        }
        if x < self.x_min() {
            return self.below;
        }
        if x > self.x_max() {
            return self.above;
        }
        let last = self.x.len() - 1;
        let position = (x.log10() - self.log_x_min) / self.log_step;
        let mut lower = (position.max(0.0).floor() as usize).min(last - 1);
        // Rounding in log10 can land one node off
        if x < self.x[lower] && lower > 0 {
            lower -= 1;
        } else if x > self.x[lower + 1] && lower + 1 < last {
            lower += 1;
        }
        let (x0, x1) = (self.x[lower], self.x[lower + 1]);
        let (y0, y1) = (self.y[lower], self.y[lower + 1]);
        y0 + (x - x0) * (y1 - y0) / (x1 - x0)
    }
}
