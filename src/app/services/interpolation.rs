//! One-dimensional linear interpolation
//!
//! The mask synchronizer relies on exact knot behaviour: resampling a 0/1 mask
//! must return exactly `1.0` between two good knots and a fractional value only
//! between a good and a bad knot. The interpolant below returns knot values
//! verbatim and computes interior values as `y0 + (y1 - y0) * t`, which is exact
//! whenever `y0 == y1`.

/// Value assigned to query points outside the knot range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extrapolation {
    /// Return a fixed value
    Fill(f64),
}

impl Extrapolation {
    fn value(&self) -> f64 {
        match self {
            Extrapolation::Fill(v) => *v,
        }
    }
}

/// Piecewise linear interpolant over ascending abscissae
#[derive(Debug, Clone)]
pub struct LinearInterpolant {
    x: Vec<f64>,
    y: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LinearInterpolant {
    /// Build an interpolant from knots
    ///
    /// Knots with a non-finite abscissa are dropped. Knots are stably sorted by
    /// abscissa when they are not already ascending. Extra values in the longer
    /// of `x`/`y` are ignored.
    pub fn new(x: &[f64], y: &[f64], extrapolation: Extrapolation) -> Self {
        let mut knots: Vec<(f64, f64)> = x
            .iter()
            .zip(y)
            .filter(|(xi, _)| xi.is_finite())
            .map(|(&xi, &yi)| (xi, yi))
            .collect();

        if knots.windows(2).any(|w| w[1].0 < w[0].0) {
            knots.sort_by(|a, b| a.0.total_cmp(&b.0));
        }

        let (x, y) = knots.into_iter().unzip();
        Self { x, y, extrapolation }
    }

    /// Number of usable knots
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Knot abscissa range, if any knots exist
    pub fn domain(&self) -> Option<(f64, f64)> {
        Some((*self.x.first()?, *self.x.last()?))
    }

    /// Evaluate at one query point; NaN for a non-finite query
    pub fn sample(&self, xi: f64) -> f64 {
        if !xi.is_finite() {
            return f64::NAN;
        }
        let n = self.x.len();
        if n == 0 {
            return self.extrapolation.value();
        }

        // Number of knots at or below xi
        let k = self.x.partition_point(|&x| x <= xi);
        if k == 0 {
            return self.extrapolation.value();
        }

        let lo = k - 1;
        if self.x[lo] == xi {
            return self.y[lo];
        }
        if k == n {
            return self.extrapolation.value();
        }

        let (x0, x1) = (self.x[lo], self.x[k]);
        let (y0, y1) = (self.y[lo], self.y[k]);
        let t = (xi - x0) / (x1 - x0);
        y0 + (y1 - y0) * t
    }

    /// Evaluate at every query point
    pub fn resample(&self, xi: &[f64]) -> Vec<f64> {
        xi.iter().map(|&v| self.sample(v)).collect()
    }
}

/// Coerce a boolean mask to 0.0 / 1.0
pub fn mask_to_f64(mask: &[bool]) -> Vec<f64> {
    mask.iter().map(|&good| if good { 1.0 } else { 0.0 }).collect()
}
