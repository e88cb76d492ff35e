//! Named easing curves for the fill animation.
//!
//! Every curve resolves to the four control points of a cubic Bézier timing
//! function running from `(0, 0)` to `(1, 1)`. The enumeration is closed, so
//! resolving a curve can never fail; only parsing a curve from its name can.
//!
//! ```rust
//! use progress_view::timing::TimingCurve;
//!
//! let curve: TimingCurve = "easeOutExpo".parse().unwrap();
//! assert_eq!(curve.control_points(), (0.19, 1.0, 0.22, 1.0));
//! assert_eq!(curve.bezier().solve(1.0), 1.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const NEWTON_ITERATIONS: usize = 8;
const BISECTION_ITERATIONS: usize = 32;
const SOLVE_EPSILON: f64 = 1e-7;

/// Easing curve applied to the fill animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimingCurve {
    /// The platform's default curve, a gentle ease.
    Default,
    /// Constant speed.
    Linear,
    /// Starts slow, finishes at full speed.
    EaseIn,
    /// Starts at full speed, slows down at the end.
    EaseOut,
    /// Slow at both ends.
    EaseInEaseOut,
    /// Very fast start with a long exponential tail.
    #[default]
    EaseOutExpo,
}

/// Returned when a curve name is not one of the known names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown timing curve `{0}`")]
pub struct ParseTimingCurveError(pub String);

impl TimingCurve {
    /// All curves, in declaration order.
    pub const ALL: [TimingCurve; 6] = [
        TimingCurve::Default,
        TimingCurve::Linear,
        TimingCurve::EaseIn,
        TimingCurve::EaseOut,
        TimingCurve::EaseInEaseOut,
        TimingCurve::EaseOutExpo,
    ];

    /// Returns the `(x1, y1, x2, y2)` control points of the curve.
    pub fn control_points(self) -> (f64, f64, f64, f64) {
        match self {
            TimingCurve::Default => (0.25, 0.1, 0.25, 1.0),
            TimingCurve::Linear => (0.0, 0.0, 1.0, 1.0),
            TimingCurve::EaseIn => (0.42, 0.0, 1.0, 1.0),
            TimingCurve::EaseOut => (0.0, 0.0, 0.58, 1.0),
            TimingCurve::EaseInEaseOut => (0.42, 0.0, 0.58, 1.0),
            TimingCurve::EaseOutExpo => (0.19, 1.0, 0.22, 1.0),
        }
    }

    /// Returns the curve as an evaluable Bézier timing function.
    pub fn bezier(self) -> CubicBezier {
        let (x1, y1, x2, y2) = self.control_points();
        CubicBezier::new(x1, y1, x2, y2)
    }

    /// The curve's configuration name.
    pub fn name(self) -> &'static str {
        match self {
            TimingCurve::Default => "default",
            TimingCurve::Linear => "linear",
            TimingCurve::EaseIn => "easeIn",
            TimingCurve::EaseOut => "easeOut",
            TimingCurve::EaseInEaseOut => "easeInEaseOut",
            TimingCurve::EaseOutExpo => "easeOutExpo",
        }
    }
}

impl fmt::Display for TimingCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimingCurve {
    type Err = ParseTimingCurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimingCurve::ALL
            .into_iter()
            .find(|curve| curve.name() == s)
            .ok_or_else(|| ParseTimingCurveError(s.to_string()))
    }
}

/// A cubic Bézier timing function with fixed endpoints `(0, 0)` and `(1, 1)`.
///
/// The curve is stored in polynomial form so that `x(t)` and `y(t)` can be
/// evaluated with a handful of multiplications per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    ax: f64,
    bx: f64,
    cx: f64,
    ay: f64,
    by: f64,
    cy: f64,
}

impl CubicBezier {
    /// Builds the timing function from its two inner control points.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let cx = 3.0 * x1;
        let bx = 3.0 * (x2 - x1) - cx;
        let ax = 1.0 - cx - bx;
        let cy = 3.0 * y1;
        let by = 3.0 * (y2 - y1) - cy;
        let ay = 1.0 - cy - by;
        Self {
            ax,
            bx,
            cx,
            ay,
            by,
            cy,
        }
    }

    fn sample_x(&self, t: f64) -> f64 {
        ((self.ax * t + self.bx) * t + self.cx) * t
    }

    fn sample_y(&self, t: f64) -> f64 {
        ((self.ay * t + self.by) * t + self.cy) * t
    }

    fn sample_x_derivative(&self, t: f64) -> f64 {
        (3.0 * self.ax * t + 2.0 * self.bx) * t + self.cx
    }

    // Finds the curve parameter whose x equals `x`.
    fn solve_parameter(&self, x: f64) -> f64 {
        let mut t = x;
        for _ in 0..NEWTON_ITERATIONS {
            let err = self.sample_x(t) - x;
            if err.abs() < SOLVE_EPSILON {
                return t;
            }
            let slope = self.sample_x_derivative(t);
            if slope.abs() < SOLVE_EPSILON {
                break;
            }
            t -= err / slope;
        }

        let (mut lo, mut hi) = (0.0, 1.0);
        t = x;
        for _ in 0..BISECTION_ITERATIONS {
            let value = self.sample_x(t);
            if (value - x).abs() < SOLVE_EPSILON {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) / 2.0;
        }
        t
    }

    /// Maps linear time `x` in `[0, 1]` to eased progress.
    ///
    /// Inputs outside the unit interval are clamped; the endpoints map exactly
    /// to `0.0` and `1.0`.
    pub fn solve(&self, x: f64) -> f64 {
        if x.is_nan() || x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        self.sample_y(self.solve_parameter(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_control_points() {
        assert_eq!(TimingCurve::Linear.control_points(), (0.0, 0.0, 1.0, 1.0));
        assert_eq!(TimingCurve::EaseIn.control_points(), (0.42, 0.0, 1.0, 1.0));
        assert_eq!(TimingCurve::EaseOut.control_points(), (0.0, 0.0, 0.58, 1.0));
        assert_eq!(
            TimingCurve::EaseOutExpo.control_points(),
            (0.19, 1.0, 0.22, 1.0)
        );
    }

    #[test]
    fn test_default_curve_is_ease_out_expo() {
        assert_eq!(TimingCurve::default(), TimingCurve::EaseOutExpo);
    }

    #[test]
    fn test_linear_is_identity() {
        let linear = TimingCurve::Linear.bezier();
        for step in 0..=10 {
            let x = step as f64 / 10.0;
            assert!((linear.solve(x) - x).abs() < 1e-6, "x = {x}");
        }
    }

    #[test]
    fn test_endpoints_are_exact() {
        for curve in TimingCurve::ALL {
            let bezier = curve.bezier();
            assert_eq!(bezier.solve(0.0), 0.0, "{curve}");
            assert_eq!(bezier.solve(1.0), 1.0, "{curve}");
            assert_eq!(bezier.solve(-3.0), 0.0, "{curve}");
            assert_eq!(bezier.solve(7.0), 1.0, "{curve}");
        }
    }

    #[test]
    fn test_curves_are_monotonic() {
        for curve in TimingCurve::ALL {
            let bezier = curve.bezier();
            let mut last = 0.0;
            for step in 1..=100 {
                let y = bezier.solve(step as f64 / 100.0);
                assert!(y + 1e-6 >= last, "{curve} not monotonic at step {step}");
                last = y;
            }
        }
    }

    #[test]
    fn test_ease_shapes() {
        let ease_in = TimingCurve::EaseIn.bezier();
        let ease_out = TimingCurve::EaseOut.bezier();
        let expo = TimingCurve::EaseOutExpo.bezier();

        assert!(ease_in.solve(0.5) < 0.5);
        assert!(ease_out.solve(0.5) > 0.5);
        // The exponential tail is nearly finished a quarter of the way in.
        assert!(expo.solve(0.25) > 0.8);
    }

    #[test]
    fn test_parse_and_display() {
        for curve in TimingCurve::ALL {
            assert_eq!(curve.to_string().parse::<TimingCurve>(), Ok(curve));
        }
        assert_eq!(
            "bounce".parse::<TimingCurve>(),
            Err(ParseTimingCurveError("bounce".to_string()))
        );
        assert_eq!(
            ParseTimingCurveError("bounce".to_string()).to_string(),
            "unknown timing curve `bounce`"
        );
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TimingCurve::EaseInEaseOut).unwrap();
        assert_eq!(json, "\"easeInEaseOut\"");
        let curve: TimingCurve = serde_json::from_str("\"easeOutExpo\"").unwrap();
        assert_eq!(curve, TimingCurve::EaseOutExpo);
    }
}
