//! Stroke geometry for the groove and fill of both widgets.
//!
//! All functions here are pure: the same bounds and style always produce the
//! same paths. Coordinates are screen coordinates with `y` growing downwards,
//! so a positive sweep angle runs clockwise on screen and an angle of `-π/2`
//! points at twelve o'clock.
//!
//! ```rust
//! use progress_view::geometry::{bar_geometry, Bounds};
//!
//! let geometry = bar_geometry(Bounds::new(0.0, 0.0, 40.0, 4.0), 1.0);
//! assert_eq!(geometry.groove.width, 4.0);
//! assert_eq!(geometry.fill.width, 2.0);
//! ```

use lyon_geom::{point, vector, Angle, Arc, LineSegment, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Rectangle the widget is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Horizontal extent.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
}

impl Bounds {
    /// Creates bounds from origin and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Bounds at the origin with the given size.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Horizontal centre.
    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    /// Vertical centre.
    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Centre point.
    pub fn center(&self) -> Point<f64> {
        point(self.mid_x(), self.mid_y())
    }

    /// The shorter side.
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }
}

/// The centre line of a stroke.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrokePath {
    /// A straight segment, used by the bar.
    Line(LineSegment<f64>),
    /// A circular arc, used by the ring.
    Arc(Arc<f64>),
}

impl StrokePath {
    /// Point at fraction `t` of the path.
    pub fn sample(&self, t: f64) -> Point<f64> {
        match self {
            StrokePath::Line(line) => line.sample(t),
            StrokePath::Arc(arc) => arc.sample(t),
        }
    }

    /// Where the stroke starts.
    pub fn start_point(&self) -> Point<f64> {
        self.sample(0.0)
    }

    /// Where the stroke ends.
    pub fn end_point(&self) -> Point<f64> {
        self.sample(1.0)
    }

    /// Length of the centre line.
    pub fn length(&self) -> f64 {
        match self {
            StrokePath::Line(line) => line.length(),
            StrokePath::Arc(arc) => (arc.radii.x * arc.sweep_angle.radians).abs(),
        }
    }

    /// The part of the path that is visible when the stroke ends at `fraction`.
    pub fn truncated(&self, fraction: f64) -> StrokePath {
        let fraction = fraction.clamp(0.0, 1.0);
        match self {
            StrokePath::Line(line) => StrokePath::Line(LineSegment {
                from: line.from,
                to: line.sample(fraction),
            }),
            StrokePath::Arc(arc) => StrokePath::Arc(Arc {
                sweep_angle: Angle::radians(arc.sweep_angle.radians * fraction),
                ..*arc
            }),
        }
    }

    /// Shortest distance from `p` to the centre line.
    pub fn distance_to(&self, p: Point<f64>) -> f64 {
        match self {
            StrokePath::Line(line) => {
                let direction = line.to - line.from;
                let len_sq = direction.square_length();
                if len_sq == 0.0 {
                    return (p - line.from).length();
                }
                let t = ((p - line.from).dot(direction) / len_sq).clamp(0.0, 1.0);
                (p - line.sample(t)).length()
            }
            StrokePath::Arc(arc) => {
                let radius = arc.radii.x;
                let offset = p - arc.center;
                let sweep = arc.sweep_angle.radians;
                let start = arc.start_angle.radians;
                let angle = offset.y.atan2(offset.x);
                let along = if sweep >= 0.0 {
                    (angle - start).rem_euclid(TAU)
                } else {
                    (start - angle).rem_euclid(TAU)
                };
                if sweep.abs() >= TAU || along <= sweep.abs() {
                    (offset.length() - radius).abs()
                } else {
                    let from = (p - arc.sample(0.0)).length();
                    let to = (p - arc.sample(1.0)).length();
                    from.min(to)
                }
            }
        }
    }
}

/// A path stroked with a round cap at the given width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    /// Centre line.
    pub path: StrokePath,
    /// Stroke width; zero or negative widths draw nothing.
    pub width: f64,
}

impl Stroke {
    /// Whether `p` lies inside the stroke when it is drawn up to `stroke_end`.
    pub fn covers(&self, p: Point<f64>, stroke_end: f64) -> bool {
        if self.width <= 0.0 || stroke_end <= 0.0 {
            return false;
        }
        self.path.truncated(stroke_end).distance_to(p) <= self.width / 2.0
    }
}

/// Derived drawing state for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderGeometry {
    /// Bounds the geometry was computed for.
    pub bounds: Bounds,
    /// The full-length track behind the fill.
    pub groove: Stroke,
    /// The fillable stroke; it also masks the gradient.
    pub fill: Stroke,
    /// Frame of the gradient that the fill stroke masks.
    pub gradient_frame: Bounds,
}

/// Computes the bar's groove and fill lines.
///
/// The groove runs through the vertical centre with its round caps touching
/// the left and right edges. The fill is shortened by a further
/// `edge_inset / 2` at each end and is `2 * edge_inset` thinner.
pub fn bar_geometry(bounds: Bounds, edge_inset: f64) -> RenderGeometry {
    let cap = bounds.height / 2.0;
    let inset = edge_inset / 2.0;
    let mid_y = bounds.mid_y();
    let left = bounds.x;
    let right = bounds.x + bounds.width;

    let groove = LineSegment {
        from: point(left + cap, mid_y),
        to: point(right - cap, mid_y),
    };
    let fill = LineSegment {
        from: point(left + cap + inset, mid_y),
        to: point(right - (cap + inset), mid_y),
    };

    RenderGeometry {
        bounds,
        groove: Stroke {
            path: StrokePath::Line(groove),
            width: bounds.height,
        },
        fill: Stroke {
            path: StrokePath::Line(fill),
            width: bounds.height - edge_inset * 2.0,
        },
        gradient_frame: bounds,
    }
}

/// Radius of the fill ring's centre line.
///
/// When the groove is thicker, the ring is pulled inwards by half the
/// difference so both strokes share a centre line inside the bounds.
pub fn ring_radius(bounds: Bounds, ring_width: f64, groove_width: f64) -> f64 {
    let mut radius = bounds.min_side() / 2.0 - ring_width / 2.0;
    if ring_width < groove_width {
        radius -= (groove_width - ring_width) / 2.0;
    }
    radius
}

/// Radius of the groove's centre line.
pub fn groove_radius(bounds: Bounds, ring_width: f64, groove_width: f64) -> f64 {
    let mut radius = bounds.min_side() / 2.0 - groove_width / 2.0;
    if groove_width < ring_width {
        radius -= (ring_width - groove_width) / 2.0;
    }
    radius
}

/// Clockwise sweep from `start_angle` to `end_angle`.
///
/// Sweeps longer than a full turn are capped at `2π`; an end angle before the
/// start angle wraps around.
pub fn clockwise_sweep(start_angle: f64, end_angle: f64) -> f64 {
    let sweep = end_angle - start_angle;
    if sweep >= 0.0 {
        sweep.min(TAU)
    } else {
        sweep.rem_euclid(TAU)
    }
}

fn circle_arc(bounds: Bounds, radius: f64, start_angle: f64, sweep: f64) -> Arc<f64> {
    Arc {
        center: bounds.center(),
        radii: vector(radius, radius),
        start_angle: Angle::radians(start_angle),
        sweep_angle: Angle::radians(sweep),
        x_rotation: Angle::radians(0.0),
    }
}

/// Computes the ring's groove and fill arcs.
pub fn ring_geometry(
    bounds: Bounds,
    ring_width: f64,
    groove_width: f64,
    start_angle: f64,
    end_angle: f64,
) -> RenderGeometry {
    let sweep = clockwise_sweep(start_angle, end_angle);
    let ring = circle_arc(
        bounds,
        ring_radius(bounds, ring_width, groove_width),
        start_angle,
        sweep,
    );
    let groove = circle_arc(
        bounds,
        groove_radius(bounds, ring_width, groove_width),
        start_angle,
        sweep,
    );

    RenderGeometry {
        bounds,
        groove: Stroke {
            path: StrokePath::Arc(groove),
            width: groove_width,
        },
        fill: Stroke {
            path: StrokePath::Arc(ring),
            width: ring_width,
        },
        gradient_frame: bounds,
    }
}
