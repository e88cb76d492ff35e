//! Circular progress ring with an animated, gradient-filled arc.
//!
//! A groove arc and a fill arc share the centre of the bounds and are swept
//! clockwise from the start angle to the end angle. By default both run a
//! full turn starting at twelve o'clock.
//!
//! ```rust
//! use progress_view::ring::{new, with_line_width, with_size};
//!
//! let mut ring = new(&[with_size(21.0, 21.0), with_line_width(3.0)]);
//! assert_eq!(ring.ring_radius(), 9.0);
//!
//! let cmd = ring.set_progress(0.5, true, None);
//! assert!(cmd.is_some());
//! ```

use crate::animation::{clamp_progress, Completion};
use crate::bar::{DEFAULT_END_COLOR, DEFAULT_GROOVE_COLOR, DEFAULT_START_COLOR};
use crate::driver::{FillDriver, FrameMsg};
use crate::geometry::{self, ring_geometry, Bounds, RenderGeometry};
use crate::render::{render, Glyphs, Gradient, GradientPoint};
use crate::timing::TimingCurve;
use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};
use std::time::{Duration, Instant};

const DEFAULT_SIZE: f64 = 21.0;
const DEFAULT_LINE_WIDTH: f64 = 7.0;
const DEFAULT_DURATION: Duration = Duration::from_millis(1300);

/// Appearance and timing of a progress ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingStyle {
    /// Width of the fill arc.
    pub ring_width: f64,
    /// Width of the groove arc.
    pub groove_width: f64,
    /// Where the arcs begin, in radians; `-π/2` is twelve o'clock.
    pub start_angle: f64,
    /// Where the arcs end, in radians.
    pub end_angle: f64,
    /// Gradient shown through the fill.
    pub gradient: Gradient,
    /// Colour of the groove.
    pub groove_color: String,
    /// Duration of the fill animation.
    pub duration: Duration,
    /// Easing of the fill animation.
    pub timing_curve: TimingCurve,
}

impl Default for RingStyle {
    fn default() -> Self {
        Self {
            ring_width: DEFAULT_LINE_WIDTH,
            groove_width: DEFAULT_LINE_WIDTH,
            start_angle: -FRAC_PI_2,
            end_angle: 1.5 * PI,
            gradient: Gradient {
                start_color: DEFAULT_START_COLOR.to_string(),
                end_color: DEFAULT_END_COLOR.to_string(),
                start_point: GradientPoint::new(0.5, 0.0),
                end_point: GradientPoint::new(0.5, 1.0),
            },
            groove_color: DEFAULT_GROOVE_COLOR.to_string(),
            duration: DEFAULT_DURATION,
            timing_curve: TimingCurve::EaseOutExpo,
        }
    }
}

/// Configuration options applied by [`new`].
#[derive(Debug, Clone)]
pub enum RingOption {
    /// Lays the ring out in the given bounds.
    WithBounds(Bounds),
    /// Sets both the ring and the groove width.
    WithLineWidth(f64),
    /// Sets the fill arc's width.
    WithRingWidth(f64),
    /// Sets the groove arc's width.
    WithGrooveWidth(f64),
    /// Sets the start and end angles, in radians.
    WithAngles(f64, f64),
    /// Sets the gradient's start and end colours.
    WithGradient(String, String),
    /// Sets the gradient's start and end points.
    WithGradientPoints(GradientPoint, GradientPoint),
    /// Sets the groove colour.
    WithGrooveColor(String),
    /// Sets the animation duration.
    WithDuration(Duration),
    /// Sets the animation easing.
    WithTimingCurve(TimingCurve),
    /// Sets the characters used to draw.
    WithGlyphs(Glyphs),
    /// Replaces the whole style.
    WithStyle(RingStyle),
}

impl RingOption {
    fn apply(&self, m: &mut Model) {
        match self {
            RingOption::WithBounds(bounds) => m.bounds = *bounds,
            RingOption::WithLineWidth(width) => {
                m.style.ring_width = *width;
                m.style.groove_width = *width;
            }
            RingOption::WithRingWidth(width) => m.style.ring_width = *width,
            RingOption::WithGrooveWidth(width) => m.style.groove_width = *width,
            RingOption::WithAngles(start, end) => {
                m.style.start_angle = *start;
                m.style.end_angle = *end;
            }
            RingOption::WithGradient(start, end) => {
                m.style.gradient.start_color = start.clone();
                m.style.gradient.end_color = end.clone();
            }
            RingOption::WithGradientPoints(start, end) => {
                m.style.gradient.start_point = *start;
                m.style.gradient.end_point = *end;
            }
            RingOption::WithGrooveColor(color) => m.style.groove_color = color.clone(),
            RingOption::WithDuration(duration) => m.style.duration = *duration,
            RingOption::WithTimingCurve(curve) => m.style.timing_curve = *curve,
            RingOption::WithGlyphs(glyphs) => m.glyphs = *glyphs,
            RingOption::WithStyle(style) => m.style = style.clone(),
        }
    }
}

/// Lays the ring out in `bounds`.
pub fn with_bounds(bounds: Bounds) -> RingOption {
    RingOption::WithBounds(bounds)
}

/// Lays the ring out at the origin with the given size in cells.
pub fn with_size(width: f64, height: f64) -> RingOption {
    RingOption::WithBounds(Bounds::from_size(width, height))
}

/// Uses the same width for the fill and the groove.
pub fn with_line_width(width: f64) -> RingOption {
    RingOption::WithLineWidth(width)
}

/// Sets the fill arc's width.
pub fn with_ring_width(width: f64) -> RingOption {
    RingOption::WithRingWidth(width)
}

/// Sets the groove arc's width.
pub fn with_groove_width(width: f64) -> RingOption {
    RingOption::WithGrooveWidth(width)
}

/// Sweeps the arcs clockwise from `start` to `end` radians.
pub fn with_angles(start: f64, end: f64) -> RingOption {
    RingOption::WithAngles(start, end)
}

/// Blends the fill from `start` to `end`.
pub fn with_gradient(start: String, end: String) -> RingOption {
    RingOption::WithGradient(start, end)
}

/// Places the gradient's endpoints, in unit coordinates of the bounds.
pub fn with_gradient_points(start: GradientPoint, end: GradientPoint) -> RingOption {
    RingOption::WithGradientPoints(start, end)
}

/// Colours the groove.
pub fn with_groove_color(color: String) -> RingOption {
    RingOption::WithGrooveColor(color)
}

/// Sets how long an animated progress change takes.
pub fn with_duration(duration: Duration) -> RingOption {
    RingOption::WithDuration(duration)
}

/// Sets the easing of animated progress changes.
pub fn with_timing_curve(curve: TimingCurve) -> RingOption {
    RingOption::WithTimingCurve(curve)
}

/// Draws with custom characters.
pub fn with_glyphs(glyphs: Glyphs) -> RingOption {
    RingOption::WithGlyphs(glyphs)
}

/// Starts from a complete style.
pub fn with_style(style: RingStyle) -> RingOption {
    RingOption::WithStyle(style)
}

/// A fillable progress ring.
#[derive(Debug)]
pub struct Model {
    style: RingStyle,
    glyphs: Glyphs,
    bounds: Bounds,
    geometry: RenderGeometry,
    needs_layout: bool,
    driver: FillDriver,
}

/// Creates a progress ring at zero progress.
///
/// Defaults: 21×21 cells, 7-wide strokes, a full turn from twelve o'clock,
/// pink-to-red vertical gradient and a 1.3 second `easeOutExpo` animation.
pub fn new(opts: &[RingOption]) -> Model {
    let bounds = Bounds::from_size(DEFAULT_SIZE, DEFAULT_SIZE);
    let style = RingStyle::default();
    let mut m = Model {
        geometry: compute(bounds, &style),
        style,
        glyphs: Glyphs::default(),
        bounds,
        needs_layout: false,
        driver: FillDriver::new(),
    };

    for opt in opts {
        opt.apply(&mut m);
    }
    m.invalidate();
    m.layout();
    m
}

fn compute(bounds: Bounds, style: &RingStyle) -> RenderGeometry {
    ring_geometry(
        bounds,
        style.ring_width,
        style.groove_width,
        style.start_angle,
        style.end_angle,
    )
}

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

impl Model {
    /// Unique id of this ring, matching the id in its frame messages.
    pub fn id(&self) -> i64 {
        self.driver.id()
    }

    /// The current style.
    pub fn style(&self) -> &RingStyle {
        &self.style
    }

    /// The bounds the ring is laid out in.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Radius of the fill arc's centre line.
    pub fn ring_radius(&self) -> f64 {
        geometry::ring_radius(self.bounds, self.style.ring_width, self.style.groove_width)
    }

    /// Radius of the groove arc's centre line.
    pub fn groove_radius(&self) -> f64 {
        geometry::groove_radius(self.bounds, self.style.ring_width, self.style.groove_width)
    }

    /// Moves or resizes the ring. Equal bounds leave the layout untouched.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        if bounds != self.bounds {
            self.bounds = bounds;
            self.needs_layout = true;
        }
    }

    /// Replaces the whole style.
    pub fn set_style(&mut self, style: RingStyle) {
        self.style = style;
        self.needs_layout = true;
    }

    /// Sets the width of both the fill and the groove.
    ///
    /// Both arcs then share one centre line, pulled in from the edge of the
    /// bounds by half the width. The geometry is recomputed on the next
    /// [`layout`](Self::layout).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::ring::{new, with_size};
    ///
    /// let mut ring = new(&[with_size(21.0, 21.0)]);
    /// ring.set_line_width(3.0);
    /// assert!(ring.needs_layout());
    /// assert_eq!(ring.ring_radius(), 9.0);
    /// assert_eq!(ring.groove_radius(), 9.0);
    ///
    /// ring.layout();
    /// assert_eq!(ring.geometry().fill.width, 3.0);
    /// ```
    pub fn set_line_width(&mut self, width: f64) {
        self.style.ring_width = width;
        self.style.groove_width = width;
        self.needs_layout = true;
    }

    /// Sets the width of the fill arc.
    pub fn set_ring_width(&mut self, width: f64) {
        self.style.ring_width = width;
        self.needs_layout = true;
    }

    /// Sets the width of the groove arc.
    pub fn set_groove_width(&mut self, width: f64) {
        self.style.groove_width = width;
        self.needs_layout = true;
    }

    /// Sets where the arcs begin, in radians.
    pub fn set_start_angle(&mut self, angle: f64) {
        self.style.start_angle = angle;
        self.needs_layout = true;
    }

    /// Sets where the arcs end, in radians.
    pub fn set_end_angle(&mut self, angle: f64) {
        self.style.end_angle = angle;
        self.needs_layout = true;
    }

    /// Sets the gradient's first colour.
    pub fn set_start_color(&mut self, color: impl Into<String>) {
        self.style.gradient.start_color = color.into();
    }

    /// Sets the gradient's second colour.
    pub fn set_end_color(&mut self, color: impl Into<String>) {
        self.style.gradient.end_color = color.into();
    }

    /// Sets the groove colour.
    pub fn set_groove_color(&mut self, color: impl Into<String>) {
        self.style.groove_color = color.into();
    }

    /// Sets where the gradient starts.
    pub fn set_start_gradient_point(&mut self, point: GradientPoint) {
        self.style.gradient.start_point = point;
    }

    /// Sets where the gradient ends.
    pub fn set_end_gradient_point(&mut self, point: GradientPoint) {
        self.style.gradient.end_point = point;
    }

    /// Sets the duration used by future animations.
    pub fn set_duration(&mut self, duration: Duration) {
        self.style.duration = duration;
    }

    /// Sets the easing used by future animations.
    pub fn set_timing_curve(&mut self, curve: TimingCurve) {
        self.style.timing_curve = curve;
    }

    /// Sets the characters used to draw.
    pub fn set_glyphs(&mut self, glyphs: Glyphs) {
        self.glyphs = glyphs;
    }

    /// Marks the geometry as stale.
    pub fn invalidate(&mut self) {
        self.needs_layout = true;
    }

    /// Whether the cached geometry is stale.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout
    }

    /// Recomputes the geometry if it is stale and returns it.
    pub fn layout(&mut self) -> &RenderGeometry {
        if self.needs_layout {
            self.geometry = compute(self.bounds, &self.style);
            self.needs_layout = false;
            tracing::trace!(id = self.id(), bounds = ?self.bounds, "ring layout");
        }
        &self.geometry
    }

    /// The geometry for the current bounds and style.
    pub fn geometry(&self) -> RenderGeometry {
        if self.needs_layout {
            compute(self.bounds, &self.style)
        } else {
            self.geometry
        }
    }

    /// The logical progress: the last value requested, clamped to `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.driver.animator().progress()
    }

    /// The value the fill currently shows.
    pub fn rendered_progress(&self) -> f64 {
        self.rendered_progress_at(Instant::now())
    }

    /// The value the fill shows at `now`.
    pub fn rendered_progress_at(&self, now: Instant) -> f64 {
        self.driver.animator().current_value(now)
    }

    /// Whether a fill animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.driver.animator().is_animating()
    }

    /// A frame message addressed to the running animation.
    pub fn frame_msg(&self) -> FrameMsg {
        self.driver.frame_msg()
    }

    /// Sets the progress between 0 and 1.
    ///
    /// Behaves exactly like the bar's
    /// [`set_progress`](crate::bar::Model::set_progress): a jump runs
    /// `completion` immediately, an animation starts from the value on
    /// screen and runs `completion` when it ends, unless a later request
    /// supersedes it. The fill arc grows clockwise from the start angle.
    ///
    /// # Arguments
    ///
    /// * `value` - Target progress; clamped to `[0, 1]`, `NaN` counts as 0
    /// * `animated` - Whether to animate towards `value`
    /// * `completion` - Called once when the change has fully taken effect
    ///
    /// # Returns
    ///
    /// The command scheduling the first frame when animated, otherwise `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::ring::new;
    ///
    /// let mut ring = new(&[]);
    /// assert!(ring.set_progress(0.25, false, None).is_none());
    /// assert_eq!(ring.rendered_progress(), 0.25);
    ///
    /// let cmd = ring.set_progress(1.0, true, Some(Box::new(|| println!("full circle"))));
    /// assert!(cmd.is_some());
    /// assert_eq!(ring.progress(), 1.0);
    /// ```
    pub fn set_progress(
        &mut self,
        value: f64,
        animated: bool,
        completion: Option<Completion>,
    ) -> Option<Cmd> {
        self.set_progress_at(value, animated, completion, Instant::now())
    }

    /// [`set_progress`](Self::set_progress) with an explicit current time.
    ///
    /// The duration and timing curve are read from the style here and stay
    /// fixed for the lifetime of the animation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::ring::{new, with_timing_curve};
    /// use progress_view::timing::TimingCurve;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut ring = new(&[with_timing_curve(TimingCurve::Linear)]);
    /// let start = Instant::now();
    /// ring.set_progress_at(1.0, true, None, start);
    ///
    /// // Style changes only apply to the next animation.
    /// ring.set_duration(Duration::from_secs(10));
    /// let halfway = ring.rendered_progress_at(start + Duration::from_millis(650));
    /// assert!((halfway - 0.5).abs() < 1e-6);
    /// ```
    pub fn set_progress_at(
        &mut self,
        value: f64,
        animated: bool,
        completion: Option<Completion>,
        now: Instant,
    ) -> Option<Cmd> {
        self.layout();
        self.driver.set_progress(
            value,
            animated,
            self.style.duration,
            self.style.timing_curve,
            completion,
            now,
        )
    }

    /// Animates the progress up by `v`, stopping at 1.
    pub fn incr_progress(&mut self, v: f64) -> Option<Cmd> {
        self.set_progress(self.progress() + v, true, None)
    }

    /// Animates the progress down by `v`, stopping at 0.
    pub fn decr_progress(&mut self, v: f64) -> Option<Cmd> {
        self.set_progress(self.progress() - v, true, None)
    }

    /// Handles frame messages for this ring; everything else is ignored.
    ///
    /// # Returns
    ///
    /// - `Some(Cmd)` with the next frame, or with a
    ///   [`FinishedMsg`](crate::driver::FinishedMsg) once the animation ends
    /// - `None` for other widgets' frames, stale frames and unrelated messages
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::ring::new;
    ///
    /// let mut a = new(&[]);
    /// let mut b = new(&[]);
    /// a.set_progress(0.5, true, None);
    /// b.set_progress(0.5, true, None);
    ///
    /// // Each ring only answers to its own frames.
    /// assert!(a.update(Box::new(b.frame_msg())).is_none());
    /// assert!(a.update(Box::new(a.frame_msg())).is_some());
    /// ```
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.driver.update(&msg)
    }

    /// Advances the animation to `now` without waiting for a frame message.
    pub fn tick(&mut self, now: Instant) -> Option<Cmd> {
        self.driver.tick(now)
    }

    /// Renders the ring at its current visual progress.
    pub fn view(&self) -> String {
        self.view_as(self.rendered_progress())
    }

    /// Renders the ring at `percent`, ignoring any animation.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lipgloss_extras::lipgloss::strip_ansi;
    /// use progress_view::ring::{new, with_line_width, with_size};
    ///
    /// let ring = new(&[with_size(21.0, 21.0), with_line_width(3.0)]);
    /// let full = strip_ansi(&ring.view_as(1.0));
    ///
    /// assert_eq!(full.lines().count(), 21);
    /// assert!(full.contains('█'));
    /// assert!(!full.contains('░'));
    /// ```
    pub fn view_as(&self, percent: f64) -> String {
        render(
            &self.geometry(),
            clamp_progress(percent),
            &self.style.gradient,
            &self.style.groove_color,
            self.glyphs,
        )
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (new(&[]), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::StrokePath;
    use lipgloss_extras::lipgloss;
    use std::f64::consts::TAU;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const EPS: f64 = 1e-9;

    fn counter() -> (Arc<AtomicUsize>, Completion) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (
            count,
            Box::new(move || {
                handle.fetch_add(1, Ordering::SeqCst);
            }),
        )
    }

    fn sweep(geometry: &RenderGeometry) -> f64 {
        match geometry.fill.path {
            StrokePath::Arc(arc) => arc.sweep_angle.radians,
            StrokePath::Line(_) => panic!("ring fill should be an arc"),
        }
    }

    #[test]
    fn test_new_with_no_options() {
        let ring = new(&[]);
        let style = ring.style();

        assert_eq!(style.ring_width, 7.0);
        assert_eq!(style.groove_width, 7.0);
        assert_eq!(style.start_angle, -FRAC_PI_2);
        assert_eq!(style.end_angle, 1.5 * PI);
        assert_eq!(style.duration, Duration::from_millis(1300));
        assert_eq!(style.timing_curve, TimingCurve::EaseOutExpo);
        assert_eq!(style.gradient.start_point, GradientPoint::new(0.5, 0.0));
        assert_eq!(style.gradient.end_point, GradientPoint::new(0.5, 1.0));
        assert_eq!(ring.progress(), 0.0);
    }

    #[test]
    fn test_default_arc_is_full_turn_from_top() {
        let ring = new(&[with_size(100.0, 100.0)]);
        let geometry = ring.geometry();

        assert!((sweep(&geometry) - TAU).abs() < EPS);
        let start = geometry.fill.path.start_point();
        assert!((start.x - 50.0).abs() < EPS);
        assert!((start.y - (50.0 - ring.ring_radius())).abs() < EPS);
    }

    #[test]
    fn test_line_width_sets_both_widths() {
        let mut ring = new(&[with_size(40.0, 40.0)]);
        ring.set_line_width(4.0);

        assert_eq!(ring.style().ring_width, 4.0);
        assert_eq!(ring.style().groove_width, 4.0);
        assert_eq!(ring.ring_radius(), ring.groove_radius());
        assert_eq!(ring.ring_radius(), 18.0);
        assert!(ring.needs_layout());
    }

    #[test]
    fn test_thinner_ring_shares_centre_line() {
        let ring = new(&[
            with_size(60.0, 40.0),
            with_ring_width(2.0),
            with_groove_width(8.0),
        ]);
        let naive = 40.0 / 2.0 - 2.0 / 2.0;

        assert!((ring.ring_radius() - (naive - (8.0 - 2.0) / 2.0)).abs() < EPS);
        assert!((ring.ring_radius() - ring.groove_radius()).abs() < EPS);

        let geometry = ring.geometry();
        assert_eq!(geometry.fill.width, 2.0);
        assert_eq!(geometry.groove.width, 8.0);
    }

    #[test]
    fn test_angles_change_geometry_not_progress() {
        let mut ring = new(&[]);
        ring.set_progress(0.4, false, None);
        let before = *ring.layout();

        ring.set_progress(0.9, false, None);
        assert!(!ring.needs_layout());
        assert_eq!(*ring.layout(), before);

        ring.set_start_angle(0.0);
        ring.set_end_angle(PI);
        assert!(ring.needs_layout());
        assert!((sweep(ring.layout()) - PI).abs() < EPS);
        assert_eq!(ring.progress(), 0.9);
    }

    #[test]
    fn test_same_bounds_do_not_relayout() {
        let mut ring = new(&[with_size(30.0, 30.0)]);
        ring.set_bounds(Bounds::from_size(30.0, 30.0));
        assert!(!ring.needs_layout());
        ring.set_bounds(Bounds::from_size(31.0, 30.0));
        assert!(ring.needs_layout());
    }

    #[test]
    fn test_set_progress_semantics() {
        let (snap_count, snap) = counter();
        let (first_count, first) = counter();
        let (second_count, second) = counter();
        let mut ring = new(&[with_timing_curve(TimingCurve::Linear)]);
        let start = Instant::now();

        assert!(ring.set_progress_at(2.0, false, Some(snap), start).is_none());
        assert_eq!(ring.progress(), 1.0);
        assert_eq!(snap_count.load(Ordering::SeqCst), 1);

        assert!(ring.set_progress_at(0.3, true, Some(first), start).is_some());
        let midway = start + Duration::from_millis(650);
        let rendered = ring.rendered_progress_at(midway);
        assert!(rendered > 0.3 && rendered < 0.8);

        assert!(ring.set_progress_at(0.8, true, Some(second), midway).is_some());
        assert_eq!(ring.rendered_progress_at(midway), rendered);

        assert!(ring.tick(midway + Duration::from_millis(1300)).is_some());
        assert_eq!(first_count.load(Ordering::SeqCst), 0);
        assert_eq!(second_count.load(Ordering::SeqCst), 1);
        assert_eq!(ring.rendered_progress(), 0.8);
    }

    #[test]
    fn test_style_changes_wait_for_next_animation() {
        let mut ring = new(&[
            with_duration(Duration::from_secs(1)),
            with_timing_curve(TimingCurve::Linear),
        ]);
        let start = Instant::now();
        ring.set_progress_at(1.0, true, None, start);
        ring.set_timing_curve(TimingCurve::EaseIn);
        ring.set_duration(Duration::from_secs(4));

        let quarter = ring.rendered_progress_at(start + Duration::from_millis(250));
        assert!((quarter - 0.25).abs() < 1e-6);
        assert!(ring.tick(start + Duration::from_secs(1)).is_some());
        assert!(!ring.is_animating());

        // A fresh request runs on the new curve and duration.
        let restart = start + Duration::from_secs(2);
        ring.set_progress_at(0.0, false, None, restart);
        ring.set_progress_at(1.0, true, None, restart);
        let eased = ring.rendered_progress_at(restart + Duration::from_secs(1));
        assert!(eased < 0.25);
    }

    #[test]
    fn test_update_rejects_other_ring_frames() {
        let mut a = new(&[]);
        let mut b = new(&[]);
        a.set_progress(0.5, true, None);
        b.set_progress(0.5, true, None);

        assert!(a.update(Box::new(b.frame_msg())).is_none());
        assert!(a.update(Box::new(a.frame_msg())).is_some());
    }

    #[test]
    fn test_view_as_draws_ring() {
        let ring = new(&[with_size(21.0, 21.0), with_line_width(3.0)]);
        let empty = lipgloss::strip_ansi(&ring.view_as(0.0));
        let half = lipgloss::strip_ansi(&ring.view_as(0.5));
        let full = lipgloss::strip_ansi(&ring.view_as(1.0));
        let fills = |s: &str| s.chars().filter(|&c| c == '█').count();

        assert_eq!(empty.lines().count(), 21);
        assert_eq!(fills(&empty), 0);
        assert!(fills(&half) > 0);
        assert!(fills(&half) < fills(&full));
        assert!(!full.contains('░'));
    }

    #[test]
    fn test_style_serde_roundtrip_defaults() {
        let style: RingStyle = serde_json::from_str(r#"{ "ring_width": 3.0 }"#).unwrap();
        assert_eq!(style.ring_width, 3.0);
        assert_eq!(style.groove_width, 7.0);
        assert_eq!(style.timing_curve, TimingCurve::EaseOutExpo);
    }
}
