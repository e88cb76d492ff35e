//! Linear progress bar with an animated, gradient-filled stroke.
//!
//! The bar draws a rounded groove across its bounds and a second, optionally
//! inset stroke on top of it. The inner stroke masks a two-colour gradient and
//! is drawn up to the current progress.
//!
//! # Basic Usage
//!
//! ```rust
//! use progress_view::bar::{new, with_edge_inset, with_size};
//!
//! let mut bar = new(&[with_size(30.0, 3.0), with_edge_inset(1.0)]);
//!
//! // Jump straight to 40%; the completion runs before `set_progress` returns.
//! let cmd = bar.set_progress(0.4, false, None);
//! assert!(cmd.is_none());
//! assert_eq!(bar.progress(), 0.4);
//! ```
//!
//! # Animation
//!
//! ```rust
//! use progress_view::bar::new;
//!
//! let mut bar = new(&[]);
//! let cmd = bar.set_progress(0.75, true, Some(Box::new(|| println!("done"))));
//! assert!(cmd.is_some()); // return it from your update() to start the frames
//! assert_eq!(bar.progress(), 0.75);
//! assert!(bar.is_animating());
//! ```

use crate::animation::{clamp_progress, Completion};
use crate::driver::{FillDriver, FrameMsg};
use crate::geometry::{bar_geometry, Bounds, RenderGeometry};
use crate::render::{render, Glyphs, Gradient, GradientPoint};
use crate::timing::TimingCurve;
use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

const DEFAULT_WIDTH: f64 = 40.0;
const DEFAULT_HEIGHT: f64 = 1.0;
const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

pub(crate) const DEFAULT_START_COLOR: &str = "#FF2D55";
pub(crate) const DEFAULT_END_COLOR: &str = "#FF3B30";
pub(crate) const DEFAULT_GROOVE_COLOR: &str = "#8E8E93";

/// Appearance and timing of a progress bar.
///
/// Can be loaded from configuration; missing fields take their defaults.
///
/// ```rust
/// use progress_view::bar::BarStyle;
/// use progress_view::timing::TimingCurve;
///
/// let style: BarStyle = serde_json::from_str(r#"{ "edge_inset": 1.5, "timing_curve": "linear" }"#).unwrap();
/// assert_eq!(style.edge_inset, 1.5);
/// assert_eq!(style.timing_curve, TimingCurve::Linear);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarStyle {
    /// Distance between the groove's edge and the fill.
    pub edge_inset: f64,
    /// Gradient shown through the fill.
    pub gradient: Gradient,
    /// Colour of the groove.
    pub groove_color: String,
    /// Duration of the fill animation.
    pub duration: Duration,
    /// Easing of the fill animation.
    pub timing_curve: TimingCurve,
}

impl Default for BarStyle {
    fn default() -> Self {
        Self {
            edge_inset: 0.0,
            gradient: Gradient {
                start_color: DEFAULT_START_COLOR.to_string(),
                end_color: DEFAULT_END_COLOR.to_string(),
                start_point: GradientPoint::new(0.0, 0.5),
                end_point: GradientPoint::new(1.0, 0.5),
            },
            groove_color: DEFAULT_GROOVE_COLOR.to_string(),
            duration: DEFAULT_DURATION,
            timing_curve: TimingCurve::EaseOutExpo,
        }
    }
}

/// Configuration options applied by [`new`].
#[derive(Debug, Clone)]
pub enum BarOption {
    /// Lays the bar out in the given bounds.
    WithBounds(Bounds),
    /// Sets the distance between groove and fill.
    WithEdgeInset(f64),
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
    WithStyle(BarStyle),
}

impl BarOption {
    fn apply(&self, m: &mut Model) {
        match self {
            BarOption::WithBounds(bounds) => m.bounds = *bounds,
            BarOption::WithEdgeInset(inset) => m.style.edge_inset = *inset,
            BarOption::WithGradient(start, end) => {
                m.style.gradient.start_color = start.clone();
                m.style.gradient.end_color = end.clone();
            }
            BarOption::WithGradientPoints(start, end) => {
                m.style.gradient.start_point = *start;
                m.style.gradient.end_point = *end;
            }
            BarOption::WithGrooveColor(color) => m.style.groove_color = color.clone(),
            BarOption::WithDuration(duration) => m.style.duration = *duration,
            BarOption::WithTimingCurve(curve) => m.style.timing_curve = *curve,
            BarOption::WithGlyphs(glyphs) => m.glyphs = *glyphs,
            BarOption::WithStyle(style) => m.style = style.clone(),
        }
    }
}

/// Lays the bar out in `bounds`.
pub fn with_bounds(bounds: Bounds) -> BarOption {
    BarOption::WithBounds(bounds)
}

/// Lays the bar out at the origin with the given size in cells.
pub fn with_size(width: f64, height: f64) -> BarOption {
    BarOption::WithBounds(Bounds::from_size(width, height))
}

/// Insets the fill from the groove's edge.
pub fn with_edge_inset(inset: f64) -> BarOption {
    BarOption::WithEdgeInset(inset)
}

/// Blends the fill from `start` to `end`.
pub fn with_gradient(start: String, end: String) -> BarOption {
    BarOption::WithGradient(start, end)
}

/// Places the gradient's endpoints, in unit coordinates of the bounds.
pub fn with_gradient_points(start: GradientPoint, end: GradientPoint) -> BarOption {
    BarOption::WithGradientPoints(start, end)
}

/// Colours the groove.
pub fn with_groove_color(color: String) -> BarOption {
    BarOption::WithGrooveColor(color)
}

/// Sets how long an animated progress change takes.
pub fn with_duration(duration: Duration) -> BarOption {
    BarOption::WithDuration(duration)
}

/// Sets the easing of animated progress changes.
pub fn with_timing_curve(curve: TimingCurve) -> BarOption {
    BarOption::WithTimingCurve(curve)
}

/// Draws with custom characters.
pub fn with_glyphs(glyphs: Glyphs) -> BarOption {
    BarOption::WithGlyphs(glyphs)
}

/// Starts from a complete style.
pub fn with_style(style: BarStyle) -> BarOption {
    BarOption::WithStyle(style)
}

/// A fillable progress bar.
///
/// Geometry is cached and only recomputed after the bounds or the edge inset
/// change; progress changes never touch it.
#[derive(Debug)]
pub struct Model {
    style: BarStyle,
    glyphs: Glyphs,
    bounds: Bounds,
    geometry: RenderGeometry,
    needs_layout: bool,
    driver: FillDriver,
}

/// Creates a progress bar at zero progress.
///
/// Defaults: 40×1 cells, no edge inset, pink-to-red horizontal gradient, a
/// two second `easeOutExpo` animation. Options are applied in order, so a
/// later option overrides an earlier one touching the same setting.
///
/// # Arguments
///
/// * `opts` - Configuration options, see the `with_*` functions
///
/// # Examples
///
/// ```rust
/// use progress_view::bar::{new, with_edge_inset, with_gradient, with_size};
///
/// let bar = new(&[
///     with_size(60.0, 3.0),
///     with_edge_inset(1.0),
///     with_gradient("#5A56E0".to_string(), "#EE6FF8".to_string()),
/// ]);
///
/// assert_eq!(bar.bounds().width, 60.0);
/// assert_eq!(bar.geometry().fill.width, 1.0);
/// assert_eq!(bar.progress(), 0.0);
/// ```
pub fn new(opts: &[BarOption]) -> Model {
    let bounds = Bounds::from_size(DEFAULT_WIDTH, DEFAULT_HEIGHT);
    let style = BarStyle::default();
    let mut m = Model {
        geometry: bar_geometry(bounds, style.edge_inset),
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

impl Default for Model {
    fn default() -> Self {
        new(&[])
    }
}

impl Model {
    /// Unique id of this bar, matching the id in its frame messages.
    pub fn id(&self) -> i64 {
        self.driver.id()
    }

    /// The current style.
    pub fn style(&self) -> &BarStyle {
        &self.style
    }

    /// The bounds the bar is laid out in.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Moves or resizes the bar. Equal bounds leave the layout untouched.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        if bounds != self.bounds {
            self.bounds = bounds;
            self.needs_layout = true;
        }
    }

    /// Replaces the whole style.
    pub fn set_style(&mut self, style: BarStyle) {
        self.style = style;
        self.needs_layout = true;
    }

    /// Sets the distance between the groove's edge and the fill.
    pub fn set_edge_inset(&mut self, inset: f64) {
        self.style.edge_inset = inset;
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

    /// Marks the geometry as stale so the next [`layout`](Self::layout)
    /// recomputes it.
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
            self.geometry = bar_geometry(self.bounds, self.style.edge_inset);
            self.needs_layout = false;
            tracing::trace!(id = self.id(), bounds = ?self.bounds, "bar layout");
        }
        &self.geometry
    }

    /// The geometry for the current bounds and style, computed on the fly
    /// when the cache is stale.
    pub fn geometry(&self) -> RenderGeometry {
        if self.needs_layout {
            bar_geometry(self.bounds, self.style.edge_inset)
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
    /// Without animation the fill jumps to `value`, any running animation is
    /// dropped without calling its completion, and `completion` runs before
    /// this returns. With animation the fill moves from wherever it currently
    /// is to `value` using the style's duration and timing curve as they are
    /// right now; later style changes do not affect an animation in flight.
    /// `completion` runs once the animation ends unless another
    /// `set_progress` supersedes it first.
    ///
    /// # Arguments
    ///
    /// * `value` - Target progress; values outside `[0, 1]` are clamped and `NaN` counts as 0
    /// * `animated` - Whether to animate towards `value` or jump straight to it
    /// * `completion` - Called once when the change has fully taken effect
    ///
    /// # Returns
    ///
    /// - `Some(Cmd)` scheduling the first animation frame; return it from your `update`
    /// - `None` when the change was applied immediately
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::bar::new;
    /// use std::sync::atomic::{AtomicBool, Ordering};
    /// use std::sync::Arc;
    ///
    /// let mut bar = new(&[]);
    ///
    /// // Jumping runs the completion right away.
    /// let done = Arc::new(AtomicBool::new(false));
    /// let flag = Arc::clone(&done);
    /// let cmd = bar.set_progress(0.4, false, Some(Box::new(move || flag.store(true, Ordering::SeqCst))));
    /// assert!(cmd.is_none());
    /// assert!(done.load(Ordering::SeqCst));
    ///
    /// // Animating updates the logical progress at once; the fill follows frame by frame.
    /// let cmd = bar.set_progress(0.9, true, None);
    /// assert!(cmd.is_some());
    /// assert_eq!(bar.progress(), 0.9);
    /// assert!(bar.is_animating());
    ///
    /// // Out-of-range values are clamped.
    /// bar.set_progress(1.7, false, None);
    /// assert_eq!(bar.progress(), 1.0);
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
    /// Useful for driving the bar from a clock other than [`Instant::now`],
    /// for instance in tests. A pending layout is applied first.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::bar::{new, with_duration, with_timing_curve};
    /// use progress_view::timing::TimingCurve;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut bar = new(&[
    ///     with_duration(Duration::from_secs(1)),
    ///     with_timing_curve(TimingCurve::Linear),
    /// ]);
    /// let start = Instant::now();
    /// bar.set_progress_at(1.0, true, None, start);
    ///
    /// let quarter = start + Duration::from_millis(250);
    /// let shown = bar.rendered_progress_at(quarter);
    /// assert!((shown - 0.25).abs() < 1e-6);
    ///
    /// // Redirecting mid-flight continues from the value on screen.
    /// bar.set_progress_at(0.0, true, None, quarter);
    /// assert!((bar.rendered_progress_at(quarter) - shown).abs() < 1e-9);
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

    /// Animates the progress up by `v`.
    ///
    /// The new target is relative to the logical progress, not to the value
    /// currently shown, and is clamped to 1.
    ///
    /// # Arguments
    ///
    /// * `v` - Amount to add to the current progress
    ///
    /// # Returns
    ///
    /// The command that drives the animation to the new value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::bar::new;
    ///
    /// let mut bar = new(&[]);
    /// bar.incr_progress(0.3);
    /// bar.incr_progress(0.3);
    /// assert!((bar.progress() - 0.6).abs() < 1e-9);
    ///
    /// bar.incr_progress(1.0);
    /// assert_eq!(bar.progress(), 1.0);
    /// ```
    pub fn incr_progress(&mut self, v: f64) -> Option<Cmd> {
        self.set_progress(self.progress() + v, true, None)
    }

    /// Animates the progress down by `v`, stopping at 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::bar::new;
    ///
    /// let mut upload = new(&[]);
    /// upload.set_progress(0.7, false, None);
    ///
    /// // Retry from an earlier checkpoint.
    /// upload.decr_progress(0.2);
    /// assert!((upload.progress() - 0.5).abs() < 1e-9);
    ///
    /// upload.decr_progress(3.0);
    /// assert_eq!(upload.progress(), 0.0);
    /// ```
    pub fn decr_progress(&mut self, v: f64) -> Option<Cmd> {
        self.set_progress(self.progress() - v, true, None)
    }

    /// Handles frame messages for this bar; everything else is ignored.
    ///
    /// Frames addressed to another widget, or left over from a request that
    /// has since been superseded, are dropped. A frame that finishes the
    /// animation runs its completion before this returns.
    ///
    /// # Arguments
    ///
    /// * `msg` - Any message; only this bar's [`FrameMsg`]s are acted on
    ///
    /// # Returns
    ///
    /// - `Some(Cmd)` scheduling the next frame while the animation runs
    /// - `Some(Cmd)` emitting [`FinishedMsg`](crate::driver::FinishedMsg) on the final frame
    /// - `None` for unrelated messages or when idle
    ///
    /// # Examples
    ///
    /// ## Integration with bubbletea-rs
    /// ```rust
    /// use progress_view::bar;
    /// use bubbletea_rs::{Cmd, Model, Msg};
    ///
    /// struct App {
    ///     bar: bar::Model,
    /// }
    ///
    /// impl Model for App {
    ///     fn update(&mut self, msg: Msg) -> Option<Cmd> {
    ///         // Forward every message; the bar picks out its own frames.
    ///         if let Some(cmd) = self.bar.update(msg) {
    ///             return Some(cmd);
    ///         }
    ///         None
    ///     }
    /// #   fn init() -> (Self, Option<Cmd>) { (Self { bar: bar::new(&[]) }, None) }
    /// #   fn view(&self) -> String { String::new() }
    /// }
    /// ```
    ///
    /// ## Finishing an animation
    /// ```rust
    /// use progress_view::bar::{new, with_duration};
    /// use std::time::Duration;
    ///
    /// let mut bar = new(&[with_duration(Duration::ZERO)]);
    /// bar.set_progress(0.5, true, None);
    ///
    /// let cmd = bar.update(Box::new(bar.frame_msg()));
    /// assert!(cmd.is_some()); // emits FinishedMsg
    /// assert!(!bar.is_animating());
    /// assert_eq!(bar.rendered_progress(), 0.5);
    /// ```
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.driver.update(&msg)
    }

    /// Advances the animation to `now` without waiting for a frame message.
    ///
    /// # Returns
    ///
    /// The next frame while animating, a command emitting
    /// [`FinishedMsg`](crate::driver::FinishedMsg) when the animation has
    /// just ended, and `None` when idle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::bar::{new, with_duration};
    /// use std::time::{Duration, Instant};
    ///
    /// let mut bar = new(&[with_duration(Duration::from_millis(100))]);
    /// let start = Instant::now();
    /// bar.set_progress_at(1.0, true, None, start);
    ///
    /// assert!(bar.tick(start + Duration::from_millis(50)).is_some());
    /// assert!(bar.tick(start + Duration::from_millis(100)).is_some());
    /// assert!(!bar.is_animating());
    /// assert!(bar.tick(start + Duration::from_millis(200)).is_none());
    /// ```
    pub fn tick(&mut self, now: Instant) -> Option<Cmd> {
        self.driver.tick(now)
    }

    /// Renders the bar at its current visual progress.
    pub fn view(&self) -> String {
        self.view_as(self.rendered_progress())
    }

    /// Renders the bar at `percent`, ignoring any animation.
    ///
    /// Handy for static output or when progress is tracked elsewhere. The
    /// value is clamped like a progress request.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lipgloss_extras::lipgloss::strip_ansi;
    /// use progress_view::bar::{new, with_size};
    ///
    /// let bar = new(&[with_size(10.0, 1.0)]);
    ///
    /// assert_eq!(strip_ansi(&bar.view_as(1.0)), "██████████");
    /// assert_eq!(strip_ansi(&bar.view_as(0.0)), "░░░░░░░░░░");
    /// assert_eq!(strip_ansi(&bar.view_as(0.5)).chars().count(), 10);
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
