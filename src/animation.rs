//! Interruptible fill animation shared by the bar and the ring.
//!
//! [`FillAnimator`] keeps two values apart: the *logical* progress, which is
//! always the last requested target, and the *rendered* value, which is what
//! the fill stroke currently shows. While an animation is in flight the
//! rendered value is read from the [`Interpolation`] at a given instant, so a
//! new request issued mid-flight starts exactly where the stroke is.
//!
//! The animator does not know about the runtime. Widgets feed it instants
//! from their frame messages and invoke the completion it hands back.
//!
//! ```rust
//! use progress_view::animation::FillAnimator;
//! use progress_view::timing::TimingCurve;
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut animator = FillAnimator::new();
//! animator.animate(1.0, Duration::from_secs(1), TimingCurve::Linear, None, start);
//!
//! let halfway = animator.current_value(start + Duration::from_millis(500));
//! assert!((halfway - 0.5).abs() < 1e-6);
//! ```

use crate::timing::TimingCurve;
use std::fmt;
use std::time::{Duration, Instant};

/// Callback invoked once when an animated progress change finishes.
pub type Completion = Box<dyn FnOnce() + Send + 'static>;

/// Clamps a requested progress value into `[0, 1]`.
///
/// `NaN` is treated as zero.
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// A single timed interpolation between two progress values.
///
/// Duration and curve are captured when the animation starts and never
/// change afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interpolation {
    /// Value rendered when the animation started.
    pub from: f64,
    /// Target value.
    pub to: f64,
    /// When the animation started.
    pub started_at: Instant,
    /// Total running time.
    pub duration: Duration,
    /// Easing applied to the elapsed time.
    pub curve: TimingCurve,
}

impl Interpolation {
    /// Fraction of the duration that has elapsed at `now`, in `[0, 1]`.
    pub fn elapsed_fraction(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// The interpolated value at `now`.
    pub fn value_at(&self, now: Instant) -> f64 {
        let eased = self.curve.bezier().solve(self.elapsed_fraction(now));
        self.from + (self.to - self.from) * eased
    }

    /// Whether the full duration has elapsed at `now`.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.elapsed_fraction(now) >= 1.0
    }
}

/// Animation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillState {
    /// Nothing in flight; the rendered value equals the logical progress.
    Idle,
    /// Interpolating towards the logical progress.
    Animating(Interpolation),
}

/// Owns the progress value and drives the fill animation.
pub struct FillAnimator {
    progress: f64,
    rest_value: f64,
    state: FillState,
    completion: Option<Completion>,
}

impl fmt::Debug for FillAnimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FillAnimator")
            .field("progress", &self.progress)
            .field("rest_value", &self.rest_value)
            .field("state", &self.state)
            .field("has_completion", &self.completion.is_some())
            .finish()
    }
}

impl Default for FillAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl FillAnimator {
    /// An idle animator at zero progress.
    pub fn new() -> Self {
        Self {
            progress: 0.0,
            rest_value: 0.0,
            state: FillState::Idle,
            completion: None,
        }
    }

    /// The logical progress: the last requested target.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Current state.
    pub fn state(&self) -> FillState {
        self.state
    }

    /// Whether an animation is in flight.
    pub fn is_animating(&self) -> bool {
        matches!(self.state, FillState::Animating(_))
    }

    /// The value the fill stroke shows at `now`.
    pub fn current_value(&self, now: Instant) -> f64 {
        match &self.state {
            FillState::Idle => self.rest_value,
            FillState::Animating(interpolation) => interpolation.value_at(now),
        }
    }

    /// Jumps to `value` without animating.
    ///
    /// Any in-flight animation is discarded together with its completion,
    /// which is never called. Returns the clamped value.
    pub fn set(&mut self, value: f64) -> f64 {
        let value = clamp_progress(value);
        if self.is_animating() {
            tracing::trace!(to = value, "cancelling in-flight fill animation");
        }
        self.progress = value;
        self.rest_value = value;
        self.state = FillState::Idle;
        self.completion = None;
        value
    }

    /// Starts animating from the value rendered at `now` towards `value`.
    ///
    /// An animation already in flight is superseded: the new one continues
    /// from wherever the old one currently is, and the old completion is
    /// dropped without being called. The logical progress becomes the
    /// target immediately.
    ///
    /// # Arguments
    ///
    /// * `value` - Target progress, clamped to `[0, 1]`
    /// * `duration` - How long the interpolation runs; zero finishes on the next advance
    /// * `curve` - Easing applied to the elapsed time
    /// * `completion` - Handed back by [`advance`](Self::advance) when the animation ends
    /// * `now` - Start instant of the interpolation
    ///
    /// # Returns
    ///
    /// The clamped target.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::animation::FillAnimator;
    /// use progress_view::timing::TimingCurve;
    /// use std::time::{Duration, Instant};
    ///
    /// let start = Instant::now();
    /// let second = Duration::from_secs(1);
    /// let mut animator = FillAnimator::new();
    /// animator.set(1.0);
    ///
    /// animator.animate(0.0, second, TimingCurve::Linear, None, start);
    /// let midway = start + Duration::from_millis(500);
    /// let shown = animator.current_value(midway);
    /// assert!((shown - 0.5).abs() < 1e-6);
    ///
    /// // Redirecting starts from the value on screen, not from 0.0.
    /// assert_eq!(animator.animate(2.0, second, TimingCurve::Linear, None, midway), 1.0);
    /// assert_eq!(animator.current_value(midway), shown);
    /// assert_eq!(animator.progress(), 1.0);
    /// ```
    pub fn animate(
        &mut self,
        value: f64,
        duration: Duration,
        curve: TimingCurve,
        completion: Option<Completion>,
        now: Instant,
    ) -> f64 {
        let value = clamp_progress(value);
        let from = self.current_value(now);
        if self.is_animating() {
            tracing::debug!(from, to = value, "redirecting fill animation");
        } else {
            tracing::debug!(from, to = value, ?duration, %curve, "starting fill animation");
        }

        self.progress = value;
        self.rest_value = from;
        self.state = FillState::Animating(Interpolation {
            from,
            to: value,
            started_at: now,
            duration,
            curve,
        });
        self.completion = completion;
        value
    }

    /// Advances the animation to `now`.
    ///
    /// When the animation has run its full duration the animator becomes idle
    /// at the target and the completion of that animation is returned so the
    /// caller can invoke it. Returns `None` otherwise.
    ///
    /// ```rust
    /// use progress_view::animation::FillAnimator;
    /// use progress_view::timing::TimingCurve;
    /// use std::time::{Duration, Instant};
    ///
    /// let start = Instant::now();
    /// let duration = Duration::from_millis(200);
    /// let mut animator = FillAnimator::new();
    /// animator.animate(0.5, duration, TimingCurve::EaseIn, Some(Box::new(|| {})), start);
    ///
    /// assert!(animator.advance(start + Duration::from_millis(100)).is_none());
    /// let completion = animator.advance(start + duration).expect("finished");
    /// completion();
    /// assert!(!animator.is_animating());
    /// assert_eq!(animator.current_value(start + duration), 0.5);
    /// ```
    pub fn advance(&mut self, now: Instant) -> Option<Completion> {
        let FillState::Animating(interpolation) = self.state else {
            return None;
        };
        if !interpolation.is_finished(now) {
            return None;
        }

        tracing::debug!(value = interpolation.to, "fill animation finished");
        self.rest_value = interpolation.to;
        self.state = FillState::Idle;
        self.completion.take()
    }

    /// Like [`advance`](Self::advance), but also reports whether the
    /// animation finished when no completion was registered.
    pub(crate) fn advance_finished(&mut self, now: Instant) -> (bool, Option<Completion>) {
        let was_animating = self.is_animating();
        let completion = self.advance(now);
        (was_animating && !self.is_animating(), completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counter() -> (Arc<AtomicUsize>, Completion) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        let completion: Completion = Box::new(move || {
            handle.fetch_add(1, Ordering::SeqCst);
        });
        (count, completion)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn test_clamp_progress() {
        assert_eq!(clamp_progress(0.4), 0.4);
        assert_eq!(clamp_progress(1.7), 1.0);
        assert_eq!(clamp_progress(-0.3), 0.0);
        assert_eq!(clamp_progress(f64::NAN), 0.0);
        assert_eq!(clamp_progress(f64::INFINITY), 1.0);
    }

    #[test]
    fn test_new_is_idle_at_zero() {
        let animator = FillAnimator::new();
        assert_eq!(animator.progress(), 0.0);
        assert_eq!(animator.state(), FillState::Idle);
        assert_eq!(animator.current_value(Instant::now()), 0.0);
    }

    #[test]
    fn test_set_snaps_immediately() {
        let now = Instant::now();
        let mut animator = FillAnimator::new();

        assert_eq!(animator.set(0.42), 0.42);
        assert_eq!(animator.progress(), 0.42);
        assert_eq!(animator.current_value(now), 0.42);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_set_above_one_matches_one() {
        let mut a = FillAnimator::new();
        let mut b = FillAnimator::new();
        a.set(3.5);
        b.set(1.0);
        assert_eq!(a.progress(), b.progress());
    }

    #[test]
    fn test_set_cancels_animation_without_completion() {
        let now = Instant::now();
        let (count, completion) = counter();
        let mut animator = FillAnimator::new();

        animator.animate(1.0, ms(100), TimingCurve::Linear, Some(completion), now);
        animator.set(0.2);

        assert!(!animator.is_animating());
        assert!(animator.advance(now + ms(500)).is_none());
        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(animator.current_value(now + ms(500)), 0.2);
    }

    #[test]
    fn test_animate_interpolates_and_completes_once() {
        let now = Instant::now();
        let (count, completion) = counter();
        let mut animator = FillAnimator::new();

        animator.animate(0.8, ms(1000), TimingCurve::Linear, Some(completion), now);
        assert_eq!(animator.progress(), 0.8);
        assert_eq!(animator.current_value(now), 0.0);

        let quarter = animator.current_value(now + ms(250));
        assert!((quarter - 0.2).abs() < 1e-6);

        assert!(animator.advance(now + ms(500)).is_none());
        assert!(animator.is_animating());

        let done = animator.advance(now + ms(1000)).expect("completion");
        done();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!animator.is_animating());
        assert_eq!(animator.current_value(now + ms(1000)), 0.8);

        assert!(animator.advance(now + ms(2000)).is_none());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interrupt_continues_from_rendered_value() {
        let now = Instant::now();
        let (first_count, first) = counter();
        let (second_count, second) = counter();
        let mut animator = FillAnimator::new();
        animator.set(1.0);

        animator.animate(0.3, ms(1000), TimingCurve::Linear, Some(first), now);
        let interrupted_at = now + ms(500);
        let rendered = animator.current_value(interrupted_at);
        assert!(rendered > 0.3 && rendered < 0.8, "rendered = {rendered}");

        animator.animate(0.8, ms(1000), TimingCurve::Linear, Some(second), interrupted_at);
        let FillState::Animating(interpolation) = animator.state() else {
            panic!("expected an animation in flight");
        };
        assert_eq!(interpolation.from, rendered);
        assert_eq!(interpolation.to, 0.8);
        assert_eq!(animator.current_value(interrupted_at), rendered);

        let done = animator
            .advance(interrupted_at + ms(1000))
            .expect("second completion");
        done();
        assert_eq!(first_count.load(Ordering::SeqCst), 0);
        assert_eq!(second_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_interpolation_captures_duration_and_curve() {
        let now = Instant::now();
        let interpolation = Interpolation {
            from: 0.0,
            to: 1.0,
            started_at: now,
            duration: ms(200),
            curve: TimingCurve::EaseOutExpo,
        };

        assert_eq!(interpolation.value_at(now), 0.0);
        assert!(interpolation.value_at(now + ms(50)) > 0.25);
        assert_eq!(interpolation.value_at(now + ms(200)), 1.0);
        assert!(interpolation.is_finished(now + ms(300)));
        // Instants before the start read as the start.
        let later = Interpolation {
            started_at: now + ms(10),
            ..interpolation
        };
        assert_eq!(later.elapsed_fraction(now), 0.0);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_advance() {
        let now = Instant::now();
        let (count, completion) = counter();
        let mut animator = FillAnimator::new();

        animator.animate(0.5, Duration::ZERO, TimingCurve::Default, Some(completion), now);
        assert!(animator.is_animating());
        assert_eq!(animator.current_value(now), 0.5);

        let (finished, done) = animator.advance_finished(now);
        assert!(finished);
        done.expect("completion")();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_advance_finished_without_completion() {
        let now = Instant::now();
        let mut animator = FillAnimator::new();
        animator.animate(0.5, ms(10), TimingCurve::Linear, None, now);

        assert!(!animator.advance_finished(now).0);
        let (finished, completion) = animator.advance_finished(now + ms(10));
        assert!(finished);
        assert!(completion.is_none());
        assert!(!animator.advance_finished(now + ms(20)).0);
    }
}
