//! Runtime plumbing between a [`FillAnimator`] and bubbletea-rs.
//!
//! Every widget owns one driver. The driver gives the widget a unique id,
//! tags each progress request, schedules [`FrameMsg`]s at the display refresh
//! rate and throws away frames that belong to another widget or to a request
//! that has since been superseded.

use crate::animation::{Completion, FillAnimator};
use crate::timing::TimingCurve;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Frames per second of the fill animation.
pub const FPS: u32 = 60;

/// Asks a widget to advance its fill animation by one frame.
///
/// Frames are scheduled by the widget itself; forward every message to the
/// widget's `update` and it will pick out the frames addressed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMsg {
    id: i64,
    tag: i64,
}

impl FrameMsg {
    /// Id of the widget the frame belongs to.
    pub fn id(&self) -> i64 {
        self.id
    }
}

/// Sent once an animated progress change has run to completion.
///
/// Superseded or cancelled animations never produce this message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinishedMsg {
    /// Id of the widget whose animation finished.
    pub id: i64,
}

/// Drives the fill animation of one widget.
#[derive(Debug)]
pub struct FillDriver {
    id: i64,
    tag: i64,
    animator: FillAnimator,
}

impl Default for FillDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FillDriver {
    /// Creates an idle driver with a fresh widget id.
    pub fn new() -> Self {
        Self {
            id: next_id(),
            tag: 0,
            animator: FillAnimator::new(),
        }
    }

    /// The widget id.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// The underlying animator.
    pub fn animator(&self) -> &FillAnimator {
        &self.animator
    }

    /// A frame message addressed to the current animation.
    pub fn frame_msg(&self) -> FrameMsg {
        FrameMsg {
            id: self.id,
            tag: self.tag,
        }
    }

    /// Sets the progress, snapping or starting an animation.
    ///
    /// Every call retags the driver, so frames scheduled for an earlier
    /// request are dropped by [`update`](Self::update). Without animation the
    /// completion runs before this returns and no command is produced. With
    /// animation the returned command schedules the first frame, and the
    /// completion runs from `update` once the animation has finished, unless
    /// a later request supersedes it first.
    ///
    /// # Arguments
    ///
    /// * `value` - Target progress, clamped to `[0, 1]`
    /// * `animated` - Whether to interpolate towards `value`
    /// * `duration` - Running time of the animation, captured now
    /// * `curve` - Easing of the animation, captured now
    /// * `completion` - Called once when the change has taken effect
    /// * `now` - The instant the request is made
    ///
    /// # Returns
    ///
    /// The first frame command when animated, otherwise `None`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use progress_view::driver::FillDriver;
    /// use progress_view::timing::TimingCurve;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut driver = FillDriver::new();
    /// let now = Instant::now();
    /// let long = Duration::from_secs(1);
    ///
    /// assert!(driver.set_progress(0.2, false, long, TimingCurve::Linear, None, now).is_none());
    /// assert!(driver.set_progress(0.6, true, long, TimingCurve::Linear, None, now).is_some());
    /// assert_eq!(driver.animator().progress(), 0.6);
    /// assert!(driver.animator().is_animating());
    /// ```
    pub fn set_progress(
        &mut self,
        value: f64,
        animated: bool,
        duration: Duration,
        curve: TimingCurve,
        completion: Option<Completion>,
        now: Instant,
    ) -> Option<Cmd> {
        self.tag += 1;

        if !animated {
            let value = self.animator.set(value);
            tracing::trace!(id = self.id, value, "progress set without animation");
            if let Some(completion) = completion {
                completion();
            }
            return None;
        }

        self.animator.animate(value, duration, curve, completion, now);
        Some(self.next_frame())
    }

    /// Handles a frame message addressed to this driver.
    ///
    /// Messages that are not a [`FrameMsg`], frames for another widget and
    /// frames tagged for a superseded request all yield `None`. Anything else
    /// advances the animation to the current time, see [`tick`](Self::tick).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bubbletea_rs::Msg;
    /// use progress_view::driver::FillDriver;
    /// use progress_view::timing::TimingCurve;
    /// use std::time::{Duration, Instant};
    ///
    /// let mut driver = FillDriver::new();
    /// let now = Instant::now();
    /// let long = Duration::from_secs(1);
    /// driver.set_progress(0.3, true, long, TimingCurve::Linear, None, now);
    /// let stale = driver.frame_msg();
    /// driver.set_progress(0.9, true, long, TimingCurve::Linear, None, now);
    ///
    /// assert!(driver.update(&(Box::new(stale) as Msg)).is_none());
    /// assert!(driver.update(&(Box::new(driver.frame_msg()) as Msg)).is_some());
    /// ```
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        let frame = msg.downcast_ref::<FrameMsg>()?;
        if frame.id != self.id {
            return None;
        }
        if frame.tag != self.tag {
            tracing::trace!(id = self.id, tag = frame.tag, "dropping stale frame");
            return None;
        }
        self.tick(Instant::now())
    }

    /// Advances the animation to `now`.
    ///
    /// The completion of a finished animation is invoked here, before the
    /// command is returned.
    ///
    /// # Returns
    ///
    /// - `Some(Cmd)` with the next frame while the animation is running
    /// - `Some(Cmd)` emitting [`FinishedMsg`] when it has just finished
    /// - `None` when idle
    pub fn tick(&mut self, now: Instant) -> Option<Cmd> {
        let (finished, completion) = self.animator.advance_finished(now);
        if finished {
            if let Some(completion) = completion {
                completion();
            }
            return Some(self.finished());
        }
        if self.animator.is_animating() {
            return Some(self.next_frame());
        }
        None
    }

    fn next_frame(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        let duration = Duration::from_nanos(1_000_000_000 / FPS as u64);

        bubbletea_tick(duration, move |_| Box::new(FrameMsg { id, tag }) as Msg)
    }

    fn finished(&self) -> Cmd {
        let id = self.id;
        bubbletea_tick(Duration::from_nanos(1), move |_| {
            Box::new(FinishedMsg { id }) as Msg
        })
    }
}
