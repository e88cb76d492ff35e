#![warn(missing_docs)]

//! # progress-view
//!
//! Animated progress indicators for [bubbletea-rs](https://github.com/joshka/bubbletea-rs)
//! applications: a linear [`bar`] and a circular [`ring`].
//!
//! Both widgets draw a rounded *groove* and a *fill* stroke on top of it. The
//! fill masks a two-colour gradient and is drawn up to the current progress.
//! Progress changes can snap or animate; an animation started while another
//! one is running continues from wherever the fill currently is.
//!
//! ## Components
//!
//! - [`bar`]: `ProgressBar`, a horizontal bar with an optional edge inset
//! - [`ring`]: `ProgressRing`, an arc swept clockwise between two angles
//! - [`timing`]: named easing curves for the fill animation
//! - [`geometry`]: the stroke geometry both widgets are drawn from
//! - [`animation`]: the interruptible fill animation
//!
//! ## Integration with bubbletea-rs
//!
//! ```rust
//! use progress_view::prelude::*;
//! use bubbletea_rs::{Cmd, Model, Msg};
//!
//! struct App {
//!     ring: ProgressRing,
//! }
//!
//! impl Model for App {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let mut ring = ring_new(&[]);
//!         let cmd = ring.set_progress(0.8, true, Some(Box::new(|| {})));
//!         (Self { ring }, cmd)
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         if let Some(done) = msg.downcast_ref::<FinishedMsg>() {
//!             if done.id == self.ring.id() {
//!                 return None;
//!             }
//!         }
//!         // Frame messages drive the animation.
//!         self.ring.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.ring.view()
//!     }
//! }
//! ```

pub mod animation;
pub mod bar;
pub mod driver;
pub mod geometry;
pub mod render;
pub mod ring;
pub mod timing;

/// Commonly used types and constructors.
///
/// ```rust
/// use progress_view::prelude::*;
///
/// let bar: ProgressBar = bar_new(&[]);
/// let ring: ProgressRing = ring_new(&[]);
/// assert_ne!(bar.id(), ring.id());
/// ```
pub mod prelude {
    pub use crate::animation::{Completion, FillAnimator, FillState, Interpolation};
    pub use crate::bar::{new as bar_new, BarOption, BarStyle, Model as ProgressBar};
    pub use crate::driver::{FinishedMsg, FrameMsg};
    pub use crate::geometry::{Bounds, RenderGeometry, Stroke, StrokePath};
    pub use crate::render::{Glyphs, Gradient, GradientPoint};
    pub use crate::ring::{new as ring_new, Model as ProgressRing, RingOption, RingStyle};
    pub use crate::timing::{CubicBezier, ParseTimingCurveError, TimingCurve};
}
