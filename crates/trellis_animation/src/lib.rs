//! Trellis Animation System
//!
//! Timing primitives used by plots when they hand draw steps to a drawer.
//!
//! # Features
//!
//! - **Easing**: CSS-style easing curves, including cubic bezier
//! - **Animators**: per-step timing (`Null` for instant, `Base` for eased,
//!   staggered transitions)
//! - **Timelines**: lay several steps out back to back and sample their eased
//!   progress at any elapsed time

pub mod animator;
pub mod easing;
pub mod timeline;

pub use animator::{Animator, BaseAnimator};
pub use easing::Easing;
pub use timeline::{Timeline, TimelineEntryId};
