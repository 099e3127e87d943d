//! Draw-step animators
//!
//! An [`Animator`] describes how one draw step transitions its marks from their
//! previous attribute values to the new ones. Marks are staggered: element `i`
//! starts `iterative_delay * i` after the step's start delay, and the stagger
//! shrinks when the whole step would otherwise overrun `max_total_duration_ms`.

use crate::easing::Easing;

/// Timing for an eased, staggered transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseAnimator {
    pub duration_ms: f32,
    pub start_delay_ms: f32,
    /// Upper bound on the per-element stagger
    pub max_iterative_delay_ms: f32,
    pub max_total_duration_ms: f32,
    pub easing: Easing,
}

impl BaseAnimator {
    pub const DEFAULT_DURATION_MS: f32 = 300.0;
    pub const DEFAULT_MAX_ITERATIVE_DELAY_MS: f32 = 15.0;
    pub const DEFAULT_MAX_TOTAL_DURATION_MS: f32 = 600.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn duration(mut self, ms: f32) -> Self {
        self.duration_ms = ms.max(0.0);
        self
    }

    pub fn start_delay(mut self, ms: f32) -> Self {
        self.start_delay_ms = ms.max(0.0);
        self
    }

    pub fn max_iterative_delay(mut self, ms: f32) -> Self {
        self.max_iterative_delay_ms = ms.max(0.0);
        self
    }

    pub fn max_total_duration(mut self, ms: f32) -> Self {
        self.max_total_duration_ms = ms.max(0.0);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Stagger between consecutive elements when animating `count` of them.
    pub fn iterative_delay(&self, count: usize) -> f32 {
        let gaps = count.saturating_sub(1).max(1) as f32;
        let budget = (self.max_total_duration_ms - self.duration_ms).max(0.0) / gaps;
        self.max_iterative_delay_ms.min(budget)
    }
}

impl Default for BaseAnimator {
    fn default() -> Self {
        Self {
            duration_ms: Self::DEFAULT_DURATION_MS,
            start_delay_ms: 0.0,
            max_iterative_delay_ms: Self::DEFAULT_MAX_ITERATIVE_DELAY_MS,
            max_total_duration_ms: Self::DEFAULT_MAX_TOTAL_DURATION_MS,
            easing: Easing::ExpOut,
        }
    }
}

/// How a draw step is animated
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Animator {
    /// Apply attributes immediately
    #[default]
    Null,
    Base(BaseAnimator),
}

impl Animator {
    pub fn base() -> Self {
        Animator::Base(BaseAnimator::default())
    }

    pub fn is_instant(&self) -> bool {
        match self {
            Animator::Null => true,
            Animator::Base(b) => b.duration_ms <= 0.0 && b.start_delay_ms <= 0.0,
        }
    }

    /// Total time in milliseconds needed to animate `count` elements.
    pub fn total_time(&self, count: usize) -> f32 {
        match self {
            Animator::Null => 0.0,
            Animator::Base(b) => {
                let gaps = count.saturating_sub(1) as f32;
                b.start_delay_ms + b.iterative_delay(count) * gaps + b.duration_ms
            }
        }
    }

    /// Delay before element `index` (out of `count`) starts moving.
    pub fn element_delay(&self, index: usize, count: usize) -> f32 {
        match self {
            Animator::Null => 0.0,
            Animator::Base(b) => b.start_delay_ms + b.iterative_delay(count) * index as f32,
        }
    }

    /// Eased progress of element `index` at `elapsed_ms` into the step.
    pub fn progress(&self, index: usize, count: usize, elapsed_ms: f32) -> f32 {
        match self {
            Animator::Null => 1.0,
            Animator::Base(b) => {
                let local = elapsed_ms - self.element_delay(index, count);
                if local <= 0.0 {
                    0.0
                } else if b.duration_ms <= 0.0 || local >= b.duration_ms {
                    1.0
                } else {
                    b.easing.apply(local / b.duration_ms)
                }
            }
        }
    }
}
