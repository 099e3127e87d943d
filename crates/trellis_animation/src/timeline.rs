//! Timeline orchestration for sequential draw steps

use slotmap::{new_key_type, SlotMap};

use crate::animator::Animator;

new_key_type! {
    pub struct TimelineEntryId;
}

/// One step placed on a timeline
struct TimelineEntry {
    /// Offset in milliseconds from timeline start
    offset_ms: f32,
    animator: Animator,
    /// Number of elements the step animates
    count: usize,
}

impl TimelineEntry {
    fn duration(&self) -> f32 {
        self.animator.total_time(self.count)
    }
}

/// Lays steps out back to back and samples their progress
pub struct Timeline {
    entries: SlotMap<TimelineEntryId, TimelineEntry>,
    order: Vec<TimelineEntryId>,
    duration_ms: f32,
    current_time: f32,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            order: Vec::new(),
            duration_ms: 0.0,
            current_time: 0.0,
        }
    }

    /// Append a step after every step already on the timeline
    pub fn push(&mut self, animator: Animator, count: usize) -> TimelineEntryId {
        let entry = TimelineEntry {
            offset_ms: self.duration_ms,
            animator,
            count,
        };
        self.duration_ms += entry.duration();
        let id = self.entries.insert(entry);
        self.order.push(id);
        id
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.duration_ms = 0.0;
        self.current_time = 0.0;
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in the order they were pushed
    pub fn entries(&self) -> &[TimelineEntryId] {
        &self.order
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn offset_ms(&self, id: TimelineEntryId) -> Option<f32> {
        self.entries.get(id).map(|e| e.offset_ms)
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn seek(&mut self, time_ms: f32) {
        self.current_time = time_ms.clamp(0.0, self.duration_ms);
    }

    /// Advance the timeline
    pub fn tick(&mut self, dt_ms: f32) {
        self.seek(self.current_time + dt_ms);
    }

    pub fn is_finished(&self) -> bool {
        self.current_time >= self.duration_ms
    }

    /// The step in effect at the current time: the last one that has started
    pub fn active(&self) -> Option<TimelineEntryId> {
        self.order
            .iter()
            .rev()
            .find(|id| {
                self.entries
                    .get(**id)
                    .is_some_and(|e| e.offset_ms <= self.current_time)
            })
            .copied()
    }

    /// Eased progress of element `index` within step `id` at the current time
    pub fn progress(&self, id: TimelineEntryId, index: usize) -> Option<f32> {
        let entry = self.entries.get(id)?;
        let local = self.current_time - entry.offset_ms;
        if local < 0.0 {
            return Some(0.0);
        }
        Some(entry.animator.progress(index, entry.count, local))
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::BaseAnimator;
    use crate::easing::Easing;

    #[test]
    fn steps_are_laid_out_back_to_back() {
        let mut timeline = Timeline::new();
        let reset = timeline.push(Animator::Null, 4);
        let main = timeline.push(
            Animator::Base(BaseAnimator::new().duration(100.0).max_iterative_delay(0.0)),
            4,
        );

        assert_eq!(timeline.offset_ms(reset), Some(0.0));
        assert_eq!(timeline.offset_ms(main), Some(0.0));
        assert_eq!(timeline.duration_ms(), 100.0);
        assert_eq!(timeline.active(), Some(main));
    }

    #[test]
    fn seek_is_clamped_and_progress_follows() {
        let mut timeline = Timeline::new();
        let id = timeline.push(
            Animator::Base(
                BaseAnimator::new()
                    .duration(100.0)
                    .max_iterative_delay(0.0)
                    .easing(Easing::Linear),
            ),
            1,
        );
        timeline.tick(50.0);
        assert_eq!(timeline.progress(id, 0), Some(0.5));
        timeline.tick(1000.0);
        assert!(timeline.is_finished());
        assert_eq!(timeline.current_time(), 100.0);
        assert_eq!(timeline.progress(id, 0), Some(1.0));
    }
}
