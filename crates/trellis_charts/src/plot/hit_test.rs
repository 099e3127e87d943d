//! Nearest-mark search

use serde_json::Value;
use trellis_core::Point;

/// The mark nearest to a pointer
#[derive(Clone, Debug, PartialEq)]
pub struct ClosestMark {
    pub dataset_key: String,
    /// Index of the datum within its dataset
    pub index: usize,
    pub pixel_position: Point,
    pub datum: Value,
}

/// Accumulates candidate marks and keeps the best one.
///
/// A mark contains the point when the point lies inside its radius. Containing
/// marks always beat non-containing ones; otherwise a mark only qualifies if it
/// is within `max_radius`. Within each group the smaller distance wins and the
/// first mark offered wins ties.
pub struct ClosestMarkFinder {
    point: Point,
    max_radius_sq: f32,
    best: Option<(bool, f32, ClosestMark)>,
}

impl ClosestMarkFinder {
    pub fn new(point: Point, max_radius: f32) -> Self {
        Self {
            point,
            max_radius_sq: max_radius * max_radius,
            best: None,
        }
    }

    /// Consider a mark drawn at `position` with `radius`; `mark` is only
    /// called when the candidate becomes the best so far
    pub fn offer(&mut self, position: Point, radius: f32, mark: impl FnOnce() -> ClosestMark) {
        let dist_sq = self.point.distance_sq(position);
        if !dist_sq.is_finite() {
            return;
        }
        let contains = dist_sq <= radius * radius;
        if !contains && dist_sq > self.max_radius_sq {
            return;
        }
        let better = match &self.best {
            None => true,
            Some((best_contains, best_dist, _)) => match (contains, *best_contains) {
                (true, false) => true,
                (false, true) => false,
                _ => dist_sq < *best_dist,
            },
        };
        if better {
            self.best = Some((contains, dist_sq, mark()));
        }
    }

    pub fn finish(self) -> Option<ClosestMark> {
        self.best.map(|(_, _, mark)| mark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(index: usize, at: Point) -> ClosestMark {
        ClosestMark {
            dataset_key: "_0".into(),
            index,
            pixel_position: at,
            datum: Value::Null,
        }
    }

    #[test]
    fn containing_mark_beats_nearer_non_containing() {
        let cursor = Point::new(0.0, 0.0);
        let mut finder = ClosestMarkFinder::new(cursor, 10.0);
        let near = Point::new(2.0, 0.0);
        let big = Point::new(4.0, 0.0);
        finder.offer(near, 1.0, || mark(0, near));
        finder.offer(big, 5.0, || mark(1, big));
        assert_eq!(finder.finish().map(|m| m.index), Some(1));
    }

    #[test]
    fn ties_keep_the_first_mark() {
        let cursor = Point::new(0.0, 0.0);
        let mut finder = ClosestMarkFinder::new(cursor, 10.0);
        let a = Point::new(3.0, 0.0);
        let b = Point::new(0.0, 3.0);
        finder.offer(a, 1.0, || mark(0, a));
        finder.offer(b, 1.0, || mark(1, b));
        assert_eq!(finder.finish().map(|m| m.index), Some(0));
    }

    #[test]
    fn nothing_in_reach() {
        let mut finder = ClosestMarkFinder::new(Point::ZERO, 5.0);
        let far = Point::new(20.0, 0.0);
        finder.offer(far, 3.0, || mark(0, far));
        assert!(finder.finish().is_none());
    }
}
