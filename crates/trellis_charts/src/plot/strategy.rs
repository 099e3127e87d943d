//! Pluggable plot behaviour

use trellis_animation::Animator;
use trellis_core::{Point, Size};

use super::draw_step::DrawStep;
use super::drawer::{Drawer, NullDrawer};
use super::hit_test::ClosestMark;
use super::projector::{AttrToProjector, PlotMetadata};
use crate::dataset::Dataset;

/// Read-only view of a plot handed to strategies
pub struct PlotView<'a> {
    /// `(key, dataset, plot metadata)` in draw order
    pub entries: Vec<(&'a str, &'a Dataset, &'a PlotMetadata)>,
    pub attr_to_projector: &'a AttrToProjector,
}

/// What distinguishes one kind of plot from another.
///
/// The plot owns datasets, projections and animators; the strategy decides
/// which attributes default to what, which steps are drawn and how marks are
/// found under the pointer.
pub trait PlotStrategy {
    /// Projectors used for attributes the caller has not projected
    fn default_projectors(&self) -> AttrToProjector {
        AttrToProjector::new()
    }

    /// Animators keyed by the `animator_key` of the steps this strategy emits
    fn default_animators(&self) -> Vec<(String, Animator)> {
        Vec::new()
    }

    /// Steps for one render pass; `reset` asks for a leading reset step
    fn draw_steps(&self, attrs: &AttrToProjector, reset: bool) -> Vec<DrawStep>;

    fn create_drawer(&self) -> Box<dyn Drawer>;

    fn closest_mark(
        &self,
        _view: &PlotView<'_>,
        _point: Point,
        _max_radius: f32,
    ) -> Option<ClosestMark> {
        None
    }

    /// Hover search radius in pixels
    fn close_detection_radius(&self) -> f32 {
        5.0
    }

    /// Pixel range for a scaled attribute once the plot has a size
    fn pixel_range(&self, _attr: &str, _size: Size) -> Option<(f64, f64)> {
        None
    }
}

/// A plot with no marks of its own: one instant step, nothing drawn
#[derive(Debug, Default)]
pub struct BaseStrategy;

impl PlotStrategy for BaseStrategy {
    fn draw_steps(&self, attrs: &AttrToProjector, _reset: bool) -> Vec<DrawStep> {
        vec![DrawStep::new("main", attrs.clone(), Animator::Null)]
    }

    fn create_drawer(&self) -> Box<dyn Drawer> {
        Box::new(NullDrawer)
    }
}
