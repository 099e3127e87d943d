//! Point-mark plots

use trellis_animation::Animator;
use trellis_core::{Point, Size};

use super::draw_step::DrawStep;
use super::drawer::{Drawer, SymbolDrawer};
use super::hit_test::{ClosestMark, ClosestMarkFinder};
use super::projector::{constant, AttrToProjector, Projector};
use super::strategy::{PlotStrategy, PlotView};
use crate::config::ScatterStyle;

pub const RESET_ANIMATOR: &str = "symbols-reset";
pub const MAIN_ANIMATOR: &str = "symbols";

/// Draws one symbol per datum at `(x, y)`.
///
/// With animation on, changed data first collapses every symbol to radius 0
/// and then grows it to its projected size.
#[derive(Clone, Debug, Default)]
pub struct ScatterStrategy {
    style: ScatterStyle,
}

impl ScatterStrategy {
    pub fn new(style: ScatterStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &ScatterStyle {
        &self.style
    }
}

impl PlotStrategy for ScatterStrategy {
    fn default_projectors(&self) -> AttrToProjector {
        let mut attrs = AttrToProjector::new();
        attrs.insert("r".into(), constant(self.style.radius));
        attrs.insert("opacity".into(), constant(self.style.opacity));
        attrs.insert("fill".into(), constant(self.style.fill_color()));
        attrs.insert("symbol".into(), constant(self.style.symbol));
        attrs
    }

    fn default_animators(&self) -> Vec<(String, Animator)> {
        vec![
            (RESET_ANIMATOR.to_string(), self.style.reset_animator),
            (MAIN_ANIMATOR.to_string(), self.style.main_animator),
        ]
    }

    fn draw_steps(&self, attrs: &AttrToProjector, reset: bool) -> Vec<DrawStep> {
        let mut steps = Vec::with_capacity(2);
        if reset {
            let mut collapsed = attrs.clone();
            collapsed.insert("r".into(), constant(0.0));
            steps.push(DrawStep::new(
                RESET_ANIMATOR,
                collapsed,
                self.style.reset_animator,
            ));
        }
        steps.push(DrawStep::new(
            MAIN_ANIMATOR,
            attrs.clone(),
            self.style.main_animator,
        ));
        steps
    }

    fn create_drawer(&self) -> Box<dyn Drawer> {
        Box::new(SymbolDrawer::new())
    }

    fn closest_mark(
        &self,
        view: &PlotView<'_>,
        point: Point,
        max_radius: f32,
    ) -> Option<ClosestMark> {
        let attrs = view.attr_to_projector;
        let (x, y, r) = (attrs.get("x")?, attrs.get("y")?, attrs.get("r"));
        let mut finder = ClosestMarkFinder::new(point, max_radius);

        for (key, dataset, plot_meta) in &view.entries {
            let dataset_meta = dataset.metadata();
            dataset.with_data(|data| {
                for (i, datum) in data.iter().enumerate() {
                    let number = |p: &Projector| {
                        p(datum, i, &dataset_meta, plot_meta).as_f64()
                    };
                    let (Some(px), Some(py)) = (number(x), number(y)) else {
                        continue;
                    };
                    let radius = r.and_then(number).unwrap_or(0.0);
                    let position = Point::new(px as f32, py as f32);
                    finder.offer(position, radius as f32, || ClosestMark {
                        dataset_key: key.to_string(),
                        index: i,
                        pixel_position: position,
                        datum: datum.clone(),
                    });
                }
            });
        }
        finder.finish()
    }

    fn close_detection_radius(&self) -> f32 {
        self.style.close_detection_radius
    }

    fn pixel_range(&self, attr: &str, size: Size) -> Option<(f64, f64)> {
        match attr {
            "x" => Some((0.0, size.width as f64)),
            "y" => Some((size.height as f64, 0.0)),
            _ => None,
        }
    }
}
