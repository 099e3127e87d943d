//! Drawers turn draw steps into primitives on a [`DrawContext`].

use trellis_animation::{Timeline, TimelineEntryId};
use trellis_core::{Color, DrawContext, Point, Rect};

use super::draw_step::{DrawBatch, DrawStep};
use crate::config::DEFAULT_PALETTE;
use crate::value::SymbolKind;

/// Renders the marks of one dataset
pub trait Drawer {
    /// Apply `batch.steps` in order and draw the final state.
    ///
    /// Returns the time in milliseconds the steps take to animate.
    fn draw(&mut self, ctx: &mut dyn DrawContext, batch: &DrawBatch<'_>) -> f32;

    /// Draw the marks as they look `elapsed_ms` into the last `draw`
    fn render_frame(&mut self, ctx: &mut dyn DrawContext, elapsed_ms: f32) {
        let _ = (ctx, elapsed_ms);
    }

    fn clear(&mut self) {}
}

/// Drawer that only reports timing
#[derive(Debug, Default)]
pub struct NullDrawer;

impl Drawer for NullDrawer {
    fn draw(&mut self, _ctx: &mut dyn DrawContext, batch: &DrawBatch<'_>) -> f32 {
        batch
            .steps
            .iter()
            .map(|s| s.animator.total_time(batch.data.len()))
            .sum()
    }
}

/// A point mark resolved to pixels
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolMark {
    pub index: usize,
    pub center: Point,
    pub radius: f32,
    pub fill: Color,
    pub opacity: f32,
    pub symbol: SymbolKind,
}

impl SymbolMark {
    fn lerp(&self, to: &SymbolMark, t: f32) -> SymbolMark {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        SymbolMark {
            index: to.index,
            center: Point::new(mix(self.center.x, to.center.x), mix(self.center.y, to.center.y)),
            radius: mix(self.radius, to.radius),
            fill: to.fill,
            opacity: mix(self.opacity, to.opacity),
            symbol: to.symbol,
        }
    }
}

/// Draws a symbol per datum from the `x`, `y`, `r`, `fill`, `opacity` and
/// `symbol` attributes
#[derive(Default)]
pub struct SymbolDrawer {
    timeline: Timeline,
    frames: Vec<(TimelineEntryId, Vec<SymbolMark>)>,
    /// Marks shown before the most recent draw
    previous: Vec<SymbolMark>,
}

impl SymbolDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks in their final state after the last draw
    pub fn marks(&self) -> &[SymbolMark] {
        self.frames.last().map(|(_, m)| m.as_slice()).unwrap_or(&[])
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    fn resolve(step: &DrawStep, batch: &DrawBatch<'_>) -> Vec<SymbolMark> {
        let default_fill = Color::from_hex(DEFAULT_PALETTE[0]);
        batch
            .data
            .iter()
            .enumerate()
            .filter_map(|(i, datum)| {
                let attr = |name: &str| {
                    step.attr(name, datum, i, batch.dataset_metadata, batch.plot_metadata)
                };
                let number = |name: &str| attr(name).and_then(|v| v.as_f64());
                let (x, y) = (number("x")?, number("y")?);
                if !x.is_finite() || !y.is_finite() {
                    return None;
                }
                Some(SymbolMark {
                    index: i,
                    center: Point::new(x as f32, y as f32),
                    radius: number("r").unwrap_or(0.0).max(0.0) as f32,
                    fill: attr("fill")
                        .and_then(|v| v.as_color())
                        .unwrap_or(default_fill),
                    opacity: number("opacity").unwrap_or(1.0).clamp(0.0, 1.0) as f32,
                    symbol: attr("symbol")
                        .and_then(|v| v.as_symbol())
                        .unwrap_or_default(),
                })
            })
            .collect()
    }
}

impl Drawer for SymbolDrawer {
    fn draw(&mut self, ctx: &mut dyn DrawContext, batch: &DrawBatch<'_>) -> f32 {
        self.previous = self.marks().to_vec();
        self.timeline.clear();
        self.frames.clear();
        for step in batch.steps {
            let id = self.timeline.push(step.animator, batch.data.len());
            self.frames.push((id, Self::resolve(step, batch)));
        }
        self.timeline.seek(self.timeline.duration_ms());
        for mark in self.marks() {
            paint_symbol(ctx, mark);
        }
        tracing::trace!(
            steps = batch.steps.len(),
            marks = self.marks().len(),
            "drew symbols"
        );
        self.timeline.duration_ms()
    }

    fn render_frame(&mut self, ctx: &mut dyn DrawContext, elapsed_ms: f32) {
        self.timeline.seek(elapsed_ms);
        let Some(active) = self.timeline.active() else {
            return;
        };
        let Some(pos) = self.frames.iter().position(|(id, _)| *id == active) else {
            return;
        };
        let from = match pos {
            0 => &self.previous,
            n => &self.frames[n - 1].1,
        };
        for target in &self.frames[pos].1 {
            let t = self.timeline.progress(active, target.index).unwrap_or(1.0);
            let start = from
                .iter()
                .find(|m| m.index == target.index)
                .cloned()
                .unwrap_or_else(|| SymbolMark {
                    radius: 0.0,
                    ..target.clone()
                });
            paint_symbol(ctx, &start.lerp(target, t));
        }
    }

    fn clear(&mut self) {
        self.timeline.clear();
        self.frames.clear();
        self.previous.clear();
    }
}

/// Emit the primitives for one mark
pub fn paint_symbol(ctx: &mut dyn DrawContext, mark: &SymbolMark) {
    let color = mark.fill.with_alpha(mark.fill.a * mark.opacity);
    let (c, r) = (mark.center, mark.radius);
    if r <= 0.0 {
        return;
    }
    match mark.symbol {
        SymbolKind::Circle => ctx.fill_circle(c, r, color),
        SymbolKind::Square => ctx.fill_rect(Rect::new(c.x - r, c.y - r, 2.0 * r, 2.0 * r), color),
        SymbolKind::Diamond => ctx.fill_polygon(
            &[c.offset(0.0, -r), c.offset(r, 0.0), c.offset(0.0, r), c.offset(-r, 0.0)],
            color,
        ),
        SymbolKind::TriangleUp | SymbolKind::TriangleDown => {
            let dir = if mark.symbol == SymbolKind::TriangleUp { 1.0 } else { -1.0 };
            let half = r * 3f32.sqrt() / 2.0;
            ctx.fill_polygon(
                &[
                    c.offset(0.0, -r * dir),
                    c.offset(half, r * dir / 2.0),
                    c.offset(-half, r * dir / 2.0),
                ],
                color,
            )
        }
        SymbolKind::Cross => {
            let a = r / 3.0;
            ctx.fill_polygon(
                &[
                    c.offset(-r, -a),
                    c.offset(-a, -a),
                    c.offset(-a, -r),
                    c.offset(a, -r),
                    c.offset(a, -a),
                    c.offset(r, -a),
                    c.offset(r, a),
                    c.offset(a, a),
                    c.offset(a, r),
                    c.offset(-a, r),
                    c.offset(-a, a),
                    c.offset(-r, a),
                ],
                color,
            )
        }
    }
}
