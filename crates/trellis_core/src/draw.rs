//! Drawing surface abstraction
//!
//! Components and drawers never talk to a concrete renderer. They emit calls
//! against [`DrawContext`]; hosts implement it for their backend. The
//! [`RecordingContext`] implementation captures commands so layouts and draw
//! steps can be inspected without a renderer.

use smallvec::SmallVec;

use crate::color::Color;
use crate::geometry::{Point, Rect};

/// Immediate-mode 2D drawing surface
///
/// Coordinates are relative to the current offset (see [`DrawContext::push_offset`]).
pub trait DrawContext {
    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);

    fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Color);

    /// Fill a closed polygon.
    fn fill_polygon(&mut self, points: &[Point], color: Color);

    fn stroke_polyline(&mut self, points: &[Point], width: f32, color: Color);

    fn draw_text(&mut self, text: &str, origin: Point, font_size: f32, color: Color);

    /// Restrict subsequent drawing to `rect` (intersected with the current clip).
    fn push_clip(&mut self, rect: Rect);

    fn pop_clip(&mut self);

    /// Translate subsequent drawing by `offset`.
    fn push_offset(&mut self, offset: Point);

    fn pop_offset(&mut self);
}

/// A recorded drawing command, in absolute surface coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
        clip: Option<Rect>,
    },
    FillCircle {
        center: Point,
        radius: f32,
        color: Color,
        clip: Option<Rect>,
    },
    StrokeCircle {
        center: Point,
        radius: f32,
        width: f32,
        color: Color,
        clip: Option<Rect>,
    },
    FillPolygon {
        points: Vec<Point>,
        color: Color,
        clip: Option<Rect>,
    },
    StrokePolyline {
        points: Vec<Point>,
        width: f32,
        color: Color,
        clip: Option<Rect>,
    },
    Text {
        text: String,
        origin: Point,
        font_size: f32,
        color: Color,
        clip: Option<Rect>,
    },
}

impl DrawCommand {
    /// Clip rect that was active when the command was recorded
    pub fn clip(&self) -> Option<Rect> {
        match self {
            DrawCommand::FillRect { clip, .. }
            | DrawCommand::FillCircle { clip, .. }
            | DrawCommand::StrokeCircle { clip, .. }
            | DrawCommand::FillPolygon { clip, .. }
            | DrawCommand::StrokePolyline { clip, .. }
            | DrawCommand::Text { clip, .. } => *clip,
        }
    }
}

/// [`DrawContext`] that records every call
#[derive(Clone, Debug, Default)]
pub struct RecordingContext {
    commands: Vec<DrawCommand>,
    offsets: SmallVec<[Point; 8]>,
    clips: SmallVec<[Rect; 8]>,
}

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Circles drawn so far, in order.
    pub fn circles(&self) -> impl Iterator<Item = (Point, f32, Color)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillCircle {
                center,
                radius,
                color,
                ..
            } => Some((*center, *radius, *color)),
            _ => None,
        })
    }

    fn current_offset(&self) -> Point {
        self.offsets.last().copied().unwrap_or(Point::ZERO)
    }

    fn current_clip(&self) -> Option<Rect> {
        self.clips.last().copied()
    }

    fn abs(&self, p: Point) -> Point {
        let o = self.current_offset();
        p.offset(o.x, o.y)
    }
}

impl DrawContext for RecordingContext {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let o = self.current_offset();
        self.commands.push(DrawCommand::FillRect {
            rect: rect.offset(o.x, o.y),
            color,
            clip: self.current_clip(),
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center: self.abs(center),
            radius,
            color,
            clip: self.current_clip(),
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f32, width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center: self.abs(center),
            radius,
            width,
            color,
            clip: self.current_clip(),
        });
    }

    fn fill_polygon(&mut self, points: &[Point], color: Color) {
        let points = points.iter().map(|p| self.abs(*p)).collect();
        self.commands.push(DrawCommand::FillPolygon {
            points,
            color,
            clip: self.current_clip(),
        });
    }

    fn stroke_polyline(&mut self, points: &[Point], width: f32, color: Color) {
        let points = points.iter().map(|p| self.abs(*p)).collect();
        self.commands.push(DrawCommand::StrokePolyline {
            points,
            width,
            color,
            clip: self.current_clip(),
        });
    }

    fn draw_text(&mut self, text: &str, origin: Point, font_size: f32, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            origin: self.abs(origin),
            font_size,
            color,
            clip: self.current_clip(),
        });
    }

    fn push_clip(&mut self, rect: Rect) {
        let o = self.current_offset();
        let abs = rect.offset(o.x, o.y);
        let clip = match self.current_clip() {
            Some(current) => current.intersect(&abs),
            None => abs,
        };
        self.clips.push(clip);
    }

    fn pop_clip(&mut self) {
        self.clips.pop();
    }

    fn push_offset(&mut self, offset: Point) {
        let o = self.current_offset();
        self.offsets.push(o.offset(offset.x, offset.y));
    }

    fn pop_offset(&mut self) {
        self.offsets.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_accumulate() {
        let mut ctx = RecordingContext::new();
        ctx.push_offset(Point::new(10.0, 0.0));
        ctx.push_offset(Point::new(5.0, 5.0));
        ctx.fill_circle(Point::new(1.0, 1.0), 2.0, Color::BLACK);
        ctx.pop_offset();
        ctx.fill_circle(Point::new(1.0, 1.0), 2.0, Color::BLACK);
        ctx.pop_offset();

        let centers: Vec<Point> = ctx.circles().map(|(c, _, _)| c).collect();
        assert_eq!(centers, vec![Point::new(16.0, 6.0), Point::new(11.0, 1.0)]);
    }

    #[test]
    fn nested_clips_intersect() {
        let mut ctx = RecordingContext::new();
        ctx.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        ctx.push_offset(Point::new(50.0, 50.0));
        ctx.push_clip(Rect::new(0.0, 0.0, 100.0, 100.0));
        ctx.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), Color::WHITE);

        assert_eq!(
            ctx.commands()[0].clip(),
            Some(Rect::new(50.0, 50.0, 50.0, 50.0))
        );
    }

    #[test]
    fn take_commands_empties_recording() {
        let mut ctx = RecordingContext::new();
        ctx.draw_text("hi", Point::ZERO, 12.0, Color::BLACK);
        assert_eq!(ctx.take_commands().len(), 1);
        assert!(ctx.commands().is_empty());
    }
}
