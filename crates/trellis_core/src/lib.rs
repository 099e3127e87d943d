//! Trellis Core
//!
//! Foundational types shared by every Trellis crate:
//!
//! - **Geometry**: points, sizes and rectangles in pixel space
//! - **Color**: RGBA colors with hex parsing
//! - **Drawing**: the [`DrawContext`] surface trait and a recording implementation
//! - **Pointer dispatch**: routing raw pointer coordinates to registered handlers
//! - **Listeners**: keyed callback registries used for change notification
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{Color, DrawCommand, DrawContext, Point, RecordingContext, Rect};
//!
//! let mut ctx = RecordingContext::new();
//! ctx.push_offset(Point::new(10.0, 10.0));
//! ctx.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), Color::BLACK);
//! ctx.pop_offset();
//!
//! match &ctx.commands()[0] {
//!     DrawCommand::FillRect { rect, .. } => assert_eq!(rect.x(), 10.0),
//!     other => panic!("unexpected command {other:?}"),
//! }
//! ```

pub mod color;
pub mod draw;
pub mod events;
pub mod geometry;
pub mod listeners;
pub mod surface;

pub use color::{Color, ColorParseError};
pub use draw::{DrawCommand, DrawContext, RecordingContext};
pub use events::{Modifiers, PointerDispatcher, PointerEvent, PointerKind};
pub use geometry::{Point, Rect, Size};
pub use listeners::{ListenerId, ListenerSet};
pub use surface::{SurfaceId, SurfaceIdGenerator};
