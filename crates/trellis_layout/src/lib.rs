//! Trellis Layout Engine
//!
//! Components negotiate space in two passes: each one reports what it needs
//! under an offer ([`Component::requested_space`]), then containers hand out
//! final boxes top-down. Containers come in two kinds:
//!
//! - **Groups** overlay their children in one shared box
//! - **Tables** place children in a grid and negotiate row and column sizes
//!   iteratively (see [`table`])
//!
//! # Example
//!
//! ```rust
//! use trellis_core::{Color, DrawContext, RecordingContext, Size, SurfaceId};
//! use trellis_layout::{Component, ComponentTree, SpaceRequest};
//!
//! struct Swatch;
//!
//! impl Component for Swatch {
//!     fn requested_space(&self, _w: f32, _h: f32) -> SpaceRequest {
//!         SpaceRequest::new(10.0, 10.0)
//!     }
//!
//!     fn render(&mut self, ctx: &mut dyn DrawContext, size: Size) {
//!         ctx.fill_rect(size.to_rect(), Color::from_hex(0x5279c7));
//!     }
//! }
//!
//! let mut tree = ComponentTree::new();
//! let a = tree.insert(Swatch);
//! let b = tree.insert(Swatch);
//! let table = tree.create_table(vec![vec![Some(a), Some(b)]]).unwrap();
//!
//! let mut ctx = RecordingContext::new();
//! tree.render_to(table, SurfaceId::new(1), 200.0, 100.0, &mut ctx).unwrap();
//! assert_eq!(tree.bounds(b).unwrap().x(), 100.0);
//! ```

pub mod component;
pub mod error;
pub mod table;
pub mod tree;

pub use component::{Component, Lifecycle, SpaceRequest, XAlign, YAlign};
pub use error::{LayoutError, Result};
pub use table::{TableConfig, TableGrid, TableLayout};
pub use tree::{ComponentId, ComponentTree};
