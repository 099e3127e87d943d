//! trellis_charts
//!
//! Data-bound plots for the trellis layout tree.
//!
//! - [`Dataset`]: shared records with change notification
//! - [`scale`]: quantitative, category and color scales, the autodomain
//!   [`Domainer`](scale::Domainer) and the [`ScaleDomainCoordinator`](scale::ScaleDomainCoordinator)
//! - [`plot`]: the [`Plot`] component, its strategies, draw steps and drawers
//! - [`interaction`]: hover tracking over nearest-mark search
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use trellis_charts::prelude::*;
//! use trellis_core::{Point, RecordingContext, SurfaceId};
//! use trellis_layout::ComponentTree;
//!
//! let x = QuantitativeScale::new();
//! let y = QuantitativeScale::new();
//! let plot = Plot::scatter();
//! plot.add_dataset(Dataset::new(vec![json!({"a": 0, "b": 0}), json!({"a": 100, "b": 50})]));
//! plot.project_scaled("x", "a", &x);
//! plot.project_scaled("y", "b", &y);
//! assert_eq!(x.domain(), [-2.5, 102.5]);
//!
//! let mut tree = ComponentTree::new();
//! let id = tree.insert(plot.clone());
//! let mut ctx = RecordingContext::new();
//! tree.render_to(id, SurfaceId::new(1), 410.0, 210.0, &mut ctx).unwrap();
//! assert_eq!(ctx.circles().count(), 2);
//!
//! let hit = plot.do_hover(Point::new(10.0, 205.0)).unwrap();
//! assert_eq!(hit.index, 0);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod interaction;
pub mod plot;
pub mod scale;
pub mod value;

pub use config::{ScaleDefaults, ScatterStyle, DEFAULT_PALETTE};
pub use dataset::Dataset;
pub use error::{ChartError, Result};
pub use plot::Plot;
pub use value::{AttrValue, SymbolKind};

/// Common imports for chart users.
pub mod prelude {
    pub use crate::dataset::Dataset;
    pub use crate::interaction::{HoverInteraction, Hoverable};
    pub use crate::plot::{
        Accessor, AttrToProjector, BaseStrategy, ClosestMark, DrawStep, Drawer, Plot,
        PlotMetadata, PlotStrategy, ScatterStrategy, SymbolDrawer,
    };
    pub use crate::scale::{
        CategoryScale, ColorScale, Domainer, LinkedScale, QuantitativeScale, Scale,
        ScaleDomainCoordinator, TickGenerators,
    };
    pub use crate::{AttrValue, ChartError, ScatterStyle, SymbolKind};
}
