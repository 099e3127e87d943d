//! Scales map data values to visual values.
//!
//! Quantitative scales map numbers to pixels, category scales map labels to
//! pixel bands and color scales map labels to palette entries. Plots talk to
//! all of them through the object-safe [`Scale`] trait: they report per-dataset
//! extents and subscribe to domain changes.

mod category;
mod color;
mod coordinator;
mod domainer;
mod quantitative;
pub mod ticks;
pub mod transform;

use std::rc::Rc;

use serde_json::Value;
use trellis_core::ListenerId;

use crate::value::AttrValue;

pub use category::CategoryScale;
pub use color::ColorScale;
pub use coordinator::{LinkedScale, ScaleDomainCoordinator};
pub use domainer::Domainer;
pub use quantitative::QuantitativeScale;
pub use ticks::{TickGenerator, TickGenerators};

/// Numeric `[start, end]` pair
pub type Domain = [f64; 2];

/// Identifies one attribute of one plot that contributes an extent to a scale
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtentKey {
    pub plot_id: u64,
    pub attr: String,
}

impl ExtentKey {
    pub fn new(plot_id: u64, attr: impl Into<String>) -> Self {
        Self {
            plot_id,
            attr: attr.into(),
        }
    }
}

/// The view of a scale that plots need
pub trait Scale {
    /// Map one raw record value into the scale's output space
    fn map_value(&self, value: &Value) -> AttrValue;

    /// Replace the values contributed under `key` and re-run autodomain
    fn update_extent(&self, key: ExtentKey, values: &[Value]);

    fn remove_extent(&self, key: &ExtentKey);

    /// Set the pixel extent; scales without a pixel range ignore this
    fn set_range_extent(&self, start: f64, end: f64);

    /// Register a callback run after every domain change
    fn subscribe(&self, listener: Rc<dyn Fn()>) -> ListenerId;

    fn unsubscribe(&self, id: ListenerId) -> bool;
}
