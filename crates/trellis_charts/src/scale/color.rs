//! Ordinal label-to-color scale

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use trellis_core::{Color, ListenerId, ListenerSet};

use super::{ExtentKey, Scale};
use crate::config::default_palette;
use crate::error::{ChartError, Result};
use crate::value::{coerce_label, AttrValue};

struct ColorState {
    domain: IndexSet<String>,
    range: Vec<Color>,
    auto_domain: bool,
    extents: IndexMap<ExtentKey, Vec<String>>,
    /// Labels first seen through `scale` rather than an extent
    implicit: IndexSet<String>,
    listeners: ListenerSet<ColorScale>,
}

/// Assigns palette colors to labels in domain order, cycling when the
/// palette is shorter than the domain.
///
/// Looking up an unknown label appends it to the domain and notifies domain
/// listeners. Auto-domain recomputes keep such labels, after the extent labels.
#[derive(Clone)]
pub struct ColorScale {
    inner: Rc<RefCell<ColorState>>,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorScale {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ColorState {
                domain: IndexSet::new(),
                range: default_palette(),
                auto_domain: true,
                extents: IndexMap::new(),
                implicit: IndexSet::new(),
                listeners: ListenerSet::new(),
            })),
        }
    }

    pub fn with_palette(palette: Vec<Color>) -> Result<Self> {
        let scale = Self::new();
        scale.set_range(palette)?;
        Ok(scale)
    }

    pub fn domain(&self) -> Vec<String> {
        self.inner.borrow().domain.iter().cloned().collect()
    }

    pub fn set_domain(&self, domain: Vec<String>) {
        {
            let mut state = self.inner.borrow_mut();
            state.auto_domain = false;
            state.implicit.clear();
        }
        self.apply_domain(domain.into_iter().collect());
    }

    pub fn auto_domain(&self) {
        self.inner.borrow_mut().auto_domain = true;
        self.recompute_domain();
    }

    pub fn range(&self) -> Vec<Color> {
        self.inner.borrow().range.clone()
    }

    pub fn set_range(&self, palette: Vec<Color>) -> Result<()> {
        if palette.is_empty() {
            return Err(ChartError::EmptyPalette);
        }
        self.inner.borrow_mut().range = palette;
        Ok(())
    }

    pub fn scale(&self, label: &str) -> Color {
        let known = {
            let state = self.inner.borrow();
            state
                .domain
                .get_index_of(label)
                .map(|index| state.range[index % state.range.len()])
        };
        if let Some(color) = known {
            return color;
        }

        let domain = {
            let mut state = self.inner.borrow_mut();
            state.implicit.insert(label.to_string());
            let mut domain = state.domain.clone();
            domain.insert(label.to_string());
            domain
        };
        tracing::trace!(label, "color scale domain extended on lookup");
        self.apply_domain(domain);

        let state = self.inner.borrow();
        let index = state.domain.len() - 1;
        state.range[index % state.range.len()]
    }

    pub fn on_domain_change(&self, listener: impl Fn(&ColorScale) + 'static) -> ListenerId {
        self.inner.borrow_mut().listeners.insert(listener)
    }

    pub fn off_domain_change(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id)
    }

    fn recompute_domain(&self) {
        let domain: IndexSet<String> = {
            let state = self.inner.borrow();
            state
                .extents
                .values()
                .flatten()
                .chain(state.implicit.iter())
                .cloned()
                .collect()
        };
        self.apply_domain(domain);
    }

    fn apply_domain(&self, domain: IndexSet<String>) {
        let listeners = {
            let mut state = self.inner.borrow_mut();
            state.domain = domain;
            state.listeners.snapshot()
        };
        for listener in listeners {
            listener(self);
        }
    }
}

impl Scale for ColorScale {
    fn map_value(&self, value: &Value) -> AttrValue {
        AttrValue::Color(self.scale(&coerce_label(value)))
    }

    fn update_extent(&self, key: ExtentKey, values: &[Value]) {
        let labels: IndexSet<String> = values.iter().map(coerce_label).collect();
        let auto = {
            let mut state = self.inner.borrow_mut();
            state.extents.insert(key, labels.into_iter().collect());
            state.auto_domain
        };
        if auto {
            self.recompute_domain();
        }
    }

    fn remove_extent(&self, key: &ExtentKey) {
        let auto = {
            let mut state = self.inner.borrow_mut();
            state.extents.shift_remove(key).is_some() && state.auto_domain
        };
        if auto {
            self.recompute_domain();
        }
    }

    fn set_range_extent(&self, _start: f64, _end: f64) {}

    fn subscribe(&self, listener: Rc<dyn Fn()>) -> ListenerId {
        self.on_domain_change(move |_| listener())
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.off_domain_change(id)
    }
}
