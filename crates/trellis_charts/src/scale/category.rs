//! Band scale over discrete labels

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use trellis_core::{ListenerId, ListenerSet};

use super::{Domain, ExtentKey, Scale};
use crate::error::{ChartError, Result};
use crate::value::{coerce_label, AttrValue};

pub const DEFAULT_INNER_PADDING: f64 = 0.3;
pub const DEFAULT_OUTER_PADDING: f64 = 0.5;

struct CategoryState {
    domain: Vec<String>,
    range: Domain,
    auto_domain: bool,
    inner_padding: f64,
    outer_padding: f64,
    extents: IndexMap<ExtentKey, Vec<String>>,
    listeners: ListenerSet<CategoryScale>,
}

impl CategoryState {
    /// Signed distance between consecutive band starts
    fn step(&self) -> f64 {
        let n = self.domain.len() as f64;
        let denom = (n - self.inner_padding + 2.0 * self.outer_padding).max(1e-6);
        (self.range[1] - self.range[0]) / denom
    }
}

/// Splits the range into one band per category.
///
/// Labels map to the center of their band. Bands are separated by
/// `inner_padding * step` and the outer edges get `outer_padding * step`.
#[derive(Clone)]
pub struct CategoryScale {
    inner: Rc<RefCell<CategoryState>>,
}

impl Default for CategoryScale {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryScale {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(CategoryState {
                domain: Vec::new(),
                range: [0.0, 1.0],
                auto_domain: true,
                inner_padding: DEFAULT_INNER_PADDING,
                outer_padding: DEFAULT_OUTER_PADDING,
                extents: IndexMap::new(),
                listeners: ListenerSet::new(),
            })),
        }
    }

    pub fn domain(&self) -> Vec<String> {
        self.inner.borrow().domain.clone()
    }

    /// Set the categories explicitly; duplicates are dropped
    pub fn set_domain(&self, domain: Vec<String>) {
        let domain: IndexSet<String> = domain.into_iter().collect();
        self.inner.borrow_mut().auto_domain = false;
        self.apply_domain(domain.into_iter().collect());
    }

    pub fn auto_domain(&self) {
        self.inner.borrow_mut().auto_domain = true;
        self.recompute_domain();
    }

    pub fn is_auto_domain(&self) -> bool {
        self.inner.borrow().auto_domain
    }

    pub fn range(&self) -> Domain {
        self.inner.borrow().range
    }

    pub fn set_range(&self, start: f64, end: f64) {
        self.inner.borrow_mut().range = [start, end];
    }

    pub fn inner_padding(&self) -> f64 {
        self.inner.borrow().inner_padding
    }

    /// Share of a step left empty between bands, in `[0, 1)`
    pub fn set_inner_padding(&self, padding: f64) -> Result<()> {
        if !(0.0..1.0).contains(&padding) {
            return Err(ChartError::InvalidProportion(padding));
        }
        self.inner.borrow_mut().inner_padding = padding;
        Ok(())
    }

    pub fn outer_padding(&self) -> f64 {
        self.inner.borrow().outer_padding
    }

    pub fn set_outer_padding(&self, padding: f64) -> Result<()> {
        if !padding.is_finite() || padding < 0.0 {
            return Err(ChartError::InvalidProportion(padding));
        }
        self.inner.borrow_mut().outer_padding = padding;
        Ok(())
    }

    /// Center of the band for `label`; NaN when the label is not in the domain
    pub fn scale(&self, label: &str) -> f64 {
        let state = self.inner.borrow();
        let Some(index) = state.domain.iter().position(|d| d == label) else {
            return f64::NAN;
        };
        let step = state.step();
        state.range[0] + step * (state.outer_padding + index as f64)
            + step * (1.0 - state.inner_padding) / 2.0
    }

    /// Width of one band in pixels
    pub fn band_width(&self) -> f64 {
        let state = self.inner.borrow();
        if state.domain.is_empty() {
            return 0.0;
        }
        state.step().abs() * (1.0 - state.inner_padding)
    }

    /// Distance between the starts of consecutive bands
    pub fn step_width(&self) -> f64 {
        self.inner.borrow().step().abs()
    }

    /// `[start, end]` of the band for `label`
    pub fn range_band(&self, label: &str) -> Option<Domain> {
        let center = self.scale(label);
        if center.is_nan() {
            return None;
        }
        let half = self.band_width() / 2.0;
        Some([center - half, center + half])
    }

    pub fn on_domain_change(&self, listener: impl Fn(&CategoryScale) + 'static) -> ListenerId {
        self.inner.borrow_mut().listeners.insert(listener)
    }

    pub fn off_domain_change(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id)
    }

    pub fn ptr_eq(&self, other: &CategoryScale) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn recompute_domain(&self) {
        let domain: IndexSet<String> = self
            .inner
            .borrow()
            .extents
            .values()
            .flatten()
            .cloned()
            .collect();
        self.apply_domain(domain.into_iter().collect());
    }

    fn autodomain_if_automatic(&self) {
        if self.is_auto_domain() {
            self.recompute_domain();
        }
    }

    fn apply_domain(&self, domain: Vec<String>) {
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

impl Scale for CategoryScale {
    fn map_value(&self, value: &Value) -> AttrValue {
        AttrValue::Number(self.scale(&coerce_label(value)))
    }

    fn update_extent(&self, key: ExtentKey, values: &[Value]) {
        let labels: IndexSet<String> = values.iter().map(coerce_label).collect();
        if labels.is_empty() {
            self.remove_extent(&key);
            return;
        }
        self.inner
            .borrow_mut()
            .extents
            .insert(key, labels.into_iter().collect());
        self.autodomain_if_automatic();
    }

    fn remove_extent(&self, key: &ExtentKey) {
        let removed = self.inner.borrow_mut().extents.shift_remove(key).is_some();
        if removed {
            self.autodomain_if_automatic();
        }
    }

    fn set_range_extent(&self, start: f64, end: f64) {
        self.set_range(start, end);
    }

    fn subscribe(&self, listener: Rc<dyn Fn()>) -> ListenerId {
        self.on_domain_change(move |_| listener())
    }

    fn unsubscribe(&self, id: ListenerId) -> bool {
        self.off_domain_change(id)
    }
}

impl std::fmt::Debug for CategoryScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("CategoryScale")
            .field("domain", &state.domain)
            .field("range", &state.range)
            .finish()
    }
}
