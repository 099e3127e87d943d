//! Linear number-to-pixel scale

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;
use trellis_core::{ListenerId, ListenerSet};

use super::domainer::Domainer;
use super::ticks::{self, TickGenerator};
use super::{Domain, ExtentKey, Scale};
use crate::config::ScaleDefaults;
use crate::error::{ChartError, Result};
use crate::value::{coerce_number, AttrValue};

struct QuantitativeState {
    domain: Domain,
    range: Domain,
    auto_domain: bool,
    clamp: bool,
    num_ticks: usize,
    domainer: Domainer,
    user_set_domainer: bool,
    tick_generator: Option<TickGenerator>,
    extents: IndexMap<ExtentKey, Domain>,
    listeners: ListenerSet<QuantitativeScale>,
    defaults: ScaleDefaults,
}

/// A linear scale over numbers.
///
/// While auto-domain is on, the domain is whatever the [`Domainer`] computes
/// from the extents plots have attached. Setting a domain explicitly turns
/// auto-domain off until [`QuantitativeScale::auto_domain`] is called.
///
/// Cloning yields another handle to the same scale.
#[derive(Clone)]
pub struct QuantitativeScale {
    inner: Rc<RefCell<QuantitativeState>>,
}

impl Default for QuantitativeScale {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantitativeScale {
    pub fn new() -> Self {
        Self::with_defaults(ScaleDefaults::default())
    }

    pub fn with_defaults(defaults: ScaleDefaults) -> Self {
        Self {
            inner: Rc::new(RefCell::new(QuantitativeState {
                domain: defaults.default_extent,
                range: [0.0, 1.0],
                auto_domain: true,
                clamp: false,
                num_ticks: defaults.tick_count.max(1),
                domainer: Domainer::from_defaults(&defaults),
                user_set_domainer: false,
                tick_generator: None,
                extents: IndexMap::new(),
                listeners: ListenerSet::new(),
                defaults,
            })),
        }
    }

    pub fn domain(&self) -> Domain {
        self.inner.borrow().domain
    }

    /// Set an explicit domain and turn auto-domain off.
    ///
    /// A domain with a NaN or infinite endpoint is ignored: the previous
    /// domain stays and `false` is returned.
    pub fn set_domain(&self, domain: Domain) -> bool {
        match self.try_set_domain(domain) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(%err, "ignoring domain");
                false
            }
        }
    }

    /// [`set_domain`](Self::set_domain) that reports a rejected domain
    pub fn try_set_domain(&self, domain: Domain) -> Result<()> {
        if !domain.iter().all(|v| v.is_finite()) {
            return Err(ChartError::InvalidDomain(format!(
                "non-finite endpoint in [{}, {}]",
                domain[0], domain[1]
            )));
        }
        self.inner.borrow_mut().auto_domain = false;
        self.apply_domain(domain);
        Ok(())
    }

    /// Turn auto-domain back on and recompute from the attached extents
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

    /// Map a domain value to the range
    pub fn scale(&self, value: f64) -> f64 {
        let state = self.inner.borrow();
        let ([d0, d1], [r0, r1]) = (state.domain, state.range);
        let span = d1 - d0;
        if span == 0.0 {
            return r0;
        }
        let mut t = (value - d0) / span;
        if state.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }

    /// Map a range value back to the domain
    pub fn invert(&self, value: f64) -> f64 {
        let state = self.inner.borrow();
        let ([d0, d1], [r0, r1]) = (state.domain, state.range);
        let span = r1 - r0;
        if span == 0.0 {
            return d0;
        }
        let mut t = (value - r0) / span;
        if state.clamp {
            t = t.clamp(0.0, 1.0);
        }
        d0 + t * (d1 - d0)
    }

    pub fn clamp(&self) -> bool {
        self.inner.borrow().clamp
    }

    /// Keep [`scale`](Self::scale) output inside the range
    pub fn set_clamp(&self, clamp: bool) {
        self.inner.borrow_mut().clamp = clamp;
    }

    pub fn num_ticks(&self) -> usize {
        self.inner.borrow().num_ticks
    }

    pub fn set_num_ticks(&self, count: usize) -> Result<()> {
        if count == 0 {
            return Err(ChartError::InvalidTickCount);
        }
        self.inner.borrow_mut().num_ticks = count;
        Ok(())
    }

    /// Ticks from the custom generator when one is set
    pub fn ticks(&self) -> Vec<f64> {
        let generator = self.inner.borrow().tick_generator.clone();
        match generator {
            Some(generator) => generator(self),
            None => self.default_ticks(),
        }
    }

    pub fn default_ticks(&self) -> Vec<f64> {
        let state = self.inner.borrow();
        ticks::linear_ticks(state.domain, state.num_ticks)
    }

    pub fn set_tick_generator(&self, generator: Option<TickGenerator>) {
        self.inner.borrow_mut().tick_generator = generator;
    }

    pub fn domainer(&self) -> Domainer {
        self.inner.borrow().domainer.clone()
    }

    /// Replace the domainer; re-runs autodomain when it is on
    pub fn set_domainer(&self, domainer: Domainer) {
        {
            let mut state = self.inner.borrow_mut();
            state.domainer = domainer;
            state.user_set_domainer = true;
        }
        self.autodomain_if_automatic();
    }

    /// Whether [`set_domainer`](Self::set_domainer) has been called
    pub fn has_user_domainer(&self) -> bool {
        self.inner.borrow().user_set_domainer
    }

    pub fn nice_domain(&self, domain: Domain, count: Option<usize>) -> Domain {
        let count = count.unwrap_or_else(|| self.num_ticks());
        ticks::nice(domain, count)
    }

    /// Domain used by the domainer when nothing is attached
    pub fn default_extent(&self) -> Domain {
        self.inner.borrow().defaults.default_extent
    }

    /// Extents currently attached, in attachment order
    pub fn extents(&self) -> Vec<Domain> {
        self.inner.borrow().extents.values().copied().collect()
    }

    /// A detached scale with the same domain, range and settings, without
    /// listeners or extents
    pub fn copy(&self) -> QuantitativeScale {
        let state = self.inner.borrow();
        let copy = QuantitativeScale::with_defaults(state.defaults);
        {
            let mut c = copy.inner.borrow_mut();
            c.domain = state.domain;
            c.range = state.range;
            c.clamp = state.clamp;
            c.num_ticks = state.num_ticks;
            c.domainer = state.domainer.clone();
            c.user_set_domainer = state.user_set_domainer;
            c.tick_generator = state.tick_generator.clone();
        }
        copy
    }

    pub fn on_domain_change(&self, listener: impl Fn(&QuantitativeScale) + 'static) -> ListenerId {
        self.inner.borrow_mut().listeners.insert(listener)
    }

    pub fn off_domain_change(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id)
    }

    pub fn ptr_eq(&self, other: &QuantitativeScale) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn autodomain_if_automatic(&self) {
        if self.is_auto_domain() {
            self.recompute_domain();
        }
    }

    fn recompute_domain(&self) {
        let (domainer, extents) = {
            let state = self.inner.borrow();
            let extents: Vec<Domain> = state.extents.values().copied().collect();
            (state.domainer.clone(), extents)
        };
        let domain = domainer.compute_domain(&extents, self);
        tracing::debug!(?domain, extents = extents.len(), "autodomain");
        self.apply_domain(domain);
    }

    fn apply_domain(&self, domain: Domain) {
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

impl Scale for QuantitativeScale {
    fn map_value(&self, value: &Value) -> AttrValue {
        AttrValue::Number(self.scale(coerce_number(value)))
    }

    fn update_extent(&self, key: ExtentKey, values: &[Value]) {
        let extent = values
            .iter()
            .map(coerce_number)
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Domain>, v| {
                Some(match acc {
                    Some([lo, hi]) => [lo.min(v), hi.max(v)],
                    None => [v, v],
                })
            });
        match extent {
            Some(extent) => {
                self.inner.borrow_mut().extents.insert(key, extent);
                self.autodomain_if_automatic();
            }
            None => self.remove_extent(&key),
        }
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

impl std::fmt::Debug for QuantitativeScale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("QuantitativeScale")
            .field("domain", &state.domain)
            .field("range", &state.range)
            .field("auto_domain", &state.auto_domain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    #[test]
    fn rejects_non_finite_domain() {
        let scale = QuantitativeScale::new();
        assert!(scale.set_domain([0.0, 10.0]));
        assert!(!scale.set_domain([f64::NAN, 5.0]));
        assert!(matches!(
            scale.try_set_domain([0.0, f64::INFINITY]),
            Err(ChartError::InvalidDomain(_))
        ));
        assert!(!scale.set_domain([0.0, f64::INFINITY]));
        assert_eq!(scale.domain(), [0.0, 10.0]);
    }

    #[test]
    fn explicit_domain_disables_autodomain() {
        let scale = QuantitativeScale::new();
        scale.update_extent(ExtentKey::new(1, "x"), &[json!(0), json!(100)]);
        assert_eq!(scale.domain(), [-2.5, 102.5]);

        scale.set_domain([0.0, 1.0]);
        scale.update_extent(ExtentKey::new(1, "x"), &[json!(0), json!(10)]);
        assert_eq!(scale.domain(), [0.0, 1.0]);

        scale.auto_domain();
        assert_eq!(scale.domain(), [-0.25, 10.25]);
    }

    #[test]
    fn removing_last_extent_restores_default() {
        let scale = QuantitativeScale::new();
        let key = ExtentKey::new(3, "y");
        scale.update_extent(key.clone(), &[json!(4), json!("8")]);
        assert_eq!(scale.extents(), vec![[4.0, 8.0]]);
        scale.remove_extent(&key);
        let [lo, hi] = scale.domain();
        assert!((lo + 0.025).abs() < 1e-12 && (hi - 1.025).abs() < 1e-12);
    }

    #[test]
    fn scale_and_invert() {
        let scale = QuantitativeScale::new();
        scale.set_domain([0.0, 100.0]);
        scale.set_range(0.0, 200.0);
        assert_eq!(scale.scale(25.0), 50.0);
        assert_eq!(scale.invert(50.0), 25.0);
        assert_eq!(scale.scale(150.0), 300.0);

        scale.set_clamp(true);
        assert_eq!(scale.scale(150.0), 200.0);
    }

    #[test]
    fn degenerate_domain_maps_to_range_start() {
        let scale = QuantitativeScale::new();
        scale.set_domain([5.0, 5.0]);
        scale.set_range(10.0, 20.0);
        assert_eq!(scale.scale(5.0), 10.0);
    }

    #[test]
    fn custom_tick_generator_sees_the_scale() {
        let scale = QuantitativeScale::new();
        scale.set_domain([0.0, 10.0]);
        scale.set_tick_generator(Some(Rc::new(|s: &QuantitativeScale| vec![s.domain()[1]])));
        assert_eq!(scale.ticks(), vec![10.0]);
        scale.set_tick_generator(None);
        assert_eq!(scale.ticks().len(), 11);
        assert!(scale.set_num_ticks(0).is_err());
    }

    #[test]
    fn set_domainer_reruns_autodomain() {
        let scale = QuantitativeScale::new();
        scale.update_extent(ExtentKey::new(1, "x"), &[json!(0), json!(100)]);
        scale.set_domainer(scale.domainer().nice(10));
        assert!(scale.has_user_domainer());
        assert_eq!(scale.domain(), [-10.0, 110.0]);
    }

    #[test]
    fn listeners_fire_on_every_domain_set() {
        let scale = QuantitativeScale::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = scale.on_domain_change(move |s| {
            assert!(s.domain()[0].is_finite());
            h.set(h.get() + 1);
        });
        scale.set_domain([1.0, 2.0]);
        scale.set_domain([f64::NAN, 2.0]);
        scale.auto_domain();
        assert_eq!(hits.get(), 2);
        assert!(scale.off_domain_change(id));
    }

    #[test]
    fn copy_is_detached() {
        let scale = QuantitativeScale::new();
        scale.set_domain([0.0, 4.0]);
        scale.set_range(0.0, 8.0);
        let copy = scale.copy();
        assert!(!copy.ptr_eq(&scale));
        assert_eq!(copy.domain(), [0.0, 4.0]);
        copy.set_domain([1.0, 2.0]);
        assert_eq!(scale.domain(), [0.0, 4.0]);
    }
}
