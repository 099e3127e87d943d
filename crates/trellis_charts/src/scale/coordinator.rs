//! Keeps the domains of several scales identical

use std::cell::{Cell, RefCell};
use std::fmt::Debug;
use std::rc::{Rc, Weak};

use trellis_core::ListenerId;

use super::{CategoryScale, Domain, QuantitativeScale};
use crate::error::{ChartError, Result};

/// A scale whose domain can be mirrored onto its peers
pub trait LinkedScale: Clone + 'static {
    type Domain: Clone + PartialEq + Debug;

    fn linked_domain(&self) -> Self::Domain;

    fn set_linked_domain(&self, domain: Self::Domain);

    fn subscribe_domain(&self, listener: Rc<dyn Fn(&Self)>) -> ListenerId;

    fn unsubscribe_domain(&self, id: ListenerId) -> bool;

    /// Whether both handles refer to the same scale
    fn same_scale(&self, other: &Self) -> bool;
}

impl LinkedScale for QuantitativeScale {
    type Domain = Domain;

    fn linked_domain(&self) -> Domain {
        self.domain()
    }

    fn set_linked_domain(&self, domain: Domain) {
        self.set_domain(domain);
    }

    fn subscribe_domain(&self, listener: Rc<dyn Fn(&Self)>) -> ListenerId {
        self.on_domain_change(move |scale| listener(scale))
    }

    fn unsubscribe_domain(&self, id: ListenerId) -> bool {
        self.off_domain_change(id)
    }

    fn same_scale(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl LinkedScale for CategoryScale {
    type Domain = Vec<String>;

    fn linked_domain(&self) -> Vec<String> {
        self.domain()
    }

    fn set_linked_domain(&self, domain: Vec<String>) {
        self.set_domain(domain);
    }

    fn subscribe_domain(&self, listener: Rc<dyn Fn(&Self)>) -> ListenerId {
        self.on_domain_change(move |scale| listener(scale))
    }

    fn unsubscribe_domain(&self, id: ListenerId) -> bool {
        self.off_domain_change(id)
    }

    fn same_scale(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

struct CoordinatorState<S: LinkedScale> {
    scales: Vec<S>,
    domain: RefCell<S::Domain>,
    rescaling: Cell<bool>,
    subscriptions: RefCell<Vec<ListenerId>>,
}

impl<S: LinkedScale> CoordinatorState<S> {
    fn rescale(&self, source: &S) {
        if self.rescaling.replace(true) {
            return;
        }
        let domain = source.linked_domain();
        tracing::trace!(?domain, "propagating linked domain");
        *self.domain.borrow_mut() = domain.clone();
        for scale in self.scales.iter().filter(|s| !s.same_scale(source)) {
            scale.set_linked_domain(domain.clone());
        }
        self.rescaling.set(false);
    }
}

/// Links scales so that a domain set on any one of them is applied to the
/// others before the setter returns.
///
/// The first scale's domain is copied to the rest on construction. Dropping
/// the coordinator unlinks the scales.
pub struct ScaleDomainCoordinator<S: LinkedScale> {
    state: Rc<CoordinatorState<S>>,
}

impl<S: LinkedScale> ScaleDomainCoordinator<S> {
    pub fn new(scales: Vec<S>) -> Result<Self> {
        let first = scales.first().ok_or(ChartError::EmptyCoordinator)?;
        let domain = first.linked_domain();
        for scale in scales.iter().skip(1) {
            scale.set_linked_domain(domain.clone());
        }

        let state = Rc::new(CoordinatorState {
            scales,
            domain: RefCell::new(domain),
            rescaling: Cell::new(false),
            subscriptions: RefCell::new(Vec::new()),
        });
        let ids: Vec<ListenerId> = state
            .scales
            .iter()
            .map(|scale| {
                let weak: Weak<CoordinatorState<S>> = Rc::downgrade(&state);
                scale.subscribe_domain(Rc::new(move |source: &S| {
                    if let Some(state) = weak.upgrade() {
                        state.rescale(source);
                    }
                }))
            })
            .collect();
        *state.subscriptions.borrow_mut() = ids;

        tracing::debug!(scales = state.scales.len(), "linked scale domains");
        Ok(Self { state })
    }

    /// The domain last propagated to every linked scale
    pub fn domain(&self) -> S::Domain {
        self.state.domain.borrow().clone()
    }

    pub fn scales(&self) -> &[S] {
        &self.state.scales
    }
}

impl<S: LinkedScale> Drop for ScaleDomainCoordinator<S> {
    fn drop(&mut self) {
        let ids = std::mem::take(&mut *self.state.subscriptions.borrow_mut());
        for (scale, id) in self.state.scales.iter().zip(ids) {
            scale.unsubscribe_domain(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_copies_first_domain() {
        let a = QuantitativeScale::new();
        let b = QuantitativeScale::new();
        a.set_domain([3.0, 7.0]);
        let coordinator = ScaleDomainCoordinator::new(vec![a.clone(), b.clone()]).unwrap();
        assert_eq!(b.domain(), [3.0, 7.0]);
        assert_eq!(coordinator.domain(), [3.0, 7.0]);
    }

    #[test]
    fn empty_is_an_error() {
        let result = ScaleDomainCoordinator::<QuantitativeScale>::new(Vec::new());
        assert!(matches!(result, Err(ChartError::EmptyCoordinator)));
    }

    #[test]
    fn drop_unlinks() {
        let a = QuantitativeScale::new();
        let b = QuantitativeScale::new();
        let coordinator = ScaleDomainCoordinator::new(vec![a.clone(), b.clone()]).unwrap();
        drop(coordinator);
        a.set_domain([0.0, 50.0]);
        assert_eq!(b.domain(), [0.0, 1.0]);
    }

    #[test]
    fn links_category_scales() {
        let a = CategoryScale::new();
        let b = CategoryScale::new();
        let _coordinator = ScaleDomainCoordinator::new(vec![a.clone(), b.clone()]).unwrap();
        b.set_domain(vec!["x".into(), "y".into()]);
        assert_eq!(a.domain(), b.domain());
    }
}
