//! Keyed callback registries
//!
//! Shared handles (scales, datasets) notify subscribers through a
//! [`ListenerSet`]. Notification always runs over a snapshot of the registered
//! callbacks so a callback may subscribe or unsubscribe while being notified.

use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Identifier returned when a listener is registered
    pub struct ListenerId;
}

/// Registered callback receiving `&A`
pub type Listener<A> = Rc<dyn Fn(&A)>;

/// A set of callbacks keyed by [`ListenerId`]
pub struct ListenerSet<A: ?Sized> {
    listeners: SlotMap<ListenerId, Listener<A>>,
}

impl<A: ?Sized> ListenerSet<A> {
    pub fn new() -> Self {
        Self {
            listeners: SlotMap::with_key(),
        }
    }

    pub fn insert<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&A) + 'static,
    {
        self.listeners.insert(Rc::new(listener))
    }

    /// Returns false when `id` was not registered (or already removed).
    pub fn remove(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Clone the current callbacks so they can be invoked without holding a
    /// borrow on the owner.
    pub fn snapshot(&self) -> Vec<Listener<A>> {
        self.listeners.values().cloned().collect()
    }
}

impl<A: ?Sized> Default for ListenerSet<A> {
    fn default() -> Self {
        Self::new()
    }
}
