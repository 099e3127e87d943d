//! Pointer event dispatch
//!
//! Hosts translate raw platform input into [`PointerEvent`]s and hand them to a
//! [`PointerDispatcher`], which routes them to handlers registered per target.

use rustc_hash::FxHashMap;

use crate::geometry::Point;

/// Kind of pointer event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Up,
    Move,
    Enter,
    Leave,
    DoubleClick,
}

/// Keyboard modifier flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    bits: u8,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { bits: 0 };
    pub const SHIFT: u8 = 0b0001;
    pub const CTRL: u8 = 0b0010;
    pub const ALT: u8 = 0b0100;
    pub const META: u8 = 0b1000;

    pub const fn new(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0;
        if shift {
            bits |= Self::SHIFT;
        }
        if ctrl {
            bits |= Self::CTRL;
        }
        if alt {
            bits |= Self::ALT;
        }
        if meta {
            bits |= Self::META;
        }
        Self { bits }
    }

    pub const fn shift(&self) -> bool {
        self.bits & Self::SHIFT != 0
    }

    pub const fn ctrl(&self) -> bool {
        self.bits & Self::CTRL != 0
    }

    pub const fn alt(&self) -> bool {
        self.bits & Self::ALT != 0
    }

    pub const fn meta(&self) -> bool {
        self.bits & Self::META != 0
    }

    pub const fn any(&self) -> bool {
        self.bits != 0
    }
}

/// A pointer event in the target's local pixel space
#[derive(Clone, Debug)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Target identifier (usually a component key)
    pub target: u64,
    pub position: Point,
    pub modifiers: Modifiers,
    pub propagation_stopped: bool,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, target: u64, position: Point) -> Self {
        Self {
            kind,
            target,
            position,
            modifiers: Modifiers::NONE,
            propagation_stopped: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// Pointer handler function type
pub type PointerHandler = Box<dyn FnMut(&mut PointerEvent)>;

/// Dispatches pointer events to registered handlers
pub struct PointerDispatcher {
    handlers: FxHashMap<(u64, PointerKind), Vec<PointerHandler>>,
}

impl PointerDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register a handler for a target and event kind
    pub fn register<F>(&mut self, target: u64, kind: PointerKind, handler: F)
    where
        F: FnMut(&mut PointerEvent) + 'static,
    {
        self.handlers
            .entry((target, kind))
            .or_default()
            .push(Box::new(handler));
    }

    /// Drop every handler registered for `target`
    pub fn unregister_target(&mut self, target: u64) {
        self.handlers.retain(|(t, _), _| *t != target);
    }

    pub fn has_handlers(&self, target: u64, kind: PointerKind) -> bool {
        self.handlers
            .get(&(target, kind))
            .is_some_and(|h| !h.is_empty())
    }

    /// Dispatch an event to all handlers registered for its target and kind
    pub fn dispatch(&mut self, event: &mut PointerEvent) {
        let Some(handlers) = self.handlers.get_mut(&(event.target, event.kind)) else {
            return;
        };
        tracing::trace!(
            target_id = event.target,
            kind = ?event.kind,
            x = event.position.x,
            y = event.position.y,
            "dispatching pointer event"
        );
        for handler in handlers.iter_mut() {
            if event.propagation_stopped {
                break;
            }
            handler(event);
        }
    }
}

impl Default for PointerDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn dispatch_reaches_matching_handlers_only() {
        let hits = Rc::new(Cell::new(0));
        let mut dispatcher = PointerDispatcher::new();

        let h = hits.clone();
        dispatcher.register(1, PointerKind::Move, move |_| h.set(h.get() + 1));
        let h = hits.clone();
        dispatcher.register(2, PointerKind::Move, move |_| h.set(h.get() + 100));

        dispatcher.dispatch(&mut PointerEvent::new(PointerKind::Move, 1, Point::ZERO));
        dispatcher.dispatch(&mut PointerEvent::new(PointerKind::Down, 1, Point::ZERO));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn stop_propagation_skips_later_handlers() {
        let hits = Rc::new(Cell::new(0));
        let mut dispatcher = PointerDispatcher::new();

        dispatcher.register(1, PointerKind::Down, |e| e.stop_propagation());
        let h = hits.clone();
        dispatcher.register(1, PointerKind::Down, move |_| h.set(h.get() + 1));

        dispatcher.dispatch(&mut PointerEvent::new(PointerKind::Down, 1, Point::ZERO));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn unregister_target_drops_handlers() {
        let mut dispatcher = PointerDispatcher::new();
        dispatcher.register(7, PointerKind::Move, |_| {});
        assert!(dispatcher.has_handlers(7, PointerKind::Move));
        dispatcher.unregister_target(7);
        assert!(!dispatcher.has_handlers(7, PointerKind::Move));
    }

    #[test]
    fn modifiers_flags() {
        let m = Modifiers::new(true, false, false, true);
        assert!(m.shift() && m.meta() && m.any());
        assert!(!m.ctrl() && !m.alt());
        assert!(!Modifiers::NONE.any());
    }
}
