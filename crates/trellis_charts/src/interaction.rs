//! Pointer hover on top of nearest-mark search

use std::cell::RefCell;
use std::rc::Rc;

use trellis_core::{Point, PointerDispatcher, PointerEvent, PointerKind};

use crate::plot::{ClosestMark, Plot};

/// A component that can answer hover queries
pub trait Hoverable {
    fn hover_over_component(&self, _point: Point) {}

    fn hover_out_component(&self, _point: Point) {}

    /// The mark under `point`, in component-local pixels
    fn do_hover(&self, point: Point) -> Option<ClosestMark>;
}

impl Hoverable for Plot {
    fn do_hover(&self, point: Point) -> Option<ClosestMark> {
        Plot::do_hover(self, point)
    }
}

type HoverCallback = Rc<dyn Fn(&ClosestMark)>;

#[derive(Default)]
struct HoverState {
    inside: bool,
    current: Option<ClosestMark>,
    on_over: Option<HoverCallback>,
    on_out: Option<HoverCallback>,
}

/// Tracks the hovered mark of one component and reports changes.
///
/// `on_hover_over` fires when the pointer reaches a new mark, `on_hover_out`
/// when it leaves the previous one or the component.
#[derive(Clone, Default)]
pub struct HoverInteraction {
    state: Rc<RefCell<HoverState>>,
}

impl HoverInteraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_hover_over(&self, callback: impl Fn(&ClosestMark) + 'static) -> &Self {
        self.state.borrow_mut().on_over = Some(Rc::new(callback));
        self
    }

    pub fn on_hover_out(&self, callback: impl Fn(&ClosestMark) + 'static) -> &Self {
        self.state.borrow_mut().on_out = Some(Rc::new(callback));
        self
    }

    /// The mark currently hovered, if any
    pub fn current(&self) -> Option<ClosestMark> {
        self.state.borrow().current.clone()
    }

    /// Route move and leave events for `target` to `hoverable`
    pub fn attach<H>(&self, dispatcher: &mut PointerDispatcher, target: u64, hoverable: H)
    where
        H: Hoverable + 'static,
    {
        let hoverable = Rc::new(hoverable);

        let (this, h) = (self.clone(), hoverable.clone());
        dispatcher.register(target, PointerKind::Move, move |event: &mut PointerEvent| {
            this.handle_move(&*h, event.position);
        });
        let (this, h) = (self.clone(), hoverable);
        dispatcher.register(target, PointerKind::Leave, move |event: &mut PointerEvent| {
            this.handle_leave(&*h, event.position);
        });
    }

    pub fn handle_move(&self, hoverable: &dyn Hoverable, point: Point) -> Option<ClosestMark> {
        let entered = !std::mem::replace(&mut self.state.borrow_mut().inside, true);
        if entered {
            hoverable.hover_over_component(point);
        }

        let hit = hoverable.do_hover(point);
        let (previous, over, out) = {
            let mut state = self.state.borrow_mut();
            if state.current == hit {
                return hit;
            }
            let previous = std::mem::replace(&mut state.current, hit.clone());
            (previous, state.on_over.clone(), state.on_out.clone())
        };
        if let (Some(old), Some(out)) = (&previous, out) {
            out(old);
        }
        if let (Some(new), Some(over)) = (&hit, over) {
            tracing::trace!(key = %new.dataset_key, index = new.index, "hover over mark");
            over(new);
        }
        hit
    }

    pub fn handle_leave(&self, hoverable: &dyn Hoverable, point: Point) {
        let (previous, out) = {
            let mut state = self.state.borrow_mut();
            state.inside = false;
            (state.current.take(), state.on_out.clone())
        };
        hoverable.hover_out_component(point);
        if let (Some(old), Some(out)) = (&previous, out) {
            out(old);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::cell::Cell;

    struct OneMark;

    impl Hoverable for OneMark {
        fn do_hover(&self, point: Point) -> Option<ClosestMark> {
            (point.x < 10.0).then(|| ClosestMark {
                dataset_key: "_0".into(),
                index: 0,
                pixel_position: Point::ZERO,
                datum: Value::Null,
            })
        }
    }

    #[test]
    fn over_and_out_fire_on_changes_only() {
        let overs = Rc::new(Cell::new(0));
        let outs = Rc::new(Cell::new(0));
        let hover = HoverInteraction::new();
        let (o, u) = (overs.clone(), outs.clone());
        hover
            .on_hover_over(move |_| o.set(o.get() + 1))
            .on_hover_out(move |_| u.set(u.get() + 1));

        hover.handle_move(&OneMark, Point::new(1.0, 0.0));
        hover.handle_move(&OneMark, Point::new(2.0, 0.0));
        assert_eq!(overs.get(), 1);

        hover.handle_move(&OneMark, Point::new(50.0, 0.0));
        assert_eq!(outs.get(), 1);
        assert!(hover.current().is_none());

        hover.handle_move(&OneMark, Point::new(1.0, 0.0));
        hover.handle_leave(&OneMark, Point::new(1.0, 0.0));
        assert_eq!((overs.get(), outs.get()), (2, 2));
    }
}
