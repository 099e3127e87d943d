use std::cell::{Cell, RefCell};
use std::rc::Rc;

use trellis_core::{Color, DrawCommand, DrawContext, RecordingContext, Rect, Size, SurfaceId};
use trellis_layout::{
    Component, ComponentId, ComponentTree, LayoutError, Lifecycle, SpaceRequest, TableConfig,
};

/// Text-like component: a fixed amount of content that wraps to the offered width
struct Wrapping {
    chars: f32,
    line_height: f32,
}

impl Component for Wrapping {
    fn requested_space(&self, available_width: f32, _available_height: f32) -> SpaceRequest {
        let width = available_width.max(10.0);
        let lines = (self.chars / width).ceil().max(1.0);
        SpaceRequest::new(10.0, lines * self.line_height)
    }

    fn is_fixed_height(&self) -> bool {
        true
    }

    fn render(&mut self, _ctx: &mut dyn DrawContext, _size: Size) {}
}

/// Records the order it was drawn in and draws past its own box
struct Probe {
    name: &'static str,
    log: Rc<RefCell<Vec<&'static str>>>,
    removed: Rc<Cell<bool>>,
    dirty: Rc<Cell<bool>>,
}

impl Component for Probe {
    fn requested_space(&self, _w: f32, _h: f32) -> SpaceRequest {
        SpaceRequest::ZERO
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, size: Size) {
        self.log.borrow_mut().push(self.name);
        ctx.fill_rect(Rect::new(0.0, 0.0, size.width * 4.0, size.height * 4.0), Color::BLACK);
    }

    fn take_layout_invalidation(&mut self) -> bool {
        self.dirty.replace(false)
    }

    fn on_remove(&mut self) {
        self.removed.set(true);
    }
}

struct Probes {
    log: Rc<RefCell<Vec<&'static str>>>,
    removed: Rc<Cell<bool>>,
    dirty: Rc<Cell<bool>>,
}

impl Probes {
    fn new() -> Self {
        Self {
            log: Rc::default(),
            removed: Rc::default(),
            dirty: Rc::default(),
        }
    }

    fn insert(&self, tree: &mut ComponentTree, name: &'static str) -> ComponentId {
        tree.insert(Probe {
            name,
            log: self.log.clone(),
            removed: self.removed.clone(),
            dirty: self.dirty.clone(),
        })
    }
}

#[test]
fn wrapping_cell_converges_and_fits_its_last_request() {
    let mut tree = ComponentTree::new();
    let text = tree.insert(Wrapping {
        chars: 300.0,
        line_height: 12.0,
    });
    let table = tree.create_table(vec![vec![Some(text)]]).unwrap();
    tree.anchor(table, SurfaceId::new(1)).unwrap();
    tree.layout_root(table, 120.0, 400.0).unwrap();

    let bounds = tree.bounds(text).unwrap();
    let last = tree.requested_space(text, bounds.width(), bounds.height()).unwrap();
    assert!(bounds.height() >= last.min_height);
    assert_eq!(bounds.width(), 120.0);
    assert_eq!(bounds.height(), 36.0);

    let grid = tree.table_grid(table).unwrap();
    let layout = grid.iterate_layout(
        120.0,
        400.0,
        true,
        |id, w, h| tree.requested_space(id, w, h).unwrap(),
        |id| tree.fixedness(id),
    );
    assert!(layout.iterations <= 5);
}

#[test]
fn iteration_bound_is_configurable() {
    let mut tree = ComponentTree::new();
    let text = tree.insert(Wrapping {
        chars: 300.0,
        line_height: 12.0,
    });
    let config = TableConfig {
        max_iterations: 1,
        ..TableConfig::default()
    };
    let table = tree
        .create_table_with_config(vec![vec![Some(text)]], config)
        .unwrap();
    let layout = tree.table_grid(table).unwrap().iterate_layout(
        120.0,
        400.0,
        true,
        |id, w, h| tree.requested_space(id, w, h).unwrap(),
        |id| tree.fixedness(id),
    );
    assert_eq!(layout.iterations, 1);
}

#[test]
fn undersized_table_clips_instead_of_failing() {
    let mut tree = ComponentTree::new();
    let text = tree.insert(Wrapping {
        chars: 300.0,
        line_height: 12.0,
    });
    let table = tree.create_table(vec![vec![Some(text)]]).unwrap();
    let mut ctx = RecordingContext::new();
    tree.render_to(table, SurfaceId::new(1), 20.0, 10.0, &mut ctx)
        .unwrap();
    let bounds = tree.bounds(text).unwrap();
    assert!(bounds.height() <= 10.0);
}

#[test]
fn removing_a_child_clears_its_parent_and_readding_transfers_it() {
    let mut tree = ComponentTree::new();
    let probes = Probes::new();
    let first = tree.create_group();
    let second = tree.create_group();
    let child = probes.insert(&mut tree, "child");

    assert!(tree.add_component(first, child, false).unwrap());
    assert_eq!(tree.parent(child), Some(first));

    assert!(tree.remove_component(first, child).unwrap());
    assert!(tree.is_empty(first).unwrap());
    assert_eq!(tree.parent(child), None);
    assert!(!tree.remove_component(first, child).unwrap());

    tree.add_component(first, child, false).unwrap();
    assert!(tree.add_component(second, child, false).unwrap());
    assert!(!tree.has(first, child));
    assert_eq!(tree.components(second).unwrap(), &[child]);
    assert_eq!(tree.parent(child), Some(second));
    assert!(!probes.removed.get());
}

#[test]
fn moving_between_table_cells_and_groups_keeps_the_grid_consistent() {
    let mut tree = ComponentTree::new();
    let probes = Probes::new();
    let child = probes.insert(&mut tree, "child");
    let table = tree.create_table(vec![vec![Some(child), None]]).unwrap();
    let group = tree.create_group();

    tree.add_component(group, child, false).unwrap();
    assert_eq!(tree.table_grid(table).unwrap().cell(0, 0), None);
    assert!(tree.is_empty(table).unwrap());

    assert!(tree.table_add(table, 0, 1, child).unwrap());
    assert!(tree.is_empty(group).unwrap());
    assert_eq!(tree.table_grid(table).unwrap().position(child), Some((0, 1)));

    let other = probes.insert(&mut tree, "other");
    assert_eq!(
        tree.table_add(table, 0, 1, other),
        Err(LayoutError::CellOccupied { row: 0, col: 1 })
    );
}

#[test]
fn remove_tears_down_the_whole_subtree() {
    let mut tree = ComponentTree::new();
    let probes = Probes::new();
    let outer = tree.create_group();
    let inner = tree.create_group();
    let a = probes.insert(&mut tree, "a");
    let b = probes.insert(&mut tree, "b");
    tree.add_component(outer, inner, false).unwrap();
    tree.add_component(inner, a, false).unwrap();
    tree.add_component(inner, b, false).unwrap();

    tree.remove(inner).unwrap();
    assert!(tree.is_empty(outer).unwrap());
    for id in [inner, a, b] {
        assert_eq!(tree.lifecycle(id), Lifecycle::Detached);
    }
    assert!(probes.removed.get());
    assert_eq!(tree.len(), 1);
}

#[test]
fn detach_all_empties_container_but_keeps_children() {
    let mut tree = ComponentTree::new();
    let probes = Probes::new();
    let group = tree.create_group();
    let ids: Vec<_> = ["a", "b", "c"]
        .into_iter()
        .map(|name| probes.insert(&mut tree, name))
        .collect();
    for id in &ids {
        tree.add_component(group, *id, false).unwrap();
    }
    tree.anchor(group, SurfaceId::new(1)).unwrap();

    tree.detach_all(group).unwrap();
    assert!(tree.is_empty(group).unwrap());
    for id in ids {
        assert!(tree.contains(id));
        assert_eq!(tree.parent(id), None);
        assert_eq!(tree.lifecycle(id), Lifecycle::Unanchored);
    }
}

#[test]
fn render_follows_insertion_order_and_clips_children() {
    let mut tree = ComponentTree::new();
    let probes = Probes::new();
    let group = tree.create_group();
    let a = probes.insert(&mut tree, "a");
    let b = probes.insert(&mut tree, "b");
    tree.add_component(group, a, false).unwrap();
    tree.add_component(group, b, false).unwrap();
    let c = probes.insert(&mut tree, "c");
    tree.add_component(group, c, true).unwrap();

    let table = tree.create_table(vec![vec![None, Some(group)]]).unwrap();
    tree.set_col_weight(table, 0, Some(1.0)).unwrap();

    let mut ctx = RecordingContext::new();
    tree.render_to(table, SurfaceId::new(1), 100.0, 50.0, &mut ctx)
        .unwrap();

    assert_eq!(probes.log.borrow().as_slice(), &["c", "a", "b"]);
    match &ctx.commands()[0] {
        DrawCommand::FillRect { rect, clip, .. } => {
            assert_eq!(rect.x(), 50.0);
            assert_eq!(*clip, Some(Rect::new(50.0, 0.0, 50.0, 50.0)));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn redraw_relayouts_only_when_invalidated() {
    let mut tree = ComponentTree::new();
    let probes = Probes::new();
    let group = tree.create_group();
    let a = probes.insert(&mut tree, "a");
    tree.add_component(group, a, false).unwrap();

    let mut ctx = RecordingContext::new();
    tree.render_to(group, SurfaceId::new(1), 40.0, 40.0, &mut ctx)
        .unwrap();
    assert!(!tree.redraw(group, &mut ctx).unwrap());

    probes.dirty.set(true);
    assert!(tree.redraw(group, &mut ctx).unwrap());
    assert!(!tree.needs_layout(group));

    let b = probes.insert(&mut tree, "b");
    tree.add_component(group, b, false).unwrap();
    assert!(tree.needs_layout(group));
    assert!(tree.redraw(group, &mut ctx).unwrap());
    assert_eq!(tree.bounds(b), Some(Rect::new(0.0, 0.0, 40.0, 40.0)));
    assert_eq!(tree.absolute_bounds(b).map(|r| r.x()), Some(0.0));
}
