//! Component tree management
//!
//! The tree owns every component in an arena. Containers list their children
//! by id and each child keeps a plain back-reference to its parent, so a
//! component has at most one parent and removing it from a container clears
//! that link.
//!
//! Layout is two-pass: space is requested bottom-up through
//! [`ComponentTree::requested_space`], then allocated top-down by
//! [`ComponentTree::compute_layout`]. Rendering walks children in insertion
//! order, which is also their z-order.

use slotmap::{new_key_type, Key, SlotMap, SparseSecondaryMap};
use smallvec::SmallVec;
use trellis_core::{DrawContext, Point, Rect, Size, SurfaceId};

use crate::component::{Component, Lifecycle, SpaceRequest, XAlign, YAlign};
use crate::error::{LayoutError, Result};
use crate::table::{TableConfig, TableGrid};

new_key_type! {
    pub struct ComponentId;
}

impl ComponentId {
    /// Stable integer form, used to register pointer handlers
    pub fn pointer_target(self) -> u64 {
        self.data().as_ffi()
    }
}

enum NodeKind {
    Leaf(Box<dyn Component>),
    /// Children overlaid in the group's box
    Group,
    Table(TableGrid),
}

struct Node {
    kind: NodeKind,
    parent: Option<ComponentId>,
    children: Vec<ComponentId>,
    state: Lifecycle,
    surface: Option<SurfaceId>,
    /// Relative to the parent's origin
    bounds: Option<Rect>,
    /// Size last offered through `layout_root`
    offered: Option<Size>,
    x_align: XAlign,
    y_align: YAlign,
    layout_dirty: bool,
}

impl Node {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            state: Lifecycle::Unanchored,
            surface: None,
            bounds: None,
            offered: None,
            x_align: XAlign::default(),
            y_align: YAlign::default(),
            layout_dirty: true,
        }
    }

    fn is_container(&self) -> bool {
        !matches!(self.kind, NodeKind::Leaf(_))
    }
}

/// Arena owning components, groups and tables
pub struct ComponentTree {
    nodes: SlotMap<ComponentId, Node>,
    retired: SparseSecondaryMap<ComponentId, ()>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            retired: SparseSecondaryMap::new(),
        }
    }

    /// Add a leaf component
    pub fn insert<C: Component + 'static>(&mut self, component: C) -> ComponentId {
        self.insert_boxed(Box::new(component))
    }

    pub fn insert_boxed(&mut self, component: Box<dyn Component>) -> ComponentId {
        self.nodes.insert(Node::new(NodeKind::Leaf(component)))
    }

    /// Add an empty group; its children share its box
    pub fn create_group(&mut self) -> ComponentId {
        self.nodes.insert(Node::new(NodeKind::Group))
    }

    /// Add a table built from `rows`; `None` cells stay empty
    pub fn create_table(&mut self, rows: Vec<Vec<Option<ComponentId>>>) -> Result<ComponentId> {
        self.create_table_with_config(rows, TableConfig::default())
    }

    pub fn create_table_with_config(
        &mut self,
        rows: Vec<Vec<Option<ComponentId>>>,
        config: TableConfig,
    ) -> Result<ComponentId> {
        for id in rows.iter().flatten().flatten() {
            self.node(*id)?;
        }
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let shape = vec![vec![None; n_cols]; rows.len()];
        let table = self
            .nodes
            .insert(Node::new(NodeKind::Table(TableGrid::new(shape, config))));

        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                if let Some(child) = cell {
                    self.table_add(table, r, c, child)?;
                }
            }
        }
        Ok(table)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_tree_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: ComponentId) -> Result<&Node> {
        self.nodes.get(id).ok_or_else(|| self.missing(id))
    }

    fn node_mut(&mut self, id: ComponentId) -> Result<&mut Node> {
        if !self.nodes.contains_key(id) {
            return Err(self.missing(id));
        }
        self.nodes.get_mut(id).ok_or(LayoutError::UnknownComponent(id))
    }

    fn missing(&self, id: ComponentId) -> LayoutError {
        if self.retired.contains_key(id) {
            LayoutError::Detached(id)
        } else {
            LayoutError::UnknownComponent(id)
        }
    }

    fn container(&self, id: ComponentId) -> Result<&Node> {
        let node = self.node(id)?;
        if node.is_container() {
            Ok(node)
        } else {
            Err(LayoutError::NotAContainer(id))
        }
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    pub fn lifecycle(&self, id: ComponentId) -> Lifecycle {
        self.nodes.get(id).map_or(Lifecycle::Detached, |n| n.state)
    }

    pub fn parent(&self, id: ComponentId) -> Option<ComponentId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Layout box relative to the parent's origin
    pub fn bounds(&self, id: ComponentId) -> Option<Rect> {
        self.nodes.get(id).and_then(|n| n.bounds)
    }

    /// Layout box in the root's coordinate space
    pub fn absolute_bounds(&self, id: ComponentId) -> Option<Rect> {
        let mut rect = self.bounds(id)?;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            let origin = self.bounds(parent)?;
            rect = rect.offset(origin.x(), origin.y());
            current = self.parent(parent);
        }
        Some(rect)
    }

    pub fn surface(&self, id: ComponentId) -> Option<SurfaceId> {
        self.nodes.get(id).and_then(|n| n.surface)
    }

    pub fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Leaf(c) => Some(c.as_ref()),
            _ => None,
        }
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut (dyn Component + 'static)> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Leaf(c) => Some(c.as_mut()),
            _ => None,
        }
    }

    /// Children of a container in insertion order
    pub fn components(&self, container: ComponentId) -> Result<&[ComponentId]> {
        Ok(&self.container(container)?.children)
    }

    pub fn is_empty(&self, container: ComponentId) -> Result<bool> {
        Ok(self.container(container)?.children.is_empty())
    }

    pub fn has(&self, container: ComponentId, child: ComponentId) -> bool {
        self.nodes
            .get(container)
            .is_some_and(|n| n.children.contains(&child))
    }

    pub fn needs_layout(&self, id: ComponentId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.layout_dirty)
    }

    pub fn table_grid(&self, table: ComponentId) -> Result<&TableGrid> {
        match &self.node(table)?.kind {
            NodeKind::Table(grid) => Ok(grid),
            _ => Err(LayoutError::NotAContainer(table)),
        }
    }

    fn is_ancestor(&self, ancestor: ComponentId, id: ComponentId) -> bool {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.parent(p);
        }
        false
    }

    /// `id` followed by all of its descendants, depth first
    fn subtree(&self, id: ComponentId) -> Vec<ComponentId> {
        let mut out = Vec::new();
        let mut stack: SmallVec<[ComponentId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get(current) {
                out.push(current);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Bind a component and its subtree to a surface. Anchoring twice is a no-op.
    pub fn anchor(&mut self, id: ComponentId, surface: SurfaceId) -> Result<()> {
        self.node(id)?;
        for member in self.subtree(id) {
            let Some(node) = self.nodes.get_mut(member) else {
                continue;
            };
            if node.state.is_anchored() && node.surface == Some(surface) {
                continue;
            }
            node.state = Lifecycle::Anchored;
            node.surface = Some(surface);
            if let NodeKind::Leaf(c) = &mut node.kind {
                c.on_anchor(surface);
            }
        }
        Ok(())
    }

    /// Unbind a component and its subtree from its surface.
    ///
    /// The component stays in the tree and keeps its parent; it can be
    /// anchored again later.
    pub fn detach(&mut self, id: ComponentId) -> Result<()> {
        let parent = self.node(id)?.parent;
        self.detach_subtree(id);
        if let Some(parent) = parent {
            self.invalidate_layout(parent);
        }
        Ok(())
    }

    fn detach_subtree(&mut self, id: ComponentId) {
        for member in self.subtree(id) {
            let Some(node) = self.nodes.get_mut(member) else {
                continue;
            };
            let was_anchored = node.state.is_anchored();
            node.state = Lifecycle::Unanchored;
            node.surface = None;
            node.bounds = None;
            node.layout_dirty = true;
            if was_anchored {
                if let NodeKind::Leaf(c) = &mut node.kind {
                    c.on_detach();
                }
            }
        }
    }

    /// Detach, unlink from the parent and remove the whole subtree for good
    pub fn remove(&mut self, id: ComponentId) -> Result<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.unlink(parent, id);
        }

        // Each child's removal unlinks it from this list, so walk a copy.
        let children = self.node(id)?.children.clone();
        for child in children {
            self.remove(child)?;
        }

        if let Some(mut node) = self.nodes.remove(id) {
            if let NodeKind::Leaf(c) = &mut node.kind {
                if node.state.is_anchored() {
                    c.on_detach();
                }
                c.on_remove();
            }
            self.retired.insert(id, ());
        }
        tracing::debug!(component = ?id, "component removed");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Containers
    // ---------------------------------------------------------------------

    /// Add `child` to `container` at the front or back.
    ///
    /// Returns `Ok(false)` when the child is already present or would create a
    /// cycle. A child that belongs to another container is moved.
    pub fn add_component(
        &mut self,
        container: ComponentId,
        child: ComponentId,
        prepend: bool,
    ) -> Result<bool> {
        self.container(container)?;
        self.node(child)?;
        if !self.can_adopt(container, child) {
            return Ok(false);
        }
        self.release(child);

        let node = self.node_mut(container)?;
        if let NodeKind::Table(grid) = &mut node.kind {
            grid.push_row(child, prepend);
        }
        self.adopt(container, child, prepend)?;
        Ok(true)
    }

    /// Place `child` in a table cell, growing the grid if needed
    pub fn table_add(
        &mut self,
        table: ComponentId,
        row: usize,
        col: usize,
        child: ComponentId,
    ) -> Result<bool> {
        self.table_grid(table)?;
        self.node(child)?;
        if !self.can_adopt(table, child) {
            return Ok(false);
        }
        if self.table_grid(table)?.cell(row, col).is_some() {
            return Err(LayoutError::CellOccupied { row, col });
        }
        self.release(child);

        if let NodeKind::Table(grid) = &mut self.node_mut(table)?.kind {
            grid.place(row, col, child)?;
        }
        self.adopt(table, child, false)?;
        Ok(true)
    }

    fn can_adopt(&self, container: ComponentId, child: ComponentId) -> bool {
        child != container && !self.has(container, child) && !self.is_ancestor(child, container)
    }

    /// Take `child` away from its current parent, if any
    fn release(&mut self, child: ComponentId) {
        if let Some(old) = self.parent(child) {
            tracing::debug!(component = ?child, from = ?old, "moving component to a new container");
            self.unlink(old, child);
        }
    }

    fn adopt(&mut self, container: ComponentId, child: ComponentId, prepend: bool) -> Result<()> {
        let parent = self.node_mut(container)?;
        if prepend {
            parent.children.insert(0, child);
        } else {
            parent.children.push(child);
        }
        let surface = parent.surface.filter(|_| parent.state.is_anchored());

        self.node_mut(child)?.parent = Some(container);
        if let Some(surface) = surface {
            self.anchor(child, surface)?;
        }
        self.invalidate_layout(container);
        Ok(())
    }

    fn unlink(&mut self, container: ComponentId, child: ComponentId) {
        if let Some(node) = self.nodes.get_mut(container) {
            node.children.retain(|c| *c != child);
            if let NodeKind::Table(grid) = &mut node.kind {
                grid.clear(child);
            }
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        self.invalidate_layout(container);
    }

    /// Remove `child` from `container` and unanchor it; the child stays alive
    /// and can be added elsewhere. Returns `Ok(false)` if it was not a child.
    pub fn remove_component(&mut self, container: ComponentId, child: ComponentId) -> Result<bool> {
        self.container(container)?;
        if !self.has(container, child) {
            return Ok(false);
        }
        self.unlink(container, child);
        self.detach_subtree(child);
        Ok(true)
    }

    /// Remove every child of `container`
    pub fn detach_all(&mut self, container: ComponentId) -> Result<()> {
        let children = self.container(container)?.children.clone();
        for child in children {
            self.remove_component(container, child)?;
        }
        Ok(())
    }

    pub fn set_alignment(&mut self, id: ComponentId, x: XAlign, y: YAlign) -> Result<()> {
        let node = self.node_mut(id)?;
        node.x_align = x;
        node.y_align = y;
        self.invalidate_layout(id);
        Ok(())
    }

    fn grid_mut(&mut self, table: ComponentId) -> Result<&mut TableGrid> {
        match &mut self.node_mut(table)?.kind {
            NodeKind::Table(grid) => Ok(grid),
            _ => Err(LayoutError::NotAContainer(table)),
        }
    }

    /// Override the weight of a row; `None` restores the elastic/fixed default
    pub fn set_row_weight(&mut self, table: ComponentId, row: usize, weight: Option<f32>) -> Result<()> {
        self.grid_mut(table)?.set_row_weight(row, weight);
        self.invalidate_layout(table);
        Ok(())
    }

    pub fn set_col_weight(&mut self, table: ComponentId, col: usize, weight: Option<f32>) -> Result<()> {
        self.grid_mut(table)?.set_col_weight(col, weight);
        self.invalidate_layout(table);
        Ok(())
    }

    pub fn set_table_padding(&mut self, table: ComponentId, row_padding: f32, col_padding: f32) -> Result<()> {
        self.grid_mut(table)?.set_padding(row_padding, col_padding);
        self.invalidate_layout(table);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Layout
    // ---------------------------------------------------------------------

    /// Mark `id` and every ancestor as needing a new layout pass
    pub fn invalidate_layout(&mut self, id: ComponentId) {
        let mut current = Some(id);
        let mut root = id;
        while let Some(cid) = current {
            let Some(node) = self.nodes.get_mut(cid) else {
                break;
            };
            node.layout_dirty = true;
            root = cid;
            current = node.parent;
        }
        tracing::trace!(component = ?id, root = ?root, "layout invalidated");
    }

    /// Space `id` needs when offered `available_width` x `available_height`
    pub fn requested_space(
        &self,
        id: ComponentId,
        available_width: f32,
        available_height: f32,
    ) -> Result<SpaceRequest> {
        self.node(id)?;
        Ok(self
            .measure(id, available_width, available_height)
            .against(available_width, available_height))
    }

    fn measure(&self, id: ComponentId, width: f32, height: f32) -> SpaceRequest {
        let Some(node) = self.nodes.get(id) else {
            return SpaceRequest::ZERO;
        };
        match &node.kind {
            NodeKind::Leaf(c) => c.requested_space(width, height),
            NodeKind::Group => node
                .children
                .iter()
                .map(|child| self.measure(*child, width, height))
                .fold(SpaceRequest::ZERO, |acc, r| {
                    SpaceRequest::new(acc.min_width.max(r.min_width), acc.min_height.max(r.min_height))
                }),
            NodeKind::Table(grid) => {
                let layout = grid.iterate_layout(
                    width,
                    height,
                    false,
                    |cid, w, h| self.measure(cid, w, h),
                    |cid| self.fixedness(cid),
                );
                let (pad_w, pad_h) = grid.padding_size();
                SpaceRequest::new(
                    layout.guaranteed_widths.iter().sum::<f32>() + pad_w,
                    layout.guaranteed_heights.iter().sum::<f32>() + pad_h,
                )
            }
        }
    }

    /// Whether `id` is fixed-width and fixed-height
    pub fn fixedness(&self, id: ComponentId) -> (bool, bool) {
        let Some(node) = self.nodes.get(id) else {
            return (true, true);
        };
        match &node.kind {
            NodeKind::Leaf(c) => (c.is_fixed_width(), c.is_fixed_height()),
            NodeKind::Group | NodeKind::Table(_) => {
                node.children.iter().fold((true, true), |(w, h), child| {
                    let (cw, ch) = self.fixedness(*child);
                    (w && cw, h && ch)
                })
            }
        }
    }

    /// Place `id` inside the box at `origin` (parent space) of the given size.
    ///
    /// Fixed-size components take `min(requested, available)` and are aligned
    /// within the box; containers then lay out their children.
    pub fn compute_layout(
        &mut self,
        id: ComponentId,
        origin: Point,
        available_width: f32,
        available_height: f32,
    ) -> Result<()> {
        if !self.node(id)?.state.is_anchored() {
            return Err(LayoutError::NotAnchored(id));
        }
        self.layout_node(id, origin, available_width, available_height);
        Ok(())
    }

    fn layout_node(&mut self, id: ComponentId, origin: Point, width: f32, height: f32) {
        let (fixed_w, fixed_h) = self.fixedness(id);
        let request = if fixed_w || fixed_h {
            self.measure(id, width, height)
        } else {
            SpaceRequest::ZERO
        };
        let w = if fixed_w { request.min_width.min(width) } else { width };
        let h = if fixed_h { request.min_height.min(height) } else { height };

        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let x = origin.x + (width - w) * node.x_align.proportion();
        let y = origin.y + (height - h) * node.y_align.proportion();
        node.bounds = Some(Rect::new(x, y, w, h));
        node.layout_dirty = false;
        if node.state.is_anchored() {
            node.state = Lifecycle::Placed;
        }

        let mut placements: Vec<(ComponentId, Point, f32, f32)> = Vec::new();
        let is_table = matches!(node.kind, NodeKind::Table(_));
        match &mut node.kind {
            NodeKind::Leaf(c) => c.on_layout(Size::new(w, h)),
            NodeKind::Group => {
                placements.extend(node.children.iter().map(|child| (*child, Point::ZERO, w, h)));
            }
            NodeKind::Table(_) => {}
        }
        if is_table {
            placements = self.table_placements(id, w, h);
        }

        for (child, child_origin, cw, ch) in placements {
            self.layout_node(child, child_origin, cw, ch);
        }
    }

    fn table_placements(&self, table: ComponentId, width: f32, height: f32) -> Vec<(ComponentId, Point, f32, f32)> {
        let Some(NodeKind::Table(grid)) = self.nodes.get(table).map(|n| &n.kind) else {
            return Vec::new();
        };
        let layout = grid.iterate_layout(
            width,
            height,
            true,
            |cid, w, h| self.measure(cid, w, h),
            |cid| self.fixedness(cid),
        );
        tracing::debug!(
            rows = grid.n_rows(),
            cols = grid.n_cols(),
            iterations = layout.iterations,
            "table layout"
        );

        let widths = layout.col_widths();
        let heights = layout.row_heights();
        let config = grid.config();
        let mut placements = Vec::new();
        let mut y = 0.0;
        for (r, row) in grid.rows().iter().enumerate() {
            let mut x = 0.0;
            for (c, cell) in row.iter().enumerate() {
                if let Some(child) = cell {
                    placements.push((*child, Point::new(x, y), widths[c], heights[r]));
                }
                x += widths[c] + config.col_padding;
            }
            y += heights[r] + config.row_padding;
        }
        placements
    }

    /// Lay out `root` as the top of a tree offered `width` x `height`
    pub fn layout_root(&mut self, root: ComponentId, width: f32, height: f32) -> Result<()> {
        self.node_mut(root)?.offered = Some(Size::new(width, height));
        self.compute_layout(root, Point::ZERO, width, height)
    }

    // ---------------------------------------------------------------------
    // Rendering
    // ---------------------------------------------------------------------

    /// Draw `id` and its subtree, each child clipped to its own box
    pub fn render(&mut self, id: ComponentId, ctx: &mut dyn DrawContext) -> Result<()> {
        let node = self.node(id)?;
        if !node.state.is_anchored() {
            return Err(LayoutError::NotAnchored(id));
        }
        if node.bounds.is_none() {
            return Err(LayoutError::NotLaidOut(id));
        }
        self.render_node(id, ctx)
    }

    fn render_node(&mut self, id: ComponentId, ctx: &mut dyn DrawContext) -> Result<()> {
        let (state, parent) = {
            let node = self.node(id)?;
            (node.state, node.parent)
        };
        if !state.is_anchored() {
            let surface = parent.and_then(|p| self.surface(p));
            match surface {
                Some(surface) => self.anchor(id, surface)?,
                None => return Err(LayoutError::NotAnchored(id)),
            }
        }
        let bounds = self.bounds(id).ok_or(LayoutError::NotLaidOut(id))?;
        let size = Size::new(bounds.width(), bounds.height());
        let children = self.node(id)?.children.clone();

        ctx.push_offset(Point::new(bounds.x(), bounds.y()));
        ctx.push_clip(size.to_rect());

        if let Some(NodeKind::Leaf(c)) = self.nodes.get_mut(id).map(|n| &mut n.kind) {
            c.render(ctx, size);
        }
        let result = children
            .into_iter()
            .try_for_each(|child| self.render_node(child, ctx));

        ctx.pop_clip();
        ctx.pop_offset();
        result
    }

    /// Anchor, lay out and draw `root` in one call
    pub fn render_to(
        &mut self,
        root: ComponentId,
        surface: SurfaceId,
        width: f32,
        height: f32,
        ctx: &mut dyn DrawContext,
    ) -> Result<()> {
        self.anchor(root, surface)?;
        self.layout_root(root, width, height)?;
        self.render(root, ctx)
    }

    /// Collect component invalidations, re-layout if anything asked for it,
    /// then draw. Returns whether a layout pass ran.
    pub fn redraw(&mut self, root: ComponentId, ctx: &mut dyn DrawContext) -> Result<bool> {
        for member in self.subtree(root) {
            let invalid = match self.nodes.get_mut(member).map(|n| &mut n.kind) {
                Some(NodeKind::Leaf(c)) => c.take_layout_invalidation(),
                _ => false,
            };
            if invalid {
                self.invalidate_layout(member);
            }
        }

        let node = self.node(root)?;
        let relayout = node.layout_dirty || node.bounds.is_none();
        if relayout {
            let offer = node
                .offered
                .or_else(|| node.bounds.map(|b| Size::new(b.width(), b.height())))
                .ok_or(LayoutError::NotLaidOut(root))?;
            tracing::debug!(root = ?root, width = offer.width, height = offer.height, "re-running layout");
            self.layout_root(root, offer.width, offer.height)?;
        }
        self.render(root, ctx)?;
        Ok(relayout)
    }

    /// Deepest leaf under `point` (root space), with the point in its local space
    pub fn component_at(&self, root: ComponentId, point: Point) -> Option<(ComponentId, Point)> {
        let node = self.nodes.get(root)?;
        let bounds = node.bounds?;
        if !bounds.contains(point) {
            return None;
        }
        let local = Point::new(point.x - bounds.x(), point.y - bounds.y());
        match node.kind {
            NodeKind::Leaf(_) => Some((root, local)),
            _ => node
                .children
                .iter()
                .rev()
                .find_map(|child| self.component_at(*child, local)),
        }
    }
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{Color, RecordingContext};

    struct Block {
        width: f32,
        height: f32,
        fixed: bool,
    }

    impl Component for Block {
        fn requested_space(&self, _w: f32, _h: f32) -> SpaceRequest {
            SpaceRequest::new(self.width, self.height)
        }

        fn is_fixed_width(&self) -> bool {
            self.fixed
        }

        fn is_fixed_height(&self) -> bool {
            self.fixed
        }

        fn render(&mut self, ctx: &mut dyn DrawContext, size: Size) {
            ctx.fill_rect(size.to_rect(), Color::BLACK);
        }
    }

    fn block(tree: &mut ComponentTree, w: f32, h: f32, fixed: bool) -> ComponentId {
        tree.insert(Block {
            width: w,
            height: h,
            fixed,
        })
    }

    #[test]
    fn add_component_rejects_duplicates_and_self() {
        let mut tree = ComponentTree::new();
        let group = tree.create_group();
        let a = block(&mut tree, 1.0, 1.0, false);

        assert_eq!(tree.add_component(group, a, false), Ok(true));
        assert_eq!(tree.add_component(group, a, false), Ok(false));
        assert_eq!(tree.add_component(group, group, false), Ok(false));
        assert_eq!(tree.components(group).unwrap(), &[a]);
    }

    #[test]
    fn leaf_is_not_a_container() {
        let mut tree = ComponentTree::new();
        let a = block(&mut tree, 1.0, 1.0, false);
        let b = block(&mut tree, 1.0, 1.0, false);
        assert_eq!(tree.add_component(a, b, false), Err(LayoutError::NotAContainer(a)));
    }

    #[test]
    fn prepend_controls_order() {
        let mut tree = ComponentTree::new();
        let group = tree.create_group();
        let a = block(&mut tree, 1.0, 1.0, false);
        let b = block(&mut tree, 1.0, 1.0, false);
        tree.add_component(group, a, false).unwrap();
        tree.add_component(group, b, true).unwrap();
        assert_eq!(tree.components(group).unwrap(), &[b, a]);
    }

    #[test]
    fn adding_to_anchored_container_anchors_child() {
        let mut tree = ComponentTree::new();
        let group = tree.create_group();
        tree.anchor(group, SurfaceId::new(1)).unwrap();

        let a = block(&mut tree, 1.0, 1.0, false);
        assert_eq!(tree.lifecycle(a), Lifecycle::Unanchored);
        tree.add_component(group, a, false).unwrap();
        assert_eq!(tree.lifecycle(a), Lifecycle::Anchored);
        assert!(tree.needs_layout(group));
    }

    #[test]
    fn fixed_component_is_aligned_in_its_offer() {
        let mut tree = ComponentTree::new();
        let a = block(&mut tree, 20.0, 10.0, true);
        tree.set_alignment(a, XAlign::Center, YAlign::Bottom).unwrap();
        tree.anchor(a, SurfaceId::new(1)).unwrap();
        tree.compute_layout(a, Point::ZERO, 100.0, 50.0).unwrap();
        assert_eq!(tree.bounds(a), Some(Rect::new(40.0, 40.0, 20.0, 10.0)));
        assert_eq!(tree.lifecycle(a), Lifecycle::Placed);
    }

    #[test]
    fn layout_before_anchor_is_an_error() {
        let mut tree = ComponentTree::new();
        let a = block(&mut tree, 1.0, 1.0, false);
        assert_eq!(
            tree.compute_layout(a, Point::ZERO, 10.0, 10.0),
            Err(LayoutError::NotAnchored(a))
        );
        let mut ctx = RecordingContext::new();
        assert_eq!(tree.render(a, &mut ctx), Err(LayoutError::NotAnchored(a)));
    }

    #[test]
    fn render_before_layout_is_an_error() {
        let mut tree = ComponentTree::new();
        let a = block(&mut tree, 1.0, 1.0, false);
        tree.anchor(a, SurfaceId::new(1)).unwrap();
        let mut ctx = RecordingContext::new();
        assert_eq!(tree.render(a, &mut ctx), Err(LayoutError::NotLaidOut(a)));
    }

    #[test]
    fn removed_ids_report_detached() {
        let mut tree = ComponentTree::new();
        let group = tree.create_group();
        let a = block(&mut tree, 1.0, 1.0, false);
        tree.add_component(group, a, false).unwrap();

        tree.remove(group).unwrap();
        assert_eq!(tree.lifecycle(group), Lifecycle::Detached);
        assert_eq!(tree.lifecycle(a), Lifecycle::Detached);
        assert_eq!(tree.remove(a), Err(LayoutError::Detached(a)));
        assert!(tree.is_tree_empty());
    }

    #[test]
    fn detach_returns_subtree_to_unanchored() {
        let mut tree = ComponentTree::new();
        let group = tree.create_group();
        let a = block(&mut tree, 1.0, 1.0, false);
        tree.add_component(group, a, false).unwrap();
        tree.anchor(group, SurfaceId::new(2)).unwrap();
        tree.layout_root(group, 10.0, 10.0).unwrap();

        tree.detach(group).unwrap();
        assert_eq!(tree.lifecycle(group), Lifecycle::Unanchored);
        assert_eq!(tree.lifecycle(a), Lifecycle::Unanchored);
        assert_eq!(tree.parent(a), Some(group));
        assert!(tree.bounds(a).is_none());
    }

    #[test]
    fn group_request_is_max_of_children() {
        let mut tree = ComponentTree::new();
        let group = tree.create_group();
        let a = block(&mut tree, 30.0, 5.0, true);
        let b = block(&mut tree, 10.0, 25.0, true);
        tree.add_component(group, a, false).unwrap();
        tree.add_component(group, b, false).unwrap();

        let request = tree.requested_space(group, 20.0, 100.0).unwrap();
        assert_eq!((request.min_width, request.min_height), (30.0, 25.0));
        assert!(request.wants_more_width);
        assert!(!request.wants_more_height);
        assert_eq!(tree.fixedness(group), (true, true));
    }

    #[test]
    fn component_at_finds_topmost_leaf() {
        let mut tree = ComponentTree::new();
        let a = block(&mut tree, 0.0, 0.0, false);
        let b = block(&mut tree, 0.0, 0.0, false);
        let table = tree.create_table(vec![vec![Some(a), Some(b)]]).unwrap();
        tree.anchor(table, SurfaceId::new(1)).unwrap();
        tree.layout_root(table, 100.0, 40.0).unwrap();

        assert_eq!(tree.component_at(table, Point::new(75.0, 10.0)), Some((b, Point::new(25.0, 10.0))));
        assert_eq!(tree.component_at(table, Point::new(150.0, 10.0)), None);
    }
}
