//! Plots bind datasets to marks.
//!
//! A [`Plot`] keeps its datasets in insertion order, projects attributes
//! through optional scales, reports data extents to those scales and emits
//! [`DrawStep`]s to one [`Drawer`] per dataset. What the marks look like is
//! decided by a [`PlotStrategy`].

mod draw_step;
mod drawer;
mod hit_test;
mod projector;
mod scatter;
mod strategy;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value;
use trellis_animation::Animator;
use trellis_core::{DrawContext, ListenerId, Point, Size};
use trellis_layout::{Component, SpaceRequest};

use crate::config::ScatterStyle;
use crate::dataset::Dataset;
use crate::error::{ChartError, Result};
use crate::scale::{ExtentKey, Scale};

pub use draw_step::{DrawBatch, DrawStep};
pub use drawer::{paint_symbol, Drawer, NullDrawer, SymbolDrawer, SymbolMark};
pub use hit_test::{ClosestMark, ClosestMarkFinder};
pub use projector::{constant, Accessor, AccessorFn, AttrToProjector, PlotMetadata, Projector};
pub use scatter::{ScatterStrategy, MAIN_ANIMATOR, RESET_ANIMATOR};
pub use strategy::{BaseStrategy, PlotStrategy, PlotView};

use projector::Projection;

static NEXT_PLOT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Default)]
struct PlotFlags {
    data_changed: Cell<bool>,
    layout_invalid: Cell<bool>,
    render_needed: Cell<bool>,
    /// A dataset changed while the plot was borrowed
    extents_stale: Cell<bool>,
}

struct PlotEntry {
    dataset: Dataset,
    metadata: PlotMetadata,
    drawer: Box<dyn Drawer>,
    listener: ListenerId,
}

struct PlotState {
    id: u64,
    strategy: Box<dyn PlotStrategy>,
    entries: IndexMap<String, PlotEntry>,
    next_key: usize,
    projections: IndexMap<String, Projection>,
    animated: bool,
    animators: FxHashMap<String, Animator>,
    size: Option<Size>,
    flags: Rc<PlotFlags>,
}

impl PlotState {
    fn attr_to_projector(&self) -> AttrToProjector {
        let mut attrs = self.strategy.default_projectors();
        for (attr, projection) in &self.projections {
            attrs.insert(attr.clone(), projection.projector());
        }
        attrs
    }

    fn animator(&self, key: &str) -> Animator {
        if let Some(animator) = self.animators.get(key) {
            return *animator;
        }
        self.strategy
            .default_animators()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, a)| a)
            .unwrap_or_default()
    }

    fn draw_steps(&self) -> Vec<DrawStep> {
        let reset = self.animated && self.flags.data_changed.get();
        let mut steps = self.strategy.draw_steps(&self.attr_to_projector(), reset);
        for step in &mut steps {
            step.animator = if self.animated {
                self.animator(&step.animator_key)
            } else {
                Animator::Null
            };
        }
        steps
    }

    /// Raw values of `accessor` over every dataset, in draw order
    fn collect_values(&self, accessor: &Accessor) -> Vec<Value> {
        let mut values = Vec::new();
        for entry in self.entries.values() {
            let dataset_meta = entry.dataset.metadata();
            entry.dataset.with_data(|data| {
                values.extend(
                    data.iter()
                        .enumerate()
                        .map(|(i, d)| accessor.get(d, i, &dataset_meta, &entry.metadata)),
                );
            });
        }
        values
    }

    fn update_extent(&self, attr: &str) {
        let Some(projection) = self.projections.get(attr) else {
            return;
        };
        let Some(scale) = &projection.scale else {
            return;
        };
        let key = ExtentKey::new(self.id, attr);
        if self.entries.is_empty() {
            scale.remove_extent(&key);
        } else {
            scale.update_extent(key, &self.collect_values(&projection.accessor));
        }
    }

    fn refresh_extents(&self) {
        self.flags.extents_stale.set(false);
        for attr in self.projections.keys() {
            self.update_extent(attr);
        }
    }

    fn apply_ranges(&self) {
        let Some(size) = self.size else {
            return;
        };
        for (attr, projection) in &self.projections {
            if let (Some(scale), Some((start, end))) =
                (&projection.scale, self.strategy.pixel_range(attr, size))
            {
                scale.set_range_extent(start, end);
            }
        }
    }
}

/// A data-bound plot component.
///
/// `Plot` is a cheap handle: clone it to keep access after inserting it into a
/// component tree.
#[derive(Clone)]
pub struct Plot {
    inner: Rc<RefCell<PlotState>>,
    flags: Rc<PlotFlags>,
}

impl Plot {
    pub fn new(strategy: impl PlotStrategy + 'static) -> Self {
        let flags = Rc::new(PlotFlags::default());
        let state = PlotState {
            id: NEXT_PLOT_ID.fetch_add(1, Ordering::Relaxed),
            strategy: Box::new(strategy),
            entries: IndexMap::new(),
            next_key: 0,
            projections: IndexMap::new(),
            animated: false,
            animators: FxHashMap::default(),
            size: None,
            flags: flags.clone(),
        };
        Self {
            inner: Rc::new(RefCell::new(state)),
            flags,
        }
    }

    pub fn scatter() -> Self {
        Self::new(ScatterStrategy::default())
    }

    pub fn scatter_with_style(style: ScatterStyle) -> Self {
        Self::new(ScatterStrategy::new(style))
    }

    /// Process-unique id, used to key this plot's scale extents
    pub fn id(&self) -> u64 {
        self.inner.borrow().id
    }

    /// Add a dataset under the next free `_N` key and return the key
    pub fn add_dataset(&self, dataset: Dataset) -> String {
        let key = {
            let mut state = self.inner.borrow_mut();
            loop {
                let key = format!("_{}", state.next_key);
                state.next_key += 1;
                if !state.entries.contains_key(&key) {
                    break key;
                }
            }
        };
        self.add_dataset_with_metadata(key.clone(), dataset, Value::Null);
        key
    }

    /// Add a dataset under `key`; an existing dataset with that key is
    /// replaced and the key moves to the end of the draw order
    pub fn add_dataset_with_key(&self, key: impl Into<String>, dataset: Dataset) {
        self.add_dataset_with_metadata(key, dataset, Value::Null);
    }

    pub fn add_dataset_with_metadata(
        &self,
        key: impl Into<String>,
        dataset: Dataset,
        metadata: Value,
    ) {
        let key = key.into();
        if self.inner.borrow().entries.contains_key(&key) {
            let _ = self.detach_entry(&key);
        }

        let listener = self.watch(&dataset);
        {
            let mut state = self.inner.borrow_mut();
            let drawer = state.strategy.create_drawer();
            let metadata = PlotMetadata {
                dataset_key: key.clone(),
                extra: metadata,
            };
            state.entries.insert(
                key.clone(),
                PlotEntry {
                    dataset,
                    metadata,
                    drawer,
                    listener,
                },
            );
        }
        tracing::debug!(plot = self.id(), key = %key, "dataset added");
        self.data_updated();
    }

    /// Remove the dataset registered under `key`
    pub fn remove_dataset(&self, key: &str) -> Result<Dataset> {
        let dataset = self
            .detach_entry(key)
            .ok_or_else(|| ChartError::UnknownDataset(key.to_string()))?;
        self.data_updated();
        Ok(dataset)
    }

    /// Remove every entry that shares records with `dataset`
    pub fn remove_dataset_instance(&self, dataset: &Dataset) -> bool {
        let keys: Vec<String> = self
            .inner
            .borrow()
            .entries
            .iter()
            .filter(|(_, e)| e.dataset.ptr_eq(dataset))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            let _ = self.detach_entry(key);
        }
        if !keys.is_empty() {
            self.data_updated();
        }
        !keys.is_empty()
    }

    pub fn datasets(&self) -> Vec<Dataset> {
        self.inner
            .borrow()
            .entries
            .values()
            .map(|e| e.dataset.clone())
            .collect()
    }

    pub fn dataset_keys(&self) -> Vec<String> {
        self.inner.borrow().entries.keys().cloned().collect()
    }

    /// Project `attr` straight from the data
    pub fn project(&self, attr: &str, accessor: impl Into<Accessor>) {
        self.set_projection(attr, accessor.into(), None);
    }

    /// Project `attr` through `scale`; the scale receives this plot's extent
    pub fn project_scaled<S>(&self, attr: &str, accessor: impl Into<Accessor>, scale: &S)
    where
        S: Scale + Clone + 'static,
    {
        let scale: Rc<dyn Scale> = Rc::new(scale.clone());
        self.set_projection(attr, accessor.into(), Some(scale));
    }

    pub fn is_animated(&self) -> bool {
        self.inner.borrow().animated
    }

    pub fn set_animated(&self, animated: bool) {
        self.inner.borrow_mut().animated = animated;
        self.flags.render_needed.set(true);
    }

    /// Override the animator used for steps named `key`
    pub fn set_animator(&self, key: impl Into<String>, animator: Animator) {
        self.inner
            .borrow_mut()
            .animators
            .insert(key.into(), animator);
    }

    /// The animator for `key`: an override, else the strategy default, else null
    pub fn animator(&self, key: &str) -> Animator {
        self.inner.borrow().animator(key)
    }

    pub fn generate_attr_to_projector(&self) -> AttrToProjector {
        self.inner.borrow().attr_to_projector()
    }

    /// Steps the next render will draw
    pub fn generate_draw_steps(&self) -> Vec<DrawStep> {
        self.inner.borrow().draw_steps()
    }

    /// The mark nearest to `point`, searching datasets in key order
    pub fn closest_mark(&self, point: Point, max_radius: f32) -> Option<ClosestMark> {
        let state = self.inner.borrow();
        let attrs = state.attr_to_projector();
        let view = PlotView {
            entries: state
                .entries
                .iter()
                .map(|(k, e)| (k.as_str(), &e.dataset, &e.metadata))
                .collect(),
            attr_to_projector: &attrs,
        };
        state.strategy.closest_mark(&view, point, max_radius)
    }

    /// [`closest_mark`](Self::closest_mark) within the strategy's detection radius
    pub fn do_hover(&self, point: Point) -> Option<ClosestMark> {
        let radius = self.inner.borrow().strategy.close_detection_radius();
        self.closest_mark(point, radius)
    }

    /// Draw every dataset as it looks `elapsed_ms` into the last render
    pub fn render_frame(&self, ctx: &mut dyn DrawContext, elapsed_ms: f32) {
        let mut state = self.inner.borrow_mut();
        for entry in state.entries.values_mut() {
            entry.drawer.render_frame(ctx, elapsed_ms);
        }
    }

    /// Whether data, scales or settings changed since the last render
    pub fn needs_render(&self) -> bool {
        self.flags.render_needed.get() || self.flags.data_changed.get()
    }

    /// Size from the last layout
    pub fn size(&self) -> Option<Size> {
        self.inner.borrow().size
    }

    fn set_projection(&self, attr: &str, accessor: Accessor, scale: Option<Rc<dyn Scale>>) {
        self.release_projection(attr);
        let listener = scale.as_ref().map(|scale| {
            let flags = Rc::downgrade(&self.flags);
            scale.subscribe(Rc::new(move || {
                if let Some(flags) = flags.upgrade() {
                    flags.render_needed.set(true);
                }
            }))
        });
        {
            let mut state = self.inner.borrow_mut();
            state.projections.insert(
                attr.to_string(),
                Projection {
                    accessor,
                    scale,
                    listener,
                },
            );
            state.apply_ranges();
        }
        self.inner.borrow().update_extent(attr);
        self.flags.render_needed.set(true);
    }

    /// Withdraw the extent and listener of the current projection of `attr`
    fn release_projection(&self, attr: &str) {
        let (id, old) = {
            let mut state = self.inner.borrow_mut();
            (state.id, state.projections.shift_remove(attr))
        };
        if let Some(Projection {
            scale: Some(scale),
            listener,
            ..
        }) = old
        {
            scale.remove_extent(&ExtentKey::new(id, attr));
            if let Some(listener) = listener {
                scale.unsubscribe(listener);
            }
        }
    }

    fn watch(&self, dataset: &Dataset) -> ListenerId {
        let inner: Weak<RefCell<PlotState>> = Rc::downgrade(&self.inner);
        let flags = Rc::downgrade(&self.flags);
        dataset.on_update(move |_| {
            let Some(flags) = flags.upgrade() else {
                return;
            };
            flags.data_changed.set(true);
            flags.layout_invalid.set(true);
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let Ok(state) = inner.try_borrow() else {
                flags.extents_stale.set(true);
                return;
            };
            state.refresh_extents();
        })
    }

    fn detach_entry(&self, key: &str) -> Option<Dataset> {
        let entry = self.inner.borrow_mut().entries.shift_remove(key)?;
        entry.dataset.off_update(entry.listener);
        tracing::debug!(plot = self.id(), key, "dataset removed");
        Some(entry.dataset)
    }

    fn data_updated(&self) {
        self.flags.data_changed.set(true);
        self.flags.layout_invalid.set(true);
        self.inner.borrow().refresh_extents();
    }

    fn teardown(&self) {
        let keys = self.dataset_keys();
        for key in &keys {
            let _ = self.detach_entry(key);
        }
        let attrs: Vec<String> = self.inner.borrow().projections.keys().cloned().collect();
        for attr in &attrs {
            self.release_projection(attr);
        }
        tracing::debug!(plot = self.id(), "plot torn down");
    }
}

impl Component for Plot {
    fn requested_space(&self, _available_width: f32, _available_height: f32) -> SpaceRequest {
        SpaceRequest::ZERO
    }

    fn on_layout(&mut self, size: Size) {
        let mut state = self.inner.borrow_mut();
        state.size = Some(size);
        state.apply_ranges();
    }

    fn render(&mut self, ctx: &mut dyn DrawContext, _size: Size) {
        if self.flags.extents_stale.get() {
            self.inner.borrow().refresh_extents();
        }
        let mut guard = self.inner.borrow_mut();
        let state = &mut *guard;
        let steps = state.draw_steps();
        let mut total_ms = 0f32;
        for entry in state.entries.values_mut() {
            let dataset_meta = entry.dataset.metadata();
            let (drawer, metadata) = (&mut entry.drawer, &entry.metadata);
            let ms = entry.dataset.with_data(|data| {
                drawer.draw(
                    &mut *ctx,
                    &DrawBatch {
                        steps: &steps,
                        data,
                        dataset_metadata: &dataset_meta,
                        plot_metadata: metadata,
                    },
                )
            });
            total_ms = total_ms.max(ms);
        }
        tracing::trace!(plot = state.id, datasets = state.entries.len(), total_ms, "plot rendered");
        self.flags.data_changed.set(false);
        self.flags.render_needed.set(false);
    }

    fn take_layout_invalidation(&mut self) -> bool {
        self.flags.layout_invalid.replace(false)
    }

    fn on_remove(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for Plot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Plot")
            .field("id", &state.id)
            .field("datasets", &state.entries.keys().collect::<Vec<_>>())
            .field("attrs", &state.projections.keys().collect::<Vec<_>>())
            .field("animated", &state.animated)
            .finish()
    }
}
