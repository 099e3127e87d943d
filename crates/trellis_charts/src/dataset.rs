//! Shared tabular data

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use trellis_core::{ListenerId, ListenerSet};

struct DatasetState {
    data: Vec<Value>,
    metadata: Value,
    version: u64,
    listeners: ListenerSet<Dataset>,
}

/// An ordered list of records plus a free-form metadata record.
///
/// Cheap to clone; clones share the same records, so one dataset can feed
/// several plots. Every mutation bumps [`Dataset::version`] and notifies the
/// update listeners.
#[derive(Clone)]
pub struct Dataset {
    inner: Rc<RefCell<DatasetState>>,
}

impl Dataset {
    pub fn new(data: Vec<Value>) -> Self {
        Self::with_metadata(data, Value::Null)
    }

    pub fn with_metadata(data: Vec<Value>, metadata: Value) -> Self {
        Self {
            inner: Rc::new(RefCell::new(DatasetState {
                data,
                metadata,
                version: 0,
                listeners: ListenerSet::new(),
            })),
        }
    }

    /// Run `f` over the records without copying them
    pub fn with_data<R>(&self, f: impl FnOnce(&[Value]) -> R) -> R {
        f(&self.inner.borrow().data)
    }

    pub fn data(&self) -> Vec<Value> {
        self.inner.borrow().data.clone()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().data.is_empty()
    }

    pub fn metadata(&self) -> Value {
        self.inner.borrow().metadata.clone()
    }

    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    pub fn set_data(&self, data: Vec<Value>) {
        self.mutate(|state| state.data = data);
    }

    pub fn push(&self, record: Value) {
        self.mutate(|state| state.data.push(record));
    }

    pub fn set_metadata(&self, metadata: Value) {
        self.mutate(|state| state.metadata = metadata);
    }

    /// Register a callback run after every change
    pub fn on_update(&self, listener: impl Fn(&Dataset) + 'static) -> ListenerId {
        self.inner.borrow_mut().listeners.insert(listener)
    }

    pub fn off_update(&self, id: ListenerId) -> bool {
        self.inner.borrow_mut().listeners.remove(id)
    }

    /// Whether both handles point at the same records
    pub fn ptr_eq(&self, other: &Dataset) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    fn mutate(&self, f: impl FnOnce(&mut DatasetState)) {
        let listeners = {
            let mut state = self.inner.borrow_mut();
            f(&mut state);
            state.version += 1;
            state.listeners.snapshot()
        };
        for listener in listeners {
            listener(self);
        }
    }
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Dataset")
            .field("len", &state.data.len())
            .field("version", &state.version)
            .finish()
    }
}
