//! Attribute projection: how a datum becomes a visual value

use std::rc::Rc;

use indexmap::IndexMap;
use serde_json::Value;
use trellis_core::ListenerId;

use crate::scale::Scale;
use crate::value::AttrValue;

/// Metadata a plot attaches to each of its datasets
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotMetadata {
    pub dataset_key: String,
    /// Free-form data supplied when the dataset was added
    pub extra: Value,
}

impl PlotMetadata {
    pub fn new(dataset_key: impl Into<String>) -> Self {
        Self {
            dataset_key: dataset_key.into(),
            extra: Value::Null,
        }
    }
}

/// Signature shared by accessors and projectors:
/// `(datum, index, dataset metadata, plot metadata)`
pub type AccessorFn = dyn Fn(&Value, usize, &Value, &PlotMetadata) -> Value;

/// Reads the raw value of an attribute from a datum
#[derive(Clone)]
pub enum Accessor {
    /// Field of an object record
    Field(String),
    Constant(Value),
    Function(Rc<AccessorFn>),
}

impl Accessor {
    pub fn field(name: impl Into<String>) -> Self {
        Accessor::Field(name.into())
    }

    pub fn function(
        f: impl Fn(&Value, usize, &Value, &PlotMetadata) -> Value + 'static,
    ) -> Self {
        Accessor::Function(Rc::new(f))
    }

    pub fn get(
        &self,
        datum: &Value,
        index: usize,
        dataset_metadata: &Value,
        plot_metadata: &PlotMetadata,
    ) -> Value {
        match self {
            Accessor::Field(name) => datum.get(name).cloned().unwrap_or(Value::Null),
            Accessor::Constant(v) => v.clone(),
            Accessor::Function(f) => f(datum, index, dataset_metadata, plot_metadata),
        }
    }
}

impl From<&str> for Accessor {
    fn from(name: &str) -> Self {
        Accessor::field(name)
    }
}

impl From<f64> for Accessor {
    fn from(v: f64) -> Self {
        Accessor::Constant(Value::from(v))
    }
}

impl std::fmt::Debug for Accessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Accessor::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Accessor::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Accessor::Function(_) => f.write_str("Function(..)"),
        }
    }
}

/// Computes one visual attribute for a datum
pub type Projector = Rc<dyn Fn(&Value, usize, &Value, &PlotMetadata) -> AttrValue>;

/// Projectors keyed by attribute name, in registration order
pub type AttrToProjector = IndexMap<String, Projector>;

/// A projector that ignores its input
pub fn constant(value: impl Into<AttrValue>) -> Projector {
    let value = value.into();
    Rc::new(move |_: &Value, _: usize, _: &Value, _: &PlotMetadata| value.clone())
}

/// An accessor bound to an optional scale, as registered on a plot
pub(crate) struct Projection {
    pub(crate) accessor: Accessor,
    pub(crate) scale: Option<Rc<dyn Scale>>,
    pub(crate) listener: Option<ListenerId>,
}

impl Projection {
    pub(crate) fn projector(&self) -> Projector {
        let accessor = self.accessor.clone();
        match &self.scale {
            Some(scale) => {
                let scale = scale.clone();
                Rc::new(
                    move |d: &Value, i: usize, dm: &Value, pm: &PlotMetadata| {
                        scale.map_value(&accessor.get(d, i, dm, pm))
                    },
                )
            }
            None => Rc::new(move |d: &Value, i: usize, dm: &Value, pm: &PlotMetadata| {
                AttrValue::from_json(&accessor.get(d, i, dm, pm))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::QuantitativeScale;
    use serde_json::json;

    #[test]
    fn field_accessor_reads_missing_as_null() {
        let meta = PlotMetadata::new("_0");
        let acc = Accessor::from("x");
        assert_eq!(acc.get(&json!({"x": 4}), 0, &Value::Null, &meta), json!(4));
        assert_eq!(acc.get(&json!({"y": 4}), 0, &Value::Null, &meta), Value::Null);
    }

    #[test]
    fn function_accessor_sees_index_and_metadata() {
        let meta = PlotMetadata::new("series");
        let acc = Accessor::function(|_, i, dm, pm| json!(format!("{}:{}:{}", pm.dataset_key, i, dm["k"])));
        assert_eq!(acc.get(&json!(null), 2, &json!({"k": 1}), &meta), json!("series:2:1"));
    }

    #[test]
    fn scaled_projection_maps_through_scale() {
        let scale = QuantitativeScale::new();
        scale.set_domain([0.0, 10.0]);
        scale.set_range(0.0, 100.0);
        let projection = Projection {
            accessor: Accessor::from("v"),
            scale: Some(Rc::new(scale)),
            listener: None,
        };
        let p = projection.projector();
        let meta = PlotMetadata::new("_0");
        assert_eq!(p(&json!({"v": 3}), 0, &Value::Null, &meta), AttrValue::Number(30.0));
    }
}
