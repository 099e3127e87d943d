//! Draw steps handed to drawers

use serde_json::Value;
use trellis_animation::Animator;

use super::projector::{AttrToProjector, PlotMetadata};
use crate::value::AttrValue;

/// One animated pass over a dataset's marks.
///
/// Steps are rebuilt on every render; `animator_key` names the plot animator
/// the step was configured with.
#[derive(Clone)]
pub struct DrawStep {
    pub animator_key: String,
    pub attr_to_projector: AttrToProjector,
    pub animator: Animator,
}

impl DrawStep {
    pub fn new(
        animator_key: impl Into<String>,
        attr_to_projector: AttrToProjector,
        animator: Animator,
    ) -> Self {
        Self {
            animator_key: animator_key.into(),
            attr_to_projector,
            animator,
        }
    }

    pub fn attr(
        &self,
        name: &str,
        datum: &Value,
        index: usize,
        dataset_metadata: &Value,
        plot_metadata: &PlotMetadata,
    ) -> Option<AttrValue> {
        self.attr_to_projector
            .get(name)
            .map(|p| p(datum, index, dataset_metadata, plot_metadata))
    }
}

impl std::fmt::Debug for DrawStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawStep")
            .field("animator_key", &self.animator_key)
            .field("attrs", &self.attr_to_projector.keys().collect::<Vec<_>>())
            .field("animator", &self.animator)
            .finish()
    }
}

/// Everything a drawer needs to render one dataset
pub struct DrawBatch<'a> {
    pub steps: &'a [DrawStep],
    pub data: &'a [Value],
    pub dataset_metadata: &'a Value,
    pub plot_metadata: &'a PlotMetadata,
}
