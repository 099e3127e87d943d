//! Autodomain policy for quantitative scales

use indexmap::IndexMap;

use super::quantitative::QuantitativeScale;
use super::ticks;
use super::Domain;
use crate::config::ScaleDefaults;
use crate::error::{ChartError, Result};

/// Computes a domain from the extents attached to a scale.
///
/// The steps run in a fixed order: merge the extents, widen to the included
/// values, pad, then optionally round outward to nice boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct Domainer {
    pad_proportion: f64,
    identical_domain_padding: f64,
    nice_count: Option<usize>,
    padding_exceptions: IndexMap<String, f64>,
    included_values: IndexMap<String, f64>,
}

impl Default for Domainer {
    fn default() -> Self {
        Self::from_defaults(&ScaleDefaults::default())
    }
}

impl Domainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defaults(defaults: &ScaleDefaults) -> Self {
        Self {
            pad_proportion: defaults.pad_proportion,
            identical_domain_padding: defaults.identical_domain_padding,
            nice_count: None,
            padding_exceptions: IndexMap::new(),
            included_values: IndexMap::new(),
        }
    }

    /// Total padding as a share of the span; half goes to each side
    pub fn pad(mut self, proportion: f64) -> Result<Self> {
        if !proportion.is_finite() || proportion < 0.0 {
            return Err(ChartError::InvalidProportion(proportion));
        }
        self.pad_proportion = proportion;
        Ok(self)
    }

    pub fn pad_proportion(&self) -> f64 {
        self.pad_proportion
    }

    /// Make sure 0 is always inside the domain
    pub fn include_zero(self) -> Self {
        self.add_included_value("zero", 0.0)
    }

    /// Round the final domain outward to tick boundaries for `count` ticks
    pub fn nice(mut self, count: usize) -> Self {
        self.nice_count = Some(count.max(1));
        self
    }

    pub fn without_nice(mut self) -> Self {
        self.nice_count = None;
        self
    }

    pub fn add_padding_exception(mut self, key: impl Into<String>, value: f64) -> Self {
        self.padding_exceptions.insert(key.into(), value);
        self
    }

    pub fn remove_padding_exception(mut self, key: &str) -> Self {
        self.padding_exceptions.shift_remove(key);
        self
    }

    pub fn add_included_value(mut self, key: impl Into<String>, value: f64) -> Self {
        self.included_values.insert(key.into(), value);
        self
    }

    pub fn remove_included_value(mut self, key: &str) -> Self {
        self.included_values.shift_remove(key);
        self
    }

    pub fn compute_domain(&self, extents: &[Domain], scale: &QuantitativeScale) -> Domain {
        let merged = self
            .combine_extents(extents)
            .unwrap_or_else(|| scale.default_extent());
        let included = self.include_values(merged);
        let padded = self.pad_domain(included);
        match self.nice_count {
            Some(count) => ticks::nice(padded, count),
            None => padded,
        }
    }

    fn combine_extents(&self, extents: &[Domain]) -> Option<Domain> {
        extents
            .iter()
            .filter(|e| e[0].is_finite() && e[1].is_finite())
            .fold(None, |acc: Option<Domain>, e| {
                let (lo, hi) = (e[0].min(e[1]), e[0].max(e[1]));
                Some(match acc {
                    Some([a, b]) => [a.min(lo), b.max(hi)],
                    None => [lo, hi],
                })
            })
    }

    fn include_values(&self, domain: Domain) -> Domain {
        self.included_values
            .values()
            .fold(domain, |[lo, hi], v| [lo.min(*v), hi.max(*v)])
    }

    fn pad_domain(&self, [min, max]: Domain) -> Domain {
        if min == max && self.pad_proportion > 0.0 {
            let d = self.identical_domain_padding;
            return [min - d, max + d];
        }
        let half = (max - min) * self.pad_proportion / 2.0;
        let exempt = |v: f64| self.padding_exceptions.values().any(|e| *e == v);
        let lo = if exempt(min) { min } else { min - half };
        let hi = if exempt(max) { max } else { max + half };
        [lo, hi]
    }
}
