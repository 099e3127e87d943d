//! Tick and nice-boundary arithmetic for linear domains
//!
//! Steps are always 1, 2 or 5 times a power of ten, chosen so that roughly
//! `count` ticks cover the domain.

use std::rc::Rc;

use super::quantitative::QuantitativeScale;
use super::Domain;
use crate::error::{ChartError, Result};

/// Upper bound on the ticks a single range may produce
pub const MAX_TICKS: usize = 1 << 20;

/// Produces tick values for a scale, in domain units
pub type TickGenerator = Rc<dyn Fn(&QuantitativeScale) -> Vec<f64>>;

/// `(start, stop, step)` covering `domain` with about `count` steps
pub fn tick_range(domain: Domain, count: usize) -> (f64, f64, f64) {
    let (lo, hi) = ordered(domain);
    let span = hi - lo;
    let count = count.max(1) as f64;
    if !(span > 0.0) || !span.is_finite() {
        return (lo, lo, 0.0);
    }
    let mut step = 10f64.powf((span / count).log10().floor());
    let err = count / span * step;
    if err <= 0.15 {
        step *= 10.0;
    } else if err <= 0.35 {
        step *= 5.0;
    } else if err <= 0.75 {
        step *= 2.0;
    }
    let start = (lo / step).ceil() * step;
    let stop = (hi / step).floor() * step + step * 0.5;
    (start, stop, step)
}

/// Evenly spaced ticks inside `domain`
pub fn linear_ticks(domain: Domain, count: usize) -> Vec<f64> {
    let (start, stop, step) = tick_range(domain, count);
    range(start, stop, step)
}

/// Extend `domain` outward to multiples of the tick step.
///
/// Runs twice because widening can change the step.
pub fn nice(domain: Domain, count: usize) -> Domain {
    let mut out = domain;
    for _ in 0..2 {
        let (_, _, step) = tick_range(out, count);
        if step == 0.0 {
            break;
        }
        let reversed = out[1] < out[0];
        let (lo, hi) = ordered(out);
        let lo = (lo / step).floor() * step;
        let hi = (hi / step).ceil() * step;
        out = if reversed { [hi, lo] } else { [lo, hi] };
    }
    out
}

/// `start, start + step, ...` strictly below `stop`.
///
/// Ticks are integer multiples of the step. Sub-unit steps divide by the
/// inverse step instead.
fn range(start: f64, stop: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || !step.is_finite() || stop <= start {
        return Vec::new();
    }
    let first = (start / step).round();
    let count = ((stop - start) / step).ceil();
    if !first.is_finite() || !(count >= 1.0) {
        return Vec::new();
    }
    if count > MAX_TICKS as f64 {
        tracing::warn!(start, stop, step, "tick range exceeds {MAX_TICKS} ticks");
        return Vec::new();
    }
    let inverse = (1.0 / step).round();
    let tick = |i: f64| {
        if step < 1.0 && inverse.is_finite() && inverse > 0.0 {
            i / inverse
        } else {
            i * step
        }
    };
    (0..count as u64)
        .map(|n| tick(first + n as f64))
        .take_while(|v| *v < stop)
        .collect()
}

fn ordered(domain: Domain) -> (f64, f64) {
    if domain[0] <= domain[1] {
        (domain[0], domain[1])
    } else {
        (domain[1], domain[0])
    }
}

/// Ready-made tick generators
pub struct TickGenerators;

impl TickGenerators {
    /// Ticks at every multiple of `interval`, plus the domain ends
    pub fn interval(interval: f64) -> Result<TickGenerator> {
        if !(interval > 0.0) || !interval.is_finite() {
            return Err(ChartError::InvalidInterval(interval));
        }
        Ok(Rc::new(move |scale: &QuantitativeScale| {
            let (low, high) = ordered(scale.domain());
            let first = (low / interval).ceil() * interval;
            let count = ((high - first) / interval).floor() as i64 + 1;

            let mut ticks = Vec::new();
            if low % interval != 0.0 {
                ticks.push(low);
            }
            ticks.extend((0..count.max(0)).map(|t| first + t as f64 * interval));
            if high % interval != 0.0 {
                ticks.push(high);
            }
            ticks
        }))
    }

    /// Default ticks restricted to integers (the domain ends are kept)
    pub fn integer() -> TickGenerator {
        Rc::new(|scale: &QuantitativeScale| {
            let ticks = scale.default_ticks();
            let last = ticks.len().saturating_sub(1);
            ticks
                .iter()
                .enumerate()
                .filter(|(i, t)| t.fract() == 0.0 || *i == 0 || *i == last)
                .map(|(_, t)| *t)
                .collect()
        })
    }
}
