//! Pixel-space domain transforms used by pan and zoom style interactions

use super::{Domain, QuantitativeScale};

/// The domain that results from shifting `scale`'s range by `pixels`
pub fn translate(scale: &QuantitativeScale, pixels: f64) -> Domain {
    let [r0, r1] = scale.range();
    [scale.invert(r0 + pixels), scale.invert(r1 + pixels)]
}

/// The domain that results from scaling the range by `amount` around the
/// pixel `center`; `amount < 1` zooms in
pub fn magnify(scale: &QuantitativeScale, amount: f64, center: f64) -> Domain {
    let [r0, r1] = scale.range();
    let warp = |r: f64| scale.invert(center - (center - r) * amount);
    [warp(r0), warp(r1)]
}
