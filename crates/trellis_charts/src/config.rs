//! Default settings for scales and plots

use serde::{Deserialize, Serialize};
use trellis_animation::{Animator, BaseAnimator};
use trellis_core::Color;

use crate::value::SymbolKind;

/// Categorical palette used by color scales; the first entry is the default mark fill
pub const DEFAULT_PALETTE: [u32; 10] = [
    0x5279c7, 0xfd373e, 0x63c261, 0xfad419, 0x2c2b6f, 0xff7939, 0xdb2e65, 0x99ce50, 0x962565,
    0x06cccc,
];

pub fn default_palette() -> Vec<Color> {
    DEFAULT_PALETTE.iter().map(|hex| Color::from_hex(*hex)).collect()
}

/// Defaults shared by quantitative scales and their domainers.
///
/// Deserializes from partial JSON; missing fields keep their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleDefaults {
    /// Total padding as a share of the domain span, split evenly between ends
    pub pad_proportion: f64,
    /// Absolute padding applied on each side when min == max
    pub identical_domain_padding: f64,
    pub tick_count: usize,
    /// Domain used when no extents are attached
    pub default_extent: [f64; 2],
}

impl ScaleDefaults {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl Default for ScaleDefaults {
    fn default() -> Self {
        Self {
            pad_proportion: 0.05,
            identical_domain_padding: 1.0,
            tick_count: 10,
            default_extent: [0.0, 1.0],
        }
    }
}

/// Visual defaults for point-mark plots
#[derive(Clone, Debug, PartialEq)]
pub struct ScatterStyle {
    pub radius: f64,
    pub opacity: f64,
    /// `None` uses the first color of the default palette
    pub fill: Option<Color>,
    pub symbol: SymbolKind,
    /// Pointer distance (px) within which a mark counts as hovered
    pub close_detection_radius: f32,
    pub reset_animator: Animator,
    pub main_animator: Animator,
}

impl ScatterStyle {
    pub fn fill_color(&self) -> Color {
        self.fill
            .unwrap_or_else(|| Color::from_hex(DEFAULT_PALETTE[0]))
    }
}

impl Default for ScatterStyle {
    fn default() -> Self {
        Self {
            radius: 3.0,
            opacity: 0.6,
            fill: None,
            symbol: SymbolKind::Circle,
            close_detection_radius: 5.0,
            reset_animator: Animator::Null,
            main_animator: Animator::Base(BaseAnimator::new().duration(250.0).start_delay(5.0)),
        }
    }
}
