//! The component capability trait
//!
//! Anything that can be measured, placed and drawn inside a [`ComponentTree`]
//! implements [`Component`]. The tree drives the lifecycle; implementors only
//! react to it.
//!
//! [`ComponentTree`]: crate::ComponentTree

use trellis_core::{DrawContext, Size, SurfaceId};

/// Space a component asks for under a given offer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpaceRequest {
    pub min_width: f32,
    pub min_height: f32,
    /// The minimum width exceeds the width that was offered
    pub wants_more_width: bool,
    /// The minimum height exceeds the height that was offered
    pub wants_more_height: bool,
}

impl SpaceRequest {
    pub const ZERO: SpaceRequest = SpaceRequest {
        min_width: 0.0,
        min_height: 0.0,
        wants_more_width: false,
        wants_more_height: false,
    };

    pub fn new(min_width: f32, min_height: f32) -> Self {
        Self {
            min_width: min_width.max(0.0),
            min_height: min_height.max(0.0),
            wants_more_width: false,
            wants_more_height: false,
        }
    }

    /// Fill in the wants-more flags relative to an offer
    pub fn against(mut self, offered_width: f32, offered_height: f32) -> Self {
        self.wants_more_width = self.min_width > offered_width;
        self.wants_more_height = self.min_height > offered_height;
        self
    }
}

/// Horizontal placement of a fixed-width component inside its offer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum XAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl XAlign {
    pub fn proportion(self) -> f32 {
        match self {
            XAlign::Left => 0.0,
            XAlign::Center => 0.5,
            XAlign::Right => 1.0,
        }
    }
}

/// Vertical placement of a fixed-height component inside its offer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum YAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl YAlign {
    pub fn proportion(self) -> f32 {
        match self {
            YAlign::Top => 0.0,
            YAlign::Center => 0.5,
            YAlign::Bottom => 1.0,
        }
    }
}

/// Where a component is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Unanchored,
    Anchored,
    /// Anchored and holding a layout box
    Placed,
    /// Removed from the tree; terminal
    Detached,
}

impl Lifecycle {
    pub fn is_anchored(self) -> bool {
        matches!(self, Lifecycle::Anchored | Lifecycle::Placed)
    }
}

/// A leaf unit of layout and drawing
pub trait Component {
    /// Minimum space needed when offered `available_width` x `available_height`.
    ///
    /// Must not mutate layout state; the tree may call it many times per pass.
    fn requested_space(&self, available_width: f32, available_height: f32) -> SpaceRequest;

    /// Fixed-width components take `min(requested, offered)` instead of the whole offer.
    fn is_fixed_width(&self) -> bool {
        false
    }

    fn is_fixed_height(&self) -> bool {
        false
    }

    fn on_anchor(&mut self, _surface: SurfaceId) {}

    /// Called with the final size after each layout pass
    fn on_layout(&mut self, _size: Size) {}

    /// Draw in local coordinates; `(0, 0)` is the component's origin.
    fn render(&mut self, ctx: &mut dyn DrawContext, size: Size);

    /// Report (and clear) a pending request for a new layout pass
    fn take_layout_invalidation(&mut self) -> bool {
        false
    }

    fn on_detach(&mut self) {}

    /// Final teardown when the component leaves the tree for good
    fn on_remove(&mut self) {}
}
