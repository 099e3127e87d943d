//! Layout error types

use thiserror::Error;

use crate::tree::ComponentId;

/// Contract violations reported by the component tree
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Layout or render requested before the component was anchored
    #[error("component {0:?} must be anchored first")]
    NotAnchored(ComponentId),

    /// Render requested before the component received a layout
    #[error("component {0:?} has no layout; call compute_layout first")]
    NotLaidOut(ComponentId),

    /// The id was never issued by this tree
    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentId),

    /// Container operation on a leaf component
    #[error("component {0:?} is not a container")]
    NotAContainer(ComponentId),

    /// A table cell already holds a component
    #[error("table cell ({row}, {col}) is already occupied")]
    CellOccupied { row: usize, col: usize },

    /// The component has been removed from the tree
    #[error("component {0:?} has been removed")]
    Detached(ComponentId),
}

/// Result type for layout operations
pub type Result<T> = std::result::Result<T, LayoutError>;
