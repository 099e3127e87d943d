//! Chart error types

use thiserror::Error;

/// Errors raised by chart configuration calls
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// No dataset is registered under this key
    #[error("no dataset registered under key {0:?}")]
    UnknownDataset(String),

    /// A domain that can never be valid for the scale
    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    /// A color scale needs at least one color
    #[error("color palette must not be empty")]
    EmptyPalette,

    /// Tick count must be at least one
    #[error("tick count must be at least 1")]
    InvalidTickCount,

    /// Tick interval must be a positive finite number
    #[error("tick interval must be positive and finite, got {0}")]
    InvalidInterval(f64),

    /// Padding proportion must be finite and non-negative
    #[error("padding proportion must be finite and >= 0, got {0}")]
    InvalidProportion(f64),

    /// A coordinator needs at least one scale to link
    #[error("a domain coordinator needs at least one scale")]
    EmptyCoordinator,
}

/// Result type for chart operations
pub type Result<T> = std::result::Result<T, ChartError>;
