//! Error types for the outline pass.

use lw_core::{ConfigError, ShaderKind};
use thiserror::Error;

use crate::pass::FramePhase;

/// Error type for outline pass operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RendererError {
    /// Invalid outline configuration. Aborts the frame's outline work.
    #[error("Invalid outline configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// A generated material the pass needs is missing.
    #[error("Required {0} material is not available")]
    ResourceUnavailable(ShaderKind),

    /// A pass phase was invoked out of order.
    #[error("Outline pass phase out of order: expected {expected:?}, found {found:?}")]
    PhaseOrder {
        expected: FramePhase,
        found: FramePhase,
    },
}

/// Result type for outline pass operations
pub type RendererResult<T> = Result<T, RendererError>;
