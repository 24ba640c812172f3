//! Material references shared between the configuration and the host.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle to a material owned by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialHandle(pub Uuid);

impl MaterialHandle {
    /// Creates a handle with a fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MaterialHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Shader programs the outline pass needs generated materials for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Writes the stencil reference with color writes disabled.
    Mask,
    /// Draws extruded geometry.
    Outline,
    /// Full-screen stencil clear.
    Clear,
}

impl ShaderKind {
    /// Get the shader name used when asking the host for a program.
    pub fn shader_name(&self) -> &'static str {
        match self {
            ShaderKind::Mask => "Hidden/Outlines/Free Outline/Mask",
            ShaderKind::Outline => "Hidden/Outlines/Free Outline/Outline",
            ShaderKind::Clear => "Hidden/Outlines/Clear Stencil",
        }
    }

    /// All shader kinds, in creation order.
    pub fn all() -> &'static [ShaderKind] {
        &[ShaderKind::Mask, ShaderKind::Outline, ShaderKind::Clear]
    }
}

impl std::fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderKind::Mask => write!(f, "mask"),
            ShaderKind::Outline => write!(f, "outline"),
            ShaderKind::Clear => write!(f, "clear"),
        }
    }
}
