//! CommandSink trait and the commands it receives.

use lw_core::MaterialHandle;
use uuid::Uuid;

use crate::context::RenderTarget;
use crate::render_state::{MaskRenderState, OutlineRenderState, StencilTest};

/// State a draw is submitted with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawState {
    /// Stencil mask draw.
    Mask(MaskRenderState),
    /// Generated outline material with its per-frame state.
    Outline {
        state: OutlineRenderState,
        stencil: Option<StencilTest>,
    },
    /// User material drawn as-is; only the stencil is overridden.
    Custom { stencil: Option<StencilTest> },
}

impl DrawState {
    /// Returns the stencil override of this draw, if any.
    pub fn stencil(&self) -> Option<StencilTest> {
        match self {
            DrawState::Mask(mask) => Some(mask.stencil),
            DrawState::Outline { stencil, .. } | DrawState::Custom { stencil } => *stencil,
        }
    }

    /// Returns the depth compare override of this draw, if any.
    pub fn depth_compare(&self) -> Option<wgpu::CompareFunction> {
        match self {
            DrawState::Mask(_) => Some(wgpu::CompareFunction::Always),
            DrawState::Outline { state, .. } => Some(state.depth_compare),
            DrawState::Custom { .. } => None,
        }
    }
}

/// One object drawn with an override material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawSubmission {
    /// Index of the outline target in the settings.
    pub target_index: usize,
    pub object: Uuid,
    pub material: MaterialHandle,
    /// Shader pass of `material`; `None` draws every pass.
    pub pass_index: Option<u32>,
    pub enable_instancing: bool,
    pub state: DrawState,
}

/// Commands emitted by the outline pass, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Starts a group of draws into `target`.
    BeginPass {
        name: &'static str,
        target: RenderTarget,
    },
    Draw(DrawSubmission),
    /// Full-screen procedural draw resetting the stencil to zero.
    ClearStencil {
        material: MaterialHandle,
        target: RenderTarget,
        vertex_count: u32,
    },
    /// Ends the current group.
    EndPass,
}

/// Receives the outline pass's commands.
pub trait CommandSink {
    /// Submits one command. Commands execute in submission order.
    fn submit(&mut self, command: DrawCommand);
}
