//! Per-frame context supplied by the host.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::stencil;
use crate::scene::SortCriteria;

/// Kind of camera a frame is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CameraKind {
    #[default]
    Game,
    SceneView,
    Preview,
    Reflection,
}

/// Camera state for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub kind: CameraKind,
    /// World-space camera position.
    pub position: Vec3,
    /// Camera renders only into an offscreen depth texture.
    #[serde(default)]
    pub offscreen_depth: bool,
}

impl CameraView {
    /// Creates a game camera at the given position.
    pub fn game(position: Vec3) -> Self {
        Self {
            kind: CameraKind::Game,
            position,
            offscreen_depth: false,
        }
    }

    /// Sets the camera kind.
    pub fn with_kind(mut self, kind: CameraKind) -> Self {
        self.kind = kind;
        self
    }
}

impl Default for CameraView {
    fn default() -> Self {
        Self::game(Vec3::ZERO)
    }
}

/// Host handle of a render attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct AttachmentHandle(pub u64);

/// Color and depth-stencil attachments the pass draws into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RenderTarget {
    pub color: AttachmentHandle,
    pub depth_stencil: AttachmentHandle,
}

/// Everything the pass needs from the host for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub camera: CameraView,
    pub sort_criteria: SortCriteria,
    pub target: RenderTarget,
    pub stencil_reference: u32,
}

impl FrameContext {
    /// Creates a context with opaque sorting and the standard stencil reference.
    pub fn new(camera: CameraView, target: RenderTarget) -> Self {
        Self {
            camera,
            sort_criteria: SortCriteria::CommonOpaque,
            target,
            stencil_reference: stencil::REFERENCE,
        }
    }
}
