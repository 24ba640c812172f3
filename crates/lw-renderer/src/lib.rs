//! Linework Outline Renderer
//!
//! Stencil-masked outline pass: draws extruded silhouettes around selected
//! scene objects through a mask / outline / clear stencil pipeline.
//!
//! # Architecture
//!
//! The pass is host-agnostic. The host supplies:
//!
//! - [`traits::SceneQuery`] - Culled, filtered and sorted draw calls
//! - [`traits::CommandSink`] - Receives the ordered draw submissions
//! - [`traits::MaterialProvider`] - Creates the mask, outline and clear materials
//! - [`context::FrameContext`] - Camera, attachments and stencil reference
//!
//! [`feature::OutlineFeature`] drives a frame; [`pass::OutlinePass`] holds the
//! phases; [`render_state`] derives per-frame state as wgpu descriptors.
//!
//! # Example
//!
//! ```ignore
//! use lw_renderer::{CommandRecorder, OutlineFeature, FrameContext};
//!
//! let mut feature = OutlineFeature::new(settings);
//! let mut recorder = CommandRecorder::new();
//!
//! let outcome = feature.render_frame(&mut materials, &scene, &ctx, &mut recorder)?;
//! ```

pub mod constants;
pub mod context;
pub mod error;
pub mod feature;
pub mod materials;
pub mod pass;
pub mod recorder;
pub mod render_state;
pub mod scene;
pub mod traits;

// Re-exports for convenience
pub use context::{AttachmentHandle, CameraKind, CameraView, FrameContext, RenderTarget};
pub use error::{RendererError, RendererResult};
pub use feature::{FrameOutcome, OutlineFeature, SkipReason};
pub use materials::{HandleMaterialProvider, PassMaterials};
pub use pass::{FramePhase, FrameStats, OutlinePass, PreparedTarget, should_render};
pub use recorder::CommandRecorder;
pub use render_state::{MaskRenderState, OutlineRenderState, ShaderFeatures, StencilTest};
pub use scene::{DrawFilter, DrawItem, RenderObject, RenderQueueRange, Scene, SortCriteria};
pub use traits::{CommandSink, DrawCommand, DrawState, DrawSubmission, MaterialProvider, SceneQuery};
