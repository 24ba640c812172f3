//! Outline pass orchestration.
//!
//! A frame runs three sub-passes over the same color and depth-stencil
//! attachments, strictly in this order:
//!
//! 1. **Mask** - every enabled target that needs it writes the stencil
//!    reference over its objects, with color writes disabled.
//! 2. **Outline** - every active target draws its extruded geometry. Targets
//!    with a mask only pass where the stencil does not hold the reference.
//! 3. **Clear** - a full-screen draw resets the stencil to zero.
//!
//! Each sub-pass depends on the stencil left by the previous one, so
//! [`OutlinePass`] tracks a [`FramePhase`] and rejects calls out of order.

use lw_core::{MaterialHandle, MaterialType, OutlineTarget, ShaderKind};

use crate::constants::{outline, pass_names};
use crate::context::FrameContext;
use crate::error::{RendererError, RendererResult};
use crate::materials::PassMaterials;
use crate::render_state::{MaskRenderState, OutlineRenderState, StencilTest};
use crate::scene::DrawFilter;
use crate::traits::{CommandSink, DrawCommand, DrawState, DrawSubmission, SceneQuery};

/// Position of the pass within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FramePhase {
    /// Nothing prepared for this frame.
    #[default]
    Idle,
    /// Render state derived; the mask pass is next.
    Prepared,
    /// Stencil mask written; the outline pass is next.
    Masked,
    /// Outlines drawn; the stencil clear is next.
    Outlined,
}

/// Draw counts of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub mask_draws: usize,
    pub outline_draws: usize,
    pub stencil_clears: usize,
}

/// Outline draw of one target, resolved for the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineDraw {
    pub material: MaterialHandle,
    pub pass_index: Option<u32>,
    pub enable_instancing: bool,
    pub state: DrawState,
}

/// One outline target resolved for the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreparedTarget {
    /// Index in the configured target list.
    pub index: usize,
    pub filter: DrawFilter,
    /// Present when the target writes a stencil mask.
    pub mask: Option<MaskRenderState>,
    /// Present when the target is active.
    pub outline: Option<OutlineDraw>,
}

impl PreparedTarget {
    /// Returns true if the target draws an outline this frame.
    pub fn is_active(&self) -> bool {
        self.outline.is_some()
    }
}

/// Returns true if at least one target is active with the given materials.
pub fn should_render(targets: &[OutlineTarget], materials: &PassMaterials) -> bool {
    targets.iter().any(|t| t.is_active(materials.outline))
}

/// Resolves one target. Pure: the result depends only on the arguments.
///
/// The mask depends only on `enabled` and [`OutlineTarget::needs_stencil_mask`],
/// not on whether the target is active. An enabled Custom target without a
/// material therefore still writes its mask but draws no outline.
pub fn prepare_target(
    index: usize,
    target: &OutlineTarget,
    generated_outline: Option<MaterialHandle>,
    stencil_reference: u32,
) -> PreparedTarget {
    let needs_mask = target.needs_stencil_mask();
    let stencil = needs_mask.then(|| StencilTest::outside_reference(stencil_reference));

    let mask = (target.enabled && needs_mask).then(|| MaskRenderState::new(stencil_reference));

    let outline = if target.enabled {
        match target.material_type {
            MaterialType::Basic => generated_outline.map(|material| OutlineDraw {
                material,
                pass_index: Some(target.extrusion_method.pass_index()),
                enable_instancing: false,
                state: DrawState::Outline {
                    state: OutlineRenderState::derive(target, material),
                    stencil,
                },
            }),
            MaterialType::Custom => target.custom_material.map(|material| OutlineDraw {
                material,
                pass_index: None,
                enable_instancing: true,
                state: DrawState::Custom { stencil },
            }),
        }
    } else {
        None
    };

    PreparedTarget {
        index,
        filter: DrawFilter::from_target(target),
        mask,
        outline,
    }
}

/// Resolves every target in list order.
///
/// Fails if the mask or clear material is missing; a missing outline material
/// only deactivates targets using the generated material.
pub fn prepare_targets(
    targets: &[OutlineTarget],
    materials: &PassMaterials,
    stencil_reference: u32,
) -> RendererResult<Vec<PreparedTarget>> {
    for kind in [ShaderKind::Mask, ShaderKind::Clear] {
        if materials.get(kind).is_none() {
            return Err(RendererError::ResourceUnavailable(kind));
        }
    }

    Ok(targets
        .iter()
        .enumerate()
        .map(|(index, target)| prepare_target(index, target, materials.outline, stencil_reference))
        .collect())
}

/// The mask / outline / clear pass.
#[derive(Debug, Default)]
pub struct OutlinePass {
    phase: FramePhase,
    targets: Vec<PreparedTarget>,
    mask_material: Option<MaterialHandle>,
    clear_material: Option<MaterialHandle>,
    stats: FrameStats,
}

impl OutlinePass {
    /// Creates an idle pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current phase.
    pub fn phase(&self) -> FramePhase {
        self.phase
    }

    /// Returns the targets prepared for the current frame.
    pub fn prepared_targets(&self) -> &[PreparedTarget] {
        &self.targets
    }

    /// Returns the draw counts of the current (or last completed) frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Derives this frame's render state and returns [`Self::should_render`].
    ///
    /// Valid in any phase: an unfinished previous frame is discarded.
    pub fn prepare(
        &mut self,
        targets: &[OutlineTarget],
        materials: &PassMaterials,
        stencil_reference: u32,
    ) -> RendererResult<bool> {
        if self.phase != FramePhase::Idle {
            tracing::debug!("Discarding unfinished outline frame in {:?}", self.phase);
        }

        self.phase = FramePhase::Idle;
        self.targets.clear();
        self.stats = FrameStats::default();

        self.targets = prepare_targets(targets, materials, stencil_reference)?;
        self.mask_material = materials.mask;
        self.clear_material = materials.clear;
        self.phase = FramePhase::Prepared;

        Ok(self.should_render())
    }

    /// Returns true if any prepared target is active.
    pub fn should_render(&self) -> bool {
        self.targets.iter().any(PreparedTarget::is_active)
    }

    fn expect_phase(&self, expected: FramePhase) -> RendererResult<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(RendererError::PhaseOrder {
                expected,
                found: self.phase,
            })
        }
    }

    /// Writes the stencil mask of every target that needs one.
    ///
    /// Returns the number of mask draws.
    pub fn render_mask_pass(
        &mut self,
        scene: &dyn SceneQuery,
        ctx: &FrameContext,
        sink: &mut dyn CommandSink,
    ) -> RendererResult<usize> {
        self.expect_phase(FramePhase::Prepared)?;
        let material = self
            .mask_material
            .ok_or(RendererError::ResourceUnavailable(ShaderKind::Mask))?;
        let _span = tracing::debug_span!("outline_mask").entered();

        sink.submit(DrawCommand::BeginPass {
            name: pass_names::MASK,
            target: ctx.target,
        });

        let mut draws = 0;
        for target in &self.targets {
            let Some(mask) = target.mask else {
                continue;
            };

            for item in scene.query(&target.filter, &ctx.camera, ctx.sort_criteria) {
                sink.submit(DrawCommand::Draw(DrawSubmission {
                    target_index: target.index,
                    object: item.object,
                    material,
                    pass_index: None,
                    enable_instancing: true,
                    state: DrawState::Mask(mask),
                }));
                draws += 1;
            }
        }

        sink.submit(DrawCommand::EndPass);

        self.stats.mask_draws = draws;
        self.phase = FramePhase::Masked;
        tracing::trace!("Outline mask pass: {} draw(s)", draws);
        Ok(draws)
    }

    /// Draws the outline of every active target.
    ///
    /// Returns the number of outline draws.
    pub fn render_outline_pass(
        &mut self,
        scene: &dyn SceneQuery,
        ctx: &FrameContext,
        sink: &mut dyn CommandSink,
    ) -> RendererResult<usize> {
        self.expect_phase(FramePhase::Masked)?;
        let _span = tracing::debug_span!("outline_draw").entered();

        sink.submit(DrawCommand::BeginPass {
            name: pass_names::OUTLINE,
            target: ctx.target,
        });

        let mut draws = 0;
        for target in &self.targets {
            let Some(outline) = target.outline else {
                continue;
            };

            for item in scene.query(&target.filter, &ctx.camera, ctx.sort_criteria) {
                sink.submit(DrawCommand::Draw(DrawSubmission {
                    target_index: target.index,
                    object: item.object,
                    material: outline.material,
                    pass_index: outline.pass_index,
                    enable_instancing: outline.enable_instancing,
                    state: outline.state,
                }));
                draws += 1;
            }
        }

        sink.submit(DrawCommand::EndPass);

        self.stats.outline_draws = draws;
        self.phase = FramePhase::Outlined;
        tracing::trace!("Outline pass: {} draw(s)", draws);
        Ok(draws)
    }

    /// Resets the stencil buffer, handing it back to the host.
    pub fn clear_stencil(
        &mut self,
        ctx: &FrameContext,
        sink: &mut dyn CommandSink,
    ) -> RendererResult<()> {
        self.expect_phase(FramePhase::Outlined)?;
        let material = self
            .clear_material
            .ok_or(RendererError::ResourceUnavailable(ShaderKind::Clear))?;
        let _span = tracing::debug_span!("outline_clear_stencil").entered();

        sink.submit(DrawCommand::BeginPass {
            name: pass_names::CLEAR,
            target: ctx.target,
        });
        sink.submit(DrawCommand::ClearStencil {
            material,
            target: ctx.target,
            vertex_count: outline::CLEAR_VERTEX_COUNT,
        });
        sink.submit(DrawCommand::EndPass);

        self.stats.stencil_clears += 1;
        self.phase = FramePhase::Idle;
        Ok(())
    }

    /// Runs mask, outline and clear in order on a prepared frame.
    pub fn execute(
        &mut self,
        scene: &dyn SceneQuery,
        ctx: &FrameContext,
        sink: &mut dyn CommandSink,
    ) -> RendererResult<FrameStats> {
        self.render_mask_pass(scene, ctx, sink)?;
        self.render_outline_pass(scene, ctx, sink)?;
        self.clear_stencil(ctx, sink)?;
        Ok(self.stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::stencil;
    use crate::context::{CameraView, RenderTarget};
    use crate::materials::HandleMaterialProvider;
    use crate::recorder::CommandRecorder;
    use crate::scene::{RenderObject, Scene};
    use lw_core::{LayerMask, MaskingStrategy, Occlusion, OutlineRenderQueue};

    fn materials() -> PassMaterials {
        let mut provider = HandleMaterialProvider::new();
        let mut materials = PassMaterials::default();
        assert!(materials.ensure(&mut provider));
        materials
    }

    fn ctx() -> FrameContext {
        FrameContext::new(CameraView::default(), RenderTarget::default())
    }

    fn run_frame(
        targets: &[OutlineTarget],
        materials: &PassMaterials,
        scene: &Scene,
    ) -> CommandRecorder {
        let mut pass = OutlinePass::new();
        let mut recorder = CommandRecorder::new();
        pass.prepare(targets, materials, stencil::REFERENCE).unwrap();
        pass.execute(scene, &ctx(), &mut recorder).unwrap();
        recorder
    }

    #[test]
    fn test_should_render() {
        let materials = materials();
        let off = OutlineTarget::new().with_enabled(false);
        let on = OutlineTarget::new();

        assert!(!should_render(
            &[off.clone(), off.clone(), off.clone()],
            &materials
        ));
        assert!(should_render(&[off.clone(), on, off], &materials));
        assert!(!should_render(&[], &materials));
        assert!(!should_render(
            &[OutlineTarget::new()],
            &PassMaterials::default()
        ));
    }

    #[test]
    fn test_prepare_is_idempotent() {
        let materials = materials();
        let targets = vec![
            OutlineTarget::new().with_occlusion(Occlusion::WhenOccluded),
            OutlineTarget::new().with_masking_strategy(MaskingStrategy::CullFrontFaces),
            OutlineTarget::new().with_custom_material(None),
        ];

        let first = prepare_targets(&targets, &materials, stencil::REFERENCE).unwrap();
        let second = prepare_targets(&targets, &materials, stencil::REFERENCE).unwrap();
        assert_eq!(first, second);

        let mut pass = OutlinePass::new();
        pass.prepare(&targets, &materials, stencil::REFERENCE).unwrap();
        let from_pass = pass.prepared_targets().to_vec();
        pass.prepare(&targets, &materials, stencil::REFERENCE).unwrap();
        assert_eq!(pass.prepared_targets(), from_pass.as_slice());
    }

    #[test]
    fn test_end_to_end_single_target() {
        let materials = materials();
        let target = OutlineTarget::new()
            .with_masking_strategy(MaskingStrategy::Stencil)
            .with_occlusion(Occlusion::WhenNotOccluded)
            .with_render_queue(OutlineRenderQueue::Opaque)
            .with_layer_mask(LayerMask::layer(8));

        let matching = RenderObject::new("ufo").with_layer(8);
        let matching_id = matching.id;
        let scene = Scene::from_objects([matching, RenderObject::new("cow").with_layer(9)]);

        let recorder = run_frame(&[target], &materials, &scene);

        let masks = recorder.draws_in(pass_names::MASK);
        assert_eq!(masks.len(), 1);
        assert_eq!(masks[0].object, matching_id);
        assert_eq!(masks[0].material, materials.mask.unwrap());
        let mask_stencil = masks[0].state.stencil().unwrap();
        assert_eq!(mask_stencil.compare, wgpu::CompareFunction::Always);
        assert_eq!(mask_stencil.pass_op, wgpu::StencilOperation::Replace);
        assert_eq!(mask_stencil.fail_op, wgpu::StencilOperation::Replace);
        assert_eq!(mask_stencil.depth_fail_op, wgpu::StencilOperation::Replace);
        assert!(matches!(
            masks[0].state,
            DrawState::Mask(MaskRenderState { color_writes, .. }) if color_writes.is_empty()
        ));

        let outlines = recorder.draws_in(pass_names::OUTLINE);
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].object, matching_id);
        assert_eq!(outlines[0].pass_index, Some(0));
        assert!(!outlines[0].enable_instancing);
        let test = outlines[0].state.stencil().unwrap();
        assert_eq!(test.compare, wgpu::CompareFunction::NotEqual);
        assert_eq!(test.pass_op, wgpu::StencilOperation::Zero);
        assert_eq!(test.fail_op, wgpu::StencilOperation::Keep);
        assert_eq!(test.reference, 1);
        assert_eq!(
            outlines[0].state.depth_compare(),
            Some(wgpu::CompareFunction::LessEqual)
        );

        assert_eq!(recorder.stencil_clears(), 1);
        let clear_pos = recorder
            .commands()
            .iter()
            .position(|c| matches!(c, DrawCommand::ClearStencil { .. }))
            .unwrap();
        let last_draw = recorder
            .commands()
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Draw(_)))
            .unwrap();
        assert!(clear_pos > last_draw);
    }

    #[test]
    fn test_disabled_targets_emit_nothing() {
        let materials = materials();
        let targets = [
            OutlineTarget::new().with_enabled(false),
            OutlineTarget::new()
                .with_enabled(false)
                .with_occlusion(Occlusion::WhenOccluded),
        ];
        let scene = Scene::from_objects([RenderObject::new("a"), RenderObject::new("b")]);

        let recorder = run_frame(&targets, &materials, &scene);
        assert!(recorder.draws_in(pass_names::MASK).is_empty());
        assert!(recorder.draws_in(pass_names::OUTLINE).is_empty());
        assert_eq!(recorder.stencil_clears(), 1);
    }

    #[test]
    fn test_custom_without_material_still_masks() {
        let materials = materials();
        let targets = [
            OutlineTarget::new()
                .with_custom_material(None)
                .with_layer_mask(LayerMask::layer(0)),
            OutlineTarget::new().with_layer_mask(LayerMask::layer(2)),
        ];
        let scene = Scene::from_objects([
            RenderObject::new("a"),
            RenderObject::new("b"),
            RenderObject::new("c").with_layer(2),
        ]);

        let recorder = run_frame(&targets, &materials, &scene);

        let masks = recorder.draws_in(pass_names::MASK);
        assert_eq!(masks.len(), 3);
        assert_eq!(
            masks.iter().filter(|d| d.target_index == 0).count(),
            2,
            "inactive custom target still masks its objects"
        );

        let outlines = recorder.draws_in(pass_names::OUTLINE);
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].target_index, 1);
    }

    #[test]
    fn test_custom_material_used_verbatim() {
        let materials = materials();
        let user = MaterialHandle::new();
        let targets = [OutlineTarget::new().with_custom_material(Some(user))];
        let scene = Scene::from_objects([RenderObject::new("a")]);

        let recorder = run_frame(&targets, &materials, &scene);
        let outlines = recorder.draws_in(pass_names::OUTLINE);
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].material, user);
        assert_eq!(outlines[0].pass_index, None);
        assert!(matches!(outlines[0].state, DrawState::Custom { stencil: Some(_) }));
        assert_eq!(outlines[0].state.depth_compare(), None);
    }

    #[test]
    fn test_cull_front_faces_skips_mask() {
        let materials = materials();
        let targets = [OutlineTarget::new()
            .with_masking_strategy(MaskingStrategy::CullFrontFaces)
            .with_occlusion(Occlusion::WhenNotOccluded)];
        let scene = Scene::from_objects([RenderObject::new("a")]);

        let recorder = run_frame(&targets, &materials, &scene);
        assert!(recorder.draws_in(pass_names::MASK).is_empty());

        let outlines = recorder.draws_in(pass_names::OUTLINE);
        assert_eq!(outlines.len(), 1);
        assert_eq!(outlines[0].state.stencil(), None);
    }

    #[test]
    fn test_targets_processed_in_list_order() {
        let materials = materials();
        let targets = [
            OutlineTarget::new().with_layer_mask(LayerMask::layer(1)),
            OutlineTarget::new().with_layer_mask(LayerMask::layer(0)),
        ];
        let scene = Scene::from_objects([
            RenderObject::new("zero").with_layer(0),
            RenderObject::new("one").with_layer(1),
        ]);

        let recorder = run_frame(&targets, &materials, &scene);
        let order: Vec<usize> = recorder
            .draws_in(pass_names::MASK)
            .iter()
            .map(|d| d.target_index)
            .collect();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_phase_order_enforced() {
        let materials = materials();
        let scene = Scene::new();
        let mut pass = OutlinePass::new();
        let mut recorder = CommandRecorder::new();

        let result = pass.render_mask_pass(&scene, &ctx(), &mut recorder);
        assert!(matches!(
            result,
            Err(RendererError::PhaseOrder {
                expected: FramePhase::Prepared,
                found: FramePhase::Idle
            })
        ));

        pass.prepare(&[OutlineTarget::new()], &materials, stencil::REFERENCE)
            .unwrap();
        assert!(pass.clear_stencil(&ctx(), &mut recorder).is_err());
        let result = pass.render_outline_pass(&scene, &ctx(), &mut recorder);
        assert!(result.is_err());
        assert!(recorder.is_empty());

        pass.execute(&scene, &ctx(), &mut recorder).unwrap();
        assert_eq!(pass.phase(), FramePhase::Idle);
        assert_eq!(pass.stats().stencil_clears, 1);
    }

    #[test]
    fn test_prepare_requires_mask_and_clear() {
        let mut materials = materials();
        materials.clear = None;

        let result = prepare_targets(&[OutlineTarget::new()], &materials, stencil::REFERENCE);
        assert_eq!(
            result,
            Err(RendererError::ResourceUnavailable(ShaderKind::Clear))
        );
    }

    #[test]
    fn test_missing_outline_material_deactivates_basic_targets() {
        let mut materials = materials();
        materials.outline = None;

        let mut pass = OutlinePass::new();
        let render = pass
            .prepare(&[OutlineTarget::new()], &materials, stencil::REFERENCE)
            .unwrap();
        assert!(!render);
    }
}
