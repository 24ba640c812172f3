//! Host-facing outline feature.
//!
//! [`OutlineFeature`] owns the settings, the generated materials and the
//! [`OutlinePass`]. The host calls [`OutlineFeature::render_frame`] once per
//! camera at the feature's [`InjectionPoint`].

use std::path::Path;

use lw_core::{InjectionPoint, OutlineSettings, ShaderKind};

use crate::context::{CameraKind, CameraView, FrameContext};
use crate::error::RendererResult;
use crate::materials::PassMaterials;
use crate::pass::{FrameStats, OutlinePass};
use crate::traits::{CommandSink, MaterialProvider, SceneQuery};

/// Why a frame was not rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The camera does not show outlines.
    CameraExcluded,
    /// A generated material could not be created.
    MaterialsUnavailable,
    /// No target is active.
    NoActiveOutlines,
}

/// Result of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Skipped(SkipReason),
    Rendered(FrameStats),
}

/// The outline renderer feature.
pub struct OutlineFeature {
    settings: OutlineSettings,
    materials: PassMaterials,
    pass: OutlinePass,
}

impl OutlineFeature {
    /// Creates a feature with the given settings. Materials are created on
    /// the first frame.
    pub fn new(settings: OutlineSettings) -> Self {
        Self {
            settings,
            materials: PassMaterials::default(),
            pass: OutlinePass::new(),
        }
    }

    /// Creates a feature from a RON settings file.
    pub fn from_settings_file(path: &Path) -> RendererResult<Self> {
        Ok(Self::new(OutlineSettings::load(path)?))
    }

    /// Returns the settings.
    pub fn settings(&self) -> &OutlineSettings {
        &self.settings
    }

    /// Replaces the settings. Generated materials are kept.
    pub fn set_settings(&mut self, settings: OutlineSettings) {
        self.settings = settings;
    }

    /// Returns the generated materials.
    pub fn materials(&self) -> &PassMaterials {
        &self.materials
    }

    /// Returns the pass, for hosts driving the phases themselves.
    pub fn pass(&self) -> &OutlinePass {
        &self.pass
    }

    /// Where the host schedules the pass.
    pub fn injection_point(&self) -> InjectionPoint {
        self.settings.injection_point
    }

    /// Returns true if outlines are drawn for this camera.
    pub fn should_render_for_camera(&self, camera: &CameraView) -> bool {
        match camera.kind {
            CameraKind::Preview | CameraKind::Reflection => false,
            CameraKind::SceneView if !self.settings.show_in_scene_view => false,
            _ => !camera.offscreen_depth,
        }
    }

    /// Creates any missing generated material.
    ///
    /// Logs a single warning and returns false if one is still missing.
    /// Called every frame, so a shader that becomes available later is
    /// picked up without a restart.
    pub fn ensure_materials(&mut self, provider: &mut dyn MaterialProvider) -> bool {
        if self.materials.ensure(provider) {
            return true;
        }

        let missing: Vec<&str> = self
            .materials
            .missing()
            .iter()
            .map(ShaderKind::shader_name)
            .collect();
        tracing::warn!(
            "Not all required materials could be created (missing shaders: {:?}). Outlines will not render.",
            missing
        );
        false
    }

    /// Runs one frame: camera filter, materials, prepare, then mask,
    /// outline and clear.
    pub fn render_frame(
        &mut self,
        provider: &mut dyn MaterialProvider,
        scene: &dyn SceneQuery,
        ctx: &FrameContext,
        sink: &mut dyn CommandSink,
    ) -> RendererResult<FrameOutcome> {
        if !self.should_render_for_camera(&ctx.camera) {
            return Ok(FrameOutcome::Skipped(SkipReason::CameraExcluded));
        }

        if !self.ensure_materials(provider) {
            return Ok(FrameOutcome::Skipped(SkipReason::MaterialsUnavailable));
        }

        let render = self.pass.prepare(
            &self.settings.outlines,
            &self.materials,
            ctx.stencil_reference,
        )?;
        if !render {
            return Ok(FrameOutcome::Skipped(SkipReason::NoActiveOutlines));
        }

        let stats = self.pass.execute(scene, ctx, sink)?;
        tracing::debug!(
            "Outline frame: {} mask draw(s), {} outline draw(s)",
            stats.mask_draws,
            stats.outline_draws
        );
        Ok(FrameOutcome::Rendered(stats))
    }

    /// Destroys the generated materials.
    pub fn destroy(&mut self, provider: &mut dyn MaterialProvider) {
        self.materials.release(provider);
        tracing::info!("Outline feature destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderTarget;
    use crate::materials::HandleMaterialProvider;
    use crate::recorder::CommandRecorder;
    use crate::scene::{RenderObject, Scene};
    use glam::Vec3;
    use crate::pass::FramePhase;
    use lw_core::OutlineTarget;

    fn feature() -> OutlineFeature {
        OutlineFeature::new(OutlineSettings::new(vec![OutlineTarget::new()]))
    }

    fn ctx(kind: CameraKind) -> FrameContext {
        FrameContext::new(
            CameraView::game(Vec3::ZERO).with_kind(kind),
            RenderTarget::default(),
        )
    }

    #[test]
    fn test_camera_filter() {
        let mut feature = feature();
        let preview = CameraView::default().with_kind(CameraKind::Preview);
        let reflection = CameraView::default().with_kind(CameraKind::Reflection);
        assert!(feature.should_render_for_camera(&CameraView::default()));
        assert!(!feature.should_render_for_camera(&preview));
        assert!(!feature.should_render_for_camera(&reflection));

        let scene_view = CameraView::default().with_kind(CameraKind::SceneView);
        assert!(feature.should_render_for_camera(&scene_view));

        let mut settings = feature.settings().clone();
        settings.show_in_scene_view = false;
        feature.set_settings(settings);
        assert!(!feature.should_render_for_camera(&scene_view));

        let mut offscreen = CameraView::default();
        offscreen.offscreen_depth = true;
        assert!(!feature.should_render_for_camera(&offscreen));
    }

    #[test]
    fn test_render_frame() {
        let mut feature = feature();
        let mut provider = HandleMaterialProvider::new();
        let mut recorder = CommandRecorder::new();
        let scene = Scene::from_objects([RenderObject::new("a"), RenderObject::new("b")]);

        let outcome = feature
            .render_frame(&mut provider, &scene, &ctx(CameraKind::Game), &mut recorder)
            .unwrap();
        assert_eq!(
            outcome,
            FrameOutcome::Rendered(FrameStats {
                mask_draws: 2,
                outline_draws: 2,
                stencil_clears: 1,
            })
        );
        assert_eq!(recorder.stencil_clears(), 1);
        assert_eq!(feature.pass().phase(), FramePhase::Idle);
        assert_eq!(feature.pass().prepared_targets().len(), 1);
    }

    #[test]
    fn test_excluded_camera_submits_nothing() {
        let mut feature = feature();
        let mut provider = HandleMaterialProvider::new();
        let mut recorder = CommandRecorder::new();

        let outcome = feature
            .render_frame(
                &mut provider,
                &Scene::new(),
                &ctx(CameraKind::Reflection),
                &mut recorder,
            )
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::CameraExcluded));
        assert!(recorder.is_empty());
        assert_eq!(provider.live_count(), 0);
    }

    #[test]
    fn test_missing_materials_skip_then_recover() {
        let mut feature = feature();
        let mut provider = HandleMaterialProvider::new();
        provider.set_available(ShaderKind::Mask, false);
        let mut recorder = CommandRecorder::new();
        let scene = Scene::from_objects([RenderObject::new("a")]);

        let outcome = feature
            .render_frame(&mut provider, &scene, &ctx(CameraKind::Game), &mut recorder)
            .unwrap();
        assert_eq!(
            outcome,
            FrameOutcome::Skipped(SkipReason::MaterialsUnavailable)
        );
        assert!(recorder.is_empty());

        provider.set_available(ShaderKind::Mask, true);
        let outcome = feature
            .render_frame(&mut provider, &scene, &ctx(CameraKind::Game), &mut recorder)
            .unwrap();
        assert!(matches!(outcome, FrameOutcome::Rendered(_)));
    }

    #[test]
    fn test_no_active_outlines() {
        let mut feature = OutlineFeature::new(OutlineSettings::new(vec![
            OutlineTarget::new().with_enabled(false),
        ]));
        let mut provider = HandleMaterialProvider::new();
        let mut recorder = CommandRecorder::new();

        let outcome = feature
            .render_frame(
                &mut provider,
                &Scene::new(),
                &ctx(CameraKind::Game),
                &mut recorder,
            )
            .unwrap();
        assert_eq!(outcome, FrameOutcome::Skipped(SkipReason::NoActiveOutlines));
        assert!(recorder.is_empty());
    }

    #[test]
    fn test_destroy_releases_materials() {
        let mut feature = feature();
        let mut provider = HandleMaterialProvider::new();
        assert!(feature.ensure_materials(&mut provider));
        assert_eq!(provider.live_count(), 3);

        feature.destroy(&mut provider);
        assert_eq!(provider.live_count(), 0);
        assert!(!feature.materials().is_complete());
    }
}
