//! Per-frame render state derived from outline configuration.
//!
//! Everything in this module is a pure function of an [`OutlineTarget`]:
//! the same configuration always yields the same state, and nothing here is
//! kept between frames. The `*_state` helpers translate the derived values
//! into wgpu pipeline descriptors for hosts that draw with wgpu.

use lw_core::{
    BlendMode, ExtrusionMethod, MaskingStrategy, MaterialHandle, Occlusion, OutlineTarget,
    Resolution, Scaling,
};

use crate::constants::{keywords, outline, stencil};

/// Stencil test and operations applied to a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilTest {
    pub compare: wgpu::CompareFunction,
    pub pass_op: wgpu::StencilOperation,
    pub fail_op: wgpu::StencilOperation,
    pub depth_fail_op: wgpu::StencilOperation,
    pub reference: u32,
}

impl StencilTest {
    /// Unconditionally writes `reference`, whatever the depth test says.
    pub fn write_reference(reference: u32) -> Self {
        Self {
            compare: wgpu::CompareFunction::Always,
            pass_op: wgpu::StencilOperation::Replace,
            fail_op: wgpu::StencilOperation::Replace,
            depth_fail_op: wgpu::StencilOperation::Replace,
            reference,
        }
    }

    /// Passes only where `reference` was not written, and zeroes what it draws.
    ///
    /// Texels inside the mask keep their value; the clear pass resets them.
    pub fn outside_reference(reference: u32) -> Self {
        Self {
            compare: wgpu::CompareFunction::NotEqual,
            pass_op: wgpu::StencilOperation::Zero,
            fail_op: wgpu::StencilOperation::Keep,
            depth_fail_op: wgpu::StencilOperation::Keep,
            reference,
        }
    }

    /// Returns the per-face wgpu stencil state.
    pub fn face_state(&self) -> wgpu::StencilFaceState {
        wgpu::StencilFaceState {
            compare: self.compare,
            fail_op: self.fail_op,
            depth_fail_op: self.depth_fail_op,
            pass_op: self.pass_op,
        }
    }

    /// Returns the wgpu stencil state, identical for both faces.
    pub fn stencil_state(&self) -> wgpu::StencilState {
        let face = self.face_state();
        wgpu::StencilState {
            front: face,
            back: face,
            read_mask: stencil::MASK,
            write_mask: stencil::MASK,
        }
    }
}

/// Source and destination blend factors for a blend mode.
pub fn blend_factors(mode: BlendMode) -> (wgpu::BlendFactor, wgpu::BlendFactor) {
    use wgpu::BlendFactor as F;

    match mode {
        BlendMode::Alpha => (F::SrcAlpha, F::OneMinusSrcAlpha),
        BlendMode::Premultiply => (F::One, F::OneMinusSrcAlpha),
        BlendMode::Additive => (F::One, F::One),
        BlendMode::SoftAdditive => (F::OneMinusDst, F::One),
        BlendMode::Multiply => (F::Dst, F::Zero),
        BlendMode::Multiply2x => (F::Dst, F::Src),
    }
}

/// Blend state for a blend mode (same factors for color and alpha).
pub fn blend_state(mode: BlendMode) -> wgpu::BlendState {
    let (src_factor, dst_factor) = blend_factors(mode);
    let component = wgpu::BlendComponent {
        src_factor,
        dst_factor,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}

/// Depth compare function for an occlusion mode.
pub fn depth_compare(occlusion: Occlusion) -> wgpu::CompareFunction {
    match occlusion {
        Occlusion::Always => wgpu::CompareFunction::Always,
        Occlusion::WhenOccluded => wgpu::CompareFunction::GreaterEqual,
        Occlusion::WhenNotOccluded => wgpu::CompareFunction::LessEqual,
    }
}

/// Faces culled by the outline draw for a masking strategy.
pub fn cull_mode(strategy: MaskingStrategy) -> Option<wgpu::Face> {
    match strategy {
        MaskingStrategy::Stencil => None,
        MaskingStrategy::CullFrontFaces => Some(wgpu::Face::Front),
    }
}

/// Width multiplier for an extrusion method.
pub fn width_scale(method: ExtrusionMethod) -> f32 {
    match method {
        ExtrusionMethod::ClipSpaceNormalVector => 1.0,
        ExtrusionMethod::ObjectSpaceNormalVector => outline::WIDTH_SCALE,
    }
}

/// Reference resolution value for the shader.
pub fn reference_resolution(resolution: Resolution, custom: f32) -> f32 {
    match resolution {
        Resolution::R480 => 480.0,
        Resolution::R720 => 720.0,
        Resolution::R1080 => 1080.0,
        Resolution::Custom => custom,
    }
}

/// Shader feature toggles. Each flag maps 1:1 to a configuration field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ShaderFeatures {
    pub scale_with_resolution: bool,
    pub occlusion: bool,
    pub scale_with_distance: bool,
}

impl ShaderFeatures {
    /// Derives the toggles from a target.
    pub fn from_target(target: &OutlineTarget) -> Self {
        Self {
            scale_with_resolution: target.scale_with_resolution,
            occlusion: target.enable_occlusion,
            scale_with_distance: target.scaling == Scaling::ScaleWithDistance,
        }
    }

    /// Names of the enabled shader keywords.
    pub fn keywords(&self) -> Vec<&'static str> {
        let mut enabled = Vec::new();
        if self.scale_with_resolution {
            enabled.push(keywords::SCALE_WITH_RESOLUTION);
        }
        if self.occlusion {
            enabled.push(keywords::OCCLUSION);
        }
        if self.scale_with_distance {
            enabled.push(keywords::SCALE_WITH_DISTANCE);
        }
        enabled
    }
}

/// Render state of a mask draw: no color output, stencil reference written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskRenderState {
    pub color_writes: wgpu::ColorWrites,
    pub stencil: StencilTest,
}

impl MaskRenderState {
    /// Mask state writing the given reference.
    pub fn new(reference: u32) -> Self {
        Self {
            color_writes: wgpu::ColorWrites::empty(),
            stencil: StencilTest::write_reference(reference),
        }
    }

    /// Depth-stencil state for a mask pipeline. The depth test is left to
    /// always pass so occluded texels are masked too.
    pub fn depth_stencil_state(&self, format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Always,
            stencil: self.stencil.stencil_state(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    /// Color target state for a mask pipeline.
    pub fn color_target_state(&self, format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format,
            blend: None,
            write_mask: self.color_writes,
        }
    }
}

/// Render state of a generated outline material for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineRenderState {
    pub material: MaterialHandle,
    pub blend: wgpu::BlendState,
    pub cull_mode: Option<wgpu::Face>,
    pub color: [f32; 4],
    pub occluded_color: [f32; 4],
    pub width: f32,
    pub min_width: f32,
    pub reference_resolution: f32,
    pub features: ShaderFeatures,
    pub depth_compare: wgpu::CompareFunction,
}

impl OutlineRenderState {
    /// Derives the state of `target` drawn with the generated `material`.
    pub fn derive(target: &OutlineTarget, material: MaterialHandle) -> Self {
        let scale = width_scale(target.extrusion_method);

        // A fully occluded outline never shows its occluded color.
        let occluded_color = if target.occlusion == Occlusion::WhenOccluded {
            target.color
        } else {
            target.occluded_color
        };

        Self {
            material,
            blend: blend_state(target.blend_mode),
            cull_mode: cull_mode(target.masking_strategy),
            color: target.color,
            occluded_color,
            width: target.width * scale,
            min_width: target.min_width * scale,
            reference_resolution: reference_resolution(
                target.reference_resolution,
                target.custom_resolution,
            ),
            features: ShaderFeatures::from_target(target),
            depth_compare: depth_compare(target.occlusion),
        }
    }

    /// Depth-stencil state for an outline pipeline with the given stencil test.
    pub fn depth_stencil_state(
        &self,
        format: wgpu::TextureFormat,
        stencil: Option<&StencilTest>,
    ) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format,
            depth_write_enabled: false,
            depth_compare: self.depth_compare,
            stencil: stencil.map(|s| s.stencil_state()).unwrap_or_default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    /// Color target state for an outline pipeline.
    pub fn color_target_state(&self, format: wgpu::TextureFormat) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format,
            blend: Some(self.blend),
            write_mask: wgpu::ColorWrites::ALL,
        }
    }

    /// Primitive state for an outline pipeline.
    pub fn primitive_state(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            cull_mode: self.cull_mode,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_width_scale() {
        let material = MaterialHandle::new();
        let target = OutlineTarget::new()
            .with_width(10.0)
            .with_extrusion_method(ExtrusionMethod::ObjectSpaceNormalVector);
        let state = OutlineRenderState::derive(&target, material);
        assert_relative_eq!(state.width, 0.15);

        let target = target.with_extrusion_method(ExtrusionMethod::ClipSpaceNormalVector);
        let state = OutlineRenderState::derive(&target, material);
        assert_relative_eq!(state.width, 10.0);
    }

    #[test]
    fn test_min_width_scale() {
        let mut target =
            OutlineTarget::new().with_extrusion_method(ExtrusionMethod::ObjectSpaceNormalVector);
        target.min_width = 2.0;
        let state = OutlineRenderState::derive(&target, MaterialHandle::new());
        assert_relative_eq!(state.min_width, 0.03);
    }

    #[test]
    fn test_depth_compare_mapping() {
        assert_eq!(
            depth_compare(Occlusion::Always),
            wgpu::CompareFunction::Always
        );
        assert_eq!(
            depth_compare(Occlusion::WhenOccluded),
            wgpu::CompareFunction::GreaterEqual
        );
        assert_eq!(
            depth_compare(Occlusion::WhenNotOccluded),
            wgpu::CompareFunction::LessEqual
        );
    }

    #[test]
    fn test_blend_table() {
        use wgpu::BlendFactor as F;

        assert_eq!(
            blend_factors(BlendMode::Alpha),
            (F::SrcAlpha, F::OneMinusSrcAlpha)
        );
        assert_eq!(blend_factors(BlendMode::Additive), (F::One, F::One));
        assert_eq!(blend_factors(BlendMode::Multiply), (F::Dst, F::Zero));
        assert_eq!(
            blend_factors(BlendMode::SoftAdditive),
            (F::OneMinusDst, F::One)
        );
        assert_eq!(blend_factors(BlendMode::Multiply2x), (F::Dst, F::Src));

        let state = blend_state(BlendMode::Premultiply);
        assert_eq!(state.color, state.alpha);
        assert_eq!(state.color.src_factor, F::One);
    }

    #[test]
    fn test_occluded_color() {
        let mut target = OutlineTarget::new().with_color([0.0, 1.0, 0.0, 1.0]);
        target.occluded_color = [1.0, 0.0, 0.0, 1.0];

        let state = OutlineRenderState::derive(&target, MaterialHandle::new());
        assert_eq!(state.occluded_color, [1.0, 0.0, 0.0, 1.0]);

        let target = target.with_occlusion(Occlusion::WhenOccluded);
        let state = OutlineRenderState::derive(&target, MaterialHandle::new());
        assert_eq!(state.occluded_color, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_reference_resolution() {
        assert_eq!(reference_resolution(Resolution::R480, 0.0), 480.0);
        assert_eq!(reference_resolution(Resolution::R720, 0.0), 720.0);
        assert_eq!(reference_resolution(Resolution::Custom, 1440.0), 1440.0);
    }

    #[test]
    fn test_shader_features_are_independent() {
        let mut target = OutlineTarget::new();
        target.scale_with_resolution = true;
        target.scaling = Scaling::ScaleWithDistance;

        let features = ShaderFeatures::from_target(&target);
        assert!(features.scale_with_resolution);
        assert!(!features.occlusion);
        assert!(features.scale_with_distance);
        assert_eq!(
            features.keywords(),
            vec![keywords::SCALE_WITH_RESOLUTION, keywords::SCALE_WITH_DISTANCE]
        );
    }

    #[test]
    fn test_cull_mode_from_masking() {
        let target = OutlineTarget::new().with_masking_strategy(MaskingStrategy::CullFrontFaces);
        let state = OutlineRenderState::derive(&target, MaterialHandle::new());
        assert_eq!(state.primitive_state().cull_mode, Some(wgpu::Face::Front));
        assert_eq!(cull_mode(MaskingStrategy::Stencil), None);
    }

    #[test]
    fn test_stencil_states() {
        let mask = MaskRenderState::new(stencil::REFERENCE);
        let ds = mask.depth_stencil_state(stencil::FORMAT);
        assert_eq!(ds.stencil.front.compare, wgpu::CompareFunction::Always);
        assert_eq!(ds.stencil.back.depth_fail_op, wgpu::StencilOperation::Replace);
        assert_eq!(
            mask.color_target_state(wgpu::TextureFormat::Bgra8Unorm).write_mask,
            wgpu::ColorWrites::empty()
        );

        let test = StencilTest::outside_reference(stencil::REFERENCE);
        let state = OutlineRenderState::derive(&OutlineTarget::new(), MaterialHandle::new());
        let ds = state.depth_stencil_state(stencil::FORMAT, Some(&test));
        assert_eq!(ds.stencil.front.compare, wgpu::CompareFunction::NotEqual);
        assert_eq!(ds.stencil.front.pass_op, wgpu::StencilOperation::Zero);
        assert_eq!(ds.stencil.front.fail_op, wgpu::StencilOperation::Keep);

        let ds = state.depth_stencil_state(stencil::FORMAT, None);
        assert!(!ds.stencil.is_enabled());
    }
}
