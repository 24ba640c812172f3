//! Outline target definitions
//!
//! An [`OutlineTarget`] is one configured outline effect. It selects scene
//! objects by physical layer, rendering layer and render queue, and describes
//! how their outline is drawn.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::material::MaterialHandle;

/// Implements `TryFrom<i32>` for a fieldless enum from its discriminants.
///
/// Engine and editor layers serialize these enums as integers; anything
/// outside the listed discriminants is a configuration error.
macro_rules! impl_try_from_discriminant {
    ($ty:ident, $kind:literal, { $($value:literal => $variant:ident),+ $(,)? }) => {
        impl TryFrom<i32> for $ty {
            type Error = ConfigError;

            fn try_from(value: i32) -> ConfigResult<Self> {
                match value {
                    $($value => Ok($ty::$variant),)+
                    _ => Err(ConfigError::UnmappedEnum { kind: $kind, value }),
                }
            }
        }
    };
}

/// Physical layer selection (one bit per layer, 32 layers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Selects no layer.
    pub const NOTHING: Self = Self(0);
    /// Selects every layer.
    pub const EVERYTHING: Self = Self(u32::MAX);

    /// Mask selecting a single layer.
    pub fn layer(layer: u8) -> Self {
        Self(1u32.checked_shl(layer as u32).unwrap_or(0))
    }

    /// Returns true if the given layer index is selected.
    pub fn contains_layer(&self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::EVERYTHING
    }
}

/// Rendering layer selection, matched against an object's rendering layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderingLayerMask(pub u32);

impl RenderingLayerMask {
    /// The engine's default rendering layer.
    pub const DEFAULT: Self = Self(1);
    /// Matches objects on any rendering layer.
    pub const ALL: Self = Self(u32::MAX);

    /// Returns true if the masks share at least one layer.
    pub fn intersects(&self, other: u32) -> bool {
        self.0 & other != 0
    }
}

impl Default for RenderingLayerMask {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Render queue bucket a target draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OutlineRenderQueue {
    #[default]
    Opaque,
    Transparent,
    OpaqueAndTransparent,
}

impl_try_from_discriminant!(OutlineRenderQueue, "render queue", {
    0 => Opaque,
    1 => Transparent,
    2 => OpaqueAndTransparent,
});

/// Whether the outline draws through, behind or only in front of other geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Occlusion {
    #[default]
    Always,
    WhenOccluded,
    WhenNotOccluded,
}

impl_try_from_discriminant!(Occlusion, "occlusion", {
    0 => Always,
    1 => WhenOccluded,
    2 => WhenNotOccluded,
});

/// How the interior of the silhouette is kept free of outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MaskingStrategy {
    #[default]
    Stencil,
    CullFrontFaces,
}

impl_try_from_discriminant!(MaskingStrategy, "masking strategy", {
    0 => Stencil,
    1 => CullFrontFaces,
});

/// Color blending of the outline against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BlendMode {
    #[default]
    Alpha,
    Premultiply,
    Additive,
    SoftAdditive,
    Multiply,
    Multiply2x,
}

impl_try_from_discriminant!(BlendMode, "blend mode", {
    0 => Alpha,
    1 => Premultiply,
    2 => Additive,
    3 => SoftAdditive,
    4 => Multiply,
    5 => Multiply2x,
});

/// Vertex extrusion technique. The discriminant is the outline shader pass index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExtrusionMethod {
    #[default]
    ClipSpaceNormalVector = 0,
    ObjectSpaceNormalVector = 1,
}

impl_try_from_discriminant!(ExtrusionMethod, "extrusion method", {
    0 => ClipSpaceNormalVector,
    1 => ObjectSpaceNormalVector,
});

impl ExtrusionMethod {
    /// Shader pass index for this extrusion method.
    pub fn pass_index(&self) -> u32 {
        *self as u32
    }
}

/// Outline width behavior with camera distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Scaling {
    #[default]
    ConstantScreenSize,
    ScaleWithDistance,
}

impl_try_from_discriminant!(Scaling, "scaling", {
    0 => ConstantScreenSize,
    1 => ScaleWithDistance,
});

/// Reference vertical resolution for resolution-scaled widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Resolution {
    R480,
    R720,
    #[default]
    R1080,
    Custom,
}

impl_try_from_discriminant!(Resolution, "resolution", {
    0 => R480,
    1 => R720,
    2 => R1080,
    3 => Custom,
});

/// Where the outline material comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MaterialType {
    /// Generated outline material configured from the target's fields.
    #[default]
    Basic,
    /// User supplied material, used verbatim.
    Custom,
}

impl_try_from_discriminant!(MaterialType, "material type", {
    0 => Basic,
    1 => Custom,
});

/// One configured outline effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineTarget {
    /// Whether this outline is drawn at all.
    pub enabled: bool,

    // Filters
    pub rendering_layer: RenderingLayerMask,
    pub layer_mask: LayerMask,
    pub render_queue: OutlineRenderQueue,

    // Render
    pub occlusion: Occlusion,
    pub masking_strategy: MaskingStrategy,
    pub blend_mode: BlendMode,

    // Outline
    pub color: [f32; 4],
    pub enable_occlusion: bool,
    /// Only used when `enable_occlusion` is set and occlusion is `Always`.
    pub occluded_color: [f32; 4],
    pub extrusion_method: ExtrusionMethod,
    pub scaling: Scaling,
    pub width: f32,
    /// Only meaningful with [`Scaling::ScaleWithDistance`].
    pub min_width: f32,
    pub scale_with_resolution: bool,
    pub reference_resolution: Resolution,
    pub custom_resolution: f32,

    pub material_type: MaterialType,
    pub custom_material: Option<MaterialHandle>,
}

impl Default for OutlineTarget {
    fn default() -> Self {
        Self {
            enabled: true,
            rendering_layer: RenderingLayerMask::DEFAULT,
            layer_mask: LayerMask::EVERYTHING,
            render_queue: OutlineRenderQueue::Opaque,
            occlusion: Occlusion::Always,
            masking_strategy: MaskingStrategy::Stencil,
            blend_mode: BlendMode::Alpha,
            color: [0.0, 0.0, 0.0, 1.0],
            enable_occlusion: false,
            occluded_color: [1.0, 0.0, 0.0, 0.5],
            extrusion_method: ExtrusionMethod::ClipSpaceNormalVector,
            scaling: Scaling::ConstantScreenSize,
            width: 2.0,
            min_width: 0.5,
            scale_with_resolution: false,
            reference_resolution: Resolution::R1080,
            custom_resolution: 1080.0,
            material_type: MaterialType::Basic,
            custom_material: None,
        }
    }
}

impl OutlineTarget {
    /// Creates an enabled outline with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the outline is enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the physical layer filter.
    pub fn with_layer_mask(mut self, layer_mask: LayerMask) -> Self {
        self.layer_mask = layer_mask;
        self
    }

    /// Sets the rendering layer filter.
    pub fn with_rendering_layer(mut self, rendering_layer: RenderingLayerMask) -> Self {
        self.rendering_layer = rendering_layer;
        self
    }

    /// Sets the render queue filter.
    pub fn with_render_queue(mut self, render_queue: OutlineRenderQueue) -> Self {
        self.render_queue = render_queue;
        self
    }

    /// Sets the occlusion mode.
    pub fn with_occlusion(mut self, occlusion: Occlusion) -> Self {
        self.occlusion = occlusion;
        self
    }

    /// Sets the masking strategy.
    pub fn with_masking_strategy(mut self, masking_strategy: MaskingStrategy) -> Self {
        self.masking_strategy = masking_strategy;
        self
    }

    /// Sets the outline color.
    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }

    /// Sets the outline width.
    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Sets the extrusion method.
    pub fn with_extrusion_method(mut self, extrusion_method: ExtrusionMethod) -> Self {
        self.extrusion_method = extrusion_method;
        self
    }

    /// Uses a user supplied material instead of the generated one.
    pub fn with_custom_material(mut self, material: Option<MaterialHandle>) -> Self {
        self.material_type = MaterialType::Custom;
        self.custom_material = material;
        self
    }

    /// Returns true if this outline's policy requires a stencil mask.
    ///
    /// The mask is needed unless the outline only draws where it is not
    /// occluded and the inside of the silhouette is removed by culling
    /// front faces instead.
    pub fn needs_stencil_mask(&self) -> bool {
        self.masking_strategy == MaskingStrategy::Stencil
            || self.occlusion != Occlusion::WhenNotOccluded
    }

    /// Resolves the outline material given the generated one, if any.
    pub fn resolve_material(&self, generated: Option<MaterialHandle>) -> Option<MaterialHandle> {
        match self.material_type {
            MaterialType::Basic => generated,
            MaterialType::Custom => self.custom_material,
        }
    }

    /// Returns true if the outline is enabled and has a resolved material.
    pub fn is_active(&self, generated: Option<MaterialHandle>) -> bool {
        self.enabled && self.resolve_material(generated).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occlusion_from_discriminant() {
        assert_eq!(Occlusion::try_from(0), Ok(Occlusion::Always));
        assert_eq!(Occlusion::try_from(1), Ok(Occlusion::WhenOccluded));
        assert_eq!(Occlusion::try_from(2), Ok(Occlusion::WhenNotOccluded));
        assert!(matches!(
            Occlusion::try_from(3),
            Err(ConfigError::UnmappedEnum {
                kind: "occlusion",
                value: 3
            })
        ));
    }

    #[test]
    fn test_render_queue_from_discriminant() {
        assert_eq!(
            OutlineRenderQueue::try_from(2),
            Ok(OutlineRenderQueue::OpaqueAndTransparent)
        );
        assert!(OutlineRenderQueue::try_from(-1).is_err());
    }

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::layer(3);
        assert!(mask.contains_layer(3));
        assert!(!mask.contains_layer(4));
        assert!(LayerMask::EVERYTHING.contains_layer(31));
        assert!(!LayerMask::NOTHING.contains_layer(0));
        assert!(!LayerMask::EVERYTHING.contains_layer(40));
    }

    #[test]
    fn test_needs_stencil_mask() {
        let target = OutlineTarget::new()
            .with_masking_strategy(MaskingStrategy::CullFrontFaces)
            .with_occlusion(Occlusion::WhenNotOccluded);
        assert!(!target.needs_stencil_mask());

        let target = target.with_occlusion(Occlusion::Always);
        assert!(target.needs_stencil_mask());

        let target = OutlineTarget::new()
            .with_masking_strategy(MaskingStrategy::Stencil)
            .with_occlusion(Occlusion::WhenNotOccluded);
        assert!(target.needs_stencil_mask());
    }

    #[test]
    fn test_material_resolution() {
        let generated = MaterialHandle::new();
        let basic = OutlineTarget::new();
        assert_eq!(basic.resolve_material(Some(generated)), Some(generated));
        assert!(!basic.is_active(None));
        assert!(!basic.clone().with_enabled(false).is_active(Some(generated)));

        let custom = OutlineTarget::new().with_custom_material(None);
        assert!(!custom.is_active(Some(generated)));

        let user = MaterialHandle::new();
        let custom = OutlineTarget::new().with_custom_material(Some(user));
        assert_eq!(custom.resolve_material(Some(generated)), Some(user));
        assert!(custom.is_active(None));
    }

    #[test]
    fn test_extrusion_pass_index() {
        assert_eq!(ExtrusionMethod::ClipSpaceNormalVector.pass_index(), 0);
        assert_eq!(ExtrusionMethod::ObjectSpaceNormalVector.pass_index(), 1);
    }
}
