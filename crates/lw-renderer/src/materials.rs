//! Generated materials of the outline pass.

use std::collections::HashSet;

use lw_core::{MaterialHandle, ShaderKind};

use crate::traits::MaterialProvider;

/// The mask, outline and clear materials the pass generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassMaterials {
    pub mask: Option<MaterialHandle>,
    pub outline: Option<MaterialHandle>,
    pub clear: Option<MaterialHandle>,
}

impl PassMaterials {
    /// Returns the material slot for a shader kind.
    pub fn get(&self, kind: ShaderKind) -> Option<MaterialHandle> {
        match kind {
            ShaderKind::Mask => self.mask,
            ShaderKind::Outline => self.outline,
            ShaderKind::Clear => self.clear,
        }
    }

    fn slot_mut(&mut self, kind: ShaderKind) -> &mut Option<MaterialHandle> {
        match kind {
            ShaderKind::Mask => &mut self.mask,
            ShaderKind::Outline => &mut self.outline,
            ShaderKind::Clear => &mut self.clear,
        }
    }

    /// Returns the shader kinds without a material.
    pub fn missing(&self) -> Vec<ShaderKind> {
        ShaderKind::all()
            .iter()
            .copied()
            .filter(|kind| self.get(*kind).is_none())
            .collect()
    }

    /// Returns true if every material exists.
    pub fn is_complete(&self) -> bool {
        self.mask.is_some() && self.outline.is_some() && self.clear.is_some()
    }

    /// Creates the missing materials. Returns true if all exist afterwards.
    pub fn ensure(&mut self, provider: &mut dyn MaterialProvider) -> bool {
        for kind in ShaderKind::all() {
            let slot = self.slot_mut(*kind);
            if slot.is_none() {
                *slot = provider.create_material(*kind);
                if slot.is_some() {
                    tracing::debug!("Created {} material from \"{}\"", kind, kind.shader_name());
                }
            }
        }
        self.is_complete()
    }

    /// Destroys every material and empties the slots.
    pub fn release(&mut self, provider: &mut dyn MaterialProvider) {
        for kind in ShaderKind::all() {
            if let Some(material) = self.slot_mut(*kind).take() {
                provider.destroy_material(material);
            }
        }
    }
}

/// A [`MaterialProvider`] handing out plain handles.
///
/// Shaders can be marked unavailable to model hosts where a shader failed to
/// compile or was stripped from the build.
#[derive(Debug, Default)]
pub struct HandleMaterialProvider {
    live: HashSet<MaterialHandle>,
    unavailable: HashSet<ShaderKind>,
}

impl HandleMaterialProvider {
    /// Creates a provider where every shader is available.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a shader as available or not.
    pub fn set_available(&mut self, kind: ShaderKind, available: bool) {
        if available {
            self.unavailable.remove(&kind);
        } else {
            self.unavailable.insert(kind);
        }
    }

    /// Returns the number of materials created and not yet destroyed.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl MaterialProvider for HandleMaterialProvider {
    fn create_material(&mut self, kind: ShaderKind) -> Option<MaterialHandle> {
        if self.unavailable.contains(&kind) {
            return None;
        }
        let material = MaterialHandle::new();
        self.live.insert(material);
        Some(material)
    }

    fn destroy_material(&mut self, material: MaterialHandle) {
        self.live.remove(&material);
    }
}
