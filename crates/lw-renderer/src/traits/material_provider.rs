//! MaterialProvider trait definition.

use lw_core::{MaterialHandle, ShaderKind};

/// Creates and destroys the materials generated for the outline pass.
pub trait MaterialProvider {
    /// Creates a material for the given shader, or `None` if the shader is
    /// unavailable.
    fn create_material(&mut self, kind: ShaderKind) -> Option<MaterialHandle>;

    /// Releases a material created by this provider.
    fn destroy_material(&mut self, material: MaterialHandle);
}
