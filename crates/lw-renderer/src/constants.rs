//! Constants used by the outline pass.

/// Stencil settings.
pub mod stencil {
    /// Reference value written by the mask pass and tested by the outline pass.
    pub const REFERENCE: u32 = 1;
    /// Stencil read/write mask.
    pub const MASK: u32 = 0xff;
    /// Depth-stencil format used by the wgpu pipeline helpers.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;
}

/// Render queue bounds (inclusive).
pub mod render_queue {
    /// Lowest render queue value.
    pub const MIN: u32 = 0;
    /// Last opaque queue value (geometry and alpha test).
    pub const OPAQUE_MAX: u32 = 2500;
    /// First transparent queue value.
    pub const TRANSPARENT_MIN: u32 = 2501;
    /// Highest render queue value.
    pub const MAX: u32 = 5000;
    /// Default queue of opaque geometry.
    pub const GEOMETRY: u32 = 2000;
    /// Default queue of transparent geometry.
    pub const TRANSPARENT: u32 = 3000;
}

/// Outline material settings.
pub mod outline {
    /// Converts widths authored for clip-space extrusion to the other
    /// extrusion methods.
    pub const WIDTH_SCALE: f32 = 0.015;
    /// Vertex count of the procedural full-screen triangle used to clear the stencil.
    pub const CLEAR_VERTEX_COUNT: u32 = 3;
}

/// Pass names, used for command grouping and tracing spans.
pub mod pass_names {
    pub const MASK: &str = "Outline Mask";
    pub const OUTLINE: &str = "Outline";
    pub const CLEAR: &str = "Outline Clear Stencil";
}

/// Shader keywords toggled by the outline render state.
pub mod keywords {
    pub const SCALE_WITH_RESOLUTION: &str = "SCALE_WITH_RESOLUTION";
    pub const OCCLUSION: &str = "OCCLUSION";
    pub const SCALE_WITH_DISTANCE: &str = "SCALE_WITH_DISTANCE";
}
