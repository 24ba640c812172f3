//! Render object definition.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::render_queue;

/// A drawable object in the scene.
///
/// RenderObject holds only what the outline pass filters and sorts on;
/// meshes and shading stay with the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderObject {
    /// Unique identifier for this object.
    pub id: Uuid,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// World transform matrix.
    #[serde(default = "identity")]
    pub transform: Mat4,

    /// Whether this object is visible (culled otherwise).
    #[serde(default = "visible_default")]
    pub visible: bool,

    /// Physical layer index (0..32).
    #[serde(default)]
    pub layer: u8,

    /// Rendering layer bits.
    #[serde(default = "rendering_layers_default")]
    pub rendering_layers: u32,

    /// Render queue value of the object's own material.
    #[serde(default = "render_queue_default")]
    pub render_queue: u32,

    /// Key of the object's own material, used to batch state changes.
    #[serde(default)]
    pub material_key: u32,
}

fn identity() -> Mat4 {
    Mat4::IDENTITY
}

fn visible_default() -> bool {
    true
}

fn rendering_layers_default() -> u32 {
    1
}

fn render_queue_default() -> u32 {
    render_queue::GEOMETRY
}

impl RenderObject {
    /// Creates a visible opaque object on layer 0 and the default rendering layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            transform: Mat4::IDENTITY,
            visible: true,
            layer: 0,
            rendering_layers: rendering_layers_default(),
            render_queue: render_queue::GEOMETRY,
            material_key: 0,
        }
    }

    /// Sets the world position, keeping rotation and scale.
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.w_axis = position.extend(1.0);
        self
    }

    /// Sets the visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Sets the physical layer.
    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    /// Sets the rendering layer bits.
    pub fn with_rendering_layers(mut self, rendering_layers: u32) -> Self {
        self.rendering_layers = rendering_layers;
        self
    }

    /// Sets the render queue.
    pub fn with_render_queue(mut self, render_queue: u32) -> Self {
        self.render_queue = render_queue;
        self
    }

    /// Sets the material key.
    pub fn with_material_key(mut self, material_key: u32) -> Self {
        self.material_key = material_key;
        self
    }

    /// Returns the world-space position.
    pub fn position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}
