//! Draw filtering and sorting.

use lw_core::{LayerMask, OutlineRenderQueue, OutlineTarget, RenderingLayerMask};
use uuid::Uuid;

use super::RenderObject;
use crate::constants::render_queue;

/// Inclusive range of render queue values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderQueueRange {
    pub lower: u32,
    pub upper: u32,
}

impl RenderQueueRange {
    /// Opaque and alpha-tested geometry.
    pub const OPAQUE: Self = Self {
        lower: render_queue::MIN,
        upper: render_queue::OPAQUE_MAX,
    };
    /// Transparent geometry.
    pub const TRANSPARENT: Self = Self {
        lower: render_queue::TRANSPARENT_MIN,
        upper: render_queue::MAX,
    };
    /// Every queue.
    pub const ALL: Self = Self {
        lower: render_queue::MIN,
        upper: render_queue::MAX,
    };

    /// Returns true if the queue value lies in the range.
    pub fn contains(&self, queue: u32) -> bool {
        (self.lower..=self.upper).contains(&queue)
    }
}

impl From<OutlineRenderQueue> for RenderQueueRange {
    fn from(queue: OutlineRenderQueue) -> Self {
        match queue {
            OutlineRenderQueue::Opaque => Self::OPAQUE,
            OutlineRenderQueue::Transparent => Self::TRANSPARENT,
            OutlineRenderQueue::OpaqueAndTransparent => Self::ALL,
        }
    }
}

/// Selects the scene objects one outline target draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawFilter {
    pub render_queue: RenderQueueRange,
    pub layer_mask: LayerMask,
    pub rendering_layer: RenderingLayerMask,
}

impl DrawFilter {
    /// Builds the filter of an outline target.
    pub fn from_target(target: &OutlineTarget) -> Self {
        Self {
            render_queue: target.render_queue.into(),
            layer_mask: target.layer_mask,
            rendering_layer: target.rendering_layer,
        }
    }

    /// Returns true if the object passes the filter. Visibility is not checked.
    pub fn matches(&self, object: &RenderObject) -> bool {
        self.render_queue.contains(object.render_queue)
            && self.layer_mask.contains_layer(object.layer)
            && self.rendering_layer.intersects(object.rendering_layers)
    }
}

/// Draw order of a query result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortCriteria {
    /// Scene order.
    None,
    /// Queue, then material, then front to back.
    #[default]
    CommonOpaque,
    /// Queue, then back to front.
    CommonTransparent,
}

/// One object selected by a query, ready to be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    pub object: Uuid,
    pub render_queue: u32,
    pub material_key: u32,
    /// Distance from the camera.
    pub distance: f32,
}

impl SortCriteria {
    /// Sorts items in place. The sort is stable, so ties keep scene order.
    pub fn sort(&self, items: &mut [DrawItem]) {
        match self {
            SortCriteria::None => {}
            SortCriteria::CommonOpaque => items.sort_by(|a, b| {
                a.render_queue
                    .cmp(&b.render_queue)
                    .then(a.material_key.cmp(&b.material_key))
                    .then(a.distance.total_cmp(&b.distance))
            }),
            SortCriteria::CommonTransparent => items.sort_by(|a, b| {
                a.render_queue
                    .cmp(&b.render_queue)
                    .then(b.distance.total_cmp(&a.distance))
            }),
        }
    }
}
