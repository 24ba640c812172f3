//! SceneQuery trait definition.

use crate::context::CameraView;
use crate::scene::{DrawFilter, DrawItem, SortCriteria};

/// Culls and filters the host's draw calls.
pub trait SceneQuery {
    /// Returns the visible objects passing `filter`, ordered by `sort`.
    fn query(&self, filter: &DrawFilter, camera: &CameraView, sort: SortCriteria) -> Vec<DrawItem>;
}
