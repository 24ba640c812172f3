//! Preview scene files (RON).

use std::path::Path;

use anyhow::{Context, Result};
use lw_renderer::{CameraView, RenderObject, Scene};
use serde::{Deserialize, Serialize};

/// A camera and a flat list of objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub camera: CameraView,
    #[serde(default)]
    pub objects: Vec<RenderObject>,
}

impl SceneFile {
    /// Parse a scene from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        ron::from_str(content).context("failed to parse scene file")
    }

    /// Load a scene from a RON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene {}", path.display()))?;
        Self::from_ron_str(&content)
    }

    /// Build the queryable scene
    pub fn to_scene(&self) -> Scene {
        Scene::from_objects(self.objects.iter().cloned())
    }
}
