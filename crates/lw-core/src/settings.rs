//! Outline feature settings and their RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::target::OutlineTarget;

/// Point in the host frame at which the outline pass is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InjectionPoint {
    AfterRenderingOpaques,
    AfterRenderingSkybox,
    #[default]
    AfterRenderingTransparents,
    BeforeRenderingPostProcessing,
    AfterRenderingPostProcessing,
}

impl InjectionPoint {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            InjectionPoint::AfterRenderingOpaques => "After Rendering Opaques",
            InjectionPoint::AfterRenderingSkybox => "After Rendering Skybox",
            InjectionPoint::AfterRenderingTransparents => "After Rendering Transparents",
            InjectionPoint::BeforeRenderingPostProcessing => "Before Rendering Post Processing",
            InjectionPoint::AfterRenderingPostProcessing => "After Rendering Post Processing",
        }
    }
}

/// Complete outline feature configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineSettings {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    /// Outline targets, drawn in list order
    #[serde(default)]
    pub outlines: Vec<OutlineTarget>,
    /// Whether outlines are drawn for scene view cameras
    #[serde(default = "default_show_in_scene_view")]
    pub show_in_scene_view: bool,
    /// Where the host schedules the pass
    #[serde(default)]
    pub injection_point: InjectionPoint,
}

fn default_show_in_scene_view() -> bool {
    true
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            outlines: Vec::new(),
            show_in_scene_view: true,
            injection_point: InjectionPoint::default(),
        }
    }
}

impl OutlineSettings {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    /// Create settings with the given outlines
    pub fn new(outlines: Vec<OutlineTarget>) -> Self {
        Self {
            outlines,
            ..Default::default()
        }
    }

    /// Parse settings from a RON string
    pub fn from_ron_str(content: &str) -> ConfigResult<Self> {
        ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize settings to a pretty RON string
    pub fn to_ron_string(&self) -> ConfigResult<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load settings from a RON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let settings = Self::from_ron_str(&content)?;
        tracing::info!(
            "Loaded {} outline(s) from {:?}",
            settings.outlines.len(),
            path
        );
        Ok(settings)
    }

    /// Save settings to a RON file, creating parent directories
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let content = self.to_ron_string()?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))?;

        tracing::info!("Saved outline settings to {:?}", path);
        Ok(())
    }
}
