//! Viewer configuration, read from YAML.
//!
//! [`ViewerConfig::default`] is the stock scene: three models under
//! `models/`, two warm directional lights, a dim ambient light and a
//! 1200-unit grid.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glam::Vec3;
use modelview_assets::LoadRequest;
use modelview_common::Color;
use modelview_scene::{CameraDefaults, ControlsSettings, GridHelper, Light};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Window and surface settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub antialias: bool,
    /// Let the renderer clear before each draw. When off, the viewer issues
    /// an explicit clear every frame instead.
    pub auto_clear: bool,
    pub clear_color: Color,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "modelview".into(),
            width: 1280,
            height: 720,
            antialias: true,
            auto_clear: true,
            clear_color: Color::from_hex(0x050505),
        }
    }
}

/// A light node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(flatten)]
    pub light: Light,
}

/// One model to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    pub geometry: PathBuf,
    /// Defaults to the geometry path with an `.mtl` extension.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub materials: Option<PathBuf>,
}

impl ModelConfig {
    pub fn new(name: impl Into<String>, geometry: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            geometry: geometry.into(),
            materials: None,
        }
    }

    fn to_request(&self) -> LoadRequest {
        let request = LoadRequest::new(self.name.clone(), self.geometry.clone());
        match &self.materials {
            Some(materials) => request.with_materials(materials.clone()),
            None => request,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraDefaults,
    pub controls: ControlsSettings,
    pub lights: Vec<LightConfig>,
    /// `null` disables the grid.
    pub grid: Option<GridHelper>,
    pub models: Vec<ModelConfig>,
    /// Directory relative model paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let warm = Color::from_hex(0xC0C090);
        Self {
            window: WindowConfig::default(),
            camera: CameraDefaults::default(),
            controls: ControlsSettings::default(),
            lights: vec![
                LightConfig {
                    name: "directional_light_1".into(),
                    position: Vec3::new(-100.0, -50.0, 100.0),
                    light: Light::directional(warm),
                },
                LightConfig {
                    name: "directional_light_2".into(),
                    position: Vec3::new(100.0, 50.0, -100.0),
                    light: Light::directional(warm),
                },
                LightConfig {
                    name: "ambient_light".into(),
                    position: Vec3::ZERO,
                    light: Light::ambient(Color::from_hex(0x404040)),
                },
            ],
            grid: Some(GridHelper::default()),
            models: vec![
                ModelConfig::new("02", "models/02.obj"),
                ModelConfig::new("base", "models/base.obj"),
                ModelConfig::new("03", "models/03.obj"),
            ],
            base_dir: PathBuf::new(),
        }
    }
}

impl ViewerConfig {
    /// Read, validate and anchor a config file. Relative model paths resolve
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&text)?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::info!(path = %path.display(), models = config.models.len(), "config loaded");
        Ok(config)
    }

    /// Parse and validate YAML. Relative paths stay relative to the working
    /// directory.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_yaml()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check the config for values the viewer cannot work with.
    ///
    /// Two models reading the same geometry file is allowed but logged.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if camera.near.is_nan() || camera.near <= 0.0 {
            return Err(invalid(format!("camera.near must be positive, got {}", camera.near)));
        }
        if camera.near >= camera.far {
            return Err(invalid(format!(
                "camera.near ({}) must be less than camera.far ({})",
                camera.near, camera.far
            )));
        }
        if camera.fov.is_nan() || camera.fov <= 0.0 || camera.fov >= 180.0 {
            return Err(invalid(format!(
                "camera.fov must be in (0, 180) degrees, got {}",
                camera.fov
            )));
        }
        let controls = &self.controls;
        if !(0.0..=1.0).contains(&controls.dynamic_damping_factor) {
            return Err(invalid(format!(
                "controls.dynamic_damping_factor must be in [0, 1], got {}",
                controls.dynamic_damping_factor
            )));
        }
        if !controls.rotate_speed.is_finite() || controls.rotate_speed < 0.0 {
            return Err(invalid(format!(
                "controls.rotate_speed must be finite and non-negative, got {}",
                controls.rotate_speed
            )));
        }
        if self.grid.as_ref().is_some_and(|grid| grid.divisions == 0) {
            return Err(invalid("grid.divisions must be at least 1".into()));
        }

        let mut names = HashSet::new();
        let mut geometries = HashSet::new();
        for model in &self.models {
            if model.name.trim().is_empty() {
                return Err(invalid(format!(
                    "model with geometry {} has an empty name",
                    model.geometry.display()
                )));
            }
            if !names.insert(model.name.as_str()) {
                return Err(invalid(format!("duplicate model name '{}'", model.name)));
            }
            if !geometries.insert(model.geometry.as_path()) {
                tracing::warn!(
                    model = %model.name,
                    geometry = %model.geometry.display(),
                    "geometry file is loaded more than once"
                );
            }
        }
        Ok(())
    }

    /// Load requests in configured order, paths resolved against
    /// [`ViewerConfig::base_dir`].
    pub fn requests(&self) -> Vec<LoadRequest> {
        self.models
            .iter()
            .map(|m| m.to_request().resolved_against(&self.base_dir))
            .collect()
    }
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid(message)
}
