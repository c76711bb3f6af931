//! Scene settings: lights, material parameters and layout constants
//!
//! Everything the settings panel edits lives here, together with the fixed
//! cube arrangement. Settings serialize to RON so a tuned scene survives
//! restarts.

use std::path::Path;

use macroquad::prelude::*;
use serde::{Deserialize, Serialize};

/// Number of point lights in the scene (and in the shader)
pub const POINT_LIGHT_COUNT: usize = 4;

/// Default settings file next to the executable
pub const SETTINGS_FILE: &str = "shadebox.ron";

/// Fixed world positions for the lit cubes
pub const CUBE_POSITIONS: [Vec3; 10] = [
    Vec3::new(0.0, 0.0, 0.0),
    Vec3::new(2.0, 5.0, -15.0),
    Vec3::new(-1.5, -2.2, -2.5),
    Vec3::new(-3.8, -2.0, -12.3),
    Vec3::new(2.4, -0.4, -3.5),
    Vec3::new(-1.7, 3.0, -7.5),
    Vec3::new(1.3, -2.0, -2.5),
    Vec3::new(1.5, 2.0, -2.5),
    Vec3::new(1.5, 0.2, -1.5),
    Vec3::new(-1.3, 1.0, -1.5),
];

const POINT_LIGHT_POSITIONS: [[f32; 3]; POINT_LIGHT_COUNT] = [
    [0.7, 0.2, 2.0],
    [2.3, -3.3, -4.0],
    [-4.0, 2.0, -12.0],
    [0.0, 0.0, -3.0],
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSettings {
    pub shininess: f32,
    pub emissive_strength: f32,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            shininess: 32.0,
            emissive_strength: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub direction: [f32; 3],
    pub color: [f32; 3],
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: [1.0, -1.0, 1.0],
            color: [1.0, 1.0, 1.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            color: [1.0, 1.0, 1.0],
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
        }
    }
}

/// Camera-mounted flashlight. Position and direction are taken from the
/// camera every frame, so only the cone and falloff are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub color: [f32; 3],
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
    /// Inner cone angle, degrees
    pub cutoff_deg: f32,
    /// Outer cone angle, degrees
    pub outer_cutoff_deg: f32,
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            constant: 1.0,
            linear: 0.09,
            quadratic: 0.032,
            cutoff_deg: 12.5,
            outer_cutoff_deg: 17.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSettings {
    pub background: [f32; 4],
    pub material: MaterialSettings,
    pub directional: DirectionalLight,
    pub point_lights: [PointLight; POINT_LIGHT_COUNT],
    pub spot: SpotLight,
    pub wireframe: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        let mut point_lights: [PointLight; POINT_LIGHT_COUNT] = Default::default();
        for (light, pos) in point_lights.iter_mut().zip(POINT_LIGHT_POSITIONS) {
            light.position = pos;
        }
        Self {
            background: [0.1, 0.1, 0.1, 1.0],
            material: MaterialSettings::default(),
            directional: DirectionalLight::default(),
            point_lights,
            spot: SpotLight::default(),
            wireframe: false,
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Serialize(ron::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "IO error: {}", e),
            SettingsError::Parse(e) => write!(f, "Parse error: {}", e),
            SettingsError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<std::io::Error> for SettingsError {
    fn from(e: std::io::Error) -> Self {
        SettingsError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SettingsError {
    fn from(e: ron::error::SpannedError) -> Self {
        SettingsError::Parse(e)
    }
}

impl From<ron::Error> for SettingsError {
    fn from(e: ron::Error) -> Self {
        SettingsError::Serialize(e)
    }
}

impl SceneSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&contents)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::new().depth_limit(4);
        let text = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Load the settings file if it exists, defaults otherwise. A corrupt
    /// file is reported and replaced by defaults rather than aborting.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => {
                println!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_point_light_positions() {
        let scene = SceneSettings::default();
        assert_eq!(scene.point_lights[0].position, [0.7, 0.2, 2.0]);
        assert_eq!(scene.point_lights[3].position, [0.0, 0.0, -3.0]);
        for light in &scene.point_lights {
            assert_eq!(light.constant, 1.0);
            assert_eq!(light.linear, 0.09);
            assert_eq!(light.quadratic, 0.032);
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.ron");

        let mut scene = SceneSettings::default();
        scene.material.shininess = 8.0;
        scene.spot.outer_cutoff_deg = 30.0;
        scene.wireframe = true;
        scene.save(&path).unwrap();

        let loaded = SceneSettings::load(&path).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let scene = SceneSettings::load_or_default(dir.path().join("missing.ron"));
        assert_eq!(scene, SceneSettings::default());
    }

    #[test]
    fn test_load_or_default_on_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "not a scene").unwrap();
        let scene = SceneSettings::load_or_default(&path);
        assert_eq!(scene, SceneSettings::default());
    }
}
