use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::GridResult;
use crate::transform::GridTransform;

/// Serialisable description of a grid, e.g. loaded from a level file.
///
/// Missing fields fall back to [GridSettings::default]: a 20x20 grid of unit tiles at the
/// origin with no rotation and debug labels off.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub width: i32,
    pub height: i32,
    pub tile_size_x: f32,
    pub tile_size_y: f32,
    pub position: Vec3,
    pub rotation: Vec3,
    pub debug: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings {
            width: 20,
            height: 20,
            tile_size_x: 1.0,
            tile_size_y: 1.0,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            debug: false,
        }
    }
}

impl GridSettings {
    pub fn from_json(json: &str) -> GridResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn transform(&self) -> GridTransform {
        GridTransform::new(
            self.position,
            self.rotation,
            self.tile_size_x,
            self.tile_size_y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    #[test]
    fn partial_json_uses_defaults() {
        let settings =
            GridSettings::from_json(r#"{"width": 8, "rotation": [90.0, 0.0, 0.0]}"#).unwrap();
        assert_eq!(settings.width, 8);
        assert_eq!(settings.height, 20);
        assert_eq!(settings.rotation, Vec3::new(90.0, 0.0, 0.0));
        assert_eq!(settings.transform().tile_size_x, 1.0);
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = GridSettings::from_json(r#"{"width": "wide"}"#).unwrap_err();
        assert!(matches!(err, GridError::Settings(_)));
    }

    #[test]
    fn settings_survive_serialisation() {
        let settings = GridSettings {
            width: 3,
            tile_size_y: 0.5,
            position: Vec3::new(1.0, 2.0, 3.0),
            debug: true,
            ..GridSettings::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(GridSettings::from_json(&json).unwrap(), settings);
    }
}
