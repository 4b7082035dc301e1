//! Map configuration and the built-in map registry.
//!
//! Maps are JSON documents with camelCase keys. The race core only reads
//! geometry: obstacle heights, the finish line and the area boundaries.
//! Colors and rotation speeds are carried for the client.

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::vec3::Vec3;

/// Built-in maps as `(file stem, JSON)`.
const BUILTIN_MAPS: &[(&str, &str)] = &[
    ("defaultMap", include_str!("maps/defaultMap.json")),
    ("cascadeMap", include_str!("maps/cascadeMap.json")),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Box,
    Sphere,
    Cylinder,
    Ramp,
    Funnel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleConfig {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
    pub position: Vec3,
    pub size: Vec3,
    #[serde(default)]
    pub rotation: Option<Vec3>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub mass: Option<f64>,
    /// Radians per second around each axis.
    #[serde(default)]
    pub rotation_speed: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallConfig {
    pub id: String,
    pub position: Vec3,
    pub size: Vec3,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub rotation: Option<Vec3>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishLineConfig {
    pub position: Vec3,
    pub size: Vec3,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boundaries {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    pub wall_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorConfig {
    pub position: Vec3,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameArea {
    pub boundaries: Boundaries,
    pub floor: FloorConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsConfig {
    pub gravity: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraHome {
    pub position: Vec3,
    #[serde(default)]
    pub target: Option<Vec3>,
}

impl CameraHome {
    /// Look-at point, defaulting to the origin.
    pub fn look_at(&self) -> Vec3 {
        self.target.unwrap_or(Vec3::ZERO)
    }
}

/// One race map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub game_area: GameArea,
    #[serde(default)]
    pub walls: Vec<WallConfig>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
    pub finish_line: FinishLineConfig,
    pub physics: PhysicsConfig,
    pub camera: CameraHome,
}

impl MapConfig {
    pub fn from_json(id: &str, json: &str) -> Result<Self, MapError> {
        let config: MapConfig = serde_json::from_str(json)?;
        config.validate().map_err(|reason| MapError::Invalid {
            id: id.to_string(),
            reason,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let b = &self.game_area.boundaries;
        for (field, value) in [
            ("width", b.width),
            ("height", b.height),
            ("depth", b.depth),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("boundaries.{field} must be finite and > 0"));
            }
        }
        if !self.finish_line.position.y.is_finite() {
            return Err("finishLine.position.y must be finite".to_string());
        }
        for obstacle in &self.obstacles {
            if !obstacle.position.y.is_finite() || !obstacle.size.y.is_finite() {
                return Err(format!("obstacle {} has non-finite geometry", obstacle.id));
            }
        }
        let g = self.physics.gravity;
        if !(g.x.is_finite() && g.y.is_finite() && g.z.is_finite()) {
            return Err("physics.gravity must be finite".to_string());
        }
        Ok(())
    }
}

/// Registry entry.
#[derive(Debug, Clone)]
pub struct MapInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub config: MapConfig,
}

/// Known maps in registration order.
#[derive(Debug, Clone)]
pub struct MapRegistry {
    maps: Vec<MapInfo>,
}

impl MapRegistry {
    /// Load the maps compiled into the crate.
    pub fn builtin() -> Result<Self, MapError> {
        let mut maps = Vec::with_capacity(BUILTIN_MAPS.len());
        for (file_stem, json) in BUILTIN_MAPS {
            maps.push(map_info(file_stem, json)?);
        }
        Ok(Self { maps })
    }

    pub fn list(&self) -> &[MapInfo] {
        &self.maps
    }

    pub fn get(&self, id: &str) -> Option<&MapInfo> {
        self.maps.iter().find(|m| m.id == id)
    }

    /// Id of the map after `id`, wrapping around.
    pub fn next_id(&self, id: &str) -> Option<&str> {
        let idx = self.maps.iter().position(|m| m.id == id)?;
        Some(&self.maps[(idx + 1) % self.maps.len()].id)
    }
}

/// `defaultMap` -> `default`.
pub fn map_id_from_file_stem(stem: &str) -> String {
    stem.replace("Map", "").to_lowercase()
}

fn map_info(file_stem: &str, json: &str) -> Result<MapInfo, MapError> {
    let id = map_id_from_file_stem(file_stem);
    let config = MapConfig::from_json(&id, json)?;
    Ok(MapInfo {
        name: if config.name.is_empty() {
            id.clone()
        } else {
            config.name.clone()
        },
        description: config
            .description
            .clone()
            .unwrap_or_else(|| format!("{id} map")),
        id,
        config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_maps_load() {
        let registry = MapRegistry::builtin().unwrap();
        assert!(registry.get("default").is_some());
        assert!(registry.get("cascade").is_some());
        for info in registry.list() {
            assert!(info.config.validate().is_ok(), "map {} invalid", info.id);
        }
    }

    #[test]
    fn next_id_wraps() {
        let registry = MapRegistry::builtin().unwrap();
        let first = registry.list()[0].id.clone();
        let mut id = first.clone();
        for _ in 0..registry.list().len() {
            id = registry.next_id(&id).unwrap().to_string();
        }
        assert_eq!(id, first);
        assert!(registry.next_id("nope").is_none());
    }

    #[test]
    fn file_stem_to_id() {
        assert_eq!(map_id_from_file_stem("defaultMap"), "default");
        assert_eq!(map_id_from_file_stem("cascadeMap"), "cascade");
    }

    #[test]
    fn parses_minimal_document() {
        let json = r#"{
            "name": "tiny",
            "gameArea": {
                "boundaries": { "width": 10, "height": 20, "depth": 10, "wallHeight": 5 },
                "floor": { "position": { "x": 0, "y": -1, "z": 0 } }
            },
            "obstacles": [
                { "id": "r1", "type": "ramp", "position": { "x": 0, "y": 3, "z": 0 },
                  "size": { "x": 4, "y": 0.5, "z": 2 },
                  "rotationSpeed": { "x": 0, "y": 1.5, "z": 0 } }
            ],
            "finishLine": { "position": { "x": 0, "y": 0, "z": 0 }, "size": { "x": 10, "y": 0.5, "z": 10 } },
            "physics": { "gravity": { "x": 0, "y": -9.82, "z": 0 } },
            "camera": { "position": { "x": 0, "y": 15, "z": 20 } }
        }"#;
        let config = MapConfig::from_json("tiny", json).unwrap();
        assert_eq!(config.obstacles[0].kind, ObstacleKind::Ramp);
        assert_eq!(
            config.obstacles[0].rotation_speed,
            Some(Vec3::new(0.0, 1.5, 0.0))
        );
        assert!(config.walls.is_empty());
        assert_eq!(config.camera.look_at(), Vec3::ZERO);
    }

    #[test]
    fn rejects_non_positive_boundaries() {
        let mut config = MapRegistry::builtin().unwrap().list()[0].config.clone();
        config.game_area.boundaries.width = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            MapConfig::from_json("x", "{ not json"),
            Err(MapError::Json(_))
        ));
    }
}
