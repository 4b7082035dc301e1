use crate::camera::CameraTuning;
use crate::detector::BOUNDARY_CHECK_INTERVAL_SECS;

pub const DEFAULT_MAP_ID: &str = "default";

/// Tunables for one race session.
#[derive(Debug, Clone, PartialEq)]
pub struct RaceSettings {
    pub map_id: String,
    /// Boundary watcher polling period (seconds)
    pub boundary_check_interval_secs: f64,
    pub camera: CameraTuning,
    /// Seed for spawn jitter and masses. `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
}

impl Default for RaceSettings {
    fn default() -> Self {
        Self {
            map_id: DEFAULT_MAP_ID.to_string(),
            boundary_check_interval_secs: BOUNDARY_CHECK_INTERVAL_SECS,
            camera: CameraTuning::default(),
            rng_seed: None,
        }
    }
}

impl RaceSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.map_id.trim().is_empty() {
            return Err("map_id must not be empty".to_string());
        }
        let interval = self.boundary_check_interval_secs;
        if !interval.is_finite() || interval <= 0.0 {
            return Err("boundary_check_interval_secs must be finite and > 0".to_string());
        }
        let lerp = self.camera.lerp_factor;
        if !lerp.is_finite() || lerp <= 0.0 || lerp > 1.0 {
            return Err("camera.lerp_factor must be in (0, 1]".to_string());
        }
        if !self.camera.height_offset.is_finite() || !self.camera.distance_offset.is_finite() {
            return Err("camera offsets must be finite".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_are_valid() {
        assert!(RaceSettings::default().validate().is_ok());
    }

    #[test]
    fn zero_interval_invalid() {
        let settings = RaceSettings {
            boundary_check_interval_secs: 0.0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn lerp_factor_bounds() {
        let mut settings = RaceSettings::default();
        settings.camera.lerp_factor = 1.0;
        assert!(settings.validate().is_ok());
        settings.camera.lerp_factor = 0.0;
        assert!(settings.validate().is_err());
        settings.camera.lerp_factor = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn blank_map_id_invalid() {
        let settings = RaceSettings {
            map_id: "  ".to_string(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}
