//! Measurement tool configuration

use crate::error::{MeasureError, Result};
use crate::geodesy::{Sphere, DEFAULT_EARTH_RADIUS_M};
use crate::units::UnitSelection;
use serde::{Deserialize, Serialize};

/// Prompt shown before the first point is placed
pub const DEFAULT_START_PROMPT: &str = "Click to start measuring";

/// Prompt shown while the shape has fewer points than its mode requires
pub const DEFAULT_CONTINUE_PROMPT: &str =
    "Click to continue, double-click to finish, Escape to cancel";

/// Configuration for the measurement tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    /// Sphere radius used for geodesic calculations, in meters
    pub earth_radius_m: f64,

    /// Units selected when no stored preference exists
    pub default_units: UnitSelection,

    /// Tooltip text before any point is captured
    pub start_prompt: String,

    /// Tooltip text while below the minimum point count
    pub continue_prompt: String,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            earth_radius_m: DEFAULT_EARTH_RADIUS_M,
            default_units: UnitSelection::default(),
            start_prompt: DEFAULT_START_PROMPT.to_string(),
            continue_prompt: DEFAULT_CONTINUE_PROMPT.to_string(),
        }
    }
}

impl MeasureConfig {
    /// Parse a JSON configuration; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MeasureError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !self.earth_radius_m.is_finite() || self.earth_radius_m <= 0.0 {
            return Err(MeasureError::InvalidConfig(format!(
                "earth_radius_m must be a positive number, got {}",
                self.earth_radius_m
            )));
        }
        Ok(())
    }

    /// Sphere model built from the configured radius
    pub fn sphere(&self) -> Sphere {
        Sphere::new(self.earth_radius_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{AreaUnit, DistanceUnit};

    #[test]
    fn test_defaults() {
        let config = MeasureConfig::default();
        assert_eq!(config.earth_radius_m, DEFAULT_EARTH_RADIUS_M);
        assert_eq!(config.default_units, UnitSelection::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            MeasureConfig::from_json_str(r#"{"default_units":{"distance":"km","area":"ha"}}"#)
                .unwrap();
        assert_eq!(config.default_units.distance, DistanceUnit::Kilometers);
        assert_eq!(config.default_units.area, AreaUnit::Hectares);
        assert_eq!(config.earth_radius_m, DEFAULT_EARTH_RADIUS_M);
        assert_eq!(config.start_prompt, DEFAULT_START_PROMPT);
    }

    #[test]
    fn test_rejects_bad_radius() {
        let err = MeasureConfig::from_json_str(r#"{"earth_radius_m":-1.0}"#).unwrap_err();
        assert!(matches!(err, MeasureError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(MeasureConfig::from_json_str("{not json").is_err());
    }
}
