//! Project configuration
//!
//! Settings are stored as RON. Fields missing from a file keep their defaults.

use std::path::Path;

use rocket_cad::ExportOptions;
use serde::{Deserialize, Serialize};

use crate::constants::EPSILON;
use crate::shape::NoseProfile;

/// Construction and export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RocketConfig {
    /// Walls leaving a void radius at or below this build solid parts
    pub tolerance: f64,
    /// Outline used by the nose cone builder
    pub nose_profile: NoseProfile,
    /// Options passed to the kernel on export
    pub export: ExportOptions,
}

impl Default for RocketConfig {
    fn default() -> Self {
        Self {
            tolerance: EPSILON,
            nose_profile: NoseProfile::default(),
            export: ExportOptions::default(),
        }
    }
}

impl RocketConfig {
    /// Parse a RON document
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: RocketConfig =
            ron::from_str(content).map_err(|e| ConfigError::Deserialize(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Save configuration to a RON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = self.to_ron_string()?;
        std::fs::write(path.as_ref(), content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "tolerance must be a positive finite value, got {}",
                self.tolerance
            )));
        }
        if let NoseProfile::PowerSeries { exponent, samples } = self.nose_profile
            && (!(exponent.is_finite() && exponent > 0.0) || samples == 0)
        {
            return Err(ConfigError::Invalid(format!(
                "power series needs a positive exponent and at least one sample, got {} and {}",
                exponent, samples
            )));
        }
        if self.export.mesh_resolution == 0 {
            return Err(ConfigError::Invalid(
                "mesh resolution must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
