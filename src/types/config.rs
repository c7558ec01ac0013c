use crate::error::{LxePetError, Result};
use bon::Builder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default coincidence timing window in ns
pub const DEFAULT_TIME_WINDOW_NS: f64 = 4.5;
/// Default minimum separation between the two hits of a coincidence in mm
pub const DEFAULT_MIN_SEPARATION_MM: f64 = 20.0;

/// Parameters of the coincidence sorter.
///
/// Can be loaded from a JSON run configuration, e.g.
/// `{"time_window_ns": 4.5, "min_separation_mm": 20.0}`. Missing keys take
/// their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
#[serde(default)]
pub struct CoincidenceConfig {
    #[builder(default = DEFAULT_TIME_WINDOW_NS)]
    pub time_window_ns: f64,
    #[builder(default = DEFAULT_MIN_SEPARATION_MM)]
    pub min_separation_mm: f64,
}

impl Default for CoincidenceConfig {
    fn default() -> Self {
        Self {
            time_window_ns: DEFAULT_TIME_WINDOW_NS,
            min_separation_mm: DEFAULT_MIN_SEPARATION_MM,
        }
    }
}

impl CoincidenceConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LxePetError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject windows and separations that make the sorter meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.time_window_ns.is_finite() || self.time_window_ns < 0.0 {
            return Err(LxePetError::InvalidParameter(format!(
                "time window must be a finite non-negative number of ns, got {}",
                self.time_window_ns
            )));
        }
        if !self.min_separation_mm.is_finite() || self.min_separation_mm < 0.0 {
            return Err(LxePetError::InvalidParameter(format!(
                "minimum separation must be a finite non-negative number of mm, got {}",
                self.min_separation_mm
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builder() {
        assert_eq!(CoincidenceConfig::builder().build(), CoincidenceConfig::default());
        assert_eq!(CoincidenceConfig::default().time_window_ns, 4.5);
        assert_eq!(CoincidenceConfig::default().min_separation_mm, 20.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CoincidenceConfig = serde_json::from_str(r#"{"time_window_ns": 3.0}"#).unwrap();
        assert_eq!(config.time_window_ns, 3.0);
        assert_eq!(config.min_separation_mm, DEFAULT_MIN_SEPARATION_MM);
    }

    #[test]
    fn test_validate_rejects_negative_window() {
        let config = CoincidenceConfig::builder().time_window_ns(-1.0).build();
        assert!(matches!(
            config.validate(),
            Err(LxePetError::InvalidParameter(_))
        ));
        let config = CoincidenceConfig::builder().min_separation_mm(f64::NAN).build();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_file() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"time_window_ns": 2.0, "min_separation_mm": 15.0}"#).unwrap();
        let config = CoincidenceConfig::from_json_file(&path)?;
        assert_eq!(config.time_window_ns, 2.0);
        assert_eq!(config.min_separation_mm, 15.0);
        Ok(())
    }
}
