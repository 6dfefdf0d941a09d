//! # Simulation configuration
//!
//! Game rules, narrative verbosity and the league-average fallbacks in one
//! serde value.
//!
//! ```rust
//! use bb_core::engine::config::SimulationConfig;
//!
//! let config = SimulationConfig::standard();
//! let capped = SimulationConfig::capped(15);
//! assert!(config.validate().is_ok() && capped.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::{env, fs};

use crate::error::ConfigurationError;
use crate::models::LeagueAverages;

/// Environment variable naming a config file to load instead of defaults.
pub const CONFIG_PATH_ENV: &str = "BB_SIM_CONFIG_PATH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Innings before a game may end.
    pub regulation_innings: u32,
    pub outs_per_half: u32,
    /// Innings after which a still-tied game is called a tie. `None` plays
    /// until someone wins.
    pub max_innings: Option<u32>,
    /// Start every extra half-inning with a runner on second.
    pub extra_innings_runner: bool,
    /// Narrative level for single-game runs (0 = silent).
    pub verbosity: u8,
    pub league: LeagueAverages,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            regulation_innings: 9,
            outs_per_half: 3,
            max_innings: None,
            extra_innings_runner: false,
            verbosity: 0,
            league: LeagueAverages::default(),
        }
    }
}

impl SimulationConfig {
    /// Standard nine-inning rules, no cap.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Standard rules with ties declared after `max_innings`.
    pub fn capped(max_innings: u32) -> Self {
        Self { max_innings: Some(max_innings), ..Self::default() }
    }

    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.regulation_innings == 0 {
            return Err("regulation_innings must be at least 1".into());
        }
        if self.outs_per_half == 0 {
            return Err("outs_per_half must be at least 1".into());
        }
        if let Some(max) = self.max_innings {
            if max < self.regulation_innings {
                return Err(format!(
                    "max_innings ({max}) must not be below regulation_innings ({})",
                    self.regulation_innings
                ));
            }
        }
        self.league.validate()
    }

    pub fn from_json(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    pub fn from_yaml(content: &str) -> Result<Self, String> {
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load and validate a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigurationError> {
        let display = path.display();
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigurationError::InvalidConfig(format!("failed to read '{display}': {e}")))?;

        let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
        let config = match ext.as_deref() {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err("expected a .json, .yaml or .yml extension".to_string()),
        }
        .map_err(|e| ConfigurationError::InvalidConfig(format!("failed to parse '{display}': {e}")))?;

        config
            .validate()
            .map_err(|e| ConfigurationError::InvalidConfig(format!("'{display}': {e}")))?;
        Ok(config)
    }

    /// Config named by `BB_SIM_CONFIG_PATH`, if the variable is set and
    /// non-empty.
    pub fn from_env() -> Result<Option<Self>, ConfigurationError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(None);
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(None);
        }
        log::info!("loading simulation config from {CONFIG_PATH_ENV}='{path}'");
        Self::from_path(Path::new(path)).map(Some)
    }

    /// Explicit path first, then the environment, then defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        if let Some(path) = path {
            return Self::from_path(path);
        }
        Ok(Self::from_env()?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_presets_validate() {
        assert!(SimulationConfig::standard().validate().is_ok());
        assert_eq!(SimulationConfig::capped(12).max_innings, Some(12));
        assert!(SimulationConfig::capped(12).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_rules() {
        let mut config = SimulationConfig::standard();
        config.regulation_innings = 0;
        assert!(config.validate().is_err());

        let config = SimulationConfig::capped(5);
        assert!(config.validate().unwrap_err().contains("max_innings"));

        let mut config = SimulationConfig::standard();
        config.outs_per_half = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimulationConfig::from_json(r#"{"regulation_innings": 7, "verbosity": 2}"#).unwrap();
        assert_eq!(config.regulation_innings, 7);
        assert_eq!(config.verbosity, 2);
        assert_eq!(config.outs_per_half, 3);
        assert_eq!(config.league, LeagueAverages::default());
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = SimulationConfig { extra_innings_runner: true, ..SimulationConfig::capped(13) };
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(SimulationConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_league_weights_outside_unit_range_rejected() {
        let mut value = serde_json::to_value(SimulationConfig::standard()).unwrap();
        value["league"]["pitch_outcomes"] = serde_json::json!({
            "entries": [["ball", 1.5], ["hit_into_play", -0.5]]
        });
        let err = SimulationConfig::from_json(&value.to_string()).unwrap_err();
        assert!(err.contains("outside [0, 1]"));
    }

    #[test]
    fn test_from_path_by_extension() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;

        let json = dir.path().join("sim.json");
        fs::write(&json, r#"{"max_innings": 11}"#)?;
        assert_eq!(SimulationConfig::from_path(&json)?.max_innings, Some(11));

        let yml = dir.path().join("sim.yml");
        fs::write(&yml, "extra_innings_runner: true\n")?;
        assert!(SimulationConfig::from_path(&yml)?.extra_innings_runner);

        let bad = dir.path().join("capped.json");
        fs::write(&bad, r#"{"max_innings": 3}"#)?;
        assert!(matches!(SimulationConfig::from_path(&bad), Err(ConfigurationError::InvalidConfig(_))));

        let txt = dir.path().join("sim.txt");
        fs::write(&txt, "{}")?;
        assert!(SimulationConfig::from_path(&txt).is_err());
        Ok(())
    }

    #[test]
    fn test_resolve_without_path_or_env_is_default() {
        if env::var(CONFIG_PATH_ENV).is_err() {
            assert_eq!(SimulationConfig::resolve(None).unwrap(), SimulationConfig::default());
        }
    }
}
