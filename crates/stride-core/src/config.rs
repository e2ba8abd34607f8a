//! TOML-based application configuration.
//!
//! Stores the phase durations a freshly built timer starts from. This is
//! the only artifact Stride writes to disk; timer state itself is never
//! persisted.
//!
//! Configuration is stored at `~/.config/stride/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::timer::{PhaseKind, Routine, UI_MIN_PHASE_SECS};

/// Returns `~/.config/stride[-dev]/` based on STRIDE_ENV.
///
/// Set STRIDE_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STRIDE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("stride-dev")
    } else {
        base_dir.join("stride")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Default phase durations, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhasesConfig {
    #[serde(default = "default_slow_walk_secs")]
    pub slow_walk_secs: u64,
    #[serde(default = "default_fast_walk_secs")]
    pub fast_walk_secs: u64,
    #[serde(default = "default_run_secs")]
    pub run_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/stride/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub phases: PhasesConfig,
}

fn default_slow_walk_secs() -> u64 {
    180
}
fn default_fast_walk_secs() -> u64 {
    120
}
fn default_run_secs() -> u64 {
    120
}

impl Default for PhasesConfig {
    fn default() -> Self {
        Self {
            slow_walk_secs: default_slow_walk_secs(),
            fast_walk_secs: default_fast_walk_secs(),
            run_secs: default_run_secs(),
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn phase_secs(&self, kind: PhaseKind) -> u64 {
        match kind {
            PhaseKind::SlowWalk => self.phases.slow_walk_secs,
            PhaseKind::FastWalk => self.phases.fast_walk_secs,
            PhaseKind::Run => self.phases.run_secs,
        }
    }

    /// Set a phase duration, holding the UI-level floor of
    /// [`UI_MIN_PHASE_SECS`] seconds.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` below the floor.
    pub fn set_phase_secs(&mut self, kind: PhaseKind, secs: u64) -> Result<()> {
        if secs < UI_MIN_PHASE_SECS {
            return Err(ConfigError::InvalidValue {
                key: format!("phases.{}", kind.label().replace(' ', "_")),
                message: format!("must be at least {UI_MIN_PHASE_SECS} seconds"),
            }
            .into());
        }
        match kind {
            PhaseKind::SlowWalk => self.phases.slow_walk_secs = secs,
            PhaseKind::FastWalk => self.phases.fast_walk_secs = secs,
            PhaseKind::Run => self.phases.run_secs = secs,
        }
        Ok(())
    }

    /// The routine a new timer starts from.
    pub fn routine(&self) -> Routine {
        Routine::from_durations(
            self.phases.slow_walk_secs,
            self.phases.fast_walk_secs,
            self.phases.run_secs,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.phases.slow_walk_secs, 180);
        assert_eq!(parsed.phases.run_secs, 120);
    }

    #[test]
    fn empty_file_fills_in_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn partial_file_fills_in_missing_phases() {
        let cfg: Config = toml::from_str("[phases]\nrun_secs = 300\n").unwrap();
        assert_eq!(cfg.phases.run_secs, 300);
        assert_eq!(cfg.phases.slow_walk_secs, 180);
    }

    #[test]
    fn save_and_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set_phase_secs(PhaseKind::FastWalk, 90).unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.phases.fast_walk_secs, 90);
    }

    #[test]
    fn load_from_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn load_from_garbage_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "phases = 7").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn set_phase_secs_holds_ui_floor() {
        let mut cfg = Config::default();
        assert!(cfg.set_phase_secs(PhaseKind::Run, 9).is_err());
        assert!(cfg.set_phase_secs(PhaseKind::Run, 10).is_ok());
        assert_eq!(cfg.phases.run_secs, 10);
    }

    #[test]
    fn routine_uses_configured_durations() {
        let mut cfg = Config::default();
        cfg.set_phase_secs(PhaseKind::SlowWalk, 60).unwrap();
        let routine = cfg.routine();
        assert_eq!(routine.phases()[0].duration_secs, 60);
        assert_eq!(routine.phases()[1].duration_secs, 120);
    }
}
