use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the photokit tools.
///
/// Fixes the policy choices the operations need (rename collision
/// handling, missing-metadata handling, audit threshold) and output
/// behavior (dry run, backups).
///
/// # Loading
///
/// ```rust,no_run
/// use photokit::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.rename.recursive = true;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Photo renamer policies.
    pub rename: RenameConfig,
    /// Date manager behavior.
    pub dates: DateConfig,
    /// Storage audit defaults.
    pub audit: AuditConfig,
    /// Output behavior (dry run).
    pub output: OutputConfig,
}

/// What to do when a derived filename is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Append " 2", " 3", … to the stem until a free name is found.
    Suffix,
    /// Leave the file alone and report it as skipped.
    Skip,
}

/// What to do when a photo has no capture-date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDatePolicy {
    /// Warn and move on to the next file.
    Skip,
    /// Record the file as failed (the batch still continues).
    Fail,
}

/// Photo renamer policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameConfig {
    /// Collision handling for derived names.
    pub on_collision: CollisionPolicy,
    /// Handling for photos without a capture date.
    pub on_missing_date: MissingDatePolicy,
    /// If `true`, descend into subdirectories.
    pub recursive: bool,
}

/// Date manager behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateConfig {
    /// If `true`, create a `.bak` copy before the first write to a photo.
    pub backup_originals: bool,
    /// If `true`, `set-date` also updates the file-modified EXIF field
    /// (ModifyDate) alongside DateTimeOriginal and CreateDate.
    pub set_modify_date: bool,
}

/// Storage audit defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Entries below this many bytes are aggregated but not listed.
    pub threshold_bytes: u64,
}

/// Output behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// If `true`, preview actions without touching any file.
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rename: RenameConfig {
                on_collision: CollisionPolicy::Suffix,
                on_missing_date: MissingDatePolicy::Skip,
                recursive: false,
            },
            dates: DateConfig {
                backup_originals: true,
                set_modify_date: true,
            },
            audit: AuditConfig { threshold_bytes: 0 },
            output: OutputConfig { dry_run: false },
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_are_safe() {
        let config = Config::default();
        assert_eq!(config.rename.on_collision, CollisionPolicy::Suffix);
        assert_eq!(config.rename.on_missing_date, MissingDatePolicy::Skip);
        assert!(!config.rename.recursive);
        assert!(config.dates.backup_originals);
        assert!(!config.output.dry_run);
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.rename.recursive = true;
        config.rename.on_collision = CollisionPolicy::Skip;
        config.audit.threshold_bytes = 1_000_000;
        config.save(Some(path.as_path())).unwrap();

        let loaded = Config::load(Some(path.as_path())).unwrap();
        assert!(loaded.rename.recursive);
        assert_eq!(loaded.rename.on_collision, CollisionPolicy::Skip);
        assert_eq!(loaded.audit.threshold_bytes, 1_000_000);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(Some(dir.path().join("absent.json").as_path())).unwrap();
        assert_eq!(config.audit.threshold_bytes, 0);
    }
}
