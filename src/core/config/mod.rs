//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. The first config file found
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. `$GEOCATALOG_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/geocatalog/config.toml`
//! 3. `~/.geocatalog/config.toml` (canonical write location)
//! 4. `~/.geocatalog.toml` (compatibility, warns)
//!
//! # Example
//!
//! ```no_run
//! use geocatalog::core::config::CatalogConfig;
//!
//! let result = CatalogConfig::load().unwrap();
//! for warning in &result.warnings {
//!     eprintln!("{}: {}", warning.path.display(), warning.message);
//! }
//! let config = result.config;
//! println!("isolated workspaces: {}", config.isolated_workspaces());
//! println!("point style: {}", config.style_names().point);
//! ```

pub mod schema;

pub use schema::{CatalogConfigFile, LockConfig, StyleNames};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "GEOCATALOG_CONFIG";

/// Default lock upgrade timeout (10 seconds).
pub const DEFAULT_UPGRADE_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Warnings generated during config loading.
#[derive(Debug, Clone)]
pub struct ConfigWarning {
    /// The warning message.
    pub message: String,
    /// The path that triggered the warning.
    pub path: PathBuf,
}

/// Result of loading configuration.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: CatalogConfig,
    /// Any warnings generated during loading.
    pub warnings: Vec<ConfigWarning>,
}

/// Effective catalog configuration.
///
/// Accessors apply defaults for anything the file leaves unset.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Parsed file contents (defaults if no file was found)
    pub file: CatalogConfigFile,
    /// Path to the loaded config file (if any)
    path: Option<PathBuf>,
    /// Resolved style names
    styles: StyleNames,
}

impl CatalogConfig {
    /// Build a configuration from already parsed contents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn from_file(file: CatalogConfigFile) -> Result<Self, ConfigError> {
        file.validate()?;
        let styles = file.styles.clone().unwrap_or_default();
        Ok(Self {
            file,
            path: None,
            styles,
        })
    }

    /// Load configuration from the standard locations.
    ///
    /// Missing config files are not an error (defaults are used).
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// holds invalid values.
    pub fn load() -> Result<ConfigLoadResult, ConfigError> {
        let candidates = Self::search_locations(
            std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            dirs::home_dir(),
        );
        Self::load_first(&candidates)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<CatalogConfig, ConfigError> {
        let file = Self::read_config(path)?;
        let mut config = Self::from_file(file)?;
        config.path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Candidate config paths in search order, paired with a deprecation
    /// flag.
    pub fn search_locations(
        env_path: Option<PathBuf>,
        xdg_home: Option<PathBuf>,
        home: Option<PathBuf>,
    ) -> Vec<(PathBuf, bool)> {
        let mut candidates = Vec::new();
        if let Some(path) = env_path {
            candidates.push((path, false));
        }
        if let Some(xdg) = xdg_home {
            candidates.push((xdg.join("geocatalog/config.toml"), false));
        }
        if let Some(home) = home {
            candidates.push((home.join(".geocatalog/config.toml"), false));
            candidates.push((home.join(".geocatalog.toml"), true));
        }
        candidates
    }

    /// Load the first existing candidate, or defaults when none exists.
    pub fn load_first(candidates: &[(PathBuf, bool)]) -> Result<ConfigLoadResult, ConfigError> {
        let mut warnings = Vec::new();

        for (path, deprecated) in candidates {
            if !path.exists() {
                continue;
            }
            if *deprecated {
                warnings.push(ConfigWarning {
                    message: "Using deprecated config location. Please move to \
                              '~/.geocatalog/config.toml'"
                        .to_string(),
                    path: path.clone(),
                });
            }
            let config = Self::load_from(path)?;
            return Ok(ConfigLoadResult { config, warnings });
        }

        Ok(ConfigLoadResult {
            config: CatalogConfig::default(),
            warnings,
        })
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<CatalogConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed. Writes to a temp file in the
    /// same directory, then renames over the target.
    pub fn write(path: &Path, file: &CatalogConfigFile) -> Result<(), ConfigError> {
        file.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(file).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut handle = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        handle
            .write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        handle.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Whether isolated workspaces are supported.
    ///
    /// Defaults to `true` if not configured.
    pub fn isolated_workspaces(&self) -> bool {
        self.file.isolated_workspaces.unwrap_or(true)
    }

    /// Whether pluggable validators run on add/save.
    ///
    /// Defaults to `true` if not configured.
    pub fn extended_validation(&self) -> bool {
        self.file.extended_validation.unwrap_or(true)
    }

    /// How long a lock upgrade may wait.
    ///
    /// Defaults to [`DEFAULT_UPGRADE_TIMEOUT`] if not configured.
    pub fn upgrade_timeout(&self) -> Duration {
        self.file
            .lock
            .as_ref()
            .and_then(|l| l.upgrade_timeout_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_UPGRADE_TIMEOUT)
    }

    /// Canonical default style names.
    pub fn style_names(&self) -> &StyleNames {
        &self.styles
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_files() {
        let temp = TempDir::new().unwrap();
        let candidates =
            CatalogConfig::search_locations(None, None, Some(temp.path().to_path_buf()));

        let result = CatalogConfig::load_first(&candidates).unwrap();
        let config = result.config;

        assert!(config.isolated_workspaces());
        assert!(config.extended_validation());
        assert_eq!(config.upgrade_timeout(), DEFAULT_UPGRADE_TIMEOUT);
        assert_eq!(config.style_names().point, "point");
        assert!(config.loaded_from().is_none());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn search_order() {
        let candidates = CatalogConfig::search_locations(
            Some(PathBuf::from("/env/config.toml")),
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
        );
        let paths: Vec<_> = candidates.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/env/config.toml"),
                PathBuf::from("/xdg/geocatalog/config.toml"),
                PathBuf::from("/home/u/.geocatalog/config.toml"),
                PathBuf::from("/home/u/.geocatalog.toml"),
            ]
        );
        assert!(candidates[3].1);
    }

    #[test]
    fn env_path_wins() {
        let temp = TempDir::new().unwrap();
        let env_path = temp.path().join("explicit.toml");
        fs::write(&env_path, "isolated_workspaces = false").unwrap();

        let xdg = temp.path().join("xdg");
        fs::create_dir_all(xdg.join("geocatalog")).unwrap();
        fs::write(
            xdg.join("geocatalog/config.toml"),
            "isolated_workspaces = true",
        )
        .unwrap();

        let candidates = CatalogConfig::search_locations(Some(env_path.clone()), Some(xdg), None);
        let result = CatalogConfig::load_first(&candidates).unwrap();

        assert!(!result.config.isolated_workspaces());
        assert_eq!(result.config.loaded_from(), Some(env_path.as_path()));
    }

    #[test]
    fn compat_location_warns() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".geocatalog.toml"), "extended_validation = false").unwrap();

        let candidates =
            CatalogConfig::search_locations(None, None, Some(temp.path().to_path_buf()));
        let result = CatalogConfig::load_first(&candidates).unwrap();

        assert!(!result.config.extended_validation());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].message.contains("deprecated"));
    }

    #[test]
    fn invalid_values_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[lock]\nupgrade_timeout_ms = 0").unwrap();

        assert!(matches!(
            CatalogConfig::load_from(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn parse_errors_carry_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "isolated_workspaces = \"yes\"").unwrap();

        match CatalogConfig::load_from(&path) {
            Err(ConfigError::ParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn write_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        let file = CatalogConfigFile {
            lock: Some(LockConfig {
                upgrade_timeout_ms: Some(1500),
            }),
            styles: Some(StyleNames {
                raster: "dem".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        CatalogConfig::write(&path, &file).unwrap();

        let config = CatalogConfig::load_from(&path).unwrap();
        assert_eq!(config.upgrade_timeout(), Duration::from_millis(1500));
        assert_eq!(config.style_names().raster, "dem");
        assert_eq!(config.file, file);
    }
}
