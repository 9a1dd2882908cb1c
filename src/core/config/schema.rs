//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! isolated_workspaces = true
//! extended_validation = true
//!
//! [lock]
//! upgrade_timeout_ms = 5000
//!
//! [styles]
//! point = "point"
//! raster = "raster"
//! ```
//!
//! # Validation
//!
//! Values are validated after parsing: the lock timeout must be positive and
//! the canonical style names must be non-empty and distinct.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Catalog configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfigFile {
    /// Whether isolated workspaces/namespaces are supported
    pub isolated_workspaces: Option<bool>,

    /// Whether pluggable validators run on add/save
    pub extended_validation: Option<bool>,

    /// Lock manager settings
    pub lock: Option<LockConfig>,

    /// Canonical default style names
    pub styles: Option<StyleNames>,
}

impl CatalogConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(lock) = &self.lock {
            if lock.upgrade_timeout_ms == Some(0) {
                return Err(ConfigError::InvalidValue(
                    "lock.upgrade_timeout_ms must be greater than zero".into(),
                ));
            }
        }
        if let Some(styles) = &self.styles {
            styles.validate()?;
        }
        Ok(())
    }
}

/// Lock manager settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LockConfig {
    /// How long `try_upgrade` waits for other holders to leave
    pub upgrade_timeout_ms: Option<u64>,
}

/// Names of the canonical global styles used as per-geometry defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StyleNames {
    pub point: String,
    pub line: String,
    pub polygon: String,
    pub raster: String,
    pub generic: String,
}

impl Default for StyleNames {
    fn default() -> Self {
        Self {
            point: "point".into(),
            line: "line".into(),
            polygon: "polygon".into(),
            raster: "raster".into(),
            generic: "generic".into(),
        }
    }
}

impl StyleNames {
    /// All canonical names.
    pub fn all(&self) -> [&str; 5] {
        [
            &self.point,
            &self.line,
            &self.polygon,
            &self.raster,
            &self.generic,
        ]
    }

    /// Whether `name` is one of the canonical names.
    pub fn contains(&self, name: &str) -> bool {
        self.all().contains(&name)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let names = self.all();
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "style names cannot be empty".into(),
                ));
            }
            if names[..i].contains(name) {
                return Err(ConfigError::InvalidValue(format!(
                    "style name '{}' is used for more than one default",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full() {
        let parsed: CatalogConfigFile = toml::from_str(
            r#"
            isolated_workspaces = false
            extended_validation = false

            [lock]
            upgrade_timeout_ms = 250

            [styles]
            point = "dot"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.isolated_workspaces, Some(false));
        assert_eq!(parsed.lock.unwrap().upgrade_timeout_ms, Some(250));
        let styles = parsed.styles.unwrap();
        assert_eq!(styles.point, "dot");
        assert_eq!(styles.line, "line");
    }

    #[test]
    fn zero_timeout_rejected() {
        let parsed: CatalogConfigFile = toml::from_str("[lock]\nupgrade_timeout_ms = 0").unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn duplicate_style_names_rejected() {
        let styles = StyleNames {
            line: "point".into(),
            ..Default::default()
        };
        assert!(styles.validate().is_err());
    }

    #[test]
    fn empty_style_name_rejected() {
        let styles = StyleNames {
            generic: " ".into(),
            ..Default::default()
        };
        assert!(styles.validate().is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let parsed: Result<CatalogConfigFile, _> = toml::from_str("bogus = 1");
        assert!(parsed.is_err());
    }
}
