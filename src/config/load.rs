//! The main config loading module for myls.
//!
//! Handles loading and deserializing settings from `myls.toml`, then layering the `MYLS_*`
//! environment variables on top.
//!
//! Provides the main [Config] struct, as well as the internal [RawConfig] used for parsing.

use crate::config::{Display, General, InternalGeneral};
use crate::utils::parse_bool_word;

use serde::Deserialize;
use std::{fs, path::PathBuf};

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_VAR: &str = "MYLS_CONFIG";

/// Raw configuration as read from the toml file
/// It is converted into the main [Config] struct once parsed.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    display: Display,
}

/// Main configuration struct for myls
/// Holds the settings from the built-in defaults, the config file and the environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    general: InternalGeneral,
    display: Display,
}

/// Conversion from RawConfig to Config
impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            display: raw.display.validated(),
        }
    }
}

impl Config {
    /// Load configuration from the default path and apply the environment.
    ///
    /// A missing file silently yields the defaults; an unreadable or malformed one is logged.
    pub fn load() -> Self {
        let path = Self::default_path();
        let mut config = match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content).unwrap_or_else(|e| {
                log::warn!("error parsing {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                log::warn!("can not read {}: {}", path.display(), e);
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    /// Parses a `myls.toml` document.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<RawConfig>(content).map(Config::from)
    }

    /// Applies the `MYLS_*` variables returned by `lookup`.
    ///
    /// Boolean variables that do not parse, and empty or invalid time formats, are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(fmt) = lookup("MYLS_TIMEFMT_NEW") {
            self.display.set_time_format_recent(fmt);
        }
        if let Some(fmt) = lookup("MYLS_TIMEFMT_OLD") {
            self.display.set_time_format_old(fmt);
        }

        let flag = |key: &str| {
            let value = lookup(key)?;
            let parsed = parse_bool_word(&value);
            if parsed.is_none() {
                log::warn!("ignoring {key}={value:?}: not a boolean");
            }
            parsed
        };
        if let Some(value) = flag("MYLS_DIRS_FIRST") {
            self.general.set_dirs_first(value);
        }
        if let Some(value) = flag("MYLS_GIT") {
            self.general.set_git(value);
        }
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn display(&self) -> &Display {
        &self.display
    }

    /// Determine the default configuration file path.
    /// Checks the MYLS_CONFIG environment variable first,
    /// Checks for XDG_CONFIG_HOME after,
    /// then defaults to ~/.config/myls/myls.toml,
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("myls/myls.toml");
        }

        if let Some(home) = dirs::home_dir() {
            return home.join(".config/myls/myls.toml");
        }
        PathBuf::from("myls.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SortKey;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(!config.general().all());
        assert!(!config.general().git());
        assert_eq!(config.general().sort(), SortKey::Name);
        assert_eq!(config.display().time_format_recent(), "%b %e %H:%M");
        assert_eq!(config.display().time_format_old(), "%b %e  %Y");
    }

    #[test]
    fn partial_toml_keeps_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::from_toml(
            r#"
            [general]
            dirs_first = true
            sort = "mtime"

            [display]
            long = true
            "#,
        )?;
        assert!(config.general().dirs_first());
        assert_eq!(config.general().sort(), SortKey::Time);
        assert!(!config.general().reverse());
        assert!(config.display().long());
        assert_eq!(config.display().time_format_old(), "%b %e  %Y");
        Ok(())
    }

    #[test]
    fn invalid_sort_word_falls_back_to_name() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::from_toml("[general]\nsort = \"color\"\n")?;
        assert_eq!(config.general().sort(), SortKey::Name);
        Ok(())
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Config::from_toml("[general\nall = ").is_err());
        assert!(Config::from_toml("[general]\nall = \"sometimes\"").is_err());
    }

    #[test]
    fn environment_overrides_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut config = Config::from_toml("[general]\ndirs_first = true\n")?;
        config.apply_env(env(&[
            ("MYLS_DIRS_FIRST", "off"),
            ("MYLS_GIT", "Yes"),
            ("MYLS_TIMEFMT_NEW", "%H:%M"),
        ]));
        assert!(!config.general().dirs_first());
        assert!(config.general().git());
        assert_eq!(config.display().time_format_recent(), "%H:%M");
        assert_eq!(config.display().time_format_old(), "%b %e  %Y");
        Ok(())
    }

    #[test]
    fn invalid_time_formats_keep_defaults() -> Result<(), Box<dyn std::error::Error>> {
        let config = Config::from_toml(
            "[display]\ntime_format_recent = \"%Q bogus\"\ntime_format_old = \"%Y\"\n",
        )?;
        assert_eq!(config.display().time_format_recent(), "%b %e %H:%M");
        assert_eq!(config.display().time_format_old(), "%Y");

        let mut config = Config::default();
        config.apply_env(env(&[("MYLS_TIMEFMT_NEW", "%Q"), ("MYLS_TIMEFMT_OLD", "%")]));
        assert_eq!(config.display().time_format_recent(), "%b %e %H:%M");
        assert_eq!(config.display().time_format_old(), "%b %e  %Y");
        Ok(())
    }

    #[test]
    fn empty_time_formats_are_ignored() -> Result<(), Box<dyn std::error::Error>> {
        let mut config = Config::from_toml("[display]\ntime_format_old = \"\"\n")?;
        assert_eq!(config.display().time_format_old(), "%b %e  %Y");

        config.apply_env(env(&[("MYLS_TIMEFMT_NEW", ""), ("MYLS_TIMEFMT_OLD", "%d.%m.%Y")]));
        assert_eq!(config.display().time_format_recent(), "%b %e %H:%M");
        assert_eq!(config.display().time_format_old(), "%d.%m.%Y");
        Ok(())
    }

    #[test]
    fn unparsable_booleans_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env(&[("MYLS_GIT", "perhaps"), ("MYLS_DIRS_FIRST", "1")]));
        assert!(!config.general().git());
        assert!(config.general().dirs_first());
    }
}
