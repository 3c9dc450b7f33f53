// src/core/settings.rs

//! User settings, read from a TOML file.
//!
//! Lookup order: an explicit path (`--config`), then `$PIPEFORGE_CONFIG`,
//! then `<config_dir>/pipeforge/config.toml`. Only the last one may be
//! missing, in which case defaults are used.

use crate::{
    constants::{MAX_RECURSION_DEPTH, MAX_RESOLUTIONS, SETTINGS_ENV_VAR},
    core::{
        interpolator::SubstitutionStrategy,
        paths::{self, PathError},
    },
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised while locating or reading the settings file.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings file '{path}': {source}")]
    Io {
        /// The file that failed to read.
        path: PathBuf,
        /// The I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid TOML for [`Settings`].
    #[error("Failed to parse settings file '{path}': {source}")]
    TomlParse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: toml::de::Error,
    },
    /// The settings path could not be resolved.
    #[error(transparent)]
    Path(#[from] PathError),
}

/// All user-tunable settings.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// `[compiler]` table.
    pub compiler: CompilerSettings,
    /// `[output]` table.
    pub output: OutputSettings,
}

/// Settings that change how override documents are compiled.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerSettings {
    /// How input placeholders are substituted.
    pub substitution: SubstitutionStrategy,
    /// Deepest nesting of options the resolver follows.
    pub max_depth: u32,
    /// Most options resolved for one task before the rest is skipped.
    pub max_resolutions: u32,
}

impl Default for CompilerSettings {
    fn default() -> Self {
        Self {
            substitution: SubstitutionStrategy::default(),
            max_depth: MAX_RECURSION_DEPTH,
            max_resolutions: MAX_RESOLUTIONS,
        }
    }
}

/// Settings for how the CLI prints documents.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Indent JSON output.
    pub pretty: bool,
}

impl Settings {
    /// Loads settings following the documented lookup order.
    pub fn load(explicit: Option<&str>) -> Result<Self, SettingsError> {
        if let Some(template) = explicit {
            let path = paths::expand_path(template)?;
            log::debug!("Loading settings from --config '{}'", path.display());
            return Self::from_file(&path);
        }

        if let Ok(template) = std::env::var(SETTINGS_ENV_VAR) {
            let path = paths::expand_path(&template)?;
            log::debug!(
                "Loading settings from ${} '{}'",
                SETTINGS_ENV_VAR,
                path.display()
            );
            return Self::from_file(&path);
        }

        match paths::default_settings_path() {
            Ok(path) if path.exists() => {
                log::debug!("Loading settings from '{}'", path.display());
                Self::from_file(&path)
            }
            Ok(path) => {
                log::trace!("No settings at '{}'. Using defaults.", path.display());
                Ok(Self::default())
            }
            Err(e) => {
                log::debug!("{}. Using default settings.", e);
                Ok(Self::default())
            }
        }
    }

    /// Reads and parses a settings file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SettingsError::TomlParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_settings(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(
            settings.compiler.substitution,
            SubstitutionStrategy::Textual
        );
        assert_eq!(settings.compiler.max_depth, MAX_RECURSION_DEPTH);
        assert_eq!(settings.compiler.max_resolutions, MAX_RESOLUTIONS);
        assert!(!settings.output.pretty);
    }

    #[test]
    fn test_from_file_partial_tables_keep_defaults() {
        let file = write_settings(
            r#"
            [compiler]
            substitution = "structural"
            "#,
        );
        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(
            settings.compiler.substitution,
            SubstitutionStrategy::Structural
        );
        assert_eq!(settings.compiler.max_depth, MAX_RECURSION_DEPTH);
        assert!(!settings.output.pretty);
    }

    #[test]
    fn test_load_explicit_path() {
        let file = write_settings("[output]\npretty = true\n");
        let path = file.path().to_string_lossy().to_string();
        let settings = Settings::load(Some(&path)).unwrap();
        assert!(settings.output.pretty);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let file = write_settings("[compiler]\nmax_dept = 3\n");
        let result = Settings::from_file(file.path());
        let error_msg = result.unwrap_err().to_string();
        assert!(
            error_msg.contains("unknown field `max_dept`"),
            "Error message was: {}",
            error_msg
        );
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = Settings::from_file(Path::new("non_existent_settings_for_test.toml"));
        assert!(matches!(result, Err(SettingsError::Io { .. })));
    }
}
