//! Utilities and definitions for config handling

use crate::diff::Algorithms;
use crate::figment_utils::JsonProvider;
use crate::input_processing::TokenProcessor;
use crate::render::RenderConfig;
use anyhow::{Context, Result, anyhow};
use figment::{
    Figment,
    providers::{Env, Format, Serialized},
};
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

#[cfg(target_os = "windows")]
use directories_next::ProjectDirs;

/// The expected filename for the config file
const CFG_FILE_NAME: &str = "config.json5";

/// The prefix for environment variables that override config values.
///
/// Nested keys are separated with a double underscore, e.g. `SEQDIFF_DIFF__ALGORITHM=marchetti`.
const ENV_PREFIX: &str = "SEQDIFF_";

/// The config struct for the application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Options for the diff itself
    pub diff: DiffSettings,

    /// Options for tokenizing documents
    pub input_processing: TokenProcessor,

    /// Formatting options for display
    pub formatting: RenderConfig,
}

/// Which algorithm to run and how to compare tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
pub struct DiffSettings {
    /// The default diff algorithm.
    ///
    /// This is used if no algorithm is specified at the command line.
    pub algorithm: String,

    /// Force comparison caching on or off.
    ///
    /// When unset, comparisons are cached only if a custom comparison is in use.
    pub cache_equals: Option<bool>,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self {
            algorithm: Algorithms::default().to_string(),
            cache_equals: None,
        }
    }
}

impl DiffSettings {
    /// Get the algorithm with the given name, or the configured default.
    pub fn get_algorithm(&self, tag: Option<&str>) -> Result<Algorithms> {
        let tag = tag.unwrap_or(&self.algorithm);
        Algorithms::from_str(tag).map_err(|_| anyhow!("'{}' is not a valid algorithm", tag))
    }
}

/// The possible errors that can arise when attempting to read a config
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("The file failed to deserialize")]
    DeserializationFailure(#[from] anyhow::Error),
    #[error("Failed to read the config file")]
    ReadFileFailure(#[from] io::Error),
    #[error("Unable to compute the default config file path")]
    NoDefault,
}

impl Config {
    /// Read a config from a given filepath, or fall back to the default file paths
    ///
    /// Values missing from the file take their defaults, and `SEQDIFF_` environment variables
    /// take precedence over the file.
    pub fn try_from_file<P: AsRef<Path>>(path: Option<&P>) -> Result<Self, ReadError> {
        let config_fp: PathBuf = match path {
            Some(path) => path.as_ref().to_path_buf(),
            None => default_config_file_path().map_err(|_| ReadError::NoDefault)?,
        };
        info!("Reading config at {}", config_fp.to_string_lossy());
        let config_contents = fs::read_to_string(&config_fp)?;
        let config = Figment::from(Serialized::defaults(Config::default()))
            .merge(JsonProvider::string(&config_contents))
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .split("__")
                    .map(|key| key.as_str().replace('_', "-").into()),
            )
            .extract()
            .with_context(|| format!("Failed to parse config at {}", config_fp.to_string_lossy()))
            .map_err(ReadError::DeserializationFailure)?;
        Ok(config)
    }
}

/// Return the default location for the config file (for *nix, Linux and MacOS), this will use
/// $XDG_CONFIG/.config, where `$XDG_CONFIG` is `$HOME/.config` by default.
#[cfg(not(target_os = "windows"))]
fn default_config_file_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("seqdiff");
    let file_path = xdg_dirs.place_config_file(CFG_FILE_NAME)?;
    Ok(file_path)
}

/// Return the default location for the config file (for windows), this will use
/// $XDG_CONFIG_HOME/.config, where `$XDG_CONFIG_HOME` is `$HOME/.config` by default.
#[cfg(target_os = "windows")]
fn default_config_file_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("io", "seqdiff", "seqdiff")
        .context("Was not able to retrieve config path")?;
    let mut config_file: PathBuf = proj_dirs.config_dir().into();
    config_file.push(CFG_FILE_NAME);
    Ok(config_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input_processing::Granularity;
    use figment::Jail;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // Loading reads `SEQDIFF_` variables, so every test that loads a config runs inside a jail to
    // keep the environment of one test from leaking into another.

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_sample_config() {
        Jail::expect_with(|_| {
            let mut sample_config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
            sample_config_path.push("assets/sample_config.json5");
            let config = Config::try_from_file(Some(sample_config_path).as_ref()).unwrap();
            assert_eq!(config.diff.get_algorithm(None).unwrap().to_string(), "myers");
            assert_eq!(config.input_processing.granularity, Granularity::Line);
            Ok(())
        });
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        Jail::expect_with(|_| {
            let file = write_config(
                r#"{
                    // comments and trailing commas are fine in json5
                    "input-processing": { granularity: "word", "ignore-case": true, },
                }"#,
            );
            let config = Config::try_from_file(Some(&file.path())).unwrap();
            assert_eq!(config.diff, DiffSettings::default());
            assert_eq!(config.formatting, RenderConfig::default());
            assert_eq!(
                config.input_processing,
                TokenProcessor {
                    granularity: Granularity::Word,
                    strip_whitespace: false,
                    ignore_case: true,
                }
            );
            Ok(())
        });
    }

    #[test]
    fn test_invalid_config_is_a_deserialization_failure() {
        Jail::expect_with(|_| {
            let file = write_config(r#"{ diff: { "cache-equals": "sometimes" } }"#);
            let err = Config::try_from_file(Some(&file.path())).unwrap_err();
            assert!(matches!(err, ReadError::DeserializationFailure(_)));
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_is_a_read_failure() {
        Jail::expect_with(|_| {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nope.json5");
            let err = Config::try_from_file(Some(&path)).unwrap_err();
            assert!(matches!(err, ReadError::ReadFileFailure(_)));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.json5",
                r#"{ diff: { algorithm: "marchetti", "cache-equals": false } }"#,
            )?;
            jail.set_env("SEQDIFF_DIFF__ALGORITHM", "wagner_fischer");
            jail.set_env("SEQDIFF_INPUT_PROCESSING__STRIP_WHITESPACE", "true");
            let path = PathBuf::from("config.json5");
            let config = Config::try_from_file(Some(&path)).map_err(|e| format!("{e:#}"))?;
            assert_eq!(config.diff.algorithm, "wagner_fischer");
            assert_eq!(config.diff.cache_equals, Some(false));
            assert!(config.input_processing.strip_whitespace);
            Ok(())
        });
    }

    #[test]
    fn test_get_algorithm() {
        let settings = DiffSettings::default();
        assert_eq!(settings.get_algorithm(None).unwrap(), Algorithms::default());
        assert_eq!(
            settings.get_algorithm(Some("marchetti")).unwrap().to_string(),
            "marchetti"
        );
        let err = settings.get_algorithm(Some("patience")).unwrap_err();
        assert_eq!(err.to_string(), "'patience' is not a valid algorithm");
    }
}
