//! Configuration for Arbiter.
//!
//! Uses `figment` for layered configuration: defaults -> user config ->
//! workspace config -> explicit file -> environment. `--prop` strings are
//! applied on top by the caller through [`apply_properties`].

use crate::catalog::AllowList;
use crate::error::{ArbiterError, PropertyError};
use crate::paths::expand_to_path;
use crate::properties::Properties;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    pub catalog: CatalogConfig,
    pub output: OutputConfig,
    pub probe: ProbeConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Explicit `params` directory. When unset the distribution is located
    /// by walking up from the executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params_dir: Option<PathBuf>,
    /// Restricts classifier and filter candidates to these identifiers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_list: Option<Vec<String>>,
}

impl CatalogConfig {
    pub fn allow_list(&self) -> Option<AllowList> {
        self.allow_list
            .as_ref()
            .map(|ids| ids.iter().cloned().collect())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{}', expected text or json", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Report a panicking algorithm as an unexpected error instead of
    /// aborting resolution.
    pub catch_panics: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self { catch_panics: true }
    }
}

/// Workspace-level config file, relative to the workspace root.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".arbiter").join("config.toml")
}

/// User-level config file, if a home directory is known.
pub fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "arbiter", "arbiter")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load the layered configuration.
pub fn load_config(
    workspace: Option<&Path>,
    explicit: Option<&Path>,
) -> Result<ArbiterConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(ArbiterConfig::default()));

    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // Named on the command line, so a missing file is an error.
    if let Some(path) = explicit {
        figment = figment.merge(Toml::file_exact(path));
    }

    // ARBITER_CATALOG__PARAMS_DIR, ARBITER_OUTPUT__FORMAT, ...
    figment = figment.merge(Env::prefixed("ARBITER_").split("__"));

    figment.extract().map_err(Box::new)
}

/// Apply `key=value` overrides decoded from a property string.
///
/// Unknown keys and unparsable values are rejected rather than ignored.
pub fn apply_properties(
    config: &mut ArbiterConfig,
    props: &Properties,
) -> Result<(), ArbiterError> {
    for (key, value) in props {
        match key.as_str() {
            "catalog.params_dir" => config.catalog.params_dir = Some(expand_to_path(value)),
            "catalog.allow_list" => {
                config.catalog.allow_list = Some(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect(),
                )
            }
            "output.format" => config.output.format = value.parse().map_err(|_| invalid(key))?,
            "output.pretty" => config.output.pretty = parse_bool(value).ok_or_else(|| invalid(key))?,
            "probe.catch_panics" => {
                config.probe.catch_panics = parse_bool(value).ok_or_else(|| invalid(key))?
            }
            _ => return Err(invalid(key).into()),
        }
        tracing::debug!(key = %key, value = %value, "Applied configuration override");
    }
    Ok(())
}

fn invalid(key: &str) -> PropertyError {
    PropertyError::InvalidEntry {
        entry: key.to_string(),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
