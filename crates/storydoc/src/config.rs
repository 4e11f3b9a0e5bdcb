//! Configuration file (storydoc.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use storydoc_adapters::{Framework, ImportAliases};

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub resolve: ResolveConfig,
}

#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    #[serde(default = "default_root")]
    pub root: String,
    /// Static story index, relative to the root
    #[serde(default = "default_index")]
    pub index: String,
    /// Pin the framework and skip detection
    pub framework: Option<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            index: default_index(),
            framework: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_output")]
    pub output: String,
    pub threads: Option<usize>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            threads: None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct ResolveConfig {
    #[serde(default)]
    pub aliases: ImportAliases,
}

fn default_root() -> String {
    ".".to_string()
}
fn default_index() -> String {
    "storybook-static/index.json".to_string()
}
fn default_output() -> String {
    "storydoc-api".to_string()
}

impl ConfigFile {
    pub fn project_root(&self) -> PathBuf {
        PathBuf::from(&self.project.root)
    }

    pub fn index_path(&self) -> PathBuf {
        self.project_root().join(&self.project.index)
    }

    /// The framework pinned in configuration, if any.
    pub fn framework(&self) -> Result<Option<Framework>> {
        match self.project.framework.as_deref() {
            None => Ok(None),
            Some(name) => match Framework::from_name(name) {
                Some(framework) => Ok(Some(framework)),
                None => bail!("Unknown framework in config: {}", name),
            },
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Loaded config from {}", path.display());

    Ok(config)
}
