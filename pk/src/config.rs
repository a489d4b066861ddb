//! Configuration for pypackage

use eyre::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Project-local config file name
pub const CONFIG_FILE: &str = "pypackage.yml";

/// Main pypackage configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Package metadata passed to the documentation tools
    pub project: ProjectConfig,

    /// Sphinx tool names and directories
    pub sphinx: SphinxConfig,

    /// Task runner behaviour
    pub runner: RunnerConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level", skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub author: String,

    /// Python package (import) name
    pub package: String,

    #[serde(rename = "github-repo")]
    pub github_repo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SphinxConfig {
    /// Extra options appended to every `sphinx-build` call, whitespace separated
    pub opts: String,

    pub build: String,

    pub apidoc: String,

    pub quickstart: String,

    /// Documentation sources, relative to the project root
    #[serde(rename = "source-dir")]
    pub source_dir: PathBuf,

    /// Build output, relative to `source-dir`
    #[serde(rename = "build-dir")]
    pub build_dir: PathBuf,
}

impl Default for SphinxConfig {
    fn default() -> Self {
        Self {
            opts: String::new(),
            build: "sphinx-build".to_string(),
            apidoc: "sphinx-apidoc".to_string(),
            quickstart: "sphinx-quickstart".to_string(),
            source_dir: PathBuf::from("docs"),
            build_dir: PathBuf::from("_build"),
        }
    }
}

impl SphinxConfig {
    /// `<source-dir>/<build-dir>`
    pub fn build_path(&self) -> PathBuf {
        self.source_dir.join(&self.build_dir)
    }

    /// `<source-dir>/apidocs`
    pub fn apidocs_path(&self) -> PathBuf {
        self.source_dir.join("apidocs")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// 0: capture command output, 1: also echo commands, 2: inherit stdio
    pub verbosity: u8,

    /// Tasks run when none are named on the command line
    #[serde(rename = "default-tasks")]
    pub default_tasks: Vec<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, errors are fatal
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: ./pypackage.yml
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => warn!("Failed to load config from {}: {:#}", local_config.display(), e),
            }
        }

        // Try user config: ~/.config/pypackage/pypackage.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("pypackage").join(CONFIG_FILE);
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => warn!("Failed to load config from {}: {:#}", user_config.display(), e),
                }
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only `log-level`, following the same fallback chain as [`Config::load`].
    ///
    /// Runs before logging is set up, so unreadable files are skipped silently
    /// here and reported by the full load afterwards.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        #[derive(Deserialize)]
        struct LogLevelOnly {
            #[serde(rename = "log-level", default)]
            log_level: Option<String>,
        }

        let read = |path: &Path| -> Option<LogLevelOnly> {
            let content = fs::read_to_string(path).ok()?;
            serde_yaml::from_str(&content).ok()
        };

        if let Some(path) = config_path {
            return read(path).and_then(|c| c.log_level);
        }

        let user_config = dirs::config_dir().map(|dir| dir.join("pypackage").join(CONFIG_FILE));
        [Some(PathBuf::from(CONFIG_FILE)), user_config]
            .into_iter()
            .flatten()
            .filter(|path| path.exists())
            .find_map(|path| read(&path))
            .and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).context(format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }
}
