//! Configuration parsing and resolution for folio

use crate::error::{Error, Result};
use crate::pager::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::types::DisplaySize;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Full configuration for folio
#[derive(Debug, Clone, Deserialize)]
pub struct FolioConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    pub now_playing: Option<NowPlayingConfig>,
}

/// Blog API connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Admin bearer token; enables the composer and profile editing
    pub token: Option<ApiToken>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    15
}

/// Feed paging and display defaults
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub default_size: DisplaySize,
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_size: DisplaySize::default(),
        }
    }
}

impl FeedConfig {
    /// Page size clamped to what the API accepts.
    pub fn page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// Push feed for the "now playing" widget
#[derive(Debug, Clone, Deserialize)]
pub struct NowPlayingConfig {
    pub url: String,
}

/// Admin bearer token as written in the config file.
///
/// `env:NAME` reads the token from the environment when the client is built,
/// so the file itself can be committed.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiToken(String);

impl ApiToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Name of the environment variable this token is read from, if any.
    pub fn env_var(&self) -> Option<&str> {
        self.0.strip_prefix("env:")
    }

    pub fn resolve(&self) -> Result<String> {
        match self.env_var() {
            Some(name) => std::env::var(name)
                .map_err(|_| Error::Config(format!("Environment variable {} not set", name))),
            None => Ok(self.0.clone()),
        }
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.env_var() {
            Some(name) => write!(f, "ApiToken(env:{})", name),
            None => f.write_str("ApiToken(<redacted>)"),
        }
    }
}

impl FolioConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

const CONFIG_FILE: &str = "folio.toml";
const CONFIG_ENV: &str = "FOLIO_CONFIG";

/// Every place a config file is looked for, highest priority first:
/// the explicit path, `$FOLIO_CONFIG`, `folio.toml` in the working
/// directory and its ancestors, then the user and system config dirs.
pub fn config_search_paths(explicit_path: Option<&Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = explicit_path.map(Path::to_path_buf).into_iter().collect();

    if let Some(env_path) = std::env::var_os(CONFIG_ENV) {
        paths.push(PathBuf::from(env_path));
    }
    if let Ok(cwd) = std::env::current_dir() {
        paths.extend(cwd.ancestors().map(|dir| dir.join(CONFIG_FILE)));
    }
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("folio").join("config.toml"));
    }
    paths.push(PathBuf::from("/etc/folio/config.toml"));
    paths
}

/// Load the first config file found along [`config_search_paths`].
pub fn resolve_config(explicit_path: Option<&Path>) -> Result<FolioConfig> {
    let searched = config_search_paths(explicit_path);
    match searched.iter().find(|path| path.is_file()) {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            FolioConfig::load(path)
        }
        None => Err(Error::ConfigNotFound { searched }),
    }
}
