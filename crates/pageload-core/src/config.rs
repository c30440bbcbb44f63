use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// What the rewriter does when two different resources derive the same local file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Append `-1`, `-2`, ... to the later name's stem (document order).
    #[default]
    Rename,
    /// Abort the rewrite with `PageLoadError::NamingCollision`.
    Fail,
}

/// Global configuration loaded from `~/.config/page-loader/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Connect timeout for every GET, in seconds.
    pub connect_timeout_secs: u64,
    /// Optional whole-transfer timeout in seconds (None or 0 = no timeout).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Maximum redirects followed per GET.
    pub max_redirections: u32,
    /// User-Agent header sent with every request.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Handling of resources that map to the same local file.
    #[serde(default)]
    pub collision_policy: CollisionPolicy,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: None,
            max_redirections: 10,
            user_agent: Some(concat!("page-loader/", env!("CARGO_PKG_VERSION")).to_string()),
            collision_policy: CollisionPolicy::Rename,
        }
    }
}

impl LoaderConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("page-loader")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LoaderConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = LoaderConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: LoaderConfig = toml::from_str(&data)?;
    Ok(cfg)
}
