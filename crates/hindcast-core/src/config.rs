use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Public archive of the NOPP phase-2 multi-grid wave hindcast.
pub const DEFAULT_BASE_URL: &str = "https://polar.ncep.noaa.gov/waves/hindcasts/nopp-phase2/";

/// HTTP transfer parameters (optional `[http]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Hard wall-clock limit for one file, in seconds.
    pub timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/s for `low_speed_time_secs`.
    pub low_speed_limit: u32,
    pub low_speed_time_secs: u64,
    /// Receive buffer size in bytes; the body is written in chunks of at most this size.
    pub chunk_size: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            timeout_secs: 3600,
            low_speed_limit: 1024,
            low_speed_time_secs: 60,
            chunk_size: 8192,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn low_speed_time(&self) -> Duration {
        Duration::from_secs(self.low_speed_time_secs)
    }
}

/// Global configuration loaded from `~/.config/hindcast/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HindcastConfig {
    /// Archive root; month directories are resolved beneath it.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Default download directory when `--path` is not given.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Worker count override (None = available parallelism). Always capped at the month count.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Upper bound between progress samples, in milliseconds.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_progress_interval_ms() -> u64 {
    1000
}

impl Default for HindcastConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            data_dir: default_data_dir(),
            workers: None,
            progress_interval_ms: default_progress_interval_ms(),
            http: HttpConfig::default(),
        }
    }
}

impl HindcastConfig {
    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    /// Checks `base_url` is an absolute http(s) URL and normalizes it to end in `/`.
    pub fn validate(mut self) -> Result<Self> {
        let parsed = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url: {}", self.base_url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            anyhow::bail!("base_url must be http or https, got {}", parsed.scheme());
        }
        let mut normalized = parsed.to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        self.base_url = normalized;
        if self.http.chunk_size == 0 {
            anyhow::bail!("http.chunk_size must be greater than zero");
        }
        Ok(self)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("hindcast")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<HindcastConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<HindcastConfig> {
    if !path.exists() {
        let default_cfg = HindcastConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return default_cfg.validate();
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: HindcastConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()
}
