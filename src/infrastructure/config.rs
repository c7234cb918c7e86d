use crate::domain::error::HqError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_paging")]
    pub paging: bool,
    #[serde(default = "default_pager_command")]
    pub pager_command: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub clear_screen: bool,
    #[serde(default = "default_enable_emoji")]
    pub enable_emoji: bool,
    #[serde(default)]
    pub scan_alert: bool,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// 各层缓存的有效期,单位见字段名
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_dashboard_ttl_secs")]
    pub dashboard_ttl_secs: u64,
    #[serde(default = "default_kitchen_ttl_secs")]
    pub kitchen_ttl_secs: u64,
    #[serde(default = "default_notice_ttl_secs")]
    pub notice_ttl_secs: u64,
    #[serde(default = "default_scan_ttl_secs")]
    pub scan_ttl_secs: u64,
    #[serde(default = "default_scan_debounce_ms")]
    pub scan_debounce_ms: u64,
}

impl CacheConfig {
    pub fn dashboard_ttl(&self) -> Duration {
        Duration::from_secs(self.dashboard_ttl_secs)
    }

    pub fn kitchen_ttl(&self) -> Duration {
        Duration::from_secs(self.kitchen_ttl_secs)
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::from_secs(self.notice_ttl_secs)
    }

    pub fn scan_ttl(&self) -> Duration {
        Duration::from_secs(self.scan_ttl_secs)
    }

    pub fn scan_debounce(&self) -> Duration {
        Duration::from_millis(self.scan_debounce_ms)
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dashboard_ttl_secs: default_dashboard_ttl_secs(),
            kitchen_ttl_secs: default_kitchen_ttl_secs(),
            notice_ttl_secs: default_notice_ttl_secs(),
            scan_ttl_secs: default_scan_ttl_secs(),
            scan_debounce_ms: default_scan_debounce_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paging: true,
            pager_command: default_pager_command(),
            theme: default_theme(),
            clear_screen: false,
            enable_emoji: true,
            scan_alert: false,
            logging: Logging::default(),
            api: ApiConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

// Defaults
fn default_paging() -> bool {
    true
}
fn default_pager_command() -> String {
    // Windows 使用 more，Unix 系统使用 less
    if cfg!(target_os = "windows") {
        "more".to_string()
    } else {
        "less -RF".to_string()
    }
}
fn default_theme() -> String {
    "temp".to_string()
}
fn default_enable_emoji() -> bool {
    true
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}
fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_dashboard_ttl_secs() -> u64 {
    120
}
fn default_kitchen_ttl_secs() -> u64 {
    300
}
fn default_notice_ttl_secs() -> u64 {
    60
}
fn default_scan_ttl_secs() -> u64 {
    60
}
fn default_scan_debounce_ms() -> u64 {
    1500
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hq").join("config.toml"))
}

pub fn load_config() -> Result<Config, HqError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match toml::from_str::<Config>(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), HqError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        // Create directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Generate sample config
        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| HqError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| HqError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(HqError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
