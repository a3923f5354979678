use std::env;
use std::sync::OnceLock;

static CONFIG: OnceLock<Config> = OnceLock::new();

// --- CONFIG AGGREGATOR ---

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    pub dashboard: DashboardConfig,
}

impl Config {
    pub fn global() -> &'static Config {
        CONFIG.get_or_init(Self::load)
    }

    fn load() -> Self {
        dotenv::dotenv().ok();
        Self {
            backend: BackendConfig::load(),
            dashboard: DashboardConfig::load(),
        }
    }
}

// --- MODULES ---

// BACKEND (the monitor service we talk to)
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub auto_start: bool,
}

impl BackendConfig {
    fn load() -> Self {
        Self {
            base_url:             get_env("MONITOR_BASE_URL", "http://127.0.0.1:8080/amq-monitor/"),
            request_timeout_secs: get_env("MONITOR_REQUEST_TIMEOUT_SECS", "10"),
            auto_start:           get_env("MONITOR_AUTO_START", "false"),
        }
    }
}

// DASHBOARD (local operator api)
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Comma separated stat fields to hide
    pub hidden_columns: String,
}

impl DashboardConfig {
    fn load() -> Self {
        Self {
            host:           get_env("DASHBOARD_HOST", "127.0.0.1"),
            port:           get_env("DASHBOARD_PORT", "9090"),
            log_level:      get_env("MONITOR_LOG", "info"),
            hidden_columns: get_env("DASHBOARD_HIDDEN_COLUMNS", ""),
        }
    }
}

// --- PRIVATE HELPER ---

fn get_env<T: std::str::FromStr>(key: &str, default: &str) -> T {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    match raw.parse() {
        Ok(value) => value,
        Err(_) => panic!("Config error: {} must be valid (got '{}')", key, raw),
    }
}
