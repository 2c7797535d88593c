use std::env;
use std::str::FromStr;

/// Values shipped in sample `.env` / `config.php` files; they mean "no key".
pub const PLACEHOLDER_API_KEYS: [&str; 2] = ["YOUR_API_KEY_HERE", "YOUR_ACTUAL_API_KEY_HERE"];

pub const DEFAULT_API_BASE_URL: &str = "https://api.odcloud.kr/api";
pub const DEFAULT_PROXY_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    #[default]
    Development,
    /// Deployed build; always talks to the proxy.
    Production,
}

impl ExecutionMode {
    pub fn default_base_path(&self) -> &'static str {
        match self {
            ExecutionMode::Development => "/",
            ExecutionMode::Production => "/reactapi/",
        }
    }
}

impl FromStr for ExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(ExecutionMode::Development),
            "production" | "prod" => Ok(ExecutionMode::Production),
            other => Err(format!("unknown execution mode: {other}")),
        }
    }
}

/// Inputs to the access-mode decision.
#[derive(Debug, Clone)]
pub struct AccessConfig {
    pub mode: ExecutionMode,
    pub use_proxy: bool,
    pub api_key: Option<String>,
    /// Prefix under which the proxy scripts are served.
    pub base_path: String,
    /// Scheme and host the proxy paths are resolved against.
    pub proxy_origin: String,
    /// Root of the third-party API used in direct mode.
    pub api_base_url: String,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            mode: ExecutionMode::Development,
            use_proxy: false,
            api_key: None,
            base_path: ExecutionMode::Development.default_base_path().to_string(),
            proxy_origin: DEFAULT_PROXY_ORIGIN.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl AccessConfig {
    /// Read `PUBLIC_DATA_*` variables, defaulting anything unset.
    pub fn from_env() -> Self {
        let mode = env::var("PUBLIC_DATA_MODE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let use_proxy = env::var("PUBLIC_DATA_USE_PROXY")
            .map(|v| v == "true")
            .unwrap_or(false);

        Self {
            mode,
            use_proxy,
            api_key: env::var("PUBLIC_DATA_API_KEY").ok(),
            base_path: env::var("PUBLIC_DATA_BASE_PATH")
                .unwrap_or_else(|_| mode.default_base_path().to_string()),
            proxy_origin: env::var("PUBLIC_DATA_PROXY_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_PROXY_ORIGIN.to_string()),
            api_base_url: env::var("PUBLIC_DATA_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
        }
    }

    /// Switch execution mode. A base path still at the old mode's default
    /// follows the new mode; an explicitly configured one is kept.
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        if self.base_path == self.mode.default_base_path() {
            self.base_path = mode.default_base_path().to_string();
        }
        self.mode = mode;
        self
    }

    /// The configured key, if it is neither blank nor a placeholder.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .filter(|key| !PLACEHOLDER_API_KEYS.contains(key))
    }

    pub fn routes_through_proxy(&self) -> bool {
        self.mode == ExecutionMode::Production || self.use_proxy
    }

    /// Whether live data is reachable at all (the proxy holds its own key).
    pub fn has_api_key(&self) -> bool {
        self.mode == ExecutionMode::Production || self.credential().is_some()
    }
}
