use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::clamp_page_size;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_LOG_FILTER: &str = "contract_terminal=info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// `None` leaves the transport default in place.
    pub http_timeout: Option<Duration>,
    pub page_size: usize,
    pub demo: bool,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            http_timeout: None,
            page_size: 10,
            demo: false,
            log_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same rules as `from_env`, reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_base_url = lookup("APP_API_BASE_URL")
            .map(|val| val.trim().trim_end_matches('/').to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.api_base_url);
        let http_timeout = lookup("APP_HTTP_TIMEOUT_SECS")
            .and_then(|val| val.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let page_size = lookup("APP_PAGE_SIZE")
            .and_then(|val| val.trim().parse::<usize>().ok())
            .map(clamp_page_size)
            .unwrap_or(defaults.page_size);
        let demo = lookup("APP_DEMO").is_some_and(|val| is_truthy(&val));
        let log_file = lookup("APP_LOG_FILE")
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from);
        Self {
            api_base_url,
            http_timeout,
            page_size,
            demo,
            log_file,
        }
    }
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
