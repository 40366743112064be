use log::info;

/// Backend used when no base URL is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

pub const API_BASE_URL_VAR: &str = "INTERVIEWIQ_API_BASE_URL";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
}

impl AppConfig {
    /// Reads configuration from the environment. An unset or empty
    /// `INTERVIEWIQ_API_BASE_URL` falls back to the local development backend.
    pub fn from_env() -> Self {
        let api_base_url = std::env::var(API_BASE_URL_VAR)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        info!("Using backend at {}", api_base_url);

        Self { api_base_url }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}
