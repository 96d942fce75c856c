use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            token: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshSettings {
    #[serde(default = "default_period_secs")]
    pub period_secs: u64,
    #[serde(default = "default_source_timeout_secs")]
    pub source_timeout_secs: u64,
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            period_secs: default_period_secs(),
            source_timeout_secs: default_source_timeout_secs(),
        }
    }
}

fn default_period_secs() -> u64 {
    600
}

fn default_source_timeout_secs() -> u64 {
    10
}
