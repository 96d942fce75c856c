use std::path::Path;

use crate::models::Settings;

const ENV_API_URL: &str = "INTERNBOARD_API_URL";
const ENV_API_TOKEN: &str = "INTERNBOARD_API_TOKEN";

pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

pub fn api_url_from_env() -> Option<String> {
    env_value(ENV_API_URL)
}

pub fn api_token_from_env() -> Option<String> {
    env_value(ENV_API_TOKEN)
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub fn apply_env_defaults(settings: &mut Settings) {
    if let Some(url) = api_url_from_env() {
        settings.api.base_url = url;
    }
    if settings.api.token.trim().is_empty() {
        settings.api.token = api_token_from_env().unwrap_or_default();
    }
}

/// Reads settings from a JSON file, falling back to defaults when the file is
/// missing or unreadable; env vars win over the file for API url/token.
pub fn load_settings(path: &Path) -> Settings {
    let mut settings = if path.exists() {
        std::fs::read_to_string(path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    } else {
        Settings::default()
    };
    apply_env_defaults(&mut settings);
    settings
}
