use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "category_admin.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub page_size: u32,
    pub delete_close_delay_ms: u64,
    pub request_timeout_secs: u64,
    pub auth_token: Option<String>,
    pub session_cookie: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080".into(),
            page_size: shared::domain::DEFAULT_LIMIT,
            delete_close_delay_ms: 1000,
            request_timeout_secs: 30,
            auth_token: None,
            session_cookie: None,
        }
    }
}

impl ClientSettings {
    pub fn delete_close_delay(&self) -> Duration {
        Duration::from_millis(self.delete_close_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    page_size: Option<u32>,
    delete_close_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    auth_token: Option<String>,
    session_cookie: Option<String>,
}

/// Defaults, then `category_admin.toml` from the working directory (or `path`), then environment.
pub fn load_settings(path: Option<&Path>) -> ClientSettings {
    load_settings_with(path, |name| std::env::var(name).ok())
}

fn load_settings_with<F>(path: Option<&Path>, lookup: F) -> ClientSettings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = ClientSettings::default();

    let explicit = path.is_some();
    let path = path.unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE));
    match fs::read_to_string(path) {
        Ok(raw) => match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => apply_file_settings(&mut settings, file_cfg),
            Err(err) => warn!("ignoring malformed settings file '{}': {err}", path.display()),
        },
        Err(err) if explicit => {
            warn!("could not read settings file '{}': {err}", path.display());
        }
        Err(_) => {}
    }

    apply_env_overrides(&mut settings, lookup);
    settings
}

fn apply_file_settings(settings: &mut ClientSettings, file_cfg: FileSettings) {
    if let Some(v) = file_cfg.api_base_url {
        settings.api_base_url = v;
    }
    if let Some(v) = file_cfg.page_size {
        settings.page_size = v.max(1);
    }
    if let Some(v) = file_cfg.delete_close_delay_ms {
        settings.delete_close_delay_ms = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout_secs = v;
    }
    if file_cfg.auth_token.is_some() {
        settings.auth_token = file_cfg.auth_token;
    }
    if file_cfg.session_cookie.is_some() {
        settings.session_cookie = file_cfg.session_cookie;
    }
}

pub fn apply_env_overrides<F>(settings: &mut ClientSettings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(v) = non_empty("CATEGORY_ADMIN_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = non_empty("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = non_empty("APP__PAGE_SIZE") {
        match v.trim().parse::<u32>() {
            Ok(parsed) if parsed > 0 => settings.page_size = parsed,
            _ => warn!("ignoring invalid APP__PAGE_SIZE '{v}'"),
        }
    }

    if let Some(v) = non_empty("APP__DELETE_CLOSE_DELAY_MS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.delete_close_delay_ms = parsed,
            Err(_) => warn!("ignoring invalid APP__DELETE_CLOSE_DELAY_MS '{v}'"),
        }
    }

    if let Some(v) = non_empty("APP__REQUEST_TIMEOUT_SECS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => warn!("ignoring invalid APP__REQUEST_TIMEOUT_SECS '{v}'"),
        }
    }

    if let Some(v) = non_empty("APP__AUTH_TOKEN") {
        settings.auth_token = Some(v);
    }
    if let Some(v) = non_empty("APP__SESSION_COOKIE") {
        settings.session_cookie = Some(v);
    }
}
