use std::{collections::HashMap, fs, num::NonZeroU64, path::Path, time::Duration};

use tracing::warn;
use url::Url;

use crate::error::ClientError;

pub const SETTINGS_FILE: &str = "client.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub samples_per_page: NonZeroU64,
    pub comments_per_page: NonZeroU64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            request_timeout_secs: 10,
            samples_per_page: NonZeroU64::new(16).unwrap_or(NonZeroU64::MIN),
            comments_per_page: NonZeroU64::new(3).unwrap_or(NonZeroU64::MIN),
        }
    }
}

impl ClientSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parses the configured base URL, normalized to end with a slash so that
    /// relative endpoint paths join below it instead of replacing its last segment.
    pub fn base_url(&self) -> Result<Url, ClientError> {
        let raw = self.api_base_url.trim();
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };
        Url::parse(&normalized).map_err(|source| ClientError::InvalidUrl {
            url: raw.to_string(),
            source,
        })
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// File values override defaults, environment values override the file.
/// Unparseable values are logged and skipped.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => {
                for (key, value) in file_cfg {
                    let value = match value {
                        toml::Value::String(text) => text,
                        other => other.to_string(),
                    };
                    apply(&mut settings, &key, &value);
                }
            }
            Err(err) => warn!(path = %path.display(), "ignoring malformed settings file: {err}"),
        }
    }

    for (var, key) in [
        ("BIOSAMPLE_API_URL", "api_base_url"),
        ("APP__API_URL", "api_base_url"),
        ("APP__REQUEST_TIMEOUT_SECS", "request_timeout_secs"),
        ("APP__SAMPLES_PER_PAGE", "samples_per_page"),
        ("APP__COMMENTS_PER_PAGE", "comments_per_page"),
    ] {
        if let Some(value) = env(var) {
            apply(&mut settings, key, &value);
        }
    }

    settings
}

fn apply(settings: &mut ClientSettings, key: &str, value: &str) {
    match key {
        "api_base_url" | "base_url" => settings.api_base_url = value.to_string(),
        "request_timeout_secs" | "timeout_secs" => match value.parse() {
            Ok(parsed) => settings.request_timeout_secs = parsed,
            Err(_) => warn!(key, value, "ignoring non-numeric timeout"),
        },
        "samples_per_page" => match parse_page_size(value) {
            Some(parsed) => settings.samples_per_page = parsed,
            None => warn!(key, value, "ignoring invalid page size"),
        },
        "comments_per_page" => match parse_page_size(value) {
            Some(parsed) => settings.comments_per_page = parsed,
            None => warn!(key, value, "ignoring invalid page size"),
        },
        _ => warn!(key, "ignoring unknown setting"),
    }
}

fn parse_page_size(value: &str) -> Option<NonZeroU64> {
    value.trim().parse::<u64>().ok().and_then(NonZeroU64::new)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
