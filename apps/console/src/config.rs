use std::{collections::HashMap, fs, path::Path};

use client_core::{DEFAULT_API_BASE, DEFAULT_AUTO_CLOSE_DELAY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_base: String,
    pub auto_close_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.into(),
            auto_close_ms: DEFAULT_AUTO_CLOSE_DELAY.as_millis() as u64,
        }
    }
}

/// Defaults, then the optional TOML file, then environment variables.
pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings.api_base = normalize_api_base(&settings.api_base);
    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        tracing::warn!("ignoring malformed console config");
        return;
    };
    if let Some(v) = file_cfg.get("api_base").and_then(|v| v.as_str()) {
        settings.api_base = v.to_string();
    }
    if let Some(v) = file_cfg.get("auto_close_ms").and_then(|v| v.as_integer()) {
        if let Ok(parsed) = u64::try_from(v) {
            settings.auto_close_ms = parsed;
        }
    }
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("API_BASE") {
        settings.api_base = v;
    }
    if let Some(v) = lookup("APP__API_BASE") {
        settings.api_base = v;
    }

    if let Some(v) = lookup("APP__AUTO_CLOSE_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.auto_close_ms = parsed;
        }
    }
}

pub fn normalize_api_base(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Settings::default().api_base;
    }
    if trimmed.contains("://") {
        return trimmed.to_string();
    }
    format!("http://{trimmed}")
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
