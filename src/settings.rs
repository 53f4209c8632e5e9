use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "qr_register.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub endpoint: String,
    pub toast_seconds: u64,
    pub request_timeout_secs: Option<u64>,
    pub translations_path: Option<PathBuf>,
    pub preview_max_dimension: f32,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: "https://qr.abdugafforov.uz/register/".into(),
            toast_seconds: 3,
            request_timeout_secs: None,
            translations_path: None,
            preview_max_dimension: 192.0,
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    endpoint: Option<String>,
    toast_seconds: Option<u64>,
    request_timeout_secs: Option<u64>,
    translations_path: Option<PathBuf>,
    preview_max_dimension: Option<f32>,
    log_filter: Option<String>,
}

/// Defaults, then `qr_register.toml` in the working directory, then environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    let path = Path::new(SETTINGS_FILE);
    if path.exists() {
        apply_file(&mut settings, path)?;
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    apply_toml(settings, &raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

fn apply_toml(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file: SettingsFile = toml::from_str(raw)?;
    if let Some(v) = file.endpoint {
        settings.endpoint = v;
    }
    if let Some(v) = file.toast_seconds {
        settings.toast_seconds = v;
    }
    if let Some(v) = file.request_timeout_secs {
        settings.request_timeout_secs = Some(v);
    }
    if let Some(v) = file.translations_path {
        settings.translations_path = Some(v);
    }
    if let Some(v) = file.preview_max_dimension {
        settings.preview_max_dimension = v;
    }
    if let Some(v) = file.log_filter {
        settings.log_filter = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("QR_REGISTER_ENDPOINT") {
        settings.endpoint = v;
    }
    if let Some(v) = var("QR_REGISTER_TOAST_SECONDS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.toast_seconds = parsed;
        }
    }
    if let Some(v) = var("QR_REGISTER_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = Some(parsed);
        }
    }
    if let Some(v) = var("QR_REGISTER_TRANSLATIONS") {
        settings.translations_path = Some(PathBuf::from(v));
    }
}
