use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::models::Locale;

const DEFAULT_MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; unset ones fall back to the defaults below.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub locale: Locale,
    pub export_dir: PathBuf,
    /// External HTML→PDF converter. Without one, exports are written as HTML.
    pub pdf_command: Option<String>,
    pub pdf_command_args: Vec<String>,
    /// Outbox directory used for sharing. Without one, sharing is unavailable.
    pub share_dir: Option<PathBuf>,
    pub photo_uploads_enabled: bool,
    pub max_photo_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            locale: Locale::Es,
            export_dir: std::env::temp_dir().join("cv-exports"),
            pdf_command: None,
            pdf_command_args: Vec::new(),
            share_dir: None,
            photo_uploads_enabled: true,
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: match optional_env("PORT") {
                Some(port) => port
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            locale: match optional_env("CV_LOCALE") {
                Some(locale) => locale
                    .parse::<Locale>()
                    .map_err(anyhow::Error::msg)
                    .context("CV_LOCALE is invalid")?,
                None => defaults.locale,
            },
            export_dir: optional_env("EXPORT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.export_dir),
            pdf_command: optional_env("PDF_COMMAND"),
            pdf_command_args: optional_env("PDF_COMMAND_ARGS")
                .map(|args| args.split_whitespace().map(str::to_string).collect())
                .unwrap_or_default(),
            share_dir: optional_env("SHARE_DIR").map(PathBuf::from),
            photo_uploads_enabled: match optional_env("PHOTO_UPLOADS_ENABLED") {
                Some(flag) => parse_bool(&flag)
                    .with_context(|| format!("PHOTO_UPLOADS_ENABLED must be a boolean, got '{flag}'"))?,
                None => defaults.photo_uploads_enabled,
            },
            max_photo_bytes: match optional_env("MAX_PHOTO_BYTES") {
                Some(max) => max
                    .parse::<usize>()
                    .context("MAX_PHOTO_BYTES must be a byte count")?,
                None => defaults.max_photo_bytes,
            },
        })
    }
}

/// Unset and blank variables both read as `None`.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
