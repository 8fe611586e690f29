//! Logging configuration read from the environment (§6 Environment variables).

use std::env;

/// Output encoding for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Human-readable text, one line per event.
    Text,
    /// Newline-delimited JSON, one object per event.
    Json,
}

/// Logger configuration, built from `LOG_LEVEL` / `LOG_FORMAT` / `LOG_TIMESTAMPS`.
#[derive(Debug, Clone)]
pub struct Config {
    /// `debug | info | warn | error`, default `info`.
    pub level: String,
    /// Text or JSON, default text.
    pub format: Format,
    /// Whether to include timestamps in each line, default true.
    pub timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Format::Text,
            timestamps: true,
        }
    }
}

impl Config {
    /// Read configuration from `LOG_LEVEL`, `LOG_FORMAT`, and `LOG_TIMESTAMPS`,
    /// falling back to the default for any unset or unrecognized variable.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = env::var("LOG_LEVEL") {
            if matches!(level.as_str(), "debug" | "info" | "warn" | "error") {
                config.level = level;
            }
        }

        if let Ok(format) = env::var("LOG_FORMAT") {
            config.format = match format.as_str() {
                "json" => Format::Json,
                _ => Format::Text,
            };
        }

        if let Ok(timestamps) = env::var("LOG_TIMESTAMPS") {
            config.timestamps = timestamps != "false";
        }

        config
    }
}
