//! Logger builder: installs a global `tracing_subscriber` from [`Config`].

use tracing_subscriber::EnvFilter;

use crate::config::{Config, Format};

/// Guard returned by [`LoggerBuilder::build`]. Dropping it does not tear
/// down the subscriber (it is installed globally via `set_global_default`);
/// the guard exists so callers have a value to hold for the lifetime of
/// `main`, matching the teacher's `LoggerGuard` RAII idiom.
#[derive(Debug)]
pub struct LoggerGuard {
    _private: (),
}

/// Builds and installs the global tracing subscriber from a [`Config`].
#[derive(Debug, Default)]
pub struct LoggerBuilder {
    config: Config,
}

impl LoggerBuilder {
    /// Start from an explicit configuration.
    #[must_use]
    pub fn from_config(config: Config) -> Self {
        Self { config }
    }

    /// Start from the process environment (`LOG_LEVEL`, `LOG_FORMAT`, `LOG_TIMESTAMPS`).
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            config: Config::from_env(),
        }
    }

    /// Build the subscriber and install it as the global default.
    ///
    /// # Errors
    ///
    /// Returns an error string if a global subscriber is already installed.
    pub fn build(self) -> Result<LoggerGuard, String> {
        let filter = EnvFilter::try_new(&self.config.level)
            .map_err(|e| format!("invalid log level {:?}: {e}", self.config.level))?;

        let result = match (self.config.format, self.config.timestamps) {
            (Format::Json, true) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .try_init(),
            (Format::Json, false) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .without_time()
                .try_init(),
            (Format::Text, true) => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
            (Format::Text, false) => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .without_time()
                .try_init(),
        };

        result
            .map(|()| LoggerGuard { _private: () })
            .map_err(|e| e.to_string())
    }
}
