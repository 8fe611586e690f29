//! Layered server configuration (§10.4): defaults → optional TOML file →
//! environment (`FLOWMIND_*`) → CLI flag overrides, applied in that order —
//! the teacher's `apps/cli` dependency on `figment` for defaults/file/env,
//! with CLI flags folded in last as the outermost, highest-precedence layer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::collaborators::default_checkpoint_dir;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServeConfig {
    pub port: u16,
    pub jwt_secret: Option<String>,
    #[serde(default)]
    pub api_keys: Vec<String>,
    pub rate_limit: Option<u32>,
    #[serde(default)]
    pub no_auth: bool,
    pub checkpoint_dir: PathBuf,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            jwt_secret: None,
            api_keys: Vec::new(),
            rate_limit: None,
            no_auth: false,
            checkpoint_dir: default_checkpoint_dir(),
        }
    }
}

impl ServeConfig {
    /// Build the defaults → file → env layering. CLI flags are applied
    /// separately via [`ServeConfig::apply_cli_overrides`], after this call.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("FLOWMIND_"));
        Ok(figment.extract()?)
    }

    /// Fold in explicit CLI flags, the outermost layer. `None`/empty means
    /// "flag not passed"; clap gives `--port`/`--rate-limit`/etc. no
    /// default, so only an explicit flag reaches here as `Some`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn apply_cli_overrides(
        mut self,
        port: Option<u16>,
        jwt_secret: Option<String>,
        api_keys: Vec<String>,
        rate_limit: Option<u32>,
        no_auth: bool,
        checkpoint_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        if jwt_secret.is_some() {
            self.jwt_secret = jwt_secret;
        }
        if !api_keys.is_empty() {
            self.api_keys = api_keys;
        }
        if rate_limit.is_some() {
            self.rate_limit = rate_limit;
        }
        self.no_auth = self.no_auth || no_auth;
        if let Some(dir) = checkpoint_dir {
            self.checkpoint_dir = dir;
        }
        self
    }

    /// `KEY:ROLE` entries parsed into a lookup map; malformed entries
    /// (no `:`) are dropped rather than failing startup.
    #[must_use]
    pub fn parsed_api_keys(&self) -> HashMap<String, String> {
        self.api_keys
            .iter()
            .filter_map(|entry| entry.split_once(':'))
            .map(|(key, role)| (key.to_string(), role.to_string()))
            .collect()
    }
}
