//! Configuration types for catalog client construction.

use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::path::Path;

use config::{Config as HierarchicalConfig, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::debug;

use crate::error::CatalogClientError;

/// Prefix of environment variables read by [CatalogClientConfig::load].
pub const ENV_PREFIX: &str = "BACKSTAGE";

const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for catalog client construction.
#[derive(Clone, Deserialize)]
pub struct CatalogClientConfig {
    /// Base URL of the Backstage backend, e.g. `https://backstage.example.com`.
    pub base_url: String,
    /// Optional bearer token sent with every request.
    #[serde(default)]
    pub token: Option<String>,
    /// Additional headers to include in requests.
    #[serde(default)]
    pub extra_headers: BTreeMap<String, String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Upper bound for a whole request, response body included.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl CatalogClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            extra_headers: BTreeMap::new(),
            user_agent: None,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_token(self, token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..self
        }
    }

    /// Read the configuration from an optional TOML file, overridden by
    /// `BACKSTAGE_*` environment variables (`BACKSTAGE_BASE_URL`,
    /// `BACKSTAGE_TOKEN`, ...).
    pub fn load(file: Option<&Path>) -> Result<Self, CatalogClientError> {
        let mut builder = HierarchicalConfig::builder();
        if let Some(file) = file {
            debug!(file = %file.display(), "reading catalog client config file");
            builder = builder.add_source(File::from(file).format(FileFormat::Toml).required(false));
        }

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

impl Debug for CatalogClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("extra_headers", &self.extra_headers.keys().collect::<Vec<_>>())
            .field("user_agent", &self.user_agent)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
