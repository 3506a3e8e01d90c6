use chatrelay_types::RuntimeConfig;
use serde::{Deserialize, Serialize};

fn default_port() -> u16 {
    3002
}
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}
fn default_timeout_ms() -> u64 {
    100_000
}

/// Environment variables recognized by [`Config::from_env`].
const ENV_KEYS: &[&str] = &[
    "HOST",
    "PORT",
    "AUTH_SECRET_KEY",
    "OPENAI_API_MODEL",
    "API_REVERSE_PROXY",
    "TIMEOUT_MS",
    "SOCKS_PROXY",
    "HTTPS_PROXY",
    "MAX_CACHED_KEYS",
];

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Listen address (defaults to `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port (defaults to 3002).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Shared secret gating `/config` and checked by `/verify`.
    /// Absent or empty means auth is disabled.
    #[serde(default)]
    pub auth_secret_key: Option<String>,
    /// Upstream model identifier.
    #[serde(default = "default_model")]
    pub openai_api_model: String,
    /// Override for the upstream chat-completions endpoint URL.
    #[serde(default)]
    pub api_reverse_proxy: Option<String>,
    /// Overall timeout for single-shot upstream calls, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// SOCKS proxy URL for upstream connections (e.g. `socks5://127.0.0.1:1080`).
    #[serde(default)]
    pub socks_proxy: Option<String>,
    /// HTTPS proxy URL for upstream connections.
    #[serde(default)]
    pub https_proxy: Option<String>,
    /// Upper bound on cached credential handles; unset means unbounded.
    #[serde(default)]
    pub max_cached_keys: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            auth_secret_key: None,
            openai_api_model: default_model(),
            api_reverse_proxy: None,
            timeout_ms: default_timeout_ms(),
            socks_proxy: None,
            https_proxy: None,
            max_cached_keys: None,
        }
    }
}

impl Config {
    /// Loads configuration from process environment variables, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if a variable fails to parse (e.g. a
    /// non-numeric `PORT`).
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Serialized},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::raw().only(ENV_KEYS))
            .extract()
    }

    /// Loads configuration from a YAML file, with environment variables taking
    /// precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the file cannot be read or parsed.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: &std::path::Path) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Env, Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::raw().only(ENV_KEYS))
            .extract()
    }

    /// Parses configuration from a YAML string, merged with defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`figment::Error`] if the YAML is invalid.
    #[allow(clippy::result_large_err)]
    pub fn from_yaml(yaml: &str) -> Result<Self, figment::Error> {
        use figment::{
            Figment,
            providers::{Format as _, Serialized, Yaml},
        };
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml))
            .extract()
    }

    /// Whether a non-empty shared secret is configured.
    #[must_use]
    pub fn auth_enabled(&self) -> bool {
        self.auth_secret_key
            .as_deref()
            .is_some_and(|s| !s.is_empty())
    }

    /// Snapshot of the runtime settings served by `/config`.
    #[must_use]
    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            api_model: self.openai_api_model.clone(),
            reverse_proxy: self.api_reverse_proxy.clone(),
            timeout_ms: self.timeout_ms,
            socks_proxy: self.socks_proxy.clone(),
            https_proxy: self.https_proxy.clone(),
        }
    }
}
