//! Configuration system for the `Taskline` client.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/taskline/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.
//!
//! The advisory API key is never read from the config file, only from the
//! environment variable named by `advisory.api_key_env`.

use std::path::PathBuf;
use std::time::Duration;

use crate::advisory::AdvisorConfig;
use crate::form::DEFAULT_MIN_NAME_LEN;

/// Default OpenAI-compatible chat completions endpoint.
pub const DEFAULT_ADVISORY_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default model requested from the advisory endpoint.
pub const DEFAULT_ADVISORY_MODEL: &str = "gpt-4o-mini";

/// Default environment variable holding the advisory API key.
pub const DEFAULT_API_KEY_ENV: &str = "TASKLINE_API_KEY";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The advisory endpoint is not a valid URL.
    #[error("invalid advisory endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        /// The rejected value.
        endpoint: String,
        /// Parse failure.
        source: url::ParseError,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    advisory: AdvisoryFileConfig,
    ui: UiFileConfig,
    form: FormFileConfig,
}

/// `[advisory]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct AdvisoryFileConfig {
    endpoint: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
    request_timeout_secs: Option<u64>,
    event_buffer: Option<usize>,
}

/// `[ui]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    deadline_format: Option<String>,
}

/// `[form]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct FormFileConfig {
    min_name_len: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    // -- Advisory --
    /// Chat completions endpoint URL (validated at load time).
    pub advisory_endpoint: String,
    /// Model name sent with each request.
    pub advisory_model: String,
    /// Name of the environment variable that holds the API key.
    pub api_key_env: String,
    /// Optional transport timeout. `None` waits indefinitely; a configured
    /// value of `0` also means no timeout.
    pub request_timeout: Option<Duration>,
    /// Capacity of the advisory event channel.
    pub event_buffer: usize,

    // -- UI --
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// Deadline display format string (chrono).
    pub deadline_format: String,

    // -- Form --
    /// Minimum task name length in characters, after trimming. Never below
    /// [`DEFAULT_MIN_NAME_LEN`].
    pub min_name_len: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            advisory_endpoint: DEFAULT_ADVISORY_ENDPOINT.to_string(),
            advisory_model: DEFAULT_ADVISORY_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            request_timeout: None,
            event_buffer: 16,
            poll_timeout: Duration::from_millis(50),
            deadline_format: "%Y-%m-%d %H:%M".to_string(),
            min_name_len: DEFAULT_MIN_NAME_LEN,
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an error.
    /// If no `--config` is given, the default path
    /// (`~/.config/taskline/config.toml`) is tried and silently ignored if
    /// missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or if the resolved advisory endpoint is not a valid URL.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve a `ClientConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let advisory_endpoint = match cli
            .advisory_endpoint
            .as_ref()
            .or(file.advisory.endpoint.as_ref())
        {
            Some(raw) => {
                url::Url::parse(raw).map_err(|source| ConfigError::InvalidEndpoint {
                    endpoint: raw.clone(),
                    source,
                })?;
                raw.clone()
            }
            None => defaults.advisory_endpoint,
        };

        Ok(Self {
            advisory_endpoint,
            advisory_model: cli
                .advisory_model
                .clone()
                .or_else(|| file.advisory.model.clone())
                .unwrap_or(defaults.advisory_model),
            api_key_env: file
                .advisory
                .api_key_env
                .clone()
                .unwrap_or(defaults.api_key_env),
            request_timeout: file
                .advisory
                .request_timeout_secs
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs)
                .or(defaults.request_timeout),
            event_buffer: file
                .advisory
                .event_buffer
                .unwrap_or(defaults.event_buffer),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            deadline_format: cli
                .deadline_format
                .clone()
                .or_else(|| file.ui.deadline_format.clone())
                .unwrap_or(defaults.deadline_format),
            // Names shorter than the default are never allowed into the store.
            min_name_len: file
                .form
                .min_name_len
                .map_or(defaults.min_name_len, |n| n.max(DEFAULT_MIN_NAME_LEN)),
        })
    }

    /// Build an [`AdvisorConfig`] if an API key is present in the
    /// configured environment variable.
    ///
    /// Returns `None` when the key is unset or empty (advice disabled).
    #[must_use]
    pub fn to_advisor_config(&self) -> Option<AdvisorConfig> {
        let api_key = std::env::var(&self.api_key_env).ok()?;
        self.advisor_config_with_key(api_key)
    }

    /// Build an [`AdvisorConfig`] from an explicit key.
    ///
    /// Returns `None` for a blank key or an unparseable endpoint.
    fn advisor_config_with_key(&self, api_key: String) -> Option<AdvisorConfig> {
        if api_key.trim().is_empty() {
            return None;
        }
        let endpoint = url::Url::parse(&self.advisory_endpoint).ok()?;
        Some(AdvisorConfig {
            endpoint,
            model: self.advisory_model.clone(),
            api_key,
            request_timeout: self.request_timeout,
        })
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Terminal task list with priority ordering")]
pub struct CliArgs {
    /// Chat completions endpoint used for advice.
    #[arg(long, env = "TASKLINE_ADVISORY_ENDPOINT")]
    pub advisory_endpoint: Option<String>,

    /// Model name requested from the advisory endpoint.
    #[arg(long, env = "TASKLINE_ADVISORY_MODEL")]
    pub advisory_model: Option<String>,

    /// Path to config file (default: `~/.config/taskline/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Deadline display format (chrono format string).
    #[arg(long)]
    pub deadline_format: Option<String>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "TASKLINE_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/taskline.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("taskline").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
