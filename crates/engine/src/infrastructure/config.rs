//! Engine configuration from environment variables.
//!
//! | variable | default |
//! |---|---|
//! | `MECHANIST_MAX_ATTRIBUTE_STEPS` | `1000` |
//! | `MECHANIST_MAX_ATTRIBUTE_NESTING` | `64` (at most `128`) |
//! | `MECHANIST_BAN_WINDOW_MS` | `1000` |
//! | `MECHANIST_SERVER_VERSION` | `1.21.4` |
//! | `MECHANIST_LOG` | `mechanist_engine=info` |

use std::str::FromStr;

use chrono::Duration;
use mechanist_domain::ServerVersion;

pub const MAX_ATTRIBUTE_STEPS_VAR: &str = "MECHANIST_MAX_ATTRIBUTE_STEPS";
pub const MAX_ATTRIBUTE_NESTING_VAR: &str = "MECHANIST_MAX_ATTRIBUTE_NESTING";
pub const BAN_WINDOW_MS_VAR: &str = "MECHANIST_BAN_WINDOW_MS";
pub const SERVER_VERSION_VAR: &str = "MECHANIST_SERVER_VERSION";
pub const LOG_VAR: &str = "MECHANIST_LOG";

pub const DEFAULT_MAX_ATTRIBUTE_STEPS: usize = 1000;
pub const DEFAULT_MAX_ATTRIBUTE_NESTING: usize = 64;
/// Highest accepted nesting cap; deeper tag recursion risks the thread stack.
pub const MAX_ATTRIBUTE_NESTING_LIMIT: usize = 128;
pub const DEFAULT_BAN_WINDOW_MS: i64 = 1000;
pub const DEFAULT_SERVER_VERSION: ServerVersion = ServerVersion::new(1, 21, 4);
pub const DEFAULT_LOG_FILTER: &str = "mechanist_engine=info";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Cap on attribute steps dispatched within one resolution request
    pub max_attribute_steps: usize,
    /// Cap on nested resolutions started by tag handlers within one request
    pub max_attribute_nesting: usize,
    /// How recent a ban must be for a kick to count as a ban
    pub ban_window: Duration,
    pub server_version: ServerVersion,
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_attribute_steps: DEFAULT_MAX_ATTRIBUTE_STEPS,
            max_attribute_nesting: DEFAULT_MAX_ATTRIBUTE_NESTING,
            ban_window: Duration::milliseconds(DEFAULT_BAN_WINDOW_MS),
            server_version: DEFAULT_SERVER_VERSION,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys keep their
    /// defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(raw) = get(MAX_ATTRIBUTE_STEPS_VAR) {
            let steps: usize = parse(MAX_ATTRIBUTE_STEPS_VAR, &raw)?;
            if steps == 0 {
                return Err(ConfigError::invalid(
                    MAX_ATTRIBUTE_STEPS_VAR,
                    &raw,
                    "must be at least 1",
                ));
            }
            config.max_attribute_steps = steps;
        }

        if let Some(raw) = get(MAX_ATTRIBUTE_NESTING_VAR) {
            let nesting: usize = parse(MAX_ATTRIBUTE_NESTING_VAR, &raw)?;
            if !(1..=MAX_ATTRIBUTE_NESTING_LIMIT).contains(&nesting) {
                return Err(ConfigError::invalid(
                    MAX_ATTRIBUTE_NESTING_VAR,
                    &raw,
                    format!("must be between 1 and {}", MAX_ATTRIBUTE_NESTING_LIMIT),
                ));
            }
            config.max_attribute_nesting = nesting;
        }

        if let Some(raw) = get(BAN_WINDOW_MS_VAR) {
            let millis: i64 = parse(BAN_WINDOW_MS_VAR, &raw)?;
            if millis <= 0 {
                return Err(ConfigError::invalid(BAN_WINDOW_MS_VAR, &raw, "must be positive"));
            }
            config.ban_window = Duration::milliseconds(millis);
        }

        if let Some(raw) = get(SERVER_VERSION_VAR) {
            config.server_version = parse(SERVER_VERSION_VAR, &raw)?;
        }

        if let Some(raw) = get(LOG_VAR) {
            config.log_filter = raw;
        }

        Ok(config)
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::invalid(key, raw, e))
}
