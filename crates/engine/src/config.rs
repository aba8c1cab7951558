//! Engine configuration and its environment overrides.

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Selects the strategy (`auto`, `native` or `delegated`).
pub const STRATEGY_ENV: &str = "STAGE_SYNC_STRATEGY";
/// Names the mirroring tool, either a bare name or an explicit path.
pub const RSYNC_PROGRAM_ENV: &str = "STAGE_SYNC_RSYNC";
/// Default timeout in whole seconds; `0` means unbounded.
pub const TIMEOUT_ENV: &str = "STAGE_SYNC_TIMEOUT";

/// Program used by the delegated strategy unless configured otherwise.
pub const DEFAULT_PROGRAM: &str = "rsync";

/// Which synchronization strategy to run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Strategy {
    /// Delegated when the tool is available, native otherwise.
    #[default]
    Auto,
    /// Always the built-in recursive copier.
    Native,
    /// Always the external tool; selection fails when it is missing.
    Delegated,
}

impl Strategy {
    /// Returns the lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Native => "native",
            Self::Delegated => "delegated",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "native" => Ok(Self::Native),
            "delegated" | "rsync" => Ok(Self::Delegated),
            _ => Err(ConfigError::InvalidStrategy {
                value: value.to_string(),
            }),
        }
    }
}

/// Error produced when a configuration value cannot be parsed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// The strategy name is not recognized.
    #[error("unknown sync strategy '{value}' (expected auto, native or delegated)")]
    InvalidStrategy {
        /// The rejected value.
        value: String,
    },
    /// The timeout is not a whole number of seconds.
    #[error("invalid STAGE_SYNC_TIMEOUT value '{value}' (expected whole seconds)")]
    InvalidTimeout {
        /// The rejected value.
        value: String,
    },
    /// A variable is set but is not valid Unicode.
    #[error("{variable} is not valid unicode")]
    NotUnicode {
        /// The variable name.
        variable: &'static str,
    },
}

/// Settings shared by every run of a [`StrategySelector`](crate::StrategySelector).
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    strategy: Strategy,
    program: OsString,
    default_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Auto,
            program: OsString::from(DEFAULT_PROGRAM),
            default_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration: automatic selection, `rsync`, and
    /// no timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var_os(name))
    }

    /// Reads overrides through `lookup`, which maps a variable name to its
    /// value. Unset and empty variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut config = Self::default();
        let present = |name: &'static str| lookup(name).filter(|value| !value.is_empty());

        if let Some(value) = present(STRATEGY_ENV) {
            config.strategy = unicode(STRATEGY_ENV, &value)?.parse()?;
        }
        if let Some(value) = present(RSYNC_PROGRAM_ENV) {
            config.program = value;
        }
        if let Some(value) = present(TIMEOUT_ENV) {
            config.default_timeout = parse_timeout(unicode(TIMEOUT_ENV, &value)?)?;
        }
        Ok(config)
    }

    /// Forces a strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the mirroring tool.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the timeout applied to requests that carry none.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// The configured strategy.
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The mirroring tool.
    #[must_use]
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// The timeout applied to requests that carry none.
    #[must_use]
    pub const fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }
}

fn unicode<'v>(variable: &'static str, value: &'v OsStr) -> Result<&'v str, ConfigError> {
    value.to_str().ok_or(ConfigError::NotUnicode { variable })
}

fn parse_timeout(value: &str) -> Result<Option<Duration>, ConfigError> {
    let seconds: u64 = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidTimeout {
            value: value.to_string(),
        })?;
    Ok((seconds > 0).then(|| Duration::from_secs(seconds)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), OsString::from(value)))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_without_overrides() {
        let config = EngineConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.strategy(), Strategy::Auto);
        assert_eq!(config.program(), "rsync");
        assert_eq!(config.default_timeout(), None);
    }

    #[test]
    fn reads_every_override() {
        let config = EngineConfig::from_lookup(lookup(&[
            (STRATEGY_ENV, "Native"),
            (RSYNC_PROGRAM_ENV, "/opt/bin/rsync"),
            (TIMEOUT_ENV, "30"),
        ]))
        .unwrap();
        assert_eq!(config.strategy(), Strategy::Native);
        assert_eq!(config.program(), "/opt/bin/rsync");
        assert_eq!(config.default_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn zero_timeout_is_unbounded() {
        let config = EngineConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "0")])).unwrap();
        assert_eq!(config.default_timeout(), None);
    }

    #[test]
    fn empty_values_keep_defaults() {
        let config =
            EngineConfig::from_lookup(lookup(&[(STRATEGY_ENV, ""), (RSYNC_PROGRAM_ENV, "")]))
                .unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            EngineConfig::from_lookup(lookup(&[(STRATEGY_ENV, "fastest")])).unwrap_err(),
            ConfigError::InvalidStrategy {
                value: "fastest".to_string()
            }
        );
        assert!(matches!(
            EngineConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "1.5")])),
            Err(ConfigError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn strategy_round_trips_through_display() {
        for strategy in [Strategy::Auto, Strategy::Native, Strategy::Delegated] {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!("rsync".parse::<Strategy>().unwrap(), Strategy::Delegated);
    }

    #[test]
    fn builders_override_fields() {
        let config = EngineConfig::new()
            .with_strategy(Strategy::Delegated)
            .with_program("openrsync")
            .with_default_timeout(Some(Duration::from_secs(5)));
        assert_eq!(config.strategy(), Strategy::Delegated);
        assert_eq!(config.program(), "openrsync");
        assert_eq!(config.default_timeout(), Some(Duration::from_secs(5)));
    }
}
