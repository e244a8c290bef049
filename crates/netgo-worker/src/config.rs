//! Worker configuration.
//!
//! The worker has no configuration files. On the web, settings are read from
//! the query string of the worker's own script URL, which is the bootstrap
//! script, for example `netgo-scoring-worker-bootstrap.js?log=debug&trace=1`.

use std::str::FromStr;

use log::LevelFilter;

/// Names of the scoring application's ports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortNames {
    /// Port receiving games to score.
    pub inbound: String,
    /// Port emitting scored games.
    pub outbound: String,
}

impl Default for PortNames {
    fn default() -> Self {
        Self {
            inbound: "receiveSentGame".to_owned(),
            outbound: "returnScoreGame".to_owned(),
        }
    }
}

/// Settings for the bridge and the worker that hosts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Maximum level emitted by the worker logger.
    pub log_level: LevelFilter,
    /// Log every relayed payload at debug level.
    pub trace_payloads: bool,
    /// Scoring application port names.
    pub ports: PortNames,
    /// Script loaded with `importScripts` before the application starts.
    pub scoring_script: String,
    /// Dot-separated path below the `Elm` global to the application module.
    pub scoring_module: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            trace_payloads: false,
            ports: PortNames::default(),
            scoring_script: "scoring-worker.js".to_owned(),
            scoring_module: "ScoringWorker".to_owned(),
        }
    }
}

/// A configuration entry that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    /// The key is not a known setting.
    #[display("unknown setting `{key}`")]
    UnknownKey {
        /// Offending key.
        key: String,
    },
    /// The value does not parse for this key.
    #[display("invalid value `{value}` for `{key}`")]
    InvalidValue {
        /// Setting name.
        key: String,
        /// Offending value.
        value: String,
    },
}

impl BridgeConfig {
    /// Every key [`BridgeConfig::apply`] accepts.
    pub const KEYS: [&'static str; 6] = ["log", "trace", "inbound", "outbound", "script", "module"];

    /// Applies one `key=value` setting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownKey`] for an unsupported key and
    /// [`ConfigError::InvalidValue`] for a value that does not parse or is
    /// empty.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_owned(),
            value: value.to_owned(),
        };
        let non_empty = |value: &str| {
            if value.is_empty() {
                Err(invalid())
            } else {
                Ok(value.to_owned())
            }
        };

        match key {
            "log" => self.log_level = LevelFilter::from_str(value).map_err(|_| invalid())?,
            "trace" => self.trace_payloads = parse_flag(value).ok_or_else(invalid)?,
            "inbound" => self.ports.inbound = non_empty(value)?,
            "outbound" => self.ports.outbound = non_empty(value)?,
            "script" => self.scoring_script = non_empty(value)?,
            "module" => self.scoring_module = non_empty(value)?,
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_owned(),
                });
            }
        }
        Ok(())
    }

    /// Builds a configuration from defaults and a sequence of settings.
    ///
    /// # Errors
    ///
    /// Stops at the first entry [`BridgeConfig::apply`] rejects.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in pairs {
            config.apply(key, value)?;
        }
        Ok(config)
    }

    /// Builds a configuration from defaults, asking `lookup` for each of
    /// [`BridgeConfig::KEYS`].
    ///
    /// Entries that [`BridgeConfig::apply`] rejects are logged at `warn` and
    /// skipped.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for key in Self::KEYS {
            let Some(value) = lookup(key) else {
                continue;
            };
            if let Err(err) = config.apply(key, &value) {
                log::warn!("ignoring worker setting: {err}");
            }
        }
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "" | "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
