//! Configuration for the market daemon.
//!
//! Defaults can be overridden with a few environment variables:
//!
//! - `MARKET_TICK_MS`           (default: "5000")
//! - `MARKET_NOTIFY_VISIBLE_MS` (default: "4000")
//! - `MARKET_NOTIFY_EXIT_MS`    (default: "300")
//! - `MARKET_STORE_DIR`         (default: ".market-store")
//! - `MARKET_DATA_PATH`         (optional JSON payload from the data service)
//! - `MARKET_SEED`              (optional RNG seed for a reproducible walk)

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use market_core::NotificationTimings;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid {
        key: String,
        value: String,
        reason: String,
    },
}

/// Daemon configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Interval between price ticks.
    pub tick_interval: Duration,

    /// Notification visible/exit durations.
    pub notifications: NotificationTimings,

    /// Directory holding one file per storage key.
    pub store_dir: PathBuf,

    /// Data-service payload to load listings from. `None` uses the
    /// built-in dataset.
    pub data_path: Option<PathBuf>,

    /// Fixed seed for the price walk.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_interval: market_core::price_feed::DEFAULT_TICK_INTERVAL,
            notifications: NotificationTimings::default(),
            store_dir: PathBuf::from(".market-store"),
            data_path: None,
            seed: None,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to the defaults above.
    pub fn from_env() -> Result<Self, ConfigError> {
        let tick_ms = read_env_or_default("MARKET_TICK_MS", 5000u64)?;
        let visible_ms = read_env_or_default("MARKET_NOTIFY_VISIBLE_MS", 4000u64)?;
        let exit_ms = read_env_or_default("MARKET_NOTIFY_EXIT_MS", 300u64)?;
        let store_dir = env::var("MARKET_STORE_DIR").unwrap_or_else(|_| ".market-store".to_string());
        let data_path = env::var("MARKET_DATA_PATH").ok().filter(|p| !p.is_empty());
        let seed = read_env_optional::<u64>("MARKET_SEED")?;

        if tick_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "MARKET_TICK_MS".to_string(),
                value: "0".to_string(),
                reason: "tick interval must be positive".to_string(),
            });
        }

        Ok(Config {
            tick_interval: Duration::from_millis(tick_ms),
            notifications: NotificationTimings {
                visible: Duration::from_millis(visible_ms),
                exit: Duration::from_millis(exit_ms),
            },
            store_dir: PathBuf::from(store_dir),
            data_path: data_path.map(PathBuf::from),
            seed,
        })
    }
}

pub fn read_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(read_env_optional(key)?.unwrap_or(default))
}

fn read_env_optional<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                key: key.to_string(),
                value: val.clone(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn unset_variable_uses_default() {
        assert_eq!(read_env_or_default("MARKET_TEST_UNSET_9F2", 42u64).unwrap(), 42);
    }

    #[test]
    fn set_variable_is_parsed() {
        env::set_var("MARKET_TEST_TICK_7C1", " 250 ");
        assert_eq!(read_env_or_default("MARKET_TEST_TICK_7C1", 5000u64).unwrap(), 250);
    }

    #[test]
    fn garbage_is_reported_with_its_key() {
        env::set_var("MARKET_TEST_BAD_3A8", "soon");
        let err = read_env_or_default("MARKET_TEST_BAD_3A8", 1u64).unwrap_err();
        assert!(err.to_string().contains("MARKET_TEST_BAD_3A8"));
    }

    #[test]
    fn default_config_matches_reference_timings() {
        let config = Config::default();
        assert_eq!(config.tick_interval, Duration::from_millis(5000));
        assert_eq!(config.notifications.visible, Duration::from_millis(4000));
        assert_eq!(config.notifications.exit, Duration::from_millis(300));
    }
}
