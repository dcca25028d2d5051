use std::env;

use crate::error::{Error, Result};
use crate::giveaway::models::RollPolicy;

pub const LOG_FILTER_VAR: &str = "NIGHTSONG_LOG";
pub const ROLL_POLICY_VAR: &str = "NIGHTSONG_ROLL_POLICY";
pub const COMMAND_PREFIX_VAR: &str = "NIGHTSONG_COMMAND_PREFIX";

const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_COMMAND_PREFIX: &str = "!";

// Runtime settings of the bot.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    log_filter: String,
    roll_policy: RollPolicy,
    command_prefix: String,
}

impl Config {
    // Loads `.env` (if any) and reads the settings from the environment.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Config::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_filter = match lookup(LOG_FILTER_VAR) {
            Some(value) if value.trim().is_empty() => {
                let message = format!("{} can't be empty.", LOG_FILTER_VAR);
                return Err(Error::Config(message));
            }
            Some(value) => value.trim().to_string(),
            None => DEFAULT_LOG_FILTER.to_string(),
        };

        let roll_policy = match lookup(ROLL_POLICY_VAR) {
            Some(value) => value.parse::<RollPolicy>()?,
            None => RollPolicy::Random,
        };

        // The prefix is matched literally, so it can't contain whitespace.
        let command_prefix = match lookup(COMMAND_PREFIX_VAR) {
            Some(value) if value.is_empty() || value.chars().any(char::is_whitespace) => {
                let message = format!(
                    "{} must be a non-empty string without spaces, got `{}`.",
                    COMMAND_PREFIX_VAR, value
                );
                return Err(Error::Config(message));
            }
            Some(value) => value,
            None => DEFAULT_COMMAND_PREFIX.to_string(),
        };

        Ok(Config {
            log_filter,
            roll_policy,
            command_prefix,
        })
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn roll_policy(&self) -> RollPolicy {
        self.roll_policy
    }

    pub fn command_prefix(&self) -> &str {
        &self.command_prefix
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            roll_policy: RollPolicy::Random,
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::config::Config;
    use crate::error::Error;
    use crate::giveaway::models::RollPolicy;

    fn load(vars: &[(&str, &str)]) -> crate::error::Result<Config> {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<String, String>>();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_for_empty_environment() {
        let config = load(&[]).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.log_filter(), "info");
        assert_eq!(config.roll_policy(), RollPolicy::Random);
        assert_eq!(config.command_prefix(), "!");
    }

    #[test]
    fn test_read_all_settings() {
        let config = load(&[
            ("NIGHTSONG_LOG", "nightsong_giveaways=debug"),
            ("NIGHTSONG_ROLL_POLICY", " Manual "),
            ("NIGHTSONG_COMMAND_PREFIX", "$"),
        ])
        .unwrap();

        assert_eq!(config.log_filter(), "nightsong_giveaways=debug");
        assert_eq!(config.roll_policy(), RollPolicy::Manual);
        assert_eq!(config.command_prefix(), "$");
    }

    #[test]
    fn test_get_error_for_unknown_roll_policy() {
        let result = load(&[("NIGHTSONG_ROLL_POLICY", "weighted")]);

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_get_error_for_invalid_prefix() {
        for prefix in ["", "! "] {
            let result = load(&[("NIGHTSONG_COMMAND_PREFIX", prefix)]);
            assert!(matches!(result, Err(Error::Config(_))));
        }
    }

    #[test]
    fn test_get_error_for_blank_log_filter() {
        let result = load(&[("NIGHTSONG_LOG", "  ")]);

        assert!(matches!(result, Err(Error::Config(_))));
    }
}
