//! Configuration Module
//!
//! Handles loading and managing driver configuration from environment variables.

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// How `remember` behaves when several callers miss the same key at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RememberPolicy {
    /// Every missing caller runs its own producer (stampedes allowed)
    #[default]
    Independent,
    /// Concurrent misses on one key wait for the first producer and re-read
    SingleFlight,
}

impl FromStr for RememberPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "independent" => Ok(Self::Independent),
            "single_flight" | "single-flight" | "singleflight" => Ok(Self::SingleFlight),
            other => Err(format!("unknown remember policy: {other}")),
        }
    }
}

impl fmt::Display for RememberPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Independent => f.write_str("independent"),
            Self::SingleFlight => f.write_str("single_flight"),
        }
    }
}

/// Driver configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverConfig {
    /// Deduplication policy for concurrent `remember` misses
    pub remember_policy: RememberPolicy,
    /// Whether an `add` that finds the key occupied still arms its TTL timer
    pub arm_ttl_on_failed_add: bool,
}

impl DriverConfig {
    /// Creates a new DriverConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_REMEMBER_POLICY` - `independent` or `single_flight` (default: independent)
    /// - `CACHE_ARM_TTL_ON_FAILED_ADD` - `true` or `false` (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            remember_policy: env::var("CACHE_REMEMBER_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.remember_policy),
            arm_ttl_on_failed_add: env::var("CACHE_ARM_TTL_ON_FAILED_ADD")
                .ok()
                .and_then(|v| v.trim().to_ascii_lowercase().parse().ok())
                .unwrap_or(defaults.arm_ttl_on_failed_add),
        }
    }

    /// Sets the remember policy
    pub fn with_remember_policy(mut self, policy: RememberPolicy) -> Self {
        self.remember_policy = policy;
        self
    }

    /// Sets whether a failed `add` still arms its TTL timer
    pub fn with_arm_ttl_on_failed_add(mut self, arm: bool) -> Self {
        self.arm_ttl_on_failed_add = arm;
        self
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            remember_policy: RememberPolicy::Independent,
            arm_ttl_on_failed_add: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = DriverConfig::default();
        assert_eq!(config.remember_policy, RememberPolicy::Independent);
        assert!(config.arm_ttl_on_failed_add);
    }

    #[test]
    fn test_config_builder() {
        let config = DriverConfig::default()
            .with_remember_policy(RememberPolicy::SingleFlight)
            .with_arm_ttl_on_failed_add(false);
        assert_eq!(config.remember_policy, RememberPolicy::SingleFlight);
        assert!(!config.arm_ttl_on_failed_add);
    }

    #[test]
    fn test_remember_policy_parse() {
        assert_eq!("independent".parse::<RememberPolicy>(), Ok(RememberPolicy::Independent));
        assert_eq!(" Single_Flight ".parse::<RememberPolicy>(), Ok(RememberPolicy::SingleFlight));
        assert_eq!("single-flight".parse::<RememberPolicy>(), Ok(RememberPolicy::SingleFlight));
        assert!("lru".parse::<RememberPolicy>().is_err());
    }

    #[test]
    fn test_config_serializes_snake_case() {
        let json = serde_json::to_value(DriverConfig::default()).unwrap();
        assert_eq!(json["remember_policy"], "independent");
        assert_eq!(json["arm_ttl_on_failed_add"], true);
    }

    // Single test touches the environment so parallel tests don't race on it.
    #[test]
    fn test_config_from_env() {
        env::remove_var("CACHE_REMEMBER_POLICY");
        env::remove_var("CACHE_ARM_TTL_ON_FAILED_ADD");
        assert_eq!(DriverConfig::from_env(), DriverConfig::default());

        env::set_var("CACHE_REMEMBER_POLICY", "single_flight");
        env::set_var("CACHE_ARM_TTL_ON_FAILED_ADD", "FALSE");
        let config = DriverConfig::from_env();
        assert_eq!(config.remember_policy, RememberPolicy::SingleFlight);
        assert!(!config.arm_ttl_on_failed_add);

        env::set_var("CACHE_REMEMBER_POLICY", "bogus");
        env::set_var("CACHE_ARM_TTL_ON_FAILED_ADD", "maybe");
        assert_eq!(DriverConfig::from_env(), DriverConfig::default());

        env::remove_var("CACHE_REMEMBER_POLICY");
        env::remove_var("CACHE_ARM_TTL_ON_FAILED_ADD");
    }
}
