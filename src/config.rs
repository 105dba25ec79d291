//! Configuration types.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Onboarding runtime configuration.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Minimum spacing between two accepted stepper events.
    pub throttle_window: Duration,
    /// Base URL of the remote placement service. `None` uses the in-process scorer.
    pub gateway_url: Option<String>,
    /// Upper bound on a single placement request.
    pub gateway_timeout: Duration,
    /// libSQL database file holding the persisted placement.
    pub db_path: PathBuf,
    /// Port for `serve` mode.
    pub port: u16,
    /// Route the user is sent to once the placement is stored.
    pub redirect_route: String,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            throttle_window: Duration::from_millis(250),
            gateway_url: None,
            gateway_timeout: Duration::from_secs(30),
            db_path: PathBuf::from("./data/onboarding.db"),
            port: 8080,
            redirect_route: "/dashboard".to_string(),
        }
    }
}

impl OnboardingConfig {
    /// Build from `ONBOARDING_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let throttle_ms: u64 = parse_var(&lookup, "ONBOARDING_THROTTLE_MS")?
            .unwrap_or(defaults.throttle_window.as_millis() as u64);
        let timeout_secs: u64 = parse_var(&lookup, "ONBOARDING_GATEWAY_TIMEOUT_SECS")?
            .unwrap_or(defaults.gateway_timeout.as_secs());
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ONBOARDING_GATEWAY_TIMEOUT_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        let gateway_url = lookup("ONBOARDING_GATEWAY_URL")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        let redirect_route = lookup("ONBOARDING_REDIRECT_ROUTE")
            .map(|route| route.trim().to_string())
            .filter(|route| !route.is_empty())
            .unwrap_or(defaults.redirect_route);

        Ok(Self {
            throttle_window: Duration::from_millis(throttle_ms),
            gateway_url,
            gateway_timeout: Duration::from_secs(timeout_secs),
            db_path: lookup("ONBOARDING_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            port: parse_var(&lookup, "ONBOARDING_PORT")?.unwrap_or(defaults.port),
            redirect_route,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{raw:?}: {e}"),
            }),
    }
}
