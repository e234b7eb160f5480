//! Daemon configuration from environment variables

use router_core::{CoreError, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const MANIFEST_PATH_VAR: &str = "EXTERNAL_SERVICES_PATH";
pub const INTERVAL_VAR: &str = "DISCOVERY_INTERVAL_SECS";

const DEFAULT_MANIFEST_PATH: &str = "/etc/router/external-services.yaml";
const DEFAULT_INTERVAL_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// File holding the ExternalService manifests
    pub manifest_path: PathBuf,
    /// Time between two conversion passes
    pub interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = lookup(MANIFEST_PATH_VAR).filter(|p| !p.is_empty()) {
            config.manifest_path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(INTERVAL_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                CoreError::InvalidConfiguration(format!(
                    "{} must be a number of seconds, got {:?}",
                    INTERVAL_VAR, raw
                ))
            })?;
            if secs == 0 {
                return Err(CoreError::InvalidConfiguration(format!(
                    "{} must be greater than zero",
                    INTERVAL_VAR
                )));
            }
            config.interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.interval, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (MANIFEST_PATH_VAR, "/tmp/services.yaml"),
            (INTERVAL_VAR, "5"),
        ]))
        .unwrap();
        assert_eq!(config.manifest_path, PathBuf::from("/tmp/services.yaml"));
        assert_eq!(config.interval, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_interval() {
        let result = Config::from_lookup(lookup(&[(INTERVAL_VAR, "soon")]));
        assert!(matches!(result, Err(CoreError::InvalidConfiguration(_))));

        let result = Config::from_lookup(lookup(&[(INTERVAL_VAR, "0")]));
        assert!(matches!(result, Err(CoreError::InvalidConfiguration(_))));
    }
}
