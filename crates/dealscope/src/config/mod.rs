use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub engine: EngineSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            engine: EngineSettings::from_env()?,
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Engine dials exposed through the environment. Defaults are tuned for
/// typical residential comp density.
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    /// Stop widening the search once this many comps are in the pool.
    pub comp_pool_target: usize,
    /// Hard cap on search-ladder expansion steps.
    pub max_search_expansions: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            comp_pool_target: 5,
            max_search_expansions: 4,
        }
    }
}

impl EngineSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let comp_pool_target = match env::var("APP_COMP_POOL_TARGET") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|target| *target > 0)
                .ok_or(ConfigError::InvalidPoolTarget)?,
            Err(_) => defaults.comp_pool_target,
        };

        let max_search_expansions = match env::var("APP_MAX_SEARCH_EXPANSIONS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidExpansionCap)?,
            Err(_) => defaults.max_search_expansions,
        };

        Ok(Self {
            comp_pool_target,
            max_search_expansions,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPoolTarget,
    InvalidExpansionCap,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPoolTarget => {
                write!(f, "APP_COMP_POOL_TARGET must be a positive integer")
            }
            ConfigError::InvalidExpansionCap => {
                write!(f, "APP_MAX_SEARCH_EXPANSIONS must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_COMP_POOL_TARGET");
        env::remove_var("APP_MAX_SEARCH_EXPANSIONS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.engine.comp_pool_target, 5);
        assert_eq!(config.engine.max_search_expansions, 4);
    }

    #[test]
    fn rejects_zero_pool_target() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_COMP_POOL_TARGET", "0");
        let error = AppConfig::load().expect_err("zero target rejected");
        match error {
            ConfigError::InvalidPoolTarget => {}
            other => panic!("expected pool target error, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn reads_engine_dials_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_COMP_POOL_TARGET", "8");
        env::set_var("APP_MAX_SEARCH_EXPANSIONS", "2");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.engine.comp_pool_target, 8);
        assert_eq!(config.engine.max_search_expansions, 2);
        reset_env();
    }
}
