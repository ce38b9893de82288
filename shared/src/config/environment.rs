//! Deployment environment and log output settings

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// Deployment environment, read from `ENVIRONMENT`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// Unset or unrecognised values mean development
    pub fn from_env() -> Self {
        env::var("ENVIRONMENT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        })
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// How the tracing subscriber renders events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

/// Subscriber settings consumed by the binary's telemetry setup
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for the HeartCast crates (trace, debug, info, warn, error)
    pub level: String,
    pub format: LogFormat,
    /// ANSI colours; ignored by the json format
    pub colored: bool,
    /// File and line in each event
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: LogFormat::Pretty,
            colored: true,
            source_location: false,
        }
    }
}

impl LoggingConfig {
    /// Verbose, coloured output in development and plain json elsewhere
    pub fn for_environment(env: Environment) -> Self {
        if env == Environment::Development {
            Self {
                level: String::from("debug"),
                source_location: true,
                ..Self::default()
            }
        } else {
            Self {
                format: LogFormat::Json,
                colored: false,
                ..Self::default()
            }
        }
    }

    /// Environment defaults overridden by `LOG_LEVEL` / `LOG_FORMAT`
    pub fn from_env(env: Environment) -> Self {
        let mut config = Self::for_environment(env);
        if let Ok(level) = env::var("LOG_LEVEL") {
            config.level = level;
        }
        if let Some(format) = env::var("LOG_FORMAT").ok().and_then(|v| v.parse().ok()) {
            config.format = format;
        }
        config
    }

    /// Filter directive for the tracing subscriber.
    ///
    /// Our own crates log at the configured level; noisy dependencies are capped at warn.
    pub fn filter_directive(&self) -> String {
        format!(
            "{level},hc_core={level},hc_infra={level},hc_api={level},sqlx=warn,hyper=warn,reqwest=warn",
            level = self.level
        )
    }
}
