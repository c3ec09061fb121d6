use std::env;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required but not set")]
    Missing(&'static str),

    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the outbound Gemini call.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini: GeminiSettings,
    pub validate_cards: bool,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let model = lookup("GEMINI_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_base = lookup("GEMINI_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match lookup("UPSTREAM_TIMEOUT_SECS") {
            None => DEFAULT_TIMEOUT_SECS,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(n) if n > 0 => n,
                Ok(_) => return Err(invalid("UPSTREAM_TIMEOUT_SECS", raw, "must be positive")),
                Err(e) => return Err(invalid("UPSTREAM_TIMEOUT_SECS", raw, e)),
            },
        };

        let validate_cards = match lookup("VALET_VALIDATE_CARDS") {
            None => false,
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| invalid("VALET_VALIDATE_CARDS", raw, "expected true or false"))?,
        };

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = match lookup("PORT") {
            None => 8080,
            Some(raw) => raw.trim().parse().map_err(|e| invalid("PORT", raw, e))?,
        };
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|e| invalid("HOST", host.clone(), e))?;

        Ok(Self {
            gemini: GeminiSettings {
                api_key,
                model,
                api_base,
                timeout: Duration::from_secs(timeout_secs),
            },
            validate_cards,
            addr,
        })
    }
}

fn invalid(key: &'static str, value: String, reason: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        key,
        value,
        reason: reason.to_string(),
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
