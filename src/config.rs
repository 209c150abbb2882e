/*
 * Responsibility
 * - Load settings from environment variables (PORT, AUTH_TOKENS, NOT_AUTHORIZED_MODE, ...)
 * - Validate them (startup fails when something is missing or malformed)
 */
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

use crate::services::tokens::TokenTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// How "authenticated but lacking a role" is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotAuthorizedMode {
    /// 403 from a dedicated handler.
    Dedicated,
    /// Same answer as an anonymous caller (401).
    Fallback,
}

impl FromStr for NotAuthorizedMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dedicated" => Ok(Self::Dedicated),
            "fallback" => Ok(Self::Fallback),
            _ => Err(ConfigError::Invalid("NOT_AUTHORIZED_MODE")),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    pub auth_tokens: TokenTable,
    pub not_authorized_mode: NotAuthorizedMode,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let raw_tokens = var("AUTH_TOKENS").ok_or(ConfigError::Missing("AUTH_TOKENS"))?;
        let auth_tokens = TokenTable::parse(&raw_tokens).map_err(|err| {
            tracing::error!(error = %err, "AUTH_TOKENS could not be parsed");
            ConfigError::Invalid("AUTH_TOKENS")
        })?;

        let not_authorized_mode = match var("NOT_AUTHORIZED_MODE") {
            Some(s) => s.parse()?,
            None => NotAuthorizedMode::Dedicated,
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth_tokens,
            not_authorized_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_tokens_are_set() {
        let config = config(&[("AUTH_TOKENS", "t1=alice:admin")]).unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.not_authorized_mode, NotAuthorizedMode::Dedicated);
        assert!(config.cors_allowed_origins.is_empty());
        assert_eq!(config.auth_tokens.len(), 1);
    }

    #[test]
    fn missing_tokens_fail_startup() {
        let err = config(&[]).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("AUTH_TOKENS")));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = config(&[("AUTH_TOKENS", "t1=alice"), ("NOT_AUTHORIZED_MODE", "deny")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("NOT_AUTHORIZED_MODE")));
    }

    #[test]
    fn explicit_values_are_read() {
        let config = config(&[
            ("AUTH_TOKENS", "t1=alice"),
            ("NOT_AUTHORIZED_MODE", "Fallback"),
            ("APP_ENV", "prod"),
            ("PORT", "8080"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
        ])
        .unwrap();

        assert_eq!(config.not_authorized_mode, NotAuthorizedMode::Fallback);
        assert!(config.app_env.is_production());
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn malformed_port_is_rejected() {
        let err = config(&[("AUTH_TOKENS", "t1=alice"), ("PORT", "http")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid("PORT")));
    }
}
