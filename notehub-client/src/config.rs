//! Process-wide configuration loaded from the environment.
//!
//! The bearer credential is required at startup: a missing token is a
//! `ConfigError` surfaced before any request ever goes out, never a
//! per-request fallback.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const NOTEHUB_TOKEN: &str = "NOTEHUB_TOKEN";
    /// Override for the API base URL (e.g. a staging deployment).
    pub const NOTEHUB_API_URL: &str = "NOTEHUB_API_URL";
    pub const NOTEHUB_PER_PAGE: &str = "NOTEHUB_PER_PAGE";
    pub const NOTEHUB_DEBOUNCE_MS: &str = "NOTEHUB_DEBOUNCE_MS";
}

/// Default values
pub mod defaults {
    pub const API_URL: &str = "https://notehub-public.goit.study/api";
    pub const PER_PAGE: u32 = 12;
    pub const DEBOUNCE_MS: u64 = 500;
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub token: String,
    pub per_page: u32,
    pub debounce_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var(env_vars::NOTEHUB_TOKEN)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingVar(env_vars::NOTEHUB_TOKEN))?;

        let api_url = env::var(env_vars::NOTEHUB_API_URL)
            .unwrap_or_else(|_| defaults::API_URL.to_string());

        let per_page = parse_override(
            env_vars::NOTEHUB_PER_PAGE,
            env::var(env_vars::NOTEHUB_PER_PAGE).ok().as_deref(),
            defaults::PER_PAGE,
        )?;
        if per_page == 0 {
            return Err(ConfigError::InvalidVar {
                var: env_vars::NOTEHUB_PER_PAGE,
                reason: "must be a positive integer".to_string(),
            });
        }

        let debounce_ms = parse_override(
            env_vars::NOTEHUB_DEBOUNCE_MS,
            env::var(env_vars::NOTEHUB_DEBOUNCE_MS).ok().as_deref(),
            defaults::DEBOUNCE_MS,
        )?;

        log::info!(
            "[CONFIG] api_url={} per_page={} debounce_ms={}",
            api_url,
            per_page,
            debounce_ms
        );

        Ok(Self {
            api_url,
            token,
            per_page,
            debounce_ms,
        })
    }
}

/// Parse an optional numeric override, falling back to the default when the
/// variable is unset.
fn parse_override<T>(var: &'static str, value: Option<&str>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidVar {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
