//! Environment-backed application configuration.
//!
//! Values are split in two:
//! - [`ServerConfig`] carries the Supabase service-role key and must stay on
//!   the server.
//! - [`PublicConfig`] is safe to hand to browsers. It has no field that can
//!   hold a secret.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use thiserror::Error;

pub const SUPABASE_URL: &str = "NEXT_PUBLIC_SUPABASE_URL";
pub const SUPABASE_ANON_KEY: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";
pub const SUPABASE_SERVICE_ROLE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const APP_URL: &str = "NEXT_PUBLIC_APP_URL";
pub const APP_NAME: &str = "NEXT_PUBLIC_APP_NAME";

const PUBLIC_REQUIRED: &[&str] = &[SUPABASE_URL, SUPABASE_ANON_KEY];
const SERVER_REQUIRED: &[&str] = &[SUPABASE_URL, SUPABASE_ANON_KEY, SUPABASE_SERVICE_ROLE_KEY];

const DEFAULT_APP_URL: &str = "http://localhost:3000";
const DEFAULT_APP_NAME: &str = "English Academy";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),
    #[error("{var} must be an http(s) URL, got {value:?}")]
    InvalidUrl { var: &'static str, value: String },
}

/// Server-only configuration. Never serialize this into a response.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_role_key: String,
    pub app_url: String,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &"<redacted>")
            .field("supabase_service_role_key", &"<redacted>")
            .field("app_url", &self.app_url)
            .finish()
    }
}

/// Configuration that may be exposed to client code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub app_url: String,
    pub app_name: String,
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn check_required<F>(lookup: &F, required: &[&str]) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let missing: Vec<String> = required
        .iter()
        .filter(|k| non_empty(lookup, k).is_none())
        .map(|k| k.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Missing(missing))
    }
}

fn supabase_url<F>(lookup: &F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = non_empty(lookup, SUPABASE_URL).ok_or_else(|| ConfigError::Missing(vec![SUPABASE_URL.into()]))?;
    let lower = raw.to_lowercase();
    if !(lower.starts_with("https://") || lower.starts_with("http://")) {
        return Err(ConfigError::InvalidUrl { var: SUPABASE_URL, value: raw });
    }
    Ok(raw.trim_end_matches('/').to_string())
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup, key).ok_or_else(|| ConfigError::Missing(vec![key.to_string()]))
}

/// Check every variable the server needs and report all missing ones at once.
pub fn validate_env_from<F>(lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    check_required(&lookup, SERVER_REQUIRED)?;
    supabase_url(&lookup).map(|_| ())
}

pub fn validate_env() -> Result<(), ConfigError> {
    validate_env_from(process_env)
}

pub fn get_server_config_from<F>(lookup: F) -> Result<ServerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    check_required(&lookup, SERVER_REQUIRED)?;
    Ok(ServerConfig {
        supabase_url: supabase_url(&lookup)?,
        supabase_anon_key: required(&lookup, SUPABASE_ANON_KEY)?,
        supabase_service_role_key: required(&lookup, SUPABASE_SERVICE_ROLE_KEY)?,
        app_url: non_empty(&lookup, APP_URL).unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
    })
}

/// Server-side only: the result carries the service-role key.
pub fn get_server_config() -> Result<ServerConfig, ConfigError> {
    get_server_config_from(process_env)
}

pub fn get_public_config_from<F>(lookup: F) -> Result<PublicConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    check_required(&lookup, PUBLIC_REQUIRED)?;
    Ok(PublicConfig {
        supabase_url: supabase_url(&lookup)?,
        supabase_anon_key: required(&lookup, SUPABASE_ANON_KEY)?,
        app_url: non_empty(&lookup, APP_URL).unwrap_or_else(|| DEFAULT_APP_URL.to_string()),
        app_name: non_empty(&lookup, APP_NAME).unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
    })
}

pub fn get_public_config() -> Result<PublicConfig, ConfigError> {
    get_public_config_from(process_env)
}
