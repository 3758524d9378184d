use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Whether a backend endpoint gets the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Never attach a token.
    None,
    /// Attach a token when a session exists, send anonymously otherwise.
    Optional,
    /// Refuse to send the request without a token.
    Required,
}

impl FromStr for AuthPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(AuthPolicy::None),
            "optional" => Ok(AuthPolicy::Optional),
            "required" => Ok(AuthPolicy::Required),
            other => bail!("unknown auth policy '{other}' (expected none, optional or required)"),
        }
    }
}

/// Auth policy per backend endpoint.
///
/// The backend is inconsistent about which routes expect a bearer token, so
/// each one is configurable instead of hardcoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointAuth {
    pub profile_status: AuthPolicy,
    pub profile_upload: AuthPolicy,
    pub generate: AuthPolicy,
    pub analyze: AuthPolicy,
    pub jobs: AuthPolicy,
}

impl Default for EndpointAuth {
    fn default() -> Self {
        Self {
            profile_status: AuthPolicy::Optional,
            profile_upload: AuthPolicy::Required,
            generate: AuthPolicy::None,
            analyze: AuthPolicy::None,
            jobs: AuthPolicy::Required,
        }
    }
}

/// Client configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub request_timeout: Duration,
    pub session_file: Option<PathBuf>,
    pub endpoint_auth: EndpointAuth,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = EndpointAuth::default();

        Ok(Config {
            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            supabase_url: require_env("SUPABASE_URL")?,
            supabase_anon_key: require_env("SUPABASE_ANON_KEY")?,
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse::<u64>()
                    .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            session_file: std::env::var("SESSION_FILE").ok().map(PathBuf::from),
            endpoint_auth: EndpointAuth {
                profile_status: policy_env("AUTH_PROFILE_STATUS", defaults.profile_status)?,
                profile_upload: policy_env("AUTH_PROFILE_UPLOAD", defaults.profile_upload)?,
                generate: policy_env("AUTH_GENERATE", defaults.generate)?,
                analyze: policy_env("AUTH_ANALYZE", defaults.analyze)?,
                jobs: policy_env("AUTH_JOBS", defaults.jobs)?,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Configuration pointing at local services, used by tests.
    #[cfg(test)]
    pub fn for_tests(api_base_url: &str) -> Self {
        Config {
            api_base_url: api_base_url.to_string(),
            supabase_url: "http://127.0.0.1:9".to_string(),
            supabase_anon_key: "anon-key".to_string(),
            request_timeout: Duration::from_secs(5),
            session_file: None,
            endpoint_auth: EndpointAuth::default(),
            rust_log: "debug".to_string(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn policy_env(key: &str, default: AuthPolicy) -> Result<AuthPolicy> {
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("Invalid value for '{key}'")),
        Err(_) => Ok(default),
    }
}
