//! Auth provider client (Supabase / GoTrue REST API).
//!
//! The provider issues and validates tokens; everything else about the
//! session lives in [`crate::session::SessionStore`].

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::api_client::wire;
use crate::errors::{ClientError, Result};
use crate::models::user::{Session, User};

/// Keys GoTrue uses for error text, most specific first.
const AUTH_ERROR_KEYS: &[&str] = &["msg", "error_description", "message", "error"];

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Registers an account. The caller still has to sign in afterwards,
    /// usually once the email address is confirmed.
    async fn sign_up(&self, full_name: &str, email: &str, password: &str) -> Result<()>;

    async fn sign_out(&self, access_token: &str) -> Result<()>;

    async fn refresh(&self, refresh_token: &str) -> Result<Session>;

    /// Looks up the user behind a token; fails when the token is not valid.
    async fn user(&self, access_token: &str) -> Result<User>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Clone)]
pub struct SupabaseAuth {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(base_url: &str, anon_key: &str, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }

    /// Sends a request and returns the JSON body of a 2xx response.
    /// Rejections become [`ClientError::Auth`] carrying the provider's text.
    async fn call(&self, request: RequestBuilder) -> Result<Value> {
        let response = request
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

        if !status.is_success() {
            debug!("Auth provider rejected request with {status}");
            let message = wire::first_string(&value, AUTH_ERROR_KEYS)
                .unwrap_or_else(|| "Authentication failed".to_string());
            return Err(ClientError::Auth(message));
        }
        Ok(value)
    }

    async fn token(&self, grant_type: &str, body: Value) -> Result<Session> {
        let value = self
            .call(
                self.client
                    .post(self.endpoint("/token"))
                    .query(&[("grant_type", grant_type)])
                    .json(&body),
            )
            .await?;
        let token: TokenResponse = serde_json::from_value(value)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;
        Ok(token.into_session(Utc::now()))
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.token("password", json!({"email": email, "password": password}))
            .await
    }

    async fn sign_up(&self, full_name: &str, email: &str, password: &str) -> Result<()> {
        self.call(self.client.post(self.endpoint("/signup")).json(&json!({
            "email": email,
            "password": password,
            "data": {"full_name": full_name}
        })))
        .await?;
        Ok(())
    }

    async fn sign_out(&self, access_token: &str) -> Result<()> {
        self.call(
            self.client
                .post(self.endpoint("/logout"))
                .bearer_auth(access_token),
        )
        .await?;
        Ok(())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        self.token("refresh_token", json!({"refresh_token": refresh_token}))
            .await
    }

    async fn user(&self, access_token: &str) -> Result<User> {
        let value = self
            .call(self.client.get(self.endpoint("/user")).bearer_auth(access_token))
            .await?;
        serde_json::from_value(value).map_err(|e| ClientError::MalformedResponse(e.to_string()))
    }
}
