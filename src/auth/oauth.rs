//! Google OAuth2 authorization-code flow.
//!
//! The `state` parameter is a short-lived signed token that carries the tenant and the caller's
//! device details through the Google round trip, so the callback needs no server-side session.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use super::{sign, verify, JwtError};
use crate::config::{self, OAuthConfig};

pub const GOOGLE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/userinfo.email",
    "https://www.googleapis.com/auth/userinfo.profile",
];

const STATE_PURPOSE: &str = "google_oauth_state";

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("Google OAuth is not configured")]
    NotConfigured,

    #[error("Invalid OAuth state")]
    InvalidState,

    #[error(transparent)]
    Jwt(#[from] JwtError),

    #[error("Code exchange failed: {0}")]
    Exchange(String),

    #[error("Userinfo request failed: {0}")]
    UserInfo(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Device details the client passes to the login endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    #[serde(default)]
    pub device_id: String,
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub browser_name: String,
    #[serde(default)]
    pub platform: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthState {
    pub tenant: String,
    #[serde(flatten)]
    pub device: DeviceInfo,
    pub purpose: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl OAuthState {
    pub fn new(tenant: String, device: DeviceInfo) -> Self {
        let now = Utc::now();
        let ttl = config::config().security.oauth_state_ttl_minutes as i64;
        Self {
            tenant,
            device,
            purpose: STATE_PURPOSE.to_string(),
            iss: config::config().security.jwt_issuer.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl)).timestamp(),
        }
    }

    pub fn encode(&self) -> Result<String, OAuthError> {
        Ok(sign(self)?)
    }

    /// Access tokens are signed with the same secret, so the purpose field keeps them from
    /// being replayed as state.
    pub fn decode(token: &str) -> Result<Self, OAuthError> {
        let state = verify::<OAuthState>(token).map_err(|_| OAuthError::InvalidState)?;
        if state.purpose != STATE_PURPOSE {
            return Err(OAuthError::InvalidState);
        }
        Ok(state)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

pub struct GoogleOAuth {
    settings: OAuthConfig,
    http: reqwest::Client,
}

impl GoogleOAuth {
    pub fn from_config() -> Result<Self, OAuthError> {
        Self::new(config::config().oauth.clone())
    }

    pub fn new(settings: OAuthConfig) -> Result<Self, OAuthError> {
        if !settings.is_configured() {
            return Err(OAuthError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { settings, http })
    }

    /// Consent-screen URL for the given encoded state
    pub fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
        let mut url = Url::parse(&self.settings.google_auth_url)
            .map_err(|e| OAuthError::Exchange(format!("invalid auth url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.settings.google_client_id)
            .append_pair("redirect_uri", &self.settings.google_redirect_url)
            .append_pair("response_type", "code")
            .append_pair("scope", &GOOGLE_SCOPES.join(" "))
            .append_pair("access_type", "offline")
            .append_pair("state", state);
        Ok(url.into())
    }

    /// Trade an authorization code for an access token
    pub async fn exchange_code(&self, code: &str) -> Result<String, OAuthError> {
        let response = self
            .http
            .post(&self.settings.google_token_url)
            .form(&[
                ("code", code),
                ("client_id", self.settings.google_client_id.as_str()),
                ("client_secret", self.settings.google_client_secret.as_str()),
                ("redirect_uri", self.settings.google_redirect_url.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthError::Exchange(format!("{}: {}", status, body)));
        }

        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    pub async fn fetch_user_info(&self, access_token: &str) -> Result<GoogleUserInfo, OAuthError> {
        let response = self
            .http
            .get(&self.settings.google_userinfo_url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(OAuthError::UserInfo(response.status().to_string()));
        }

        let info: GoogleUserInfo = response.json().await?;
        if info.email.trim().is_empty() {
            return Err(OAuthError::UserInfo("profile has no email".to_string()));
        }
        Ok(info)
    }

    /// Where the browser lands after sign-in, carrying the issued access token
    pub fn client_redirect(&self, access_token: &str) -> Result<String, OAuthError> {
        let mut url = Url::parse(&self.settings.client_redirect_url)
            .map_err(|e| OAuthError::Exchange(format!("invalid client redirect url: {}", e)))?;
        url.query_pairs_mut().append_pair("access_token", access_token);
        Ok(url.into())
    }
}
