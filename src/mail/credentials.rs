// src/mail/credentials.rs
//! Provider credentials: client secrets, the cached token and the
//! transitions between them.
//!
//! ```text
//! Absent ──consent──▶ CachedValid
//! CachedExpired ──refresh──▶ Refreshed
//! CachedExpired (no refresh token) ──consent──▶ CachedValid
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::app_log;

pub const GMAIL_SEND_SCOPE: &str = "https://www.googleapis.com/auth/gmail.send";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
pub const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";

/// Tokens this close to expiry are treated as expired
const EXPIRY_SKEW_SECS: i64 = 60;
const TOKEN_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("A problem happened processing file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("A problem happened processing file '{path}': {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("'{0}' holds neither an 'installed' nor a 'web' client")]
    MissingClient(PathBuf),
    #[error("Failed to persist token to '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Token endpoint refused the request ({status}): {body}")]
    TokenEndpoint { status: u16, body: String },
    #[error("Consent flow failed: {0}")]
    Consent(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// OAuth client registration downloaded from the provider console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

#[derive(Deserialize)]
struct SecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ClientSecrets {
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let content = std::fs::read_to_string(path).map_err(|source| CredentialError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content, path)
    }

    fn from_json_str(content: &str, path: &Path) -> Result<Self, CredentialError> {
        let file: SecretsFile =
            serde_json::from_str(content).map_err(|source| CredentialError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        file.installed
            .or(file.web)
            .ok_or_else(|| CredentialError::MissingClient(path.to_path_buf()))
    }
}

/// Authorized-user token as cached on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// A token without an expiry never expires
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty()
            && self
                .expiry
                .map_or(true, |expiry| expiry - ChronoDuration::seconds(EXPIRY_SKEW_SECS) > now)
    }

    pub fn can_refresh(&self) -> bool {
        self.refresh_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CredentialState {
    Absent,
    CachedValid(StoredToken),
    CachedExpired(StoredToken),
    Refreshed(StoredToken),
}

impl CredentialState {
    pub fn token(&self) -> Option<&StoredToken> {
        match self {
            Self::Absent => None,
            Self::CachedValid(token) | Self::CachedExpired(token) | Self::Refreshed(token) => {
                Some(token)
            }
        }
    }

    /// True once a token can be used as-is
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::CachedValid(_) | Self::Refreshed(_))
    }
}

#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, token: &StoredToken) -> Result<StoredToken, CredentialError>;
}

/// Interactive authorization, run when no usable token exists
#[async_trait]
pub trait ConsentFlow: Send + Sync {
    async fn obtain(&self, secrets: &ClientSecrets) -> Result<StoredToken, CredentialError>;
}

pub struct CredentialStore {
    credentials_path: PathBuf,
    token_path: PathBuf,
}

impl CredentialStore {
    pub fn new(credentials_path: PathBuf, token_path: PathBuf) -> Self {
        Self {
            credentials_path,
            token_path,
        }
    }

    /// Classify the cached token. A corrupt token file is fatal.
    pub fn inspect(&self, now: DateTime<Utc>) -> Result<CredentialState, CredentialError> {
        if !self.token_path.exists() {
            return Ok(CredentialState::Absent);
        }

        let content =
            std::fs::read_to_string(&self.token_path).map_err(|source| CredentialError::Read {
                path: self.token_path.clone(),
                source,
            })?;
        let token: StoredToken =
            serde_json::from_str(&content).map_err(|source| CredentialError::Malformed {
                path: self.token_path.clone(),
                source,
            })?;

        if token.is_valid_at(now) {
            Ok(CredentialState::CachedValid(token))
        } else {
            Ok(CredentialState::CachedExpired(token))
        }
    }

    /// Drive the state machine until a usable token exists, persisting any new token
    pub async fn settle(
        &self,
        refresher: &dyn TokenRefresher,
        consent: &dyn ConsentFlow,
        now: DateTime<Utc>,
    ) -> Result<CredentialState, CredentialError> {
        let state = match self.inspect(now)? {
            CredentialState::CachedValid(token) => {
                app_log!(debug, "Reusing cached token from {}", self.token_path.display());
                return Ok(CredentialState::CachedValid(token));
            }
            CredentialState::CachedExpired(token) if token.can_refresh() => {
                app_log!(info, "Cached token expired, refreshing");
                CredentialState::Refreshed(refresher.refresh(&token).await?)
            }
            _ => {
                app_log!(info, "No usable token, starting the consent flow");
                let secrets = ClientSecrets::load(&self.credentials_path)?;
                CredentialState::CachedValid(consent.obtain(&secrets).await?)
            }
        };

        if let Some(token) = state.token() {
            self.persist(token)?;
        }
        Ok(state)
    }

    fn persist(&self, token: &StoredToken) -> Result<(), CredentialError> {
        let write_err = |source| CredentialError::Write {
            path: self.token_path.clone(),
            source,
        };
        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let json = serde_json::to_string_pretty(token).map_err(|source| {
            CredentialError::Malformed {
                path: self.token_path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.token_path, json).map_err(write_err)
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

/// Talks to the provider's token endpoint
pub struct OAuthClient {
    client: reqwest::Client,
}

impl OAuthClient {
    pub fn new() -> Result<Self, CredentialError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TOKEN_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client })
    }

    async fn post_token(
        &self,
        token_uri: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, CredentialError> {
        let response = self.client.post(token_uri).form(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(CredentialError::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }

    /// Trade an authorization code for a token
    pub async fn exchange_code(
        &self,
        secrets: &ClientSecrets,
        code: &str,
        redirect_uri: &str,
    ) -> Result<StoredToken, CredentialError> {
        let response = self
            .post_token(
                &secrets.token_uri,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code),
                    ("client_id", &secrets.client_id),
                    ("client_secret", &secrets.client_secret),
                    ("redirect_uri", redirect_uri),
                ],
            )
            .await?;

        Ok(token_from_response(
            response,
            &secrets.token_uri,
            &secrets.client_id,
            &secrets.client_secret,
            None,
            Utc::now(),
        ))
    }
}

fn token_from_response(
    response: TokenResponse,
    token_uri: &str,
    client_id: &str,
    client_secret: &str,
    previous_refresh: Option<&str>,
    now: DateTime<Utc>,
) -> StoredToken {
    let scopes = response
        .scope
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_else(|| vec![GMAIL_SEND_SCOPE.to_string()]);

    StoredToken {
        token: response.access_token,
        refresh_token: response
            .refresh_token
            .or_else(|| previous_refresh.map(str::to_string)),
        token_uri: token_uri.to_string(),
        client_id: client_id.to_string(),
        client_secret: client_secret.to_string(),
        scopes,
        expiry: response
            .expires_in
            .map(|secs| now + ChronoDuration::seconds(secs)),
    }
}

#[async_trait]
impl TokenRefresher for OAuthClient {
    async fn refresh(&self, token: &StoredToken) -> Result<StoredToken, CredentialError> {
        let refresh_token = token.refresh_token.as_deref().unwrap_or_default();
        let response = self
            .post_token(
                &token.token_uri,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                    ("client_id", &token.client_id),
                    ("client_secret", &token.client_secret),
                ],
            )
            .await?;

        Ok(token_from_response(
            response,
            &token.token_uri,
            &token.client_id,
            &token.client_secret,
            Some(refresh_token),
            Utc::now(),
        ))
    }
}
