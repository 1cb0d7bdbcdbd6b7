// src/mail/gmail.rs
//! Gmail API transport

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use std::time::Duration;
use thiserror::Error;

use super::message::OutgoingMessage;
use crate::app_log;

const GMAIL_SEND_ENDPOINT: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages/send";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("Provider rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Sends one composed message
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), SendError>;
}

pub struct GmailMailer {
    client: reqwest::Client,
    access_token: String,
    endpoint: String,
}

impl GmailMailer {
    pub fn new(access_token: String) -> Result<Self, SendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            access_token,
            endpoint: GMAIL_SEND_ENDPOINT.to_string(),
        })
    }

    /// Send through another API endpoint
    pub fn with_endpoint(mut self, endpoint: String) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// base64url of the full MIME document, as the API expects in `raw`
    pub fn raw_payload(message: &OutgoingMessage) -> String {
        let boundary = format!("jobfinder_{}", uuid::Uuid::new_v4().simple());
        URL_SAFE.encode(message.to_mime(&boundary).as_bytes())
    }
}

#[async_trait]
impl Mailer for GmailMailer {
    async fn send(&self, message: &OutgoingMessage) -> Result<(), SendError> {
        let payload = serde_json::json!({ "raw": Self::raw_payload(message) });

        app_log!(debug, "Posting message for {} to {}", message.to, self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}
