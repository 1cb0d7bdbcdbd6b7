// src/mail/consent.rs
//! Browser consent through a loopback redirect listener.

use async_trait::async_trait;
use reqwest::Url;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use super::credentials::{
    ClientSecrets, ConsentFlow, CredentialError, OAuthClient, StoredToken, GMAIL_SEND_SCOPE,
};
use crate::app_log;

const MAX_REQUEST_BYTES: usize = 16 * 1024;
const SUCCESS_PAGE: &str =
    "The authentication flow has completed. You may close this window.";

pub struct LoopbackConsent {
    oauth: OAuthClient,
    port: u16,
}

impl LoopbackConsent {
    pub fn new(oauth: OAuthClient, port: u16) -> Self {
        Self { oauth, port }
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/", self.port)
    }
}

/// Authorization URL asking for offline send-only access
pub fn authorization_url(
    secrets: &ClientSecrets,
    redirect_uri: &str,
    state: &str,
) -> Result<Url, CredentialError> {
    Url::parse_with_params(
        &secrets.auth_uri,
        &[
            ("response_type", "code"),
            ("client_id", secrets.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("scope", GMAIL_SEND_SCOPE),
            ("access_type", "offline"),
            ("state", state),
        ],
    )
    .map_err(|e| CredentialError::Consent(format!("Invalid auth_uri: {}", e)))
}

/// Pull the authorization code out of the redirect's request line
pub fn extract_code(request: &str, expected_state: &str) -> Result<String, CredentialError> {
    let target = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .ok_or_else(|| CredentialError::Consent("Malformed redirect request".to_string()))?;

    let url = Url::parse(&format!("http://localhost{}", target))
        .map_err(|e| CredentialError::Consent(format!("Malformed redirect target: {}", e)))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => {
                return Err(CredentialError::Consent(format!(
                    "Authorization denied: {}",
                    value
                )))
            }
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Err(CredentialError::Consent("State mismatch in redirect".to_string()));
    }
    code.ok_or_else(|| CredentialError::Consent("Redirect carried no code".to_string()))
}

#[async_trait]
impl ConsentFlow for LoopbackConsent {
    async fn obtain(&self, secrets: &ClientSecrets) -> Result<StoredToken, CredentialError> {
        let consent_err = |e: std::io::Error| CredentialError::Consent(e.to_string());

        let listener = TcpListener::bind(("127.0.0.1", self.port))
            .await
            .map_err(consent_err)?;
        let redirect_uri = self.redirect_uri();
        let state = uuid::Uuid::new_v4().simple().to_string();
        let url = authorization_url(secrets, &redirect_uri, &state)?;

        println!(
            "Please visit this URL to authorize this application: {}",
            url
        );
        app_log!(info, "Waiting for the consent redirect on port {}", self.port);

        let (mut stream, _) = listener.accept().await.map_err(consent_err)?;
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = stream.read(&mut chunk).await.map_err(consent_err)?;
            buffer.extend_from_slice(&chunk[..read]);
            if read == 0 || buffer.windows(4).any(|w| w == b"\r\n\r\n") || buffer.len() > MAX_REQUEST_BYTES
            {
                break;
            }
        }

        let request = String::from_utf8_lossy(&buffer);
        let code = extract_code(&request, &state);

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            SUCCESS_PAGE.len(),
            SUCCESS_PAGE
        );
        stream
            .write_all(response.as_bytes())
            .await
            .map_err(consent_err)?;

        self.oauth.exchange_code(secrets, &code?, &redirect_uri).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secrets() -> ClientSecrets {
        serde_json::from_str(r#"{"client_id": "abc.apps", "client_secret": "s"}"#).unwrap()
    }

    #[test]
    fn test_authorization_url_requests_offline_send_scope() {
        let url = authorization_url(&secrets(), "http://localhost:8080/", "xyz").unwrap();
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(url.as_str().starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(pairs.contains(&("scope".into(), GMAIL_SEND_SCOPE.into())));
        assert!(pairs.contains(&("access_type".into(), "offline".into())));
        assert!(pairs.contains(&("client_id".into(), "abc.apps".into())));
    }

    #[test]
    fn test_extract_code_from_redirect() {
        let request = "GET /?state=xyz&code=4%2F0Ab&scope=gmail HTTP/1.1\r\nHost: localhost\r\n\r\n";
        assert_eq!(extract_code(request, "xyz").unwrap(), "4/0Ab");
    }

    #[test]
    fn test_extract_code_rejects_wrong_state_and_denial() {
        let request = "GET /?state=other&code=abc HTTP/1.1\r\n\r\n";
        assert!(extract_code(request, "xyz").is_err());

        let denied = "GET /?error=access_denied&state=xyz HTTP/1.1\r\n\r\n";
        let err = extract_code(denied, "xyz").unwrap_err();
        assert!(err.to_string().contains("access_denied"));
    }
}
