//! Service account OAuth2 authentication for Google APIs.
//!
//! Mints an RS256 JWT from the service account key and exchanges it for a
//! bearer token (JWT bearer grant). Tokens are not cached: each processor
//! handle lives for a single item.

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::error::NodeError;

const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const TOKEN_LIFETIME_SECS: u64 = 3600;

/// The fields of a service account key file this node needs.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Parse the JSON key file contents.
    pub fn from_json(json: &str) -> Result<Self, NodeError> {
        if json.trim().is_empty() {
            return Err(NodeError::InvalidCredentials(
                "service account key is empty".to_string(),
            ));
        }
        serde_json::from_str(json).map_err(|e| NodeError::InvalidCredentials(e.to_string()))
    }

    fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

/// Signs JWT assertions for one service account.
#[derive(Clone)]
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    encoding_key: jsonwebtoken::EncodingKey,
}

impl ServiceAccountAuth {
    pub fn new(key: ServiceAccountKey) -> Result<Self, NodeError> {
        let encoding_key = jsonwebtoken::EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| {
                NodeError::InvalidCredentials(format!(
                    "invalid RSA private key in service account JSON: {}",
                    e
                ))
            })?;
        Ok(Self { key, encoding_key })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Build the signed assertion exchanged at the token endpoint.
    fn assertion(&self, now: u64) -> Result<String> {
        let claims = serde_json::json!({
            "iss": self.key.client_email,
            "scope": CLOUD_PLATFORM_SCOPE,
            "aud": self.key.token_uri(),
            "iat": now,
            "exp": now + TOKEN_LIFETIME_SECS,
        });

        let header = jsonwebtoken::Header::new(jsonwebtoken::Algorithm::RS256);
        jsonwebtoken::encode(&header, &claims, &self.encoding_key).context("Failed to encode JWT")
    }

    /// Exchange a fresh assertion for an OAuth2 access token.
    pub async fn access_token(&self, client: &reqwest::Client) -> Result<String> {
        let jwt = self.assertion(now_secs())?;

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
        }

        let resp: TokenResponse = client
            .post(self.key.token_uri())
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", &jwt),
            ])
            .send()
            .await
            .context("Token exchange request failed")?
            .error_for_status()
            .context("Token exchange returned error")?
            .json()
            .await
            .context("Failed to parse token response")?;

        debug!("Obtained access token for {}", self.key.client_email);
        Ok(resp.access_token)
    }
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
