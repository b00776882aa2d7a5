//! Service configuration loaded from the environment (`.env` supported).

use anyhow::{Context, Result};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_BODY_LIMIT_MB: usize = 100;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: String,
    /// Replaces the regional Document AI host when set.
    pub document_ai_endpoint: Option<String>,
    pub body_limit_bytes: usize,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let document_ai_endpoint = lookup("DOCUMENT_AI_ENDPOINT").filter(|s| !s.trim().is_empty());

        let body_limit_mb = match lookup("REQUEST_BODY_LIMIT_MB") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("Invalid REQUEST_BODY_LIMIT_MB: {:?}", raw))?,
            None => DEFAULT_BODY_LIMIT_MB,
        };

        let body_limit_bytes = body_limit_mb
            .checked_mul(1024 * 1024)
            .with_context(|| format!("REQUEST_BODY_LIMIT_MB too large: {}", body_limit_mb))?;

        Ok(Self {
            bind_addr,
            document_ai_endpoint,
            body_limit_bytes,
        })
    }
}
