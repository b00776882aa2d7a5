//! Document AI REST client (`v1beta3`).

use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Document, DocumentProcessor, ProcessRequest, ProcessorFactory};
use crate::auth::{ServiceAccountAuth, ServiceAccountKey};
use crate::credentials::ServiceAccountCredentials;
use crate::error::NodeError;
use crate::params::Location;

const API_VERSION: &str = "v1beta3";

/// Regional API host for a processor location.
pub fn regional_endpoint(location: Location) -> String {
    format!("https://{}-documentai.googleapis.com", location.as_str())
}

pub struct DocumentAiClient {
    client: reqwest::Client,
    endpoint: String,
    auth: ServiceAccountAuth,
}

impl DocumentAiClient {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        auth: ServiceAccountAuth,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            auth,
        }
    }

    fn process_url(&self, name: &str) -> String {
        format!(
            "{}/{}/{}:process",
            self.endpoint.trim_end_matches('/'),
            API_VERSION,
            name
        )
    }
}

// ── REST request/response types ─────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessBody {
    raw_document: RawDocumentBody,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocumentBody {
    content: String,
    mime_type: String,
}

#[derive(Deserialize)]
struct ProcessResponse {
    #[serde(default)]
    document: Document,
}

#[async_trait::async_trait]
impl DocumentProcessor for DocumentAiClient {
    fn name(&self) -> &str {
        "documentai_rest"
    }

    async fn process(&self, request: &ProcessRequest) -> anyhow::Result<Document> {
        let token = self.auth.access_token(&self.client).await?;

        let body = ProcessBody {
            raw_document: RawDocumentBody {
                content: BASE64.encode(&request.raw_document.content),
                mime_type: request.raw_document.mime_type.clone(),
            },
        };

        info!(
            "DocumentAiClient: processing {} ({} bytes, {}) as {}",
            request.name,
            request.raw_document.content.len(),
            request.raw_document.mime_type,
            self.auth.client_email()
        );

        let resp = self
            .client
            .post(self.process_url(&request.name))
            .bearer_auth(&token)
            .json(&body)
            .send()
            .await
            .context("Failed to send process request")?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Document AI API error ({}): {}", status, text);
        }

        let parsed: ProcessResponse = resp
            .json()
            .await
            .context("Failed to parse Document AI response")?;

        debug!(
            "DocumentAiClient: received {} pages, {} chars, {} entities",
            parsed.document.pages.len(),
            parsed.document.text.chars().count(),
            parsed.document.entities.len()
        );

        Ok(parsed.document)
    }
}

/// Builds one REST client per item from the injected credentials.
#[derive(Debug, Clone, Default)]
pub struct DocumentAiFactory {
    /// Replaces the regional host (emulators, proxies).
    endpoint_override: Option<String>,
}

impl DocumentAiFactory {
    pub fn new(endpoint_override: Option<String>) -> Self {
        Self { endpoint_override }
    }

    fn endpoint(&self, location: Location) -> String {
        self.endpoint_override
            .clone()
            .unwrap_or_else(|| regional_endpoint(location))
    }
}

impl ProcessorFactory for DocumentAiFactory {
    fn connect(
        &self,
        credentials: &ServiceAccountCredentials,
        location: Location,
    ) -> Result<Box<dyn DocumentProcessor>, NodeError> {
        let key = ServiceAccountKey::from_json(credentials.service_account_key())?;
        let auth = ServiceAccountAuth::new(key)?;
        let client = reqwest::Client::builder().build().map_err(|e| {
            NodeError::RemoteCall(anyhow::Error::new(e).context("Failed to build HTTP client"))
        })?;

        Ok(Box::new(DocumentAiClient::new(
            client,
            self.endpoint(location),
            auth,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documentai::mock::{self, FAILING_PROCESSOR};
    use crate::documentai::{processor_resource_name, RawDocument};

    fn credentials(key_json: &str) -> ServiceAccountCredentials {
        serde_json::from_value(serde_json::json!({"serviceAccountKey": key_json})).unwrap()
    }

    fn pdf_request(processor_id: &str) -> ProcessRequest {
        ProcessRequest {
            name: processor_resource_name("acme", Location::Us, processor_id),
            raw_document: RawDocument {
                content: b"%PDF-1.7".to_vec(),
                mime_type: "application/pdf".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_process_unwraps_document() {
        let server = mock::spawn().await;
        let factory = DocumentAiFactory::new(Some(server.base_url.clone()));
        let processor = factory
            .connect(&credentials(&server.key_json), Location::Us)
            .unwrap();

        let doc = processor.process(&pdf_request("ocr1")).await.unwrap();

        assert_eq!(doc.text, "application/pdf JVBERi0xLjc=");
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].page_number, Some(1));
        assert_eq!(
            doc.entities[0]["mentionText"],
            "projects/acme/locations/us/processors/ocr1:process"
        );
    }

    #[tokio::test]
    async fn test_non_success_status_carries_status_and_body() {
        let server = mock::spawn().await;
        let factory = DocumentAiFactory::new(Some(server.base_url.clone()));
        let processor = factory
            .connect(&credentials(&server.key_json), Location::Us)
            .unwrap();

        let err = processor
            .process(&pdf_request(FAILING_PROCESSOR))
            .await
            .unwrap_err();

        let message = format!("{:#}", err);
        assert!(message.contains("503"), "{}", message);
        assert!(message.contains("backend overloaded"), "{}", message);
    }

    #[test]
    fn test_regional_endpoint() {
        assert_eq!(
            regional_endpoint(Location::Us),
            "https://us-documentai.googleapis.com"
        );
        assert_eq!(
            regional_endpoint(Location::Eu),
            "https://eu-documentai.googleapis.com"
        );
    }

    #[test]
    fn test_endpoint_override_wins() {
        let factory = DocumentAiFactory::new(Some("http://localhost:8085".to_string()));
        assert_eq!(factory.endpoint(Location::Eu), "http://localhost:8085");
        assert_eq!(
            DocumentAiFactory::default().endpoint(Location::Eu),
            "https://eu-documentai.googleapis.com"
        );
    }

    #[test]
    fn test_process_body_shape() {
        let body = ProcessBody {
            raw_document: RawDocumentBody {
                content: BASE64.encode(b"%PDF-1.7"),
                mime_type: "application/pdf".to_string(),
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "rawDocument": {"content": "JVBERi0xLjc=", "mimeType": "application/pdf"}
            })
        );
    }

    #[test]
    fn test_connect_rejects_malformed_key() {
        let creds: ServiceAccountCredentials =
            serde_json::from_value(serde_json::json!({"serviceAccountKey": "{not json"})).unwrap();
        let result = DocumentAiFactory::default().connect(&creds, Location::Us);
        assert!(matches!(result, Err(NodeError::InvalidCredentials(_))));
    }
}
