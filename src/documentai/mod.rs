//! Document AI processor abstraction.
//!
//! Defines the [`DocumentProcessor`] trait plus the typed request and response
//! trees so the node can run against the REST client or an in-memory fake.
//! Response types mirror the `Document` message of the v1beta3 API; every
//! field is optional or defaulted because proto3 JSON omits unset values.

pub mod client;
#[cfg(test)]
pub mod mock;

use serde::{Deserialize, Deserializer};

use crate::credentials::ServiceAccountCredentials;
use crate::error::NodeError;
use crate::params::Location;

/// Raw document bytes submitted for processing.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub content: Vec<u8>,
    pub mime_type: String,
}

/// One `processDocument` call.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// Fully-qualified processor resource name.
    pub name: String,
    pub raw_document: RawDocument,
}

/// Build `projects/{project}/locations/{location}/processors/{processor}`.
pub fn processor_resource_name(project_id: &str, location: Location, processor_id: &str) -> String {
    format!(
        "projects/{}/locations/{}/processors/{}",
        project_id,
        location.as_str(),
        processor_id
    )
}

/// Async trait implemented by each processing backend.
#[async_trait::async_trait]
pub trait DocumentProcessor: Send + Sync {
    fn name(&self) -> &str;
    async fn process(&self, request: &ProcessRequest) -> anyhow::Result<Document>;
}

/// Builds a fresh processor handle for one input item.
pub trait ProcessorFactory: Send + Sync {
    fn connect(
        &self,
        credentials: &ServiceAccountCredentials,
        location: Location,
    ) -> Result<Box<dyn DocumentProcessor>, NodeError>;
}

// ── Response tree ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    /// Passed through untouched, so kept as raw JSON.
    #[serde(default)]
    pub entities: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(default)]
    pub page_number: Option<u32>,
    #[serde(default)]
    pub dimension: Option<Dimension>,
    #[serde(default)]
    pub detected_languages: Vec<DetectedLanguage>,
    #[serde(default)]
    pub paragraphs: Vec<LayoutElement>,
    #[serde(default)]
    pub blocks: Vec<LayoutElement>,
    #[serde(default)]
    pub lines: Vec<LayoutElement>,
    #[serde(default)]
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedLanguage {
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// A paragraph, block or line: only the layout is read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutElement {
    #[serde(default)]
    pub layout: Option<Layout>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    #[serde(default)]
    pub layout: Option<Layout>,
    #[serde(default)]
    pub detected_break: Option<DetectedBreak>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedBreak {
    /// `SPACE`, `WIDE_SPACE` or `HYPHEN`.
    #[serde(default, rename = "type")]
    pub break_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    #[serde(default)]
    pub text_anchor: Option<TextAnchor>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAnchor {
    #[serde(default)]
    pub text_segments: Vec<TextSegment>,
}

/// `[start_index, end_index)` into `Document.text`, counted in characters.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSegment {
    #[serde(default, deserialize_with = "int64")]
    pub start_index: Option<u64>,
    #[serde(default, deserialize_with = "int64")]
    pub end_index: Option<u64>,
}

/// proto3 JSON encodes int64 as a string; accept both forms.
fn int64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(u64),
        Text(String),
    }

    match Option::<Int64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Int64::Number(n)) => Ok(Some(n)),
        Some(Int64::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
