//! Typed node parameters, resolved per input item.

use serde::Deserialize;

use crate::error::NodeError;

/// Processor region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    #[default]
    Us,
    Eu,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::Us => "us",
            Location::Eu => "eu",
        }
    }
}

/// How the document content reaches the node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
    #[default]
    BinaryFile,
    Base64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeParameters {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub processor_id: String,
    #[serde(default)]
    pub input_type: InputType,
    #[serde(default = "default_binary_property")]
    pub binary_property_name: String,
    #[serde(default)]
    pub base64_content: String,
}

fn default_binary_property() -> String {
    "data".to_string()
}

/// The one content field selected by [`InputType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSource<'a> {
    Binary { property: &'a str },
    Base64 { content: &'a str },
}

impl NodeParameters {
    /// Parse a merged parameter object and check required fields.
    pub fn from_value(value: serde_json::Value) -> Result<Self, NodeError> {
        let params: Self = serde_json::from_value(value)
            .map_err(|e| NodeError::invalid_parameter("parameters", e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    fn validate(&self) -> Result<(), NodeError> {
        if self.project_id.trim().is_empty() {
            return Err(NodeError::invalid_parameter("projectId", "must not be empty"));
        }
        if self.processor_id.trim().is_empty() {
            return Err(NodeError::invalid_parameter("processorId", "must not be empty"));
        }
        if self.input_type == InputType::BinaryFile && self.binary_property_name.is_empty() {
            return Err(NodeError::invalid_parameter(
                "binaryPropertyName",
                "must not be empty",
            ));
        }
        Ok(())
    }

    /// Only the field matching `input_type` is meaningful; the other is ignored.
    pub fn content_source(&self) -> ContentSource<'_> {
        match self.input_type {
            InputType::BinaryFile => ContentSource::Binary {
                property: &self.binary_property_name,
            },
            InputType::Base64 => ContentSource::Base64 {
                content: &self.base64_content,
            },
        }
    }
}
