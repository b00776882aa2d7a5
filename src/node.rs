//! Node descriptor: the configuration form the host renders for this node.

use serde::Serialize;

use crate::credentials::CREDENTIAL_NAME;
use crate::descriptor::{OptionValue, PropertyDescriptor};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub display_name: &'static str,
    pub name: &'static str,
    pub group: Vec<&'static str>,
    pub version: u32,
    pub description: &'static str,
    pub defaults: NodeDefaults,
    pub inputs: Vec<&'static str>,
    pub outputs: Vec<&'static str>,
    pub credentials: Vec<CredentialRef>,
    pub properties: Vec<PropertyDescriptor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeDefaults {
    pub name: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CredentialRef {
    pub name: &'static str,
    pub required: bool,
}

pub fn google_document_ai() -> NodeDescription {
    NodeDescription {
        display_name: "Google Document AI OCR",
        name: "googleDocumentAI",
        group: vec!["transform"],
        version: 1,
        description: "Extract text from documents using Google Document AI OCR",
        defaults: NodeDefaults {
            name: "Google Document AI OCR",
            color: "#4285F4",
        },
        inputs: vec!["main"],
        outputs: vec!["main"],
        credentials: vec![CredentialRef {
            name: CREDENTIAL_NAME,
            required: true,
        }],
        properties: vec![
            PropertyDescriptor::string(
                "Project ID",
                "projectId",
                "Google Cloud Project ID where Document AI is enabled",
            )
            .required(),
            PropertyDescriptor::options(
                "Location",
                "location",
                vec![
                    OptionValue { name: "United States", value: "us" },
                    OptionValue { name: "European Union", value: "eu" },
                ],
                "Location of the Document AI processor",
            ),
            PropertyDescriptor::string(
                "Processor ID",
                "processorId",
                "ID of the Document AI processor to use",
            )
            .required(),
            PropertyDescriptor::options(
                "Input Type",
                "inputType",
                vec![
                    OptionValue { name: "Binary File", value: "binaryFile" },
                    OptionValue { name: "Base64 String", value: "base64" },
                ],
                "How the document data will be provided",
            ),
            PropertyDescriptor::string(
                "Binary Property",
                "binaryPropertyName",
                "Name of the binary property containing the document file",
            )
            .with_default("data")
            .required()
            .shown_when("inputType", &["binaryFile"]),
            PropertyDescriptor::string(
                "Base64 Content",
                "base64Content",
                "Base64-encoded content of the document",
            )
            .required()
            .shown_when("inputType", &["base64"]),
        ],
    }
}
