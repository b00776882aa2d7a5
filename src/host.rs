//! Host-side execution payload.
//!
//! The workflow engine posts one batch of input items together with the
//! node parameters, injected credentials and its continue-on-fail flag.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::credentials::ServiceAccountCredentials;
use crate::error::NodeError;
use crate::executor::{ExecutionContext, OutputItem};
use crate::params::NodeParameters;

/// A binary attachment as the host stores it: base64 text plus metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    pub data: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputItem {
    #[serde(default)]
    pub binary: HashMap<String, BinaryData>,
    /// Per-item overrides merged over the node-level parameters.
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub credentials: ServiceAccountCredentials,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub continue_on_fail: bool,
    #[serde(default)]
    pub items: Vec<InputItem>,
}

#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub items: Vec<OutputItem>,
}

impl ExecutionContext for ExecuteRequest {
    fn items_len(&self) -> usize {
        self.items.len()
    }

    fn node_parameters(&self, item_index: usize) -> Result<NodeParameters, NodeError> {
        let mut merged = self.parameters.clone();
        if let Some(item) = self.items.get(item_index) {
            for (key, value) in &item.parameters {
                merged.insert(key.clone(), value.clone());
            }
        }
        NodeParameters::from_value(serde_json::Value::Object(merged))
    }

    fn binary_data(&self, item_index: usize, property: &str) -> Option<&BinaryData> {
        self.items.get(item_index)?.binary.get(property)
    }

    fn credentials(&self) -> &ServiceAccountCredentials {
        &self.credentials
    }

    fn continue_on_fail(&self) -> bool {
        self.continue_on_fail
    }
}
