//! Google service account credential: descriptor and injected value.

use serde::{Deserialize, Serialize};

use crate::descriptor::{PropertyDescriptor, TypeOptions};

pub const CREDENTIAL_NAME: &str = "googleServiceAccountApi";

/// Static credential metadata read once by the host at registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDescriptor {
    pub name: &'static str,
    pub display_name: &'static str,
    pub documentation_url: &'static str,
    pub icon: &'static str,
    pub properties: Vec<PropertyDescriptor>,
}

/// The single secret this integration needs: a service account key blob.
pub fn google_service_account_api() -> CredentialDescriptor {
    CredentialDescriptor {
        name: CREDENTIAL_NAME,
        display_name: "Google Service Account API",
        documentation_url: "https://cloud.google.com/iam/docs/creating-managing-service-account-keys",
        icon: "file:icons/Google.svg",
        properties: vec![PropertyDescriptor::string(
            "Service Account Key",
            "serviceAccountKey",
            "Enter the JSON key file contents from your Google service account",
        )
        .with_type_options(TypeOptions {
            password: true,
            rows: Some(10),
        })
        .required()],
    }
}

/// Credential values injected by the host for one execution.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAccountCredentials {
    service_account_key: String,
}

impl ServiceAccountCredentials {
    /// Raw JSON key file contents.
    pub fn service_account_key(&self) -> &str {
        &self.service_account_key
    }
}

impl std::fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("service_account_key", &"<redacted>")
            .finish()
    }
}
