//! Resolves document bytes and MIME type for one item.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use tracing::debug;

use crate::documentai::RawDocument;
use crate::error::NodeError;
use crate::executor::ExecutionContext;
use crate::params::{ContentSource, NodeParameters};

/// Base64 prefixes of known magic bytes, checked in order.
const MIME_PREFIXES: &[(&str, &str)] = &[("/9j/", "image/jpeg"), ("iVBORw0KGgo", "image/png")];

const FALLBACK_MIME: &str = "application/pdf";

/// Attachments that arrive without a declared type.
const UNKNOWN_BINARY_MIME: &str = "application/octet-stream";

/// Guess the MIME type of inline base64 content.
pub fn sniff_mime_type(base64: &str) -> &'static str {
    MIME_PREFIXES
        .iter()
        .find(|(prefix, _)| base64.starts_with(prefix))
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME)
}

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);

/// Standard alphabet, padding optional.
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);

/// URL-safe alphabet, padding optional.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

fn decode(content: &str) -> Result<Vec<u8>, NodeError> {
    let compact: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    match STANDARD_LENIENT.decode(&compact) {
        Ok(bytes) => Ok(bytes),
        Err(_) => Ok(URL_SAFE_LENIENT.decode(&compact)?),
    }
}

/// Read the content source selected by the item's input type.
pub fn resolve_document<C: ExecutionContext + ?Sized>(
    ctx: &C,
    item_index: usize,
    params: &NodeParameters,
) -> Result<RawDocument, NodeError> {
    match params.content_source() {
        ContentSource::Binary { property } => {
            let binary = ctx
                .binary_data(item_index, property)
                .ok_or_else(|| NodeError::MissingBinaryData {
                    property: property.to_string(),
                })?;
            debug!(
                "Item {}: binary property '{}' ({})",
                item_index,
                property,
                binary.file_name.as_deref().unwrap_or("unnamed")
            );
            Ok(RawDocument {
                content: decode(&binary.data)?,
                mime_type: binary
                    .mime_type
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_BINARY_MIME.to_string()),
            })
        }
        ContentSource::Base64 { content } => Ok(RawDocument {
            content: decode(content)?,
            mime_type: sniff_mime_type(content).to_string(),
        }),
    }
}
