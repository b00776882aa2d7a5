//! Per-item execution loop for the Document AI node.

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::content::resolve_document;
use crate::credentials::ServiceAccountCredentials;
use crate::documentai::{processor_resource_name, ProcessRequest, ProcessorFactory};
use crate::error::{NodeError, NodeOperationError};
use crate::flatten::{flatten_document, FlattenedDocument};
use crate::host::BinaryData;
use crate::params::NodeParameters;

/// What the node reads from its host while executing.
pub trait ExecutionContext: Sync {
    fn items_len(&self) -> usize;
    /// Parameters as evaluated for one item.
    fn node_parameters(&self, item_index: usize) -> Result<NodeParameters, NodeError>;
    fn binary_data(&self, item_index: usize, property: &str) -> Option<&BinaryData>;
    fn credentials(&self) -> &ServiceAccountCredentials;
    fn continue_on_fail(&self) -> bool;
}

/// One output record: the flattened document, or a captured failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutputItem {
    Success(FlattenedDocument),
    Failure {
        error: String,
        #[serde(rename = "pairedItem")]
        paired_item: usize,
    },
}

/// Run every input item in order, one remote call at a time.
///
/// With continue-on-fail, a failing item becomes an [`OutputItem::Failure`]
/// and processing moves on; otherwise the first failure aborts the batch.
pub async fn execute<C: ExecutionContext + ?Sized>(
    ctx: &C,
    processors: &dyn ProcessorFactory,
) -> Result<Vec<OutputItem>, NodeOperationError> {
    let total = ctx.items_len();
    let continue_on_fail = ctx.continue_on_fail();
    info!("Executing {} items (continue_on_fail={})", total, continue_on_fail);

    let mut output = Vec::with_capacity(total);
    for item_index in 0..total {
        let result = process_item(ctx, processors, item_index).await;
        output.push(handle_item_result(result, item_index, continue_on_fail)?);
    }

    Ok(output)
}

/// Map one item's result to an output record or an aborting error.
pub fn handle_item_result(
    result: Result<FlattenedDocument, NodeError>,
    item_index: usize,
    continue_on_fail: bool,
) -> Result<OutputItem, NodeOperationError> {
    match result {
        Ok(doc) => Ok(OutputItem::Success(doc)),
        Err(e) if continue_on_fail => {
            warn!("Item {} failed, continuing: {}", item_index, e);
            Ok(OutputItem::Failure {
                error: e.to_string(),
                paired_item: item_index,
            })
        }
        Err(e) => {
            error!("Item {} failed, aborting: {}", item_index, e);
            Err(NodeOperationError {
                item_index,
                source: e,
            })
        }
    }
}

async fn process_item<C: ExecutionContext + ?Sized>(
    ctx: &C,
    processors: &dyn ProcessorFactory,
    item_index: usize,
) -> Result<FlattenedDocument, NodeError> {
    let params = ctx.node_parameters(item_index)?;
    let raw_document = resolve_document(ctx, item_index, &params)?;

    let processor = processors.connect(ctx.credentials(), params.location)?;
    let request = ProcessRequest {
        name: processor_resource_name(&params.project_id, params.location, &params.processor_id),
        raw_document,
    };

    debug!(
        "Item {}: sending {} bytes ({}) via {}",
        item_index,
        request.raw_document.content.len(),
        request.raw_document.mime_type,
        processor.name()
    );

    let document = processor
        .process(&request)
        .await
        .map_err(NodeError::RemoteCall)?;

    let flattened = flatten_document(document);
    debug!("Item {}: flattened {} pages", item_index, flattened.page_count);
    Ok(flattened)
}
