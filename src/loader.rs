use crate::client::{Client, ClientError};
use crate::types::RequestItems;

use serde::Serialize;
use tracing::{error, info, warn};

/// One `BatchWriteItem` request. `label` names where the batch came from,
/// usually a sample data file.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteBatch {
    pub label: String,
    pub request_items: RequestItems,
}

impl WriteBatch {
    pub fn new<T: Into<String>>(label: T, request_items: RequestItems) -> Self {
        Self {
            label: label.into(),
            request_items,
        }
    }

    pub fn len(&self) -> usize {
        self.request_items.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchResult {
    /// Accepted. Items the store did not get to are handed back untouched.
    Success {
        label: String,
        unprocessed_items: RequestItems,
    },
    Failure {
        label: String,
        error: ClientError,
    },
}

impl BatchResult {
    pub fn label(&self) -> &str {
        match self {
            BatchResult::Success { label, .. } | BatchResult::Failure { label, .. } => {
                label.as_str()
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchResult::Success { .. })
    }
}

/// Submit every batch, one request each. A failed batch is recorded and the
/// next one is sent anyway. Results follow the order of `batches`.
pub async fn load(client: &dyn Client, batches: Vec<WriteBatch>) -> Vec<BatchResult> {
    let mut results: Vec<BatchResult> = Vec::with_capacity(batches.len());

    for batch in batches {
        let count = batch.len();
        let WriteBatch {
            label,
            request_items,
        } = batch;

        match client.batch_write(request_items).await {
            Ok(output) => {
                if output.unprocessed_items.is_empty() {
                    info!("`{label}`: wrote {count} item(s)");
                } else {
                    warn!(
                        "`{label}`: {} table(s) with unprocessed items",
                        output.unprocessed_items.len()
                    );
                }
                results.push(BatchResult::Success {
                    label,
                    unprocessed_items: output.unprocessed_items,
                });
            }
            Err(err) => {
                error!("`{label}`: {err}");
                results.push(BatchResult::Failure { label, error: err });
            }
        }
    }

    results
}
