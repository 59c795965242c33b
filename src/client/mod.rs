mod dynamodb;
#[cfg(test)]
mod mock;

use crate::schema::TableSpec;
use crate::types::{Item, RequestItems, TableDescription};

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The error categories the rest of the crate makes decisions on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    ConditionalCheckFailed,
    ResourceInUse,
    ResourceNotFound,
    Throttled,
    Other,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConditionalCheckFailed => write!(f, "CONDITIONAL_CHECK_FAILED"),
            ErrorKind::ResourceInUse => write!(f, "RESOURCE_IN_USE"),
            ErrorKind::ResourceNotFound => write!(f, "RESOURCE_NOT_FOUND"),
            ErrorKind::Throttled => write!(f, "THROTTLED"),
            ErrorKind::Other => write!(f, "OTHER"),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Serialize)]
#[error("{message}")]
pub struct ClientError {
    kind: ErrorKind,
    message: String,
}

impl ClientError {
    pub fn new<T: Into<String>>(kind: ErrorKind, message: T) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchWriteOutput {
    pub unprocessed_items: RequestItems,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetItemOutput {
    pub item: Option<Item>,
}

/// Connected handle to the store. Every call is a single request; nothing
/// here retries.
#[async_trait]
pub trait Client: Send + Sync {
    async fn create_table(&self, spec: &TableSpec) -> Result<TableDescription, ClientError>;
    async fn describe_table(&self, table_name: &str) -> Result<TableDescription, ClientError>;
    async fn delete_table(&self, table_name: &str) -> Result<TableDescription, ClientError>;
    async fn batch_write(&self, request_items: RequestItems)
        -> Result<BatchWriteOutput, ClientError>;
    async fn get_item(&self, table_name: &str, key: Item) -> Result<GetItemOutput, ClientError>;
}

pub use dynamodb::{DynamodbClient, DynamodbClientBuilder};
#[cfg(test)]
pub use mock::{MockClient, Op};
