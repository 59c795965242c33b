pub mod client;
pub mod config;
mod error;
pub mod lifecycle;
pub mod loader;
pub mod lookup;
pub mod poll;
pub mod sampledata;
pub mod schema;
pub mod types;

pub use client::{Client, ClientError, DynamodbClient, ErrorKind};
pub use config::Config;
pub use error::{Error, Result};
pub use lifecycle::{CreateResult, DeleteResult, Lifecycle};
pub use loader::{load, BatchResult, WriteBatch};
pub use lookup::{get, LookupResult};
pub use schema::{Registry, TableSpec, Throughput};
pub use types::{AttributeValue, Item, ResourceState, TableDescription};

pub const ENV_DYNAMODB_ENDPOINT_URL: &str = "DYNAMODB_ENDPOINT_URL";
pub const ENV_CONFIG_PATH: &str = "FORUM_TABLES_CONFIG";
