use crate::client::Client;
use crate::types::Item;
use crate::{Error, Result};

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "result", content = "item", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupResult {
    Found(Item),
    NotFound,
}

impl LookupResult {
    pub fn item(&self) -> Option<&Item> {
        match self {
            LookupResult::Found(item) => Some(item),
            LookupResult::NotFound => None,
        }
    }
}

/// Fetch one item by its full primary key. The key is sent as is; a key that
/// does not match the table's schema is rejected by the store.
pub async fn get(client: &dyn Client, table: &str, key: Item) -> Result<LookupResult> {
    let output = client
        .get_item(table, key)
        .await
        .map_err(|err| Error::transport(table, err))?;

    match output.item {
        Some(item) => Ok(LookupResult::Found(item)),
        None => {
            debug!("`{table}`: no item for the given key");
            Ok(LookupResult::NotFound)
        }
    }
}
