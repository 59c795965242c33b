use super::{from_sdk_item, into_sdk_item, Item};

use aws_sdk_dynamodb::{error::BuildError, types};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Table name to the write requests aimed at it, the `RequestItems` shape of
/// a `BatchWriteItem` call.
pub type RequestItems = BTreeMap<String, Vec<WriteRequest>>;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum WriteRequest {
    #[serde(rename = "PutRequest")]
    Put {
        #[serde(rename = "Item")]
        item: Item,
    },
    #[serde(rename = "DeleteRequest")]
    Delete {
        #[serde(rename = "Key")]
        key: Item,
    },
}

impl WriteRequest {
    pub fn put(item: Item) -> Self {
        WriteRequest::Put { item }
    }

    pub fn delete(key: Item) -> Self {
        WriteRequest::Delete { key }
    }

    fn into_sdk(self) -> Result<types::WriteRequest, BuildError> {
        let request = match self {
            WriteRequest::Put { item } => types::WriteRequest::builder()
                .put_request(
                    types::PutRequest::builder()
                        .set_item(Some(into_sdk_item(item)))
                        .build()?,
                )
                .build(),
            WriteRequest::Delete { key } => types::WriteRequest::builder()
                .delete_request(
                    types::DeleteRequest::builder()
                        .set_key(Some(into_sdk_item(key)))
                        .build()?,
                )
                .build(),
        };
        Ok(request)
    }

    fn from_sdk(request: types::WriteRequest) -> Option<Self> {
        if let Some(put) = request.put_request {
            return Some(WriteRequest::put(from_sdk_item(put.item)));
        }
        request
            .delete_request
            .map(|delete| WriteRequest::delete(from_sdk_item(delete.key)))
    }
}

pub fn into_sdk_request_items(
    items: RequestItems,
) -> Result<HashMap<String, Vec<types::WriteRequest>>, BuildError> {
    let mut map = HashMap::new();
    for (table, requests) in items {
        let requests = requests
            .into_iter()
            .map(WriteRequest::into_sdk)
            .collect::<Result<Vec<_>, _>>()?;
        map.insert(table, requests);
    }
    Ok(map)
}

pub fn from_sdk_request_items(items: HashMap<String, Vec<types::WriteRequest>>) -> RequestItems {
    items
        .into_iter()
        .map(|(table, requests)| {
            let requests = requests
                .into_iter()
                .filter_map(WriteRequest::from_sdk)
                .collect::<Vec<_>>();
            (table, requests)
        })
        .filter(|(_, requests)| !requests.is_empty())
        .collect()
}
