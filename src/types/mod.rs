mod attribute_value;
mod resource_state;
mod table;
mod write_request;

pub use attribute_value::{from_sdk_item, into_sdk_item, AttributeValue};
pub use resource_state::ResourceState;
pub use table::TableDescription;
pub use write_request::{
    from_sdk_request_items, into_sdk_request_items, RequestItems, WriteRequest,
};

use std::collections::HashMap;

/// Attribute name to value; used both for whole items and for keys.
pub type Item = HashMap<String, AttributeValue>;
