use super::ResourceState;

use aws_sdk_dynamodb::types;
use serde::Serialize;

/// What the store reports about one table.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TableDescription {
    pub table_name: String,
    pub state: ResourceState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<i64>,
}

impl TableDescription {
    pub fn new<T: Into<String>>(table_name: T, state: ResourceState) -> Self {
        Self {
            table_name: table_name.into(),
            state,
            table_arn: None,
            item_count: None,
        }
    }

    /// `requested` is used when the response leaves the table name out.
    pub fn from_sdk(requested: &str, description: types::TableDescription) -> Self {
        let state = description
            .table_status
            .map(ResourceState::from)
            .unwrap_or_else(|| ResourceState::Failed("no table status reported".into()));

        Self {
            table_name: description
                .table_name
                .unwrap_or_else(|| requested.to_string()),
            state,
            table_arn: description.table_arn,
            item_count: description.item_count,
        }
    }

    pub fn with_state(self, state: ResourceState) -> Self {
        Self { state, ..self }
    }
}
