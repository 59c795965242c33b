use super::{BatchWriteOutput, Client, ClientError, ErrorKind, GetItemOutput};
use crate::schema::TableSpec;
use crate::types::{Item, RequestItems, ResourceState, TableDescription, WriteRequest};

use async_trait::async_trait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    CreateTable,
    DescribeTable,
    DeleteTable,
    BatchWrite,
    GetItem,
}

#[derive(Debug, Clone)]
struct MockTable {
    key_names: Vec<String>,
    state: ResourceState,
    // Describe calls left before a Creating/Deleting table settles.
    countdown: u32,
    items: Vec<Item>,
}

impl MockTable {
    fn key_of(&self, item: &Item) -> Option<Item> {
        let key: Item = self
            .key_names
            .iter()
            .filter_map(|name| item.get(name).map(|v| (name.clone(), v.clone())))
            .collect();

        if key.len() == self.key_names.len() {
            Some(key)
        } else {
            None
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    tables: BTreeMap<String, MockTable>,
    failures: Vec<(Op, String, ClientError)>,
    calls: Vec<(Op, String)>,
    settle_after: u32,
    // Answered by describe before the table's own state.
    scripted: BTreeMap<String, VecDeque<ResourceState>>,
    // Handed back by batch write instead of being written.
    unprocessed: BTreeMap<String, Vec<WriteRequest>>,
}

impl MockState {
    fn record(&mut self, op: Op, table: &str) -> Result<(), ClientError> {
        self.calls.push((op, table.to_string()));

        match self
            .failures
            .iter()
            .find(|(o, t, _)| *o == op && t.as_str() == table)
        {
            Some((_, _, err)) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn active_table(&mut self, table: &str) -> Result<&mut MockTable, ClientError> {
        self.tables
            .get_mut(table)
            .filter(|t| t.state == ResourceState::Active)
            .ok_or_else(|| not_found(table))
    }
}

/// In-memory stand-in for DynamoDB. Tables take `settle_after` describe calls
/// to go from CREATING to ACTIVE, or from DELETING to gone.
#[derive(Debug, Clone, Default)]
pub struct MockClient {
    state: Arc<Mutex<MockState>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settle_after(self, polls: u32) -> Self {
        self.state.lock().unwrap().settle_after = polls;
        self
    }

    /// Seed an already ACTIVE table.
    pub fn with_table(self, spec: &TableSpec) -> Self {
        self.state.lock().unwrap().tables.insert(
            spec.name.to_string(),
            MockTable {
                key_names: key_names(spec),
                state: ResourceState::Active,
                countdown: 0,
                items: vec![],
            },
        );
        self
    }

    pub fn fail_on<T: Into<String>>(self, op: Op, table: T, err: ClientError) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .push((op, table.into(), err));
        self
    }

    /// Describe reports `states` in turn before the table's real state.
    pub fn describe_as<T: Into<String>>(self, table: T, states: Vec<ResourceState>) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripted
            .insert(table.into(), states.into());
        self
    }

    /// Batch write leaves `requests` unprocessed whenever it receives them.
    pub fn unprocessed_on<T: Into<String>>(self, table: T, requests: Vec<WriteRequest>) -> Self {
        self.state
            .lock()
            .unwrap()
            .unprocessed
            .insert(table.into(), requests);
        self
    }

    pub fn calls(&self) -> Vec<(Op, String)> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, op: Op, table: &str) -> usize {
        self.calls()
            .iter()
            .filter(|(o, t)| *o == op && t.as_str() == table)
            .count()
    }

    pub fn state_of(&self, table: &str) -> ResourceState {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map(|t| t.state.clone())
            .unwrap_or(ResourceState::Absent)
    }

    pub fn items(&self, table: &str) -> Vec<Item> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(table)
            .map(|t| t.items.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Client for MockClient {
    async fn create_table(&self, spec: &TableSpec) -> Result<TableDescription, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record(Op::CreateTable, spec.name)?;

        if state.tables.contains_key(spec.name) {
            return Err(ClientError::new(
                ErrorKind::ResourceInUse,
                format!("ResourceInUseException: Table already exists: {}", spec.name),
            ));
        }

        let countdown = state.settle_after;
        state.tables.insert(
            spec.name.to_string(),
            MockTable {
                key_names: key_names(spec),
                state: ResourceState::Creating,
                countdown,
                items: vec![],
            },
        );

        Ok(TableDescription::new(spec.name, ResourceState::Creating))
    }

    async fn describe_table(&self, table_name: &str) -> Result<TableDescription, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record(Op::DescribeTable, table_name)?;

        if let Some(scripted) = state
            .scripted
            .get_mut(table_name)
            .and_then(VecDeque::pop_front)
        {
            return Ok(TableDescription::new(table_name, scripted));
        }

        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| not_found(table_name))?;

        if table.countdown > 0 {
            table.countdown -= 1;
            return Ok(TableDescription::new(table_name, table.state.clone()));
        }

        match table.state.clone() {
            ResourceState::Creating => {
                table.state = ResourceState::Active;
                Ok(TableDescription::new(table_name, ResourceState::Active))
            }
            ResourceState::Deleting => {
                state.tables.remove(table_name);
                Err(not_found(table_name))
            }
            other => Ok(TableDescription::new(table_name, other)),
        }
    }

    async fn delete_table(&self, table_name: &str) -> Result<TableDescription, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record(Op::DeleteTable, table_name)?;

        let countdown = state.settle_after;
        let table = state
            .tables
            .get_mut(table_name)
            .ok_or_else(|| not_found(table_name))?;

        table.state = ResourceState::Deleting;
        table.countdown = countdown;

        Ok(TableDescription::new(table_name, ResourceState::Deleting))
    }

    async fn batch_write(
        &self,
        request_items: RequestItems,
    ) -> Result<BatchWriteOutput, ClientError> {
        let mut state = self.state.lock().unwrap();

        for table_name in request_items.keys() {
            state.record(Op::BatchWrite, table_name)?;
        }

        // Validate everything first; a rejected request writes nothing.
        for (table_name, requests) in request_items.iter() {
            let table = state.active_table(table_name)?;
            for request in requests {
                let item = match request {
                    WriteRequest::Put { item } => item,
                    WriteRequest::Delete { key } => key,
                };
                if table.key_of(item).is_none() {
                    return Err(validation());
                }
            }
        }

        let mut output = BatchWriteOutput::default();

        for (table_name, requests) in request_items {
            let skipped = state
                .unprocessed
                .get(&table_name)
                .cloned()
                .unwrap_or_default();
            let table = state.active_table(&table_name)?;
            for request in requests {
                if skipped.contains(&request) {
                    output
                        .unprocessed_items
                        .entry(table_name.clone())
                        .or_default()
                        .push(request);
                    continue;
                }
                match request {
                    WriteRequest::Put { item } => {
                        if let Some(key) = table.key_of(&item) {
                            table.items.retain(|i| !table_matches(&key, i));
                        }
                        table.items.push(item);
                    }
                    WriteRequest::Delete { key } => {
                        table.items.retain(|i| !table_matches(&key, i));
                    }
                }
            }
        }

        Ok(output)
    }

    async fn get_item(&self, table_name: &str, key: Item) -> Result<GetItemOutput, ClientError> {
        let mut state = self.state.lock().unwrap();
        state.record(Op::GetItem, table_name)?;

        let table = state.active_table(table_name)?;

        if key.len() != table.key_names.len() || table.key_of(&key).is_none() {
            return Err(validation());
        }

        let item = table
            .items
            .iter()
            .find(|item| table_matches(&key, item))
            .cloned();

        Ok(GetItemOutput { item })
    }
}

fn table_matches(key: &Item, item: &Item) -> bool {
    key.iter().all(|(name, value)| item.get(name) == Some(value))
}

fn key_names(spec: &TableSpec) -> Vec<String> {
    spec.key_names().into_iter().map(String::from).collect()
}

fn not_found(table_name: &str) -> ClientError {
    ClientError::new(
        ErrorKind::ResourceNotFound,
        format!("ResourceNotFoundException: Requested resource not found: Table: {table_name} not found"),
    )
}

fn validation() -> ClientError {
    ClientError::new(
        ErrorKind::Other,
        "ValidationException: The provided key element does not match the schema",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{forum, Throughput};
    use crate::AttributeValue;

    fn forum_item(name: &str) -> Item {
        let mut item = Item::new();
        item.insert("Name".into(), AttributeValue::s(name));
        item
    }

    #[tokio::test]
    async fn it_settles_a_created_table_after_polls() {
        let client = MockClient::new().settle_after(2);
        let spec = forum(Throughput::default());

        client.create_table(&spec).await.unwrap();
        assert_eq!(client.state_of("Forum"), ResourceState::Creating);

        let states = [
            client.describe_table("Forum").await.unwrap().state,
            client.describe_table("Forum").await.unwrap().state,
            client.describe_table("Forum").await.unwrap().state,
        ];
        assert_eq!(
            states,
            [
                ResourceState::Creating,
                ResourceState::Creating,
                ResourceState::Active
            ]
        );
    }

    #[tokio::test]
    async fn it_removes_a_deleted_table_after_polls() {
        let spec = forum(Throughput::default());
        let client = MockClient::new().with_table(&spec).settle_after(1);

        client.delete_table("Forum").await.unwrap();
        assert_eq!(
            client.describe_table("Forum").await.unwrap().state,
            ResourceState::Deleting
        );

        let err = client.describe_table("Forum").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
        assert_eq!(client.state_of("Forum"), ResourceState::Absent);
    }

    #[tokio::test]
    async fn it_replaces_items_with_the_same_key() {
        let spec = forum(Throughput::default());
        let client = MockClient::new().with_table(&spec);

        let mut updated = forum_item("Amazon S3");
        updated.insert("Threads".into(), AttributeValue::N("1".into()));

        let mut items = RequestItems::new();
        items.insert(
            "Forum".into(),
            vec![
                WriteRequest::put(forum_item("Amazon S3")),
                WriteRequest::put(updated.clone()),
            ],
        );
        client.batch_write(items).await.unwrap();

        assert_eq!(client.items("Forum"), vec![updated]);
    }

    #[tokio::test]
    async fn it_writes_nothing_when_a_request_is_invalid() {
        let spec = forum(Throughput::default());
        let client = MockClient::new().with_table(&spec);

        let mut items = RequestItems::new();
        items.insert(
            "Forum".into(),
            vec![WriteRequest::put(forum_item("Amazon S3")), WriteRequest::put(Item::new())],
        );

        let err = client.batch_write(items).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Other);
        assert!(client.items("Forum").is_empty());
    }

    #[tokio::test]
    async fn it_records_calls_and_injected_failures() {
        let client = MockClient::new().fail_on(
            Op::CreateTable,
            "Forum",
            ClientError::new(ErrorKind::Other, "AccessDeniedException"),
        );

        let err = client
            .create_table(&forum(Throughput::default()))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "AccessDeniedException");
        assert_eq!(client.calls(), vec![(Op::CreateTable, "Forum".to_string())]);
        assert_eq!(client.state_of("Forum"), ResourceState::Absent);
    }
}
