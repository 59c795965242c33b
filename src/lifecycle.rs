//! Create or delete every table in a registry and wait for each one to settle.
//!
//! Both operations run in two phases. First one request is issued per table,
//! in order; "already exists" on create and "not found" on delete are recorded
//! and skipped, anything else aborts the whole call before any polling. Then
//! each accepted table is polled on its own until it reaches ACTIVE (create)
//! or disappears (delete).

use crate::client::{Client, ErrorKind};
use crate::poll::{poll_until, FixedInterval, Poll, PollPolicy};
use crate::schema::TableSpec;
use crate::types::{ResourceState, TableDescription};
use crate::{Error, Result};

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreateResult {
    Created(TableDescription),
    AlreadyExists { table_name: String, message: String },
}

impl CreateResult {
    pub fn table_name(&self) -> &str {
        match self {
            CreateResult::Created(description) => description.table_name.as_str(),
            CreateResult::AlreadyExists { table_name, .. } => table_name.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeleteResult {
    Deleted(TableDescription),
    NotFound { table_name: String },
}

impl DeleteResult {
    pub fn table_name(&self) -> &str {
        match self {
            DeleteResult::Deleted(description) => description.table_name.as_str(),
            DeleteResult::NotFound { table_name } => table_name.as_str(),
        }
    }
}

/// Last observed state of one table. Only moves forward; a describe that
/// reports an earlier state is a stale read and is not recorded.
#[derive(Debug)]
struct Resource {
    table: String,
    state: ResourceState,
}

impl Resource {
    fn new(table: &str, state: ResourceState) -> Self {
        Self {
            table: table.to_string(),
            state,
        }
    }

    /// Returns `false` when `next` is behind the recorded state.
    fn observe(&mut self, next: ResourceState) -> bool {
        if !self.state.can_become(&next) {
            warn!("`{}`: stale {} while {}, polling again", self.table, next, self.state);
            return false;
        }

        if self.state != next {
            info!("`{}`: {} -> {}", self.table, self.state, next);
        }
        self.state = next;
        true
    }

    fn on_create(&mut self, description: TableDescription) -> Result<Poll<TableDescription>> {
        if !self.observe(description.state.clone()) {
            return Ok(Poll::Pending);
        }

        match description.state {
            ResourceState::Active => Ok(Poll::Ready(description)),
            ResourceState::Failed(reason) => Err(Error::ResourceFailed {
                table: self.table.clone(),
                reason,
            }),
            _ => Ok(Poll::Pending),
        }
    }

    /// `None` means the table could not be found any more.
    fn on_delete(
        &mut self,
        described: Option<TableDescription>,
        deleting: &TableDescription,
    ) -> Poll<TableDescription> {
        match described {
            Some(description) => {
                self.observe(description.state);
                Poll::Pending
            }
            None => {
                self.observe(ResourceState::Absent);
                Poll::Ready(deleting.clone().with_state(ResourceState::Absent))
            }
        }
    }
}

pub struct Lifecycle {
    client: Arc<dyn Client>,
    policy: Box<dyn PollPolicy>,
}

impl Lifecycle {
    /// Polls every 500ms with no upper bound.
    pub fn new(client: Arc<dyn Client>) -> Self {
        Self {
            client,
            policy: Box::new(FixedInterval::default()),
        }
    }

    pub fn with_policy<P: PollPolicy + 'static>(self, policy: P) -> Self {
        Self {
            policy: Box::new(policy),
            ..self
        }
    }

    /// Create every table and wait until the new ones are ACTIVE.
    /// Results follow the order of `specs`.
    pub async fn create_all(&self, specs: &[TableSpec]) -> Result<Vec<CreateResult>> {
        let mut results: Vec<CreateResult> = Vec::with_capacity(specs.len());

        for spec in specs {
            match self.client.create_table(spec).await {
                Ok(description) => {
                    info!("Creating `{}`", spec.name);
                    results.push(CreateResult::Created(description));
                }
                Err(err) if err.kind() == ErrorKind::ResourceInUse => {
                    warn!("`{}` already exists", spec.name);
                    results.push(CreateResult::AlreadyExists {
                        table_name: spec.name.to_string(),
                        message: err.message().to_string(),
                    });
                }
                Err(err) => {
                    error!("Failed to create `{}`: {}", spec.name, err);
                    return Err(Error::remote(spec.name, err));
                }
            }
        }

        for result in results.iter_mut() {
            if let CreateResult::Created(description) = result {
                *description = self.wait_until_active(description.clone()).await?;
            }
        }

        Ok(results)
    }

    /// Delete every named table and wait until each accepted one is gone.
    /// Results follow the order of `names`.
    pub async fn delete_all<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<DeleteResult>> {
        let mut results: Vec<DeleteResult> = Vec::with_capacity(names.len());

        for name in names.iter().map(AsRef::as_ref) {
            match self.client.delete_table(name).await {
                Ok(description) => {
                    info!("Deleting `{name}`");
                    results.push(DeleteResult::Deleted(description));
                }
                Err(err) if err.kind() == ErrorKind::ResourceNotFound => {
                    warn!("`{name}` does not exist");
                    results.push(DeleteResult::NotFound {
                        table_name: name.to_string(),
                    });
                }
                Err(err) => {
                    error!("Failed to delete `{name}`: {err}");
                    return Err(Error::remote(name, err));
                }
            }
        }

        for result in results.iter_mut() {
            if let DeleteResult::Deleted(description) = result {
                *description = self.wait_until_absent(description.clone()).await?;
            }
        }

        Ok(results)
    }

    async fn wait_until_active(&self, created: TableDescription) -> Result<TableDescription> {
        let table = created.table_name.clone();
        let mut resource = Resource::new(&table, ResourceState::Creating);

        if let Poll::Ready(description) = resource.on_create(created)? {
            return Ok(description);
        }

        poll_until(
            self.policy.as_ref(),
            &table,
            || async {
                self.client
                    .describe_table(&table)
                    .await
                    .map_err(|err| Error::transport(&table, err))
            },
            |description| resource.on_create(description),
        )
        .await
    }

    async fn wait_until_absent(&self, deleting: TableDescription) -> Result<TableDescription> {
        let table = deleting.table_name.clone();
        let mut resource = Resource::new(&table, ResourceState::Deleting);

        poll_until(
            self.policy.as_ref(),
            &table,
            || async {
                match self.client.describe_table(&table).await {
                    Ok(description) => Ok(Some(description)),
                    Err(err) if err.kind() == ErrorKind::ResourceNotFound => Ok(None),
                    Err(err) => Err(Error::transport(&table, err)),
                }
            },
            |described| Ok(resource.on_delete(described, &deleting)),
        )
        .await
    }
}
