use super::{BatchWriteOutput, Client, ClientError, ErrorKind, GetItemOutput};
use crate::schema::{KeyAttribute, KeySchema, Projection, ScalarType, TableSpec, Throughput};
use crate::types::{
    from_sdk_item, from_sdk_request_items, into_sdk_item, into_sdk_request_items, Item,
    RequestItems, ResourceState, TableDescription,
};

use async_trait::async_trait;
use aws_sdk_dynamodb::{
    config::Builder as DbConfigBuilder,
    error::{BuildError, DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::{
        batch_write_item::BatchWriteItemError, create_table::CreateTableError,
        delete_table::DeleteTableError, describe_table::DescribeTableError,
        get_item::GetItemError,
    },
    types::{
        self, AttributeDefinition, GlobalSecondaryIndex, KeySchemaElement, KeyType,
        ProjectionType, ProvisionedThroughput, ScalarAttributeType,
    },
    Client as DbClient,
};
use std::fmt::Debug;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DynamodbClient {
    db_client: DbClient,
}

#[async_trait]
impl Client for DynamodbClient {
    async fn create_table(&self, spec: &TableSpec) -> Result<TableDescription, ClientError> {
        debug!("CreateTable {}", spec.name);

        let mut request = self
            .db_client
            .create_table()
            .table_name(spec.name)
            .set_attribute_definitions(Some(attribute_definitions(spec)?))
            .set_key_schema(Some(key_schema(&spec.primary_key)?))
            .provisioned_throughput(provisioned_throughput(spec.throughput)?);

        for index in spec.secondary_indexes.iter() {
            request = request.global_secondary_indexes(
                GlobalSecondaryIndex::builder()
                    .index_name(index.name)
                    .set_key_schema(Some(key_schema(&index.key_schema)?))
                    .projection(
                        types::Projection::builder()
                            .projection_type(projection_type(index.projection))
                            .build(),
                    )
                    .provisioned_throughput(provisioned_throughput(spec.throughput)?)
                    .build()
                    .map_err(from_build)?,
            );
        }

        request
            .send()
            .await
            .map_err(|err| classify(err, create_table_kind))
            .map(|output| describe(spec.name, output.table_description))
    }

    async fn describe_table(&self, table_name: &str) -> Result<TableDescription, ClientError> {
        debug!("DescribeTable {table_name}");

        self.db_client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|err| classify(err, describe_table_kind))
            .map(|output| describe(table_name, output.table))
    }

    async fn delete_table(&self, table_name: &str) -> Result<TableDescription, ClientError> {
        debug!("DeleteTable {table_name}");

        self.db_client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|err| classify(err, delete_table_kind))
            .map(|output| describe(table_name, output.table_description))
    }

    async fn batch_write(
        &self,
        request_items: RequestItems,
    ) -> Result<BatchWriteOutput, ClientError> {
        let request_items = into_sdk_request_items(request_items).map_err(from_build)?;

        self.db_client
            .batch_write_item()
            .set_request_items(Some(request_items))
            .send()
            .await
            .map_err(|err| classify(err, batch_write_item_kind))
            .map(|output| BatchWriteOutput {
                unprocessed_items: output
                    .unprocessed_items
                    .map(from_sdk_request_items)
                    .unwrap_or_default(),
            })
    }

    async fn get_item(&self, table_name: &str, key: Item) -> Result<GetItemOutput, ClientError> {
        debug!("GetItem {table_name}");

        self.db_client
            .get_item()
            .table_name(table_name)
            .set_key(Some(into_sdk_item(key)))
            .send()
            .await
            .map_err(|err| classify(err, get_item_kind))
            .map(|output| GetItemOutput {
                item: output.item.map(from_sdk_item),
            })
    }
}

impl DynamodbClient {
    pub async fn builder() -> DynamodbClientBuilder {
        DynamodbClientBuilder::new().await
    }
}

#[derive(Debug)]
pub struct DynamodbClientBuilder {
    db_builder: DbConfigBuilder,
}

impl DynamodbClientBuilder {
    pub async fn new() -> Self {
        let config = aws_config::load_from_env().await;
        let db_builder = DbConfigBuilder::from(&config);

        Self { db_builder }
    }

    pub fn endpoint_url(self, url: Option<String>) -> Self {
        match url {
            Some(url) => Self {
                db_builder: self.db_builder.endpoint_url(url),
            },
            None => self,
        }
    }

    pub fn build(self) -> DynamodbClient {
        let db_config = self.db_builder.build();
        let db_client = DbClient::from_conf(db_config);

        DynamodbClient { db_client }
    }
}

fn describe(requested: &str, description: Option<types::TableDescription>) -> TableDescription {
    description
        .map(|d| TableDescription::from_sdk(requested, d))
        .unwrap_or_else(|| {
            TableDescription::new(
                requested,
                ResourceState::Failed("no table description returned".into()),
            )
        })
}

fn attribute_definitions(spec: &TableSpec) -> Result<Vec<AttributeDefinition>, ClientError> {
    spec.attribute_definitions()
        .into_iter()
        .map(|attribute| {
            AttributeDefinition::builder()
                .attribute_name(attribute.name)
                .attribute_type(scalar_type(attribute))
                .build()
                .map_err(from_build)
        })
        .collect()
}

fn key_schema(schema: &KeySchema) -> Result<Vec<KeySchemaElement>, ClientError> {
    let hash = std::iter::once((&schema.partition, KeyType::Hash));
    let range = schema.sort.iter().map(|sort| (sort, KeyType::Range));

    hash.chain(range)
        .map(|(attribute, key_type)| {
            KeySchemaElement::builder()
                .attribute_name(attribute.name)
                .key_type(key_type)
                .build()
                .map_err(from_build)
        })
        .collect()
}

fn provisioned_throughput(throughput: Throughput) -> Result<ProvisionedThroughput, ClientError> {
    ProvisionedThroughput::builder()
        .read_capacity_units(throughput.read)
        .write_capacity_units(throughput.write)
        .build()
        .map_err(from_build)
}

fn scalar_type(attribute: &KeyAttribute) -> ScalarAttributeType {
    match attribute.scalar_type {
        ScalarType::S => ScalarAttributeType::S,
        ScalarType::N => ScalarAttributeType::N,
        ScalarType::B => ScalarAttributeType::B,
    }
}

fn projection_type(projection: Projection) -> ProjectionType {
    match projection {
        Projection::All => ProjectionType::All,
        Projection::KeysOnly => ProjectionType::KeysOnly,
    }
}

fn from_build(err: BuildError) -> ClientError {
    ClientError::new(ErrorKind::Other, err.to_string())
}

fn classify<E, R>(err: SdkError<E, R>, kind_of: fn(&E) -> ErrorKind) -> ClientError
where
    E: std::error::Error + ProvideErrorMetadata + 'static,
    R: Debug,
{
    let service_err = match &err {
        SdkError::ServiceError(context) => Some(context.err()),
        _ => None,
    };
    let kind = service_err
        .map(|service_err| match kind_of(service_err) {
            ErrorKind::Other => kind_from_code(service_err.code()),
            kind => kind,
        })
        .unwrap_or(ErrorKind::Other);

    ClientError::new(kind, DisplayErrorContext(&err).to_string())
}

// Errors the service model does not list for an operation still carry a code.
fn kind_from_code(code: Option<&str>) -> ErrorKind {
    match code {
        Some("ConditionalCheckFailedException") => ErrorKind::ConditionalCheckFailed,
        Some("ResourceInUseException") => ErrorKind::ResourceInUse,
        Some("ResourceNotFoundException") => ErrorKind::ResourceNotFound,
        Some("ThrottlingException")
        | Some("ProvisionedThroughputExceededException")
        | Some("RequestLimitExceeded")
        | Some("LimitExceededException") => ErrorKind::Throttled,
        _ => ErrorKind::Other,
    }
}

fn create_table_kind(err: &CreateTableError) -> ErrorKind {
    match err {
        CreateTableError::ResourceInUseException(_) => ErrorKind::ResourceInUse,
        CreateTableError::LimitExceededException(_) => ErrorKind::Throttled,
        _ => ErrorKind::Other,
    }
}

fn describe_table_kind(err: &DescribeTableError) -> ErrorKind {
    match err {
        DescribeTableError::ResourceNotFoundException(_) => ErrorKind::ResourceNotFound,
        _ => ErrorKind::Other,
    }
}

fn delete_table_kind(err: &DeleteTableError) -> ErrorKind {
    match err {
        DeleteTableError::ResourceNotFoundException(_) => ErrorKind::ResourceNotFound,
        DeleteTableError::ResourceInUseException(_) => ErrorKind::ResourceInUse,
        DeleteTableError::LimitExceededException(_) => ErrorKind::Throttled,
        _ => ErrorKind::Other,
    }
}

fn batch_write_item_kind(err: &BatchWriteItemError) -> ErrorKind {
    match err {
        BatchWriteItemError::ResourceNotFoundException(_) => ErrorKind::ResourceNotFound,
        BatchWriteItemError::ProvisionedThroughputExceededException(_)
        | BatchWriteItemError::RequestLimitExceeded(_) => ErrorKind::Throttled,
        _ => ErrorKind::Other,
    }
}

fn get_item_kind(err: &GetItemError) -> ErrorKind {
    match err {
        GetItemError::ResourceNotFoundException(_) => ErrorKind::ResourceNotFound,
        GetItemError::ProvisionedThroughputExceededException(_)
        | GetItemError::RequestLimitExceeded(_) => ErrorKind::Throttled,
        _ => ErrorKind::Other,
    }
}
