//! Table schemas for the forum sample.
//!
//! Three tables are hard-coded; only their provisioned throughput can be
//! chosen. See "Creating Tables and Loading Data" in the DynamoDB developer
//! guide for where the layout comes from.

use crate::{AttributeValue, Error, Item, Result};

use serde::Deserialize;

pub const THREAD: &str = "Thread";
pub const REPLY: &str = "Reply";
pub const FORUM: &str = "Forum";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    S,
    N,
    B,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: &'static str,
    pub scalar_type: ScalarType,
}

impl KeyAttribute {
    pub const fn s(name: &'static str) -> Self {
        Self {
            name,
            scalar_type: ScalarType::S,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    pub partition: KeyAttribute,
    pub sort: Option<KeyAttribute>,
}

impl KeySchema {
    pub fn attributes(&self) -> impl Iterator<Item = &KeyAttribute> {
        std::iter::once(&self.partition).chain(self.sort.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    All,
    KeysOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryIndex {
    pub name: &'static str,
    pub key_schema: KeySchema,
    pub projection: Projection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Throughput {
    pub read: i64,
    pub write: i64,
}

impl Default for Throughput {
    fn default() -> Self {
        Self {
            read: 20,
            write: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub primary_key: KeySchema,
    pub secondary_indexes: Vec<SecondaryIndex>,
    pub throughput: Throughput,
}

impl TableSpec {
    /// Every attribute that appears in a key schema, table keys first, each once.
    pub fn attribute_definitions(&self) -> Vec<&KeyAttribute> {
        let mut definitions: Vec<&KeyAttribute> = vec![];

        let index_keys = self
            .secondary_indexes
            .iter()
            .flat_map(|index| index.key_schema.attributes());

        for attribute in self.primary_key.attributes().chain(index_keys) {
            if !definitions.iter().any(|a| a.name == attribute.name) {
                definitions.push(attribute);
            }
        }

        definitions
    }

    pub fn key_names(&self) -> Vec<&'static str> {
        self.primary_key.attributes().map(|a| a.name).collect()
    }

    /// Build a primary key from positional string values, partition first.
    pub fn lookup_key(&self, values: &[&str]) -> Result<Item> {
        let names = self.key_names();

        if names.len() != values.len() {
            return Err(Error::MalformedKey {
                table: self.name.to_string(),
                reason: format!(
                    "expected {} key value(s) ({}), got {}",
                    names.len(),
                    names.join(", "),
                    values.len()
                ),
            });
        }

        Ok(names
            .into_iter()
            .zip(values)
            .map(|(name, value)| (name.to_string(), AttributeValue::s(*value)))
            .collect())
    }
}

pub fn thread(throughput: Throughput) -> TableSpec {
    TableSpec {
        name: THREAD,
        primary_key: KeySchema {
            partition: KeyAttribute::s("ForumName"),
            sort: Some(KeyAttribute::s("Subject")),
        },
        secondary_indexes: vec![],
        throughput,
    }
}

pub fn reply(throughput: Throughput) -> TableSpec {
    TableSpec {
        name: REPLY,
        primary_key: KeySchema {
            partition: KeyAttribute::s("Id"),
            sort: Some(KeyAttribute::s("ReplyDateTime")),
        },
        secondary_indexes: vec![SecondaryIndex {
            name: "PostedBy-Message-Index",
            key_schema: KeySchema {
                partition: KeyAttribute::s("PostedBy"),
                sort: Some(KeyAttribute::s("Message")),
            },
            projection: Projection::All,
        }],
        throughput,
    }
}

pub fn forum(throughput: Throughput) -> TableSpec {
    TableSpec {
        name: FORUM,
        primary_key: KeySchema {
            partition: KeyAttribute::s("Name"),
            sort: None,
        },
        secondary_indexes: vec![],
        throughput,
    }
}

/// Ordered set of table specs handed to the lifecycle controller.
#[derive(Debug, Clone)]
pub struct Registry {
    specs: Vec<TableSpec>,
    deletion_order: Vec<&'static str>,
}

impl Registry {
    /// Tables are created and deleted in the given order.
    pub fn new(specs: Vec<TableSpec>) -> Self {
        let deletion_order = specs.iter().map(|s| s.name).collect();
        Self {
            specs,
            deletion_order,
        }
    }

    pub fn forum(throughput: Throughput) -> Self {
        Self {
            specs: vec![thread(throughput), reply(throughput), forum(throughput)],
            deletion_order: vec![REPLY, THREAD, FORUM],
        }
    }

    pub fn specs(&self) -> &[TableSpec] {
        &self.specs
    }

    pub fn get(&self, name: &str) -> Result<&TableSpec> {
        self.specs
            .iter()
            .find(|spec| spec.name == name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }

    pub fn deletion_order(&self) -> &[&'static str] {
        &self.deletion_order
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::forum(Throughput::default())
    }
}
