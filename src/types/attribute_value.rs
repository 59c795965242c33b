use aws_sdk_dynamodb::{primitives::Blob, types};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single DynamoDB attribute, (de)serialized in DynamoDB JSON form
/// (`{"S": "Amazon DynamoDB"}`, `{"N": "3"}`, `{"B": "aGVsbG8="}`, ...).
/// Binary values are raw bytes here and base64 text in JSON.
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeValue {
    B(#[serde(with = "binary")] Vec<u8>),
    Bool(bool),
    Bs(#[serde(with = "binary_set")] Vec<Vec<u8>>),
    L(Vec<AttributeValue>),
    M(HashMap<String, AttributeValue>),
    N(String),
    Ns(Vec<String>),
    Null(bool),
    S(String),
    Ss(Vec<String>),
    #[serde(skip_deserializing)]
    Unknown,
}

impl AttributeValue {
    pub fn s<T: Into<String>>(value: T) -> Self {
        AttributeValue::S(value.into())
    }
}

mod binary {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&BASE64.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        BASE64.decode(encoded).map_err(D::Error::custom)
    }
}

mod binary_set {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(set: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(set.iter().map(|bytes| BASE64.encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<u8>>, D::Error> {
        Vec::<String>::deserialize(deserializer)?
            .into_iter()
            .map(|encoded| BASE64.decode(encoded).map_err(D::Error::custom))
            .collect()
    }
}

impl From<types::AttributeValue> for AttributeValue {
    fn from(value: types::AttributeValue) -> AttributeValue {
        match value {
            types::AttributeValue::B(v) => AttributeValue::B(v.into_inner()),
            types::AttributeValue::Bool(v) => AttributeValue::Bool(v),
            types::AttributeValue::Bs(v) => {
                AttributeValue::Bs(v.into_iter().map(Blob::into_inner).collect())
            }
            types::AttributeValue::L(v) => {
                AttributeValue::L(v.into_iter().map(AttributeValue::from).collect())
            }
            types::AttributeValue::M(v) => AttributeValue::M(from_sdk_item(v)),
            types::AttributeValue::N(v) => AttributeValue::N(v),
            types::AttributeValue::Ns(v) => AttributeValue::Ns(v),
            types::AttributeValue::Null(v) => AttributeValue::Null(v),
            types::AttributeValue::S(v) => AttributeValue::S(v),
            types::AttributeValue::Ss(v) => AttributeValue::Ss(v),
            _ => AttributeValue::Unknown,
        }
    }
}

impl From<AttributeValue> for types::AttributeValue {
    fn from(value: AttributeValue) -> types::AttributeValue {
        match value {
            AttributeValue::B(v) => types::AttributeValue::B(Blob::new(v)),
            AttributeValue::Bool(v) => types::AttributeValue::Bool(v),
            AttributeValue::Bs(v) => {
                types::AttributeValue::Bs(v.into_iter().map(Blob::new).collect())
            }
            AttributeValue::L(v) => {
                types::AttributeValue::L(v.into_iter().map(types::AttributeValue::from).collect())
            }
            AttributeValue::M(v) => types::AttributeValue::M(into_sdk_item(v)),
            AttributeValue::N(v) => types::AttributeValue::N(v),
            AttributeValue::Ns(v) => types::AttributeValue::Ns(v),
            AttributeValue::Null(v) => types::AttributeValue::Null(v),
            AttributeValue::S(v) => types::AttributeValue::S(v),
            AttributeValue::Ss(v) => types::AttributeValue::Ss(v),
            // The SDK has no way to send an attribute it could not decode.
            AttributeValue::Unknown => types::AttributeValue::Null(true),
        }
    }
}

pub fn from_sdk_item(
    value: HashMap<String, types::AttributeValue>,
) -> HashMap<String, AttributeValue> {
    value
        .into_iter()
        .map(|(key, val)| (key, AttributeValue::from(val)))
        .collect()
}

pub fn into_sdk_item(
    value: HashMap<String, AttributeValue>,
) -> HashMap<String, types::AttributeValue> {
    value
        .into_iter()
        .map(|(key, val)| (key, types::AttributeValue::from(val)))
        .collect()
}
