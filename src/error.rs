use crate::client::ClientError;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Create or delete was rejected for a reason other than the table
    /// already existing / already being gone.
    #[error("`{table}`: {source}")]
    Remote {
        table: String,
        #[source]
        source: ClientError,
    },
    /// A describe or get call failed while polling or looking up.
    #[error("`{table}`: {source}")]
    Transport {
        table: String,
        #[source]
        source: ClientError,
    },
    #[error("`{table}` failed to become active: {reason}")]
    ResourceFailed { table: String, reason: String },
    #[error("`{table}` did not settle after {attempts} polls")]
    PollExhausted { table: String, attempts: u32 },
    #[error("Malformed key for `{table}`: {reason}")]
    MalformedKey { table: String, reason: String },
    #[error("Unknown table: `{0}`")]
    UnknownTable(String),
}

impl Error {
    pub fn remote<T: Into<String>>(table: T, source: ClientError) -> Self {
        Self::Remote {
            table: table.into(),
            source,
        }
    }

    pub fn transport<T: Into<String>>(table: T, source: ClientError) -> Self {
        Self::Transport {
            table: table.into(),
            source,
        }
    }
}
