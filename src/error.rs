use crate::store::RecordId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid package catalog: {0}")]
    Catalog(#[source] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[source] serde_json::Error),

    #[error("invalid record id {0:?}, expected 24 hex characters")]
    InvalidRecordId(String),

    #[error("record {id} not found in room {room}")]
    RecordNotFound { room: RecordId, id: RecordId },
}

pub type Result<T> = std::result::Result<T, Error>;
