use crate::index::DocId;
use thiserror::Error;

/// Errors raised by analysis, indexing, scoring and persistence.
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown stemming mode, ranking model or an out-of-range parameter.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Index used out of order: read before finalize or written after it.
    #[error("index state error: {0}")]
    State(String),

    #[error("unknown document id {0}")]
    UnknownDocument(DocId),

    #[error("persisted index error: {0}")]
    Persist(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Error::State(msg.into())
    }
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
