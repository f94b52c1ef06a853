use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Track has no identifier: {0}")]
    MissingId(String),

    #[error("Malformed artifact line {line}: {reason}")]
    MalformedArtifact { line: usize, reason: String },

    #[error("Lemmatizer error: {0}")]
    Lemmatizer(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
