use thiserror::Error;

/// Failure taxonomy for the retrieval engine.
///
/// `InvalidConfig` and `Query` are caller mistakes and are surfaced before
/// any storage or embedding work happens. `Ingestion` is reported per
/// document inside an `IngestReport` rather than failing a whole batch.
/// `IndexUnavailable` means the storage backend could not be reached or
/// written to; the engine does not retry.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Ingestion failed for '{filename}': {reason}")]
    Ingestion { filename: String, reason: String },

    #[error("Index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("Invalid query: {0}")]
    Query(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),
}

pub type Result<T> = std::result::Result<T, Error>;
