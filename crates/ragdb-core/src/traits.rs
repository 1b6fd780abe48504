use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChunkId, ChunkRecord, ExportedChunk, SearchHit};

/// Opaque text vectorizer. Indexing and querying against one index must
/// use the same implementation and configuration; changing the embedder
/// invalidates previously stored vectors without a reindex.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Persistent similarity index backend.
///
/// Idempotent `upsert` is a required capability: records sharing an id
/// with an incoming record are replaced, never duplicated. Backends that
/// lack a native upsert must implement it as delete-then-insert inside
/// their adapter.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert-or-replace the whole batch in one operation.
    async fn upsert(&self, records: &[ChunkRecord]) -> Result<()>;

    /// The `k` nearest records to `vector` by cosine distance, ascending.
    /// Returns fewer than `k` hits when the index holds fewer records.
    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>>;

    /// Every record currently in the index, order unspecified. Read-only.
    async fn get_all(&self) -> Result<Vec<ExportedChunk>>;

    /// Number of records in the index.
    async fn count(&self) -> Result<usize>;

    /// Delete records of `filename` whose id is not in `keep_ids`.
    /// Reconciles orphans left behind when a document shrinks or changes.
    /// Returns the number of ids that were eligible for deletion.
    async fn delete_stale(&self, filename: &str, keep_ids: &[ChunkId]) -> Result<usize>;
}
