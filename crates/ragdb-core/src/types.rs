//! Domain types shared by the chunking, indexing and retrieval layers.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ChunkId = String;
pub type Meta = HashMap<String, String>;

/// Metadata key that every ingested document must carry. Chunk ids are
/// derived from it, so a document without a filename cannot be indexed.
pub const META_FILENAME: &str = "filename";
/// Metadata key describing the source format ("txt", "md", ...).
pub const META_TYPE: &str = "type";

/// A raw source document as produced by the loader (or any other
/// document source). Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: Meta,
}

impl Document {
    pub fn new(content: impl Into<String>, filename: impl Into<String>, doc_type: impl Into<String>) -> Self {
        let mut metadata = Meta::new();
        metadata.insert(META_FILENAME.to_string(), filename.into());
        metadata.insert(META_TYPE.to_string(), doc_type.into());
        Self { content: content.into(), metadata }
    }

    pub fn filename(&self) -> Option<&str> {
        self.metadata.get(META_FILENAME).map(String::as_str)
    }
}

/// A persisted index entry: one embedded chunk of a source document.
/// Owned exclusively by the indexing path; records with the same id are
/// replaced on re-ingestion, never duplicated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRecord {
    pub id: ChunkId,
    pub filename: String,
    pub ordinal: usize,
    pub content: String,
    pub metadata: Meta,
    pub vector: Vec<f32>,
}

/// One retrieval result. `distance` is cosine distance: lower is more
/// similar. A result list is always ordered by ascending distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ChunkId,
    pub content: String,
    pub metadata: Meta,
    pub distance: f32,
}

/// A record as returned by a full index dump. No ordering guarantee;
/// callers needing one must sort by id themselves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedChunk {
    pub id: ChunkId,
    pub content: String,
    pub metadata: Meta,
}

/// A document that was skipped during ingestion, with the reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedDocument {
    pub filename: String,
    pub reason: String,
}

/// Outcome of one `ingest` call. Skips are reported here instead of being
/// swallowed; a non-empty `skipped` list with `chunks_indexed == 0` means
/// the whole batch was malformed, not that the call failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub documents_indexed: usize,
    pub chunks_indexed: usize,
    pub skipped: Vec<SkippedDocument>,
}

/// Derive the stable id of a chunk from its source filename, its ordinal
/// within the document, its length and a hash of its content.
///
/// Identical (filename, ordinal, content) always yields the same id, which
/// is what makes re-ingestion an upsert instead of a duplicate insert.
pub fn chunk_id(filename: &str, ordinal: usize, content: &str) -> ChunkId {
    let hash = blake3::hash(content.as_bytes()).to_hex();
    format!("{}-{}-{}-{}", filename, ordinal, content.chars().count(), hash)
}
