//! The retrieval engine facade.
//!
//! `RagIndex` owns the chunking policy, the embedding function and the
//! storage backend, and exposes the four operations the conversation
//! layer consumes: `ingest`, `search`, `is_empty`, `export_all`. One
//! instance is built at process start and passed by reference; there is
//! no hidden global state.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use ragdb_core::chunker::TextSplitter;
use ragdb_core::config::{expand_path, IndexConfig};
use ragdb_core::error::{Error, Result};
use ragdb_core::traits::{Embedder, VectorStore};
use ragdb_core::types::{chunk_id, ChunkId, ChunkRecord, Document, ExportedChunk, IngestReport, SearchHit, SkippedDocument};

use crate::store::LanceStore;

pub struct RagIndex {
    store: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    splitter: TextSplitter,
}

impl RagIndex {
    pub fn new(store: Arc<dyn VectorStore>, embedder: Arc<dyn Embedder>, splitter: TextSplitter) -> Self {
        Self { store, embedder, splitter }
    }

    /// Build an index from configuration: LanceDB storage (on disk under
    /// `persist_dir`, or in-memory when unset) plus the default embedder.
    pub async fn open(cfg: &IndexConfig) -> anyhow::Result<Self> {
        cfg.validate()?;
        let splitter = TextSplitter::new(cfg.chunk_size, cfg.chunk_overlap)?;
        let persist_dir = cfg.persist_dir.as_deref().map(expand_path);
        if let Some(dir) = &persist_dir {
            std::fs::create_dir_all(dir)?;
        }
        let store = LanceStore::connect(persist_dir.as_deref(), &cfg.collection).await?;
        let embedder: Arc<dyn Embedder> = Arc::from(ragdb_embed::get_default_embedder()?);
        Ok(Self::new(Arc::new(store), embedder, splitter))
    }

    /// Chunk, embed and upsert a batch of documents.
    ///
    /// The whole batch is submitted as a single storage upsert, so either
    /// every accepted chunk becomes visible or the call fails. Documents
    /// that cannot be processed (missing filename, empty content, failed
    /// embedding) are skipped individually and reported, never silently
    /// dropped. After the upsert, records of an ingested file whose id is
    /// no longer produced by that file are deleted, so shrunk or edited
    /// documents leave no orphans behind.
    pub async fn ingest(&self, documents: &[Document]) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        let mut records: Vec<ChunkRecord> = Vec::new();
        // Ids are unioned per filename so that a batch carrying several
        // documents under the same name keeps all of them; reconciliation
        // must only ever remove records no document in the batch produced.
        let mut per_file_ids: HashMap<String, Vec<ChunkId>> = HashMap::new();

        for doc in documents {
            let Some(filename) = doc.filename().map(str::to_string) else {
                skip(&mut report, "<unknown>", "missing 'filename' metadata");
                continue;
            };
            if doc.content.trim().is_empty() {
                skip(&mut report, &filename, "empty content");
                continue;
            }
            let chunks = self.splitter.split(&doc.content);
            if chunks.is_empty() {
                skip(&mut report, &filename, "no chunks produced");
                continue;
            }
            let vectors = match self.embedder.embed_batch(&chunks) {
                Ok(v) => v,
                Err(e) => {
                    skip(&mut report, &filename, &format!("embedding failed: {}", e));
                    continue;
                }
            };
            let mut ids = Vec::with_capacity(chunks.len());
            for (ordinal, (text, vector)) in chunks.into_iter().zip(vectors).enumerate() {
                let id = chunk_id(&filename, ordinal, &text);
                ids.push(id.clone());
                records.push(ChunkRecord {
                    id,
                    filename: filename.clone(),
                    ordinal,
                    content: text,
                    metadata: doc.metadata.clone(),
                    vector,
                });
            }
            report.documents_indexed += 1;
            report.chunks_indexed += ids.len();
            per_file_ids.entry(filename).or_default().extend(ids);
        }

        if !records.is_empty() {
            self.store.upsert(&records).await?;
        }
        for (filename, ids) in &per_file_ids {
            let removed = self.store.delete_stale(filename, ids).await?;
            if removed > 0 {
                info!(filename = %filename, removed, "reconciled stale chunks");
            }
        }
        info!(
            documents = report.documents_indexed,
            chunks = report.chunks_indexed,
            skipped = report.skipped.len(),
            "ingest complete"
        );
        Ok(report)
    }

    /// Top-`n_results` nearest chunks by cosine distance, most similar
    /// first. An empty index yields an empty result, not an error.
    pub async fn search(&self, query: &str, n_results: usize) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Err(Error::Query("query text must not be empty".to_string()));
        }
        if n_results == 0 {
            return Err(Error::InvalidConfig("n_results must be a positive integer".to_string()));
        }
        let vector = self
            .embedder
            .embed_batch(&[query.to_string()])
            .map_err(|e| Error::Embedding(e.to_string()))?
            .remove(0);
        self.store.query(&vector, n_results).await
    }

    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.store.count().await? == 0)
    }

    /// Dump every record in the index. Order is unspecified.
    pub async fn export_all(&self) -> Result<Vec<ExportedChunk>> {
        self.store.get_all().await
    }
}

fn skip(report: &mut IngestReport, filename: &str, reason: &str) {
    warn!(filename = %filename, reason = %reason, "skipping document");
    report.skipped.push(SkippedDocument { filename: filename.to_string(), reason: reason.to_string() });
}
