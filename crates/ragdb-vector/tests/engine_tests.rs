use std::sync::Arc;

use ragdb_core::chunker::TextSplitter;
use ragdb_core::types::Document;
use ragdb_core::Error;
use ragdb_embed::{HashEmbedder, EMBEDDING_DIM};
use ragdb_vector::{LanceStore, RagIndex};

async fn in_memory_index(chunk_size: usize, chunk_overlap: usize) -> RagIndex {
    let store = LanceStore::connect(None, "rag_collection").await.expect("store");
    let embedder = Arc::new(HashEmbedder::new(EMBEDDING_DIM));
    let splitter = TextSplitter::new(chunk_size, chunk_overlap).expect("splitter");
    RagIndex::new(Arc::new(store), embedder, splitter)
}

#[tokio::test]
async fn ingest_is_idempotent() -> anyhow::Result<()> {
    let index = in_memory_index(500, 50).await;
    let doc = Document::new("A".repeat(1000), "x.txt", "txt");

    let first = index.ingest(std::slice::from_ref(&doc)).await?;
    assert_eq!(first.chunks_indexed, 3, "500/500/remainder windows");
    let count_after_first = index.export_all().await?.len();

    let second = index.ingest(std::slice::from_ref(&doc)).await?;
    assert_eq!(second.chunks_indexed, 3);
    let exported = index.export_all().await?;
    assert_eq!(exported.len(), count_after_first, "re-ingestion must not duplicate records");

    let mut ids: Vec<_> = exported.iter().map(|c| c.id.clone()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), exported.len(), "ids are unique");
    Ok(())
}

#[tokio::test]
async fn edited_document_replaces_and_reconciles() -> anyhow::Result<()> {
    let index = in_memory_index(500, 50).await;

    let original = Document::new("A".repeat(1000), "x.txt", "txt");
    index.ingest(&[original]).await?;
    let before = index.export_all().await?;
    assert_eq!(before.len(), 3);

    // Same filename, shorter content: two chunks now. The old third
    // chunk's id must not survive reconciliation.
    let edited = Document::new("B".repeat(600), "x.txt", "txt");
    let report = index.ingest(&[edited]).await?;
    assert_eq!(report.chunks_indexed, 2);

    let after = index.export_all().await?;
    assert_eq!(after.len(), 2, "stale chunks of the shrunk document are deleted");
    for chunk in &after {
        assert!(chunk.content.starts_with('B'));
    }
    Ok(())
}

#[tokio::test]
async fn same_filename_twice_in_one_batch_keeps_both_documents() -> anyhow::Result<()> {
    let index = in_memory_index(500, 50).await;
    let docs = vec![
        Document::new("A".repeat(1000), "x.txt", "txt"),
        Document::new("B".repeat(600), "x.txt", "txt"),
    ];
    let report = index.ingest(&docs).await?;
    assert_eq!(report.documents_indexed, 2);
    assert_eq!(report.chunks_indexed, 5, "3 windows for the first, 2 for the second");

    // Reconciliation must treat the batch's chunks for a filename as one
    // set; neither document may evict the other's records.
    let exported = index.export_all().await?;
    assert_eq!(exported.len(), 5);
    assert!(exported.iter().any(|c| c.content.starts_with('A')));
    assert!(exported.iter().any(|c| c.content.starts_with('B')));
    Ok(())
}

#[tokio::test]
async fn search_respects_bounds_and_ordering() -> anyhow::Result<()> {
    let index = in_memory_index(500, 50).await;
    let docs = vec![
        Document::new("how to build a log shelter in the forest", "shelter.txt", "txt"),
        Document::new("filtering and boiling water for safe drinking", "water.txt", "txt"),
        Document::new("baking bread in a dutch oven over coals", "bread.txt", "txt"),
    ];
    index.ingest(&docs).await?;

    let hits = index.search("drinking water safety", 2).await?;
    assert!(hits.len() <= 2);
    assert!(!hits.is_empty());
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance, "distances are non-decreasing");
    }

    // Asking for more than the index holds returns what exists.
    let all = index.search("anything at all", 50).await?;
    assert!(all.len() <= index.export_all().await?.len());
    Ok(())
}

#[tokio::test]
async fn search_on_empty_index_returns_empty() -> anyhow::Result<()> {
    let index = in_memory_index(500, 50).await;
    assert!(index.is_empty().await?);
    let hits = index.search("nothing here yet", 5).await?;
    assert!(hits.is_empty());
    Ok(())
}

#[tokio::test]
async fn invalid_queries_are_rejected_before_embedding() {
    let index = in_memory_index(500, 50).await;
    assert!(matches!(index.search("   ", 5).await, Err(Error::Query(_))));
    assert!(matches!(index.search("valid", 0).await, Err(Error::InvalidConfig(_))));
}

#[tokio::test]
async fn export_covers_every_record_with_fields() -> anyhow::Result<()> {
    let index = in_memory_index(120, 20).await;
    let docs = vec![
        Document::new("alpha bravo charlie delta echo foxtrot golf hotel india juliett kilo lima mike november oscar papa quebec romeo sierra tango", "nato.txt", "txt"),
        Document::new("one two three", "digits.txt", "txt"),
    ];
    let report = index.ingest(&docs).await?;
    assert_eq!(report.documents_indexed, 2);

    let exported = index.export_all().await?;
    assert_eq!(exported.len(), report.chunks_indexed);
    for chunk in &exported {
        assert!(!chunk.id.is_empty());
        assert!(!chunk.content.is_empty());
        assert!(chunk.metadata.contains_key("filename"));
        assert!(chunk.metadata.contains_key("type"));
    }
    Ok(())
}

#[tokio::test]
async fn empty_documents_are_skipped_and_reported() -> anyhow::Result<()> {
    let index = in_memory_index(500, 50).await;
    let docs = vec![
        Document::new("", "empty.txt", "txt"),
        Document::new("some real content", "real.txt", "txt"),
    ];
    let report = index.ingest(&docs).await?;
    assert_eq!(report.documents_indexed, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].filename, "empty.txt");
    assert!(!index.is_empty().await?);
    Ok(())
}

#[tokio::test]
async fn ingest_then_search_sees_new_chunks() -> anyhow::Result<()> {
    let index = in_memory_index(500, 50).await;
    index
        .ingest(&[Document::new("a very specific sentence about beekeeping", "bees.txt", "txt")])
        .await?;
    let hits = index.search("beekeeping", 1).await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].metadata.get("filename").map(String::as_str), Some("bees.txt"));
    Ok(())
}
