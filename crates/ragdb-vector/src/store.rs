//! LanceDB adapter for the `VectorStore` trait.
//!
//! Upsert is implemented with `merge_insert` keyed on `id`, which is what
//! makes re-ingestion idempotent at the storage layer. Queries run as
//! brute-force cosine-distance scans unless LanceDB has an ANN index.

use async_trait::async_trait;
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, Connection, DistanceType};
use std::path::Path;
use std::sync::Arc;

use arrow_array::{FixedSizeListArray, Float32Array, Int32Array, RecordBatch, RecordBatchIterator, StringArray};

use ragdb_core::error::{Error, Result};
use ragdb_core::traits::VectorStore;
use ragdb_core::types::{ChunkId, ChunkRecord, ExportedChunk, Meta, SearchHit};

use crate::schema::{build_arrow_schema, EMBEDDING_DIM};

pub struct LanceStore {
    conn: Connection,
    table_name: String,
}

impl LanceStore {
    /// Open (or create) the collection. `persist_dir = None` connects to
    /// an ephemeral in-memory database that lives as long as this store.
    pub async fn connect(persist_dir: Option<&Path>, table_name: &str) -> Result<Self> {
        let uri = match persist_dir {
            Some(dir) => dir.to_string_lossy().to_string(),
            None => "memory://".to_string(),
        };
        let conn = connect(&uri).execute().await.map_err(unavailable)?;
        let store = Self { conn, table_name: table_name.to_string() };
        store.ensure_table().await?;
        Ok(store)
    }

    async fn ensure_table(&self) -> Result<()> {
        let names = self.conn.table_names().execute().await.map_err(unavailable)?;
        if names.contains(&self.table_name) {
            return Ok(());
        }
        // create empty table with 0 rows
        let schema = build_arrow_schema();
        let iter = RecordBatchIterator::new(vec![].into_iter(), schema);
        self.conn
            .create_table(&self.table_name, Box::new(iter))
            .execute()
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn open_table(&self) -> Result<lancedb::Table> {
        self.conn.open_table(&self.table_name).execute().await.map_err(unavailable)
    }

    fn records_to_batch(records: &[ChunkRecord]) -> Result<RecordBatch> {
        let schema = build_arrow_schema();
        let mut ids = Vec::with_capacity(records.len());
        let mut filenames = Vec::with_capacity(records.len());
        let mut ordinals = Vec::with_capacity(records.len());
        let mut contents = Vec::with_capacity(records.len());
        let mut metadatas = Vec::with_capacity(records.len());
        let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::with_capacity(records.len());
        for rec in records {
            ids.push(rec.id.clone());
            filenames.push(rec.filename.clone());
            ordinals.push(rec.ordinal as i32);
            contents.push(rec.content.clone());
            metadatas.push(
                serde_json::to_string(&rec.metadata)
                    .map_err(|e| Error::IndexUnavailable(format!("metadata serialization: {}", e)))?,
            );
            vectors.push(Some(rec.vector.iter().map(|&x| Some(x)).collect()));
        }
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(ids)),
                Arc::new(StringArray::from(filenames)),
                Arc::new(Int32Array::from(ordinals)),
                Arc::new(StringArray::from(contents)),
                Arc::new(StringArray::from(metadatas)),
                Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(
                    vectors.into_iter(),
                    EMBEDDING_DIM,
                )),
            ],
        )
        .map_err(|e| Error::IndexUnavailable(e.to_string()))
    }
}

#[async_trait]
impl VectorStore for LanceStore {
    async fn upsert(&self, records: &[ChunkRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        let batch = Self::records_to_batch(records)?;
        let schema = batch.schema();
        let reader = Box::new(RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema));
        let table = self.open_table().await?;
        let mut mi = table.merge_insert(&["id"]);
        mi.when_matched_update_all(None).when_not_matched_insert_all();
        mi.execute(reader).await.map_err(unavailable)?;
        Ok(())
    }

    async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        let table = self.open_table().await?;
        let mut stream = table
            .vector_search(vector.to_vec())
            .map_err(unavailable)?
            .distance_type(DistanceType::Cosine)
            .limit(k)
            .execute()
            .await
            .map_err(unavailable)?;

        let mut hits = Vec::new();
        while let Some(batch) = stream.try_next().await.map_err(unavailable)? {
            let ids = string_col(&batch, "id")?;
            let contents = string_col(&batch, "content")?;
            let metadatas = string_col(&batch, "metadata")?;
            let distances = float_col(&batch, "_distance")?;
            for i in 0..batch.num_rows() {
                hits.push(SearchHit {
                    id: ids.value(i).to_string(),
                    content: contents.value(i).to_string(),
                    metadata: parse_meta(metadatas.value(i))?,
                    distance: distances.value(i),
                });
            }
        }
        hits.sort_by(|a, b| a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        Ok(hits)
    }

    async fn get_all(&self) -> Result<Vec<ExportedChunk>> {
        let table = self.open_table().await?;
        let mut stream = table.query().execute().await.map_err(unavailable)?;
        let mut out = Vec::new();
        while let Some(batch) = stream.try_next().await.map_err(unavailable)? {
            let ids = string_col(&batch, "id")?;
            let contents = string_col(&batch, "content")?;
            let metadatas = string_col(&batch, "metadata")?;
            for i in 0..batch.num_rows() {
                out.push(ExportedChunk {
                    id: ids.value(i).to_string(),
                    content: contents.value(i).to_string(),
                    metadata: parse_meta(metadatas.value(i))?,
                });
            }
        }
        Ok(out)
    }

    async fn count(&self) -> Result<usize> {
        let table = self.open_table().await?;
        table.count_rows(None).await.map_err(unavailable)
    }

    async fn delete_stale(&self, filename: &str, keep_ids: &[ChunkId]) -> Result<usize> {
        let table = self.open_table().await?;
        let mut stream = table
            .query()
            .only_if(format!("filename = '{}'", escape(filename)))
            .execute()
            .await
            .map_err(unavailable)?;

        let mut stale: Vec<String> = Vec::new();
        while let Some(batch) = stream.try_next().await.map_err(unavailable)? {
            let ids = string_col(&batch, "id")?;
            for i in 0..batch.num_rows() {
                let id = ids.value(i);
                if !keep_ids.iter().any(|k| k == id) {
                    stale.push(id.to_string());
                }
            }
        }
        if stale.is_empty() {
            return Ok(0);
        }
        let id_list = stale
            .iter()
            .map(|id| format!("'{}'", escape(id)))
            .collect::<Vec<_>>()
            .join(", ");
        table
            .delete(&format!("id IN ({})", id_list))
            .await
            .map_err(unavailable)?;
        Ok(stale.len())
    }
}

fn unavailable<E: std::fmt::Display>(e: E) -> Error {
    Error::IndexUnavailable(e.to_string())
}

fn escape(s: &str) -> String {
    s.replace('\'', "''")
}

fn parse_meta(raw: &str) -> Result<Meta> {
    serde_json::from_str(raw).map_err(|e| Error::IndexUnavailable(format!("metadata column is not valid JSON: {}", e)))
}

fn string_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| Error::IndexUnavailable(format!("column '{}' missing or not Utf8", name)))
}

fn float_col<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Float32Array> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
        .ok_or_else(|| Error::IndexUnavailable(format!("column '{}' missing or not Float32", name)))
}
