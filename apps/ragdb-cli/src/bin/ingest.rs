use std::env;
use std::path::PathBuf;

use ragdb_core::config::Config;
use ragdb_core::loader::DocumentLoader;
use ragdb_vector::RagIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;

    let args: Vec<String> = env::args().skip(1).collect();
    let data_dir = args
        .iter()
        .find(|a| !a.starts_with('-'))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&config.data.docs_dir));

    println!("ragdb ingest\n============");
    println!("Data directory: {}", data_dir.display());

    let loader = DocumentLoader::new();
    let documents = loader.load_directory(&data_dir)?;
    if documents.is_empty() {
        println!("Nothing to ingest.");
        return Ok(());
    }

    let index = RagIndex::open(&config.index).await?;
    let report = index.ingest(&documents).await?;

    println!(
        "Ingested {} documents into {} chunks",
        report.documents_indexed, report.chunks_indexed
    );
    for skipped in &report.skipped {
        println!("  skipped {}: {}", skipped.filename, skipped.reason);
    }
    println!("\nTo search, use: cargo run --bin ragdb-search '<query>'");
    Ok(())
}
