use std::env;
use std::fs;
use std::path::PathBuf;

use ragdb_core::config::Config;
use ragdb_vector::RagIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load()?;

    let output = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("knowledge_base.json"));

    let index = RagIndex::open(&config.index).await?;
    let records = index.export_all().await?;

    fs::write(&output, serde_json::to_string_pretty(&records)?)?;
    println!("Exported {} records to {}", records.len(), output.display());
    Ok(())
}
