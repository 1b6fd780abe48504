use std::env;

use ragdb_core::config::Config;
use ragdb_vector::RagIndex;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load()?;

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <query> [--limit N]", args[0]);
        eprintln!("Example: {} 'water purification' --limit 5", args[0]);
        std::process::exit(1);
    }
    let query_text = &args[1];
    let mut limit = 5usize;
    let mut i = 2;
    while i < args.len() {
        if args[i] == "--limit" {
            if let Some(n) = args.get(i + 1).and_then(|v| v.parse::<usize>().ok()) {
                limit = n;
                i += 1;
            } else {
                eprintln!("Error: --limit requires a number");
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let index = RagIndex::open(&config.index).await?;
    if index.is_empty().await? {
        println!("Index is empty. Run ragdb-ingest first.");
        return Ok(());
    }

    let hits = index.search(query_text, limit).await?;
    println!("Found {} results for: \"{}\"", hits.len(), query_text);
    for (i, hit) in hits.iter().enumerate() {
        let filename = hit.metadata.get("filename").map(String::as_str).unwrap_or("?");
        println!("\n  {}. distance={:.4}  file={}  id={}", i + 1, hit.distance, filename, hit.id);
        let preview: String = hit.content.chars().take(160).collect();
        println!("     {}", preview.replace('\n', " "));
    }
    Ok(())
}
