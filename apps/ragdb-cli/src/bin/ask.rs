use std::env;

use ragdb_chat::generator::{GroqClient, GroqConfig};
use ragdb_chat::{Assistant, FileChatMemory};
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
        eprintln!("Usage: {} <question> [--user ID] [--session ID]", args[0]);
        std::process::exit(1);
    }
    let question = &args[1];
    let mut user_id = "default_user".to_string();
    let mut session_id = "default_session".to_string();
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--user" => {
                if let Some(v) = args.get(i + 1) {
                    user_id = v.clone();
                    i += 1;
                }
            }
            "--session" => {
                if let Some(v) = args.get(i + 1) {
                    session_id = v.clone();
                    i += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    let index = RagIndex::open(&config.index).await?;
    if index.is_empty().await? {
        println!("Index is empty. Run ragdb-ingest first.");
        return Ok(());
    }

    let generator = GroqClient::from_env(GroqConfig {
        model: config.chat.model.clone(),
        temperature: config.chat.temperature,
        max_tokens: config.chat.max_tokens,
    })?;
    let memory = FileChatMemory::new(config.chat.history_dir.as_str());
    let assistant = Assistant::new(index, Box::new(memory), Box::new(generator), config.chat.n_results);

    let answer = assistant.answer(&user_id, &session_id, question).await?;
    println!("{}", answer.answer);
    if !answer.sources.is_empty() {
        println!("\nSources:");
        for source in &answer.sources {
            println!("  - {}", source);
        }
    }
    Ok(())
}
