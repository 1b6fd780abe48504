//! Configuration loading and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*`
//! environment variables into typed sections. Nested keys use `__` in the
//! environment (e.g. `APP_INDEX__CHUNK_SIZE=400`).

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Settings for the vector index and the chunking policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Table (collection) name inside the LanceDB database.
    pub collection: String,
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Overlap between adjacent chunks, strictly less than `chunk_size`.
    pub chunk_overlap: usize,
    /// Directory for the on-disk database. `None` means an ephemeral
    /// in-memory index.
    pub persist_dir: Option<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            collection: "rag_collection".to_string(),
            chunk_size: 500,
            chunk_overlap: 50,
            persist_dir: None,
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("index.chunk_size must be greater than zero".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "index.chunk_overlap ({}) must be strictly less than index.chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.collection.trim().is_empty() {
            return Err(Error::InvalidConfig("index.collection must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Where raw documents are loaded from.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub docs_dir: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { docs_dir: "data".to_string() }
    }
}

/// Settings for the conversation layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Directory holding per-user/per-session history files.
    pub history_dir: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Context chunks retrieved per question.
    pub n_results: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_dir: "chat_history".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            n_results: 3,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index: IndexConfig,
    pub data: DataConfig,
    pub chat: ChatConfig,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
        config.index.validate()?;
        Ok(config)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after
/// expansion. Absolute paths are returned as-is.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() {
        p
    } else {
        base.join(p)
    }
}
