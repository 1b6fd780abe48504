//! Persisted conversation turns, keyed by (user, session).
//!
//! Turns are appended to a JSONL file per session under
//! `<root>/<user_id>/<session_id>.jsonl`, so append order is read order.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn now(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), timestamp: Utc::now() }
    }
}

pub trait ChatMemory: Send + Sync {
    fn append(&self, user_id: &str, session_id: &str, turn: &ChatTurn) -> Result<()>;
    /// All turns of a session in append order. A session that was never
    /// written to reads as empty.
    fn load(&self, user_id: &str, session_id: &str) -> Result<Vec<ChatTurn>>;
}

pub struct FileChatMemory {
    root: PathBuf,
}

impl FileChatMemory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn session_file(&self, user_id: &str, session_id: &str) -> Result<PathBuf> {
        validate_id("user_id", user_id)?;
        validate_id("session_id", session_id)?;
        Ok(self.root.join(user_id).join(format!("{}.jsonl", session_id)))
    }
}

impl ChatMemory for FileChatMemory {
    fn append(&self, user_id: &str, session_id: &str, turn: &ChatTurn) -> Result<()> {
        let path = self.session_file(user_id, session_id)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        let line = serde_json::to_string(turn)?;
        writeln!(file, "{}", line)?;
        Ok(())
    }

    fn load(&self, user_id: &str, session_id: &str) -> Result<Vec<ChatTurn>> {
        let path = self.session_file(user_id, session_id)?;
        if !path.exists() {
            return Ok(vec![]);
        }
        let reader = BufReader::new(fs::File::open(&path)?);
        let mut turns = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            turns.push(serde_json::from_str(&line)?);
        }
        Ok(turns)
    }
}

/// Ids become path components, so anything that could traverse
/// directories is rejected outright.
fn validate_id(what: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(anyhow!("{} must not be empty", what));
    }
    if id.contains('/') || id.contains('\\') || id.contains("..") {
        return Err(anyhow!("{} contains path characters: {:?}", what, id));
    }
    Ok(())
}
