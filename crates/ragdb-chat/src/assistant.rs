//! The conversation orchestrator: retrieve context, assemble the prompt,
//! call the generator, persist both turns.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

use ragdb_vector::RagIndex;

use crate::generator::TextGenerator;
use crate::memory::{ChatMemory, ChatTurn, Role};
use crate::prompt::build_prompt;

/// The answer plus the context it was grounded on. `sources` lists the
/// filenames of the retrieved chunks, in retrieval order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub context: Vec<String>,
    pub sources: Vec<String>,
}

pub struct Assistant {
    index: RagIndex,
    memory: Box<dyn ChatMemory>,
    generator: Box<dyn TextGenerator>,
    n_results: usize,
}

impl Assistant {
    pub fn new(
        index: RagIndex,
        memory: Box<dyn ChatMemory>,
        generator: Box<dyn TextGenerator>,
        n_results: usize,
    ) -> Self {
        Self { index, memory, generator, n_results }
    }

    pub fn index(&self) -> &RagIndex {
        &self.index
    }

    pub async fn answer(&self, user_id: &str, session_id: &str, question: &str) -> Result<Answer> {
        let hits = self.index.search(question, self.n_results).await?;
        let context: Vec<String> = hits.iter().map(|h| h.content.clone()).collect();
        let sources: Vec<String> = hits
            .iter()
            .filter_map(|h| h.metadata.get("filename").cloned())
            .collect();

        let history = self.memory.load(user_id, session_id)?;
        let prompt = build_prompt(&context, &history, question);
        let answer = self.generator.complete(&prompt).await?;

        self.memory.append(user_id, session_id, &ChatTurn::now(Role::User, question))?;
        self.memory.append(user_id, session_id, &ChatTurn::now(Role::Assistant, answer.clone()))?;

        info!(user = %user_id, session = %session_id, hits = hits.len(), "answered question");
        Ok(Answer { answer, context, sources })
    }
}
