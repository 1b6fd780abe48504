//! Prompt assembly: retrieved context + recent history + question.

use crate::memory::{ChatTurn, Role};

/// Only the tail of a long conversation is inlined into the prompt.
const MAX_HISTORY_TURNS: usize = 10;

pub fn build_prompt(context: &[String], history: &[ChatTurn], question: &str) -> String {
    let context_block = if context.is_empty() {
        "(no relevant documents found)".to_string()
    } else {
        context.join("\n\n")
    };

    let mut prompt = String::new();
    prompt.push_str(
        "You are a helpful AI assistant. Use the following context to answer the question accurately. \
         If the context doesn't have the information, say \"I don't have enough information from the documents.\"\n\n",
    );
    prompt.push_str("Context:\n");
    prompt.push_str(&context_block);
    prompt.push('\n');

    let tail_start = history.len().saturating_sub(MAX_HISTORY_TURNS);
    let recent = &history[tail_start..];
    if !recent.is_empty() {
        prompt.push_str("\nConversation so far:\n");
        for turn in recent {
            let speaker = match turn.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            prompt.push_str(&format!("{}: {}\n", speaker, turn.content));
        }
    }

    prompt.push_str("\nQuestion:\n");
    prompt.push_str(question);
    prompt.push_str("\n\nAnswer:\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_context_history_and_question() {
        let context = vec!["chunk one".to_string(), "chunk two".to_string()];
        let history = vec![
            ChatTurn::now(Role::User, "earlier question"),
            ChatTurn::now(Role::Assistant, "earlier answer"),
        ];
        let prompt = build_prompt(&context, &history, "what now?");
        assert!(prompt.contains("chunk one\n\nchunk two"));
        assert!(prompt.contains("User: earlier question"));
        assert!(prompt.contains("Assistant: earlier answer"));
        assert!(prompt.contains("Question:\nwhat now?"));
    }

    #[test]
    fn prompt_handles_empty_context() {
        let prompt = build_prompt(&[], &[], "anything?");
        assert!(prompt.contains("(no relevant documents found)"));
    }

    #[test]
    fn only_the_history_tail_is_included() {
        let history: Vec<ChatTurn> = (0..30)
            .map(|i| ChatTurn::now(Role::User, format!("turn {}", i)))
            .collect();
        let prompt = build_prompt(&[], &history, "q");
        assert!(!prompt.contains("turn 0"));
        assert!(prompt.contains("turn 29"));
    }
}
