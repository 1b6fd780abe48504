//! ragdb-chat
//!
//! The conversation layer around the retrieval engine: persisted chat
//! memory per user and session, prompt assembly from retrieved context
//! plus history, and answer generation through a pluggable text
//! generator.

pub mod assistant;
pub mod generator;
pub mod memory;
pub mod prompt;

pub use assistant::{Answer, Assistant};
pub use generator::{GroqClient, TextGenerator};
pub use memory::{ChatMemory, ChatTurn, FileChatMemory, Role};
