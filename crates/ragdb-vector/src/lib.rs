//! ragdb-vector
//!
//! The persistent similarity index: a LanceDB-backed `VectorStore`
//! implementation plus the `RagIndex` facade that ties chunking,
//! embedding and storage together.

pub mod engine;
pub mod schema;
pub mod store;

pub use engine::RagIndex;
pub use store::LanceStore;
