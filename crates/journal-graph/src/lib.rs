//! Graph store trait implementations: in-memory and Neo4j-backed.

mod memory;

#[cfg(feature = "neo4j")]
mod neo4j;

pub use journal_types::{EmotionCount, EntryWriteUnit, GraphStore, GraphStoreError};
pub use memory::{EdgeRecord, GraphSnapshot, InMemoryGraphStore};

#[cfg(feature = "neo4j")]
pub use neo4j::{GraphConfig, Neo4jGraphStore};
