//! Traits and error types for the pipeline seams.

use crate::{AnalysisResult, ChatTurn, EmotionCount, EntryWriteUnit, SubmitOutcome};
use async_trait::async_trait;

/// Graph store abstraction: one write-unit per processed entry plus the
/// aggregate read the memory rollup needs.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Eager liveness probe, run once at startup. A store that cannot be
    /// reached here must abort initialization.
    async fn verify_connectivity(&self) -> Result<(), GraphStoreError>;

    /// Persist one entry and its edges as a single atomic transaction:
    /// vocabulary nodes merged by key, edges created per occurrence. On
    /// failure the transaction is rolled back, never partially committed.
    /// No retry happens at this layer.
    async fn write_entry(&self, unit: &EntryWriteUnit) -> Result<(), GraphStoreError>;

    /// EXPRESSES edge counts per emotion type, descending by count,
    /// truncated to `limit`.
    async fn emotion_counts(&self, limit: usize) -> Result<Vec<EmotionCount>, GraphStoreError>;
}

/// Analyzer: one journal entry plus its memory context in, a typed result
/// or error out. Implementations must not panic past this boundary.
#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, entry: &str, memory: &str) -> Result<AnalysisResult, AnalyzerError>;
}

/// Caller-facing journal operations, the boundary the presentation layer
/// invokes.
#[async_trait]
pub trait Journal: Send + Sync {
    /// Process one submission end to end. Never returns an error: failures
    /// are folded into the outcome's notice with the history left unchanged.
    async fn submit_entry(&self, text: &str, history: Vec<ChatTurn>) -> SubmitOutcome;

    /// Current memory rollup (sentinel strings cover the empty graph and
    /// read failures).
    async fn memory_summary(&self) -> String;
}

#[derive(Debug, thiserror::Error)]
pub enum GraphStoreError {
    #[error("graph store unreachable: {0}")]
    Unreachable(String),
    #[error("graph write failed: {0}")]
    WriteFailed(String),
    #[error("graph read failed: {0}")]
    ReadFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("inference endpoint unreachable: {0}")]
    EndpointUnreachable(String),
    #[error("inference endpoint returned {status}: {body}")]
    EndpointError { status: u16, body: String },
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
}

/// Per-submission pipeline failure. Startup failures never take this form;
/// they abort initialization instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("analysis: {0}")]
    Analysis(#[from] AnalyzerError),
    #[error("graph: {0}")]
    Graph(#[from] GraphStoreError),
}
