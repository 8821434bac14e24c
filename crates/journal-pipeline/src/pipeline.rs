//! Entry pipeline: memory fetch, analysis, graph persistence, memory refresh.

use crate::memory::{self, MEMORY_LIMIT};
use journal_types::{
    Analyzer, ChatTurn, EntryRecord, EntryWriteUnit, GraphStore, Journal, PipelineError,
    SubmitOutcome,
};

const EMPTY_ENTRY_PROMPT: &str = "Please enter a journal entry.";

/// Coordinates one submission end to end against an injected graph store and
/// analyzer. Each submission is an independent state machine; the only state
/// shared between submissions is the store handle itself.
pub struct EntryPipeline<G, A> {
    graph: G,
    analyzer: A,
}

impl<G, A> EntryPipeline<G, A>
where
    G: GraphStore,
    A: Analyzer,
{
    pub fn new(graph: G, analyzer: A) -> Self {
        Self { graph, analyzer }
    }

    /// Analyze and persist one non-empty entry, then refresh the memory
    /// rollup. Fails as a whole: an analysis error writes nothing, and a
    /// failed write leaves no partial entry. Returns the rendered analysis
    /// block and the refreshed memory.
    async fn process(
        &self,
        text: &str,
        prior_memory: &str,
    ) -> Result<(String, String), PipelineError> {
        let result = self.analyzer.analyze(text, prior_memory).await?;
        let unit = EntryWriteUnit::from_analysis(EntryRecord::new(text), &result);
        self.graph.write_entry(&unit).await?;
        tracing::info!(entry_id = %unit.entry.id, edges = unit.edge_count(), "entry persisted");
        let refreshed = memory::summarize(&self.graph, MEMORY_LIMIT).await;
        Ok((result.render_block(), refreshed))
    }
}

#[async_trait::async_trait]
impl<G, A> Journal for EntryPipeline<G, A>
where
    G: GraphStore,
    A: Analyzer,
{
    async fn submit_entry(&self, text: &str, mut history: Vec<ChatTurn>) -> SubmitOutcome {
        if text.trim().is_empty() {
            // No external calls on this path.
            return SubmitOutcome {
                history,
                entry_text: text.to_string(),
                memory: String::new(),
                notice: Some(EMPTY_ENTRY_PROMPT.to_string()),
            };
        }

        let prior_memory = memory::summarize(&self.graph, MEMORY_LIMIT).await;
        match self.process(text, &prior_memory).await {
            Ok((rendered, refreshed)) => {
                history.push(ChatTurn::user(text));
                history.push(ChatTurn::assistant(rendered));
                SubmitOutcome {
                    history,
                    entry_text: String::new(),
                    memory: refreshed,
                    notice: None,
                }
            }
            Err(e) => {
                match &e {
                    PipelineError::Analysis(_) => {
                        tracing::error!(error = %e, "analysis failed, nothing persisted");
                    }
                    PipelineError::Graph(_) => {
                        // The entry text goes to the log so the lost
                        // submission can be reconstructed.
                        tracing::error!(error = %e, entry = text, "graph write failed, entry lost");
                    }
                }
                SubmitOutcome {
                    history,
                    entry_text: text.to_string(),
                    memory: prior_memory,
                    notice: Some(format!("Could not process this entry: {}", e)),
                }
            }
        }
    }

    async fn memory_summary(&self) -> String {
        memory::summarize(&self.graph, MEMORY_LIMIT).await
    }
}
