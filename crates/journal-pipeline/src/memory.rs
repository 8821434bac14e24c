//! Memory rollup: recent emotion frequencies as a compact context string.

use journal_types::GraphStore;

/// Sentinel when the graph holds no emotions yet.
pub const NO_PAST_EMOTIONS: &str = "No past emotions";
/// Sentinel when the rollup read fails.
pub const MEMORY_READ_ERROR: &str = "Error retrieving memory";
/// How many distinct emotion types the rollup keeps.
pub const MEMORY_LIMIT: usize = 5;

/// Summarize the most frequent emotion types as `"<type> (<count>x)"`,
/// most frequent first.
///
/// Read failures are absorbed into a sentinel: the rollup is best-effort
/// context for the next analysis, not a correctness-critical read.
pub async fn summarize<G: GraphStore>(graph: &G, limit: usize) -> String {
    match graph.emotion_counts(limit).await {
        Ok(counts) if counts.is_empty() => NO_PAST_EMOTIONS.to_string(),
        Ok(counts) => counts
            .iter()
            .map(|c| format!("{} ({}x)", c.emotion, c.count))
            .collect::<Vec<_>>()
            .join(", "),
        Err(e) => {
            tracing::warn!(error = %e, "memory rollup read failed");
            MEMORY_READ_ERROR.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_graph::InMemoryGraphStore;
    use journal_types::{
        AnalysisResult, EmotionCount, EntryRecord, EntryWriteUnit, GraphStoreError,
    };

    struct FailingReads;

    #[async_trait::async_trait]
    impl GraphStore for FailingReads {
        async fn verify_connectivity(&self) -> Result<(), GraphStoreError> {
            Ok(())
        }

        async fn write_entry(&self, _unit: &EntryWriteUnit) -> Result<(), GraphStoreError> {
            Ok(())
        }

        async fn emotion_counts(
            &self,
            _limit: usize,
        ) -> Result<Vec<EmotionCount>, GraphStoreError> {
            Err(GraphStoreError::ReadFailed("connection reset".to_string()))
        }
    }

    fn sentiment_unit(sentiment: &str) -> EntryWriteUnit {
        let result = AnalysisResult {
            sentiment: Some(sentiment.to_string()),
            ..Default::default()
        };
        EntryWriteUnit::from_analysis(EntryRecord::new("entry"), &result)
    }

    #[tokio::test]
    async fn empty_graph_yields_sentinel() {
        let store = InMemoryGraphStore::new();
        assert_eq!(summarize(&store, MEMORY_LIMIT).await, NO_PAST_EMOTIONS);
    }

    #[tokio::test]
    async fn read_failure_yields_sentinel() {
        assert_eq!(summarize(&FailingReads, MEMORY_LIMIT).await, MEMORY_READ_ERROR);
    }

    #[tokio::test]
    async fn rollup_orders_by_count_and_caps_at_limit() {
        let store = InMemoryGraphStore::new();
        for (emotion, n) in [
            ("happy", 5),
            ("sad", 3),
            ("anxious", 3),
            ("calm", 1),
            ("tired", 4),
            ("bored", 2),
        ] {
            for _ in 0..n {
                store.write_entry(&sentiment_unit(emotion)).await.unwrap();
            }
        }

        let summary = summarize(&store, MEMORY_LIMIT).await;
        // Six distinct types exist; only five make the rollup, calm drops.
        assert_eq!(
            summary,
            "happy (5x), tired (4x), anxious (3x), sad (3x), bored (2x)"
        );
    }

    #[tokio::test]
    async fn single_emotion_rollup_format() {
        let store = InMemoryGraphStore::new();
        store.write_entry(&sentiment_unit("positive")).await.unwrap();
        assert_eq!(summarize(&store, MEMORY_LIMIT).await, "positive (1x)");
    }
}
