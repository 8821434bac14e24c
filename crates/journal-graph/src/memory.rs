//! In-memory graph store: merge-by-key vocabulary nodes, per-entry edges.

use journal_types::{
    relation, EmotionCount, EntryRecord, EntryWriteUnit, GraphStore, GraphStoreError,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Edge from an Entry node to a vocabulary node, one per occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeRecord {
    pub entry_id: String,
    pub relation: String,
    pub target: String,
}

#[derive(Debug, Default)]
struct GraphState {
    /// entry id -> entry node.
    entries: HashMap<String, EntryRecord>,
    /// Vocabulary nodes keyed by their natural text value.
    emotions: BTreeSet<String>,
    themes: BTreeSet<String>,
    suggestions: BTreeSet<String>,
    goals: BTreeSet<String>,
    edges: Vec<EdgeRecord>,
}

/// In-memory implementation of [`GraphStore`].
///
/// One write guard covers a whole write-unit, so units are applied atomically
/// with respect to concurrent readers and writers. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryGraphStore {
    state: Arc<RwLock<GraphState>>,
}

impl InMemoryGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of the stored nodes and edges, for assertions.
    pub async fn snapshot(&self) -> GraphSnapshot {
        let state = self.state.read().await;
        let mut entries: Vec<EntryRecord> = state.entries.values().cloned().collect();
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        GraphSnapshot {
            entries,
            emotions: state.emotions.iter().cloned().collect(),
            themes: state.themes.iter().cloned().collect(),
            suggestions: state.suggestions.iter().cloned().collect(),
            goals: state.goals.iter().cloned().collect(),
            edges: state.edges.clone(),
        }
    }
}

/// Copy of the graph contents at one instant. Vocabulary lists are sorted.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    pub entries: Vec<EntryRecord>,
    pub emotions: Vec<String>,
    pub themes: Vec<String>,
    pub suggestions: Vec<String>,
    pub goals: Vec<String>,
    pub edges: Vec<EdgeRecord>,
}

impl GraphSnapshot {
    /// Edges originating at the given entry.
    pub fn edges_from(&self, entry_id: &str) -> Vec<&EdgeRecord> {
        self.edges.iter().filter(|e| e.entry_id == entry_id).collect()
    }
}

#[async_trait::async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn verify_connectivity(&self) -> Result<(), GraphStoreError> {
        Ok(())
    }

    async fn write_entry(&self, unit: &EntryWriteUnit) -> Result<(), GraphStoreError> {
        let mut state = self.state.write().await;
        state
            .entries
            .insert(unit.entry.id.clone(), unit.entry.clone());
        if let Some(ref sentiment) = unit.sentiment {
            state.emotions.insert(sentiment.clone());
            state.edges.push(EdgeRecord {
                entry_id: unit.entry.id.clone(),
                relation: relation::EXPRESSES.to_string(),
                target: sentiment.clone(),
            });
        }
        for theme in &unit.themes {
            state.themes.insert(theme.clone());
            state.edges.push(EdgeRecord {
                entry_id: unit.entry.id.clone(),
                relation: relation::CONTAINS.to_string(),
                target: theme.clone(),
            });
        }
        for suggestion in &unit.suggestions {
            state.suggestions.insert(suggestion.clone());
            state.edges.push(EdgeRecord {
                entry_id: unit.entry.id.clone(),
                relation: relation::HAS_SUGGESTION.to_string(),
                target: suggestion.clone(),
            });
        }
        for goal in &unit.goals {
            state.goals.insert(goal.clone());
            state.edges.push(EdgeRecord {
                entry_id: unit.entry.id.clone(),
                relation: relation::SETS.to_string(),
                target: goal.clone(),
            });
        }
        Ok(())
    }

    async fn emotion_counts(&self, limit: usize) -> Result<Vec<EmotionCount>, GraphStoreError> {
        let state = self.state.read().await;
        let mut tally: HashMap<&str, i64> = HashMap::new();
        for edge in state
            .edges
            .iter()
            .filter(|e| e.relation == relation::EXPRESSES)
        {
            *tally.entry(edge.target.as_str()).or_insert(0) += 1;
        }
        let mut counts: Vec<EmotionCount> = tally
            .into_iter()
            .map(|(emotion, count)| EmotionCount {
                emotion: emotion.to_string(),
                count,
            })
            .collect();
        // Ties break by name to keep the rollup deterministic.
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.emotion.cmp(&b.emotion)));
        counts.truncate(limit);
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_types::AnalysisResult;

    fn unit(sentiment: Option<&str>, themes: &[&str]) -> EntryWriteUnit {
        let result = AnalysisResult {
            sentiment: sentiment.map(str::to_string),
            themes: themes.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        };
        EntryWriteUnit::from_analysis(EntryRecord::new("entry text"), &result)
    }

    #[tokio::test]
    async fn vocabulary_nodes_merge_by_key() {
        let store = InMemoryGraphStore::new();
        store
            .write_entry(&unit(Some("positive"), &["exercise"]))
            .await
            .unwrap();
        store
            .write_entry(&unit(Some("positive"), &["exercise"]))
            .await
            .unwrap();

        let snap = store.snapshot().await;
        assert_eq!(snap.entries.len(), 2);
        assert_eq!(snap.emotions, vec!["positive"]);
        assert_eq!(snap.themes, vec!["exercise"]);
        // Edges stay per-entry facts: two of each relation.
        assert_eq!(
            snap.edges
                .iter()
                .filter(|e| e.relation == relation::CONTAINS)
                .count(),
            2
        );
        assert_eq!(
            snap.edges
                .iter()
                .filter(|e| e.relation == relation::EXPRESSES)
                .count(),
            2
        );
    }

    #[tokio::test]
    async fn empty_categories_write_nothing() {
        let store = InMemoryGraphStore::new();
        store.write_entry(&unit(None, &[])).await.unwrap();

        let snap = store.snapshot().await;
        assert_eq!(snap.entries.len(), 1);
        assert!(snap.emotions.is_empty());
        assert!(snap.edges.is_empty());
    }

    #[tokio::test]
    async fn emotion_counts_order_and_truncate() {
        let store = InMemoryGraphStore::new();
        for (emotion, n) in [("happy", 5), ("sad", 3), ("anxious", 3), ("calm", 1)] {
            for _ in 0..n {
                store.write_entry(&unit(Some(emotion), &[])).await.unwrap();
            }
        }

        let counts = store.emotion_counts(5).await.unwrap();
        assert_eq!(counts[0].emotion, "happy");
        assert_eq!(counts[0].count, 5);
        let calm_pos = counts.iter().position(|c| c.emotion == "calm").unwrap();
        assert!(counts.iter().position(|c| c.emotion == "sad").unwrap() < calm_pos);
        assert!(counts.iter().position(|c| c.emotion == "anxious").unwrap() < calm_pos);

        let top2 = store.emotion_counts(2).await.unwrap();
        assert_eq!(top2.len(), 2);
        assert_eq!(top2[0].emotion, "happy");
    }

    #[tokio::test]
    async fn empty_graph_counts_are_empty() {
        let store = InMemoryGraphStore::new();
        assert!(store.emotion_counts(5).await.unwrap().is_empty());
    }
}
