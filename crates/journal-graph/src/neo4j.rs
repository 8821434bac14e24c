//! Neo4j-backed graph store over Bolt.

use journal_types::{EmotionCount, EntryWriteUnit, GraphStore, GraphStoreError};
use neo4rs::{query, ConfigBuilder, Graph, Query};
use std::time::Duration;

/// Connection parameters for the graph database.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    /// Logical database all reads and writes are scoped to.
    pub database: String,
    pub fetch_size: usize,
    pub max_connections: usize,
    /// Upper bound on one store operation; operations fail rather than hang.
    pub timeout_secs: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: "bolt://localhost:7687".to_string(),
            user: "neo4j".to_string(),
            password: String::new(),
            database: "neo4j".to_string(),
            fetch_size: 200,
            max_connections: 8,
            timeout_secs: 30,
        }
    }
}

impl GraphConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(uri) = std::env::var("NEO4J_URI") {
            cfg.uri = uri;
        }
        if let Ok(user) = std::env::var("NEO4J_USER") {
            cfg.user = user;
        }
        if let Ok(password) = std::env::var("NEO4J_PASSWORD") {
            cfg.password = password;
        }
        if let Ok(database) = std::env::var("NEO4J_DATABASE") {
            cfg.database = database;
        }
        cfg
    }
}

/// [`GraphStore`] backed by a Neo4j database.
///
/// The driver keeps a connection pool, so independent submissions run their
/// transactions concurrently without shared mutable state on this side.
pub struct Neo4jGraphStore {
    graph: Graph,
    timeout: Duration,
}

impl Neo4jGraphStore {
    /// Connect to the configured logical database.
    pub async fn connect(cfg: &GraphConfig) -> Result<Self, GraphStoreError> {
        let config = ConfigBuilder::default()
            .uri(cfg.uri.as_str())
            .user(cfg.user.as_str())
            .password(cfg.password.as_str())
            .db(cfg.database.as_str())
            .fetch_size(cfg.fetch_size)
            .max_connections(cfg.max_connections)
            .build()
            .map_err(|e| GraphStoreError::Unreachable(e.to_string()))?;
        let graph = Graph::connect(config)
            .await
            .map_err(|e| GraphStoreError::Unreachable(e.to_string()))?;
        Ok(Self {
            graph,
            timeout: Duration::from_secs(cfg.timeout_secs),
        })
    }

    /// Declare the uniqueness constraints merge-by-key relies on. Run at
    /// startup; safe to repeat.
    pub async fn ensure_constraints(&self) -> Result<(), GraphStoreError> {
        const CONSTRAINTS: [&str; 5] = [
            "CREATE CONSTRAINT entry_id IF NOT EXISTS FOR (e:Entry) REQUIRE e.id IS UNIQUE",
            "CREATE CONSTRAINT emotion_type IF NOT EXISTS FOR (em:Emotion) REQUIRE em.type IS UNIQUE",
            "CREATE CONSTRAINT theme_name IF NOT EXISTS FOR (t:Theme) REQUIRE t.name IS UNIQUE",
            "CREATE CONSTRAINT suggestion_text IF NOT EXISTS FOR (s:Suggestion) REQUIRE s.text IS UNIQUE",
            "CREATE CONSTRAINT goal_text IF NOT EXISTS FOR (g:Goal) REQUIRE g.text IS UNIQUE",
        ];
        for stmt in CONSTRAINTS {
            self.graph
                .run(query(stmt))
                .await
                .map_err(|e| GraphStoreError::WriteFailed(e.to_string()))?;
        }
        Ok(())
    }

    /// Statements for one write-unit: create the Entry, merge each referenced
    /// vocabulary node, create one edge per occurrence.
    fn unit_queries(unit: &EntryWriteUnit) -> Vec<Query> {
        let id = unit.entry.id.as_str();
        let mut queries = vec![query(
            "CREATE (e:Entry {id: $id, text: $text, date: $date})",
        )
        .param("id", id)
        .param("text", unit.entry.text.as_str())
        .param("date", unit.entry.created_at.as_str())];
        if let Some(ref sentiment) = unit.sentiment {
            queries.push(
                query(
                    "MATCH (e:Entry {id: $id}) \
                     MERGE (em:Emotion {type: $type}) \
                     CREATE (e)-[:EXPRESSES]->(em)",
                )
                .param("id", id)
                .param("type", sentiment.as_str()),
            );
        }
        for theme in &unit.themes {
            queries.push(
                query(
                    "MATCH (e:Entry {id: $id}) \
                     MERGE (t:Theme {name: $name}) \
                     CREATE (e)-[:CONTAINS]->(t)",
                )
                .param("id", id)
                .param("name", theme.as_str()),
            );
        }
        for suggestion in &unit.suggestions {
            queries.push(
                query(
                    "MATCH (e:Entry {id: $id}) \
                     MERGE (s:Suggestion {text: $text}) \
                     CREATE (e)-[:HAS_SUGGESTION]->(s)",
                )
                .param("id", id)
                .param("text", suggestion.as_str()),
            );
        }
        for goal in &unit.goals {
            queries.push(
                query(
                    "MATCH (e:Entry {id: $id}) \
                     MERGE (g:Goal {text: $text}) \
                     CREATE (e)-[:SETS]->(g)",
                )
                .param("id", id)
                .param("text", goal.as_str()),
            );
        }
        queries
    }
}

#[async_trait::async_trait]
impl GraphStore for Neo4jGraphStore {
    async fn verify_connectivity(&self) -> Result<(), GraphStoreError> {
        let probe = self.graph.run(query("RETURN 1"));
        match tokio::time::timeout(self.timeout, probe).await {
            Ok(res) => res.map_err(|e| GraphStoreError::Unreachable(e.to_string())),
            Err(_) => Err(GraphStoreError::Unreachable(format!(
                "connectivity probe exceeded {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    async fn write_entry(&self, unit: &EntryWriteUnit) -> Result<(), GraphStoreError> {
        // A dropped transaction is rolled back server-side, so timing out
        // here cannot leave a partial commit.
        let work = async {
            let mut txn = self.graph.start_txn().await?;
            txn.run_queries(Self::unit_queries(unit)).await?;
            txn.commit().await
        };
        match tokio::time::timeout(self.timeout, work).await {
            Ok(res) => res.map_err(|e| GraphStoreError::WriteFailed(e.to_string())),
            Err(_) => Err(GraphStoreError::WriteFailed(format!(
                "write transaction exceeded {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    async fn emotion_counts(&self, limit: usize) -> Result<Vec<EmotionCount>, GraphStoreError> {
        let q = query(
            "MATCH (:Entry)-[r:EXPRESSES]->(em:Emotion) \
             RETURN em.type AS emotion, count(r) AS count \
             ORDER BY count DESC LIMIT $limit",
        )
        .param("limit", limit as i64);
        let work = async {
            let mut rows = self
                .graph
                .execute(q)
                .await
                .map_err(|e| GraphStoreError::ReadFailed(e.to_string()))?;
            let mut counts = Vec::new();
            while let Some(row) = rows
                .next()
                .await
                .map_err(|e| GraphStoreError::ReadFailed(e.to_string()))?
            {
                let emotion: String = row
                    .get("emotion")
                    .map_err(|e| GraphStoreError::ReadFailed(e.to_string()))?;
                let count: i64 = row
                    .get("count")
                    .map_err(|e| GraphStoreError::ReadFailed(e.to_string()))?;
                counts.push(EmotionCount { emotion, count });
            }
            Ok(counts)
        };
        match tokio::time::timeout(self.timeout, work).await {
            Ok(res) => res,
            Err(_) => Err(GraphStoreError::ReadFailed(format!(
                "read query exceeded {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_types::{AnalysisResult, EntryRecord};

    #[test]
    fn unit_queries_cover_all_non_empty_categories() {
        let result = AnalysisResult {
            sentiment: Some("positive".to_string()),
            summary: Some("Good run".to_string()),
            suggestions: vec!["Keep it up".to_string()],
            themes: vec!["exercise".to_string(), "health".to_string()],
            goals: Vec::new(),
        };
        let unit = EntryWriteUnit::from_analysis(EntryRecord::new("Had a great run"), &result);
        // One CREATE for the entry plus one statement per edge.
        let queries = Neo4jGraphStore::unit_queries(&unit);
        assert_eq!(queries.len(), 1 + unit.edge_count());
    }

    #[test]
    fn entry_only_unit_is_a_single_statement() {
        let unit =
            EntryWriteUnit::from_analysis(EntryRecord::new("text"), &AnalysisResult::default());
        assert_eq!(Neo4jGraphStore::unit_queries(&unit).len(), 1);
    }
}
