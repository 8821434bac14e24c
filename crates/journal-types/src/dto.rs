//! Graph records and request/response DTOs for the journal pipeline.

use serde::{Deserialize, Serialize};

/// Relationship names, always directed Entry -> target.
pub mod relation {
    pub const EXPRESSES: &str = "EXPRESSES";
    pub const CONTAINS: &str = "CONTAINS";
    pub const HAS_SUGGESTION: &str = "HAS_SUGGESTION";
    pub const SETS: &str = "SETS";
}

/// Structured result of analyzing one journal entry.
///
/// Every field is optional from the caller's perspective: the model may omit
/// any of them and the pipeline renders fallbacks instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub themes: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
}

impl AnalysisResult {
    /// Render the analysis as the block shown to the caller.
    pub fn render_block(&self) -> String {
        format!(
            "**Sentiment**: {}\n**Summary**: {}\n**Suggestions**: {}\n**Themes**: {}\n**Goals**: {}",
            self.sentiment.as_deref().unwrap_or("unknown"),
            self.summary.as_deref().unwrap_or("N/A"),
            self.suggestions.join(", "),
            self.themes.join(", "),
            self.goals.join(", "),
        )
    }
}

/// One persisted journal entry node. Append-only: never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    pub id: String,
    pub text: String,
    /// RFC 3339 timestamp from the local clock.
    pub created_at: String,
}

impl EntryRecord {
    /// Create a record with a fresh id.
    ///
    /// The id keeps a time-derived prefix for readability, with a random
    /// suffix so sub-second repeated submissions cannot collide.
    pub fn new(text: &str) -> Self {
        let now = chrono::Local::now();
        let id = format!(
            "entry_{}_{}",
            now.format("%Y%m%dT%H%M%S"),
            uuid::Uuid::new_v4().simple()
        );
        Self {
            id,
            text: text.to_string(),
            created_at: now.to_rfc3339(),
        }
    }
}

/// One atomic transaction's worth of graph mutations for a processed entry:
/// the Entry node plus the vocabulary nodes and edges its analysis produced.
#[derive(Debug, Clone)]
pub struct EntryWriteUnit {
    pub entry: EntryRecord,
    /// EXPRESSES target, when the analysis carried a sentiment.
    pub sentiment: Option<String>,
    /// CONTAINS targets.
    pub themes: Vec<String>,
    /// HAS_SUGGESTION targets.
    pub suggestions: Vec<String>,
    /// SETS targets.
    pub goals: Vec<String>,
}

impl EntryWriteUnit {
    /// Build the write-unit from an analysis, dropping blank values so empty
    /// categories produce no nodes or edges.
    pub fn from_analysis(entry: EntryRecord, result: &AnalysisResult) -> Self {
        Self {
            entry,
            sentiment: result
                .sentiment
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            themes: non_blank(&result.themes),
            suggestions: non_blank(&result.suggestions),
            goals: non_blank(&result.goals),
        }
    }

    /// Number of relationships this unit creates.
    pub fn edge_count(&self) -> usize {
        usize::from(self.sentiment.is_some())
            + self.themes.len()
            + self.suggestions.len()
            + self.goals.len()
    }
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Emotion type with its EXPRESSES edge count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionCount {
    pub emotion: String,
    pub count: i64,
}

/// Single conversation turn (user/assistant). The running log is owned by
/// the caller's presentation layer; the pipeline only appends to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: String,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Outcome of one submission, shaped for the caller's history/input/memory
/// widgets. Never an error: failures travel in `notice`, with the history
/// unchanged and the submitted text echoed back so the user can retry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub history: Vec<ChatTurn>,
    /// Value to put back in the entry input: empty on success, the submitted
    /// text on failure.
    pub entry_text: String,
    pub memory: String,
    #[serde(default)]
    pub notice: Option<String>,
}

/// Submit-entry request for the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub entry: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Memory rollup response for the HTTP surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryResponse {
    pub memory: String,
}
