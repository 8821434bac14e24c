//! Scripted analyzer for tests: canned outcomes, call counting, no network.

use journal_types::{AnalysisResult, Analyzer, AnalyzerError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Analyzer that replays a scripted sequence of outcomes. Clones share the
/// script and the call counter, so tests can keep a handle for assertions
/// after moving one into the pipeline.
#[derive(Clone, Default)]
pub struct MockAnalyzer {
    script: Arc<Mutex<VecDeque<Result<AnalysisResult, AnalyzerError>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outcome(outcome: Result<AnalysisResult, AnalyzerError>) -> Self {
        let mock = Self::new();
        mock.push(outcome);
        mock
    }

    /// Queue the outcome for the next analyze call.
    pub fn push(&self, outcome: Result<AnalysisResult, AnalyzerError>) {
        self.script
            .lock()
            .expect("mock script lock")
            .push_back(outcome);
    }

    /// Number of analyze calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, _entry: &str, _memory: &str) -> Result<AnalysisResult, AnalyzerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .expect("mock script lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(AnalyzerError::MalformedResponse(
                    "mock script exhausted".to_string(),
                ))
            })
    }
}
