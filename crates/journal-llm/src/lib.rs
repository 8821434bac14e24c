//! Analyzer client for the inference endpoint.

#[cfg(feature = "test-util")]
pub mod mock;
mod ollama;

pub use journal_types::{Analyzer, AnalyzerError};
pub use ollama::{AnalyzerConfig, OllamaAnalyzer};

#[cfg(feature = "test-util")]
pub use mock::MockAnalyzer;
