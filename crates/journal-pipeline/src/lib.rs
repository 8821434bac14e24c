//! Entry pipeline orchestration and the memory rollup.

pub mod memory;
mod pipeline;

pub use journal_types::{Journal, PipelineError};
pub use pipeline::EntryPipeline;
