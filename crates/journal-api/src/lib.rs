//! REST surface for the journal pipeline.

pub mod server;
