//! Parsing Strategy Module
//!
//! - Streaming: chunked input with backpressure (for large files and sockets)
//! - Parallel: many whole documents across Rayon threads

pub mod parallel;
pub mod streaming;

pub use parallel::parse_documents_parallel;
pub use streaming::{parse_document, FeedResult, RecordStream, DEFAULT_HIGH_WATER_MARK};
