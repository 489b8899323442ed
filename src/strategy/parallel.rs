//! Parallel Document Parsing
//!
//! Uses Rayon to parse independent documents on separate threads. Each
//! document gets its own stream, so there is no shared state.

use rayon::prelude::*;

use super::streaming::parse_document;
use crate::mapping::Output;

/// Parse several in-memory documents in parallel, preserving input order
pub fn parse_documents_parallel<D: AsRef<[u8]> + Sync>(documents: &[D]) -> Vec<Vec<Output>> {
    documents
        .par_iter()
        .map(|doc| parse_document(doc.as_ref()))
        .collect()
}
