//! KanjidicStream - streaming record parser for KANJIDIC2 exports
//!
//! Turns a KANJIDIC2 XML document, delivered in arbitrary chunks, into a
//! sequence of `Header` and `Character` records with bounded memory.
//!
//! Layers:
//! - core: preamble filter, push tokenizer, attribute and entity decoding
//! - mapping: record types and the event-to-record state machine
//! - strategy: chunked stream with backpressure, parallel whole-document parsing
//! - reader: iterator over any `Read` source
//!
//! The crate also builds as a NIF library exposing the stream to the BEAM.

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod core;
pub mod error;
pub mod mapping;
pub mod reader;
pub mod resource;
pub mod strategy;
pub mod term;

#[cfg(test)]
mod testdata;

pub use error::{Error, Result};
pub use mapping::{
    Character, DictionaryRef, Header, KeyedList, KeyedScalar, MoroRef, Output, QueryCode, Record,
    RecordKind, SkipCode, SkipMisclass,
};
pub use reader::RecordReader;
pub use strategy::{parse_document, parse_documents_parallel, FeedResult, RecordStream};

use resource::{RecordStreamRef, RecordStreamResource};
use std::sync::MutexGuard;

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Whole-Document Parsing
// ============================================================================

/// Parse a complete document into `[{:ok, record} | {:error, message}]`
#[rustler::nif(schedule = "DirtyCpu")]
fn parse<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    let outputs = parse_document(input.as_slice());
    term::outputs_to_term(env, &outputs)
}

/// Parse several documents in parallel, one result list per document
#[rustler::nif(schedule = "DirtyCpu")]
fn parse_many<'a>(env: Env<'a>, inputs: Vec<Binary<'a>>) -> NifResult<Term<'a>> {
    let docs: Vec<&[u8]> = inputs.iter().map(|b| b.as_slice()).collect();
    let results = parse_documents_parallel(&docs);

    let mut list = Term::list_new_empty(env);
    for outputs in results.iter().rev() {
        list = list.list_prepend(term::outputs_to_term(env, outputs)?);
    }
    Ok(list)
}

// ============================================================================
// Streaming Record Parser
// ============================================================================

fn lock(stream: &RecordStreamRef) -> NifResult<MutexGuard<'_, RecordStream>> {
    stream.lock().map_err(rustler::Error::RaiseAtom)
}

/// Create a new streaming parser
#[rustler::nif]
fn streaming_new() -> RecordStreamRef {
    ResourceArc::new(RecordStreamResource::new())
}

/// Create a streaming parser whose document starts at a different root tag
#[rustler::nif]
fn streaming_new_with_root(marker: Binary) -> RecordStreamRef {
    ResourceArc::new(RecordStreamResource::with_root_marker(marker.as_slice()))
}

/// Feed a chunk. Returns `{available, buffered}` or `:backpressure`
/// when the caller must take records before offering the chunk again.
#[rustler::nif]
fn streaming_feed<'a>(env: Env<'a>, stream: RecordStreamRef, chunk: Binary) -> NifResult<Term<'a>> {
    let mut inner = lock(&stream)?;
    Ok(match inner.feed(chunk.as_slice()) {
        FeedResult::Accepted { available } => (available, inner.buffer_size()).encode(env),
        FeedResult::Backpressure => term::backpressure().encode(env),
    })
}

/// Take up to `max` outputs from the streaming parser
#[rustler::nif]
fn streaming_take<'a>(env: Env<'a>, stream: RecordStreamRef, max: usize) -> NifResult<Term<'a>> {
    let outputs = lock(&stream)?.take(max);
    term::outputs_to_term(env, &outputs)
}

/// Signal end of input and take everything left
#[rustler::nif]
fn streaming_finalize<'a>(env: Env<'a>, stream: RecordStreamRef) -> NifResult<Term<'a>> {
    let outputs = lock(&stream)?.finalize();
    term::outputs_to_term(env, &outputs)
}

/// Get streaming parser status: `{available, buffered, in_record, failed}`
#[rustler::nif]
fn streaming_status(stream: RecordStreamRef) -> NifResult<(usize, usize, bool, bool)> {
    let inner = lock(&stream)?;
    Ok((
        inner.available(),
        inner.buffer_size(),
        inner.status() != mapping::Status::Idle,
        inner.is_failed(),
    ))
}

// ============================================================================
// NIF Initialization
// ============================================================================

rustler::init!("Elixir.KanjidicStream.Native");
