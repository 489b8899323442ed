//! Streaming Record Parser
//!
//! Stateful parser that turns a KANJIDIC2 document arriving in chunks into
//! records with bounded memory. Finished records queue up until the caller
//! takes them; once the queue reaches its high-water mark, `feed` refuses
//! new input so a slow consumer throttles the producer.

use std::collections::VecDeque;

use crate::core::preamble::PreambleFilter;
use crate::core::tokenizer::Tokenizer;
use crate::error::Error;
use crate::mapping::{Engine, EngineSink, Output, Status};

/// Default number of queued outputs before `feed` pushes back
pub const DEFAULT_HIGH_WATER_MARK: usize = 256;

/// Outcome of offering a chunk to the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedResult {
    /// The chunk was consumed; `available` outputs are ready
    Accepted { available: usize },
    /// The output queue is full; drain it and offer the same chunk again
    Backpressure,
}

/// Stateful streaming record parser
pub struct RecordStream {
    preamble: PreambleFilter,
    tokenizer: Tokenizer,
    engine: Engine,
    /// Records and errors ready to be consumed
    ready: VecDeque<Output>,
    high_water_mark: usize,
    failed: bool,
    finished: bool,
}

impl RecordStream {
    /// Create a stream for a KANJIDIC2 document
    pub fn new() -> Self {
        Self::from_filter(PreambleFilter::new())
    }

    /// Create a stream whose document starts at a different root tag
    pub fn with_root_marker(marker: &[u8]) -> Self {
        Self::from_filter(PreambleFilter::with_marker(marker))
    }

    fn from_filter(preamble: PreambleFilter) -> Self {
        RecordStream {
            preamble,
            tokenizer: Tokenizer::new(),
            engine: Engine::new(),
            ready: VecDeque::with_capacity(64),
            high_water_mark: DEFAULT_HIGH_WATER_MARK,
            failed: false,
            finished: false,
        }
    }

    /// Set how many outputs may queue before `feed` pushes back
    pub fn with_high_water_mark(mut self, limit: usize) -> Self {
        self.high_water_mark = limit.max(1);
        self
    }

    /// Offer a chunk of input.
    ///
    /// A single chunk may complete several records, so the queue can end
    /// up above the high-water mark; the mark only gates the next chunk.
    pub fn feed(&mut self, chunk: &[u8]) -> FeedResult {
        if self.ready.len() >= self.high_water_mark {
            return FeedResult::Backpressure;
        }
        self.push_chunk(chunk);
        FeedResult::Accepted {
            available: self.ready.len(),
        }
    }

    /// Feed a chunk regardless of the high-water mark
    pub fn push_chunk(&mut self, chunk: &[u8]) {
        if self.failed || self.finished {
            return;
        }
        let Some(filtered) = self.preamble.filter(chunk) else {
            return;
        };

        let ready = &mut self.ready;
        let failed = &mut self.failed;
        let mut sink = EngineSink::new(&mut self.engine, |output| {
            if let Err(error) = &output {
                tracing::warn!(%error, "stream failed");
                *failed = true;
            }
            ready.push_back(output);
        });
        self.tokenizer.write(&filtered, &mut sink);
    }

    /// Signal end of input. Safe to call more than once.
    ///
    /// A record still open is dropped and reported as truncated.
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        if self.failed {
            return;
        }

        if !self.preamble.is_passthrough() {
            let marker = String::from_utf8_lossy(self.preamble.marker()).into_owned();
            return self.push_error(Error::MissingRoot { marker });
        }
        if let Some(error) = self.engine.finish() {
            return self.push_error(error);
        }

        let ready = &mut self.ready;
        let failed = &mut self.failed;
        let mut sink = EngineSink::new(&mut self.engine, |output| {
            if let Err(error) = &output {
                tracing::warn!(%error, "stream failed");
                *failed = true;
            }
            ready.push_back(output);
        });
        self.tokenizer.close(&mut sink);
        tracing::debug!(pending = self.ready.len(), failed = self.failed, "stream finished");
    }

    fn push_error(&mut self, error: Error) {
        tracing::warn!(%error, "stream failed");
        self.failed = true;
        self.ready.push_back(Err(error));
    }

    /// Take the next ready output
    pub fn next_output(&mut self) -> Option<Output> {
        self.ready.pop_front()
    }

    /// Take up to `max` ready outputs
    pub fn take(&mut self, max: usize) -> Vec<Output> {
        let count = max.min(self.ready.len());
        self.ready.drain(..count).collect()
    }

    /// Finish the stream and take everything left
    pub fn finalize(&mut self) -> Vec<Output> {
        self.finish();
        self.ready.drain(..).collect()
    }

    /// Number of outputs ready to be taken
    pub fn available(&self) -> usize {
        self.ready.len()
    }

    /// Bytes held back in the preamble filter and tokenizer
    pub fn buffer_size(&self) -> usize {
        self.preamble.buffered() + self.tokenizer.buffered()
    }

    /// True once an error has been queued; no more records will follow
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a record is currently being built
    pub fn status(&self) -> Status {
        self.engine.status()
    }
}

impl Default for RecordStream {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a whole document held in memory
pub fn parse_document(input: &[u8]) -> Vec<Output> {
    let mut stream = RecordStream::new();
    stream.push_chunk(input);
    stream.finalize()
}
