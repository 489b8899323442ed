//! Buffered Record Reader
//!
//! Pulls chunks from any source implementing `Read` and yields records as
//! an iterator, so files and sockets can be processed without loading the
//! whole document.

use std::io::{ErrorKind, Read};

use crate::error::Error;
use crate::mapping::Output;
use crate::strategy::RecordStream;

/// Buffer size for reading chunks
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Iterator of records read from a byte source
pub struct RecordReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    stream: RecordStream,
    eof: bool,
}

impl<R: Read> RecordReader<R> {
    /// Create a new record reader
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new record reader with specified buffer capacity
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self::with_stream(reader, capacity, RecordStream::new())
    }

    /// Read through a preconfigured stream, e.g. one with a custom root marker
    pub fn with_stream(reader: R, capacity: usize, stream: RecordStream) -> Self {
        RecordReader {
            reader,
            buffer: vec![0u8; capacity.max(1)],
            stream,
            eof: false,
        }
    }

    /// Bytes read but not yet turned into records
    pub fn buffer_size(&self) -> usize {
        self.stream.buffer_size()
    }

    /// Get the underlying source back
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Output;

    fn next(&mut self) -> Option<Output> {
        loop {
            if let Some(output) = self.stream.next_output() {
                return Some(output);
            }
            if self.eof {
                return None;
            }
            if self.stream.is_failed() {
                self.eof = true;
                continue;
            }

            match self.reader.read(&mut self.buffer) {
                Ok(0) => {
                    self.eof = true;
                    self.stream.finish();
                }
                Ok(read) => self.stream.push_chunk(&self.buffer[..read]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    tracing::warn!(error = %e, "read failed");
                    self.eof = true;
                    return Some(Err(Error::Io(e)));
                }
            }
        }
    }
}
