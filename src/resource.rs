//! ResourceArc Wrappers
//!
//! Persistent state for streaming record parsers.

use crate::strategy::RecordStream;
use rustler::ResourceArc;
use std::sync::{Mutex, MutexGuard};

/// Wrapper for RecordStream that can be stored in a ResourceArc
pub struct RecordStreamResource {
    pub inner: Mutex<RecordStream>,
}

impl RecordStreamResource {
    pub fn new() -> Self {
        RecordStreamResource {
            inner: Mutex::new(RecordStream::new()),
        }
    }

    pub fn with_root_marker(marker: &[u8]) -> Self {
        RecordStreamResource {
            inner: Mutex::new(RecordStream::with_root_marker(marker)),
        }
    }

    /// Lock the stream.
    ///
    /// # Errors
    ///
    /// Returns `"mutex_poisoned"` if a previous holder panicked.
    pub fn lock(&self) -> Result<MutexGuard<'_, RecordStream>, &'static str> {
        self.inner.lock().map_err(|_| "mutex_poisoned")
    }
}

#[rustler::resource_impl]
impl rustler::Resource for RecordStreamResource {}

impl Default for RecordStreamResource {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for the ResourceArc
pub type RecordStreamRef = ResourceArc<RecordStreamResource>;
