//! Preamble Filter
//!
//! Dictionary exports start with an XML declaration and a large DOCTYPE
//! before the root collection element. The filter drops every byte ahead
//! of the root marker and passes the rest through untouched, even when the
//! marker is split across chunks.

use memchr::memmem::Finder;
use std::borrow::Cow;

/// Opening tag of the KANJIDIC2 root collection
pub const KANJIDIC_ROOT: &[u8] = b"<kanjidic2>";

/// Drops input until the root marker, then passes everything through
pub struct PreambleFilter {
    finder: Finder<'static>,
    /// Tail of the discarded input that may hold the start of the marker
    carry: Vec<u8>,
    found: bool,
}

impl PreambleFilter {
    /// Create a filter for the KANJIDIC2 root element
    pub fn new() -> Self {
        Self::with_marker(KANJIDIC_ROOT)
    }

    /// Create a filter for an arbitrary marker
    pub fn with_marker(marker: &[u8]) -> Self {
        PreambleFilter {
            finder: Finder::new(marker).into_owned(),
            carry: Vec::with_capacity(marker.len()),
            found: false,
        }
    }

    /// The marker this filter waits for
    pub fn marker(&self) -> &[u8] {
        self.finder.needle()
    }

    /// True once the marker has been seen and input is passed through
    pub fn is_passthrough(&self) -> bool {
        self.found
    }

    /// Bytes currently held back while looking for the marker
    pub fn buffered(&self) -> usize {
        self.carry.len()
    }

    /// Filter one chunk.
    ///
    /// Returns `None` while the marker has not been seen. The chunk holding
    /// the marker yields the bytes from the marker onward; after that every
    /// chunk is returned unchanged.
    pub fn filter<'a>(&mut self, chunk: &'a [u8]) -> Option<Cow<'a, [u8]>> {
        if self.found {
            return Some(Cow::Borrowed(chunk));
        }

        self.carry.extend_from_slice(chunk);

        if let Some(k) = self.finder.find(&self.carry) {
            self.found = true;
            tracing::trace!(offset = k, "root marker found");
            let rest = self.carry.split_off(k);
            self.carry = Vec::new();
            return Some(Cow::Owned(rest));
        }

        let keep = self.marker().len().saturating_sub(1);
        if self.carry.len() > keep {
            let cut = self.carry.len() - keep;
            self.carry.drain(..cut);
        }
        None
    }
}

impl Default for PreambleFilter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(filter: &mut PreambleFilter, chunks: &[&[u8]]) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in chunks {
            if let Some(bytes) = filter.filter(chunk) {
                out.extend_from_slice(&bytes);
            }
        }
        out
    }

    #[test]
    fn test_marker_in_single_chunk() {
        let mut filter = PreambleFilter::new();
        let out = run(&mut filter, &[b"<?xml version=\"1.0\"?>\n<kanjidic2><header/>"]);
        assert_eq!(out, b"<kanjidic2><header/>");
        assert!(filter.is_passthrough());
    }

    #[test]
    fn test_marker_split_across_chunks() {
        let mut filter = PreambleFilter::new();
        let out = run(
            &mut filter,
            &[b"Ye_u0MZ{]a%p9ratB]/' <ka", b"njidi", b"c2><character>", b"</character>"],
        );
        assert_eq!(out, b"<kanjidic2><character></character>");
    }

    #[test]
    fn test_marker_split_byte_by_byte() {
        let input = b"junk <kanji <kanjidic2>tail";
        let mut filter = PreambleFilter::new();
        let chunks: Vec<&[u8]> = input.chunks(1).collect();
        let out = run(&mut filter, &chunks);
        assert_eq!(out, b"<kanjidic2>tail");
    }

    #[test]
    fn test_partial_marker_is_not_a_match() {
        let mut filter = PreambleFilter::new();
        let out = run(&mut filter, &[b"<kanjidic", b"<kanjidic2", b">x"]);
        assert_eq!(out, b"<kanjidic2>x");
    }

    #[test]
    fn test_buffer_stays_bounded() {
        let mut filter = PreambleFilter::new();
        let junk = vec![b'x'; 4096];
        for _ in 0..100 {
            assert!(filter.filter(&junk).is_none());
            assert!(filter.buffered() < KANJIDIC_ROOT.len());
        }
    }

    #[test]
    fn test_passthrough_is_unmodified() {
        let mut filter = PreambleFilter::with_marker(b"<root>");
        assert!(filter.filter(b"<root>").is_some());
        let chunk: &[u8] = b"<kanjidic2>still data";
        assert_eq!(filter.filter(chunk).as_deref(), Some(chunk));
    }
}
