//! Record Reader Module
//!
//! - RecordReader: pull-style iterator over any `Read` source

pub mod buffered;

pub use buffered::RecordReader;
