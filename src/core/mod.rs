//! Core XML parsing primitives
//!
//! This module contains the building blocks the record layer sits on:
//! - Scanner: delimiter and name scanning using memchr
//! - Tokenizer: push tokenizer turning chunks into tag and text callbacks
//! - Preamble: discards everything before the root marker
//! - Entities: XML entity decoding with Cow (zero-copy when possible)
//! - Attributes: Attribute parsing and extraction

pub mod attributes;
pub mod entities;
pub mod preamble;
pub mod scanner;
pub mod tokenizer;
