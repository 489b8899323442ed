//! Record-Kind Registry
//!
//! Top-level tags that start a record. Any other tag seen outside a record
//! is not a boundary and is ignored by the engine.

use super::record::{Character, Header, Record};

/// The closed set of record kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Header,
    Character,
}

impl RecordKind {
    /// Resolve a boundary tag name
    #[inline]
    pub fn from_tag(name: &str) -> Option<Self> {
        match name {
            "header" => Some(RecordKind::Header),
            "character" => Some(RecordKind::Character),
            _ => None,
        }
    }

    /// The boundary tag name for this kind
    pub fn tag(self) -> &'static str {
        match self {
            RecordKind::Header => "header",
            RecordKind::Character => "character",
        }
    }

    /// Construct the empty record for this kind
    pub fn build(self) -> Record {
        match self {
            RecordKind::Header => Record::Header(Header::default()),
            RecordKind::Character => Record::Character(Character::default()),
        }
    }
}
