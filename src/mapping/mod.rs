//! KANJIDIC2 record mapping
//!
//! - Record: output types (`Header`, `Character`, keyed lists)
//! - Kinds: boundary tags that start a record
//! - Fields: per-tag extraction rules
//! - Engine: state machine folding tokenizer events into records

pub mod engine;
pub mod fields;
pub mod kinds;
pub mod record;

pub use engine::{Engine, EngineEvent, EngineSink, Output, Status};
pub use fields::{CharacterField, Field, HeaderField, DEFAULT_LANGUAGE};
pub use kinds::RecordKind;
pub use record::{
    Character, DictionaryRef, Header, KeyedList, KeyedScalar, MoroRef, QueryCode, Record,
    SkipCode, SkipMisclass,
};
