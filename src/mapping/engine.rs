//! Mapping Engine
//!
//! Folds tokenizer events into records. The engine is a two-state machine:
//!
//! ```text
//!            open(boundary tag)
//!   Idle ─────────────────────────▶ InRecord { depth: 0 }
//!    ▲                                 │  open(tag)  → depth + 1, resolve field
//!    │                                 │  text(t)    → active field handler
//!    │                                 │  close(tag) → depth - 1
//!    └──── close at depth 0: emit ─────┘
//!          error: abandon record
//! ```
//!
//! Container tags such as `<misc>` or `<rmgroup>` have no field handler;
//! they only move the depth counter. Unknown tags behave the same way.

use super::fields::Field;
use super::kinds::RecordKind;
use super::record::Record;
use crate::core::attributes::Attributes;
use crate::core::tokenizer::TokenHandler;
use crate::error::Error;

/// One input event for the engine
#[derive(Debug)]
pub enum EngineEvent<'a> {
    Open {
        name: &'a str,
        attributes: Attributes,
    },
    Text(&'a str),
    Close(&'a str),
    Error(Error),
}

/// What the engine hands to the consumer
pub type Output = crate::error::Result<Record>;

/// Observable engine state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    InRecord { kind: RecordKind, depth: usize },
}

/// A record being built
struct InRecord {
    kind: RecordKind,
    record: Record,
    /// Nesting depth below the boundary tag
    depth: usize,
    /// Handler and attributes of the innermost data-bearing tag
    field: Option<(Field, Attributes)>,
}

enum State {
    Idle,
    InRecord(InRecord),
}

/// Event-to-record state machine
pub struct Engine {
    state: State,
}

impl Engine {
    pub fn new() -> Self {
        Engine { state: State::Idle }
    }

    pub fn status(&self) -> Status {
        match &self.state {
            State::Idle => Status::Idle,
            State::InRecord(active) => Status::InRecord {
                kind: active.kind,
                depth: active.depth,
            },
        }
    }

    /// Feed one event. Returns a record when its boundary closes, or the
    /// error carried by an `Error` event.
    pub fn handle(&mut self, event: EngineEvent<'_>) -> Option<Output> {
        match event {
            EngineEvent::Open { name, attributes } => {
                self.open(name, attributes);
                None
            }
            EngineEvent::Text(content) => {
                self.text(content);
                None
            }
            EngineEvent::Close(name) => self.close(name).map(Ok),
            EngineEvent::Error(error) => Some(Err(self.fail(error))),
        }
    }

    pub fn open(&mut self, name: &str, attributes: Attributes) {
        if let State::InRecord(active) = &mut self.state {
            active.depth += 1;
            active.field = Field::lookup(active.kind, name).map(|field| (field, attributes));
            return;
        }

        if let Some(kind) = RecordKind::from_tag(name) {
            self.state = State::InRecord(InRecord {
                kind,
                record: kind.build(),
                depth: 0,
                field: None,
            });
        }
    }

    pub fn text(&mut self, content: &str) {
        let State::InRecord(active) = &mut self.state else {
            return;
        };
        let Some((field, attributes)) = &active.field else {
            return;
        };

        let text = content.trim();
        if !text.is_empty() {
            field.apply(&mut active.record, text, attributes);
        }
    }

    /// Close a tag, returning the record if this was its boundary
    pub fn close(&mut self, _name: &str) -> Option<Record> {
        let State::InRecord(active) = &mut self.state else {
            return None;
        };

        active.field = None;
        if active.depth > 0 {
            active.depth -= 1;
            return None;
        }

        match std::mem::replace(&mut self.state, State::Idle) {
            State::InRecord(done) => {
                tracing::debug!(kind = done.kind.tag(), "record complete");
                Some(done.record)
            }
            State::Idle => None,
        }
    }

    /// Abandon any record in progress and pass the error through
    pub fn fail(&mut self, error: Error) -> Error {
        if let State::InRecord(active) = &self.state {
            tracing::warn!(kind = active.kind.tag(), %error, "abandoning record");
        }
        self.state = State::Idle;
        error
    }

    /// End of input. A record still open is dropped and reported.
    pub fn finish(&mut self) -> Option<Error> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => None,
            State::InRecord(active) => Some(Error::Truncated {
                boundary: active.kind.tag(),
            }),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Adapter feeding tokenizer callbacks into an engine and collecting outputs
pub struct EngineSink<'a, F: FnMut(Output)> {
    engine: &'a mut Engine,
    emit: F,
}

impl<'a, F: FnMut(Output)> EngineSink<'a, F> {
    pub fn new(engine: &'a mut Engine, emit: F) -> Self {
        EngineSink { engine, emit }
    }
}

impl<F: FnMut(Output)> TokenHandler for EngineSink<'_, F> {
    fn open_tag(&mut self, name: &str, attributes: Attributes) {
        self.engine.open(name, attributes);
    }

    fn text(&mut self, content: &str) {
        self.engine.text(content);
    }

    fn close_tag(&mut self, name: &str) {
        if let Some(record) = self.engine.close(name) {
            (self.emit)(Ok(record));
        }
    }

    fn error(&mut self, error: Error) {
        let error = self.engine.fail(error);
        (self.emit)(Err(error));
    }
}
