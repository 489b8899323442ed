//! Record Types
//!
//! The output of the parser: one `Record` per `<header>` or `<character>`
//! element. Fields start empty and only ever grow or get overwritten by
//! the field handlers in `fields.rs`.

/// One parsed top-level element
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Header(Header),
    Character(Character),
}

impl Record {
    /// The kind this record was built as
    pub fn kind(&self) -> super::RecordKind {
        match self {
            Record::Header(_) => super::RecordKind::Header,
            Record::Character(_) => super::RecordKind::Character,
        }
    }

    pub fn as_header(&self) -> Option<&Header> {
        match self {
            Record::Header(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Record::Character(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_character(self) -> Option<Character> {
        match self {
            Record::Character(c) => Some(c),
            _ => None,
        }
    }
}

/// Dictionary metadata from `<header>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub file_version: Option<u32>,
    /// Year part of `database_version` (`2024-015` → 2024)
    pub database_year: Option<u16>,
    /// Release within the year (`2024-015` → 15)
    pub version_in_year: Option<u32>,
    pub creation_year: Option<u16>,
    pub creation_month: Option<u8>,
    pub creation_day: Option<u8>,
}

/// One kanji entry from `<character>`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Character {
    /// The kanji itself
    pub literal: String,
    /// Encodings keyed by `cp_type` (`ucs`, `jis208`, ...)
    pub codepoints: KeyedScalar<String>,
    /// Radical numbers keyed by `rad_type` (`classical`, `nelson_c`)
    pub radicals: KeyedScalar<u16>,
    pub grade: Option<u8>,
    /// Stroke count first, then common miscounts
    pub stroke_counts: Vec<u8>,
    pub variants: KeyedList<String>,
    pub freq: Option<u32>,
    pub radical_names: Vec<String>,
    pub jlpt: Option<u8>,
    pub dictionary_refs: KeyedList<DictionaryRef>,
    pub query_codes: KeyedList<QueryCode>,
    pub readings: KeyedList<String>,
    /// Meanings keyed by language, `en` when unmarked
    pub meanings: KeyedList<String>,
    pub nanori: Vec<String>,
}

/// Dictionary index entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryRef {
    Plain(String),
    /// Morohashi Daikanwajiten reference with volume and page
    Moro(MoroRef),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoroRef {
    pub volume: Option<String>,
    pub page: Option<String>,
    pub value: String,
}

/// Lookup code entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryCode {
    Plain(String),
    /// SKIP code, possibly flagged as a known misclassification
    Skip(SkipCode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipCode {
    pub misclass: Option<SkipMisclass>,
    pub value: String,
}

/// Kind of SKIP misclassification (`skip_misclass`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipMisclass {
    Position,
    StrokeCount,
    StrokeAndPosition,
    StrokeDifference,
    Other(String),
}

impl SkipMisclass {
    pub fn from_attr(value: &str) -> Self {
        match value {
            "posn" => SkipMisclass::Position,
            "stroke_count" => SkipMisclass::StrokeCount,
            "stroke_and_posn" => SkipMisclass::StrokeAndPosition,
            "stroke_diff" => SkipMisclass::StrokeDifference,
            other => SkipMisclass::Other(other.to_owned()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SkipMisclass::Position => "posn",
            SkipMisclass::StrokeCount => "stroke_count",
            SkipMisclass::StrokeAndPosition => "stroke_and_posn",
            SkipMisclass::StrokeDifference => "stroke_diff",
            SkipMisclass::Other(s) => s,
        }
    }
}

/// Ordered lists of values grouped by a subtype attribute.
///
/// Keys keep the order in which they first appeared. A key is `None` when
/// the element lacked its subtype attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedList<V> {
    entries: Vec<(Option<String>, Vec<V>)>,
}

impl<V> KeyedList<V> {
    pub fn new() -> Self {
        KeyedList {
            entries: Vec::new(),
        }
    }

    /// Append `value` to the list for `key`, creating the list on first use
    pub fn push(&mut self, key: Option<&str>, value: V) {
        match self.entries.iter_mut().find(|(k, _)| k.as_deref() == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key.map(str::to_owned), vec![value])),
        }
    }

    /// Values recorded under `key`
    pub fn get(&self, key: &str) -> Option<&[V]> {
        self.get_key(Some(key))
    }

    /// Values recorded under `key`, where `None` selects the unkeyed list
    pub fn get_key(&self, key: Option<&str>) -> Option<&[V]> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_deref() == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = Option<&str>> {
        self.entries.iter().map(|(k, _)| k.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &[V])> {
        self.entries
            .iter()
            .map(|(k, values)| (k.as_deref(), values.as_slice()))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for KeyedList<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// One value per subtype attribute; a repeated subtype overwrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedScalar<V> {
    entries: Vec<(Option<String>, V)>,
}

impl<V> KeyedScalar<V> {
    pub fn new() -> Self {
        KeyedScalar {
            entries: Vec::new(),
        }
    }

    pub fn set(&mut self, key: Option<&str>, value: V) {
        match self.entries.iter_mut().find(|(k, _)| k.as_deref() == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key.map(str::to_owned), value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_deref() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_deref(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for KeyedScalar<V> {
    fn default() -> Self {
        Self::new()
    }
}
