//! Field-Mapping Table
//!
//! Maps each data-bearing tag to the rule that folds its text into a
//! record. Lookup is per record kind, so a header tag can never write into
//! a character and vice versa.
//!
//! | rule                     | tags                                        |
//! |--------------------------|---------------------------------------------|
//! | overwrite scalar         | literal, grade, freq, jlpt, file_version    |
//! | overwrite keyed scalar   | cp_value, rad_value                         |
//! | append to list           | stroke_count, rad_name, nanori              |
//! | append to keyed list     | variant, reading                            |
//! | append composite         | dic_ref (moro), q_code (skip)               |
//! | language-keyed append    | meaning (`en` default)                      |
//! | decompose and set        | database_version, date_of_creation          |

use std::str::FromStr;

use super::kinds::RecordKind;
use super::record::{
    Character, DictionaryRef, Header, MoroRef, QueryCode, Record, SkipCode, SkipMisclass,
};
use crate::core::attributes::Attributes;

/// Language assumed for a `<meaning>` without `m_lang`
pub const DEFAULT_LANGUAGE: &str = "en";

/// A resolved field handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Header(HeaderField),
    Character(CharacterField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    FileVersion,
    DatabaseVersion,
    DateOfCreation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterField {
    Literal,
    Codepoint,
    Radical,
    Grade,
    StrokeCount,
    Variant,
    Freq,
    RadicalName,
    Jlpt,
    DictionaryRef,
    QueryCode,
    Reading,
    Meaning,
    Nanori,
}

impl Field {
    /// Resolve a tag name for the given record kind. Containers and
    /// unknown tags resolve to `None`.
    pub fn lookup(kind: RecordKind, name: &str) -> Option<Field> {
        match kind {
            RecordKind::Header => HeaderField::from_tag(name).map(Field::Header),
            RecordKind::Character => CharacterField::from_tag(name).map(Field::Character),
        }
    }

    /// Fold trimmed, non-empty `text` into `record`
    pub fn apply(self, record: &mut Record, text: &str, attrs: &Attributes) {
        match (self, record) {
            (Field::Header(field), Record::Header(header)) => field.apply(header, text),
            (Field::Character(field), Record::Character(character)) => {
                field.apply(character, text, attrs)
            }
            (field, record) => {
                tracing::debug!(?field, kind = ?record.kind(), "field does not belong to record kind");
            }
        }
    }
}

impl HeaderField {
    fn from_tag(name: &str) -> Option<Self> {
        match name {
            "file_version" => Some(HeaderField::FileVersion),
            "database_version" => Some(HeaderField::DatabaseVersion),
            "date_of_creation" => Some(HeaderField::DateOfCreation),
            _ => None,
        }
    }

    fn apply(self, header: &mut Header, text: &str) {
        match self {
            HeaderField::FileVersion => set(&mut header.file_version, "file_version", text),
            HeaderField::DatabaseVersion => {
                let mut parts = text.split('-');
                set_part(&mut header.database_year, "database_version", parts.next());
                set_part(&mut header.version_in_year, "database_version", parts.next());
            }
            HeaderField::DateOfCreation => {
                let mut parts = text.split('-');
                set_part(&mut header.creation_year, "date_of_creation", parts.next());
                set_part(&mut header.creation_month, "date_of_creation", parts.next());
                set_part(&mut header.creation_day, "date_of_creation", parts.next());
            }
        }
    }
}

impl CharacterField {
    fn from_tag(name: &str) -> Option<Self> {
        let field = match name {
            "literal" => CharacterField::Literal,
            "cp_value" => CharacterField::Codepoint,
            "rad_value" => CharacterField::Radical,
            "grade" => CharacterField::Grade,
            "stroke_count" => CharacterField::StrokeCount,
            "variant" => CharacterField::Variant,
            "freq" => CharacterField::Freq,
            "rad_name" => CharacterField::RadicalName,
            "jlpt" => CharacterField::Jlpt,
            "dic_ref" => CharacterField::DictionaryRef,
            "q_code" => CharacterField::QueryCode,
            "reading" => CharacterField::Reading,
            "meaning" => CharacterField::Meaning,
            "nanori" => CharacterField::Nanori,
            _ => return None,
        };
        Some(field)
    }

    fn apply(self, c: &mut Character, text: &str, attrs: &Attributes) {
        match self {
            CharacterField::Literal => c.literal = text.to_owned(),
            CharacterField::Codepoint => c.codepoints.set(attrs.get("cp_type"), text.to_owned()),
            CharacterField::Radical => {
                if let Some(value) = number("rad_value", text) {
                    c.radicals.set(attrs.get("rad_type"), value);
                }
            }
            CharacterField::Grade => set(&mut c.grade, "grade", text),
            CharacterField::StrokeCount => {
                if let Some(value) = number("stroke_count", text) {
                    c.stroke_counts.push(value);
                }
            }
            CharacterField::Variant => c.variants.push(attrs.get("var_type"), text.to_owned()),
            CharacterField::Freq => set(&mut c.freq, "freq", text),
            CharacterField::RadicalName => c.radical_names.push(text.to_owned()),
            CharacterField::Jlpt => set(&mut c.jlpt, "jlpt", text),
            CharacterField::DictionaryRef => {
                let kind = attrs.get("dr_type");
                let value = if kind == Some("moro") {
                    DictionaryRef::Moro(MoroRef {
                        volume: attrs.get("m_vol").map(str::to_owned),
                        page: attrs.get("m_page").map(str::to_owned),
                        value: text.to_owned(),
                    })
                } else {
                    DictionaryRef::Plain(text.to_owned())
                };
                c.dictionary_refs.push(kind, value);
            }
            CharacterField::QueryCode => {
                let kind = attrs.get("qc_type");
                let value = if kind == Some("skip") {
                    QueryCode::Skip(SkipCode {
                        misclass: attrs.get("skip_misclass").map(SkipMisclass::from_attr),
                        value: text.to_owned(),
                    })
                } else {
                    QueryCode::Plain(text.to_owned())
                };
                c.query_codes.push(kind, value);
            }
            CharacterField::Reading => c.readings.push(attrs.get("r_type"), text.to_owned()),
            CharacterField::Meaning => {
                let lang = attrs
                    .get("m_lang")
                    .filter(|lang| !lang.is_empty())
                    .unwrap_or(DEFAULT_LANGUAGE);
                c.meanings.push(Some(lang), text.to_owned());
            }
            CharacterField::Nanori => c.nanori.push(text.to_owned()),
        }
    }
}

/// Parse a base-10 number, logging and skipping values that don't parse
fn number<T: FromStr>(field: &'static str, text: &str) -> Option<T> {
    match text.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(field, text, "skipping value that is not a number");
            None
        }
    }
}

fn set<T: FromStr>(slot: &mut Option<T>, field: &'static str, text: &str) {
    if let Some(value) = number(field, text) {
        *slot = Some(value);
    }
}

fn set_part<T: FromStr>(slot: &mut Option<T>, field: &'static str, part: Option<&str>) {
    if let Some(part) = part {
        set(slot, field, part);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn apply(record: &mut Record, tag: &str, text: &str, attrs: &[(&str, &str)]) {
        let attrs: Attributes = attrs.iter().copied().collect();
        let field = Field::lookup(record.kind(), tag).expect("known tag");
        field.apply(record, text, &attrs);
    }

    fn character(record: &Record) -> &Character {
        record.as_character().expect("character record")
    }

    #[test]
    fn test_lookup_is_per_kind() {
        assert_eq!(
            Field::lookup(RecordKind::Character, "literal"),
            Some(Field::Character(CharacterField::Literal))
        );
        assert_eq!(Field::lookup(RecordKind::Header, "literal"), None);
        assert_eq!(
            Field::lookup(RecordKind::Header, "file_version"),
            Some(Field::Header(HeaderField::FileVersion))
        );
        assert_eq!(Field::lookup(RecordKind::Character, "file_version"), None);
        assert_eq!(Field::lookup(RecordKind::Character, "misc"), None);
        assert_eq!(Field::lookup(RecordKind::Character, "rmgroup"), None);
    }

    #[test]
    fn test_scalar_overwrite() {
        let mut record = RecordKind::Character.build();
        apply(&mut record, "grade", "8", &[]);
        apply(&mut record, "grade", "3", &[]);
        apply(&mut record, "literal", "哀", &[]);
        assert_eq!(character(&record).grade, Some(3));
        assert_eq!(character(&record).literal, "哀");
    }

    #[test]
    fn test_list_append_order() {
        let mut record = RecordKind::Character.build();
        apply(&mut record, "stroke_count", "9", &[]);
        apply(&mut record, "stroke_count", "13", &[]);
        apply(&mut record, "nanori", "みな", &[]);
        apply(&mut record, "nanori", "しげ", &[]);
        assert_eq!(character(&record).stroke_counts, vec![9, 13]);
        assert_eq!(character(&record).nanori, vec!["みな", "しげ"]);
    }

    #[test]
    fn test_keyed_lists_are_independent() {
        let mut record = RecordKind::Character.build();
        apply(&mut record, "reading", "ケチ", &[("r_type", "ja_on")]);
        apply(&mut record, "reading", "き.める", &[("r_type", "ja_kun")]);
        apply(&mut record, "reading", "ケツ", &[("r_type", "ja_on")]);
        let c = character(&record);
        assert_eq!(c.readings.get("ja_on").unwrap(), ["ケチ", "ケツ"]);
        assert_eq!(c.readings.get("ja_kun").unwrap(), ["き.める"]);
    }

    #[test]
    fn test_meaning_language_default() {
        let mut record = RecordKind::Character.build();
        apply(&mut record, "meaning", "decide", &[]);
        apply(&mut record, "meaning", "décider", &[("m_lang", "fr")]);
        apply(&mut record, "meaning", "judge", &[("m_lang", "")]);
        let c = character(&record);
        assert_eq!(c.meanings.get("en").unwrap(), ["decide", "judge"]);
        assert_eq!(c.meanings.get(""), None);
        assert_eq!(c.meanings.get("fr").unwrap(), ["décider"]);
        assert_eq!(c.meanings.get_key(None), None);
    }

    #[test]
    fn test_moro_dictionary_ref() {
        let mut record = RecordKind::Character.build();
        apply(
            &mut record,
            "dic_ref",
            "272",
            &[("dr_type", "moro"), ("m_vol", "1"), ("m_page", "0525")],
        );
        apply(&mut record, "dic_ref", "1", &[("dr_type", "nelson_c")]);
        let c = character(&record);
        assert_eq!(
            c.dictionary_refs.get("moro").unwrap(),
            [DictionaryRef::Moro(MoroRef {
                volume: Some("1".into()),
                page: Some("0525".into()),
                value: "272".into(),
            })]
        );
        assert_eq!(
            c.dictionary_refs.get("nelson_c").unwrap(),
            [DictionaryRef::Plain("1".into())]
        );
    }

    #[test]
    fn test_skip_query_code() {
        let mut record = RecordKind::Character.build();
        apply(&mut record, "q_code", "4-7-1", &[("qc_type", "skip")]);
        apply(
            &mut record,
            "q_code",
            "4-7-2",
            &[("qc_type", "skip"), ("skip_misclass", "posn")],
        );
        apply(&mut record, "q_code", "1010.6", &[("qc_type", "four_corner")]);
        let c = character(&record);
        assert_eq!(
            c.query_codes.get("skip").unwrap(),
            [
                QueryCode::Skip(SkipCode {
                    misclass: None,
                    value: "4-7-1".into()
                }),
                QueryCode::Skip(SkipCode {
                    misclass: Some(SkipMisclass::Position),
                    value: "4-7-2".into()
                }),
            ]
        );
        assert_eq!(
            c.query_codes.get("four_corner").unwrap(),
            [QueryCode::Plain("1010.6".into())]
        );
    }

    #[test]
    fn test_missing_subtype_attribute() {
        let mut record = RecordKind::Character.build();
        apply(&mut record, "variant", "1-48-19", &[]);
        apply(&mut record, "dic_ref", "5", &[]);
        let c = character(&record);
        assert_eq!(c.variants.get_key(None).unwrap(), ["1-48-19"]);
        assert_eq!(c.dictionary_refs.get_key(None).unwrap(), [DictionaryRef::Plain("5".into())]);
    }

    #[test]
    fn test_codepoints_and_radicals() {
        let mut record = RecordKind::Character.build();
        apply(&mut record, "cp_value", "4e9c", &[("cp_type", "ucs")]);
        apply(&mut record, "cp_value", "16-01", &[("cp_type", "jis208")]);
        apply(&mut record, "rad_value", "7", &[("rad_type", "classical")]);
        apply(&mut record, "rad_value", "1", &[("rad_type", "nelson_c")]);
        let c = character(&record);
        assert_eq!(c.codepoints.get("ucs").map(String::as_str), Some("4e9c"));
        assert_eq!(c.codepoints.get("jis208").map(String::as_str), Some("16-01"));
        assert_eq!(c.radicals.get("classical"), Some(&7));
        assert_eq!(c.radicals.get("nelson_c"), Some(&1));
    }

    #[test]
    fn test_invalid_number_is_skipped() {
        let mut record = RecordKind::Character.build();
        apply(&mut record, "stroke_count", "x", &[]);
        apply(&mut record, "freq", "often", &[]);
        apply(&mut record, "freq", "1715", &[]);
        apply(&mut record, "freq", "often", &[]);
        let c = character(&record);
        assert!(c.stroke_counts.is_empty());
        assert_eq!(c.freq, Some(1715));
    }

    #[test]
    fn test_header_decomposition() {
        let mut record = RecordKind::Header.build();
        apply(&mut record, "file_version", "4", &[]);
        apply(&mut record, "database_version", "2024-015", &[]);
        apply(&mut record, "date_of_creation", "2024-01-15", &[]);
        assert_eq!(
            record,
            Record::Header(Header {
                file_version: Some(4),
                database_year: Some(2024),
                version_in_year: Some(15),
                creation_year: Some(2024),
                creation_month: Some(1),
                creation_day: Some(15),
            })
        );
    }

    #[test]
    fn test_mismatched_kind_is_ignored() {
        let mut record = RecordKind::Header.build();
        Field::Character(CharacterField::Literal).apply(&mut record, "日", &Attributes::new());
        assert_eq!(record, RecordKind::Header.build());
    }
}
