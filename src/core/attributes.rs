//! XML Attribute Parsing
//!
//! Parses attributes from tag content into owned name/value pairs. The
//! values outlive the chunk they were read from because a field handler
//! only sees them once the element's text arrives.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};

/// A parsed attribute with its value entity-decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Attributes of one start tag, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    items: Vec<Attribute>,
}

impl Attributes {
    /// Create an empty attribute list
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an attribute value by name. The first occurrence wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the tag carried no attributes
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate attributes in document order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.items.iter()
    }

    /// Append an attribute
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.items.push(Attribute {
            name: name.into(),
            value: value.into(),
        });
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.push(name, value);
        }
        attrs
    }
}

/// Why an attribute list was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeError {
    /// Malformed syntax, with a short description
    Syntax(&'static str),
    /// A name or value was not valid UTF-8
    Utf8,
}

/// Parse attributes from raw tag content (after the element name)
///
/// Input should be the content between element name and '>' or '/>'
pub fn parse_attributes(input: &[u8]) -> Result<Attributes, AttributeError> {
    let mut attrs = Attributes::new();
    let mut pos = 0;

    loop {
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() {
            return Ok(attrs);
        }

        if !is_name_start_char(input[pos]) {
            return Err(AttributeError::Syntax(
                "attribute name must start with a letter, underscore or colon",
            ));
        }

        let name_start = pos;
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = &input[name_start..pos];

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        if pos >= input.len() || input[pos] != b'=' {
            return Err(AttributeError::Syntax("attribute value required"));
        }
        pos += 1;

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        let quote = match input.get(pos) {
            Some(&q) if q == b'"' || q == b'\'' => q,
            _ => return Err(AttributeError::Syntax("attribute value must be quoted")),
        };
        pos += 1;

        let value_start = pos;
        while pos < input.len() && input[pos] != quote {
            if input[pos] == b'<' {
                return Err(AttributeError::Syntax("attribute value cannot contain '<'"));
            }
            pos += 1;
        }
        if pos >= input.len() {
            return Err(AttributeError::Syntax("attribute value has mismatched quotes"));
        }

        let value = decode_text(&input[value_start..pos]);
        pos += 1; // Skip closing quote

        if pos < input.len() && !is_whitespace(input[pos]) {
            return Err(AttributeError::Syntax("attributes must be separated by whitespace"));
        }

        let name = std::str::from_utf8(name).map_err(|_| AttributeError::Utf8)?;
        let value = std::str::from_utf8(&value).map_err(|_| AttributeError::Utf8)?;
        attrs.push(name, value);
    }
}
