//! Whitelist-driven extraction of top-level JSON fields.
//!
//! Panel responses carry far more than the monitoring platform needs. The
//! extractor streams the document once, keeps the values of whitelisted keys
//! in their textual form, and skips every other value without building it.

use serde::de::{Deserializer as _, IgnoredAny, MapAccess, Visitor};
use serde_json::error::Category;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Flat field name to field value mapping produced by extraction.
pub type FieldMap = HashMap<String, String>;

/// Fixed set of top-level keys an endpoint's extraction keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWhitelist(&'static [&'static str]);

impl FieldWhitelist {
    /// Create a whitelist from a static key list.
    #[must_use]
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self(keys)
    }

    /// Whether `key` is kept by this whitelist.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(&key)
    }

    /// The whitelisted keys.
    #[must_use]
    pub fn keys(&self) -> &'static [&'static str] {
        self.0
    }
}

/// Extract every whitelisted top-level field of a JSON object.
///
/// String values are stored verbatim; any other value (numbers, booleans,
/// `null`, nested objects and arrays) is stored as its compact JSON text.
/// The whole document is consumed, so trailing garbage is rejected.
///
/// # Errors
///
/// Returns [`FormatError::NotAnObject`] if the top-level value is not an
/// object, or [`FormatError::Malformed`] if the document is not valid JSON.
///
/// # Examples
///
/// ```
/// use roompanel_core::{extract_fields, FieldWhitelist};
///
/// const KEYS: FieldWhitelist = FieldWhitelist::new(&["State"]);
/// let fields = extract_fields(br#"{"State":"Active","Other":1}"#, KEYS).unwrap();
/// assert_eq!(fields.get("State").map(String::as_str), Some("Active"));
/// assert!(!fields.contains_key("Other"));
/// ```
pub fn extract_fields(document: &[u8], whitelist: FieldWhitelist) -> Result<FieldMap, FormatError> {
    let mut de = serde_json::Deserializer::from_slice(document);
    let fields = (&mut de)
        .deserialize_map(WhitelistVisitor {
            keys: whitelist.keys(),
        })
        .map_err(FormatError::from_json)?;
    de.end().map_err(FormatError::from_json)?;
    Ok(fields)
}

/// Extract the first occurrence of a single top-level field.
///
/// Reading stops as soon as the key is found: whatever follows the matched
/// value, malformed or not, is never inspected.
///
/// # Errors
///
/// Same as [`extract_fields`], limited to the content before the match.
pub fn extract_first(document: &[u8], key: &str) -> Result<Option<String>, FormatError> {
    let mut found = None;
    let mut de = serde_json::Deserializer::from_slice(document);
    let scanned = (&mut de).deserialize_map(FirstFieldVisitor {
        key,
        found: &mut found,
    });

    // An early stop leaves the object unclosed; only a miss needs the
    // document to be well formed.
    match (found, scanned) {
        (Some(value), _) => Ok(Some(value)),
        (None, Ok(())) => Ok(None),
        (None, Err(e)) => Err(FormatError::from_json(e)),
    }
}

struct WhitelistVisitor<'k> {
    keys: &'k [&'k str],
}

impl<'de> Visitor<'de> for WhitelistVisitor<'_> {
    type Value = FieldMap;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut fields = FieldMap::new();
        while let Some(key) = map.next_key::<String>()? {
            if self.keys.contains(&key.as_str()) {
                let value: Value = map.next_value()?;
                fields.insert(key, textual(value));
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(fields)
    }
}

struct FirstFieldVisitor<'a> {
    key: &'a str,
    found: &'a mut Option<String>,
}

impl<'de> Visitor<'de> for FirstFieldVisitor<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a JSON object")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        while let Some(key) = map.next_key::<String>()? {
            if key == self.key {
                let value: Value = map.next_value()?;
                *self.found = Some(textual(value));
                return Ok(());
            }
            map.next_value::<IgnoredAny>()?;
        }
        Ok(())
    }
}

fn textual(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Errors raised when a response body cannot be read as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The top-level JSON value is not an object
    #[error("response not an object")]
    NotAnObject,
    /// The body is not well-formed JSON
    #[error("malformed JSON response: {0}")]
    Malformed(String),
}

impl FormatError {
    fn from_json(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::NotAnObject,
            Category::Io | Category::Syntax | Category::Eof => Self::Malformed(err.to_string()),
        }
    }
}
