//! # Document Model
//!
//! Generated manifests are arbitrary data trees. [`Document`] is the tagged
//! value every component agrees on: the template engine produces it, the
//! output writer encodes it, and existing files are decoded back into it so
//! "has anything changed?" is a plain equality check.
//!
//! Mappings are kept in a [`BTreeMap`], so key order is never significant and
//! encoded output is stable across runs. Scalar mapping keys (`8080:`,
//! `true:`) are decoded as their text form.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A structured document value (the body of one generated file).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Document {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    String(String),
    Sequence(Vec<Document>),
    Mapping(BTreeMap<String, Document>),
}

/// Output name → document, as returned by a template evaluation.
pub type DocumentSet = BTreeMap<String, Document>;

impl Document {
    /// Decode a YAML (or JSON) text into a document.
    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Encode this document as YAML.
    pub fn to_yaml_string(&self) -> anyhow::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn as_mapping(&self) -> Option<&BTreeMap<String, Document>> {
        match self {
            Document::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Document::Null => "null",
            Document::Bool(_) => "bool",
            Document::Integer(_) | Document::Unsigned(_) | Document::Float(_) => "number",
            Document::String(_) => "string",
            Document::Sequence(_) => "sequence",
            Document::Mapping(_) => "mapping",
        }
    }
}

// Structural equality. Numbers holding the same value are equal whatever
// their form: `replicas: 3` must not differ from a template that emitted
// `3.0`. NaN equals NaN so a document is always equal to its own decoding.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Document::Null, Document::Null) => true,
            (Document::Bool(a), Document::Bool(b)) => a == b,
            (Document::Integer(a), Document::Integer(b)) => a == b,
            (Document::Unsigned(a), Document::Unsigned(b)) => a == b,
            (Document::Integer(i), Document::Unsigned(u))
            | (Document::Unsigned(u), Document::Integer(i)) => {
                u64::try_from(*i).is_ok_and(|i| i == *u)
            }
            (Document::Float(a), Document::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Document::Integer(i), Document::Float(f))
            | (Document::Float(f), Document::Integer(i)) => (*i as f64) == *f,
            (Document::Unsigned(u), Document::Float(f))
            | (Document::Float(f), Document::Unsigned(u)) => (*u as f64) == *f,
            (Document::String(a), Document::String(b)) => a == b,
            (Document::Sequence(a), Document::Sequence(b)) => a == b,
            (Document::Mapping(a), Document::Mapping(b)) => a == b,
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a YAML value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Document, E> {
        Ok(Document::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Document, D::Error> {
        Document::deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Document, E> {
        Ok(Document::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Document, E> {
        Ok(Document::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Document, E> {
        Ok(i64::try_from(v).map_or(Document::Unsigned(v), Document::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Document, E> {
        Ok(Document::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Document, E> {
        Ok(Document::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Document, E> {
        Ok(Document::String(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Document, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Document::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut entries = BTreeMap::new();
        while let Some(MappingKey(key)) = map.next_key()? {
            let value = map.next_value()?;
            entries.insert(key, value);
        }
        Ok(Document::Mapping(entries))
    }
}

/// A mapping key: any scalar, kept as its text form.
struct MappingKey(String);

impl<'de> Deserialize<'de> for MappingKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MappingKeyVisitor)
    }
}

struct MappingKeyVisitor;

impl<'de> Visitor<'de> for MappingKeyVisitor {
    type Value = MappingKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar mapping key")
    }

    fn visit_unit<E: de::Error>(self) -> Result<MappingKey, E> {
        Ok(MappingKey("null".to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<MappingKey, E> {
        self.visit_unit()
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<MappingKey, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<MappingKey, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<MappingKey, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<MappingKey, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<MappingKey, E> {
        Ok(MappingKey(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<MappingKey, E> {
        Ok(MappingKey(v))
    }
}

impl From<&str> for Document {
    fn from(value: &str) -> Self {
        Document::String(value.to_string())
    }
}

impl From<String> for Document {
    fn from(value: String) -> Self {
        Document::String(value)
    }
}

impl From<bool> for Document {
    fn from(value: bool) -> Self {
        Document::Bool(value)
    }
}

impl From<i64> for Document {
    fn from(value: i64) -> Self {
        Document::Integer(value)
    }
}

impl<K: Into<String>, V: Into<Document>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Document::Mapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
