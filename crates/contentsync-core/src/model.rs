//! Remote content model and the insertion-ordered field mapping

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Values of one field keyed by CMS locale code (`en-US`, `de`).
pub type LocaleValues = BTreeMap<String, FieldValue>;

/// Raw fields of an entry or asset: field name, then locale, then value.
pub type LocalizedFields = BTreeMap<String, LocaleValues>;

/// What a [`Link`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    Entry,
    Asset,
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Entry => write!(f, "Entry"),
            Self::Asset => write!(f, "Asset"),
        }
    }
}

/// An unresolved reference to another entry or asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub kind: LinkKind,
    pub id: String,
}

impl Link {
    pub fn entry(id: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::Entry,
            id: id.into(),
        }
    }

    pub fn asset(id: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::Asset,
            id: id.into(),
        }
    }

    /// The wire form of the link, `{sys: {type: Link, linkType, id}}`.
    ///
    /// Used for links nested inside an already represented target, which
    /// are not resolved again.
    pub fn to_stub(&self) -> serde_yaml::Value {
        let mut sys = serde_yaml::Mapping::new();
        sys.insert("type".into(), "Link".into());
        sys.insert("linkType".into(), self.kind.to_string().into());
        sys.insert("id".into(), self.id.clone().into());
        let mut stub = serde_yaml::Mapping::new();
        stub.insert("sys".into(), serde_yaml::Value::Mapping(sys));
        serde_yaml::Value::Mapping(stub)
    }
}

/// A raw field value as delivered by the fetch client.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain scalar: string, number, bool or null
    Scalar(serde_yaml::Value),
    /// Nested object (rich text, location, JSON fields)
    Map(BTreeMap<String, FieldValue>),
    List(Vec<FieldValue>),
    Link(Link),
    /// A link target the client already materialized
    Entry(Box<RemoteEntry>),
    /// An asset the client already materialized
    Asset(Box<Asset>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => value.as_str(),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(serde_yaml::Value::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Scalar(serde_yaml::Value::from(value))
    }
}

impl From<Link> for FieldValue {
    fn from(link: Link) -> Self {
        Self::Link(link)
    }
}

/// A content record fetched from the CMS.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteEntry {
    pub id: String,
    pub content_type: String,
    pub default_locale: String,
    pub raw_fields: LocalizedFields,
}

impl RemoteEntry {
    /// Default-locale value of every field that has one.
    pub fn fields(&self) -> Fields<FieldValue> {
        default_locale_fields(&self.raw_fields, &self.default_locale)
    }
}

/// A media resource fetched from the CMS.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: String,
    pub url: String,
    pub default_locale: String,
    pub raw_fields: LocalizedFields,
}

impl Asset {
    pub fn fields(&self) -> Fields<FieldValue> {
        default_locale_fields(&self.raw_fields, &self.default_locale)
    }
}

fn default_locale_fields(raw_fields: &LocalizedFields, default_locale: &str) -> Fields<FieldValue> {
    raw_fields
        .iter()
        .filter_map(|(name, values)| {
            values
                .get(default_locale)
                .map(|value| (name.clone(), value.clone()))
        })
        .collect()
}

/// The target of a resolved [`Link`].
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Entry(RemoteEntry),
    Asset(Asset),
}

/// Mapping from field key to value that keeps insertion order.
///
/// Replacing an existing key keeps its position; [`Fields::rename`] moves a
/// value to a new key in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Fields<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for Fields<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> Fields<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Insert or replace, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.position(&key) {
            Some(idx) => Some(std::mem::replace(&mut self.entries[idx].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let idx = self.position(key)?;
        Some(self.entries.remove(idx).1)
    }

    /// Move the value under `from` to `to`, keeping its position. Any value
    /// already under `to` is dropped. Returns false if `from` is absent.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        if from == to {
            return self.contains_key(from);
        }
        if !self.contains_key(from) {
            return false;
        }
        if let Some(existing) = self.position(to) {
            self.entries.remove(existing);
        }
        let Some(idx) = self.position(from) else {
            return false;
        };
        self.entries[idx].0 = to.to_string();
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &V) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }
}

impl<V> FromIterator<(String, V)> for Fields<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut fields = Self::new();
        for (key, value) in iter {
            fields.insert(key, value);
        }
        fields
    }
}

impl<V> IntoIterator for Fields<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl From<Fields<serde_yaml::Value>> for serde_yaml::Mapping {
    fn from(fields: Fields<serde_yaml::Value>) -> Self {
        fields
            .into_iter()
            .map(|(key, value)| (serde_yaml::Value::String(key), value))
            .collect()
    }
}
