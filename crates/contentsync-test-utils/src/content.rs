//! Builders for [`RemoteEntry`] and [`Asset`] fixtures.

use contentsync_core::{Asset, FieldValue, LocalizedFields, RemoteEntry};

const DEFAULT_LOCALE: &str = "en-US";

/// Builds a [`RemoteEntry`] field by field.
///
/// # Example
///
/// ```rust
/// use contentsync_test_utils::EntryBuilder;
///
/// let entry = EntryBuilder::new("e1", "post")
///     .field("title", "Hello")
///     .localized("title", "de", "Hallo")
///     .build();
/// assert_eq!(entry.raw_fields["title"].len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    id: String,
    content_type: String,
    default_locale: String,
    raw_fields: LocalizedFields,
}

impl EntryBuilder {
    pub fn new(id: &str, content_type: &str) -> Self {
        Self {
            id: id.to_string(),
            content_type: content_type.to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
            raw_fields: LocalizedFields::new(),
        }
    }

    pub fn default_locale(mut self, locale: &str) -> Self {
        self.default_locale = locale.to_string();
        self
    }

    /// Set the default-locale value of a field.
    pub fn field(self, name: &str, value: impl Into<FieldValue>) -> Self {
        let locale = self.default_locale.clone();
        self.localized(name, &locale, value)
    }

    /// Set a field's value for one locale.
    pub fn localized(mut self, name: &str, locale: &str, value: impl Into<FieldValue>) -> Self {
        self.raw_fields
            .entry(name.to_string())
            .or_default()
            .insert(locale.to_string(), value.into());
        self
    }

    pub fn build(self) -> RemoteEntry {
        RemoteEntry {
            id: self.id,
            content_type: self.content_type,
            default_locale: self.default_locale,
            raw_fields: self.raw_fields,
        }
    }
}

/// Builds an [`Asset`] with a `file.url` field matching its url.
#[derive(Debug, Clone)]
pub struct AssetBuilder {
    id: String,
    url: String,
    default_locale: String,
    raw_fields: LocalizedFields,
}

impl AssetBuilder {
    pub fn new(id: &str, url: &str) -> Self {
        Self {
            id: id.to_string(),
            url: url.to_string(),
            default_locale: DEFAULT_LOCALE.to_string(),
            raw_fields: LocalizedFields::new(),
        }
    }

    pub fn field(self, name: &str, value: impl Into<FieldValue>) -> Self {
        let locale = self.default_locale.clone();
        self.localized(name, &locale, value)
    }

    pub fn localized(mut self, name: &str, locale: &str, value: impl Into<FieldValue>) -> Self {
        self.raw_fields
            .entry(name.to_string())
            .or_default()
            .insert(locale.to_string(), value.into());
        self
    }

    pub fn build(self) -> Asset {
        let mut file = std::collections::BTreeMap::new();
        file.insert("url".to_string(), FieldValue::from(self.url.as_str()));
        let mut raw_fields = self.raw_fields;
        raw_fields
            .entry("file".to_string())
            .or_default()
            .entry(self.default_locale.clone())
            .or_insert(FieldValue::Map(file));
        Asset {
            id: self.id,
            url: self.url,
            default_locale: self.default_locale,
            raw_fields,
        }
    }
}
