//! Representers: remote values to plain YAML values
//!
//! Dispatch is over [`FieldValue`]. Links met directly in a top-level
//! field are resolved once and the target is represented inline. Inside a
//! represented target, already-materialized values are walked but links are
//! written as stubs, so resolution work is bounded by the number of direct
//! link occurrences and reference cycles cannot recurse.

use serde_yaml::{Mapping, Value};

use crate::locale::LocaleNormalizer;
use crate::localize::{LocaleSet, tag_localized_fields};
use crate::model::{Asset, FieldValue, Fields, Link, RemoteEntry, Resolved};
use crate::resolver::Resolver;
use crate::Result;

/// Metadata keys stamped on every represented entry.
pub const CONTENT_TYPE_KEY: &str = "_content_type";
pub const ID_KEY: &str = "_id";

/// Where a value sits, for diagnostics.
#[derive(Debug, Clone, Copy)]
pub struct Site<'a> {
    pub entry_id: &'a str,
    pub field: &'a str,
}

/// Links are resolved only at the top level of an entry's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkPolicy {
    Resolve,
    Stub,
}

pub struct Representer<'a, R: Resolver + ?Sized> {
    resolver: &'a R,
    normalizer: &'a LocaleNormalizer,
    skip_related_fields: &'a [String],
}

impl<'a, R: Resolver + ?Sized> Representer<'a, R> {
    pub fn new(
        resolver: &'a R,
        normalizer: &'a LocaleNormalizer,
        skip_related_fields: &'a [String],
    ) -> Self {
        Self {
            resolver,
            normalizer,
            skip_related_fields,
        }
    }

    /// Represent a top-level field value, resolving the links it holds.
    ///
    /// A link whose target is gone becomes an empty mapping and a warning
    /// is pushed; transport failures propagate. Locales of every represented
    /// target are added to `locales`, the set of the entry being transformed.
    pub fn represent_field(
        &self,
        value: &FieldValue,
        site: Site<'_>,
        locales: &mut LocaleSet,
        warnings: &mut Vec<String>,
    ) -> Result<Value> {
        self.represent(value, LinkPolicy::Resolve, site, locales, warnings)
    }

    fn represent(
        &self,
        value: &FieldValue,
        policy: LinkPolicy,
        site: Site<'_>,
        locales: &mut LocaleSet,
        warnings: &mut Vec<String>,
    ) -> Result<Value> {
        match value {
            FieldValue::Scalar(scalar) => Ok(scalar.clone()),
            FieldValue::Map(map) => {
                let mut mapping = Mapping::new();
                for (key, nested) in map {
                    let nested = self.represent(nested, policy, site, locales, warnings)?;
                    mapping.insert(Value::String(key.clone()), nested);
                }
                Ok(Value::Mapping(mapping))
            }
            FieldValue::List(items) => items
                .iter()
                .map(|item| self.represent(item, policy, site, locales, warnings))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            FieldValue::Link(link) => match policy {
                LinkPolicy::Resolve => self.represent_link(link, site, locales, warnings),
                LinkPolicy::Stub => Ok(link.to_stub()),
            },
            FieldValue::Entry(entry) => self.represent_entry(entry, locales, warnings),
            FieldValue::Asset(asset) => self.represent_asset(asset, locales, warnings),
        }
    }

    /// Resolve `link` and represent its target.
    pub fn represent_link(
        &self,
        link: &Link,
        site: Site<'_>,
        locales: &mut LocaleSet,
        warnings: &mut Vec<String>,
    ) -> Result<Value> {
        match self.resolver.resolve(link) {
            Ok(Resolved::Entry(entry)) => self.represent_entry(&entry, locales, warnings),
            Ok(Resolved::Asset(asset)) => self.represent_asset(&asset, locales, warnings),
            Err(err) if err.is_not_found() => {
                tracing::warn!(
                    entry_id = site.entry_id,
                    field = site.field,
                    link_type = %link.kind,
                    link_id = %link.id,
                    "Linked {} not found; writing an empty mapping",
                    link.kind
                );
                warnings.push(format!(
                    "{}: field {}: {}",
                    site.entry_id, site.field, err
                ));
                Ok(Value::Mapping(Mapping::new()))
            }
            Err(err) => Err(err),
        }
    }

    /// The asset's own fields, localized, as a mapping.
    pub fn represent_asset(
        &self,
        asset: &Asset,
        locales: &mut LocaleSet,
        warnings: &mut Vec<String>,
    ) -> Result<Value> {
        let mut fields = asset.fields();
        tag_localized_fields(
            &mut fields,
            &asset.raw_fields,
            &asset.default_locale,
            false,
            self.normalizer,
            locales,
        );
        let fields = self.represent_fields(&fields, &asset.id, LinkPolicy::Stub, locales, warnings)?;
        Ok(Value::Mapping(fields.into()))
    }

    /// A related entry: localized fields minus skipped fields, stamped with
    /// `_content_type` and `_id`.
    pub fn represent_entry(
        &self,
        entry: &RemoteEntry,
        locales: &mut LocaleSet,
        warnings: &mut Vec<String>,
    ) -> Result<Value> {
        let mut fields = entry.fields();
        tag_localized_fields(
            &mut fields,
            &entry.raw_fields,
            &entry.default_locale,
            false,
            self.normalizer,
            locales,
        );
        fields.retain(|key, _| !self.is_skipped(key));

        let mut fields = self.represent_fields(&fields, &entry.id, LinkPolicy::Stub, locales, warnings)?;
        stamp_metadata(&mut fields, entry);
        Ok(Value::Mapping(fields.into()))
    }

    fn represent_fields(
        &self,
        fields: &Fields<FieldValue>,
        entry_id: &str,
        policy: LinkPolicy,
        locales: &mut LocaleSet,
        warnings: &mut Vec<String>,
    ) -> Result<Fields<Value>> {
        let mut represented = Fields::new();
        for (key, value) in fields.iter() {
            let site = Site { entry_id, field: key };
            represented.insert(key, self.represent(value, policy, site, locales, warnings)?);
        }
        Ok(represented)
    }

    /// A skipped field also drops its `@locale` variants.
    fn is_skipped(&self, key: &str) -> bool {
        let base = key.split('@').next().unwrap_or(key);
        self.skip_related_fields.iter().any(|skip| skip == base)
    }
}

/// Set `_content_type` and `_id` from the entry's system metadata.
pub fn stamp_metadata(fields: &mut Fields<Value>, entry: &RemoteEntry) {
    fields.insert(CONTENT_TYPE_KEY, Value::String(entry.content_type.clone()));
    fields.insert(ID_KEY, Value::String(entry.id.clone()));
}
