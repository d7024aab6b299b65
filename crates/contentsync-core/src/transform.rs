//! Entry transformer: remote entry to local document

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use contentsync_fs::{DocumentContent, DocumentFormat, is_reserved_name};

use crate::locale::LocaleNormalizer;
use crate::localize::{BUILTIN_FIELDS, LocaleSet, tag_localized_fields};
use crate::model::{Fields, RemoteEntry};
use crate::represent::{Representer, Site, stamp_metadata};
use crate::resolver::Resolver;
use crate::{Error, Result};

/// Builtin key receiving the variation path override.
pub const PATH_KEY: &str = "$path";
/// Builtin key receiving the discovered locales.
pub const LOCALIZATION_KEY: &str = "$localization";
/// Placeholder substituted in [`VariationConfig::path_template`].
pub const VARIATION_PLACEHOLDER: &str = "{variation}";

fn default_variation_field() -> String {
    "slug".to_string()
}

fn default_variation_separator() -> String {
    "--".to_string()
}

/// Splits `base--variation` field values into a clean value and a path
/// override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationConfig {
    #[serde(default = "default_variation_field")]
    pub field: String,
    #[serde(default = "default_variation_separator")]
    pub separator: String,
    pub path_template: String,
}

impl VariationConfig {
    pub fn new(path_template: impl Into<String>) -> Self {
        Self {
            field: default_variation_field(),
            separator: default_variation_separator(),
            path_template: path_template.into(),
        }
    }

    /// Split on the first separator occurrence.
    pub fn split<'v>(&self, value: &'v str) -> Option<VariationSplit<'v>> {
        let (clean, variation) = value.split_once(self.separator.as_str())?;
        Some(VariationSplit {
            clean,
            variation,
            repeated: variation.contains(self.separator.as_str()),
        })
    }

    pub fn path_for(&self, variation: &str) -> String {
        self.path_template.replace(VARIATION_PLACEHOLDER, variation)
    }
}

/// Result of splitting a variation field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariationSplit<'v> {
    pub clean: &'v str,
    pub variation: &'v str,
    /// The separator occurs again inside `variation`
    pub repeated: bool,
}

/// A document produced from one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalDocument {
    /// File name inside the collection, extension included
    pub basename: String,
    pub fields: Fields<Value>,
    pub body: Option<String>,
    /// Id of the entry the document came from
    pub entry_id: String,
}

impl LocalDocument {
    /// Move a string `body_field` out of the front matter into the body,
    /// switching the document to Markdown. Non-string values stay put.
    pub fn extract_body(mut self, body_field: &str) -> Self {
        let Some(Value::String(_)) = self.fields.get(body_field) else {
            return self;
        };
        if let Some(Value::String(body)) = self.fields.remove(body_field) {
            self.body = Some(body);
            self.basename = with_extension(&self.basename, DocumentFormat::Markdown);
        }
        self
    }

    pub fn to_content(&self) -> DocumentContent {
        let fields: Mapping = self.fields.clone().into();
        DocumentContent {
            fields,
            body: self.body.clone(),
        }
    }
}

fn with_extension(basename: &str, format: DocumentFormat) -> String {
    let stem = basename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(basename);
    format!("{}.{}", stem, format.extension())
}

/// Converts remote entries into [`LocalDocument`]s.
pub struct Transformer<'a, R: Resolver + ?Sized> {
    representer: Representer<'a, R>,
    normalizer: &'a LocaleNormalizer,
    variation: Option<&'a VariationConfig>,
}

impl<'a, R: Resolver + ?Sized> Transformer<'a, R> {
    pub fn new(
        resolver: &'a R,
        normalizer: &'a LocaleNormalizer,
        skip_related_fields: &'a [String],
        variation: Option<&'a VariationConfig>,
    ) -> Self {
        Self {
            representer: Representer::new(resolver, normalizer, skip_related_fields),
            normalizer,
            variation,
        }
    }

    pub fn transform(&self, entry: &RemoteEntry, key_field: Option<&str>) -> Result<LocalDocument> {
        self.transform_collecting(entry, key_field, &mut Vec::new())
    }

    /// Transform, pushing every recovered problem onto `warnings`.
    pub fn transform_collecting(
        &self,
        entry: &RemoteEntry,
        key_field: Option<&str>,
        warnings: &mut Vec<String>,
    ) -> Result<LocalDocument> {
        let mut raw = entry.fields();
        let mut locales = LocaleSet::new();
        tag_localized_fields(
            &mut raw,
            &entry.raw_fields,
            &entry.default_locale,
            true,
            self.normalizer,
            &mut locales,
        );

        let mut fields = Fields::new();
        for (key, value) in raw.iter() {
            let site = Site {
                entry_id: &entry.id,
                field: key,
            };
            fields.insert(key, self.representer.represent_field(value, site, &mut locales, warnings)?);
        }
        stamp_metadata(&mut fields, entry);

        let basename = format!(
            "{}.{}",
            document_key(entry, &fields, key_field, warnings),
            DocumentFormat::Yaml.extension()
        );

        if let Some(variation) = self.variation {
            apply_variation(variation, entry, &mut fields, warnings);
        }

        for builtin in BUILTIN_FIELDS {
            fields.rename(builtin, &format!("${builtin}"));
        }

        if locales.has_non_default() {
            let locale_list = locales
                .to_sorted_vec()
                .into_iter()
                .map(Value::String)
                .collect();
            let mut localization = Mapping::new();
            localization.insert(Value::from("locales"), Value::Sequence(locale_list));
            fields.insert(LOCALIZATION_KEY, Value::Mapping(localization));
        }

        Ok(LocalDocument {
            basename,
            fields,
            body: None,
            entry_id: entry.id.clone(),
        })
    }
}

/// The key-field value when set and scalar, the entry id otherwise.
///
/// Path separators are replaced so a document always lands directly in its
/// collection. A key the store would treat as reserved (`_draft`) falls back
/// to the entry id; such a file would never be listed, so it could never
/// be deleted again.
fn document_key(
    entry: &RemoteEntry,
    fields: &Fields<Value>,
    key_field: Option<&str>,
    warnings: &mut Vec<String>,
) -> String {
    let Some(key_field) = key_field else {
        return id_key(&entry.id);
    };
    let key = match fields.get(key_field) {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        None | Some(Value::Null) | Some(Value::String(_)) => {
            tracing::debug!(entry_id = %entry.id, field = key_field, "Key field empty; using entry id");
            return id_key(&entry.id);
        }
        Some(_) => {
            tracing::warn!(entry_id = %entry.id, field = key_field, "Key field is not a scalar; using entry id");
            warnings.push(format!(
                "{}: key field {} is not a scalar, using the entry id",
                entry.id, key_field
            ));
            return id_key(&entry.id);
        }
    };

    let key = key.replace(['/', '\\'], "-");
    if is_reserved_name(&key) {
        tracing::warn!(entry_id = %entry.id, field = key_field, key = %key, "Key names a reserved file; using entry id");
        warnings.push(format!(
            "{}: key {} of field {} starts with a reserved character, using the entry id",
            entry.id, key, key_field
        ));
        return id_key(&entry.id);
    }
    key
}

/// Entry ids may start with `_` or `.` too; those get a `-` prefix.
fn id_key(id: &str) -> String {
    if is_reserved_name(id) {
        format!("-{id}")
    } else {
        id.to_string()
    }
}

fn apply_variation(
    variation: &VariationConfig,
    entry: &RemoteEntry,
    fields: &mut Fields<Value>,
    warnings: &mut Vec<String>,
) {
    let Some(Value::String(value)) = fields.get(&variation.field) else {
        return;
    };
    let Some(split) = variation.split(value) else {
        return;
    };
    if split.repeated {
        let err = Error::MalformedVariation {
            entry_id: entry.id.clone(),
            field: variation.field.clone(),
            value: value.clone(),
        };
        tracing::warn!(entry_id = %entry.id, field = %variation.field, "{}; splitting on the first occurrence", err);
        warnings.push(err.to_string());
    }
    let (clean, path) = (split.clean.to_string(), variation.path_for(split.variation));
    fields.insert(variation.field.clone(), Value::String(clean));
    fields.insert(PATH_KEY, Value::String(path));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_single_separator() {
        let config = VariationConfig::new("/v/{variation}/");
        let split = config.split("foo--bar").unwrap();
        assert_eq!((split.clean, split.variation, split.repeated), ("foo", "bar", false));
        assert_eq!(config.split("foo"), None);
        assert_eq!(config.path_for("bar"), "/v/bar/");
    }

    #[test]
    fn split_flags_repeated_separator() {
        let config = VariationConfig::new("/v/{variation}/");
        let split = config.split("a--b--c").unwrap();
        assert_eq!((split.clean, split.variation, split.repeated), ("a", "b--c", true));
    }

    #[test]
    fn extract_body_switches_to_markdown() {
        let mut fields = Fields::new();
        fields.insert("body", Value::from("# Hi"));
        fields.insert("_id", Value::from("e1"));
        let doc = LocalDocument {
            basename: "e1.yaml".into(),
            fields,
            body: None,
            entry_id: "e1".into(),
        }
        .extract_body("body");

        assert_eq!(doc.basename, "e1.md");
        assert_eq!(doc.body.as_deref(), Some("# Hi"));
        assert!(!doc.fields.contains_key("body"));
    }

    #[test]
    fn extract_body_ignores_non_string() {
        let mut fields = Fields::new();
        fields.insert("body", Value::Mapping(Mapping::new()));
        let doc = LocalDocument {
            basename: "e1.yaml".into(),
            fields,
            body: None,
            entry_id: "e1".into(),
        }
        .extract_body("body");
        assert_eq!(doc.basename, "e1.yaml");
        assert!(doc.body.is_none());
    }
}
