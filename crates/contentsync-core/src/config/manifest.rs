//! Manifest parsing for contentsync.toml files
//!
//! The manifest is the parsed configuration of one file. The resolver
//! merges the repository file with its local override before parsing.

use serde::{Deserialize, Serialize};

use contentsync_fs::NormalizedPath;

use crate::locale::{LocaleNormalizer, LocaleRewriteRule};
use crate::reconcile::ReconcileOptions;
use crate::transform::{VARIATION_PLACEHOLDER, VariationConfig};
use crate::{Error, Result};

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_include_depth() -> u32 {
    2
}

fn default_limit() -> u32 {
    100
}

/// Pairs a CMS content type with a target collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Binding {
    /// Pod path of the collection, e.g. `/content/posts/`
    #[serde(rename = "collection", alias = "collection_path")]
    pub collection_path: String,
    pub content_type: String,
    /// Field whose value names the document instead of the entry id
    #[serde(default, rename = "key", alias = "key_field", skip_serializing_if = "Option::is_none")]
    pub key_field: Option<String>,
    /// String field written as the Markdown body instead of front matter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_field: Option<String>,
}

impl Binding {
    pub fn new(collection_path: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            collection_path: collection_path.into(),
            content_type: content_type.into(),
            key_field: None,
            body_field: None,
        }
    }

    pub fn with_key_field(mut self, key_field: impl Into<String>) -> Self {
        self.key_field = Some(key_field.into());
        self
    }

    pub fn with_body_field(mut self, body_field: impl Into<String>) -> Self {
        self.body_field = Some(body_field.into());
        self
    }

    pub fn collection(&self) -> NormalizedPath {
        NormalizedPath::new(&self.collection_path)
    }

    /// Whether `collection` names this binding's collection, ignoring a
    /// trailing slash.
    pub fn owns_collection(&self, collection: &str) -> bool {
        self.collection().trimmed() == NormalizedPath::new(collection).trimmed()
    }
}

/// Delivery API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentfulSection {
    #[serde(default)]
    pub space: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    /// API host override, e.g. `https://cdn.eu.contentful.com`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Use the preview API instead of the delivery API
    #[serde(default)]
    pub preview: bool,
    /// Page size for entry fetches
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default = "default_include_depth")]
    pub include_depth: u32,
}

impl Default for ContentfulSection {
    fn default() -> Self {
        Self {
            space: String::new(),
            access_token: String::new(),
            preview_access_token: None,
            environment: None,
            host: None,
            preview: false,
            limit: default_limit(),
            include_depth: default_include_depth(),
        }
    }
}

impl ContentfulSection {
    /// Token sent with every request: the preview token in preview mode
    /// when one is set, the delivery token otherwise.
    pub fn request_token(&self) -> &str {
        match (self.preview, self.preview_access_token.as_deref()) {
            (true, Some(token)) if !token.trim().is_empty() => token,
            _ => &self.access_token,
        }
    }
}

/// Parsed contentsync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Fields dropped from related entries represented inline
    #[serde(default)]
    pub skip_related_fields: Vec<String>,

    #[serde(default)]
    pub contentful: ContentfulSection,

    #[serde(default, rename = "bind")]
    pub bindings: Vec<Binding>,

    #[serde(default)]
    pub rewrite_locales: Vec<LocaleRewriteRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variation: Option<VariationConfig>,

    #[serde(default)]
    pub reconcile: ReconcileOptions,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            default_locale: default_locale(),
            skip_related_fields: Vec::new(),
            contentful: ContentfulSection::default(),
            bindings: Vec::new(),
            rewrite_locales: Vec::new(),
            variation: None,
            reconcile: ReconcileOptions::default(),
        }
    }
}

impl Manifest {
    /// Parse and validate a manifest from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use contentsync_core::config::Manifest;
    ///
    /// let manifest = Manifest::parse(r#"
    /// [contentful]
    /// space = "abc123"
    ///
    /// [[bind]]
    /// collection = "/content/posts/"
    /// content_type = "post"
    /// "#).unwrap();
    ///
    /// assert_eq!(manifest.bindings[0].content_type, "post");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = toml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check invariants serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.default_locale.trim().is_empty() {
            return Err(Error::invalid_config("default_locale must not be empty"));
        }
        for binding in &self.bindings {
            if binding.content_type.trim().is_empty() {
                return Err(Error::invalid_config(format!(
                    "binding for {} has an empty content_type",
                    binding.collection_path
                )));
            }
            if binding.collection_path.trim().is_empty() {
                return Err(Error::invalid_config(format!(
                    "binding for content type {} has an empty collection",
                    binding.content_type
                )));
            }
            if binding.collection_path.split(['/', '\\']).any(|s| s == "..") {
                return Err(Error::invalid_config(format!(
                    "collection {} must not contain '..'",
                    binding.collection_path
                )));
            }
        }
        if let Some(variation) = &self.variation {
            if variation.separator.is_empty() {
                return Err(Error::invalid_config("variation.separator must not be empty"));
            }
            if !variation.path_template.contains(VARIATION_PLACEHOLDER) {
                return Err(Error::invalid_config(format!(
                    "variation.path_template must contain {VARIATION_PLACEHOLDER}"
                )));
            }
        }
        Ok(())
    }

    /// Check that the manifest can reach the Delivery API.
    pub fn validate_remote(&self) -> Result<()> {
        if self.contentful.space.trim().is_empty() {
            return Err(Error::invalid_config("contentful.space must be set"));
        }
        if self.contentful.request_token().trim().is_empty() {
            return Err(Error::invalid_config(
                "contentful.access_token must be set (or CONTENTFUL_ACCESS_TOKEN)",
            ));
        }
        Ok(())
    }

    pub fn normalizer(&self) -> LocaleNormalizer {
        LocaleNormalizer::new(self.rewrite_locales.clone())
    }

    /// The binding targeting `collection`, trailing slash ignored.
    pub fn binding_for_collection(&self, collection: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|binding| binding.owns_collection(collection))
    }

    /// The binding whose collection contains the document at `path`.
    pub fn binding_for_document(&self, path: &str) -> Option<&Binding> {
        let path = NormalizedPath::new(path);
        self.bindings
            .iter()
            .filter(|binding| path.starts_with(&binding.collection()))
            .max_by_key(|binding| binding.collection().trimmed().len())
    }
}
