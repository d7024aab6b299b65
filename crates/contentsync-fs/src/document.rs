//! On-disk document format
//!
//! A document is either a plain YAML mapping (`*.yaml`, `*.yml`) or a
//! Markdown file with a YAML front matter block (`*.md`).

use serde_yaml::Mapping;

use crate::{Error, NormalizedPath, Result};

const FRONT_MATTER_FENCE: &str = "---";

/// File format of a document, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Markdown,
}

impl DocumentFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "md" => Ok(Self::Markdown),
            _ => Err(Error::UnsupportedFormat {
                extension: extension.to_string(),
            }),
        }
    }

    /// Canonical extension written for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Markdown => "md",
        }
    }
}

/// Fields and optional body of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentContent {
    pub fields: Mapping,
    pub body: Option<String>,
}

impl DocumentContent {
    pub fn new(fields: Mapping) -> Self {
        Self { fields, body: None }
    }

    pub fn with_body(fields: Mapping, body: impl Into<String>) -> Self {
        Self {
            fields,
            body: Some(body.into()),
        }
    }

    /// The empty document written as a placeholder before a new path is
    /// filled in.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Render to the text stored at `path`.
    ///
    /// Markdown documents get a front matter block followed by the body.
    /// A body on a YAML path is an error rather than being dropped.
    pub fn render(&self, path: &NormalizedPath) -> Result<String> {
        let yaml = serde_yaml::to_string(&self.fields).map_err(|e| Error::DocumentSerialize {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        match (DocumentFormat::from_path(path)?, &self.body) {
            (DocumentFormat::Yaml, None) => Ok(yaml),
            (DocumentFormat::Yaml, Some(_)) => Err(Error::DocumentSerialize {
                path: path.to_string(),
                message: "YAML documents cannot carry a body".to_string(),
            }),
            (DocumentFormat::Markdown, body) => {
                let front_matter = if self.fields.is_empty() { "" } else { yaml.as_str() };
                Ok(format!(
                    "{fence}\n{front_matter}{fence}\n{body}",
                    fence = FRONT_MATTER_FENCE,
                    body = body.as_deref().unwrap_or("")
                ))
            }
        }
    }

    /// Parse the text stored at `path`.
    pub fn parse(path: &NormalizedPath, text: &str) -> Result<Self> {
        match DocumentFormat::from_path(path)? {
            DocumentFormat::Yaml => Ok(Self::new(parse_mapping(path, text)?)),
            DocumentFormat::Markdown => {
                let Some((front_matter, body)) = split_front_matter(text) else {
                    return Ok(Self::with_body(Mapping::new(), text));
                };
                Ok(Self::with_body(parse_mapping(path, front_matter)?, body))
            }
        }
    }
}

fn parse_mapping(path: &NormalizedPath, text: &str) -> Result<Mapping> {
    if text.trim().is_empty() {
        return Ok(Mapping::new());
    }
    serde_yaml::from_str(text).map_err(|e| Error::DocumentParse {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Split `---\n<yaml>---\n<body>` into its two halves.
fn split_front_matter(text: &str) -> Option<(&str, &str)> {
    let rest = text
        .strip_prefix(FRONT_MATTER_FENCE)?
        .strip_prefix('\n')?;
    if let Some(body) = rest.strip_prefix("---\n") {
        return Some(("", body));
    }
    let closing = rest.find("\n---\n")?;
    Some((&rest[..closing + 1], &rest[closing + 5..]))
}
