//! Delivery API JSON to the remote content model
//!
//! Responses are requested with `locale=*`, so every `fields` object maps
//! field name to locale to value. Links found in a field are materialized
//! from the response includes while depth remains and kept as
//! [`FieldValue::Link`] after that.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Deserialize;
use serde_json::Value as Json;

use contentsync_core::{Asset, FieldValue, Link, LinkKind, LocalizedFields, RemoteEntry};

use crate::{Error, Result};

/// `sys.id` of the error the API reports for links it could not include.
const NOT_RESOLVABLE: &str = "notResolvable";

/// One page of a collection response.
#[derive(Debug, Default, Deserialize)]
pub struct EntryPage {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub items: Vec<Json>,
    #[serde(default)]
    pub includes: Includes,
    #[serde(default)]
    pub errors: Vec<Json>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Includes {
    #[serde(default, rename = "Entry")]
    pub entries: Vec<Json>,
    #[serde(default, rename = "Asset")]
    pub assets: Vec<Json>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, rename = "linkType")]
    link_type: Option<String>,
    #[serde(default, rename = "contentType")]
    content_type: Option<SysRef>,
}

#[derive(Debug, Deserialize)]
struct SysRef {
    sys: SysId,
}

#[derive(Debug, Deserialize)]
struct SysId {
    id: String,
}

fn sys(json: &Json) -> Option<Sys> {
    json.get("sys")
        .and_then(|sys| Sys::deserialize(sys).ok())
}

fn link_kind(name: &str) -> Option<LinkKind> {
    match name {
        "Entry" => Some(LinkKind::Entry),
        "Asset" => Some(LinkKind::Asset),
        _ => None,
    }
}

/// Raw entries and assets seen so far, keyed by id.
#[derive(Debug, Default)]
pub struct LinkIndex {
    entries: HashMap<String, Json>,
    assets: HashMap<String, Json>,
    unresolvable: HashSet<(LinkKind, String)>,
}

impl LinkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the items, includes and unresolvable links of a page.
    pub fn absorb(&mut self, page: &EntryPage) {
        for item in page.items.iter().chain(&page.includes.entries) {
            self.insert(LinkKind::Entry, item.clone());
        }
        for asset in &page.includes.assets {
            self.insert(LinkKind::Asset, asset.clone());
        }
        for error in &page.errors {
            let is_unresolvable = error
                .pointer("/sys/id")
                .and_then(Json::as_str)
                .is_some_and(|id| id == NOT_RESOLVABLE);
            if !is_unresolvable {
                continue;
            }
            let kind = error
                .pointer("/details/linkType")
                .and_then(Json::as_str)
                .and_then(link_kind);
            let id = error.pointer("/details/id").and_then(Json::as_str);
            if let (Some(kind), Some(id)) = (kind, id) {
                self.unresolvable.insert((kind, id.to_string()));
            }
        }
    }

    pub fn insert(&mut self, kind: LinkKind, json: Json) {
        let Some(id) = sys(&json).map(|sys| sys.id) else {
            return;
        };
        match kind {
            LinkKind::Entry => self.entries.insert(id, json),
            LinkKind::Asset => self.assets.insert(id, json),
        };
    }

    pub fn get(&self, link: &Link) -> Option<&Json> {
        match link.kind {
            LinkKind::Entry => self.entries.get(&link.id),
            LinkKind::Asset => self.assets.get(&link.id),
        }
    }

    /// Whether the API already reported `link` as unresolvable.
    pub fn is_unresolvable(&self, link: &Link) -> bool {
        self.unresolvable.contains(&(link.kind, link.id.clone()))
    }
}

/// Decodes raw JSON against a [`LinkIndex`].
pub struct Decoder<'a> {
    index: &'a LinkIndex,
    default_locale: &'a str,
}

impl<'a> Decoder<'a> {
    pub fn new(index: &'a LinkIndex, default_locale: &'a str) -> Self {
        Self {
            index,
            default_locale,
        }
    }

    /// Decode an entry, materializing links `depth` levels deep.
    pub fn entry(&self, json: &Json, depth: u32) -> Result<RemoteEntry> {
        let sys = sys(json).ok_or_else(|| Error::decode("entry without sys"))?;
        if sys.kind != "Entry" {
            return Err(Error::decode(format!("{} is a {}, not an Entry", sys.id, sys.kind)));
        }
        let content_type = sys
            .content_type
            .map(|content_type| content_type.sys.id)
            .ok_or_else(|| Error::decode(format!("entry {} has no content type", sys.id)))?;
        Ok(RemoteEntry {
            id: sys.id,
            content_type,
            default_locale: self.default_locale.to_string(),
            raw_fields: self.fields(json, depth)?,
        })
    }

    /// Decode an asset. Its url is the default-locale `file.url`.
    pub fn asset(&self, json: &Json, depth: u32) -> Result<Asset> {
        let sys = sys(json).ok_or_else(|| Error::decode("asset without sys"))?;
        if sys.kind != "Asset" {
            return Err(Error::decode(format!("{} is a {}, not an Asset", sys.id, sys.kind)));
        }
        let url = json
            .get("fields")
            .and_then(|fields| fields.get("file"))
            .and_then(|file| file.get(self.default_locale))
            .and_then(|file| file.get("url"))
            .and_then(Json::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Asset {
            id: sys.id,
            url,
            default_locale: self.default_locale.to_string(),
            raw_fields: self.fields(json, depth)?,
        })
    }

    fn fields(&self, json: &Json, depth: u32) -> Result<LocalizedFields> {
        let Some(fields) = json.get("fields") else {
            return Ok(LocalizedFields::new());
        };
        let fields = fields
            .as_object()
            .ok_or_else(|| Error::decode("fields is not an object"))?;

        let mut localized = LocalizedFields::new();
        for (name, per_locale) in fields {
            let per_locale = per_locale.as_object().ok_or_else(|| {
                Error::decode(format!("field {name} is not keyed by locale"))
            })?;
            let values = per_locale
                .iter()
                .map(|(locale, value)| (locale.clone(), self.value(value, depth)))
                .collect();
            localized.insert(name.clone(), values);
        }
        Ok(localized)
    }

    fn value(&self, json: &Json, depth: u32) -> FieldValue {
        match json {
            Json::Object(map) => match self.link(json) {
                Some(link) => self.materialize(link, depth),
                None => FieldValue::Map(
                    map.iter()
                        .map(|(key, value)| (key.clone(), self.value(value, depth)))
                        .collect::<BTreeMap<_, _>>(),
                ),
            },
            Json::Array(items) => {
                FieldValue::List(items.iter().map(|item| self.value(item, depth)).collect())
            }
            scalar => FieldValue::Scalar(yaml_scalar(scalar)),
        }
    }

    fn link(&self, json: &Json) -> Option<Link> {
        let sys = sys(json)?;
        if sys.kind != "Link" {
            return None;
        }
        let kind = link_kind(sys.link_type.as_deref()?)?;
        Some(Link { kind, id: sys.id })
    }

    fn materialize(&self, link: Link, depth: u32) -> FieldValue {
        if depth == 0 {
            return FieldValue::Link(link);
        }
        let Some(target) = self.index.get(&link) else {
            return FieldValue::Link(link);
        };
        let decoded = match link.kind {
            LinkKind::Entry => self
                .entry(target, depth - 1)
                .map(|entry| FieldValue::Entry(Box::new(entry))),
            LinkKind::Asset => self
                .asset(target, depth - 1)
                .map(|asset| FieldValue::Asset(Box::new(asset))),
        };
        decoded.unwrap_or_else(|err| {
            tracing::debug!(link_id = %link.id, "Included {} not decodable: {}", link.kind, err);
            FieldValue::Link(link)
        })
    }
}

fn yaml_scalar(json: &Json) -> serde_yaml::Value {
    match json {
        Json::Bool(b) => serde_yaml::Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_yaml::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                serde_yaml::Value::from(u)
            } else {
                serde_yaml::Value::from(n.as_f64().unwrap_or_default())
            }
        }
        Json::String(s) => serde_yaml::Value::String(s.clone()),
        _ => serde_yaml::Value::Null,
    }
}
