//! Blocking Delivery API client

use std::cell::RefCell;
use std::time::Duration;

use serde_json::Value as Json;

use contentsync_core::{
    ContentfulSection, EntrySource, FetchQuery, Link, LinkKind, RemoteEntry, Resolved, Resolver,
};

use crate::parse::{Decoder, EntryPage, LinkIndex};
use crate::{Error, Result};

pub const DELIVERY_HOST: &str = "https://cdn.contentful.com";
pub const PREVIEW_HOST: &str = "https://preview.contentful.com";

const DEFAULT_ENVIRONMENT: &str = "master";
/// Deepest include level the API accepts.
const MAX_INCLUDE_DEPTH: u32 = 10;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("contentsync/", env!("CARGO_PKG_VERSION"));

/// Client for one space and environment.
///
/// Everything fetched is kept in a [`LinkIndex`], so links to entries seen
/// in an earlier page or binding resolve without another request.
pub struct ContentfulClient {
    http: reqwest::blocking::Client,
    base_url: String,
    access_token: String,
    default_locale: String,
    limit: u32,
    include_depth: u32,
    index: RefCell<LinkIndex>,
}

impl ContentfulClient {
    /// Connect to the configured host, or to the delivery or preview host
    /// as the section selects.
    pub fn new(section: &ContentfulSection, default_locale: &str) -> Result<Self> {
        let host = match &section.host {
            Some(host) => host.as_str(),
            None if section.preview => PREVIEW_HOST,
            None => DELIVERY_HOST,
        };
        Self::with_host(section, default_locale, host)
    }

    /// Connect to an explicit host, e.g. a local mock server.
    pub fn with_host(section: &ContentfulSection, default_locale: &str, host: &str) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        let environment = section.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT);

        Ok(Self {
            http,
            base_url: format!(
                "{}/spaces/{}/environments/{}",
                host.trim_end_matches('/'),
                section.space,
                environment
            ),
            access_token: section.request_token().to_string(),
            default_locale: default_locale.to_string(),
            limit: section.limit.max(1),
            include_depth: section.include_depth.min(MAX_INCLUDE_DEPTH),
            index: RefCell::new(LinkIndex::new()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Json> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "GET");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound { url });
        }
        if !status.is_success() {
            let message = response
                .json::<Json>()
                .ok()
                .and_then(|body| body.get("message").and_then(Json::as_str).map(str::to_string))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(Error::Status {
                status: status.as_u16(),
                url,
                message,
            });
        }

        response
            .json::<Json>()
            .map_err(|e| Error::decode(format!("{url}: {e}")))
    }

    /// Fetch one page of entries.
    pub fn fetch_page(&self, query: &FetchQuery, skip: u64) -> Result<EntryPage> {
        let params = [
            ("content_type", query.content_type.clone()),
            ("include", query.include_depth.min(MAX_INCLUDE_DEPTH).to_string()),
            ("locale", query.locale.clone()),
            ("limit", self.limit.to_string()),
            ("skip", skip.to_string()),
        ];
        let body = self.get("/entries", &params)?;
        serde_json::from_value(body).map_err(|e| Error::decode(e.to_string()))
    }

    /// Every entry of the query, following pagination until `total`.
    pub fn fetch_all(&self, query: &FetchQuery) -> Result<Vec<RemoteEntry>> {
        let mut entries = Vec::new();
        let mut skip = 0;
        loop {
            let page = self.fetch_page(query, skip)?;
            let count = page.items.len() as u64;
            self.index.borrow_mut().absorb(&page);

            let index = self.index.borrow();
            let decoder = Decoder::new(&index, &self.default_locale);
            for item in &page.items {
                entries.push(decoder.entry(item, query.include_depth)?);
            }

            skip += count;
            tracing::debug!(
                content_type = %query.content_type,
                fetched = skip,
                total = page.total,
                "Fetched page"
            );
            if count == 0 || skip >= page.total {
                break;
            }
        }
        Ok(entries)
    }

    fn fetch_target(&self, link: &Link) -> Result<Json> {
        let path = match link.kind {
            LinkKind::Entry => format!("/entries/{}", link.id),
            LinkKind::Asset => format!("/assets/{}", link.id),
        };
        self.get(&path, &[("locale", contentsync_core::resolver::ALL_LOCALES.to_string())])
    }

    fn decode_target(&self, link: &Link, json: &Json) -> Result<Resolved> {
        let index = self.index.borrow();
        let decoder = Decoder::new(&index, &self.default_locale);
        match link.kind {
            LinkKind::Entry => decoder.entry(json, self.include_depth).map(Resolved::Entry),
            LinkKind::Asset => decoder.asset(json, self.include_depth).map(Resolved::Asset),
        }
    }
}

impl Resolver for ContentfulClient {
    fn resolve(&self, link: &Link) -> contentsync_core::Result<Resolved> {
        let not_found = || contentsync_core::Error::ReferenceNotFound {
            kind: link.kind,
            id: link.id.clone(),
        };
        if self.index.borrow().is_unresolvable(link) {
            return Err(not_found());
        }

        let cached = self.index.borrow().get(link).cloned();
        let json = match cached {
            Some(json) => json,
            None => match self.fetch_target(link) {
                Ok(json) => {
                    self.index.borrow_mut().insert(link.kind, json.clone());
                    json
                }
                Err(Error::NotFound { .. }) => return Err(not_found()),
                Err(err) => return Err(err.into()),
            },
        };
        Ok(self.decode_target(link, &json)?)
    }
}

impl EntrySource for ContentfulClient {
    fn fetch_entries(&self, query: &FetchQuery) -> contentsync_core::Result<Vec<RemoteEntry>> {
        Ok(self.fetch_all(query)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(preview: bool) -> ContentfulSection {
        ContentfulSection {
            space: "sp4ce".into(),
            access_token: "delivery".into(),
            preview_access_token: Some("preview".into()),
            preview,
            ..ContentfulSection::default()
        }
    }

    #[test]
    fn delivery_host_by_default() {
        let client = ContentfulClient::new(&section(false), "en-US").unwrap();
        assert_eq!(client.base_url(), "https://cdn.contentful.com/spaces/sp4ce/environments/master");
        assert_eq!(client.access_token, "delivery");
    }

    #[test]
    fn preview_uses_preview_host_and_token() {
        let mut section = section(true);
        section.environment = Some("staging".into());
        let client = ContentfulClient::new(&section, "en-US").unwrap();
        assert_eq!(
            client.base_url(),
            "https://preview.contentful.com/spaces/sp4ce/environments/staging"
        );
        assert_eq!(client.access_token, "preview");
    }

    #[test]
    fn configured_host_wins() {
        let mut section = section(true);
        section.host = Some("https://cdn.eu.contentful.com/".into());
        let client = ContentfulClient::new(&section, "en-US").unwrap();
        assert_eq!(
            client.base_url(),
            "https://cdn.eu.contentful.com/spaces/sp4ce/environments/master"
        );
    }
}
