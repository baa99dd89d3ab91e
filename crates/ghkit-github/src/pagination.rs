//! Lazy pagination over GitHub list endpoints.
//!
//! Two schemes are supported:
//!
//! - [`Strategy::Links`]: follow the `Link: <url>; rel="next"` header until a
//!   response has no `next` relation.
//! - [`Strategy::Count`]: request `page=1, 2, ...` until `total_count` items
//!   have been seen (used by endpoints such as the artifact listing).
//!
//! Pages are fetched on demand. Items are yielded in page order, then in the
//! order the server returned them.

use std::collections::{BTreeMap, VecDeque};

use futures_util::future;
use futures_util::stream::{self, Stream, TryStreamExt};
use ghkit_core::{Error, Result};
use reqwest::header::{HeaderMap, LINK};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::client::{decode_json, GitHubClient, NO_PARAMS};

/// Largest page size GitHub accepts.
pub const MAX_PER_PAGE: u32 = 100;

/// How the next page is located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Follow `rel="next"` from the `Link` header.
    #[default]
    Links,
    /// Increment `page` until `total_count` items were downloaded.
    Count,
}

// =============================================================================
// Page request
// =============================================================================

/// Description of a paginated listing.
#[derive(Debug, Clone)]
pub struct PageRequest {
    api: String,
    params: BTreeMap<String, String>,
    items_key: Option<String>,
    strategy: Strategy,
    per_page: u32,
}

impl PageRequest {
    /// Listing at `api` (path or absolute URL) whose body is a JSON array.
    pub fn new(api: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            params: BTreeMap::new(),
            items_key: None,
            strategy: Strategy::Links,
            per_page: MAX_PER_PAGE,
        }
    }

    /// Add a query parameter to the first request (every request for [`Strategy::Count`]).
    ///
    /// `per_page` and `page` are controlled by the paginator and are ignored here.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        if key != "per_page" && key != "page" {
            self.params.insert(key, value.to_string());
        }
        self
    }

    /// Add an optional query parameter, skipping `None`.
    pub fn param_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// Items live in an array under `key` instead of being the body itself.
    pub fn items_key(mut self, key: impl Into<String>) -> Self {
        self.items_key = Some(key.into());
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Page size, clamped to `1..=100`.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    pub fn page_size(&self) -> u32 {
        self.per_page
    }

    fn query(&self, page: Option<u32>) -> Vec<(String, String)> {
        let mut query: Vec<(String, String)> = self
            .params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        query.push(("per_page".to_string(), self.per_page.to_string()));
        if let Some(page) = page {
            query.push(("page".to_string(), page.to_string()));
        }
        query
    }
}

// =============================================================================
// Link header
// =============================================================================

/// Relations parsed from `Link` response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkHeader {
    links: BTreeMap<String, String>,
}

impl LinkHeader {
    /// Parse one header value: `<url>; rel="next", <url2>; rel="last"`.
    ///
    /// Segments without a `<url>` or a `rel` are skipped.
    pub fn parse(value: &str) -> Self {
        let mut header = Self::default();
        header.extend(value);
        header
    }

    /// Merge every `Link` header of a response.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut header = Self::default();
        for value in headers.get_all(LINK) {
            if let Ok(value) = value.to_str() {
                header.extend(value);
            }
        }
        header
    }

    fn extend(&mut self, value: &str) {
        for segment in value.split(',') {
            let mut parts = segment.split(';').map(str::trim);

            let Some(url) = parts
                .next()
                .and_then(|p| p.strip_prefix('<'))
                .and_then(|p| p.strip_suffix('>'))
            else {
                continue;
            };

            for part in parts {
                let Some((name, rel)) = part.split_once('=') else {
                    continue;
                };
                if name.trim() != "rel" {
                    continue;
                }
                // rel may list several space-separated relation types
                for rel in rel.trim().trim_matches('"').split_whitespace() {
                    self.links.insert(rel.to_string(), url.to_string());
                }
            }
        }
    }

    pub fn get(&self, rel: &str) -> Option<&str> {
        self.links.get(rel).map(String::as_str)
    }

    pub fn next(&self) -> Option<&str> {
        self.get("next")
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

// =============================================================================
// Item extraction
// =============================================================================

/// Pull the items out of a page body.
///
/// A JSON array is the item list itself. An object must carry an array under
/// `items_key`. Anything else is a decode error, never an empty page.
pub fn extract_items(body: Value, items_key: Option<&str>) -> Result<Vec<Value>> {
    match (body, items_key) {
        (Value::Array(items), _) => Ok(items),
        (Value::Object(mut map), Some(key)) => match map.remove(key) {
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(Error::InvalidData(format!(
                "Field '{}' in page response is not an array",
                key
            ))),
            None => Err(Error::InvalidData(format!(
                "Page response has no '{}' field",
                key
            ))),
        },
        (Value::Object(_), None) => Err(Error::InvalidData(
            "Page response is an object but no items key was given".to_string(),
        )),
        (other, _) => Err(Error::InvalidData(format!(
            "Unexpected page response: {}",
            other
        ))),
    }
}

// =============================================================================
// Paginator
// =============================================================================

enum NextPage {
    First,
    Url(String),
    Number(u32),
}

struct Pager {
    client: GitHubClient,
    request: PageRequest,
    buffer: VecDeque<Value>,
    next: Option<NextPage>,
    downloaded: u64,
}

impl Pager {
    async fn fetch(&mut self, next: NextPage) -> Result<()> {
        let response = match (&next, self.request.strategy) {
            (NextPage::Url(url), _) => self.client.get(url, NO_PARAMS).await?,
            (NextPage::First, Strategy::Links) => {
                let query = self.request.query(None);
                self.client.get(&self.request.api, &query).await?
            }
            (NextPage::First, Strategy::Count) => {
                let query = self.request.query(Some(1));
                self.client.get(&self.request.api, &query).await?
            }
            (NextPage::Number(page), _) => {
                let query = self.request.query(Some(*page));
                self.client.get(&self.request.api, &query).await?
            }
        };

        let links = LinkHeader::from_headers(response.headers());
        let body: Value = decode_json(response).await?;

        match self.request.strategy {
            Strategy::Links => {
                let items = extract_items(body, self.request.items_key.as_deref())?;
                self.next = links.next().map(|url| NextPage::Url(url.to_string()));
                self.buffer.extend(items);
            }
            Strategy::Count => {
                let total = body
                    .get("total_count")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| {
                        Error::InvalidData("Page response has no 'total_count' field".into())
                    })?;
                let items = extract_items(body, self.request.items_key.as_deref())?;
                let page = match next {
                    NextPage::Number(page) => page,
                    _ => 1,
                };

                self.downloaded += items.len() as u64;
                if !items.is_empty() && total > self.downloaded {
                    self.next = Some(NextPage::Number(page + 1));
                }
                debug!(
                    page = page,
                    total = total,
                    downloaded = self.downloaded,
                    "Fetched counted page"
                );
                self.buffer.extend(items);
            }
        }

        Ok(())
    }
}

/// Stream every item of a paginated listing as raw JSON.
///
/// The first page is requested on the first poll. A failing page ends the
/// stream with its error after the items of earlier pages.
pub fn paginate_items(
    client: &GitHubClient,
    request: PageRequest,
) -> impl Stream<Item = Result<Value>> + Send + 'static {
    let pager = Pager {
        client: client.clone(),
        request,
        buffer: VecDeque::new(),
        next: Some(NextPage::First),
        downloaded: 0,
    };

    stream::unfold(pager, |mut pager| async move {
        loop {
            if let Some(item) = pager.buffer.pop_front() {
                return Some((Ok(item), pager));
            }
            let next = pager.next.take()?;
            if let Err(e) = pager.fetch(next).await {
                pager.next = None;
                return Some((Err(e), pager));
            }
        }
    })
}

/// Stream every item of a paginated listing, decoded as `T`.
pub fn paginate<T>(
    client: &GitHubClient,
    request: PageRequest,
) -> impl Stream<Item = Result<T>> + Send + 'static
where
    T: DeserializeOwned + Send + 'static,
{
    paginate_items(client, request).and_then(|item| {
        future::ready(
            serde_json::from_value(item)
                .map_err(|e| Error::InvalidData(format!("Failed to parse item: {}", e))),
        )
    })
}
