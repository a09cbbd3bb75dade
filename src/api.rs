use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::logic::errors::format_error_message;
use crate::model::{FetchFailure, Mirrors, Page, SortSpec};
use crate::services::connectivity::ReachabilityProbe;
use crate::services::paging::PageSource;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_number")]
    pub size: Option<u64>, // bytes
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub mirrors: Vec<String>,
}

impl Book {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            author: None,
            year: None,
            size: None,
            extension: None,
            mirrors: Vec::new(),
        }
    }

    pub fn mirrors(&self) -> Mirrors {
        Mirrors(self.mirrors.clone())
    }
}

/// Catalog JSON sometimes encodes numbers as strings
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    Text(String),
}

fn deserialize_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Empty strings and null mean "unknown"
fn deserialize_optional_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Helper function to deserialize null as empty vector
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LatestBooksResponse {
    Wrapped {
        books: Vec<Book>,
        #[serde(default)]
        has_more: Option<bool>,
    },
    Bare(Vec<Book>),
}

/// Build the latest-books URL for one page
///
/// The default ordering sends neither `sort` nor `sortmode`.
pub fn build_page_url(base_url: &str, offset: usize, limit: usize, sort: &SortSpec) -> String {
    let mut url = format!(
        "{}/books/latest?offset={}&limit={}",
        base_url.trim_end_matches('/'),
        offset,
        limit
    );

    if let Some((field, direction)) = sort.query_params() {
        url.push_str(&format!("&sort={}&sortmode={}", field, direction));
    }

    url
}

/// Parse a latest-books body into a page
///
/// Without an explicit `has_more`, a full page means there may be more.
pub fn parse_page_response(text: &str, page_size: usize) -> Result<Page> {
    let response: LatestBooksResponse =
        serde_json::from_str(text).context("Failed to parse latest books response")?;

    let (books, has_more) = match response {
        LatestBooksResponse::Wrapped { books, has_more } => (books, has_more),
        LatestBooksResponse::Bare(books) => (books, None),
    };

    let has_more = has_more.unwrap_or(books.len() >= page_size);
    Ok(Page::new(books, has_more))
}

#[derive(Clone)]
pub struct CatalogClient {
    base_url: String,
    api_key: Option<String>,
    page_size: usize,
    client: Client,
}

impl CatalogClient {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        page_size: usize,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url,
            api_key,
            page_size,
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.base_url.clone(),
            config.api_key.clone(),
            config.page_size,
            config.request_timeout(),
        )
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.api_key {
            Some(key) => request.header("X-API-Key", key),
            None => request,
        }
    }

    pub async fn fetch_latest(&self, offset: usize, sort: SortSpec) -> Result<Page, FetchFailure> {
        let url = build_page_url(&self.base_url, offset, self.page_size, &sort);
        debug!(%url, "fetching latest books");

        let response = self
            .get(&url)
            .send()
            .await
            .context("Failed to fetch latest books")
            .map_err(|e| FetchFailure::from_error(&e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .context("Failed to read response")
            .map_err(|e| FetchFailure::from_error(&e))?;

        if !status.is_success() {
            let message = if text.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text.trim().to_string()
            };
            return Err(FetchFailure::api(status.as_u16(), message));
        }

        parse_page_response(&text, self.page_size)
            .map_err(|e| FetchFailure::api(status.as_u16(), format_error_message(&e)))
    }

    /// Any HTTP answer from the service counts as reachable
    pub async fn ping(&self) -> bool {
        match self.get(&self.base_url).send().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "catalog ping failed");
                false
            }
        }
    }
}

#[async_trait]
impl PageSource for CatalogClient {
    async fn fetch_page(&self, offset: usize, sort: SortSpec) -> Result<Page, FetchFailure> {
        self.fetch_latest(offset, sort).await
    }
}

#[async_trait]
impl ReachabilityProbe for CatalogClient {
    async fn is_reachable(&self) -> bool {
        self.ping().await
    }
}
