use super::error::ImageError;
use super::record::Tags;
use crate::sdk::util::rate_limit::Limiter;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

const COMMONS_FILE_PATH: &str = "https://commons.wikimedia.org/wiki/Special:FilePath";
const THUMB_WIDTH: &str = "300";

#[async_trait]
pub trait EncyclopediaProvider: Send + Sync {
    /// Thumbnail of the best article match for `title`, if it has one.
    async fn thumbnail(&self, title: &str) -> Result<Option<String>, ImageError>;
}

/// MediaWiki `api.php` full-text search with `pageimages`.
pub struct WikipediaProvider {
    client: Client,
    api_url: String,
    limiter: Limiter,
}

impl WikipediaProvider {
    pub fn new(client: Client, api_url: impl Into<String>, limiter: Limiter) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            limiter,
        }
    }
}

#[derive(Deserialize)]
struct WikiResponse {
    query: Option<WikiQuery>,
}

#[derive(Deserialize)]
struct WikiQuery {
    #[serde(default)]
    pages: HashMap<String, WikiPage>,
}

#[derive(Deserialize)]
struct WikiPage {
    /// Rank of the page in the search results.
    index: Option<u32>,
    thumbnail: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    source: String,
}

#[async_trait]
impl EncyclopediaProvider for WikipediaProvider {
    async fn thumbnail(&self, title: &str) -> Result<Option<String>, ImageError> {
        self.limiter.until_ready().await;
        log::debug!("[PROVIDER] Searching encyclopedia image for \"{}\"", title);

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("format", "json"),
                ("prop", "pageimages"),
                ("pithumbsize", THUMB_WIDTH),
                ("generator", "search"),
                ("gsrlimit", "1"),
                ("gsrsearch", title),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Status(status.as_u16()));
        }
        let text = response.text().await?;
        parse_thumbnail(&text)
    }
}

/// Thumbnail of the top-ranked page of a `generator=search` reply.
pub(crate) fn parse_thumbnail(text: &str) -> Result<Option<String>, ImageError> {
    let response: WikiResponse = serde_json::from_str(text)?;
    let first = response
        .query
        .and_then(|q| q.pages.into_values().min_by_key(|p| p.index.unwrap_or(u32::MAX)));
    Ok(first.and_then(|p| p.thumbnail).map(|t| t.source))
}

/// `File:<name>` → Special:FilePath URL with a fixed width.
pub fn commons_file_url(reference: &str) -> Option<String> {
    let file = reference.trim().strip_prefix("File:")?;
    if file.is_empty() {
        return None;
    }
    let mut url = Url::parse(COMMONS_FILE_PATH).ok()?;
    url.path_segments_mut().ok()?.push(file);
    url.query_pairs_mut().append_pair("width", THUMB_WIDTH);
    Some(url.into())
}

/// Picks the image of a POI: `image` tag, then Commons file, then encyclopedia search.
#[derive(Clone)]
pub struct ImageResolver {
    encyclopedia: Arc<dyn EncyclopediaProvider>,
}

impl ImageResolver {
    pub fn new(encyclopedia: Arc<dyn EncyclopediaProvider>) -> Self {
        Self { encyclopedia }
    }

    pub async fn resolve(&self, name: &str, tags: &Tags) -> Option<String> {
        if let Some(image) = tags.get("image").filter(|v| !v.trim().is_empty()) {
            return Some(image.clone());
        }
        if let Some(url) = tags.get("wikimedia_commons").and_then(|r| commons_file_url(r)) {
            return Some(url);
        }
        match self.encyclopedia.thumbnail(name).await {
            Ok(thumb) => thumb,
            Err(e) => {
                log::debug!("No encyclopedia image for \"{}\": {}", name, e);
                None
            }
        }
    }
}
