//! Open Library search and ISBN lookup.

use serde::Deserialize;

use super::{BookCandidate, LookupError};
#[cfg(feature = "lookup")]
use super::{http::JsonClient, MetadataLookup, UNKNOWN_AUTHOR};
#[cfg(feature = "lookup")]
use crate::config::LookupConfig;
#[cfg(feature = "lookup")]
use tracing::warn;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    title: Option<String>,
    #[serde(default)]
    author_name: Vec<String>,
    #[serde(default)]
    isbn: Vec<String>,
    cover_i: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct EditionResponse {
    title: String,
    #[serde(default)]
    authors: Vec<AuthorRef>,
    #[serde(default)]
    covers: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct AuthorRef {
    key: String,
}

#[derive(Debug, Deserialize)]
struct AuthorResponse {
    name: String,
}

/// An edition record from `/isbn/<isbn>.json`. The author still has to be
/// resolved through `author_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edition {
    pub title: String,
    pub author_key: Option<String>,
    pub cover_url: Option<String>,
}

/// Large cover image for a cover id. Open Library uses -1 for "no cover".
pub fn cover_url(covers_base: &str, cover_id: i64) -> Option<String> {
    if cover_id <= 0 {
        return None;
    }
    Some(format!(
        "{}/b/id/{}-L.jpg",
        covers_base.trim_end_matches('/'),
        cover_id
    ))
}

/// Parse a `/search.json` body. Docs without a title or author are skipped.
pub fn parse_search(body: &str, covers_base: &str) -> Result<Vec<BookCandidate>, LookupError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response
        .docs
        .into_iter()
        .filter_map(|doc| {
            let title = doc.title.filter(|title| !title.trim().is_empty())?;
            let author = doc.author_name.into_iter().next()?;
            let mut candidate = BookCandidate::new(title, author);
            candidate.isbn = doc.isbn.into_iter().next().unwrap_or_default();
            candidate.cover_url = doc.cover_i.and_then(|id| cover_url(covers_base, id));
            Some(candidate)
        })
        .collect())
}

pub fn parse_edition(body: &str, covers_base: &str) -> Result<Edition, LookupError> {
    let response: EditionResponse = serde_json::from_str(body)?;
    Ok(Edition {
        title: response.title,
        author_key: response.authors.into_iter().next().map(|author| author.key),
        cover_url: response
            .covers
            .into_iter()
            .find_map(|id| cover_url(covers_base, id)),
    })
}

/// Parse an author record, e.g. `/authors/OL79034A.json`.
pub fn parse_author(body: &str) -> Result<String, LookupError> {
    let response: AuthorResponse = serde_json::from_str(body)?;
    Ok(response.name)
}

/// Open Library over blocking HTTP.
#[cfg(feature = "lookup")]
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: JsonClient,
    base_url: String,
    covers_url: String,
    page_size: usize,
}

#[cfg(feature = "lookup")]
impl OpenLibraryClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        Ok(Self {
            http: JsonClient::new(config)?,
            base_url: config.open_library_url.trim_end_matches('/').to_string(),
            covers_url: config.covers_url.clone(),
            page_size: config.page_size,
        })
    }

    fn author_name(&self, key: &str) -> String {
        let url = format!("{}/{}.json", self.base_url, key.trim_start_matches('/'));
        let name = self
            .http
            .get(&url)
            .and_then(|body| body.map(|body| parse_author(&body)).transpose());
        match name {
            Ok(Some(name)) => name,
            Ok(None) => UNKNOWN_AUTHOR.to_string(),
            Err(err) => {
                warn!(author_key = key, error = %err, "author lookup failed");
                UNKNOWN_AUTHOR.to_string()
            }
        }
    }
}

#[cfg(feature = "lookup")]
impl MetadataLookup for OpenLibraryClient {
    fn search_text(&self, text: &str) -> Result<Vec<BookCandidate>, LookupError> {
        let url = format!(
            "{}/search.json?q={}&limit={}",
            self.base_url,
            urlencoding::encode(text),
            self.page_size
        );
        match self.http.get(&url)? {
            Some(body) => parse_search(&body, &self.covers_url),
            None => Ok(Vec::new()),
        }
    }

    fn lookup_isbn(&self, isbn: &str) -> Result<Option<BookCandidate>, LookupError> {
        let url = format!("{}/isbn/{}.json", self.base_url, urlencoding::encode(isbn));
        let Some(body) = self.http.get(&url)? else {
            return Ok(None);
        };
        let edition = parse_edition(&body, &self.covers_url)?;

        let author = match &edition.author_key {
            Some(key) => self.author_name(key),
            None => UNKNOWN_AUTHOR.to_string(),
        };
        let mut candidate = BookCandidate::new(edition.title, author);
        candidate.isbn = isbn.to_string();
        candidate.cover_url = edition.cover_url;
        Ok(Some(candidate))
    }
}
