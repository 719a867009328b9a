//! Google Books volumes API.

use serde::Deserialize;

use super::{BookCandidate, LookupError, UNKNOWN_AUTHOR};
#[cfg(feature = "lookup")]
use super::{http::JsonClient, MetadataLookup};
#[cfg(feature = "lookup")]
use crate::config::LookupConfig;

#[derive(Debug, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    volume_info: VolumeInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<String>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    industry_identifiers: Vec<IndustryIdentifier>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: String,
    identifier: String,
}

impl VolumeInfo {
    fn isbn(&self) -> Option<&str> {
        ["ISBN_13", "ISBN_10"].iter().find_map(|kind| {
            self.industry_identifiers
                .iter()
                .find(|id| id.kind == *kind)
                .map(|id| id.identifier.as_str())
        })
    }

    fn into_candidate(self, isbn: Option<&str>) -> Option<BookCandidate> {
        let isbn = isbn
            .map(str::to_string)
            .or_else(|| self.isbn().map(str::to_string))
            .unwrap_or_default();
        let title = self.title.filter(|title| !title.trim().is_empty())?;
        let author = self
            .authors
            .into_iter()
            .next()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let mut candidate = BookCandidate::new(title, author);
        candidate.isbn = isbn;
        candidate.cover_url = self
            .image_links
            .and_then(|links| links.thumbnail.or(links.small_thumbnail))
            .map(|url| url.replacen("http://", "https://", 1));
        candidate.genres = self.categories;
        candidate.description = self.description;
        Some(candidate)
    }
}

/// Parse a volumes response. When `isbn` is given it is used as every
/// candidate's ISBN, otherwise the volume's ISBN-13 or ISBN-10 is taken.
pub fn parse_volumes(body: &str, isbn: Option<&str>) -> Result<Vec<BookCandidate>, LookupError> {
    let response: VolumesResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .into_iter()
        .filter_map(|volume| volume.volume_info.into_candidate(isbn))
        .collect())
}

/// Google Books over blocking HTTP.
#[cfg(feature = "lookup")]
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    http: JsonClient,
    base_url: String,
    page_size: usize,
}

#[cfg(feature = "lookup")]
impl GoogleBooksClient {
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        Ok(Self {
            http: JsonClient::new(config)?,
            base_url: config.google_books_url.clone(),
            page_size: config.page_size,
        })
    }
}

#[cfg(feature = "lookup")]
impl MetadataLookup for GoogleBooksClient {
    fn search_text(&self, text: &str) -> Result<Vec<BookCandidate>, LookupError> {
        let url = format!(
            "{}?q={}&maxResults={}",
            self.base_url,
            urlencoding::encode(text),
            self.page_size
        );
        match self.http.get(&url)? {
            Some(body) => parse_volumes(&body, None),
            None => Ok(Vec::new()),
        }
    }

    fn lookup_isbn(&self, isbn: &str) -> Result<Option<BookCandidate>, LookupError> {
        let url = format!("{}?q=isbn:{}", self.base_url, urlencoding::encode(isbn));
        let Some(body) = self.http.get(&url)? else {
            return Ok(None);
        };
        Ok(parse_volumes(&body, Some(isbn))?.into_iter().next())
    }
}
