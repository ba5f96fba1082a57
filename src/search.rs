use once_cell::sync::Lazy;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::models::{Artist, Location};

static CLIENT: Lazy<Client> = Lazy::new(|| {
    let user_agent = std::env::var("CONSA_USER_AGENT")
        .unwrap_or_else(|_| "consa/0.1 (https://github.com/mike/consa)".to_string());
    Client::builder()
        .user_agent(user_agent)
        .build()
        .expect("failed to build search client")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Location,
    Artist,
}

impl SearchKind {
    fn endpoint_path(self) -> &'static str {
        match self {
            SearchKind::Location => "location-search.json",
            SearchKind::Artist => "artist-search.json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("http error: {0}")]
    Http(String),
    #[error("search failed with status {code}: {text}")]
    Status { code: u16, text: String },
    #[error("parse error: {0}")]
    Parse(String),
}

impl SearchError {
    /// Status code and text for user display. Transport and decode failures
    /// carry no HTTP status and report code 0, as browsers do.
    pub fn status_parts(&self) -> (u16, String) {
        match self {
            SearchError::Status { code, text } => (*code, text.clone()),
            SearchError::Http(msg) | SearchError::Parse(msg) => (0, msg.clone()),
        }
    }
}

pub struct SearchClient {
    config: AppConfig,
}

impl SearchClient {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn search_locations(&self, term: &str) -> Result<Vec<Location>, SearchError> {
        let body = self.fetch(SearchKind::Location, term).await?;
        parse_locations(&body)
    }

    pub async fn search_artists(&self, term: &str) -> Result<Vec<Artist>, SearchError> {
        let body = self.fetch(SearchKind::Artist, term).await?;
        parse_artists(&body)
    }

    async fn fetch(&self, kind: SearchKind, term: &str) -> Result<String, SearchError> {
        let mut url = Url::parse(&self.config.endpoint(kind.endpoint_path()))
            .map_err(|err| SearchError::Http(err.to_string()))?;
        url.query_pairs_mut().append_pair("search-term", term);

        let response = CLIENT
            .get(url)
            .send()
            .await
            .map_err(|err| SearchError::Http(err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                code: status.as_u16(),
                text: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }
        response
            .text()
            .await
            .map_err(|err| SearchError::Http(err.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct NamedDoc {
    #[serde(rename = "displayName")]
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct LocationDoc {
    id: i64,
    #[serde(rename = "displayName")]
    display_name: String,
    state: Option<NamedDoc>,
    country: NamedDoc,
}

#[derive(Debug, Deserialize)]
struct ArtistDoc {
    spotify_id: String,
    artist: String,
    image_url: Option<String>,
}

fn parse_locations(body: &str) -> Result<Vec<Location>, SearchError> {
    // The service answers with an empty body when nothing matched.
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let docs: Vec<LocationDoc> =
        serde_json::from_str(body).map_err(|err| SearchError::Parse(err.to_string()))?;

    let mut out: Vec<Location> = Vec::with_capacity(docs.len());
    for doc in docs {
        if out.iter().any(|existing| existing.id == doc.id) {
            continue;
        }
        out.push(Location {
            id: doc.id,
            display_name: doc.display_name,
            state: doc.state.map(|state| state.display_name),
            country: doc.country.display_name,
        });
    }
    Ok(out)
}

fn parse_artists(body: &str) -> Result<Vec<Artist>, SearchError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    let docs: Vec<ArtistDoc> =
        serde_json::from_str(body).map_err(|err| SearchError::Parse(err.to_string()))?;

    Ok(docs
        .into_iter()
        .map(|doc| Artist {
            spotify_id: doc.spotify_id,
            name: doc.artist,
            image_url: doc.image_url,
        })
        .collect())
}
