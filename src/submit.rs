use serde::Serialize;
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::Location;
use crate::selection::ArtistSelection;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("please select a location to use for the search")]
    MissingLocation,
    #[error("please select artists to use for the search")]
    EmptySelection,
    #[error("http error: {0}")]
    Http(String),
    #[error("submission failed with status {code}: {text}")]
    Status { code: u16, text: String },
}

// Entry shape of the `artists` form field.
#[derive(Debug, Serialize)]
struct ArtistField<'a> {
    spotify_id: &'a str,
    artist: &'a str,
    image_url: Option<&'a str>,
}

/// Form payload for the unauthorized flow: location plus the selected
/// artists as JSON, most recently chosen first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoAuthPayload {
    pub loc_id: String,
    pub loc_name: String,
    pub artists: String,
}

impl NoAuthPayload {
    pub fn form_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("locID", &self.loc_id),
            ("locName", &self.loc_name),
            ("artists", &self.artists),
        ]
    }
}

/// Query payload for the authorization flow; only the location travels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRequest {
    pub loc_id: String,
    pub loc_name: String,
}

impl AuthRequest {
    pub fn query_params(&self) -> [(&'static str, &str); 2] {
        [("locID", &self.loc_id), ("locName", &self.loc_name)]
    }
}

pub fn build_no_auth(
    location: Option<&Location>,
    selection: &ArtistSelection,
) -> Result<NoAuthPayload, SubmitError> {
    let location = location.ok_or(SubmitError::MissingLocation)?;
    if selection.is_empty() {
        return Err(SubmitError::EmptySelection);
    }

    let fields: Vec<ArtistField<'_>> = selection
        .artists()
        .iter()
        .map(|artist| ArtistField {
            spotify_id: &artist.spotify_id,
            artist: &artist.name,
            image_url: artist.image_url.as_deref(),
        })
        .collect();
    let artists = serde_json::to_string(&fields).map_err(|err| SubmitError::Http(err.to_string()))?;

    Ok(NoAuthPayload {
        loc_id: location.external_ref(),
        loc_name: location.label(),
        artists,
    })
}

pub fn build_auth_request(location: Option<&Location>) -> Result<AuthRequest, SubmitError> {
    let location = location.ok_or(SubmitError::MissingLocation)?;
    Ok(AuthRequest {
        loc_id: location.external_ref(),
        loc_name: location.label(),
    })
}

pub struct SubmitClient {
    config: AppConfig,
}

impl SubmitClient {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Fetches the external authorization URL for the chosen location.
    /// Navigating there is the caller's side effect.
    pub async fn authorization_url(&self, request: &AuthRequest) -> Result<String, SubmitError> {
        let client = reqwest::Client::new();
        let url = reqwest::Url::parse_with_params(
            &self.config.endpoint("spotify-auth.json"),
            request.query_params(),
        )
        .map_err(|err| SubmitError::Http(err.to_string()))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|err| SubmitError::Http(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| SubmitError::Http(err.to_string()))?;
        if !status.is_success() {
            return Err(SubmitError::Status {
                code: status.as_u16(),
                text: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }

        Ok(body.trim().to_string())
    }

    /// Posts the unauthorized payload. In a browser this is a full-page form
    /// navigation; the response page itself is not interesting here.
    pub async fn post_no_auth(&self, payload: &NoAuthPayload) -> Result<(), SubmitError> {
        let client = reqwest::Client::new();
        let response = client
            .post(self.config.endpoint("no-auth-search"))
            .form(&payload.form_fields())
            .send()
            .await
            .map_err(|err| SubmitError::Http(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status {
                code: status.as_u16(),
                text: status.canonical_reason().unwrap_or("request failed").to_string(),
            });
        }
        Ok(())
    }
}
