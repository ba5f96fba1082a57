use crate::models::{Artist, Location};

/// Most artists a user may pick for one search.
pub const MAX_ARTISTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("max artists selected")]
    CapacityExceeded,
}

/// Ordered, deduplicated set of chosen artists, most recently added first.
/// Pre-submission client state only.
#[derive(Debug, Default)]
pub struct ArtistSelection {
    chosen: Vec<Artist>,
}

impl ArtistSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adding a present artist is a no-op; a full selection rejects the add
    /// and stays unchanged.
    pub fn add(&mut self, artist: Artist) -> Result<(), SelectionError> {
        if self.chosen.len() >= MAX_ARTISTS {
            return Err(SelectionError::CapacityExceeded);
        }
        if self.contains(&artist.spotify_id) {
            return Ok(());
        }
        self.chosen.insert(0, artist);
        Ok(())
    }

    pub fn remove(&mut self, spotify_id: &str) {
        self.chosen.retain(|artist| artist.spotify_id != spotify_id);
    }

    pub fn contains(&self, spotify_id: &str) -> bool {
        self.chosen
            .iter()
            .any(|artist| artist.spotify_id == spotify_id)
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    pub fn artists(&self) -> &[Artist] {
        &self.chosen
    }
}

/// Radio-button semantics: choosing a new location discards the previous one.
#[derive(Debug, Default)]
pub struct LocationChoice {
    selected: Option<Location>,
}

impl LocationChoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn choose(&mut self, location: Location) {
        self.selected = Some(location);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&Location> {
        self.selected.as_ref()
    }
}
