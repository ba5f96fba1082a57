use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

use crate::config::AppConfig;
use crate::models::Recommendation;

/// Confirmation text shown before a saved concert is removed.
pub const REMOVE_PROMPT: &str = "Are you sure you want to remove this?";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("unknown concert: {0}")]
    Unknown(i64),
    #[error("the server declined the request")]
    Rejected,
    #[error("http error: {0}")]
    Http(String),
}

/// Remote persistence for saved concerts; `add` and `remove` resolve to the
/// server's verdict.
#[async_trait]
pub trait ConcertStore: Send + Sync {
    async fn add(&self, concert: &Recommendation) -> Result<bool, ListError>;
    async fn remove(&self, songkick_id: i64) -> Result<bool, ListError>;
}

pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortCriterion {
    Date,
    Artist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Cancelled,
    Removed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub record: Recommendation,
    pub saved: bool,
}

/// The visible list of concert recommendations. Save and remove go through
/// the persistence service first; the list only mutates on a confirmed
/// verdict.
pub struct RecommendationList<S> {
    store: S,
    entries: Vec<Entry>,
}

impl<S: ConcertStore> RecommendationList<S> {
    pub fn new(store: S, records: Vec<Recommendation>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| Entry {
                record,
                saved: false,
            })
            .collect();
        Self { store, entries }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    fn position(&self, songkick_id: i64) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.record.songkick_id == songkick_id)
    }

    /// Saving an already-saved record is a no-op: the confirmed control is
    /// disabled and issues no request.
    pub async fn save(&mut self, songkick_id: i64) -> Result<(), ListError> {
        let index = self
            .position(songkick_id)
            .ok_or(ListError::Unknown(songkick_id))?;
        if self.entries[index].saved {
            return Ok(());
        }

        let accepted = self.store.add(&self.entries[index].record).await?;
        if !accepted {
            return Err(ListError::Rejected);
        }
        self.entries[index].saved = true;
        Ok(())
    }

    /// A declined prompt issues no request; a rejected or failed request
    /// leaves the record visible.
    pub async fn remove<P: ConfirmPrompt>(
        &mut self,
        songkick_id: i64,
        prompt: &P,
    ) -> Result<RemoveOutcome, ListError> {
        let index = self
            .position(songkick_id)
            .ok_or(ListError::Unknown(songkick_id))?;
        if !prompt.confirm(REMOVE_PROMPT) {
            return Ok(RemoveOutcome::Cancelled);
        }

        let accepted = self.store.remove(songkick_id).await?;
        if !accepted {
            return Err(ListError::Rejected);
        }
        self.entries.remove(index);
        Ok(RemoveOutcome::Removed)
    }

    /// Stable ascending reorder; a pure function of the records and the
    /// criterion.
    pub fn sort(&mut self, criterion: SortCriterion) {
        match criterion {
            SortCriterion::Date => self
                .entries
                .sort_by_key(|entry| parse_start(&entry.record)),
            SortCriterion::Artist => self
                .entries
                .sort_by(|a, b| a.record.artist.cmp(&b.record.artist)),
        }
    }
}

// Unparseable values sort before parseable ones.
fn parse_start(record: &Recommendation) -> Option<NaiveDateTime> {
    let raw = record.start_datetime.trim();
    for fmt in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn parse_flag(body: &str) -> bool {
    // The service answers a bare true/false body (Python-style casing included).
    body.trim().eq_ignore_ascii_case("true")
}

pub struct HttpConcertStore {
    config: AppConfig,
}

impl HttpConcertStore {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    async fn post(&self, path: &str, fields: &[(&str, String)]) -> Result<String, ListError> {
        let client = reqwest::Client::new();
        let response = client
            .post(self.config.endpoint(path))
            .form(fields)
            .send()
            .await
            .map_err(|err| ListError::Http(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ListError::Http(err.to_string()))?;
        if !status.is_success() {
            return Err(ListError::Http(format!("status {}: {}", status, body)));
        }
        Ok(body)
    }
}

#[async_trait]
impl ConcertStore for HttpConcertStore {
    async fn add(&self, concert: &Recommendation) -> Result<bool, ListError> {
        let fields: Vec<(&str, String)> = vec![
            ("songkick-id", concert.songkick_id.to_string()),
            ("songkick-url", concert.songkick_url.clone()),
            ("display-name", concert.display_name.clone()),
            ("artist", concert.artist.clone()),
            ("spotify-id", concert.spotify_id.clone().unwrap_or_default()),
            ("image-url", concert.image_url.clone().unwrap_or_default()),
            ("venue-name", concert.venue_name.clone()),
            ("venue-lat", concert.venue_lat.to_string()),
            ("venue-lng", concert.venue_lng.to_string()),
            ("city", concert.city.clone()),
            ("start-date", concert.start_date.clone()),
            ("start-datetime", concert.start_datetime.clone()),
            ("end-date", concert.end_date.clone().unwrap_or_default()),
            ("end-datetime", concert.end_datetime.clone().unwrap_or_default()),
        ];
        let body = self.post("add-concert.json", &fields).await?;
        Ok(parse_flag(&body))
    }

    async fn remove(&self, songkick_id: i64) -> Result<bool, ListError> {
        let fields = [("songkick-id", songkick_id.to_string())];
        let body = self.post("remove-concert.json", &fields).await?;
        Ok(parse_flag(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeStore {
        add_reply: Result<bool, ListError>,
        remove_reply: Result<bool, ListError>,
        add_calls: AtomicUsize,
        remove_calls: AtomicUsize,
    }

    impl FakeStore {
        fn replying(add_reply: Result<bool, ListError>, remove_reply: Result<bool, ListError>) -> Self {
            Self {
                add_reply,
                remove_reply,
                add_calls: AtomicUsize::new(0),
                remove_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ConcertStore for FakeStore {
        async fn add(&self, _concert: &Recommendation) -> Result<bool, ListError> {
            self.add_calls.fetch_add(1, Ordering::SeqCst);
            self.add_reply.clone()
        }

        async fn remove(&self, _songkick_id: i64) -> Result<bool, ListError> {
            self.remove_calls.fetch_add(1, Ordering::SeqCst);
            self.remove_reply.clone()
        }
    }

    struct Answer(bool);

    impl ConfirmPrompt for Answer {
        fn confirm(&self, message: &str) -> bool {
            assert_eq!(message, REMOVE_PROMPT);
            self.0
        }
    }

    fn rec(songkick_id: i64, artist: &str, start_datetime: &str) -> Recommendation {
        Recommendation {
            songkick_id,
            songkick_url: format!("https://www.songkick.com/concerts/{songkick_id}"),
            display_name: format!("{artist} at Brick & Mortar"),
            artist: artist.to_string(),
            spotify_id: None,
            image_url: None,
            venue_name: "Brick & Mortar".to_string(),
            venue_lat: 37.7697,
            venue_lng: -122.4203,
            city: "San Francisco, CA".to_string(),
            start_date: start_datetime.split('T').next().unwrap_or("").to_string(),
            start_datetime: start_datetime.to_string(),
            end_date: None,
            end_datetime: None,
        }
    }

    fn artists_in_order<S>(list: &RecommendationList<S>) -> Vec<&str> {
        list.entries
            .iter()
            .map(|entry| entry.record.artist.as_str())
            .collect()
    }

    #[test]
    fn sorts_by_start_datetime_ascending() {
        let store = FakeStore::replying(Ok(true), Ok(true));
        let mut list = RecommendationList::new(
            store,
            vec![
                rec(1, "Zed", "2024-03-05T20:00"),
                rec(2, "Apple", "2024-01-10T19:00"),
                rec(3, "Mango", "2024-03-05T19:00"),
            ],
        );
        list.sort(SortCriterion::Date);
        let starts: Vec<&str> = list
            .entries()
            .iter()
            .map(|entry| entry.record.start_datetime.as_str())
            .collect();
        assert_eq!(
            starts,
            vec!["2024-01-10T19:00", "2024-03-05T19:00", "2024-03-05T20:00"]
        );
    }

    #[test]
    fn sorts_by_artist_name_ascending() {
        let store = FakeStore::replying(Ok(true), Ok(true));
        let mut list = RecommendationList::new(
            store,
            vec![
                rec(1, "Zed", "2024-03-05T20:00"),
                rec(2, "Apple", "2024-01-10T19:00"),
                rec(3, "Mango", "2024-03-05T19:00"),
            ],
        );
        list.sort(SortCriterion::Artist);
        assert_eq!(artists_in_order(&list), vec!["Apple", "Mango", "Zed"]);
    }

    #[test]
    fn unparseable_dates_order_first_deterministically() {
        let store = FakeStore::replying(Ok(true), Ok(true));
        let mut list = RecommendationList::new(
            store,
            vec![
                rec(1, "Zed", "2024-03-05T20:00"),
                rec(2, "Apple", "sometime soon"),
                rec(3, "Mango", "2024-01-10"),
            ],
        );
        list.sort(SortCriterion::Date);
        assert_eq!(artists_in_order(&list), vec!["Apple", "Mango", "Zed"]);
    }

    #[tokio::test]
    async fn rejected_save_leaves_record_unsaved() {
        let store = FakeStore::replying(Ok(false), Ok(true));
        let mut list = RecommendationList::new(store, vec![rec(1, "Zed", "2024-03-05T20:00")]);

        assert_eq!(list.save(1).await, Err(ListError::Rejected));
        assert!(!list.entries()[0].saved);
    }

    #[tokio::test]
    async fn successful_save_disables_further_attempts() {
        let store = FakeStore::replying(Ok(true), Ok(true));
        let mut list = RecommendationList::new(store, vec![rec(1, "Zed", "2024-03-05T20:00")]);

        list.save(1).await.expect("first save");
        assert!(list.entries()[0].saved);

        list.save(1).await.expect("repeat save is a no-op");
        assert_eq!(list.store.add_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn save_surfaces_transport_failures_unchanged() {
        let store = FakeStore::replying(Err(ListError::Http("connection refused".into())), Ok(true));
        let mut list = RecommendationList::new(store, vec![rec(1, "Zed", "2024-03-05T20:00")]);

        assert!(matches!(list.save(1).await, Err(ListError::Http(_))));
        assert!(!list.entries()[0].saved);
    }

    #[tokio::test]
    async fn unknown_ids_are_refused() {
        let store = FakeStore::replying(Ok(true), Ok(true));
        let mut list = RecommendationList::new(store, vec![rec(1, "Zed", "2024-03-05T20:00")]);

        assert_eq!(list.save(99).await, Err(ListError::Unknown(99)));
        assert_eq!(
            list.remove(99, &Answer(true)).await,
            Err(ListError::Unknown(99))
        );
    }

    #[tokio::test]
    async fn declined_confirmation_issues_no_request() {
        let store = FakeStore::replying(Ok(true), Ok(true));
        let mut list = RecommendationList::new(store, vec![rec(1, "Zed", "2024-03-05T20:00")]);

        let outcome = list.remove(1, &Answer(false)).await.expect("cancelled");
        assert_eq!(outcome, RemoveOutcome::Cancelled);
        assert_eq!(list.store.remove_calls.load(Ordering::SeqCst), 0);
        assert_eq!(list.entries().len(), 1);
    }

    #[tokio::test]
    async fn rejected_removal_keeps_the_record_visible() {
        let store = FakeStore::replying(Ok(true), Ok(false));
        let mut list = RecommendationList::new(store, vec![rec(1, "Zed", "2024-03-05T20:00")]);

        assert_eq!(list.remove(1, &Answer(true)).await, Err(ListError::Rejected));
        assert_eq!(list.entries().len(), 1);
    }

    #[tokio::test]
    async fn confirmed_removal_drops_the_record() {
        let store = FakeStore::replying(Ok(true), Ok(true));
        let mut list = RecommendationList::new(
            store,
            vec![
                rec(1, "Zed", "2024-03-05T20:00"),
                rec(2, "Apple", "2024-01-10T19:00"),
            ],
        );

        let outcome = list.remove(1, &Answer(true)).await.expect("removed");
        assert_eq!(outcome, RemoveOutcome::Removed);
        assert_eq!(artists_in_order(&list), vec!["Apple"]);
    }

    #[test]
    fn flag_parsing_accepts_python_style_bodies() {
        assert!(parse_flag("true"));
        assert!(parse_flag("True\n"));
        assert!(!parse_flag("False"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag("maybe"));
        assert!(!parse_flag(""));
    }
}
