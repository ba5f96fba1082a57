use std::future::Future;

use tokio::sync::Mutex;

use crate::search::{SearchError, SearchKind};

/// What the UI region owned by a search session should currently show.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchView<T> {
    Idle,
    Loading,
    Populated(Vec<T>),
    Empty,
    Failed { code: u16, text: String },
}

/// Proof that a completion belongs to the most recent search. Issued by
/// [`SearchSession::begin`]; a ticket from a superseded search no longer
/// matches and its completion is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchTicket {
    generation: u64,
}

/// Per-kind controller sequencing "start search → loading → results or
/// error". Starting a new search synchronously discards the previous view,
/// so at most one result set is ever visible per kind.
#[derive(Debug)]
pub struct SearchSession<T> {
    kind: SearchKind,
    generation: u64,
    view: SearchView<T>,
}

impl<T> SearchSession<T> {
    pub fn new(kind: SearchKind) -> Self {
        Self {
            kind,
            generation: 0,
            view: SearchView::Idle,
        }
    }

    pub fn kind(&self) -> SearchKind {
        self.kind
    }

    pub fn view(&self) -> &SearchView<T> {
        &self.view
    }

    /// Tears down the current view and enters `Loading`. Returns `None` for
    /// an empty term: no request may be issued and the view is untouched.
    pub fn begin(&mut self, term: &str) -> Option<SearchTicket> {
        if term.trim().is_empty() {
            return None;
        }
        self.generation += 1;
        self.view = SearchView::Loading;
        Some(SearchTicket {
            generation: self.generation,
        })
    }

    /// Applies a search outcome. A stale ticket is ignored so that a slow
    /// response cannot resurrect a view that `begin` already tore down.
    pub fn apply(&mut self, ticket: SearchTicket, outcome: Result<Vec<T>, SearchError>) {
        if ticket.generation != self.generation {
            return;
        }
        self.view = match outcome {
            Ok(results) if results.is_empty() => SearchView::Empty,
            Ok(results) => SearchView::Populated(results),
            Err(err) => {
                let (code, text) = err.status_parts();
                SearchView::Failed { code, text }
            }
        };
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.view = SearchView::Idle;
    }
}

/// Drives one search against a shared session: begin under the lock, fetch
/// without holding it, apply under the lock again. Empty terms no-op.
pub async fn run_search<T, F, Fut>(session: &Mutex<SearchSession<T>>, term: &str, fetch: F)
where
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<Vec<T>, SearchError>>,
{
    let ticket = match session.lock().await.begin(term) {
        Some(ticket) => ticket,
        None => return,
    };
    let outcome = fetch(term.to_string()).await;
    session.lock().await.apply(ticket, outcome);
}
