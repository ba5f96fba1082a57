pub mod config;
pub mod models;
pub mod recommendations;
pub mod search;
pub mod selection;
pub mod session;
pub mod submit;
mod utils;

pub use config::{AppConfig, ConfigStore};
pub use models::{Artist, Location, Recommendation};
pub use recommendations::{
    ConcertStore, ConfirmPrompt, HttpConcertStore, ListError, RecommendationList, RemoveOutcome,
    SortCriterion,
};
pub use search::{SearchClient, SearchError, SearchKind};
pub use selection::{ArtistSelection, LocationChoice, SelectionError, MAX_ARTISTS};
pub use session::{run_search, SearchSession, SearchTicket, SearchView};
pub use submit::{build_auth_request, build_no_auth, AuthRequest, NoAuthPayload, SubmitClient, SubmitError};
