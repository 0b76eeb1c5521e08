//! Conversational session controller for the Genesis buy-vs-rent explainer.
//!
//! Decides whether each user input is a new query, a pagination
//! continuation, or a guided filter selection, dispatches it to the
//! explanation backend, and reconciles responses into an append-only
//! transcript. Per-property explanations run through an independent
//! detail fetcher.

pub mod backend;
pub mod classifier;
pub mod controller;
pub mod detail;
pub mod error;
pub mod filters;
pub mod market;
pub mod pagination;
pub mod transcript;
pub mod types;

pub use backend::{HttpBackend, QueryBackend};
pub use classifier::{InputClassifier, InputKind, CONTINUATION_PHRASES};
pub use controller::{QueryOrigin, QueryTicket, SessionController};
pub use detail::{DetailFetcher, DetailTicket};
pub use error::ChatError;
pub use filters::FilterSelection;
pub use market::{MarketFilters, MarketSnapshot, SnapshotOutcome, SnapshotQuery};
pub use pagination::SessionCursor;
pub use transcript::Transcript;
pub use types::{
    DetailKind, DetailPhase, DetailRequest, ExplanationResponse, Facet, FacetChoice,
    FilterOptions, PaginationInfo, PropertySummary, QueryResponse, RequestId, Role, SourceRow,
    Turn,
};
