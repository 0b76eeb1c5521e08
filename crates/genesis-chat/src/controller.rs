//! Session controller: central coordinator wiring the classifier, paging
//! cursor, filter accumulator, transcript and detail fetcher.
//!
//! Every event is split in two: a synchronous transition that records the
//! user turn and hands back a ticket, and a completion that merges the
//! backend's answer. The async helpers drive both halves against a
//! [`QueryBackend`].

use std::collections::HashSet;

use genesis_core::config::SessionConfig;
use uuid::Uuid;

use crate::backend::QueryBackend;
use crate::classifier::{InputClassifier, InputKind};
use crate::detail::{DetailFetcher, DetailTicket};
use crate::error::ChatError;
use crate::filters::FilterSelection;
use crate::pagination::SessionCursor;
use crate::transcript::Transcript;
use crate::types::{
    DetailKind, DetailRequest, ExplanationResponse, Facet, FacetChoice, PaginationInfo,
    QueryResponse, RequestId, SourceRow, Turn,
};

/// How a main query came about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryOrigin {
    /// Typed text classified as a fresh topic.
    Typed,
    /// Typed continuation phrase or the "show more" affordance.
    Continuation,
    /// The third chip of a guided filter search.
    GuidedFilter,
}

/// A dispatched main query awaiting its response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTicket {
    pub id: RequestId,
    /// Text sent to the backend.
    pub query: String,
    pub page: u32,
    pub origin: QueryOrigin,
    /// The user turn recorded when this query was dispatched.
    pub user_turn: Uuid,
}

/// Owns all per-conversation state.
pub struct SessionController {
    id: Uuid,
    classifier: InputClassifier,
    cursor: SessionCursor,
    filters: FilterSelection,
    transcript: Transcript,
    detail: DetailFetcher,
    banner: Option<String>,
    last_intent: Option<String>,
    next_request: u64,
    latest_request: Option<RequestId>,
    outstanding: HashSet<RequestId>,
    config: SessionConfig,
}

impl SessionController {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            classifier: InputClassifier::new(),
            cursor: SessionCursor::default(),
            filters: FilterSelection::default(),
            transcript: Transcript::new(),
            detail: DetailFetcher::new(),
            banner: None,
            last_intent: None,
            next_request: 0,
            latest_request: None,
            outstanding: HashSet::new(),
            config,
        }
    }

    // -----------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cursor(&self) -> &SessionCursor {
        &self.cursor
    }

    pub fn filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn detail(&self) -> &DetailRequest {
        self.detail.state()
    }

    /// Transient error message from the last failed main query.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Intent the backend reported for the latest answer.
    pub fn last_intent(&self) -> Option<&str> {
        self.last_intent.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        !self.outstanding.is_empty()
    }

    // -----------------------------------------------------------------
    // Main query transitions
    // -----------------------------------------------------------------

    /// Classify typed input and, unless blank, record the user turn.
    ///
    /// New queries reset the filter selection and start page 1;
    /// continuations keep the base query and move to the resolved page.
    pub fn submit_input(&mut self, raw: &str) -> Option<QueryTicket> {
        match self.classifier.classify(raw, &self.cursor) {
            InputKind::Empty => None,
            InputKind::NewQuery { query } => {
                tracing::info!(session = %self.id, query = %query, "new query");
                self.filters.clear();
                self.cursor.begin(&query);
                Some(self.dispatch(query.clone(), query, 1, QueryOrigin::Typed))
            }
            InputKind::Continuation { page } => {
                tracing::info!(
                    session = %self.id,
                    base_query = %self.cursor.base_query,
                    page,
                    "continuation"
                );
                Some(self.continue_to(page, Some(raw.trim())))
            }
        }
    }

    /// The "show more" affordance: next page of the current base query.
    pub fn load_more(&mut self) -> Result<QueryTicket, ChatError> {
        if !self.cursor.has_base() {
            return Err(ChatError::NoBaseQuery);
        }
        let page = self.cursor.next_page();
        Ok(self.continue_to(page, None))
    }

    /// Pick a chip for one facet. Returns a ticket only when this
    /// completes the selection.
    pub fn select_filter(&mut self, facet: Facet, choice: FacetChoice) -> Option<QueryTicket> {
        tracing::debug!(session = %self.id, %facet, value = %choice.value, "filter selected");
        let query = self.filters.select(facet, choice)?;
        tracing::info!(session = %self.id, query = %query, "guided search complete");
        self.cursor.begin(&query);
        Some(self.dispatch(query.clone(), query, 1, QueryOrigin::GuidedFilter))
    }

    /// Merge the outcome of `ticket` into the transcript.
    ///
    /// Appends exactly one assistant turn per dispatched ticket; a ticket
    /// that was already completed is rejected. Only the latest dispatched
    /// request may move the cursor or the reported intent.
    pub fn complete_query(
        &mut self,
        ticket: &QueryTicket,
        result: Result<QueryResponse, ChatError>,
    ) -> Result<&Turn, ChatError> {
        if !self.outstanding.remove(&ticket.id) {
            tracing::warn!(request = %ticket.id, "response for a completed request ignored");
            return Err(ChatError::AlreadyCompleted(ticket.id));
        }
        let is_latest = self.latest_request == Some(ticket.id);
        if !is_latest {
            tracing::debug!(request = %ticket.id, "out-of-order response; cursor left unchanged");
        }

        let turn = match result {
            Ok(response) => self.answer_turn(ticket, response, is_latest),
            Err(err) => {
                tracing::warn!(session = %self.id, request = %ticket.id, error = %err, "query failed");
                self.banner = Some(err.user_message(&self.config.error_fallback));
                Turn::assistant(self.config.failure_text.clone())
            }
        };

        if ticket.origin == QueryOrigin::GuidedFilter {
            Ok(self
                .transcript
                .append_replacing_filter_prompts(turn, ticket.user_turn))
        } else {
            Ok(self.transcript.append(turn))
        }
    }

    /// `typed` is what the user entered, if anything. The user turn keeps
    /// it only when it is exactly the text sent; otherwise it reads `Page N`.
    fn continue_to(&mut self, page: u32, typed: Option<&str>) -> QueryTicket {
        self.cursor.advance_to(page);
        let page = self.cursor.current_page;
        let query = self.cursor.base_query.clone();
        let label = match typed {
            Some(text) if text == query => text.to_string(),
            _ => format!("Page {}", page),
        };
        self.dispatch(query, label, page, QueryOrigin::Continuation)
    }

    /// Record the user turn and allocate a request id.
    fn dispatch(
        &mut self,
        query: String,
        user_text: String,
        page: u32,
        origin: QueryOrigin,
    ) -> QueryTicket {
        self.banner = None;
        let user_turn = self.transcript.append(Turn::user(user_text)).id;

        self.next_request += 1;
        let id = RequestId(self.next_request);
        self.latest_request = Some(id);
        self.outstanding.insert(id);

        QueryTicket {
            id,
            query,
            page,
            origin,
            user_turn,
        }
    }

    fn answer_turn(
        &mut self,
        ticket: &QueryTicket,
        response: QueryResponse,
        is_latest: bool,
    ) -> Turn {
        let pagination = PaginationInfo::from_response(&response, ticket.page);

        if is_latest {
            self.cursor.confirm(response.page.unwrap_or(ticket.page));
            if response.intent.is_some() {
                self.last_intent = response.intent.clone();
            }
        }

        let text = response
            .answer
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| self.config.no_answer_text.clone());
        let mut turn = Turn::assistant(text);

        if let Some(properties) = response.properties {
            turn = turn.with_properties(properties);
        }
        if let Some(pagination) = pagination {
            turn = turn.with_pagination(pagination);
        }
        if response.show_filters == Some(true) {
            turn = turn.with_filter_prompt(response.filters.unwrap_or_default());
        }
        if let Some(intent) = response.intent {
            turn = turn.with_intent(intent);
        }
        turn
    }

    // -----------------------------------------------------------------
    // Detail modal transitions
    // -----------------------------------------------------------------

    pub fn open_detail(&mut self, source_row: SourceRow, kind: DetailKind) -> DetailTicket {
        tracing::debug!(session = %self.id, source_row = %source_row, ?kind, "detail opened");
        self.detail.open(source_row, kind)
    }

    /// Returns `false` if the response was stale and ignored.
    pub fn complete_detail(
        &mut self,
        ticket: &DetailTicket,
        result: Result<ExplanationResponse, ChatError>,
    ) -> bool {
        self.detail
            .resolve(ticket, result, &self.config.detail_error_fallback)
    }

    pub fn close_detail(&mut self) {
        self.detail.close();
    }

    // -----------------------------------------------------------------
    // End-to-end drivers
    // -----------------------------------------------------------------

    /// Classify `raw`, send it, and merge the answer.
    ///
    /// Returns `None` for blank input.
    pub async fn ask<B>(&mut self, backend: &B, raw: &str) -> Option<&Turn>
    where
        B: QueryBackend + ?Sized,
    {
        let ticket = self.submit_input(raw)?;
        self.run_query(backend, ticket).await.ok()
    }

    /// Fetch the next page of the current topic.
    pub async fn more<B>(&mut self, backend: &B) -> Result<&Turn, ChatError>
    where
        B: QueryBackend + ?Sized,
    {
        let ticket = self.load_more()?;
        self.run_query(backend, ticket).await
    }

    /// Select a chip; sends the guided query once all facets are chosen.
    pub async fn choose_filter<B>(
        &mut self,
        backend: &B,
        facet: Facet,
        choice: FacetChoice,
    ) -> Option<&Turn>
    where
        B: QueryBackend + ?Sized,
    {
        let ticket = self.select_filter(facet, choice)?;
        self.run_query(backend, ticket).await.ok()
    }

    /// Open the detail modal and load its explanation.
    pub async fn explain<B>(
        &mut self,
        backend: &B,
        source_row: SourceRow,
        kind: DetailKind,
    ) -> &DetailRequest
    where
        B: QueryBackend + ?Sized,
    {
        let ticket = self.open_detail(source_row, kind);
        let result = match ticket.kind {
            DetailKind::Why => backend.fetch_explanation(&ticket.source_row).await,
            DetailKind::Flip => backend.fetch_flip(&ticket.source_row).await,
        };
        self.complete_detail(&ticket, result);
        self.detail.state()
    }

    async fn run_query<B>(
        &mut self,
        backend: &B,
        ticket: QueryTicket,
    ) -> Result<&Turn, ChatError>
    where
        B: QueryBackend + ?Sized,
    {
        let result = backend.submit_query(&ticket.query, ticket.page).await;
        self.complete_query(&ticket, result)
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
