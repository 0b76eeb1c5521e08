//! Detail fetcher: the per-property "why" / "what would flip" modal.
//!
//! States: Idle -> Loading -> {Loaded, Failed}; Loaded/Failed -> Loading on
//! a new request; any state -> Idle on close. Only the most recently
//! opened request may resolve the modal; anything older is dropped.

use crate::error::ChatError;
use crate::types::{DetailKind, DetailPhase, DetailRequest, ExplanationResponse, SourceRow};

/// Handle for one in-flight explanation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailTicket {
    pub token: u64,
    pub kind: DetailKind,
    pub source_row: SourceRow,
}

/// Independent state machine behind the explanation modal.
#[derive(Debug, Default)]
pub struct DetailFetcher {
    state: DetailRequest,
    next_token: u64,
    live_token: Option<u64>,
}

impl DetailFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DetailRequest {
        &self.state
    }

    /// Open the modal for `source_row` and enter `Loading`, discarding
    /// whatever was shown or pending before.
    pub fn open(&mut self, source_row: SourceRow, kind: DetailKind) -> DetailTicket {
        self.next_token += 1;
        let token = self.next_token;
        if let Some(previous) = self.live_token.replace(token) {
            tracing::debug!(previous, token, "detail request superseded");
        }

        self.state = DetailRequest {
            open: true,
            phase: DetailPhase::Loading,
            kind,
            source_row: Some(source_row.clone()),
            payload: None,
            error_message: None,
        };

        DetailTicket {
            token,
            kind,
            source_row,
        }
    }

    /// Apply the outcome of `ticket`'s request.
    ///
    /// Returns `false` when the ticket is stale or the modal was closed,
    /// in which case nothing changes.
    pub fn resolve(
        &mut self,
        ticket: &DetailTicket,
        result: Result<ExplanationResponse, ChatError>,
        fallback: &str,
    ) -> bool {
        if self.live_token != Some(ticket.token) {
            tracing::debug!(
                token = ticket.token,
                source_row = %ticket.source_row,
                "stale detail response discarded"
            );
            return false;
        }
        self.live_token = None;

        match result {
            Ok(ExplanationResponse {
                success: true,
                explanation: Some(text),
                ..
            }) => {
                self.state.phase = DetailPhase::Loaded;
                self.state.payload = Some(text);
            }
            Ok(response) => {
                let message = response
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string());
                self.fail(message);
            }
            Err(err) => {
                tracing::warn!(source_row = %ticket.source_row, error = %err, "explanation request failed");
                self.fail(err.user_message(fallback));
            }
        }
        true
    }

    /// Close the modal. Any in-flight result will be ignored.
    pub fn close(&mut self) {
        self.live_token = None;
        self.state = DetailRequest::default();
    }

    fn fail(&mut self, message: String) {
        self.state.phase = DetailPhase::Failed;
        self.state.payload = None;
        self.state.error_message = Some(message);
    }
}
