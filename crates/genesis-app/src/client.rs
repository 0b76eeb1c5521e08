//! Event handling for the terminal client.
//!
//! Backend calls run as spawned tasks and report back over a channel, so
//! the prompt stays live while an answer is outstanding. Every completion
//! is merged into the session on the main loop.

use tokio::sync::mpsc;

use genesis_chat::market::SnapshotQuery;
use genesis_chat::{
    ChatError, DetailKind, DetailTicket, ExplanationResponse, HttpBackend, QueryBackend,
    QueryResponse, QueryTicket, SessionController,
};

use crate::render;
use crate::repl::{resolve_choice, Command, HELP};

/// A backend response waiting to be merged into the session.
#[derive(Debug)]
pub enum Completion {
    Query(QueryTicket, Result<QueryResponse, ChatError>),
    Detail(DetailTicket, Result<ExplanationResponse, ChatError>),
}

pub struct Client {
    session: SessionController,
    backend: HttpBackend,
    tx: mpsc::UnboundedSender<Completion>,
}

impl Client {
    pub fn new(
        session: SessionController,
        backend: HttpBackend,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let client = Self {
            session,
            backend,
            tx,
        };
        (client, rx)
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Apply one command and return what to print.
    pub async fn command(&mut self, command: Command) -> String {
        match command {
            Command::Say(text) => match self.session.submit_input(&text) {
                Some(ticket) => self.send_query(ticket),
                None => String::new(),
            },
            Command::More => match self.session.load_more() {
                Ok(ticket) => self.send_query(ticket),
                Err(e) => format!("{}\n", e),
            },
            Command::Select(facet, typed) => {
                let prompt = self.session.transcript().active_filter_prompt();
                let choice = resolve_choice(prompt, facet, &typed);
                match self.session.select_filter(facet, choice) {
                    Some(ticket) => self.send_query(ticket),
                    None => format!("selected {}\n", render::selection(self.session.filters())),
                }
            }
            Command::Detail(kind, row) => {
                let ticket = self.session.open_detail(row, kind);
                self.send_detail(ticket);
                render::detail(self.session.detail())
            }
            Command::Close => {
                self.session.close_detail();
                String::new()
            }
            Command::Filters => format!("{}\n", render::selection(self.session.filters())),
            Command::Market => self.market().await,
            Command::History => render::transcript(self.session.transcript()),
            Command::Help => format!("{}\n", HELP),
            Command::Quit => String::new(),
        }
    }

    /// Merge a finished backend call and return what to print.
    pub fn apply(&mut self, completion: Completion) -> String {
        match completion {
            Completion::Query(ticket, result) => {
                let mut out = match self.session.complete_query(&ticket, result) {
                    Ok(turn) => render::turn(turn, true),
                    Err(e) => {
                        tracing::debug!(error = %e, "completion dropped");
                        return String::new();
                    }
                };
                if let Some(banner) = self.session.banner() {
                    out.push_str(&format!("! {}\n", banner));
                }
                out
            }
            Completion::Detail(ticket, result) => {
                if self.session.complete_detail(&ticket, result) {
                    render::detail(self.session.detail())
                } else {
                    String::new()
                }
            }
        }
    }

    fn send_query(&self, ticket: QueryTicket) -> String {
        let pending = format!("(asking for page {}...)\n", ticket.page);
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.submit_query(&ticket.query, ticket.page).await;
            if tx.send(Completion::Query(ticket, result)).is_err() {
                tracing::debug!("session ended before the answer arrived");
            }
        });
        pending
    }

    fn send_detail(&self, ticket: DetailTicket) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match ticket.kind {
                DetailKind::Why => backend.fetch_explanation(&ticket.source_row).await,
                DetailKind::Flip => backend.fetch_flip(&ticket.source_row).await,
            };
            if tx.send(Completion::Detail(ticket, result)).is_err() {
                tracing::debug!("session ended before the explanation arrived");
            }
        });
    }

    async fn market(&self) -> String {
        let filters = match self.backend.market_filters().await {
            Ok(f) => Some(f),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load market filters");
                None
            }
        };
        match self.backend.market_snapshot(&SnapshotQuery::default()).await {
            Ok(outcome) => render::market(filters.as_ref(), &outcome),
            Err(e) => format!("market snapshot unavailable: {}\n", e),
        }
    }
}
