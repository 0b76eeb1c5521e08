//! The explanation backend: the trait the controller talks to, and its
//! HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use genesis_core::config::BackendConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ChatError;
use crate::market::{MarketFilters, SnapshotOutcome, SnapshotQuery};
use crate::types::{ExplanationResponse, QueryResponse, SourceRow};

/// Remote operations the session controller depends on.
#[async_trait]
pub trait QueryBackend: Send + Sync {
    /// Ask a question, or fetch `page` of an earlier one.
    async fn submit_query(&self, query: &str, page: u32) -> Result<QueryResponse, ChatError>;

    /// Why the analysis decided buy or rent for one property.
    async fn fetch_explanation(
        &self,
        source_row: &SourceRow,
    ) -> Result<ExplanationResponse, ChatError>;

    /// What would need to change for that decision to flip.
    async fn fetch_flip(&self, source_row: &SourceRow) -> Result<ExplanationResponse, ChatError>;
}

#[derive(Serialize)]
struct AskBody<'a> {
    query: &'a str,
    page: u32,
}

/// Error body shapes the backend uses on non-2xx responses.
#[derive(Deserialize, Default)]
#[serde(default)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
    error: Option<String>,
}

impl ErrorBody {
    fn message(self) -> Option<String> {
        let detail = match self.detail {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        };
        detail.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

/// `reqwest`-backed client for the explanation service.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    config: BackendConfig,
}

impl HttpBackend {
    /// Build a client with the configured per-request timeout.
    pub fn new(config: BackendConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn row_url(&self, path: &str, source_row: &SourceRow) -> String {
        format!(
            "{}/{}",
            self.url(path).trim_end_matches('/'),
            source_row.as_str()
        )
    }

    /// Send a request, map non-2xx statuses to `ChatError::Server`, and
    /// deserialize the JSON body.
    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ChatError> {
        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(ErrorBody::message);
            tracing::warn!(status = status.as_u16(), detail = ?detail, "backend returned error status");
            return Err(ChatError::Server {
                status: status.as_u16(),
                detail,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ChatError::Decode(e.to_string()))
    }

    /// `GET {market_filters_path}` -- filter metadata for the analytics view.
    pub async fn market_filters(&self) -> Result<MarketFilters, ChatError> {
        let req = self.http.get(self.url(&self.config.market_filters_path));
        self.send_json(req).await
    }

    /// `GET {market_snapshot_path}?...` -- aggregated statistics for the filters.
    pub async fn market_snapshot(&self, query: &SnapshotQuery) -> Result<SnapshotOutcome, ChatError> {
        let req = self
            .http
            .get(self.url(&self.config.market_snapshot_path))
            .query(&query.to_params());
        let value: serde_json::Value = self.send_json(req).await?;
        SnapshotOutcome::from_value(value).map_err(|e| ChatError::Decode(e.to_string()))
    }
}

#[async_trait]
impl QueryBackend for HttpBackend {
    async fn submit_query(&self, query: &str, page: u32) -> Result<QueryResponse, ChatError> {
        tracing::debug!(query, page, "POST {}", self.config.ask_path);
        let req = self
            .http
            .post(self.url(&self.config.ask_path))
            .json(&AskBody { query, page });
        self.send_json(req).await
    }

    async fn fetch_explanation(
        &self,
        source_row: &SourceRow,
    ) -> Result<ExplanationResponse, ChatError> {
        let req = self
            .http
            .get(self.row_url(&self.config.explain_path, source_row));
        self.send_json(req).await
    }

    async fn fetch_flip(&self, source_row: &SourceRow) -> Result<ExplanationResponse, ChatError> {
        let req = self.http.get(self.row_url(&self.config.flip_path, source_row));
        self.send_json(req).await
    }
}
