//! Shared data model: transcript turns, backend payloads, facet selections
//! and detail-modal state.

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Transcript
// =============================================================================

/// Who authored a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation transcript. Never edited once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    /// Creation time as epoch seconds.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertySummary>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_prompt: Option<FilterOptions>,
    /// Intent label the backend reported for this answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
}

impl Turn {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            created_at: Local::now().timestamp(),
            properties: None,
            pagination: None,
            filter_prompt: None,
            intent: None,
        }
    }

    /// A plain user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    /// A plain assistant turn with no side panels.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn with_properties(mut self, properties: Vec<PropertySummary>) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationInfo) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_filter_prompt(mut self, options: FilterOptions) -> Self {
        self.filter_prompt = Some(options);
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }
}

/// Paging state of one result set, as reported by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub total_results: u64,
    /// 1-based page number.
    pub page: u32,
    pub has_more: bool,
}

// =============================================================================
// Backend payloads
// =============================================================================

/// Opaque identifier of an analysed property row.
///
/// The backend sends it as either a JSON number or a string; it is only
/// ever passed back to the detail endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSourceRow", into = "String")]
pub struct SourceRow(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSourceRow {
    Int(i64),
    Text(String),
}

impl From<RawSourceRow> for SourceRow {
    fn from(raw: RawSourceRow) -> Self {
        match raw {
            RawSourceRow::Int(n) => SourceRow(n.to_string()),
            RawSourceRow::Text(s) => SourceRow(s),
        }
    }
}

impl From<SourceRow> for String {
    fn from(row: SourceRow) -> Self {
        row.0
    }
}

impl SourceRow {
    pub fn new(row: impl Into<String>) -> Self {
        SourceRow(row.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for SourceRow {
    fn from(n: i64) -> Self {
        SourceRow(n.to_string())
    }
}

impl From<&str> for SourceRow {
    fn from(s: &str) -> Self {
        SourceRow(s.to_string())
    }
}

impl fmt::Display for SourceRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A property result as the backend describes it.
///
/// Only `source_row` is meaningful to the controller; everything else is
/// carried through for display.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertySummary {
    pub location: Option<String>,
    pub city: Option<String>,
    pub price: Option<f64>,
    pub rent: Option<f64>,
    pub area: Option<f64>,
    pub decision: Option<String>,
    pub wealth_difference: Option<f64>,
    pub source_row: Option<SourceRow>,
}

/// One selectable chip within a facet.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FacetChoice {
    pub value: String,
    pub label: String,
}

impl FacetChoice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Label if present, otherwise the raw value.
    pub fn display(&self) -> &str {
        if self.label.trim().is_empty() {
            &self.value
        } else {
            &self.label
        }
    }
}

/// The chip sets offered by a guided-filter prompt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    pub cities: Vec<FacetChoice>,
    pub property_types: Vec<FacetChoice>,
    pub intents: Vec<FacetChoice>,
}

impl FilterOptions {
    /// Choices offered for one facet.
    pub fn choices(&self, facet: Facet) -> &[FacetChoice] {
        match facet {
            Facet::City => &self.cities,
            Facet::PropertyType => &self.property_types,
            Facet::Intent => &self.intents,
        }
    }

    /// Find a choice by value or label, case-insensitively.
    pub fn find(&self, facet: Facet, needle: &str) -> Option<&FacetChoice> {
        let needle = needle.trim();
        self.choices(facet).iter().find(|c| {
            c.value.eq_ignore_ascii_case(needle) || c.label.eq_ignore_ascii_case(needle)
        })
    }
}

/// Body of a successful main-query response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryResponse {
    pub answer: Option<String>,
    pub intent: Option<String>,
    pub total_results: Option<u64>,
    pub page: Option<u32>,
    pub has_more: Option<bool>,
    pub show_filters: Option<bool>,
    pub filters: Option<FilterOptions>,
    pub properties: Option<Vec<PropertySummary>>,
}

/// Body of a "why" or "flip" explanation response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplanationResponse {
    pub success: bool,
    pub explanation: Option<String>,
    pub error: Option<String>,
}

// =============================================================================
// Filters
// =============================================================================

/// The three independent facets of a guided search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    City,
    PropertyType,
    Intent,
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Facet::City => "city",
            Facet::PropertyType => "property type",
            Facet::Intent => "intent",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Detail modal
// =============================================================================

/// Which explanation the detail modal shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailKind {
    /// Why the analysis reached its buy/rent decision.
    #[default]
    Why,
    /// What would have to change for the decision to flip.
    Flip,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailPhase {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed,
}

/// Observable state of the detail modal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRequest {
    pub open: bool,
    pub phase: DetailPhase,
    pub kind: DetailKind,
    pub source_row: Option<SourceRow>,
    pub payload: Option<String>,
    pub error_message: Option<String>,
}

/// Monotonically increasing identifier of a dispatched request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
