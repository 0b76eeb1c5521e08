//! Pagination tracking: the base query that continuations refer back to,
//! and the page the session is currently on.

use serde::{Deserialize, Serialize};

use crate::types::{PaginationInfo, QueryResponse};

/// Process-local paging cursor for one conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCursor {
    /// Canonical text continuations are re-sent with. Empty until the first query.
    pub base_query: String,
    /// 1-based page last requested or confirmed by the server.
    pub current_page: u32,
}

impl Default for SessionCursor {
    fn default() -> Self {
        Self {
            base_query: String::new(),
            current_page: 1,
        }
    }
}

impl SessionCursor {
    /// Whether there is a topic to continue.
    pub fn has_base(&self) -> bool {
        !self.base_query.is_empty()
    }

    /// Page a plain "show more" continuation asks for.
    pub fn next_page(&self) -> u32 {
        self.current_page.saturating_add(1)
    }

    /// Start a new topic on page 1.
    pub fn begin(&mut self, query: &str) {
        self.base_query = query.to_string();
        self.current_page = 1;
    }

    /// Move to `page` of the current topic. The base query is untouched.
    pub fn advance_to(&mut self, page: u32) {
        self.current_page = page.max(1);
    }

    /// Adopt the page the server actually returned.
    pub fn confirm(&mut self, server_page: u32) {
        self.current_page = server_page.max(1);
    }
}

impl PaginationInfo {
    /// Derive the paging panel for an answer from the server response.
    ///
    /// Returns `None` when the response says nothing about paging and
    /// carries no properties. Missing fields fall back to the requested
    /// page, the number of properties returned, and "no more".
    pub fn from_response(response: &QueryResponse, requested_page: u32) -> Option<Self> {
        let returned = response.properties.as_ref().map(Vec::len);
        if response.total_results.is_none()
            && response.page.is_none()
            && response.has_more.is_none()
            && returned.is_none()
        {
            return None;
        }

        Some(PaginationInfo {
            total_results: response
                .total_results
                .unwrap_or_else(|| returned.unwrap_or(0) as u64),
            page: response.page.unwrap_or(requested_page).max(1),
            has_more: response.has_more.unwrap_or(false),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PropertySummary;

    #[test]
    fn test_default_cursor_has_no_base() {
        let cursor = SessionCursor::default();
        assert!(!cursor.has_base());
        assert_eq!(cursor.current_page, 1);
        assert_eq!(cursor.next_page(), 2);
    }

    #[test]
    fn test_begin_resets_page() {
        let mut cursor = SessionCursor::default();
        cursor.begin("2BHK in Pune");
        cursor.advance_to(4);
        cursor.begin("villas in Surat");
        assert_eq!(cursor.base_query, "villas in Surat");
        assert_eq!(cursor.current_page, 1);
    }

    #[test]
    fn test_advance_keeps_base_query() {
        let mut cursor = SessionCursor::default();
        cursor.begin("3BHK in Mumbai");
        cursor.advance_to(5);
        assert_eq!(cursor.base_query, "3BHK in Mumbai");
        assert_eq!(cursor.current_page, 5);
    }

    #[test]
    fn test_advance_clamps_to_first_page() {
        let mut cursor = SessionCursor::default();
        cursor.advance_to(0);
        assert_eq!(cursor.current_page, 1);
    }

    #[test]
    fn test_confirm_trusts_server() {
        let mut cursor = SessionCursor::default();
        cursor.begin("q");
        cursor.advance_to(9);
        cursor.confirm(3);
        assert_eq!(cursor.current_page, 3);
    }

    #[test]
    fn test_next_page_saturates() {
        let cursor = SessionCursor {
            base_query: "q".to_string(),
            current_page: u32::MAX,
        };
        assert_eq!(cursor.next_page(), u32::MAX);
    }

    // ---- PaginationInfo ----

    #[test]
    fn test_pagination_info_from_full_response() {
        let response = QueryResponse {
            total_results: Some(40),
            page: Some(2),
            has_more: Some(true),
            ..Default::default()
        };
        let info = PaginationInfo::from_response(&response, 2).unwrap();
        assert_eq!(
            info,
            PaginationInfo {
                total_results: 40,
                page: 2,
                has_more: true
            }
        );
    }

    #[test]
    fn test_pagination_info_absent_without_paging_fields() {
        let response = QueryResponse {
            answer: Some("EMI is an equated monthly instalment.".to_string()),
            ..Default::default()
        };
        assert!(PaginationInfo::from_response(&response, 1).is_none());
    }

    #[test]
    fn test_pagination_info_defaults_from_properties() {
        let response = QueryResponse {
            properties: Some(vec![PropertySummary::default(), PropertySummary::default()]),
            ..Default::default()
        };
        let info = PaginationInfo::from_response(&response, 3).unwrap();
        assert_eq!(info.total_results, 2);
        assert_eq!(info.page, 3);
        assert!(!info.has_more);
    }
}
