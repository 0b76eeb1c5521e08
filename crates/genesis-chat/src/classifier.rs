//! Input classification: new query, pagination continuation, or nothing.
//!
//! Matching is a fixed ordered rule set over lower-cased, trimmed input:
//! exact phrase, then phrase substring, then the `page ` prefix. Substring
//! matching is deliberately loose, so "is another city cheaper" counts as a
//! continuation once a topic exists.

use crate::pagination::SessionCursor;

/// Phrases that ask for the next page of the current topic.
pub const CONTINUATION_PHRASES: &[&str] = &[
    "more",
    "show more",
    "more results",
    "more properties",
    "show me more",
    "next",
    "next page",
    "continue",
    "see more",
    "load more",
    "additional",
    "other options",
    "what else",
    "any more",
    "another",
    "other properties",
];

/// Literal prefix of an explicit page request, e.g. `page 5`.
const PAGE_PREFIX: &str = "page ";

/// Outcome of classifying one raw input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// Blank input. Nothing is sent and nothing is recorded.
    Empty,
    /// A fresh topic; `query` is the trimmed original text.
    NewQuery { query: String },
    /// Another page of the current base query.
    Continuation { page: u32 },
}

/// Which rule recognised a continuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContinuationRule {
    Exact,
    Contains,
    PagePrefix,
}

/// Rule-based classifier over the fixed continuation phrase set.
#[derive(Debug, Clone, Default)]
pub struct InputClassifier;

impl InputClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify `raw` against the current cursor.
    ///
    /// Continuation phrases only continue when a base query exists; before
    /// that they are sent verbatim as a new query.
    pub fn classify(&self, raw: &str, cursor: &SessionCursor) -> InputKind {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return InputKind::Empty;
        }

        let lowered = trimmed.to_lowercase();
        match Self::match_rule(&lowered) {
            Some(rule) if cursor.has_base() => InputKind::Continuation {
                page: Self::resolve_page(rule, &lowered, cursor),
            },
            _ => InputKind::NewQuery {
                query: trimmed.to_string(),
            },
        }
    }

    fn match_rule(lowered: &str) -> Option<ContinuationRule> {
        if CONTINUATION_PHRASES.contains(&lowered) {
            return Some(ContinuationRule::Exact);
        }
        if CONTINUATION_PHRASES.iter().any(|p| lowered.contains(p)) {
            return Some(ContinuationRule::Contains);
        }
        if lowered.starts_with(PAGE_PREFIX) {
            return Some(ContinuationRule::PagePrefix);
        }
        None
    }

    /// Target page for a continuation. An unparseable or zero `page N`
    /// falls back to the next page.
    fn resolve_page(rule: ContinuationRule, lowered: &str, cursor: &SessionCursor) -> u32 {
        if let Some(rest) = lowered.strip_prefix(PAGE_PREFIX) {
            match rest.trim().parse::<u32>() {
                Ok(page) if page >= 1 => return page,
                _ => {}
            }
        }
        tracing::trace!(?rule, "continuation resolved to next page");
        cursor.next_page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> InputClassifier {
        InputClassifier::new()
    }

    fn cursor_on(query: &str, page: u32) -> SessionCursor {
        SessionCursor {
            base_query: query.to_string(),
            current_page: page,
        }
    }

    // ---- Empty ----

    #[test]
    fn test_blank_input_is_empty() {
        let cursor = cursor_on("3BHK in Mumbai", 1);
        assert_eq!(classifier().classify("", &cursor), InputKind::Empty);
        assert_eq!(classifier().classify("   \t\n", &cursor), InputKind::Empty);
    }

    // ---- New queries ----

    #[test]
    fn test_plain_text_is_new_query() {
        let kind = classifier().classify("  3BHK in Mumbai ", &SessionCursor::default());
        assert_eq!(
            kind,
            InputKind::NewQuery {
                query: "3BHK in Mumbai".to_string()
            }
        );
    }

    #[test]
    fn test_new_query_keeps_original_case() {
        let kind = classifier().classify("Why is Renting Better?", &cursor_on("x", 1));
        assert_eq!(
            kind,
            InputKind::NewQuery {
                query: "Why is Renting Better?".to_string()
            }
        );
    }

    #[test]
    fn test_continuation_phrase_without_base_is_new_query() {
        let kind = classifier().classify("show more", &SessionCursor::default());
        assert_eq!(
            kind,
            InputKind::NewQuery {
                query: "show more".to_string()
            }
        );
    }

    #[test]
    fn test_page_prefix_without_base_is_new_query() {
        let kind = classifier().classify("page 3", &SessionCursor::default());
        assert!(matches!(kind, InputKind::NewQuery { .. }));
    }

    // ---- Continuations ----

    #[test]
    fn test_every_phrase_continues_exactly() {
        let cursor = cursor_on("3BHK in Mumbai", 1);
        for phrase in CONTINUATION_PHRASES {
            assert_eq!(
                classifier().classify(phrase, &cursor),
                InputKind::Continuation { page: 2 },
                "phrase {:?}",
                phrase
            );
        }
    }

    #[test]
    fn test_phrase_match_is_case_insensitive() {
        let cursor = cursor_on("q", 2);
        assert_eq!(
            classifier().classify("  Show MORE  ", &cursor),
            InputKind::Continuation { page: 3 }
        );
    }

    #[test]
    fn test_phrase_substring_continues() {
        let cursor = cursor_on("q", 1);
        assert_eq!(
            classifier().classify("can you show me more please", &cursor),
            InputKind::Continuation { page: 2 }
        );
    }

    #[test]
    fn test_loose_substring_match_is_preserved() {
        let cursor = cursor_on("q", 1);
        assert_eq!(
            classifier().classify("is another city cheaper to rent in", &cursor),
            InputKind::Continuation { page: 2 }
        );
    }

    #[test]
    fn test_page_number() {
        let cursor = cursor_on("3BHK in Mumbai", 2);
        assert_eq!(
            classifier().classify("page 5", &cursor),
            InputKind::Continuation { page: 5 }
        );
    }

    #[test]
    fn test_page_number_with_case_and_spaces() {
        let cursor = cursor_on("q", 1);
        assert_eq!(
            classifier().classify("Page  12 ", &cursor),
            InputKind::Continuation { page: 12 }
        );
    }

    #[test]
    fn test_page_non_numeric_falls_back_to_increment() {
        let cursor = cursor_on("q", 5);
        assert_eq!(
            classifier().classify("page abc", &cursor),
            InputKind::Continuation { page: 6 }
        );
    }

    #[test]
    fn test_page_zero_falls_back_to_increment() {
        let cursor = cursor_on("q", 1);
        assert_eq!(
            classifier().classify("page 0", &cursor),
            InputKind::Continuation { page: 2 }
        );
    }

    #[test]
    fn test_page_without_space_is_not_prefix() {
        let cursor = cursor_on("q", 1);
        assert!(matches!(
            classifier().classify("pages of results", &cursor),
            InputKind::NewQuery { .. }
        ));
    }
}
