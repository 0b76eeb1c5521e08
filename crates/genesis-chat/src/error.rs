//! Error types for the session controller and its backend.

use genesis_core::error::GenesisError;

use crate::types::RequestId;

/// Errors from the chat session and the explanation backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("server responded with status {status}")]
    Server { status: u16, detail: Option<String> },
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("nothing to continue: no query has been asked yet")]
    NoBaseQuery,
    #[error("request {0} was already completed")]
    AlreadyCompleted(RequestId),
}

impl ChatError {
    /// The backend's structured, human-readable detail string, if it sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ChatError::Server {
                detail: Some(detail),
                ..
            } if !detail.trim().is_empty() => Some(detail.as_str()),
            _ => None,
        }
    }

    /// Message for the user: structured detail, else the transport
    /// message as reported, else the error's own message, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(detail) = self.detail() {
            return detail.to_string();
        }
        let own = match self {
            ChatError::Transport(message) => message.clone(),
            other => other.to_string(),
        };
        if own.trim().is_empty() {
            fallback.to_string()
        } else {
            own
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatError::Decode(err.to_string())
        } else {
            ChatError::Transport(err.to_string())
        }
    }
}

impl From<ChatError> for GenesisError {
    fn from(err: ChatError) -> Self {
        GenesisError::Backend(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::Transport("connection refused".to_string());
        assert_eq!(err.to_string(), "request failed: connection refused");

        let err = ChatError::Server {
            status: 500,
            detail: None,
        };
        assert_eq!(err.to_string(), "server responded with status 500");

        let err = ChatError::Decode("expected value".to_string());
        assert_eq!(err.to_string(), "invalid response: expected value");

        let err = ChatError::NoBaseQuery;
        assert_eq!(
            err.to_string(),
            "nothing to continue: no query has been asked yet"
        );

        let err = ChatError::AlreadyCompleted(RequestId(3));
        assert_eq!(err.to_string(), "request #3 was already completed");
    }

    #[test]
    fn test_detail_only_for_server_errors() {
        let err = ChatError::Server {
            status: 422,
            detail: Some("query must not be empty".to_string()),
        };
        assert_eq!(err.detail(), Some("query must not be empty"));

        let err = ChatError::Transport("timeout".to_string());
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_detail_ignores_blank_strings() {
        let err = ChatError::Server {
            status: 500,
            detail: Some("   ".to_string()),
        };
        assert_eq!(err.detail(), None);
    }

    #[test]
    fn test_user_message_prefers_detail() {
        let err = ChatError::Server {
            status: 404,
            detail: Some("Property not found".to_string()),
        };
        assert_eq!(err.user_message("fallback"), "Property not found");
    }

    #[test]
    fn test_user_message_falls_back_to_own_message() {
        let err = ChatError::Server {
            status: 502,
            detail: None,
        };
        assert_eq!(err.user_message("fallback"), "server responded with status 502");
    }

    #[test]
    fn test_user_message_uses_bare_transport_message() {
        let err = ChatError::Transport("dns error".to_string());
        assert_eq!(err.user_message("fallback"), "dns error");

        let err = ChatError::Transport("  ".to_string());
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn test_into_genesis_error() {
        let err: GenesisError = ChatError::Transport("reset".to_string()).into();
        assert!(matches!(err, GenesisError::Backend(_)));
        assert!(err.to_string().contains("reset"));
    }
}
