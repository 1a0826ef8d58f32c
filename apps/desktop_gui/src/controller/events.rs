//! UI/backend events and error modeling for the desktop GUI.

use shared::{domain::BookId, protocol::BookSummary};

pub enum UiEvent {
    CatalogRefreshed {
        books: Vec<BookSummary>,
        selection: Option<BookId>,
    },
    FormSynced {
        title: String,
        author: String,
        description: String,
        error_message: Option<String>,
    },
    Info(String),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    NotFound,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    message: String,
}

impl UiError {
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("transport")
            || message_lower.contains("connection")
            || message_lower.contains("timed out")
            || message_lower.contains("dns")
        {
            UiErrorCategory::Transport
        } else if message_lower.contains("no book with id") || message_lower.contains("404") {
            UiErrorCategory::NotFound
        } else {
            UiErrorCategory::Unknown
        };

        Self { category, message }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Connection",
        UiErrorCategory::NotFound => "Not found",
        UiErrorCategory::Unknown => "Catalog",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_connection_failures_as_transport_errors() {
        let err = UiError::from_message(
            "transport failure reaching the remote store: connection refused",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn classifies_vanished_books_as_not_found() {
        let err = UiError::from_message("no book with id 7 on the remote store");
        assert_eq!(err.category(), UiErrorCategory::NotFound);
    }

    #[test]
    fn everything_else_falls_back_to_the_generic_label() {
        let err = UiError::from_message("remote store answered with status 500");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert_eq!(err_label(err.category()), "Catalog");
    }
}
