use serde::{Deserialize, Serialize};

use crate::domain::BookId;

/// A catalog record as the books resource returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
}

/// Editable fields submitted on create and on full-replacement update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub description: String,
}

/// Body of `GET /api/books/`. Servers may wrap the list in a hypermedia
/// envelope; everything besides `items` is ignored on decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookCollection {
    pub items: Vec<BookSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_decode_ignores_envelope_extras() {
        let body = serde_json::json!({
            "@namespaces": { "library": { "name": "n/a" } },
            "@controls": { "self": { "href": "/api/books/" } },
            "items": [
                {
                    "book_id": 1,
                    "title": "Dune",
                    "author": "Herbert",
                    "description": "Sci-fi",
                    "@controls": { "self": { "href": "/api/books/1/" } }
                }
            ]
        });

        let collection: BookCollection =
            serde_json::from_value(body).expect("collection decodes");
        assert_eq!(collection.items.len(), 1);
        assert_eq!(collection.items[0].book_id, BookId(1));
        assert_eq!(collection.items[0].title, "Dune");
    }

    #[test]
    fn draft_serializes_exactly_the_three_editable_fields() {
        let draft = BookDraft {
            title: "Dune".into(),
            author: "Herbert".into(),
            description: "Sci-fi".into(),
        };
        let value = serde_json::to_value(&draft).expect("draft encodes");
        assert_eq!(
            value,
            serde_json::json!({
                "title": "Dune",
                "author": "Herbert",
                "description": "Sci-fi"
            })
        );
    }
}
