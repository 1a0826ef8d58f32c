//! Client-side core of the library catalog: the HTTP remote store client,
//! the list/selection controller, and the form controller shared by the
//! desktop GUI and the command-line client.
//!
//! The remote store is the single source of truth. Every mutation is followed
//! by a wholesale re-fetch of the collection; nothing here caches, retries,
//! or reconciles concurrent edits.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::BookId,
    protocol::{BookCollection, BookDraft, BookSummary},
};
use thiserror::Error;
use tracing::debug;

/// Message shown next to the form when a presence check fails.
pub const MISSING_FIELDS_ERROR: &str = "Error: Missing fields";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("transport failure reaching the remote store: {0}")]
    Network(String),
    #[error("remote store answered with status {status}")]
    Server { status: u16 },
    #[error("no book with id {} on the remote store", .book_id.0)]
    NotFound { book_id: BookId },
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Network(err.to_string())
    }
}

impl ClientError {
    /// True when the request never reached the store at all. HTTP-level
    /// failures still count as "the store answered".
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

/// Boundary between the controllers and the books HTTP resource.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn list_books(&self) -> Result<Vec<BookSummary>, ClientError>;
    async fn get_book(&self, book_id: BookId) -> Result<BookSummary, ClientError>;
    async fn create_book(&self, draft: &BookDraft) -> Result<(), ClientError>;
    async fn update_book(&self, book_id: BookId, draft: &BookDraft) -> Result<(), ClientError>;
    async fn delete_book(&self, book_id: BookId) -> Result<(), ClientError>;
}

/// Remote store client over the books resource. Translates catalog calls
/// into HTTP requests; no retries, no timeouts beyond transport defaults,
/// no business logic.
pub struct CatalogClient {
    http: Client,
    server_url: String,
}

impl CatalogClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        let mut server_url = server_url.into();
        while server_url.ends_with('/') {
            server_url.pop();
        }
        Self {
            http: Client::new(),
            server_url,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/books/", self.server_url)
    }

    fn item_url(&self, book_id: BookId) -> String {
        format!("{}/api/books/{}/", self.server_url, book_id.0)
    }
}

fn expect_success(status: StatusCode) -> Result<(), ClientError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(ClientError::Server {
            status: status.as_u16(),
        })
    }
}

fn expect_item_success(status: StatusCode, book_id: BookId) -> Result<(), ClientError> {
    if status == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound { book_id });
    }
    expect_success(status)
}

#[async_trait]
impl RemoteStore for CatalogClient {
    async fn list_books(&self) -> Result<Vec<BookSummary>, ClientError> {
        let response = self.http.get(self.collection_url()).send().await?;
        expect_success(response.status())?;
        let collection: BookCollection = response.json().await?;
        Ok(collection.items)
    }

    async fn get_book(&self, book_id: BookId) -> Result<BookSummary, ClientError> {
        let response = self.http.get(self.item_url(book_id)).send().await?;
        expect_item_success(response.status(), book_id)?;
        Ok(response.json().await?)
    }

    async fn create_book(&self, draft: &BookDraft) -> Result<(), ClientError> {
        // The store answers 201 + Location with an empty body; the created
        // record is picked up by the refresh that follows.
        let response = self
            .http
            .post(self.collection_url())
            .json(draft)
            .send()
            .await?;
        expect_success(response.status())
    }

    async fn update_book(&self, book_id: BookId, draft: &BookDraft) -> Result<(), ClientError> {
        let response = self
            .http
            .put(self.item_url(book_id))
            .json(draft)
            .send()
            .await?;
        expect_item_success(response.status(), book_id)
    }

    async fn delete_book(&self, book_id: BookId) -> Result<(), ClientError> {
        let response = self.http.delete(self.item_url(book_id)).send().await?;
        expect_item_success(response.status(), book_id)
    }
}

/// Owns the fetched book list and the current selection, and is the only
/// place a refresh is triggered from.
///
/// Overlapping user actions are not coordinated against each other: a second
/// mutation issued before the first one's refresh lands leaves the list
/// reflecting whichever refresh resolved last. Acceptable for a
/// single-user form; do not lean on it for anything stronger.
pub struct CatalogController<S: RemoteStore> {
    store: S,
    books: Vec<BookSummary>,
    selection: Option<BookSummary>,
}

impl<S: RemoteStore> CatalogController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            books: Vec::new(),
            selection: None,
        }
    }

    pub fn books(&self) -> &[BookSummary] {
        &self.books
    }

    pub fn selection(&self) -> Option<&BookSummary> {
        self.selection.as_ref()
    }

    /// Replaces the list wholesale with the server's ordering. On failure the
    /// previous list and selection stay as they were.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let items = self.store.list_books().await?;
        self.books = items;
        // Re-point the selection at the fresh row; drop it if the book
        // disappeared between fetches.
        if let Some(selected) = self.selection.take() {
            self.selection = self
                .books
                .iter()
                .find(|book| book.book_id == selected.book_id)
                .cloned();
        }
        debug!(books = self.books.len(), "catalog refreshed");
        Ok(())
    }

    /// Sets or clears the selection from the already-fetched list. No remote
    /// call; an id that is not in the list clears the selection.
    pub fn select(&mut self, book_id: Option<BookId>) {
        self.selection = book_id.and_then(|id| {
            self.books
                .iter()
                .find(|book| book.book_id == id)
                .cloned()
        });
    }

    /// Create, refresh, clear selection. The refresh still runs when the
    /// create came back as an HTTP-level failure; only a transport failure
    /// means the request never reached the store and there is nothing new to
    /// fetch. The first error encountered is returned either way.
    pub async fn create_and_refresh(&mut self, draft: &BookDraft) -> Result<(), ClientError> {
        let created = self.store.create_book(draft).await;
        let refreshed = self.refresh_after(&created).await;
        self.selection = None;
        created.and(refreshed)
    }

    /// Full-replacement update followed by a refresh. The refresh re-points
    /// the selection at the updated row.
    pub async fn update_and_refresh(
        &mut self,
        book_id: BookId,
        draft: &BookDraft,
    ) -> Result<(), ClientError> {
        let updated = self.store.update_book(book_id, draft).await;
        let refreshed = self.refresh_after(&updated).await;
        updated.and(refreshed)
    }

    /// Delete, refresh, clear selection.
    pub async fn delete_and_refresh(&mut self, book_id: BookId) -> Result<(), ClientError> {
        let deleted = self.store.delete_book(book_id).await;
        let refreshed = self.refresh_after(&deleted).await;
        self.selection = None;
        deleted.and(refreshed)
    }

    async fn refresh_after(&mut self, mutation: &Result<(), ClientError>) -> Result<(), ClientError> {
        match mutation {
            Err(err) if err.is_transport() => Ok(()),
            _ => self.refresh().await,
        }
    }
}

/// Draft state for the book form plus the single error-message slot. The
/// form follows the externally-owned selection through
/// [`FormController::observe_selection`]; it never reaches into the list
/// state itself.
#[derive(Debug, Default)]
pub struct FormController {
    pub title: String,
    pub author: String,
    pub description: String,
    error_message: Option<String>,
    observed_selection: Option<BookId>,
}

impl FormController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Selection-change transition: a newly selected book overwrites the
    /// draft wholesale and dismisses any error; clearing the selection leaves
    /// the draft as it is (only create/delete reset the fields). Returns true
    /// when the draft was repopulated.
    pub fn observe_selection(&mut self, selection: Option<&BookSummary>) -> bool {
        match selection {
            Some(book) if self.observed_selection != Some(book.book_id) => {
                self.observed_selection = Some(book.book_id);
                self.title = book.title.clone();
                self.author = book.author.clone();
                self.description = book.description.clone();
                self.error_message = None;
                true
            }
            Some(_) => false,
            None => {
                self.observed_selection = None;
                false
            }
        }
    }

    /// Any keystroke in a field dismisses the validation error.
    pub fn note_edited(&mut self) {
        self.error_message = None;
    }

    /// Presence check only: all three fields must be non-empty, exactly as
    /// typed (no trimming). On failure the error message is set and no draft
    /// is produced.
    pub fn validate(&mut self) -> Option<BookDraft> {
        if !self.title.is_empty() && !self.author.is_empty() && !self.description.is_empty() {
            Some(BookDraft {
                title: self.title.clone(),
                author: self.author.clone(),
                description: self.description.clone(),
            })
        } else {
            self.error_message = Some(MISSING_FIELDS_ERROR.to_string());
            None
        }
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.author.clear();
        self.description.clear();
    }

    /// Save New: validate, create, refresh, then reset the form. Returns
    /// false when validation blocked the action (no remote call was made).
    /// The form resets even when the store reported a failure; the submit is
    /// fire-and-forget from the form's point of view.
    pub async fn save_new<S: RemoteStore>(
        &mut self,
        catalog: &mut CatalogController<S>,
    ) -> Result<bool, ClientError> {
        let Some(draft) = self.validate() else {
            return Ok(false);
        };
        let result = catalog.create_and_refresh(&draft).await;
        self.clear();
        result.map(|()| true)
    }

    /// Save (update): only available with a selection. The draft is kept
    /// afterwards so the just-saved values stay visible.
    pub async fn save_update<S: RemoteStore>(
        &mut self,
        catalog: &mut CatalogController<S>,
    ) -> Result<bool, ClientError> {
        let Some(book_id) = catalog.selection().map(|book| book.book_id) else {
            return Ok(false);
        };
        let Some(draft) = self.validate() else {
            return Ok(false);
        };
        catalog.update_and_refresh(book_id, &draft).await?;
        Ok(true)
    }

    /// Delete: no validation; clears the draft afterwards.
    pub async fn delete_selected<S: RemoteStore>(
        &mut self,
        catalog: &mut CatalogController<S>,
    ) -> Result<bool, ClientError> {
        let Some(book_id) = catalog.selection().map(|book| book.book_id) else {
            return Ok(false);
        };
        let result = catalog.delete_and_refresh(book_id).await;
        self.clear();
        result.map(|()| true)
    }
}
