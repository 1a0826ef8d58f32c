use shared::{
    domain::BookId,
    error::{ApiError, ErrorCode},
    protocol::{BookDraft, BookSummary},
};
use storage::{Storage, StoredBook};
use tracing::debug;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

pub async fn list_books(ctx: &ApiContext) -> Result<Vec<BookSummary>, ApiError> {
    let books = ctx.storage.list_books().await.map_err(internal)?;
    Ok(books.into_iter().map(summary).collect())
}

pub async fn get_book(ctx: &ApiContext, book_id: BookId) -> Result<BookSummary, ApiError> {
    let book = ctx
        .storage
        .get_book(book_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| not_found(book_id))?;
    Ok(summary(book))
}

/// Field presence is already enforced by deserialization of the draft;
/// emptiness is deliberately left to the client.
pub async fn create_book(ctx: &ApiContext, draft: &BookDraft) -> Result<BookId, ApiError> {
    let book_id = ctx.storage.insert_book(draft).await.map_err(internal)?;
    debug!(book_id = book_id.0, "created book");
    Ok(book_id)
}

pub async fn update_book(
    ctx: &ApiContext,
    book_id: BookId,
    draft: &BookDraft,
) -> Result<(), ApiError> {
    let updated = ctx
        .storage
        .update_book(book_id, draft)
        .await
        .map_err(internal)?;
    if !updated {
        return Err(not_found(book_id));
    }
    debug!(book_id = book_id.0, "updated book");
    Ok(())
}

pub async fn delete_book(ctx: &ApiContext, book_id: BookId) -> Result<(), ApiError> {
    let deleted = ctx.storage.delete_book(book_id).await.map_err(internal)?;
    if !deleted {
        return Err(not_found(book_id));
    }
    debug!(book_id = book_id.0, "deleted book");
    Ok(())
}

fn summary(book: StoredBook) -> BookSummary {
    BookSummary {
        book_id: book.book_id,
        title: book.title,
        author: book.author,
        description: book.description,
    }
}

fn not_found(book_id: BookId) -> ApiError {
    ApiError::new(
        ErrorCode::NotFound,
        format!("No book was found with the id '{}'", book_id.0),
    )
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Internal, err.to_string())
}
