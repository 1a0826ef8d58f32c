use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use shared::{domain::BookId, protocol::BookDraft};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

#[derive(Debug, Clone)]
pub struct StoredBook {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    pub async fn insert_book(&self, draft: &BookDraft) -> Result<BookId> {
        let rec = sqlx::query(
            "INSERT INTO books (title, author, description) VALUES (?, ?, ?) RETURNING book_id",
        )
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(&draft.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(BookId(rec.get::<i64, _>(0)))
    }

    pub async fn get_book(&self, book_id: BookId) -> Result<Option<StoredBook>> {
        let row = sqlx::query(
            "SELECT book_id, title, author, description, created_at
             FROM books WHERE book_id = ?",
        )
        .bind(book_id.0)
        .fetch_optional(&self.pool)
        .await?;
        row.map(book_from_row).transpose()
    }

    /// Full collection in insertion order, the order the resource exposes.
    pub async fn list_books(&self) -> Result<Vec<StoredBook>> {
        let rows = sqlx::query(
            "SELECT book_id, title, author, description, created_at
             FROM books ORDER BY book_id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(book_from_row).collect()
    }

    /// Wholesale replacement of the three editable fields. Returns false when
    /// the row no longer exists.
    pub async fn update_book(&self, book_id: BookId, draft: &BookDraft) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE books SET title = ?, author = ?, description = ? WHERE book_id = ?",
        )
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(&draft.description)
        .bind(book_id.0)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_book(&self, book_id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM books WHERE book_id = ?")
            .bind(book_id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn book_from_row(row: SqliteRow) -> Result<StoredBook> {
    Ok(StoredBook {
        book_id: BookId(row.try_get::<i64, _>("book_id")?),
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_file_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })
}

fn sqlite_file_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
mod tests;
