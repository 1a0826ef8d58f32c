use crate::Storage;
use shared::{domain::BookId, protocol::BookDraft};

fn draft(title: &str, author: &str, description: &str) -> BookDraft {
    BookDraft {
        title: title.to_string(),
        author: author.to_string(),
        description: description.to_string(),
    }
}

#[tokio::test]
async fn insert_then_list_returns_books_in_id_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first = storage
        .insert_book(&draft("Dune", "Herbert", "Sci-fi"))
        .await
        .expect("insert");
    let second = storage
        .insert_book(&draft("Emma", "Austen", "Novel"))
        .await
        .expect("insert");

    let books = storage.list_books().await.expect("list");
    let ids: Vec<BookId> = books.iter().map(|b| b.book_id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(books[0].title, "Dune");
    assert_eq!(books[1].author, "Austen");
}

#[tokio::test]
async fn get_returns_inserted_fields() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let book_id = storage
        .insert_book(&draft("Dune", "Herbert", "Sci-fi"))
        .await
        .expect("insert");

    let book = storage
        .get_book(book_id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(book.title, "Dune");
    assert_eq!(book.author, "Herbert");
    assert_eq!(book.description, "Sci-fi");
}

#[tokio::test]
async fn update_replaces_all_three_fields() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let book_id = storage
        .insert_book(&draft("Dune", "Herbert", "Sci-fi"))
        .await
        .expect("insert");

    let updated = storage
        .update_book(book_id, &draft("Dune Messiah", "Frank Herbert", "Sequel"))
        .await
        .expect("update");
    assert!(updated);

    let book = storage
        .get_book(book_id)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(book.title, "Dune Messiah");
    assert_eq!(book.author, "Frank Herbert");
    assert_eq!(book.description, "Sequel");
}

#[tokio::test]
async fn update_reports_missing_row() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let updated = storage
        .update_book(BookId(999), &draft("Dune", "Herbert", "Sci-fi"))
        .await
        .expect("update");
    assert!(!updated);
}

#[tokio::test]
async fn delete_removes_row_and_reports_absence_afterwards() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let book_id = storage
        .insert_book(&draft("Dune", "Herbert", "Sci-fi"))
        .await
        .expect("insert");

    assert!(storage.delete_book(book_id).await.expect("delete"));
    assert!(storage.list_books().await.expect("list").is_empty());
    assert!(!storage.delete_book(book_id).await.expect("redelete"));
}

#[tokio::test]
async fn health_check_pings_the_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("ping");
}
