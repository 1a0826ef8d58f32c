use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use server_api::{create_book, delete_book, get_book, list_books, update_book, ApiContext};
use shared::{
    domain::BookId,
    error::{ApiError, ErrorCode},
    protocol::{BookCollection, BookDraft, BookSummary},
};
use storage::Storage;
use tracing::{error, info};

mod config;

use config::{load_settings, prepare_database_url};

#[derive(Clone)]
struct AppState {
    api: ApiContext,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    let api = ApiContext { storage };

    let state = AppState { api };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "catalog server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/books/", get(http_list_books).post(http_create_book))
        .route(
            "/api/books/:book_id/",
            get(http_get_book)
                .put(http_update_book)
                .delete(http_delete_book),
        )
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn reject(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error))
}

async fn http_list_books(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BookCollection>, (StatusCode, Json<ApiError>)> {
    let items = list_books(&state.api).await.map_err(reject)?;
    Ok(Json(BookCollection { items }))
}

async fn http_get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<i64>,
) -> Result<Json<BookSummary>, (StatusCode, Json<ApiError>)> {
    let book = get_book(&state.api, BookId(book_id)).await.map_err(reject)?;
    Ok(Json(book))
}

async fn http_create_book(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<BookDraft>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let book_id = create_book(&state.api, &draft).await.map_err(reject)?;
    let location = format!("/api/books/{}/", book_id.0);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

async fn http_update_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<i64>,
    Json(draft): Json<BookDraft>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    update_book(&state.api, BookId(book_id), &draft)
        .await
        .map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn http_delete_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<i64>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    delete_book(&state.api, BookId(book_id))
        .await
        .map_err(reject)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let storage = Storage::new("sqlite::memory:").await.expect("db");
        build_router(Arc::new(AppState {
            api: ApiContext { storage },
        }))
    }

    fn draft_body(title: &str, author: &str, description: &str) -> Body {
        Body::from(
            serde_json::json!({
                "title": title,
                "author": author,
                "description": description
            })
            .to_string(),
        )
    }

    async fn collection(app: Router) -> BookCollection {
        let response = app
            .oneshot(
                Request::get("/api/books/")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("collection json")
    }

    #[tokio::test]
    async fn create_answers_201_with_location_and_list_includes_the_book() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/books/")
                    .header("content-type", "application/json")
                    .body(draft_body("Dune", "Herbert", "Sci-fi"))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response
            .headers()
            .get("location")
            .expect("location header")
            .to_str()
            .expect("ascii");
        assert_eq!(location, "/api/books/1/");

        let body = collection(app).await;
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].title, "Dune");
        assert_eq!(body.items[0].book_id, BookId(1));
    }

    #[tokio::test]
    async fn update_answers_204_and_get_reflects_the_change() {
        let app = test_app().await;
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/books/")
                    .header("content-type", "application/json")
                    .body(draft_body("Dune", "Herbert", "Sci-fi"))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(
                Request::put("/api/books/1/")
                    .header("content-type", "application/json")
                    .body(draft_body("Dune Messiah", "Frank Herbert", "Sequel"))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::get("/api/books/1/")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let book: BookSummary = serde_json::from_slice(&bytes).expect("book json");
        assert_eq!(book.title, "Dune Messiah");
    }

    #[tokio::test]
    async fn delete_answers_204_and_empties_the_collection() {
        let app = test_app().await;
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/books/")
                    .header("content-type", "application/json")
                    .body(draft_body("Dune", "Herbert", "Sci-fi"))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(
                Request::delete("/api/books/1/")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let body = collection(app).await;
        assert!(body.items.is_empty());
    }

    #[tokio::test]
    async fn mutating_a_missing_book_answers_404_with_error_body() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::put("/api/books/999/")
                    .header("content-type", "application/json")
                    .body(draft_body("Dune", "Herbert", "Sci-fi"))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let error: ApiError = serde_json::from_slice(&bytes).expect("error json");
        assert!(matches!(error.code, ErrorCode::NotFound));

        let response = app
            .oneshot(
                Request::delete("/api/books/999/")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_with_missing_field_is_rejected_before_reaching_storage() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(
                Request::post("/api/books/")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"title":"Dune","author":"Herbert"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = collection(app).await;
        assert!(body.items.is_empty());
    }
}
