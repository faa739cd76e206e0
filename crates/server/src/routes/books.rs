use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use service::books::domain::{Book, BookSearch, NewBook, Review};

use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::{errors::JsonApiError, state::ServerState};

#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub isbn: Option<i64>,
    pub author: Option<String>,
    pub title: Option<String>,
}

impl SearchQuery {
    /// Blank strings count as not supplied.
    fn into_search(self) -> BookSearch {
        let keep = |s: Option<String>| s.filter(|v| !v.trim().is_empty());
        BookSearch { isbn: self.isbn, author: keep(self.author), title: keep(self.title) }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateBookInput {
    pub isbn: i64,
    pub author: String,
    pub title: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReviewInput {
    pub username: String,
    #[serde(alias = "review")]
    pub text: String,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UsernameInput {
    pub username: Option<String>,
}

#[utoipa::path(get, path = "/books", tag = "books", responses((status = 200, description = "All books", body = [crate::openapi::BookDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<Book>>, JsonApiError> {
    let books = state.books.list_books().await?;
    debug!(count = books.len(), "list books");
    Ok(Json(books))
}

#[utoipa::path(
    post, path = "/books", tag = "books",
    request_body = crate::openapi::CreateBookRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::BookDoc),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Isbn already exists")
    )
)]
pub async fn create(State(state): State<ServerState>, ApiJson(input): ApiJson<CreateBookInput>) -> Result<(StatusCode, Json<Book>), JsonApiError> {
    let book = state
        .books
        .create_book(NewBook { isbn: input.isbn, author: input.author, title: input.title })
        .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Filters come from the query string; a JSON body is read only when the query has none.
#[utoipa::path(
    get, path = "/books/search", tag = "books",
    params(SearchQuery),
    responses((status = 200, description = "Books matching any supplied field", body = [crate::openapi::BookDoc]))
)]
pub async fn search(
    State(state): State<ServerState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
    body: Bytes,
) -> Result<Json<Vec<Book>>, JsonApiError> {
    let mut search = query.into_search();
    if search.is_empty() && !body.is_empty() {
        let from_body: SearchQuery = serde_json::from_slice(&body)
            .map_err(|e| JsonApiError::bad_request(format!("invalid search body: {e}")))?;
        search = from_body.into_search();
    }
    let books = state.books.search_books(&search).await?;
    Ok(Json(books))
}

#[utoipa::path(
    get, path = "/books/{id}", tag = "books",
    params(("id" = i64, Path, description = "Book isbn")),
    responses((status = 200, description = "OK", body = crate::openapi::BookDoc), (status = 404, description = "Book not found"))
)]
pub async fn get(State(state): State<ServerState>, ApiPath(isbn): ApiPath<i64>) -> Result<Json<Book>, JsonApiError> {
    Ok(Json(state.books.get_book(isbn).await?))
}

#[utoipa::path(
    get, path = "/books/{id}/reviews", tag = "reviews",
    params(("id" = i64, Path, description = "Book isbn")),
    responses((status = 200, description = "Reviews in insertion order", body = [crate::openapi::ReviewDoc]), (status = 404, description = "Book not found"))
)]
pub async fn reviews(State(state): State<ServerState>, ApiPath(isbn): ApiPath<i64>) -> Result<Json<Vec<Review>>, JsonApiError> {
    Ok(Json(state.books.get_reviews(isbn).await?))
}

#[utoipa::path(
    post, path = "/books/{id}/reviews", tag = "reviews",
    params(("id" = i64, Path, description = "Book isbn")),
    request_body = crate::openapi::ReviewRequest,
    responses(
        (status = 200, description = "Updated book", body = crate::openapi::BookDoc),
        (status = 403, description = "Unknown user"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "User already reviewed this book")
    )
)]
pub async fn add_review(
    State(state): State<ServerState>,
    ApiPath(isbn): ApiPath<i64>,
    ApiJson(input): ApiJson<ReviewInput>,
) -> Result<Json<Book>, JsonApiError> {
    let book = state.books.add_review(isbn, &input.username, &input.text).await?;
    Ok(Json(book))
}

#[utoipa::path(
    put, path = "/books/{id}/reviews/update", tag = "reviews",
    params(("id" = i64, Path, description = "Book isbn")),
    request_body = crate::openapi::ReviewRequest,
    responses((status = 200, description = "Updated book", body = crate::openapi::BookDoc), (status = 404, description = "Book or review not found"))
)]
pub async fn update_review(
    State(state): State<ServerState>,
    ApiPath(isbn): ApiPath<i64>,
    ApiJson(input): ApiJson<ReviewInput>,
) -> Result<Json<Book>, JsonApiError> {
    let book = state.books.update_review(isbn, &input.username, &input.text).await?;
    Ok(Json(book))
}

/// The username may arrive as `?username=` or in a JSON body.
#[utoipa::path(
    delete, path = "/books/{id}/reviews/delete", tag = "reviews",
    params(("id" = i64, Path, description = "Book isbn"), ("username" = Option<String>, Query, description = "Review author")),
    request_body = crate::openapi::DeleteReviewRequest,
    responses((status = 200, description = "Updated book", body = crate::openapi::BookDoc), (status = 404, description = "Book or review not found"))
)]
pub async fn delete_review(
    State(state): State<ServerState>,
    ApiPath(isbn): ApiPath<i64>,
    ApiQuery(query): ApiQuery<UsernameInput>,
    body: Bytes,
) -> Result<Json<Book>, JsonApiError> {
    let username = match query.username {
        Some(u) => u,
        None if !body.is_empty() => serde_json::from_slice::<UsernameInput>(&body)
            .map_err(|e| JsonApiError::bad_request(format!("invalid body: {e}")))?
            .username
            .ok_or_else(|| JsonApiError::bad_request("username required"))?,
        None => return Err(JsonApiError::bad_request("username required")),
    };
    let book = state.books.delete_review(isbn, &username).await?;
    Ok(Json(book))
}
