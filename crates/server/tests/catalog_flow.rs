mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{build_app, register, send, DUNE, EARTHSEA};

#[tokio::test]
async fn test_list_and_get_books() -> anyhow::Result<()> {
    let app = build_app(None);
    let (status, books) = send(&app, "GET", "/books", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(books.as_array().map(Vec::len), Some(2));

    let (status, book) = send(&app, "GET", &format!("/books/{DUNE}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["title"], "Dune");

    let (status, body) = send(&app, "GET", "/books/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Book not found");
    Ok(())
}

#[tokio::test]
async fn test_search_by_query_string() -> anyhow::Result<()> {
    let app = build_app(None);
    let (status, hits) = send(&app, "GET", &format!("/books/search?isbn={EARTHSEA}"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits[0]["author"], "Ursula K. Le Guin");
    assert_eq!(hits.as_array().map(Vec::len), Some(1));

    // filters are OR-ed
    let (_, hits) = send(&app, "GET", "/books/search?author=Frank%20Herbert&title=A%20Wizard%20of%20Earthsea", None).await?;
    assert_eq!(hits.as_array().map(Vec::len), Some(2));

    let (status, hits) = send(&app, "GET", "/books/search", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits, json!([]));
    Ok(())
}

#[tokio::test]
async fn test_create_book() -> anyhow::Result<()> {
    let app = build_app(None);
    let input = json!({"isbn": 9780261102217i64, "author": "J. R. R. Tolkien", "title": "The Hobbit"});
    let (status, book) = send(&app, "POST", "/books", Some(input.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(book["reviews"], json!([]));

    let (status, _) = send(&app, "POST", "/books", Some(input)).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn test_reviews_of_missing_book() -> anyhow::Result<()> {
    let app = build_app(None);
    let (status, _) = send(&app, "GET", "/books/42/reviews", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    register(&app, "ann", "ann-password").await?;
    let (status, _) = send(&app, "POST", "/books/42/reviews", Some(json!({"username": "ann", "text": "hi"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_unknown_user_cannot_review() -> anyhow::Result<()> {
    let app = build_app(None);
    let uri = format!("/books/{DUNE}/reviews");
    let (status, body) = send(&app, "POST", &uri, Some(json!({"username": "mallory", "text": "spam"}))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unknown user");

    let (_, reviews) = send(&app, "GET", &uri, None).await?;
    assert_eq!(reviews, json!([]));
    Ok(())
}

#[tokio::test]
async fn test_review_lifecycle_keeps_other_reviews() -> anyhow::Result<()> {
    let app = build_app(None);
    register(&app, "ann", "ann-password").await?;
    register(&app, "ben", "ben-password").await?;
    let uri = format!("/books/{DUNE}/reviews");

    let (status, _) = send(&app, "POST", &uri, Some(json!({"username": "ann", "text": "Spice!"}))).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, book) = send(&app, "POST", &uri, Some(json!({"username": "ben", "review": "Long."}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["reviews"].as_array().map(Vec::len), Some(2));

    let (status, _) = send(&app, "POST", &uri, Some(json!({"username": "ann", "text": "Again"}))).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, book) = send(&app, "PUT", &format!("{uri}/update"), Some(json!({"username": "ann", "text": "Even better"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        book["reviews"],
        json!([{"username": "ann", "text": "Even better"}, {"username": "ben", "text": "Long."}])
    );

    let (status, book) = send(&app, "DELETE", &format!("{uri}/delete?username=ann"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["reviews"], json!([{"username": "ben", "text": "Long."}]));

    let (status, body) = send(&app, "DELETE", &format!("{uri}/delete"), Some(json!({"username": "ann"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Review not found");

    let (_, reviews) = send(&app, "GET", &uri, None).await?;
    assert_eq!(reviews, json!([{"username": "ben", "text": "Long."}]));
    Ok(())
}

#[tokio::test]
async fn test_update_missing_review() -> anyhow::Result<()> {
    let app = build_app(None);
    let uri = format!("/books/{EARTHSEA}/reviews/update");
    let (status, _) = send(&app, "PUT", &uri, Some(json!({"username": "ghost", "text": "boo"}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_delete_without_username_is_bad_request() -> anyhow::Result<()> {
    let app = build_app(None);
    let (status, _) = send(&app, "DELETE", &format!("/books/{DUNE}/reviews/delete"), None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn test_search_by_json_body() -> anyhow::Result<()> {
    let app = build_app(None);
    let (status, hits) = send(&app, "GET", "/books/search", Some(json!({"title": "Dune"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().map(Vec::len), Some(1));
    assert_eq!(hits[0]["isbn"], DUNE);
    Ok(())
}

#[tokio::test]
async fn test_search_query_string_wins_over_body() -> anyhow::Result<()> {
    let app = build_app(None);
    let uri = format!("/books/search?isbn={EARTHSEA}");
    let (status, hits) = send(&app, "GET", &uri, Some(json!({"title": "Dune"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hits.as_array().map(Vec::len), Some(1));
    assert_eq!(hits[0]["isbn"], EARTHSEA);
    Ok(())
}

#[tokio::test]
async fn test_malformed_input_renders_json_errors() -> anyhow::Result<()> {
    let app = build_app(None);

    let (status, body) = send(&app, "GET", "/books/search?isbn=abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert!(body["detail"].as_str().is_some_and(|d| !d.is_empty()));

    let (status, body) = send(&app, "GET", "/books/abc/reviews", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");

    let (status, body) = send(&app, "POST", &format!("/books/{DUNE}/reviews"), Some(json!({"text": "no user"}))).await?;
    assert!(status.is_client_error());
    assert!(body["error"].is_string(), "{body}");
    Ok(())
}

#[tokio::test]
async fn test_review_checks_precede_text_rule() -> anyhow::Result<()> {
    let app = build_app(None);
    register(&app, "ann", "ann-password").await?;

    let (status, _) = send(&app, "POST", "/books/42/reviews", Some(json!({"username": "ann", "text": ""}))).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/books/{DUNE}/reviews");
    let (status, _) = send(&app, "POST", &uri, Some(json!({"username": "mallory", "text": ""}))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "POST", &uri, Some(json!({"username": "ann", "text": ""}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
